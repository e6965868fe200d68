pub mod appointments;

pub mod auth;

pub mod classes;

pub mod notifications;

pub mod subjects;

pub mod users;

pub use appointments::configure_appointments_routes;
pub use auth::configure_auth_routes;
pub use classes::configure_classes_routes;
pub use notifications::configure_notifications_routes;
pub use subjects::configure_subjects_routes;
pub use users::configure_user_routes;

use actix_web::{HttpResponse, web};
use serde::Serialize;
use tracing::{debug, error};
use ts_rs::TS;

use crate::errors::{Result, TutorHubError};
use crate::models::ApiResponse;

// 把服务层结果转换为统一响应
pub(crate) fn respond<T: Serialize + TS>(result: Result<T>, message: &str) -> HttpResponse {
    match result {
        Ok(data) => HttpResponse::Ok().json(ApiResponse::success(data, message)),
        Err(err) => error_response(&err),
    }
}

pub(crate) fn error_response(err: &TutorHubError) -> HttpResponse {
    // 服务端错误只记录日志，不向客户端暴露细节
    if err.status_code().is_server_error() {
        error!("{}", err);
    } else {
        debug!("{}", err);
    }
    HttpResponse::build(err.status_code()).json(ApiResponse::<()>::from(err))
}

// 注册全部 API 路由
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.configure(configure_auth_routes)
        .configure(configure_user_routes)
        .configure(configure_subjects_routes)
        .configure(configure_classes_routes)
        .configure(configure_appointments_routes)
        .configure(configure_notifications_routes);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::ObjectCache;
    use crate::cache::object_cache::moka::MokaCacheWrapper;
    use crate::config::AppConfig;
    use crate::runtime::lifetime::startup::AppServices;
    use crate::services::test_support;
    use crate::services::users::seed::seed_admin_with;
    use crate::storage::Storage;
    use crate::utils::{json_error_handler, query_error_handler};
    use actix_web::{App, http::StatusCode, test};
    use serde_json::{Value, json};
    use std::sync::Arc;

    macro_rules! app {
        ($storage:expr) => {{
            let cache: Arc<dyn ObjectCache> =
                Arc::new(MokaCacheWrapper::new(&AppConfig::get().cache));
            let services = AppServices::new($storage.clone(), test_support::meetings());
            test::init_service(
                App::new()
                    .app_data(web::QueryConfig::default().error_handler(query_error_handler))
                    .app_data(web::JsonConfig::default().error_handler(json_error_handler))
                    .app_data(web::Data::new($storage.clone()))
                    .app_data(web::Data::new(cache))
                    .configure(|cfg| services.configure(cfg))
                    .configure(configure_routes),
            )
            .await
        }};
    }

    macro_rules! call {
        ($app:expr, $req:expr) => {{
            let resp = test::call_service(&$app, $req.to_request()).await;
            let status = resp.status();
            let body: Value = test::read_body_json(resp).await;
            (status, body)
        }};
    }

    macro_rules! login {
        ($app:expr, $username:expr, $password:expr) => {{
            let (_, body) = call!(
                $app,
                test::TestRequest::post()
                    .uri("/api/login")
                    .set_json(json!({"username": $username, "password": $password}))
            );
            body["data"]["access_token"].as_str().unwrap().to_string()
        }};
    }

    fn bearer(token: &str) -> (&'static str, String) {
        ("Authorization", format!("Bearer {token}"))
    }

    async fn admin_storage() -> Arc<dyn Storage> {
        let storage = test_support::storage().await;
        seed_admin_with(&storage, Some("adminpass1".to_string()))
            .await
            .unwrap();
        storage
    }

    #[actix_web::test]
    async fn test_login_and_session() {
        let storage = admin_storage().await;
        let app = app!(storage);

        let (status, body) = call!(
            app,
            test::TestRequest::post()
                .uri("/api/login")
                .set_json(json!({"username": "admin", "password": "wrongpass1"}))
        );
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["code"], 1001);

        let resp = test::call_service(
            &app,
            test::TestRequest::post()
                .uri("/api/login")
                .set_json(json!({"username": "admin", "password": "adminpass1"}))
                .to_request(),
        )
        .await;
        assert_eq!(resp.status(), StatusCode::OK);
        assert!(resp.response().cookies().any(|c| c.name() == "refresh_token"));
        let body: Value = test::read_body_json(resp).await;
        let token = body["data"]["access_token"].as_str().unwrap().to_string();
        assert_eq!(body["data"]["user"]["role"], "admin");
        assert!(body["data"]["user"].get("passwordHash").is_none());

        let (status, body) = call!(
            app,
            test::TestRequest::get()
                .uri("/api/user")
                .insert_header(bearer(&token))
        );
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["username"], "admin");

        let (status, _) = call!(app, test::TestRequest::get().uri("/api/user"));
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }

    #[actix_web::test]
    async fn test_scheduling_flow() {
        let storage = admin_storage().await;
        let app = app!(storage);
        let admin = login!(app, "admin", "adminpass1");

        let mut ids = Vec::new();
        for (username, role) in [("mark", "teacher"), ("amy", "student")] {
            let (status, body) = call!(
                app,
                test::TestRequest::post()
                    .uri("/api/register")
                    .insert_header(bearer(&admin))
                    .set_json(json!({
                        "username": username,
                        "password": "secret123",
                        "role": role,
                        "name": username.to_uppercase(),
                    }))
            );
            assert_eq!(status, StatusCode::OK, "{body}");
            ids.push(body["data"]["id"].as_i64().unwrap());
        }
        let (teacher_id, student_id) = (ids[0], ids[1]);

        let (status, body) = call!(
            app,
            test::TestRequest::post()
                .uri("/api/subjects")
                .insert_header(bearer(&admin))
                .set_json(json!({
                    "name": "Algebra",
                    "sessionsPerWeek": 2,
                    "durations": "60, abc, 90",
                    "pricePerDuration": {"60": 40.0, "90": 55.0},
                }))
        );
        assert_eq!(status, StatusCode::OK, "{body}");
        assert_eq!(body["data"]["durations"], json!([60, 90]));
        let subject_id = body["data"]["id"].as_i64().unwrap();

        let student = login!(app, "amy", "secret123");
        let (status, body) = call!(
            app,
            test::TestRequest::post()
                .uri("/api/subjects")
                .insert_header(bearer(&student))
                .set_json(json!({"name": "Hacking", "sessionsPerWeek": 1}))
        );
        assert_eq!(status, StatusCode::FORBIDDEN);
        assert_eq!(body["code"], 1003);

        let (status, body) = call!(
            app,
            test::TestRequest::post()
                .uri("/api/classes")
                .insert_header(bearer(&admin))
                .set_json(json!({
                    "subjectId": subject_id,
                    "teacherId": teacher_id,
                    "studentIds": [student_id],
                    "startDate": "2024-01-01",
                    "endDate": "2024-01-14",
                    "weekDays": ["MON"],
                    "timePerDay": {"MON": "10:00"},
                    "durationPerDay": {"MON": 60},
                }))
        );
        assert_eq!(status, StatusCode::OK, "{body}");
        let class_id = body["data"]["id"].as_i64().unwrap();

        let (status, body) = call!(
            app,
            test::TestRequest::post()
                .uri(&format!("/api/classes/{class_id}/schedule"))
                .insert_header(bearer(&admin))
        );
        assert_eq!(status, StatusCode::OK, "{body}");
        assert_eq!(body["data"].as_array().unwrap().len(), 2);

        let (status, body) = call!(
            app,
            test::TestRequest::get()
                .uri("/api/appointments")
                .insert_header(bearer(&student))
        );
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"].as_array().unwrap().len(), 2);
        assert_eq!(body["data"][0]["date"], "2024-01-01");

        let (_, body) = call!(
            app,
            test::TestRequest::get()
                .uri("/api/notifications/unread-count")
                .insert_header(bearer(&student))
        );
        assert_eq!(body["data"]["unreadCount"], 2);

        let (status, body) = call!(
            app,
            test::TestRequest::post()
                .uri("/api/notifications/read-all")
                .insert_header(bearer(&student))
        );
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["updated"], 2);
    }

    #[actix_web::test]
    async fn test_bad_input_envelopes() {
        let storage = admin_storage().await;
        let app = app!(storage);
        let admin = login!(app, "admin", "adminpass1");

        let (status, body) = call!(
            app,
            test::TestRequest::get()
                .uri("/api/classes/abc")
                .insert_header(bearer(&admin))
        );
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["code"], 1000);

        let (status, _) = call!(
            app,
            test::TestRequest::get()
                .uri("/api/classes/42")
                .insert_header(bearer(&admin))
        );
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (status, body) = call!(
            app,
            test::TestRequest::post()
                .uri("/api/appointments")
                .insert_header(bearer(&admin))
                .insert_header(("Content-Type", "application/json"))
                .set_payload("{not json")
        );
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["code"], 1000);
    }
}
