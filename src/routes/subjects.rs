use actix_web::{HttpResponse, Result as ActixResult, web};

use super::respond;
use crate::middlewares;
use crate::models::auth::Caller;
use crate::models::subjects::requests::SubjectRequest;
use crate::models::users::entities::UserRole;
use crate::services::SubjectService;
use crate::utils::SafeIDI64;

pub async fn list_subjects(
    service: web::Data<SubjectService>,
    caller: Option<Caller>,
) -> ActixResult<HttpResponse> {
    Ok(respond(
        service.list_subjects(caller.as_ref()).await,
        "Subjects retrieved successfully",
    ))
}

pub async fn create_subject(
    service: web::Data<SubjectService>,
    caller: Option<Caller>,
    subject_data: web::Json<SubjectRequest>,
) -> ActixResult<HttpResponse> {
    Ok(respond(
        service
            .create_subject(caller.as_ref(), subject_data.into_inner())
            .await,
        "Subject created successfully",
    ))
}

pub async fn update_subject(
    service: web::Data<SubjectService>,
    caller: Option<Caller>,
    subject_id: SafeIDI64,
    subject_data: web::Json<SubjectRequest>,
) -> ActixResult<HttpResponse> {
    Ok(respond(
        service
            .update_subject(caller.as_ref(), subject_id.0, subject_data.into_inner())
            .await,
        "Subject updated successfully",
    ))
}

// 配置路由
pub fn configure_subjects_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/subjects")
            .wrap(middlewares::RequireJWT)
            .service(
                web::resource("").route(web::get().to(list_subjects)).route(
                    web::post()
                        .to(create_subject)
                        .wrap(middlewares::RequireRole::new_any(UserRole::admin_roles())),
                ),
            )
            .service(
                web::resource("/{id}").route(
                    web::put()
                        .to(update_subject)
                        .wrap(middlewares::RequireRole::new_any(UserRole::admin_roles())),
                ),
            ),
    );
}
