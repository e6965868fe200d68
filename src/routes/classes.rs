use actix_web::{HttpResponse, Result as ActixResult, web};

use super::respond;
use crate::middlewares;
use crate::models::auth::Caller;
use crate::models::classes::requests::CreateClassRequest;
use crate::models::users::entities::UserRole;
use crate::services::ClassService;
use crate::utils::SafeIDI64;

// HTTP处理程序
pub async fn list_classes(
    service: web::Data<ClassService>,
    caller: Option<Caller>,
) -> ActixResult<HttpResponse> {
    Ok(respond(
        service.list_classes(caller.as_ref()).await,
        "Classes retrieved successfully",
    ))
}

pub async fn create_class(
    service: web::Data<ClassService>,
    caller: Option<Caller>,
    class_data: web::Json<CreateClassRequest>,
) -> ActixResult<HttpResponse> {
    Ok(respond(
        service
            .create_class(caller.as_ref(), class_data.into_inner())
            .await,
        "Class created successfully",
    ))
}

pub async fn get_class(
    service: web::Data<ClassService>,
    caller: Option<Caller>,
    class_id: SafeIDI64,
) -> ActixResult<HttpResponse> {
    Ok(respond(
        service.get_class(caller.as_ref(), class_id.0).await,
        "Class retrieved successfully",
    ))
}

pub async fn schedule_class(
    service: web::Data<ClassService>,
    caller: Option<Caller>,
    class_id: SafeIDI64,
) -> ActixResult<HttpResponse> {
    Ok(respond(
        service.schedule_class(caller.as_ref(), class_id.0).await,
        "Class scheduled successfully",
    ))
}

// 配置路由
pub fn configure_classes_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/classes")
            .wrap(middlewares::RequireJWT)
            .service(
                // 教师和学生只能看到自己的班级，管理员可以看到全部
                web::resource("").route(web::get().to(list_classes)).route(
                    web::post()
                        .to(create_class)
                        .wrap(middlewares::RequireRole::new_any(UserRole::admin_roles())),
                ),
            )
            .service(web::resource("/{id}").route(web::get().to(get_class)))
            .service(
                web::resource("/{id}/schedule").route(
                    web::post()
                        .to(schedule_class)
                        .wrap(middlewares::RequireRole::new_any(UserRole::admin_roles())),
                ),
            ),
    );
}
