use actix_web::{HttpResponse, Result as ActixResult, web};

use super::respond;
use crate::middlewares;
use crate::models::auth::Caller;
use crate::services::NotificationService;
use crate::utils::SafeIDI64;

pub async fn list_notifications(
    service: web::Data<NotificationService>,
    caller: Option<Caller>,
) -> ActixResult<HttpResponse> {
    Ok(respond(
        service.list_notifications(caller.as_ref()).await,
        "Notifications retrieved successfully",
    ))
}

pub async fn unread_count(
    service: web::Data<NotificationService>,
    caller: Option<Caller>,
) -> ActixResult<HttpResponse> {
    Ok(respond(
        service.unread_count(caller.as_ref()).await,
        "Unread count retrieved successfully",
    ))
}

pub async fn mark_all_read(
    service: web::Data<NotificationService>,
    caller: Option<Caller>,
) -> ActixResult<HttpResponse> {
    Ok(respond(
        service.mark_all_read(caller.as_ref()).await,
        "All notifications marked as read",
    ))
}

pub async fn mark_read(
    service: web::Data<NotificationService>,
    caller: Option<Caller>,
    notification_id: SafeIDI64,
) -> ActixResult<HttpResponse> {
    Ok(respond(
        service.mark_read(caller.as_ref(), notification_id.0).await,
        "Notification marked as read",
    ))
}

// 配置路由
pub fn configure_notifications_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/notifications")
            .wrap(middlewares::RequireJWT)
            .route("", web::get().to(list_notifications))
            .route("/unread-count", web::get().to(unread_count))
            .route("/read-all", web::post().to(mark_all_read))
            .route("/{id}/read", web::post().to(mark_read)),
    );
}
