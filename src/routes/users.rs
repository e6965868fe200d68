use actix_web::{HttpResponse, Result as ActixResult, web};
use std::sync::Arc;

use super::respond;
use crate::cache::{ObjectCache, user_cache_key};
use crate::middlewares;
use crate::models::auth::Caller;
use crate::models::users::entities::UserRole;
use crate::models::users::requests::{RecordPaymentRequest, UpdateUserRequest, UserListParams};
use crate::services::UserService;
use crate::utils::SafeIDI64;

pub async fn list_users(
    service: web::Data<UserService>,
    caller: Option<Caller>,
    query: web::Query<UserListParams>,
) -> ActixResult<HttpResponse> {
    Ok(respond(
        service
            .list_users(caller.as_ref(), query.into_inner())
            .await,
        "Users retrieved successfully",
    ))
}

pub async fn update_user(
    service: web::Data<UserService>,
    cache: web::Data<Arc<dyn ObjectCache>>,
    caller: Option<Caller>,
    user_id: SafeIDI64,
    update_data: web::Json<UpdateUserRequest>,
) -> ActixResult<HttpResponse> {
    let result = service
        .update_user(caller.as_ref(), user_id.0, update_data.into_inner())
        .await;
    // 停用等变更需要立即对会话生效
    if result.is_ok() {
        cache.remove(&user_cache_key(user_id.0)).await;
    }
    Ok(respond(result, "User updated successfully"))
}

pub async fn record_payment(
    service: web::Data<UserService>,
    cache: web::Data<Arc<dyn ObjectCache>>,
    caller: Option<Caller>,
    user_id: SafeIDI64,
    payment: web::Json<RecordPaymentRequest>,
) -> ActixResult<HttpResponse> {
    let result = service
        .record_payment(caller.as_ref(), user_id.0, payment.into_inner())
        .await;
    if result.is_ok() {
        cache.remove(&user_cache_key(user_id.0)).await;
    }
    Ok(respond(result, "Payment recorded successfully"))
}

// 配置路由
pub fn configure_user_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/users")
            .wrap(middlewares::RequireRole::new_any(UserRole::admin_roles()))
            .wrap(middlewares::RequireJWT)
            .route("", web::get().to(list_users))
            .route("/{id}", web::put().to(update_user))
            .route("/{id}/payments", web::post().to(record_payment)),
    );
}
