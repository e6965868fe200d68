use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use std::sync::Arc;

use super::{error_response, respond};
use crate::cache::{ObjectCache, user_cache_key};
use crate::middlewares;
use crate::models::ApiResponse;
use crate::models::auth::{Caller, requests::LoginRequest};
use crate::models::users::entities::UserRole;
use crate::models::users::requests::{RegisterRequest, UpdateProfileRequest};
use crate::services::AuthService;
use crate::utils::jwt::JwtUtils;

pub async fn login(
    service: web::Data<AuthService>,
    login_request: web::Json<LoginRequest>,
) -> ActixResult<HttpResponse> {
    match service.login(login_request.into_inner()).await {
        Ok(outcome) => {
            let refresh_cookie = JwtUtils::create_refresh_token_cookie(&outcome.refresh_token);
            Ok(HttpResponse::Ok()
                .cookie(refresh_cookie)
                .json(ApiResponse::success(outcome.response, "Login successful")))
        }
        Err(err) => Ok(error_response(&err)),
    }
}

pub async fn refresh_token(
    service: web::Data<AuthService>,
    request: HttpRequest,
) -> ActixResult<HttpResponse> {
    let token = JwtUtils::extract_refresh_token_from_cookie(&request);
    Ok(respond(
        service.refresh(token.as_deref()).await,
        "Token refreshed successfully",
    ))
}

pub async fn logout(
    caller: Caller,
    cache: web::Data<Arc<dyn ObjectCache>>,
) -> ActixResult<HttpResponse> {
    cache.remove(&user_cache_key(caller.id)).await;
    tracing::info!("User {} logged out", caller.id);
    Ok(HttpResponse::Ok()
        .cookie(JwtUtils::create_empty_refresh_token_cookie())
        .json(ApiResponse::success_empty("Logged out successfully")))
}

pub async fn get_user(
    service: web::Data<AuthService>,
    caller: Option<Caller>,
) -> ActixResult<HttpResponse> {
    Ok(respond(
        service.current_user(caller.as_ref()).await,
        "User retrieved successfully",
    ))
}

pub async fn register(
    service: web::Data<AuthService>,
    caller: Option<Caller>,
    user_data: web::Json<RegisterRequest>,
) -> ActixResult<HttpResponse> {
    Ok(respond(
        service
            .register(caller.as_ref(), user_data.into_inner())
            .await,
        "User registered successfully",
    ))
}

pub async fn update_profile(
    service: web::Data<AuthService>,
    cache: web::Data<Arc<dyn ObjectCache>>,
    caller: Option<Caller>,
    update_data: web::Json<UpdateProfileRequest>,
) -> ActixResult<HttpResponse> {
    let result = service
        .update_profile(caller.as_ref(), update_data.into_inner())
        .await;
    if let Ok(user) = &result {
        cache.remove(&user_cache_key(user.id)).await;
    }
    Ok(respond(result, "Profile updated successfully"))
}

// 配置路由
pub fn configure_auth_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(web::resource("/api/login").route(web::post().to(login)))
        .service(web::resource("/api/refresh").route(web::post().to(refresh_token)))
        .service(
            web::resource("/api/logout")
                .wrap(middlewares::RequireJWT)
                .route(web::post().to(logout)),
        )
        .service(
            web::resource("/api/user")
                .wrap(middlewares::RequireJWT)
                .route(web::get().to(get_user)),
        )
        .service(
            web::resource("/api/user/profile")
                .wrap(middlewares::RequireJWT)
                .route(web::put().to(update_profile)),
        )
        .service(
            // 账号由管理员创建
            web::resource("/api/register")
                .wrap(middlewares::RequireRole::new_any(UserRole::admin_roles()))
                .wrap(middlewares::RequireJWT)
                .route(web::post().to(register)),
        );
}
