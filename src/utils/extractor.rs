//! 请求参数提取器

use actix_web::error::InternalError;
use actix_web::{FromRequest, HttpMessage, HttpRequest, HttpResponse, dev::Payload};
use futures_util::future::{Ready, ready};

use crate::models::auth::Caller;
use crate::models::users::entities::User;
use crate::models::{ApiResponse, ErrorCode};

fn reject(response: HttpResponse, message: &str) -> actix_web::Error {
    InternalError::from_response(message.to_string(), response).into()
}

/// 当前调用者，由 RequireJWT 写入的用户信息得到
impl FromRequest for Caller {
    type Error = actix_web::Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        let caller = req.extensions().get::<User>().map(Caller::from);
        ready(caller.ok_or_else(|| {
            let message = "Unauthorized: missing session";
            reject(
                HttpResponse::Unauthorized()
                    .json(ApiResponse::error_empty(ErrorCode::Unauthorized, message)),
                message,
            )
        }))
    }
}

/// 路径中的正整数 `{id}`
#[derive(Debug, Clone, Copy)]
pub struct SafeIDI64(pub i64);

impl FromRequest for SafeIDI64 {
    type Error = actix_web::Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        let parsed = req
            .match_info()
            .get("id")
            .and_then(|raw| raw.parse::<i64>().ok())
            .filter(|id| *id > 0);

        ready(parsed.map(SafeIDI64).ok_or_else(|| {
            let message = "Invalid id in path";
            reject(
                HttpResponse::BadRequest()
                    .json(ApiResponse::error_empty(ErrorCode::BadRequest, message)),
                message,
            )
        }))
    }
}
