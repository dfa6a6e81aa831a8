use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use crate::models::auth::responses::{RefreshTokenResponse, UserInfoResponse};
use crate::models::users::entities::UserStatus;
use crate::models::{ApiResponse, ErrorCode};
use crate::respond_on_err;
use crate::services::current_user;
use crate::utils::jwt;

use super::AuthService;

fn expired_login() -> HttpResponse {
    // 清除无效的 refresh token cookie
    let empty_cookie = jwt::JwtUtils::create_empty_refresh_token_cookie();

    HttpResponse::Unauthorized()
        .cookie(empty_cookie)
        .json(ApiResponse::error_empty(
            ErrorCode::Unauthorized,
            "Login expired or invalid, please login again",
        ))
}

pub async fn handle_refresh_token(
    service: &AuthService,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let config = service.get_config();

    let Some(refresh_token) = jwt::JwtUtils::extract_refresh_token_from_cookie(request) else {
        return Ok(HttpResponse::Unauthorized().json(ApiResponse::error_empty(
            ErrorCode::Unauthorized,
            "Unauthorized access, please login",
        )));
    };

    let claims = match jwt::JwtUtils::verify_refresh_token(&refresh_token) {
        Ok(claims) => claims,
        Err(e) => {
            tracing::error!("Refresh token failed: {}", e);
            return Ok(expired_login());
        }
    };

    let Ok(user_id) = claims.sub.parse::<i64>() else {
        return Ok(expired_login());
    };

    // 账户被删除或停用后不再签发新令牌
    let storage = respond_on_err!(service.get_storage(request));
    let user = match storage.get_user_by_id(user_id).await {
        Ok(Some(user)) if user.status == UserStatus::Active => user,
        Ok(_) => return Ok(expired_login()),
        Err(e) => {
            return Ok(
                HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                    ErrorCode::InternalServerError,
                    format!("Refresh token failed: {e}"),
                )),
            );
        }
    };

    match jwt::JwtUtils::generate_access_token(user.id, &user.role.to_string()) {
        Ok(access_token) => {
            let response = RefreshTokenResponse {
                access_token,
                expires_in: config.jwt.access_token_expiry * 60,
            };
            Ok(HttpResponse::Ok().json(ApiResponse::success(
                response,
                "Token refreshed successfully",
            )))
        }
        Err(e) => {
            tracing::error!("Failed to generate access token: {}", e);
            Ok(
                HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                    ErrorCode::InternalServerError,
                    "Refresh failed, unable to generate token",
                )),
            )
        }
    }
}

pub async fn handle_get_user(
    _service: &AuthService,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let user = respond_on_err!(current_user(request));
    Ok(HttpResponse::Ok().json(ApiResponse::success(
        UserInfoResponse { user },
        "User information retrieved successfully",
    )))
}
