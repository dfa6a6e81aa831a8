use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use crate::models::{
    ApiResponse, ErrorCode,
    auth::{LoginRequest, LoginResponse},
    users::entities::UserStatus,
};
use crate::respond_on_err;
use crate::utils::jwt;
use crate::utils::password::verify_password;

use super::AuthService;

pub async fn handle_login(
    service: &AuthService,
    login_request: LoginRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = respond_on_err!(service.get_storage(request));
    let config = service.get_config();

    // 1. 根据用户名或邮箱获取用户信息
    let user = match storage
        .get_user_by_username_or_email(login_request.username.trim())
        .await
    {
        Ok(Some(user)) => user,
        Ok(None) => {
            return Ok(HttpResponse::Unauthorized().json(ApiResponse::error_empty(
                ErrorCode::AuthFailed,
                "Username or password is incorrect",
            )));
        }
        Err(e) => {
            return Ok(
                HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                    ErrorCode::InternalServerError,
                    format!("Login failed: {e}"),
                )),
            );
        }
    };

    // 2. 验证密码
    if !verify_password(&login_request.password, &user.password_hash) {
        tracing::warn!("Failed login attempt for {}", user.username);
        return Ok(HttpResponse::Unauthorized().json(ApiResponse::error_empty(
            ErrorCode::AuthFailed,
            "Username or password is incorrect",
        )));
    }

    // 3. 非活跃账户禁止登录
    if user.status != UserStatus::Active {
        return Ok(HttpResponse::Forbidden().json(ApiResponse::error_empty(
            ErrorCode::UserInactive,
            format!("Account is {}", user.status),
        )));
    }

    // 4. 更新最后登录时间
    if let Err(e) = storage.update_last_login(user.id).await {
        tracing::warn!("Failed to update last login for {}: {}", user.username, e);
    }

    // 5. 生成令牌对
    let refresh_expiry = login_request
        .remember_me
        .then(|| chrono::Duration::days(config.jwt.refresh_token_remember_me_expiry));

    match user.generate_token_pair(refresh_expiry) {
        Ok(token_pair) => {
            tracing::info!("User {} logged in successfully", user.username);

            let response = LoginResponse {
                access_token: token_pair.access_token,
                expires_in: config.jwt.access_token_expiry * 60, // 转换为秒
                user,
                created_at: chrono::Utc::now(),
            };

            let refresh_cookie =
                jwt::JwtUtils::create_refresh_token_cookie(&token_pair.refresh_token);

            Ok(HttpResponse::Ok()
                .cookie(refresh_cookie)
                .json(ApiResponse::success(response, "Login successful")))
        }
        Err(e) => {
            tracing::error!("Failed to generate JWT token: {}", e);
            Ok(
                HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                    ErrorCode::InternalServerError,
                    "Login failed, unable to generate token",
                )),
            )
        }
    }
}
