use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, http::StatusCode};

use super::UserService;
use crate::models::{
    ApiResponse, ErrorCode,
    users::{requests::CreateUserRequest, responses::UserResponse},
};
use crate::respond_on_err;
use crate::services::{error_response, storage_error};
use crate::utils::password::hash_password;
use crate::utils::validate::{validate_email, validate_password_simple, validate_username};

pub async fn create_user(
    service: &UserService,
    mut user_data: CreateUserRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    // 验证用户名
    if let Err(msg) = validate_username(&user_data.username) {
        return Ok(HttpResponse::BadRequest()
            .json(ApiResponse::error_empty(ErrorCode::UserNameInvalid, msg)));
    }

    // 验证邮箱
    if let Err(msg) = validate_email(&user_data.email) {
        return Ok(HttpResponse::BadRequest()
            .json(ApiResponse::error_empty(ErrorCode::UserEmailInvalid, msg)));
    }

    // 验证密码策略
    if let Err(msg) = validate_password_simple(&user_data.password) {
        return Ok(HttpResponse::BadRequest()
            .json(ApiResponse::error_empty(ErrorCode::InvalidPassword, msg)));
    }

    let storage = respond_on_err!(service.get_storage(request));

    // 提前给出明确的冲突原因，唯一约束仍是最终保障
    match storage.get_user_by_username(&user_data.username).await {
        Ok(Some(_)) => return Ok(conflict("Username already exists")),
        Ok(None) => {}
        Err(e) => return Ok(storage_error(e, ErrorCode::UserAlreadyExists, "User lookup failed")),
    }
    match storage.get_user_by_email(&user_data.email).await {
        Ok(Some(_)) => return Ok(conflict("Email already exists")),
        Ok(None) => {}
        Err(e) => return Ok(storage_error(e, ErrorCode::UserAlreadyExists, "User lookup failed")),
    }

    user_data.password = match hash_password(&user_data.password) {
        Ok(hash) => hash,
        Err(e) => {
            return Ok(
                HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                    ErrorCode::InternalServerError,
                    format!("Password hashing failed: {e}"),
                )),
            );
        }
    };

    match storage.create_user(user_data).await {
        Ok(user) => {
            tracing::info!("User {} created with role {}", user.username, user.role);
            Ok(HttpResponse::Created()
                .json(ApiResponse::success(UserResponse { user }, "User created successfully")))
        }
        Err(e) => Ok(storage_error(
            e,
            ErrorCode::UserAlreadyExists,
            "User creation failed",
        )),
    }
}

fn conflict(message: &str) -> HttpResponse {
    error_response(StatusCode::CONFLICT, ErrorCode::UserAlreadyExists, message)
}
