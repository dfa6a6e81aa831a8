//! 请求体 / 查询参数解析错误处理器
//!
//! 替换 actix-web 默认的纯文本错误，统一返回 `ApiResponse` 格式。

use actix_web::{
    HttpRequest, HttpResponse,
    error::{InternalError, JsonPayloadError, QueryPayloadError},
};
use tracing::debug;

use crate::models::{ApiResponse, ErrorCode};

pub fn json_error_handler(err: JsonPayloadError, req: &HttpRequest) -> actix_web::Error {
    debug!("JSON payload error on {}: {}", req.path(), err);
    let message = match &err {
        JsonPayloadError::ContentType => "Content-Type must be application/json".to_string(),
        JsonPayloadError::OverflowKnownLength { .. } | JsonPayloadError::Overflow { .. } => {
            "Request body is too large".to_string()
        }
        JsonPayloadError::Deserialize(e) => format!("Invalid request body: {e}"),
        other => format!("Invalid JSON payload: {other}"),
    };
    let response = if matches!(
        err,
        JsonPayloadError::OverflowKnownLength { .. } | JsonPayloadError::Overflow { .. }
    ) {
        HttpResponse::PayloadTooLarge()
    } else {
        HttpResponse::BadRequest()
    }
    .json(ApiResponse::error_empty(ErrorCode::BadRequest, &message));
    InternalError::from_response(err, response).into()
}

pub fn query_error_handler(err: QueryPayloadError, req: &HttpRequest) -> actix_web::Error {
    debug!("Query string error on {}: {}", req.path(), err);
    let message = format!("Invalid query parameters: {err}");
    let response =
        HttpResponse::BadRequest().json(ApiResponse::error_empty(ErrorCode::BadRequest, message));
    InternalError::from_response(err, response).into()
}
