//! 路径参数提取器
//!
//! 将 `{id}`、`{class_id}` 等路径参数解析为正整数 ID，
//! 解析失败时直接返回统一格式的 400 响应。

use actix_web::{HttpResponse, error::InternalError};

use crate::models::{ApiResponse, ErrorCode};

/// 构造路径参数错误
pub fn path_param_error(param: &str, raw: Option<&str>) -> actix_web::Error {
    let message = match raw {
        Some(value) => format!("Invalid path parameter '{param}': '{value}'"),
        None => format!("Missing path parameter '{param}'"),
    };
    let response = HttpResponse::BadRequest()
        .json(ApiResponse::error_empty(ErrorCode::BadRequest, &message));
    InternalError::from_response(message, response).into()
}

/// 解析正整数 ID
pub fn parse_positive_id(raw: &str) -> Option<i64> {
    raw.parse::<i64>().ok().filter(|id| *id > 0)
}

/// 定义一个从路径参数中安全提取 i64 ID 的提取器
#[macro_export]
macro_rules! define_safe_i64_extractor {
    ($name:ident, $param:literal) => {
        #[derive(Debug, Clone, Copy)]
        pub struct $name(pub i64);

        impl actix_web::FromRequest for $name {
            type Error = actix_web::Error;
            type Future = std::future::Ready<Result<Self, Self::Error>>;

            fn from_request(
                req: &actix_web::HttpRequest,
                _payload: &mut actix_web::dev::Payload,
            ) -> Self::Future {
                let raw = req.match_info().get($param);
                let result = match raw.and_then($crate::utils::extractor::parse_positive_id) {
                    Some(id) => Ok($name(id)),
                    None => Err($crate::utils::extractor::path_param_error($param, raw)),
                };
                std::future::ready(result)
            }
        }
    };
}

define_safe_i64_extractor!(SafeIDI64, "id");
define_safe_i64_extractor!(SafeClassIdI64, "class_id");
define_safe_i64_extractor!(SafeStreamIdI64, "stream_id");
define_safe_i64_extractor!(SafeResultIdI64, "result_id");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_positive_id() {
        assert_eq!(parse_positive_id("42"), Some(42));
        assert_eq!(parse_positive_id("0"), None);
        assert_eq!(parse_positive_id("-3"), None);
        assert_eq!(parse_positive_id("abc"), None);
    }

    #[actix_web::test]
    async fn test_extractor_reads_named_param() {
        use actix_web::FromRequest;

        let req = actix_web::test::TestRequest::default()
            .param("class_id", "7")
            .to_http_request();
        let mut payload = actix_web::dev::Payload::None;
        let id = SafeClassIdI64::from_request(&req, &mut payload).await.unwrap();
        assert_eq!(id.0, 7);

        let req = actix_web::test::TestRequest::default()
            .param("class_id", "seven")
            .to_http_request();
        assert!(SafeClassIdI64::from_request(&req, &mut payload).await.is_err());
    }
}
