/*!
 * JWT 认证中间件
 *
 * 校验 `Authorization: Bearer <token>` 中的 access token，
 * 并将当前用户写入请求扩展，供后续中间件和处理程序使用。
 *
 * ## 使用方法
 *
 * ```rust,ignore
 * use actix_web::{web, App};
 * use crate::middlewares::RequireJWT;
 *
 * App::new().service(
 *     web::scope("/api/v1/students")
 *         .wrap(RequireJWT)
 *         .route("", web::get().to(list_students)),
 * );
 *
 * async fn list_students(req: HttpRequest) -> Result<HttpResponse> {
 *     let user = RequireJWT::extract_user_claims(&req);
 *     // ...
 * }
 * ```
 *
 * ## 认证流程
 *
 * 1. 提取并校验 access token（签名、过期时间、类型）
 * 2. 优先从对象缓存读取用户，未命中时查询存储并回填缓存
 * 3. 非 active 状态的账户视为未认证
 * 4. 失败时返回 401
 */

use crate::cache::{CacheResult, ObjectCache, user_cache_key};
use crate::config::AppConfig;
use crate::models::{ErrorCode, users::entities};
use crate::storage::Storage;
use actix_service::{Service, Transform};
use actix_web::{
    Error, HttpMessage,
    body::EitherBody,
    dev::{ServiceRequest, ServiceResponse},
    http::StatusCode,
};
use futures_util::future::{LocalBoxFuture, Ready, ready};
use std::{rc::Rc, sync::Arc};
use tracing::{debug, info};

use super::create_error_response;

const BEARER_PREFIX: &str = "Bearer ";
const AUTHORIZATION_HEADER: &str = "Authorization";

#[derive(Clone)]
pub struct RequireJWT;

// 辅助函数：提取并验证 JWT access token
async fn extract_and_validate_jwt(req: &ServiceRequest) -> Result<entities::User, String> {
    let token = req
        .headers()
        .get(AUTHORIZATION_HEADER)
        .and_then(|h| h.to_str().ok())
        .and_then(|s| s.strip_prefix(BEARER_PREFIX))
        .ok_or_else(|| "Missing or invalid Authorization header".to_string())?;

    let claims = crate::utils::jwt::JwtUtils::verify_access_token(token).map_err(|err| {
        info!("JWT token validation failed: {}", err);
        "Invalid JWT token".to_string()
    })?;

    let cache = req
        .app_data::<actix_web::web::Data<Arc<dyn ObjectCache>>>()
        .map(|data| data.get_ref().clone())
        .ok_or_else(|| "Cache not configured".to_string())?;

    // 从缓存中获取用户信息
    let cache_key = user_cache_key(token);
    match cache.get_raw(&cache_key).await {
        CacheResult::Found(json) => match serde_json::from_str::<entities::User>(&json) {
            Ok(user) => return Ok(user),
            Err(_) => {
                cache.remove(&cache_key).await;
                info!("Failed to deserialize cached user for request");
            }
        },
        _ => {
            debug!("User not found in cache, loading from storage");
        }
    };

    let storage = req
        .app_data::<actix_web::web::Data<Arc<dyn Storage>>>()
        .map(|data| data.get_ref().clone())
        .ok_or_else(|| "Storage not configured".to_string())?;

    let user_id = claims
        .sub
        .parse::<i64>()
        .map_err(|_| "Invalid user ID in JWT".to_string())?;

    let user = storage
        .get_user_by_id(user_id)
        .await
        .map_err(|_| "Failed to retrieve user from storage".to_string())?
        .ok_or_else(|| "User not found".to_string())?;

    if user.status != entities::UserStatus::Active {
        return Err("User is not active".to_string());
    }

    // 将用户信息存入缓存
    let app_config = AppConfig::get();
    if let Ok(user_json) = serde_json::to_string(&user) {
        cache
            .insert_raw(
                cache_key,
                user_json,
                app_config.cache.default_ttl,
            )
            .await;
    }

    Ok(user)
}

impl<S, B> Transform<S, ServiceRequest> for RequireJWT
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type InitError = ();
    type Transform = RequireJWTMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(RequireJWTMiddleware {
            service: Rc::new(service),
        }))
    }
}

pub struct RequireJWTMiddleware<S> {
    service: Rc<S>,
}

impl<S, B> Service<ServiceRequest> for RequireJWTMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(
        &self,
        ctx: &mut std::task::Context<'_>,
    ) -> std::task::Poll<Result<(), Self::Error>> {
        self.service.poll_ready(ctx)
    }

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let srv = self.service.clone();
        Box::pin(async move {
            // 处理 OPTIONS 请求
            if req.method() == actix_web::http::Method::OPTIONS {
                return Ok(req.into_response(
                    create_error_response(StatusCode::NO_CONTENT, ErrorCode::Success, "")
                        .map_into_right_body(),
                ));
            }

            // 验证 JWT token
            match extract_and_validate_jwt(&req).await {
                Ok(user) => {
                    debug!("JWT authentication successful for ID: {}", user.id);
                    // 可以在这里将用户信息添加到请求扩展中，供后续处理程序使用
                    req.extensions_mut().insert(user);
                    let res = srv.call(req).await?.map_into_left_body();
                    Ok(res)
                }
                Err(err) => {
                    info!(
                        "JWT authentication failed for request to {}: {}",
                        req.path(),
                        err
                    );
                    Ok(req.into_response(
                        create_error_response(
                            StatusCode::UNAUTHORIZED,
                            ErrorCode::Unauthorized,
                            &format!("Unauthorized: {err}"),
                        )
                        .map_into_right_body(),
                    ))
                }
            }
        })
    }
}

// 辅助函数：从请求中提取用户信息
impl RequireJWT {
    /// 从请求扩展中提取用户Claims信息
    /// 此函数应该在应用了RequireJWT中间件的路由处理程序中使用
    pub fn extract_user_claims(req: &actix_web::HttpRequest) -> Option<entities::User> {
        req.extensions().get::<entities::User>().cloned()
    }

    /// 从请求扩展中提取用户ID
    /// 此函数应该在应用了RequireJWT中间件的路由处理程序中使用
    pub fn extract_user_id(req: &actix_web::HttpRequest) -> Option<i64> {
        req.extensions().get::<entities::User>().map(|user| user.id)
    }

    /// 提取当前请求携带的 access token（用于登出时清理缓存）
    pub fn extract_bearer_token(req: &actix_web::HttpRequest) -> Option<String> {
        req.headers()
            .get(AUTHORIZATION_HEADER)
            .and_then(|h| h.to_str().ok())
            .and_then(|s| s.strip_prefix(BEARER_PREFIX))
            .map(|s| s.to_string())
    }
}
