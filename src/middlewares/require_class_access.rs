/*!
 * 班级访问控制中间件
 *
 * 必须在 RequireJWT 之后使用，作用于包含 `{class_id}` 路径参数的路由。
 *
 * - 管理员：直接放行
 * - 教师：班级必须属于教师所在学校
 * - 学生：必须是该班级的学生
 *
 * 校验通过后将班级写入请求扩展，处理程序可通过
 * `RequireClassAccess::extract_class` 获取。
 *
 * ```rust,ignore
 * web::scope("/api/v1/classes/{class_id}")
 *     .wrap(RequireClassAccess)
 *     .route("/streams", web::get().to(list_streams))
 * ```
 */

use actix_service::{Service, Transform};
use actix_web::{
    Error, HttpMessage,
    body::EitherBody,
    dev::{ServiceRequest, ServiceResponse},
    http::StatusCode,
};
use futures_util::future::{LocalBoxFuture, Ready, ready};
use std::{rc::Rc, sync::Arc};
use tracing::{debug, error};

use crate::{
    models::{
        ErrorCode,
        classes::entities::Class,
        users::entities::{User, UserRole},
    },
    storage::Storage,
};

use super::create_error_response;

#[derive(Clone)]
pub struct RequireClassAccess;

impl<S, B> Transform<S, ServiceRequest> for RequireClassAccess
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type InitError = ();
    type Transform = RequireClassAccessMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(RequireClassAccessMiddleware {
            service: Rc::new(service),
        }))
    }
}

pub struct RequireClassAccessMiddleware<S> {
    service: Rc<S>,
}

// 访问判定结果
enum Decision {
    Allow(Class),
    Deny(StatusCode, ErrorCode, &'static str),
}

impl<S, B> Service<ServiceRequest> for RequireClassAccessMiddleware<S>
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
            match decide(&req).await {
                Decision::Allow(class) => {
                    debug!("Class access granted for class {}", class.id);
                    req.extensions_mut().insert(class);
                    Ok(srv.call(req).await?.map_into_left_body())
                }
                Decision::Deny(status, code, message) => Ok(req.into_response(
                    create_error_response(status, code, message).map_into_right_body(),
                )),
            }
        })
    }
}

async fn decide(req: &ServiceRequest) -> Decision {
    // 1. 校验用户信息
    let Some(user) = req.extensions().get::<User>().cloned() else {
        return Decision::Deny(
            StatusCode::UNAUTHORIZED,
            ErrorCode::Unauthorized,
            "Unauthorized: missing user claims",
        );
    };

    // 2. 校验 class_id
    let Some(class_id) = req
        .match_info()
        .get("class_id")
        .and_then(crate::utils::extractor::parse_positive_id)
    else {
        return Decision::Deny(
            StatusCode::BAD_REQUEST,
            ErrorCode::BadRequest,
            "Missing or invalid class_id",
        );
    };

    let Some(storage) = req
        .app_data::<actix_web::web::Data<Arc<dyn Storage>>>()
        .map(|data| data.get_ref().clone())
    else {
        error!("Storage not found in app data");
        return Decision::Deny(
            StatusCode::INTERNAL_SERVER_ERROR,
            ErrorCode::InternalServerError,
            "Storage not configured",
        );
    };

    // 3. 班级必须存在
    let class = match storage.get_class_by_id(class_id).await {
        Ok(Some(class)) => class,
        Ok(None) => {
            return Decision::Deny(
                StatusCode::NOT_FOUND,
                ErrorCode::ClassNotFound,
                "Class not found",
            );
        }
        Err(e) => {
            error!("Failed to load class {}: {}", class_id, e);
            return Decision::Deny(
                StatusCode::INTERNAL_SERVER_ERROR,
                ErrorCode::InternalServerError,
                "Failed to load class",
            );
        }
    };

    // 4. 按角色判定
    let allowed = match user.role {
        UserRole::Admin => true,
        UserRole::Teacher => user.school_id == Some(class.school_id),
        UserRole::Student => match storage.get_student_by_user_id(user.id).await {
            Ok(Some(student)) => student.class_id == class.id,
            Ok(None) => false,
            Err(e) => {
                error!("Failed to load student for user {}: {}", user.id, e);
                false
            }
        },
    };

    if allowed {
        Decision::Allow(class)
    } else {
        Decision::Deny(
            StatusCode::FORBIDDEN,
            ErrorCode::ClassPermissionDenied,
            "No permission for this class",
        )
    }
}

impl RequireClassAccess {
    /// 从请求扩展中提取已校验的班级
    /// 此函数应该在应用了RequireClassAccess中间件的路由处理程序中使用
    pub fn extract_class(req: &actix_web::HttpRequest) -> Option<Class> {
        req.extensions().get::<Class>().cloned()
    }
}
