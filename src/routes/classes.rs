use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares;
use crate::models::classes::requests::{ClassQueryParams, CreateClassRequest, UpdateClassRequest};
use crate::models::streams::requests::{CreateStreamRequest, UpdateStreamRequest};
use crate::models::users::entities::UserRole;
use crate::services::ClassService;
use crate::utils::{SafeClassIdI64, SafeStreamIdI64};

// 懒加载的全局 CLASS_SERVICE 实例
static CLASS_SERVICE: Lazy<ClassService> = Lazy::new(ClassService::new_lazy);

// HTTP处理程序
pub async fn list_classes(
    req: HttpRequest,
    query: web::Query<ClassQueryParams>,
) -> ActixResult<HttpResponse> {
    CLASS_SERVICE.list_classes(&req, query.into_inner()).await
}

pub async fn create_class(
    req: HttpRequest,
    class_data: web::Json<CreateClassRequest>,
) -> ActixResult<HttpResponse> {
    CLASS_SERVICE
        .create_class(&req, class_data.into_inner())
        .await
}

pub async fn get_class(req: HttpRequest, class_id: SafeClassIdI64) -> ActixResult<HttpResponse> {
    CLASS_SERVICE.get_class(&req, class_id.0).await
}

pub async fn update_class(
    req: HttpRequest,
    class_id: SafeClassIdI64,
    update_data: web::Json<UpdateClassRequest>,
) -> ActixResult<HttpResponse> {
    CLASS_SERVICE
        .update_class(&req, class_id.0, update_data.into_inner())
        .await
}

pub async fn delete_class(req: HttpRequest, class_id: SafeClassIdI64) -> ActixResult<HttpResponse> {
    CLASS_SERVICE.delete_class(&req, class_id.0).await
}

pub async fn list_streams(req: HttpRequest, class_id: SafeClassIdI64) -> ActixResult<HttpResponse> {
    CLASS_SERVICE.list_streams(&req, class_id.0).await
}

pub async fn create_stream(
    req: HttpRequest,
    class_id: SafeClassIdI64,
    stream_data: web::Json<CreateStreamRequest>,
) -> ActixResult<HttpResponse> {
    CLASS_SERVICE
        .create_stream(&req, class_id.0, stream_data.into_inner())
        .await
}

pub async fn update_stream(
    req: HttpRequest,
    class_id: SafeClassIdI64,
    stream_id: SafeStreamIdI64,
    stream_data: web::Json<UpdateStreamRequest>,
) -> ActixResult<HttpResponse> {
    CLASS_SERVICE
        .update_stream(&req, class_id.0, stream_id.0, stream_data.into_inner())
        .await
}

pub async fn delete_stream(
    req: HttpRequest,
    class_id: SafeClassIdI64,
    stream_id: SafeStreamIdI64,
) -> ActixResult<HttpResponse> {
    CLASS_SERVICE
        .delete_stream(&req, class_id.0, stream_id.0)
        .await
}

// 配置路由
pub fn configure_classes_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/classes")
            .wrap(middlewares::RequireJWT)
            .service(
                // 教师与学生只能查到本校班级
                web::resource("").route(web::get().to(list_classes)).route(
                    web::post()
                        .to(create_class)
                        .wrap(middlewares::RequireRole::new(&UserRole::Admin)),
                ),
            )
            .service(
                web::scope("/{class_id}")
                    // 班级存在性与访问权限在这里统一校验
                    .wrap(middlewares::RequireClassAccess)
                    .service(
                        web::resource("")
                            .route(web::get().to(get_class))
                            .route(
                                web::put()
                                    .to(update_class)
                                    .wrap(middlewares::RequireRole::new(&UserRole::Admin)),
                            )
                            .route(
                                web::delete()
                                    .to(delete_class)
                                    .wrap(middlewares::RequireRole::new(&UserRole::Admin)),
                            ),
                    )
                    .service(
                        web::resource("/streams")
                            .route(web::get().to(list_streams))
                            .route(
                                web::post()
                                    .to(create_stream)
                                    .wrap(middlewares::RequireRole::new(&UserRole::Admin)),
                            ),
                    )
                    .service(
                        web::resource("/streams/{stream_id}")
                            .route(
                                web::put()
                                    .to(update_stream)
                                    .wrap(middlewares::RequireRole::new(&UserRole::Admin)),
                            )
                            .route(
                                web::delete()
                                    .to(delete_stream)
                                    .wrap(middlewares::RequireRole::new(&UserRole::Admin)),
                            ),
                    ),
            ),
    );
}
