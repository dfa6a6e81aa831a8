use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares;
use crate::models::results::requests::{
    BulkResultsRequest, ImportResultsQuery, ResultQuery, UpsertResultRequest,
};
use crate::models::users::entities::UserRole;
use crate::services::ResultService;
use crate::utils::SafeIDI64;

static RESULT_SERVICE: Lazy<ResultService> = Lazy::new(ResultService::new_lazy);

pub async fn list_results(
    req: HttpRequest,
    query: web::Query<ResultQuery>,
) -> ActixResult<HttpResponse> {
    RESULT_SERVICE.list_results(&req, query.into_inner()).await
}

pub async fn upsert_result(
    req: HttpRequest,
    data: web::Json<UpsertResultRequest>,
) -> ActixResult<HttpResponse> {
    RESULT_SERVICE.upsert_result(&req, data.into_inner()).await
}

pub async fn bulk_upsert(
    req: HttpRequest,
    data: web::Json<BulkResultsRequest>,
) -> ActixResult<HttpResponse> {
    RESULT_SERVICE.bulk_upsert(&req, data.into_inner()).await
}

pub async fn import_results(
    req: HttpRequest,
    query: web::Query<ImportResultsQuery>,
    payload: actix_multipart::Multipart,
) -> ActixResult<HttpResponse> {
    RESULT_SERVICE
        .import_results(&req, query.into_inner(), payload)
        .await
}

pub async fn delete_result(req: HttpRequest, id: SafeIDI64) -> ActixResult<HttpResponse> {
    RESULT_SERVICE.delete_result(&req, id.0).await
}

pub fn configure_results_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/results")
            .wrap(middlewares::RequireJWT)
            .service(
                web::resource("")
                    .route(web::get().to(list_results))
                    // 教师的任课范围在服务层校验
                    .route(
                        web::put()
                            .to(upsert_result)
                            .wrap(middlewares::RequireRole::new_any(UserRole::teacher_roles())),
                    ),
            )
            .service(
                web::resource("/bulk").route(
                    web::post()
                        .to(bulk_upsert)
                        .wrap(middlewares::RequireRole::new_any(UserRole::teacher_roles())),
                ),
            )
            .service(
                web::resource("/import")
                    .wrap(middlewares::RateLimit::results_import())
                    .route(
                        web::post()
                            .to(import_results)
                            .wrap(middlewares::RequireRole::new_any(UserRole::teacher_roles())),
                    ),
            )
            .service(
                web::resource("/{id}").route(
                    web::delete()
                        .to(delete_result)
                        .wrap(middlewares::RequireRole::new_any(UserRole::teacher_roles())),
                ),
            ),
    );
}
