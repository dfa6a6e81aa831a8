use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares;
use crate::models::class_tests::requests::{
    CreateTestRequest, TestQueryParams, UpdateTestRequest, UpsertTestResultsRequest,
};
use crate::models::users::entities::UserRole;
use crate::services::ClassTestService;
use crate::utils::{SafeIDI64, SafeResultIdI64};

static CLASS_TEST_SERVICE: Lazy<ClassTestService> = Lazy::new(ClassTestService::new_lazy);

pub async fn list_tests(
    req: HttpRequest,
    query: web::Query<TestQueryParams>,
) -> ActixResult<HttpResponse> {
    CLASS_TEST_SERVICE.list_tests(&req, query.into_inner()).await
}

pub async fn create_test(
    req: HttpRequest,
    test_data: web::Json<CreateTestRequest>,
) -> ActixResult<HttpResponse> {
    CLASS_TEST_SERVICE
        .create_test(&req, test_data.into_inner())
        .await
}

pub async fn get_test(req: HttpRequest, id: SafeIDI64) -> ActixResult<HttpResponse> {
    CLASS_TEST_SERVICE.get_test(&req, id.0).await
}

pub async fn update_test(
    req: HttpRequest,
    id: SafeIDI64,
    update_data: web::Json<UpdateTestRequest>,
) -> ActixResult<HttpResponse> {
    CLASS_TEST_SERVICE
        .update_test(&req, id.0, update_data.into_inner())
        .await
}

pub async fn delete_test(req: HttpRequest, id: SafeIDI64) -> ActixResult<HttpResponse> {
    CLASS_TEST_SERVICE.delete_test(&req, id.0).await
}

pub async fn list_test_results(req: HttpRequest, id: SafeIDI64) -> ActixResult<HttpResponse> {
    CLASS_TEST_SERVICE.list_results(&req, id.0).await
}

pub async fn upsert_test_results(
    req: HttpRequest,
    id: SafeIDI64,
    data: web::Json<UpsertTestResultsRequest>,
) -> ActixResult<HttpResponse> {
    CLASS_TEST_SERVICE
        .upsert_results(&req, id.0, data.into_inner())
        .await
}

pub async fn delete_test_result(
    req: HttpRequest,
    id: SafeIDI64,
    result_id: SafeResultIdI64,
) -> ActixResult<HttpResponse> {
    CLASS_TEST_SERVICE
        .delete_result(&req, id.0, result_id.0)
        .await
}

pub fn configure_tests_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/tests")
            .wrap(middlewares::RequireJWT)
            .service(
                web::resource("").route(web::get().to(list_tests)).route(
                    web::post()
                        .to(create_test)
                        .wrap(middlewares::RequireRole::new_any(UserRole::teacher_roles())),
                ),
            )
            .service(
                // 教师只能修改自己创建的测验
                web::resource("/{id}")
                    .route(web::get().to(get_test))
                    .route(
                        web::put()
                            .to(update_test)
                            .wrap(middlewares::RequireRole::new_any(UserRole::teacher_roles())),
                    )
                    .route(
                        web::delete()
                            .to(delete_test)
                            .wrap(middlewares::RequireRole::new_any(UserRole::teacher_roles())),
                    ),
            )
            .service(
                web::resource("/{id}/results")
                    .route(web::get().to(list_test_results))
                    .route(
                        web::put()
                            .to(upsert_test_results)
                            .wrap(middlewares::RequireRole::new_any(UserRole::teacher_roles())),
                    ),
            )
            .service(
                web::resource("/{id}/results/{result_id}").route(
                    web::delete()
                        .to(delete_test_result)
                        .wrap(middlewares::RequireRole::new_any(UserRole::teacher_roles())),
                ),
            ),
    );
}
