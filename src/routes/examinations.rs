use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares;
use crate::models::examinations::requests::{
    CreateExaminationRequest, ExaminationQueryParams, UpdateExaminationRequest,
};
use crate::models::users::entities::UserRole;
use crate::services::ExaminationService;
use crate::utils::SafeIDI64;

static EXAMINATION_SERVICE: Lazy<ExaminationService> = Lazy::new(ExaminationService::new_lazy);

pub async fn list_examinations(
    req: HttpRequest,
    query: web::Query<ExaminationQueryParams>,
) -> ActixResult<HttpResponse> {
    EXAMINATION_SERVICE
        .list_examinations(&req, query.into_inner())
        .await
}

pub async fn create_examination(
    req: HttpRequest,
    exam_data: web::Json<CreateExaminationRequest>,
) -> ActixResult<HttpResponse> {
    EXAMINATION_SERVICE
        .create_examination(&req, exam_data.into_inner())
        .await
}

pub async fn get_examination(req: HttpRequest, id: SafeIDI64) -> ActixResult<HttpResponse> {
    EXAMINATION_SERVICE.get_examination(&req, id.0).await
}

pub async fn update_examination(
    req: HttpRequest,
    id: SafeIDI64,
    update_data: web::Json<UpdateExaminationRequest>,
) -> ActixResult<HttpResponse> {
    EXAMINATION_SERVICE
        .update_examination(&req, id.0, update_data.into_inner())
        .await
}

pub async fn delete_examination(req: HttpRequest, id: SafeIDI64) -> ActixResult<HttpResponse> {
    EXAMINATION_SERVICE.delete_examination(&req, id.0).await
}

pub fn configure_examinations_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/examinations")
            .wrap(middlewares::RequireJWT)
            .service(
                // 学生只能看到已发布的考试
                web::resource("")
                    .route(web::get().to(list_examinations))
                    .route(
                        web::post()
                            .to(create_examination)
                            .wrap(middlewares::RequireRole::new(&UserRole::Admin)),
                    ),
            )
            .service(
                web::resource("/{id}")
                    .route(web::get().to(get_examination))
                    .route(
                        web::put()
                            .to(update_examination)
                            .wrap(middlewares::RequireRole::new(&UserRole::Admin)),
                    )
                    .route(
                        web::delete()
                            .to(delete_examination)
                            .wrap(middlewares::RequireRole::new(&UserRole::Admin)),
                    ),
            ),
    );
}
