use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares;
use crate::models::subjects::requests::{
    CreateSubjectRequest, SubjectQueryParams, UpdateSubjectRequest,
};
use crate::models::users::entities::UserRole;
use crate::services::SubjectService;
use crate::utils::SafeIDI64;

static SUBJECT_SERVICE: Lazy<SubjectService> = Lazy::new(SubjectService::new_lazy);

pub async fn list_subjects(
    req: HttpRequest,
    query: web::Query<SubjectQueryParams>,
) -> ActixResult<HttpResponse> {
    SUBJECT_SERVICE.list_subjects(&req, query.into_inner()).await
}

pub async fn create_subject(
    req: HttpRequest,
    subject_data: web::Json<CreateSubjectRequest>,
) -> ActixResult<HttpResponse> {
    SUBJECT_SERVICE
        .create_subject(&req, subject_data.into_inner())
        .await
}

pub async fn get_subject(req: HttpRequest, id: SafeIDI64) -> ActixResult<HttpResponse> {
    SUBJECT_SERVICE.get_subject(&req, id.0).await
}

pub async fn update_subject(
    req: HttpRequest,
    id: SafeIDI64,
    update_data: web::Json<UpdateSubjectRequest>,
) -> ActixResult<HttpResponse> {
    SUBJECT_SERVICE
        .update_subject(&req, id.0, update_data.into_inner())
        .await
}

pub async fn delete_subject(req: HttpRequest, id: SafeIDI64) -> ActixResult<HttpResponse> {
    SUBJECT_SERVICE.delete_subject(&req, id.0).await
}

pub fn configure_subjects_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/subjects")
            .wrap(middlewares::RequireJWT)
            .service(
                web::resource("").route(web::get().to(list_subjects)).route(
                    web::post()
                        .to(create_subject)
                        .wrap(middlewares::RequireRole::new(&UserRole::Admin)),
                ),
            )
            .service(
                web::resource("/{id}")
                    .route(web::get().to(get_subject))
                    .route(
                        web::put()
                            .to(update_subject)
                            .wrap(middlewares::RequireRole::new(&UserRole::Admin)),
                    )
                    .route(
                        web::delete()
                            .to(delete_subject)
                            .wrap(middlewares::RequireRole::new(&UserRole::Admin)),
                    ),
            ),
    );
}
