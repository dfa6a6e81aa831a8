use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares;
use crate::models::terms::requests::{CreateTermRequest, TermQuery, UpdateTermRequest};
use crate::models::users::entities::UserRole;
use crate::services::TermService;
use crate::utils::SafeIDI64;

static TERM_SERVICE: Lazy<TermService> = Lazy::new(TermService::new_lazy);

pub async fn list_terms(
    req: HttpRequest,
    query: web::Query<TermQuery>,
) -> ActixResult<HttpResponse> {
    TERM_SERVICE.list_terms(&req, query.into_inner()).await
}

pub async fn create_term(
    req: HttpRequest,
    term_data: web::Json<CreateTermRequest>,
) -> ActixResult<HttpResponse> {
    TERM_SERVICE.create_term(&req, term_data.into_inner()).await
}

pub async fn get_term(req: HttpRequest, id: SafeIDI64) -> ActixResult<HttpResponse> {
    TERM_SERVICE.get_term(&req, id.0).await
}

pub async fn update_term(
    req: HttpRequest,
    id: SafeIDI64,
    update_data: web::Json<UpdateTermRequest>,
) -> ActixResult<HttpResponse> {
    TERM_SERVICE
        .update_term(&req, id.0, update_data.into_inner())
        .await
}

pub async fn delete_term(req: HttpRequest, id: SafeIDI64) -> ActixResult<HttpResponse> {
    TERM_SERVICE.delete_term(&req, id.0).await
}

pub fn configure_terms_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/terms")
            .wrap(middlewares::RequireJWT)
            .service(
                web::resource("").route(web::get().to(list_terms)).route(
                    web::post()
                        .to(create_term)
                        .wrap(middlewares::RequireRole::new(&UserRole::Admin)),
                ),
            )
            .service(
                web::resource("/{id}")
                    .route(web::get().to(get_term))
                    .route(
                        web::put()
                            .to(update_term)
                            .wrap(middlewares::RequireRole::new(&UserRole::Admin)),
                    )
                    .route(
                        web::delete()
                            .to(delete_term)
                            .wrap(middlewares::RequireRole::new(&UserRole::Admin)),
                    ),
            ),
    );
}
