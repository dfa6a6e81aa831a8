use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares;
use crate::models::timetable::requests::{
    CreateTimetableEntryRequest, TeacherSuggestionQuery, TimetableQuery,
    UpdateTimetableEntryRequest,
};
use crate::models::users::entities::UserRole;
use crate::services::TimetableService;
use crate::utils::SafeIDI64;

static TIMETABLE_SERVICE: Lazy<TimetableService> = Lazy::new(TimetableService::new_lazy);

pub async fn list_entries(
    req: HttpRequest,
    query: web::Query<TimetableQuery>,
) -> ActixResult<HttpResponse> {
    TIMETABLE_SERVICE.list_entries(&req, query.into_inner()).await
}

pub async fn create_entry(
    req: HttpRequest,
    data: web::Json<CreateTimetableEntryRequest>,
) -> ActixResult<HttpResponse> {
    TIMETABLE_SERVICE.create_entry(&req, data.into_inner()).await
}

pub async fn update_entry(
    req: HttpRequest,
    id: SafeIDI64,
    data: web::Json<UpdateTimetableEntryRequest>,
) -> ActixResult<HttpResponse> {
    TIMETABLE_SERVICE
        .update_entry(&req, id.0, data.into_inner())
        .await
}

pub async fn delete_entry(req: HttpRequest, id: SafeIDI64) -> ActixResult<HttpResponse> {
    TIMETABLE_SERVICE.delete_entry(&req, id.0).await
}

pub async fn suggest_teachers(
    req: HttpRequest,
    query: web::Query<TeacherSuggestionQuery>,
) -> ActixResult<HttpResponse> {
    TIMETABLE_SERVICE
        .suggest_teachers(&req, query.into_inner())
        .await
}

pub fn configure_timetable_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/timetable")
            .wrap(middlewares::RequireJWT)
            .service(
                web::resource("").route(web::get().to(list_entries)).route(
                    web::post()
                        .to(create_entry)
                        .wrap(middlewares::RequireRole::new(&UserRole::Admin)),
                ),
            )
            .service(
                web::resource("/suggestions").route(
                    web::get()
                        .to(suggest_teachers)
                        .wrap(middlewares::RequireRole::new(&UserRole::Admin)),
                ),
            )
            .service(
                web::resource("/{id}")
                    .route(
                        web::put()
                            .to(update_entry)
                            .wrap(middlewares::RequireRole::new(&UserRole::Admin)),
                    )
                    .route(
                        web::delete()
                            .to(delete_entry)
                            .wrap(middlewares::RequireRole::new(&UserRole::Admin)),
                    ),
            ),
    );
}
