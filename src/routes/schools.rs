use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares;
use crate::models::schools::requests::{
    CreateSchoolRequest, SchoolQueryParams, UpdateSchoolRequest,
};
use crate::models::users::entities::UserRole;
use crate::services::SchoolService;
use crate::utils::SafeIDI64;

static SCHOOL_SERVICE: Lazy<SchoolService> = Lazy::new(SchoolService::new_lazy);

pub async fn list_schools(
    req: HttpRequest,
    query: web::Query<SchoolQueryParams>,
) -> ActixResult<HttpResponse> {
    SCHOOL_SERVICE.list_schools(query.into_inner(), &req).await
}

pub async fn create_school(
    req: HttpRequest,
    school_data: web::Json<CreateSchoolRequest>,
) -> ActixResult<HttpResponse> {
    SCHOOL_SERVICE
        .create_school(school_data.into_inner(), &req)
        .await
}

pub async fn get_school(req: HttpRequest, school_id: SafeIDI64) -> ActixResult<HttpResponse> {
    SCHOOL_SERVICE.get_school(school_id.0, &req).await
}

pub async fn update_school(
    req: HttpRequest,
    school_id: SafeIDI64,
    update_data: web::Json<UpdateSchoolRequest>,
) -> ActixResult<HttpResponse> {
    SCHOOL_SERVICE
        .update_school(school_id.0, update_data.into_inner(), &req)
        .await
}

pub async fn delete_school(req: HttpRequest, school_id: SafeIDI64) -> ActixResult<HttpResponse> {
    SCHOOL_SERVICE.delete_school(school_id.0, &req).await
}

pub fn configure_schools_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/schools")
            .wrap(middlewares::RequireJWT)
            .service(
                // 非管理员只能看到自己的学校
                web::resource("").route(web::get().to(list_schools)).route(
                    web::post()
                        .to(create_school)
                        .wrap(middlewares::RequireRole::new(&UserRole::Admin)),
                ),
            )
            .service(
                web::resource("/{id}")
                    .route(web::get().to(get_school))
                    .route(
                        web::put()
                            .to(update_school)
                            .wrap(middlewares::RequireRole::new(&UserRole::Admin)),
                    )
                    .route(
                        web::delete()
                            .to(delete_school)
                            .wrap(middlewares::RequireRole::new(&UserRole::Admin)),
                    ),
            ),
    );
}
