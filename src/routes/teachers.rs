use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares;
use crate::models::teachers::requests::{
    CreateTeacherRequest, TeacherQueryParams, UpdateTeacherRequest,
};
use crate::models::users::entities::UserRole;
use crate::services::TeacherService;
use crate::utils::SafeIDI64;

static TEACHER_SERVICE: Lazy<TeacherService> = Lazy::new(TeacherService::new_lazy);

pub async fn list_teachers(
    req: HttpRequest,
    query: web::Query<TeacherQueryParams>,
) -> ActixResult<HttpResponse> {
    TEACHER_SERVICE.list_teachers(&req, query.into_inner()).await
}

pub async fn create_teacher(
    req: HttpRequest,
    teacher_data: web::Json<CreateTeacherRequest>,
) -> ActixResult<HttpResponse> {
    TEACHER_SERVICE
        .create_teacher(&req, teacher_data.into_inner())
        .await
}

pub async fn get_my_teacher(req: HttpRequest) -> ActixResult<HttpResponse> {
    TEACHER_SERVICE.get_my_teacher(&req).await
}

pub async fn get_teacher(req: HttpRequest, id: SafeIDI64) -> ActixResult<HttpResponse> {
    TEACHER_SERVICE.get_teacher(&req, id.0).await
}

pub async fn update_teacher(
    req: HttpRequest,
    id: SafeIDI64,
    update_data: web::Json<UpdateTeacherRequest>,
) -> ActixResult<HttpResponse> {
    TEACHER_SERVICE
        .update_teacher(&req, id.0, update_data.into_inner())
        .await
}

pub async fn delete_teacher(req: HttpRequest, id: SafeIDI64) -> ActixResult<HttpResponse> {
    TEACHER_SERVICE.delete_teacher(&req, id.0).await
}

pub fn configure_teachers_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/teachers")
            .wrap(middlewares::RequireJWT)
            .service(
                web::resource("").route(web::get().to(list_teachers)).route(
                    web::post()
                        .to(create_teacher)
                        .wrap(middlewares::RequireRole::new(&UserRole::Admin)),
                ),
            )
            .service(
                web::resource("/me").route(
                    web::get()
                        .to(get_my_teacher)
                        .wrap(middlewares::RequireRole::new(&UserRole::Teacher)),
                ),
            )
            .service(
                web::resource("/{id}")
                    .route(web::get().to(get_teacher))
                    .route(
                        web::put()
                            .to(update_teacher)
                            .wrap(middlewares::RequireRole::new(&UserRole::Admin)),
                    )
                    .route(
                        web::delete()
                            .to(delete_teacher)
                            .wrap(middlewares::RequireRole::new(&UserRole::Admin)),
                    ),
            ),
    );
}
