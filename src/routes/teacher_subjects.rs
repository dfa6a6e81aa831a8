use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares;
use crate::models::teacher_subjects::requests::{
    BulkAssignRequest, CreateTeacherSubjectRequest, TeacherSubjectQuery,
};
use crate::models::users::entities::UserRole;
use crate::services::TeacherSubjectService;
use crate::utils::SafeIDI64;

static TEACHER_SUBJECT_SERVICE: Lazy<TeacherSubjectService> =
    Lazy::new(TeacherSubjectService::new_lazy);

pub async fn list_teacher_subjects(
    req: HttpRequest,
    query: web::Query<TeacherSubjectQuery>,
) -> ActixResult<HttpResponse> {
    TEACHER_SUBJECT_SERVICE
        .list_teacher_subjects(&req, query.into_inner())
        .await
}

pub async fn create_teacher_subject(
    req: HttpRequest,
    data: web::Json<CreateTeacherSubjectRequest>,
) -> ActixResult<HttpResponse> {
    TEACHER_SUBJECT_SERVICE
        .create_teacher_subject(&req, data.into_inner())
        .await
}

pub async fn bulk_assign(
    req: HttpRequest,
    data: web::Json<BulkAssignRequest>,
) -> ActixResult<HttpResponse> {
    TEACHER_SUBJECT_SERVICE
        .bulk_assign(&req, data.into_inner())
        .await
}

pub async fn delete_teacher_subject(req: HttpRequest, id: SafeIDI64) -> ActixResult<HttpResponse> {
    TEACHER_SUBJECT_SERVICE
        .delete_teacher_subject(&req, id.0)
        .await
}

pub fn configure_teacher_subjects_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/teacher-subjects")
            .wrap(middlewares::RequireJWT)
            .service(
                web::resource("")
                    .route(
                        web::get()
                            .to(list_teacher_subjects)
                            .wrap(middlewares::RequireRole::new_any(UserRole::teacher_roles())),
                    )
                    .route(
                        web::post()
                            .to(create_teacher_subject)
                            .wrap(middlewares::RequireRole::new(&UserRole::Admin)),
                    ),
            )
            .service(
                web::resource("/bulk").route(
                    web::post()
                        .to(bulk_assign)
                        .wrap(middlewares::RequireRole::new(&UserRole::Admin)),
                ),
            )
            .service(
                web::resource("/{id}").route(
                    web::delete()
                        .to(delete_teacher_subject)
                        .wrap(middlewares::RequireRole::new(&UserRole::Admin)),
                ),
            ),
    );
}
