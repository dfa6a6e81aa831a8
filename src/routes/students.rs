use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares;
use crate::models::students::requests::{
    CreateStudentRequest, StudentQueryParams, UpdateStudentRequest,
};
use crate::models::users::entities::UserRole;
use crate::services::StudentService;
use crate::utils::SafeIDI64;

static STUDENT_SERVICE: Lazy<StudentService> = Lazy::new(StudentService::new_lazy);

pub async fn list_students(
    req: HttpRequest,
    query: web::Query<StudentQueryParams>,
) -> ActixResult<HttpResponse> {
    STUDENT_SERVICE.list_students(&req, query.into_inner()).await
}

pub async fn create_student(
    req: HttpRequest,
    student_data: web::Json<CreateStudentRequest>,
) -> ActixResult<HttpResponse> {
    STUDENT_SERVICE
        .create_student(&req, student_data.into_inner())
        .await
}

pub async fn get_my_student(req: HttpRequest) -> ActixResult<HttpResponse> {
    STUDENT_SERVICE.get_my_student(&req).await
}

pub async fn get_student(req: HttpRequest, id: SafeIDI64) -> ActixResult<HttpResponse> {
    STUDENT_SERVICE.get_student(&req, id.0).await
}

pub async fn update_student(
    req: HttpRequest,
    id: SafeIDI64,
    update_data: web::Json<UpdateStudentRequest>,
) -> ActixResult<HttpResponse> {
    STUDENT_SERVICE
        .update_student(&req, id.0, update_data.into_inner())
        .await
}

pub async fn delete_student(req: HttpRequest, id: SafeIDI64) -> ActixResult<HttpResponse> {
    STUDENT_SERVICE.delete_student(&req, id.0).await
}

pub fn configure_students_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/students")
            .wrap(middlewares::RequireJWT)
            .service(
                web::resource("")
                    .route(
                        web::get()
                            .to(list_students)
                            .wrap(middlewares::RequireRole::new_any(UserRole::teacher_roles())),
                    )
                    .route(
                        web::post()
                            .to(create_student)
                            .wrap(middlewares::RequireRole::new(&UserRole::Admin)),
                    ),
            )
            // 必须注册在 /{id} 之前
            .service(
                web::resource("/me").route(
                    web::get()
                        .to(get_my_student)
                        .wrap(middlewares::RequireRole::new_any(UserRole::student_roles())),
                ),
            )
            .service(
                web::resource("/{id}")
                    // 学生只能查看自己的档案，由服务层校验
                    .route(web::get().to(get_student))
                    .route(
                        web::put()
                            .to(update_student)
                            .wrap(middlewares::RequireRole::new(&UserRole::Admin)),
                    )
                    .route(
                        web::delete()
                            .to(delete_student)
                            .wrap(middlewares::RequireRole::new(&UserRole::Admin)),
                    ),
            ),
    );
}
