use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::{ResultService, load_write_context};
use crate::models::{ApiResponse, ErrorCode};
use crate::respond_on_err;
use crate::services::{current_user, not_found, storage_error};

pub async fn delete_result(
    service: &ResultService,
    request: &HttpRequest,
    id: i64,
) -> ActixResult<HttpResponse> {
    let storage = respond_on_err!(service.get_storage(request));
    let user = respond_on_err!(current_user(request));

    let result = match storage.get_result_by_id(id).await {
        Ok(Some(result)) => result,
        Ok(None) => return Ok(not_found(ErrorCode::ResultNotFound, "Result not found")),
        Err(e) => {
            return Ok(storage_error(
                e,
                ErrorCode::ResultNotFound,
                "Failed to load result",
            ));
        }
    };

    // 教师只能删除自己任教班级的成绩
    if !user.is_admin() {
        let ctx = respond_on_err!(
            load_write_context(&storage, &user, result.examination_id, result.subject_id).await
        );
        let student = match storage.get_student_by_id(result.student_id).await {
            Ok(Some(student)) => student,
            Ok(None) => return Ok(not_found(ErrorCode::StudentNotFound, "Student not found")),
            Err(e) => {
                return Ok(storage_error(
                    e,
                    ErrorCode::StudentNotFound,
                    "Failed to load student",
                ));
            }
        };
        if let Err(rejection) = ctx.check_row(&student, 0.0) {
            return Ok(rejection.into_response());
        }
    }

    match storage.delete_result(id).await {
        Ok(true) => {
            Ok(HttpResponse::Ok().json(ApiResponse::success_empty("Result deleted successfully")))
        }
        Ok(false) => Ok(not_found(ErrorCode::ResultNotFound, "Result not found")),
        Err(e) => Ok(
            HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                ErrorCode::InternalServerError,
                format!("Failed to delete result: {e}"),
            )),
        ),
    }
}
