use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::{ResultService, load_write_context};
use crate::models::{ApiResponse, ErrorCode, results::requests::UpsertResultRequest};
use crate::respond_on_err;
use crate::services::{current_user, not_found, storage_error};

/// 写入单条成绩，(student, subject, examination) 已存在时覆盖
pub async fn upsert_result(
    service: &ResultService,
    request: &HttpRequest,
    data: UpsertResultRequest,
) -> ActixResult<HttpResponse> {
    let storage = respond_on_err!(service.get_storage(request));
    let user = respond_on_err!(current_user(request));

    let ctx = respond_on_err!(
        load_write_context(&storage, &user, data.examination_id, data.subject_id).await
    );

    let student = match storage.get_student_by_id(data.student_id).await {
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

    if let Err(rejection) = ctx.check_row(&student, data.score) {
        return Ok(rejection.into_response());
    }

    let row = ctx.upsert_row(student.id, data.score, data.remarks, user.id);
    match storage.upsert_result(row).await {
        Ok(result) => Ok(HttpResponse::Ok().json(ApiResponse::success(result, "Result saved"))),
        Err(e) => Ok(storage_error(e, ErrorCode::Conflict, "Failed to save result")),
    }
}
