use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::collections::HashMap;

use super::ResultService;
use crate::models::{
    ApiResponse, ErrorCode,
    results::{
        requests::ResultQuery,
        responses::{ResultListResponse, ResultWithGrade},
    },
};
use crate::respond_on_err;
use crate::services::{current_user, grading, not_found, storage_error};

pub async fn list_results(
    service: &ResultService,
    request: &HttpRequest,
    mut query: ResultQuery,
) -> ActixResult<HttpResponse> {
    let storage = respond_on_err!(service.get_storage(request));
    let user = respond_on_err!(current_user(request));

    // 学生只能查看自己的成绩
    if user.is_student() {
        match storage.get_student_by_user_id(user.id).await {
            Ok(Some(student)) => query.student_id = Some(student.id),
            Ok(None) => {
                return Ok(not_found(
                    ErrorCode::StudentNotFound,
                    "No student record is linked to this account",
                ));
            }
            Err(e) => {
                return Ok(storage_error(
                    e,
                    ErrorCode::StudentNotFound,
                    "Failed to load student record",
                ));
            }
        }
    }

    let results = match storage.list_results(query).await {
        Ok(results) => results,
        Err(e) => {
            return Ok(
                HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                    ErrorCode::InternalServerError,
                    format!("Failed to retrieve results: {e}"),
                )),
            );
        }
    };

    let mut exam_ids: Vec<i64> = results.iter().map(|r| r.examination_id).collect();
    exam_ids.sort_unstable();
    exam_ids.dedup();
    let exams: HashMap<i64, _> = match storage.list_examinations_by_ids(&exam_ids).await {
        Ok(exams) => exams.into_iter().map(|e| (e.id, e)).collect(),
        Err(e) => {
            return Ok(storage_error(
                e,
                ErrorCode::ExaminationNotFound,
                "Failed to load examinations",
            ));
        }
    };

    let items = results
        .into_iter()
        .filter_map(|result| {
            let exam = exams.get(&result.examination_id)?;
            // 非管理员只看本校；学生只看已发布考试
            if !user.is_admin() && user.school_id != Some(exam.school_id) {
                return None;
            }
            if user.is_student() && !exam.published {
                return None;
            }
            let percentage = grading::percentage(result.score, exam.max_score);
            Some(ResultWithGrade {
                percentage: percentage.map(grading::round2),
                grade: percentage.map(|p| grading::grade_for_percentage(p).grade.to_string()),
                result,
            })
        })
        .collect();

    Ok(HttpResponse::Ok().json(ApiResponse::success(
        ResultListResponse { items },
        "Results retrieved successfully",
    )))
}
