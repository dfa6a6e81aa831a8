//! 考试服务

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use super::{
    Outcome, bad_request, current_user, ensure_school_access, not_found, resolve_school_scope,
    storage_error, storage_from_request,
};
use crate::models::{
    ApiResponse, ErrorCode,
    examinations::{
        entities::Examination,
        requests::{
            CreateExaminationRequest, ExaminationListQuery, ExaminationQueryParams,
            UpdateExaminationRequest,
        },
    },
    results::{entities::ExamResult, requests::ResultQuery},
};
use crate::respond_on_err;
use crate::storage::Storage;
use crate::utils::validate::{validate_date, validate_max_score};

pub struct ExaminationService {
    storage: Option<Arc<dyn Storage>>,
}

fn check_dates(start_date: Option<&str>, end_date: Option<&str>) -> Outcome<()> {
    let start = start_date
        .map(validate_date)
        .transpose()
        .map_err(|msg| bad_request(&msg))?;
    let end = end_date
        .map(validate_date)
        .transpose()
        .map_err(|msg| bad_request(&msg))?;
    if let (Some(start), Some(end)) = (start, end)
        && start > end
    {
        return Err(bad_request("Examination start_date must not be after end_date"));
    }
    Ok(())
}

// 学期与班级必须属于考试所在学校
async fn check_references(
    storage: &Arc<dyn Storage>,
    school_id: i64,
    term_id: Option<i64>,
    class_id: Option<i64>,
) -> Outcome<()> {
    if let Some(term_id) = term_id {
        match storage.get_term_by_id(term_id).await {
            Ok(Some(term)) if term.school_id == school_id => {}
            Ok(Some(_)) => return Err(bad_request("Term belongs to a different school")),
            Ok(None) => return Err(not_found(ErrorCode::TermNotFound, "Term not found")),
            Err(e) => return Err(storage_error(e, ErrorCode::TermNotFound, "Failed to load term")),
        }
    }
    if let Some(class_id) = class_id {
        match storage.get_class_by_id(class_id).await {
            Ok(Some(class)) if class.school_id == school_id => {}
            Ok(Some(_)) => return Err(bad_request("Class belongs to a different school")),
            Ok(None) => return Err(not_found(ErrorCode::ClassNotFound, "Class not found")),
            Err(e) => return Err(storage_error(e, ErrorCode::ClassNotFound, "Failed to load class")),
        }
    }
    Ok(())
}

fn exceeds_max_score(results: &[ExamResult], max_score: f64) -> bool {
    results.iter().any(|r| r.score > max_score)
}

async fn recorded_results(
    storage: &Arc<dyn Storage>,
    examination_id: i64,
    class_id: Option<i64>,
) -> Outcome<Vec<ExamResult>> {
    storage
        .list_results(ResultQuery {
            examination_id: Some(examination_id),
            class_id,
            ..Default::default()
        })
        .await
        .map_err(|e| storage_error(e, ErrorCode::ResultNotFound, "Failed to load results"))
}

// 修改满分或考试班级时，已录入的成绩必须仍然有效
async fn check_recorded_results(
    storage: &Arc<dyn Storage>,
    exam: &Examination,
    max_score: Option<f64>,
    class_id: Option<Option<i64>>,
) -> Outcome<()> {
    let recorded = recorded_results(storage, exam.id, None).await?;
    if recorded.is_empty() {
        return Ok(());
    }

    if let Some(max_score) = max_score
        && exceeds_max_score(&recorded, max_score)
    {
        return Err(bad_request(
            "max_score is lower than an already recorded score",
        ));
    }

    if let Some(Some(class_id)) = class_id
        && exam.class_id != Some(class_id)
    {
        let in_class = recorded_results(storage, exam.id, Some(class_id)).await?;
        if in_class.len() < recorded.len() {
            return Err(bad_request(
                "Results are recorded for students outside the new class",
            ));
        }
    }
    Ok(())
}

impl ExaminationService {
    pub fn new_lazy() -> Self {
        Self { storage: None }
    }

    pub(crate) fn get_storage(&self, request: &HttpRequest) -> Outcome<Arc<dyn Storage>> {
        match &self.storage {
            Some(storage) => Ok(storage.clone()),
            None => storage_from_request(request),
        }
    }

    /// 考试列表
    ///
    /// 学生只能看到本班（含全校）已发布的考试。
    pub async fn list_examinations(
        &self,
        request: &HttpRequest,
        query: ExaminationQueryParams,
    ) -> ActixResult<HttpResponse> {
        let storage = respond_on_err!(self.get_storage(request));
        let user = respond_on_err!(current_user(request));
        let school_id = respond_on_err!(resolve_school_scope(&user, query.school_id));

        let year = match query.year.map(i32::try_from).transpose() {
            Ok(year) => year,
            Err(_) => return Ok(bad_request("year is out of range")),
        };

        let mut list_query = ExaminationListQuery {
            page: Some(query.pagination.page),
            size: Some(query.pagination.size),
            school_id,
            term_id: query.term_id,
            class_id: query.class_id,
            year,
            published_only: false,
        };

        if user.is_student() {
            let student = match storage.get_student_by_user_id(user.id).await {
                Ok(Some(student)) => student,
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
            };
            list_query.class_id = Some(student.class_id);
            list_query.published_only = true;
        }

        match storage.list_examinations_with_pagination(list_query).await {
            Ok(response) => Ok(HttpResponse::Ok().json(ApiResponse::success(
                response,
                "Examination list retrieved successfully",
            ))),
            Err(e) => Ok(
                HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                    ErrorCode::InternalServerError,
                    format!("Failed to retrieve examination list: {e}"),
                )),
            ),
        }
    }

    pub async fn create_examination(
        &self,
        request: &HttpRequest,
        mut exam_data: CreateExaminationRequest,
    ) -> ActixResult<HttpResponse> {
        let storage = respond_on_err!(self.get_storage(request));

        exam_data.name = exam_data.name.trim().to_string();
        if exam_data.name.is_empty() {
            return Ok(bad_request("Examination name must not be empty"));
        }
        if let Err(msg) = validate_max_score(exam_data.max_score) {
            return Ok(bad_request(msg));
        }
        respond_on_err!(check_dates(
            exam_data.start_date.as_deref(),
            exam_data.end_date.as_deref()
        ));
        respond_on_err!(
            check_references(
                &storage,
                exam_data.school_id,
                Some(exam_data.term_id),
                exam_data.class_id
            )
            .await
        );

        match storage.create_examination(exam_data).await {
            Ok(exam) => Ok(HttpResponse::Created().json(ApiResponse::success(
                exam,
                "Examination created successfully",
            ))),
            Err(e) => Ok(storage_error(
                e,
                ErrorCode::Conflict,
                "Examination creation failed",
            )),
        }
    }

    pub async fn get_examination(
        &self,
        request: &HttpRequest,
        id: i64,
    ) -> ActixResult<HttpResponse> {
        let storage = respond_on_err!(self.get_storage(request));
        let user = respond_on_err!(current_user(request));

        match storage.get_examination_by_id(id).await {
            // 未发布的考试对学生不可见
            Ok(Some(exam)) if user.is_student() && !exam.published => Ok(not_found(
                ErrorCode::ExaminationNotFound,
                "Examination not found",
            )),
            Ok(Some(exam)) => {
                respond_on_err!(ensure_school_access(&user, exam.school_id));
                Ok(HttpResponse::Ok().json(ApiResponse::success(
                    exam,
                    "Examination retrieved successfully",
                )))
            }
            Ok(None) => Ok(not_found(
                ErrorCode::ExaminationNotFound,
                "Examination not found",
            )),
            Err(e) => Ok(
                HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                    ErrorCode::InternalServerError,
                    format!("Failed to get examination: {e}"),
                )),
            ),
        }
    }

    pub async fn update_examination(
        &self,
        request: &HttpRequest,
        id: i64,
        update_data: UpdateExaminationRequest,
    ) -> ActixResult<HttpResponse> {
        let storage = respond_on_err!(self.get_storage(request));

        let existing = match storage.get_examination_by_id(id).await {
            Ok(Some(exam)) => exam,
            Ok(None) => {
                return Ok(not_found(
                    ErrorCode::ExaminationNotFound,
                    "Examination not found",
                ));
            }
            Err(e) => {
                return Ok(storage_error(
                    e,
                    ErrorCode::Conflict,
                    "Failed to update examination",
                ));
            }
        };

        if let Some(ref name) = update_data.name
            && name.trim().is_empty()
        {
            return Ok(bad_request("Examination name must not be empty"));
        }
        if let Some(max_score) = update_data.max_score
            && let Err(msg) = validate_max_score(max_score)
        {
            return Ok(bad_request(msg));
        }
        respond_on_err!(check_dates(
            update_data
                .start_date
                .as_deref()
                .or(existing.start_date.as_deref()),
            update_data
                .end_date
                .as_deref()
                .or(existing.end_date.as_deref()),
        ));
        respond_on_err!(
            check_references(
                &storage,
                existing.school_id,
                update_data.term_id,
                update_data.class_id.flatten()
            )
            .await
        );
        respond_on_err!(
            check_recorded_results(
                &storage,
                &existing,
                update_data.max_score,
                update_data.class_id
            )
            .await
        );

        match storage.update_examination(id, update_data).await {
            Ok(Some(exam)) => Ok(HttpResponse::Ok().json(ApiResponse::success(
                exam,
                "Examination updated successfully",
            ))),
            Ok(None) => Ok(not_found(
                ErrorCode::ExaminationNotFound,
                "Examination not found",
            )),
            Err(e) => Ok(storage_error(
                e,
                ErrorCode::Conflict,
                "Failed to update examination",
            )),
        }
    }

    pub async fn delete_examination(
        &self,
        request: &HttpRequest,
        id: i64,
    ) -> ActixResult<HttpResponse> {
        let storage = respond_on_err!(self.get_storage(request));

        match storage.delete_examination(id).await {
            Ok(true) => Ok(HttpResponse::Ok()
                .json(ApiResponse::success_empty("Examination deleted successfully"))),
            Ok(false) => Ok(not_found(
                ErrorCode::ExaminationNotFound,
                "Examination not found",
            )),
            // 仍有成绩引用时外键失败 -> 400
            Err(e) => Ok(storage_error(
                e,
                ErrorCode::Conflict,
                "Failed to delete examination",
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_examination_dates() {
        assert!(check_dates(None, None).is_ok());
        assert!(check_dates(Some("2024-03-01"), None).is_ok());
        assert!(check_dates(Some("2024-03-01"), Some("2024-03-05")).is_ok());
        assert!(check_dates(Some("2024-03-06"), Some("2024-03-05")).is_err());
        assert!(check_dates(Some("March 1"), None).is_err());
    }

    #[test]
    fn test_exceeds_max_score() {
        let result = |score: f64| ExamResult {
            id: 1,
            student_id: 1,
            subject_id: 1,
            examination_id: 1,
            score,
            remarks: None,
            entered_by: None,
            created_at: chrono::Utc::now(),
            updated_at: chrono::Utc::now(),
        };
        let recorded = vec![result(40.0), result(80.0)];
        assert!(!exceeds_max_score(&recorded, 100.0));
        assert!(!exceeds_max_score(&recorded, 80.0));
        assert!(exceeds_max_score(&recorded, 10.0));
        assert!(!exceeds_max_score(&[], 1.0));
    }
}
