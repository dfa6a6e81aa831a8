use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::collections::{HashMap, HashSet};

use super::{ResultService, RowRejection, check_batch_size, commit_rows, load_write_context};
use crate::models::{
    ErrorCode,
    results::{entities::RowError, requests::BulkResultsRequest},
};
use crate::respond_on_err;
use crate::services::{current_user, storage_error};

/// 成绩上传：一场考试一门科目的多行成绩，每行单独校验
pub async fn bulk_upsert(
    service: &ResultService,
    request: &HttpRequest,
    data: BulkResultsRequest,
) -> ActixResult<HttpResponse> {
    let storage = respond_on_err!(service.get_storage(request));
    let user = respond_on_err!(current_user(request));

    respond_on_err!(check_batch_size(data.entries.len(), "entries"));

    let ctx = respond_on_err!(
        load_write_context(&storage, &user, data.examination_id, data.subject_id).await
    );

    let ids: Vec<i64> = data.entries.iter().map(|e| e.student_id).collect();
    let students: HashMap<i64, _> = match storage.list_students_by_ids(&ids).await {
        Ok(students) => students.into_iter().map(|s| (s.id, s)).collect(),
        Err(e) => {
            return Ok(storage_error(
                e,
                ErrorCode::StudentNotFound,
                "Failed to load students",
            ));
        }
    };

    let total = data.entries.len();
    let mut seen = HashSet::new();
    let mut rows = Vec::new();
    let mut errors: Vec<RowError> = Vec::new();

    for (idx, entry) in data.entries.into_iter().enumerate() {
        let row_num = idx + 1;

        let Some(student) = students.get(&entry.student_id) else {
            errors.push(RowError::new(row_num, "student_id", "Student not found"));
            continue;
        };
        if !seen.insert(entry.student_id) {
            errors.push(RowError::new(
                row_num,
                "student_id",
                "Duplicate student in upload",
            ));
            continue;
        }
        if let Err(rejection) = ctx.check_row(student, entry.score) {
            errors.push(RowRejection::into_row_error(rejection, row_num));
            continue;
        }

        rows.push(ctx.upsert_row(student.id, entry.score, entry.remarks, user.id));
    }

    tracing::info!(
        "User {} uploading {} results for examination {} subject {} ({} rejected)",
        user.id,
        rows.len(),
        ctx.exam.id,
        ctx.subject.id,
        errors.len()
    );

    commit_rows(&storage, total, rows, errors).await
}
