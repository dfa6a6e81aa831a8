//! 课程表服务

pub mod conflicts;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, http::StatusCode};
use std::sync::Arc;

use super::{
    Outcome, bad_request, current_user, error_response, not_found, resolve_school_scope,
    storage_error, storage_from_request,
};
use crate::models::{
    ApiResponse, ErrorCode,
    timetable::{
        entities::TimetableSlot,
        requests::{
            CreateTimetableEntryRequest, TeacherSuggestionQuery, TimetableQuery,
            UpdateTimetableEntryRequest,
        },
        responses::{TeacherSuggestionResponse, TimetableConflictResponse, TimetableListResponse},
    },
    teacher_subjects::requests::TeacherSubjectQuery,
};
use crate::respond_on_err;
use crate::storage::Storage;
use crate::utils::validate::{parse_time_of_day, validate_day_of_week};

pub struct TimetableService {
    storage: Option<Arc<dyn Storage>>,
}

fn invalid_slot(message: &str) -> HttpResponse {
    error_response(StatusCode::BAD_REQUEST, ErrorCode::TimetableInvalidSlot, message)
}

/// 解析并校验上课时段，返回 (开始分钟, 结束分钟)
fn parse_slot_times(day_of_week: i32, start_time: &str, end_time: &str) -> Outcome<(i32, i32)> {
    validate_day_of_week(day_of_week).map_err(invalid_slot)?;
    let start = parse_time_of_day(start_time).map_err(|msg| invalid_slot(&msg))?;
    let end = parse_time_of_day(end_time).map_err(|msg| invalid_slot(&msg))?;
    if start >= end {
        return Err(invalid_slot("start_time must be earlier than end_time"));
    }
    Ok((start, end))
}

impl TimetableService {
    pub fn new_lazy() -> Self {
        Self { storage: None }
    }

    pub(crate) fn get_storage(&self, request: &HttpRequest) -> Outcome<Arc<dyn Storage>> {
        match &self.storage {
            Some(storage) => Ok(storage.clone()),
            None => storage_from_request(request),
        }
    }

    pub async fn list_entries(
        &self,
        request: &HttpRequest,
        mut query: TimetableQuery,
    ) -> ActixResult<HttpResponse> {
        let storage = respond_on_err!(self.get_storage(request));
        let user = respond_on_err!(current_user(request));
        query.school_id = respond_on_err!(resolve_school_scope(&user, query.school_id));

        // 学生只看本班课表
        if user.is_student() {
            match storage.get_student_by_user_id(user.id).await {
                Ok(Some(student)) => query.class_id = Some(student.class_id),
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

        match storage.list_timetable_entries(query).await {
            Ok(items) => Ok(HttpResponse::Ok().json(ApiResponse::success(
                TimetableListResponse { items },
                "Timetable retrieved successfully",
            ))),
            Err(e) => Ok(
                HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                    ErrorCode::InternalServerError,
                    format!("Failed to retrieve timetable: {e}"),
                )),
            ),
        }
    }

    pub async fn create_entry(
        &self,
        request: &HttpRequest,
        data: CreateTimetableEntryRequest,
    ) -> ActixResult<HttpResponse> {
        let storage = respond_on_err!(self.get_storage(request));

        let (start_minute, end_minute) =
            respond_on_err!(parse_slot_times(data.day_of_week, &data.start_time, &data.end_time));

        let school_id = respond_on_err!(
            check_references(
                &storage,
                data.class_id,
                data.stream_id,
                data.subject_id,
                data.teacher_id
            )
            .await
        );

        let slot = TimetableSlot {
            school_id,
            class_id: data.class_id,
            stream_id: data.stream_id,
            subject_id: data.subject_id,
            teacher_id: data.teacher_id,
            day_of_week: data.day_of_week,
            start_minute,
            end_minute,
            room: normalize_room(data.room),
        };

        if let Some(conflict) = respond_on_err!(detect_conflicts(&storage, &slot, None).await) {
            return Ok(conflict);
        }

        match storage.create_timetable_entry(slot).await {
            Ok(entry) => Ok(HttpResponse::Created().json(ApiResponse::success(
                entry,
                "Timetable entry created successfully",
            ))),
            Err(e) => Ok(storage_error(
                e,
                ErrorCode::TimetableConflict,
                "Timetable entry creation failed",
            )),
        }
    }

    pub async fn update_entry(
        &self,
        request: &HttpRequest,
        id: i64,
        data: UpdateTimetableEntryRequest,
    ) -> ActixResult<HttpResponse> {
        let storage = respond_on_err!(self.get_storage(request));

        let existing = match storage.get_timetable_entry_by_id(id).await {
            Ok(Some(entry)) => entry,
            Ok(None) => {
                return Ok(not_found(
                    ErrorCode::TimetableEntryNotFound,
                    "Timetable entry not found",
                ));
            }
            Err(e) => {
                return Ok(storage_error(
                    e,
                    ErrorCode::TimetableEntryNotFound,
                    "Failed to load timetable entry",
                ));
            }
        };

        // 未提供的字段沿用原值
        let day_of_week = data.day_of_week.unwrap_or(existing.day_of_week);
        let start_time = data.start_time.unwrap_or(existing.start_time);
        let end_time = data.end_time.unwrap_or(existing.end_time);
        let (start_minute, end_minute) =
            respond_on_err!(parse_slot_times(day_of_week, &start_time, &end_time));

        let stream_id = data.stream_id.unwrap_or(existing.stream_id);
        let subject_id = data.subject_id.unwrap_or(existing.subject_id);
        let teacher_id = data.teacher_id.unwrap_or(existing.teacher_id);
        let school_id = respond_on_err!(
            check_references(&storage, existing.class_id, stream_id, subject_id, teacher_id).await
        );

        let slot = TimetableSlot {
            school_id,
            class_id: existing.class_id,
            stream_id,
            subject_id,
            teacher_id,
            day_of_week,
            start_minute,
            end_minute,
            room: match data.room {
                Some(room) => normalize_room(Some(room)),
                None => existing.room,
            },
        };

        if let Some(conflict) = respond_on_err!(detect_conflicts(&storage, &slot, Some(id)).await) {
            return Ok(conflict);
        }

        match storage.update_timetable_entry(id, slot).await {
            Ok(Some(entry)) => Ok(HttpResponse::Ok().json(ApiResponse::success(
                entry,
                "Timetable entry updated successfully",
            ))),
            Ok(None) => Ok(not_found(
                ErrorCode::TimetableEntryNotFound,
                "Timetable entry not found",
            )),
            Err(e) => Ok(storage_error(
                e,
                ErrorCode::TimetableConflict,
                "Failed to update timetable entry",
            )),
        }
    }

    pub async fn delete_entry(&self, request: &HttpRequest, id: i64) -> ActixResult<HttpResponse> {
        let storage = respond_on_err!(self.get_storage(request));

        match storage.delete_timetable_entry(id).await {
            Ok(true) => Ok(HttpResponse::Ok()
                .json(ApiResponse::success_empty("Timetable entry deleted successfully"))),
            Ok(false) => Ok(not_found(
                ErrorCode::TimetableEntryNotFound,
                "Timetable entry not found",
            )),
            Err(e) => Ok(
                HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                    ErrorCode::InternalServerError,
                    format!("Failed to delete timetable entry: {e}"),
                )),
            ),
        }
    }

    /// 推荐可以在该时段任课的教师
    pub async fn suggest_teachers(
        &self,
        request: &HttpRequest,
        query: TeacherSuggestionQuery,
    ) -> ActixResult<HttpResponse> {
        let storage = respond_on_err!(self.get_storage(request));

        let (start_minute, end_minute) =
            respond_on_err!(parse_slot_times(query.day_of_week, &query.start_time, &query.end_time));

        let class = match storage.get_class_by_id(query.class_id).await {
            Ok(Some(class)) => class,
            Ok(None) => return Ok(not_found(ErrorCode::ClassNotFound, "Class not found")),
            Err(e) => return Ok(storage_error(e, ErrorCode::ClassNotFound, "Failed to load class")),
        };

        let assignments = match storage
            .list_teacher_subjects(TeacherSubjectQuery {
                teacher_id: None,
                class_id: Some(class.id),
                subject_id: Some(query.subject_id),
            })
            .await
        {
            Ok(assignments) => assignments,
            Err(e) => {
                return Ok(storage_error(
                    e,
                    ErrorCode::AssignmentNotFound,
                    "Failed to load assignments",
                ));
            }
        };
        let mut teacher_ids: Vec<i64> = assignments.iter().map(|a| a.teacher_id).collect();
        teacher_ids.sort_unstable();
        teacher_ids.dedup();

        let candidates = match storage.list_teachers_with_user_by_ids(&teacher_ids).await {
            Ok(candidates) => candidates,
            Err(e) => {
                return Ok(storage_error(
                    e,
                    ErrorCode::TeacherNotFound,
                    "Failed to load teachers",
                ));
            }
        };

        let week_entries = match storage
            .list_timetable_entries(TimetableQuery {
                school_id: Some(class.school_id),
                ..Default::default()
            })
            .await
        {
            Ok(entries) => entries,
            Err(e) => {
                return Ok(storage_error(
                    e,
                    ErrorCode::TimetableEntryNotFound,
                    "Failed to load timetable",
                ));
            }
        };

        let items = conflicts::suggest_teachers(
            &candidates,
            &week_entries,
            query.day_of_week,
            start_minute,
            end_minute,
        );

        Ok(HttpResponse::Ok().json(ApiResponse::success(
            TeacherSuggestionResponse { items },
            "Teacher suggestions retrieved successfully",
        )))
    }
}

fn normalize_room(room: Option<String>) -> Option<String> {
    room.map(|r| r.trim().to_string()).filter(|r| !r.is_empty())
}

/// 校验班级、分流、科目与教师属于同一学校，返回学校 id
async fn check_references(
    storage: &Arc<dyn Storage>,
    class_id: i64,
    stream_id: Option<i64>,
    subject_id: i64,
    teacher_id: i64,
) -> Outcome<i64> {
    let class = match storage.get_class_by_id(class_id).await {
        Ok(Some(class)) => class,
        Ok(None) => return Err(not_found(ErrorCode::ClassNotFound, "Class not found")),
        Err(e) => return Err(storage_error(e, ErrorCode::ClassNotFound, "Failed to load class")),
    };

    if let Some(stream_id) = stream_id {
        match storage.get_stream_by_id(stream_id).await {
            Ok(Some(stream)) if stream.class_id == class.id => {}
            Ok(_) => {
                return Err(error_response(
                    StatusCode::BAD_REQUEST,
                    ErrorCode::StreamClassMismatch,
                    "Stream does not belong to the class",
                ));
            }
            Err(e) => return Err(storage_error(e, ErrorCode::StreamNotFound, "Failed to load stream")),
        }
    }

    match storage.get_subject_by_id(subject_id).await {
        Ok(Some(subject)) if subject.school_id == class.school_id => {}
        Ok(Some(_)) => return Err(bad_request("Subject belongs to a different school")),
        Ok(None) => return Err(not_found(ErrorCode::SubjectNotFound, "Subject not found")),
        Err(e) => return Err(storage_error(e, ErrorCode::SubjectNotFound, "Failed to load subject")),
    }

    match storage.get_teacher_by_id(teacher_id).await {
        Ok(Some(teacher)) if teacher.school_id == class.school_id => {}
        Ok(Some(_)) => return Err(bad_request("Teacher belongs to a different school")),
        Ok(None) => return Err(not_found(ErrorCode::TeacherNotFound, "Teacher not found")),
        Err(e) => return Err(storage_error(e, ErrorCode::TeacherNotFound, "Failed to load teacher")),
    }

    Ok(class.school_id)
}

/// 有冲突时返回 409 响应
async fn detect_conflicts(
    storage: &Arc<dyn Storage>,
    slot: &TimetableSlot,
    exclude_id: Option<i64>,
) -> Outcome<Option<HttpResponse>> {
    let same_day = storage
        .list_timetable_entries(TimetableQuery {
            school_id: Some(slot.school_id),
            day_of_week: Some(i64::from(slot.day_of_week)),
            ..Default::default()
        })
        .await
        .map_err(|e| {
            storage_error(
                e,
                ErrorCode::TimetableConflict,
                "Failed to load timetable",
            )
        })?;

    let conflicting_entry_ids = conflicts::find_conflicts(slot, &same_day, exclude_id);
    if conflicting_entry_ids.is_empty() {
        return Ok(None);
    }

    tracing::info!(
        "Timetable slot for class {} conflicts with entries {:?}",
        slot.class_id,
        conflicting_entry_ids
    );
    Ok(Some(HttpResponse::Conflict().json(ApiResponse::error(
        ErrorCode::TimetableConflict,
        TimetableConflictResponse {
            conflicting_entry_ids,
        },
        "The timetable slot conflicts with existing entries",
    ))))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slot_times() {
        assert_eq!(parse_slot_times(1, "08:00", "08:40").ok(), Some((480, 520)));
        assert!(parse_slot_times(0, "08:00", "08:40").is_err());
        assert!(parse_slot_times(8, "08:00", "08:40").is_err());
        assert!(parse_slot_times(1, "08:40", "08:40").is_err());
        assert!(parse_slot_times(1, "09:00", "08:40").is_err());
        assert!(parse_slot_times(1, "24:00", "24:30").is_err());
    }

    #[test]
    fn test_room_is_trimmed() {
        assert_eq!(normalize_room(Some("  Lab 2 ".to_string())).as_deref(), Some("Lab 2"));
        assert_eq!(normalize_room(Some("   ".to_string())), None);
        assert_eq!(normalize_room(None), None);
    }
}
