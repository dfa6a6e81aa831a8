pub mod analytics;
pub mod auth;
pub mod class_tests;
pub mod classes;
pub mod dashboard;
pub mod examinations;
pub mod grading;
pub mod results;
pub mod schools;
pub mod students;
pub mod subjects;
pub mod teacher_subjects;
pub mod teachers;
pub mod terms;
pub mod timetable;
pub mod users;

pub use analytics::AnalyticsService;
pub use auth::AuthService;
pub use class_tests::ClassTestService;
pub use classes::ClassService;
pub use dashboard::DashboardService;
pub use examinations::ExaminationService;
pub use results::ResultService;
pub use schools::SchoolService;
pub use students::StudentService;
pub use subjects::SubjectService;
pub use teacher_subjects::TeacherSubjectService;
pub use teachers::TeacherService;
pub use terms::TermService;
pub use timetable::TimetableService;
pub use users::UserService;

use actix_web::{HttpRequest, HttpResponse, http::StatusCode};
use std::sync::Arc;

use crate::errors::SchoolSysError;
use crate::middlewares::{RequireJWT, create_error_response};
use crate::models::{ErrorCode, users::entities::User};
use crate::storage::Storage;

/// 处理流程中的提前返回：Err 中携带已构造好的错误响应
pub(crate) type Outcome<T> = std::result::Result<T, HttpResponse>;

/// 展开 `Outcome`，出错时直接把响应返回给调用方
#[macro_export]
macro_rules! respond_on_err {
    ($expr:expr) => {
        match $expr {
            Ok(value) => value,
            Err(response) => return Ok(response),
        }
    };
}

/// 从 app_data 获取存储实例
pub(crate) fn storage_from_request(request: &HttpRequest) -> Outcome<Arc<dyn Storage>> {
    request
        .app_data::<actix_web::web::Data<Arc<dyn Storage>>>()
        .map(|data| data.get_ref().clone())
        .ok_or_else(|| {
            tracing::error!("Storage not found in app data");
            error_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                ErrorCode::InternalServerError,
                "Storage unavailable",
            )
        })
}

/// 当前登录用户（需在 RequireJWT 之后使用）
pub(crate) fn current_user(request: &HttpRequest) -> Outcome<User> {
    RequireJWT::extract_user_claims(request).ok_or_else(|| {
        error_response(
            StatusCode::UNAUTHORIZED,
            ErrorCode::Unauthorized,
            "Unauthorized access, please login",
        )
    })
}

pub(crate) fn error_response(status: StatusCode, code: ErrorCode, message: &str) -> HttpResponse {
    create_error_response(status, code, message)
}

pub(crate) fn bad_request(message: &str) -> HttpResponse {
    error_response(StatusCode::BAD_REQUEST, ErrorCode::BadRequest, message)
}

pub(crate) fn not_found(code: ErrorCode, message: &str) -> HttpResponse {
    error_response(StatusCode::NOT_FOUND, code, message)
}

pub(crate) fn forbidden(code: ErrorCode, message: &str) -> HttpResponse {
    error_response(StatusCode::FORBIDDEN, code, message)
}

/// 将存储层错误转换为响应
///
/// 唯一约束冲突 -> 409，外键约束失败 -> 400，其余 -> 500
pub(crate) fn storage_error(err: SchoolSysError, conflict_code: ErrorCode, action: &str) -> HttpResponse {
    if err.is_unique_violation() {
        error_response(
            StatusCode::CONFLICT,
            conflict_code,
            &format!("{action}: resource already exists"),
        )
    } else if err.is_foreign_key_violation() {
        bad_request(&format!("{action}: referenced resource does not exist"))
    } else {
        tracing::error!("{action}: {err}");
        error_response(
            StatusCode::INTERNAL_SERVER_ERROR,
            ErrorCode::InternalServerError,
            &format!("{action}: {err}"),
        )
    }
}

/// 解析查询的学校范围
///
/// 管理员可以查看任意学校（None 表示全部）；其他角色固定为自己的学校，
/// 显式请求其他学校时拒绝。
pub(crate) fn resolve_school_scope(user: &User, requested: Option<i64>) -> Outcome<Option<i64>> {
    if user.is_admin() {
        return Ok(requested);
    }

    let Some(own) = user.school_id else {
        return Err(forbidden(
            ErrorCode::Forbidden,
            "Account is not attached to a school",
        ));
    };

    match requested {
        Some(id) if id != own => Err(forbidden(
            ErrorCode::Forbidden,
            "Access to another school is not allowed",
        )),
        _ => Ok(Some(own)),
    }
}

/// 校验资源所属学校对当前用户可见
pub(crate) fn ensure_school_access(user: &User, school_id: i64) -> Outcome<()> {
    if user.is_admin() || user.school_id == Some(school_id) {
        Ok(())
    } else {
        Err(forbidden(
            ErrorCode::Forbidden,
            "Access to another school is not allowed",
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::users::entities::{UserRole, UserStatus};

    fn user(role: UserRole, school_id: Option<i64>) -> User {
        User {
            id: 1,
            username: "someone".to_string(),
            email: "someone@example.com".to_string(),
            password_hash: String::new(),
            role,
            status: UserStatus::Active,
            display_name: None,
            school_id,
            last_login: None,
            created_at: chrono::Utc::now(),
            updated_at: chrono::Utc::now(),
        }
    }

    #[test]
    fn test_admin_scope_passes_through() {
        let admin = user(UserRole::Admin, None);
        assert_eq!(resolve_school_scope(&admin, None).ok(), Some(None));
        assert_eq!(resolve_school_scope(&admin, Some(7)).ok(), Some(Some(7)));
    }

    #[test]
    fn test_teacher_scope_is_pinned_to_own_school() {
        let teacher = user(UserRole::Teacher, Some(3));
        assert_eq!(resolve_school_scope(&teacher, None).ok(), Some(Some(3)));
        assert_eq!(resolve_school_scope(&teacher, Some(3)).ok(), Some(Some(3)));
        assert!(resolve_school_scope(&teacher, Some(4)).is_err());
        assert!(resolve_school_scope(&user(UserRole::Student, None), None).is_err());
    }

    #[test]
    fn test_storage_error_status() {
        let fk = SchoolSysError::database_operation("FOREIGN KEY constraint failed");
        assert_eq!(
            storage_error(fk, ErrorCode::Conflict, "Failed to delete term").status(),
            StatusCode::BAD_REQUEST
        );
        let unique = SchoolSysError::database_operation("UNIQUE constraint failed: terms.name");
        assert_eq!(
            storage_error(unique, ErrorCode::Conflict, "Failed to create term").status(),
            StatusCode::CONFLICT
        );
        let other = SchoolSysError::database_operation("disk I/O error");
        assert_eq!(
            storage_error(other, ErrorCode::Conflict, "Failed to delete term").status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_school_access() {
        assert!(ensure_school_access(&user(UserRole::Admin, None), 9).is_ok());
        assert!(ensure_school_access(&user(UserRole::Student, Some(9)), 9).is_ok());
        assert!(ensure_school_access(&user(UserRole::Teacher, Some(1)), 9).is_err());
    }
}
