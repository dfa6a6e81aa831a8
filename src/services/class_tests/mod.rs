pub mod create;
pub mod delete;
pub mod detail;
pub mod list;
pub mod results;
pub mod update;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, http::StatusCode};
use std::sync::Arc;

use super::{
    Outcome, ensure_school_access, error_response, not_found, storage_error, storage_from_request,
    teachers::teacher_for_user,
};
use crate::models::{
    ErrorCode,
    class_tests::{
        entities::Test,
        requests::{CreateTestRequest, TestQueryParams, UpdateTestRequest, UpsertTestResultsRequest},
    },
    users::entities::User,
};
use crate::storage::Storage;

pub struct ClassTestService {
    storage: Option<Arc<dyn Storage>>,
}

impl ClassTestService {
    pub fn new_lazy() -> Self {
        Self { storage: None }
    }

    pub(crate) fn get_storage(&self, request: &HttpRequest) -> Outcome<Arc<dyn Storage>> {
        match &self.storage {
            Some(storage) => Ok(storage.clone()),
            None => storage_from_request(request),
        }
    }

    pub async fn list_tests(
        &self,
        request: &HttpRequest,
        query: TestQueryParams,
    ) -> ActixResult<HttpResponse> {
        list::list_tests(self, request, query).await
    }

    pub async fn create_test(
        &self,
        request: &HttpRequest,
        test_data: CreateTestRequest,
    ) -> ActixResult<HttpResponse> {
        create::create_test(self, request, test_data).await
    }

    pub async fn get_test(&self, request: &HttpRequest, id: i64) -> ActixResult<HttpResponse> {
        detail::get_test(self, request, id).await
    }

    pub async fn update_test(
        &self,
        request: &HttpRequest,
        id: i64,
        update_data: UpdateTestRequest,
    ) -> ActixResult<HttpResponse> {
        update::update_test(self, request, id, update_data).await
    }

    pub async fn delete_test(&self, request: &HttpRequest, id: i64) -> ActixResult<HttpResponse> {
        delete::delete_test(self, request, id).await
    }

    pub async fn list_results(
        &self,
        request: &HttpRequest,
        test_id: i64,
    ) -> ActixResult<HttpResponse> {
        results::list_results(self, request, test_id).await
    }

    pub async fn upsert_results(
        &self,
        request: &HttpRequest,
        test_id: i64,
        data: UpsertTestResultsRequest,
    ) -> ActixResult<HttpResponse> {
        results::upsert_results(self, request, test_id, data).await
    }

    pub async fn delete_result(
        &self,
        request: &HttpRequest,
        test_id: i64,
        result_id: i64,
    ) -> ActixResult<HttpResponse> {
        results::delete_result(self, request, test_id, result_id).await
    }
}

async fn load_test(storage: &Arc<dyn Storage>, id: i64) -> Outcome<Test> {
    match storage.get_test_by_id(id).await {
        Ok(Some(test)) => Ok(test),
        Ok(None) => Err(not_found(ErrorCode::TestNotFound, "Test not found")),
        Err(e) => Err(storage_error(e, ErrorCode::TestNotFound, "Failed to load test")),
    }
}

/// 读取测验：同校可见，学生仅限本班
pub(crate) async fn load_test_for_read(
    storage: &Arc<dyn Storage>,
    user: &User,
    id: i64,
) -> Outcome<Test> {
    let test = load_test(storage, id).await?;
    ensure_school_access(user, test.school_id)?;

    if user.is_student() {
        let in_class = match storage.get_student_by_user_id(user.id).await {
            Ok(Some(student)) => student.class_id == test.class_id,
            Ok(None) => false,
            Err(e) => {
                return Err(storage_error(
                    e,
                    ErrorCode::StudentNotFound,
                    "Failed to load student record",
                ));
            }
        };
        if !in_class {
            return Err(error_response(
                StatusCode::FORBIDDEN,
                ErrorCode::TestPermissionDenied,
                "This test is not for your class",
            ));
        }
    }

    Ok(test)
}

/// 修改测验：管理员或创建该测验的教师
pub(crate) async fn load_test_for_write(
    storage: &Arc<dyn Storage>,
    user: &User,
    id: i64,
) -> Outcome<Test> {
    let test = load_test(storage, id).await?;
    if user.is_admin() {
        return Ok(test);
    }

    let teacher = teacher_for_user(storage, user.id).await?;
    if teacher.id != test.teacher_id {
        return Err(error_response(
            StatusCode::FORBIDDEN,
            ErrorCode::TestPermissionDenied,
            "Only the teacher who created this test can modify it",
        ));
    }
    Ok(test)
}
