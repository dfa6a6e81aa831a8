use crate::models::common::{PaginationQuery, deserialize_optional_i64};
use serde::Deserialize;
use ts_rs::TS;

// 学生查询参数（来自HTTP请求）
#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/student.ts")]
pub struct StudentQueryParams {
    #[serde(flatten)]
    #[ts(flatten)]
    pub pagination: PaginationQuery,
    #[serde(default, deserialize_with = "deserialize_optional_i64")]
    pub class_id: Option<i64>,
    #[serde(default, deserialize_with = "deserialize_optional_i64")]
    pub stream_id: Option<i64>,
    pub search: Option<String>,
}

#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/student.ts")]
pub struct CreateStudentRequest {
    pub admission_number: String,
    pub first_name: String,
    pub last_name: String,
    pub gender: Option<String>,
    pub date_of_birth: Option<String>,
    pub class_id: i64,
    pub stream_id: Option<i64>,
    pub user_id: Option<i64>,
}

#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/student.ts")]
pub struct UpdateStudentRequest {
    pub admission_number: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub gender: Option<String>,
    pub date_of_birth: Option<String>,
    pub class_id: Option<i64>,
    pub stream_id: Option<i64>,
    pub user_id: Option<i64>,
}

// 学生列表查询参数（用于存储层）
#[derive(Debug, Clone, Default)]
pub struct StudentListQuery {
    pub page: Option<i64>,
    pub size: Option<i64>,
    pub school_id: Option<i64>,
    pub class_id: Option<i64>,
    pub stream_id: Option<i64>,
    pub search: Option<String>,
}
