use crate::models::common::{PaginationQuery, deserialize_optional_i64};
use serde::Deserialize;
use ts_rs::TS;

#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/teacher.ts")]
pub struct TeacherQueryParams {
    #[serde(flatten)]
    #[ts(flatten)]
    pub pagination: PaginationQuery,
    #[serde(default, deserialize_with = "deserialize_optional_i64")]
    pub school_id: Option<i64>,
    pub search: Option<String>,
}

#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/teacher.ts")]
pub struct CreateTeacherRequest {
    pub school_id: i64,
    pub user_id: i64,
    pub staff_number: Option<String>,
    pub phone: Option<String>,
}

#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/teacher.ts")]
pub struct UpdateTeacherRequest {
    pub staff_number: Option<String>,
    pub phone: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct TeacherListQuery {
    pub page: Option<i64>,
    pub size: Option<i64>,
    pub school_id: Option<i64>,
    pub search: Option<String>,
}
