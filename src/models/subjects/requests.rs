use crate::models::common::{PaginationQuery, deserialize_optional_i64};
use serde::Deserialize;
use ts_rs::TS;

#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/subject.ts")]
pub struct SubjectQueryParams {
    #[serde(flatten)]
    #[ts(flatten)]
    pub pagination: PaginationQuery,
    #[serde(default, deserialize_with = "deserialize_optional_i64")]
    pub school_id: Option<i64>,
    pub search: Option<String>,
}

#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/subject.ts")]
pub struct CreateSubjectRequest {
    pub school_id: i64,
    pub name: String,
    pub code: String,
}

#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/subject.ts")]
pub struct UpdateSubjectRequest {
    pub name: Option<String>,
    pub code: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct SubjectListQuery {
    pub page: Option<i64>,
    pub size: Option<i64>,
    pub school_id: Option<i64>,
    pub search: Option<String>,
}
