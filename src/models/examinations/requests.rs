use crate::models::common::{
    PaginationQuery, deserialize_clearable_i64, deserialize_optional_i64,
};
use serde::Deserialize;
use ts_rs::TS;

#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/examination.ts")]
pub struct ExaminationQueryParams {
    #[serde(flatten)]
    #[ts(flatten)]
    pub pagination: PaginationQuery,
    #[serde(default, deserialize_with = "deserialize_optional_i64")]
    pub school_id: Option<i64>,
    #[serde(default, deserialize_with = "deserialize_optional_i64")]
    pub term_id: Option<i64>,
    #[serde(default, deserialize_with = "deserialize_optional_i64")]
    pub class_id: Option<i64>,
    #[serde(default, deserialize_with = "deserialize_optional_i64")]
    pub year: Option<i64>,
}

fn default_max_score() -> f64 {
    100.0
}

#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/examination.ts")]
pub struct CreateExaminationRequest {
    pub school_id: i64,
    pub term_id: i64,
    pub name: String,
    pub year: i32,
    pub class_id: Option<i64>,
    #[serde(default = "default_max_score")]
    pub max_score: f64,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    #[serde(default)]
    pub published: bool,
}

#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/examination.ts")]
pub struct UpdateExaminationRequest {
    pub term_id: Option<i64>,
    pub name: Option<String>,
    pub year: Option<i32>,
    /// 显式 null 表示改为全校考试
    #[serde(default, deserialize_with = "deserialize_clearable_i64")]
    pub class_id: Option<Option<i64>>,
    pub max_score: Option<f64>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub published: Option<bool>,
}

// 考试列表查询参数（用于存储层）
#[derive(Debug, Clone, Default)]
pub struct ExaminationListQuery {
    pub page: Option<i64>,
    pub size: Option<i64>,
    pub school_id: Option<i64>,
    pub term_id: Option<i64>,
    pub class_id: Option<i64>,
    pub year: Option<i32>,
    pub published_only: bool,
}
