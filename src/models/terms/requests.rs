use crate::models::common::deserialize_optional_i64;
use serde::Deserialize;
use ts_rs::TS;

#[derive(Debug, Clone, Default, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/term.ts")]
pub struct TermQuery {
    #[serde(default, deserialize_with = "deserialize_optional_i64")]
    pub school_id: Option<i64>,
    #[serde(default, deserialize_with = "deserialize_optional_i64")]
    pub year: Option<i64>,
    #[serde(default)]
    pub current_only: bool,
}

#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/term.ts")]
pub struct CreateTermRequest {
    pub school_id: i64,
    pub name: String,
    pub year: i32,
    pub start_date: String,
    pub end_date: String,
    #[serde(default)]
    pub is_current: bool,
}

#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/term.ts")]
pub struct UpdateTermRequest {
    pub name: Option<String>,
    pub year: Option<i32>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub is_current: Option<bool>,
}
