use crate::models::common::deserialize_optional_i64;
use serde::Deserialize;
use ts_rs::TS;

#[derive(Debug, Clone, Default, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/analytics.ts")]
pub struct ExamAnalyticsQuery {
    #[serde(default, deserialize_with = "deserialize_optional_i64")]
    pub class_id: Option<i64>,
    #[serde(default, deserialize_with = "deserialize_optional_i64")]
    pub stream_id: Option<i64>,
}

#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/analytics.ts")]
pub struct ReportCardQuery {
    pub examination_id: i64,
}
