use crate::models::common::deserialize_optional_i64;
use serde::Deserialize;
use ts_rs::TS;

#[derive(Debug, Clone, Default, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/result.ts")]
pub struct ResultQuery {
    #[serde(default, deserialize_with = "deserialize_optional_i64")]
    pub examination_id: Option<i64>,
    #[serde(default, deserialize_with = "deserialize_optional_i64")]
    pub class_id: Option<i64>,
    #[serde(default, deserialize_with = "deserialize_optional_i64")]
    pub subject_id: Option<i64>,
    #[serde(default, deserialize_with = "deserialize_optional_i64")]
    pub student_id: Option<i64>,
}

#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/result.ts")]
pub struct UpsertResultRequest {
    pub student_id: i64,
    pub subject_id: i64,
    pub examination_id: i64,
    pub score: f64,
    pub remarks: Option<String>,
}

#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/result.ts")]
pub struct BulkResultEntry {
    pub student_id: i64,
    pub score: f64,
    pub remarks: Option<String>,
}

// 一场考试一门科目的成绩上传
#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/result.ts")]
pub struct BulkResultsRequest {
    pub examination_id: i64,
    pub subject_id: i64,
    pub entries: Vec<BulkResultEntry>,
}

#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/result.ts")]
pub struct ImportResultsQuery {
    pub examination_id: i64,
    pub subject_id: i64,
}
