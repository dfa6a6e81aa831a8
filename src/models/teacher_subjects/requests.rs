use serde::Deserialize;
use ts_rs::TS;

use crate::models::common::deserialize_optional_i64;

#[derive(Debug, Clone, Default, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/teacher_subject.ts")]
pub struct TeacherSubjectQuery {
    #[serde(default, deserialize_with = "deserialize_optional_i64")]
    pub teacher_id: Option<i64>,
    #[serde(default, deserialize_with = "deserialize_optional_i64")]
    pub class_id: Option<i64>,
    #[serde(default, deserialize_with = "deserialize_optional_i64")]
    pub subject_id: Option<i64>,
}

#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/teacher_subject.ts")]
pub struct CreateTeacherSubjectRequest {
    pub teacher_id: i64,
    pub subject_id: i64,
    pub class_id: i64,
}

// 批量分配：一名教师在一个班级任教多门科目
#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/teacher_subject.ts")]
pub struct BulkAssignRequest {
    pub teacher_id: i64,
    pub class_id: i64,
    pub subject_ids: Vec<i64>,
}
