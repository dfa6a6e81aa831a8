use super::entities::TeacherSubject;
use serde::Serialize;
use ts_rs::TS;

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/teacher_subject.ts")]
pub struct TeacherSubjectListResponse {
    pub items: Vec<TeacherSubject>,
}

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/teacher_subject.ts")]
pub struct BulkAssignResponse {
    pub created: Vec<TeacherSubject>,
    // 已存在而跳过的 subject_id
    pub skipped: Vec<i64>,
}
