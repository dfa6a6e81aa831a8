use super::entities::{ExamResult, RowError};
use serde::Serialize;
use ts_rs::TS;

// 带等级的成绩行
#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/result.ts")]
pub struct ResultWithGrade {
    #[serde(flatten)]
    #[ts(flatten)]
    pub result: ExamResult,
    pub percentage: Option<f64>,
    pub grade: Option<String>,
}

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/result.ts")]
pub struct ResultListResponse {
    pub items: Vec<ResultWithGrade>,
}

// 批量写入结果（成绩上传 / CSV 导入 / 测验成绩）
#[derive(Debug, Default, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/result.ts")]
pub struct BulkUpsertResponse {
    pub total: usize,
    pub success: usize,
    pub failed: usize,
    pub errors: Vec<RowError>,
}
