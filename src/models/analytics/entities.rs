use serde::Serialize;
use ts_rs::TS;

// 分数统计摘要
#[derive(Debug, Clone, PartialEq, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/analytics.ts")]
pub struct ScoreSummary {
    pub count: usize,
    // 保留两位小数
    pub average: f64,
    pub min: f64,
    pub max: f64,
}

// 等级分布中的一项
#[derive(Debug, Clone, PartialEq, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/analytics.ts")]
pub struct GradeCount {
    pub grade: String,
    pub count: usize,
}

// 单科统计
#[derive(Debug, Clone, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/analytics.ts")]
pub struct SubjectSummary {
    pub subject_id: i64,
    pub subject_name: String,
    pub subject_code: String,
    pub summary: Option<ScoreSummary>,
    pub average_percentage: Option<f64>,
    pub mean_grade: Option<String>,
}

// 考试排名中的学生行
#[derive(Debug, Clone, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/analytics.ts")]
pub struct StudentRankRow {
    pub student_id: i64,
    pub admission_number: String,
    pub name: String,
    pub stream_id: Option<i64>,
    pub subject_count: usize,
    pub total: f64,
    // 各科百分比的平均值
    pub average: f64,
    pub mean_points: f64,
    pub mean_grade: String,
    pub position: usize,
}

// 成绩单中的单科行
#[derive(Debug, Clone, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/analytics.ts")]
pub struct ReportCardLine {
    pub subject_id: i64,
    pub subject_name: String,
    pub score: f64,
    pub percentage: f64,
    pub grade: String,
    pub points: u8,
    pub remark: String,
    pub subject_position: usize,
    pub subject_out_of: usize,
    pub remarks: Option<String>,
}

// 成绩趋势中的一点
#[derive(Debug, Clone, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/analytics.ts")]
pub struct TrendPoint {
    pub examination_id: i64,
    pub examination_name: String,
    pub year: i32,
    pub term_id: i64,
    pub term_name: Option<String>,
    pub subject_count: usize,
    pub average_percentage: f64,
    pub mean_grade: String,
}
