use super::entities::{
    GradeCount, ReportCardLine, ScoreSummary, StudentRankRow, SubjectSummary, TrendPoint,
};
use crate::models::{
    examinations::entities::Examination, students::entities::Student, class_tests::entities::Test,
};
use serde::Serialize;
use ts_rs::TS;

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/analytics.ts")]
pub struct ExamAnalyticsResponse {
    pub examination: Examination,
    pub student_count: usize,
    pub subjects: Vec<SubjectSummary>,
    pub students: Vec<StudentRankRow>,
    // 全体学生平均百分比
    pub overall_mean: Option<f64>,
    pub overall_grade: Option<String>,
    pub grade_distribution: Vec<GradeCount>,
}

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/analytics.ts")]
pub struct ReportCardResponse {
    pub student: Student,
    pub examination: Examination,
    pub lines: Vec<ReportCardLine>,
    pub total: f64,
    pub average: Option<f64>,
    pub mean_points: Option<f64>,
    pub mean_grade: Option<String>,
    pub class_position: Option<usize>,
    pub class_size: usize,
    pub stream_position: Option<usize>,
    pub stream_size: usize,
}

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/analytics.ts")]
pub struct TestAnalyticsResponse {
    pub test: Test,
    pub summary: Option<ScoreSummary>,
    pub average_percentage: Option<f64>,
    pub grade_distribution: Vec<GradeCount>,
    pub submitted: usize,
    pub class_size: usize,
    // 已录入成绩的学生占比（百分比）
    pub coverage: Option<f64>,
}

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/analytics.ts")]
pub struct StudentTrendResponse {
    pub student_id: i64,
    pub points: Vec<TrendPoint>,
}
