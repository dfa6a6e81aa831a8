//! 成绩汇总：考试分析、成绩单、测验统计与成绩趋势
//!
//! 输入是已经按权限和范围过滤好的数据，这里只做计算。
//! 百分比一律按考试（或测验）的满分换算后再评级。

use std::collections::{BTreeMap, HashMap};

use crate::models::{
    analytics::{
        entities::{ReportCardLine, StudentRankRow, SubjectSummary, TrendPoint},
        responses::{ExamAnalyticsResponse, ReportCardResponse, TestAnalyticsResponse},
    },
    class_tests::entities::{Test, TestResult},
    examinations::entities::Examination,
    results::entities::ExamResult,
    students::entities::Student,
    subjects::entities::Subject,
    terms::entities::Term,
};
use crate::services::grading::{
    competition_rank, grade_distribution, grade_for_percentage, grade_for_points, mean, percentage,
    round2, summarize,
};

/// 按平均百分比排名的学生行
///
/// 没有任何成绩的学生不参与排名。结果按名次、学号排序。
pub fn rank_students(
    max_score: f64,
    students: &[Student],
    results: &[ExamResult],
) -> Vec<StudentRankRow> {
    let mut by_student: HashMap<i64, Vec<&ExamResult>> = HashMap::new();
    for result in results {
        by_student.entry(result.student_id).or_default().push(result);
    }

    let mut rows: Vec<StudentRankRow> = students
        .iter()
        .filter_map(|student| {
            let own = by_student.get(&student.id)?;
            let pcts: Vec<f64> = own
                .iter()
                .filter_map(|r| percentage(r.score, max_score))
                .collect();
            let points: Vec<f64> = pcts
                .iter()
                .map(|p| f64::from(grade_for_percentage(*p).points))
                .collect();
            let average = mean(&pcts)?;
            let mean_points = mean(&points)?;

            Some(StudentRankRow {
                student_id: student.id,
                admission_number: student.admission_number.clone(),
                name: student.full_name(),
                stream_id: student.stream_id,
                subject_count: own.len(),
                total: round2(own.iter().map(|r| r.score).sum()),
                average: round2(average),
                mean_points: round2(mean_points),
                mean_grade: grade_for_points(mean_points).grade.to_string(),
                position: 0,
            })
        })
        .collect();

    assign_positions(&mut rows);
    rows
}

fn assign_positions(rows: &mut [StudentRankRow]) {
    let averages: Vec<f64> = rows.iter().map(|r| r.average).collect();
    for (row, rank) in rows.iter_mut().zip(competition_rank(&averages)) {
        row.position = rank;
    }
    rows.sort_by(|a, b| {
        a.position
            .cmp(&b.position)
            .then_with(|| a.admission_number.cmp(&b.admission_number))
    });
}

/// 各科统计，按科目名称排序
pub fn summarize_subjects(
    max_score: f64,
    subjects: &[Subject],
    results: &[ExamResult],
) -> Vec<SubjectSummary> {
    let mut by_subject: BTreeMap<i64, Vec<f64>> = BTreeMap::new();
    for result in results {
        by_subject
            .entry(result.subject_id)
            .or_default()
            .push(result.score);
    }

    let mut summaries: Vec<SubjectSummary> = subjects
        .iter()
        .filter_map(|subject| {
            let scores = by_subject.get(&subject.id)?;
            let pcts: Vec<f64> = scores
                .iter()
                .filter_map(|s| percentage(*s, max_score))
                .collect();
            let points: Vec<f64> = pcts
                .iter()
                .map(|p| f64::from(grade_for_percentage(*p).points))
                .collect();

            Some(SubjectSummary {
                subject_id: subject.id,
                subject_name: subject.name.clone(),
                subject_code: subject.code.clone(),
                summary: summarize(scores),
                average_percentage: mean(&pcts).map(round2),
                mean_grade: mean(&points).map(|p| grade_for_points(p).grade.to_string()),
            })
        })
        .collect();

    summaries.sort_by(|a, b| a.subject_name.cmp(&b.subject_name));
    summaries
}

pub fn exam_analytics(
    exam: Examination,
    students: &[Student],
    subjects: &[Subject],
    results: &[ExamResult],
) -> ExamAnalyticsResponse {
    let rows = rank_students(exam.max_score, students, results);
    let subjects = summarize_subjects(exam.max_score, subjects, results);

    let averages: Vec<f64> = rows.iter().map(|r| r.average).collect();
    let overall_mean = mean(&averages).map(round2);

    ExamAnalyticsResponse {
        student_count: students.len(),
        overall_grade: overall_mean.map(|m| grade_for_percentage(m).grade.to_string()),
        overall_mean,
        grade_distribution: grade_distribution(&averages),
        subjects,
        students: rows,
        examination: exam,
    }
}

/// 成绩单
///
/// `class_students` 与 `class_results` 为学生所在班级的全部数据，用于计算
/// 班级、分流和单科名次。
pub fn report_card(
    student: Student,
    exam: Examination,
    class_students: &[Student],
    subjects: &[Subject],
    class_results: &[ExamResult],
) -> ReportCardResponse {
    let max_score = exam.max_score;

    let class_rows = rank_students(max_score, class_students, class_results);
    let class_position = class_rows
        .iter()
        .find(|r| r.student_id == student.id)
        .map(|r| r.position);

    // 分流内重新排名
    let (stream_position, stream_size) = match student.stream_id {
        Some(stream_id) => {
            let mut stream_rows: Vec<StudentRankRow> = class_rows
                .iter()
                .filter(|r| r.stream_id == Some(stream_id))
                .cloned()
                .collect();
            assign_positions(&mut stream_rows);
            let position = stream_rows
                .iter()
                .find(|r| r.student_id == student.id)
                .map(|r| r.position);
            (position, stream_rows.len())
        }
        None => (None, 0),
    };

    let subject_names: HashMap<i64, &Subject> = subjects.iter().map(|s| (s.id, s)).collect();

    let mut lines: Vec<ReportCardLine> = class_results
        .iter()
        .filter(|r| r.student_id == student.id)
        .filter_map(|own| {
            let pct = percentage(own.score, max_score)?;
            let band = grade_for_percentage(pct);

            let peers: Vec<&ExamResult> = class_results
                .iter()
                .filter(|r| r.subject_id == own.subject_id)
                .collect();
            let scores: Vec<f64> = peers.iter().map(|r| r.score).collect();
            let ranks = competition_rank(&scores);
            let subject_position = peers
                .iter()
                .position(|r| r.student_id == student.id)
                .map_or(0, |idx| ranks[idx]);

            Some(ReportCardLine {
                subject_id: own.subject_id,
                subject_name: subject_names
                    .get(&own.subject_id)
                    .map(|s| s.name.clone())
                    .unwrap_or_default(),
                score: own.score,
                percentage: round2(pct),
                grade: band.grade.to_string(),
                points: band.points,
                remark: band.remark.to_string(),
                subject_position,
                subject_out_of: peers.len(),
                remarks: own.remarks.clone(),
            })
        })
        .collect();
    lines.sort_by(|a, b| a.subject_name.cmp(&b.subject_name));

    let pcts: Vec<f64> = lines.iter().map(|l| l.percentage).collect();
    let points: Vec<f64> = lines.iter().map(|l| f64::from(l.points)).collect();
    let mean_points = mean(&points);

    ReportCardResponse {
        total: round2(lines.iter().map(|l| l.score).sum()),
        average: mean(&pcts).map(round2),
        mean_points: mean_points.map(round2),
        mean_grade: mean_points.map(|p| grade_for_points(p).grade.to_string()),
        class_position,
        class_size: class_rows.len(),
        stream_position,
        stream_size,
        lines,
        student,
        examination: exam,
    }
}

pub fn test_analytics(test: Test, results: &[TestResult], class_size: usize) -> TestAnalyticsResponse {
    let scores: Vec<f64> = results.iter().map(|r| r.score).collect();
    let pcts: Vec<f64> = scores
        .iter()
        .filter_map(|s| percentage(*s, test.max_score))
        .collect();

    let coverage = if class_size == 0 {
        None
    } else {
        Some(round2(results.len() as f64 / class_size as f64 * 100.0))
    };

    TestAnalyticsResponse {
        summary: summarize(&scores),
        average_percentage: mean(&pcts).map(round2),
        grade_distribution: grade_distribution(&pcts),
        submitted: results.len(),
        class_size,
        coverage,
        test,
    }
}

/// 学生各场考试的平均百分比，按年份、学期开始日期、考试创建时间排序
pub fn student_trend(
    exams: &[Examination],
    terms: &[Term],
    results: &[ExamResult],
) -> Vec<TrendPoint> {
    let terms: HashMap<i64, &Term> = terms.iter().map(|t| (t.id, t)).collect();

    let mut ordered: Vec<&Examination> = exams.iter().collect();
    ordered.sort_by(|a, b| {
        let a_start = terms.get(&a.term_id).map(|t| t.start_date.as_str());
        let b_start = terms.get(&b.term_id).map(|t| t.start_date.as_str());
        a.year
            .cmp(&b.year)
            .then_with(|| a_start.cmp(&b_start))
            .then_with(|| a.created_at.cmp(&b.created_at))
    });

    ordered
        .into_iter()
        .filter_map(|exam| {
            let pcts: Vec<f64> = results
                .iter()
                .filter(|r| r.examination_id == exam.id)
                .filter_map(|r| percentage(r.score, exam.max_score))
                .collect();
            let points: Vec<f64> = pcts
                .iter()
                .map(|p| f64::from(grade_for_percentage(*p).points))
                .collect();
            let average = mean(&pcts)?;

            Some(TrendPoint {
                examination_id: exam.id,
                examination_name: exam.name.clone(),
                year: exam.year,
                term_id: exam.term_id,
                term_name: terms.get(&exam.term_id).map(|t| t.name.clone()),
                subject_count: pcts.len(),
                average_percentage: round2(average),
                mean_grade: mean(&points)
                    .map(|p| grade_for_points(p).grade.to_string())
                    .unwrap_or_default(),
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::class_tests::entities::TestType;
    use chrono::{TimeZone, Utc};

    fn student(id: i64, adm: &str, stream_id: Option<i64>) -> Student {
        Student {
            id,
            school_id: 1,
            user_id: None,
            admission_number: adm.to_string(),
            first_name: format!("First{id}"),
            last_name: format!("Last{id}"),
            gender: None,
            date_of_birth: None,
            class_id: 1,
            stream_id,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn subject(id: i64, name: &str) -> Subject {
        Subject {
            id,
            school_id: 1,
            name: name.to_string(),
            code: name[..3].to_uppercase(),
            created_at: Utc::now(),
        }
    }

    fn exam(id: i64, year: i32, term_id: i64, max_score: f64) -> Examination {
        Examination {
            id,
            school_id: 1,
            term_id,
            name: format!("Exam {id}"),
            year,
            class_id: None,
            max_score,
            start_date: None,
            end_date: None,
            published: true,
            created_at: Utc.timestamp_opt(1_700_000_000 + id, 0).unwrap(),
            updated_at: Utc::now(),
        }
    }

    fn result(student_id: i64, subject_id: i64, examination_id: i64, score: f64) -> ExamResult {
        ExamResult {
            id: student_id * 100 + subject_id,
            student_id,
            subject_id,
            examination_id,
            score,
            remarks: None,
            entered_by: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn term(id: i64, name: &str, start: &str) -> Term {
        Term {
            id,
            school_id: 1,
            name: name.to_string(),
            year: 2024,
            start_date: start.to_string(),
            end_date: start.to_string(),
            is_current: false,
            created_at: Utc::now(),
        }
    }

    fn sample() -> (Vec<Student>, Vec<Subject>, Vec<ExamResult>) {
        let students = vec![
            student(1, "A001", Some(10)),
            student(2, "A002", Some(10)),
            student(3, "A003", Some(20)),
            student(4, "A004", None),
        ];
        let subjects = vec![subject(1, "Mathematics"), subject(2, "English")];
        let results = vec![
            result(1, 1, 1, 90.0),
            result(1, 2, 1, 70.0),
            result(2, 1, 1, 60.0),
            result(2, 2, 1, 100.0),
            result(3, 1, 1, 40.0),
            result(3, 2, 1, 50.0),
        ];
        (students, subjects, results)
    }

    #[test]
    fn test_rank_students_with_ties() {
        let (students, _, results) = sample();
        let rows = rank_students(100.0, &students, &results);

        // 学生 4 没有成绩，不参与排名
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0].student_id, 1);
        assert_eq!(rows[0].position, 1);
        assert_eq!(rows[1].student_id, 2);
        assert_eq!(rows[1].position, 1);
        assert_eq!(rows[2].position, 3);

        assert_eq!(rows[0].total, 160.0);
        assert_eq!(rows[0].average, 80.0);
        // A(12) + B+(10)
        assert_eq!(rows[0].mean_points, 11.0);
        assert_eq!(rows[0].mean_grade, "A-");
        assert_eq!(rows[2].mean_grade, "C-");
    }

    #[test]
    fn test_percentages_use_exam_max_score() {
        let students = vec![student(1, "A001", None)];
        let results = vec![result(1, 1, 1, 40.0)];
        let rows = rank_students(50.0, &students, &results);
        assert_eq!(rows[0].average, 80.0);
        assert_eq!(rows[0].mean_grade, "A");
    }

    #[test]
    fn test_subject_summaries() {
        let (_, subjects, results) = sample();
        let summaries = summarize_subjects(100.0, &subjects, &results);

        assert_eq!(summaries.len(), 2);
        assert_eq!(summaries[0].subject_name, "English");
        let english = summaries[0].summary.as_ref().unwrap();
        assert_eq!(english.count, 3);
        assert_eq!(english.min, 50.0);
        assert_eq!(english.max, 100.0);
        assert_eq!(english.average, 73.33);

        let maths = &summaries[1];
        assert_eq!(maths.average_percentage, Some(63.33));
        // (12 + 8 + 4) / 3 = 8 -> B-
        assert_eq!(maths.mean_grade.as_deref(), Some("B-"));
    }

    #[test]
    fn test_exam_analytics_overall() {
        let (students, subjects, results) = sample();
        let analytics = exam_analytics(exam(1, 2024, 1, 100.0), &students, &subjects, &results);

        assert_eq!(analytics.student_count, 4);
        assert_eq!(analytics.students.len(), 3);
        // (80 + 80 + 45) / 3
        assert_eq!(analytics.overall_mean, Some(68.33));
        assert_eq!(analytics.overall_grade.as_deref(), Some("B"));
        let total: usize = analytics.grade_distribution.iter().map(|g| g.count).sum();
        assert_eq!(total, 3);
    }

    #[test]
    fn test_exam_analytics_empty() {
        let analytics = exam_analytics(exam(1, 2024, 1, 100.0), &[], &[], &[]);
        assert_eq!(analytics.overall_mean, None);
        assert!(analytics.students.is_empty());
        assert!(analytics.subjects.is_empty());
    }

    #[test]
    fn test_report_card_positions() {
        let (students, subjects, results) = sample();
        let card = report_card(
            students[2].clone(),
            exam(1, 2024, 1, 100.0),
            &students,
            &subjects,
            &results,
        );

        assert_eq!(card.lines.len(), 2);
        assert_eq!(card.lines[0].subject_name, "English");
        assert_eq!(card.lines[0].grade, "C");
        assert_eq!(card.lines[0].subject_position, 3);
        assert_eq!(card.lines[0].subject_out_of, 3);
        assert_eq!(card.total, 90.0);
        assert_eq!(card.average, Some(45.0));
        assert_eq!(card.class_position, Some(3));
        assert_eq!(card.class_size, 3);
        // 分流 20 只有自己
        assert_eq!(card.stream_position, Some(1));
        assert_eq!(card.stream_size, 1);
    }

    #[test]
    fn test_report_card_stream_ranking() {
        let (students, subjects, results) = sample();
        let card = report_card(
            students[1].clone(),
            exam(1, 2024, 1, 100.0),
            &students,
            &subjects,
            &results,
        );
        assert_eq!(card.class_position, Some(1));
        assert_eq!(card.stream_position, Some(1));
        assert_eq!(card.stream_size, 2);
        // English 100 是班级第一
        let english = card.lines.iter().find(|l| l.subject_id == 2).unwrap();
        assert_eq!(english.subject_position, 1);
        assert_eq!(english.points, 12);
        assert_eq!(english.remark, "Excellent");
    }

    #[test]
    fn test_report_card_without_results() {
        let (students, subjects, results) = sample();
        let card = report_card(
            students[3].clone(),
            exam(1, 2024, 1, 100.0),
            &students,
            &subjects,
            &results,
        );
        assert!(card.lines.is_empty());
        assert_eq!(card.average, None);
        assert_eq!(card.mean_grade, None);
        assert_eq!(card.class_position, None);
        assert_eq!(card.stream_position, None);
    }

    #[test]
    fn test_test_analytics_coverage() {
        let test = Test {
            id: 1,
            school_id: 1,
            teacher_id: 1,
            class_id: 1,
            subject_id: 1,
            term_id: None,
            title: "CAT 1".to_string(),
            test_type: TestType::Cat,
            max_score: 30.0,
            test_date: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        let results: Vec<TestResult> = [24.0, 15.0, 30.0]
            .iter()
            .enumerate()
            .map(|(i, score)| TestResult {
                id: i as i64 + 1,
                test_id: 1,
                student_id: i as i64 + 1,
                score: *score,
                remarks: None,
                created_at: Utc::now(),
                updated_at: Utc::now(),
            })
            .collect();

        let analytics = test_analytics(test.clone(), &results, 4);
        assert_eq!(analytics.submitted, 3);
        assert_eq!(analytics.coverage, Some(75.0));
        assert_eq!(analytics.summary.as_ref().unwrap().average, 23.0);
        // 80%, 50%, 100%
        assert_eq!(analytics.grade_distribution[0].count, 2);
        assert_eq!(analytics.grade_distribution[6].count, 1);

        let empty = test_analytics(test, &[], 0);
        assert_eq!(empty.coverage, None);
        assert!(empty.summary.is_none());
    }

    #[test]
    fn test_student_trend_ordering() {
        let exams = vec![
            exam(3, 2024, 2, 100.0),
            exam(1, 2023, 1, 100.0),
            exam(2, 2024, 1, 50.0),
            exam(4, 2024, 2, 100.0),
        ];
        let terms = vec![term(1, "Term 1", "2024-01-08"), term(2, "Term 2", "2024-05-06")];
        let results = vec![
            result(1, 1, 1, 60.0),
            result(1, 2, 1, 80.0),
            result(1, 1, 2, 40.0),
            result(1, 1, 3, 30.0),
        ];

        let trend = student_trend(&exams, &terms, &results);
        // 考试 4 没有成绩
        let ids: Vec<i64> = trend.iter().map(|p| p.examination_id).collect();
        assert_eq!(ids, vec![1, 2, 3]);
        assert_eq!(trend[0].average_percentage, 70.0);
        assert_eq!(trend[0].subject_count, 2);
        assert_eq!(trend[1].average_percentage, 80.0);
        assert_eq!(trend[1].term_name.as_deref(), Some("Term 1"));
        assert_eq!(trend[2].mean_grade, "D-");
    }

    #[test]
    fn test_student_trend_latest_follows_term_start() {
        // 考试 9 创建得更晚，但所在学期更早
        let exams = vec![exam(5, 2024, 2, 100.0), exam(9, 2024, 1, 100.0)];
        let terms = vec![term(1, "Term 1", "2024-01-08"), term(2, "Term 2", "2024-05-06")];
        let results = vec![result(1, 1, 5, 90.0), result(1, 1, 9, 30.0)];

        let mut trend = student_trend(&exams, &terms, &results);
        let latest = trend.pop().unwrap();
        assert_eq!(latest.examination_id, 5);
        assert_eq!(latest.average_percentage, 90.0);
        assert_eq!(trend[0].examination_id, 9);
    }
}
