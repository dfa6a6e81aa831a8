//! 等级评定与成绩统计
//!
//! 纯函数，不访问存储。百分比按固定的 12 档分段映射为等级与积分，
//! 成绩单上的平均等级由平均积分四舍五入后反查。

use crate::models::analytics::entities::{GradeCount, ScoreSummary};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GradeBand {
    /// 该档的最低百分比（含）
    pub min_percentage: f64,
    pub grade: &'static str,
    pub points: u8,
    pub remark: &'static str,
}

const fn band(min_percentage: f64, grade: &'static str, points: u8, remark: &'static str) -> GradeBand {
    GradeBand {
        min_percentage,
        grade,
        points,
        remark,
    }
}

/// 按分数从高到低排列
pub const GRADE_BANDS: [GradeBand; 12] = [
    band(80.0, "A", 12, "Excellent"),
    band(75.0, "A-", 11, "Very Good"),
    band(70.0, "B+", 10, "Good"),
    band(65.0, "B", 9, "Good"),
    band(60.0, "B-", 8, "Above Average"),
    band(55.0, "C+", 7, "Average"),
    band(50.0, "C", 6, "Average"),
    band(45.0, "C-", 5, "Below Average"),
    band(40.0, "D+", 4, "Weak"),
    band(35.0, "D", 3, "Weak"),
    band(30.0, "D-", 2, "Poor"),
    band(0.0, "E", 1, "Very Poor"),
];

const LOWEST: &GradeBand = &GRADE_BANDS[GRADE_BANDS.len() - 1];

/// 保留两位小数
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// 得分占满分的百分比；满分不为正数时返回 None
pub fn percentage(score: f64, max_score: f64) -> Option<f64> {
    if max_score.is_nan() || max_score <= 0.0 || !score.is_finite() {
        return None;
    }
    Some(score / max_score * 100.0)
}

pub fn grade_for_percentage(percentage: f64) -> &'static GradeBand {
    GRADE_BANDS
        .iter()
        .find(|b| percentage >= b.min_percentage)
        .unwrap_or(LOWEST)
}

pub fn grade_for_score(score: f64, max_score: f64) -> Option<&'static GradeBand> {
    percentage(score, max_score).map(grade_for_percentage)
}

/// 平均积分四舍五入后反查等级（积分范围 1..=12）
pub fn grade_for_points(mean_points: f64) -> &'static GradeBand {
    if !mean_points.is_finite() {
        return LOWEST;
    }
    let points = mean_points.round().clamp(1.0, 12.0) as u8;
    GRADE_BANDS
        .iter()
        .find(|b| b.points == points)
        .unwrap_or(LOWEST)
}

pub fn summarize(scores: &[f64]) -> Option<ScoreSummary> {
    if scores.is_empty() {
        return None;
    }

    let sum: f64 = scores.iter().sum();
    let min = scores.iter().copied().fold(f64::INFINITY, f64::min);
    let max = scores.iter().copied().fold(f64::NEG_INFINITY, f64::max);

    Some(ScoreSummary {
        count: scores.len(),
        average: round2(sum / scores.len() as f64),
        min,
        max,
    })
}

/// 平均值（不取整）
pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        None
    } else {
        Some(values.iter().sum::<f64>() / values.len() as f64)
    }
}

/// 各等级人数，按分段顺序输出，没有人的等级计 0
pub fn grade_distribution(percentages: &[f64]) -> Vec<GradeCount> {
    let mut counts = [0usize; GRADE_BANDS.len()];
    for pct in percentages {
        let grade = grade_for_percentage(*pct);
        if let Some(idx) = GRADE_BANDS.iter().position(|b| b.grade == grade.grade) {
            counts[idx] += 1;
        }
    }

    GRADE_BANDS
        .iter()
        .zip(counts)
        .map(|(band, count)| GradeCount {
            grade: band.grade.to_string(),
            count,
        })
        .collect()
}

/// 竞赛排名（1, 2, 2, 4），按数值降序
///
/// 返回值与输入下标一一对应。
pub fn competition_rank(values: &[f64]) -> Vec<usize> {
    let mut order: Vec<usize> = (0..values.len()).collect();
    order.sort_by(|a, b| values[*b].total_cmp(&values[*a]));

    let mut ranks = vec![0; values.len()];
    for (pos, &idx) in order.iter().enumerate() {
        ranks[idx] = match pos {
            0 => 1,
            _ => {
                let prev = order[pos - 1];
                if values[prev] == values[idx] {
                    ranks[prev]
                } else {
                    pos + 1
                }
            }
        };
    }
    ranks
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_percentage() {
        assert_eq!(percentage(45.0, 50.0), Some(90.0));
        assert_eq!(percentage(0.0, 100.0), Some(0.0));
        assert_eq!(percentage(10.0, 0.0), None);
        assert_eq!(percentage(10.0, -5.0), None);
        assert_eq!(percentage(f64::NAN, 100.0), None);
    }

    #[test]
    fn test_band_boundaries() {
        let cases = [
            (100.0, "A"),
            (85.0, "A"),
            (80.0, "A"),
            (79.99, "A-"),
            (75.0, "A-"),
            (70.0, "B+"),
            (65.0, "B"),
            (60.0, "B-"),
            (55.0, "C+"),
            (50.0, "C"),
            (45.0, "C-"),
            (40.0, "D+"),
            (35.0, "D"),
            (30.0, "D-"),
            (29.99, "E"),
            (0.0, "E"),
        ];
        for (pct, grade) in cases {
            assert_eq!(grade_for_percentage(pct).grade, grade, "pct = {pct}");
        }
    }

    #[test]
    fn test_band_points_and_remarks() {
        let a = grade_for_percentage(85.0);
        assert_eq!(a.points, 12);
        assert_eq!(a.remark, "Excellent");

        let e = grade_for_percentage(10.0);
        assert_eq!(e.points, 1);
        assert_eq!(e.remark, "Very Poor");

        // 负数与 NaN 落到最低档
        assert_eq!(grade_for_percentage(-3.0).grade, "E");
        assert_eq!(grade_for_percentage(f64::NAN).grade, "E");
    }

    #[test]
    fn test_grade_for_score_uses_max_score() {
        assert_eq!(grade_for_score(34.0, 40.0).map(|b| b.grade), Some("A"));
        assert_eq!(grade_for_score(20.0, 40.0).map(|b| b.grade), Some("C"));
        assert!(grade_for_score(20.0, 0.0).is_none());
    }

    #[test]
    fn test_grade_for_points() {
        assert_eq!(grade_for_points(12.0).grade, "A");
        assert_eq!(grade_for_points(10.4).grade, "B+");
        assert_eq!(grade_for_points(10.5).grade, "A-");
        assert_eq!(grade_for_points(6.0).grade, "C");
        assert_eq!(grade_for_points(0.2).grade, "E");
        assert_eq!(grade_for_points(15.0).grade, "A");
    }

    #[test]
    fn test_summarize() {
        assert!(summarize(&[]).is_none());

        let summary = summarize(&[70.0, 80.0, 85.5]).unwrap();
        assert_eq!(summary.count, 3);
        assert_eq!(summary.average, 78.5);
        assert_eq!(summary.min, 70.0);
        assert_eq!(summary.max, 85.5);

        let summary = summarize(&[1.0, 2.0, 2.0]).unwrap();
        assert_eq!(summary.average, 1.67);
    }

    #[test]
    fn test_distribution_is_zero_filled_in_band_order() {
        let dist = grade_distribution(&[85.0, 90.0, 52.0, 10.0]);
        assert_eq!(dist.len(), 12);
        assert_eq!(dist[0].grade, "A");
        assert_eq!(dist[0].count, 2);
        assert_eq!(dist[6].grade, "C");
        assert_eq!(dist[6].count, 1);
        assert_eq!(dist[11].grade, "E");
        assert_eq!(dist[11].count, 1);
        assert_eq!(dist.iter().map(|g| g.count).sum::<usize>(), 4);

        assert!(grade_distribution(&[]).iter().all(|g| g.count == 0));
    }

    #[test]
    fn test_competition_rank() {
        assert_eq!(competition_rank(&[90.0, 80.0, 80.0, 70.0]), vec![1, 2, 2, 4]);
        assert_eq!(competition_rank(&[50.0, 70.0, 70.0, 90.0]), vec![4, 2, 2, 1]);
        assert_eq!(competition_rank(&[60.0, 60.0, 60.0]), vec![1, 1, 1]);
        assert!(competition_rank(&[]).is_empty());
    }

    #[test]
    fn test_round2() {
        assert_eq!(round2(78.456), 78.46);
        assert_eq!(round2(78.0), 78.0);
    }
}
