//! 课程表冲突检测与教师推荐

use std::collections::{HashMap, HashSet};

use crate::models::{
    teachers::entities::TeacherWithUser,
    timetable::{entities::TimetableEntry, entities::TimetableSlot, responses::TeacherSuggestion},
};

/// 半开区间 [start, end) 是否重叠
pub fn overlaps(a_start: i32, a_end: i32, b_start: i32, b_end: i32) -> bool {
    a_start < b_end && b_start < a_end
}

/// 同一班级的两个条目是否占用同一批学生
///
/// 没有分流的条目占用整个班级。
fn same_audience(slot: &TimetableSlot, entry: &TimetableEntry) -> bool {
    if slot.class_id != entry.class_id {
        return false;
    }
    match (slot.stream_id, entry.stream_id) {
        (Some(a), Some(b)) => a == b,
        _ => true,
    }
}

/// 与待写入条目冲突的已有条目 id（升序）
///
/// `exclude_id` 为更新时的条目自身。
pub fn find_conflicts(
    slot: &TimetableSlot,
    existing: &[TimetableEntry],
    exclude_id: Option<i64>,
) -> Vec<i64> {
    let mut ids: Vec<i64> = existing
        .iter()
        .filter(|e| Some(e.id) != exclude_id)
        .filter(|e| e.day_of_week == slot.day_of_week)
        .filter(|e| overlaps(slot.start_minute, slot.end_minute, e.start_minute, e.end_minute))
        .filter(|e| e.teacher_id == slot.teacher_id || same_audience(slot, e))
        .map(|e| e.id)
        .collect();
    ids.sort_unstable();
    ids
}

/// 候选教师中排除该时段已有课的，按每周课时升序、教师 id 升序排列
pub fn suggest_teachers(
    candidates: &[TeacherWithUser],
    week_entries: &[TimetableEntry],
    day_of_week: i32,
    start_minute: i32,
    end_minute: i32,
) -> Vec<TeacherSuggestion> {
    let mut load: HashMap<i64, usize> = HashMap::new();
    let mut busy: HashSet<i64> = HashSet::new();

    for entry in week_entries {
        *load.entry(entry.teacher_id).or_default() += 1;
        if entry.day_of_week == day_of_week
            && overlaps(start_minute, end_minute, entry.start_minute, entry.end_minute)
        {
            busy.insert(entry.teacher_id);
        }
    }

    let mut suggestions: Vec<TeacherSuggestion> = candidates
        .iter()
        .filter(|c| !busy.contains(&c.teacher.id))
        .map(|c| TeacherSuggestion {
            teacher_id: c.teacher.id,
            user_id: c.teacher.user_id,
            display_name: c.display_name.clone().or_else(|| Some(c.username.clone())),
            weekly_lessons: load.get(&c.teacher.id).copied().unwrap_or(0),
        })
        .collect();

    suggestions.sort_by(|a, b| {
        a.weekly_lessons
            .cmp(&b.weekly_lessons)
            .then_with(|| a.teacher_id.cmp(&b.teacher_id))
    });
    suggestions
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::teachers::entities::Teacher;
    use crate::utils::validate::format_time_of_day;

    fn entry(
        id: i64,
        class_id: i64,
        stream_id: Option<i64>,
        teacher_id: i64,
        day: i32,
        start: i32,
        end: i32,
    ) -> TimetableEntry {
        TimetableEntry {
            id,
            school_id: 1,
            class_id,
            stream_id,
            subject_id: 1,
            teacher_id,
            day_of_week: day,
            start_time: format_time_of_day(start),
            end_time: format_time_of_day(end),
            room: None,
            start_minute: start,
            end_minute: end,
            created_at: chrono::Utc::now(),
        }
    }

    fn slot(class_id: i64, stream_id: Option<i64>, teacher_id: i64, day: i32, start: i32, end: i32) -> TimetableSlot {
        TimetableSlot {
            school_id: 1,
            class_id,
            stream_id,
            subject_id: 2,
            teacher_id,
            day_of_week: day,
            start_minute: start,
            end_minute: end,
            room: None,
        }
    }

    fn candidate(id: i64, name: &str) -> TeacherWithUser {
        TeacherWithUser {
            teacher: Teacher {
                id,
                school_id: 1,
                user_id: id + 100,
                staff_number: None,
                phone: None,
                created_at: chrono::Utc::now(),
            },
            username: format!("teacher{id}"),
            email: format!("teacher{id}@example.com"),
            display_name: Some(name.to_string()),
        }
    }

    #[test]
    fn test_half_open_overlap() {
        assert!(overlaps(480, 540, 500, 560));
        assert!(overlaps(480, 540, 480, 540));
        assert!(overlaps(480, 600, 500, 520));
        // 首尾相接不算重叠
        assert!(!overlaps(480, 540, 540, 600));
        assert!(!overlaps(540, 600, 480, 540));
    }

    #[test]
    fn test_teacher_double_booking() {
        let existing = vec![entry(1, 10, None, 7, 1, 480, 540)];
        assert_eq!(find_conflicts(&slot(20, None, 7, 1, 500, 560), &existing, None), vec![1]);
        // 不同日期
        assert!(find_conflicts(&slot(20, None, 7, 2, 500, 560), &existing, None).is_empty());
        // 不同教师、不同班级
        assert!(find_conflicts(&slot(20, None, 8, 1, 500, 560), &existing, None).is_empty());
    }

    #[test]
    fn test_class_and_stream_occupancy() {
        let existing = vec![
            entry(1, 10, Some(100), 7, 1, 480, 540),
            entry(2, 10, Some(200), 8, 1, 600, 660),
        ];

        // 另一个分流同一时间不冲突
        assert!(find_conflicts(&slot(10, Some(200), 9, 1, 480, 540), &existing, None).is_empty());
        // 同一分流冲突
        assert_eq!(
            find_conflicts(&slot(10, Some(100), 9, 1, 500, 520), &existing, None),
            vec![1]
        );
        // 整班条目与任何分流冲突
        assert_eq!(
            find_conflicts(&slot(10, None, 9, 1, 450, 700), &existing, None),
            vec![1, 2]
        );
        let whole_class = vec![entry(3, 10, None, 7, 1, 480, 540)];
        assert_eq!(
            find_conflicts(&slot(10, Some(200), 9, 1, 480, 540), &whole_class, None),
            vec![3]
        );
    }

    #[test]
    fn test_update_excludes_itself() {
        let existing = vec![entry(1, 10, None, 7, 1, 480, 540)];
        assert!(find_conflicts(&slot(10, None, 7, 1, 490, 550), &existing, Some(1)).is_empty());
    }

    #[test]
    fn test_suggestions_skip_busy_and_order_by_load() {
        let candidates = vec![candidate(1, "Alice"), candidate(2, "Bob"), candidate(3, "Carol")];
        let week = vec![
            // 教师 1 周一 08:00-09:00 有课
            entry(1, 10, None, 1, 1, 480, 540),
            entry(2, 11, None, 2, 2, 480, 540),
            entry(3, 12, None, 2, 3, 480, 540),
            entry(4, 12, None, 3, 4, 480, 540),
        ];

        let suggestions = suggest_teachers(&candidates, &week, 1, 500, 560);
        let ids: Vec<i64> = suggestions.iter().map(|s| s.teacher_id).collect();
        assert_eq!(ids, vec![3, 2]);
        assert_eq!(suggestions[0].weekly_lessons, 1);
        assert_eq!(suggestions[1].weekly_lessons, 2);
        assert_eq!(suggestions[0].display_name.as_deref(), Some("Carol"));

        // 时段错开时全部可选，同课时按 id 排序
        let suggestions = suggest_teachers(&candidates, &week, 5, 500, 560);
        let ids: Vec<i64> = suggestions.iter().map(|s| s.teacher_id).collect();
        assert_eq!(ids, vec![1, 3, 2]);
    }
}
