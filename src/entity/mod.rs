//! SeaORM 实体定义
//!
//! 这些实体用于数据库操作，与 models 模块中的业务实体分离。
//! Storage 层使用这些实体进行 CRUD 操作，然后转换为 models 中的业务实体。

pub mod prelude;

pub mod class_tests;
pub mod classes;
pub mod examinations;
pub mod results;
pub mod schools;
pub mod streams;
pub mod students;
pub mod subjects;
pub mod teacher_subjects;
pub mod teachers;
pub mod terms;
pub mod test_results;
pub mod timetable_entries;
pub mod users;

use chrono::{DateTime, Utc};

// unix 秒 -> UTC 时间
pub(crate) fn from_timestamp(ts: i64) -> DateTime<Utc> {
    DateTime::<Utc>::from_timestamp(ts, 0).unwrap_or_default()
}
