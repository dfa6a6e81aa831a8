pub mod analytics;
pub mod auth;
pub mod class_tests;
pub mod classes;
pub mod common;
pub mod dashboard;
pub mod examinations;
pub mod results;
pub mod schools;
pub mod streams;
pub mod students;
pub mod subjects;
pub mod teacher_subjects;
pub mod teachers;
pub mod terms;
pub mod timetable;
pub mod users;

pub use common::{ApiResponse, ErrorCode, PaginatedResponse, PaginationInfo, PaginationQuery};

