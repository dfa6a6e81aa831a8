pub mod auth;

pub mod users;

pub mod schools;

pub mod classes;

pub mod students;

pub mod subjects;

pub mod teachers;

pub mod teacher_subjects;

pub mod terms;

pub mod examinations;

pub mod results;

pub mod tests;

pub mod analytics;

pub mod timetable;

pub use analytics::configure_analytics_routes;
pub use auth::configure_auth_routes;
pub use classes::configure_classes_routes;
pub use examinations::configure_examinations_routes;
pub use results::configure_results_routes;
pub use schools::configure_schools_routes;
pub use students::configure_students_routes;
pub use subjects::configure_subjects_routes;
pub use teacher_subjects::configure_teacher_subjects_routes;
pub use teachers::configure_teachers_routes;
pub use terms::configure_terms_routes;
pub use tests::configure_tests_routes;
pub use timetable::configure_timetable_routes;
pub use users::configure_user_routes;
