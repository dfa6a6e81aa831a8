//! 基于内存 SQLite 的存储层集成测试

use std::sync::Arc;

use rust_schoolsys::models::{
    classes::requests::CreateClassRequest,
    examinations::requests::{CreateExaminationRequest, ExaminationListQuery},
    results::{entities::ResultUpsert, requests::ResultQuery},
    schools::requests::CreateSchoolRequest,
    students::requests::CreateStudentRequest,
    subjects::requests::CreateSubjectRequest,
    teachers::requests::CreateTeacherRequest,
    terms::requests::{CreateTermRequest, TermQuery},
    timetable::{entities::TimetableSlot, requests::TimetableQuery},
    users::{entities::UserRole, requests::CreateUserRequest},
};
use rust_schoolsys::storage::{Storage, sea_orm_storage::SeaOrmStorage};

struct Fixture {
    storage: Arc<dyn Storage>,
    school_id: i64,
    class_id: i64,
    subject_id: i64,
}

async fn memory_storage() -> Arc<dyn Storage> {
    let storage = SeaOrmStorage::connect_with("sqlite::memory:", 1, 5)
        .await
        .expect("in-memory database should open");
    Arc::new(storage)
}

async fn fixture() -> Fixture {
    let storage = memory_storage().await;

    let school = storage
        .create_school(CreateSchoolRequest {
            name: "Hillside Academy".to_string(),
            code: Some("HILL01".to_string()),
            address: None,
            phone: None,
            email: None,
        })
        .await
        .unwrap();

    let class = storage
        .create_class(CreateClassRequest {
            school_id: school.id,
            name: "Form 2".to_string(),
            level: 2,
            class_teacher_id: None,
        })
        .await
        .unwrap();

    let subject = storage
        .create_subject(CreateSubjectRequest {
            school_id: school.id,
            name: "Mathematics".to_string(),
            code: "MATH".to_string(),
        })
        .await
        .unwrap();

    Fixture {
        storage,
        school_id: school.id,
        class_id: class.id,
        subject_id: subject.id,
    }
}

async fn add_student(fx: &Fixture, admission_number: &str, stream_id: Option<i64>) -> i64 {
    fx.storage
        .create_student(
            fx.school_id,
            CreateStudentRequest {
                admission_number: admission_number.to_string(),
                first_name: "Amina".to_string(),
                last_name: admission_number.to_string(),
                gender: None,
                date_of_birth: Some("2010-04-12".to_string()),
                class_id: fx.class_id,
                stream_id,
                user_id: None,
            },
        )
        .await
        .unwrap()
        .id
}

async fn add_teacher(fx: &Fixture, username: &str) -> i64 {
    let user = fx
        .storage
        .create_user(CreateUserRequest {
            username: username.to_string(),
            email: format!("{username}@school.test"),
            password: "hashed".to_string(),
            role: UserRole::Teacher,
            display_name: None,
            school_id: Some(fx.school_id),
        })
        .await
        .unwrap();

    fx.storage
        .create_teacher(CreateTeacherRequest {
            school_id: fx.school_id,
            user_id: user.id,
            staff_number: None,
            phone: None,
        })
        .await
        .unwrap()
        .id
}

// 每场考试单独建一个学期，学期名在同校同年内唯一
async fn add_examination(fx: &Fixture, name: &str, published: bool) -> i64 {
    let term = fx
        .storage
        .create_term(CreateTermRequest {
            school_id: fx.school_id,
            name: format!("{name} term"),
            year: 2024,
            start_date: "2024-01-08".to_string(),
            end_date: "2024-04-05".to_string(),
            is_current: false,
        })
        .await
        .unwrap();

    fx.storage
        .create_examination(CreateExaminationRequest {
            school_id: fx.school_id,
            term_id: term.id,
            name: name.to_string(),
            year: 2024,
            class_id: None,
            max_score: 100.0,
            start_date: None,
            end_date: None,
            published,
        })
        .await
        .unwrap()
        .id
}

#[tokio::test]
async fn test_first_user_count() {
    let storage = memory_storage().await;
    assert_eq!(storage.count_users().await.unwrap(), 0);

    storage
        .create_user(CreateUserRequest {
            username: "admin".to_string(),
            email: "admin@localhost".to_string(),
            password: "hashed".to_string(),
            role: UserRole::Admin,
            display_name: None,
            school_id: None,
        })
        .await
        .unwrap();
    assert_eq!(storage.count_users().await.unwrap(), 1);
    assert!(storage.get_user_by_username("admin").await.unwrap().is_some());
}

#[tokio::test]
async fn test_admission_number_unique_per_school() {
    let fx = fixture().await;
    add_student(&fx, "ADM-001", None).await;

    let found = fx
        .storage
        .get_student_by_admission_number(fx.school_id, "ADM-001")
        .await
        .unwrap();
    assert!(found.is_some());

    let err = fx
        .storage
        .create_student(
            fx.school_id,
            CreateStudentRequest {
                admission_number: "ADM-001".to_string(),
                first_name: "Other".to_string(),
                last_name: "Pupil".to_string(),
                gender: None,
                date_of_birth: None,
                class_id: fx.class_id,
                stream_id: None,
                user_id: None,
            },
        )
        .await
        .unwrap_err();
    assert!(err.is_unique_violation());
}

#[tokio::test]
async fn test_stream_filter_on_class_roster() {
    let fx = fixture().await;
    let east = fx.storage.create_stream(fx.class_id, "East").await.unwrap();
    let west = fx.storage.create_stream(fx.class_id, "West").await.unwrap();

    add_student(&fx, "ADM-001", Some(east.id)).await;
    add_student(&fx, "ADM-002", Some(west.id)).await;
    add_student(&fx, "ADM-003", Some(east.id)).await;

    let whole = fx
        .storage
        .list_students_by_class(fx.class_id, None)
        .await
        .unwrap();
    assert_eq!(whole.len(), 3);

    let east_only = fx
        .storage
        .list_students_by_class(fx.class_id, Some(east.id))
        .await
        .unwrap();
    assert_eq!(east_only.len(), 2);
    assert!(east_only.iter().all(|s| s.stream_id == Some(east.id)));

    let err = fx.storage.create_stream(fx.class_id, "East").await.unwrap_err();
    assert!(err.is_unique_violation());
}

#[tokio::test]
async fn test_result_upsert_replaces_score() {
    let fx = fixture().await;
    let student_id = add_student(&fx, "ADM-001", None).await;
    let exam_id = add_examination(&fx, "Mid-term", true).await;

    let first = fx
        .storage
        .upsert_result(ResultUpsert {
            student_id,
            subject_id: fx.subject_id,
            examination_id: exam_id,
            score: 55.0,
            remarks: None,
            entered_by: None,
        })
        .await
        .unwrap();

    let second = fx
        .storage
        .upsert_result(ResultUpsert {
            student_id,
            subject_id: fx.subject_id,
            examination_id: exam_id,
            score: 72.5,
            remarks: Some("Improved".to_string()),
            entered_by: None,
        })
        .await
        .unwrap();

    assert_eq!(first.id, second.id);
    assert_eq!(second.score, 72.5);
    assert_eq!(second.remarks.as_deref(), Some("Improved"));

    let all = fx
        .storage
        .list_results(ResultQuery {
            examination_id: Some(exam_id),
            ..Default::default()
        })
        .await
        .unwrap();
    assert_eq!(all.len(), 1);
}

#[tokio::test]
async fn test_bulk_results_filtered_by_class() {
    let fx = fixture().await;
    let exam_id = add_examination(&fx, "End of term", true).await;
    let a = add_student(&fx, "ADM-001", None).await;
    let b = add_student(&fx, "ADM-002", None).await;

    let rows = [(a, 80.0), (b, 64.0)]
        .into_iter()
        .map(|(student_id, score)| ResultUpsert {
            student_id,
            subject_id: fx.subject_id,
            examination_id: exam_id,
            score,
            remarks: None,
            entered_by: None,
        })
        .collect();
    assert_eq!(fx.storage.upsert_results(rows).await.unwrap(), 2);

    let in_class = fx
        .storage
        .list_results(ResultQuery {
            examination_id: Some(exam_id),
            class_id: Some(fx.class_id),
            ..Default::default()
        })
        .await
        .unwrap();
    assert_eq!(in_class.len(), 2);

    let other_class = fx
        .storage
        .list_results(ResultQuery {
            examination_id: Some(exam_id),
            class_id: Some(fx.class_id + 100),
            ..Default::default()
        })
        .await
        .unwrap();
    assert!(other_class.is_empty());
}

#[tokio::test]
async fn test_current_term_is_exclusive() {
    let fx = fixture().await;
    let first = fx
        .storage
        .create_term(CreateTermRequest {
            school_id: fx.school_id,
            name: "Term 1".to_string(),
            year: 2024,
            start_date: "2024-01-08".to_string(),
            end_date: "2024-04-05".to_string(),
            is_current: true,
        })
        .await
        .unwrap();
    let second = fx
        .storage
        .create_term(CreateTermRequest {
            school_id: fx.school_id,
            name: "Term 2".to_string(),
            year: 2024,
            start_date: "2024-05-06".to_string(),
            end_date: "2024-08-02".to_string(),
            is_current: true,
        })
        .await
        .unwrap();

    let current = fx
        .storage
        .list_terms(TermQuery {
            school_id: Some(fx.school_id),
            current_only: true,
            ..Default::default()
        })
        .await
        .unwrap();
    assert_eq!(current.len(), 1);
    assert_eq!(current[0].id, second.id);

    let first = fx.storage.get_term_by_id(first.id).await.unwrap().unwrap();
    assert!(!first.is_current);
}

#[tokio::test]
async fn test_published_filter_and_whole_school_exams() {
    let fx = fixture().await;
    add_examination(&fx, "Mock", false).await;
    let published = add_examination(&fx, "Mid-term", true).await;

    let visible = fx
        .storage
        .list_examinations_with_pagination(ExaminationListQuery {
            page: None,
            size: None,
            school_id: Some(fx.school_id),
            term_id: None,
            class_id: Some(fx.class_id),
            year: None,
            published_only: true,
        })
        .await
        .unwrap();
    assert_eq!(visible.items.len(), 1);
    assert_eq!(visible.items[0].id, published);
}

#[tokio::test]
async fn test_bulk_assign_skips_existing() {
    let fx = fixture().await;
    let teacher_id = add_teacher(&fx, "mwangi").await;
    let science = fx
        .storage
        .create_subject(CreateSubjectRequest {
            school_id: fx.school_id,
            name: "Science".to_string(),
            code: "SCI".to_string(),
        })
        .await
        .unwrap();

    fx.storage
        .create_teacher_subject(teacher_id, fx.subject_id, fx.class_id)
        .await
        .unwrap();

    let (created, skipped) = fx
        .storage
        .bulk_assign_teacher_subjects(teacher_id, fx.class_id, &[fx.subject_id, science.id])
        .await
        .unwrap();
    assert_eq!(created.len(), 1);
    assert_eq!(created[0].subject_id, science.id);
    assert_eq!(skipped, vec![fx.subject_id]);

    let duplicate = fx
        .storage
        .create_teacher_subject(teacher_id, science.id, fx.class_id)
        .await
        .unwrap_err();
    assert!(duplicate.is_unique_violation());
}

#[tokio::test]
async fn test_timetable_entries_ordered_by_day_and_start() {
    let fx = fixture().await;
    let teacher_id = add_teacher(&fx, "otieno").await;

    let slot = |day_of_week: i32, start_minute: i32| TimetableSlot {
        school_id: fx.school_id,
        class_id: fx.class_id,
        stream_id: None,
        subject_id: fx.subject_id,
        teacher_id,
        day_of_week,
        start_minute,
        end_minute: start_minute + 40,
        room: None,
    };

    fx.storage.create_timetable_entry(slot(2, 480)).await.unwrap();
    fx.storage.create_timetable_entry(slot(1, 600)).await.unwrap();
    let first = fx.storage.create_timetable_entry(slot(1, 480)).await.unwrap();
    assert_eq!(first.start_time, "08:00");
    assert_eq!(first.end_time, "08:40");

    let monday = fx
        .storage
        .list_timetable_entries(TimetableQuery {
            school_id: Some(fx.school_id),
            day_of_week: Some(1),
            ..Default::default()
        })
        .await
        .unwrap();
    assert_eq!(monday.len(), 2);
    assert_eq!(monday[0].id, first.id);

    let week = fx
        .storage
        .list_timetable_entries(TimetableQuery {
            teacher_id: Some(teacher_id),
            ..Default::default()
        })
        .await
        .unwrap();
    let order: Vec<(i32, i32)> = week.iter().map(|e| (e.day_of_week, e.start_minute)).collect();
    assert_eq!(order, vec![(1, 480), (1, 600), (2, 480)]);
}
