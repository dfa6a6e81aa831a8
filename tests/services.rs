//! 服务层权限与数据约束测试
//!
//! 当前用户写入请求扩展（与 RequireJWT 一致），存储通过 app_data 注入。

use std::sync::Arc;

use actix_web::{HttpMessage, HttpRequest, HttpResponse, http::StatusCode, test::TestRequest, web};
use serde_json::{Value, json};

use rust_schoolsys::models::{
    classes::requests::CreateClassRequest,
    examinations::requests::CreateExaminationRequest,
    results::{
        entities::ResultUpsert,
        requests::{ResultQuery, UpsertResultRequest},
    },
    schools::requests::CreateSchoolRequest,
    students::requests::CreateStudentRequest,
    subjects::requests::CreateSubjectRequest,
    teachers::requests::CreateTeacherRequest,
    terms::requests::CreateTermRequest,
    timetable::entities::TimetableSlot,
    users::{
        entities::{User, UserRole},
        requests::CreateUserRequest,
    },
};
use rust_schoolsys::services::{
    AnalyticsService, ExaminationService, ResultService, TimetableService,
};
use rust_schoolsys::storage::{Storage, sea_orm_storage::SeaOrmStorage};

struct Fixture {
    storage: Arc<dyn Storage>,
    school_id: i64,
    class_id: i64,
    subject_id: i64,
    term_id: i64,
    admin: User,
}

async fn fixture() -> Fixture {
    let storage: Arc<dyn Storage> = Arc::new(
        SeaOrmStorage::connect_with("sqlite::memory:", 1, 5)
            .await
            .expect("in-memory database should open"),
    );

    let school = storage
        .create_school(CreateSchoolRequest {
            name: "Lakeview High".to_string(),
            code: Some("LAKE01".to_string()),
            address: None,
            phone: None,
            email: None,
        })
        .await
        .unwrap();
    let class = storage
        .create_class(CreateClassRequest {
            school_id: school.id,
            name: "Form 1".to_string(),
            level: 1,
            class_teacher_id: None,
        })
        .await
        .unwrap();
    let subject = storage
        .create_subject(CreateSubjectRequest {
            school_id: school.id,
            name: "English".to_string(),
            code: "ENG".to_string(),
        })
        .await
        .unwrap();
    let term = storage
        .create_term(CreateTermRequest {
            school_id: school.id,
            name: "Term 1".to_string(),
            year: 2024,
            start_date: "2024-01-08".to_string(),
            end_date: "2024-04-05".to_string(),
            is_current: true,
        })
        .await
        .unwrap();
    let admin = storage
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

    Fixture {
        storage,
        school_id: school.id,
        class_id: class.id,
        subject_id: subject.id,
        term_id: term.id,
        admin,
    }
}

async fn add_user(fx: &Fixture, username: &str, role: UserRole) -> User {
    fx.storage
        .create_user(CreateUserRequest {
            username: username.to_string(),
            email: format!("{username}@lakeview.test"),
            password: "hashed".to_string(),
            role,
            display_name: None,
            school_id: Some(fx.school_id),
        })
        .await
        .unwrap()
}

async fn add_class(fx: &Fixture, name: &str) -> i64 {
    fx.storage
        .create_class(CreateClassRequest {
            school_id: fx.school_id,
            name: name.to_string(),
            level: 3,
            class_teacher_id: None,
        })
        .await
        .unwrap()
        .id
}

async fn add_student(fx: &Fixture, admission_number: &str, class_id: i64, user_id: Option<i64>) -> i64 {
    fx.storage
        .create_student(
            fx.school_id,
            CreateStudentRequest {
                admission_number: admission_number.to_string(),
                first_name: "Wanjiru".to_string(),
                last_name: admission_number.to_string(),
                gender: None,
                date_of_birth: None,
                class_id,
                stream_id: None,
                user_id,
            },
        )
        .await
        .unwrap()
        .id
}

async fn add_teacher(fx: &Fixture, user: &User) -> i64 {
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

async fn add_examination(fx: &Fixture, name: &str, published: bool) -> i64 {
    fx.storage
        .create_examination(CreateExaminationRequest {
            school_id: fx.school_id,
            term_id: fx.term_id,
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

async fn record(fx: &Fixture, student_id: i64, examination_id: i64, score: f64) {
    fx.storage
        .upsert_result(ResultUpsert {
            student_id,
            subject_id: fx.subject_id,
            examination_id,
            score,
            remarks: None,
            entered_by: None,
        })
        .await
        .unwrap();
}

fn request_as(fx: &Fixture, user: &User) -> HttpRequest {
    let req = TestRequest::default()
        .app_data(web::Data::new(fx.storage.clone()))
        .to_http_request();
    req.extensions_mut().insert(user.clone());
    req
}

async fn body_json(response: HttpResponse) -> Value {
    let bytes = actix_web::body::to_bytes(response.into_body())
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

#[actix_web::test]
async fn test_student_lists_only_own_published_results() {
    let fx = fixture().await;
    let account = add_user(&fx, "wanjiru", UserRole::Student).await;
    let own = add_student(&fx, "ADM-OWN", fx.class_id, Some(account.id)).await;
    let other = add_student(&fx, "ADM-OTHER", fx.class_id, None).await;

    let published = add_examination(&fx, "Opener", true).await;
    let draft = add_examination(&fx, "Mid-term", false).await;
    record(&fx, own, published, 64.0).await;
    record(&fx, own, draft, 70.0).await;
    record(&fx, other, published, 88.0).await;

    // 显式请求其他学生的成绩也只会返回自己的
    let query = ResultQuery {
        student_id: Some(other),
        ..Default::default()
    };
    let response = ResultService::new_lazy()
        .list_results(&request_as(&fx, &account), query)
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    let items = body["data"]["items"].as_array().unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0]["student_id"], json!(own));
    assert_eq!(items[0]["examination_id"], json!(published));
}

#[actix_web::test]
async fn test_teacher_writes_only_for_assigned_class() {
    let fx = fixture().await;
    let other_class = add_class(&fx, "Form 3").await;
    let account = add_user(&fx, "mwangi", UserRole::Teacher).await;
    let teacher_id = add_teacher(&fx, &account).await;
    fx.storage
        .create_teacher_subject(teacher_id, fx.subject_id, fx.class_id)
        .await
        .unwrap();

    let taught = add_student(&fx, "ADM-100", fx.class_id, None).await;
    let untaught = add_student(&fx, "ADM-200", other_class, None).await;
    let exam_id = add_examination(&fx, "End term", false).await;

    let service = ResultService::new_lazy();
    let upsert = |student_id: i64| -> UpsertResultRequest {
        serde_json::from_value(json!({
            "student_id": student_id,
            "subject_id": fx.subject_id,
            "examination_id": exam_id,
            "score": 58.0,
        }))
        .unwrap()
    };

    let denied = service
        .upsert_result(&request_as(&fx, &account), upsert(untaught))
        .await
        .unwrap();
    assert_eq!(denied.status(), StatusCode::FORBIDDEN);

    let saved = service
        .upsert_result(&request_as(&fx, &account), upsert(taught))
        .await
        .unwrap();
    assert_eq!(saved.status(), StatusCode::OK);

    let stored = fx
        .storage
        .list_results(ResultQuery {
            examination_id: Some(exam_id),
            ..Default::default()
        })
        .await
        .unwrap();
    assert_eq!(stored.len(), 1);
    assert_eq!(stored[0].student_id, taught);
    assert_eq!(stored[0].entered_by, Some(account.id));
}

#[actix_web::test]
async fn test_exam_max_score_not_below_recorded_scores() {
    let fx = fixture().await;
    let student_id = add_student(&fx, "ADM-001", fx.class_id, None).await;
    let exam_id = add_examination(&fx, "Mock", true).await;
    record(&fx, student_id, exam_id, 80.0).await;

    let service = ExaminationService::new_lazy();
    let req = request_as(&fx, &fx.admin);

    let rejected = service
        .update_examination(&req, exam_id, serde_json::from_value(json!({ "max_score": 10.0 })).unwrap())
        .await
        .unwrap();
    assert_eq!(rejected.status(), StatusCode::BAD_REQUEST);
    let exam = fx.storage.get_examination_by_id(exam_id).await.unwrap().unwrap();
    assert_eq!(exam.max_score, 100.0);

    let accepted = service
        .update_examination(&req, exam_id, serde_json::from_value(json!({ "max_score": 80.0 })).unwrap())
        .await
        .unwrap();
    assert_eq!(accepted.status(), StatusCode::OK);
    assert_eq!(body_json(accepted).await["data"]["max_score"], json!(80.0));
}

#[actix_web::test]
async fn test_exam_class_change_and_reset_to_whole_school() {
    let fx = fixture().await;
    let other_class = add_class(&fx, "Form 4").await;
    let student_id = add_student(&fx, "ADM-001", fx.class_id, None).await;
    let exam_id = add_examination(&fx, "County mock", false).await;
    record(&fx, student_id, exam_id, 45.0).await;

    let service = ExaminationService::new_lazy();
    let req = request_as(&fx, &fx.admin);

    // 已有成绩的学生不在新班级
    let moved = service
        .update_examination(&req, exam_id, serde_json::from_value(json!({ "class_id": other_class })).unwrap())
        .await
        .unwrap();
    assert_eq!(moved.status(), StatusCode::BAD_REQUEST);

    let narrowed = service
        .update_examination(&req, exam_id, serde_json::from_value(json!({ "class_id": fx.class_id })).unwrap())
        .await
        .unwrap();
    assert_eq!(narrowed.status(), StatusCode::OK);
    assert_eq!(body_json(narrowed).await["data"]["class_id"], json!(fx.class_id));

    // 未提供 class_id 时保持不变
    let renamed = service
        .update_examination(&req, exam_id, serde_json::from_value(json!({ "name": "County mock II" })).unwrap())
        .await
        .unwrap();
    assert_eq!(body_json(renamed).await["data"]["class_id"], json!(fx.class_id));

    let widened = service
        .update_examination(&req, exam_id, serde_json::from_value(json!({ "class_id": null })).unwrap())
        .await
        .unwrap();
    assert_eq!(widened.status(), StatusCode::OK);
    let exam = fx.storage.get_examination_by_id(exam_id).await.unwrap().unwrap();
    assert_eq!(exam.class_id, None);
}

#[actix_web::test]
async fn test_exam_analytics_hidden_from_students() {
    let fx = fixture().await;
    let account = add_user(&fx, "achieng", UserRole::Student).await;
    let own = add_student(&fx, "ADM-OWN", fx.class_id, Some(account.id)).await;
    let other = add_student(&fx, "ADM-OTHER", fx.class_id, None).await;
    let exam_id = add_examination(&fx, "Opener", true).await;
    record(&fx, own, exam_id, 51.0).await;
    record(&fx, other, exam_id, 77.0).await;

    let service = AnalyticsService::new_lazy();

    let denied = service
        .examination_analytics(&request_as(&fx, &account), exam_id, Default::default())
        .await
        .unwrap();
    assert_eq!(denied.status(), StatusCode::FORBIDDEN);
    let body = body_json(denied).await;
    assert!(!body.to_string().contains("ADM-OTHER"));

    let allowed = service
        .examination_analytics(&request_as(&fx, &fx.admin), exam_id, Default::default())
        .await
        .unwrap();
    assert_eq!(allowed.status(), StatusCode::OK);
    let body = body_json(allowed).await;
    assert_eq!(body["data"]["students"].as_array().unwrap().len(), 2);
}

#[actix_web::test]
async fn test_timetable_entry_stream_can_be_cleared() {
    let fx = fixture().await;
    let account = add_user(&fx, "kamau", UserRole::Teacher).await;
    let teacher_id = add_teacher(&fx, &account).await;
    let stream = fx.storage.create_stream(fx.class_id, "North").await.unwrap();

    let entry = fx
        .storage
        .create_timetable_entry(TimetableSlot {
            school_id: fx.school_id,
            class_id: fx.class_id,
            stream_id: Some(stream.id),
            subject_id: fx.subject_id,
            teacher_id,
            day_of_week: 2,
            start_minute: 8 * 60,
            end_minute: 8 * 60 + 40,
            room: Some("Lab 1".to_string()),
        })
        .await
        .unwrap();

    let service = TimetableService::new_lazy();
    let req = request_as(&fx, &fx.admin);

    let kept = service
        .update_entry(&req, entry.id, serde_json::from_value(json!({ "room": "Lab 2" })).unwrap())
        .await
        .unwrap();
    assert_eq!(kept.status(), StatusCode::OK);
    assert_eq!(body_json(kept).await["data"]["stream_id"], json!(stream.id));

    let cleared = service
        .update_entry(&req, entry.id, serde_json::from_value(json!({ "stream_id": null })).unwrap())
        .await
        .unwrap();
    assert_eq!(cleared.status(), StatusCode::OK);

    let stored = fx
        .storage
        .get_timetable_entry_by_id(entry.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(stored.stream_id, None);
    assert_eq!(stored.start_time, "08:00");
}
