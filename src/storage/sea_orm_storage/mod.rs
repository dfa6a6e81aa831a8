//! SeaORM 存储实现
//!
//! 统一的数据库存储层，支持 SQLite、PostgreSQL 和 MySQL。

mod class_tests;
mod classes;
mod examinations;
mod results;
mod schools;
mod streams;
mod students;
mod subjects;
mod teacher_subjects;
mod teachers;
mod terms;
mod timetable;
mod users;

use crate::config::AppConfig;
use crate::errors::{Result, SchoolSysError};
use crate::models::PaginationInfo;
use migration::{Migrator, MigratorTrait};
use sea_orm::{ConnectOptions, Database, DatabaseConnection};
use std::time::Duration;
use tracing::info;

/// SeaORM 存储实例
#[derive(Clone)]
pub struct SeaOrmStorage {
    pub(crate) db: DatabaseConnection,
}

impl SeaOrmStorage {
    /// 按全局配置创建存储实例
    pub async fn new_async() -> Result<Self> {
        let config = AppConfig::get();
        Self::connect_with(
            &config.database.url,
            config.database.pool_size,
            config.database.timeout,
        )
        .await
    }

    /// 按给定参数连接数据库并执行迁移
    pub async fn connect_with(url: &str, pool_size: u32, timeout_secs: u64) -> Result<Self> {
        let db_url = Self::build_database_url(url)?;

        // 根据数据库类型选择连接方式
        let db = if db_url.starts_with("sqlite:") {
            Self::connect_sqlite(&db_url, pool_size, timeout_secs).await?
        } else {
            Self::connect_generic(&db_url, pool_size, timeout_secs).await?
        };

        // 运行迁移
        Migrator::up(&db, None)
            .await
            .map_err(|e| SchoolSysError::database_operation(format!("数据库迁移失败: {e}")))?;

        info!("SeaORM 存储初始化完成，数据库: {}", db_url);

        Ok(Self { db })
    }

    /// SQLite 专用连接（WAL + pragma 优化）
    async fn connect_sqlite(
        url: &str,
        pool_size: u32,
        timeout_secs: u64,
    ) -> Result<DatabaseConnection> {
        use sea_orm::SqlxSqliteConnector;
        use sea_orm::sqlx::sqlite::{
            SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous,
        };
        use std::str::FromStr;

        let in_memory = url.contains(":memory:");

        let mut opt = SqliteConnectOptions::from_str(url)
            .map_err(|e| SchoolSysError::database_config(format!("SQLite URL 解析失败: {e}")))?
            .create_if_missing(true)
            .foreign_keys(true)
            .synchronous(SqliteSynchronous::Normal)
            .busy_timeout(Duration::from_secs(5))
            .pragma("cache_size", "-64000")
            .pragma("temp_store", "memory");

        if !in_memory {
            opt = opt
                .journal_mode(SqliteJournalMode::Wal)
                .pragma("mmap_size", "536870912")
                .pragma("wal_autocheckpoint", "1000");
        }

        // 内存库每个连接是独立的数据库，只能保留单连接且不回收
        let pool_options = if in_memory {
            SqlitePoolOptions::new()
                .max_connections(1)
                .min_connections(1)
                .idle_timeout(None)
                .max_lifetime(None)
        } else {
            SqlitePoolOptions::new()
                .max_connections(pool_size)
                .min_connections(1)
                .idle_timeout(Duration::from_secs(300))
        };

        let pool = pool_options
            .test_before_acquire(true)
            .acquire_timeout(Duration::from_secs(timeout_secs))
            .connect_with(opt)
            .await
            .map_err(|e| SchoolSysError::database_connection(format!("SQLite 连接失败: {e}")))?;

        Ok(SqlxSqliteConnector::from_sqlx_sqlite_pool(pool))
    }

    /// 通用连接（PostgreSQL、MySQL 等）
    async fn connect_generic(
        url: &str,
        pool_size: u32,
        timeout_secs: u64,
    ) -> Result<DatabaseConnection> {
        let mut opt = ConnectOptions::new(url);
        opt.max_connections(pool_size)
            .min_connections(pool_size.min(5))
            .connect_timeout(Duration::from_secs(timeout_secs))
            .acquire_timeout(Duration::from_secs(timeout_secs))
            .idle_timeout(Duration::from_secs(600))
            .max_lifetime(Duration::from_secs(1800))
            .sqlx_logging(false)
            .sqlx_logging_level(tracing::log::LevelFilter::Debug);

        Database::connect(opt)
            .await
            .map_err(|e| SchoolSysError::database_connection(format!("无法连接到数据库: {e}")))
    }

    /// 从 URL 自动推断数据库类型并构建连接 URL
    fn build_database_url(url: &str) -> Result<String> {
        if url.starts_with("sqlite:") {
            Ok(url.to_string())
        } else if url == ":memory:" {
            Ok("sqlite::memory:".to_string())
        } else if url.ends_with(".db") || url.ends_with(".sqlite") {
            Ok(format!("sqlite://{url}?mode=rwc"))
        } else if url.starts_with("postgres://")
            || url.starts_with("postgresql://")
            || url.starts_with("mysql://")
            || url.starts_with("mariadb://")
        {
            Ok(url.to_string())
        } else {
            Err(SchoolSysError::database_config(format!(
                "无法从 URL 推断数据库类型: {url}. 支持: sqlite://, postgres://, mysql://, 或 .db/.sqlite 文件路径"
            )))
        }
    }
}

/// 规范化分页参数，返回 (page, size)
pub(crate) fn page_bounds(page: Option<i64>, size: Option<i64>) -> (u64, u64) {
    let page = page.unwrap_or(1).max(1) as u64;
    let size = size.unwrap_or(10).clamp(1, 100) as u64;
    (page, size)
}

pub(crate) fn pagination_info(page: u64, size: u64, total: u64, pages: u64) -> PaginationInfo {
    PaginationInfo {
        page: page as i64,
        page_size: size as i64,
        total: total as i64,
        total_pages: pages as i64,
    }
}

pub(crate) fn now_ts() -> i64 {
    chrono::Utc::now().timestamp()
}

// Storage trait 实现
use crate::models::{
    class_tests::{
        entities::{Test, TestResult, TestResultUpsert},
        requests::{CreateTestRequest, TestListQuery, UpdateTestRequest},
        responses::TestListResponse,
    },
    classes::{
        entities::Class,
        requests::{ClassListQuery, CreateClassRequest, UpdateClassRequest},
        responses::ClassListResponse,
    },
    examinations::{
        entities::Examination,
        requests::{CreateExaminationRequest, ExaminationListQuery, UpdateExaminationRequest},
        responses::ExaminationListResponse,
    },
    results::{
        entities::{ExamResult, ResultUpsert},
        requests::ResultQuery,
    },
    schools::{
        entities::School,
        requests::{CreateSchoolRequest, SchoolListQuery, UpdateSchoolRequest},
        responses::SchoolListResponse,
    },
    streams::entities::Stream,
    students::{
        entities::Student,
        requests::{CreateStudentRequest, StudentListQuery, UpdateStudentRequest},
        responses::StudentListResponse,
    },
    subjects::{
        entities::Subject,
        requests::{CreateSubjectRequest, SubjectListQuery, UpdateSubjectRequest},
        responses::SubjectListResponse,
    },
    teacher_subjects::{entities::TeacherSubject, requests::TeacherSubjectQuery},
    teachers::{
        entities::{Teacher, TeacherWithUser},
        requests::{CreateTeacherRequest, TeacherListQuery, UpdateTeacherRequest},
        responses::TeacherListResponse,
    },
    terms::{
        entities::Term,
        requests::{CreateTermRequest, TermQuery, UpdateTermRequest},
    },
    timetable::{
        entities::{TimetableEntry, TimetableSlot},
        requests::TimetableQuery,
    },
    users::{
        entities::User,
        requests::{CreateUserRequest, UpdateUserRequest, UserListQuery},
        responses::UserListResponse,
    },
};
use crate::storage::Storage;
use async_trait::async_trait;

#[async_trait]
impl Storage for SeaOrmStorage {
    // 用户模块
    async fn create_user(&self, user: CreateUserRequest) -> Result<User> {
        self.create_user_impl(user).await
    }

    async fn get_user_by_id(&self, id: i64) -> Result<Option<User>> {
        self.get_user_by_id_impl(id).await
    }

    async fn get_user_by_username(&self, username: &str) -> Result<Option<User>> {
        self.get_user_by_username_impl(username).await
    }

    async fn get_user_by_email(&self, email: &str) -> Result<Option<User>> {
        self.get_user_by_email_impl(email).await
    }

    async fn get_user_by_username_or_email(&self, identifier: &str) -> Result<Option<User>> {
        self.get_user_by_username_or_email_impl(identifier).await
    }

    async fn list_users_with_pagination(&self, query: UserListQuery) -> Result<UserListResponse> {
        self.list_users_with_pagination_impl(query).await
    }

    async fn update_user(&self, id: i64, update: UpdateUserRequest) -> Result<Option<User>> {
        self.update_user_impl(id, update).await
    }

    async fn delete_user(&self, id: i64) -> Result<bool> {
        self.delete_user_impl(id).await
    }

    async fn update_last_login(&self, id: i64) -> Result<bool> {
        self.update_last_login_impl(id).await
    }

    async fn count_users(&self) -> Result<u64> {
        self.count_users_impl().await
    }

    // 学校模块
    async fn create_school(&self, school: CreateSchoolRequest) -> Result<School> {
        self.create_school_impl(school).await
    }

    async fn get_school_by_id(&self, id: i64) -> Result<Option<School>> {
        self.get_school_by_id_impl(id).await
    }

    async fn get_school_by_code(&self, code: &str) -> Result<Option<School>> {
        self.get_school_by_code_impl(code).await
    }

    async fn list_schools_with_pagination(
        &self,
        query: SchoolListQuery,
    ) -> Result<SchoolListResponse> {
        self.list_schools_with_pagination_impl(query).await
    }

    async fn update_school(
        &self,
        id: i64,
        update: UpdateSchoolRequest,
    ) -> Result<Option<School>> {
        self.update_school_impl(id, update).await
    }

    async fn delete_school(&self, id: i64) -> Result<bool> {
        self.delete_school_impl(id).await
    }

    async fn count_schools(&self) -> Result<u64> {
        self.count_schools_impl().await
    }

    // 班级模块
    async fn create_class(&self, class: CreateClassRequest) -> Result<Class> {
        self.create_class_impl(class).await
    }

    async fn get_class_by_id(&self, class_id: i64) -> Result<Option<Class>> {
        self.get_class_by_id_impl(class_id).await
    }

    async fn list_classes_with_pagination(
        &self,
        query: ClassListQuery,
    ) -> Result<ClassListResponse> {
        self.list_classes_with_pagination_impl(query).await
    }

    async fn update_class(
        &self,
        class_id: i64,
        update: UpdateClassRequest,
    ) -> Result<Option<Class>> {
        self.update_class_impl(class_id, update).await
    }

    async fn delete_class(&self, class_id: i64) -> Result<bool> {
        self.delete_class_impl(class_id).await
    }

    async fn count_classes(&self, school_id: Option<i64>) -> Result<u64> {
        self.count_classes_impl(school_id).await
    }

    // 分流模块
    async fn create_stream(&self, class_id: i64, name: &str) -> Result<Stream> {
        self.create_stream_impl(class_id, name).await
    }

    async fn get_stream_by_id(&self, stream_id: i64) -> Result<Option<Stream>> {
        self.get_stream_by_id_impl(stream_id).await
    }

    async fn list_streams_by_class(&self, class_id: i64) -> Result<Vec<Stream>> {
        self.list_streams_by_class_impl(class_id).await
    }

    async fn update_stream(&self, stream_id: i64, name: &str) -> Result<Option<Stream>> {
        self.update_stream_impl(stream_id, name).await
    }

    async fn delete_stream(&self, stream_id: i64) -> Result<bool> {
        self.delete_stream_impl(stream_id).await
    }

    // 学生模块
    async fn create_student(
        &self,
        school_id: i64,
        student: CreateStudentRequest,
    ) -> Result<Student> {
        self.create_student_impl(school_id, student).await
    }

    async fn get_student_by_id(&self, id: i64) -> Result<Option<Student>> {
        self.get_student_by_id_impl(id).await
    }

    async fn get_student_by_user_id(&self, user_id: i64) -> Result<Option<Student>> {
        self.get_student_by_user_id_impl(user_id).await
    }

    async fn get_student_by_admission_number(
        &self,
        school_id: i64,
        admission_number: &str,
    ) -> Result<Option<Student>> {
        self.get_student_by_admission_number_impl(school_id, admission_number)
            .await
    }

    async fn list_students_with_pagination(
        &self,
        query: StudentListQuery,
    ) -> Result<StudentListResponse> {
        self.list_students_with_pagination_impl(query).await
    }

    async fn list_students_by_class(
        &self,
        class_id: i64,
        stream_id: Option<i64>,
    ) -> Result<Vec<Student>> {
        self.list_students_by_class_impl(class_id, stream_id).await
    }

    async fn list_students_by_school(&self, school_id: i64) -> Result<Vec<Student>> {
        self.list_students_by_school_impl(school_id).await
    }

    async fn list_students_by_ids(&self, ids: &[i64]) -> Result<Vec<Student>> {
        self.list_students_by_ids_impl(ids).await
    }

    async fn update_student(
        &self,
        id: i64,
        update: UpdateStudentRequest,
    ) -> Result<Option<Student>> {
        self.update_student_impl(id, update).await
    }

    async fn delete_student(&self, id: i64) -> Result<bool> {
        self.delete_student_impl(id).await
    }

    async fn count_students(&self, school_id: Option<i64>) -> Result<u64> {
        self.count_students_impl(school_id).await
    }

    // 科目模块
    async fn create_subject(&self, subject: CreateSubjectRequest) -> Result<Subject> {
        self.create_subject_impl(subject).await
    }

    async fn get_subject_by_id(&self, id: i64) -> Result<Option<Subject>> {
        self.get_subject_by_id_impl(id).await
    }

    async fn list_subjects_with_pagination(
        &self,
        query: SubjectListQuery,
    ) -> Result<SubjectListResponse> {
        self.list_subjects_with_pagination_impl(query).await
    }

    async fn list_subjects_by_ids(&self, ids: &[i64]) -> Result<Vec<Subject>> {
        self.list_subjects_by_ids_impl(ids).await
    }

    async fn update_subject(
        &self,
        id: i64,
        update: UpdateSubjectRequest,
    ) -> Result<Option<Subject>> {
        self.update_subject_impl(id, update).await
    }

    async fn delete_subject(&self, id: i64) -> Result<bool> {
        self.delete_subject_impl(id).await
    }

    async fn count_subjects(&self, school_id: Option<i64>) -> Result<u64> {
        self.count_subjects_impl(school_id).await
    }

    // 教师模块
    async fn create_teacher(&self, teacher: CreateTeacherRequest) -> Result<Teacher> {
        self.create_teacher_impl(teacher).await
    }

    async fn get_teacher_by_id(&self, id: i64) -> Result<Option<Teacher>> {
        self.get_teacher_by_id_impl(id).await
    }

    async fn get_teacher_by_user_id(&self, user_id: i64) -> Result<Option<Teacher>> {
        self.get_teacher_by_user_id_impl(user_id).await
    }

    async fn list_teachers_with_pagination(
        &self,
        query: TeacherListQuery,
    ) -> Result<TeacherListResponse> {
        self.list_teachers_with_pagination_impl(query).await
    }

    async fn list_teachers_with_user_by_ids(&self, ids: &[i64]) -> Result<Vec<TeacherWithUser>> {
        self.list_teachers_with_user_by_ids_impl(ids).await
    }

    async fn update_teacher(
        &self,
        id: i64,
        update: UpdateTeacherRequest,
    ) -> Result<Option<Teacher>> {
        self.update_teacher_impl(id, update).await
    }

    async fn delete_teacher(&self, id: i64) -> Result<bool> {
        self.delete_teacher_impl(id).await
    }

    async fn count_teachers(&self, school_id: Option<i64>) -> Result<u64> {
        self.count_teachers_impl(school_id).await
    }

    // 任课分配模块
    async fn create_teacher_subject(
        &self,
        teacher_id: i64,
        subject_id: i64,
        class_id: i64,
    ) -> Result<TeacherSubject> {
        self.create_teacher_subject_impl(teacher_id, subject_id, class_id)
            .await
    }

    async fn find_teacher_subject(
        &self,
        teacher_id: i64,
        subject_id: i64,
        class_id: i64,
    ) -> Result<Option<TeacherSubject>> {
        self.find_teacher_subject_impl(teacher_id, subject_id, class_id)
            .await
    }

    async fn list_teacher_subjects(
        &self,
        query: TeacherSubjectQuery,
    ) -> Result<Vec<TeacherSubject>> {
        self.list_teacher_subjects_impl(query).await
    }

    async fn bulk_assign_teacher_subjects(
        &self,
        teacher_id: i64,
        class_id: i64,
        subject_ids: &[i64],
    ) -> Result<(Vec<TeacherSubject>, Vec<i64>)> {
        self.bulk_assign_teacher_subjects_impl(teacher_id, class_id, subject_ids)
            .await
    }

    async fn delete_teacher_subject(&self, id: i64) -> Result<bool> {
        self.delete_teacher_subject_impl(id).await
    }

    // 学期模块
    async fn create_term(&self, term: CreateTermRequest) -> Result<Term> {
        self.create_term_impl(term).await
    }

    async fn get_term_by_id(&self, id: i64) -> Result<Option<Term>> {
        self.get_term_by_id_impl(id).await
    }

    async fn list_terms(&self, query: TermQuery) -> Result<Vec<Term>> {
        self.list_terms_impl(query).await
    }

    async fn list_terms_by_ids(&self, ids: &[i64]) -> Result<Vec<Term>> {
        self.list_terms_by_ids_impl(ids).await
    }

    async fn update_term(&self, id: i64, update: UpdateTermRequest) -> Result<Option<Term>> {
        self.update_term_impl(id, update).await
    }

    async fn delete_term(&self, id: i64) -> Result<bool> {
        self.delete_term_impl(id).await
    }

    // 考试模块
    async fn create_examination(&self, exam: CreateExaminationRequest) -> Result<Examination> {
        self.create_examination_impl(exam).await
    }

    async fn get_examination_by_id(&self, id: i64) -> Result<Option<Examination>> {
        self.get_examination_by_id_impl(id).await
    }

    async fn list_examinations_with_pagination(
        &self,
        query: ExaminationListQuery,
    ) -> Result<ExaminationListResponse> {
        self.list_examinations_with_pagination_impl(query).await
    }

    async fn list_examinations_by_ids(&self, ids: &[i64]) -> Result<Vec<Examination>> {
        self.list_examinations_by_ids_impl(ids).await
    }

    async fn update_examination(
        &self,
        id: i64,
        update: UpdateExaminationRequest,
    ) -> Result<Option<Examination>> {
        self.update_examination_impl(id, update).await
    }

    async fn delete_examination(&self, id: i64) -> Result<bool> {
        self.delete_examination_impl(id).await
    }

    async fn count_examinations(&self, school_id: Option<i64>) -> Result<u64> {
        self.count_examinations_impl(school_id).await
    }

    // 考试成绩模块
    async fn upsert_result(&self, result: ResultUpsert) -> Result<ExamResult> {
        self.upsert_result_impl(result).await
    }

    async fn upsert_results(&self, results: Vec<ResultUpsert>) -> Result<usize> {
        self.upsert_results_impl(results).await
    }

    async fn get_result_by_id(&self, id: i64) -> Result<Option<ExamResult>> {
        self.get_result_by_id_impl(id).await
    }

    async fn list_results(&self, query: ResultQuery) -> Result<Vec<ExamResult>> {
        self.list_results_impl(query).await
    }

    async fn delete_result(&self, id: i64) -> Result<bool> {
        self.delete_result_impl(id).await
    }

    async fn count_results_entered_by(&self, user_id: i64) -> Result<u64> {
        self.count_results_entered_by_impl(user_id).await
    }

    // 测验模块
    async fn create_test(
        &self,
        school_id: i64,
        teacher_id: i64,
        test: CreateTestRequest,
    ) -> Result<Test> {
        self.create_test_impl(school_id, teacher_id, test).await
    }

    async fn get_test_by_id(&self, id: i64) -> Result<Option<Test>> {
        self.get_test_by_id_impl(id).await
    }

    async fn list_tests_with_pagination(&self, query: TestListQuery) -> Result<TestListResponse> {
        self.list_tests_with_pagination_impl(query).await
    }

    async fn update_test(&self, id: i64, update: UpdateTestRequest) -> Result<Option<Test>> {
        self.update_test_impl(id, update).await
    }

    async fn delete_test(&self, id: i64) -> Result<bool> {
        self.delete_test_impl(id).await
    }

    async fn count_tests(&self, teacher_id: Option<i64>) -> Result<u64> {
        self.count_tests_impl(teacher_id).await
    }

    async fn list_test_results(&self, test_id: i64) -> Result<Vec<TestResult>> {
        self.list_test_results_impl(test_id).await
    }

    async fn upsert_test_results(&self, results: Vec<TestResultUpsert>) -> Result<usize> {
        self.upsert_test_results_impl(results).await
    }

    async fn get_test_result_by_id(&self, id: i64) -> Result<Option<TestResult>> {
        self.get_test_result_by_id_impl(id).await
    }

    async fn delete_test_result(&self, id: i64) -> Result<bool> {
        self.delete_test_result_impl(id).await
    }

    async fn count_test_results_for_student(&self, student_id: i64) -> Result<u64> {
        self.count_test_results_for_student_impl(student_id).await
    }

    // 课程表模块
    async fn create_timetable_entry(&self, slot: TimetableSlot) -> Result<TimetableEntry> {
        self.create_timetable_entry_impl(slot).await
    }

    async fn get_timetable_entry_by_id(&self, id: i64) -> Result<Option<TimetableEntry>> {
        self.get_timetable_entry_by_id_impl(id).await
    }

    async fn list_timetable_entries(&self, query: TimetableQuery) -> Result<Vec<TimetableEntry>> {
        self.list_timetable_entries_impl(query).await
    }

    async fn update_timetable_entry(
        &self,
        id: i64,
        slot: TimetableSlot,
    ) -> Result<Option<TimetableEntry>> {
        self.update_timetable_entry_impl(id, slot).await
    }

    async fn delete_timetable_entry(&self, id: i64) -> Result<bool> {
        self.delete_timetable_entry_impl(id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_database_url() {
        assert_eq!(
            SeaOrmStorage::build_database_url("school.db").unwrap(),
            "sqlite://school.db?mode=rwc"
        );
        assert_eq!(
            SeaOrmStorage::build_database_url(":memory:").unwrap(),
            "sqlite::memory:"
        );
        assert_eq!(
            SeaOrmStorage::build_database_url("sqlite::memory:").unwrap(),
            "sqlite::memory:"
        );
        assert!(SeaOrmStorage::build_database_url("postgres://u:p@localhost/db").is_ok());
        assert!(SeaOrmStorage::build_database_url("ftp://nope").is_err());
    }

    #[test]
    fn test_page_bounds() {
        assert_eq!(page_bounds(None, None), (1, 10));
        assert_eq!(page_bounds(Some(0), Some(500)), (1, 100));
        assert_eq!(page_bounds(Some(3), Some(0)), (3, 1));
    }
}
