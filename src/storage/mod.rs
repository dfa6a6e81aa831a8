use std::sync::Arc;

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

use crate::errors::Result;

pub mod sea_orm_storage;

#[async_trait::async_trait]
pub trait Storage: Send + Sync {
    /// 用户管理方法
    // 创建用户（password 字段为已哈希的密码）
    async fn create_user(&self, user: CreateUserRequest) -> Result<User>;
    // 通过ID获取用户信息
    async fn get_user_by_id(&self, id: i64) -> Result<Option<User>>;
    // 通过用户名获取用户信息
    async fn get_user_by_username(&self, username: &str) -> Result<Option<User>>;
    // 通过邮箱获取用户信息
    async fn get_user_by_email(&self, email: &str) -> Result<Option<User>>;
    // 通过用户名或邮箱获取用户信息
    async fn get_user_by_username_or_email(&self, identifier: &str) -> Result<Option<User>>;
    // 列出用户
    async fn list_users_with_pagination(&self, query: UserListQuery) -> Result<UserListResponse>;
    // 更新用户信息
    async fn update_user(&self, id: i64, update: UpdateUserRequest) -> Result<Option<User>>;
    // 删除用户
    async fn delete_user(&self, id: i64) -> Result<bool>;
    // 更新用户最后登录时间
    async fn update_last_login(&self, id: i64) -> Result<bool>;
    // 统计用户数量
    async fn count_users(&self) -> Result<u64>;

    /// 学校管理方法
    // 创建学校（code 由服务层确定）
    async fn create_school(&self, school: CreateSchoolRequest) -> Result<School>;
    async fn get_school_by_id(&self, id: i64) -> Result<Option<School>>;
    async fn get_school_by_code(&self, code: &str) -> Result<Option<School>>;
    async fn list_schools_with_pagination(
        &self,
        query: SchoolListQuery,
    ) -> Result<SchoolListResponse>;
    async fn update_school(&self, id: i64, update: UpdateSchoolRequest)
    -> Result<Option<School>>;
    async fn delete_school(&self, id: i64) -> Result<bool>;
    async fn count_schools(&self) -> Result<u64>;

    /// 班级管理方法
    async fn create_class(&self, class: CreateClassRequest) -> Result<Class>;
    async fn get_class_by_id(&self, class_id: i64) -> Result<Option<Class>>;
    async fn list_classes_with_pagination(
        &self,
        query: ClassListQuery,
    ) -> Result<ClassListResponse>;
    async fn update_class(
        &self,
        class_id: i64,
        update: UpdateClassRequest,
    ) -> Result<Option<Class>>;
    async fn delete_class(&self, class_id: i64) -> Result<bool>;
    async fn count_classes(&self, school_id: Option<i64>) -> Result<u64>;

    /// 分流管理方法
    async fn create_stream(&self, class_id: i64, name: &str) -> Result<Stream>;
    async fn get_stream_by_id(&self, stream_id: i64) -> Result<Option<Stream>>;
    async fn list_streams_by_class(&self, class_id: i64) -> Result<Vec<Stream>>;
    async fn update_stream(&self, stream_id: i64, name: &str) -> Result<Option<Stream>>;
    async fn delete_stream(&self, stream_id: i64) -> Result<bool>;

    /// 学生管理方法
    async fn create_student(&self, school_id: i64, student: CreateStudentRequest)
    -> Result<Student>;
    async fn get_student_by_id(&self, id: i64) -> Result<Option<Student>>;
    async fn get_student_by_user_id(&self, user_id: i64) -> Result<Option<Student>>;
    async fn get_student_by_admission_number(
        &self,
        school_id: i64,
        admission_number: &str,
    ) -> Result<Option<Student>>;
    async fn list_students_with_pagination(
        &self,
        query: StudentListQuery,
    ) -> Result<StudentListResponse>;
    // 列出班级（可选分流）全部学生
    async fn list_students_by_class(
        &self,
        class_id: i64,
        stream_id: Option<i64>,
    ) -> Result<Vec<Student>>;
    async fn list_students_by_school(&self, school_id: i64) -> Result<Vec<Student>>;
    async fn list_students_by_ids(&self, ids: &[i64]) -> Result<Vec<Student>>;
    async fn update_student(
        &self,
        id: i64,
        update: UpdateStudentRequest,
    ) -> Result<Option<Student>>;
    async fn delete_student(&self, id: i64) -> Result<bool>;
    async fn count_students(&self, school_id: Option<i64>) -> Result<u64>;

    /// 科目管理方法
    async fn create_subject(&self, subject: CreateSubjectRequest) -> Result<Subject>;
    async fn get_subject_by_id(&self, id: i64) -> Result<Option<Subject>>;
    async fn list_subjects_with_pagination(
        &self,
        query: SubjectListQuery,
    ) -> Result<SubjectListResponse>;
    async fn list_subjects_by_ids(&self, ids: &[i64]) -> Result<Vec<Subject>>;
    async fn update_subject(
        &self,
        id: i64,
        update: UpdateSubjectRequest,
    ) -> Result<Option<Subject>>;
    async fn delete_subject(&self, id: i64) -> Result<bool>;
    async fn count_subjects(&self, school_id: Option<i64>) -> Result<u64>;

    /// 教师管理方法
    async fn create_teacher(&self, teacher: CreateTeacherRequest) -> Result<Teacher>;
    async fn get_teacher_by_id(&self, id: i64) -> Result<Option<Teacher>>;
    async fn get_teacher_by_user_id(&self, user_id: i64) -> Result<Option<Teacher>>;
    async fn list_teachers_with_pagination(
        &self,
        query: TeacherListQuery,
    ) -> Result<TeacherListResponse>;
    async fn list_teachers_with_user_by_ids(&self, ids: &[i64]) -> Result<Vec<TeacherWithUser>>;
    async fn update_teacher(
        &self,
        id: i64,
        update: UpdateTeacherRequest,
    ) -> Result<Option<Teacher>>;
    async fn delete_teacher(&self, id: i64) -> Result<bool>;
    async fn count_teachers(&self, school_id: Option<i64>) -> Result<u64>;

    /// 任课分配方法
    async fn create_teacher_subject(
        &self,
        teacher_id: i64,
        subject_id: i64,
        class_id: i64,
    ) -> Result<TeacherSubject>;
    async fn find_teacher_subject(
        &self,
        teacher_id: i64,
        subject_id: i64,
        class_id: i64,
    ) -> Result<Option<TeacherSubject>>;
    async fn list_teacher_subjects(
        &self,
        query: TeacherSubjectQuery,
    ) -> Result<Vec<TeacherSubject>>;
    // 批量分配，已存在的组合跳过；返回 (新建, 跳过的 subject_id)
    async fn bulk_assign_teacher_subjects(
        &self,
        teacher_id: i64,
        class_id: i64,
        subject_ids: &[i64],
    ) -> Result<(Vec<TeacherSubject>, Vec<i64>)>;
    async fn delete_teacher_subject(&self, id: i64) -> Result<bool>;

    /// 学期管理方法
    // is_current 为 true 时会取消同校其他学期的当前标记
    async fn create_term(&self, term: CreateTermRequest) -> Result<Term>;
    async fn get_term_by_id(&self, id: i64) -> Result<Option<Term>>;
    async fn list_terms(&self, query: TermQuery) -> Result<Vec<Term>>;
    async fn list_terms_by_ids(&self, ids: &[i64]) -> Result<Vec<Term>>;
    async fn update_term(&self, id: i64, update: UpdateTermRequest) -> Result<Option<Term>>;
    async fn delete_term(&self, id: i64) -> Result<bool>;

    /// 考试管理方法
    async fn create_examination(&self, exam: CreateExaminationRequest) -> Result<Examination>;
    async fn get_examination_by_id(&self, id: i64) -> Result<Option<Examination>>;
    async fn list_examinations_with_pagination(
        &self,
        query: ExaminationListQuery,
    ) -> Result<ExaminationListResponse>;
    async fn list_examinations_by_ids(&self, ids: &[i64]) -> Result<Vec<Examination>>;
    async fn update_examination(
        &self,
        id: i64,
        update: UpdateExaminationRequest,
    ) -> Result<Option<Examination>>;
    async fn delete_examination(&self, id: i64) -> Result<bool>;
    async fn count_examinations(&self, school_id: Option<i64>) -> Result<u64>;

    /// 考试成绩方法
    // 以 (student_id, subject_id, examination_id) 为冲突键写入
    async fn upsert_result(&self, result: ResultUpsert) -> Result<ExamResult>;
    // 在同一事务中批量写入，返回写入行数
    async fn upsert_results(&self, results: Vec<ResultUpsert>) -> Result<usize>;
    async fn get_result_by_id(&self, id: i64) -> Result<Option<ExamResult>>;
    async fn list_results(&self, query: ResultQuery) -> Result<Vec<ExamResult>>;
    async fn delete_result(&self, id: i64) -> Result<bool>;
    async fn count_results_entered_by(&self, user_id: i64) -> Result<u64>;

    /// 测验方法
    async fn create_test(
        &self,
        school_id: i64,
        teacher_id: i64,
        test: CreateTestRequest,
    ) -> Result<Test>;
    async fn get_test_by_id(&self, id: i64) -> Result<Option<Test>>;
    async fn list_tests_with_pagination(&self, query: TestListQuery) -> Result<TestListResponse>;
    async fn update_test(&self, id: i64, update: UpdateTestRequest) -> Result<Option<Test>>;
    async fn delete_test(&self, id: i64) -> Result<bool>;
    async fn count_tests(&self, teacher_id: Option<i64>) -> Result<u64>;

    /// 测验成绩方法
    async fn list_test_results(&self, test_id: i64) -> Result<Vec<TestResult>>;
    // 以 (test_id, student_id) 为冲突键批量写入，返回写入行数
    async fn upsert_test_results(&self, results: Vec<TestResultUpsert>) -> Result<usize>;
    async fn get_test_result_by_id(&self, id: i64) -> Result<Option<TestResult>>;
    async fn delete_test_result(&self, id: i64) -> Result<bool>;
    async fn count_test_results_for_student(&self, student_id: i64) -> Result<u64>;

    /// 课程表方法
    async fn create_timetable_entry(&self, slot: TimetableSlot) -> Result<TimetableEntry>;
    async fn get_timetable_entry_by_id(&self, id: i64) -> Result<Option<TimetableEntry>>;
    async fn list_timetable_entries(&self, query: TimetableQuery) -> Result<Vec<TimetableEntry>>;
    async fn update_timetable_entry(
        &self,
        id: i64,
        slot: TimetableSlot,
    ) -> Result<Option<TimetableEntry>>;
    async fn delete_timetable_entry(&self, id: i64) -> Result<bool>;
}

pub async fn create_storage() -> Result<Arc<dyn Storage>> {
    let storage = sea_orm_storage::SeaOrmStorage::new_async().await?;
    Ok(Arc::new(storage))
}
