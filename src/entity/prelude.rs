//! 预导入模块，方便使用

pub use super::class_tests::{
    ActiveModel as ClassTestActiveModel, Entity as ClassTests, Model as ClassTestModel,
};
pub use super::classes::{ActiveModel as ClassActiveModel, Entity as Classes, Model as ClassModel};
pub use super::examinations::{
    ActiveModel as ExaminationActiveModel, Entity as Examinations, Model as ExaminationModel,
};
pub use super::results::{ActiveModel as ResultActiveModel, Entity as Results, Model as ResultModel};
pub use super::schools::{ActiveModel as SchoolActiveModel, Entity as Schools, Model as SchoolModel};
pub use super::streams::{ActiveModel as StreamActiveModel, Entity as Streams, Model as StreamModel};
pub use super::students::{
    ActiveModel as StudentActiveModel, Entity as Students, Model as StudentModel,
};
pub use super::subjects::{
    ActiveModel as SubjectActiveModel, Entity as Subjects, Model as SubjectModel,
};
pub use super::teacher_subjects::{
    ActiveModel as TeacherSubjectActiveModel, Entity as TeacherSubjects,
    Model as TeacherSubjectModel,
};
pub use super::teachers::{
    ActiveModel as TeacherActiveModel, Entity as Teachers, Model as TeacherModel,
};
pub use super::terms::{ActiveModel as TermActiveModel, Entity as Terms, Model as TermModel};
pub use super::test_results::{
    ActiveModel as TestResultActiveModel, Entity as TestResults, Model as TestResultModel,
};
pub use super::timetable_entries::{
    ActiveModel as TimetableEntryActiveModel, Entity as TimetableEntries,
    Model as TimetableEntryModel,
};
pub use super::users::{ActiveModel as UserActiveModel, Entity as Users, Model as UserModel};
