/// 业务错误码
///
/// 0 表示成功；1xxx 通用错误；2xxx 认证与用户；3xxx 学校组织结构；
/// 4xxx 考试与成绩；5xxx 课程表。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    Success = 0,

    // 通用
    BadRequest = 1000,
    Unauthorized = 1001,
    Forbidden = 1003,
    Conflict = 1009,
    RateLimitExceeded = 1029,
    InternalServerError = 1500,

    // 认证与用户
    AuthFailed = 2000,
    UserNotFound = 2001,
    UserAlreadyExists = 2002,
    UserDeleteFailed = 2005,
    UserInactive = 2006,
    InvalidPassword = 2007,
    UserNameInvalid = 2008,
    UserEmailInvalid = 2009,
    CanNotDeleteCurrentUser = 2010,

    // 学校组织结构
    SchoolNotFound = 3000,
    SchoolAlreadyExists = 3001,
    ClassNotFound = 3100,
    ClassAlreadyExists = 3101,
    ClassPermissionDenied = 3102,
    StreamNotFound = 3200,
    StreamAlreadyExists = 3201,
    StreamClassMismatch = 3202,
    StudentNotFound = 3300,
    StudentAlreadyExists = 3301,
    SubjectNotFound = 3400,
    SubjectAlreadyExists = 3401,
    TeacherNotFound = 3500,
    TeacherAlreadyExists = 3501,
    AssignmentNotFound = 3600,
    AssignmentAlreadyExists = 3601,
    TermNotFound = 3700,
    TermAlreadyExists = 3701,

    // 考试与成绩
    ExaminationNotFound = 4000,
    ResultNotFound = 4100,
    ResultScoreInvalid = 4101,
    ResultPermissionDenied = 4102,
    ImportFileParseFailed = 4103,
    ImportFileMissingColumn = 4104,
    ImportFileDataInvalid = 4105,
    TestNotFound = 4200,
    TestPermissionDenied = 4201,
    TestResultNotFound = 4202,

    // 课程表
    TimetableEntryNotFound = 5000,
    TimetableConflict = 5001,
    TimetableInvalidSlot = 5002,
}
