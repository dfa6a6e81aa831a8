use serde::{Deserialize, Serialize};
use ts_rs::TS;

// 测验类型
#[derive(Debug, Clone, Serialize, PartialEq, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "../frontend/src/types/generated/class_test.ts")]
pub enum TestType {
    Quiz,
    Cat,
    Assignment,
    Project,
    Practical,
    Other,
}

impl<'de> Deserialize<'de> for TestType {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse::<TestType>().map_err(|_| {
            serde::de::Error::custom(format!(
                "无效的测验类型: '{s}'. 支持的类型: quiz, cat, assignment, project, practical, other"
            ))
        })
    }
}

impl std::fmt::Display for TestType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            TestType::Quiz => "quiz",
            TestType::Cat => "cat",
            TestType::Assignment => "assignment",
            TestType::Project => "project",
            TestType::Practical => "practical",
            TestType::Other => "other",
        };
        write!(f, "{s}")
    }
}

impl std::str::FromStr for TestType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "quiz" => Ok(TestType::Quiz),
            "cat" => Ok(TestType::Cat),
            "assignment" => Ok(TestType::Assignment),
            "project" => Ok(TestType::Project),
            "practical" => Ok(TestType::Practical),
            "other" => Ok(TestType::Other),
            _ => Err(format!("Invalid test type: {s}")),
        }
    }
}

// 课堂测验（教师自建）
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/class_test.ts")]
pub struct Test {
    pub id: i64,
    pub school_id: i64,
    pub teacher_id: i64,
    pub class_id: i64,
    pub subject_id: i64,
    pub term_id: Option<i64>,
    pub title: String,
    pub test_type: TestType,
    pub max_score: f64,
    pub test_date: Option<String>,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/class_test.ts")]
pub struct TestResult {
    pub id: i64,
    pub test_id: i64,
    pub student_id: i64,
    pub score: f64,
    pub remarks: Option<String>,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

// 存储层写入用的测验成绩行
#[derive(Debug, Clone)]
pub struct TestResultUpsert {
    pub test_id: i64,
    pub student_id: i64,
    pub score: f64,
    pub remarks: Option<String>,
}
