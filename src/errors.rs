//! 统一错误处理模块
//!
//! 使用宏自动生成错误类型，支持错误代码和类型名称。

use std::fmt;

/// 定义错误类型的宏
///
/// 自动生成：
/// - enum 定义
/// - code() 方法 - 返回错误代码
/// - error_type() 方法 - 返回错误类型名称
/// - message() 方法 - 返回错误详情
/// - 便捷构造函数
macro_rules! define_schoolsys_errors {
    ($(
        $variant:ident($code:literal, $type_name:literal)
    ),* $(,)?) => {
        #[derive(Debug, Clone)]
        pub enum SchoolSysError {
            $($variant(String),)*
        }

        impl SchoolSysError {
            /// 获取错误代码
            pub fn code(&self) -> &'static str {
                match self {
                    $(SchoolSysError::$variant(_) => $code,)*
                }
            }

            /// 获取错误类型名称
            pub fn error_type(&self) -> &'static str {
                match self {
                    $(SchoolSysError::$variant(_) => $type_name,)*
                }
            }

            /// 获取错误详情
            pub fn message(&self) -> &str {
                match self {
                    $(SchoolSysError::$variant(msg) => msg,)*
                }
            }
        }

        // 生成便捷构造函数
        paste::paste! {
            impl SchoolSysError {
                $(
                    pub fn [<$variant:snake>]<T: Into<String>>(msg: T) -> Self {
                        SchoolSysError::$variant(msg.into())
                    }
                )*
            }
        }
    };
}

define_schoolsys_errors! {
    CacheConnection("E001", "Cache Connection Error"),
    CachePluginNotFound("E002", "Cache Plugin Not Found"),
    DatabaseConfig("E003", "Database Configuration Error"),
    DatabaseConnection("E004", "Database Connection Error"),
    DatabaseOperation("E005", "Database Operation Error"),
    FileOperation("E006", "File Operation Error"),
    Validation("E007", "Validation Error"),
    NotFound("E008", "Resource Not Found"),
    Serialization("E009", "Serialization Error"),
    DateParse("E010", "Date Parse Error"),
    Authentication("E011", "Authentication Error"),
    Authorization("E012", "Authorization Error"),
    Conflict("E013", "Resource Conflict"),
    Import("E014", "Import Error"),
}

impl SchoolSysError {
    /// 格式化为简洁输出
    pub fn format_simple(&self) -> String {
        format!("{}: {}", self.error_type(), self.message())
    }
}

impl fmt::Display for SchoolSysError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format_simple())
    }
}

impl std::error::Error for SchoolSysError {}

// 为常见的错误类型实现 From trait
impl From<sea_orm::DbErr> for SchoolSysError {
    fn from(err: sea_orm::DbErr) -> Self {
        SchoolSysError::DatabaseOperation(err.to_string())
    }
}

impl From<std::io::Error> for SchoolSysError {
    fn from(err: std::io::Error) -> Self {
        SchoolSysError::FileOperation(err.to_string())
    }
}

impl From<serde_json::Error> for SchoolSysError {
    fn from(err: serde_json::Error) -> Self {
        SchoolSysError::Serialization(err.to_string())
    }
}

impl From<chrono::ParseError> for SchoolSysError {
    fn from(err: chrono::ParseError) -> Self {
        SchoolSysError::DateParse(err.to_string())
    }
}

impl From<csv::Error> for SchoolSysError {
    fn from(err: csv::Error) -> Self {
        SchoolSysError::Import(err.to_string())
    }
}

impl SchoolSysError {
    /// 是否为数据库唯一约束冲突
    ///
    /// SQLite / PostgreSQL / MySQL 的报错文本各不相同，这里统一识别。
    pub fn is_unique_violation(&self) -> bool {
        match self {
            SchoolSysError::DatabaseOperation(msg) | SchoolSysError::Conflict(msg) => {
                let lower = msg.to_lowercase();
                lower.contains("unique constraint")
                    || lower.contains("duplicate key")
                    || lower.contains("duplicate entry")
            }
            _ => false,
        }
    }

    /// 是否为外键约束失败
    pub fn is_foreign_key_violation(&self) -> bool {
        match self {
            SchoolSysError::DatabaseOperation(msg) => {
                let lower = msg.to_lowercase();
                lower.contains("foreign key")
            }
            _ => false,
        }
    }
}

pub type Result<T> = std::result::Result<T, SchoolSysError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        assert_eq!(SchoolSysError::cache_connection("test").code(), "E001");
        assert_eq!(SchoolSysError::database_config("test").code(), "E003");
        assert_eq!(SchoolSysError::validation("test").code(), "E007");
        assert_eq!(SchoolSysError::authentication("test").code(), "E011");
    }

    #[test]
    fn test_error_types() {
        assert_eq!(
            SchoolSysError::cache_connection("test").error_type(),
            "Cache Connection Error"
        );
        assert_eq!(
            SchoolSysError::validation("test").error_type(),
            "Validation Error"
        );
    }

    #[test]
    fn test_error_message() {
        let err = SchoolSysError::validation("Invalid input");
        assert_eq!(err.message(), "Invalid input");
    }

    #[test]
    fn test_new_variants() {
        assert_eq!(SchoolSysError::conflict("dup").code(), "E013");
        assert_eq!(SchoolSysError::import("bad csv").error_type(), "Import Error");
    }

    #[test]
    fn test_unique_violation_detection() {
        let sqlite = SchoolSysError::database_operation(
            "UNIQUE constraint failed: results.student_id, results.subject_id",
        );
        assert!(sqlite.is_unique_violation());

        let pg = SchoolSysError::database_operation(
            "duplicate key value violates unique constraint \"idx_terms_school_year_name\"",
        );
        assert!(pg.is_unique_violation());

        let other = SchoolSysError::not_found("UNIQUE constraint failed");
        assert!(!other.is_unique_violation());
    }

    #[test]
    fn test_foreign_key_detection() {
        let err = SchoolSysError::database_operation("FOREIGN KEY constraint failed");
        assert!(err.is_foreign_key_violation());
        assert!(!err.is_unique_violation());
    }

    #[test]
    fn test_format_simple() {
        let err = SchoolSysError::validation("Score exceeds max score");
        let formatted = err.format_simple();
        assert!(formatted.contains("Validation Error"));
        assert!(formatted.contains("Score exceeds max score"));
    }
}
