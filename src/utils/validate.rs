use once_cell::sync::Lazy;
use regex::Regex;

static USERNAME_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z0-9_-]+$").expect("Invalid username regex"));

static SCHOOL_CODE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Z0-9]{3,12}$").expect("Invalid school code regex"));

static TIME_OF_DAY_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^([01]\d|2[0-3]):([0-5]\d)$").expect("Invalid time regex"));

static EMAIL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Z|a-z]{2,}$").expect("Invalid email regex")
});

pub fn validate_username(username: &str) -> Result<(), &'static str> {
    // 用户名长度校验：5 <= x <= 16
    if username.len() < 5 || username.len() > 16 {
        return Err("Username length must be between 5 and 16 characters");
    }
    // 用户名格式校验：只能包含字母、数字、下划线或连字符
    if !USERNAME_RE.is_match(username) {
        return Err("Username must contain only letters, numbers, underscores or hyphens");
    }
    Ok(())
}

pub fn validate_email(email: &str) -> Result<(), &'static str> {
    // 邮箱格式校验：必须包含 @ 和 .
    if !EMAIL_RE.is_match(email) {
        return Err("Email format is invalid");
    }
    Ok(())
}

/// 密码策略验证结果
#[derive(Debug, Clone)]
pub struct PasswordValidationResult {
    pub is_valid: bool,
    pub errors: Vec<&'static str>,
}

impl PasswordValidationResult {
    pub fn error_message(&self) -> String {
        self.errors.join("; ")
    }
}

/// 验证密码是否符合安全策略
///
/// 策略要求：
/// - 最小长度：8 字符
/// - 必须包含：大写字母 + 小写字母 + 数字
/// - 可选：特殊字符（增强安全性）
pub fn validate_password(password: &str) -> PasswordValidationResult {
    let mut errors = Vec::new();

    // 1. 长度检查：至少 8 个字符
    if password.len() < 8 {
        errors.push("Password must be at least 8 characters long");
    }

    // 2. 大写字母检查
    if !password.chars().any(|c| c.is_ascii_uppercase()) {
        errors.push("Password must contain at least one uppercase letter");
    }

    // 3. 小写字母检查
    if !password.chars().any(|c| c.is_ascii_lowercase()) {
        errors.push("Password must contain at least one lowercase letter");
    }

    // 4. 数字检查
    if !password.chars().any(|c| c.is_ascii_digit()) {
        errors.push("Password must contain at least one digit");
    }

    // 5. 常见弱密码检查
    let weak_passwords = [
        "password",
        "12345678",
        "123456789",
        "qwerty123",
        "admin123",
        "password1",
        "Password1",
        "Qwerty123",
        "Abcd1234",
    ];
    if weak_passwords
        .iter()
        .any(|&weak| password.eq_ignore_ascii_case(weak))
    {
        errors.push("Password is too common, please choose a stronger password");
    }

    PasswordValidationResult {
        is_valid: errors.is_empty(),
        errors,
    }
}

/// 简化的密码验证（返回 Result）
pub fn validate_password_simple(password: &str) -> Result<(), String> {
    let result = validate_password(password);
    if result.is_valid {
        Ok(())
    } else {
        Err(result.error_message())
    }
}

/// 学校编码：3-12 位大写字母或数字
pub fn validate_school_code(code: &str) -> Result<(), &'static str> {
    if !SCHOOL_CODE_RE.is_match(code) {
        return Err("School code must be 3-12 uppercase letters or digits");
    }
    Ok(())
}

/// 日期格式校验：YYYY-MM-DD
pub fn validate_date(date: &str) -> Result<chrono::NaiveDate, String> {
    chrono::NaiveDate::parse_from_str(date, "%Y-%m-%d")
        .map_err(|_| format!("Invalid date '{date}', expected YYYY-MM-DD"))
}

/// 解析 "HH:MM"（00:00-23:59）为距午夜的分钟数
pub fn parse_time_of_day(time: &str) -> Result<i32, String> {
    let caps = TIME_OF_DAY_RE
        .captures(time.trim())
        .ok_or_else(|| format!("Invalid time '{time}', expected HH:MM"))?;
    let hours: i32 = caps[1].parse().map_err(|_| format!("Invalid hour in '{time}'"))?;
    let minutes: i32 = caps[2]
        .parse()
        .map_err(|_| format!("Invalid minute in '{time}'"))?;
    Ok(hours * 60 + minutes)
}

/// 分钟数格式化为 "HH:MM"
pub fn format_time_of_day(minutes: i32) -> String {
    let minutes = minutes.clamp(0, 24 * 60 - 1);
    format!("{:02}:{:02}", minutes / 60, minutes % 60)
}

/// 星期校验：1 = 周一 .. 7 = 周日
pub fn validate_day_of_week(day: i32) -> Result<(), &'static str> {
    if !(1..=7).contains(&day) {
        return Err("day_of_week must be between 1 (Monday) and 7 (Sunday)");
    }
    Ok(())
}

/// 分数校验：0 <= score <= max_score
pub fn validate_score(score: f64, max_score: f64) -> Result<(), String> {
    if !score.is_finite() {
        return Err("Score must be a number".to_string());
    }
    if score < 0.0 || score > max_score {
        return Err(format!("Score must be between 0 and {max_score}"));
    }
    Ok(())
}

/// 满分校验：必须为正数
pub fn validate_max_score(max_score: f64) -> Result<(), &'static str> {
    if !max_score.is_finite() || max_score <= 0.0 {
        return Err("max_score must be greater than 0");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_password() {
        assert!(validate_password("SecureP@ss1").is_valid);
        assert!(validate_password("MyP@ssw0rd").is_valid);
        assert!(validate_password("SecurePass123").is_valid);
    }

    #[test]
    fn test_short_password() {
        let result = validate_password("Ab1");
        assert!(!result.is_valid);
        assert!(
            result
                .errors
                .contains(&"Password must be at least 8 characters long")
        );
    }

    #[test]
    fn test_no_uppercase() {
        let result = validate_password("abcd1234");
        assert!(!result.is_valid);
        assert!(
            result
                .errors
                .contains(&"Password must contain at least one uppercase letter")
        );
    }

    #[test]
    fn test_no_lowercase() {
        let result = validate_password("ABCD1234");
        assert!(!result.is_valid);
        assert!(
            result
                .errors
                .contains(&"Password must contain at least one lowercase letter")
        );
    }

    #[test]
    fn test_no_digit() {
        let result = validate_password("AbcdEfgh");
        assert!(!result.is_valid);
        assert!(
            result
                .errors
                .contains(&"Password must contain at least one digit")
        );
    }

    #[test]
    fn test_common_password() {
        let result = validate_password("Password1");
        assert!(!result.is_valid);
        assert!(
            result
                .errors
                .contains(&"Password is too common, please choose a stronger password")
        );
    }

    #[test]
    fn test_username_rules() {
        assert!(validate_username("teacher_01").is_ok());
        assert!(validate_username("abc").is_err());
        assert!(validate_username("bad name!").is_err());
    }

    #[test]
    fn test_email_rules() {
        assert!(validate_email("head@school.ac.ke").is_ok());
        assert!(validate_email("not-an-email").is_err());
    }

    #[test]
    fn test_school_code() {
        assert!(validate_school_code("AB12CD").is_ok());
        assert!(validate_school_code("ab12cd").is_err());
        assert!(validate_school_code("A1").is_err());
    }

    #[test]
    fn test_date_validation() {
        assert!(validate_date("2025-01-31").is_ok());
        assert!(validate_date("2025-02-30").is_err());
        assert!(validate_date("31/01/2025").is_err());
    }

    #[test]
    fn test_parse_time_of_day() {
        assert_eq!(parse_time_of_day("00:00"), Ok(0));
        assert_eq!(parse_time_of_day("08:40"), Ok(520));
        assert_eq!(parse_time_of_day("23:59"), Ok(1439));
        assert!(parse_time_of_day("24:00").is_err());
        assert!(parse_time_of_day("8:40").is_err());
        assert!(parse_time_of_day("08:60").is_err());
    }

    #[test]
    fn test_format_time_of_day() {
        assert_eq!(format_time_of_day(0), "00:00");
        assert_eq!(format_time_of_day(520), "08:40");
        assert_eq!(format_time_of_day(1439), "23:59");
    }

    #[test]
    fn test_day_of_week() {
        assert!(validate_day_of_week(1).is_ok());
        assert!(validate_day_of_week(7).is_ok());
        assert!(validate_day_of_week(0).is_err());
        assert!(validate_day_of_week(8).is_err());
    }

    #[test]
    fn test_score_bounds() {
        assert!(validate_score(0.0, 100.0).is_ok());
        assert!(validate_score(100.0, 100.0).is_ok());
        assert!(validate_score(-1.0, 100.0).is_err());
        assert!(validate_score(50.5, 50.0).is_err());
        assert!(validate_score(f64::NAN, 100.0).is_err());
        assert!(validate_max_score(0.0).is_err());
        assert!(validate_max_score(30.0).is_ok());
    }
}
