use serde::{Deserialize, Serialize};
use ts_rs::TS;

// 用户角色
#[derive(Debug, Clone, Serialize, PartialEq, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "../frontend/src/types/generated/user.ts")]
pub enum UserRole {
    Student, // 学生
    Teacher, // 教师
    Admin,   // 管理员
}

impl UserRole {
    pub const STUDENT: &'static str = "student";
    pub const TEACHER: &'static str = "teacher";
    pub const ADMIN: &'static str = "admin";

    pub fn admin_roles() -> &'static [&'static UserRole] {
        &[&Self::Admin]
    }
    pub fn teacher_roles() -> &'static [&'static UserRole] {
        &[&Self::Teacher, &Self::Admin]
    }
    pub fn student_roles() -> &'static [&'static UserRole] {
        &[&Self::Student]
    }
    pub fn all_roles() -> &'static [&'static UserRole] {
        &[&Self::Student, &Self::Teacher, &Self::Admin]
    }
}

impl<'de> Deserialize<'de> for UserRole {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse::<UserRole>().map_err(|_| {
            serde::de::Error::custom(format!(
                "无效的用户角色: '{s}'. 支持的角色: student, teacher, admin"
            ))
        })
    }
}

impl std::fmt::Display for UserRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            UserRole::Student => write!(f, "{}", UserRole::STUDENT),
            UserRole::Teacher => write!(f, "{}", UserRole::TEACHER),
            UserRole::Admin => write!(f, "{}", UserRole::ADMIN),
        }
    }
}

impl std::str::FromStr for UserRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            UserRole::STUDENT => Ok(UserRole::Student),
            UserRole::TEACHER => Ok(UserRole::Teacher),
            UserRole::ADMIN => Ok(UserRole::Admin),
            _ => Err(format!("Invalid user role: {s}")),
        }
    }
}

// 用户状态
#[derive(Debug, Clone, Serialize, PartialEq, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "../frontend/src/types/generated/user.ts")]
pub enum UserStatus {
    Active,    // 活跃
    Inactive,  // 非活跃
    Suspended, // 暂停
}

impl<'de> Deserialize<'de> for UserStatus {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse::<UserStatus>().map_err(|_| {
            serde::de::Error::custom(format!(
                "无效的用户状态: '{s}'. 支持的状态: active, inactive, suspended"
            ))
        })
    }
}

impl std::fmt::Display for UserStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            UserStatus::Active => write!(f, "active"),
            UserStatus::Inactive => write!(f, "inactive"),
            UserStatus::Suspended => write!(f, "suspended"),
        }
    }
}

impl std::str::FromStr for UserStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "active" => Ok(UserStatus::Active),
            "inactive" => Ok(UserStatus::Inactive),
            "suspended" => Ok(UserStatus::Suspended),
            _ => Err(format!("Invalid user status: {s}")),
        }
    }
}

// 用户实体（账户 / profile）
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/user.ts")]
pub struct User {
    pub id: i64,
    pub username: String,
    pub email: String,
    #[serde(skip_serializing, default)] // 不序列化到JSON响应中
    #[ts(skip)]
    pub password_hash: String,
    pub role: UserRole,
    pub status: UserStatus,
    pub display_name: Option<String>,
    pub school_id: Option<i64>,
    pub last_login: Option<chrono::DateTime<chrono::Utc>>,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

impl User {
    pub fn is_admin(&self) -> bool {
        self.role == UserRole::Admin
    }

    pub fn is_student(&self) -> bool {
        self.role == UserRole::Student
    }

    // 生成 token 对（access + refresh）
    pub fn generate_token_pair(
        &self,
        refresh_token_expiry: Option<chrono::TimeDelta>,
    ) -> Result<crate::utils::jwt::TokenPair, String> {
        crate::utils::jwt::JwtUtils::generate_token_pair(
            self.id,
            &self.role.to_string(),
            refresh_token_expiry,
        )
        .map_err(|e| format!("生成 token 对失败: {e}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_round_trip_through_strings() {
        for role in UserRole::all_roles() {
            let parsed: UserRole = role.to_string().parse().unwrap();
            assert_eq!(&parsed, *role);
        }
        assert!("user".parse::<UserRole>().is_err());
    }

    #[test]
    fn test_role_deserialize_rejects_unknown() {
        let role: UserRole = serde_json::from_str("\"teacher\"").unwrap();
        assert_eq!(role, UserRole::Teacher);
        assert!(serde_json::from_str::<UserRole>("\"principal\"").is_err());
    }

    #[test]
    fn test_password_hash_not_serialized() {
        let now = chrono::Utc::now();
        let user = User {
            id: 1,
            username: "admin".into(),
            email: "admin@example.com".into(),
            password_hash: "secret-hash".into(),
            role: UserRole::Admin,
            status: UserStatus::Active,
            display_name: None,
            school_id: None,
            last_login: None,
            created_at: now,
            updated_at: now,
        };
        let json = serde_json::to_string(&user).unwrap();
        assert!(!json.contains("secret-hash"));
        assert!(json.contains("\"role\":\"admin\""));
    }
}
