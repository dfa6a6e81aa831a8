//! 用户实体

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "users")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    #[sea_orm(unique)]
    pub username: String,
    #[sea_orm(unique)]
    pub email: String,
    pub password_hash: String,
    pub role: String,
    pub status: String,
    pub display_name: Option<String>,
    pub school_id: Option<i64>,
    pub last_login: Option<i64>,
    pub created_at: i64,
    pub updated_at: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::schools::Entity",
        from = "Column::SchoolId",
        to = "super::schools::Column::Id"
    )]
    School,
}

impl Related<super::schools::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::School.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

// 从数据库模型转换为业务模型
impl Model {
    pub fn into_user(self) -> crate::models::users::entities::User {
        use crate::models::users::entities::{User, UserRole, UserStatus};

        User {
            id: self.id,
            username: self.username,
            email: self.email,
            password_hash: self.password_hash,
            role: self.role.parse::<UserRole>().unwrap_or(UserRole::Student),
            status: self
                .status
                .parse::<UserStatus>()
                .unwrap_or(UserStatus::Inactive),
            display_name: self.display_name,
            school_id: self.school_id,
            last_login: self.last_login.map(super::from_timestamp),
            created_at: super::from_timestamp(self.created_at),
            updated_at: super::from_timestamp(self.updated_at),
        }
    }
}
