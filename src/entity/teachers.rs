//! 教师档案实体

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "teachers")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub school_id: i64,
    #[sea_orm(unique)]
    pub user_id: i64,
    pub staff_number: Option<String>,
    pub phone: Option<String>,
    pub created_at: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::schools::Entity",
        from = "Column::SchoolId",
        to = "super::schools::Column::Id"
    )]
    School,
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::UserId",
        to = "super::users::Column::Id"
    )]
    User,
}

impl Related<super::schools::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::School.def()
    }
}

impl Related<super::users::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn into_teacher(self) -> crate::models::teachers::entities::Teacher {
        use crate::models::teachers::entities::Teacher;

        Teacher {
            id: self.id,
            school_id: self.school_id,
            user_id: self.user_id,
            staff_number: self.staff_number,
            phone: self.phone,
            created_at: super::from_timestamp(self.created_at),
        }
    }
}
