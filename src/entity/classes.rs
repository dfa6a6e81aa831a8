//! 班级实体

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "classes")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub school_id: i64,
    pub name: String,
    pub level: i32,
    pub class_teacher_id: Option<i64>,
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
    #[sea_orm(
        belongs_to = "super::teachers::Entity",
        from = "Column::ClassTeacherId",
        to = "super::teachers::Column::Id"
    )]
    ClassTeacher,
}

impl Related<super::schools::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::School.def()
    }
}

impl Related<super::teachers::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ClassTeacher.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

// 从数据库模型转换为业务模型
impl Model {
    pub fn into_class(self) -> crate::models::classes::entities::Class {
        use crate::models::classes::entities::Class;

        Class {
            id: self.id,
            school_id: self.school_id,
            name: self.name,
            level: self.level,
            class_teacher_id: self.class_teacher_id,
            created_at: super::from_timestamp(self.created_at),
            updated_at: super::from_timestamp(self.updated_at),
        }
    }
}
