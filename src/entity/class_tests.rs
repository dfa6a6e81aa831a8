//! 课堂测验实体

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "tests")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub school_id: i64,
    pub teacher_id: i64,
    pub class_id: i64,
    pub subject_id: i64,
    pub term_id: Option<i64>,
    pub title: String,
    pub test_type: String,
    pub max_score: f64,
    pub test_date: Option<String>,
    pub created_at: i64,
    pub updated_at: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::teachers::Entity",
        from = "Column::TeacherId",
        to = "super::teachers::Column::Id"
    )]
    Teacher,
    #[sea_orm(
        belongs_to = "super::classes::Entity",
        from = "Column::ClassId",
        to = "super::classes::Column::Id"
    )]
    Class,
}

impl Related<super::teachers::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Teacher.def()
    }
}

impl Related<super::classes::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Class.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

// 从数据库模型转换为业务模型
impl Model {
    pub fn into_test(self) -> crate::models::class_tests::entities::Test {
        use crate::models::class_tests::entities::{Test, TestType};

        Test {
            id: self.id,
            school_id: self.school_id,
            teacher_id: self.teacher_id,
            class_id: self.class_id,
            subject_id: self.subject_id,
            term_id: self.term_id,
            title: self.title,
            test_type: self.test_type.parse::<TestType>().unwrap_or(TestType::Other),
            max_score: self.max_score,
            test_date: self.test_date,
            created_at: super::from_timestamp(self.created_at),
            updated_at: super::from_timestamp(self.updated_at),
        }
    }
}
