//! 测验成绩实体

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "test_results")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub test_id: i64,
    pub student_id: i64,
    pub score: f64,
    pub remarks: Option<String>,
    pub created_at: i64,
    pub updated_at: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::class_tests::Entity",
        from = "Column::TestId",
        to = "super::class_tests::Column::Id"
    )]
    Test,
    #[sea_orm(
        belongs_to = "super::students::Entity",
        from = "Column::StudentId",
        to = "super::students::Column::Id"
    )]
    Student,
}

impl Related<super::class_tests::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Test.def()
    }
}

impl Related<super::students::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Student.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn into_test_result(self) -> crate::models::class_tests::entities::TestResult {
        crate::models::class_tests::entities::TestResult {
            id: self.id,
            test_id: self.test_id,
            student_id: self.student_id,
            score: self.score,
            remarks: self.remarks,
            created_at: super::from_timestamp(self.created_at),
            updated_at: super::from_timestamp(self.updated_at),
        }
    }
}
