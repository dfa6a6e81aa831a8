//! 考试成绩实体

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "results")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub student_id: i64,
    pub subject_id: i64,
    pub examination_id: i64,
    pub score: f64,
    pub remarks: Option<String>,
    pub entered_by: Option<i64>,
    pub created_at: i64,
    pub updated_at: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::students::Entity",
        from = "Column::StudentId",
        to = "super::students::Column::Id"
    )]
    Student,
    #[sea_orm(
        belongs_to = "super::subjects::Entity",
        from = "Column::SubjectId",
        to = "super::subjects::Column::Id"
    )]
    Subject,
    #[sea_orm(
        belongs_to = "super::examinations::Entity",
        from = "Column::ExaminationId",
        to = "super::examinations::Column::Id"
    )]
    Examination,
}

impl Related<super::students::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Student.def()
    }
}

impl Related<super::subjects::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Subject.def()
    }
}

impl Related<super::examinations::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Examination.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn into_result(self) -> crate::models::results::entities::ExamResult {
        crate::models::results::entities::ExamResult {
            id: self.id,
            student_id: self.student_id,
            subject_id: self.subject_id,
            examination_id: self.examination_id,
            score: self.score,
            remarks: self.remarks,
            entered_by: self.entered_by,
            created_at: super::from_timestamp(self.created_at),
            updated_at: super::from_timestamp(self.updated_at),
        }
    }
}
