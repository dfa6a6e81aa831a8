//! 考试实体

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "examinations")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub school_id: i64,
    pub term_id: i64,
    pub name: String,
    pub year: i32,
    pub class_id: Option<i64>,
    pub max_score: f64,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub published: bool,
    pub created_at: i64,
    pub updated_at: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::terms::Entity",
        from = "Column::TermId",
        to = "super::terms::Column::Id"
    )]
    Term,
    #[sea_orm(
        belongs_to = "super::classes::Entity",
        from = "Column::ClassId",
        to = "super::classes::Column::Id"
    )]
    Class,
}

impl Related<super::terms::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Term.def()
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
    pub fn into_examination(self) -> crate::models::examinations::entities::Examination {
        use crate::models::examinations::entities::Examination;

        Examination {
            id: self.id,
            school_id: self.school_id,
            term_id: self.term_id,
            name: self.name,
            year: self.year,
            class_id: self.class_id,
            max_score: self.max_score,
            start_date: self.start_date,
            end_date: self.end_date,
            published: self.published,
            created_at: super::from_timestamp(self.created_at),
            updated_at: super::from_timestamp(self.updated_at),
        }
    }
}
