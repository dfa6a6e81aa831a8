//! 学期实体

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "terms")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub school_id: i64,
    pub name: String,
    pub year: i32,
    pub start_date: String,
    pub end_date: String,
    pub is_current: bool,
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
}

impl Related<super::schools::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::School.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn into_term(self) -> crate::models::terms::entities::Term {
        crate::models::terms::entities::Term {
            id: self.id,
            school_id: self.school_id,
            name: self.name,
            year: self.year,
            start_date: self.start_date,
            end_date: self.end_date,
            is_current: self.is_current,
            created_at: super::from_timestamp(self.created_at),
        }
    }
}
