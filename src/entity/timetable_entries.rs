//! 课程表实体

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "timetable_entries")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub school_id: i64,
    pub class_id: i64,
    pub stream_id: Option<i64>,
    pub subject_id: i64,
    pub teacher_id: i64,
    pub day_of_week: i32,
    // 距午夜的分钟数
    pub start_minute: i32,
    pub end_minute: i32,
    pub room: Option<String>,
    pub created_at: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::classes::Entity",
        from = "Column::ClassId",
        to = "super::classes::Column::Id"
    )]
    Class,
    #[sea_orm(
        belongs_to = "super::teachers::Entity",
        from = "Column::TeacherId",
        to = "super::teachers::Column::Id"
    )]
    Teacher,
}

impl Related<super::classes::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Class.def()
    }
}

impl Related<super::teachers::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Teacher.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn into_timetable_entry(self) -> crate::models::timetable::entities::TimetableEntry {
        use crate::models::timetable::entities::TimetableEntry;
        use crate::utils::validate::format_time_of_day;

        TimetableEntry {
            id: self.id,
            school_id: self.school_id,
            class_id: self.class_id,
            stream_id: self.stream_id,
            subject_id: self.subject_id,
            teacher_id: self.teacher_id,
            day_of_week: self.day_of_week,
            start_time: format_time_of_day(self.start_minute),
            end_time: format_time_of_day(self.end_minute),
            room: self.room,
            start_minute: self.start_minute,
            end_minute: self.end_minute,
            created_at: super::from_timestamp(self.created_at),
        }
    }
}
