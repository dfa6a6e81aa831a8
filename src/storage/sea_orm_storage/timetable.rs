//! 课程表存储操作

use super::{SeaOrmStorage, now_ts};
use crate::entity::timetable_entries::{ActiveModel, Column, Entity as TimetableEntries};
use crate::errors::{Result, SchoolSysError};
use crate::models::timetable::{
    entities::{TimetableEntry, TimetableSlot},
    requests::TimetableQuery,
};
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Set};

impl SeaOrmStorage {
    pub async fn create_timetable_entry_impl(&self, slot: TimetableSlot) -> Result<TimetableEntry> {
        let model = ActiveModel {
            school_id: Set(slot.school_id),
            class_id: Set(slot.class_id),
            stream_id: Set(slot.stream_id),
            subject_id: Set(slot.subject_id),
            teacher_id: Set(slot.teacher_id),
            day_of_week: Set(slot.day_of_week),
            start_minute: Set(slot.start_minute),
            end_minute: Set(slot.end_minute),
            room: Set(slot.room),
            created_at: Set(now_ts()),
            ..Default::default()
        };

        let result = model
            .insert(&self.db)
            .await
            .map_err(|e| SchoolSysError::database_operation(format!("创建课程表条目失败: {e}")))?;

        Ok(result.into_timetable_entry())
    }

    pub async fn get_timetable_entry_by_id_impl(&self, id: i64) -> Result<Option<TimetableEntry>> {
        let result = TimetableEntries::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| SchoolSysError::database_operation(format!("查询课程表条目失败: {e}")))?;

        Ok(result.map(|m| m.into_timetable_entry()))
    }

    /// 按条件列出课程表，按星期与开始时间排序
    pub async fn list_timetable_entries_impl(
        &self,
        query: TimetableQuery,
    ) -> Result<Vec<TimetableEntry>> {
        let mut select = TimetableEntries::find();

        if let Some(school_id) = query.school_id {
            select = select.filter(Column::SchoolId.eq(school_id));
        }
        if let Some(class_id) = query.class_id {
            select = select.filter(Column::ClassId.eq(class_id));
        }
        if let Some(stream_id) = query.stream_id {
            select = select.filter(Column::StreamId.eq(stream_id));
        }
        if let Some(teacher_id) = query.teacher_id {
            select = select.filter(Column::TeacherId.eq(teacher_id));
        }
        if let Some(day_of_week) = query.day_of_week {
            select = select.filter(Column::DayOfWeek.eq(day_of_week));
        }

        let entries = select
            .order_by_asc(Column::DayOfWeek)
            .order_by_asc(Column::StartMinute)
            .all(&self.db)
            .await
            .map_err(|e| SchoolSysError::database_operation(format!("查询课程表失败: {e}")))?;

        Ok(entries
            .into_iter()
            .map(|m| m.into_timetable_entry())
            .collect())
    }

    pub async fn update_timetable_entry_impl(
        &self,
        id: i64,
        slot: TimetableSlot,
    ) -> Result<Option<TimetableEntry>> {
        if self.get_timetable_entry_by_id_impl(id).await?.is_none() {
            return Ok(None);
        }

        let model = ActiveModel {
            id: Set(id),
            school_id: Set(slot.school_id),
            class_id: Set(slot.class_id),
            stream_id: Set(slot.stream_id),
            subject_id: Set(slot.subject_id),
            teacher_id: Set(slot.teacher_id),
            day_of_week: Set(slot.day_of_week),
            start_minute: Set(slot.start_minute),
            end_minute: Set(slot.end_minute),
            room: Set(slot.room),
            ..Default::default()
        };

        model
            .update(&self.db)
            .await
            .map_err(|e| SchoolSysError::database_operation(format!("更新课程表条目失败: {e}")))?;

        self.get_timetable_entry_by_id_impl(id).await
    }

    pub async fn delete_timetable_entry_impl(&self, id: i64) -> Result<bool> {
        let result = TimetableEntries::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(|e| SchoolSysError::database_operation(format!("删除课程表条目失败: {e}")))?;

        Ok(result.rows_affected > 0)
    }
}
