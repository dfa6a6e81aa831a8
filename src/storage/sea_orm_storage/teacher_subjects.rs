//! 任课分配存储操作

use super::{SeaOrmStorage, now_ts};
use crate::entity::teacher_subjects::{ActiveModel, Column, Entity as TeacherSubjects};
use crate::errors::{Result, SchoolSysError};
use crate::models::teacher_subjects::{entities::TeacherSubject, requests::TeacherSubjectQuery};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, QueryOrder, Set,
    TransactionTrait,
};

fn new_assignment(teacher_id: i64, subject_id: i64, class_id: i64) -> ActiveModel {
    ActiveModel {
        teacher_id: Set(teacher_id),
        subject_id: Set(subject_id),
        class_id: Set(class_id),
        created_at: Set(now_ts()),
        ..Default::default()
    }
}

async fn find_assignment<C: ConnectionTrait>(
    db: &C,
    teacher_id: i64,
    subject_id: i64,
    class_id: i64,
) -> Result<Option<TeacherSubject>> {
    let result = TeacherSubjects::find()
        .filter(Column::TeacherId.eq(teacher_id))
        .filter(Column::SubjectId.eq(subject_id))
        .filter(Column::ClassId.eq(class_id))
        .one(db)
        .await
        .map_err(|e| SchoolSysError::database_operation(format!("查询任课分配失败: {e}")))?;

    Ok(result.map(|m| m.into_teacher_subject()))
}

impl SeaOrmStorage {
    pub async fn create_teacher_subject_impl(
        &self,
        teacher_id: i64,
        subject_id: i64,
        class_id: i64,
    ) -> Result<TeacherSubject> {
        let result = new_assignment(teacher_id, subject_id, class_id)
            .insert(&self.db)
            .await
            .map_err(|e| SchoolSysError::database_operation(format!("创建任课分配失败: {e}")))?;

        Ok(result.into_teacher_subject())
    }

    pub async fn find_teacher_subject_impl(
        &self,
        teacher_id: i64,
        subject_id: i64,
        class_id: i64,
    ) -> Result<Option<TeacherSubject>> {
        find_assignment(&self.db, teacher_id, subject_id, class_id).await
    }

    pub async fn list_teacher_subjects_impl(
        &self,
        query: TeacherSubjectQuery,
    ) -> Result<Vec<TeacherSubject>> {
        let mut select = TeacherSubjects::find();

        if let Some(teacher_id) = query.teacher_id {
            select = select.filter(Column::TeacherId.eq(teacher_id));
        }
        if let Some(class_id) = query.class_id {
            select = select.filter(Column::ClassId.eq(class_id));
        }
        if let Some(subject_id) = query.subject_id {
            select = select.filter(Column::SubjectId.eq(subject_id));
        }

        let rows = select
            .order_by_asc(Column::ClassId)
            .order_by_asc(Column::SubjectId)
            .all(&self.db)
            .await
            .map_err(|e| {
                SchoolSysError::database_operation(format!("查询任课分配列表失败: {e}"))
            })?;

        Ok(rows.into_iter().map(|m| m.into_teacher_subject()).collect())
    }

    /// 在同一事务中批量分配，已存在的组合跳过
    pub async fn bulk_assign_teacher_subjects_impl(
        &self,
        teacher_id: i64,
        class_id: i64,
        subject_ids: &[i64],
    ) -> Result<(Vec<TeacherSubject>, Vec<i64>)> {
        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| SchoolSysError::database_operation(format!("开启事务失败: {e}")))?;

        let mut created = Vec::new();
        let mut skipped = Vec::new();

        for &subject_id in subject_ids {
            if find_assignment(&txn, teacher_id, subject_id, class_id)
                .await?
                .is_some()
                || created
                    .iter()
                    .any(|c: &TeacherSubject| c.subject_id == subject_id)
            {
                skipped.push(subject_id);
                continue;
            }

            let model = new_assignment(teacher_id, subject_id, class_id)
                .insert(&txn)
                .await
                .map_err(|e| {
                    SchoolSysError::database_operation(format!("创建任课分配失败: {e}"))
                })?;
            created.push(model.into_teacher_subject());
        }

        txn.commit()
            .await
            .map_err(|e| SchoolSysError::database_operation(format!("提交事务失败: {e}")))?;

        Ok((created, skipped))
    }

    pub async fn delete_teacher_subject_impl(&self, id: i64) -> Result<bool> {
        let result = TeacherSubjects::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(|e| SchoolSysError::database_operation(format!("删除任课分配失败: {e}")))?;

        Ok(result.rows_affected > 0)
    }
}
