//! 考试成绩存储操作
//!
//! 成绩以 (student_id, subject_id, examination_id) 唯一，写入一律走 upsert。

use super::{SeaOrmStorage, now_ts};
use crate::entity::results::{ActiveModel, Column, Entity as Results};
use crate::entity::students;
use crate::errors::{Result, SchoolSysError};
use crate::models::results::{
    entities::{ExamResult, ResultUpsert},
    requests::ResultQuery,
};
use sea_orm::{
    ColumnTrait, ConnectionTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
    QuerySelect, RelationTrait, Set, TransactionTrait, sea_query::OnConflict,
};

fn upsert_conflict() -> OnConflict {
    OnConflict::columns([Column::StudentId, Column::SubjectId, Column::ExaminationId])
        .update_columns([
            Column::Score,
            Column::Remarks,
            Column::EnteredBy,
            Column::UpdatedAt,
        ])
        .to_owned()
}

async fn upsert_one<C: ConnectionTrait>(db: &C, row: &ResultUpsert) -> Result<()> {
    let now = now_ts();
    let model = ActiveModel {
        student_id: Set(row.student_id),
        subject_id: Set(row.subject_id),
        examination_id: Set(row.examination_id),
        score: Set(row.score),
        remarks: Set(row.remarks.clone()),
        entered_by: Set(row.entered_by),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    };

    Results::insert(model)
        .on_conflict(upsert_conflict())
        .exec_without_returning(db)
        .await
        .map_err(|e| SchoolSysError::database_operation(format!("写入成绩失败: {e}")))?;

    Ok(())
}

impl SeaOrmStorage {
    pub async fn upsert_result_impl(&self, row: ResultUpsert) -> Result<ExamResult> {
        upsert_one(&self.db, &row).await?;

        let result = Results::find()
            .filter(Column::StudentId.eq(row.student_id))
            .filter(Column::SubjectId.eq(row.subject_id))
            .filter(Column::ExaminationId.eq(row.examination_id))
            .one(&self.db)
            .await
            .map_err(|e| SchoolSysError::database_operation(format!("查询成绩失败: {e}")))?
            .ok_or_else(|| SchoolSysError::database_operation("写入后未找到成绩记录"))?;

        Ok(result.into_result())
    }

    /// 批量写入，任一行失败则整体回滚
    pub async fn upsert_results_impl(&self, rows: Vec<ResultUpsert>) -> Result<usize> {
        if rows.is_empty() {
            return Ok(0);
        }

        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| SchoolSysError::database_operation(format!("开启事务失败: {e}")))?;

        for row in &rows {
            upsert_one(&txn, row).await?;
        }

        txn.commit()
            .await
            .map_err(|e| SchoolSysError::database_operation(format!("提交事务失败: {e}")))?;

        Ok(rows.len())
    }

    pub async fn get_result_by_id_impl(&self, id: i64) -> Result<Option<ExamResult>> {
        let result = Results::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| SchoolSysError::database_operation(format!("查询成绩失败: {e}")))?;

        Ok(result.map(|m| m.into_result()))
    }

    /// 按条件列出成绩，class_id 通过学生表关联筛选
    pub async fn list_results_impl(&self, query: ResultQuery) -> Result<Vec<ExamResult>> {
        let mut select = Results::find();

        if let Some(examination_id) = query.examination_id {
            select = select.filter(Column::ExaminationId.eq(examination_id));
        }
        if let Some(subject_id) = query.subject_id {
            select = select.filter(Column::SubjectId.eq(subject_id));
        }
        if let Some(student_id) = query.student_id {
            select = select.filter(Column::StudentId.eq(student_id));
        }
        if let Some(class_id) = query.class_id {
            select = select
                .join(
                    sea_orm::JoinType::InnerJoin,
                    crate::entity::results::Relation::Student.def(),
                )
                .filter(students::Column::ClassId.eq(class_id));
        }

        let results = select
            .order_by_asc(Column::StudentId)
            .order_by_asc(Column::SubjectId)
            .all(&self.db)
            .await
            .map_err(|e| SchoolSysError::database_operation(format!("查询成绩列表失败: {e}")))?;

        Ok(results.into_iter().map(|m| m.into_result()).collect())
    }

    pub async fn delete_result_impl(&self, id: i64) -> Result<bool> {
        let result = Results::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(|e| SchoolSysError::database_operation(format!("删除成绩失败: {e}")))?;

        Ok(result.rows_affected > 0)
    }

    pub async fn count_results_entered_by_impl(&self, user_id: i64) -> Result<u64> {
        Results::find()
            .filter(Column::EnteredBy.eq(user_id))
            .count(&self.db)
            .await
            .map_err(|e| SchoolSysError::database_operation(format!("统计成绩数量失败: {e}")))
    }
}
