//! 学期存储操作
//!
//! 同一学校同一时刻至多一个当前学期，设置当前学期时在事务内清除其他标记。

use super::{SeaOrmStorage, now_ts};
use crate::entity::terms::{ActiveModel, Column, Entity as Terms};
use crate::errors::{Result, SchoolSysError};
use crate::models::terms::{
    entities::Term,
    requests::{CreateTermRequest, TermQuery, UpdateTermRequest},
};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, QueryOrder, Set,
    TransactionTrait, sea_query::Expr,
};

// 清除学校内所有当前学期标记
async fn clear_current<C: ConnectionTrait>(db: &C, school_id: i64) -> Result<()> {
    Terms::update_many()
        .col_expr(Column::IsCurrent, Expr::value(false))
        .filter(Column::SchoolId.eq(school_id))
        .filter(Column::IsCurrent.eq(true))
        .exec(db)
        .await
        .map_err(|e| SchoolSysError::database_operation(format!("更新当前学期失败: {e}")))?;
    Ok(())
}

impl SeaOrmStorage {
    pub async fn create_term_impl(&self, req: CreateTermRequest) -> Result<Term> {
        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| SchoolSysError::database_operation(format!("开启事务失败: {e}")))?;

        if req.is_current {
            clear_current(&txn, req.school_id).await?;
        }

        let model = ActiveModel {
            school_id: Set(req.school_id),
            name: Set(req.name),
            year: Set(req.year),
            start_date: Set(req.start_date),
            end_date: Set(req.end_date),
            is_current: Set(req.is_current),
            created_at: Set(now_ts()),
            ..Default::default()
        };

        let result = model
            .insert(&txn)
            .await
            .map_err(|e| SchoolSysError::database_operation(format!("创建学期失败: {e}")))?;

        txn.commit()
            .await
            .map_err(|e| SchoolSysError::database_operation(format!("提交事务失败: {e}")))?;

        Ok(result.into_term())
    }

    pub async fn get_term_by_id_impl(&self, id: i64) -> Result<Option<Term>> {
        let result = Terms::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| SchoolSysError::database_operation(format!("查询学期失败: {e}")))?;

        Ok(result.map(|m| m.into_term()))
    }

    /// 列出学期，按年份倒序、开始日期倒序
    pub async fn list_terms_impl(&self, query: TermQuery) -> Result<Vec<Term>> {
        let mut select = Terms::find();

        if let Some(school_id) = query.school_id {
            select = select.filter(Column::SchoolId.eq(school_id));
        }
        if let Some(year) = query.year {
            select = select.filter(Column::Year.eq(year));
        }
        if query.current_only {
            select = select.filter(Column::IsCurrent.eq(true));
        }

        let terms = select
            .order_by_desc(Column::Year)
            .order_by_desc(Column::StartDate)
            .all(&self.db)
            .await
            .map_err(|e| SchoolSysError::database_operation(format!("查询学期列表失败: {e}")))?;

        Ok(terms.into_iter().map(|m| m.into_term()).collect())
    }

    pub async fn list_terms_by_ids_impl(&self, ids: &[i64]) -> Result<Vec<Term>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let terms = Terms::find()
            .filter(Column::Id.is_in(ids.iter().copied()))
            .all(&self.db)
            .await
            .map_err(|e| SchoolSysError::database_operation(format!("查询学期列表失败: {e}")))?;

        Ok(terms.into_iter().map(|m| m.into_term()).collect())
    }

    pub async fn update_term_impl(&self, id: i64, update: UpdateTermRequest) -> Result<Option<Term>> {
        let Some(existing) = self.get_term_by_id_impl(id).await? else {
            return Ok(None);
        };

        let mut model = ActiveModel {
            id: Set(id),
            ..Default::default()
        };
        let mut changed = false;

        if let Some(name) = update.name {
            model.name = Set(name);
            changed = true;
        }
        if let Some(year) = update.year {
            model.year = Set(year);
            changed = true;
        }
        if let Some(start_date) = update.start_date {
            model.start_date = Set(start_date);
            changed = true;
        }
        if let Some(end_date) = update.end_date {
            model.end_date = Set(end_date);
            changed = true;
        }
        if let Some(is_current) = update.is_current {
            model.is_current = Set(is_current);
            changed = true;
        }

        if !changed {
            return Ok(Some(existing));
        }

        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| SchoolSysError::database_operation(format!("开启事务失败: {e}")))?;

        if update.is_current == Some(true) {
            clear_current(&txn, existing.school_id).await?;
        }

        model
            .update(&txn)
            .await
            .map_err(|e| SchoolSysError::database_operation(format!("更新学期失败: {e}")))?;

        txn.commit()
            .await
            .map_err(|e| SchoolSysError::database_operation(format!("提交事务失败: {e}")))?;

        self.get_term_by_id_impl(id).await
    }

    pub async fn delete_term_impl(&self, id: i64) -> Result<bool> {
        let result = Terms::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(|e| SchoolSysError::database_operation(format!("删除学期失败: {e}")))?;

        Ok(result.rows_affected > 0)
    }
}
