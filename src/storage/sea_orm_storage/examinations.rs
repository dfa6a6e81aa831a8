//! 考试存储操作

use super::{SeaOrmStorage, now_ts, page_bounds, pagination_info};
use crate::entity::examinations::{ActiveModel, Column, Entity as Examinations};
use crate::errors::{Result, SchoolSysError};
use crate::models::examinations::{
    entities::Examination,
    requests::{CreateExaminationRequest, ExaminationListQuery, UpdateExaminationRequest},
    responses::ExaminationListResponse,
};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
    Set,
};

impl SeaOrmStorage {
    pub async fn create_examination_impl(
        &self,
        req: CreateExaminationRequest,
    ) -> Result<Examination> {
        let now = now_ts();

        let model = ActiveModel {
            school_id: Set(req.school_id),
            term_id: Set(req.term_id),
            name: Set(req.name),
            year: Set(req.year),
            class_id: Set(req.class_id),
            max_score: Set(req.max_score),
            start_date: Set(req.start_date),
            end_date: Set(req.end_date),
            published: Set(req.published),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        let result = model
            .insert(&self.db)
            .await
            .map_err(|e| SchoolSysError::database_operation(format!("创建考试失败: {e}")))?;

        Ok(result.into_examination())
    }

    pub async fn get_examination_by_id_impl(&self, id: i64) -> Result<Option<Examination>> {
        let result = Examinations::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| SchoolSysError::database_operation(format!("查询考试失败: {e}")))?;

        Ok(result.map(|m| m.into_examination()))
    }

    /// 分页列出考试
    ///
    /// 按班级筛选时同时包含全校考试（class_id 为空）
    pub async fn list_examinations_with_pagination_impl(
        &self,
        query: ExaminationListQuery,
    ) -> Result<ExaminationListResponse> {
        let (page, size) = page_bounds(query.page, query.size);

        let mut select = Examinations::find();

        if let Some(school_id) = query.school_id {
            select = select.filter(Column::SchoolId.eq(school_id));
        }
        if let Some(term_id) = query.term_id {
            select = select.filter(Column::TermId.eq(term_id));
        }
        if let Some(class_id) = query.class_id {
            select = select.filter(
                Condition::any()
                    .add(Column::ClassId.eq(class_id))
                    .add(Column::ClassId.is_null()),
            );
        }
        if let Some(year) = query.year {
            select = select.filter(Column::Year.eq(year));
        }
        if query.published_only {
            select = select.filter(Column::Published.eq(true));
        }

        let paginator = select
            .order_by_desc(Column::Year)
            .order_by_desc(Column::CreatedAt)
            .paginate(&self.db, size);
        let total = paginator
            .num_items()
            .await
            .map_err(|e| SchoolSysError::database_operation(format!("查询考试总数失败: {e}")))?;
        let pages = paginator
            .num_pages()
            .await
            .map_err(|e| SchoolSysError::database_operation(format!("查询考试页数失败: {e}")))?;
        let exams = paginator
            .fetch_page(page - 1)
            .await
            .map_err(|e| SchoolSysError::database_operation(format!("查询考试列表失败: {e}")))?;

        Ok(ExaminationListResponse {
            items: exams.into_iter().map(|m| m.into_examination()).collect(),
            pagination: pagination_info(page, size, total, pages),
        })
    }

    pub async fn list_examinations_by_ids_impl(&self, ids: &[i64]) -> Result<Vec<Examination>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let exams = Examinations::find()
            .filter(Column::Id.is_in(ids.iter().copied()))
            .all(&self.db)
            .await
            .map_err(|e| SchoolSysError::database_operation(format!("查询考试列表失败: {e}")))?;

        Ok(exams.into_iter().map(|m| m.into_examination()).collect())
    }

    pub async fn update_examination_impl(
        &self,
        id: i64,
        update: UpdateExaminationRequest,
    ) -> Result<Option<Examination>> {
        if self.get_examination_by_id_impl(id).await?.is_none() {
            return Ok(None);
        }

        let mut model = ActiveModel {
            id: Set(id),
            updated_at: Set(now_ts()),
            ..Default::default()
        };

        if let Some(term_id) = update.term_id {
            model.term_id = Set(term_id);
        }
        if let Some(name) = update.name {
            model.name = Set(name);
        }
        if let Some(year) = update.year {
            model.year = Set(year);
        }
        if let Some(class_id) = update.class_id {
            model.class_id = Set(class_id);
        }
        if let Some(max_score) = update.max_score {
            model.max_score = Set(max_score);
        }
        if let Some(start_date) = update.start_date {
            model.start_date = Set(Some(start_date));
        }
        if let Some(end_date) = update.end_date {
            model.end_date = Set(Some(end_date));
        }
        if let Some(published) = update.published {
            model.published = Set(published);
        }

        model
            .update(&self.db)
            .await
            .map_err(|e| SchoolSysError::database_operation(format!("更新考试失败: {e}")))?;

        self.get_examination_by_id_impl(id).await
    }

    pub async fn delete_examination_impl(&self, id: i64) -> Result<bool> {
        let result = Examinations::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(|e| SchoolSysError::database_operation(format!("删除考试失败: {e}")))?;

        Ok(result.rows_affected > 0)
    }

    pub async fn count_examinations_impl(&self, school_id: Option<i64>) -> Result<u64> {
        let mut select = Examinations::find();
        if let Some(school_id) = school_id {
            select = select.filter(Column::SchoolId.eq(school_id));
        }

        select
            .count(&self.db)
            .await
            .map_err(|e| SchoolSysError::database_operation(format!("统计考试数量失败: {e}")))
    }
}
