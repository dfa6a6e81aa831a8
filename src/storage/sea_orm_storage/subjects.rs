//! 科目存储操作

use super::{SeaOrmStorage, now_ts, page_bounds, pagination_info};
use crate::entity::subjects::{ActiveModel, Column, Entity as Subjects};
use crate::errors::{Result, SchoolSysError};
use crate::models::subjects::{
    entities::Subject,
    requests::{CreateSubjectRequest, SubjectListQuery, UpdateSubjectRequest},
    responses::SubjectListResponse,
};
use crate::utils::contains_pattern;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
    Set,
};

impl SeaOrmStorage {
    pub async fn create_subject_impl(&self, req: CreateSubjectRequest) -> Result<Subject> {
        let model = ActiveModel {
            school_id: Set(req.school_id),
            name: Set(req.name),
            code: Set(req.code),
            created_at: Set(now_ts()),
            ..Default::default()
        };

        let result = model
            .insert(&self.db)
            .await
            .map_err(|e| SchoolSysError::database_operation(format!("创建科目失败: {e}")))?;

        Ok(result.into_subject())
    }

    pub async fn get_subject_by_id_impl(&self, id: i64) -> Result<Option<Subject>> {
        let result = Subjects::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| SchoolSysError::database_operation(format!("查询科目失败: {e}")))?;

        Ok(result.map(|m| m.into_subject()))
    }

    pub async fn list_subjects_with_pagination_impl(
        &self,
        query: SubjectListQuery,
    ) -> Result<SubjectListResponse> {
        let (page, size) = page_bounds(query.page, query.size);

        let mut select = Subjects::find();

        if let Some(school_id) = query.school_id {
            select = select.filter(Column::SchoolId.eq(school_id));
        }

        if let Some(ref search) = query.search
            && !search.trim().is_empty()
        {
            let search = search.trim();
            select = select.filter(
                Condition::any()
                    .add(Column::Name.like(contains_pattern(search)))
                    .add(Column::Code.like(contains_pattern(search))),
            );
        }

        let paginator = select.order_by_asc(Column::Code).paginate(&self.db, size);
        let total = paginator
            .num_items()
            .await
            .map_err(|e| SchoolSysError::database_operation(format!("查询科目总数失败: {e}")))?;
        let pages = paginator
            .num_pages()
            .await
            .map_err(|e| SchoolSysError::database_operation(format!("查询科目页数失败: {e}")))?;
        let subjects = paginator
            .fetch_page(page - 1)
            .await
            .map_err(|e| SchoolSysError::database_operation(format!("查询科目列表失败: {e}")))?;

        Ok(SubjectListResponse {
            items: subjects.into_iter().map(|m| m.into_subject()).collect(),
            pagination: pagination_info(page, size, total, pages),
        })
    }

    pub async fn list_subjects_by_ids_impl(&self, ids: &[i64]) -> Result<Vec<Subject>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let subjects = Subjects::find()
            .filter(Column::Id.is_in(ids.iter().copied()))
            .order_by_asc(Column::Code)
            .all(&self.db)
            .await
            .map_err(|e| SchoolSysError::database_operation(format!("查询科目列表失败: {e}")))?;

        Ok(subjects.into_iter().map(|m| m.into_subject()).collect())
    }

    pub async fn update_subject_impl(
        &self,
        id: i64,
        update: UpdateSubjectRequest,
    ) -> Result<Option<Subject>> {
        let existing = self.get_subject_by_id_impl(id).await?;
        // 不存在或无字段变更时直接返回
        if existing.is_none() || (update.name.is_none() && update.code.is_none()) {
            return Ok(existing);
        }

        let mut model = ActiveModel {
            id: Set(id),
            ..Default::default()
        };

        if let Some(name) = update.name {
            model.name = Set(name);
        }
        if let Some(code) = update.code {
            model.code = Set(code);
        }

        model
            .update(&self.db)
            .await
            .map_err(|e| SchoolSysError::database_operation(format!("更新科目失败: {e}")))?;

        self.get_subject_by_id_impl(id).await
    }

    pub async fn delete_subject_impl(&self, id: i64) -> Result<bool> {
        let result = Subjects::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(|e| SchoolSysError::database_operation(format!("删除科目失败: {e}")))?;

        Ok(result.rows_affected > 0)
    }

    pub async fn count_subjects_impl(&self, school_id: Option<i64>) -> Result<u64> {
        let mut select = Subjects::find();
        if let Some(school_id) = school_id {
            select = select.filter(Column::SchoolId.eq(school_id));
        }

        select
            .count(&self.db)
            .await
            .map_err(|e| SchoolSysError::database_operation(format!("统计科目数量失败: {e}")))
    }
}
