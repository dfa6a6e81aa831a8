//! 班级存储操作

use super::{SeaOrmStorage, now_ts, page_bounds, pagination_info};
use crate::entity::classes::{ActiveModel, Column, Entity as Classes};
use crate::errors::{Result, SchoolSysError};
use crate::models::classes::{
    entities::Class,
    requests::{ClassListQuery, CreateClassRequest, UpdateClassRequest},
    responses::ClassListResponse,
};
use crate::utils::contains_pattern;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, Set,
};

impl SeaOrmStorage {
    /// 创建班级
    pub async fn create_class_impl(&self, req: CreateClassRequest) -> Result<Class> {
        let now = now_ts();

        let model = ActiveModel {
            school_id: Set(req.school_id),
            name: Set(req.name),
            level: Set(req.level),
            class_teacher_id: Set(req.class_teacher_id),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        let result = model
            .insert(&self.db)
            .await
            .map_err(|e| SchoolSysError::database_operation(format!("创建班级失败: {e}")))?;

        Ok(result.into_class())
    }

    /// 通过 ID 获取班级
    pub async fn get_class_by_id_impl(&self, class_id: i64) -> Result<Option<Class>> {
        let result = Classes::find_by_id(class_id)
            .one(&self.db)
            .await
            .map_err(|e| SchoolSysError::database_operation(format!("查询班级失败: {e}")))?;

        Ok(result.map(|m| m.into_class()))
    }

    /// 分页列出班级
    pub async fn list_classes_with_pagination_impl(
        &self,
        query: ClassListQuery,
    ) -> Result<ClassListResponse> {
        let (page, size) = page_bounds(query.page, query.size);

        let mut select = Classes::find();

        // 学校筛选
        if let Some(school_id) = query.school_id {
            select = select.filter(Column::SchoolId.eq(school_id));
        }

        // 搜索条件
        if let Some(ref search) = query.search
            && !search.trim().is_empty()
        {
            select = select.filter(Column::Name.like(contains_pattern(search.trim())));
        }

        // 按年级、名称排序
        select = select
            .order_by_asc(Column::Level)
            .order_by_asc(Column::Name);

        let paginator = select.paginate(&self.db, size);
        let total = paginator
            .num_items()
            .await
            .map_err(|e| SchoolSysError::database_operation(format!("查询班级总数失败: {e}")))?;

        let pages = paginator
            .num_pages()
            .await
            .map_err(|e| SchoolSysError::database_operation(format!("查询班级页数失败: {e}")))?;

        let classes = paginator
            .fetch_page(page - 1)
            .await
            .map_err(|e| SchoolSysError::database_operation(format!("查询班级列表失败: {e}")))?;

        Ok(ClassListResponse {
            items: classes.into_iter().map(|m| m.into_class()).collect(),
            pagination: pagination_info(page, size, total, pages),
        })
    }

    /// 更新班级信息
    pub async fn update_class_impl(
        &self,
        class_id: i64,
        update: UpdateClassRequest,
    ) -> Result<Option<Class>> {
        if self.get_class_by_id_impl(class_id).await?.is_none() {
            return Ok(None);
        }

        let mut model = ActiveModel {
            id: Set(class_id),
            updated_at: Set(now_ts()),
            ..Default::default()
        };

        if let Some(name) = update.name {
            model.name = Set(name);
        }

        if let Some(level) = update.level {
            model.level = Set(level);
        }

        if let Some(class_teacher_id) = update.class_teacher_id {
            model.class_teacher_id = Set(Some(class_teacher_id));
        }

        model
            .update(&self.db)
            .await
            .map_err(|e| SchoolSysError::database_operation(format!("更新班级失败: {e}")))?;

        self.get_class_by_id_impl(class_id).await
    }

    /// 删除班级
    pub async fn delete_class_impl(&self, class_id: i64) -> Result<bool> {
        let result = Classes::delete_by_id(class_id)
            .exec(&self.db)
            .await
            .map_err(|e| SchoolSysError::database_operation(format!("删除班级失败: {e}")))?;

        Ok(result.rows_affected > 0)
    }

    pub async fn count_classes_impl(&self, school_id: Option<i64>) -> Result<u64> {
        let mut select = Classes::find();
        if let Some(school_id) = school_id {
            select = select.filter(Column::SchoolId.eq(school_id));
        }

        select
            .count(&self.db)
            .await
            .map_err(|e| SchoolSysError::database_operation(format!("统计班级数量失败: {e}")))
    }
}
