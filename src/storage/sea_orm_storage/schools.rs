use super::{SeaOrmStorage, now_ts, page_bounds, pagination_info};
use crate::entity::schools::{ActiveModel, Column, Entity as Schools};
use crate::errors::{Result, SchoolSysError};
use crate::models::schools::{
    entities::School,
    requests::{CreateSchoolRequest, SchoolListQuery, UpdateSchoolRequest},
    responses::SchoolListResponse,
};
use crate::utils::contains_pattern;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
    Set,
};

impl SeaOrmStorage {
    /// 创建学校
    pub async fn create_school_impl(&self, req: CreateSchoolRequest) -> Result<School> {
        let now = now_ts();

        let model = ActiveModel {
            name: Set(req.name),
            code: Set(req.code.unwrap_or_default()),
            address: Set(req.address),
            phone: Set(req.phone),
            email: Set(req.email),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        let result = model
            .insert(&self.db)
            .await
            .map_err(|e| SchoolSysError::database_operation(format!("创建学校失败: {e}")))?;

        Ok(result.into_school())
    }

    pub async fn get_school_by_id_impl(&self, id: i64) -> Result<Option<School>> {
        let result = Schools::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| SchoolSysError::database_operation(format!("查询学校失败: {e}")))?;

        Ok(result.map(|m| m.into_school()))
    }

    pub async fn get_school_by_code_impl(&self, code: &str) -> Result<Option<School>> {
        let result = Schools::find()
            .filter(Column::Code.eq(code))
            .one(&self.db)
            .await
            .map_err(|e| SchoolSysError::database_operation(format!("查询学校失败: {e}")))?;

        Ok(result.map(|m| m.into_school()))
    }

    /// 分页列出学校
    pub async fn list_schools_with_pagination_impl(
        &self,
        query: SchoolListQuery,
    ) -> Result<SchoolListResponse> {
        let (page, size) = page_bounds(query.page, query.size);

        let mut select = Schools::find();

        if let Some(only_id) = query.only_id {
            select = select.filter(Column::Id.eq(only_id));
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

        let paginator = select.order_by_asc(Column::Name).paginate(&self.db, size);
        let total = paginator
            .num_items()
            .await
            .map_err(|e| SchoolSysError::database_operation(format!("查询学校总数失败: {e}")))?;
        let pages = paginator
            .num_pages()
            .await
            .map_err(|e| SchoolSysError::database_operation(format!("查询学校页数失败: {e}")))?;
        let schools = paginator
            .fetch_page(page - 1)
            .await
            .map_err(|e| SchoolSysError::database_operation(format!("查询学校列表失败: {e}")))?;

        Ok(SchoolListResponse {
            items: schools.into_iter().map(|m| m.into_school()).collect(),
            pagination: pagination_info(page, size, total, pages),
        })
    }

    /// 更新学校
    pub async fn update_school_impl(
        &self,
        id: i64,
        update: UpdateSchoolRequest,
    ) -> Result<Option<School>> {
        if self.get_school_by_id_impl(id).await?.is_none() {
            return Ok(None);
        }

        let mut model = ActiveModel {
            id: Set(id),
            updated_at: Set(now_ts()),
            ..Default::default()
        };

        if let Some(name) = update.name {
            model.name = Set(name);
        }
        if let Some(code) = update.code {
            model.code = Set(code);
        }
        if let Some(address) = update.address {
            model.address = Set(Some(address));
        }
        if let Some(phone) = update.phone {
            model.phone = Set(Some(phone));
        }
        if let Some(email) = update.email {
            model.email = Set(Some(email));
        }

        model
            .update(&self.db)
            .await
            .map_err(|e| SchoolSysError::database_operation(format!("更新学校失败: {e}")))?;

        self.get_school_by_id_impl(id).await
    }

    pub async fn delete_school_impl(&self, id: i64) -> Result<bool> {
        let result = Schools::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(|e| SchoolSysError::database_operation(format!("删除学校失败: {e}")))?;

        Ok(result.rows_affected > 0)
    }

    pub async fn count_schools_impl(&self) -> Result<u64> {
        Schools::find()
            .count(&self.db)
            .await
            .map_err(|e| SchoolSysError::database_operation(format!("统计学校数量失败: {e}")))
    }
}
