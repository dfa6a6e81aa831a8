//! 教师存储操作

use super::{SeaOrmStorage, now_ts, page_bounds, pagination_info};
use crate::entity::teachers::{ActiveModel, Column, Entity as Teachers, Model};
use crate::entity::users::{self, Entity as Users};
use crate::errors::{Result, SchoolSysError};
use crate::models::teachers::{
    entities::{Teacher, TeacherWithUser},
    requests::{CreateTeacherRequest, TeacherListQuery, UpdateTeacherRequest},
    responses::TeacherListResponse,
};
use crate::utils::contains_pattern;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
    Set,
};

// 合并教师档案与账户信息，账户缺失时跳过
fn with_user(pair: (Model, Option<users::Model>)) -> Option<TeacherWithUser> {
    let (teacher, user) = pair;
    let user = user?;
    Some(TeacherWithUser {
        teacher: teacher.into_teacher(),
        username: user.username,
        email: user.email,
        display_name: user.display_name,
    })
}

impl SeaOrmStorage {
    pub async fn create_teacher_impl(&self, req: CreateTeacherRequest) -> Result<Teacher> {
        let model = ActiveModel {
            school_id: Set(req.school_id),
            user_id: Set(req.user_id),
            staff_number: Set(req.staff_number),
            phone: Set(req.phone),
            created_at: Set(now_ts()),
            ..Default::default()
        };

        let result = model
            .insert(&self.db)
            .await
            .map_err(|e| SchoolSysError::database_operation(format!("创建教师失败: {e}")))?;

        Ok(result.into_teacher())
    }

    pub async fn get_teacher_by_id_impl(&self, id: i64) -> Result<Option<Teacher>> {
        let result = Teachers::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| SchoolSysError::database_operation(format!("查询教师失败: {e}")))?;

        Ok(result.map(|m| m.into_teacher()))
    }

    pub async fn get_teacher_by_user_id_impl(&self, user_id: i64) -> Result<Option<Teacher>> {
        let result = Teachers::find()
            .filter(Column::UserId.eq(user_id))
            .one(&self.db)
            .await
            .map_err(|e| SchoolSysError::database_operation(format!("查询教师失败: {e}")))?;

        Ok(result.map(|m| m.into_teacher()))
    }

    /// 分页列出教师（附带账户信息）
    pub async fn list_teachers_with_pagination_impl(
        &self,
        query: TeacherListQuery,
    ) -> Result<TeacherListResponse> {
        let (page, size) = page_bounds(query.page, query.size);

        let mut select = Teachers::find().find_also_related(Users);

        if let Some(school_id) = query.school_id {
            select = select.filter(Column::SchoolId.eq(school_id));
        }

        if let Some(ref search) = query.search
            && !search.trim().is_empty()
        {
            let search = search.trim();
            select = select.filter(
                Condition::any()
                    .add(users::Column::Username.like(contains_pattern(search)))
                    .add(users::Column::DisplayName.like(contains_pattern(search)))
                    .add(Column::StaffNumber.like(contains_pattern(search))),
            );
        }

        let paginator = select
            .order_by_asc(Column::Id)
            .paginate(&self.db, size);
        let total = paginator
            .num_items()
            .await
            .map_err(|e| SchoolSysError::database_operation(format!("查询教师总数失败: {e}")))?;
        let pages = paginator
            .num_pages()
            .await
            .map_err(|e| SchoolSysError::database_operation(format!("查询教师页数失败: {e}")))?;
        let rows = paginator
            .fetch_page(page - 1)
            .await
            .map_err(|e| SchoolSysError::database_operation(format!("查询教师列表失败: {e}")))?;

        Ok(TeacherListResponse {
            items: rows.into_iter().filter_map(with_user).collect(),
            pagination: pagination_info(page, size, total, pages),
        })
    }

    pub async fn list_teachers_with_user_by_ids_impl(
        &self,
        ids: &[i64],
    ) -> Result<Vec<TeacherWithUser>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let rows = Teachers::find()
            .find_also_related(Users)
            .filter(Column::Id.is_in(ids.iter().copied()))
            .order_by_asc(Column::Id)
            .all(&self.db)
            .await
            .map_err(|e| SchoolSysError::database_operation(format!("查询教师列表失败: {e}")))?;

        Ok(rows.into_iter().filter_map(with_user).collect())
    }

    pub async fn update_teacher_impl(
        &self,
        id: i64,
        update: UpdateTeacherRequest,
    ) -> Result<Option<Teacher>> {
        let existing = self.get_teacher_by_id_impl(id).await?;
        if existing.is_none() || (update.staff_number.is_none() && update.phone.is_none()) {
            return Ok(existing);
        }

        let mut model = ActiveModel {
            id: Set(id),
            ..Default::default()
        };

        if let Some(staff_number) = update.staff_number {
            model.staff_number = Set(Some(staff_number));
        }
        if let Some(phone) = update.phone {
            model.phone = Set(Some(phone));
        }

        model
            .update(&self.db)
            .await
            .map_err(|e| SchoolSysError::database_operation(format!("更新教师失败: {e}")))?;

        self.get_teacher_by_id_impl(id).await
    }

    pub async fn delete_teacher_impl(&self, id: i64) -> Result<bool> {
        let result = Teachers::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(|e| SchoolSysError::database_operation(format!("删除教师失败: {e}")))?;

        Ok(result.rows_affected > 0)
    }

    pub async fn count_teachers_impl(&self, school_id: Option<i64>) -> Result<u64> {
        let mut select = Teachers::find();
        if let Some(school_id) = school_id {
            select = select.filter(Column::SchoolId.eq(school_id));
        }

        select
            .count(&self.db)
            .await
            .map_err(|e| SchoolSysError::database_operation(format!("统计教师数量失败: {e}")))
    }
}
