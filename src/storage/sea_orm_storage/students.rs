//! 学生存储操作

use super::{SeaOrmStorage, now_ts, page_bounds, pagination_info};
use crate::entity::students::{ActiveModel, Column, Entity as Students};
use crate::errors::{Result, SchoolSysError};
use crate::models::students::{
    entities::Student,
    requests::{CreateStudentRequest, StudentListQuery, UpdateStudentRequest},
    responses::StudentListResponse,
};
use crate::utils::contains_pattern;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
    Set,
};

impl SeaOrmStorage {
    /// 创建学生
    pub async fn create_student_impl(
        &self,
        school_id: i64,
        req: CreateStudentRequest,
    ) -> Result<Student> {
        let now = now_ts();

        let model = ActiveModel {
            school_id: Set(school_id),
            user_id: Set(req.user_id),
            admission_number: Set(req.admission_number),
            first_name: Set(req.first_name),
            last_name: Set(req.last_name),
            gender: Set(req.gender),
            date_of_birth: Set(req.date_of_birth),
            class_id: Set(req.class_id),
            stream_id: Set(req.stream_id),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        let result = model
            .insert(&self.db)
            .await
            .map_err(|e| SchoolSysError::database_operation(format!("创建学生失败: {e}")))?;

        Ok(result.into_student())
    }

    pub async fn get_student_by_id_impl(&self, id: i64) -> Result<Option<Student>> {
        let result = Students::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| SchoolSysError::database_operation(format!("查询学生失败: {e}")))?;

        Ok(result.map(|m| m.into_student()))
    }

    /// 通过关联账号获取学生档案
    pub async fn get_student_by_user_id_impl(&self, user_id: i64) -> Result<Option<Student>> {
        let result = Students::find()
            .filter(Column::UserId.eq(user_id))
            .one(&self.db)
            .await
            .map_err(|e| SchoolSysError::database_operation(format!("查询学生失败: {e}")))?;

        Ok(result.map(|m| m.into_student()))
    }

    /// 通过学号获取学生（学号在学校内唯一）
    pub async fn get_student_by_admission_number_impl(
        &self,
        school_id: i64,
        admission_number: &str,
    ) -> Result<Option<Student>> {
        let result = Students::find()
            .filter(Column::SchoolId.eq(school_id))
            .filter(Column::AdmissionNumber.eq(admission_number))
            .one(&self.db)
            .await
            .map_err(|e| SchoolSysError::database_operation(format!("查询学生失败: {e}")))?;

        Ok(result.map(|m| m.into_student()))
    }

    /// 分页列出学生
    pub async fn list_students_with_pagination_impl(
        &self,
        query: StudentListQuery,
    ) -> Result<StudentListResponse> {
        let (page, size) = page_bounds(query.page, query.size);

        let mut select = Students::find();

        if let Some(school_id) = query.school_id {
            select = select.filter(Column::SchoolId.eq(school_id));
        }
        if let Some(class_id) = query.class_id {
            select = select.filter(Column::ClassId.eq(class_id));
        }
        if let Some(stream_id) = query.stream_id {
            select = select.filter(Column::StreamId.eq(stream_id));
        }

        // 按学号或姓名搜索
        if let Some(ref search) = query.search
            && !search.trim().is_empty()
        {
            let search = search.trim();
            select = select.filter(
                Condition::any()
                    .add(Column::AdmissionNumber.like(contains_pattern(search)))
                    .add(Column::FirstName.like(contains_pattern(search)))
                    .add(Column::LastName.like(contains_pattern(search))),
            );
        }

        select = select.order_by_asc(Column::AdmissionNumber);

        let paginator = select.paginate(&self.db, size);
        let total = paginator
            .num_items()
            .await
            .map_err(|e| SchoolSysError::database_operation(format!("查询学生总数失败: {e}")))?;
        let pages = paginator
            .num_pages()
            .await
            .map_err(|e| SchoolSysError::database_operation(format!("查询学生页数失败: {e}")))?;
        let students = paginator
            .fetch_page(page - 1)
            .await
            .map_err(|e| SchoolSysError::database_operation(format!("查询学生列表失败: {e}")))?;

        Ok(StudentListResponse {
            items: students.into_iter().map(|m| m.into_student()).collect(),
            pagination: pagination_info(page, size, total, pages),
        })
    }

    /// 列出班级（可选分流）的全部学生
    pub async fn list_students_by_class_impl(
        &self,
        class_id: i64,
        stream_id: Option<i64>,
    ) -> Result<Vec<Student>> {
        let mut select = Students::find().filter(Column::ClassId.eq(class_id));
        if let Some(stream_id) = stream_id {
            select = select.filter(Column::StreamId.eq(stream_id));
        }

        let students = select
            .order_by_asc(Column::AdmissionNumber)
            .all(&self.db)
            .await
            .map_err(|e| SchoolSysError::database_operation(format!("查询班级学生失败: {e}")))?;

        Ok(students.into_iter().map(|m| m.into_student()).collect())
    }

    pub async fn list_students_by_school_impl(&self, school_id: i64) -> Result<Vec<Student>> {
        let students = Students::find()
            .filter(Column::SchoolId.eq(school_id))
            .order_by_asc(Column::AdmissionNumber)
            .all(&self.db)
            .await
            .map_err(|e| SchoolSysError::database_operation(format!("查询学校学生失败: {e}")))?;

        Ok(students.into_iter().map(|m| m.into_student()).collect())
    }

    pub async fn list_students_by_ids_impl(&self, ids: &[i64]) -> Result<Vec<Student>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let students = Students::find()
            .filter(Column::Id.is_in(ids.iter().copied()))
            .all(&self.db)
            .await
            .map_err(|e| SchoolSysError::database_operation(format!("查询学生列表失败: {e}")))?;

        Ok(students.into_iter().map(|m| m.into_student()).collect())
    }

    /// 更新学生档案
    pub async fn update_student_impl(
        &self,
        id: i64,
        update: UpdateStudentRequest,
    ) -> Result<Option<Student>> {
        if self.get_student_by_id_impl(id).await?.is_none() {
            return Ok(None);
        }

        let mut model = ActiveModel {
            id: Set(id),
            updated_at: Set(now_ts()),
            ..Default::default()
        };

        if let Some(admission_number) = update.admission_number {
            model.admission_number = Set(admission_number);
        }
        if let Some(first_name) = update.first_name {
            model.first_name = Set(first_name);
        }
        if let Some(last_name) = update.last_name {
            model.last_name = Set(last_name);
        }
        if let Some(gender) = update.gender {
            model.gender = Set(Some(gender));
        }
        if let Some(date_of_birth) = update.date_of_birth {
            model.date_of_birth = Set(Some(date_of_birth));
        }
        if let Some(class_id) = update.class_id {
            model.class_id = Set(class_id);
        }
        if let Some(stream_id) = update.stream_id {
            model.stream_id = Set(Some(stream_id));
        }
        if let Some(user_id) = update.user_id {
            model.user_id = Set(Some(user_id));
        }

        model
            .update(&self.db)
            .await
            .map_err(|e| SchoolSysError::database_operation(format!("更新学生失败: {e}")))?;

        self.get_student_by_id_impl(id).await
    }

    pub async fn delete_student_impl(&self, id: i64) -> Result<bool> {
        let result = Students::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(|e| SchoolSysError::database_operation(format!("删除学生失败: {e}")))?;

        Ok(result.rows_affected > 0)
    }

    pub async fn count_students_impl(&self, school_id: Option<i64>) -> Result<u64> {
        let mut select = Students::find();
        if let Some(school_id) = school_id {
            select = select.filter(Column::SchoolId.eq(school_id));
        }

        select
            .count(&self.db)
            .await
            .map_err(|e| SchoolSysError::database_operation(format!("统计学生数量失败: {e}")))
    }
}
