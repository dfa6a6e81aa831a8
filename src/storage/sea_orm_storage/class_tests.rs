//! 测验与测验成绩存储操作

use super::{SeaOrmStorage, now_ts, page_bounds, pagination_info};
use crate::entity::class_tests::{ActiveModel, Column, Entity as Tests};
use crate::entity::test_results::{
    ActiveModel as TestResultActiveModel, Column as TestResultColumn, Entity as TestResults,
};
use crate::errors::{Result, SchoolSysError};
use crate::models::class_tests::{
    entities::{Test, TestResult, TestResultUpsert},
    requests::{CreateTestRequest, TestListQuery, UpdateTestRequest},
    responses::TestListResponse,
};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, Set,
    TransactionTrait, sea_query::OnConflict,
};

impl SeaOrmStorage {
    pub async fn create_test_impl(
        &self,
        school_id: i64,
        teacher_id: i64,
        req: CreateTestRequest,
    ) -> Result<Test> {
        let now = now_ts();

        let model = ActiveModel {
            school_id: Set(school_id),
            teacher_id: Set(teacher_id),
            class_id: Set(req.class_id),
            subject_id: Set(req.subject_id),
            term_id: Set(req.term_id),
            title: Set(req.title),
            test_type: Set(req.test_type.to_string()),
            max_score: Set(req.max_score),
            test_date: Set(req.test_date),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        let result = model
            .insert(&self.db)
            .await
            .map_err(|e| SchoolSysError::database_operation(format!("创建测验失败: {e}")))?;

        Ok(result.into_test())
    }

    pub async fn get_test_by_id_impl(&self, id: i64) -> Result<Option<Test>> {
        let result = Tests::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| SchoolSysError::database_operation(format!("查询测验失败: {e}")))?;

        Ok(result.map(|m| m.into_test()))
    }

    pub async fn list_tests_with_pagination_impl(
        &self,
        query: TestListQuery,
    ) -> Result<TestListResponse> {
        let (page, size) = page_bounds(query.page, query.size);

        let mut select = Tests::find();

        if let Some(school_id) = query.school_id {
            select = select.filter(Column::SchoolId.eq(school_id));
        }
        if let Some(class_id) = query.class_id {
            select = select.filter(Column::ClassId.eq(class_id));
        }
        if let Some(subject_id) = query.subject_id {
            select = select.filter(Column::SubjectId.eq(subject_id));
        }
        if let Some(teacher_id) = query.teacher_id {
            select = select.filter(Column::TeacherId.eq(teacher_id));
        }
        if let Some(term_id) = query.term_id {
            select = select.filter(Column::TermId.eq(term_id));
        }

        let paginator = select
            .order_by_desc(Column::CreatedAt)
            .paginate(&self.db, size);
        let total = paginator
            .num_items()
            .await
            .map_err(|e| SchoolSysError::database_operation(format!("查询测验总数失败: {e}")))?;
        let pages = paginator
            .num_pages()
            .await
            .map_err(|e| SchoolSysError::database_operation(format!("查询测验页数失败: {e}")))?;
        let tests = paginator
            .fetch_page(page - 1)
            .await
            .map_err(|e| SchoolSysError::database_operation(format!("查询测验列表失败: {e}")))?;

        Ok(TestListResponse {
            items: tests.into_iter().map(|m| m.into_test()).collect(),
            pagination: pagination_info(page, size, total, pages),
        })
    }

    pub async fn update_test_impl(&self, id: i64, update: UpdateTestRequest) -> Result<Option<Test>> {
        if self.get_test_by_id_impl(id).await?.is_none() {
            return Ok(None);
        }

        let mut model = ActiveModel {
            id: Set(id),
            updated_at: Set(now_ts()),
            ..Default::default()
        };

        if let Some(term_id) = update.term_id {
            model.term_id = Set(Some(term_id));
        }
        if let Some(title) = update.title {
            model.title = Set(title);
        }
        if let Some(test_type) = update.test_type {
            model.test_type = Set(test_type.to_string());
        }
        if let Some(max_score) = update.max_score {
            model.max_score = Set(max_score);
        }
        if let Some(test_date) = update.test_date {
            model.test_date = Set(Some(test_date));
        }

        model
            .update(&self.db)
            .await
            .map_err(|e| SchoolSysError::database_operation(format!("更新测验失败: {e}")))?;

        self.get_test_by_id_impl(id).await
    }

    pub async fn delete_test_impl(&self, id: i64) -> Result<bool> {
        let result = Tests::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(|e| SchoolSysError::database_operation(format!("删除测验失败: {e}")))?;

        Ok(result.rows_affected > 0)
    }

    pub async fn count_tests_impl(&self, teacher_id: Option<i64>) -> Result<u64> {
        let mut select = Tests::find();
        if let Some(teacher_id) = teacher_id {
            select = select.filter(Column::TeacherId.eq(teacher_id));
        }

        select
            .count(&self.db)
            .await
            .map_err(|e| SchoolSysError::database_operation(format!("统计测验数量失败: {e}")))
    }

    pub async fn list_test_results_impl(&self, test_id: i64) -> Result<Vec<TestResult>> {
        let rows = TestResults::find()
            .filter(TestResultColumn::TestId.eq(test_id))
            .order_by_asc(TestResultColumn::StudentId)
            .all(&self.db)
            .await
            .map_err(|e| {
                SchoolSysError::database_operation(format!("查询测验成绩失败: {e}"))
            })?;

        Ok(rows.into_iter().map(|m| m.into_test_result()).collect())
    }

    /// 以 (test_id, student_id) 为冲突键批量写入
    pub async fn upsert_test_results_impl(&self, rows: Vec<TestResultUpsert>) -> Result<usize> {
        if rows.is_empty() {
            return Ok(0);
        }

        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| SchoolSysError::database_operation(format!("开启事务失败: {e}")))?;

        let now = now_ts();
        for row in &rows {
            let model = TestResultActiveModel {
                test_id: Set(row.test_id),
                student_id: Set(row.student_id),
                score: Set(row.score),
                remarks: Set(row.remarks.clone()),
                created_at: Set(now),
                updated_at: Set(now),
                ..Default::default()
            };

            TestResults::insert(model)
                .on_conflict(
                    OnConflict::columns([TestResultColumn::TestId, TestResultColumn::StudentId])
                        .update_columns([
                            TestResultColumn::Score,
                            TestResultColumn::Remarks,
                            TestResultColumn::UpdatedAt,
                        ])
                        .to_owned(),
                )
                .exec_without_returning(&txn)
                .await
                .map_err(|e| {
                    SchoolSysError::database_operation(format!("写入测验成绩失败: {e}"))
                })?;
        }

        txn.commit()
            .await
            .map_err(|e| SchoolSysError::database_operation(format!("提交事务失败: {e}")))?;

        Ok(rows.len())
    }

    pub async fn get_test_result_by_id_impl(&self, id: i64) -> Result<Option<TestResult>> {
        let result = TestResults::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| {
                SchoolSysError::database_operation(format!("查询测验成绩失败: {e}"))
            })?;

        Ok(result.map(|m| m.into_test_result()))
    }

    pub async fn delete_test_result_impl(&self, id: i64) -> Result<bool> {
        let result = TestResults::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(|e| {
                SchoolSysError::database_operation(format!("删除测验成绩失败: {e}"))
            })?;

        Ok(result.rows_affected > 0)
    }

    pub async fn count_test_results_for_student_impl(&self, student_id: i64) -> Result<u64> {
        TestResults::find()
            .filter(TestResultColumn::StudentId.eq(student_id))
            .count(&self.db)
            .await
            .map_err(|e| {
                SchoolSysError::database_operation(format!("统计测验成绩数量失败: {e}"))
            })
    }
}
