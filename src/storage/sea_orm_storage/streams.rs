//! 分流存储操作

use super::{SeaOrmStorage, now_ts};
use crate::entity::streams::{ActiveModel, Column, Entity as Streams};
use crate::errors::{Result, SchoolSysError};
use crate::models::streams::entities::Stream;
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Set};

impl SeaOrmStorage {
    pub async fn create_stream_impl(&self, class_id: i64, name: &str) -> Result<Stream> {
        let model = ActiveModel {
            class_id: Set(class_id),
            name: Set(name.to_string()),
            created_at: Set(now_ts()),
            ..Default::default()
        };

        let result = model
            .insert(&self.db)
            .await
            .map_err(|e| SchoolSysError::database_operation(format!("创建分流失败: {e}")))?;

        Ok(result.into_stream())
    }

    pub async fn get_stream_by_id_impl(&self, stream_id: i64) -> Result<Option<Stream>> {
        let result = Streams::find_by_id(stream_id)
            .one(&self.db)
            .await
            .map_err(|e| SchoolSysError::database_operation(format!("查询分流失败: {e}")))?;

        Ok(result.map(|m| m.into_stream()))
    }

    pub async fn list_streams_by_class_impl(&self, class_id: i64) -> Result<Vec<Stream>> {
        let streams = Streams::find()
            .filter(Column::ClassId.eq(class_id))
            .order_by_asc(Column::Name)
            .all(&self.db)
            .await
            .map_err(|e| SchoolSysError::database_operation(format!("查询分流列表失败: {e}")))?;

        Ok(streams.into_iter().map(|m| m.into_stream()).collect())
    }

    pub async fn update_stream_impl(&self, stream_id: i64, name: &str) -> Result<Option<Stream>> {
        if self.get_stream_by_id_impl(stream_id).await?.is_none() {
            return Ok(None);
        }

        let model = ActiveModel {
            id: Set(stream_id),
            name: Set(name.to_string()),
            ..Default::default()
        };

        model
            .update(&self.db)
            .await
            .map_err(|e| SchoolSysError::database_operation(format!("更新分流失败: {e}")))?;

        self.get_stream_by_id_impl(stream_id).await
    }

    pub async fn delete_stream_impl(&self, stream_id: i64) -> Result<bool> {
        let result = Streams::delete_by_id(stream_id)
            .exec(&self.db)
            .await
            .map_err(|e| SchoolSysError::database_operation(format!("删除分流失败: {e}")))?;

        Ok(result.rows_affected > 0)
    }
}
