//! 学校实体

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "schools")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    #[sea_orm(unique)]
    pub name: String,
    #[sea_orm(unique)]
    pub code: String,
    pub address: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub created_at: i64,
    pub updated_at: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

// 从数据库模型转换为业务模型
impl Model {
    pub fn into_school(self) -> crate::models::schools::entities::School {
        use crate::models::schools::entities::School;

        School {
            id: self.id,
            name: self.name,
            code: self.code,
            address: self.address,
            phone: self.phone,
            email: self.email,
            created_at: super::from_timestamp(self.created_at),
            updated_at: super::from_timestamp(self.updated_at),
        }
    }
}
