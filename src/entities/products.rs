use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;

/// 商品目录，删除为软删除 (is_deleted)
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq)]
#[sea_orm(table_name = "products")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub name: String,
    #[sea_orm(column_type = "Text")]
    pub description: String,
    /// 价格(最小货币单位)
    pub price: i64,
    pub image_file_name: String,
    pub created_at: DateTime<Utc>,
    pub created_by: String,
    pub updated_at: Option<DateTime<Utc>>,
    pub updated_by: Option<String>,
    pub deleted_at: Option<DateTime<Utc>>,
    pub deleted_by: Option<String>,
    pub is_deleted: bool,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::user_carts::Entity")]
    UserCarts,
}

impl Related<super::user_carts::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::UserCarts.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
