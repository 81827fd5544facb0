use crate::entities::product_entity as products;
use crate::error::{AppError, AppResult};
use crate::models::{
    AuthUser, IdResponse, PaginatedResponse, PaginationParams, ProductRequest, ProductResponse,
};
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait,
    IntoActiveModel, PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Set,
};
use uuid::Uuid;

#[derive(Clone)]
pub struct ProductService {
    pool: DatabaseConnection,
    storage_base_url: String,
}

fn validate_product(req: &ProductRequest) -> AppResult<()> {
    if req.name.trim().is_empty() {
        return Err(AppError::ValidationError("Product name is required".into()));
    }
    if req.price <= 0 {
        return Err(AppError::ValidationError(
            "Product price must be greater than 0".into(),
        ));
    }
    if req.image_file_name.trim().is_empty() {
        return Err(AppError::ValidationError("Product image is required".into()));
    }
    Ok(())
}

impl ProductService {
    pub fn new(pool: DatabaseConnection, storage_base_url: String) -> Self {
        Self {
            pool,
            storage_base_url,
        }
    }

    fn to_response(&self, m: products::Model) -> ProductResponse {
        ProductResponse::from_model(m, &self.storage_base_url)
    }

    async fn find_active(&self, id: Uuid) -> AppResult<products::Model> {
        products::Entity::find_by_id(id)
            .filter(products::Column::IsDeleted.eq(false))
            .one(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Product {id} not found")))
    }

    pub async fn create_product(&self, user: &AuthUser, req: ProductRequest) -> AppResult<IdResponse> {
        user.require_admin()?;
        validate_product(&req)?;

        let model = products::ActiveModel {
            id: Set(Uuid::new_v4()),
            name: Set(req.name.trim().to_string()),
            description: Set(req.description),
            price: Set(req.price),
            image_file_name: Set(req.image_file_name),
            created_at: Set(Utc::now()),
            created_by: Set(user.full_name.clone()),
            updated_at: Set(None),
            updated_by: Set(None),
            deleted_at: Set(None),
            deleted_by: Set(None),
            is_deleted: Set(false),
        }
        .insert(&self.pool)
        .await?;

        log::info!("Product created: id={} by={}", model.id, user.id);
        Ok(IdResponse { id: model.id })
    }

    pub async fn detail_product(&self, id: Uuid) -> AppResult<ProductResponse> {
        let m = self.find_active(id).await?;
        Ok(self.to_response(m))
    }

    pub async fn edit_product(
        &self,
        user: &AuthUser,
        id: Uuid,
        req: ProductRequest,
    ) -> AppResult<IdResponse> {
        user.require_admin()?;
        validate_product(&req)?;

        let existing = self.find_active(id).await?;
        let mut am = existing.into_active_model();
        am.name = Set(req.name.trim().to_string());
        am.description = Set(req.description);
        am.price = Set(req.price);
        am.image_file_name = Set(req.image_file_name);
        am.updated_at = Set(Some(Utc::now()));
        am.updated_by = Set(Some(user.full_name.clone()));
        am.update(&self.pool).await?;

        Ok(IdResponse { id })
    }

    /// 软删除
    pub async fn delete_product(&self, user: &AuthUser, id: Uuid) -> AppResult<IdResponse> {
        user.require_admin()?;

        let existing = self.find_active(id).await?;
        let mut am = existing.into_active_model();
        am.is_deleted = Set(true);
        am.deleted_at = Set(Some(Utc::now()));
        am.deleted_by = Set(Some(user.full_name.clone()));
        am.update(&self.pool).await?;

        log::info!("Product deleted: id={id} by={}", user.id);
        Ok(IdResponse { id })
    }

    pub async fn list_products(
        &self,
        params: &PaginationParams,
    ) -> AppResult<PaginatedResponse<ProductResponse>> {
        let base_query = products::Entity::find().filter(products::Column::IsDeleted.eq(false));

        let total = base_query.clone().count(&self.pool).await?;
        let rows = base_query
            .order_by_desc(products::Column::CreatedAt)
            .limit(params.get_limit())
            .offset(params.get_offset())
            .all(&self.pool)
            .await?;

        let items = rows.into_iter().map(|m| self.to_response(m)).collect();
        Ok(PaginatedResponse::new(items, params, total))
    }

    pub async fn list_products_admin(
        &self,
        user: &AuthUser,
        params: &PaginationParams,
    ) -> AppResult<PaginatedResponse<ProductResponse>> {
        user.require_admin()?;
        self.list_products(params).await
    }

    /// 最新的三个商品
    pub async fn highlight_products(&self) -> AppResult<Vec<ProductResponse>> {
        let rows = products::Entity::find()
            .filter(products::Column::IsDeleted.eq(false))
            .order_by_desc(products::Column::CreatedAt)
            .limit(3)
            .all(&self.pool)
            .await?;
        Ok(rows.into_iter().map(|m| self.to_response(m)).collect())
    }

    /// 批量读取商品（下单事务内使用，已删除的商品视为不存在）
    pub async fn get_products_by_ids<C>(&self, conn: &C, ids: &[Uuid]) -> AppResult<Vec<products::Model>>
    where
        C: ConnectionTrait,
    {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let rows = products::Entity::find()
            .filter(products::Column::Id.is_in(ids.iter().copied()))
            .filter(products::Column::IsDeleted.eq(false))
            .all(conn)
            .await?;
        Ok(rows)
    }
}
