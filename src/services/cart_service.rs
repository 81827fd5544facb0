use crate::entities::{product_entity as products, user_cart_entity as user_carts};
use crate::error::{AppError, AppResult};
use crate::models::{
    AddProductToCartRequest, AuthUser, CartItemResponse, IdResponse, UpdateCartQuantityRequest,
    product_image_url,
};
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, IntoActiveModel, ModelTrait,
    QueryFilter, QueryOrder, Set,
};
use uuid::Uuid;

#[derive(Clone)]
pub struct CartService {
    pool: DatabaseConnection,
    storage_base_url: String,
}

impl CartService {
    pub fn new(pool: DatabaseConnection, storage_base_url: String) -> Self {
        Self {
            pool,
            storage_base_url,
        }
    }

    /// 已有同一商品则数量 +1，否则新建数量为 1 的条目
    pub async fn add_product_to_cart(
        &self,
        user: &AuthUser,
        req: AddProductToCartRequest,
    ) -> AppResult<IdResponse> {
        products::Entity::find_by_id(req.product_id)
            .filter(products::Column::IsDeleted.eq(false))
            .one(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Product {} not found", req.product_id)))?;

        let existing = user_carts::Entity::find()
            .filter(user_carts::Column::UserId.eq(user.id))
            .filter(user_carts::Column::ProductId.eq(req.product_id))
            .one(&self.pool)
            .await?;

        let id = match existing {
            Some(line) => {
                let id = line.id;
                let quantity = line.quantity + 1;
                let mut am = line.into_active_model();
                am.quantity = Set(quantity);
                am.updated_at = Set(Some(Utc::now()));
                am.updated_by = Set(Some(user.full_name.clone()));
                am.update(&self.pool).await?;
                id
            }
            None => {
                user_carts::ActiveModel {
                    id: Set(Uuid::new_v4()),
                    user_id: Set(user.id),
                    product_id: Set(req.product_id),
                    quantity: Set(1),
                    created_at: Set(Utc::now()),
                    created_by: Set(user.full_name.clone()),
                    updated_at: Set(None),
                    updated_by: Set(None),
                }
                .insert(&self.pool)
                .await?
                .id
            }
        };

        Ok(IdResponse { id })
    }

    pub async fn list_cart(&self, user: &AuthUser) -> AppResult<Vec<CartItemResponse>> {
        let rows = user_carts::Entity::find()
            .filter(user_carts::Column::UserId.eq(user.id))
            .order_by_asc(user_carts::Column::CreatedAt)
            .find_also_related(products::Entity)
            .all(&self.pool)
            .await?;

        Ok(rows
            .into_iter()
            .filter_map(|(line, product)| {
                let product = product.filter(|p| !p.is_deleted)?;
                Some(CartItemResponse {
                    cart_id: line.id,
                    product_id: product.id,
                    product_image_url: product_image_url(
                        &self.storage_base_url,
                        &product.image_file_name,
                    ),
                    product_name: product.name,
                    product_price: product.price,
                    quantity: line.quantity,
                })
            })
            .collect())
    }

    async fn find_owned_line(&self, user: &AuthUser, cart_id: Uuid) -> AppResult<user_carts::Model> {
        user_carts::Entity::find_by_id(cart_id)
            .filter(user_carts::Column::UserId.eq(user.id))
            .one(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Cart item {cart_id} not found")))
    }

    /// new_quantity 为 0 时删除条目
    pub async fn update_cart_quantity(
        &self,
        user: &AuthUser,
        cart_id: Uuid,
        req: UpdateCartQuantityRequest,
    ) -> AppResult<IdResponse> {
        if req.new_quantity < 0 {
            return Err(AppError::ValidationError(
                "Quantity must not be negative".into(),
            ));
        }

        let line = self.find_owned_line(user, cart_id).await?;
        if req.new_quantity == 0 {
            line.delete(&self.pool).await?;
            return Ok(IdResponse { id: cart_id });
        }

        let mut am = line.into_active_model();
        am.quantity = Set(req.new_quantity);
        am.updated_at = Set(Some(Utc::now()));
        am.updated_by = Set(Some(user.full_name.clone()));
        am.update(&self.pool).await?;
        Ok(IdResponse { id: cart_id })
    }

    pub async fn delete_cart(&self, user: &AuthUser, cart_id: Uuid) -> AppResult<IdResponse> {
        let line = self.find_owned_line(user, cart_id).await?;
        line.delete(&self.pool).await?;
        Ok(IdResponse { id: cart_id })
    }
}
