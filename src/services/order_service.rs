use crate::config::{OrderConfig, XenditConfig};
use crate::entities::{
    OrderStatus, order_entity as orders, order_item_entity as order_items,
    product_entity as products,
};
use crate::error::{AppError, AppResult};
use crate::external::{CreateInvoiceRequest, InvoiceCustomer, InvoiceGateway, InvoiceItem};
use crate::models::*;
use crate::services::{NumberingService, ORDER_NUMBERING, ProductService};
use crate::utils::{format_order_number, generate_random_suffix};
use chrono::{DateTime, Duration, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait,
    IntoActiveModel, PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Select, Set,
    TransactionTrait,
};
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use uuid::Uuid;

#[derive(Clone)]
pub struct OrderService {
    pool: DatabaseConnection,
    product_service: ProductService,
    numbering_service: NumberingService,
    invoice_gateway: Arc<dyn InvoiceGateway>,
    order_config: OrderConfig,
    xendit_config: XenditConfig,
    storage_base_url: String,
}

fn validate_create_request(req: &CreateOrderRequest) -> AppResult<()> {
    if req.products.is_empty() {
        return Err(AppError::ValidationError(
            "Order must contain at least one product".into(),
        ));
    }
    let mut seen = HashSet::new();
    for line in &req.products {
        if line.quantity < 1 {
            return Err(AppError::ValidationError(format!(
                "Quantity for product {} must be at least 1",
                line.id
            )));
        }
        if !seen.insert(line.id) {
            return Err(AppError::ValidationError(format!(
                "Product {} is listed more than once",
                line.id
            )));
        }
    }
    if req.full_name.trim().is_empty() {
        return Err(AppError::ValidationError("Full name is required".into()));
    }
    if req.address.trim().is_empty() {
        return Err(AppError::ValidationError("Address is required".into()));
    }
    if req.phone_number.trim().is_empty() {
        return Err(AppError::ValidationError("Phone number is required".into()));
    }
    Ok(())
}

/// 下单时冻结的明细行
struct PricedLine {
    product: products::Model,
    quantity: i32,
}

fn price_lines(
    requested: &[OrderProductRequest],
    catalog: Vec<products::Model>,
) -> AppResult<(Vec<PricedLine>, i64)> {
    let mut by_id: HashMap<Uuid, products::Model> =
        catalog.into_iter().map(|p| (p.id, p)).collect();

    let mut lines = Vec::with_capacity(requested.len());
    let mut total: i64 = 0;
    for line in requested {
        let product = by_id
            .remove(&line.id)
            .ok_or_else(|| AppError::ValidationError(format!("Product {} not found", line.id)))?;
        total = product
            .price
            .checked_mul(i64::from(line.quantity))
            .and_then(|subtotal| total.checked_add(subtotal))
            .ok_or_else(|| AppError::ValidationError("Order total is too large".into()))?;
        lines.push(PricedLine {
            product,
            quantity: line.quantity,
        });
    }
    Ok((lines, total))
}

impl OrderService {
    pub fn new(
        pool: DatabaseConnection,
        product_service: ProductService,
        invoice_gateway: Arc<dyn InvoiceGateway>,
        order_config: OrderConfig,
        xendit_config: XenditConfig,
        storage_base_url: String,
    ) -> Self {
        Self {
            pool,
            product_service,
            numbering_service: NumberingService::new(),
            invoice_gateway,
            order_config,
            xendit_config,
            storage_base_url,
        }
    }

    fn success_redirect_url(&self, order_id: Uuid) -> String {
        format!(
            "{}/checkout/{order_id}/success",
            self.order_config.frontend_base_url.trim_end_matches('/')
        )
    }

    async fn create_invoice_with_timeout(
        &self,
        request: CreateInvoiceRequest,
    ) -> AppResult<crate::external::Invoice> {
        let timeout = std::time::Duration::from_secs(self.xendit_config.request_timeout_secs);
        match tokio::time::timeout(timeout, self.invoice_gateway.create_invoice(request)).await {
            Ok(result) => result,
            Err(_) => Err(AppError::ExternalApiError(format!(
                "Invoice provider did not respond within {}s",
                self.xendit_config.request_timeout_secs
            ))),
        }
    }

    /// 下单。
    ///
    /// 整个过程在一个事务内完成：先锁定订单编号计数器，再按目录价计算总价、
    /// 创建支付发票、写入订单与明细快照、推进计数器，最后提交。
    /// 任何一步失败都会在 `txn` 被丢弃时整体回滚。
    pub async fn create_order(
        &self,
        user: &AuthUser,
        req: CreateOrderRequest,
    ) -> AppResult<CreateOrderResponse> {
        validate_create_request(&req)?;

        let txn = self.pool.begin().await?;

        let numbering = self
            .numbering_service
            .reserve(&txn, ORDER_NUMBERING)
            .await?;
        let sequence = numbering.number;

        let ids: Vec<Uuid> = req.products.iter().map(|p| p.id).collect();
        let catalog = self.product_service.get_products_by_ids(&txn, &ids).await?;
        let (lines, total) = price_lines(&req.products, catalog)?;

        let now = Utc::now();
        let order_id = Uuid::new_v4();
        let number = format_order_number(
            &self.order_config.number_prefix,
            &self.order_config.store_code,
            now,
            generate_random_suffix(),
            sequence,
        );

        let invoice = self
            .create_invoice_with_timeout(CreateInvoiceRequest {
                external_id: order_id.to_string(),
                amount: total,
                currency: self.xendit_config.currency.clone(),
                customer: InvoiceCustomer {
                    given_names: req.full_name.trim().to_string(),
                },
                success_redirect_url: self.success_redirect_url(order_id),
                items: lines
                    .iter()
                    .map(|l| InvoiceItem {
                        name: l.product.name.clone(),
                        price: l.product.price,
                        quantity: l.quantity,
                    })
                    .collect(),
            })
            .await?;

        let notes = req
            .notes
            .as_deref()
            .map(str::trim)
            .filter(|n| !n.is_empty())
            .map(str::to_string);

        orders::ActiveModel {
            id: Set(order_id),
            number: Set(number.clone()),
            user_id: Set(user.id),
            order_status_code: Set(OrderStatus::Unpaid),
            user_full_name: Set(req.full_name.trim().to_string()),
            address: Set(req.address.trim().to_string()),
            phone_number: Set(req.phone_number.trim().to_string()),
            notes: Set(notes),
            total: Set(total),
            expired_at: Set(now + Duration::hours(self.order_config.expires_in_hours)),
            xendit_invoice_id: Set(Some(invoice.id.clone())),
            xendit_invoice_url: Set(Some(invoice.invoice_url.clone())),
            xendit_paid_at: Set(None),
            xendit_payment_channel: Set(None),
            xendit_payment_method: Set(None),
            created_at: Set(now),
            created_by: Set(user.full_name.clone()),
            updated_at: Set(None),
            updated_by: Set(None),
        }
        .insert(&txn)
        .await?;

        let items: Vec<order_items::ActiveModel> = lines
            .into_iter()
            .map(|l| order_items::ActiveModel {
                id: Set(Uuid::new_v4()),
                order_id: Set(order_id),
                product_id: Set(l.product.id),
                product_name: Set(l.product.name),
                product_image_file_name: Set(l.product.image_file_name),
                product_price: Set(l.product.price),
                quantity: Set(l.quantity),
                created_at: Set(now),
                created_by: Set(user.full_name.clone()),
            })
            .collect();
        order_items::Entity::insert_many(items).exec(&txn).await?;

        self.numbering_service.advance(&txn, numbering).await?;

        if let Err(e) = txn.commit().await {
            // 发票已在支付方创建，本地订单未落库
            log::error!(
                "Orphaned invoice: commit failed after invoice creation (invoice_id={} order_id={order_id} number={number}): {e}",
                invoice.id
            );
            return Err(e.into());
        }

        log::info!(
            "Order created: id={order_id} number={number} total={total} user={}",
            user.id
        );

        Ok(CreateOrderResponse {
            id: order_id,
            number,
            total,
            invoice_url: invoice.invoice_url,
        })
    }

    async fn load_items<C>(
        &self,
        conn: &C,
        order_ids: &[Uuid],
    ) -> AppResult<HashMap<Uuid, Vec<OrderItemResponse>>>
    where
        C: ConnectionTrait,
    {
        let mut grouped: HashMap<Uuid, Vec<OrderItemResponse>> = HashMap::new();
        if order_ids.is_empty() {
            return Ok(grouped);
        }
        let rows = order_items::Entity::find()
            .filter(order_items::Column::OrderId.is_in(order_ids.iter().copied()))
            .order_by_asc(order_items::Column::CreatedAt)
            .all(conn)
            .await?;
        for row in rows {
            grouped
                .entry(row.order_id)
                .or_default()
                .push(OrderItemResponse::from_model(row, &self.storage_base_url));
        }
        Ok(grouped)
    }

    async fn paginate_orders(
        &self,
        query: Select<orders::Entity>,
        params: &PaginationParams,
        now: DateTime<Utc>,
    ) -> AppResult<PaginatedResponse<OrderListItem>> {
        let total = query.clone().count(&self.pool).await?;
        let rows = query
            .order_by_desc(orders::Column::CreatedAt)
            .limit(params.get_limit())
            .offset(params.get_offset())
            .all(&self.pool)
            .await?;

        let ids: Vec<Uuid> = rows.iter().map(|o| o.id).collect();
        let mut items = self.load_items(&self.pool, &ids).await?;

        let list = rows
            .into_iter()
            .map(|order| {
                let order_items = items.remove(&order.id).unwrap_or_default();
                OrderListItem::new(order, order_items, now)
            })
            .collect();
        Ok(PaginatedResponse::new(list, params, total))
    }

    /// 管理员查看全部订单
    pub async fn list_orders_admin(
        &self,
        user: &AuthUser,
        params: &PaginationParams,
    ) -> AppResult<PaginatedResponse<OrderListItem>> {
        user.require_admin()?;
        self.paginate_orders(orders::Entity::find(), params, Utc::now())
            .await
    }

    /// 当前用户自己的订单
    pub async fn list_orders(
        &self,
        user: &AuthUser,
        params: &PaginationParams,
    ) -> AppResult<PaginatedResponse<OrderListItem>> {
        let query = orders::Entity::find().filter(orders::Column::UserId.eq(user.id));
        self.paginate_orders(query, params, Utc::now()).await
    }

    async fn find_visible_order(&self, user: &AuthUser, id: Uuid) -> AppResult<orders::Model> {
        let order = orders::Entity::find_by_id(id)
            .one(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Order {id} not found")))?;
        if order.user_id != user.id && !user.is_admin() {
            return Err(AppError::NotFound(format!("Order {id} not found")));
        }
        Ok(order)
    }

    pub async fn detail_order(&self, user: &AuthUser, id: Uuid) -> AppResult<OrderDetailResponse> {
        let order = self.find_visible_order(user, id).await?;
        let mut items = self.load_items(&self.pool, &[order.id]).await?;
        let order_items = items.remove(&order.id).unwrap_or_default();
        Ok(OrderDetailResponse::new(order, order_items, Utc::now()))
    }

    /// 状态流转：管理员 Paid→Shipping、Shipping→Done；下单用户在未过期时 Unpaid→Canceled
    pub async fn update_order_status(
        &self,
        user: &AuthUser,
        id: Uuid,
        req: UpdateOrderStatusRequest,
    ) -> AppResult<IdResponse> {
        let order = self.find_visible_order(user, id).await?;
        let current = order.effective_status(Utc::now());
        let target = req.status;

        let admin_move = matches!(
            (current, target),
            (OrderStatus::Paid, OrderStatus::Shipping) | (OrderStatus::Shipping, OrderStatus::Done)
        );
        let owner_cancel = order.user_id == user.id
            && current == OrderStatus::Unpaid
            && target == OrderStatus::Canceled;

        if admin_move && !user.is_admin() {
            return Err(AppError::Forbidden);
        }
        if !admin_move && !owner_cancel {
            return Err(AppError::ValidationError(format!(
                "Cannot change order status from {current} to {target}"
            )));
        }

        let mut am = order.into_active_model();
        am.order_status_code = Set(target);
        am.updated_at = Set(Some(Utc::now()));
        am.updated_by = Set(Some(user.full_name.clone()));
        am.update(&self.pool).await?;

        log::info!("Order {id} status changed: {current} -> {target} by={}", user.id);
        Ok(IdResponse { id })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::UserRole;
    use crate::external::Invoice;
    use crate::services::test_support::*;
    use async_trait::async_trait;

    fn order_config() -> OrderConfig {
        OrderConfig {
            frontend_base_url: "http://shop.local".to_string(),
            ..Default::default()
        }
    }

    fn service_with(db: &DatabaseConnection, gateway: Arc<dyn InvoiceGateway>) -> OrderService {
        OrderService::new(
            db.clone(),
            ProductService::new(db.clone(), "http://cdn.local".to_string()),
            gateway,
            order_config(),
            XenditConfig {
                request_timeout_secs: 1,
                ..Default::default()
            },
            "http://cdn.local".to_string(),
        )
    }

    fn ok_gateway(times: usize) -> Arc<dyn InvoiceGateway> {
        let mut mock = MockGateway::new();
        mock.expect_create_invoice().times(times).returning(|req| {
            Ok(Invoice {
                id: format!("inv-{}", req.external_id),
                invoice_url: format!("https://checkout.xendit.co/web/{}", req.external_id),
                status: Some("PENDING".to_string()),
                expiry_date: None,
            })
        });
        Arc::new(mock)
    }

    fn order_request(lines: &[(Uuid, i32)]) -> CreateOrderRequest {
        CreateOrderRequest {
            products: lines
                .iter()
                .map(|(id, quantity)| OrderProductRequest {
                    id: *id,
                    quantity: *quantity,
                })
                .collect(),
            full_name: "Budi Santoso".to_string(),
            address: "Jl. Merdeka No. 1".to_string(),
            phone_number: "081234567890".to_string(),
            notes: Some("  ".to_string()),
        }
    }

    async fn order_count(db: &DatabaseConnection) -> (u64, u64) {
        (
            orders::Entity::find().count(db).await.unwrap(),
            order_items::Entity::find().count(db).await.unwrap(),
        )
    }

    #[tokio::test]
    async fn test_total_uses_catalog_price_and_freezes_snapshot() {
        let db = setup_db().await;
        let user = insert_user(&db, "c@example.com", UserRole::Customer).await;
        let a = insert_product(&db, "Product A", 1000).await;
        let b = insert_product(&db, "Product B", 500).await;

        let mut mock = MockGateway::new();
        mock.expect_create_invoice()
            .times(1)
            .withf(|req| {
                req.amount == 2500
                    && req.currency == "IDR"
                    && req.customer.given_names == "Budi Santoso"
                    && req.items.len() == 2
                    && req.success_redirect_url
                        == format!("http://shop.local/checkout/{}/success", req.external_id)
            })
            .returning(|req| {
                Ok(Invoice {
                    id: "inv-1".to_string(),
                    invoice_url: format!("https://checkout.xendit.co/web/{}", req.external_id),
                    status: None,
                    expiry_date: None,
                })
            });
        let svc = service_with(&db, Arc::new(mock));

        let created = svc
            .create_order(&user, order_request(&[(a.id, 2), (b.id, 1)]))
            .await
            .unwrap();
        assert_eq!(created.total, 2500);
        assert!(created.number.starts_with("INV/"));
        assert!(created.number.ends_with("1"));
        assert!(created.number.contains("/RK/"));

        // 商品改价不影响历史订单
        let mut am = a.clone().into_active_model();
        am.price = Set(1200);
        am.update(&db).await.unwrap();

        let detail = svc.detail_order(&user, created.id).await.unwrap();
        assert_eq!(detail.total, 2500);
        assert_eq!(detail.status_code, OrderStatus::Unpaid);
        assert_eq!(detail.notes, None);
        assert_eq!(detail.items.len(), 2);
        let a_item = detail.items.iter().find(|i| i.product_id == a.id).unwrap();
        assert_eq!(a_item.product_price, 1000);
        assert_eq!(a_item.product_name, "Product A");
        assert_eq!(a_item.quantity, 2);
        assert_eq!(counter_value(&db).await, 2);
    }

    #[tokio::test]
    async fn test_missing_product_rolls_back_everything() {
        let db = setup_db().await;
        let user = insert_user(&db, "c@example.com", UserRole::Customer).await;
        let a = insert_product(&db, "Product A", 1000).await;
        let missing = Uuid::new_v4();

        let mut mock = MockGateway::new();
        mock.expect_create_invoice().never();
        let svc = service_with(&db, Arc::new(mock));

        let err = svc
            .create_order(&user, order_request(&[(a.id, 1), (missing, 1)]))
            .await
            .unwrap_err();
        match err {
            AppError::ValidationError(msg) => assert!(msg.contains(&missing.to_string())),
            other => panic!("unexpected error: {other:?}"),
        }
        assert_eq!(order_count(&db).await, (0, 0));
        assert_eq!(counter_value(&db).await, 1);
    }

    #[tokio::test]
    async fn test_deleted_product_is_treated_as_missing() {
        let db = setup_db().await;
        let user = insert_user(&db, "c@example.com", UserRole::Customer).await;
        let a = insert_product(&db, "Product A", 1000).await;
        let mut am = a.clone().into_active_model();
        am.is_deleted = Set(true);
        am.update(&db).await.unwrap();

        let svc = service_with(&db, ok_gateway(0));
        assert!(matches!(
            svc.create_order(&user, order_request(&[(a.id, 1)])).await,
            Err(AppError::ValidationError(_))
        ));
    }

    #[tokio::test]
    async fn test_invoice_failure_rolls_back() {
        let db = setup_db().await;
        let user = insert_user(&db, "c@example.com", UserRole::Customer).await;
        let a = insert_product(&db, "Product A", 1000).await;

        let mut mock = MockGateway::new();
        mock.expect_create_invoice()
            .times(1)
            .returning(|_| Err(AppError::ExternalApiError("provider down".to_string())));
        let svc = service_with(&db, Arc::new(mock));

        let err = svc
            .create_order(&user, order_request(&[(a.id, 1)]))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::ExternalApiError(_)));
        assert_eq!(order_count(&db).await, (0, 0));
        assert_eq!(counter_value(&db).await, 1);
    }

    struct SlowGateway;

    #[async_trait]
    impl InvoiceGateway for SlowGateway {
        async fn create_invoice(&self, _request: CreateInvoiceRequest) -> AppResult<Invoice> {
            tokio::time::sleep(std::time::Duration::from_secs(5)).await;
            Err(AppError::InternalError("unreachable".to_string()))
        }
    }

    #[tokio::test]
    async fn test_invoice_timeout_is_external_error() {
        let db = setup_db().await;
        let user = insert_user(&db, "c@example.com", UserRole::Customer).await;
        let a = insert_product(&db, "Product A", 1000).await;
        let svc = service_with(&db, Arc::new(SlowGateway));

        let err = svc
            .create_order(&user, order_request(&[(a.id, 1)]))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::ExternalApiError(_)));
        assert_eq!(order_count(&db).await, (0, 0));
        assert_eq!(counter_value(&db).await, 1);
    }

    #[tokio::test]
    async fn test_request_validation_happens_before_transaction() {
        let db = setup_db().await;
        let user = insert_user(&db, "c@example.com", UserRole::Customer).await;
        let a = insert_product(&db, "Product A", 1000).await;
        let svc = service_with(&db, ok_gateway(0));

        for req in [
            order_request(&[]),
            order_request(&[(a.id, 0)]),
            order_request(&[(a.id, 1), (a.id, 2)]),
            CreateOrderRequest {
                address: " ".to_string(),
                ..order_request(&[(a.id, 1)])
            },
        ] {
            assert!(matches!(
                svc.create_order(&user, req).await,
                Err(AppError::ValidationError(_))
            ));
        }
        assert_eq!(counter_value(&db).await, 1);
    }

    #[tokio::test]
    async fn test_concurrent_orders_get_distinct_sequences() {
        let db = setup_db().await;
        let user = insert_user(&db, "c@example.com", UserRole::Customer).await;
        let a = insert_product(&db, "Product A", 1000).await;
        let svc = service_with(&db, ok_gateway(4));

        let (r1, r2, r3, r4) = tokio::join!(
            svc.create_order(&user, order_request(&[(a.id, 1)])),
            svc.create_order(&user, order_request(&[(a.id, 2)])),
            svc.create_order(&user, order_request(&[(a.id, 3)])),
            svc.create_order(&user, order_request(&[(a.id, 4)])),
        );

        let mut sequences: Vec<String> = [r1, r2, r3, r4]
            .into_iter()
            .map(|r| {
                let number = r.unwrap().number;
                // 序号紧跟在 8 位随机数之后
                let tail = number.rsplit('/').next().unwrap().to_string();
                tail[8..].to_string()
            })
            .collect();
        sequences.sort();
        assert_eq!(sequences, vec!["1", "2", "3", "4"]);
        assert_eq!(counter_value(&db).await, 5);
    }

    async fn insert_order_at(
        db: &DatabaseConnection,
        user: &AuthUser,
        status: OrderStatus,
        expired_at: DateTime<Utc>,
    ) -> orders::Model {
        orders::ActiveModel {
            id: Set(Uuid::new_v4()),
            number: Set(format!("INV/TEST/{}", Uuid::new_v4())),
            user_id: Set(user.id),
            order_status_code: Set(status),
            user_full_name: Set(user.full_name.clone()),
            address: Set("addr".to_string()),
            phone_number: Set("0812".to_string()),
            notes: Set(None),
            total: Set(1000),
            expired_at: Set(expired_at),
            xendit_invoice_id: Set(Some("inv".to_string())),
            xendit_invoice_url: Set(Some("https://checkout.xendit.co/web/inv".to_string())),
            xendit_paid_at: Set(None),
            xendit_payment_channel: Set(None),
            xendit_payment_method: Set(None),
            created_at: Set(Utc::now()),
            created_by: Set(user.full_name.clone()),
            updated_at: Set(None),
            updated_by: Set(None),
        }
        .insert(db)
        .await
        .unwrap()
    }

    #[tokio::test]
    async fn test_expired_status_is_identical_in_admin_and_user_lists() {
        let db = setup_db().await;
        let admin = insert_user(&db, "admin@example.com", UserRole::Admin).await;
        let user = insert_user(&db, "c@example.com", UserRole::Customer).await;
        let expired =
            insert_order_at(&db, &user, OrderStatus::Unpaid, Utc::now() - Duration::hours(1)).await;
        let svc = service_with(&db, ok_gateway(0));

        let params = PaginationParams::default();
        let admin_list = svc.list_orders_admin(&admin, &params).await.unwrap();
        let user_list = svc.list_orders(&user, &params).await.unwrap();
        let detail = svc.detail_order(&user, expired.id).await.unwrap();

        assert_eq!(admin_list.items[0].status_code, OrderStatus::Expired);
        assert_eq!(user_list.items[0].status_code, OrderStatus::Expired);
        assert_eq!(detail.status_code, OrderStatus::Expired);

        // 过期只在读取时推导，库中仍是 unpaid
        let stored = orders::Entity::find_by_id(expired.id)
            .one(&db)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(stored.order_status_code, OrderStatus::Unpaid);
    }

    #[tokio::test]
    async fn test_huge_page_returns_empty_list() {
        let db = setup_db().await;
        let user = insert_user(&db, "c@example.com", UserRole::Customer).await;
        insert_order_at(&db, &user, OrderStatus::Unpaid, Utc::now() + Duration::hours(1)).await;
        let svc = service_with(&db, ok_gateway(0));

        let params = PaginationParams::new(Some(u64::MAX / 2), Some(100));
        let page = svc.list_orders(&user, &params).await.unwrap();
        assert!(page.items.is_empty());
        assert_eq!(page.pagination.total, 1);
    }

    #[tokio::test]
    async fn test_user_list_only_shows_own_orders() {
        let db = setup_db().await;
        let admin = insert_user(&db, "admin@example.com", UserRole::Admin).await;
        let user = insert_user(&db, "c@example.com", UserRole::Customer).await;
        let other = insert_user(&db, "o@example.com", UserRole::Customer).await;
        let future = Utc::now() + Duration::hours(1);
        insert_order_at(&db, &user, OrderStatus::Unpaid, future).await;
        let others = insert_order_at(&db, &other, OrderStatus::Paid, future).await;
        let svc = service_with(&db, ok_gateway(0));

        let params = PaginationParams::default();
        assert_eq!(svc.list_orders(&user, &params).await.unwrap().items.len(), 1);
        assert_eq!(
            svc.list_orders_admin(&admin, &params)
                .await
                .unwrap()
                .pagination
                .total,
            2
        );
        assert!(matches!(
            svc.list_orders_admin(&user, &params).await,
            Err(AppError::Forbidden)
        ));
        assert!(matches!(
            svc.detail_order(&user, others.id).await,
            Err(AppError::NotFound(_))
        ));
        assert!(svc.detail_order(&admin, others.id).await.is_ok());
    }

    #[tokio::test]
    async fn test_status_transitions() {
        let db = setup_db().await;
        let admin = insert_user(&db, "admin@example.com", UserRole::Admin).await;
        let user = insert_user(&db, "c@example.com", UserRole::Customer).await;
        let future = Utc::now() + Duration::hours(1);
        let paid = insert_order_at(&db, &user, OrderStatus::Paid, future).await;
        let unpaid = insert_order_at(&db, &user, OrderStatus::Unpaid, future).await;
        let expired =
            insert_order_at(&db, &user, OrderStatus::Unpaid, Utc::now() - Duration::hours(1)).await;
        let svc = service_with(&db, ok_gateway(0));
        let to = |status| UpdateOrderStatusRequest { status };

        // 客户不能发货
        assert!(matches!(
            svc.update_order_status(&user, paid.id, to(OrderStatus::Shipping)).await,
            Err(AppError::Forbidden)
        ));
        svc.update_order_status(&admin, paid.id, to(OrderStatus::Shipping))
            .await
            .unwrap();
        svc.update_order_status(&admin, paid.id, to(OrderStatus::Done))
            .await
            .unwrap();
        assert!(matches!(
            svc.update_order_status(&admin, paid.id, to(OrderStatus::Shipping)).await,
            Err(AppError::ValidationError(_))
        ));

        svc.update_order_status(&user, unpaid.id, to(OrderStatus::Canceled))
            .await
            .unwrap();
        assert_eq!(
            svc.detail_order(&user, unpaid.id).await.unwrap().status_code,
            OrderStatus::Canceled
        );

        assert!(matches!(
            svc.update_order_status(&user, expired.id, to(OrderStatus::Canceled)).await,
            Err(AppError::ValidationError(_))
        ));
        assert!(matches!(
            svc.update_order_status(&admin, unpaid.id, to(OrderStatus::Expired)).await,
            Err(AppError::ValidationError(_))
        ));
    }
}
