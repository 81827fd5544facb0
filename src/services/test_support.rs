//! 服务层测试共用的内存 SQLite 数据库与数据构造函数

use crate::entities::{
    UserRole, numbering_entity as numberings, order_entity as orders,
    order_item_entity as order_items, product_entity as products, user_cart_entity as user_carts,
    user_entity as users,
};
use crate::models::AuthUser;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sea_orm::{
    ActiveModelTrait, ConnectOptions, ConnectionTrait, Database, DatabaseConnection, EntityTrait,
    Schema, Set,
};
use uuid::Uuid;

pub async fn setup_db() -> DatabaseConnection {
    let mut opts = ConnectOptions::new("sqlite::memory:".to_string());
    // 单连接：内存库按连接隔离
    opts.max_connections(1)
        .min_connections(1)
        .sqlx_logging(false);
    let db = Database::connect(opts).await.unwrap();

    let schema = Schema::new(db.get_database_backend());
    let backend = db.get_database_backend();
    db.execute(backend.build(&schema.create_table_from_entity(users::Entity)))
        .await
        .unwrap();
    db.execute(backend.build(&schema.create_table_from_entity(products::Entity)))
        .await
        .unwrap();
    db.execute(backend.build(&schema.create_table_from_entity(user_carts::Entity)))
        .await
        .unwrap();
    db.execute(backend.build(&schema.create_table_from_entity(numberings::Entity)))
        .await
        .unwrap();
    db.execute(backend.build(&schema.create_table_from_entity(orders::Entity)))
        .await
        .unwrap();
    db.execute(backend.build(&schema.create_table_from_entity(order_items::Entity)))
        .await
        .unwrap();

    numberings::ActiveModel {
        id: Set("order".to_string()),
        number: Set(1),
    }
    .insert(&db)
    .await
    .unwrap();

    db
}

pub async fn insert_user(db: &DatabaseConnection, email: &str, role: UserRole) -> AuthUser {
    let user = users::ActiveModel {
        id: Set(Uuid::new_v4()),
        full_name: Set(format!("User {email}")),
        email: Set(email.to_string()),
        password_hash: Set("not-a-real-hash".to_string()),
        role_code: Set(role),
        created_at: Set(Utc::now()),
        created_by: Set(None),
        updated_at: Set(None),
        updated_by: Set(None),
    }
    .insert(db)
    .await
    .unwrap();

    AuthUser {
        id: user.id,
        full_name: user.full_name,
        email: user.email,
        role: user.role_code,
    }
}

pub async fn insert_product_at(
    db: &DatabaseConnection,
    name: &str,
    price: i64,
    created_at: DateTime<Utc>,
) -> products::Model {
    products::ActiveModel {
        id: Set(Uuid::new_v4()),
        name: Set(name.to_string()),
        description: Set(format!("{name} description")),
        price: Set(price),
        image_file_name: Set(format!("{}.png", name.to_lowercase().replace(' ', "_"))),
        created_at: Set(created_at),
        created_by: Set("seed".to_string()),
        updated_at: Set(None),
        updated_by: Set(None),
        deleted_at: Set(None),
        deleted_by: Set(None),
        is_deleted: Set(false),
    }
    .insert(db)
    .await
    .unwrap()
}

pub async fn insert_product(db: &DatabaseConnection, name: &str, price: i64) -> products::Model {
    insert_product_at(db, name, price, Utc::now()).await
}

pub async fn counter_value(db: &DatabaseConnection) -> i64 {
    numberings::Entity::find_by_id("order".to_string())
        .one(db)
        .await
        .unwrap()
        .unwrap()
        .number
}

mockall::mock! {
    pub Gateway {}
    #[async_trait]
    impl crate::external::InvoiceGateway for Gateway {
        async fn create_invoice(
            &self,
            request: crate::external::CreateInvoiceRequest,
        ) -> crate::error::AppResult<crate::external::Invoice>;
    }
}
