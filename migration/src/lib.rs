pub use sea_orm_migration::prelude::*;

mod m20250101_000001_create_users_and_products;
mod m20250101_000002_create_user_carts;
mod m20250102_000001_create_orders;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20250101_000001_create_users_and_products::Migration),
            Box::new(m20250101_000002_create_user_carts::Migration),
            Box::new(m20250102_000001_create_orders::Migration),
        ]
    }
}
