use sea_orm_migration::prelude::*;

use crate::m20250101_000001_create_users_and_products::{Products, Users};

#[derive(DeriveIden)]
enum UserCarts {
    Table,
    Id,
    UserId,
    ProductId,
    Quantity,
    CreatedAt,
    CreatedBy,
    UpdatedAt,
    UpdatedBy,
}

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(UserCarts::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(UserCarts::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(UserCarts::UserId).uuid().not_null())
                    .col(ColumnDef::new(UserCarts::ProductId).uuid().not_null())
                    .col(ColumnDef::new(UserCarts::Quantity).integer().not_null())
                    .col(
                        ColumnDef::new(UserCarts::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::cust("NOW()")),
                    )
                    .col(ColumnDef::new(UserCarts::CreatedBy).string_len(255).not_null())
                    .col(
                        ColumnDef::new(UserCarts::UpdatedAt)
                            .timestamp_with_time_zone()
                            .null(),
                    )
                    .col(ColumnDef::new(UserCarts::UpdatedBy).string_len(255).null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_user_carts_user")
                            .from(UserCarts::Table, UserCarts::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_user_carts_product")
                            .from(UserCarts::Table, UserCarts::ProductId)
                            .to(Products::Table, Products::Id),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_user_carts_user_product")
                    .table(UserCarts::Table)
                    .col(UserCarts::UserId)
                    .col(UserCarts::ProductId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().if_exists().table(UserCarts::Table).to_owned())
            .await?;
        Ok(())
    }
}
