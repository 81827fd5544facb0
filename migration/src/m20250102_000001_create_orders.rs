use sea_orm_migration::prelude::*;

use crate::m20250101_000001_create_users_and_products::Users;

#[derive(DeriveIden)]
enum Orders {
    Table,
    Id,
    Number,
    UserId,
    OrderStatusCode,
    UserFullName,
    Address,
    PhoneNumber,
    Notes,
    Total,
    ExpiredAt,
    XenditInvoiceId,
    XenditInvoiceUrl,
    XenditPaidAt,
    XenditPaymentChannel,
    XenditPaymentMethod,
    CreatedAt,
    CreatedBy,
    UpdatedAt,
    UpdatedBy,
}

#[derive(DeriveIden)]
enum OrderItems {
    Table,
    Id,
    OrderId,
    ProductId,
    ProductName,
    ProductImageFileName,
    ProductPrice,
    Quantity,
    CreatedAt,
    CreatedBy,
}

#[derive(DeriveIden)]
enum Numberings {
    Table,
    Id,
    Number,
}

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Numberings::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Numberings::Id)
                            .string_len(64)
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Numberings::Number).big_integer().not_null())
                    .to_owned(),
            )
            .await?;

        // 订单编号计数器初始值
        manager
            .exec_stmt(
                Query::insert()
                    .into_table(Numberings::Table)
                    .columns([Numberings::Id, Numberings::Number])
                    .values_panic(["order".into(), 1i64.into()])
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Orders::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Orders::Id).uuid().not_null().primary_key())
                    .col(
                        ColumnDef::new(Orders::Number)
                            .string_len(64)
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(Orders::UserId).uuid().not_null())
                    .col(
                        ColumnDef::new(Orders::OrderStatusCode)
                            .string_len(32)
                            .not_null()
                            .default("unpaid"),
                    )
                    .col(ColumnDef::new(Orders::UserFullName).string_len(255).not_null())
                    .col(ColumnDef::new(Orders::Address).text().not_null())
                    .col(ColumnDef::new(Orders::PhoneNumber).string_len(32).not_null())
                    .col(ColumnDef::new(Orders::Notes).text().null())
                    .col(ColumnDef::new(Orders::Total).big_integer().not_null())
                    .col(
                        ColumnDef::new(Orders::ExpiredAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Orders::XenditInvoiceId).string_len(255).null())
                    .col(ColumnDef::new(Orders::XenditInvoiceUrl).text().null())
                    .col(
                        ColumnDef::new(Orders::XenditPaidAt)
                            .timestamp_with_time_zone()
                            .null(),
                    )
                    .col(
                        ColumnDef::new(Orders::XenditPaymentChannel)
                            .string_len(64)
                            .null(),
                    )
                    .col(
                        ColumnDef::new(Orders::XenditPaymentMethod)
                            .string_len(64)
                            .null(),
                    )
                    .col(
                        ColumnDef::new(Orders::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::cust("NOW()")),
                    )
                    .col(ColumnDef::new(Orders::CreatedBy).string_len(255).not_null())
                    .col(ColumnDef::new(Orders::UpdatedAt).timestamp_with_time_zone().null())
                    .col(ColumnDef::new(Orders::UpdatedBy).string_len(255).null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_orders_user")
                            .from(Orders::Table, Orders::UserId)
                            .to(Users::Table, Users::Id),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_orders_user_created")
                    .table(Orders::Table)
                    .col(Orders::UserId)
                    .col(Orders::CreatedAt)
                    .to_owned(),
            )
            .await?;

        // 订单明细只保存下单时的商品快照，不关联商品表
        manager
            .create_table(
                Table::create()
                    .table(OrderItems::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(OrderItems::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(OrderItems::OrderId).uuid().not_null())
                    .col(ColumnDef::new(OrderItems::ProductId).uuid().not_null())
                    .col(
                        ColumnDef::new(OrderItems::ProductName)
                            .string_len(255)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(OrderItems::ProductImageFileName)
                            .string_len(255)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(OrderItems::ProductPrice)
                            .big_integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(OrderItems::Quantity).integer().not_null())
                    .col(
                        ColumnDef::new(OrderItems::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::cust("NOW()")),
                    )
                    .col(ColumnDef::new(OrderItems::CreatedBy).string_len(255).not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_order_items_order")
                            .from(OrderItems::Table, OrderItems::OrderId)
                            .to(Orders::Table, Orders::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_order_items_order")
                    .table(OrderItems::Table)
                    .col(OrderItems::OrderId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().if_exists().table(OrderItems::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().if_exists().table(Orders::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().if_exists().table(Numberings::Table).to_owned())
            .await?;
        Ok(())
    }
}
