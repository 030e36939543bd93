use sea_orm_migration::prelude::*;

use super::m20240301_000003_create_products_table::Products;
use super::m20240301_000005_create_orders_table::Orders;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(OrderDetails::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(OrderDetails::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(OrderDetails::OrderId).integer().not_null())
                    .col(ColumnDef::new(OrderDetails::ProductId).integer().not_null())
                    .col(
                        ColumnDef::new(OrderDetails::Quantity)
                            .integer()
                            .not_null()
                            .check(Expr::col(OrderDetails::Quantity).gt(0)),
                    )
                    .col(
                        ColumnDef::new(OrderDetails::Subtotal)
                            .decimal_len(10, 2)
                            .not_null()
                            .check(Expr::col(OrderDetails::Subtotal).gt(0)),
                    )
                    .col(
                        ColumnDef::new(OrderDetails::DiscountPercentage)
                            .decimal_len(5, 2)
                            .not_null()
                            .default(0)
                            .check(Expr::col(OrderDetails::DiscountPercentage).between(0, 100)),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_order_details_order_id")
                            .from(OrderDetails::Table, OrderDetails::OrderId)
                            .to(Orders::Table, Orders::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_order_details_product_id")
                            .from(OrderDetails::Table, OrderDetails::ProductId)
                            .to(Products::Table, Products::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(OrderDetails::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub enum OrderDetails {
    Table,
    Id,
    OrderId,
    ProductId,
    Quantity,
    Subtotal,
    DiscountPercentage,
}
