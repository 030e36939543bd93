use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

const CREATE_VIEW: &str = "CREATE VIEW customer_orders AS \
    SELECT o.id AS order_id, \
           o.customer_id AS customer_id, \
           c.first_name AS first_name, \
           c.last_name AS last_name, \
           o.order_date AS order_date, \
           o.total_amount AS total_amount, \
           o.status AS status \
    FROM orders o \
    INNER JOIN customers c ON o.customer_id = c.id";

const DROP_VIEW: &str = "DROP VIEW IF EXISTS customer_orders";

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // sea-query has no view builder; the statements are plain SQL every backend accepts.
        // `Migrator::fresh` only drops tables, so a stale view may still be around on SQLite.
        let db = manager.get_connection();
        db.execute_unprepared(DROP_VIEW).await?;
        db.execute_unprepared(CREATE_VIEW).await?;
        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.get_connection().execute_unprepared(DROP_VIEW).await?;
        Ok(())
    }
}
