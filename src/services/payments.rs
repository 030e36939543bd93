use crate::{
    db::DbPool,
    entities::order::{self, Entity as OrderEntity, OrderStatus},
    errors::ServiceError,
};
use rust_decimal::Decimal;
use sea_orm::{
    sea_query::{Expr, SimpleExpr},
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseTransaction, DbBackend, EntityTrait,
    QueryFilter, QuerySelect, Set, TransactionTrait,
};
use serde::Serialize;
use std::sync::Arc;
use tracing::{error, info, instrument, warn};

/// Result of a payment attempt against an existing order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum PaymentOutcome {
    /// The payment covered the total and the order is now `Paid`.
    Paid {
        order_id: i32,
        total: Decimal,
        payment: Decimal,
    },
    /// The payment fell short; the order was left untouched.
    Insufficient {
        order_id: i32,
        total: Decimal,
        payment: Decimal,
    },
}

impl PaymentOutcome {
    pub fn is_paid(&self) -> bool {
        matches!(self, PaymentOutcome::Paid { .. })
    }
}

/// Makes the first statement of a SQLite transaction a write.
///
/// A deferred transaction that reads first holds a shared lock and fails with
/// `SQLITE_BUSY` when it later upgrades while another writer is active. A
/// write as the first statement waits on the busy timeout instead, like
/// `BEGIN IMMEDIATE`.
async fn acquire_sqlite_write_lock(
    txn: &DatabaseTransaction,
    order_id: i32,
) -> Result<(), ServiceError> {
    OrderEntity::update_many()
        .col_expr(
            order::Column::Status,
            SimpleExpr::from(Expr::col(order::Column::Status)),
        )
        .filter(order::Column::Id.eq(order_id))
        .exec(txn)
        .await
        .map_err(|e| {
            error!(error = %e, "Failed to take the SQLite write lock");
            ServiceError::from_db(e)
        })?;
    Ok(())
}

#[derive(Clone)]
pub struct PaymentService {
    db: Arc<DbPool>,
}

impl PaymentService {
    pub fn new(db: Arc<DbPool>) -> Self {
        Self { db }
    }

    /// Settles an order if `payment_amount` covers its recorded total.
    ///
    /// The order row is read with an exclusive lock inside a transaction, so
    /// concurrent payments on the same order run one after the other and
    /// each sees the state the previous one committed. SQLite has no row
    /// locks; there the transaction takes the database write lock before
    /// reading. A short payment rolls the transaction back. An unknown order
    /// id is reported as `ServiceError::NotFound` and nothing is written.
    #[instrument(skip(self))]
    pub async fn process_order_payment(
        &self,
        order_id: i32,
        payment_amount: Decimal,
    ) -> Result<PaymentOutcome, ServiceError> {
        if payment_amount < Decimal::ZERO {
            return Err(ServiceError::InvalidInput(format!(
                "payment amount cannot be negative: {}",
                payment_amount
            )));
        }

        let txn = self.db.begin().await.map_err(|e| {
            error!(error = %e, "Failed to start payment transaction");
            ServiceError::from_db(e)
        })?;

        if self.db.get_database_backend() == DbBackend::Sqlite {
            acquire_sqlite_write_lock(&txn, order_id).await?;
        }

        let locked = OrderEntity::find_by_id(order_id)
            .lock_exclusive()
            .one(&txn)
            .await?;

        let Some(order) = locked else {
            txn.rollback().await?;
            warn!("Payment attempted for unknown order");
            return Err(ServiceError::not_found("Order", order_id));
        };

        let total = order.total_amount;
        if payment_amount < total {
            txn.rollback().await?;
            info!(%total, "Payment insufficient, order left unchanged");
            return Ok(PaymentOutcome::Insufficient {
                order_id,
                total,
                payment: payment_amount,
            });
        }

        let mut active: order::ActiveModel = order.into();
        active.status = Set(OrderStatus::Paid);
        active.update(&txn).await.map_err(|e| {
            error!(error = %e, "Failed to mark order as paid");
            ServiceError::from_db(e)
        })?;

        txn.commit().await.map_err(|e| {
            error!(error = %e, "Failed to commit payment transaction");
            ServiceError::from_db(e)
        })?;

        info!(%total, "Order paid");
        Ok(PaymentOutcome::Paid {
            order_id,
            total,
            payment: payment_amount,
        })
    }
}
