use crate::{
    db::DbPool,
    entities::order_detail::{self, Entity as OrderDetailEntity},
    errors::ServiceError,
};
use rust_decimal::{Decimal, RoundingStrategy};
use sea_orm::{ColumnTrait, EntityTrait, QueryFilter, QuerySelect};
use std::sync::Arc;
use tracing::{debug, instrument};

/// Amount left of `subtotal` after taking `discount_percentage` percent off.
pub fn discounted_amount(subtotal: Decimal, discount_percentage: Decimal) -> Decimal {
    subtotal - subtotal * discount_percentage / Decimal::ONE_HUNDRED
}

/// Read-only price computations over line items
#[derive(Clone)]
pub struct PricingService {
    db_pool: Arc<DbPool>,
}

impl PricingService {
    pub fn new(db_pool: Arc<DbPool>) -> Self {
        Self { db_pool }
    }

    /// Sum of every line item's subtotal after its discount, to the cent.
    ///
    /// An order without line items (or an unknown order) totals zero.
    #[instrument(skip(self))]
    pub async fn calculate_discounted_total(&self, order_id: i32) -> Result<Decimal, ServiceError> {
        let lines: Vec<(Decimal, Decimal)> = OrderDetailEntity::find()
            .select_only()
            .column(order_detail::Column::Subtotal)
            .column(order_detail::Column::DiscountPercentage)
            .filter(order_detail::Column::OrderId.eq(order_id))
            .into_tuple()
            .all(&*self.db_pool)
            .await?;

        let total: Decimal = lines
            .iter()
            .map(|&(subtotal, discount)| discounted_amount(subtotal, discount))
            .sum();

        debug!(line_items = lines.len(), %total, "Discounted total computed");
        Ok(total.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero))
    }
}
