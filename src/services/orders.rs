use super::{validate_percentage, validate_positive_decimal};
use crate::{
    db::DbPool,
    entities::{
        customer_order::{self, Entity as CustomerOrderEntity, Model as CustomerOrderModel},
        order::{self, Entity as OrderEntity, Model as OrderModel, OrderStatus, PaymentMethod},
        order_detail::{self, Entity as OrderDetailEntity, Model as OrderDetailModel},
    },
    errors::ServiceError,
};
use chrono::{NaiveDate, Utc};
use rust_decimal::Decimal;
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, NotSet, QueryFilter, QueryOrder, Set};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{error, info, instrument};
use validator::Validate;

/// Request/Response types for the order service
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateOrderRequest {
    pub customer_id: i32,
    /// Defaults to today (UTC)
    pub order_date: Option<NaiveDate>,
    #[validate(custom = "validate_positive_decimal")]
    pub total_amount: Decimal,
    pub payment_method: PaymentMethod,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct AddLineItemRequest {
    pub order_id: i32,
    pub product_id: i32,
    #[validate(range(min = 1, message = "Quantity must be at least 1"))]
    pub quantity: i32,
    #[validate(custom = "validate_positive_decimal")]
    pub subtotal: Decimal,
    /// Defaults to no discount
    #[validate(custom = "validate_percentage")]
    pub discount_percentage: Option<Decimal>,
}

/// Service for orders and their line items
#[derive(Clone)]
pub struct OrderService {
    db_pool: Arc<DbPool>,
}

impl OrderService {
    /// Creates a new order service instance
    pub fn new(db_pool: Arc<DbPool>) -> Self {
        Self { db_pool }
    }

    /// Creates a new order in `Pending` status
    #[instrument(skip(self, request), fields(customer_id = request.customer_id))]
    pub async fn create_order(&self, request: CreateOrderRequest) -> Result<OrderModel, ServiceError> {
        request.validate()?;

        let order_date = request
            .order_date
            .unwrap_or_else(|| Utc::now().date_naive());

        let model = order::ActiveModel {
            id: NotSet,
            customer_id: Set(request.customer_id),
            order_date: Set(order_date),
            total_amount: Set(request.total_amount),
            payment_method: Set(request.payment_method),
            status: Set(OrderStatus::default()),
        }
        .insert(&*self.db_pool)
        .await
        .map_err(|e| {
            error!(error = %e, customer_id = request.customer_id, "Failed to create order in database");
            ServiceError::from_db(e)
        })?;

        info!(order_id = model.id, customer_id = request.customer_id, "Order created successfully");
        Ok(model)
    }

    /// Retrieves an order by ID
    #[instrument(skip(self))]
    pub async fn get_order(&self, order_id: i32) -> Result<OrderModel, ServiceError> {
        OrderEntity::find_by_id(order_id)
            .one(&*self.db_pool)
            .await?
            .ok_or_else(|| ServiceError::not_found("Order", order_id))
    }

    /// All orders of one customer, oldest first
    pub async fn list_customer_orders(&self, customer_id: i32) -> Result<Vec<OrderModel>, ServiceError> {
        Ok(OrderEntity::find()
            .filter(order::Column::CustomerId.eq(customer_id))
            .order_by_asc(order::Column::Id)
            .all(&*self.db_pool)
            .await?)
    }

    /// Moves an order to `status`. Any member of [`OrderStatus`] is accepted.
    #[instrument(skip(self))]
    pub async fn update_status(
        &self,
        order_id: i32,
        status: OrderStatus,
    ) -> Result<OrderModel, ServiceError> {
        let mut active: order::ActiveModel = self.get_order(order_id).await?.into();
        active.status = Set(status);

        let updated = active.update(&*self.db_pool).await.map_err(|e| {
            error!(error = %e, order_id, "Failed to update order status");
            ServiceError::from_db(e)
        })?;

        info!(order_id, status = %status, "Order status updated");
        Ok(updated)
    }

    /// Deletes an order and, through the cascade, its line items
    #[instrument(skip(self))]
    pub async fn delete_order(&self, order_id: i32) -> Result<(), ServiceError> {
        let result = OrderEntity::delete_by_id(order_id).exec(&*self.db_pool).await?;
        if result.rows_affected == 0 {
            return Err(ServiceError::not_found("Order", order_id));
        }
        info!(order_id, "Order deleted");
        Ok(())
    }

    /// Adds a line item. Stock levels are not touched.
    #[instrument(skip(self, request), fields(order_id = request.order_id, product_id = request.product_id))]
    pub async fn add_line_item(
        &self,
        request: AddLineItemRequest,
    ) -> Result<OrderDetailModel, ServiceError> {
        request.validate()?;

        let model = order_detail::ActiveModel {
            id: NotSet,
            order_id: Set(request.order_id),
            product_id: Set(request.product_id),
            quantity: Set(request.quantity),
            subtotal: Set(request.subtotal),
            discount_percentage: Set(request.discount_percentage.unwrap_or(Decimal::ZERO)),
        }
        .insert(&*self.db_pool)
        .await
        .map_err(|e| {
            error!(error = %e, "Failed to add line item");
            ServiceError::from_db(e)
        })?;

        Ok(model)
    }

    pub async fn line_items(&self, order_id: i32) -> Result<Vec<OrderDetailModel>, ServiceError> {
        Ok(OrderDetailEntity::find()
            .filter(order_detail::Column::OrderId.eq(order_id))
            .order_by_asc(order_detail::Column::Id)
            .all(&*self.db_pool)
            .await?)
    }

    /// Reads the `customer_orders` view, optionally for a single customer
    pub async fn customer_orders(
        &self,
        customer_id: Option<i32>,
    ) -> Result<Vec<CustomerOrderModel>, ServiceError> {
        let mut query = CustomerOrderEntity::find();
        if let Some(customer_id) = customer_id {
            query = query.filter(customer_order::Column::CustomerId.eq(customer_id));
        }

        Ok(query
            .order_by_asc(customer_order::Column::OrderId)
            .all(&*self.db_pool)
            .await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn line_item_rules() {
        let item = AddLineItemRequest {
            order_id: 1,
            product_id: 1,
            quantity: 2,
            subtotal: dec!(100),
            discount_percentage: Some(dec!(10)),
        };
        assert!(item.validate().is_ok());

        let empty = AddLineItemRequest {
            quantity: 0,
            ..item.clone()
        };
        assert!(empty.validate().is_err());

        let over_discounted = AddLineItemRequest {
            discount_percentage: Some(dec!(150)),
            ..item
        };
        assert!(over_discounted.validate().is_err());
    }

    #[test]
    fn order_total_must_be_positive() {
        let request = CreateOrderRequest {
            customer_id: 1,
            order_date: None,
            total_amount: dec!(0),
            payment_method: PaymentMethod::Cash,
        };
        assert!(request.validate().is_err());
    }
}
