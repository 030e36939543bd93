use super::PHONE_REGEX;
use crate::{
    db::DbPool,
    entities::customer::{self, Entity as CustomerEntity, Model as CustomerModel},
    errors::ServiceError,
};
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, NotSet, QueryFilter, Set};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{error, info, instrument};
use validator::Validate;

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateCustomerRequest {
    #[validate(length(min = 1, max = 50, message = "First name must be between 1 and 50 characters"))]
    pub first_name: String,
    #[validate(length(min = 1, max = 50, message = "Last name must be between 1 and 50 characters"))]
    pub last_name: String,
    #[validate(email, length(max = 150))]
    pub email: String,
    #[validate(regex(path = "PHONE_REGEX", message = "Phone must be exactly 10 digits"))]
    pub phone: String,
    pub address: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct UpdateCustomerRequest {
    #[validate(length(min = 1, max = 50))]
    pub first_name: Option<String>,
    #[validate(length(min = 1, max = 50))]
    pub last_name: Option<String>,
    #[validate(email, length(max = 150))]
    pub email: Option<String>,
    #[validate(regex(path = "PHONE_REGEX", message = "Phone must be exactly 10 digits"))]
    pub phone: Option<String>,
    pub address: Option<String>,
}

/// Service for managing customers
#[derive(Clone)]
pub struct CustomerService {
    db_pool: Arc<DbPool>,
}

impl CustomerService {
    pub fn new(db_pool: Arc<DbPool>) -> Self {
        Self { db_pool }
    }

    /// Creates a new customer; a duplicate email surfaces as `Conflict`
    #[instrument(skip(self, request), fields(email = %request.email))]
    pub async fn create_customer(
        &self,
        request: CreateCustomerRequest,
    ) -> Result<CustomerModel, ServiceError> {
        request.validate()?;

        let model = customer::ActiveModel {
            id: NotSet,
            first_name: Set(request.first_name),
            last_name: Set(request.last_name),
            email: Set(request.email),
            phone: Set(request.phone),
            address: Set(request.address),
            created_at: NotSet,
        }
        .insert(&*self.db_pool)
        .await
        .map_err(|e| {
            error!(error = %e, "Failed to create customer");
            ServiceError::from_db(e)
        })?;

        info!(customer_id = model.id, "Customer created");
        Ok(model)
    }

    pub async fn get_customer(&self, id: i32) -> Result<CustomerModel, ServiceError> {
        CustomerEntity::find_by_id(id)
            .one(&*self.db_pool)
            .await?
            .ok_or_else(|| ServiceError::not_found("Customer", id))
    }

    pub async fn find_by_email(&self, email: &str) -> Result<Option<CustomerModel>, ServiceError> {
        Ok(CustomerEntity::find()
            .filter(customer::Column::Email.eq(email))
            .one(&*self.db_pool)
            .await?)
    }

    #[instrument(skip(self, request))]
    pub async fn update_customer(
        &self,
        id: i32,
        request: UpdateCustomerRequest,
    ) -> Result<CustomerModel, ServiceError> {
        request.validate()?;

        let mut active: customer::ActiveModel = self.get_customer(id).await?.into();
        if let Some(first_name) = request.first_name {
            active.first_name = Set(first_name);
        }
        if let Some(last_name) = request.last_name {
            active.last_name = Set(last_name);
        }
        if let Some(email) = request.email {
            active.email = Set(email);
        }
        if let Some(phone) = request.phone {
            active.phone = Set(phone);
        }
        if let Some(address) = request.address {
            active.address = Set(Some(address));
        }

        Ok(active.update(&*self.db_pool).await?)
    }

    /// Deletes a customer together with their orders and line items
    #[instrument(skip(self))]
    pub async fn delete_customer(&self, id: i32) -> Result<(), ServiceError> {
        let result = CustomerEntity::delete_by_id(id).exec(&*self.db_pool).await?;
        if result.rows_affected == 0 {
            return Err(ServiceError::not_found("Customer", id));
        }
        info!(customer_id = id, "Customer deleted");
        Ok(())
    }
}
