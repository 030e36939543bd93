use super::{validate_positive_decimal, PHONE_REGEX};
use crate::{
    db::DbPool,
    entities::{
        category::{self, Entity as CategoryEntity, Model as CategoryModel},
        product::{self, Entity as ProductEntity, Model as ProductModel},
        supplier::{self, Entity as SupplierEntity, Model as SupplierModel},
    },
    errors::ServiceError,
};
use rust_decimal::Decimal;
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, NotSet, QueryFilter, QueryOrder, Set};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{error, info, instrument};
use validator::Validate;

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateCategoryRequest {
    #[validate(length(min = 1, max = 100, message = "Category name must be between 1 and 100 characters"))]
    pub name: String,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct UpdateCategoryRequest {
    #[validate(length(min = 1, max = 100, message = "Category name must be between 1 and 100 characters"))]
    pub name: Option<String>,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateSupplierRequest {
    #[validate(length(min = 1, max = 150))]
    pub name: String,
    #[validate(length(max = 100))]
    pub contact_name: Option<String>,
    #[validate(regex(path = "PHONE_REGEX", message = "Phone must be exactly 10 digits"))]
    pub phone: String,
    #[validate(email, length(max = 150))]
    pub email: String,
    pub address: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct UpdateSupplierRequest {
    #[validate(length(max = 100))]
    pub contact_name: Option<String>,
    #[validate(regex(path = "PHONE_REGEX", message = "Phone must be exactly 10 digits"))]
    pub phone: Option<String>,
    #[validate(email, length(max = 150))]
    pub email: Option<String>,
    pub address: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateProductRequest {
    #[validate(length(min = 1, max = 150))]
    pub name: String,
    pub description: Option<String>,
    pub category_id: i32,
    #[validate(custom = "validate_positive_decimal")]
    pub price: Decimal,
    #[validate(range(min = 0, message = "Stock quantity cannot be negative"))]
    pub stock_quantity: i32,
    pub supplier_id: i32,
    /// Months of warranty; the store default of 12 applies when absent
    #[validate(range(min = 0, message = "Warranty period cannot be negative"))]
    pub warranty_period: Option<i32>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct UpdateProductRequest {
    #[validate(length(min = 1, max = 150))]
    pub name: Option<String>,
    pub description: Option<String>,
    #[validate(custom = "validate_positive_decimal")]
    pub price: Option<Decimal>,
    #[validate(range(min = 0, message = "Stock quantity cannot be negative"))]
    pub stock_quantity: Option<i32>,
    #[validate(range(min = 0, message = "Warranty period cannot be negative"))]
    pub warranty_period: Option<i32>,
}

/// Categories, suppliers and products.
///
/// Deleting a category or a supplier removes its products (and their line
/// items) through the store's cascading foreign keys.
#[derive(Clone)]
pub struct CatalogService {
    db_pool: Arc<DbPool>,
}

impl CatalogService {
    pub fn new(db_pool: Arc<DbPool>) -> Self {
        Self { db_pool }
    }

    #[instrument(skip(self, request), fields(name = %request.name))]
    pub async fn create_category(
        &self,
        request: CreateCategoryRequest,
    ) -> Result<CategoryModel, ServiceError> {
        request.validate()?;

        let model = category::ActiveModel {
            id: NotSet,
            name: Set(request.name),
            description: Set(request.description),
        }
        .insert(&*self.db_pool)
        .await
        .map_err(|e| {
            error!(error = %e, "Failed to create category");
            ServiceError::from_db(e)
        })?;

        info!(category_id = model.id, "Category created");
        Ok(model)
    }

    pub async fn get_category(&self, id: i32) -> Result<CategoryModel, ServiceError> {
        CategoryEntity::find_by_id(id)
            .one(&*self.db_pool)
            .await?
            .ok_or_else(|| ServiceError::not_found("Category", id))
    }

    #[instrument(skip(self, request))]
    pub async fn update_category(
        &self,
        id: i32,
        request: UpdateCategoryRequest,
    ) -> Result<CategoryModel, ServiceError> {
        request.validate()?;

        let mut active: category::ActiveModel = self.get_category(id).await?.into();
        if let Some(name) = request.name {
            active.name = Set(name);
        }
        if let Some(description) = request.description {
            active.description = Set(Some(description));
        }

        Ok(active.update(&*self.db_pool).await?)
    }

    #[instrument(skip(self))]
    pub async fn delete_category(&self, id: i32) -> Result<(), ServiceError> {
        let result = CategoryEntity::delete_by_id(id).exec(&*self.db_pool).await?;
        if result.rows_affected == 0 {
            return Err(ServiceError::not_found("Category", id));
        }
        info!(category_id = id, "Category deleted with its products");
        Ok(())
    }

    #[instrument(skip(self, request), fields(name = %request.name))]
    pub async fn create_supplier(
        &self,
        request: CreateSupplierRequest,
    ) -> Result<SupplierModel, ServiceError> {
        request.validate()?;

        let model = supplier::ActiveModel {
            id: NotSet,
            name: Set(request.name),
            contact_name: Set(request.contact_name),
            phone: Set(request.phone),
            email: Set(request.email),
            address: Set(request.address),
            created_at: NotSet,
        }
        .insert(&*self.db_pool)
        .await
        .map_err(|e| {
            error!(error = %e, "Failed to create supplier");
            ServiceError::from_db(e)
        })?;

        info!(supplier_id = model.id, "Supplier created");
        Ok(model)
    }

    pub async fn get_supplier(&self, id: i32) -> Result<SupplierModel, ServiceError> {
        SupplierEntity::find_by_id(id)
            .one(&*self.db_pool)
            .await?
            .ok_or_else(|| ServiceError::not_found("Supplier", id))
    }

    #[instrument(skip(self, request))]
    pub async fn update_supplier(
        &self,
        id: i32,
        request: UpdateSupplierRequest,
    ) -> Result<SupplierModel, ServiceError> {
        request.validate()?;

        let mut active: supplier::ActiveModel = self.get_supplier(id).await?.into();
        if let Some(contact_name) = request.contact_name {
            active.contact_name = Set(Some(contact_name));
        }
        if let Some(phone) = request.phone {
            active.phone = Set(phone);
        }
        if let Some(email) = request.email {
            active.email = Set(email);
        }
        if let Some(address) = request.address {
            active.address = Set(Some(address));
        }

        Ok(active.update(&*self.db_pool).await?)
    }

    #[instrument(skip(self))]
    pub async fn delete_supplier(&self, id: i32) -> Result<(), ServiceError> {
        let result = SupplierEntity::delete_by_id(id).exec(&*self.db_pool).await?;
        if result.rows_affected == 0 {
            return Err(ServiceError::not_found("Supplier", id));
        }
        info!(supplier_id = id, "Supplier deleted with its products");
        Ok(())
    }

    #[instrument(skip(self, request), fields(name = %request.name, category_id = request.category_id))]
    pub async fn create_product(
        &self,
        request: CreateProductRequest,
    ) -> Result<ProductModel, ServiceError> {
        request.validate()?;

        let model = product::ActiveModel {
            id: NotSet,
            name: Set(request.name),
            description: Set(request.description),
            category_id: Set(request.category_id),
            price: Set(request.price),
            stock_quantity: Set(request.stock_quantity),
            supplier_id: Set(request.supplier_id),
            warranty_period: request.warranty_period.map_or(NotSet, Set),
            created_at: NotSet,
        }
        .insert(&*self.db_pool)
        .await
        .map_err(|e| {
            error!(error = %e, "Failed to create product");
            ServiceError::from_db(e)
        })?;

        info!(product_id = model.id, "Product created");
        Ok(model)
    }

    pub async fn get_product(&self, id: i32) -> Result<ProductModel, ServiceError> {
        ProductEntity::find_by_id(id)
            .one(&*self.db_pool)
            .await?
            .ok_or_else(|| ServiceError::not_found("Product", id))
    }

    pub async fn list_products_by_category(
        &self,
        category_id: i32,
    ) -> Result<Vec<ProductModel>, ServiceError> {
        Ok(ProductEntity::find()
            .filter(product::Column::CategoryId.eq(category_id))
            .order_by_asc(product::Column::Id)
            .all(&*self.db_pool)
            .await?)
    }

    #[instrument(skip(self, request))]
    pub async fn update_product(
        &self,
        id: i32,
        request: UpdateProductRequest,
    ) -> Result<ProductModel, ServiceError> {
        request.validate()?;

        let mut active: product::ActiveModel = self.get_product(id).await?.into();
        if let Some(name) = request.name {
            active.name = Set(name);
        }
        if let Some(description) = request.description {
            active.description = Set(Some(description));
        }
        if let Some(price) = request.price {
            active.price = Set(price);
        }
        if let Some(stock_quantity) = request.stock_quantity {
            active.stock_quantity = Set(stock_quantity);
        }
        if let Some(warranty_period) = request.warranty_period {
            active.warranty_period = Set(warranty_period);
        }

        Ok(active.update(&*self.db_pool).await?)
    }

    #[instrument(skip(self))]
    pub async fn delete_product(&self, id: i32) -> Result<(), ServiceError> {
        let result = ProductEntity::delete_by_id(id).exec(&*self.db_pool).await?;
        if result.rows_affected == 0 {
            return Err(ServiceError::not_found("Product", id));
        }
        info!(product_id = id, "Product deleted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn product_request() -> CreateProductRequest {
        CreateProductRequest {
            name: "Ceramic brake pads".into(),
            description: None,
            category_id: 1,
            price: dec!(49.99),
            stock_quantity: 10,
            supplier_id: 1,
            warranty_period: None,
        }
    }

    #[test]
    fn product_request_rules() {
        assert!(product_request().validate().is_ok());

        let mut free = product_request();
        free.price = Decimal::ZERO;
        assert!(free.validate().is_err());

        let mut oversold = product_request();
        oversold.stock_quantity = -1;
        assert!(oversold.validate().is_err());

        let mut no_warranty = product_request();
        no_warranty.warranty_period = Some(-6);
        assert!(no_warranty.validate().is_err());
    }

    #[test]
    fn supplier_phone_and_email_are_checked() {
        let request = CreateSupplierRequest {
            name: "Bosch".into(),
            contact_name: Some("Ana".into()),
            phone: "555-123-4567".into(),
            email: "not-an-email".into(),
            address: None,
        };
        let errors = request.validate().unwrap_err();
        let fields = errors.field_errors();
        assert!(fields.contains_key("phone"));
        assert!(fields.contains_key("email"));
    }
}
