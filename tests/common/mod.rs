#![allow(dead_code)]

use std::sync::atomic::{AtomicU32, Ordering};

use autoparts_store::{
    config::AppConfig,
    entities::{CategoryModel, CustomerModel, OrderModel, PaymentMethod, ProductModel, SupplierModel},
    services::{
        catalog::{CreateCategoryRequest, CreateProductRequest, CreateSupplierRequest},
        customers::CreateCustomerRequest,
        orders::{AddLineItemRequest, CreateOrderRequest},
    },
    AppState,
};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use tempfile::TempDir;

static NEXT_ID: AtomicU32 = AtomicU32::new(1);

fn unique() -> u32 {
    NEXT_ID.fetch_add(1, Ordering::Relaxed)
}

/// Application state backed by a fresh, fully migrated in-memory SQLite database.
///
/// The pool is pinned to a single connection: every connection to
/// `sqlite::memory:` would otherwise open its own empty database.
pub struct TestDb {
    pub state: AppState,
    // keeps a file-backed database alive for the lifetime of the test
    _dir: Option<TempDir>,
}

pub struct CatalogFixture {
    pub category: CategoryModel,
    pub supplier: SupplierModel,
    pub product: ProductModel,
}

impl TestDb {
    pub async fn new() -> Self {
        let mut cfg = AppConfig::new("sqlite::memory:".to_string(), "test".to_string());
        cfg.auto_migrate = true;
        cfg.db_max_connections = 1;
        cfg.db_min_connections = 1;
        cfg.db_idle_timeout_secs = 3600;

        let state = AppState::connect(cfg)
            .await
            .expect("failed to create test database");

        Self { state, _dir: None }
    }

    /// Migrated SQLite database in a temporary file, shared by a pool of
    /// `max_connections` connections that contend for the write lock.
    pub async fn file_backed(max_connections: u32) -> Self {
        let dir = TempDir::new().expect("temp dir");
        let url = format!(
            "sqlite://{}?mode=rwc",
            dir.path().join("autoparts.db").display()
        );

        let mut cfg = AppConfig::new(url, "test".to_string());
        cfg.auto_migrate = true;
        cfg.db_max_connections = max_connections;
        cfg.db_min_connections = 1;
        cfg.db_acquire_timeout_secs = 30;

        let state = AppState::connect(cfg)
            .await
            .expect("failed to create file-backed test database");

        Self {
            state,
            _dir: Some(dir),
        }
    }

    pub async fn seed_catalog(&self) -> CatalogFixture {
        let n = unique();
        let catalog = self.state.catalog_service();

        let category = catalog
            .create_category(CreateCategoryRequest {
                name: format!("Brakes {n}"),
                description: Some("Pads, rotors and calipers".into()),
            })
            .await
            .expect("seed category");

        let supplier = catalog
            .create_supplier(CreateSupplierRequest {
                name: format!("Parts Co {n}"),
                contact_name: Some("Dana Reyes".into()),
                phone: "5551234567".into(),
                email: format!("sales{n}@partsco.example"),
                address: Some("12 Industrial Way".into()),
            })
            .await
            .expect("seed supplier");

        let product = self
            .seed_product(category.id, supplier.id, dec!(49.99))
            .await;

        CatalogFixture {
            category,
            supplier,
            product,
        }
    }

    pub async fn seed_product(&self, category_id: i32, supplier_id: i32, price: Decimal) -> ProductModel {
        let n = unique();
        self.state
            .catalog_service()
            .create_product(CreateProductRequest {
                name: format!("Ceramic brake pads #{n}"),
                description: None,
                category_id,
                price,
                stock_quantity: 25,
                supplier_id,
                warranty_period: None,
            })
            .await
            .expect("seed product")
    }

    pub async fn seed_customer(&self) -> CustomerModel {
        let n = unique();
        self.state
            .customer_service()
            .create_customer(CreateCustomerRequest {
                first_name: "Jordan".into(),
                last_name: format!("Lee{n}"),
                email: format!("jordan{n}@example.com"),
                phone: "5559876543".into(),
                address: None,
            })
            .await
            .expect("seed customer")
    }

    pub async fn seed_order(&self, customer_id: i32, total_amount: Decimal) -> OrderModel {
        self.state
            .order_service()
            .create_order(CreateOrderRequest {
                customer_id,
                order_date: None,
                total_amount,
                payment_method: PaymentMethod::CreditCard,
            })
            .await
            .expect("seed order")
    }

    pub async fn seed_line_item(
        &self,
        order_id: i32,
        product_id: i32,
        subtotal: Decimal,
        discount_percentage: Decimal,
    ) {
        self.state
            .order_service()
            .add_line_item(AddLineItemRequest {
                order_id,
                product_id,
                quantity: 1,
                subtotal,
                discount_percentage: Some(discount_percentage),
            })
            .await
            .expect("seed line item");
    }
}
