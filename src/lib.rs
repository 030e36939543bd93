//! Auto-parts shop data layer
//!
//! Schema migrations, sea-orm entities and services for the shop's catalog,
//! customers, orders and line items, including the locked payment routine
//! and the discounted-total aggregate.
#![forbid(unsafe_code)]
#![deny(rust_2018_idioms)]
#![allow(elided_lifetimes_in_paths)]
#![warn(clippy::all, clippy::perf, clippy::dbg_macro)]

pub mod config;
pub mod db;
pub mod entities;
pub mod errors;
pub mod migrator;
pub mod services;

use sea_orm::DatabaseConnection;
use std::sync::Arc;
use tracing::info;

use crate::errors::AppError;
use crate::services::{
    CatalogService, CustomerService, OrderService, PaymentService, PricingService,
};

// App state definition
#[derive(Clone)]
pub struct AppState {
    pub db: Arc<DatabaseConnection>,
    pub config: config::AppConfig,
}

impl AppState {
    /// Opens the pool described by `config`, migrating first when
    /// `auto_migrate` is set.
    pub async fn connect(config: config::AppConfig) -> Result<Self, AppError> {
        let pool = db::establish_connection_from_app_config(&config).await?;

        if config.auto_migrate {
            db::run_migrations(&pool).await?;
        } else {
            info!("auto_migrate disabled; assuming schema is current");
        }

        Ok(Self {
            db: Arc::new(pool),
            config,
        })
    }

    pub fn catalog_service(&self) -> CatalogService {
        CatalogService::new(self.db.clone())
    }

    pub fn customer_service(&self) -> CustomerService {
        CustomerService::new(self.db.clone())
    }

    pub fn order_service(&self) -> OrderService {
        OrderService::new(self.db.clone())
    }

    pub fn payment_service(&self) -> PaymentService {
        PaymentService::new(self.db.clone())
    }

    pub fn pricing_service(&self) -> PricingService {
        PricingService::new(self.db.clone())
    }
}
