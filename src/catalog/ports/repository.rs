//! Catalog port: product and order lookups backing the assistant.

use crate::catalog::domain::{Order, OrderId, Product, ProductId};
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Result type for catalog operations.
pub type CatalogResult<T> = Result<T, CatalogError>;

/// Read contract over the storefront's product and order data.
///
/// The backing store is swappable; callers never learn which one is behind
/// the trait. Lookups for absent rows return `None`, never an error.
#[async_trait]
pub trait Catalog: Send + Sync {
    /// Searches products by case-insensitive substring over name,
    /// description and category. Returns at most `limit` products; an empty
    /// result is an ordinary outcome.
    async fn find_products(&self, query: &str, limit: usize) -> CatalogResult<Vec<Product>>;

    /// Finds one product by identifier.
    async fn get_product(&self, product_id: &ProductId) -> CatalogResult<Option<Product>>;

    /// Finds one order, with its line items, by identifier.
    async fn get_order(&self, order_id: &OrderId) -> CatalogResult<Option<Order>>;

    /// Returns up to `limit` trending products, in catalog order.
    async fn trending_products(&self, limit: usize) -> CatalogResult<Vec<Product>>;
}

/// Errors returned by catalog implementations.
#[derive(Debug, Clone, Error)]
pub enum CatalogError {
    /// Persisted data could not be reconstructed into domain types.
    #[error("invalid persisted data: {0}")]
    InvalidPersistedData(Arc<dyn std::error::Error + Send + Sync>),

    /// Persistence-layer failure.
    #[error("persistence error: {0}")]
    Persistence(Arc<dyn std::error::Error + Send + Sync>),
}

impl CatalogError {
    /// Wraps a data-quality or deserialization error from persisted rows.
    pub fn invalid_persisted_data(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::InvalidPersistedData(Arc::new(err))
    }

    /// Wraps a persistence error.
    pub fn persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Persistence(Arc::new(err))
    }
}
