//! In-memory implementation of the [`Catalog`] port.
//!
//! Doubles as the document-store stand-in for deployments without a
//! relational database and as the unit-test double.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use crate::catalog::{
    domain::{Order, OrderId, Product, ProductId},
    ports::{Catalog, CatalogError, CatalogResult},
};

/// Thread-safe in-memory catalog.
#[derive(Debug, Clone, Default)]
pub struct InMemoryCatalog {
    state: Arc<RwLock<CatalogState>>,
}

#[derive(Debug, Default)]
struct CatalogState {
    // Vec keeps catalog order; trending returns the head of it.
    products: Vec<Product>,
    orders: HashMap<OrderId, Order>,
}

impl InMemoryCatalog {
    /// Creates an empty catalog.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a catalog pre-loaded with products, in the given order.
    #[must_use]
    pub fn with_products(products: Vec<Product>) -> Self {
        let catalog = Self::new();
        if let Ok(mut state) = catalog.state.write() {
            state.products = products;
        }
        catalog
    }

    /// Adds one product to the end of the catalog.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::Persistence`] when the internal lock is
    /// poisoned.
    pub fn add_product(&self, product: Product) -> CatalogResult<()> {
        let mut state = self.state.write().map_err(lock_poisoned)?;
        state.products.push(product);
        Ok(())
    }

    /// Adds one order.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::Persistence`] when the internal lock is
    /// poisoned.
    pub fn add_order(&self, order: Order) -> CatalogResult<()> {
        let mut state = self.state.write().map_err(lock_poisoned)?;
        state.orders.insert(order.order_id.clone(), order);
        Ok(())
    }
}

fn lock_poisoned(err: impl std::fmt::Display) -> CatalogError {
    CatalogError::persistence(std::io::Error::other(err.to_string()))
}

#[async_trait]
impl Catalog for InMemoryCatalog {
    async fn find_products(&self, query: &str, limit: usize) -> CatalogResult<Vec<Product>> {
        let state = self.state.read().map_err(lock_poisoned)?;
        let query_lower = query.to_lowercase();
        Ok(state
            .products
            .iter()
            .filter(|p| p.matches(&query_lower))
            .take(limit)
            .cloned()
            .collect())
    }

    async fn get_product(&self, product_id: &ProductId) -> CatalogResult<Option<Product>> {
        let state = self.state.read().map_err(lock_poisoned)?;
        Ok(state
            .products
            .iter()
            .find(|p| &p.product_id == product_id)
            .cloned())
    }

    async fn get_order(&self, order_id: &OrderId) -> CatalogResult<Option<Order>> {
        let state = self.state.read().map_err(lock_poisoned)?;
        Ok(state.orders.get(order_id).cloned())
    }

    async fn trending_products(&self, limit: usize) -> CatalogResult<Vec<Product>> {
        let state = self.state.read().map_err(lock_poisoned)?;
        Ok(state.products.iter().take(limit).cloned().collect())
    }
}
