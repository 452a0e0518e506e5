//! `PostgreSQL` implementation of the [`Catalog`] port.

use super::{
    models::{OrderItemRow, OrderRow, ProductRow, row_to_order, row_to_product},
    schema::{order_items, orders, products},
};
use crate::catalog::{
    domain::{Order, OrderId, Product, ProductId},
    ports::{Catalog, CatalogError, CatalogResult},
};
use crate::config::PgPool;
use async_trait::async_trait;
use diesel::pg::PgConnection;
use diesel::prelude::*;

/// `PostgreSQL`-backed catalog.
#[derive(Debug, Clone)]
pub struct PostgresCatalog {
    pool: PgPool,
}

impl PostgresCatalog {
    /// Creates a new catalog from a `PostgreSQL` connection pool.
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn run_blocking<F, T>(&self, f: F) -> CatalogResult<T>
    where
        F: FnOnce(&mut PgConnection) -> CatalogResult<T> + Send + 'static,
        T: Send + 'static,
    {
        let pool = self.pool.clone();
        tokio::task::spawn_blocking(move || {
            let mut connection = pool.get().map_err(CatalogError::persistence)?;
            f(&mut connection)
        })
        .await
        .map_err(CatalogError::persistence)?
    }
}

#[async_trait]
impl Catalog for PostgresCatalog {
    async fn find_products(&self, query: &str, limit: usize) -> CatalogResult<Vec<Product>> {
        let pattern = format!("%{query}%");
        let limit = i64::try_from(limit).unwrap_or(i64::MAX);

        self.run_blocking(move |connection| {
            let rows = products::table
                .filter(
                    products::name
                        .ilike(&pattern)
                        .or(products::description.ilike(&pattern))
                        .or(products::category.ilike(&pattern)),
                )
                .limit(limit)
                .select(ProductRow::as_select())
                .load::<ProductRow>(connection)
                .map_err(CatalogError::persistence)?;
            Ok(rows.into_iter().map(row_to_product).collect())
        })
        .await
    }

    async fn get_product(&self, product_id: &ProductId) -> CatalogResult<Option<Product>> {
        let id = product_id.as_str().to_owned();
        self.run_blocking(move |connection| {
            let row = products::table
                .filter(products::product_id.eq(&id))
                .select(ProductRow::as_select())
                .first::<ProductRow>(connection)
                .optional()
                .map_err(CatalogError::persistence)?;
            Ok(row.map(row_to_product))
        })
        .await
    }

    async fn get_order(&self, order_id: &OrderId) -> CatalogResult<Option<Order>> {
        let id = order_id.as_str().to_owned();
        self.run_blocking(move |connection| {
            let Some(row) = orders::table
                .filter(orders::order_id.eq(&id))
                .select(OrderRow::as_select())
                .first::<OrderRow>(connection)
                .optional()
                .map_err(CatalogError::persistence)?
            else {
                return Ok(None);
            };

            let items = order_items::table
                .filter(order_items::order_id.eq(&id))
                .order(order_items::id.asc())
                .select(OrderItemRow::as_select())
                .load::<OrderItemRow>(connection)
                .map_err(CatalogError::persistence)?;
            row_to_order(row, items).map(Some)
        })
        .await
    }

    async fn trending_products(&self, limit: usize) -> CatalogResult<Vec<Product>> {
        let limit = i64::try_from(limit).unwrap_or(i64::MAX);
        self.run_blocking(move |connection| {
            // No popularity signal is tracked yet; catalog order stands in.
            let rows = products::table
                .order(products::id.asc())
                .limit(limit)
                .select(ProductRow::as_select())
                .load::<ProductRow>(connection)
                .map_err(CatalogError::persistence)?;
            Ok(rows.into_iter().map(row_to_product).collect())
        })
        .await
    }
}
