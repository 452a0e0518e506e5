//! Product records offered by the storefront.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Opaque product identifier, minted by whatever loaded the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProductId(String);

impl ProductId {
    /// Wraps a raw product identifier.
    #[must_use]
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    /// Returns the identifier as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ProductId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// One catalog product.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    /// Product identifier.
    pub product_id: ProductId,
    /// Display name.
    pub name: String,
    /// Free-text description.
    pub description: String,
    /// Unit price in the storefront currency.
    pub price: f64,
    /// Category label (for example `"Electronics"`).
    pub category: String,
    /// Image location, when one has been uploaded.
    pub image_url: Option<String>,
    /// Whether the product is currently available.
    pub in_stock: bool,
}

impl Product {
    /// Returns `true` when the lowercased query occurs in the name,
    /// description or category.
    #[must_use]
    pub fn matches(&self, query_lower: &str) -> bool {
        self.name.to_lowercase().contains(query_lower)
            || self.description.to_lowercase().contains(query_lower)
            || self.category.to_lowercase().contains(query_lower)
    }

    /// Formats the price for display (for example `"$24.99"`).
    #[must_use]
    pub fn display_price(&self) -> String {
        format!("${:.2}", self.price)
    }
}
