//! Catalog domain validation errors.

use thiserror::Error;

/// Validation failures for catalog domain values.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CatalogDomainError {
    /// An order status label outside the known set.
    #[error("unknown order status: {0}")]
    UnknownOrderStatus(String),
}
