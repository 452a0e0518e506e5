//! Catalog adapters: interchangeable implementations of the `Catalog` port.

pub mod memory;
pub mod postgres;
