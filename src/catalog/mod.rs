//! Product and order catalog: the storefront data the assistant answers from.
//!
//! A thin bounded context next to `analytics`: domain types for products and
//! orders, one `Catalog` port, and interchangeable in-memory and
//! `PostgreSQL` adapters behind it.

pub mod adapters;
pub mod domain;
pub mod ports;

#[cfg(test)]
mod tests;
