//! Vitrine: conversational storefront assistant with an analytics core.
//!
//! This crate records shopper conversations, derives time-bucketed analytics
//! rollups from them, and orchestrates chat replies over an external
//! language-model collaborator and a product catalog.
//!
//! # Architecture
//!
//! Vitrine follows hexagonal architecture principles:
//!
//! - **Domain**: Pure business logic with no infrastructure dependencies
//! - **Ports**: Abstract trait interfaces for external interactions
//! - **Adapters**: Concrete implementations of ports (database, in-memory)
//!
//! # Modules
//!
//! - [`analytics`]: Session/interaction event store, rollup aggregation, and
//!   dashboard reporting
//! - [`catalog`]: Product and order catalog collaborator
//! - [`assistant`]: Chat orchestration over the language-model collaborator

pub mod analytics;
pub mod assistant;
pub mod catalog;
pub mod config;

#[cfg(test)]
pub(crate) mod testing;
