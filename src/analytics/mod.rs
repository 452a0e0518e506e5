//! Conversation telemetry and analytics rollups for Vitrine.
//!
//! This module owns the append-only record of chat sessions and interactions,
//! the idempotent period-rollup aggregator that derives [`domain::PeriodSummary`]
//! rows from it, and the dashboard query service that composes rolling
//! multi-day reports. The module follows hexagonal architecture:
//!
//! - Domain types in [`domain`]
//! - Port contracts in [`ports`]
//! - Adapter implementations in [`adapters`]
//! - Orchestration services in [`services`]

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod services;

#[cfg(test)]
mod tests;
