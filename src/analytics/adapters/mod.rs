//! Adapter implementations of the analytics ports.

pub mod memory;
pub mod postgres;
