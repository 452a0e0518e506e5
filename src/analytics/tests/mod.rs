//! Unit tests for the analytics subsystem.
//!
//! Tests are organized into modules by functionality:
//! - `domain_tests`: Value types, windows, session lifecycle
//! - `recorder_tests`: Idempotent session tracking and interaction recording
//! - `aggregator_tests`: Period rollup computation
//! - `dashboard_tests`: Multi-day report composition and backfill

mod helpers;

mod aggregator_tests;
mod domain_tests;
mod recorder_tests;
