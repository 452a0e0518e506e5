//! Unit tests for the catalog subsystem.
