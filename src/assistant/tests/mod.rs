//! Unit tests for the assistant subsystem.
