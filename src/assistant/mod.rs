//! Chat orchestration: intent-driven replies over the language-model and
//! catalog collaborators, with every exchange recorded as analytics
//! telemetry.

pub mod domain;
pub mod ports;
pub mod services;

#[cfg(test)]
mod tests;
