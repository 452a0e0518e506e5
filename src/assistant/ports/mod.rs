//! Assistant port contracts.

mod language_model;

pub use language_model::{LanguageModel, LanguageModelError, LanguageModelResult};
