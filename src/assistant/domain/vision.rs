//! Structured product descriptors extracted from images.

use serde::{Deserialize, Serialize};

/// What the language model saw in a product image.
///
/// Deserialized from the model's JSON output; list fields default to empty
/// when the model omits them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageAnalysis {
    /// Name or type of the pictured product.
    pub product_name: String,
    /// Free-text description.
    #[serde(default)]
    pub description: String,
    /// Key features.
    #[serde(default)]
    pub features: Vec<String>,
    /// Estimated price range (for example `"$50 - $80"`).
    #[serde(default)]
    pub price_range: String,
    /// Product category.
    #[serde(default)]
    pub category: String,
    /// Recommended uses.
    #[serde(default)]
    pub recommended_uses: Vec<String>,
}
