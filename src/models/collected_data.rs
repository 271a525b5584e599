// Collected Data Models - specification fields extracted by the assistant

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Box shape rendered as a plain box (regular slotted container)
pub const STANDARD_BOX_TYPE: &str = "rsc";

// ============================================================================
// Dimensions
// ============================================================================

/// Box dimensions in centimetres
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Dimensions {
    pub width: f64,
    pub length: f64,
    pub height: f64,
}

/// Fallback used whenever an axis is unknown
pub const DEFAULT_DIMENSIONS: Dimensions = Dimensions {
    width: 10.0,
    length: 10.0,
    height: 10.0,
};

impl Default for Dimensions {
    fn default() -> Self {
        DEFAULT_DIMENSIONS
    }
}

/// Dimensions as sent by the assistant; any axis may be missing
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct PartialDimensions {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub length: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<f64>,
}

impl PartialDimensions {
    /// Fill missing axes from [`DEFAULT_DIMENSIONS`]
    pub fn normalize(&self) -> Dimensions {
        Dimensions {
            width: self.width.unwrap_or(DEFAULT_DIMENSIONS.width),
            length: self.length.unwrap_or(DEFAULT_DIMENSIONS.length),
            height: self.height.unwrap_or(DEFAULT_DIMENSIONS.height),
        }
    }
}

impl From<Dimensions> for PartialDimensions {
    fn from(d: Dimensions) -> Self {
        Self {
            width: Some(d.width),
            length: Some(d.length),
            height: Some(d.height),
        }
    }
}

// ============================================================================
// Collected Data
// ============================================================================

/// Sparse set of specification fields gathered over a conversation.
///
/// Known fields are typed; anything else the backend sends is kept in
/// `extra` so nothing is lost when the mapping is echoed back (e.g. to
/// checkout). The client never computes these values itself.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct CollectedData {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub product_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub box_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub material: Option<String>,
    /// Inner cushioning; a list of `{type, category}` objects, a single
    /// object, a bare string or `"skip"` depending on backend version
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub inner: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dimensions: Option<PartialDimensions>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quantity: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weight_kg: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub flute_type: Option<String>,
    /// Set by the backend when its strength check came back DANGER
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub strength_warning: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mood_tone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub has_logo: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub logo_positions: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub special_effects: Option<Vec<Value>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pricing: Option<Value>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl CollectedData {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Box shape, falling back to the standard slotted container
    pub fn box_type_or_default(&self) -> &str {
        self.box_type.as_deref().unwrap_or(STANDARD_BOX_TYPE)
    }

    /// Whether the backend flagged the current box as structurally unsafe
    pub fn has_strength_warning(&self) -> bool {
        self.strength_warning.unwrap_or(false)
    }

    /// Grand total from the pricing block, if the assistant has quoted yet
    pub fn grand_total(&self) -> Option<f64> {
        self.pricing
            .as_ref()
            .and_then(|p| p.get("grand_total"))
            .and_then(Value::as_f64)
    }
}
