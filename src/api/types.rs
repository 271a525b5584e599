// Request/response payloads of the quotation backend

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::models::{CollectedData, FluteType, FormData, MessageRole};

// ============================================================================
// Chat
// ============================================================================

#[derive(Debug, Clone, Serialize)]
pub struct SendMessageRequest<'a> {
    pub message: &'a str,
    /// `None` asks the backend to open a new session
    pub session_id: Option<&'a str>,
}

/// Authoritative state returned after every chat message
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatReply {
    pub response: String,
    pub session_id: String,
    pub current_step: u8,
    #[serde(default)]
    pub collected_data: CollectedData,
    #[serde(default)]
    pub is_waiting_confirmation: bool,
    #[serde(default)]
    pub is_complete: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionInfo {
    pub session_id: String,
    pub current_step: u8,
    #[serde(default)]
    pub collected_data: CollectedData,
    #[serde(default)]
    pub message_count: usize,
    #[serde(default)]
    pub is_complete: bool,
    #[serde(default)]
    pub created_at: String,
    #[serde(default)]
    pub last_activity: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub role: MessageRole,
    pub content: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConversationHistory {
    pub session_id: String,
    #[serde(default)]
    pub message_count: usize,
    #[serde(default)]
    pub messages: Vec<HistoryEntry>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResetResponse {
    pub message: String,
    pub session_id: String,
}

// ============================================================================
// Strength analysis
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AnalyzeRequest {
    pub length: f64,
    pub width: f64,
    pub height: f64,
    pub weight: f64,
    pub flute_type: FluteType,
}

impl From<&FormData> for AnalyzeRequest {
    fn from(form: &FormData) -> Self {
        Self {
            length: form.length,
            width: form.width,
            height: form.height,
            weight: form.weight,
            flute_type: form.flute_type,
        }
    }
}

// ============================================================================
// Pricing
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PricingDimensions {
    pub width: f64,
    pub length: f64,
    pub height: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Coating {
    #[serde(rename = "type")]
    pub kind: String,
    pub category: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Stamping {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub has_block: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PricingRequest {
    pub dimensions: PricingDimensions,
    pub box_type: String,
    pub material: String,
    pub quantity: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub inner: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub coatings: Option<Vec<Coating>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stampings: Option<Vec<Stamping>>,
}

/// Price breakdown in THB
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PricingResponse {
    pub box_base: f64,
    #[serde(default)]
    pub inner: Option<f64>,
    #[serde(default)]
    pub coatings: Option<f64>,
    #[serde(default)]
    pub stampings: Option<f64>,
    pub subtotal: f64,
    pub vat: f64,
    pub grand_total: f64,
    pub price_per_box: f64,
    #[serde(default)]
    pub breakdown: Value,
}

// ============================================================================
// Health
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HealthStatus {
    pub status: String,
    #[serde(default)]
    pub timestamp: Option<f64>,
}
