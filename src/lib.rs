// Clippy allows for reasonable defaults
#![allow(clippy::new_without_default)] // Default not always appropriate for stateful types
#![allow(clippy::derivable_impls)] // Explicit Default impls can be clearer
#![allow(clippy::field_reassign_with_default)] // Builder pattern is clearer

// Module declarations
pub mod api;
pub mod config;
pub mod models;
pub mod projection;
pub mod session;
pub mod utils;

pub use api::{ApiClient, ApiError, ChatBackend};
pub use config::{resolve_config, StudioConfig};
pub use projection::{RenderState, StudioProjection, VisualMode};
pub use session::{ChatState, SendOutcome, SessionSynchronizer, SyncEvent};
