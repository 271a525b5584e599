// Visual mode of the 3D box preview

use serde::{Deserialize, Serialize};

use crate::models::STANDARD_BOX_TYPE;

/// How the preview renders the box
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VisualMode {
    /// Procedural box with a flat colour
    Plain,
    /// Procedural box with the uploaded design as its texture
    Textured,
    /// Warning colouring after a failed strength check
    Hazard,
    /// Pre-built geometry for a non-standard shape
    AlternateModel,
}

impl VisualMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            VisualMode::Plain => "plain",
            VisualMode::Textured => "textured",
            VisualMode::Hazard => "hazard",
            VisualMode::AlternateModel => "alternate_model",
        }
    }
}

impl std::fmt::Display for VisualMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Pick exactly one mode. Hazard beats texture, texture beats the alternate model.
pub fn select_visual_mode(has_image: bool, is_hazard: bool, is_nonstandard_shape: bool) -> VisualMode {
    if is_hazard {
        VisualMode::Hazard
    } else if has_image {
        VisualMode::Textured
    } else if is_nonstandard_shape {
        VisualMode::AlternateModel
    } else {
        VisualMode::Plain
    }
}

pub fn is_nonstandard_shape(box_type: &str) -> bool {
    box_type != STANDARD_BOX_TYPE
}

/// Asset path of the pre-built geometry for a shape
pub fn model_path(box_type: &str) -> String {
    format!("/models/{}.glb", box_type)
}
