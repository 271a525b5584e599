// Studio Models - manual form values, flute types and strength analysis

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::collected_data::Dimensions;

// ============================================================================
// Flute Types
// ============================================================================

/// Corrugated board flute profile
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FluteType {
    A,
    B,
    C,
    E,
    BC,
}

impl FluteType {
    pub fn as_str(&self) -> &'static str {
        match self {
            FluteType::A => "A",
            FluteType::B => "B",
            FluteType::C => "C",
            FluteType::E => "E",
            FluteType::BC => "BC",
        }
    }
}

impl Default for FluteType {
    fn default() -> Self {
        FluteType::C
    }
}

impl std::fmt::Display for FluteType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for FluteType {
    type Err = FormValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "A" => Ok(FluteType::A),
            "B" => Ok(FluteType::B),
            "C" => Ok(FluteType::C),
            "E" => Ok(FluteType::E),
            "BC" => Ok(FluteType::BC),
            _ => Err(FormValidationError::UnknownFlute(s.to_string())),
        }
    }
}

// ============================================================================
// Manual Form
// ============================================================================

/// Editable fields of the studio form
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormField {
    Length,
    Width,
    Height,
    Weight,
}

impl FormField {
    pub fn as_str(&self) -> &'static str {
        match self {
            FormField::Length => "length",
            FormField::Width => "width",
            FormField::Height => "height",
            FormField::Weight => "weight",
        }
    }

    /// Accepted range for manual input; `None` on the upper bound means unbounded
    pub fn range(&self) -> (f64, Option<f64>) {
        match self {
            FormField::Length => (10.0, Some(60.0)),
            FormField::Width => (10.0, Some(60.0)),
            FormField::Height => (5.0, Some(50.0)),
            FormField::Weight => (0.0, None),
        }
    }
}

impl std::fmt::Display for FormField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for FormField {
    type Err = FormValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "length" | "l" => Ok(FormField::Length),
            "width" | "w" => Ok(FormField::Width),
            "height" | "h" => Ok(FormField::Height),
            "weight" | "kg" => Ok(FormField::Weight),
            _ => Err(FormValidationError::UnknownField(s.to_string())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum FormValidationError {
    #[error("{field} must be a finite number")]
    NotFinite { field: FormField },

    #[error("{field} = {value} is below the minimum of {min}")]
    BelowMinimum { field: FormField, value: f64, min: f64 },

    #[error("{field} = {value} is above the maximum of {max}")]
    AboveMaximum { field: FormField, value: f64, max: f64 },

    #[error("{field} must be greater than zero")]
    NotPositive { field: FormField },

    #[error("Unknown flute type: '{0}'. Expected A, B, C, E or BC")]
    UnknownFlute(String),

    #[error("Unknown form field: '{0}'")]
    UnknownField(String),
}

/// Validate a manual edit against the field's accepted range
pub fn validate_field(field: FormField, value: f64) -> Result<f64, FormValidationError> {
    if !value.is_finite() {
        return Err(FormValidationError::NotFinite { field });
    }
    let (min, max) = field.range();
    if value < min {
        return Err(FormValidationError::BelowMinimum { field, value, min });
    }
    if let Some(max) = max {
        if value > max {
            return Err(FormValidationError::AboveMaximum { field, value, max });
        }
    }
    Ok(value)
}

/// Values of the manual dimension/strength form
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FormData {
    pub length: f64,
    pub width: f64,
    pub height: f64,
    /// Product weight in kg
    pub weight: f64,
    pub flute_type: FluteType,
}

impl Default for FormData {
    fn default() -> Self {
        Self {
            length: 20.0,
            width: 15.0,
            height: 10.0,
            weight: 5.0,
            flute_type: FluteType::C,
        }
    }
}

impl FormData {
    pub fn dimensions(&self) -> Dimensions {
        Dimensions {
            width: self.width,
            length: self.length,
            height: self.height,
        }
    }

    pub fn get(&self, field: FormField) -> f64 {
        match field {
            FormField::Length => self.length,
            FormField::Width => self.width,
            FormField::Height => self.height,
            FormField::Weight => self.weight,
        }
    }

    pub fn set(&mut self, field: FormField, value: f64) {
        match field {
            FormField::Length => self.length = value,
            FormField::Width => self.width = value,
            FormField::Height => self.height = value,
            FormField::Weight => self.weight = value,
        }
    }

    /// Values the assistant supplied may sit outside the slider ranges, so a
    /// strength check only needs positive dimensions and a non-negative weight.
    pub fn validate_for_analysis(&self) -> Result<(), FormValidationError> {
        for field in [FormField::Length, FormField::Width, FormField::Height] {
            let value = self.get(field);
            if !value.is_finite() {
                return Err(FormValidationError::NotFinite { field });
            }
            if value <= 0.0 {
                return Err(FormValidationError::NotPositive { field });
            }
        }
        if !self.weight.is_finite() {
            return Err(FormValidationError::NotFinite {
                field: FormField::Weight,
            });
        }
        if self.weight < 0.0 {
            return Err(FormValidationError::BelowMinimum {
                field: FormField::Weight,
                value: self.weight,
                min: 0.0,
            });
        }
        Ok(())
    }
}

// ============================================================================
// Strength Analysis
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum AnalysisStatus {
    Safe,
    Danger,
}

/// Box compression analysis returned by the backend
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StrengthAnalysis {
    pub status: AnalysisStatus,
    pub safety_score: u8,
    pub max_load_kg: f64,
    pub recommendation: String,
    pub flute_type: String,
    pub bct_kgf: f64,
    pub safety_factor: f64,
}

impl StrengthAnalysis {
    pub fn is_danger(&self) -> bool {
        self.status == AnalysisStatus::Danger
    }
}

// ============================================================================
// Box Shapes
// ============================================================================

/// Display label for a box shape identifier
pub fn box_type_label(box_type: &str) -> &str {
    match box_type {
        "rsc" => "RSC",
        "die_cut" => "Die-cut",
        "tuck_end" => "Tuck end",
        "ear_lock" => "Ear lock",
        other => other,
    }
}
