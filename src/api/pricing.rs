// Build a pricing request from the data the assistant has collected

use serde_json::Value;
use thiserror::Error;

use super::types::{Coating, PricingDimensions, PricingRequest, Stamping};
use crate::models::CollectedData;

/// Smallest production run the backend will price
pub const MIN_QUANTITY: u32 = 500;

const COATING_CATEGORIES: [&str; 4] = ["gloss", "matte", "moisture", "food_grade"];
const STAMPING_TYPES: [&str; 4] = ["emboss", "foil_regular", "foil_detailed", "foil_emboss"];

#[derive(Debug, Clone, PartialEq, Error)]
pub enum PricingRequestError {
    #[error("Box dimensions have not been collected yet")]
    MissingDimensions,

    #[error("Dimension {0} must be greater than zero")]
    InvalidDimension(&'static str),

    #[error("Quantity has not been collected yet")]
    MissingQuantity,

    #[error("Quantity {quantity} is below the minimum order of {min}")]
    QuantityBelowMinimum { quantity: u32, min: u32 },

    #[error("Box type '{0}' cannot be priced (expected rsc or die_cut)")]
    UnsupportedBoxType(String),
}

/// Map collected data onto the pricing endpoint's request shape.
///
/// Cushion inners become the single `inner` field; moisture and food-grade
/// inners are priced as coatings ahead of any special-effect coatings.
pub fn pricing_request_from(data: &CollectedData) -> Result<PricingRequest, PricingRequestError> {
    let dims = data
        .dimensions
        .as_ref()
        .ok_or(PricingRequestError::MissingDimensions)?;
    let dimensions = PricingDimensions {
        width: positive_axis("width", dims.width)?,
        length: positive_axis("length", dims.length)?,
        height: positive_axis("height", dims.height)?,
    };

    let quantity = data.quantity.ok_or(PricingRequestError::MissingQuantity)?;
    if quantity < MIN_QUANTITY {
        return Err(PricingRequestError::QuantityBelowMinimum {
            quantity,
            min: MIN_QUANTITY,
        });
    }

    let box_type = data.box_type_or_default().to_string();
    if box_type != "rsc" && box_type != "die_cut" {
        return Err(PricingRequestError::UnsupportedBoxType(box_type));
    }

    let material = data
        .material
        .clone()
        .unwrap_or_else(|| default_material(&box_type, data.product_type.as_deref()).to_string());

    let mut inner = None;
    let mut coatings = Vec::new();
    for item in inner_items(data.inner.as_ref()) {
        match item.category.as_str() {
            "cushion" => {
                if inner.is_none() {
                    inner = Some(item.kind);
                }
            }
            "moisture" | "food_grade" => coatings.push(item),
            _ => {}
        }
    }

    let mut stampings = Vec::new();
    for effect in data.special_effects.iter().flatten() {
        let kind = effect.get("type").and_then(Value::as_str).unwrap_or_default();
        let category = effect
            .get("category")
            .and_then(Value::as_str)
            .unwrap_or_default();

        if COATING_CATEGORIES.contains(&category) {
            coatings.push(Coating {
                kind: kind.to_string(),
                category: category.to_string(),
            });
        } else if category == "stamping" || STAMPING_TYPES.contains(&kind) {
            stampings.push(Stamping {
                kind: kind.to_string(),
                has_block: effect
                    .get("has_block")
                    .and_then(Value::as_bool)
                    .unwrap_or(false),
            });
        }
    }

    Ok(PricingRequest {
        dimensions,
        box_type,
        material,
        quantity,
        inner,
        coatings: (!coatings.is_empty()).then_some(coatings),
        stampings: (!stampings.is_empty()).then_some(stampings),
    })
}

fn positive_axis(name: &'static str, value: Option<f64>) -> Result<f64, PricingRequestError> {
    match value {
        Some(v) if v.is_finite() && v > 0.0 => Ok(v),
        Some(_) => Err(PricingRequestError::InvalidDimension(name)),
        None => Err(PricingRequestError::MissingDimensions),
    }
}

fn default_material(box_type: &str, product_type: Option<&str>) -> &'static str {
    match (box_type, product_type) {
        ("die_cut", Some("food_grade")) | ("die_cut", Some("cosmetic")) => "art_300gsm",
        _ => "corrugated_2layer",
    }
}

/// Normalize the inner field across backend versions: list of objects,
/// single object, bare string (assumed cushion) or `"skip"`
fn inner_items(inner: Option<&Value>) -> Vec<Coating> {
    let to_item = |v: &Value| -> Option<Coating> {
        Some(Coating {
            kind: v.get("type")?.as_str()?.to_string(),
            category: v
                .get("category")
                .and_then(Value::as_str)
                .unwrap_or("cushion")
                .to_string(),
        })
    };

    match inner {
        Some(Value::Array(items)) => items.iter().filter_map(to_item).collect(),
        Some(obj @ Value::Object(_)) => to_item(obj).into_iter().collect(),
        Some(Value::String(s)) if s != "skip" && !s.is_empty() => vec![Coating {
            kind: s.clone(),
            category: "cushion".to_string(),
        }],
        _ => Vec::new(),
    }
}
