// Pure merge of assistant-collected values into the manual form

use crate::models::{CollectedData, Dimensions, FluteType, FormData};

/// Overlay collected values onto `form`.
///
/// Only fields present in `collected` are written: each dimension axis,
/// `weight_kg` as weight and `flute_type`. Returns `None` when the result
/// equals `form`, so callers can skip the transition entirely.
pub fn merge_collected_into_form(form: &FormData, collected: &CollectedData) -> Option<FormData> {
    let mut merged = *form;

    if let Some(dimensions) = &collected.dimensions {
        if let Some(length) = dimensions.length {
            merged.length = length;
        }
        if let Some(width) = dimensions.width {
            merged.width = width;
        }
        if let Some(height) = dimensions.height {
            merged.height = height;
        }
    }

    if let Some(weight) = collected.weight_kg {
        merged.weight = weight;
    }

    if let Some(raw) = &collected.flute_type {
        match raw.parse::<FluteType>() {
            Ok(flute) => merged.flute_type = flute,
            Err(e) => log::debug!("Ignoring collected flute type: {}", e),
        }
    }

    (merged != *form).then_some(merged)
}

/// Dimensions to render: the assistant's once it has sent any, otherwise the form's
pub fn display_dimensions(
    has_chatbot_dimensions: bool,
    chatbot_dimensions: Dimensions,
    form: &FormData,
) -> Dimensions {
    if has_chatbot_dimensions {
        chatbot_dimensions
    } else {
        form.dimensions()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{PartialDimensions, DEFAULT_DIMENSIONS};

    #[test]
    fn test_empty_collected_is_no_transition() {
        let form = FormData::default();
        assert!(merge_collected_into_form(&form, &CollectedData::default()).is_none());
    }

    #[test]
    fn test_merge_overwrites_present_fields_only() {
        let form = FormData::default();
        let collected = CollectedData {
            dimensions: Some(PartialDimensions {
                width: Some(30.0),
                length: None,
                height: Some(12.0),
            }),
            weight_kg: Some(8.5),
            flute_type: Some("bc".to_string()),
            ..CollectedData::default()
        };

        let merged = merge_collected_into_form(&form, &collected).unwrap();
        assert_eq!(merged.length, form.length);
        assert_eq!(merged.width, 30.0);
        assert_eq!(merged.height, 12.0);
        assert_eq!(merged.weight, 8.5);
        assert_eq!(merged.flute_type, FluteType::BC);
    }

    #[test]
    fn test_same_values_are_no_transition() {
        let form = FormData::default();
        let collected = CollectedData {
            weight_kg: Some(form.weight),
            flute_type: Some("C".to_string()),
            ..CollectedData::default()
        };
        assert!(merge_collected_into_form(&form, &collected).is_none());
    }

    #[test]
    fn test_unknown_flute_is_ignored() {
        let collected = CollectedData {
            flute_type: Some("Z".to_string()),
            ..CollectedData::default()
        };
        assert!(merge_collected_into_form(&FormData::default(), &collected).is_none());
    }

    #[test]
    fn test_display_dimensions_precedence() {
        let form = FormData::default();
        assert_eq!(
            display_dimensions(false, DEFAULT_DIMENSIONS, &form),
            form.dimensions()
        );

        let chatbot = Dimensions {
            width: 20.0,
            length: 30.0,
            height: 10.0,
        };
        assert_eq!(display_dimensions(true, chatbot, &form), chatbot);
    }
}
