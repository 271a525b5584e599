// Studio consumer state: manual form, preview inputs and last strength check

use serde::Serialize;

use super::merge::{display_dimensions, merge_collected_into_form};
use super::visual::{is_nonstandard_shape, model_path, select_visual_mode, VisualMode};
use crate::api::AnalyzeRequest;
use crate::models::{
    box_type_label, validate_field, Dimensions, FluteType, FormData, FormField,
    FormValidationError, StrengthAnalysis, DEFAULT_DIMENSIONS, STANDARD_BOX_TYPE,
};
use crate::session::ChatState;

/// Everything the preview needs for one frame
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderState {
    pub dimensions: Dimensions,
    pub mode: VisualMode,
    /// Set only in [`VisualMode::AlternateModel`]
    pub model_path: Option<String>,
    pub shape_label: String,
}

/// Consumer-side projection of a conversation onto the studio
#[derive(Debug, Clone, PartialEq)]
pub struct StudioProjection {
    form: FormData,
    box_type: String,
    has_image: bool,
    analysis: Option<StrengthAnalysis>,
    chatbot_dimensions: Option<Dimensions>,
    strength_warning: bool,
}

impl Default for StudioProjection {
    fn default() -> Self {
        Self {
            form: FormData::default(),
            box_type: STANDARD_BOX_TYPE.to_string(),
            has_image: false,
            analysis: None,
            chatbot_dimensions: None,
            strength_warning: false,
        }
    }
}

impl StudioProjection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn form(&self) -> &FormData {
        &self.form
    }

    pub fn box_type(&self) -> &str {
        &self.box_type
    }

    pub fn analysis(&self) -> Option<&StrengthAnalysis> {
        self.analysis.as_ref()
    }

    /// Apply a synchronizer snapshot as one transition.
    ///
    /// Returns `true` if anything visible changed.
    pub fn sync_from(&mut self, state: &ChatState) -> bool {
        let before = self.clone();

        if let Some(merged) = merge_collected_into_form(&self.form, &state.collected_data) {
            self.form = merged;
        }
        self.box_type = state.collected_data.box_type_or_default().to_string();
        self.chatbot_dimensions = state
            .has_chatbot_dimensions
            .then_some(state.box_dimensions);
        self.strength_warning = state.collected_data.has_strength_warning();

        *self != before
    }

    /// Manual edit; rejected values leave the form untouched
    pub fn edit_field(&mut self, field: FormField, value: f64) -> Result<(), FormValidationError> {
        let value = validate_field(field, value)?;
        self.form.set(field, value);
        Ok(())
    }

    pub fn set_flute(&mut self, flute_type: FluteType) {
        self.form.flute_type = flute_type;
    }

    /// Whether a design image has been uploaded
    pub fn set_image(&mut self, has_image: bool) {
        self.has_image = has_image;
    }

    pub fn set_analysis(&mut self, analysis: Option<StrengthAnalysis>) {
        self.analysis = analysis;
    }

    /// Request body for a strength check of the current form
    pub fn analysis_request(&self) -> Result<AnalyzeRequest, FormValidationError> {
        self.form.validate_for_analysis()?;
        Ok(AnalyzeRequest::from(&self.form))
    }

    /// Last strength check failed, or the assistant flagged the box as unsafe
    pub fn is_hazard(&self) -> bool {
        self.strength_warning || self.analysis.as_ref().is_some_and(|a| a.is_danger())
    }

    pub fn render_state(&self) -> RenderState {
        let nonstandard = is_nonstandard_shape(&self.box_type);
        let mode = select_visual_mode(self.has_image, self.is_hazard(), nonstandard);
        let dimensions = display_dimensions(
            self.chatbot_dimensions.is_some(),
            self.chatbot_dimensions.unwrap_or(DEFAULT_DIMENSIONS),
            &self.form,
        );

        RenderState {
            dimensions,
            mode,
            model_path: (mode == VisualMode::AlternateModel).then(|| model_path(&self.box_type)),
            shape_label: box_type_label(&self.box_type).to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{AnalysisStatus, CollectedData};

    fn analysis(status: AnalysisStatus) -> StrengthAnalysis {
        StrengthAnalysis {
            status,
            safety_score: 40,
            max_load_kg: 3.0,
            recommendation: "Use BC flute".to_string(),
            flute_type: "C".to_string(),
            bct_kgf: 120.0,
            safety_factor: 0.8,
        }
    }

    fn state_with(collected: CollectedData) -> ChatState {
        ChatState {
            collected_data: collected,
            ..ChatState::default()
        }
    }

    #[test]
    fn test_default_renders_plain_form_dimensions() {
        let studio = StudioProjection::new();
        let render = studio.render_state();
        assert_eq!(render.mode, VisualMode::Plain);
        assert_eq!(render.dimensions, FormData::default().dimensions());
        assert!(render.model_path.is_none());
        assert_eq!(render.shape_label, "RSC");
    }

    #[test]
    fn test_sync_from_empty_state_is_unchanged() {
        let mut studio = StudioProjection::new();
        assert!(!studio.sync_from(&ChatState::default()));
    }

    #[test]
    fn test_edit_field_validates() {
        let mut studio = StudioProjection::new();
        assert!(studio.edit_field(FormField::Height, 70.0).is_err());
        assert_eq!(studio.form().height, 10.0);

        studio.edit_field(FormField::Height, 25.0).unwrap();
        assert_eq!(studio.form().height, 25.0);
    }

    #[test]
    fn test_nonstandard_shape_uses_alternate_model() {
        let mut studio = StudioProjection::new();
        let changed = studio.sync_from(&state_with(CollectedData {
            box_type: Some("die_cut".to_string()),
            ..CollectedData::default()
        }));
        assert!(changed);

        let render = studio.render_state();
        assert_eq!(render.mode, VisualMode::AlternateModel);
        assert_eq!(render.model_path.as_deref(), Some("/models/die_cut.glb"));
        assert_eq!(render.shape_label, "Die-cut");

        studio.set_image(true);
        assert_eq!(studio.render_state().mode, VisualMode::Textured);
    }

    #[test]
    fn test_danger_analysis_wins() {
        let mut studio = StudioProjection::new();
        studio.set_image(true);
        studio.set_analysis(Some(analysis(AnalysisStatus::Danger)));
        assert!(studio.is_hazard());
        assert_eq!(studio.render_state().mode, VisualMode::Hazard);

        studio.set_analysis(Some(analysis(AnalysisStatus::Safe)));
        assert_eq!(studio.render_state().mode, VisualMode::Textured);
    }

    #[test]
    fn test_strength_warning_is_hazard() {
        let mut studio = StudioProjection::new();
        studio.sync_from(&state_with(CollectedData {
            strength_warning: Some(true),
            ..CollectedData::default()
        }));
        assert_eq!(studio.render_state().mode, VisualMode::Hazard);
    }

    #[test]
    fn test_analysis_request_rejects_invalid_form() {
        let mut studio = StudioProjection::new();
        studio.sync_from(&state_with(CollectedData {
            weight_kg: Some(-1.0),
            ..CollectedData::default()
        }));
        assert!(studio.analysis_request().is_err());

        studio.edit_field(FormField::Weight, 2.0).unwrap();
        let request = studio.analysis_request().unwrap();
        assert_eq!(request.weight, 2.0);
    }
}
