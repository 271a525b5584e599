// Derived visual/form projection of the conversation state

pub mod merge;
pub mod studio;
pub mod visual;

pub use merge::{display_dimensions, merge_collected_into_form};
pub use studio::{RenderState, StudioProjection};
pub use visual::{is_nonstandard_shape, model_path, select_visual_mode, VisualMode};
