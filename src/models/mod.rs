// Data models shared by the client, the synchronizer and the projection

pub mod chat;
pub mod collected_data;
pub mod steps;
pub mod studio;

pub use chat::{ChatMessage, MessageRole, SEND_FAILURE_NOTICE};
pub use collected_data::{
    CollectedData, Dimensions, PartialDimensions, DEFAULT_DIMENSIONS, STANDARD_BOX_TYPE,
};
pub use steps::{step_label, FINAL_STEP, FIRST_STEP};
pub use studio::{
    box_type_label, validate_field, AnalysisStatus, FluteType, FormData, FormField,
    FormValidationError, StrengthAnalysis,
};
