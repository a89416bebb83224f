pub mod types;
pub mod classification;

pub use types::BoefjeError;
pub use classification::{ErrorClassification, FailureStage};
