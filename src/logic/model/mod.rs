//! Model Module - Classifier loading & inference
//!
//! The trained model is opaque: it declares its columns and predicts labels.

pub mod artifact;
pub mod inference;
pub mod schema;

// Re-export common types
pub use artifact::{ArtifactMetadata, ModelError};
pub use inference::{
    predict_request, run_inference, Classifier, InferenceError, LoadOptions, ModelHandle,
    OnnxClassifier, PredictionOutcome, PredictionReport,
};
pub use schema::{ExpectedFeatures, SchemaError};
