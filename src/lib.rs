//! Credit Score Predictor - Core Library
//!
//! Collect → encode → infer: applicant attributes are encoded into a row
//! aligned to the trained classifier's declared columns, then classified.

pub mod constants;
pub mod logic;

pub use logic::features::{encode, EncodedRecord, RawInput};
pub use logic::model::{predict_request, Classifier, ModelHandle, PredictionOutcome};
