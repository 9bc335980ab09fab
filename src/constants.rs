//! Central Configuration Constants
//!
//! Defaults for the model artifact location and checksum policy.
//! Every value can be overridden from the environment, and the CLI flags
//! override the environment.

use std::path::PathBuf;

use crate::logic::model::LoadOptions;

/// Default model file, looked up relative to the working directory
pub const DEFAULT_MODEL_PATH: &str = "CreditScore_Model.onnx";

/// Default log filter when RUST_LOG is unset
pub const DEFAULT_LOG_FILTER: &str = "info";

/// App version
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// App name
pub const APP_NAME: &str = "Credit Score Predictor";

// ============================================
// Helper functions to read from env with fallback
// ============================================

/// Get model path from environment or use default
pub fn get_model_path() -> PathBuf {
    std::env::var("CREDIT_MODEL_PATH")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from(DEFAULT_MODEL_PATH))
}

/// Get sidecar metadata path from environment, if set
pub fn get_metadata_path() -> Option<PathBuf> {
    std::env::var("CREDIT_MODEL_METADATA").ok().map(PathBuf::from)
}

/// Check if checksum verification is enabled
pub fn is_checksum_verification_enabled() -> bool {
    parse_flag(std::env::var("CREDIT_VERIFY_CHECKSUM").ok().as_deref())
}

fn parse_flag(value: Option<&str>) -> bool {
    value
        .map(|s| s.to_lowercase() != "false" && s != "0")
        .unwrap_or(true)
}

/// Load options from the environment, optionally overriding the model path
pub fn load_options(model_override: Option<PathBuf>) -> LoadOptions {
    LoadOptions {
        model_path: model_override.unwrap_or_else(get_model_path),
        metadata_path: get_metadata_path(),
        verify_checksum: is_checksum_verification_enabled(),
    }
}
