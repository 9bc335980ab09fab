//! Model Artifact - file, sidecar metadata and checksum
//!
//! An artifact is `<name>.onnx` plus `<name>.onnx.json`:
//! ```json
//! {
//!   "feature_names": ["Month", "Age", "..."],
//!   "labels": ["Good", "Poor", "Standard"],
//!   "sha256": "<hex digest of the .onnx file>",
//!   "model_type": "random_forest"
//! }
//! ```
//! Only `feature_names` is required.

use std::fs::File;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use super::schema::{ExpectedFeatures, SchemaError};

// ============================================================================
// ERROR HANDLING
// ============================================================================

/// Artifact could not be loaded; fatal at startup
#[derive(Debug, thiserror::Error)]
pub enum ModelError {
    #[error("model not found: {0}")]
    NotFound(PathBuf),

    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse metadata {path}: {source}")]
    Metadata {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid feature schema: {0}")]
    Schema(#[from] SchemaError),

    #[error("checksum mismatch for {path}: expected {expected}, got {actual}")]
    ChecksumMismatch {
        path: PathBuf,
        expected: String,
        actual: String,
    },

    #[error("failed to load model: {0}")]
    Runtime(String),
}

// ============================================================================
// METADATA
// ============================================================================

/// Sidecar metadata as stored on disk
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArtifactMetadata {
    pub feature_names: Vec<String>,
    #[serde(default)]
    pub labels: Option<Vec<String>>,
    #[serde(default)]
    pub sha256: Option<String>,
    #[serde(default)]
    pub model_type: Option<String>,
}

impl ArtifactMetadata {
    /// Validated column schema
    pub fn expected_features(&self) -> Result<ExpectedFeatures, SchemaError> {
        ExpectedFeatures::new(self.feature_names.clone())
    }
}

/// Default sidecar location for a model file
pub fn metadata_path_for(model_path: &Path) -> PathBuf {
    let mut path = model_path.as_os_str().to_owned();
    path.push(".json");
    PathBuf::from(path)
}

/// Load sidecar metadata
pub fn load_metadata(path: &Path) -> Result<ArtifactMetadata, ModelError> {
    if !path.exists() {
        return Err(ModelError::NotFound(path.to_path_buf()));
    }

    let content = std::fs::read_to_string(path).map_err(|source| ModelError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let metadata = serde_json::from_str(&content).map_err(|source| ModelError::Metadata {
        path: path.to_path_buf(),
        source,
    })?;

    log::info!("Model metadata loaded from: {}", path.display());
    Ok(metadata)
}

// ============================================================================
// CHECKSUM
// ============================================================================

/// Compute SHA256 hash of file
pub fn compute_file_hash(path: &Path) -> Result<String, ModelError> {
    let io_err = |source| ModelError::Io {
        path: path.to_path_buf(),
        source,
    };

    let mut file = File::open(path).map_err(io_err)?;
    let mut hasher = Sha256::new();
    std::io::copy(&mut file, &mut hasher).map_err(io_err)?;
    Ok(hex::encode(hasher.finalize()))
}

/// Compare a file against an expected hex digest (case-insensitive)
pub fn verify_checksum(path: &Path, expected: &str) -> Result<(), ModelError> {
    let actual = compute_file_hash(path)?;

    if !actual.eq_ignore_ascii_case(expected.trim()) {
        return Err(ModelError::ChecksumMismatch {
            path: path.to_path_buf(),
            expected: expected.trim().to_lowercase(),
            actual,
        });
    }

    log::info!("Model checksum verified: {}", actual);
    Ok(())
}
