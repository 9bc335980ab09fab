//! Inference Engine - ONNX Runtime Integration
//!
//! Loads the credit-score classifier once and runs one-row predictions.
//! Failures of the model call are reported as a `PredictionOutcome`,
//! never propagated to the caller.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

use ndarray::Array2;
use ort::session::{builder::GraphOptimizationLevel, Session};
use ort::value::Value;
use parking_lot::Mutex;
use serde::Serialize;

use crate::logic::features::{encode, EncodedRecord, RawInput};

use super::artifact::{load_metadata, metadata_path_for, verify_checksum, ModelError};
use super::schema::ExpectedFeatures;

// ============================================================================
// ERROR HANDLING
// ============================================================================

#[derive(Debug, thiserror::Error)]
pub enum InferenceError {
    #[error(
        "record columns do not match the model schema: expected {expected} columns \
         (layout {expected_hash:08x}), got {actual} (layout {actual_hash:08x})"
    )]
    ColumnMismatch {
        expected: usize,
        expected_hash: u32,
        actual: usize,
        actual_hash: u32,
    },

    #[error("inference failed: {0}")]
    Runtime(String),

    #[error("model produced no output")]
    NoOutput,
}

// ============================================================================
// CLASSIFIER TRAIT
// ============================================================================

/// Trained classifier as seen by the encoder and the front end
pub trait Classifier: Send + Sync {
    /// Ordered columns the model requires
    fn expected_features(&self) -> &ExpectedFeatures;

    /// One label per input row
    fn predict(&self, record: &EncodedRecord) -> Result<Vec<String>, InferenceError>;
}

/// Shared, immutable model loaded once per process
pub type ModelHandle = Arc<dyn Classifier>;

// ============================================================================
// DATA STRUCTURES
// ============================================================================

/// Where to find the artifact
#[derive(Debug, Clone)]
pub struct LoadOptions {
    pub model_path: PathBuf,
    /// Defaults to `<model_path>.json`
    pub metadata_path: Option<PathBuf>,
    pub verify_checksum: bool,
}

impl LoadOptions {
    pub fn new(model_path: impl Into<PathBuf>) -> Self {
        Self {
            model_path: model_path.into(),
            metadata_path: None,
            verify_checksum: true,
        }
    }
}

/// Model info for display
#[derive(Debug, Clone, Serialize)]
pub struct ModelInfo {
    pub model_path: String,
    pub model_type: String,
    pub feature_count: usize,
    pub layout_hash: u32,
    pub label_count: Option<usize>,
    pub loaded_at: chrono::DateTime<chrono::Utc>,
}

/// Result of one inference call
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum PredictionOutcome {
    Predicted { label: String, inference_time_us: u64 },
    Failed { message: String },
}

impl PredictionOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, PredictionOutcome::Predicted { .. })
    }

    pub fn label(&self) -> Option<&str> {
        match self {
            PredictionOutcome::Predicted { label, .. } => Some(label),
            PredictionOutcome::Failed { .. } => None,
        }
    }
}

/// Everything shown to the user for one request
#[derive(Debug, Clone, Serialize)]
pub struct PredictionReport {
    pub expected_features: ExpectedFeatures,
    pub record: EncodedRecord,
    pub outcome: PredictionOutcome,
}

// ============================================================================
// ONNX IMPLEMENTATION
// ============================================================================

/// Classifier backed by an ONNX Runtime session
pub struct OnnxClassifier {
    session: Mutex<Session>,
    features: ExpectedFeatures,
    labels: Option<Vec<String>>,
    info: ModelInfo,
}

impl OnnxClassifier {
    /// Load model, sidecar metadata and verify checksum
    pub fn load(options: &LoadOptions) -> Result<Self, ModelError> {
        let model_path = &options.model_path;
        log::info!("Loading ONNX model from: {}", model_path.display());

        if !model_path.exists() {
            return Err(ModelError::NotFound(model_path.clone()));
        }

        let metadata_path = options
            .metadata_path
            .clone()
            .unwrap_or_else(|| metadata_path_for(model_path));
        let metadata = load_metadata(&metadata_path)?;
        let features = metadata.expected_features()?;

        if options.verify_checksum {
            match metadata.sha256.as_deref() {
                Some(digest) => verify_checksum(model_path, digest)?,
                None => log::warn!("No sha256 in metadata, skipping checksum verification"),
            }
        }

        let session = Session::builder()
            .map_err(|e| ModelError::Runtime(format!("Failed to create session builder: {}", e)))?
            .with_optimization_level(GraphOptimizationLevel::Level3)
            .map_err(|e| ModelError::Runtime(format!("Failed to set optimization: {}", e)))?
            .commit_from_file(model_path)
            .map_err(|e| ModelError::Runtime(format!("Failed to load model: {}", e)))?;

        log::info!(
            "ONNX model loaded successfully ({} features, layout {:08x})",
            features.len(),
            features.layout_hash()
        );
        log_drift(&features);

        let info = ModelInfo {
            model_path: model_path.display().to_string(),
            model_type: metadata.model_type.clone().unwrap_or_else(|| "onnx".to_string()),
            feature_count: features.len(),
            layout_hash: features.layout_hash(),
            label_count: metadata.labels.as_ref().map(Vec::len),
            loaded_at: chrono::Utc::now(),
        };

        Ok(Self {
            session: Mutex::new(session),
            features,
            labels: metadata.labels,
            info,
        })
    }

    /// Load and wrap in a shared handle
    pub fn load_shared(options: &LoadOptions) -> Result<ModelHandle, ModelError> {
        Ok(Arc::new(Self::load(options)?))
    }

    pub fn info(&self) -> &ModelInfo {
        &self.info
    }

    /// Labels from the first model output
    fn run_session(&self, record: &EncodedRecord) -> Result<Vec<String>, InferenceError> {
        let values: Vec<f32> = record.values().into_iter().map(|v| v as f32).collect();

        // Create input tensor: shape (1, features)
        let input_array = Array2::<f32>::from_shape_vec((1, values.len()), values)
            .map_err(|e| InferenceError::Runtime(format!("Failed to create array: {}", e)))?;

        let mut session = self.session.lock();

        // Get output name BEFORE run to avoid borrow conflict
        let output_name = session
            .outputs
            .first()
            .map(|o| o.name.clone())
            .ok_or(InferenceError::NoOutput)?;

        let input_tensor = Value::from_array(input_array)
            .map_err(|e| InferenceError::Runtime(format!("Failed to create tensor: {}", e)))?;

        let outputs = session
            .run(ort::inputs![input_tensor])
            .map_err(|e| InferenceError::Runtime(e.to_string()))?;

        let output = outputs.get(&output_name).ok_or(InferenceError::NoOutput)?;

        // String classes come out as the label itself
        if let Ok((_, labels)) = output.try_extract_strings() {
            return Ok(labels);
        }

        // Integer classes: the label id
        if let Ok((_, ids)) = output.try_extract_tensor::<i64>() {
            return Ok(ids
                .iter()
                .map(|id| resolve_label(self.labels.as_deref(), *id))
                .collect());
        }

        // Otherwise class scores
        let (_, scores) = output
            .try_extract_tensor::<f32>()
            .map_err(|e| InferenceError::Runtime(format!("Failed to extract output: {}", e)))?;

        Ok(argmax(scores)
            .map(|i| resolve_label(self.labels.as_deref(), i as i64))
            .into_iter()
            .collect())
    }
}

impl Classifier for OnnxClassifier {
    fn expected_features(&self) -> &ExpectedFeatures {
        &self.features
    }

    /// Callers go through `run_inference`, which checks the column contract
    fn predict(&self, record: &EncodedRecord) -> Result<Vec<String>, InferenceError> {
        self.run_session(record)
    }
}

// ============================================================================
// HELPERS
// ============================================================================

fn log_drift(features: &ExpectedFeatures) {
    let drift = features.drift();
    if !drift.zero_filled.is_empty() {
        log::warn!(
            "Model expects features the form does not collect, they will be 0: {:?}",
            drift.zero_filled
        );
    }
    if !drift.dropped.is_empty() {
        log::warn!("Model ignores collected features: {:?}", drift.dropped);
    }
}

/// Column contract between the encoder and the model
pub fn check_columns(
    features: &ExpectedFeatures,
    record: &EncodedRecord,
) -> Result<(), InferenceError> {
    if record.matches_columns(features.as_slice()) {
        return Ok(());
    }

    Err(InferenceError::ColumnMismatch {
        expected: features.len(),
        expected_hash: features.layout_hash(),
        actual: record.len(),
        actual_hash: record.layout_hash(),
    })
}

/// Class id → label, falling back to the id itself
pub fn resolve_label(labels: Option<&[String]>, id: i64) -> String {
    usize::try_from(id)
        .ok()
        .and_then(|i| labels.and_then(|l| l.get(i)))
        .cloned()
        .unwrap_or_else(|| id.to_string())
}

fn argmax(scores: &[f32]) -> Option<usize> {
    scores
        .iter()
        .enumerate()
        .filter(|(_, s)| !s.is_nan())
        .max_by(|(_, a), (_, b)| a.total_cmp(b))
        .map(|(i, _)| i)
}

// ============================================================================
// HIGH-LEVEL API
// ============================================================================

/// Run the model and report the first label or the failure message
pub fn run_inference(model: &dyn Classifier, record: &EncodedRecord) -> PredictionOutcome {
    let start_time = Instant::now();

    let result = check_columns(model.expected_features(), record)
        .and_then(|_| model.predict(record));

    match result {
        Ok(labels) => match labels.into_iter().next() {
            Some(label) => PredictionOutcome::Predicted {
                label,
                inference_time_us: start_time.elapsed().as_micros() as u64,
            },
            None => PredictionOutcome::Failed {
                message: InferenceError::NoOutput.to_string(),
            },
        },
        Err(e) => {
            log::error!("Prediction failed: {}", e);
            PredictionOutcome::Failed {
                message: e.to_string(),
            }
        }
    }
}

/// Encode one request against the model schema and run inference
pub fn predict_request(model: &dyn Classifier, raw: &RawInput) -> PredictionReport {
    let expected_features = model.expected_features().clone();
    let record = encode(raw, expected_features.as_slice());
    log::debug!("Encoded record: {}", record.to_log_entry());

    let outcome = run_inference(model, &record);

    PredictionReport {
        expected_features,
        record,
        outcome,
    }
}

// ============================================================================
// UNIT TESTS
// ============================================================================
