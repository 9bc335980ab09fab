//! Expected Features - the model's declared column schema
//!
//! Validated once when the model is loaded and immutable afterwards.

use std::collections::HashSet;

use serde::Serialize;

use crate::logic::features::layout::{compare_layout, compute_layout_hash, LayoutDrift};

/// Schema rejected at load
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SchemaError {
    #[error("model declares no expected features")]
    Empty,

    #[error("model declares feature {0:?} more than once")]
    Duplicate(String),

    #[error("model declares a blank feature name at position {0}")]
    Blank(usize),
}

/// Ordered, non-empty, duplicate-free feature names
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ExpectedFeatures(Vec<String>);

impl ExpectedFeatures {
    pub fn new(names: Vec<String>) -> Result<Self, SchemaError> {
        if names.is_empty() {
            return Err(SchemaError::Empty);
        }

        let mut seen = HashSet::with_capacity(names.len());
        for (i, name) in names.iter().enumerate() {
            if name.trim().is_empty() {
                return Err(SchemaError::Blank(i));
            }
            if !seen.insert(name.as_str()) {
                return Err(SchemaError::Duplicate(name.clone()));
            }
        }

        Ok(Self(names))
    }

    pub fn as_slice(&self) -> &[String] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    pub fn layout_hash(&self) -> u32 {
        compute_layout_hash(&self.0)
    }

    /// Differences against what the encoder produces
    pub fn drift(&self) -> LayoutDrift {
        compare_layout(&self.0)
    }
}

impl TryFrom<Vec<String>> for ExpectedFeatures {
    type Error = SchemaError;

    fn try_from(names: Vec<String>) -> Result<Self, Self::Error> {
        Self::new(names)
    }
}
