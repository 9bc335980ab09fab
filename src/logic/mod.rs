//! Logic Module - Encoding & Inference Engines
//!
//! - `features/` - Raw input, encoding tables, schema-aligned records
//! - `model/` - Model artifact loading and inference

pub mod features;
pub mod model;
