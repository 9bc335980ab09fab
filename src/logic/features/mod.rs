//! Features Module - Feature Encoding Engine
//!
//! Raw applicant input → categorical codes → row aligned to the model schema.

pub mod encoding;
pub mod input;
pub mod layout;
pub mod record;


// Re-export common types
pub use encoding::{EncodingTable, UNKNOWN_CODE};
pub use input::{InputError, RawInput, RawInputBuilder};
pub use layout::{LayoutDrift, LayoutInfo, FEATURE_COUNT, FEATURE_LAYOUT};
pub use record::{encode, EncodedRecord};
