//! The `.tab` particle-system definition format: data model, field grammar,
//! parser and canonical serializer.

pub mod error;
pub mod grammar;
pub mod parser;
pub mod serializer;
pub mod types;

pub use error::FormatError;
pub use parser::{fragment_owner, parse_emitter_fragment, parse_file_str};
pub use serializer::{format_emitter, format_file, format_system};
pub use types::{EmitterSpec, FieldValue, Keyframe, SystemSpec};
