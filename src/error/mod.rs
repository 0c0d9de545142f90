//! Error handling for the converter.
//!
//! This module provides:
//! - [`ConversionError`], the typed result of every codec call
//!   (`MalformedBson`, `InvalidJson`, `UnsupportedValue`)
//! - [`BsonconvError`], the application error used by the command-line
//!   front end, which wraps codec, configuration and I/O failures
//!
//! # Example
//!
//! ```rust
//! use bsonconv::error::ConversionError;
//!
//! let err = bsonconv::bson_to_json(&[]).unwrap_err();
//! assert!(matches!(err, ConversionError::MalformedBson(_)));
//! ```

pub mod kinds;

// Re-export commonly used types
pub use kinds::{BsonconvError, ConfigError, ConversionError, InputError, Result};
