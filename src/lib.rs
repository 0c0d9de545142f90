//! bsonconv library
//!
//! Lossless conversion between BSON documents and JSON text. BSON types with
//! no JSON counterpart are written as single-key `$`-wrapper objects (the
//! MongoDB extended JSON convention), so converting back restores the exact
//! original bytes.
//!
//! # Modules
//!
//! - `bson`: Document model, binary reader and writer
//! - `extjson`: Extended JSON rendering and parsing
//! - `codec`: The conversion boundary (`bson_to_json`, `json_to_bson`, `validate_json`)
//! - `cli`: Command-line interface and argument parsing
//! - `config`: Configuration management
//! - `error`: Error types and handling
//! - `utils`: Utility functions and helpers
//!
//! # Example
//!
//! ```
//! let bytes = bsonconv::json_to_bson(r#"{"name": "Ada", "age": 36}"#).unwrap();
//! let text = bsonconv::bson_to_json(&bytes).unwrap();
//! assert!(text.contains("\"age\": 36"));
//! ```

pub mod bson;
pub mod cli;
pub mod codec;
pub mod config;
pub mod error;
pub mod extjson;
pub mod utils;

// Re-export commonly used types
pub use bson::{Document, Value};
pub use codec::{Codec, CodecOptions, bson_to_json, json_to_bson, validate_json};
pub use config::Config;
pub use error::{BsonconvError, ConversionError, Result};
pub use extjson::ExtJsonMode;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Get library version string
///
/// # Returns
/// * `&str` - Version string
pub fn version() -> &'static str {
    VERSION
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!version().is_empty());
    }
}
