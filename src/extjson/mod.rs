//! JSON bridge using the MongoDB extended JSON convention
//!
//! This module maps a [`Document`] to JSON text and back:
//! - Relaxed output keeps Int32, finite Double and recent dates native
//! - Canonical output wraps every number and date
//! - The parser accepts both, mixed, plus a couple of input-only forms
//!
//! # Design
//!
//! Output goes through the `ExtJsonConverter` strategy trait, one strategy
//! per mode. The full convention is listed in [`keys`].

mod converter;
mod helpers;
pub mod keys;
mod parser;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

pub use converter::{CanonicalConverter, ExtJsonConverter, RelaxedConverter};
pub use parser::ExtJsonParser;

use crate::bson::Document;
use crate::error::ConversionError;

/// Output flavour of the extended JSON convention
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ExtJsonMode {
    /// Native JSON numbers and ISO dates where no type information is lost
    #[default]
    Relaxed,

    /// Every number and date carried in a type wrapper
    Canonical,
}

impl ExtJsonMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ExtJsonMode::Relaxed => "relaxed",
            ExtJsonMode::Canonical => "canonical",
        }
    }
}

impl fmt::Display for ExtJsonMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ExtJsonMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "relaxed" => Ok(ExtJsonMode::Relaxed),
            "canonical" => Ok(ExtJsonMode::Canonical),
            _ => Err(format!(
                "unknown extended JSON mode '{s}' (expected relaxed or canonical)"
            )),
        }
    }
}

/// Convert a document to a JSON tree in the given mode
pub fn to_json_value(doc: &Document, mode: ExtJsonMode) -> JsonValue {
    match mode {
        ExtJsonMode::Relaxed => RelaxedConverter.convert_document(doc),
        ExtJsonMode::Canonical => CanonicalConverter.convert_document(doc),
    }
}

/// Render a document as relaxed JSON, pretty-printed with two-space indent
pub fn to_json_text(doc: &Document) -> String {
    to_json_text_with_mode(doc, ExtJsonMode::Relaxed)
}

/// Render a document as JSON in the given mode
///
/// Output is deterministic: the same document always yields the same text.
pub fn to_json_text_with_mode(doc: &Document, mode: ExtJsonMode) -> String {
    // The alternate form of serde_json's Display is its two-space pretty printer.
    format!("{:#}", to_json_value(doc, mode))
}

/// Parse JSON text into a document using the default depth limit
pub fn validate_and_parse(text: &str) -> Result<Document, ConversionError> {
    ExtJsonParser::new().parse(text)
}

/// Parse raw bytes into a document; non-UTF-8 input is `InvalidJson`
pub fn validate_and_parse_bytes(bytes: &[u8]) -> Result<Document, ConversionError> {
    ExtJsonParser::new().parse_bytes(bytes)
}

#[cfg(test)]
mod tests;
