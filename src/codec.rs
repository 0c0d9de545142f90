//! Conversion boundary.
//!
//! The three operations a caller needs: BSON bytes to JSON text, JSON text
//! to BSON bytes, and a JSON check that never builds bytes. The free
//! functions use [`CodecOptions::default`]; [`Codec`] carries custom options.

use std::time::Instant;

use tracing::debug;

use crate::bson::{self, BsonReader, DEFAULT_MAX_DEPTH, Document};
use crate::error::ConversionError;
use crate::extjson::{self, ExtJsonMode, ExtJsonParser};

/// Options shared by every conversion a [`Codec`] performs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CodecOptions {
    /// Maximum nesting of documents and arrays, both directions
    pub max_depth: usize,

    /// JSON output flavour
    pub mode: ExtJsonMode,
}

impl Default for CodecOptions {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
            mode: ExtJsonMode::Relaxed,
        }
    }
}

/// Stateless converter configured with [`CodecOptions`]
#[derive(Debug, Clone, Copy, Default)]
pub struct Codec {
    options: CodecOptions,
}

impl Codec {
    pub fn new(options: CodecOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &CodecOptions {
        &self.options
    }

    /// Decode a BSON buffer and render it as pretty JSON
    ///
    /// # Arguments
    /// * `bytes` - One complete BSON document
    ///
    /// # Returns
    /// * `Result<String, ConversionError>` - JSON text or `MalformedBson`
    pub fn bson_to_json(&self, bytes: &[u8]) -> Result<String, ConversionError> {
        let started = Instant::now();
        let doc = self.decode(bytes)?;
        let text = extjson::to_json_text_with_mode(&doc, self.options.mode);
        debug!(
            input_bytes = bytes.len(),
            output_bytes = text.len(),
            mode = %self.options.mode,
            elapsed_us = started.elapsed().as_micros() as u64,
            "converted BSON to JSON"
        );
        Ok(text)
    }

    /// Parse JSON text and encode it as BSON
    ///
    /// # Arguments
    /// * `text` - JSON text whose top level is an object
    ///
    /// # Returns
    /// * `Result<Vec<u8>, ConversionError>` - BSON bytes, `InvalidJson` or `UnsupportedValue`
    pub fn json_to_bson(&self, text: &str) -> Result<Vec<u8>, ConversionError> {
        self.encode_parsed(text.len(), || self.parse(text))
    }

    /// Same as [`Codec::json_to_bson`] for raw file contents
    pub fn json_bytes_to_bson(&self, bytes: &[u8]) -> Result<Vec<u8>, ConversionError> {
        self.encode_parsed(bytes.len(), || self.parser().parse_bytes(bytes))
    }

    /// Check JSON grammar and wrapper payloads without encoding
    pub fn validate_json(&self, text: &str) -> Result<(), ConversionError> {
        self.check_parsed(text.len(), || self.parse(text))
    }

    /// Same as [`Codec::validate_json`] for raw file contents
    pub fn validate_json_bytes(&self, bytes: &[u8]) -> Result<(), ConversionError> {
        self.check_parsed(bytes.len(), || self.parser().parse_bytes(bytes))
    }

    fn encode_parsed(
        &self,
        input_len: usize,
        parse: impl FnOnce() -> Result<Document, ConversionError>,
    ) -> Result<Vec<u8>, ConversionError> {
        let started = Instant::now();
        let doc = parse()?;
        let bytes = bson::encode(&doc)?;
        debug!(
            input_bytes = input_len,
            output_bytes = bytes.len(),
            elapsed_us = started.elapsed().as_micros() as u64,
            "converted JSON to BSON"
        );
        Ok(bytes)
    }

    fn check_parsed(
        &self,
        input_len: usize,
        parse: impl FnOnce() -> Result<Document, ConversionError>,
    ) -> Result<(), ConversionError> {
        let started = Instant::now();
        let doc = parse()?;
        debug!(
            input_bytes = input_len,
            fields = doc.len(),
            elapsed_us = started.elapsed().as_micros() as u64,
            "JSON input is valid"
        );
        Ok(())
    }

    /// Decode BSON into a document
    pub fn decode(&self, bytes: &[u8]) -> Result<Document, ConversionError> {
        BsonReader::new(bytes)
            .with_max_depth(self.options.max_depth)
            .read_document()
    }

    /// Parse JSON into a document
    pub fn parse(&self, text: &str) -> Result<Document, ConversionError> {
        self.parser().parse(text)
    }

    fn parser(&self) -> ExtJsonParser {
        ExtJsonParser::with_max_depth(self.options.max_depth)
    }
}

/// Convert one BSON document to relaxed extended JSON
pub fn bson_to_json(bytes: &[u8]) -> Result<String, ConversionError> {
    Codec::default().bson_to_json(bytes)
}

/// Convert JSON text to one BSON document
pub fn json_to_bson(text: &str) -> Result<Vec<u8>, ConversionError> {
    Codec::default().json_to_bson(text)
}

/// Validate JSON text for conversion
pub fn validate_json(text: &str) -> Result<(), ConversionError> {
    Codec::default().validate_json(text)
}
