//! 12-byte ObjectId.

use std::fmt;
use std::str::FromStr;

use crate::error::ConversionError;

/// MongoDB ObjectId: exactly 12 bytes (4-byte big-endian creation time in
/// seconds, 5 random bytes, 3-byte counter).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ObjectId([u8; 12]);

impl ObjectId {
    pub const LEN: usize = 12;

    pub fn from_bytes(bytes: [u8; 12]) -> Self {
        Self(bytes)
    }

    /// Parse a 24-character hex string.
    pub fn parse_str(s: &str) -> Result<Self, ConversionError> {
        if s.len() != Self::LEN * 2 {
            return Err(ConversionError::invalid_json(format!(
                "ObjectId must be {} hex characters, got {}",
                Self::LEN * 2,
                s.len()
            )));
        }
        let mut bytes = [0u8; 12];
        hex::decode_to_slice(s, &mut bytes)
            .map_err(|e| ConversionError::invalid_json(format!("ObjectId '{s}': {e}")))?;
        Ok(Self(bytes))
    }

    pub fn as_bytes(&self) -> &[u8; 12] {
        &self.0
    }

    /// Lowercase hex form.
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }
}

impl fmt::Display for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl FromStr for ObjectId {
    type Err = ConversionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse_str(s)
    }
}
