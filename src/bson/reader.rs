//! BSON document reader.
//!
//! Parses a byte buffer into a [`Document`], validating the structure as it
//! goes. Every length prefix is checked against the region of the enclosing
//! document, so a corrupt length can never make the reader look outside its
//! parent, and nesting is bounded by a configurable depth.

use tracing::trace;

use super::spec::{ElementType, deprecated_name};
use super::value::{Binary, Regex, Timestamp, Value};
use super::{DEFAULT_MAX_DEPTH, Decimal128, Document, ObjectId};
use crate::error::ConversionError;

/// Smallest possible document: length prefix plus terminator.
pub const MIN_DOCUMENT_LEN: usize = 5;

type Result<T> = std::result::Result<T, ConversionError>;

/// Decode a complete BSON document using the default depth limit.
pub fn decode(bytes: &[u8]) -> Result<Document> {
    BsonReader::new(bytes).read_document()
}

/// Single-use reader over a borrowed buffer.
pub struct BsonReader<'a> {
    data: &'a [u8],
    x: usize,
    max_depth: usize,
}

impl<'a> BsonReader<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self {
            data,
            x: 0,
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }

    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Read the top-level document. The declared length must cover the
    /// buffer exactly.
    pub fn read_document(mut self) -> Result<Document> {
        if self.data.len() < MIN_DOCUMENT_LEN {
            return Err(ConversionError::malformed(format!(
                "buffer of {} bytes is shorter than the {MIN_DOCUMENT_LEN}-byte minimum document",
                self.data.len()
            )));
        }

        let declared = i32::from_le_bytes([self.data[0], self.data[1], self.data[2], self.data[3]]);
        if usize::try_from(declared).ok() != Some(self.data.len()) {
            return Err(ConversionError::malformed(format!(
                "declared document length {declared} does not match buffer length {}",
                self.data.len()
            )));
        }

        let limit = self.data.len();
        let fields = self.read_fields(1, limit)?;
        trace!(fields = fields.len(), bytes = limit, "decoded BSON document");
        Ok(fields.into_iter().collect())
    }

    /// Read one length-prefixed document body that must end at or before
    /// `limit`. Keys are returned in wire order.
    fn read_fields(&mut self, depth: usize, limit: usize) -> Result<Vec<(String, Value)>> {
        if depth > self.max_depth {
            return Err(ConversionError::malformed(format!(
                "nesting deeper than {} levels at offset {}",
                self.max_depth, self.x
            )));
        }

        let start = self.x;
        let len = self.i32_le(limit)?;
        let end = usize::try_from(len)
            .ok()
            .filter(|len| *len >= MIN_DOCUMENT_LEN)
            .and_then(|len| start.checked_add(len))
            .filter(|end| *end <= limit)
            .ok_or_else(|| {
                ConversionError::malformed(format!(
                    "document at offset {start} declares length {len}, which does not fit in {} available bytes",
                    limit - start
                ))
            })?;

        let mut fields = Vec::new();
        loop {
            let tag = self.u8(end)?;
            if tag == 0 {
                break;
            }
            let key = self.cstring(end)?;
            let value = self.read_element(tag, &key, depth, end)?;
            fields.push((key, value));
        }

        if self.x != end {
            return Err(ConversionError::malformed(format!(
                "document at offset {start} terminates at offset {} but declares end {end}",
                self.x
            )));
        }
        Ok(fields)
    }

    fn read_element(&mut self, tag: u8, key: &str, depth: usize, end: usize) -> Result<Value> {
        let Some(ty) = ElementType::from_u8(tag) else {
            return Err(match deprecated_name(tag) {
                Some(name) => ConversionError::malformed(format!(
                    "field '{key}' uses deprecated BSON type 0x{tag:02x} ({name}), which is not supported"
                )),
                None => ConversionError::malformed(format!(
                    "field '{key}' has unknown BSON type 0x{tag:02x} at offset {}",
                    self.x
                )),
            });
        };

        let value = match ty {
            ElementType::Double => Value::Double(f64::from_le_bytes(self.fixed(end)?)),
            ElementType::String => Value::String(self.string(end)?),
            ElementType::EmbeddedDocument => {
                let fields = self.read_fields(depth + 1, end)?;
                Value::Document(fields.into_iter().collect())
            }
            ElementType::Array => {
                let fields = self.read_fields(depth + 1, end)?;
                Value::Array(fields.into_iter().map(|(_, v)| v).collect())
            }
            ElementType::Binary => {
                let offset = self.x;
                let len = self.i32_le(end)?;
                let len = usize::try_from(len).map_err(|_| {
                    ConversionError::malformed(format!(
                        "binary field '{key}' at offset {offset} has negative length {len}"
                    ))
                })?;
                let subtype = self.u8(end)?;
                let bytes = self.take(len, end)?.to_vec();
                Value::Binary(Binary { subtype, bytes })
            }
            ElementType::ObjectId => Value::ObjectId(ObjectId::from_bytes(self.fixed(end)?)),
            ElementType::Boolean => match self.u8(end)? {
                0 => Value::Boolean(false),
                1 => Value::Boolean(true),
                b => {
                    return Err(ConversionError::malformed(format!(
                        "boolean field '{key}' holds byte 0x{b:02x}"
                    )));
                }
            },
            ElementType::DateTime => Value::DateTime(i64::from_le_bytes(self.fixed(end)?)),
            ElementType::Null => Value::Null,
            ElementType::RegularExpression => {
                let pattern = self.cstring(end)?;
                let options = self.cstring(end)?;
                Value::Regex(Regex { pattern, options })
            }
            ElementType::JavaScriptCode => Value::JavaScriptCode(self.string(end)?),
            ElementType::Int32 => Value::Int32(self.i32_le(end)?),
            ElementType::Timestamp => {
                let increment = u32::from_le_bytes(self.fixed(end)?);
                let time = u32::from_le_bytes(self.fixed(end)?);
                Value::Timestamp(Timestamp { time, increment })
            }
            ElementType::Int64 => Value::Int64(i64::from_le_bytes(self.fixed(end)?)),
            ElementType::Decimal128 => Value::Decimal128(Decimal128::from_bytes(self.fixed(end)?)),
            ElementType::MinKey => Value::MinKey,
            ElementType::MaxKey => Value::MaxKey,
        };
        Ok(value)
    }

    /* ---------------------------- primitives ---------------------------- */

    fn take(&mut self, n: usize, limit: usize) -> Result<&'a [u8]> {
        if n > limit.saturating_sub(self.x) {
            return Err(ConversionError::malformed(format!(
                "unexpected end of document: need {n} bytes at offset {}, {} available",
                self.x,
                limit.saturating_sub(self.x)
            )));
        }
        let data = self.data;
        let slice = &data[self.x..self.x + n];
        self.x += n;
        Ok(slice)
    }

    fn fixed<const N: usize>(&mut self, limit: usize) -> Result<[u8; N]> {
        let mut out = [0u8; N];
        out.copy_from_slice(self.take(N, limit)?);
        Ok(out)
    }

    fn u8(&mut self, limit: usize) -> Result<u8> {
        Ok(self.take(1, limit)?[0])
    }

    fn i32_le(&mut self, limit: usize) -> Result<i32> {
        Ok(i32::from_le_bytes(self.fixed(limit)?))
    }

    /// Null-terminated UTF-8 string (keys, regex parts).
    fn cstring(&mut self, limit: usize) -> Result<String> {
        let start = self.x;
        let region = &self.data[start..limit.max(start)];
        let Some(nul) = region.iter().position(|b| *b == 0) else {
            return Err(ConversionError::malformed(format!(
                "unterminated C string at offset {start}"
            )));
        };
        let s = std::str::from_utf8(&region[..nul]).map_err(|_| {
            ConversionError::malformed(format!("invalid UTF-8 in C string at offset {start}"))
        })?;
        self.x = start + nul + 1;
        Ok(s.to_owned())
    }

    /// Length-prefixed string; the prefix counts the trailing NUL.
    fn string(&mut self, limit: usize) -> Result<String> {
        let start = self.x;
        let len = self.i32_le(limit)?;
        let len = usize::try_from(len).ok().filter(|len| *len >= 1).ok_or_else(|| {
            ConversionError::malformed(format!(
                "string at offset {start} declares invalid length {len}"
            ))
        })?;
        let bytes = self.take(len, limit)?;
        let (body, terminator) = bytes.split_at(len - 1);
        if terminator != [0] {
            return Err(ConversionError::malformed(format!(
                "string at offset {start} is not null-terminated"
            )));
        }
        let s = std::str::from_utf8(body).map_err(|_| {
            ConversionError::malformed(format!("invalid UTF-8 in string at offset {start}"))
        })?;
        Ok(s.to_owned())
    }
}
