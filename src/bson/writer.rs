//! BSON document writer.

use super::{Document, Value};
use crate::error::ConversionError;

type Result<T> = std::result::Result<T, ConversionError>;

/// Encode a document into its canonical binary form.
pub fn encode(doc: &Document) -> Result<Vec<u8>> {
    BsonWriter::new().write_document(doc)
}

/// Append-only encoder. Container lengths are written as placeholders and
/// patched once the container is closed.
#[derive(Debug, Default)]
pub struct BsonWriter {
    buf: Vec<u8>,
}

impl BsonWriter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Consume the writer and return the encoded document.
    pub fn write_document(mut self, doc: &Document) -> Result<Vec<u8>> {
        self.container(doc.iter())?;
        Ok(self.buf)
    }

    fn container<'v, K: AsRef<str>>(
        &mut self,
        entries: impl Iterator<Item = (K, &'v Value)>,
    ) -> Result<()> {
        let start = self.buf.len();
        self.buf.extend_from_slice(&[0; 4]);
        for (key, value) in entries {
            self.element(key.as_ref(), value)?;
        }
        self.buf.push(0);

        let len = self.buf.len() - start;
        let len = i32::try_from(len).map_err(|_| {
            ConversionError::unsupported(format!(
                "document of {len} bytes exceeds the maximum BSON size"
            ))
        })?;
        self.buf[start..start + 4].copy_from_slice(&len.to_le_bytes());
        Ok(())
    }

    fn element(&mut self, key: &str, value: &Value) -> Result<()> {
        self.buf.push(value.element_type().as_u8());
        self.cstring(key, "key")?;

        match value {
            Value::Double(v) => self.buf.extend_from_slice(&v.to_le_bytes()),
            Value::String(s) | Value::JavaScriptCode(s) => self.string(s)?,
            Value::Document(doc) => self.container(doc.iter())?,
            Value::Array(items) => {
                self.container(items.iter().enumerate().map(|(i, v)| (i.to_string(), v)))?
            }
            Value::Binary(bin) => {
                let len = i32::try_from(bin.bytes.len()).map_err(|_| {
                    ConversionError::unsupported(format!(
                        "binary field '{key}' of {} bytes is too large",
                        bin.bytes.len()
                    ))
                })?;
                self.buf.extend_from_slice(&len.to_le_bytes());
                self.buf.push(bin.subtype);
                self.buf.extend_from_slice(&bin.bytes);
            }
            Value::ObjectId(oid) => self.buf.extend_from_slice(oid.as_bytes()),
            Value::Boolean(b) => self.buf.push(u8::from(*b)),
            Value::DateTime(ms) => self.buf.extend_from_slice(&ms.to_le_bytes()),
            Value::Null | Value::MinKey | Value::MaxKey => {}
            Value::Regex(re) => {
                self.cstring(&re.pattern, "regex pattern")?;
                self.cstring(&re.options, "regex options")?;
            }
            Value::Int32(v) => self.buf.extend_from_slice(&v.to_le_bytes()),
            Value::Timestamp(ts) => {
                self.buf.extend_from_slice(&ts.increment.to_le_bytes());
                self.buf.extend_from_slice(&ts.time.to_le_bytes());
            }
            Value::Int64(v) => self.buf.extend_from_slice(&v.to_le_bytes()),
            Value::Decimal128(d) => self.buf.extend_from_slice(&d.bytes()),
        }
        Ok(())
    }

    fn cstring(&mut self, s: &str, what: &str) -> Result<()> {
        if s.as_bytes().contains(&0) {
            return Err(ConversionError::unsupported(format!(
                "{what} \"{}\" contains a NUL byte",
                s.escape_debug()
            )));
        }
        self.buf.extend_from_slice(s.as_bytes());
        self.buf.push(0);
        Ok(())
    }

    fn string(&mut self, s: &str) -> Result<()> {
        let len = i32::try_from(s.len() + 1).map_err(|_| {
            ConversionError::unsupported(format!("string of {} bytes is too large", s.len()))
        })?;
        self.buf.extend_from_slice(&len.to_le_bytes());
        self.buf.extend_from_slice(s.as_bytes());
        self.buf.push(0);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bson::{Binary, Decimal128, ObjectId, Regex, Timestamp, decode};

    #[test]
    fn test_empty_document() {
        assert_eq!(encode(&Document::new()).unwrap(), vec![5, 0, 0, 0, 0]);
    }

    #[test]
    fn test_known_bytes() {
        // {"hello": "world"} from the BSON reference examples.
        let mut doc = Document::new();
        doc.insert("hello", "world");
        let expected = b"\x16\x00\x00\x00\x02hello\x00\x06\x00\x00\x00world\x00\x00";
        assert_eq!(encode(&doc).unwrap(), expected.to_vec());
    }

    #[test]
    fn test_array_keys_are_indices() {
        let mut doc = Document::new();
        doc.insert("a", vec![Value::Boolean(true), Value::Null]);
        let bytes = encode(&doc).unwrap();
        let expected: &[u8] = &[
            0x14, 0x00, 0x00, 0x00, 0x04, b'a', 0x00, 0x0C, 0x00, 0x00, 0x00, 0x08, b'0', 0x00,
            0x01, 0x0A, b'1', 0x00, 0x00, 0x00,
        ];
        assert_eq!(bytes, expected);
    }

    #[test]
    fn test_round_trip_all_types() {
        let mut inner = Document::new();
        inner.insert("k", 1);

        let mut doc = Document::new();
        doc.insert("double", 2.5);
        doc.insert("string", "héllo");
        doc.insert("doc", inner);
        doc.insert("array", vec![Value::Int32(1), Value::String("two".into())]);
        doc.insert(
            "binary",
            Binary {
                subtype: 0x80,
                bytes: vec![1, 2, 3],
            },
        );
        doc.insert("oid", ObjectId::from_bytes([7; 12]));
        doc.insert("bool", false);
        doc.insert("date", Value::DateTime(-1));
        doc.insert("null", Value::Null);
        doc.insert(
            "regex",
            Value::Regex(Regex {
                pattern: "^a.*".into(),
                options: "im".into(),
            }),
        );
        doc.insert("code", Value::JavaScriptCode("function(){}".into()));
        doc.insert("int32", i32::MIN);
        doc.insert(
            "ts",
            Value::Timestamp(Timestamp {
                time: 1_700_000_000,
                increment: 42,
            }),
        );
        doc.insert("int64", i64::MIN);
        doc.insert("dec", "1.25".parse::<Decimal128>().unwrap());
        doc.insert("min", Value::MinKey);
        doc.insert("max", Value::MaxKey);

        let bytes = encode(&doc).unwrap();
        let decoded = decode(&bytes).unwrap();
        assert_eq!(decoded, doc);
        assert_eq!(encode(&decoded).unwrap(), bytes);
    }

    #[test]
    fn test_nul_in_key_rejected() {
        let mut doc = Document::new();
        doc.insert("a\0b", 1);
        let err = encode(&doc).unwrap_err();
        assert!(matches!(err, ConversionError::UnsupportedValue(_)));
    }

    #[test]
    fn test_nul_in_regex_rejected() {
        let mut doc = Document::new();
        doc.insert(
            "r",
            Value::Regex(Regex {
                pattern: "a\0".into(),
                options: String::new(),
            }),
        );
        assert!(matches!(
            encode(&doc).unwrap_err(),
            ConversionError::UnsupportedValue(_)
        ));
    }

    #[test]
    fn test_nul_inside_string_value_allowed() {
        let mut doc = Document::new();
        doc.insert("s", "a\0b");
        let bytes = encode(&doc).unwrap();
        assert_eq!(decode(&bytes).unwrap(), doc);
    }

    #[test]
    fn test_length_prefix_matches_output() {
        let mut doc = Document::new();
        doc.insert("nested", {
            let mut d = Document::new();
            d.insert("deep", vec![Value::Int64(5)]);
            d
        });
        let bytes = encode(&doc).unwrap();
        let declared = i32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]);
        assert_eq!(declared as usize, bytes.len());
        assert_eq!(*bytes.last().unwrap(), 0);
    }
}
