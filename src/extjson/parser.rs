//! JSON text to Document.
//!
//! Parsing runs in three steps: a linear scan that bounds bracket nesting, a
//! grammar check by `serde_json`, and a walk over the resulting tree that
//! rebuilds typed values from wrapper objects.
//!
//! Depth counts documents and arrays only, the same way the BSON reader does.
//! Wrapper objects sit at the leaves and add at most `WRAPPER_NESTING`
//! brackets (`{"$date": {"$numberLong": ..}}`), so the scan allows that much
//! slack and the walk enforces the exact limit.

use serde::Deserialize;
use serde_json::{Map, Value as JsonValue};
use tracing::trace;

use super::helpers::*;
use super::keys;
use crate::bson::{Binary, DEFAULT_MAX_DEPTH, Decimal128, Document, ObjectId, Regex, Timestamp, Value};
use crate::bson::spec::binary_subtype;
use crate::error::ConversionError;

type Result<T> = std::result::Result<T, ConversionError>;

static NULL: JsonValue = JsonValue::Null;

/// Brackets a wrapper value adds below its containing document.
const WRAPPER_NESTING: usize = 2;

/// Reusable JSON parser with a nesting limit.
#[derive(Debug, Clone, Copy)]
pub struct ExtJsonParser {
    max_depth: usize,
}

impl Default for ExtJsonParser {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

impl ExtJsonParser {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_max_depth(max_depth: usize) -> Self {
        Self { max_depth }
    }

    pub fn max_depth(&self) -> usize {
        self.max_depth
    }

    /// Parse JSON text whose top level is an object
    ///
    /// # Arguments
    /// * `text` - JSON text, extended JSON wrappers allowed
    ///
    /// # Returns
    /// * `Result<Document>` - Document or `InvalidJson`
    pub fn parse(&self, text: &str) -> Result<Document> {
        check_depth(text, self.max_depth.saturating_add(WRAPPER_NESTING))?;

        let mut de = serde_json::Deserializer::from_str(text);
        de.disable_recursion_limit();
        let tree = JsonValue::deserialize(&mut de).map_err(syntax_error)?;
        de.end().map_err(syntax_error)?;

        match tree {
            JsonValue::Object(map) => {
                let doc = self.document_from_map(map, 1)?;
                trace!(fields = doc.len(), "parsed JSON document");
                Ok(doc)
            }
            other => Err(ConversionError::invalid_json(format!(
                "top-level JSON value must be an object, found {}",
                json_kind(&other)
            ))),
        }
    }

    /// Parse raw bytes, rejecting input that is not UTF-8
    pub fn parse_bytes(&self, bytes: &[u8]) -> Result<Document> {
        let text = std::str::from_utf8(bytes).map_err(|e| {
            ConversionError::invalid_json(format!(
                "input is not valid UTF-8 (byte offset {})",
                e.valid_up_to()
            ))
        })?;
        self.parse(text)
    }

    fn enter(&self, depth: usize) -> Result<()> {
        if depth > self.max_depth {
            return Err(ConversionError::invalid_json(format!(
                "nesting deeper than {} levels",
                self.max_depth
            )));
        }
        Ok(())
    }

    fn document_from_map(&self, map: Map<String, JsonValue>, depth: usize) -> Result<Document> {
        self.enter(depth)?;
        let mut doc = Document::with_capacity(map.len());
        for (key, value) in map {
            if key.contains('\0') {
                return Err(ConversionError::invalid_json(format!(
                    "key \"{}\" contains a NUL character",
                    key.escape_debug()
                )));
            }
            let value = self.value_from_json(value, depth)?;
            doc.insert(key, value);
        }
        Ok(doc)
    }

    /// `depth` is the depth of the document or array holding `value`.
    fn value_from_json(&self, value: JsonValue, depth: usize) -> Result<Value> {
        Ok(match value {
            JsonValue::Null => Value::Null,
            JsonValue::Bool(b) => Value::Boolean(b),
            JsonValue::Number(n) => number_to_value(&n),
            JsonValue::String(s) => Value::String(s),
            JsonValue::Array(items) => {
                self.enter(depth + 1)?;
                Value::Array(
                    items
                        .into_iter()
                        .map(|v| self.value_from_json(v, depth + 1))
                        .collect::<Result<_>>()?,
                )
            }
            JsonValue::Object(map) => match parse_wrapper(&map)? {
                Some(value) => value,
                None => Value::Document(self.document_from_map(map, depth + 1)?),
            },
        })
    }
}

/// Integers within i32 become Int32, within i64 Int64; everything else is
/// a Double.
fn number_to_value(n: &serde_json::Number) -> Value {
    match n.as_i64() {
        Some(i) => match i32::try_from(i) {
            Ok(small) => Value::Int32(small),
            Err(_) => Value::Int64(i),
        },
        None => Value::Double(n.as_f64().unwrap_or(f64::NAN)),
    }
}

/// Reject input nested deeper than `max_depth` before the recursive parser
/// sees it. Brackets inside strings are skipped.
fn check_depth(text: &str, max_depth: usize) -> Result<()> {
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for (offset, b) in text.bytes().enumerate() {
        if in_string {
            match b {
                _ if escaped => escaped = false,
                b'\\' => escaped = true,
                b'"' => in_string = false,
                _ => {}
            }
            continue;
        }
        match b {
            b'"' => in_string = true,
            b'{' | b'[' => {
                depth += 1;
                if depth > max_depth {
                    return Err(ConversionError::invalid_json(format!(
                        "nesting deeper than {max_depth} levels at byte {offset}"
                    )));
                }
            }
            b'}' | b']' => depth = depth.saturating_sub(1),
            _ => {}
        }
    }
    Ok(())
}

fn syntax_error(e: serde_json::Error) -> ConversionError {
    ConversionError::invalid_json(e.to_string())
}

fn json_kind(value: &JsonValue) -> &'static str {
    match value {
        JsonValue::Null => "null",
        JsonValue::Bool(_) => "a boolean",
        JsonValue::Number(_) => "a number",
        JsonValue::String(_) => "a string",
        JsonValue::Array(_) => "an array",
        JsonValue::Object(_) => "an object",
    }
}

/// Recognise a wrapper object. Only single-key objects whose key is one of
/// the wrapper names qualify; anything else stays a plain document.
fn parse_wrapper(map: &Map<String, JsonValue>) -> Result<Option<Value>> {
    if map.len() != 1 {
        return Ok(None);
    }
    let Some((key, payload)) = map.iter().next() else {
        return Ok(None);
    };

    let value = match key.as_str() {
        keys::OID => Value::ObjectId(ObjectId::parse_str(expect_str(key, payload)?)?),
        keys::NUMBER_INT => {
            let s = expect_str(key, payload)?;
            Value::Int32(s.parse().map_err(|_| bad_payload(key, "not a 32-bit integer"))?)
        }
        keys::NUMBER_LONG => Value::Int64(parse_long(key, payload)?),
        keys::NUMBER_DOUBLE => {
            let s = expect_str(key, payload)?;
            Value::Double(string_to_double(s).ok_or_else(|| bad_payload(key, "not a double"))?)
        }
        keys::NUMBER_DECIMAL => {
            Value::Decimal128(expect_str(key, payload)?.parse::<Decimal128>()?)
        }
        keys::DATE => Value::DateTime(parse_date(payload)?),
        keys::BINARY => Value::Binary(parse_binary(payload)?),
        keys::UUID => {
            let s = expect_str(key, payload)?;
            let uuid = (s.len() == 36)
                .then(|| uuid::Uuid::parse_str(s).ok())
                .flatten()
                .ok_or_else(|| bad_payload(key, "not a hyphenated UUID"))?;
            Value::Binary(Binary {
                subtype: binary_subtype::UUID,
                bytes: uuid.as_bytes().to_vec(),
            })
        }
        keys::REGULAR_EXPRESSION => Value::Regex(parse_regex(payload)?),
        keys::TIMESTAMP => Value::Timestamp(parse_timestamp(payload)?),
        keys::CODE => Value::JavaScriptCode(expect_str(key, payload)?.to_owned()),
        keys::MIN_KEY | keys::MAX_KEY => {
            if payload.as_i64() != Some(1) {
                return Err(bad_payload(key, "expected 1"));
            }
            if key == keys::MIN_KEY {
                Value::MinKey
            } else {
                Value::MaxKey
            }
        }
        _ => return Ok(None),
    };
    Ok(Some(value))
}

fn bad_payload(key: &str, reason: &str) -> ConversionError {
    ConversionError::invalid_json(format!("invalid {key} value: {reason}"))
}

fn expect_str<'v>(key: &str, payload: &'v JsonValue) -> Result<&'v str> {
    payload
        .as_str()
        .ok_or_else(|| bad_payload(key, "expected a string"))
}

/// Fields of a nested payload object, which must have exactly `names`.
fn expect_fields<'v, const N: usize>(
    key: &str,
    payload: &'v JsonValue,
    names: [&str; N],
) -> Result<[&'v JsonValue; N]> {
    let obj = payload
        .as_object()
        .filter(|obj| obj.len() == N)
        .ok_or_else(|| bad_payload(key, &format!("expected an object with {}", names.join(", "))))?;

    let mut out = [&NULL; N];
    for (slot, name) in out.iter_mut().zip(names) {
        *slot = obj
            .get(name)
            .ok_or_else(|| bad_payload(key, &format!("missing \"{name}\"")))?;
    }
    Ok(out)
}

fn parse_long(key: &str, payload: &JsonValue) -> Result<i64> {
    expect_str(key, payload)?
        .parse()
        .map_err(|_| bad_payload(key, "not a 64-bit integer"))
}

fn parse_date(payload: &JsonValue) -> Result<i64> {
    match payload {
        JsonValue::String(s) => {
            rfc3339_to_millis(s).ok_or_else(|| bad_payload(keys::DATE, "not an RFC 3339 date"))
        }
        JsonValue::Number(n) => n
            .as_i64()
            .ok_or_else(|| bad_payload(keys::DATE, "not an integer millisecond count")),
        JsonValue::Object(_) => {
            let [long] = expect_fields(keys::DATE, payload, [keys::NUMBER_LONG])?;
            parse_long(keys::NUMBER_LONG, long)
        }
        _ => Err(bad_payload(keys::DATE, "expected a string, number or object")),
    }
}

fn parse_binary(payload: &JsonValue) -> Result<Binary> {
    let [data, subtype] = expect_fields(keys::BINARY, payload, [keys::BASE64, keys::SUB_TYPE])?;
    let bytes = data
        .as_str()
        .and_then(base64_to_bytes)
        .ok_or_else(|| bad_payload(keys::BINARY, "base64 is not valid standard base64"))?;
    let subtype = subtype
        .as_str()
        .and_then(hex_to_subtype)
        .ok_or_else(|| bad_payload(keys::BINARY, "subType must be one or two hex digits"))?;
    Ok(Binary { subtype, bytes })
}

fn parse_regex(payload: &JsonValue) -> Result<Regex> {
    let [pattern, options] =
        expect_fields(keys::REGULAR_EXPRESSION, payload, [keys::PATTERN, keys::OPTIONS])?;
    let field = |v: &JsonValue, name: &str| -> Result<String> {
        let s = v
            .as_str()
            .ok_or_else(|| bad_payload(keys::REGULAR_EXPRESSION, &format!("{name} must be a string")))?;
        if s.contains('\0') {
            return Err(bad_payload(
                keys::REGULAR_EXPRESSION,
                &format!("{name} contains a NUL character"),
            ));
        }
        Ok(s.to_owned())
    };
    Ok(Regex {
        pattern: field(pattern, keys::PATTERN)?,
        options: field(options, keys::OPTIONS)?,
    })
}

fn parse_timestamp(payload: &JsonValue) -> Result<Timestamp> {
    let [t, i] = expect_fields(keys::TIMESTAMP, payload, [keys::TIME, keys::INCREMENT])?;
    let as_u32 = |v: &JsonValue, name: &str| {
        v.as_u64()
            .and_then(|n| u32::try_from(n).ok())
            .ok_or_else(|| bad_payload(keys::TIMESTAMP, &format!("{name} must be a 32-bit unsigned integer")))
    };
    Ok(Timestamp {
        time: as_u32(t, keys::TIME)?,
        increment: as_u32(i, keys::INCREMENT)?,
    })
}
