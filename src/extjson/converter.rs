//! Document to JSON conversion strategies.
//!
//! `ExtJsonConverter` carries the parts of the convention both output modes
//! share. A strategy only has to say how it writes the values whose shape
//! depends on the mode: Int32, Double and DateTime.

use serde_json::{Map, Value as JsonValue};

use super::helpers::*;
use super::keys;
use crate::bson::{Binary, Decimal128, Document, ObjectId, Regex, Timestamp, Value};

/// Core trait for converting BSON values to extended JSON
pub trait ExtJsonConverter {
    fn convert_int32(&self, n: i32) -> JsonValue;
    fn convert_double(&self, f: f64) -> JsonValue;
    fn convert_datetime(&self, ms: i64) -> JsonValue;

    fn convert_int64(&self, n: i64) -> JsonValue {
        wrap(keys::NUMBER_LONG, JsonValue::String(n.to_string()))
    }

    fn convert_decimal128(&self, d: &Decimal128) -> JsonValue {
        wrap(keys::NUMBER_DECIMAL, JsonValue::String(d.to_string()))
    }

    fn convert_object_id(&self, oid: &ObjectId) -> JsonValue {
        wrap(keys::OID, JsonValue::String(oid.to_hex()))
    }

    fn convert_binary(&self, bin: &Binary) -> JsonValue {
        wrap(
            keys::BINARY,
            object([
                (keys::BASE64, JsonValue::String(bytes_to_base64(&bin.bytes))),
                (keys::SUB_TYPE, JsonValue::String(subtype_to_hex(bin.subtype))),
            ]),
        )
    }

    fn convert_regex(&self, regex: &Regex) -> JsonValue {
        wrap(
            keys::REGULAR_EXPRESSION,
            object([
                (keys::PATTERN, JsonValue::String(regex.pattern.clone())),
                (keys::OPTIONS, JsonValue::String(regex.options.clone())),
            ]),
        )
    }

    fn convert_timestamp(&self, ts: &Timestamp) -> JsonValue {
        wrap(
            keys::TIMESTAMP,
            object([
                (keys::TIME, JsonValue::from(ts.time)),
                (keys::INCREMENT, JsonValue::from(ts.increment)),
            ]),
        )
    }

    fn convert_code(&self, code: &str) -> JsonValue {
        wrap(keys::CODE, JsonValue::String(code.to_owned()))
    }

    fn convert_array(&self, arr: &[Value]) -> JsonValue {
        JsonValue::Array(arr.iter().map(|v| self.convert_value(v)).collect())
    }

    fn convert_document(&self, doc: &Document) -> JsonValue {
        let mut map = Map::with_capacity(doc.len());
        for (key, value) in doc.iter() {
            map.insert(key.clone(), self.convert_value(value));
        }
        JsonValue::Object(map)
    }

    /// Convert any value (provided implementation)
    fn convert_value(&self, value: &Value) -> JsonValue {
        match value {
            Value::Double(f) => self.convert_double(*f),
            Value::String(s) => JsonValue::String(s.clone()),
            Value::Document(doc) => self.convert_document(doc),
            Value::Array(arr) => self.convert_array(arr),
            Value::Binary(bin) => self.convert_binary(bin),
            Value::ObjectId(oid) => self.convert_object_id(oid),
            Value::Boolean(b) => JsonValue::Bool(*b),
            Value::DateTime(ms) => self.convert_datetime(*ms),
            Value::Null => JsonValue::Null,
            Value::Regex(regex) => self.convert_regex(regex),
            Value::JavaScriptCode(code) => self.convert_code(code),
            Value::Int32(n) => self.convert_int32(*n),
            Value::Timestamp(ts) => self.convert_timestamp(ts),
            Value::Int64(n) => self.convert_int64(*n),
            Value::Decimal128(d) => self.convert_decimal128(d),
            Value::MinKey => wrap(keys::MIN_KEY, JsonValue::from(1)),
            Value::MaxKey => wrap(keys::MAX_KEY, JsonValue::from(1)),
        }
    }
}

/// Single-key wrapper object `{key: payload}`.
fn wrap(key: &str, payload: JsonValue) -> JsonValue {
    object([(key, payload)])
}

fn object<const N: usize>(fields: [(&str, JsonValue); N]) -> JsonValue {
    let mut map = Map::with_capacity(N);
    for (key, value) in fields {
        map.insert(key.to_owned(), value);
    }
    JsonValue::Object(map)
}

fn datetime_as_number_long(ms: i64) -> JsonValue {
    wrap(
        keys::DATE,
        wrap(keys::NUMBER_LONG, JsonValue::String(ms.to_string())),
    )
}

/// Relaxed output: native numbers and ISO dates where lossless
#[derive(Debug, Default, Clone, Copy)]
pub struct RelaxedConverter;

impl ExtJsonConverter for RelaxedConverter {
    fn convert_int32(&self, n: i32) -> JsonValue {
        JsonValue::from(n)
    }

    fn convert_double(&self, f: f64) -> JsonValue {
        match serde_json::Number::from_f64(f) {
            Some(n) => JsonValue::Number(n),
            None => wrap(keys::NUMBER_DOUBLE, JsonValue::String(double_to_string(f))),
        }
    }

    fn convert_datetime(&self, ms: i64) -> JsonValue {
        match datetime_to_rfc3339(ms) {
            Some(iso) => wrap(keys::DATE, JsonValue::String(iso)),
            None => datetime_as_number_long(ms),
        }
    }
}

/// Canonical output: every number and date is wrapped
#[derive(Debug, Default, Clone, Copy)]
pub struct CanonicalConverter;

impl ExtJsonConverter for CanonicalConverter {
    fn convert_int32(&self, n: i32) -> JsonValue {
        wrap(keys::NUMBER_INT, JsonValue::String(n.to_string()))
    }

    fn convert_double(&self, f: f64) -> JsonValue {
        wrap(keys::NUMBER_DOUBLE, JsonValue::String(double_to_string(f)))
    }

    fn convert_datetime(&self, ms: i64) -> JsonValue {
        datetime_as_number_long(ms)
    }
}
