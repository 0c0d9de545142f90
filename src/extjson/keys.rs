//! Wrapper keys of the extended JSON convention.
//!
//! | Value          | Relaxed                                   | Canonical                          |
//! |----------------|-------------------------------------------|------------------------------------|
//! | Int32          | `1`                                       | `{"$numberInt": "1"}`              |
//! | Double         | `1.5`, NaN/Inf as `{"$numberDouble": ..}` | `{"$numberDouble": "1.5"}`         |
//! | Int64          | `{"$numberLong": "1"}`                    | same                               |
//! | Decimal128     | `{"$numberDecimal": "1.5"}`               | same                               |
//! | ObjectId       | `{"$oid": "<24 hex>"}`                    | same                               |
//! | DateTime       | `{"$date": "<RFC 3339>"}` (1970..=9999)   | `{"$date": {"$numberLong": "ms"}}` |
//! | Binary         | `{"$binary": {"base64": .., "subType": "00"}}` | same                          |
//! | Regex          | `{"$regularExpression": {"pattern": .., "options": ..}}` | same                |
//! | Timestamp      | `{"$timestamp": {"t": .., "i": ..}}`      | same                               |
//! | JavaScriptCode | `{"$code": ".."}`                         | same                               |
//! | MinKey/MaxKey  | `{"$minKey": 1}` / `{"$maxKey": 1}`       | same                               |
//!
//! The parser also accepts `{"$uuid": "<hyphenated uuid>"}` and `{"$date": <ms>}`.
//!
//! A nested document whose single key is one of these names is written as
//! is, so it reads back as the wrapper rather than as a document. With a
//! valid payload (`{"$code": "x"}`) it returns as the wrapped type; with any
//! other payload (`{"$date": "hello"}`) parsing fails with `InvalidJson`.
//! Top-level keys never act as wrappers, and documents with more than one
//! key are always documents.

pub const OID: &str = "$oid";
pub const DATE: &str = "$date";
pub const NUMBER_INT: &str = "$numberInt";
pub const NUMBER_LONG: &str = "$numberLong";
pub const NUMBER_DOUBLE: &str = "$numberDouble";
pub const NUMBER_DECIMAL: &str = "$numberDecimal";
pub const BINARY: &str = "$binary";
pub const UUID: &str = "$uuid";
pub const REGULAR_EXPRESSION: &str = "$regularExpression";
pub const TIMESTAMP: &str = "$timestamp";
pub const CODE: &str = "$code";
pub const MIN_KEY: &str = "$minKey";
pub const MAX_KEY: &str = "$maxKey";

// Nested payload fields.
pub const BASE64: &str = "base64";
pub const SUB_TYPE: &str = "subType";
pub const PATTERN: &str = "pattern";
pub const OPTIONS: &str = "options";
pub const TIME: &str = "t";
pub const INCREMENT: &str = "i";

// Special double spellings.
pub const NAN: &str = "NaN";
pub const INFINITY: &str = "Infinity";
pub const NEG_INFINITY: &str = "-Infinity";
