//! BSON data model and binary codec.
//!
//! [`Document`] and [`Value`] describe a document in memory; [`decode`] and
//! [`encode`] move it to and from the binary wire format.

mod decimal128;
mod document;
mod oid;
pub mod reader;
pub mod spec;
mod value;
pub mod writer;

pub use decimal128::Decimal128;
pub use document::Document;
pub use oid::ObjectId;
pub use reader::{BsonReader, decode};
pub use value::{Binary, Regex, Timestamp, Value};
pub use writer::{BsonWriter, encode};

/// Default bound on nesting of documents and arrays, matching the MongoDB
/// server's own nesting limit.
///
/// Reading, parsing, rendering and dropping a document all recurse once per
/// level. At this depth an unoptimised build stays well inside the 2 MiB
/// stack of a spawned thread; limits in the thousands need a larger stack
/// in debug builds.
pub const DEFAULT_MAX_DEPTH: usize = 100;
