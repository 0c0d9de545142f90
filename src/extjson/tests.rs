use super::*;
use crate::bson::{Binary, DEFAULT_MAX_DEPTH, Decimal128, ObjectId, Regex, Timestamp, Value};

/// One field of every type, including the awkward corners.
fn sample_document() -> Document {
    let mut nested = Document::new();
    nested.insert("inner", vec![Value::Int32(1), Value::Null, Value::from("x")]);

    let mut doc = Document::new();
    doc.insert("_id", ObjectId::parse_str("507f1f77bcf86cd799439011").unwrap());
    doc.insert("name", "Ada");
    doc.insert("double", 2.0);
    doc.insert("negzero", -0.0);
    doc.insert("nan", f64::NAN);
    doc.insert("inf", f64::NEG_INFINITY);
    doc.insert("int32", -7);
    doc.insert("int64", i64::MAX);
    doc.insert("small_long", Value::Int64(5));
    doc.insert("dec", "-12.50".parse::<Decimal128>().unwrap());
    doc.insert("date", Value::DateTime(1_577_836_800_123));
    doc.insert("old_date", Value::DateTime(-86_400_000));
    doc.insert(
        "bin",
        Binary {
            subtype: 0x80,
            bytes: vec![0, 1, 2, 254, 255],
        },
    );
    doc.insert(
        "re",
        Value::Regex(Regex {
            pattern: "^a\"b".into(),
            options: "ix".into(),
        }),
    );
    doc.insert(
        "ts",
        Value::Timestamp(Timestamp {
            time: u32::MAX,
            increment: 1,
        }),
    );
    doc.insert("code", Value::JavaScriptCode("function () { return 1; }".into()));
    doc.insert("min", Value::MinKey);
    doc.insert("max", Value::MaxKey);
    doc.insert("bool", true);
    doc.insert("null", Value::Null);
    doc.insert("nested", nested);
    doc.insert("empty_doc", Document::new());
    doc.insert("empty_arr", Vec::<Value>::new());
    doc
}

/// NaN never equals itself, so compare documents through their canonical text.
fn assert_same(a: &Document, b: &Document) {
    assert_eq!(
        to_json_text_with_mode(a, ExtJsonMode::Canonical),
        to_json_text_with_mode(b, ExtJsonMode::Canonical)
    );
}

#[test]
fn test_round_trip_relaxed() {
    let doc = sample_document();
    let text = to_json_text(&doc);
    let back = validate_and_parse(&text).unwrap();
    assert_same(&doc, &back);
    assert_eq!(back.keys().collect::<Vec<_>>(), doc.keys().collect::<Vec<_>>());
}

#[test]
fn test_round_trip_canonical() {
    let doc = sample_document();
    let text = to_json_text_with_mode(&doc, ExtJsonMode::Canonical);
    let back = validate_and_parse(&text).unwrap();
    assert_same(&doc, &back);
}

#[test]
fn test_round_trip_preserves_types_exactly() {
    let mut doc = sample_document();
    doc.remove("nan");
    let back = validate_and_parse(&to_json_text(&doc)).unwrap();
    assert_eq!(back, doc);
    assert_eq!(back.get("double"), Some(&Value::Double(2.0)));
    assert_eq!(back.get("small_long"), Some(&Value::Int64(5)));
}

#[test]
fn test_output_is_deterministic() {
    let doc = sample_document();
    assert_eq!(to_json_text(&doc), to_json_text(&doc));
}

#[test]
fn test_two_space_indent() {
    let mut doc = Document::new();
    doc.insert("a", vec![Value::Int32(1)]);
    assert_eq!(to_json_text(&doc), "{\n  \"a\": [\n    1\n  ]\n}");
    assert_eq!(to_json_text(&Document::new()), "{}");
}

#[test]
fn test_relaxed_shapes() {
    let json = to_json_value(&sample_document(), ExtJsonMode::Relaxed);
    assert_eq!(json["_id"], serde_json::json!({"$oid": "507f1f77bcf86cd799439011"}));
    assert_eq!(json["int32"], serde_json::json!(-7));
    assert_eq!(json["int64"], serde_json::json!({"$numberLong": "9223372036854775807"}));
    assert_eq!(json["dec"], serde_json::json!({"$numberDecimal": "-12.50"}));
    assert_eq!(json["date"], serde_json::json!({"$date": "2020-01-01T00:00:00.123Z"}));
    assert_eq!(json["old_date"], serde_json::json!({"$date": {"$numberLong": "-86400000"}}));
    assert_eq!(
        json["re"],
        serde_json::json!({"$regularExpression": {"pattern": "^a\"b", "options": "ix"}})
    );
    assert_eq!(json["nan"], serde_json::json!({"$numberDouble": "NaN"}));
}

#[test]
fn test_ada_example() {
    let text = r#"{"name":"Ada","active":true,"id":{"$oid":"507f1f77bcf86cd799439011"}}"#;
    let doc = validate_and_parse(text).unwrap();
    assert_eq!(doc.get("name"), Some(&Value::String("Ada".into())));
    assert_eq!(doc.get("active"), Some(&Value::Boolean(true)));
    assert!(matches!(doc.get("id"), Some(Value::ObjectId(_))));

    let original: serde_json::Value = serde_json::from_str(text).unwrap();
    assert_eq!(to_json_value(&doc, ExtJsonMode::Relaxed), original);
}

#[test]
fn test_int64_max_round_trips() {
    let doc = validate_and_parse(r#"{"n": {"$numberLong": "9223372036854775807"}}"#).unwrap();
    assert_eq!(doc.get("n"), Some(&Value::Int64(i64::MAX)));
    assert!(to_json_text(&doc).contains("\"9223372036854775807\""));
}

#[test]
fn test_input_only_forms() {
    let doc = validate_and_parse(
        r#"{
            "u": {"$uuid": "00112233-4455-6677-8899-aabbccddeeff"},
            "d": {"$date": 1000},
            "b": {"$binary": {"base64": "AQI=", "subType": "5"}},
            "i": {"$numberInt": "12"}
        }"#,
    )
    .unwrap();
    assert_eq!(
        doc.get("u"),
        Some(&Value::Binary(Binary {
            subtype: 4,
            bytes: (0..16u8).map(|n| n * 0x11).collect(),
        }))
    );
    assert_eq!(doc.get("d"), Some(&Value::DateTime(1000)));
    assert_eq!(
        doc.get("b"),
        Some(&Value::Binary(Binary {
            subtype: 5,
            bytes: vec![1, 2],
        }))
    );
    assert_eq!(doc.get("i"), Some(&Value::Int32(12)));
}

#[test]
fn test_malformed_json_rejected() {
    for text in [
        "",
        "   ",
        r#"{"a":}"#,
        r#"{"a": "unterminated}"#,
        r#"{"a": 1,}"#,
        r#"{"a": 1} x"#,
        "{'a': 1}",
    ] {
        let err = validate_and_parse(text).unwrap_err();
        assert!(
            matches!(err, ConversionError::InvalidJson(_)),
            "{text:?} gave {err:?}"
        );
    }
}

#[test]
fn test_top_level_must_be_object() {
    for text in ["[]", "1", "\"s\"", "null", "true"] {
        let err = validate_and_parse(text).unwrap_err();
        assert!(err.to_string().contains("top-level"), "{text}: {err}");
    }
}

#[test]
fn test_bad_wrapper_payloads() {
    for text in [
        r#"{"a": {"$oid": "507f1f77bcf86cd79943901"}}"#,
        r#"{"a": {"$oid": "507f1f77bcf86cd7994390111"}}"#,
        r#"{"a": {"$oid": "zzzzzzzzzzzzzzzzzzzzzzzz"}}"#,
        r#"{"a": {"$oid": 5}}"#,
        r#"{"a": {"$numberLong": "9223372036854775808"}}"#,
        r#"{"a": {"$numberLong": 5}}"#,
        r#"{"a": {"$numberInt": "2147483648"}}"#,
        r#"{"a": {"$numberDouble": "one"}}"#,
        r#"{"a": {"$numberDecimal": "1.2.3"}}"#,
        r#"{"a": {"$date": "not a date"}}"#,
        r#"{"a": {"$binary": {"base64": "!!", "subType": "00"}}}"#,
        r#"{"a": {"$binary": {"base64": "AA==", "subType": "100"}}}"#,
        r#"{"a": {"$binary": {"base64": "AA=="}}}"#,
        r#"{"a": {"$timestamp": {"t": -1, "i": 0}}}"#,
        r#"{"a": {"$timestamp": {"t": 4294967296, "i": 0}}}"#,
        r#"{"a": {"$uuid": "0011223344556677"}}"#,
        r#"{"a": {"$minKey": 0}}"#,
        r#"{"a": {"$regularExpression": {"pattern": 1, "options": ""}}}"#,
    ] {
        let err = validate_and_parse(text).unwrap_err();
        assert!(
            matches!(err, ConversionError::InvalidJson(_)),
            "{text} gave {err:?}"
        );
    }
}

#[test]
fn test_nul_in_key_or_regex_rejected() {
    let err = validate_and_parse(r#"{"a\u0000b": 1}"#).unwrap_err();
    assert!(matches!(err, ConversionError::InvalidJson(_)));

    let err = validate_and_parse(
        r#"{"r": {"$regularExpression": {"pattern": "a\u0000", "options": ""}}}"#,
    )
    .unwrap_err();
    assert!(matches!(err, ConversionError::InvalidJson(_)));

    // NUL inside an ordinary string value is fine.
    let doc = validate_and_parse(r#"{"s": "a\u0000b"}"#).unwrap();
    assert_eq!(doc.get("s"), Some(&Value::String("a\0b".into())));
}

#[test]
fn test_duplicate_keys_last_wins_first_position() {
    let doc = validate_and_parse(r#"{"a": 1, "b": 2, "a": 3}"#).unwrap();
    assert_eq!(doc.keys().collect::<Vec<_>>(), vec!["a", "b"]);
    assert_eq!(doc.get("a"), Some(&Value::Int32(3)));
}

#[test]
fn test_depth_limit() {
    let deep = format!("{}{}", "{\"a\":".repeat(10), "1".to_string() + &"}".repeat(10));
    assert!(ExtJsonParser::with_max_depth(10).parse(&deep).is_ok());
    let err = ExtJsonParser::with_max_depth(9).parse(&deep).unwrap_err();
    assert!(err.to_string().contains("nesting"));
}

/// `levels` nested documents with wrapped values in the innermost one.
fn nested_with_wrapped_leaves(levels: usize) -> Document {
    let mut doc = Document::new();
    doc.insert("long", Value::Int64(5));
    doc.insert("old_date", Value::DateTime(-1));
    doc.insert("int", 1);
    doc.insert("double", 0.5);
    doc.insert(
        "bin",
        Binary {
            subtype: 0x04,
            bytes: vec![7; 16],
        },
    );
    doc.insert(
        "ts",
        Value::Timestamp(Timestamp {
            time: 1,
            increment: 2,
        }),
    );
    for _ in 1..levels {
        let mut outer = Document::new();
        outer.insert("a", doc);
        doc = outer;
    }
    doc
}

#[test]
fn test_wrapped_leaves_at_default_depth_round_trip() {
    let doc = nested_with_wrapped_leaves(DEFAULT_MAX_DEPTH);
    for mode in [ExtJsonMode::Relaxed, ExtJsonMode::Canonical] {
        let text = to_json_text_with_mode(&doc, mode);
        let back = validate_and_parse(&text).unwrap();
        assert_eq!(back, doc, "mode {mode}");
    }

    let too_deep = nested_with_wrapped_leaves(DEFAULT_MAX_DEPTH + 1);
    let err = validate_and_parse(&to_json_text(&too_deep)).unwrap_err();
    assert!(matches!(err, ConversionError::InvalidJson(_)));
}

#[test]
fn test_nested_document_shaped_like_wrapper() {
    let mut bad_date = Document::new();
    bad_date.insert("$date", "hello");
    let mut doc = Document::new();
    doc.insert("d", bad_date);
    let err = validate_and_parse(&to_json_text(&doc)).unwrap_err();
    assert!(matches!(err, ConversionError::InvalidJson(_)));

    let mut code = Document::new();
    code.insert("$code", "x");
    let mut doc = Document::new();
    doc.insert("c", code);
    let back = validate_and_parse(&to_json_text(&doc)).unwrap();
    assert_eq!(back.get("c"), Some(&Value::JavaScriptCode("x".into())));

    // the top level and multi-key documents are never wrappers
    let mut top = Document::new();
    top.insert("$date", "hello");
    assert_eq!(validate_and_parse(&to_json_text(&top)).unwrap(), top);
    let mut two = Document::new();
    two.insert("$date", "hello");
    two.insert("x", 1);
    let mut doc = Document::new();
    doc.insert("t", two);
    assert_eq!(validate_and_parse(&to_json_text(&doc)).unwrap(), doc);
}

#[test]
fn test_deep_input_beyond_serde_default_limit() {
    // serde_json stops at 128 levels unless its recursion limit is lifted.
    let deep = format!("{}{}", "{\"a\":".repeat(150), "1".to_string() + &"}".repeat(150));
    assert!(ExtJsonParser::with_max_depth(150).parse(&deep).is_ok());
}

#[test]
fn test_parse_bytes_rejects_invalid_utf8() {
    let err = validate_and_parse_bytes(b"{\"a\": \"\xff\"}").unwrap_err();
    assert!(matches!(err, ConversionError::InvalidJson(_)));
    assert!(validate_and_parse_bytes(b"{\"a\": 1}").is_ok());
}

#[test]
fn test_mode_parsing() {
    assert_eq!("relaxed".parse::<ExtJsonMode>(), Ok(ExtJsonMode::Relaxed));
    assert_eq!("Canonical".parse::<ExtJsonMode>(), Ok(ExtJsonMode::Canonical));
    assert!("shell".parse::<ExtJsonMode>().is_err());
    assert_eq!(ExtJsonMode::default().to_string(), "relaxed");
}
