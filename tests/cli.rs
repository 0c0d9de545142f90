//! Command-line workflows against files in a temporary directory.

use std::fs;
use std::path::Path;

use bsonconv::BsonconvError;
use bsonconv::cli::{CliArgs, CliInterface};
use bsonconv::error::InputError;
use clap::Parser;
use tempfile::TempDir;

fn run(argv: &[&str]) -> bsonconv::Result<()> {
    let args = CliArgs::try_parse_from(argv.iter().copied())
        .map_err(|e| BsonconvError::Generic(e.to_string()))?;
    CliInterface::from_args(args)?.run()
}

fn path_str(path: &Path) -> &str {
    path.to_str().unwrap()
}

fn write_sample(dir: &TempDir) -> std::path::PathBuf {
    let bytes = bsonconv::json_to_bson(
        r#"{"name": "Ada", "born": {"$date": "1815-12-10T00:00:00Z"}, "n": {"$numberLong": "7"}}"#,
    )
    .unwrap();
    let path = dir.path().join("sample.bson");
    fs::write(&path, bytes).unwrap();
    path
}

#[test]
fn test_convert_round_trip_through_files() {
    let dir = TempDir::new().unwrap();
    let bson_path = write_sample(&dir);
    let json_path = dir.path().join("sample.json");
    let back_path = dir.path().join("back.bson");

    run(&["bsonconv", "-q", "convert", path_str(&bson_path)]).unwrap();
    assert!(json_path.exists());

    run(&[
        "bsonconv",
        "-q",
        "convert",
        path_str(&json_path),
        "-o",
        path_str(&back_path),
    ])
    .unwrap();
    assert_eq!(fs::read(&bson_path).unwrap(), fs::read(&back_path).unwrap());
}

#[test]
fn test_convert_with_explicit_target() {
    let dir = TempDir::new().unwrap();
    let bson_path = write_sample(&dir);
    let dump = dir.path().join("dump.dat");
    fs::rename(&bson_path, &dump).unwrap();
    let out = dir.path().join("out.json");

    assert!(run(&["bsonconv", "-q", "convert", path_str(&dump)]).is_err());
    run(&[
        "bsonconv",
        "-q",
        "convert",
        path_str(&dump),
        "--to",
        "json",
        "-o",
        path_str(&out),
    ])
    .unwrap();
    assert!(fs::read_to_string(&out).unwrap().contains("\"Ada\""));
}

#[test]
fn test_input_size_ceiling() {
    let dir = TempDir::new().unwrap();
    let bson_path = write_sample(&dir);

    let err = run(&["bsonconv", "-q", "--max-size", "8", "convert", path_str(&bson_path)])
        .unwrap_err();
    assert!(matches!(err, BsonconvError::Input(InputError::TooLarge { limit: 8, .. })));
}

#[test]
fn test_output_may_not_overwrite_input() {
    let dir = TempDir::new().unwrap();
    let bson_path = write_sample(&dir);

    let err = run(&[
        "bsonconv",
        "-q",
        "convert",
        path_str(&bson_path),
        "-o",
        path_str(&bson_path),
    ])
    .unwrap_err();
    assert!(matches!(err, BsonconvError::Input(InputError::SameOutput(_))));
}

#[test]
fn test_validate_reports_bad_files() {
    let dir = TempDir::new().unwrap();
    let bson_path = write_sample(&dir);
    run(&["bsonconv", "-q", "validate", path_str(&bson_path)]).unwrap();

    let bad_json = dir.path().join("bad.json");
    fs::write(&bad_json, r#"{"when": {"$date": "yesterday"}}"#).unwrap();
    assert!(matches!(
        run(&["bsonconv", "-q", "validate", path_str(&bad_json)]),
        Err(BsonconvError::Conversion(_))
    ));

    let bad_bson = dir.path().join("bad.bin");
    fs::write(&bad_bson, [0x06, 0, 0, 0, 0]).unwrap();
    assert!(
        run(&["bsonconv", "-q", "validate", path_str(&bad_bson), "--from", "bson"]).is_err()
    );
}

#[test]
fn test_missing_explicit_config_is_an_error() {
    let dir = TempDir::new().unwrap();
    let missing = dir.path().join("nope.toml");
    assert!(run(&["bsonconv", "-c", path_str(&missing), "version"]).is_err());
}
