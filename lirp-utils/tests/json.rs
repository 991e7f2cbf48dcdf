use lirp_utils::{dejsonify, jsonify, load_json_arg, read_json_file};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::fs;

#[derive(Serialize, Deserialize, Debug, PartialEq)]
struct Sample {
    zeta: u32,
    alpha: Vec<f64>,
}

#[test]
fn test_jsonify_sorts_keys() {
    let value = json!({"b": 1, "a": {"d": 2, "c": [ {"y": 1, "x": 2} ]}});
    assert_eq!(jsonify(&value), r#"{"a":{"c":[{"x":2,"y":1}],"d":2},"b":1}"#);
}

#[test]
fn test_dejsonify_roundtrip() {
    let sample = Sample {
        zeta: 3,
        alpha: vec![0.5, 1.5],
    };
    let parsed: Sample = dejsonify(&jsonify(&sample)).unwrap();
    assert_eq!(parsed, sample);
}

#[test]
fn test_load_json_arg_inline() {
    let value: Value = load_json_arg(r#"{"LB": 10.0}"#).unwrap();
    assert_eq!(value["LB"], json!(10.0));
}

#[test]
fn test_load_json_arg_inline_invalid() {
    assert!(load_json_arg::<Value>("{not json").is_err());
}

#[test]
fn test_load_json_arg_from_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.json");
    fs::write(&path, r#"{"zeta": 7, "alpha": []}"#).unwrap();
    let sample: Sample = load_json_arg(path.to_str().unwrap()).unwrap();
    assert_eq!(sample.zeta, 7);
}

#[test]
fn test_read_json_file_missing_names_path() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("missing.json");
    let err = read_json_file::<Value, _>(&path).unwrap_err();
    assert!(err.to_string().contains("missing.json"));
}
