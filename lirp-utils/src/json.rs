use anyhow::{anyhow, Context, Result};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use serde_json::{to_string, to_value, Map, Value};
use std::{fs, path::Path};

pub fn dejsonify<'a, T>(json_str: &'a str) -> serde_json::Result<T>
where
    T: Deserialize<'a>,
{
    serde_json::from_str::<T>(json_str)
}

pub fn jsonify<T>(obj: &T) -> String
where
    T: Serialize,
{
    to_string(&jsonify_internal(
        &to_value(obj).expect("to_value failed on serializable object"),
    ))
    .expect("to_string failed on serializable object")
}

pub fn jsonify_internal(json_value: &Value) -> Value {
    match json_value {
        Value::Object(obj) => {
            let mut sorted_map = Map::new();
            let mut keys: Vec<&String> = obj.keys().collect();
            keys.sort();
            for key in keys {
                if let Some(value) = obj.get(key) {
                    sorted_map.insert(key.clone(), jsonify_internal(value));
                }
            }
            Value::Object(sorted_map)
        }
        Value::Array(items) => Value::Array(items.iter().map(jsonify_internal).collect()),
        _ => json_value.clone(),
    }
}

/// Reads and parses a JSON file, naming the file in any error.
pub fn read_json_file<T, P>(path: P) -> Result<T>
where
    T: DeserializeOwned,
    P: AsRef<Path>,
{
    let path = path.as_ref();
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read json file: {}", path.display()))?;
    serde_json::from_str::<T>(&content)
        .with_context(|| format!("Failed to parse json file: {}", path.display()))
}

/// Accepts either an inline JSON string or a path ending in `.json`.
pub fn load_json_arg<T>(arg: &str) -> Result<T>
where
    T: DeserializeOwned,
{
    if arg.ends_with(".json") {
        read_json_file(arg)
    } else {
        serde_json::from_str::<T>(arg).map_err(|e| anyhow!("Failed to parse json string: {}", e))
    }
}
