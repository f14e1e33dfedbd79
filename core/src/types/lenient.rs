//! Forgiving field decoders for host payloads.
//!
//! The host serializes engine tables, so the same field may arrive as a number or a
//! string, lists may arrive as index-keyed objects, and absent values come through as
//! `null`. Every helper here maps those shapes onto one Rust type and falls back to the
//! type's empty value instead of failing.

use std::collections::BTreeMap;

use serde::de::{self, DeserializeOwned, Deserializer};
use serde::Deserialize;
use serde_json::Value;

/// Truthiness of a loosely typed value: `null`, `false`, `0` and `""` are false.
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0 && !f.is_nan()),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

/// Converts a loosely typed value to text; `null` becomes the empty string.
pub fn value_to_string(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        Value::Number(n) => match (n.as_i64(), n.as_f64()) {
            (Some(i), _) => i.to_string(),
            (None, Some(f)) if f.fract() == 0.0 && f.abs() < 9.0e15 => (f as i64).to_string(),
            _ => n.to_string(),
        },
        Value::Bool(b) => b.to_string(),
        other => other.to_string(),
    }
}

/// Converts a loosely typed value to a number; anything unparseable becomes `0.0`.
pub fn value_to_f64(value: &Value) -> f64 {
    match value {
        Value::Number(n) => n.as_f64().unwrap_or(0.0),
        Value::String(s) => s.trim().parse::<f64>().unwrap_or(0.0),
        Value::Bool(true) => 1.0,
        _ => 0.0,
    }
}

/// Converts a loosely typed value to an integer, truncating fractions.
pub fn value_to_i64(value: &Value) -> i64 {
    match value {
        Value::Number(n) => n
            .as_i64()
            .unwrap_or_else(|| n.as_f64().map(|f| f.trunc() as i64).unwrap_or(0)),
        Value::String(s) => crate::string_operations::parse_int_prefix(s).unwrap_or(0),
        Value::Bool(true) => 1,
        _ => 0,
    }
}

/// Flattens an array, or the values of an index-keyed object, into a list.
///
/// Object entries with integer keys come first in ascending order, other keys follow.
pub fn value_to_list(value: Value) -> Result<Vec<Value>, String> {
    match value {
        Value::Null => Ok(Vec::new()),
        Value::Array(items) => Ok(items),
        Value::Object(map) => {
            let mut entries: Vec<(String, Value)> = map.into_iter().collect();
            entries.sort_by(|(a, _), (b, _)| match (a.parse::<i64>(), b.parse::<i64>()) {
                (Ok(x), Ok(y)) => x.cmp(&y),
                (Ok(_), Err(_)) => std::cmp::Ordering::Less,
                (Err(_), Ok(_)) => std::cmp::Ordering::Greater,
                (Err(_), Err(_)) => a.cmp(b),
            });
            Ok(entries.into_iter().map(|(_, v)| v).collect())
        }
        other => Err(format!("expected a list, got {other}")),
    }
}

pub fn string<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Ok(value_to_string(&Value::deserialize(deserializer)?))
}

pub fn opt_string<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Option<String>, D::Error> {
    let value = Value::deserialize(deserializer)?;
    Ok(Some(value_to_string(&value)).filter(|s| !s.is_empty()))
}

pub fn number<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
    Ok(value_to_f64(&Value::deserialize(deserializer)?))
}

pub fn opt_number<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<f64>, D::Error> {
    let value = Value::deserialize(deserializer)?;
    Ok(match value {
        Value::Null => None,
        other => Some(value_to_f64(&other)),
    })
}

pub fn integer<'de, D: Deserializer<'de>>(deserializer: D) -> Result<i64, D::Error> {
    Ok(value_to_i64(&Value::deserialize(deserializer)?))
}

pub fn truthy<'de, D: Deserializer<'de>>(deserializer: D) -> Result<bool, D::Error> {
    Ok(is_truthy(&Value::deserialize(deserializer)?))
}

/// `null` keeps the field unset, anything else is read for its truthiness.
pub fn opt_truthy<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<bool>, D::Error> {
    let value = Value::deserialize(deserializer)?;
    Ok(match value {
        Value::Null => None,
        other => Some(is_truthy(&other)),
    })
}

pub fn list<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let items = value_to_list(Value::deserialize(deserializer)?).map_err(de::Error::custom)?;
    items
        .into_iter()
        .map(|item| serde_json::from_value(item).map_err(de::Error::custom))
        .collect()
}

/// Reads a nested object, treating `null` as the type's default.
pub fn or_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned + Default,
{
    let value = Value::deserialize(deserializer)?;
    if value.is_null() {
        return Ok(T::default());
    }
    serde_json::from_value(value).map_err(de::Error::custom)
}

/// Reads a string-keyed object into a map, treating `null` (or an empty array) as empty.
pub fn string_map<'de, D, T>(deserializer: D) -> Result<BTreeMap<String, T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    match Value::deserialize(deserializer)? {
        Value::Object(map) => map
            .into_iter()
            .map(|(k, v)| {
                serde_json::from_value(v)
                    .map(|parsed| (k, parsed))
                    .map_err(de::Error::custom)
            })
            .collect(),
        Value::Array(items) if items.is_empty() => Ok(BTreeMap::new()),
        Value::Null => Ok(BTreeMap::new()),
        other => Err(de::Error::custom(format!("expected an object, got {other}"))),
    }
}

/// Reads a gender-code keyed mapping, either `{"0": .., "1": ..}` or `[.., ..]`.
pub fn index_map<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Option<BTreeMap<i64, String>>, D::Error> {
    let mapping: BTreeMap<i64, String> = match Value::deserialize(deserializer)? {
        Value::Null => return Ok(None),
        Value::Array(items) => items
            .iter()
            .enumerate()
            .map(|(i, v)| (i as i64, value_to_string(v)))
            .collect(),
        Value::Object(map) => map
            .iter()
            .filter_map(|(k, v)| k.trim().parse::<i64>().ok().map(|k| (k, value_to_string(v))))
            .collect(),
        _ => return Ok(None),
    };

    Ok(Some(mapping))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn truthiness_follows_script_rules() {
        assert!(!is_truthy(&json!(null)));
        assert!(!is_truthy(&json!(0)));
        assert!(!is_truthy(&json!("")));
        assert!(is_truthy(&json!("head")));
        assert!(is_truthy(&json!([])));
        assert!(is_truthy(&json!(2.5)));
    }

    #[test]
    fn numbers_become_plain_strings() {
        assert_eq!(value_to_string(&json!(12)), "12");
        assert_eq!(value_to_string(&json!(12.0)), "12");
        assert_eq!(value_to_string(&json!("abc")), "abc");
        assert_eq!(value_to_string(&json!(null)), "");
    }

    #[test]
    fn index_keyed_objects_flatten_in_numeric_order() {
        let list = value_to_list(json!({"10": "c", "2": "b", "1": "a"})).unwrap();
        assert_eq!(list, vec![json!("a"), json!("b"), json!("c")]);
    }

    #[test]
    fn scalars_are_not_lists() {
        assert!(value_to_list(json!(5)).is_err());
    }

    #[test]
    fn integers_truncate_and_parse_strings() {
        assert_eq!(value_to_i64(&json!(3.9)), 3);
        assert_eq!(value_to_i64(&json!("42")), 42);
        assert_eq!(value_to_i64(&json!(null)), 0);
    }
}
