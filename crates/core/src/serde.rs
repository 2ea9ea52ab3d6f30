//! Serde helper functions for request deserialization.
//!
//! Query strings and loosely-built JSON bodies often carry empty strings
//! where a value is simply absent; these helpers treat them as `None`.

use std::fmt::Display;
use std::str::FromStr;

use serde::{Deserialize, Deserializer};

/// Deserialize an optional string, treating empty strings as None.
pub fn deserialize_optional_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let s: Option<String> = Option::deserialize(deserializer)?;
    Ok(s.filter(|s| !s.trim().is_empty()))
}

/// Deserialize an optional value through its `FromStr` impl, treating empty
/// strings as None.
pub fn deserialize_optional_from_str<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: FromStr,
    T::Err: Display,
{
    let s: Option<String> = Option::deserialize(deserializer)?;
    match s {
        Some(s) if !s.trim().is_empty() => s
            .trim()
            .parse::<T>()
            .map(Some)
            .map_err(serde::de::Error::custom),
        _ => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::task::TaskStatus;

    #[derive(Debug, Deserialize, PartialEq)]
    struct TestStruct {
        #[serde(default, deserialize_with = "deserialize_optional_string")]
        string_field: Option<String>,
        #[serde(default, deserialize_with = "deserialize_optional_from_str")]
        status_field: Option<TaskStatus>,
        #[serde(default, deserialize_with = "deserialize_optional_from_str")]
        number_field: Option<i64>,
    }

    #[test]
    fn test_deserialize_optional_string_empty() {
        let json = r#"{"string_field": ""}"#;
        let result: TestStruct = serde_json::from_str(json).unwrap();
        assert_eq!(result.string_field, None);
    }

    #[test]
    fn test_deserialize_optional_string_whitespace() {
        let json = r#"{"string_field": "   "}"#;
        let result: TestStruct = serde_json::from_str(json).unwrap();
        assert_eq!(result.string_field, None);
    }

    #[test]
    fn test_deserialize_optional_string_value() {
        let json = r#"{"string_field": "hello"}"#;
        let result: TestStruct = serde_json::from_str(json).unwrap();
        assert_eq!(result.string_field, Some("hello".to_string()));
    }

    #[test]
    fn test_deserialize_missing_fields() {
        let result: TestStruct = serde_json::from_str("{}").unwrap();
        assert_eq!(
            result,
            TestStruct {
                string_field: None,
                status_field: None,
                number_field: None,
            }
        );
    }

    #[test]
    fn test_deserialize_optional_from_str_enum() {
        let json = r#"{"status_field": "in_progress"}"#;
        let result: TestStruct = serde_json::from_str(json).unwrap();
        assert_eq!(result.status_field, Some(TaskStatus::InProgress));
    }

    #[test]
    fn test_deserialize_optional_from_str_empty() {
        let json = r#"{"status_field": "", "number_field": " "}"#;
        let result: TestStruct = serde_json::from_str(json).unwrap();
        assert_eq!(result.status_field, None);
        assert_eq!(result.number_field, None);
    }

    #[test]
    fn test_deserialize_optional_from_str_number() {
        let json = r#"{"number_field": "-5"}"#;
        let result: TestStruct = serde_json::from_str(json).unwrap();
        assert_eq!(result.number_field, Some(-5));
    }

    #[test]
    fn test_deserialize_optional_from_str_invalid() {
        let json = r#"{"status_field": "archived"}"#;
        let result: Result<TestStruct, _> = serde_json::from_str(json);
        assert!(result.is_err());
    }
}
