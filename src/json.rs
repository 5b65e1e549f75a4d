//! Access helpers over raw JSON record bags.
//!
//! Records arrive from the catalog API as untyped [`serde_json::Value`]
//! bags. These helpers centralize the common access patterns: optional
//! lookups that tolerate missing or mistyped members, and required lookups
//! that turn a missing member into a [`IndexError::Resolution`] carrying
//! enough context to identify the offending record.

use crate::error::{IndexError, Result};
use serde_json::Value;

/// Get a string member of a JSON object, if present and a string.
#[must_use]
pub fn str_field<'v>(obj: &'v Value, key: &str) -> Option<&'v str> {
    obj.get(key).and_then(Value::as_str)
}

/// Get a boolean member of a JSON object, defaulting to `false` when the
/// member is absent or not a boolean.
#[must_use]
pub fn bool_field(obj: &Value, key: &str) -> bool {
    obj.get(key).and_then(Value::as_bool).unwrap_or(false)
}

/// Get an integer member of a JSON object, if present and integral.
#[must_use]
pub fn int_field(obj: &Value, key: &str) -> Option<i64> {
    obj.get(key).and_then(Value::as_i64)
}

/// Get an array member of a JSON object, if present and an array.
#[must_use]
pub fn array_field<'v>(obj: &'v Value, key: &str) -> Option<&'v [Value]> {
    obj.get(key).and_then(Value::as_array).map(Vec::as_slice)
}

/// Follow a path of object keys to a string leaf.
#[must_use]
pub fn str_at<'v>(obj: &'v Value, path: &[&str]) -> Option<&'v str> {
    let mut cursor = obj;
    for key in path {
        cursor = cursor.get(key)?;
    }
    cursor.as_str()
}

/// Get a required string member, failing with a [`IndexError::Resolution`]
/// that names the owning entity when the member is absent.
///
/// # Errors
///
/// Returns `Err` if the member is missing or not a string.
pub fn expect_str<'v>(obj: &'v Value, key: &str, owner: &str) -> Result<&'v str> {
    str_field(obj, key)
        .ok_or_else(|| IndexError::Resolution(format!("{owner} is missing required member '{key}'")))
}

/// Get a required integer member, failing with a [`IndexError::Resolution`]
/// that names the owning entity when the member is absent.
///
/// # Errors
///
/// Returns `Err` if the member is missing or not an integer.
pub fn expect_int(obj: &Value, key: &str, owner: &str) -> Result<i64> {
    int_field(obj, key)
        .ok_or_else(|| IndexError::Resolution(format!("{owner} is missing required member '{key}'")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_str_field_present() {
        let v = json!({"title": "Papers of Someone"});
        assert_eq!(str_field(&v, "title"), Some("Papers of Someone"));
    }

    #[test]
    fn test_str_field_wrong_type() {
        let v = json!({"title": 7});
        assert_eq!(str_field(&v, "title"), None);
    }

    #[test]
    fn test_bool_field_defaults_false() {
        let v = json!({});
        assert!(!bool_field(&v, "publish"));
        let v = json!({"publish": true});
        assert!(bool_field(&v, "publish"));
    }

    #[test]
    fn test_str_at_path() {
        let v = json!({"sub_container": {"top_container": {"ref": "/repositories/3/top_containers/9"}}});
        assert_eq!(
            str_at(&v, &["sub_container", "top_container", "ref"]),
            Some("/repositories/3/top_containers/9")
        );
        assert_eq!(str_at(&v, &["sub_container", "missing", "ref"]), None);
    }

    #[test]
    fn test_expect_str_error_names_owner() {
        let v = json!({});
        let err = expect_str(&v, "title", "/repositories/3/resources/1").unwrap_err();
        assert!(err.to_string().contains("/repositories/3/resources/1"));
        assert!(err.to_string().contains("title"));
    }
}
