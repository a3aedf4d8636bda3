//! Snapshot sanitization for audit records

use serde_json::{Map, Value, json};

/// Top-level keys containing any of these markers are blanked.
const SENSITIVE_MARKERS: &[&str] = &["password", "token", "secret", "key", "auth"];

/// Serialized responses above this size are replaced with a stub.
const MAX_SNAPSHOT_CHARS: usize = 10_000;

fn is_sensitive(key: &str) -> bool {
    let key = key.to_lowercase();
    SENSITIVE_MARKERS.iter().any(|m| key.contains(m))
}

/// Blank sensitive top-level fields. Nested objects are left alone; the
/// snapshots audited here are flat request/response DTOs.
pub fn sanitize(value: &Value) -> Value {
    match value {
        Value::Object(map) => {
            let mut out = Map::with_capacity(map.len());
            for (k, v) in map {
                if is_sensitive(k) {
                    out.insert(k.clone(), Value::String("***".to_string()));
                } else {
                    out.insert(k.clone(), v.clone());
                }
            }
            Value::Object(out)
        }
        other => other.clone(),
    }
}

/// Replace an oversized response snapshot with a marker so audit storage
/// stays bounded.
pub fn truncate_oversized(value: Value) -> Value {
    let size = value.to_string().chars().count();
    if size <= MAX_SNAPSHOT_CHARS {
        return value;
    }
    json!({
        "truncated": true,
        "size": size,
        "type": json_type_name(&value),
    })
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_blanks_sensitive_keys() {
        let input = json!({
            "username": "alice",
            "password": "hunter2",
            "old_password": "hunter1",
            "api_token": "tok-123",
            "phone": "555-0100"
        });
        let out = sanitize(&input);
        assert_eq!(out["username"], "alice");
        assert_eq!(out["password"], "***");
        assert_eq!(out["old_password"], "***");
        assert_eq!(out["api_token"], "***");
        assert_eq!(out["phone"], "555-0100");
    }

    #[test]
    fn test_sanitize_is_case_insensitive() {
        let out = sanitize(&json!({"Authorization": "Bearer x", "SecretCode": "y"}));
        assert_eq!(out["Authorization"], "***");
        assert_eq!(out["SecretCode"], "***");
    }

    #[test]
    fn test_sanitize_top_level_only() {
        let input = json!({"data": {"password": "nested"}});
        let out = sanitize(&input);
        assert_eq!(out["data"]["password"], "nested");
    }

    #[test]
    fn test_sanitize_passes_non_objects_through() {
        assert_eq!(sanitize(&json!([1, 2, 3])), json!([1, 2, 3]));
        assert_eq!(sanitize(&json!("plain")), json!("plain"));
    }

    #[test]
    fn test_truncate_small_value_unchanged() {
        let value = json!({"message": "OK"});
        assert_eq!(truncate_oversized(value.clone()), value);
    }

    #[test]
    fn test_truncate_oversized_value() {
        let value = json!({"blob": "x".repeat(20_000)});
        let out = truncate_oversized(value);
        assert_eq!(out["truncated"], true);
        assert_eq!(out["type"], "object");
        assert!(out["size"].as_u64().unwrap() > 10_000);
    }
}
