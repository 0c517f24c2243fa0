//! Sensitive data redaction for captured request bodies.

/// Sentinel written in place of a redacted value.
///
/// Values are replaced, never removed: the presence of a redacted field
/// without its value is itself informative.
pub const REDACTED_SENTINEL: &str = "[REDACTED]";

/// Fields that must never appear in the audit trail.
///
/// Matching is a case-insensitive substring test on the key, so camelCase
/// client payloads (`currentPassword`) are covered as well.
pub const SENSITIVE_FIELDS: &[&str] = &[
    "password",
    "currentpassword",
    "newpassword",
    "confirmpassword",
    "token",
    "secret",
];

/// Redact sensitive fields from a JSON value, recursively.
pub fn redact_json(value: &mut serde_json::Value) {
    match value {
        serde_json::Value::Object(map) => {
            for (key, val) in map.iter_mut() {
                let key_lower = key.to_lowercase();
                if SENSITIVE_FIELDS.iter().any(|f| key_lower.contains(f)) {
                    *val = serde_json::Value::String(REDACTED_SENTINEL.to_string());
                } else {
                    redact_json(val);
                }
            }
        }
        serde_json::Value::Array(arr) => {
            for val in arr.iter_mut() {
                redact_json(val);
            }
        }
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn redacts_nested_fields() {
        let mut value = json!({
            "email": "user@example.com",
            "password": "secret123",
            "profile": {
                "apiToken": "key123",
                "name": "Jane Doe"
            },
            "nested": {
                "user": {
                    "currentPassword": "old_secret"
                }
            }
        });

        redact_json(&mut value);

        assert_eq!(value["email"], "user@example.com");
        assert_eq!(value["password"], REDACTED_SENTINEL);
        assert_eq!(value["profile"]["apiToken"], REDACTED_SENTINEL);
        assert_eq!(value["profile"]["name"], "Jane Doe");
        assert_eq!(value["nested"]["user"]["currentPassword"], REDACTED_SENTINEL);
    }

    #[test]
    fn redacts_inside_arrays() {
        let mut value = json!([
            {"username": "user1", "password": "secret1"},
            {"username": "user2", "token": "abc123"}
        ]);

        redact_json(&mut value);

        assert_eq!(value[0]["username"], "user1");
        assert_eq!(value[0]["password"], REDACTED_SENTINEL);
        assert_eq!(value[1]["username"], "user2");
        assert_eq!(value[1]["token"], REDACTED_SENTINEL);
    }

    #[test]
    fn redacted_keys_are_kept_not_dropped() {
        let mut value = json!({"confirmPassword": "x"});
        redact_json(&mut value);
        assert!(value.as_object().unwrap().contains_key("confirmPassword"));
        assert_eq!(value["confirmPassword"], REDACTED_SENTINEL);
    }

    #[test]
    fn scalars_pass_through() {
        let mut value = json!("just a string");
        redact_json(&mut value);
        assert_eq!(value, json!("just a string"));
    }
}
