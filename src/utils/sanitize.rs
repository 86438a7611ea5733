use serde_json::Value;

const VISIBLE_TAIL: usize = 4;
const PREVIEW_EDGE: usize = 8;

/// Sanitizes sensitive fields in JSON payloads for logging
pub fn sanitize_json(value: &Value) -> Value {
    match value {
        Value::Object(map) => {
            let mut sanitized = serde_json::Map::new();
            for (key, val) in map {
                let sanitized_val = if is_sensitive_field(key) {
                    mask_value(val)
                } else {
                    sanitize_json(val)
                };
                sanitized.insert(key.clone(), sanitized_val);
            }
            Value::Object(sanitized)
        }
        Value::Array(arr) => Value::Array(arr.iter().map(sanitize_json).collect()),
        _ => value.clone(),
    }
}

fn is_sensitive_field(key: &str) -> bool {
    matches!(
        key.to_lowercase().as_str(),
        "cardnumber"
            | "card_number"
            | "cvv"
            | "expirymonth"
            | "expiryyear"
            | "encryptionkey"
            | "encryption_key"
            | "merchant_request"
            | "merchantrequest"
            | "request"
            | "hash"
            | "response"
    )
}

fn mask_value(value: &Value) -> Value {
    match value {
        Value::String(s) if s.chars().count() <= VISIBLE_TAIL * 2 => {
            Value::String("****".to_string())
        }
        Value::String(s) => Value::String(mask_tail(s)),
        Value::Null => Value::Null,
        _ => Value::String("****".to_string()),
    }
}

/// Masks all but the last four characters.
pub fn mask_tail(value: &str) -> String {
    let len = value.chars().count();
    if len <= VISIBLE_TAIL {
        return value.to_string();
    }
    let tail: String = value.chars().skip(len - VISIBLE_TAIL).collect();
    format!("{}{}", "*".repeat(len - VISIBLE_TAIL), tail)
}

/// Shortens long ciphertexts to `head…tail` for log lines.
pub fn preview(value: &str) -> String {
    let len = value.chars().count();
    if len <= PREVIEW_EDGE * 2 {
        return value.to_string();
    }
    let head: String = value.chars().take(PREVIEW_EDGE).collect();
    let tail: String = value.chars().skip(len - PREVIEW_EDGE).collect();
    format!("{}…{}", head, tail)
}
