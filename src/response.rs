//! Gateway response reconciliation: locating the ciphertext in a response, best-effort
//! decryption, and parsing of decrypted payloads.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::crypto::cipher;

/// Top-level keys probed, in order, for a ciphertext in payment-link responses.
pub const RESPONSE_CIPHERTEXT_KEYS: &[&str] = &["response", "data", "payload", "responseData"];

/// Encrypted fields the gateway posts back to the merchant's success/failure URLs.
pub const CALLBACK_ENCRYPTED_FIELDS: &[&str] = &[
    "txn_response",
    "pg_details",
    "txn_details",
    "other_details",
    "fraud_details",
    "card_details",
    "cust_details",
    "bill_details",
    "ship_details",
];

/// Response body as received: parsed JSON when possible, otherwise the literal text.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum RawResponse {
    Json(Value),
    Text(String),
}

impl RawResponse {
    /// Parses `body` as JSON, falling back to the text itself.
    pub fn from_body(body: &str) -> Self {
        match serde_json::from_str::<Value>(body) {
            Ok(value) => RawResponse::Json(value),
            Err(_) => RawResponse::Text(body.to_string()),
        }
    }

    pub fn as_json(&self) -> Option<&Value> {
        match self {
            RawResponse::Json(value) => Some(value),
            RawResponse::Text(_) => None,
        }
    }

    /// The string most likely to hold the encrypted payload.
    ///
    /// A bare string body (JSON string or unparseable text) is itself the candidate;
    /// otherwise the first non-empty string under [`RESPONSE_CIPHERTEXT_KEYS`] wins.
    pub fn ciphertext_candidate(&self) -> Option<&str> {
        let candidate = match self {
            RawResponse::Text(text) => Some(text.as_str()),
            RawResponse::Json(Value::String(text)) => Some(text.as_str()),
            RawResponse::Json(Value::Object(map)) => probe_keys(map, RESPONSE_CIPHERTEXT_KEYS),
            RawResponse::Json(_) => None,
        };
        candidate.filter(|text| !text.trim().is_empty())
    }
}

fn probe_keys<'a>(map: &'a Map<String, Value>, keys: &[&str]) -> Option<&'a str> {
    keys.iter()
        .filter_map(|key| map.get(*key).and_then(Value::as_str))
        .find(|value| !value.is_empty())
}

/// Envelope returned by the direct-API endpoint.
///
/// Scalar fields accept `null`, numbers and booleans as well as strings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ApiIntegrationResponse {
    #[serde(deserialize_with = "lenient_string")]
    pub merchant_id: String,
    #[serde(deserialize_with = "lenient_string")]
    pub status: String,
    #[serde(deserialize_with = "lenient_string")]
    pub status_message: String,
    #[serde(deserialize_with = "lenient_optional_string")]
    pub response: Option<String>,
}

fn scalar_to_string(value: Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(text) => Some(text),
        other => Some(other.to_string()),
    }
}

fn lenient_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Ok(scalar_to_string(Value::deserialize(deserializer)?).unwrap_or_default())
}

fn lenient_optional_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Ok(scalar_to_string(Value::deserialize(deserializer)?))
}

/// Outcome of one gateway exchange. Built per call and handed back to the caller.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GatewayExchangeResult {
    pub raw: RawResponse,
    /// `None` when decryption was not requested, nothing was found to decrypt, or it failed.
    pub decrypted_response: Option<String>,
    pub endpoint: String,
}

impl GatewayExchangeResult {
    /// Reads the raw body as the direct-API envelope.
    pub fn api_response(&self) -> Option<ApiIntegrationResponse> {
        self.raw
            .as_json()
            .and_then(|value| serde_json::from_value(value.clone()).ok())
    }

    pub fn parsed_decrypted(&self) -> Option<ParsedGatewayResponse> {
        self.decrypted_response
            .as_deref()
            .map(parse_decrypted_response)
    }
}

/// Decrypts `ciphertext`, absorbing any failure into `None`.
pub fn try_decrypt(ciphertext: &str, base64_key: &str) -> Option<String> {
    match cipher::decrypt(ciphertext, base64_key) {
        Ok(plain) => Some(plain),
        Err(e) => {
            tracing::debug!("Response decryption skipped: {}", e);
            None
        }
    }
}

/// A decrypted gateway payload interpreted in whichever format it parses as.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ParsedGatewayResponse {
    pub raw: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub as_json: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub as_query: Option<BTreeMap<String, String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub as_sections: Option<Vec<String>>,
}

/// Tries JSON, then `k=v&...` query strings, then `~`-sectioned text.
pub fn parse_decrypted_response(input: &str) -> ParsedGatewayResponse {
    let mut parsed = ParsedGatewayResponse {
        raw: input.to_string(),
        as_json: None,
        as_query: None,
        as_sections: None,
    };

    if let Ok(value) = serde_json::from_str::<Value>(input) {
        parsed.as_json = Some(value);
        return parsed;
    }

    if input.contains('=') && input.contains('&') {
        let query: BTreeMap<String, String> = url::form_urlencoded::parse(input.as_bytes())
            .into_owned()
            .collect();
        parsed.as_query = Some(query);
        return parsed;
    }

    if input.contains('~') {
        parsed.as_sections = Some(input.split('~').map(str::to_string).collect());
    }

    parsed
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", content = "value", rename_all = "snake_case")]
pub enum CallbackField {
    Decrypted(String),
    Undecryptable,
}

/// Decrypts the known encrypted fields of a success/failure callback form.
/// Absent or empty fields are left out of the result.
pub fn decrypt_callback_fields<'a, I>(fields: I, base64_key: &str) -> BTreeMap<String, CallbackField>
where
    I: IntoIterator<Item = (&'a str, &'a str)>,
{
    fields
        .into_iter()
        .filter(|(name, value)| CALLBACK_ENCRYPTED_FIELDS.contains(name) && !value.is_empty())
        .map(|(name, value)| {
            let field = match try_decrypt(value, base64_key) {
                Some(plain) => CallbackField::Decrypted(plain),
                None => CallbackField::Undecryptable,
            };
            (name.to_string(), field)
        })
        .collect()
}
