use thiserror::Error;

use crate::crypto::CryptoError;
use crate::transport::TransportError;
use crate::validation::ValidationError;

/// Failures surfaced by [`crate::client::GatewayClient`].
///
/// Response decryption problems never show up here. They only clear the
/// `decrypted_response` field of a result.
#[derive(Error, Debug)]
pub enum GatewayError {
    #[error("Invalid input: {0}")]
    Input(#[from] ValidationError),

    #[error("Crypto error: {0}")]
    Crypto(#[from] CryptoError),

    #[error("Transport error: {0}")]
    Transport(#[from] TransportError),

    #[error("Gateway returned HTTP {status}: {body}")]
    Http { status: u16, body: String },

    #[error("Invalid response from gateway: {0}")]
    InvalidResponse(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl GatewayError {
    /// True when the failure happened before anything was sent.
    pub fn is_caller_fault(&self) -> bool {
        matches!(
            self,
            GatewayError::Input(_) | GatewayError::Crypto(_) | GatewayError::Serialization(_)
        )
    }

    pub fn http_status(&self) -> Option<u16> {
        match self {
            GatewayError::Http { status, .. } => Some(*status),
            _ => None,
        }
    }
}
