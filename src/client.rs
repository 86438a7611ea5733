use std::sync::Arc;

use serde::Serialize;
use serde_json::json;

use crate::codec::{api, hosted_form};
use crate::config::ClientConfig;
use crate::crypto::{cipher, digest};
use crate::domain::payment_link::{PaymentByLinkRecord, PaymentLinkRecord};
use crate::domain::transaction::{TransactionRecord, CHANNEL_API};
use crate::endpoints::{self, FlowKind};
use crate::error::GatewayError;
use crate::form::BuiltHostedForm;
use crate::response::{try_decrypt, ApiIntegrationResponse, GatewayExchangeResult, RawResponse};
use crate::transport::{ReqwestTransport, Transport, TransportRequest, TransportResponse};
use crate::utils::sanitize::{preview, sanitize_json};

/// Header carrying the merchant id in cleartext on payment-link requests.
pub const LINK_MERCHANT_HEADER: &str = "me_id";

/// Client for the YagoutPay hosted-form, direct-API and payment-link flows.
///
/// Holds only immutable configuration and a shared transport, so one instance can
/// serve concurrent calls.
#[derive(Clone)]
pub struct GatewayClient {
    config: ClientConfig,
    transport: Arc<dyn Transport>,
}

impl GatewayClient {
    /// Creates a client backed by a pooled `reqwest` transport.
    pub fn new(config: ClientConfig) -> Result<Self, GatewayError> {
        let transport = ReqwestTransport::new(config.allow_insecure_tls)?;
        Ok(Self::with_transport(config, Arc::new(transport)))
    }

    pub fn with_transport(config: ClientConfig, transport: Arc<dyn Transport>) -> Self {
        GatewayClient { config, transport }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn endpoint(&self, flow: FlowKind) -> &str {
        match (flow, &self.config.action_url_override) {
            (FlowKind::HostedForm, Some(url)) => url,
            _ => endpoints::resolve(self.config.environment, flow),
        }
    }

    /// Builds the encrypted hosted-form payload. Performs no network I/O.
    pub fn build_hosted_form(
        &self,
        record: &TransactionRecord,
    ) -> Result<BuiltHostedForm, GatewayError> {
        record.validate()?;

        let key = &self.config.encryption_key;
        let merchant_request_plain = hosted_form::encode(record);
        let merchant_request = cipher::encrypt(&merchant_request_plain, key)?;
        let hash_input = digest::hash_input(record);
        let hash_hex = digest::sha256_hex(&hash_input);
        let hash = cipher::encrypt(&hash_hex, key)?;

        tracing::debug!(
            "Built hosted form for order {} ({})",
            record.order_number,
            preview(&merchant_request)
        );

        Ok(BuiltHostedForm {
            me_id: record.merchant_id.clone(),
            merchant_request_plain,
            merchant_request,
            hash_input,
            hash_hex,
            hash,
            action_url: self.endpoint(FlowKind::HostedForm).to_string(),
        })
    }

    /// The record actually submitted on the direct-API flow: the client's merchant id,
    /// `API` channel and default `pg_details` wherever the record leaves them empty.
    pub fn prepare_api_record(&self, record: &TransactionRecord) -> TransactionRecord {
        TransactionRecord {
            merchant_id: self.config.merchant_id.clone(),
            channel: CHANNEL_API.to_string(),
            payment: record.payment.or_defaults(&endpoints::api_payment_defaults()),
            ..record.clone()
        }
    }

    /// Sends a transaction to the direct-API endpoint.
    ///
    /// Non-2xx answers fail with [`GatewayError::Http`]. When `decrypt_response` is set
    /// and the envelope carries a non-empty `response`, its decryption is attempted;
    /// a failure leaves `decrypted_response` as `None`.
    pub async fn send_api_request(
        &self,
        record: &TransactionRecord,
        endpoint_override: Option<&str>,
        decrypt_response: bool,
    ) -> Result<GatewayExchangeResult, GatewayError> {
        let endpoint = endpoint_override
            .unwrap_or_else(|| self.endpoint(FlowKind::DirectApi))
            .to_string();

        let record = self.prepare_api_record(record);
        record.validate()?;

        let plain = api::encode(&record)?;
        let merchant_request = cipher::encrypt(&plain, &self.config.encryption_key)?;
        let envelope = json!({
            "merchantId": self.config.merchant_id,
            "merchantRequest": merchant_request,
        });

        tracing::info!(
            "Sending API request for order {} to {}",
            record.order_number,
            endpoint
        );
        tracing::debug!("API request envelope: {}", sanitize_json(&envelope));

        let request = TransportRequest::post_json(&endpoint, envelope.to_string());
        let response = self.exchange(request).await?;

        let raw: serde_json::Value = serde_json::from_str(&response.body).map_err(|e| {
            GatewayError::InvalidResponse(format!("expected JSON envelope: {}", e))
        })?;
        let parsed: ApiIntegrationResponse = serde_json::from_value(raw.clone()).map_err(|e| {
            GatewayError::InvalidResponse(format!("unexpected envelope shape: {}", e))
        })?;

        tracing::info!(
            "API response status: {} message: {}",
            parsed.status,
            parsed.status_message
        );

        let decrypted_response = match parsed.response.as_deref() {
            Some(ciphertext) if decrypt_response && !ciphertext.is_empty() => {
                try_decrypt(ciphertext, &self.config.encryption_key)
            }
            _ => None,
        };

        Ok(GatewayExchangeResult {
            raw: RawResponse::Json(raw),
            decrypted_response,
            endpoint,
        })
    }

    /// Creates a static QR payment link.
    pub async fn send_payment_link(
        &self,
        record: &PaymentLinkRecord,
        endpoint_override: Option<&str>,
    ) -> Result<GatewayExchangeResult, GatewayError> {
        record.validate()?;
        let endpoint = endpoint_override.unwrap_or_else(|| self.endpoint(FlowKind::StaticLink));
        self.send_link(record, &record.me_code, endpoint).await
    }

    /// Creates a dynamic pay-by-link request.
    pub async fn send_payment_by_link(
        &self,
        record: &PaymentByLinkRecord,
        endpoint_override: Option<&str>,
    ) -> Result<GatewayExchangeResult, GatewayError> {
        record.validate()?;
        let endpoint = endpoint_override.unwrap_or_else(|| self.endpoint(FlowKind::DynamicLink));
        self.send_link(record, &record.me_id, endpoint).await
    }

    async fn send_link<T: Serialize>(
        &self,
        record: &T,
        merchant_id: &str,
        endpoint: &str,
    ) -> Result<GatewayExchangeResult, GatewayError> {
        let plain = serde_json::to_string(record)?;
        let encrypted = cipher::encrypt(&plain, &self.config.encryption_key)?;
        let body = json!({ "request": encrypted }).to_string();

        tracing::info!("Sending payment link request for {} to {}", merchant_id, endpoint);

        let request = TransportRequest::post_json(endpoint, body)
            .with_header(LINK_MERCHANT_HEADER, merchant_id);
        let response = self.exchange(request).await?;

        let raw = RawResponse::from_body(&response.body);
        let decrypted_response = raw
            .ciphertext_candidate()
            .and_then(|candidate| try_decrypt(candidate, &self.config.encryption_key));

        Ok(GatewayExchangeResult {
            raw,
            decrypted_response,
            endpoint: endpoint.to_string(),
        })
    }

    async fn exchange(&self, request: TransportRequest) -> Result<TransportResponse, GatewayError> {
        let response = self.transport.send(request).await?;
        if !response.is_success() {
            tracing::warn!("Gateway returned HTTP {}", response.status);
            return Err(GatewayError::Http {
                status: response.status,
                body: response.body,
            });
        }
        Ok(response)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::transaction::{PaymentMethod, TransactionRequired, CHANNEL_WEB};
    use crate::endpoints::Environment;
    use crate::transport::TransportError;
    use async_trait::async_trait;
    use std::sync::Mutex;

    const KEY: &str = "AAECAwQFBgcICQoLDA0ODxAREhMUFRYXGBkaGxwdHh8=";

    /// Records every request and answers with a canned response.
    struct StubTransport {
        status: u16,
        body: String,
        sent: Mutex<Vec<TransportRequest>>,
    }

    impl StubTransport {
        fn new(status: u16, body: &str) -> Arc<Self> {
            Arc::new(Self {
                status,
                body: body.to_string(),
                sent: Mutex::new(Vec::new()),
            })
        }

        fn last_request(&self) -> TransportRequest {
            self.sent.lock().unwrap().last().cloned().unwrap()
        }
    }

    #[async_trait]
    impl Transport for StubTransport {
        async fn send(
            &self,
            request: TransportRequest,
        ) -> Result<TransportResponse, TransportError> {
            self.sent.lock().unwrap().push(request);
            Ok(TransportResponse {
                status: self.status,
                body: self.body.clone(),
            })
        }
    }

    struct FailingTransport;

    #[async_trait]
    impl Transport for FailingTransport {
        async fn send(&self, _: TransportRequest) -> Result<TransportResponse, TransportError> {
            Err(TransportError::Timeout("deadline elapsed".to_string()))
        }
    }

    fn record(channel: &str) -> TransactionRecord {
        TransactionRecord::new(TransactionRequired {
            aggregator_id: "yagout".to_string(),
            merchant_id: "M1".to_string(),
            order_number: "O1".to_string(),
            amount: "1.00".to_string(),
            country: "ETH".to_string(),
            currency: "ETB".to_string(),
            transaction_type: "SALE".to_string(),
            success_url: "https://shop.example/success".to_string(),
            failure_url: "https://shop.example/failure".to_string(),
            channel: channel.to_string(),
        })
        .unwrap()
    }

    fn client(transport: Arc<dyn Transport>) -> GatewayClient {
        GatewayClient::with_transport(ClientConfig::new("M1", KEY), transport)
    }

    #[test]
    fn test_build_hosted_form() {
        let client = client(StubTransport::new(200, ""));
        let built = client.build_hosted_form(&record(CHANNEL_WEB)).unwrap();

        assert_eq!(built.me_id, "M1");
        assert_eq!(built.hash_input, "M1~O1~1.00~ETH~ETB");
        assert_eq!(
            built.hash_hex,
            "105b528939e5bbbd6e67be971c398419b6709831d9c5bae21b2e8debc25d00fc"
        );
        assert_eq!(cipher::decrypt(&built.hash, KEY).unwrap(), built.hash_hex);
        assert_eq!(
            cipher::decrypt(&built.merchant_request, KEY).unwrap(),
            built.merchant_request_plain
        );
        assert_eq!(
            built.action_url,
            endpoints::resolve(Environment::Test, FlowKind::HostedForm)
        );
    }

    #[test]
    fn test_build_hosted_form_uses_action_override() {
        let config = ClientConfig {
            action_url_override: Some("https://proxy.example/form".to_string()),
            ..ClientConfig::new("M1", KEY)
        };
        let client = GatewayClient::with_transport(config, StubTransport::new(200, ""));
        let built = client.build_hosted_form(&record(CHANNEL_WEB)).unwrap();
        assert_eq!(built.action_url, "https://proxy.example/form");
        assert_eq!(
            client.endpoint(FlowKind::DirectApi),
            endpoints::resolve(Environment::Test, FlowKind::DirectApi)
        );
    }

    #[test]
    fn test_build_hosted_form_rejects_blanked_required_field() {
        let client = client(StubTransport::new(200, ""));
        let record = TransactionRecord {
            amount: String::new(),
            ..record(CHANNEL_WEB)
        };
        let err = client.build_hosted_form(&record).unwrap_err();
        assert!(matches!(err, GatewayError::Input(ref e) if e.field == "amount"));
    }

    #[test]
    fn test_build_hosted_form_bad_key_is_crypto_error() {
        let client = GatewayClient::with_transport(
            ClientConfig::new("M1", "c2hvcnQ="),
            StubTransport::new(200, ""),
        );
        let err = client.build_hosted_form(&record(CHANNEL_WEB)).unwrap_err();
        assert!(matches!(err, GatewayError::Crypto(_)));
    }

    #[test]
    fn test_prepare_api_record_fills_defaults() {
        let client = GatewayClient::with_transport(
            ClientConfig::new("M9", KEY),
            StubTransport::new(200, ""),
        );
        let source = TransactionRecord {
            payment: PaymentMethod {
                wallet_type: "cbe".to_string(),
                ..Default::default()
            },
            ..record(CHANNEL_WEB)
        };
        let prepared = client.prepare_api_record(&source);

        assert_eq!(prepared.merchant_id, "M9");
        assert_eq!(prepared.channel, CHANNEL_API);
        assert_eq!(prepared.payment.pg_id, endpoints::DEFAULT_PG_ID);
        assert_eq!(prepared.payment.pay_mode, "WA");
        assert_eq!(prepared.payment.scheme_id, "7");
        assert_eq!(prepared.payment.wallet_type, "cbe");
        assert_eq!(prepared.order_number, source.order_number);
    }

    #[tokio::test]
    async fn test_send_api_request_envelope() {
        let transport = StubTransport::new(
            200,
            r#"{"merchantId":"M1","status":"0","statusMessage":"ok","response":"eFJkItNHZsVE1CTuP1Pokw=="}"#,
        );
        let client = client(transport.clone());
        let result = client
            .send_api_request(&record(CHANNEL_WEB), None, true)
            .await
            .unwrap();

        assert_eq!(result.decrypted_response.as_deref(), Some("hello"));
        assert_eq!(
            result.endpoint,
            endpoints::resolve(Environment::Test, FlowKind::DirectApi)
        );

        let sent = transport.last_request();
        assert_eq!(sent.url, result.endpoint);
        assert_eq!(sent.header("Content-Type"), Some("application/json"));
        let body: serde_json::Value = serde_json::from_str(&sent.body).unwrap();
        assert_eq!(body["merchantId"], "M1");
        let plain = cipher::decrypt(body["merchantRequest"].as_str().unwrap(), KEY).unwrap();
        let payload: serde_json::Value = serde_json::from_str(&plain).unwrap();
        assert_eq!(payload["txn_details"]["channel"], "API");
        assert_eq!(payload["pg_details"]["wallet_type"], "telebirr");
    }

    #[tokio::test]
    async fn test_send_api_request_empty_response_not_decrypted() {
        let transport = StubTransport::new(
            200,
            r#"{"merchantId":"M1","status":"0","statusMessage":"ok","response":""}"#,
        );
        let result = client(transport)
            .send_api_request(&record(CHANNEL_API), None, true)
            .await
            .unwrap();
        assert!(result.decrypted_response.is_none());
        assert_eq!(result.api_response().unwrap().status_message, "ok");
    }

    #[tokio::test]
    async fn test_send_api_request_skips_decryption_when_not_requested() {
        let transport = StubTransport::new(
            200,
            r#"{"merchantId":"M1","status":"0","statusMessage":"ok","response":"eFJkItNHZsVE1CTuP1Pokw=="}"#,
        );
        let result = client(transport)
            .send_api_request(&record(CHANNEL_API), None, false)
            .await
            .unwrap();
        assert!(result.decrypted_response.is_none());
    }

    #[tokio::test]
    async fn test_send_api_request_absorbs_decryption_failure() {
        let transport = StubTransport::new(
            200,
            r#"{"merchantId":"M1","status":"1","statusMessage":"failed","response":"@@not-base64@@"}"#,
        );
        let result = client(transport)
            .send_api_request(&record(CHANNEL_API), None, true)
            .await
            .unwrap();
        assert!(result.decrypted_response.is_none());
    }

    #[tokio::test]
    async fn test_send_api_request_http_error() {
        let transport = StubTransport::new(500, "err");
        let err = client(transport)
            .send_api_request(&record(CHANNEL_API), Some("https://override.example/api"), true)
            .await
            .unwrap_err();
        match err {
            GatewayError::Http { status, body } => {
                assert_eq!(status, 500);
                assert_eq!(body, "err");
            }
            other => panic!("expected HTTP error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_send_api_request_non_json_body_is_invalid_response() {
        let transport = StubTransport::new(200, "<html>maintenance</html>");
        let err = client(transport)
            .send_api_request(&record(CHANNEL_API), None, true)
            .await
            .unwrap_err();
        assert!(matches!(err, GatewayError::InvalidResponse(_)));
    }

    #[tokio::test]
    async fn test_send_api_request_transport_error_propagates() {
        let err = client(Arc::new(FailingTransport))
            .send_api_request(&record(CHANNEL_API), None, true)
            .await
            .unwrap_err();
        assert!(matches!(err, GatewayError::Transport(TransportError::Timeout(_))));
    }

    #[tokio::test]
    async fn test_send_payment_link_wraps_encrypted_document() {
        let transport = StubTransport::new(200, r#"{"status":"ok"}"#);
        let client = client(transport.clone());
        let link = PaymentLinkRecord::new("yagou381", "ME77", "10");
        let result = client.send_payment_link(&link, None).await.unwrap();

        assert!(result.decrypted_response.is_none());
        let sent = transport.last_request();
        assert_eq!(sent.header(LINK_MERCHANT_HEADER), Some("ME77"));
        assert_eq!(
            sent.url,
            endpoints::resolve(Environment::Test, FlowKind::StaticLink)
        );
        let body: serde_json::Value = serde_json::from_str(&sent.body).unwrap();
        let plain = cipher::decrypt(body["request"].as_str().unwrap(), KEY).unwrap();
        let document: PaymentLinkRecord = serde_json::from_str(&plain).unwrap();
        assert_eq!(document, link);
    }

    #[tokio::test]
    async fn test_send_payment_by_link_requires_me_id() {
        let transport = StubTransport::new(200, r#"{"data":"eFJkItNHZsVE1CTuP1Pokw=="}"#);
        let client = client(transport.clone());
        let mut link = PaymentByLinkRecord::new("yagou381", "ME5", "10", "ORD1", "Demo");
        let result = client.send_payment_by_link(&link, None).await.unwrap();
        assert_eq!(result.decrypted_response.as_deref(), Some("hello"));
        assert_eq!(transport.last_request().header(LINK_MERCHANT_HEADER), Some("ME5"));

        link.me_id = String::new();
        let err = client.send_payment_by_link(&link, None).await.unwrap_err();
        assert!(matches!(err, GatewayError::Input(_)));
    }

    #[tokio::test]
    async fn test_send_link_non_json_body_is_decryption_candidate() {
        let transport = StubTransport::new(200, "eFJkItNHZsVE1CTuP1Pokw==");
        let link = PaymentLinkRecord::new("yagou381", "M1", "10");
        let result = client(transport)
            .send_payment_link(&link, Some("https://override.example/link"))
            .await
            .unwrap();

        assert_eq!(result.raw, RawResponse::Text("eFJkItNHZsVE1CTuP1Pokw==".to_string()));
        assert_eq!(result.decrypted_response.as_deref(), Some("hello"));
        assert_eq!(result.endpoint, "https://override.example/link");
    }

    #[tokio::test]
    async fn test_send_link_http_error() {
        let transport = StubTransport::new(404, "missing");
        let link = PaymentLinkRecord::new("yagou381", "M1", "10");
        let err = client(transport)
            .send_payment_link(&link, None)
            .await
            .unwrap_err();
        assert_eq!(err.http_status(), Some(404));
    }
}
