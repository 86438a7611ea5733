//! Payment link records.
//! Serialized as-is to JSON, encrypted whole and posted to the link endpoints.

use serde::{Deserialize, Serialize};

use crate::validation::{validate_all_required, ValidationError};

/// Static QR-code payment link.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PaymentLinkRecord {
    pub ag_id: String,
    pub ag_code: String,
    pub ag_name: String,
    pub req_user_id: String,
    pub me_code: String,
    pub me_name: String,
    pub qr_code_id: String,
    #[serde(rename = "brandName")]
    pub brand_name: String,
    pub qr_name: String,
    pub status: String,
    #[serde(rename = "storeName")]
    pub store_name: String,
    pub store_id: String,
    pub token: String,
    pub qr_transaction_amount: String,
    pub logo: String,
    pub store_email: String,
    pub mobile_no: String,
    pub udf: String,
    pub udfmerchant: String,
    pub file_name: String,
    pub from_date: String,
    pub to_date: String,
    pub file_extn: String,
    pub file_url: String,
    pub file: String,
    pub original_file_name: String,
    #[serde(rename = "successURL")]
    pub success_url: String,
    #[serde(rename = "failureURL")]
    pub failure_url: String,
    #[serde(rename = "addAll")]
    pub add_all: String,
    pub source: String,
}

impl PaymentLinkRecord {
    pub fn new(
        req_user_id: impl Into<String>,
        me_code: impl Into<String>,
        qr_transaction_amount: impl Into<String>,
    ) -> Self {
        Self {
            req_user_id: req_user_id.into(),
            me_code: me_code.into(),
            qr_transaction_amount: qr_transaction_amount.into(),
            ..Default::default()
        }
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        validate_all_required(&[
            ("req_user_id", self.req_user_id.as_str()),
            ("me_code", self.me_code.as_str()),
            ("qr_transaction_amount", self.qr_transaction_amount.as_str()),
        ])
    }
}

/// Dynamic pay-by-link request.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PaymentByLinkRecord {
    pub req_user_id: String,
    pub me_id: String,
    pub amount: String,
    pub customer_email: String,
    pub mobile_no: String,
    /// `YYYY-MM-DD`.
    pub expiry_date: String,
    /// Delivery channels, e.g. `["API"]`.
    pub media_type: Vec<String>,
    pub order_id: String,
    pub first_name: String,
    pub last_name: String,
    pub product: String,
    /// Phone prefix such as `+251`.
    pub dial_code: String,
    pub failure_url: String,
    pub success_url: String,
    pub country: String,
    pub currency: String,
}

impl PaymentByLinkRecord {
    pub fn new(
        req_user_id: impl Into<String>,
        me_id: impl Into<String>,
        amount: impl Into<String>,
        order_id: impl Into<String>,
        product: impl Into<String>,
    ) -> Self {
        Self {
            req_user_id: req_user_id.into(),
            me_id: me_id.into(),
            amount: amount.into(),
            order_id: order_id.into(),
            product: product.into(),
            ..Default::default()
        }
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        validate_all_required(&[
            ("req_user_id", self.req_user_id.as_str()),
            ("me_id", self.me_id.as_str()),
            ("amount", self.amount.as_str()),
            ("order_id", self.order_id.as_str()),
            ("product", self.product.as_str()),
        ])
    }
}
