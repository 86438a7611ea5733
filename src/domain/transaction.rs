//! Transaction domain entity.
//! Canonical merchant input for both the hosted-form and direct-API flows.
//!
//! Every optional field is an empty string rather than absent: both wire formats are
//! positional or keyed and never carry a null token.

use crate::validation::{validate_all_required, ValidationError};

pub const CHANNEL_WEB: &str = "WEB";
pub const CHANNEL_MOBILE: &str = "MOBILE";
pub const CHANNEL_API: &str = "API";

/// Number of user-defined pass-through fields (`udf1..udf7`).
pub const UDF_COUNT: usize = 7;

/// Fields a transaction cannot be built without.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransactionRequired {
    pub aggregator_id: String,
    pub merchant_id: String,
    pub order_number: String,
    pub amount: String,
    pub country: String,
    pub currency: String,
    pub transaction_type: String,
    pub success_url: String,
    pub failure_url: String,
    pub channel: String,
}

/// `pg_details`: which payment gateway and instrument to route through.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PaymentMethod {
    pub pg_id: String,
    pub pay_mode: String,
    pub scheme_id: String,
    pub wallet_type: String,
}

impl PaymentMethod {
    /// Returns a copy where every empty field is taken from `defaults`.
    pub fn or_defaults(&self, defaults: &PaymentMethod) -> PaymentMethod {
        fn pick(value: &str, fallback: &str) -> String {
            if value.is_empty() { fallback } else { value }.to_string()
        }

        PaymentMethod {
            pg_id: pick(&self.pg_id, &defaults.pg_id),
            pay_mode: pick(&self.pay_mode, &defaults.pay_mode),
            scheme_id: pick(&self.scheme_id, &defaults.scheme_id),
            wallet_type: pick(&self.wallet_type, &defaults.wallet_type),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CardDetails {
    pub card_number: String,
    pub expiry_month: String,
    pub expiry_year: String,
    pub cvv: String,
    pub card_name: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CustomerDetails {
    pub name: String,
    pub email: String,
    pub mobile: String,
    pub unique_id: String,
    pub is_logged_in: String,
}

impl Default for CustomerDetails {
    fn default() -> Self {
        Self {
            name: String::new(),
            email: String::new(),
            mobile: String::new(),
            unique_id: String::new(),
            is_logged_in: "Y".to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BillingAddress {
    pub address: String,
    pub city: String,
    pub state: String,
    pub country: String,
    pub zip: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ShippingDetails {
    pub address: String,
    pub city: String,
    pub state: String,
    pub country: String,
    pub zip: String,
    pub days: String,
    pub address_count: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ItemDetails {
    pub count: String,
    pub value: String,
    pub category: String,
}

/// A single payment request as the merchant describes it.
///
/// Build one with [`TransactionRecord::new`] and fill optional groups with struct-update
/// syntax:
///
/// ```ignore
/// let record = TransactionRecord {
///     customer: CustomerDetails { email: "buyer@example.com".into(), ..Default::default() },
///     ..TransactionRecord::new(required)?
/// };
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransactionRecord {
    pub aggregator_id: String,
    pub merchant_id: String,
    pub order_number: String,
    pub amount: String,
    pub country: String,
    pub currency: String,
    pub transaction_type: String,
    pub success_url: String,
    pub failure_url: String,
    pub channel: String,
    pub payment: PaymentMethod,
    pub card: CardDetails,
    pub customer: CustomerDetails,
    pub billing: BillingAddress,
    pub shipping: ShippingDetails,
    pub item: ItemDetails,
    pub udf: [String; UDF_COUNT],
}

impl TransactionRecord {
    pub fn new(required: TransactionRequired) -> Result<Self, ValidationError> {
        let record = Self {
            aggregator_id: required.aggregator_id,
            merchant_id: required.merchant_id,
            order_number: required.order_number,
            amount: required.amount,
            country: required.country,
            currency: required.currency,
            transaction_type: required.transaction_type,
            success_url: required.success_url,
            failure_url: required.failure_url,
            channel: required.channel,
            payment: PaymentMethod::default(),
            card: CardDetails::default(),
            customer: CustomerDetails::default(),
            billing: BillingAddress::default(),
            shipping: ShippingDetails::default(),
            item: ItemDetails::default(),
            udf: Default::default(),
        };
        record.validate()?;
        Ok(record)
    }

    /// Re-checks the required fields. Records assembled with struct-update syntax can
    /// blank a required field after [`TransactionRecord::new`], so the client calls this
    /// before encoding.
    pub fn validate(&self) -> Result<(), ValidationError> {
        validate_all_required(&[
            ("aggregator_id", self.aggregator_id.as_str()),
            ("merchant_id", self.merchant_id.as_str()),
            ("order_number", self.order_number.as_str()),
            ("amount", self.amount.as_str()),
            ("country", self.country.as_str()),
            ("currency", self.currency.as_str()),
            ("transaction_type", self.transaction_type.as_str()),
            ("channel", self.channel.as_str()),
        ])?;

        // API submissions carry no browser redirect.
        if !self.is_api_channel() {
            validate_all_required(&[
                ("success_url", self.success_url.as_str()),
                ("failure_url", self.failure_url.as_str()),
            ])?;
        }
        Ok(())
    }

    pub fn is_api_channel(&self) -> bool {
        self.channel == CHANNEL_API
    }

    /// Sets `udfN` (1-based). Indices outside `1..=7` are ignored.
    pub fn with_udf(mut self, index: usize, value: impl Into<String>) -> Self {
        if let Some(slot) = index.checked_sub(1).and_then(|i| self.udf.get_mut(i)) {
            *slot = value.into();
        }
        self
    }
}
