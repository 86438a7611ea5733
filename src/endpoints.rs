use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::domain::transaction::PaymentMethod;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    /// UAT sandbox.
    #[default]
    #[serde(alias = "uat")]
    Test,
    #[serde(alias = "prod")]
    Production,
}

impl FromStr for Environment {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "uat" | "test" => Ok(Environment::Test),
            "prod" | "production" => Ok(Environment::Production),
            other => Err(format!(
                "unknown environment '{}', expected uat|test|prod|production",
                other
            )),
        }
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Environment::Test => write!(f, "uat"),
            Environment::Production => write!(f, "prod"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlowKind {
    /// Browser redirect target for the hosted form.
    HostedForm,
    DirectApi,
    StaticLink,
    DynamicLink,
}

const UAT_BASE: &str = "https://uatcheckout.yagoutpay.com/ms-transaction-core-1-0";
const PROD_BASE: &str = "https://checkout.yagoutpay.com/ms-transaction-core-1-0";

const UAT_HOSTED_FORM: &str = "https://uatcheckout.yagoutpay.com/ms-transaction-core-1-0/paymentRedirection/checksumGatewayPage";
const PROD_HOSTED_FORM: &str = "https://checkout.yagoutpay.com/ms-transaction-core-1-0/paymentRedirection/checksumGatewayPage";
const UAT_DIRECT_API: &str = "https://uatcheckout.yagoutpay.com/ms-transaction-core-1-0/apiRedirection/apiIntegration";
const PROD_DIRECT_API: &str = "https://checkout.yagoutpay.com/ms-transaction-core-1-0/apiRedirection/apiIntegration";
const UAT_STATIC_LINK: &str = "https://uatcheckout.yagoutpay.com/ms-transaction-core-1-0/sdk/staticQRPaymentResponse";
const PROD_STATIC_LINK: &str = "https://checkout.yagoutpay.com/ms-transaction-core-1-0/sdk/staticQRPaymentResponse";
const UAT_DYNAMIC_LINK: &str = "https://uatcheckout.yagoutpay.com/ms-transaction-core-1-0/sdk/paymentByLinkResponse";
const PROD_DYNAMIC_LINK: &str = "https://checkout.yagoutpay.com/ms-transaction-core-1-0/sdk/paymentByLinkResponse";

pub fn base_url(environment: Environment) -> &'static str {
    match environment {
        Environment::Test => UAT_BASE,
        Environment::Production => PROD_BASE,
    }
}

pub fn resolve(environment: Environment, flow: FlowKind) -> &'static str {
    use Environment::*;
    use FlowKind::*;

    match (environment, flow) {
        (Test, HostedForm) => UAT_HOSTED_FORM,
        (Production, HostedForm) => PROD_HOSTED_FORM,
        (Test, DirectApi) => UAT_DIRECT_API,
        (Production, DirectApi) => PROD_DIRECT_API,
        (Test, StaticLink) => UAT_STATIC_LINK,
        (Production, StaticLink) => PROD_STATIC_LINK,
        (Test, DynamicLink) => UAT_DYNAMIC_LINK,
        (Production, DynamicLink) => PROD_DYNAMIC_LINK,
    }
}

pub const DEFAULT_PG_ID: &str = "67ee846571e740418d688c3f";
pub const DEFAULT_PAY_MODE: &str = "WA";
pub const DEFAULT_SCHEME_ID: &str = "7";
pub const DEFAULT_WALLET_TYPE: &str = "telebirr";

/// `pg_details` filled into direct-API requests that leave them empty.
pub fn api_payment_defaults() -> PaymentMethod {
    PaymentMethod {
        pg_id: DEFAULT_PG_ID.to_string(),
        pay_mode: DEFAULT_PAY_MODE.to_string(),
        scheme_id: DEFAULT_SCHEME_ID.to_string(),
        wallet_type: DEFAULT_WALLET_TYPE.to_string(),
    }
}

/// A selectable payment option for merchant checkout pickers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PgOption {
    pub id: &'static str,
    pub label: &'static str,
    pub pg_id: &'static str,
    pub pay_mode: &'static str,
    pub scheme_id: &'static str,
    pub wallet_type: &'static str,
}

impl PgOption {
    pub fn payment_method(&self) -> PaymentMethod {
        PaymentMethod {
            pg_id: self.pg_id.to_string(),
            pay_mode: self.pay_mode.to_string(),
            scheme_id: self.scheme_id.to_string(),
            wallet_type: self.wallet_type.to_string(),
        }
    }
}

pub const DEFAULT_PG_OPTIONS: &[PgOption] = &[PgOption {
    id: "telebirr-wa",
    label: "Telebirr Wallet",
    pg_id: DEFAULT_PG_ID,
    pay_mode: DEFAULT_PAY_MODE,
    scheme_id: DEFAULT_SCHEME_ID,
    wallet_type: DEFAULT_WALLET_TYPE,
}];

#[cfg(test)]
mod tests {
    use super::*;

    const FLOWS: [FlowKind; 4] = [
        FlowKind::HostedForm,
        FlowKind::DirectApi,
        FlowKind::StaticLink,
        FlowKind::DynamicLink,
    ];

    #[test]
    fn test_resolve_urls_share_environment_base() {
        for env in [Environment::Test, Environment::Production] {
            for flow in FLOWS {
                assert!(resolve(env, flow).starts_with(base_url(env)));
            }
        }
    }

    #[test]
    fn test_resolve_all_urls_distinct() {
        let mut urls: Vec<&str> = [Environment::Test, Environment::Production]
            .iter()
            .flat_map(|env| FLOWS.iter().map(move |flow| resolve(*env, *flow)))
            .collect();
        urls.sort_unstable();
        urls.dedup();
        assert_eq!(urls.len(), 8);
    }

    #[test]
    fn test_resolve_direct_api_production() {
        assert_eq!(
            resolve(Environment::Production, FlowKind::DirectApi),
            "https://checkout.yagoutpay.com/ms-transaction-core-1-0/apiRedirection/apiIntegration"
        );
    }

    #[test]
    fn test_environment_from_str() {
        assert_eq!("uat".parse::<Environment>().unwrap(), Environment::Test);
        assert_eq!("TEST".parse::<Environment>().unwrap(), Environment::Test);
        assert_eq!(" prod ".parse::<Environment>().unwrap(), Environment::Production);
        assert_eq!(
            "production".parse::<Environment>().unwrap(),
            Environment::Production
        );
        assert!("staging".parse::<Environment>().is_err());
    }

    #[test]
    fn test_environment_deserialize_accepts_aliases() {
        for (raw, expected) in [
            ("\"uat\"", Environment::Test),
            ("\"test\"", Environment::Test),
            ("\"prod\"", Environment::Production),
            ("\"production\"", Environment::Production),
        ] {
            assert_eq!(serde_json::from_str::<Environment>(raw).unwrap(), expected);
        }
        assert!(serde_json::from_str::<Environment>("\"staging\"").is_err());
    }

    #[test]
    fn test_environment_defaults_to_test() {
        assert_eq!(Environment::default(), Environment::Test);
    }

    #[test]
    fn test_default_pg_option_matches_api_defaults() {
        assert_eq!(DEFAULT_PG_OPTIONS[0].payment_method(), api_payment_defaults());
    }
}
