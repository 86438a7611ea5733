pub mod cli;
pub mod client;
pub mod codec;
pub mod config;
pub mod crypto;
pub mod domain;
pub mod endpoints;
pub mod error;
pub mod form;
pub mod response;
pub mod transport;
pub mod utils;
pub mod validation;

pub use client::GatewayClient;
pub use config::ClientConfig;
pub use domain::{PaymentByLinkRecord, PaymentLinkRecord, TransactionRecord, TransactionRequired};
pub use endpoints::{Environment, FlowKind};
pub use error::GatewayError;
pub use form::BuiltHostedForm;
pub use response::{GatewayExchangeResult, RawResponse};
