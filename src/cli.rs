use clap::{Parser, Subcommand};
use serde_json::json;

use crate::client::GatewayClient;
use crate::config::ClientConfig;
use crate::crypto::cipher;
use crate::domain::transaction::{TransactionRecord, TransactionRequired, CHANNEL_API, CHANNEL_WEB};
use crate::domain::{PaymentByLinkRecord, PaymentLinkRecord};
use crate::endpoints::{self, FlowKind};
use crate::form::render_auto_submit_form;
use crate::response::GatewayExchangeResult;
use crate::utils::sanitize::mask_tail;

const AGGREGATOR_ID: &str = "yagout";
const COUNTRY: &str = "ETH";
const CURRENCY: &str = "ETB";
const TRANSACTION_TYPE: &str = "SALE";
const LINK_DIAL_CODE: &str = "+251";
const LINK_EXPIRY_DAYS: i64 = 7;

#[derive(Parser)]
#[command(name = "yagoutpay")]
#[command(about = "YagoutPay client - hosted form, direct API and payment links", long_about = None)]
pub struct Cli {
    /// Emit logs as JSON lines
    #[arg(long, global = true)]
    pub json_logs: bool,

    /// Read configuration from this dotenv file instead of the process environment
    #[arg(long, global = true, value_name = "PATH")]
    pub env_file: Option<std::path::PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Build an encrypted hosted-form request
    Build {
        #[arg(short, long)]
        amount: String,

        /// Order number (defaults to ORDER<unix-millis>)
        #[arg(long)]
        order_no: Option<String>,

        /// Base URL of the shop; /success and /failure are appended
        #[arg(long, default_value = "http://localhost:3000")]
        base_url: String,

        #[arg(long, default_value = "")]
        email: String,

        #[arg(long, default_value = "")]
        mobile: String,

        /// Print an auto-submitting HTML page instead of JSON
        #[arg(long)]
        html: bool,
    },

    /// Send a transaction through the direct API
    SendApi {
        #[arg(short, long)]
        amount: String,

        #[arg(long)]
        order_no: Option<String>,

        #[arg(long, default_value = "")]
        email: String,

        #[arg(long)]
        mobile: String,

        /// Override the direct-API endpoint
        #[arg(long)]
        endpoint: Option<String>,

        /// Leave the gateway response encrypted
        #[arg(long)]
        no_decrypt: bool,
    },

    /// Create a static QR payment link
    LinkStatic {
        #[arg(short, long)]
        amount: String,

        #[arg(long, default_value = "yagou381")]
        req_user_id: String,

        #[arg(long, default_value = "")]
        email: String,

        #[arg(long, default_value = "")]
        mobile: String,

        #[arg(long, default_value = "")]
        success_url: String,

        #[arg(long, default_value = "")]
        failure_url: String,

        #[arg(long)]
        endpoint: Option<String>,
    },

    /// Create a dynamic pay-by-link request
    LinkDynamic {
        #[arg(short, long)]
        amount: String,

        #[arg(long)]
        order_id: Option<String>,

        #[arg(long, default_value = "Payment")]
        product: String,

        #[arg(long, default_value = "yagou381")]
        req_user_id: String,

        #[arg(long, default_value = "")]
        email: String,

        #[arg(long, default_value = "")]
        mobile: String,

        /// Link expiry as YYYY-MM-DD (defaults to a week from today)
        #[arg(long)]
        expiry: Option<String>,

        #[arg(long, default_value = "")]
        success_url: String,

        #[arg(long, default_value = "")]
        failure_url: String,

        #[arg(long)]
        endpoint: Option<String>,
    },

    /// Encrypt a string with the configured merchant key
    Encrypt {
        #[arg(value_name = "PLAINTEXT")]
        plaintext: String,
    },

    /// Decrypt a base64 ciphertext with the configured merchant key
    Decrypt {
        #[arg(value_name = "CIPHERTEXT")]
        ciphertext: String,
    },

    /// Configuration validation
    Config,
}

/// `ORDER<unix-millis>`, the gateway demo convention for order numbers.
pub fn generate_order_number() -> String {
    format!("ORDER{}", chrono::Utc::now().timestamp_millis())
}

fn default_expiry() -> String {
    (chrono::Utc::now().date_naive() + chrono::Duration::days(LINK_EXPIRY_DAYS))
        .format("%Y-%m-%d")
        .to_string()
}

/// A checkout transaction with the fields the demo storefront fills in.
pub fn checkout_record(
    merchant_id: &str,
    order_no: String,
    amount: &str,
    channel: &str,
    base_url: Option<&str>,
) -> anyhow::Result<TransactionRecord> {
    let (success_url, failure_url) = match base_url {
        Some(base) => {
            let base = base.trim_end_matches('/');
            (format!("{}/success", base), format!("{}/failure", base))
        }
        None => (String::new(), String::new()),
    };

    let record = TransactionRecord::new(TransactionRequired {
        aggregator_id: AGGREGATOR_ID.to_string(),
        merchant_id: merchant_id.to_string(),
        order_number: order_no,
        amount: amount.to_string(),
        country: COUNTRY.to_string(),
        currency: CURRENCY.to_string(),
        transaction_type: TRANSACTION_TYPE.to_string(),
        success_url,
        failure_url,
        channel: channel.to_string(),
    })?;
    Ok(record)
}

pub fn handle_build(
    client: &GatewayClient,
    amount: &str,
    order_no: Option<String>,
    base_url: &str,
    email: &str,
    mobile: &str,
    html: bool,
) -> anyhow::Result<()> {
    let order_no = order_no.unwrap_or_else(generate_order_number);
    let mut record = checkout_record(
        &client.config().merchant_id,
        order_no,
        amount,
        CHANNEL_WEB,
        Some(base_url),
    )?;
    record.customer.email = email.to_string();
    record.customer.mobile = mobile.to_string();

    let built = client.build_hosted_form(&record)?;
    tracing::info!("Hosted form built for order {}", record.order_number);

    if html {
        println!("{}", render_auto_submit_form(&built));
    } else {
        let output = json!({
            "me_id": built.me_id,
            "merchant_request": built.merchant_request,
            "hash": built.hash,
            "actionUrl": built.action_url,
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
    }
    Ok(())
}

pub async fn handle_send_api(
    client: &GatewayClient,
    amount: &str,
    order_no: Option<String>,
    email: &str,
    mobile: &str,
    endpoint: Option<&str>,
    decrypt: bool,
) -> anyhow::Result<()> {
    let order_no = order_no.unwrap_or_else(generate_order_number);
    let mut record = checkout_record(
        &client.config().merchant_id,
        order_no,
        amount,
        CHANNEL_API,
        None,
    )?;
    record.customer.email = email.to_string();
    record.customer.mobile = mobile.to_string();

    let result = client.send_api_request(&record, endpoint, decrypt).await?;
    print_exchange(&result)
}

#[allow(clippy::too_many_arguments)]
pub async fn handle_link_static(
    client: &GatewayClient,
    amount: &str,
    req_user_id: &str,
    email: &str,
    mobile: &str,
    success_url: &str,
    failure_url: &str,
    endpoint: Option<&str>,
) -> anyhow::Result<()> {
    let link = PaymentLinkRecord {
        brand_name: "Demo Product".to_string(),
        status: "ACTIVE".to_string(),
        store_name: "YP".to_string(),
        store_email: email.to_string(),
        mobile_no: mobile.to_string(),
        success_url: success_url.to_string(),
        failure_url: failure_url.to_string(),
        ..PaymentLinkRecord::new(req_user_id, client.config().merchant_id.as_str(), amount)
    };

    let result = client.send_payment_link(&link, endpoint).await?;
    print_exchange(&result)
}

#[allow(clippy::too_many_arguments)]
pub async fn handle_link_dynamic(
    client: &GatewayClient,
    amount: &str,
    order_id: Option<String>,
    product: &str,
    req_user_id: &str,
    email: &str,
    mobile: &str,
    expiry: Option<String>,
    success_url: &str,
    failure_url: &str,
    endpoint: Option<&str>,
) -> anyhow::Result<()> {
    let order_id = order_id.unwrap_or_else(generate_order_number);
    let link = PaymentByLinkRecord {
        customer_email: email.to_string(),
        mobile_no: mobile.to_string(),
        expiry_date: expiry.unwrap_or_else(default_expiry),
        media_type: vec![CHANNEL_API.to_string()],
        first_name: "Demo".to_string(),
        last_name: "User".to_string(),
        dial_code: LINK_DIAL_CODE.to_string(),
        success_url: success_url.to_string(),
        failure_url: failure_url.to_string(),
        country: COUNTRY.to_string(),
        currency: CURRENCY.to_string(),
        ..PaymentByLinkRecord::new(
            req_user_id,
            client.config().merchant_id.as_str(),
            amount,
            order_id,
            product,
        )
    };

    let result = client.send_payment_by_link(&link, endpoint).await?;
    print_exchange(&result)
}

pub fn handle_encrypt(config: &ClientConfig, plaintext: &str) -> anyhow::Result<()> {
    println!("{}", cipher::encrypt(plaintext, &config.encryption_key)?);
    Ok(())
}

pub fn handle_decrypt(config: &ClientConfig, ciphertext: &str) -> anyhow::Result<()> {
    println!("{}", cipher::decrypt(ciphertext, &config.encryption_key)?);
    Ok(())
}

pub fn handle_config_validate(config: &ClientConfig) -> anyhow::Result<()> {
    tracing::info!("Validating configuration...");
    config.validate()?;

    println!("Configuration:");
    println!("  Merchant ID: {}", config.merchant_id);
    println!("  Encryption Key: {}", mask_tail(&config.encryption_key));
    println!("  Environment: {}", config.environment);
    println!(
        "  Hosted Form URL: {}",
        config
            .action_url_override
            .as_deref()
            .unwrap_or_else(|| endpoints::resolve(config.environment, FlowKind::HostedForm))
    );
    println!("  Allow Insecure TLS: {}", config.allow_insecure_tls);

    tracing::info!("Configuration is valid");
    println!("✓ Configuration is valid");

    Ok(())
}

fn print_exchange(result: &GatewayExchangeResult) -> anyhow::Result<()> {
    let output = json!({
        "endpoint": result.endpoint,
        "raw": result.raw,
        "decryptedResponse": result.decrypted_response,
        "parsed": result.parsed_decrypted(),
    });
    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_order_number() {
        let order = generate_order_number();
        assert!(order.starts_with("ORDER"));
        assert!(order["ORDER".len()..].parse::<i64>().unwrap() > 0);
    }

    #[test]
    fn test_default_expiry_format() {
        let expiry = default_expiry();
        assert!(chrono::NaiveDate::parse_from_str(&expiry, "%Y-%m-%d").is_ok());
    }

    #[test]
    fn test_checkout_record_web_urls() {
        let record =
            checkout_record("M1", "O1".to_string(), "10", CHANNEL_WEB, Some("https://shop.example/"))
                .unwrap();
        assert_eq!(record.success_url, "https://shop.example/success");
        assert_eq!(record.failure_url, "https://shop.example/failure");
        assert_eq!(record.country, "ETH");
        assert_eq!(record.currency, "ETB");
    }

    #[test]
    fn test_checkout_record_web_requires_urls() {
        assert!(checkout_record("M1", "O1".to_string(), "10", CHANNEL_WEB, None).is_err());
        assert!(checkout_record("M1", "O1".to_string(), "10", CHANNEL_API, None).is_ok());
    }

    #[test]
    fn test_cli_parses_subcommands() {
        let cli = Cli::try_parse_from(["yagoutpay", "build", "--amount", "5", "--html"]).unwrap();
        assert!(matches!(cli.command, Commands::Build { html: true, .. }));

        let cli =
            Cli::try_parse_from(["yagoutpay", "--json-logs", "send-api", "-a", "5", "--mobile", "0911"])
                .unwrap();
        assert!(cli.json_logs);
        assert!(matches!(cli.command, Commands::SendApi { no_decrypt: false, .. }));
    }
}
