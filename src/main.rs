use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use yagoutpay::cli::{self, Cli, Commands};
use yagoutpay::{ClientConfig, GatewayClient};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Setup logging
    let filter =
        tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into());
    let registry = tracing_subscriber::registry().with(filter);
    if cli.json_logs {
        registry
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        registry
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    }

    let config = match &cli.env_file {
        Some(path) => ClientConfig::from_env_file(path)?,
        None => ClientConfig::from_env()?,
    };
    tracing::debug!(
        "Loaded configuration for merchant {} ({})",
        config.merchant_id,
        config.environment
    );

    match cli.command {
        Commands::Config => cli::handle_config_validate(&config)?,
        Commands::Encrypt { plaintext } => cli::handle_encrypt(&config, &plaintext)?,
        Commands::Decrypt { ciphertext } => cli::handle_decrypt(&config, &ciphertext)?,
        Commands::Build {
            amount,
            order_no,
            base_url,
            email,
            mobile,
            html,
        } => {
            let client = GatewayClient::new(config)?;
            cli::handle_build(&client, &amount, order_no, &base_url, &email, &mobile, html)?
        }
        Commands::SendApi {
            amount,
            order_no,
            email,
            mobile,
            endpoint,
            no_decrypt,
        } => {
            let client = GatewayClient::new(config)?;
            cli::handle_send_api(
                &client,
                &amount,
                order_no,
                &email,
                &mobile,
                endpoint.as_deref(),
                !no_decrypt,
            )
            .await?
        }
        Commands::LinkStatic {
            amount,
            req_user_id,
            email,
            mobile,
            success_url,
            failure_url,
            endpoint,
        } => {
            let client = GatewayClient::new(config)?;
            cli::handle_link_static(
                &client,
                &amount,
                &req_user_id,
                &email,
                &mobile,
                &success_url,
                &failure_url,
                endpoint.as_deref(),
            )
            .await?
        }
        Commands::LinkDynamic {
            amount,
            order_id,
            product,
            req_user_id,
            email,
            mobile,
            expiry,
            success_url,
            failure_url,
            endpoint,
        } => {
            let client = GatewayClient::new(config)?;
            cli::handle_link_dynamic(
                &client,
                &amount,
                order_id,
                &product,
                &req_user_id,
                &email,
                &mobile,
                expiry,
                &success_url,
                &failure_url,
                endpoint.as_deref(),
            )
            .await?
        }
    }

    Ok(())
}
