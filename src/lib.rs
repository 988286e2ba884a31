//! Essay Relay - forwards IELTS writing submissions and proctoring
//! violations to a Telegram chat.
//!
//! The service accepts JSON posted by the test client, renders a Markdown
//! message and relays it through the Telegram Bot API.

pub mod cli;
pub mod config;
pub mod error;
pub mod notify;
pub mod payload;
pub mod relay;
pub mod render;
pub mod server;
pub mod validation;

use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::info;

use crate::cli::{Cli, Commands, RenderArgs, ServeArgs};
use crate::config::AppConfig;
use crate::notify::{Metrics, TelegramClient};
use crate::payload::RelayEvent;
use crate::relay::Relay;
use crate::server::RelayServer;

/// Runs the relay with the provided CLI arguments.
pub async fn run(cli: Cli) -> Result<()> {
    let config = config::load(cli.config.as_deref())?;
    setup_logging(&cli.log_level(&config.log_level))?;

    match cli.command {
        Commands::Serve(args) => serve(args, config).await,
        Commands::ConfigValidate => validate_config(&config),
        Commands::ConfigShow => show_config(&config),
        Commands::Render(args) => render_file(&args),
    }
}

/// Initializes the tracing subscriber for structured logging.
fn setup_logging(level: &str) -> Result<()> {
    use tracing_subscriber::{fmt, EnvFilter};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    fmt()
        .with_env_filter(filter)
        .json()
        .with_target(true)
        .with_file(true)
        .with_line_number(true)
        .init();

    Ok(())
}

/// Builds a relay wired to the real Telegram client.
pub fn build_relay(config: &AppConfig, metrics: Option<Arc<Metrics>>) -> Result<Relay> {
    let (bot_token, _) = config
        .telegram
        .credentials()
        .context("Telegram bot token and chat id are required")?;

    let mut client = TelegramClient::new(bot_token, &config.telegram, &config.retry)?;
    if let Some(metrics) = &metrics {
        client = client.with_metrics(metrics.clone());
    }

    let mut relay = Relay::new(config.telegram.clone(), Arc::new(client));
    if let Some(metrics) = metrics {
        relay = relay.with_metrics(metrics);
    }

    Ok(relay)
}

/// Validates the config and serves requests until Ctrl+C.
async fn serve(args: ServeArgs, mut config: AppConfig) -> Result<()> {
    if let Some(host) = args.host {
        config.server.host = host;
    }
    if let Some(port) = args.port {
        config.server.port = port;
    }

    // Fail fast: a relay without credentials never starts.
    config::ensure_valid(&config)?;
    info!(telegram = ?config.telegram, "Configuration loaded and validated");

    let metrics = if config.prometheus.enabled {
        Some(Arc::new(Metrics::new()?))
    } else {
        None
    };

    let relay = build_relay(&config, metrics.clone())?;
    let server = RelayServer::new(Arc::new(relay), metrics, config.server.max_body_bytes);

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = RelayServer::bind(&addr).await?;

    server
        .serve(listener, async {
            if tokio::signal::ctrl_c().await.is_ok() {
                info!("Shutdown signal received");
            }
        })
        .await?;

    info!("Relay stopped");
    Ok(())
}

/// Validates the configuration and prints the report.
fn validate_config(config: &AppConfig) -> Result<()> {
    let result = validation::validate_config(config);
    println!("{}", validation::report::format_report(&result));

    if !result.is_valid() {
        anyhow::bail!(error::ConfigError::ValidationFailed {
            error_count: result.error_count()
        });
    }

    Ok(())
}

/// Displays the effective configuration with the bot token redacted.
fn show_config(config: &AppConfig) -> Result<()> {
    let yaml = serde_yaml::to_string(&config.redacted())?;
    println!("{}", yaml);
    Ok(())
}

/// Renders a payload file exactly as it would be sent.
fn render_file(args: &RenderArgs) -> Result<()> {
    let body = read_payload(&args.file)?;
    let event = if args.legacy {
        RelayEvent::parse_legacy(&body)
    } else {
        RelayEvent::parse(&body)
    }
    .with_context(|| format!("Invalid payload in '{}'", args.file.display()))?;

    println!("{}", render::render(&event));
    Ok(())
}

fn read_payload(path: &Path) -> Result<Vec<u8>> {
    std::fs::read(path).with_context(|| format!("Failed to read '{}'", path.display()))
}
