//! Command-line interface definitions.

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// Relays IELTS writing submissions and proctoring violations to Telegram.
#[derive(Parser, Debug)]
#[command(name = "essay-relay", version, about, long_about = None)]
pub struct Cli {
    /// Path to the configuration file. Defaults apply when omitted.
    #[arg(short, long, env = "CONFIG_PATH", global = true)]
    pub config: Option<PathBuf>,

    /// Increase logging verbosity (-v, -vv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    /// Returns the log level, letting verbosity flags override the config.
    pub fn log_level(&self, configured: &str) -> String {
        match self.verbose {
            0 => configured.to_string(),
            1 => "debug".to_string(),
            _ => "trace".to_string(),
        }
    }
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Start the HTTP relay.
    Serve(ServeArgs),

    /// Validate the configuration without starting.
    #[command(name = "config-validate")]
    ConfigValidate,

    /// Display the effective configuration with secrets redacted.
    #[command(name = "config-show")]
    ConfigShow,

    /// Render a JSON payload file to stdout without sending it.
    Render(RenderArgs),
}

/// Arguments for the serve subcommand.
#[derive(Args, Debug)]
pub struct ServeArgs {
    /// Override the configured bind host.
    #[arg(long)]
    pub host: Option<String>,

    /// Override the configured port.
    #[arg(short, long, env = "PORT")]
    pub port: Option<u16>,
}

/// Arguments for the render subcommand.
#[derive(Args, Debug)]
pub struct RenderArgs {
    /// JSON file holding a request body.
    pub file: PathBuf,

    /// Treat the body as the single-essay legacy shape.
    #[arg(long, default_value = "false")]
    pub legacy: bool,
}
