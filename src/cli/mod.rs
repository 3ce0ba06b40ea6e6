//! CLI entry point for devflow.

pub mod errors;
pub mod run;

use clap::{Args, Parser, Subcommand};

use crate::config::{parse_scopes, PlaygroundConfig};
use crate::view::Step;

/// OAuth 2.0 Device Authorization Grant walkthrough
#[derive(Parser, Debug)]
#[command(name = "devflow", version, about = "Walk through the OAuth 2.0 device flow")]
pub struct Cli {
    /// Log debug output to stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Top-level CLI commands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the full walkthrough against a tenant
    Run(RunArgs),
    /// Render one step with sample data, without network calls
    Preview(PreviewArgs),
}

/// Tenant and client settings shared by every command.
#[derive(Args, Debug, Clone)]
pub struct ConfigArgs {
    /// Tenant host, e.g. example.auth0.com
    #[arg(long, env = "DEVFLOW_TENANT")]
    pub tenant: String,

    /// Client ID of the device application
    #[arg(long, env = "DEVFLOW_CLIENT_ID")]
    pub client_id: String,

    /// API audience to request
    #[arg(long, env = "DEVFLOW_AUDIENCE")]
    pub audience: Option<String>,

    /// Scopes to request; repeat or separate with spaces or commas
    #[arg(long = "scope", env = "DEVFLOW_SCOPES")]
    pub scopes: Vec<String>,
}

impl ConfigArgs {
    pub fn to_config(&self) -> PlaygroundConfig {
        PlaygroundConfig::builder()
            .tenant(self.tenant.clone())
            .client_id(self.client_id.clone())
            .maybe_audience(self.audience.clone())
            .scopes(self.scopes.iter().flat_map(|raw| parse_scopes(raw)).collect())
            .build()
    }
}

/// Arguments for `devflow run`.
#[derive(Args, Debug)]
pub struct RunArgs {
    #[command(flatten)]
    pub config: ConfigArgs,

    /// Give up polling after this many seconds
    #[arg(long)]
    pub timeout: Option<u64>,

    /// Start the authorization without waiting for Enter
    #[arg(short, long)]
    pub yes: bool,
}

/// Arguments for `devflow preview`.
#[derive(Args, Debug)]
pub struct PreviewArgs {
    /// Step to render (configure, authorize, exchange, complete)
    pub step: Step,

    #[command(flatten)]
    pub config: ConfigArgs,
}

impl Cli {
    /// Parse CLI arguments.
    pub fn parse_args() -> Self {
        Self::parse()
    }
}
