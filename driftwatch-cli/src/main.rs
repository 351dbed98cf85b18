//! Driftwatch CLI
//!
//! Command-line interface for one-shot GitLab divergence checks and the
//! local ancestor check.

mod commands;
mod config;
mod git;

use anyhow::Result;
use clap::Parser;
use commands::{Commands, handle_command};
use config::Config;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "driftwatch")]
#[command(about = "GitLab branch divergence checks", long_about = None)]
struct Cli {
    /// GitLab base URL
    #[arg(long, env = "GITLAB_URL", global = true)]
    gitlab_url: Option<String>,

    /// GitLab access token
    #[arg(long, env = "GITLAB_TOKEN", hide_env_values = true, global = true)]
    token: Option<String>,

    /// Keep plain http:// GitLab URLs instead of upgrading them to https://
    #[arg(long, env = "GITLAB_INSECURE", global = true)]
    insecure: bool,

    #[command(subcommand)]
    command: Commands,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    let config = Config {
        gitlab_url: cli.gitlab_url,
        token: cli.token,
        allow_insecure: cli.insecure,
    };

    handle_command(cli.command, &config).await
}
