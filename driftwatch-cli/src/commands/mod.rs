//! Commands module
//!
//! Defines all CLI commands and their handlers.

mod check;
mod project;

pub use check::CheckCommands;
pub use project::ProjectCommands;

use anyhow::Result;
use clap::Subcommand;

use crate::config::Config;

/// Top-level CLI commands
#[derive(Subcommand)]
pub enum Commands {
    /// GitLab project inspection
    Project {
        #[command(subcommand)]
        command: ProjectCommands,
    },
    /// Local repository checks
    Check {
        #[command(subcommand)]
        command: CheckCommands,
    },
}

/// Handle a CLI command
///
/// Routes the command to the appropriate handler module.
pub async fn handle_command(command: Commands, config: &Config) -> Result<()> {
    match command {
        Commands::Project { command } => project::handle_project_command(command, config).await,
        Commands::Check { command } => check::handle_check_command(command).await,
    }
}
