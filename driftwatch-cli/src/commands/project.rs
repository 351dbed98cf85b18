//! Project command handlers
//!
//! Lists GitLab projects and runs one-shot divergence scans.

use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Subcommand;
use colored::*;
use driftwatch_client::GitlabClient;
use driftwatch_core::domain::{Divergence, Project, ProjectId};
use driftwatch_daemon::{RepositoryWatcher, RosterHandle, TracingReporter};

use crate::config::Config;

/// Project subcommands
#[derive(Subcommand)]
pub enum ProjectCommands {
    /// List every project visible to the token
    List,
    /// Check one project for diverged branches
    Scan {
        /// Project ID
        id: u64,
    },
}

/// Handle project commands
pub async fn handle_project_command(command: ProjectCommands, config: &Config) -> Result<()> {
    let client = config.client()?;

    match command {
        ProjectCommands::List => list_projects(&client).await,
        ProjectCommands::Scan { id } => scan_project(client, ProjectId(id)).await,
    }
}

/// List all projects
async fn list_projects(client: &GitlabClient) -> Result<()> {
    let projects = client
        .list_projects()
        .await
        .context("Failed to list projects")?;

    if projects.is_empty() {
        println!("{}", "No projects visible to this token.".yellow());
        return Ok(());
    }

    println!(
        "{}",
        format!("Found {} project(s):", projects.len()).bold()
    );
    println!();
    for project in &projects {
        print_project_summary(project);
    }

    Ok(())
}

/// Run one watcher cycle against a single project
async fn scan_project(client: Arc<GitlabClient>, id: ProjectId) -> Result<()> {
    let project = client
        .get_project(id)
        .await
        .with_context(|| format!("Failed to fetch project {}", id))?;

    println!("{} {}", "Scanning".cyan(), project.to_string().bold());

    let roster = RosterHandle::new();
    roster.upsert(project.clone());
    let mut watcher = RepositoryWatcher::new(project, client, roster, Arc::new(TracingReporter));

    let divergences = watcher
        .check_once()
        .await
        .with_context(|| format!("Failed to scan project {}", id))?;

    print_scan_result(watcher.repository().branches.len(), &divergences);
    Ok(())
}

fn print_project_summary(project: &Project) {
    println!("  {} {}", "▸".cyan(), project.name.bold());
    println!("    ID:             {}", project.id);
    println!(
        "    Default branch: {}",
        match &project.default_branch {
            Some(branch) => branch.normal(),
            None => "(empty repository)".dimmed(),
        }
    );
    println!();
}

fn print_scan_result(branches: usize, divergences: &[Divergence]) {
    println!("  Branches checked: {}", branches);

    if divergences.is_empty() {
        println!("{}", "No diverged branches.".green());
        return;
    }

    println!(
        "{}",
        format!("{} diverged branch(es):", divergences.len())
            .red()
            .bold()
    );
    for divergence in divergences {
        println!(
            "  {} {} (default branch: {})",
            "✗".red(),
            divergence.branch.bold(),
            divergence.default_branch
        );
    }
}
