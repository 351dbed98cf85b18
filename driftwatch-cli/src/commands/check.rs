//! Check command handlers
//!
//! Local repository checks that need no GitLab access.

use std::path::PathBuf;

use anyhow::{Result, bail};
use clap::Subcommand;
use colored::*;

use crate::git::{GitAncestorCheck, target_has_all_commits};

/// Check subcommands
#[derive(Subcommand)]
pub enum CheckCommands {
    /// Fail unless the target ref contains every commit of the compare ref
    Commits {
        /// Path of the git repository
        #[arg(long, default_value = "./")]
        git_path: PathBuf,

        /// Ref whose commits must all be present
        #[arg(long, default_value = "origin/HEAD")]
        compare_ref: String,

        /// Ref that must contain them
        #[arg(long, default_value = "HEAD")]
        target_ref: String,

        /// Run `git fetch` first
        #[arg(long)]
        fetch: bool,
    },
}

/// Handle check commands
pub async fn handle_check_command(command: CheckCommands) -> Result<()> {
    match command {
        CheckCommands::Commits {
            git_path,
            compare_ref,
            target_ref,
            fetch,
        } => check_commits(git_path, &compare_ref, &target_ref, fetch).await,
    }
}

async fn check_commits(
    git_path: PathBuf,
    compare_ref: &str,
    target_ref: &str,
    fetch: bool,
) -> Result<()> {
    let check = GitAncestorCheck::new(git_path);

    if !target_has_all_commits(&check, fetch, compare_ref, target_ref).await? {
        bail!(
            "branch '{}' doesn't have some commits from '{}'",
            target_ref,
            compare_ref
        );
    }

    println!(
        "{} '{}' has every commit from '{}'",
        "✓".green(),
        target_ref.bold(),
        compare_ref
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;
    use std::process::Command;

    fn run_git(repo_dir: &Path, args: &[&str]) {
        let status = Command::new("git")
            .args(args)
            .current_dir(repo_dir)
            .status()
            .unwrap();
        assert!(status.success(), "git {:?} failed", args);
    }

    #[tokio::test]
    async fn test_missing_commits_message() {
        let dir = tempfile::tempdir().unwrap();
        run_git(dir.path(), &["init"]);
        run_git(dir.path(), &["config", "user.name", "test-user"]);
        run_git(dir.path(), &["config", "user.email", "test@example.com"]);
        run_git(dir.path(), &["config", "commit.gpgsign", "false"]);
        run_git(dir.path(), &["commit", "--allow-empty", "-m", "initial"]);
        run_git(dir.path(), &["branch", "release"]);
        run_git(dir.path(), &["commit", "--allow-empty", "-m", "hotfix"]);

        let err = check_commits(dir.path().to_path_buf(), "HEAD", "release", false)
            .await
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "branch 'release' doesn't have some commits from 'HEAD'"
        );

        check_commits(dir.path().to_path_buf(), "release", "HEAD", false)
            .await
            .unwrap();
    }
}
