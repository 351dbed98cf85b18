//! Local git ancestor check
//!
//! Answers whether every commit reachable from one ref is also reachable
//! from another, by shelling out to the `git` binary.

use std::path::PathBuf;
use std::process::Output;

use anyhow::{Context, Result, bail};
use async_trait::async_trait;
use tokio::process::Command;
use tracing::info;

#[async_trait]
pub trait AncestorCheck: Send + Sync {
    /// Updates remote-tracking refs
    async fn fetch(&self) -> Result<()>;

    /// Resolves a revision to a commit hash
    async fn resolve(&self, revision: &str) -> Result<String>;

    /// Whether `ancestor` is reachable from `descendant`
    async fn is_ancestor(&self, ancestor: &str, descendant: &str) -> Result<bool>;
}

/// [`AncestorCheck`] backed by the `git` executable
#[derive(Debug, Clone)]
pub struct GitAncestorCheck {
    repo: PathBuf,
}

impl GitAncestorCheck {
    pub fn new(repo: impl Into<PathBuf>) -> Self {
        Self { repo: repo.into() }
    }

    async fn git(&self, args: &[&str]) -> Result<Output> {
        Command::new("git")
            .args(args)
            .current_dir(&self.repo)
            .output()
            .await
            .with_context(|| format!("failed to run git in {}", self.repo.display()))
    }
}

#[async_trait]
impl AncestorCheck for GitAncestorCheck {
    async fn fetch(&self) -> Result<()> {
        let output = self.git(&["fetch"]).await?;
        if !output.status.success() {
            bail!("git fetch failed: {}", String::from_utf8_lossy(&output.stderr).trim());
        }
        Ok(())
    }

    async fn resolve(&self, revision: &str) -> Result<String> {
        let commit_rev = format!("{}^{{commit}}", revision);
        let output = self.git(&["rev-parse", "--verify", "--quiet", &commit_rev]).await?;
        if !output.status.success() {
            bail!("cannot resolve revision '{}'", revision);
        }

        let hash = String::from_utf8_lossy(&output.stdout).trim().to_string();
        if hash.is_empty() {
            bail!("git rev-parse returned empty output for '{}'", revision);
        }
        Ok(hash)
    }

    async fn is_ancestor(&self, ancestor: &str, descendant: &str) -> Result<bool> {
        let output = self
            .git(&["merge-base", "--is-ancestor", ancestor, descendant])
            .await?;

        match output.status.code() {
            Some(0) => Ok(true),
            Some(1) => Ok(false),
            _ => bail!(
                "git merge-base failed: {}",
                String::from_utf8_lossy(&output.stderr).trim()
            ),
        }
    }
}

/// Whether `target_ref` contains every commit of `compare_ref`
///
/// Fetches first when `fetch` is set. Both refs must resolve to commits.
pub async fn target_has_all_commits(
    check: &dyn AncestorCheck,
    fetch: bool,
    compare_ref: &str,
    target_ref: &str,
) -> Result<bool> {
    if fetch {
        check.fetch().await?;
    }

    let compare = check.resolve(compare_ref).await?;
    let target = check.resolve(target_ref).await?;
    info!("HEAD ref: {}", target);
    info!("Default ref: {}", compare);

    check.is_ancestor(&compare, &target).await
}
