//! Repository watcher
//!
//! One watcher monitors one project. Each cycle runs three phases in strict
//! order:
//! 1. refresh the branch list
//! 2. refresh the open merge requests and rebuild the index
//! 3. compare every non-default branch with the default branch and report
//!    divergences
//!
//! A failing phase aborts the cycle and clears the project's roster flag so
//! the fleet orchestrator starts a replacement on its next refresh.

mod error;
mod repository;

pub use error::{Result, WatchError};
pub use repository::Repository;

use std::sync::Arc;

use driftwatch_client::GitlabApi;
use driftwatch_core::domain::{Divergence, Project, ProjectId};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use crate::fleet::RosterHandle;
use crate::report::Reporter;
use crate::scheduler::{PeriodicTask, Schedule};

pub struct RepositoryWatcher {
    repository: Repository,
    api: Arc<dyn GitlabApi>,
    roster: RosterHandle,
    reporter: Arc<dyn Reporter>,
}

impl RepositoryWatcher {
    pub fn new(
        project: Project,
        api: Arc<dyn GitlabApi>,
        roster: RosterHandle,
        reporter: Arc<dyn Reporter>,
    ) -> Self {
        Self {
            repository: Repository::new(project),
            api,
            roster,
            reporter,
        }
    }

    pub fn project_id(&self) -> ProjectId {
        self.repository.project.id
    }

    pub fn repository(&self) -> &Repository {
        &self.repository
    }

    /// Runs the three phases once and returns the divergences found
    ///
    /// Each divergence is reported as soon as its branch is judged, so a
    /// compare failure later in the cycle keeps the earlier reports. The
    /// roster flag is left alone; see [`RepositoryWatcher::run_cycle`].
    pub async fn check_once(&mut self) -> Result<Vec<Divergence>> {
        self.refresh_metadata();
        self.refresh_branches().await?;
        self.refresh_merge_requests().await?;
        self.evaluate().await
    }

    /// One scheduled cycle: check and clear the roster flag on failure
    ///
    /// Returns the number of divergences reported.
    pub async fn run_cycle(&mut self) -> Result<usize> {
        match self.check_once().await {
            Ok(divergences) => Ok(divergences.len()),
            Err(e) => {
                self.roster.mark_unhealthy(self.project_id());
                Err(e)
            }
        }
    }

    /// Runs cycles on `schedule` until `token` is cancelled
    pub async fn run(mut self, schedule: Schedule, token: CancellationToken) -> ProjectId {
        let id = self.project_id();
        info!("Watching {}", self.repository.project);

        schedule.run(&token, &mut self).await;

        debug!("Watcher for project {} stopped", id);
        id
    }

    fn refresh_metadata(&mut self) {
        if let Some(project) = self.roster.project(self.project_id()) {
            self.repository.project = project;
        }
    }

    async fn refresh_branches(&mut self) -> Result<()> {
        let project = self.project_id();
        debug!("Updating branches of project {}", project);

        self.repository.branches = self
            .api
            .list_branches(project)
            .await
            .map_err(|source| WatchError::Branches { project, source })?;
        Ok(())
    }

    async fn refresh_merge_requests(&mut self) -> Result<()> {
        let project = self.project_id();
        debug!("Updating merge requests of project {}", project);

        let merge_requests = self
            .api
            .list_merge_requests(project)
            .await
            .map_err(|source| WatchError::MergeRequests { project, source })?;
        self.repository.merge_requests = merge_requests.into_iter().collect();
        Ok(())
    }

    async fn evaluate(&self) -> Result<Vec<Divergence>> {
        let project = self.project_id();
        let Some((default_branch, branches)) = self.repository.comparison_targets() else {
            debug!("Project {} is trivially in sync", project);
            return Ok(Vec::new());
        };

        let mut divergences = Vec::new();
        for branch in branches {
            let has_diff = self
                .api
                .compare_branches(project, &branch, &default_branch)
                .await
                .map_err(|source| WatchError::Compare {
                    project,
                    branch: branch.clone(),
                    default_branch: default_branch.clone(),
                    source,
                })?;

            if let Some(divergence) = self.repository.judge(&branch, &default_branch, has_diff) {
                self.reporter.report(&divergence);
                divergences.push(divergence);
            }
        }

        Ok(divergences)
    }
}

impl PeriodicTask for RepositoryWatcher {
    type Error = WatchError;

    async fn run_once(&mut self) -> Result<()> {
        self.run_cycle().await.map(|_| ())
    }
}

impl Drop for RepositoryWatcher {
    fn drop(&mut self) {
        if std::thread::panicking() {
            self.roster.mark_unhealthy(self.project_id());
        }
    }
}
