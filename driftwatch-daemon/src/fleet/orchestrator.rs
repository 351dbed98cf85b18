//! Fleet orchestrator
//!
//! Owns the watcher task group. Every refresh:
//! 1. reaps finished watcher tasks
//! 2. snapshots the roster's watching flags
//! 3. lists all projects and merges them into the roster
//! 4. starts a watcher for each project unwatched both now and in the
//!    snapshot
//!
//! Watchers run under child tokens of the fleet's root token, so shutting
//! the fleet down stops all of them.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use driftwatch_client::{ClientError, GitlabApi};
use driftwatch_core::domain::ProjectId;
use tokio::task::{JoinError, JoinSet};
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

use super::roster::RosterHandle;
use crate::report::Reporter;
use crate::scheduler::{PeriodicTask, Schedule};
use crate::watcher::RepositoryWatcher;

/// Intervals of the fleet's two schedules
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FleetSettings {
    /// How often the project list is refreshed
    pub repo_list_interval: Duration,
    /// How often each watcher checks its repository
    pub repo_interval: Duration,
}

impl Default for FleetSettings {
    fn default() -> Self {
        Self {
            repo_list_interval: Duration::from_secs(300),
            repo_interval: Duration::from_secs(60),
        }
    }
}

/// What one refresh did
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RefreshOutcome {
    /// Projects returned by the listing
    pub listed: usize,
    /// Projects seen for the first time
    pub added: usize,
    /// Projects a watcher was started for, by identity
    pub started: Vec<ProjectId>,
}

/// Roster plus the supervised group of watcher tasks
pub struct Fleet {
    api: Arc<dyn GitlabApi>,
    roster: RosterHandle,
    reporter: Arc<dyn Reporter>,
    repo_interval: Duration,
    root: CancellationToken,
    tasks: JoinSet<ProjectId>,
    watchers: HashMap<ProjectId, CancellationToken>,
    panics: usize,
}

impl Fleet {
    pub fn new(
        api: Arc<dyn GitlabApi>,
        reporter: Arc<dyn Reporter>,
        repo_interval: Duration,
        root: CancellationToken,
    ) -> Self {
        Self {
            api,
            roster: RosterHandle::new(),
            reporter,
            repo_interval,
            root,
            tasks: JoinSet::new(),
            watchers: HashMap::new(),
            panics: 0,
        }
    }

    pub fn roster(&self) -> &RosterHandle {
        &self.roster
    }

    /// Lists the projects and starts the missing watchers
    ///
    /// A listing failure leaves the roster and every running watcher as
    /// they were.
    pub async fn refresh(&mut self) -> Result<RefreshOutcome, ClientError> {
        self.reap();

        let prior = self.roster.snapshot();
        let projects = self.api.list_projects().await?;
        let listed = projects.len();
        let added = self.roster.merge(projects);

        let mut started = Vec::new();
        for id in self.roster.unwatched(&prior) {
            if self.start_watcher(id) {
                started.push(id);
            }
        }

        let absent = self.roster.len().saturating_sub(listed);
        if absent > 0 {
            warn!("{} known project(s) missing from the listing stay watched", absent);
        }
        info!(
            "Refreshed project list: {} listed, {} new, {} watcher(s) started",
            listed,
            added,
            started.len()
        );

        Ok(RefreshOutcome {
            listed,
            added,
            started,
        })
    }

    /// Spawns a watcher for `id`, replacing any previous one
    fn start_watcher(&mut self, id: ProjectId) -> bool {
        let Some(project) = self.roster.project(id) else {
            return false;
        };

        if let Some(previous) = self.watchers.remove(&id) {
            debug!("Stopping previous watcher for project {}", id);
            previous.cancel();
        }

        let token = self.root.child_token();
        let watcher = RepositoryWatcher::new(
            project,
            self.api.clone(),
            self.roster.clone(),
            self.reporter.clone(),
        );
        let schedule = Schedule::new(format!("project {}", id), self.repo_interval);

        self.tasks.spawn(watcher.run(schedule, token.clone()));
        self.watchers.insert(id, token);
        self.roster.mark_watching(id);
        true
    }

    /// Collects watcher tasks that already finished
    fn reap(&mut self) {
        while let Some(result) = self.tasks.try_join_next() {
            self.joined(result);
        }
    }

    fn joined(&mut self, result: Result<ProjectId, JoinError>) {
        match result {
            Ok(id) => debug!("Watcher task for project {} finished", id),
            Err(e) if e.is_panic() => {
                self.panics += 1;
                error!("Watcher task panicked: {}", e);
            }
            Err(e) => debug!("Watcher task ended: {}", e),
        }
    }

    /// Token of the current watcher for `id`, if one was started
    #[cfg(test)]
    pub fn watcher_token(&self, id: ProjectId) -> Option<CancellationToken> {
        self.watchers.get(&id).cloned()
    }

    /// Number of watcher tasks not yet reaped
    pub fn live_watchers(&self) -> usize {
        self.tasks.len()
    }

    /// Cancels every watcher and waits for the group to drain
    ///
    /// Returns the number of watcher tasks that panicked over the fleet's
    /// lifetime.
    pub async fn shutdown(mut self) -> usize {
        self.root.cancel();
        while let Some(result) = self.tasks.join_next().await {
            self.joined(result);
        }
        self.panics
    }
}

impl PeriodicTask for Fleet {
    type Error = ClientError;

    async fn run_once(&mut self) -> Result<(), ClientError> {
        self.refresh().await.map(|_| ())
    }
}

/// Runs the fleet until cancellation
pub struct FleetOrchestrator {
    api: Arc<dyn GitlabApi>,
    reporter: Arc<dyn Reporter>,
    settings: FleetSettings,
}

impl FleetOrchestrator {
    pub fn new(
        api: Arc<dyn GitlabApi>,
        reporter: Arc<dyn Reporter>,
        settings: FleetSettings,
    ) -> Self {
        Self {
            api,
            reporter,
            settings,
        }
    }

    /// Refreshes the project list on its schedule until `token` is
    /// cancelled, then stops every watcher
    ///
    /// The first refresh happens immediately. Returns only after all
    /// watcher tasks have ended, and fails if any of them panicked.
    pub async fn run(self, token: CancellationToken) -> anyhow::Result<()> {
        info!(
            "Starting fleet orchestrator (list interval: {:?}, repository interval: {:?})",
            self.settings.repo_list_interval, self.settings.repo_interval
        );

        let mut fleet = Fleet::new(
            self.api,
            self.reporter,
            self.settings.repo_interval,
            token.child_token(),
        );
        let schedule = Schedule::new("repository list", self.settings.repo_list_interval);

        schedule.run(&token, &mut fleet).await;

        info!("Stopping {} watcher(s)", fleet.live_watchers());
        let panics = fleet.shutdown().await;
        if panics > 0 {
            anyhow::bail!("{} watcher task(s) panicked", panics);
        }

        info!("Fleet orchestrator stopped");
        Ok(())
    }
}
