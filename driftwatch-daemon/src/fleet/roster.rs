//! Shared roster of known projects
//!
//! The roster maps each project identity to its latest metadata and a
//! `watching` flag. The fleet orchestrator writes it on every refresh,
//! watchers read their metadata from it and clear their own flag when a
//! cycle fails.

use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use driftwatch_core::domain::{Project, ProjectId};

/// Watching flags captured before a refresh
pub type PriorRoster = HashMap<ProjectId, bool>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RosterEntry {
    pub project: Project,
    /// A live watcher is believed to be monitoring this project
    pub watching: bool,
}

/// Known projects, keyed by identity
#[derive(Debug, Default)]
pub struct Roster {
    entries: BTreeMap<ProjectId, RosterEntry>,
}

impl Roster {
    pub fn new() -> Self {
        Self::default()
    }

    /// Copies every watching flag
    pub fn snapshot(&self) -> PriorRoster {
        self.entries
            .iter()
            .map(|(id, entry)| (*id, entry.watching))
            .collect()
    }

    /// Folds a fresh listing into the roster
    ///
    /// Listed projects replace their metadata and keep their flag. New
    /// projects enter unwatched. Projects missing from the listing are left
    /// untouched. Returns how many projects were new.
    pub fn merge(&mut self, projects: Vec<Project>) -> usize {
        let mut added = 0;
        for project in projects {
            match self.entries.get_mut(&project.id) {
                Some(entry) => entry.project = project,
                None => {
                    added += 1;
                    self.entries.insert(
                        project.id,
                        RosterEntry {
                            project,
                            watching: false,
                        },
                    );
                }
            }
        }
        added
    }

    /// Identities that need a watcher started
    ///
    /// An identity qualifies when its flag is false now and was false or
    /// absent in `prior`. Ordered by identity.
    pub fn unwatched(&self, prior: &PriorRoster) -> Vec<ProjectId> {
        self.entries
            .iter()
            .filter(|(id, entry)| !entry.watching && !prior.get(id).copied().unwrap_or(false))
            .map(|(id, _)| *id)
            .collect()
    }

    /// Sets the flag of a known project; unknown identities are ignored
    pub fn set_watching(&mut self, id: ProjectId, watching: bool) -> bool {
        match self.entries.get_mut(&id) {
            Some(entry) => {
                entry.watching = watching;
                true
            }
            None => false,
        }
    }

    pub fn get(&self, id: ProjectId) -> Option<&RosterEntry> {
        self.entries.get(&id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Cloneable, lock-guarded handle to a [`Roster`]
///
/// No method holds the lock across an await point. A poisoned lock is
/// recovered, since every mutation leaves the roster consistent.
#[derive(Debug, Clone, Default)]
pub struct RosterHandle {
    inner: Arc<RwLock<Roster>>,
}

impl RosterHandle {
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> RwLockReadGuard<'_, Roster> {
        self.inner.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, Roster> {
        self.inner.write().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn snapshot(&self) -> PriorRoster {
        self.read().snapshot()
    }

    pub fn merge(&self, projects: Vec<Project>) -> usize {
        self.write().merge(projects)
    }

    pub fn unwatched(&self, prior: &PriorRoster) -> Vec<ProjectId> {
        self.read().unwatched(prior)
    }

    pub fn mark_watching(&self, id: ProjectId) -> bool {
        self.write().set_watching(id, true)
    }

    /// Clears the flag so the next refresh starts a replacement watcher
    pub fn mark_unhealthy(&self, id: ProjectId) -> bool {
        self.write().set_watching(id, false)
    }

    /// Inserts or replaces a single project, leaving its flag as it was
    pub fn upsert(&self, project: Project) {
        self.write().merge(vec![project]);
    }

    pub fn project(&self, id: ProjectId) -> Option<Project> {
        self.read().get(id).map(|entry| entry.project.clone())
    }

    pub fn is_watching(&self, id: ProjectId) -> bool {
        self.read().get(id).is_some_and(|entry| entry.watching)
    }

    pub fn len(&self) -> usize {
        self.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.read().is_empty()
    }
}
