//! Driftwatch daemon
//!
//! Watches every project of a GitLab instance and reports branches that
//! diverged from their default branch without an open merge request.
//!
//! Architecture:
//! - Scheduler: fixed-interval, cancellable re-invocation of work
//! - Watcher: per-repository check cycle (branches, merge requests, compare)
//! - Fleet: project roster and the supervised group of watcher tasks
//! - Report: sinks for divergence findings

pub mod config;
pub mod fleet;
pub mod report;
pub mod scheduler;
pub mod watcher;

#[cfg(test)]
mod testing;

pub use config::Config;
pub use fleet::{FleetOrchestrator, FleetSettings, RosterHandle};
pub use report::{Reporter, TracingReporter};
pub use watcher::{RepositoryWatcher, WatchError};
