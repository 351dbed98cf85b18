//! Fleet orchestration
//!
//! The fleet keeps one repository watcher running per known project. A
//! periodic refresh re-lists the projects, folds them into the shared
//! [`RosterHandle`] and starts watchers for every project that has none.

mod orchestrator;
mod roster;

pub use orchestrator::{Fleet, FleetOrchestrator, FleetSettings, RefreshOutcome};
pub use roster::{PriorRoster, Roster, RosterEntry, RosterHandle};
