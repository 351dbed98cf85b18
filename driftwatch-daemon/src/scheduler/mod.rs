//! Scheduler layer for the daemon
//!
//! Re-invokes a unit of work on a fixed interval until cancellation. Both
//! the fleet orchestrator (roster refresh) and every repository watcher
//! (per-repository check) run on a [`Schedule`].

pub mod periodic;

pub use periodic::{FirstTick, PeriodicTask, Schedule, Ticks};
