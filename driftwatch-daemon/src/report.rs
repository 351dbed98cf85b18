//! Divergence reporting sinks

use driftwatch_core::domain::Divergence;
use tracing::info;

/// Receives every divergence a watcher finds
pub trait Reporter: Send + Sync {
    fn report(&self, divergence: &Divergence);
}

/// Reports divergences as structured `info` log events
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingReporter;

impl Reporter for TracingReporter {
    fn report(&self, divergence: &Divergence) {
        info!(
            project_id = %divergence.project_id,
            project = %divergence.project_name,
            default_branch = %divergence.default_branch,
            branch = %divergence.branch,
            "{}",
            divergence
        );
    }
}
