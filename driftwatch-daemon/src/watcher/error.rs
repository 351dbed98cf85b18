//! Watcher cycle errors

use driftwatch_client::ClientError;
use driftwatch_core::domain::ProjectId;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, WatchError>;

/// Failure of one watcher cycle, tagged with the phase that failed
#[derive(Error, Debug)]
pub enum WatchError {
    #[error("failed to list branches of project {project}: {source}")]
    Branches {
        project: ProjectId,
        #[source]
        source: ClientError,
    },

    #[error("failed to list merge requests of project {project}: {source}")]
    MergeRequests {
        project: ProjectId,
        #[source]
        source: ClientError,
    },

    #[error(
        "failed to compare branch {branch} with {default_branch} in project {project}: {source}"
    )]
    Compare {
        project: ProjectId,
        branch: String,
        default_branch: String,
        #[source]
        source: ClientError,
    },
}

impl WatchError {
    pub fn project(&self) -> ProjectId {
        match self {
            WatchError::Branches { project, .. }
            | WatchError::MergeRequests { project, .. }
            | WatchError::Compare { project, .. } => *project,
        }
    }

    /// The client error that aborted the cycle
    pub fn client_error(&self) -> &ClientError {
        match self {
            WatchError::Branches { source, .. }
            | WatchError::MergeRequests { source, .. }
            | WatchError::Compare { source, .. } => source,
        }
    }
}
