//! Project domain model
//!
//! A GitLab project is the unit the fleet orchestrator watches.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Numeric GitLab project identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProjectId(pub u64);

impl fmt::Display for ProjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for ProjectId {
    fn from(id: u64) -> Self {
        Self(id)
    }
}

/// A project as listed by `GET /projects`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Project {
    /// Unique identifier of the project
    pub id: ProjectId,

    /// Human readable project name
    pub name: String,

    /// Name of the default branch
    ///
    /// GitLab reports `null` for projects with an empty repository.
    #[serde(default)]
    pub default_branch: Option<String>,
}

impl Project {
    pub fn new(id: impl Into<ProjectId>, name: impl Into<String>, default_branch: &str) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            default_branch: Some(default_branch.to_string()),
        }
    }
}

impl fmt::Display for Project {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (id: {})", self.name, self.id)
    }
}
