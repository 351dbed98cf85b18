//! Divergence report

use serde::{Deserialize, Serialize};
use std::fmt;

use super::ProjectId;

/// A non-default branch whose comparison against the default branch came
/// back clean while no open merge request targets the default branch from it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Divergence {
    pub project_id: ProjectId,
    pub project_name: String,
    pub default_branch: String,
    pub branch: String,
}

impl fmt::Display for Divergence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "divergence in project {} (id: {}) between default branch ({}) and branch {}",
            self.project_name, self.project_id, self.default_branch, self.branch
        )
    }
}
