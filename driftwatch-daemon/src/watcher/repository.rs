//! Per-repository state owned by a watcher

use driftwatch_core::domain::{Branch, Divergence, MergeRequestIndex, Project};

/// A project together with the branch and merge request data of its last
/// cycle
///
/// `branches` and `merge_requests` are replaced wholesale on every refresh.
#[derive(Debug, Clone)]
pub struct Repository {
    pub project: Project,
    pub branches: Vec<Branch>,
    pub merge_requests: MergeRequestIndex,
}

impl Repository {
    pub fn new(project: Project) -> Self {
        Self {
            project,
            branches: Vec::new(),
            merge_requests: MergeRequestIndex::new(),
        }
    }

    /// Default branch and the branches to compare against it
    ///
    /// `None` when the repository is trivially in sync: it has no default
    /// branch or fewer than two branches.
    pub fn comparison_targets(&self) -> Option<(String, Vec<String>)> {
        let default_branch = self.project.default_branch.as_ref()?;
        if self.branches.len() < 2 {
            return None;
        }

        let branches = self
            .branches
            .iter()
            .filter(|branch| &branch.name != default_branch)
            .map(|branch| branch.name.clone())
            .collect();

        Some((default_branch.clone(), branches))
    }

    /// Judges one branch given the compare outcome against the default branch
    ///
    /// A branch diverges when the compare reports no diff and no open merge
    /// request goes from it into the default branch.
    pub fn judge(&self, branch: &str, default_branch: &str, has_diff: bool) -> Option<Divergence> {
        if has_diff || self.merge_requests.contains(branch, default_branch) {
            return None;
        }

        Some(Divergence {
            project_id: self.project.id,
            project_name: self.project.name.clone(),
            default_branch: default_branch.to_string(),
            branch: branch.to_string(),
        })
    }
}
