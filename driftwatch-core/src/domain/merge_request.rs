//! Merge request domain model

use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

/// An open merge request, reduced to its branch pair
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MergeRequest {
    pub source_branch: String,
    pub target_branch: String,
}

impl MergeRequest {
    pub fn new(source_branch: impl Into<String>, target_branch: impl Into<String>) -> Self {
        Self {
            source_branch: source_branch.into(),
            target_branch: target_branch.into(),
        }
    }
}

/// Set of `(source, target)` branch pairs with an open merge request
///
/// Rebuilt wholesale on every watcher cycle. Membership is the only query.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MergeRequestIndex {
    // source branch -> target branches
    targets: HashMap<String, HashSet<String>>,
}

impl MergeRequestIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether an open merge request goes from `source` into `target`
    pub fn contains(&self, source: &str, target: &str) -> bool {
        self.targets
            .get(source)
            .is_some_and(|targets| targets.contains(target))
    }

    /// Number of distinct `(source, target)` pairs
    pub fn len(&self) -> usize {
        self.targets.values().map(HashSet::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.targets.is_empty()
    }
}

impl FromIterator<MergeRequest> for MergeRequestIndex {
    fn from_iter<I: IntoIterator<Item = MergeRequest>>(iter: I) -> Self {
        let mut targets: HashMap<String, HashSet<String>> = HashMap::new();
        for mr in iter {
            targets
                .entry(mr.source_branch)
                .or_default()
                .insert(mr.target_branch);
        }
        Self { targets }
    }
}
