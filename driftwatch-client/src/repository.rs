//! Repository-related API endpoints

use driftwatch_core::domain::{Branch, Compare, MergeRequest, ProjectId};
use reqwest::Url;
use tracing::debug;

use crate::GitlabClient;
use crate::error::{ClientError, Result};
use crate::pagination::{PAGE_SIZE, collect_all};

impl GitlabClient {
    // =============================================================================
    // Branches & Merge Requests
    // =============================================================================

    /// List every branch of a project
    ///
    /// # Arguments
    /// * `project` - The project ID
    pub async fn list_branches(&self, project: ProjectId) -> Result<Vec<Branch>> {
        let base = format!("{}/projects/{}/repository/branches", self.api_url, project);
        collect_all(
            &self.fetcher,
            |page| format!("{}?per_page={}&page={}", base, PAGE_SIZE, page),
            None,
        )
        .await
    }

    /// List the open merge requests of a project
    ///
    /// # Arguments
    /// * `project` - The project ID
    pub async fn list_merge_requests(&self, project: ProjectId) -> Result<Vec<MergeRequest>> {
        let base = format!("{}/projects/{}/merge_requests", self.api_url, project);
        collect_all(
            &self.fetcher,
            |page| format!("{}?state=opened&per_page={}&page={}", base, PAGE_SIZE, page),
            None,
        )
        .await
    }

    // =============================================================================
    // Compare
    // =============================================================================

    /// Compare `source` against `target`
    ///
    /// # Arguments
    /// * `project` - The project ID
    /// * `source` - Branch whose changes are inspected (`to`)
    /// * `target` - Branch compared against (`from`)
    ///
    /// # Returns
    /// `true` when GitLab reports at least one diff between the two
    pub async fn compare_branches(
        &self,
        project: ProjectId,
        source: &str,
        target: &str,
    ) -> Result<bool> {
        let mut url = Url::parse(&format!(
            "{}/projects/{}/repository/compare",
            self.api_url, project
        ))
        .map_err(|e| ClientError::InvalidUrl(e.to_string()))?;
        url.query_pairs_mut()
            .append_pair("from", target)
            .append_pair("to", source);

        let compare: Compare = self.fetcher.get(url.as_str()).await?;
        debug!(
            "Compared {} against {} in project {}: {} diff(s)",
            source,
            target,
            project,
            compare.diffs.len()
        );

        Ok(compare.has_diff())
    }
}
