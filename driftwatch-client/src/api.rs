//! Abstract GitLab API used by the daemon
//!
//! Watchers and the fleet orchestrator only see this trait, which lets them
//! run against an in-memory fake in tests.

use async_trait::async_trait;
use driftwatch_core::domain::{Branch, MergeRequest, Project, ProjectId};

use crate::GitlabClient;
use crate::error::Result;

/// The slice of the GitLab API the divergence monitor consumes
#[async_trait]
pub trait GitlabApi: Send + Sync {
    /// All projects visible to the token
    async fn list_projects(&self) -> Result<Vec<Project>>;

    /// All branches of a project
    async fn list_branches(&self, project: ProjectId) -> Result<Vec<Branch>>;

    /// All open merge requests of a project
    async fn list_merge_requests(&self, project: ProjectId) -> Result<Vec<MergeRequest>>;

    /// Whether `source` has a diff against `target`
    async fn compare_branches(&self, project: ProjectId, source: &str, target: &str)
    -> Result<bool>;
}

#[async_trait]
impl GitlabApi for GitlabClient {
    async fn list_projects(&self) -> Result<Vec<Project>> {
        GitlabClient::list_projects(self).await
    }

    async fn list_branches(&self, project: ProjectId) -> Result<Vec<Branch>> {
        GitlabClient::list_branches(self, project).await
    }

    async fn list_merge_requests(&self, project: ProjectId) -> Result<Vec<MergeRequest>> {
        GitlabClient::list_merge_requests(self, project).await
    }

    async fn compare_branches(
        &self,
        project: ProjectId,
        source: &str,
        target: &str,
    ) -> Result<bool> {
        GitlabClient::compare_branches(self, project, source, target).await
    }
}
