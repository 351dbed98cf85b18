//! Project-related API endpoints

use driftwatch_core::domain::{Project, ProjectId};
use tracing::info;

use crate::GitlabClient;
use crate::error::Result;
use crate::pagination::{PAGE_SIZE, collect_all};

impl GitlabClient {
    // =============================================================================
    // Project Listing
    // =============================================================================

    /// List every project visible to the token
    ///
    /// # Returns
    /// All projects, across all pages, in API order
    pub async fn list_projects(&self) -> Result<Vec<Project>> {
        info!("Updating repository list");

        let base = format!("{}/projects", self.api_url);
        let projects: Vec<Project> = collect_all(
            &self.fetcher,
            |page| format!("{}?per_page={}&page={}", base, PAGE_SIZE, page),
            None,
        )
        .await?;

        info!("There are {} projects in this GitLab", projects.len());
        Ok(projects)
    }

    /// Get a single project by ID
    pub async fn get_project(&self, project: ProjectId) -> Result<Project> {
        self.fetcher
            .get(&format!("{}/projects/{}", self.api_url, project))
            .await
    }
}

#[cfg(test)]
mod tests {
    use crate::testing::ScriptedTransport;
    use crate::{ClientOptions, GitlabClient};
    use driftwatch_core::domain::ProjectId;
    use std::sync::Arc;
    use std::time::Duration;

    #[tokio::test]
    async fn test_list_projects() {
        let transport = Arc::new(ScriptedTransport::new().respond(
            200,
            r#"[
                {"id": 1, "name": "api", "default_branch": "main"},
                {"id": 2, "name": "web", "default_branch": "master"},
                {"id": 3, "name": "empty", "default_branch": null}
            ]"#,
        ));
        let options = ClientOptions {
            request_delay: Duration::ZERO,
            ..ClientOptions::default()
        };
        let client =
            GitlabClient::with_transport("gitlab.example.com", transport.clone(), options).unwrap();

        let projects = client.list_projects().await.unwrap();

        assert_eq!(projects.len(), 3);
        assert_eq!(projects[0].id, ProjectId(1));
        assert_eq!(projects[1].default_branch.as_deref(), Some("master"));
        assert_eq!(projects[2].default_branch, None);
        assert_eq!(
            transport.requests(),
            vec!["https://gitlab.example.com/api/v4/projects?per_page=100&page=1".to_string()]
        );
    }

    #[tokio::test]
    async fn test_get_project() {
        let transport = Arc::new(
            ScriptedTransport::new()
                .respond(200, r#"{"id": 12, "name": "billing", "default_branch": "develop"}"#),
        );
        let options = ClientOptions {
            request_delay: Duration::ZERO,
            ..ClientOptions::default()
        };
        let client =
            GitlabClient::with_transport("gitlab.example.com", transport.clone(), options).unwrap();

        let project = client.get_project(ProjectId(12)).await.unwrap();

        assert_eq!(project.name, "billing");
        assert_eq!(project.default_branch.as_deref(), Some("develop"));
        assert_eq!(
            transport.requests(),
            vec!["https://gitlab.example.com/api/v4/projects/12".to_string()]
        );
    }
}
