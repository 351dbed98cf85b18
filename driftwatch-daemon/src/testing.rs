//! In-memory doubles for daemon tests

use std::collections::{HashMap, HashSet};
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use driftwatch_client::{ClientError, GitlabApi, RawResponse, Result, Transport};
use driftwatch_core::domain::{Branch, Divergence, MergeRequest, Project, ProjectId};

use crate::report::Reporter;

/// One recorded API call
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    ListProjects,
    ListBranches(ProjectId),
    ListMergeRequests(ProjectId),
    Compare {
        project: ProjectId,
        source: String,
        target: String,
    },
}

#[derive(Default)]
struct State {
    projects: Vec<Project>,
    branches: HashMap<ProjectId, Vec<Branch>>,
    merge_requests: HashMap<ProjectId, Vec<MergeRequest>>,
    diffs: HashSet<(ProjectId, String)>,
    fail_projects: bool,
    fail_branches: HashSet<ProjectId>,
    fail_merge_requests: HashSet<ProjectId>,
    fail_compare: HashSet<ProjectId>,
    fail_compare_branches: HashSet<(ProjectId, String)>,
    calls: Vec<Call>,
}

/// Scriptable in-memory GitLab
///
/// Compares report no diff unless [`FakeGitlab::set_diff`] says otherwise.
#[derive(Default)]
pub struct FakeGitlab {
    state: Mutex<State>,
}

impl FakeGitlab {
    pub fn new() -> Self {
        Self::default()
    }

    fn state(&self) -> std::sync::MutexGuard<'_, State> {
        self.state.lock().unwrap()
    }

    pub fn set_projects(&self, projects: Vec<Project>) {
        self.state().projects = projects;
    }

    pub fn set_branches(&self, project: u64, names: &[&str]) {
        self.state().branches.insert(
            ProjectId(project),
            names.iter().map(|name| Branch::new(*name)).collect(),
        );
    }

    pub fn set_merge_requests(&self, project: u64, pairs: &[(&str, &str)]) {
        self.state().merge_requests.insert(
            ProjectId(project),
            pairs
                .iter()
                .map(|(source, target)| MergeRequest::new(*source, *target))
                .collect(),
        );
    }

    /// Makes compare of `branch` against the default branch report a diff
    pub fn set_diff(&self, project: u64, branch: &str) {
        self.state()
            .diffs
            .insert((ProjectId(project), branch.to_string()));
    }

    pub fn fail_projects(&self, fail: bool) {
        self.state().fail_projects = fail;
    }

    pub fn fail_branches(&self, project: u64, fail: bool) {
        toggle(&mut self.state().fail_branches, ProjectId(project), fail);
    }

    pub fn fail_merge_requests(&self, project: u64, fail: bool) {
        toggle(&mut self.state().fail_merge_requests, ProjectId(project), fail);
    }

    pub fn fail_compare(&self, project: u64, fail: bool) {
        toggle(&mut self.state().fail_compare, ProjectId(project), fail);
    }

    /// Makes compare of `branch` fail while other branches still succeed
    pub fn fail_compare_branch(&self, project: u64, branch: &str) {
        self.state()
            .fail_compare_branches
            .insert((ProjectId(project), branch.to_string()));
    }

    pub fn calls(&self) -> Vec<Call> {
        self.state().calls.clone()
    }

    pub fn compare_calls(&self, project: u64) -> usize {
        self.calls()
            .iter()
            .filter(|call| matches!(call, Call::Compare { project: p, .. } if *p == ProjectId(project)))
            .count()
    }
}

fn toggle(set: &mut HashSet<ProjectId>, id: ProjectId, on: bool) {
    if on {
        set.insert(id);
    } else {
        set.remove(&id);
    }
}

fn unavailable(url: &str) -> ClientError {
    ClientError::RequestExhausted {
        url: url.to_string(),
        attempts: 3,
        last: Box::new(ClientError::status(503, url, "Service Unavailable")),
    }
}

#[async_trait]
impl GitlabApi for FakeGitlab {
    async fn list_projects(&self) -> Result<Vec<Project>> {
        let mut state = self.state();
        state.calls.push(Call::ListProjects);
        if state.fail_projects {
            return Err(unavailable("fake://projects"));
        }
        Ok(state.projects.clone())
    }

    async fn list_branches(&self, project: ProjectId) -> Result<Vec<Branch>> {
        let mut state = self.state();
        state.calls.push(Call::ListBranches(project));
        if state.fail_branches.contains(&project) {
            return Err(unavailable("fake://branches"));
        }
        Ok(state.branches.get(&project).cloned().unwrap_or_default())
    }

    async fn list_merge_requests(&self, project: ProjectId) -> Result<Vec<MergeRequest>> {
        let mut state = self.state();
        state.calls.push(Call::ListMergeRequests(project));
        if state.fail_merge_requests.contains(&project) {
            return Err(unavailable("fake://merge_requests"));
        }
        Ok(state.merge_requests.get(&project).cloned().unwrap_or_default())
    }

    async fn compare_branches(&self, project: ProjectId, source: &str, target: &str) -> Result<bool> {
        let mut state = self.state();
        state.calls.push(Call::Compare {
            project,
            source: source.to_string(),
            target: target.to_string(),
        });
        if state.fail_compare.contains(&project)
            || state
                .fail_compare_branches
                .contains(&(project, source.to_string()))
        {
            return Err(unavailable("fake://compare"));
        }
        Ok(state.diffs.contains(&(project, source.to_string())))
    }
}

/// Reporter that keeps every divergence it receives
#[derive(Default)]
pub struct CollectingReporter {
    reports: Mutex<Vec<Divergence>>,
}

impl CollectingReporter {
    pub fn reports(&self) -> Vec<Divergence> {
        self.reports.lock().unwrap().clone()
    }
}

impl Reporter for CollectingReporter {
    fn report(&self, divergence: &Divergence) {
        self.reports.lock().unwrap().push(divergence.clone());
    }
}

/// Transport that answers every request with a full page of branches, so
/// paginated listings never end
#[derive(Default)]
pub struct EndlessPages {
    requests: AtomicUsize,
}

impl EndlessPages {
    pub fn requests(&self) -> usize {
        self.requests.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Transport for EndlessPages {
    async fn send(
        &self,
        _method: reqwest::Method,
        _url: &str,
        _body: Option<&serde_json::Value>,
    ) -> Result<RawResponse> {
        let page = self.requests.fetch_add(1, Ordering::SeqCst);
        let branches: Vec<serde_json::Value> = (0..100)
            .map(|n| serde_json::json!({ "name": format!("branch-{}-{}", page, n) }))
            .collect();
        Ok(RawResponse::new(200, serde_json::Value::Array(branches).to_string()))
    }
}
