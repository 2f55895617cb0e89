//! Blocking GitHub client over a shared `ureq` agent.
//!
//! Endpoints used:
//! - `GET  /users/{owner}/repos` — first page only, topics included
//! - `PUT  /repos/{owner}/{repo}/topics` — body `{"names": [...]}`

use std::time::Duration;

use serde::{Deserialize, Serialize};

use topicsync_core::{RemoteError, RepositoryHost, RepositorySnapshot};

use crate::error::GithubError;

pub const DEFAULT_API_URL: &str = "https://api.github.com";

const ACCEPT: &str = "application/vnd.github+json";
const API_VERSION: &str = "2022-11-28";
const TIMEOUT: Duration = Duration::from_secs(30);

// ---------------------------------------------------------------------------
// Wire types
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct RepoPayload {
    full_name: String,
    name: String,
    owner: OwnerPayload,
    #[serde(default)]
    topics: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct OwnerPayload {
    login: String,
}

impl From<RepoPayload> for RepositorySnapshot {
    fn from(p: RepoPayload) -> Self {
        Self {
            full_name: p.full_name,
            owner_login: p.owner.login,
            name: p.name,
            topics: p.topics,
        }
    }
}

#[derive(Debug, Serialize)]
struct TopicsBody<'a> {
    names: &'a [String],
}

// ---------------------------------------------------------------------------
// Client
// ---------------------------------------------------------------------------

/// GitHub API client, authenticated with a bearer token when one is configured.
pub struct GithubClient {
    agent: ureq::Agent,
    api_url: String,
    token: Option<String>,
}

impl GithubClient {
    /// Client for `api.github.com`. An empty `token` means unauthenticated.
    pub fn new(token: &str) -> Self {
        Self::with_api_url(DEFAULT_API_URL, token)
    }

    /// Client for another API root (GitHub Enterprise, test servers).
    pub fn with_api_url(api_url: impl Into<String>, token: &str) -> Self {
        let agent = ureq::AgentBuilder::new()
            .user_agent(concat!("topicsync/", env!("CARGO_PKG_VERSION")))
            .timeout(TIMEOUT)
            .build();
        let api_url = api_url.into().trim_end_matches('/').to_owned();
        let token = (!token.is_empty()).then(|| token.to_owned());
        Self {
            agent,
            api_url,
            token,
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.token.is_some()
    }

    pub fn list_user_repositories(
        &self,
        owner: &str,
    ) -> Result<Vec<RepositorySnapshot>, GithubError> {
        let url = format!("{}/users/{owner}/repos", self.api_url);
        let resp = self.request("GET", &url).call().map_err(map_ureq_error)?;
        let repos: Vec<RepoPayload> = resp.into_json().map_err(GithubError::Decode)?;
        Ok(repos.into_iter().map(RepositorySnapshot::from).collect())
    }

    pub fn replace_all_topics(
        &self,
        owner: &str,
        repo: &str,
        topics: &[String],
    ) -> Result<(), GithubError> {
        let url = format!("{}/repos/{owner}/{repo}/topics", self.api_url);
        self.request("PUT", &url)
            .send_json(TopicsBody { names: topics })
            .map_err(map_ureq_error)?;
        Ok(())
    }

    fn request(&self, method: &str, url: &str) -> ureq::Request {
        tracing::debug!(%method, %url, authenticated = self.is_authenticated(), "GitHub request");
        let req = self
            .agent
            .request(method, url)
            .set("Accept", ACCEPT)
            .set("X-GitHub-Api-Version", API_VERSION);
        match &self.token {
            Some(token) => req.set("Authorization", &format!("Bearer {token}")),
            None => req,
        }
    }
}

impl RepositoryHost for GithubClient {
    fn list_repositories(&self, owner: &str) -> Result<Vec<RepositorySnapshot>, RemoteError> {
        Ok(self.list_user_repositories(owner)?)
    }

    fn replace_topics(
        &self,
        owner: &str,
        repo: &str,
        topics: &[String],
    ) -> Result<(), RemoteError> {
        Ok(self.replace_all_topics(owner, repo, topics)?)
    }
}

// ---------------------------------------------------------------------------
// Private helpers
// ---------------------------------------------------------------------------

fn map_ureq_error(err: ureq::Error) -> GithubError {
    match err {
        ureq::Error::Status(status, resp) => {
            let body = resp.into_string().unwrap_or_default();
            GithubError::Status {
                status,
                message: error_message(&body),
            }
        }
        ureq::Error::Transport(t) => GithubError::Transport(Box::new(t)),
    }
}

/// The `message` field of a GitHub JSON error body, or the raw body.
fn error_message(body: &str) -> String {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|v| v.get("message")?.as_str().map(str::to_owned))
        .unwrap_or_else(|| body.trim().to_owned())
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------
