//! GitHub-backed implementation of the issue tracker contract.
//!
//! REST for issues and milestones, GraphQL for the project-board link. The
//! exact-title search lists open and closed issues and scans for the first
//! exact match, which is what makes repeat invocations converge on one issue
//! instead of piling up duplicates.

use std::env;

use async_trait::async_trait;
use serde::Deserialize;
use tracing::{error, info, warn};

use crate::contract::{IssueRef, IssueTracker, IssueUpdate, MilestoneRef, NewIssue};
use crate::error::{LinkError, RemoteApiError};

const DEFAULT_API_URL: &str = "https://api.github.com";
const ACCEPT_JSON: &str = "application/vnd.github+json";

/// One page is the search horizon; titles older than the newest hundred
/// issues are treated as absent and re-created.
const SEARCH_PAGE_SIZE: u32 = 100;

const ADD_TO_PROJECT_MUTATION: &str = r#"
mutation($projectId: ID!, $contentId: ID!) {
  addProjectV2ItemById(input: {
    projectId: $projectId,
    contentId: $contentId
  }) {
    item {
      id
    }
  }
}
"#;

/// Token-authenticated client for one GitHub-compatible API endpoint.
pub struct GitHubClient {
    http: reqwest::Client,
    api_url: String,
    token: String,
}

impl GitHubClient {
    pub fn new(
        token: impl Into<String>,
        api_url: impl Into<String>,
    ) -> Result<Self, anyhow::Error> {
        // GitHub rejects requests without a User-Agent.
        let http = reqwest::Client::builder()
            .user_agent(concat!("intake-bridge/", env!("CARGO_PKG_VERSION")))
            .build()?;
        let api_url = api_url.into().trim_end_matches('/').to_string();
        Ok(GitHubClient {
            http,
            api_url,
            token: token.into(),
        })
    }

    /// Construct the client from `GITHUB_TOKEN`, honouring `GITHUB_API_URL`
    /// for enterprise or test endpoints.
    pub fn new_from_env() -> Result<Self, anyhow::Error> {
        dotenvy::dotenv().ok(); // loads environment variables from .env if present
        match env::var("GITHUB_TOKEN") {
            Ok(token) => {
                let api_url =
                    env::var("GITHUB_API_URL").unwrap_or_else(|_| DEFAULT_API_URL.to_string());
                info!(
                    api_url = %api_url,
                    token_set = !token.is_empty(),
                    "Initialized GitHubClient from environment"
                );
                GitHubClient::new(token, api_url)
            }
            Err(e) => {
                error!(error = ?e, "GITHUB_TOKEN missing in environment");
                Err(anyhow::anyhow!("GITHUB_TOKEN missing in environment"))
            }
        }
    }

    fn repo_url(&self, repo: &str, tail: &str) -> String {
        format!("{}/repos/{}/{}", self.api_url, repo, tail)
    }

    fn graphql_url(&self) -> String {
        format!("{}/graphql", self.api_url)
    }
}

/// The slice of an issue payload this pipeline reads.
#[derive(Debug, Deserialize)]
struct IssueWire {
    number: u64,
    node_id: String,
    #[serde(default)]
    title: String,
}

#[derive(Debug, Deserialize)]
struct MilestoneWire {
    number: u64,
    title: String,
}

#[derive(Debug, Deserialize)]
struct GraphQlWire {
    #[serde(default)]
    errors: Vec<serde_json::Value>,
}

#[async_trait]
impl IssueTracker for GitHubClient {
    async fn search_issue_by_title(
        &self,
        repo: &str,
        title: &str,
    ) -> Result<Option<IssueRef>, RemoteApiError> {
        let url = self.repo_url(
            repo,
            &format!("issues?state=all&per_page={SEARCH_PAGE_SIZE}"),
        );
        info!(repo, title, "Searching for existing issue by exact title");
        let resp = self
            .http
            .get(&url)
            .bearer_auth(&self.token)
            .header(reqwest::header::ACCEPT, ACCEPT_JSON)
            .send()
            .await?;
        let resp = ok_or_status(resp).await?;
        let issues: Vec<IssueWire> = resp.json().await?;

        // First listed match wins; later duplicates are ignored.
        let found = issues
            .into_iter()
            .find(|issue| issue.title == title)
            .map(|issue| IssueRef {
                number: issue.number,
                node_id: issue.node_id,
            });
        match &found {
            Some(issue) => info!(number = issue.number, "Found existing issue"),
            None => info!(title, "No existing issue with this title"),
        }
        Ok(found)
    }

    async fn list_milestones(&self, repo: &str) -> Result<Vec<MilestoneRef>, RemoteApiError> {
        let url = self.repo_url(repo, "milestones?state=all");
        info!(repo, "Listing milestones");
        let resp = self
            .http
            .get(&url)
            .bearer_auth(&self.token)
            .header(reqwest::header::ACCEPT, ACCEPT_JSON)
            .send()
            .await?;
        let resp = ok_or_status(resp).await?;
        let milestones: Vec<MilestoneWire> = resp.json().await?;
        info!(count = milestones.len(), "Fetched milestones");
        Ok(milestones
            .into_iter()
            .map(|m| MilestoneRef {
                number: m.number,
                title: m.title,
            })
            .collect())
    }

    async fn create_milestone(
        &self,
        repo: &str,
        title: &str,
    ) -> Result<MilestoneRef, RemoteApiError> {
        let url = self.repo_url(repo, "milestones");
        info!(repo, title, "Creating milestone");
        let resp = self
            .http
            .post(&url)
            .bearer_auth(&self.token)
            .header(reqwest::header::ACCEPT, ACCEPT_JSON)
            .json(&serde_json::json!({ "title": title }))
            .send()
            .await?;
        let resp = ok_or_status(resp).await?;
        let milestone: MilestoneWire = resp.json().await?;
        info!(number = milestone.number, "Created milestone");
        Ok(MilestoneRef {
            number: milestone.number,
            title: milestone.title,
        })
    }

    async fn create_issue<'a>(
        &self,
        repo: &str,
        issue: NewIssue<'a>,
    ) -> Result<IssueRef, RemoteApiError> {
        let url = self.repo_url(repo, "issues");
        info!(
            repo,
            title = issue.title,
            milestone = issue.milestone,
            "Creating issue"
        );
        let payload = serde_json::json!({
            "title": issue.title,
            "body": issue.body,
            "labels": issue.labels,
            "milestone": issue.milestone,
        });
        let resp = self
            .http
            .post(&url)
            .bearer_auth(&self.token)
            .header(reqwest::header::ACCEPT, ACCEPT_JSON)
            .json(&payload)
            .send()
            .await?;
        let resp = ok_or_status(resp).await?;
        let created: IssueWire = resp.json().await?;
        info!(number = created.number, "Created issue");
        Ok(IssueRef {
            number: created.number,
            node_id: created.node_id,
        })
    }

    async fn update_issue<'a>(
        &self,
        repo: &str,
        number: u64,
        update: IssueUpdate<'a>,
    ) -> Result<String, RemoteApiError> {
        let url = self.repo_url(repo, &format!("issues/{number}"));
        info!(repo, number, "Updating issue in place");
        let payload = serde_json::json!({
            "body": update.body,
            "labels": update.labels,
            "milestone": update.milestone,
        });
        let resp = self
            .http
            .patch(&url)
            .bearer_auth(&self.token)
            .header(reqwest::header::ACCEPT, ACCEPT_JSON)
            .json(&payload)
            .send()
            .await?;
        let resp = ok_or_status(resp).await?;
        let updated: IssueWire = resp.json().await?;
        info!(number = updated.number, "Updated issue");
        Ok(updated.node_id)
    }

    async fn link_to_project(&self, node_id: &str, project_id: &str) -> Result<(), LinkError> {
        info!(node_id, project_id, "Linking issue to project board");
        let payload = serde_json::json!({
            "query": ADD_TO_PROJECT_MUTATION,
            "variables": { "projectId": project_id, "contentId": node_id },
        });
        let resp = self
            .http
            .post(&self.graphql_url())
            .bearer_auth(&self.token)
            .json(&payload)
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp
                .text()
                .await
                .unwrap_or_else(|_| "<unreadable response body>".to_string());
            error!(status = status.as_u16(), body = %body, "Project link request failed");
            return Err(LinkError::Status {
                status: status.as_u16(),
                body,
            });
        }

        // GraphQL reports failures in-band: a 200 with an errors array is
        // still a failed link.
        let reply: GraphQlWire = resp.json().await?;
        if !reply.errors.is_empty() {
            let detail = serde_json::to_string(&reply.errors)
                .unwrap_or_else(|_| "<unserialisable errors>".to_string());
            warn!(detail = %detail, "Project link mutation rejected");
            return Err(LinkError::Mutation { detail });
        }

        info!(node_id, "Issue linked to project");
        Ok(())
    }
}

async fn ok_or_status(resp: reqwest::Response) -> Result<reqwest::Response, RemoteApiError> {
    let status = resp.status();
    if status.is_success() {
        Ok(resp)
    } else {
        let body = resp
            .text()
            .await
            .unwrap_or_else(|_| "<unreadable response body>".to_string());
        error!(status = status.as_u16(), body = %body, "Issue tracker request failed");
        Err(RemoteApiError::Status {
            status: status.as_u16(),
            body,
        })
    }
}
