use async_trait::async_trait;
use octocrab::Octocrab;
use reqwest::StatusCode;
use thiserror::Error;

use crate::contributions::PrLocator;
use crate::github::types::PullRequestSummary;

/// Failure modes of a single pull request lookup
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LookupError {
    #[error("pull request not found")]
    NotFound,
    #[error("lookup returned HTTP {0}")]
    Status(u16),
    #[error("network error: {0}")]
    Network(String),
    #[error("malformed response: {0}")]
    Malformed(String),
    #[error("lookup timed out")]
    Timeout,
}

impl LookupError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, LookupError::NotFound)
    }
}

/// Read-only access to a single pull request.
///
/// Implementations must be `Send + Sync` so one client can serve every
/// row's resolution task.
#[async_trait]
pub trait PullRequestLookup: Send + Sync {
    async fn fetch(&self, locator: &PrLocator) -> Result<PullRequestSummary, LookupError>;
}

/// Anonymous lookup against the REST endpoint
pub struct RestLookup {
    client: reqwest::Client,
    api_base: String,
}

impl RestLookup {
    pub fn new(client: reqwest::Client, api_base: impl Into<String>) -> Self {
        Self {
            client,
            api_base: api_base.into(),
        }
    }

    fn endpoint(&self, locator: &PrLocator) -> String {
        format!(
            "{}/repos/{}/{}/pulls/{}",
            self.api_base.trim_end_matches('/'),
            locator.owner,
            locator.repo,
            locator.number
        )
    }
}

fn from_reqwest(e: reqwest::Error) -> LookupError {
    if e.is_timeout() {
        LookupError::Timeout
    } else {
        LookupError::Network(e.to_string())
    }
}

#[async_trait]
impl PullRequestLookup for RestLookup {
    async fn fetch(&self, locator: &PrLocator) -> Result<PullRequestSummary, LookupError> {
        let response = self
            .client
            .get(self.endpoint(locator))
            .header("Accept", "application/vnd.github+json")
            .send()
            .await
            .map_err(from_reqwest)?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Err(LookupError::NotFound);
        }
        if !status.is_success() {
            return Err(LookupError::Status(status.as_u16()));
        }

        let body = response.bytes().await.map_err(from_reqwest)?;
        serde_json::from_slice(&body).map_err(|e| LookupError::Malformed(e.to_string()))
    }
}

/// Authenticated lookup through octocrab
pub struct OctocrabLookup {
    client: Octocrab,
}

impl OctocrabLookup {
    pub fn new(client: Octocrab) -> Self {
        Self { client }
    }
}

#[async_trait]
impl PullRequestLookup for OctocrabLookup {
    async fn fetch(&self, locator: &PrLocator) -> Result<PullRequestSummary, LookupError> {
        let pr = self
            .client
            .pulls(locator.owner.as_str(), locator.repo.as_str())
            .get(locator.number)
            .await
            .map_err(|e| match e {
                octocrab::Error::GitHub { source, .. } => match source.status_code.as_u16() {
                    404 => LookupError::NotFound,
                    code => LookupError::Status(code),
                },
                octocrab::Error::Json { source, .. } => LookupError::Malformed(source.to_string()),
                octocrab::Error::Serde { source, .. } => LookupError::Malformed(source.to_string()),
                other => LookupError::Network(other.to_string()),
            })?;

        let title = pr
            .title
            .ok_or_else(|| LookupError::Malformed("missing title".to_string()))?;
        let state = match pr.state {
            Some(octocrab::models::IssueState::Closed) => "closed",
            _ => "open",
        };

        Ok(PullRequestSummary {
            title,
            state: state.to_string(),
            merged: pr.merged.unwrap_or(false) || pr.merged_at.is_some(),
        })
    }
}
