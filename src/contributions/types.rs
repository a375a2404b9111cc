use serde::{Deserialize, Serialize};
use std::fmt;

/// Lifecycle state that can be written into the content config for private
/// contributions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PrState {
    Open,
    Closed,
    Merged,
}

/// Displayed lifecycle status of a contribution.
///
/// `Unknown` is a normal terminal value: it is what a row shows when nothing
/// trustworthy could be learned about the pull request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContributionStatus {
    Open,
    Closed,
    Merged,
    Unknown,
}

impl ContributionStatus {
    pub fn label(&self) -> &'static str {
        match self {
            ContributionStatus::Open => "open",
            ContributionStatus::Closed => "closed",
            ContributionStatus::Merged => "merged",
            ContributionStatus::Unknown => "unknown",
        }
    }
}

impl From<PrState> for ContributionStatus {
    fn from(state: PrState) -> Self {
        match state {
            PrState::Open => ContributionStatus::Open,
            PrState::Closed => ContributionStatus::Closed,
            PrState::Merged => ContributionStatus::Merged,
        }
    }
}

impl fmt::Display for ContributionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// One configured pointer to an external pull request.
///
/// The short keys used by hand-written configs (`private`, `title`, `url`,
/// `status`) are accepted as aliases.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContributionReference {
    #[serde(alias = "prUrl")]
    pub pr_url: String,
    #[serde(default, alias = "private")]
    pub is_private: bool,
    #[serde(default, alias = "title", skip_serializing_if = "Option::is_none")]
    pub manual_title: Option<String>,
    #[serde(default, alias = "url", skip_serializing_if = "Option::is_none")]
    pub redirect_url: Option<String>,
    #[serde(default, alias = "status", skip_serializing_if = "Option::is_none")]
    pub manual_status: Option<PrState>,
}

impl ContributionReference {
    /// A public reference resolved through the lookup endpoint
    pub fn public(pr_url: impl Into<String>) -> Self {
        Self {
            pr_url: pr_url.into(),
            is_private: false,
            manual_title: None,
            redirect_url: None,
            manual_status: None,
        }
    }

    /// A private reference resolved from literal fields only
    pub fn private(
        pr_url: impl Into<String>,
        manual_title: Option<&str>,
        manual_status: Option<PrState>,
    ) -> Self {
        Self {
            pr_url: pr_url.into(),
            is_private: true,
            manual_title: manual_title.map(str::to_string),
            redirect_url: None,
            manual_status,
        }
    }

    /// Where activating this contribution should navigate.
    ///
    /// Private references prefer their redirect URL since the pull request
    /// itself is not publicly visible.
    pub fn link(&self) -> &str {
        match (&self.redirect_url, self.is_private) {
            (Some(redirect), true) => redirect,
            _ => &self.pr_url,
        }
    }
}

/// Identity of a reference within one session: its index in the configured list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ContributionId(pub usize);

impl fmt::Display for ContributionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0 + 1)
    }
}

/// Case-sensitive "owner/repo" grouping key
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RepoKey(String);

impl RepoKey {
    pub fn new(owner: &str, repo: &str) -> Self {
        Self(format!("{}/{}", owner, repo))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RepoKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Why a row ended up with fallback data
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Fallback {
    /// The configured URL is not a pull request URL
    InvalidUrl,
    /// The lookup endpoint reported that the pull request does not exist
    NotFound,
    /// Network failure, timeout, error status or unreadable body
    Unavailable,
}

/// How an enriched record was produced
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution {
    Pending,
    Private,
    Remote,
    Fallback(Fallback),
}

/// Display record for one contribution row
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnrichedContribution {
    pub repo_key: Option<RepoKey>,
    pub display_title: String,
    pub status: ContributionStatus,
    pub is_loading: bool,
    pub source: Resolution,
}

impl EnrichedContribution {
    /// Placeholder shown while a lookup is in flight
    pub fn loading(repo_key: Option<RepoKey>) -> Self {
        Self {
            repo_key,
            display_title: String::new(),
            status: ContributionStatus::Unknown,
            is_loading: true,
            source: Resolution::Pending,
        }
    }
}
