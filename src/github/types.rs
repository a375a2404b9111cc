use serde::Deserialize;

/// The fields of a pull request that contribution rows display
///
/// Deserialized straight from `GET /repos/{owner}/{repo}/pulls/{number}`;
/// everything else in the response is ignored.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PullRequestSummary {
    pub title: String,
    pub state: String,
    #[serde(default)]
    pub merged: bool,
}
