use thiserror::Error;
use url::Url;

use super::types::{ContributionReference, RepoKey};

/// Why a contribution URL could not be read as a pull request
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LocatorError {
    #[error("not an absolute URL: {0}")]
    NotAbsolute(String),
    #[error("missing owner or repository in path")]
    MissingRepo,
    #[error("expected a /pull/ or /pulls/ path, found '{0}'")]
    NotPullRequest(String),
    #[error("invalid pull request number '{0}'")]
    InvalidNumber(String),
}

/// Coordinates of a pull request parsed from its canonical URL
///
/// Format: "https://github.com/owner/repo/pull/123"
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrLocator {
    pub host: String,
    pub owner: String,
    pub repo: String,
    pub number: u64,
}

impl PrLocator {
    pub fn parse(pr_url: &str) -> Result<Self, LocatorError> {
        let url = Url::parse(pr_url).map_err(|_| LocatorError::NotAbsolute(pr_url.to_string()))?;
        let host = url
            .host_str()
            .ok_or_else(|| LocatorError::NotAbsolute(pr_url.to_string()))?
            .to_string();

        let parts: Vec<&str> = url.path().split('/').filter(|s| !s.is_empty()).collect();
        let (owner, repo) = match (parts.first(), parts.get(1)) {
            (Some(owner), Some(repo)) => (owner.to_string(), repo.to_string()),
            _ => return Err(LocatorError::MissingRepo),
        };

        match parts.get(2) {
            Some(&"pull") | Some(&"pulls") => {}
            other => {
                return Err(LocatorError::NotPullRequest(
                    other.copied().unwrap_or_default().to_string(),
                ))
            }
        }

        let raw_number = parts.get(3).copied().unwrap_or_default();
        let number = raw_number
            .parse::<u64>()
            .map_err(|_| LocatorError::InvalidNumber(raw_number.to_string()))?;

        Ok(Self {
            host,
            owner,
            repo,
            number,
        })
    }

    pub fn repo_key(&self) -> RepoKey {
        RepoKey::new(&self.owner, &self.repo)
    }

    /// Return a short reference in the format "owner/repo#123"
    pub fn short_ref(&self) -> String {
        format!("{}/{}#{}", self.owner, self.repo, self.number)
    }
}

/// Owner avatar for a contribution row, fetched by convention from the host
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Avatar {
    Image(String),
    Placeholder,
}

impl Avatar {
    pub fn for_reference(reference: &ContributionReference) -> Self {
        match PrLocator::parse(&reference.pr_url) {
            Ok(locator) => Avatar::Image(format!("https://{}/{}.png", locator.host, locator.owner)),
            Err(_) => Avatar::Placeholder,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_pull_url() {
        let locator = PrLocator::parse("https://github.com/itshover/itshover/pull/58").unwrap();
        assert_eq!(locator.host, "github.com");
        assert_eq!(locator.owner, "itshover");
        assert_eq!(locator.repo, "itshover");
        assert_eq!(locator.number, 58);
        assert_eq!(locator.repo_key().as_str(), "itshover/itshover");
        assert_eq!(locator.short_ref(), "itshover/itshover#58");
    }

    #[test]
    fn test_parse_pulls_variant_and_trailing_segments() {
        let locator = PrLocator::parse("https://github.com/fastapi/fastapi/pulls/14565/files").unwrap();
        assert_eq!(locator.number, 14565);
        assert_eq!(locator.repo_key().as_str(), "fastapi/fastapi");
    }

    #[test]
    fn test_parse_keeps_case() {
        let locator = PrLocator::parse("https://github.com/OssiumOfficial/Ossium/pull/3").unwrap();
        assert_eq!(locator.repo_key().as_str(), "OssiumOfficial/Ossium");
    }

    #[test]
    fn test_parse_rejects_relative_url() {
        assert_eq!(
            PrLocator::parse("not-a-url"),
            Err(LocatorError::NotAbsolute("not-a-url".to_string()))
        );
    }

    #[test]
    fn test_parse_rejects_issue_url() {
        assert_eq!(
            PrLocator::parse("https://github.com/owner/repo/issues/4"),
            Err(LocatorError::NotPullRequest("issues".to_string()))
        );
    }

    #[test]
    fn test_parse_rejects_missing_repo() {
        assert_eq!(
            PrLocator::parse("https://github.com/owner"),
            Err(LocatorError::MissingRepo)
        );
    }

    #[test]
    fn test_parse_rejects_non_numeric_number() {
        assert_eq!(
            PrLocator::parse("https://github.com/owner/repo/pull/abc"),
            Err(LocatorError::InvalidNumber("abc".to_string()))
        );
        assert_eq!(
            PrLocator::parse("https://github.com/owner/repo/pull"),
            Err(LocatorError::InvalidNumber(String::new()))
        );
    }

    #[test]
    fn test_parse_rejects_hostless_url() {
        assert!(matches!(
            PrLocator::parse("mailto:someone@example.com"),
            Err(LocatorError::NotAbsolute(_))
        ));
    }

    #[test]
    fn test_avatar_from_owner() {
        let reference = ContributionReference::public("https://github.com/ig-imanish/mx-icons/pull/9");
        assert_eq!(
            Avatar::for_reference(&reference),
            Avatar::Image("https://github.com/ig-imanish.png".to_string())
        );
        let broken = ContributionReference::public("nope");
        assert_eq!(Avatar::for_reference(&broken), Avatar::Placeholder);
    }
}
