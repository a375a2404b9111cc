use std::fmt::Display;
use std::time::Duration;

use crate::github::{LookupError, PullRequestLookup};

use super::locator::PrLocator;
use super::types::{
    ContributionReference, ContributionStatus, EnrichedContribution, Fallback, RepoKey, Resolution,
};

/// Title used when neither the lookup nor the config supplies one
pub fn placeholder_title(number: impl Display) -> String {
    format!("Pull Request #{}", number)
}

/// Map the lookup response onto a lifecycle status.
///
/// A merged pull request is also closed, so `merged` wins over `state`.
pub fn derive_status(merged: bool, state: &str) -> ContributionStatus {
    if merged {
        ContributionStatus::Merged
    } else if state == "closed" {
        ContributionStatus::Closed
    } else {
        ContributionStatus::Open
    }
}

fn fallback(
    reference: &ContributionReference,
    repo_key: Option<RepoKey>,
    number: &dyn Display,
    reason: Fallback,
) -> EnrichedContribution {
    EnrichedContribution {
        repo_key,
        display_title: reference
            .manual_title
            .clone()
            .unwrap_or_else(|| placeholder_title(number)),
        status: ContributionStatus::Unknown,
        is_loading: false,
        source: Resolution::Fallback(reason),
    }
}

/// Resolve a private reference from its literal fields. Never touches the network.
pub fn resolve_private(reference: &ContributionReference, locator: &PrLocator) -> EnrichedContribution {
    EnrichedContribution {
        repo_key: Some(locator.repo_key()),
        display_title: reference
            .manual_title
            .clone()
            .unwrap_or_else(|| placeholder_title(locator.number)),
        status: reference
            .manual_status
            .map(ContributionStatus::from)
            .unwrap_or(ContributionStatus::Unknown),
        is_loading: false,
        source: Resolution::Private,
    }
}

/// Settle a reference without I/O when possible.
///
/// Returns `None` when a remote lookup is needed.
pub fn resolve_now(reference: &ContributionReference) -> Option<EnrichedContribution> {
    match PrLocator::parse(&reference.pr_url) {
        Err(e) => {
            log::warn!("Invalid contribution URL {}: {}", reference.pr_url, e);
            Some(fallback(reference, None, &"?", Fallback::InvalidUrl))
        }
        Ok(locator) if reference.is_private => Some(resolve_private(reference, &locator)),
        Ok(_) => None,
    }
}

/// Fallback record for a resolution that ended without an answer
pub fn unavailable(reference: &ContributionReference) -> EnrichedContribution {
    match PrLocator::parse(&reference.pr_url) {
        Ok(locator) => fallback(reference, Some(locator.repo_key()), &locator.number, Fallback::Unavailable),
        Err(_) => fallback(reference, None, &"?", Fallback::InvalidUrl),
    }
}

/// Resolve one reference to its display record.
///
/// Every failure settles to a fallback record with `Unknown` status; this
/// function never returns an error and makes at most one lookup call.
pub async fn resolve(
    reference: &ContributionReference,
    lookup: &dyn PullRequestLookup,
    timeout: Duration,
) -> EnrichedContribution {
    if let Some(settled) = resolve_now(reference) {
        return settled;
    }
    let locator = match PrLocator::parse(&reference.pr_url) {
        Ok(locator) => locator,
        Err(_) => return fallback(reference, None, &"?", Fallback::InvalidUrl),
    };

    let outcome = match tokio::time::timeout(timeout, lookup.fetch(&locator)).await {
        Ok(result) => result,
        Err(_) => Err(LookupError::Timeout),
    };

    match outcome {
        Ok(summary) => EnrichedContribution {
            repo_key: Some(locator.repo_key()),
            status: derive_status(summary.merged, &summary.state),
            display_title: summary.title,
            is_loading: false,
            source: Resolution::Remote,
        },
        Err(e) => {
            let reason = if e.is_not_found() {
                log::info!("{} not found: {}", locator.short_ref(), e);
                Fallback::NotFound
            } else {
                log::warn!("Failed to look up {}: {}", locator.short_ref(), e);
                Fallback::Unavailable
            };
            fallback(reference, Some(locator.repo_key()), &locator.number, reason)
        }
    }
}
