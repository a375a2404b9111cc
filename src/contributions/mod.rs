//! Open-source contribution pipeline: parse, group by repository, enrich.

pub mod enrich;
pub mod group;
pub mod locator;
pub mod tracker;
pub mod types;

#[cfg(test)]
pub(crate) mod testing;

pub use enrich::{derive_status, placeholder_title, resolve, resolve_private};
pub use group::{group, ContributionGroup, GroupEntry, Grouping, SkippedReference};
pub use locator::{Avatar, LocatorError, PrLocator};
pub use tracker::{EnrichmentTracker, RowState};
pub use types::{
    ContributionId, ContributionReference, ContributionStatus, EnrichedContribution, Fallback,
    PrState, RepoKey, Resolution,
};

/// Group the configured references and log every skipped one.
pub fn group_and_report(refs: &[ContributionReference]) -> Grouping {
    let grouping = group(refs);
    for skipped in &grouping.skipped {
        log::warn!(
            "Skipping contribution {} ({}): {}",
            skipped.id,
            skipped.pr_url,
            skipped.reason
        );
    }
    log::debug!(
        "Grouped {} contributions into {} repositories",
        grouping.total(),
        grouping.groups.len()
    );
    grouping
}
