use std::collections::HashMap;

use super::locator::{LocatorError, PrLocator};
use super::types::{ContributionId, ContributionReference, RepoKey};

/// A reference placed in a group, tagged with its identity
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupEntry {
    pub id: ContributionId,
    pub reference: ContributionReference,
}

/// All contributions to one repository, in configuration order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContributionGroup {
    pub repo_key: RepoKey,
    pub owner: String,
    pub entries: Vec<GroupEntry>,
}

impl ContributionGroup {
    pub fn count(&self) -> usize {
        self.entries.len()
    }
}

/// A reference left out of grouping because its URL could not be parsed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedReference {
    pub id: ContributionId,
    pub pr_url: String,
    pub reason: LocatorError,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Grouping {
    pub groups: Vec<ContributionGroup>,
    pub skipped: Vec<SkippedReference>,
}

impl Grouping {
    pub fn total(&self) -> usize {
        self.groups.iter().map(ContributionGroup::count).sum()
    }
}

/// Partition references by repository.
///
/// Groups appear in the order their repository is first seen; entries keep
/// their input order. Duplicates are kept. Invalid URLs are reported in
/// `skipped` instead of aborting.
pub fn group(refs: &[ContributionReference]) -> Grouping {
    let mut grouping = Grouping::default();
    let mut positions: HashMap<RepoKey, usize> = HashMap::new();

    for (index, reference) in refs.iter().enumerate() {
        let id = ContributionId(index);
        let locator = match PrLocator::parse(&reference.pr_url) {
            Ok(locator) => locator,
            Err(reason) => {
                grouping.skipped.push(SkippedReference {
                    id,
                    pr_url: reference.pr_url.clone(),
                    reason,
                });
                continue;
            }
        };

        let entry = GroupEntry {
            id,
            reference: reference.clone(),
        };
        let key = locator.repo_key();
        match positions.get(&key) {
            Some(&pos) => grouping.groups[pos].entries.push(entry),
            None => {
                positions.insert(key.clone(), grouping.groups.len());
                grouping.groups.push(ContributionGroup {
                    repo_key: key,
                    owner: locator.owner,
                    entries: vec![entry],
                });
            }
        }
    }

    grouping
}
