use futures::stream::{FuturesUnordered, StreamExt};
use std::sync::Arc;
use std::time::Duration;

use crate::blog::{fetch_posts, BlogPost};
use crate::calendar::{fetch_activity, Activity};
use crate::config::Config;
use crate::contributions::{resolve, ContributionId, ContributionReference, EnrichedContribution};
use crate::github::PullRequestLookup;

/// Everything the portfolio pulls from the network besides contributions.
#[derive(Debug, Default)]
pub struct PageData {
    pub posts: Vec<BlogPost>,
    pub activity: Option<Activity>,
}

/// Fetch blog posts and the activity calendar concurrently.
///
/// Both sources fail soft: a missing `medium_url` or `github_username`, or
/// any request failure, leaves that part empty.
pub async fn load_page_data(http: &reqwest::Client, config: &Config) -> PageData {
    let settings = &config.settings;

    let posts = async {
        match &config.medium_url {
            Some(url) => fetch_posts(http, &settings.feed_bridge, url).await,
            None => Vec::new(),
        }
    };
    let activity = async {
        match &config.github_username {
            Some(username) => fetch_activity(http, &settings.calendar_api, username).await,
            None => None,
        }
    };

    let (posts, activity) = futures::join!(posts, activity);
    log::debug!(
        "Loaded {} blog posts, activity calendar {}",
        posts.len(),
        if activity.is_some() { "present" } else { "missing" }
    );
    PageData { posts, activity }
}

/// Resolve every reference concurrently, one lookup each.
///
/// Results come back in configuration order regardless of completion order.
pub async fn resolve_all(
    refs: &[ContributionReference],
    lookup: Arc<dyn PullRequestLookup>,
    timeout: Duration,
) -> Vec<(ContributionId, EnrichedContribution)> {
    let mut futures = FuturesUnordered::new();
    for (index, reference) in refs.iter().enumerate() {
        let lookup = lookup.clone();
        futures.push(async move {
            let enriched = resolve(reference, lookup.as_ref(), timeout).await;
            (ContributionId(index), enriched)
        });
    }

    let mut resolved = Vec::with_capacity(refs.len());
    while let Some(result) = futures.next().await {
        resolved.push(result);
    }
    resolved.sort_by_key(|(id, _)| *id);
    resolved
}
