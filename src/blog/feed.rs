use anyhow::{Context, Result};
use serde::Deserialize;
use url::Url;

use super::post::BlogPost;

#[derive(Debug, Deserialize)]
struct BridgeResponse {
    status: String,
    #[serde(default)]
    items: Vec<BlogPost>,
}

/// Extract the author handle from a Medium profile URL
/// ("https://medium.com/@someone" -> "someone").
pub fn medium_handle(medium_url: &str) -> Option<&str> {
    let (_, rest) = medium_url.split_once('@')?;
    let handle = rest.split(['/', '?', '#']).next().unwrap_or_default();
    if handle.is_empty() {
        None
    } else {
        Some(handle)
    }
}

fn feed_url(bridge_base: &str, handle: &str) -> Result<Url> {
    let rss_url = format!("https://medium.com/feed/@{}", handle);
    let endpoint = format!("{}/v1/api.json", bridge_base.trim_end_matches('/'));
    Url::parse_with_params(&endpoint, &[("rss_url", rss_url.as_str())])
        .with_context(|| format!("Invalid feed bridge URL: {}", bridge_base))
}

async fn try_fetch_posts(client: &reqwest::Client, bridge_base: &str, handle: &str) -> Result<Vec<BlogPost>> {
    let url = feed_url(bridge_base, handle)?;

    let response: BridgeResponse = client
        .get(url)
        .send()
        .await
        .context("Failed to reach feed bridge")?
        .json()
        .await
        .context("Failed to parse feed bridge JSON")?;

    if response.status == "ok" {
        Ok(response.items)
    } else {
        anyhow::bail!("Feed bridge reported status '{}'", response.status)
    }
}

/// Fetch the author's recent posts.
///
/// All errors fail soft: the portfolio shows no posts rather than an error.
pub async fn fetch_posts(client: &reqwest::Client, bridge_base: &str, medium_url: &str) -> Vec<BlogPost> {
    let Some(handle) = medium_handle(medium_url) else {
        log::warn!("No @handle in Medium URL {}", medium_url);
        return Vec::new();
    };

    match try_fetch_posts(client, bridge_base, handle).await {
        Ok(posts) => {
            log::debug!("Fetched {} posts for @{}", posts.len(), handle);
            posts
        }
        Err(e) => {
            log::warn!("Error fetching Medium posts: {:#}", e);
            Vec::new()
        }
    }
}
