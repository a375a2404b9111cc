use anyhow::{Context, Result};
use octocrab::Octocrab;
use std::sync::Arc;
use std::time::Duration;

use crate::config::Settings;
use crate::github::lookup::{OctocrabLookup, PullRequestLookup, RestLookup};

/// Environment variable holding an optional read-only GitHub token
pub const ENV_TOKEN_VAR: &str = "FOLIO_GH_TOKEN";

/// Public GitHub REST API root
pub const DEFAULT_API_BASE: &str = "https://api.github.com";

const USER_AGENT: &str = concat!("folio/", env!("CARGO_PKG_VERSION"));

/// Install the ring crypto provider for rustls (required for rustls 0.23+).
///
/// Safe to call more than once; later calls are no-ops.
pub fn install_crypto_provider() {
    let _ = rustls::crypto::ring::default_provider().install_default();
}

/// Check for a GitHub token in the FOLIO_GH_TOKEN environment variable.
/// Returns Some(token) if the env var is set and non-empty, None otherwise.
pub fn get_token_from_env() -> Option<String> {
    match std::env::var(ENV_TOKEN_VAR) {
        Ok(val) => {
            let trimmed = val.trim().to_string();
            if trimmed.is_empty() {
                None
            } else {
                Some(trimmed)
            }
        }
        Err(_) => None,
    }
}

/// Create an authenticated GitHub client using a personal access token
pub fn create_client(token: &str) -> Result<Octocrab> {
    install_crypto_provider();
    Octocrab::builder()
        .personal_token(token.to_string())
        .build()
        .context("Failed to create GitHub client")
}

/// Create the shared HTTP client used for anonymous API calls
pub fn create_http_client(timeout: Duration) -> Result<reqwest::Client> {
    install_crypto_provider();
    reqwest::Client::builder()
        .user_agent(USER_AGENT)
        .timeout(timeout)
        .build()
        .context("Failed to create HTTP client")
}

/// Which pull request lookup a session uses
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LookupKind {
    Authenticated,
    Anonymous,
}

/// Decide between the authenticated and anonymous lookups.
///
/// A token switches to the authenticated octocrab client (higher rate
/// limits). It only targets the public API, so a custom `api_base` always
/// uses the anonymous REST lookup.
pub fn lookup_kind(settings: &Settings, token: Option<&str>) -> LookupKind {
    let custom_base = settings.api_base.trim_end_matches('/') != DEFAULT_API_BASE;
    match token {
        Some(_) if !custom_base => LookupKind::Authenticated,
        _ => LookupKind::Anonymous,
    }
}

/// Build the pull request lookup for this session
pub fn build_lookup(
    settings: &Settings,
    http: reqwest::Client,
    token: Option<String>,
) -> Result<Arc<dyn PullRequestLookup>> {
    match (lookup_kind(settings, token.as_deref()), token) {
        (LookupKind::Authenticated, Some(token)) => {
            log::debug!("Using authenticated GitHub lookups");
            let client = create_client(&token)?;
            Ok(Arc::new(OctocrabLookup::new(client)))
        }
        _ => {
            log::debug!("Using anonymous GitHub lookups against {}", settings.api_base);
            Ok(Arc::new(RestLookup::new(http, settings.api_base.clone())))
        }
    }
}
