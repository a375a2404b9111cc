use anyhow::{Context, Result};

use crate::contributions::ContributionReference;

/// Open a URL in the user's default browser
///
/// # Errors
/// Returns error if browser cannot be opened (e.g., no browser available)
pub fn open_url(url: &str) -> Result<()> {
    webbrowser::open(url)
        .with_context(|| format!("Failed to open browser for URL: {}", url))?;
    Ok(())
}

/// Open a contribution's link (the redirect for private ones) and return it.
pub fn open_contribution(reference: &ContributionReference) -> Result<&str> {
    let url = reference.link();
    log::debug!("Opening {}", url);
    open_url(url)?;
    Ok(url)
}
