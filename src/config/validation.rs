use crate::contributions::PrLocator;

use super::schema::Config;

/// Validate portfolio content at startup.
/// Returns all problems at once (not just the first). None of them stop the
/// portfolio from rendering; the caller decides how loudly to report them.
pub fn validate_config(config: &Config) -> Result<(), Vec<String>> {
    let mut errors = Vec::new();

    if config.personal.name.trim().is_empty() {
        errors.push("personal.name: must not be empty".to_string());
    }

    for (i, exp) in config.experience.iter().enumerate() {
        if exp.start().is_none() {
            errors.push(format!(
                "experience[{}].start_date: expected YYYY-MM-DD, got '{}'",
                i, exp.start_date
            ));
        }
    }

    for (i, contribution) in config.contributions.iter().enumerate() {
        if let Err(e) = PrLocator::parse(&contribution.pr_url) {
            errors.push(format!(
                "contributions[{}].pr_url: invalid '{}' - {}",
                i, contribution.pr_url, e
            ));
        }
        if contribution.redirect_url.is_some() && !contribution.is_private {
            errors.push(format!(
                "contributions[{}].url: only used for private contributions",
                i
            ));
        }
    }

    if let Some(url) = &config.medium_url {
        if crate::blog::medium_handle(url).is_none() {
            errors.push(format!("medium_url: no @handle in '{}'", url));
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
