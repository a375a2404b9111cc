use anyhow::{Context, Result};
use std::io::{BufRead, Write};
use std::path::PathBuf;

use crate::config::{get_config_path, Config, Personal, Settings};
use crate::contributions::{ContributionReference, PrLocator, PrState};

/// Prompt user with a message and return their trimmed input.
fn prompt(message: &str) -> Result<String> {
    print!("{}", message);
    std::io::stdout()
        .flush()
        .context("Failed to flush stdout")?;
    let mut input = String::new();
    std::io::stdin()
        .lock()
        .read_line(&mut input)
        .context("Failed to read input")?;
    Ok(input.trim().to_string())
}

/// Prompt user with a message and a default value. Returns default if input is empty.
fn prompt_with_default(message: &str, default: &str) -> Result<String> {
    let input = prompt(&format!("{} [{}]: ", message, default))?;
    if input.is_empty() {
        Ok(default.to_string())
    } else {
        Ok(input)
    }
}

/// Prompt user with a yes/no question. Returns bool based on input and default.
fn prompt_yes_no(message: &str, default_yes: bool) -> Result<bool> {
    let hint = if default_yes { "Y/n" } else { "y/N" };
    let input = prompt(&format!("{} [{}]: ", message, hint))?;
    let input = input.to_lowercase();
    if input.is_empty() {
        Ok(default_yes)
    } else {
        Ok(input == "y" || input == "yes")
    }
}

fn optional(input: String) -> Option<String> {
    if input.is_empty() {
        None
    } else {
        Some(input)
    }
}

/// Parse a manual status answer; empty means "not specified".
fn parse_manual_status(input: &str) -> Result<Option<PrState>, String> {
    match input.trim().to_lowercase().as_str() {
        "" => Ok(None),
        "open" => Ok(Some(PrState::Open)),
        "closed" => Ok(Some(PrState::Closed)),
        "merged" => Ok(Some(PrState::Merged)),
        other => Err(format!("'{}' is not one of open, closed, merged", other)),
    }
}

fn prompt_contribution() -> Result<ContributionReference> {
    let pr_url = loop {
        let url = prompt("  Pull request URL: ")?;
        match PrLocator::parse(&url) {
            Ok(_) => break url,
            Err(e) => println!("  Invalid: {}. Try again.", e),
        }
    };

    let mut reference = ContributionReference::public(pr_url);
    if prompt_yes_no("  Is the repository private?", false)? {
        reference.is_private = true;
        reference.manual_title = optional(prompt("  Title to show: ")?);
        reference.redirect_url = optional(prompt("  Link to open instead (optional): ")?);
        reference.manual_status = loop {
            let input = prompt("  Status (open/closed/merged, optional): ")?;
            match parse_manual_status(&input) {
                Ok(status) => break status,
                Err(e) => println!("  Invalid: {}. Try again.", e),
            }
        };
    }
    Ok(reference)
}

/// Run the interactive init wizard to create a content file.
///
/// If `default_path` is Some, uses that as the content file path.
/// Otherwise, prompts the user with the default path.
pub fn run_init_wizard(default_path: Option<PathBuf>) -> Result<()> {
    println!();
    println!("folio setup");
    println!("===========");
    println!();

    let name = loop {
        let n = prompt("Your name: ")?;
        if !n.is_empty() {
            break n;
        }
        println!("  Name is required.");
    };
    let surname = prompt("Tagline (e.g. 'A full stack developer.'): ")?;
    let bio = prompt("Short bio: ")?;
    let location = prompt("Location: ")?;
    let github_username = optional(prompt("GitHub username (for the activity calendar): ")?);
    let medium_url = optional(prompt("Medium profile URL (optional): ")?);

    println!();
    println!("Open-source contributions are pull request URLs, grouped by repository.");
    let mut contributions = Vec::new();
    let mut add = prompt_yes_no("Add a contribution?", true)?;
    while add {
        contributions.push(prompt_contribution()?);
        add = prompt_yes_no("Add another contribution?", false)?;
    }

    let default_config_path = default_path.unwrap_or_else(get_config_path);
    println!();
    let path_str = prompt_with_default(
        "Where should the content file be saved?",
        &default_config_path.display().to_string(),
    )?;
    let config_path = PathBuf::from(&path_str);

    if config_path.exists() {
        let overwrite = prompt_yes_no(
            &format!(
                "Content file already exists at {}. Overwrite?",
                config_path.display()
            ),
            false,
        )?;
        if !overwrite {
            println!("Aborted.");
            return Ok(());
        }
    }

    let config = Config {
        personal: Personal {
            name,
            surname,
            location,
            bio,
            ..Personal::default()
        },
        github_username,
        socials: Vec::new(),
        skills: Vec::new(),
        experience: Vec::new(),
        projects: Vec::new(),
        contributions,
        medium_url,
        settings: Settings::default(),
    };

    let yaml = serde_saphyr::to_string(&config)
        .map_err(|e| anyhow::anyhow!("Failed to serialize content: {}", e))?;

    if let Some(parent) = config_path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory {}", parent.display()))?;
    }

    std::fs::write(&config_path, &yaml)
        .with_context(|| format!("Failed to write content to {}", config_path.display()))?;

    println!();
    println!("Content written to {}", config_path.display());
    println!("Add skills, experience and projects there, then run `folio`.");

    Ok(())
}
