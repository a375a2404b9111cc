pub mod init;
mod schema;
mod validation;

pub use schema::{Config, Experience, Personal, Project, Settings, Social};
pub use validation::validate_config;

use anyhow::{Context, Result};
use std::fs;
use std::path::PathBuf;

/// Get the config directory path (~/.config/folio/)
pub fn get_config_dir() -> PathBuf {
    dirs::home_dir()
        .map(|home| home.join(".config").join("folio"))
        .unwrap_or_else(|| PathBuf::from(".folio"))
}

/// Get the default content file path (~/.config/folio/portfolio.yaml)
pub fn get_config_path() -> PathBuf {
    get_config_dir().join("portfolio.yaml")
}

/// Load portfolio content from a YAML file
///
/// # Arguments
///
/// * `path` - Optional path to the content file. If None, uses the default path (~/.config/folio/portfolio.yaml)
///
/// # Errors
///
/// Returns an error if:
/// - The file does not exist
/// - The file cannot be read
/// - The YAML cannot be parsed
pub fn load_config(path: Option<PathBuf>) -> Result<Config> {
    let config_path = path.unwrap_or_else(get_config_path);

    if !config_path.exists() {
        anyhow::bail!(
            "Content file not found at {}. Run `folio init` to create one.",
            config_path.display()
        );
    }

    let config_content = fs::read_to_string(&config_path)
        .with_context(|| format!("Failed to read content file at {}", config_path.display()))?;

    parse_config(&config_content)
        .with_context(|| format!("Failed to parse content: invalid YAML in {}", config_path.display()))
}

/// Parse portfolio content from YAML text
pub fn parse_config(content: &str) -> Result<Config> {
    serde_saphyr::from_str(content).map_err(|e| anyhow::anyhow!("{}", e))
}
