use super::types::{Theme, ThemePreference};
use anyhow::{Context, Result};
use atomic_write_file::AtomicWriteFile;
use std::fs::File;
use std::path::{Path, PathBuf};

/// Get the default theme preference path (~/.config/folio/theme.json)
pub fn get_theme_path() -> PathBuf {
    crate::config::get_config_dir().join("theme.json")
}

/// Load the saved theme.
///
/// Returns `Ok(None)` when nothing has been saved yet.
pub fn load_theme(path: &Path) -> Result<Option<Theme>> {
    if !path.exists() {
        return Ok(None);
    }

    let file = File::open(path)
        .with_context(|| format!("Failed to open theme preference at {}", path.display()))?;

    let preference: ThemePreference =
        serde_json::from_reader(file).context("Failed to load theme preference")?;

    if preference.version != 1 {
        anyhow::bail!("Unsupported theme preference version: {}", preference.version);
    }

    Ok(Some(preference.theme))
}

/// Save the theme atomically, creating parent directories as needed
pub fn save_theme(path: &Path, theme: Theme) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory {}", parent.display()))?;
    }

    let mut file = AtomicWriteFile::open(path)
        .with_context(|| format!("Failed to open atomic write file at {}", path.display()))?;

    serde_json::to_writer_pretty(&mut file, &ThemePreference::new(theme))
        .context("Failed to serialize theme preference")?;

    file.commit().context("Failed to save theme preference")?;

    Ok(())
}
