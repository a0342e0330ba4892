use anyhow::{Context, Result};
use std::{
    fs,
    path::{Path, PathBuf},
};
use tracing::info;

/// Newline-delimited list of favorite location strings.
#[derive(Debug, Clone)]
pub struct FavoritesStore {
    path: PathBuf,
}

impl FavoritesStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// All lines of the file, or an empty list if it doesn't exist yet.
    pub fn load(&self) -> Result<Vec<String>> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }

        let contents = fs::read_to_string(&self.path)
            .with_context(|| format!("Failed to read favorites file: {}", self.path.display()))?;

        Ok(contents.lines().map(str::to_string).collect())
    }

    /// Overwrite the file with `locations` joined by newlines.
    pub fn save(&self, locations: &[String]) -> Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create favorites directory: {}", parent.display())
            })?;
        }

        fs::write(&self.path, locations.join("\n")).with_context(|| {
            format!("Failed to write favorites file: {}", self.path.display())
        })?;

        info!(path = %self.path.display(), count = locations.len(), "saved favorites");
        Ok(())
    }

    /// Append `location` unless it is blank or already present, then save.
    pub fn add(&self, location: &str) -> Result<Vec<String>> {
        let location = location.trim();
        let mut list = self.load()?;

        if location.is_empty() || list.iter().any(|l| l == location) {
            return Ok(list);
        }

        list.push(location.to_string());
        self.save(&list)?;
        Ok(list)
    }

    /// Drop every entry equal to `location`, then save.
    pub fn remove(&self, location: &str) -> Result<Vec<String>> {
        let location = location.trim();
        let mut list = self.load()?;
        let before = list.len();

        list.retain(|l| l != location);
        if list.len() != before {
            self.save(&list)?;
        }
        Ok(list)
    }
}
