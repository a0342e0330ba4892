use anyhow::{Context, Result};
use parking_lot::RwLock;
use std::{
    fmt, fs,
    path::{Path, PathBuf},
    sync::Arc,
};
use tracing::info;

/// Variable name used both in the key file and in the environment.
pub const KEY_VAR: &str = "WEATHER_KEY";

/// Shared, replaceable provider API key.
///
/// Clients clone the handle at construction and snapshot the value on every
/// request, so a key saved mid-session is picked up by the next fetch.
#[derive(Clone)]
pub struct ApiKey(Arc<RwLock<Arc<str>>>);

impl fmt::Debug for ApiKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let shown = if self.is_set() { "***" } else { "<unset>" };
        f.debug_tuple("ApiKey").field(&shown).finish()
    }
}

impl ApiKey {
    pub fn new(key: impl AsRef<str>) -> Self {
        Self(Arc::new(RwLock::new(Arc::from(key.as_ref()))))
    }

    pub fn get(&self) -> Arc<str> {
        self.0.read().clone()
    }

    pub fn replace(&self, key: impl AsRef<str>) {
        *self.0.write() = Arc::from(key.as_ref());
    }

    pub fn is_set(&self) -> bool {
        !self.0.read().is_empty()
    }
}

impl Default for ApiKey {
    fn default() -> Self {
        Self::new("")
    }
}

/// `.env`-style file holding the single `WEATHER_KEY=...` line.
#[derive(Debug, Clone)]
pub struct CredentialStore {
    path: PathBuf,
}

impl CredentialStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Key from the file, or `None` if the file or the line is absent.
    pub fn load(&self) -> Result<Option<String>> {
        if !self.path.exists() {
            return Ok(None);
        }

        let contents = fs::read_to_string(&self.path)
            .with_context(|| format!("Failed to read key file: {}", self.path.display()))?;

        Ok(parse_key_line(&contents))
    }

    /// Overwrite the file with the given key.
    pub fn save(&self, key: &str) -> Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create key directory: {}", parent.display())
            })?;
        }

        fs::write(&self.path, format!("{KEY_VAR}={key}\n"))
            .with_context(|| format!("Failed to write key file: {}", self.path.display()))?;

        info!(path = %self.path.display(), "saved API key");
        Ok(())
    }

    /// Key file first, then the `WEATHER_KEY` environment variable.
    pub fn resolve(&self) -> Result<Option<String>> {
        if let Some(key) = self.load()? {
            return Ok(Some(key));
        }
        Ok(std::env::var(KEY_VAR).ok().filter(|k| !k.trim().is_empty()))
    }

    /// Persist `key` and publish it to every client holding `handle`.
    pub fn save_and_publish(&self, key: &str, handle: &ApiKey) -> Result<()> {
        self.save(key)?;
        handle.replace(key);
        Ok(())
    }
}

fn parse_key_line(contents: &str) -> Option<String> {
    contents.lines().find_map(|line| {
        let (name, value) = line.trim().split_once('=')?;
        if name.trim() != KEY_VAR {
            return None;
        }
        let value = value.trim().trim_matches('"');
        (!value.is_empty()).then(|| value.to_string())
    })
}
