//! Preference storage.
//!
//! A tiny key-value store for user preferences. The only key the resolver
//! cares about is [`DEFAULT_BANG_KEY`]; the settings commands write it and
//! resolution reads it when no explicit bang matches.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use crate::core::{BangTable, FALLBACK_TAG};
use crate::error::{BangError, BangResult};

/// Key under which the user's default bang tag is stored.
pub const DEFAULT_BANG_KEY: &str = "default-bang";

/// Key-value storage for preferences.
pub trait PreferenceStore {
    /// Get a value, `None` if the key is not set.
    fn get(&self, key: &str) -> Option<String>;

    /// Set a value, persisting it immediately.
    fn set(&mut self, key: &str, value: &str) -> BangResult<()>;

    /// Remove a key. Removing a missing key is not an error.
    fn remove(&mut self, key: &str) -> BangResult<()>;
}

/// Preferences backed by a JSON object file.
///
/// Nothing is cached: every read goes to disk and every change is merged
/// into the file's current contents, so several processes (the CLI and a
/// running server) can share one file.
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    /// Open the store at `path`.
    ///
    /// A missing file is an empty store. So is an unreadable or corrupt one,
    /// which is logged and overwritten on the next write.
    pub fn open(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load(&self) -> HashMap<String, String> {
        if !self.path.exists() {
            return HashMap::new();
        }

        match Self::read(&self.path) {
            Ok(values) => values,
            Err(e) => {
                tracing::warn!("Ignoring preferences at {}: {}", self.path.display(), e);
                HashMap::new()
            }
        }
    }

    fn read(path: &Path) -> BangResult<HashMap<String, String>> {
        let contents = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&contents)?)
    }

    fn flush(&self, values: &HashMap<String, String>) -> BangResult<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(|e| {
                BangError::Storage(format!(
                    "Failed to create {}: {}",
                    parent.display(),
                    e
                ))
            })?;
        }

        let contents = serde_json::to_string_pretty(values)?;
        fs::write(&self.path, contents).map_err(|e| {
            BangError::Storage(format!("Failed to write {}: {}", self.path.display(), e))
        })?;

        tracing::debug!("Saved preferences to {}", self.path.display());
        Ok(())
    }
}

impl PreferenceStore for FileStore {
    fn get(&self, key: &str) -> Option<String> {
        self.load().remove(key)
    }

    fn set(&mut self, key: &str, value: &str) -> BangResult<()> {
        let mut values = self.load();
        values.insert(key.to_string(), value.to_string());
        self.flush(&values)
    }

    fn remove(&mut self, key: &str) -> BangResult<()> {
        let mut values = self.load();
        if values.remove(key).is_some() {
            self.flush(&values)?;
        }
        Ok(())
    }
}

/// In-memory preferences, lost on exit.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    values: HashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl PreferenceStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) -> BangResult<()> {
        self.values.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> BangResult<()> {
        self.values.remove(key);
        Ok(())
    }
}

/// The effective default bang: the stored tag if it is in `table`,
/// otherwise [`FALLBACK_TAG`].
pub fn default_bang_tag(store: &dyn PreferenceStore, table: &BangTable) -> String {
    match store.get(DEFAULT_BANG_KEY) {
        Some(tag) if table.contains(&tag) => tag,
        _ => FALLBACK_TAG.to_string(),
    }
}

/// Store `tag` as the default bang. Tags not in `table` are rejected.
pub fn set_default_bang(
    store: &mut dyn PreferenceStore,
    table: &BangTable,
    tag: &str,
) -> BangResult<()> {
    if !table.contains(tag) {
        return Err(BangError::UnknownBang(tag.to_string()));
    }
    store.set(DEFAULT_BANG_KEY, tag)?;
    tracing::info!(tag, "Default bang changed");
    Ok(())
}

/// Forget the stored default, going back to [`FALLBACK_TAG`].
pub fn clear_default_bang(store: &mut dyn PreferenceStore) -> BangResult<()> {
    store.remove(DEFAULT_BANG_KEY)
}
