//! Settings store — pointer file location and debounce interval.
//!
//! Loaded once at startup and shared read-only with the pipeline through an
//! `Arc`. Mutation goes through [`SettingsStore::update`], which is what a
//! settings UI calls; the pipeline re-reads values on every event.

use std::path::{Component, Path, PathBuf};
use std::sync::{PoisonError, RwLock};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::atomic::atomic_write;

/// Default quiet period before a debounced write fires.
pub const DEFAULT_DEBOUNCE_MS: u64 = 300;

/// File name of the pointer file inside the host's config directory.
pub const POINTER_FILE_NAME: &str = "active-note.json";

/// Host private configuration directory used when none is given.
pub const DEFAULT_CONFIG_DIR: &str = ".obsidian";

/// Settings store error.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read settings from {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to write settings to {path}: {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to encode settings: {0}")]
    Encode(#[from] serde_json::Error),
}

/// Persisted settings shape. Every key is optional on disk.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Settings {
    /// Pointer file path relative to the storage root. Empty selects the
    /// default location inside the config directory.
    pub pointer_file_path: String,
    pub debounce_ms: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            pointer_file_path: String::new(),
            debounce_ms: DEFAULT_DEBOUNCE_MS,
        }
    }
}

impl Settings {
    /// Parse settings from JSON, filling missing keys with defaults.
    pub fn from_json(contents: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(contents)
    }

    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }

    /// The configured pointer path, or `<config_dir>/active-note.json` when
    /// unset.
    pub fn pointer_file_path(&self, config_dir: &str) -> PathBuf {
        if self.pointer_file_path.trim().is_empty() {
            Path::new(config_dir).join(POINTER_FILE_NAME)
        } else {
            PathBuf::from(&self.pointer_file_path)
        }
    }
}

/// Process-lifetime owner of [`Settings`].
pub struct SettingsStore {
    /// Backing file; `None` for in-memory stores.
    path: Option<PathBuf>,
    config_dir: String,
    data: RwLock<Settings>,
}

impl SettingsStore {
    /// In-memory store, nothing is persisted.
    pub fn new(settings: Settings, config_dir: impl Into<String>) -> Self {
        Self {
            path: None,
            config_dir: config_dir.into(),
            data: RwLock::new(settings),
        }
    }

    /// Load settings from `path`.
    ///
    /// A missing file yields defaults. A malformed file is logged and also
    /// yields defaults, so a bad settings file never keeps the pipeline from
    /// starting.
    pub fn open(
        path: impl Into<PathBuf>,
        config_dir: impl Into<String>,
    ) -> Result<Self, ConfigError> {
        let path = path.into();
        let settings = if path.exists() {
            let contents = std::fs::read_to_string(&path).map_err(|source| ConfigError::Read {
                path: path.clone(),
                source,
            })?;
            Settings::from_json(&contents).unwrap_or_else(|e| {
                tracing::warn!(
                    path = %path.display(),
                    error = %e,
                    "malformed settings file, using defaults"
                );
                Settings::default()
            })
        } else {
            Settings::default()
        };

        Ok(Self {
            path: Some(path),
            config_dir: config_dir.into(),
            data: RwLock::new(settings),
        })
    }

    /// Copy of the current settings.
    pub fn snapshot(&self) -> Settings {
        self.data
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn debounce(&self) -> Duration {
        self.data
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .debounce()
    }

    pub fn config_dir(&self) -> &str {
        &self.config_dir
    }

    /// Pointer file target: `storage_root` joined with the configured path.
    ///
    /// The configured path always stays under the root; a leading `/` (or a
    /// drive prefix) is dropped rather than replacing the root.
    pub fn resolve_pointer_path(&self, storage_root: &Path) -> PathBuf {
        let configured = self
            .data
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .pointer_file_path(&self.config_dir);
        let relative: PathBuf = configured
            .components()
            .filter(|c| !matches!(c, Component::RootDir | Component::Prefix(_)))
            .collect();
        storage_root.join(relative)
    }

    /// Change settings without touching the backing file.
    pub fn apply(&self, f: impl FnOnce(&mut Settings)) {
        let mut guard = self.data.write().unwrap_or_else(PoisonError::into_inner);
        f(&mut guard);
    }

    /// Change settings and persist them if the store is file-backed.
    pub fn update(&self, f: impl FnOnce(&mut Settings)) -> Result<(), ConfigError> {
        let mut guard = self.data.write().unwrap_or_else(PoisonError::into_inner);
        f(&mut guard);
        self.persist(&guard)
    }

    pub fn set_pointer_file_path(&self, value: impl Into<String>) -> Result<(), ConfigError> {
        let value = value.into();
        self.update(|s| s.pointer_file_path = value)
    }

    pub fn set_debounce_ms(&self, value: u64) -> Result<(), ConfigError> {
        self.update(|s| s.debounce_ms = value)
    }

    fn persist(&self, data: &Settings) -> Result<(), ConfigError> {
        let Some(path) = &self.path else {
            return Ok(());
        };
        let serialized = serde_json::to_string_pretty(data)?;
        atomic_write(path, serialized.as_bytes()).map_err(|source| ConfigError::Write {
            path: path.clone(),
            source,
        })
    }
}
