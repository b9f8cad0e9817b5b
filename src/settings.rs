// ⚙️ Settings Store - tax rate persisted as JSON
// Corruption is swallowed, never surfaced: any unreadable file loads as defaults.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

pub const DEFAULT_TAX_RATE: f64 = 0.10;

const SETTINGS_FILE: &str = "settings.json";

/// Persisted settings. Unknown keys round-trip through `extra` so a file
/// written by a newer version is never stripped down on save.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    /// Fractional tax rate (0.10 = 10%). Invariant: >= 0.
    #[serde(default = "default_tax_rate")]
    pub tax_rate: f64,

    #[serde(flatten)]
    pub extra: HashMap<String, serde_json::Value>,
}

fn default_tax_rate() -> f64 {
    DEFAULT_TAX_RATE
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            tax_rate: DEFAULT_TAX_RATE,
            extra: HashMap::new(),
        }
    }
}

/// File-backed settings store rooted at an injected data directory.
/// Constructed once in main and passed to whoever needs it - no globals.
#[derive(Debug, Clone)]
pub struct SettingsStore {
    dir: PathBuf,
    path: PathBuf,
}

impl SettingsStore {
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        let dir = base_dir.into();
        let path = dir.join(SETTINGS_FILE);
        SettingsStore { dir, path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load settings, falling back to defaults.
    ///
    /// Never fails: an absent file is the fresh-install state, and a corrupt
    /// file is recovered by defaulting. A valid file missing `tax_rate` gets
    /// the default rate while every other key is preserved.
    pub fn load(&self) -> Settings {
        // Directory (not the file) is ensured on every load
        let _ = fs::create_dir_all(&self.dir);

        if !self.path.exists() {
            return Settings::default();
        }

        fs::read_to_string(&self.path)
            .ok()
            .and_then(|raw| serde_json::from_str(&raw).ok())
            .unwrap_or_default()
    }

    /// Overwrite the settings file with the full mapping, pretty-printed.
    pub fn save(&self, settings: &Settings) -> Result<()> {
        fs::create_dir_all(&self.dir)
            .with_context(|| format!("Failed to create data dir {}", self.dir.display()))?;

        let json = serde_json::to_string_pretty(settings).context("Failed to serialize settings")?;

        fs::write(&self.path, json)
            .with_context(|| format!("Failed to write {}", self.path.display()))?;

        Ok(())
    }
}

// ============================================================================
// TESTS
// ============================================================================
