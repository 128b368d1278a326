//! Persisted snapshot of last-known harness availability.
//!
//! A diagnostics pass probes every registered harness and saves the
//! resulting [`HarnessStatus`] entries here so later invocations can read
//! availability back without re-probing. The document lives at
//! `$HOME/.dun/harnesses.json`.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::types::HarnessStatus;

/// Durable `{last_check, harnesses[]}` JSON document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HarnessCache {
    /// When the probes were last run. `None` for a never-written cache.
    #[serde(default)]
    pub last_check: Option<DateTime<Utc>>,
    #[serde(default)]
    pub harnesses: Vec<HarnessStatus>,
}

/// Default on-disk location: `$HOME/.dun/harnesses.json`.
pub fn cache_path() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".dun")
        .join("harnesses.json")
}

impl HarnessCache {
    /// Load the cache from the default path. A missing file yields a
    /// zero-value cache without error.
    pub fn load() -> Result<Self> {
        Self::load_from(&cache_path())
    }

    /// Load the cache from `path`. A missing file yields a zero-value
    /// cache; other I/O errors and malformed JSON propagate.
    pub fn load_from(path: &Path) -> Result<Self> {
        let contents = match std::fs::read_to_string(path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Self::default()),
            Err(e) => {
                return Err(e)
                    .with_context(|| format!("failed to read harness cache at {}", path.display()));
            }
        };
        serde_json::from_str(&contents)
            .with_context(|| format!("malformed harness cache at {}", path.display()))
    }

    /// Save the cache to the default path.
    pub fn save(&self) -> Result<()> {
        self.save_to(&cache_path())
    }

    /// Save the cache to `path`, creating parent directories (0755) and
    /// writing the file with mode 0644. Entries are sorted by name for
    /// deterministic, diff-friendly output.
    pub fn save_to(&self, path: &Path) -> Result<()> {
        let mut snapshot = self.clone();
        snapshot
            .harnesses
            .sort_by(|a, b| a.name.cmp(&b.name));

        if let Some(dir) = path.parent() {
            let newly_created = !dir.exists();
            std::fs::create_dir_all(dir)
                .with_context(|| format!("failed to create cache directory {}", dir.display()))?;
            // A pre-existing directory keeps whatever mode the user set.
            #[cfg(unix)]
            if newly_created {
                use std::os::unix::fs::PermissionsExt;
                std::fs::set_permissions(dir, std::fs::Permissions::from_mode(0o755))
                    .with_context(|| format!("failed to set permissions on {}", dir.display()))?;
            }
            #[cfg(not(unix))]
            let _ = newly_created;
        }

        let contents =
            serde_json::to_string_pretty(&snapshot).context("failed to serialize harness cache")?;
        std::fs::write(path, &contents)
            .with_context(|| format!("failed to write harness cache at {}", path.display()))?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            std::fs::set_permissions(path, std::fs::Permissions::from_mode(0o644))
                .with_context(|| format!("failed to set permissions on {}", path.display()))?;
        }

        Ok(())
    }

    /// Names of harnesses whose last probe found them available, sorted
    /// ascending.
    pub fn available_harnesses(&self) -> Vec<String> {
        let mut names: Vec<String> = self
            .harnesses
            .iter()
            .filter(|status| status.available)
            .map(|status| status.name.clone())
            .collect();
        names.sort();
        names
    }
}
