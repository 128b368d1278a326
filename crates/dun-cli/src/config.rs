//! Configuration file management for dun.
//!
//! Provides a TOML-based config file at `~/.config/dun/config.toml` and a
//! resolution chain: CLI flag > env var > config file > default.

use std::collections::HashMap;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use dun_core::harness::AutomationMode;

// -----------------------------------------------------------------------
// Config file types
// -----------------------------------------------------------------------

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct ConfigFile {
    #[serde(default)]
    pub defaults: DefaultsSection,
    /// Per-harness binary overrides, keyed by harness name.
    #[serde(default)]
    pub commands: HashMap<String, String>,
}

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct DefaultsSection {
    /// Default per-execution timeout in seconds. 0 means no deadline.
    pub timeout_secs: Option<u64>,
    /// Default automation mode ("manual", "plan", "auto", "yolo").
    pub mode: Option<String>,
}

// -----------------------------------------------------------------------
// Paths
// -----------------------------------------------------------------------

/// Return the dun config directory.
///
/// Always uses XDG layout: `$XDG_CONFIG_HOME/dun` or `~/.config/dun`.
pub fn config_dir() -> PathBuf {
    if let Ok(xdg) = std::env::var("XDG_CONFIG_HOME") {
        return PathBuf::from(xdg).join("dun");
    }
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".config")
        .join("dun")
}

/// Return the path to the dun config file.
pub fn config_path() -> PathBuf {
    config_dir().join("config.toml")
}

// -----------------------------------------------------------------------
// Read
// -----------------------------------------------------------------------

/// Load and parse the config file. Returns an error if it does not exist.
pub fn load_config() -> Result<ConfigFile> {
    let path = config_path();
    let contents = std::fs::read_to_string(&path)
        .with_context(|| format!("failed to read config file at {}", path.display()))?;
    let config: ConfigFile = toml::from_str(&contents).context("failed to parse config file")?;
    Ok(config)
}

// -----------------------------------------------------------------------
// Resolved config
// -----------------------------------------------------------------------

/// Fully resolved configuration, ready for use.
#[derive(Debug)]
pub struct DunConfig {
    /// Execution timeout. `None` defers to the core defaults (120s for
    /// execute, 30s for ping).
    pub timeout: Option<Duration>,
    pub mode: AutomationMode,
    pub commands: HashMap<String, String>,
}

impl DunConfig {
    /// Resolve configuration using the chain:
    /// CLI flag > env var > config file > default.
    ///
    /// - Timeout: `cli_timeout_secs` > `DUN_TIMEOUT_SECS` > file > unset
    /// - Mode: `cli_mode` > `DUN_MODE` > file > auto
    pub fn resolve(cli_timeout_secs: Option<u64>, cli_mode: Option<&str>) -> Result<Self> {
        let file_config = load_config().ok();

        let timeout_secs = if let Some(secs) = cli_timeout_secs {
            Some(secs)
        } else if let Ok(secs) = std::env::var("DUN_TIMEOUT_SECS") {
            Some(
                secs.parse()
                    .context("DUN_TIMEOUT_SECS env var is not a number")?,
            )
        } else {
            file_config
                .as_ref()
                .and_then(|cfg| cfg.defaults.timeout_secs)
        };

        let mode_str = if let Some(mode) = cli_mode {
            mode.to_string()
        } else if let Ok(mode) = std::env::var("DUN_MODE") {
            mode
        } else if let Some(mode) = file_config
            .as_ref()
            .and_then(|cfg| cfg.defaults.mode.clone())
        {
            mode
        } else {
            "auto".to_string()
        };
        let mode = mode_str
            .parse::<AutomationMode>()
            .context("invalid automation mode")?;

        Ok(Self {
            timeout: timeout_secs.map(Duration::from_secs),
            mode,
            commands: file_config.map(|cfg| cfg.commands).unwrap_or_default(),
        })
    }
}

// -----------------------------------------------------------------------
// Tests
// -----------------------------------------------------------------------
