//! Epic tooling configuration stored under `.epics/config.toml`.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result, anyhow};
use serde::{Deserialize, Serialize};

/// Configuration (TOML).
///
/// Edited by humans; every field is optional and missing ones take the defaults.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct EpicConfig {
    pub notify: NotifyConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct NotifyConfig {
    /// When false, notifications only go to the log.
    pub enabled: bool,

    /// Desktop notifiers to try, in order. The log is always the last resort.
    pub backends: Vec<NotifierBackend>,

    /// Wall-clock limit for each notifier process in seconds.
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum NotifierBackend {
    /// macOS `osascript -e 'display notification ...'`.
    Osascript,
    /// freedesktop `notify-send`.
    NotifySend,
}

impl Default for NotifyConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            backends: vec![NotifierBackend::Osascript, NotifierBackend::NotifySend],
            timeout_secs: 5,
        }
    }
}

impl EpicConfig {
    pub fn validate(&self) -> Result<()> {
        if self.notify.timeout_secs == 0 {
            return Err(anyhow!("notify.timeout_secs must be > 0"));
        }
        Ok(())
    }
}

/// Load config from a TOML file.
///
/// If the file is missing, returns `EpicConfig::default()`.
pub fn load_config(path: &Path) -> Result<EpicConfig> {
    if !path.exists() {
        return Ok(EpicConfig::default());
    }
    let contents = fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
    let cfg: EpicConfig =
        toml::from_str(&contents).with_context(|| format!("parse {}", path.display()))?;
    cfg.validate()?;
    Ok(cfg)
}
