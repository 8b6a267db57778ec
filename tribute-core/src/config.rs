//! Configuration management
//!
//! Loaded from a TOML file. Every section and field is optional; anything
//! left out takes its default.

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::Context;
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use tribute_io::WidthThresholds;

use crate::error::ConfigError;
use crate::loader::RetryPolicy;
use crate::view::beamer::{BeamerResolution, Presentation};
use crate::view::immersive::Movement;

/// Main configuration structure
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TributeConfig {
    pub retry: RetryConfig,
    pub display: DisplayConfig,
    pub switcher: SwitcherConfig,
    pub beamer: BeamerConfig,
    pub vr: VrConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RetryConfig {
    /// Attempts at a mode's primary renderer before falling back.
    pub attempts: u32,
    /// Backoff before retry `n` is `n * backoff_step_ms`.
    pub backoff_step_ms: u64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            attempts: 3,
            backoff_step_ms: 1000,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    pub compact_below: u32,
    pub wide_from: u32,
    /// Fixed viewport width; skips the display connector lookup.
    pub viewport_width: Option<u32>,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        let thresholds = WidthThresholds::default();
        Self {
            compact_below: thresholds.compact_below,
            wide_from: thresholds.wide_from,
            viewport_width: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SwitcherConfig {
    /// Resolve the best mode from the startup probe.
    pub auto_select: bool,
    pub connectivity_poll_ms: u64,
}

impl Default for SwitcherConfig {
    fn default() -> Self {
        Self {
            auto_select: true,
            connectivity_poll_ms: 2000,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BeamerConfig {
    pub resolution: BeamerResolution,
    pub presentation: Presentation,
    /// Time each slide stays up in a slideshow.
    pub slide_interval_ms: u64,
}

impl Default for BeamerConfig {
    fn default() -> Self {
        Self {
            resolution: BeamerResolution::default(),
            presentation: Presentation::default(),
            slide_interval_ms: 4000,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VrConfig {
    pub movement: Movement,
}

impl TributeConfig {
    /// `<config dir>/tribute/config.toml`, if the platform has one.
    pub fn default_path() -> Option<PathBuf> {
        ProjectDirs::from("org", "tribute", "tribute").map(|dirs| dirs.config_dir().join("config.toml"))
    }

    /// Load and validate a config file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let display = path.display().to_string();
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: display.clone(),
            source,
        })?;
        let config = Self::parse(&content).map_err(|e| match e {
            ConfigError::Parse { source, .. } => ConfigError::Parse {
                path: display,
                source,
            },
            other => other,
        })?;
        Ok(config)
    }

    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        let config: TributeConfig = toml::from_str(content).map_err(|source| ConfigError::Parse {
            path: "<inline>".to_string(),
            source,
        })?;
        config.validate()?;
        Ok(config)
    }

    /// An explicit path must exist; the default path may be absent.
    pub fn load_or_default(explicit: Option<&Path>) -> anyhow::Result<Self> {
        if let Some(path) = explicit {
            return Self::load(path).context("Failed to load config");
        }
        match Self::default_path() {
            Some(path) if path.is_file() => {
                tracing::info!(path = %path.display(), "loading config");
                Self::load(&path).context("Failed to load config")
            }
            _ => {
                tracing::debug!("no config file, using defaults");
                Ok(Self::default())
            }
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.retry.attempts == 0 {
            return Err(ConfigError::Invalid("retry.attempts must be at least 1".into()));
        }
        if self.display.compact_below >= self.display.wide_from {
            return Err(ConfigError::Invalid(format!(
                "display.compact_below ({}) must be below display.wide_from ({})",
                self.display.compact_below, self.display.wide_from
            )));
        }
        if self.switcher.connectivity_poll_ms == 0 {
            return Err(ConfigError::Invalid(
                "switcher.connectivity_poll_ms must be positive".into(),
            ));
        }
        if self.beamer.slide_interval_ms == 0 {
            return Err(ConfigError::Invalid("beamer.slide_interval_ms must be positive".into()));
        }
        Ok(())
    }

    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy {
            attempts: self.retry.attempts,
            backoff_step: Duration::from_millis(self.retry.backoff_step_ms),
        }
    }

    pub fn thresholds(&self) -> WidthThresholds {
        WidthThresholds {
            compact_below: self.display.compact_below,
            wide_from: self.display.wide_from,
        }
    }

    pub fn connectivity_poll(&self) -> Duration {
        Duration::from_millis(self.switcher.connectivity_poll_ms)
    }

    pub fn slide_interval(&self) -> Duration {
        Duration::from_millis(self.beamer.slide_interval_ms)
    }
}
