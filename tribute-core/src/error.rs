use std::any::Any;

use thiserror::Error;

use crate::handle::HandlePhase;
use crate::mode::DisplayMode;

/// A renderer could not be obtained.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LoadError {
    /// One source attempt failed.
    #[error("{source_name}: {message}")]
    Source {
        source_name: String,
        message: String,
    },

    /// Primary and every fallback failed; carries the last error.
    #[error("no renderer for {mode} mode ({last})")]
    Exhausted { mode: DisplayMode, last: String },

    /// No chain registered for this mode.
    #[error("no renderer registered for {0} mode")]
    Unregistered(DisplayMode),
}

impl LoadError {
    /// The message shown to the user.
    pub fn user_message(&self) -> &str {
        match self {
            LoadError::Source { message, .. } => message,
            LoadError::Exhausted { last, .. } => last,
            LoadError::Unregistered(_) => "This view is not installed.",
        }
    }
}

/// A mounted view failed while producing a frame.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RenderError {
    #[error("{view} could not mount: {message}")]
    Mount { view: String, message: String },

    #[error("{view} failed: {message}")]
    Frame { view: String, message: String },

    #[error("{view} panicked: {message}")]
    Panic { view: String, message: String },
}

/// Illegal renderer handle transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("renderer handle for {mode} cannot go from {from} to {to}")]
pub struct HandleError {
    pub mode: DisplayMode,
    pub from: HandlePhase,
    pub to: HandlePhase,
}

/// Configuration could not be loaded.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: toml::de::Error,
    },

    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Text of a panic payload, for logs and banners.
pub fn panic_message(payload: &(dyn Any + Send)) -> String {
    payload
        .downcast_ref::<&str>()
        .map(|s| s.to_string())
        .or_else(|| payload.downcast_ref::<String>().cloned())
        .unwrap_or_else(|| "<non-string panic payload>".to_string())
}
