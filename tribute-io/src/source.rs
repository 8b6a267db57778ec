//! Capability sources.
//!
//! A source answers individual capability questions. Every method has a
//! default that reports `Unsupported`, so a source only implements the checks
//! its platform actually has.

use std::sync::atomic::{AtomicBool, Ordering};
use thiserror::Error;

/// Why a single capability check could not produce an answer.
#[derive(Debug, Error)]
pub enum ProbeError {
    /// The platform has no API for this check.
    #[error("Unsupported: {0}")]
    Unsupported(&'static str),

    /// The API exists but the resource was not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Reading a platform file failed.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The platform answered with something unreadable.
    #[error("Parse error: {0}")]
    Parse(String),
}

/// Read-only access to the platform's capability APIs.
pub trait CapabilitySource: Send + Sync {
    /// Short name used in logs.
    fn name(&self) -> &str;

    /// Can an immersive (headset) session be started?
    fn headset_supported(&self) -> Result<bool, ProbeError> {
        Err(ProbeError::Unsupported("immersive session query"))
    }

    /// Is a hardware 3D rendering context available?
    fn gpu_accelerated(&self) -> Result<bool, ProbeError> {
        Err(ProbeError::Unsupported("rendering context query"))
    }

    /// Width of the viewport in pixels.
    fn viewport_width(&self) -> Result<u32, ProbeError> {
        Err(ProbeError::Unsupported("viewport query"))
    }

    /// Network online/offline flag.
    fn online(&self) -> Result<bool, ProbeError> {
        Err(ProbeError::Unsupported("network status query"))
    }

    /// Is a device-orientation sensor present?
    fn orientation_sensor(&self) -> Result<bool, ProbeError> {
        Err(ProbeError::Unsupported("orientation sensor query"))
    }
}

/// A source with fixed answers.
///
/// `None` fields behave like a missing API. The online flag can be flipped
/// at runtime to simulate connectivity changes.
#[derive(Debug, Default)]
pub struct StaticSource {
    pub headset: Option<bool>,
    pub gpu: Option<bool>,
    pub viewport_width: Option<u32>,
    pub orientation: Option<bool>,
    online: AtomicBool,
}

impl StaticSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_headset(mut self, supported: bool) -> Self {
        self.headset = Some(supported);
        self
    }

    pub fn with_gpu(mut self, accelerated: bool) -> Self {
        self.gpu = Some(accelerated);
        self
    }

    pub fn with_viewport_width(mut self, width: u32) -> Self {
        self.viewport_width = Some(width);
        self
    }

    pub fn with_orientation(mut self, present: bool) -> Self {
        self.orientation = Some(present);
        self
    }

    pub fn with_online(self, online: bool) -> Self {
        self.online.store(online, Ordering::SeqCst);
        self
    }

    /// Flip the simulated network flag.
    pub fn set_online(&self, online: bool) {
        self.online.store(online, Ordering::SeqCst);
    }

    pub fn is_online(&self) -> bool {
        self.online.load(Ordering::SeqCst)
    }
}

impl CapabilitySource for StaticSource {
    fn name(&self) -> &str {
        "static"
    }

    fn headset_supported(&self) -> Result<bool, ProbeError> {
        self.headset
            .ok_or(ProbeError::Unsupported("immersive session query"))
    }

    fn gpu_accelerated(&self) -> Result<bool, ProbeError> {
        self.gpu.ok_or(ProbeError::Unsupported("rendering context query"))
    }

    fn viewport_width(&self) -> Result<u32, ProbeError> {
        self.viewport_width
            .ok_or(ProbeError::Unsupported("viewport query"))
    }

    fn online(&self) -> Result<bool, ProbeError> {
        Ok(self.is_online())
    }

    fn orientation_sensor(&self) -> Result<bool, ProbeError> {
        self.orientation
            .ok_or(ProbeError::Unsupported("orientation sensor query"))
    }
}
