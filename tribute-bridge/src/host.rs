//! Capability sources as the terminal host sees them.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use clap::ValueEnum;
use tribute_io::{CapabilitySource, ProbeError, StaticSource};

/// Canned machines for trying the modes without the hardware.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Preset {
    /// Headset runtime, GPU, 1920px display.
    Headset,
    /// GPU and a 1920px projector, no headset.
    Projector,
    /// GPU and a 1366px laptop panel.
    Laptop,
    /// No GPU, 390px.
    Phone,
}

impl Preset {
    pub fn source(self) -> StaticSource {
        let base = StaticSource::new().with_online(true).with_orientation(false);
        match self {
            Preset::Headset => base.with_headset(true).with_gpu(true).with_viewport_width(1920),
            Preset::Projector => base.with_headset(false).with_gpu(true).with_viewport_width(1920),
            Preset::Laptop => base.with_headset(false).with_gpu(true).with_viewport_width(1366),
            Preset::Phone => base
                .with_headset(false)
                .with_gpu(false)
                .with_viewport_width(390)
                .with_orientation(true),
        }
    }
}

/// Wraps the real source so `offline` can be forced from the console.
pub struct HostSource {
    inner: Arc<dyn CapabilitySource>,
    forced_offline: AtomicBool,
}

impl HostSource {
    pub fn new(inner: Arc<dyn CapabilitySource>) -> Self {
        Self {
            inner,
            forced_offline: AtomicBool::new(false),
        }
    }

    pub fn force_offline(&self, offline: bool) {
        self.forced_offline.store(offline, Ordering::SeqCst);
    }

    pub fn is_forced_offline(&self) -> bool {
        self.forced_offline.load(Ordering::SeqCst)
    }
}

impl CapabilitySource for HostSource {
    fn name(&self) -> &str {
        self.inner.name()
    }

    fn headset_supported(&self) -> Result<bool, ProbeError> {
        self.inner.headset_supported()
    }

    fn gpu_accelerated(&self) -> Result<bool, ProbeError> {
        self.inner.gpu_accelerated()
    }

    fn viewport_width(&self) -> Result<u32, ProbeError> {
        self.inner.viewport_width()
    }

    fn online(&self) -> Result<bool, ProbeError> {
        if self.is_forced_offline() {
            return Ok(false);
        }
        self.inner.online()
    }

    fn orientation_sensor(&self) -> Result<bool, ProbeError> {
        self.inner.orientation_sensor()
    }
}
