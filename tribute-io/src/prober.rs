//! Capability Prober
//!
//! Turns a [`CapabilitySource`] into a [`CapabilitySnapshot`]. A failing
//! check never aborts the probe; it is logged and replaced by that
//! capability's safe default.

use std::sync::Arc;
use tracing::{debug, info};

use crate::source::{CapabilitySource, ProbeError};
use crate::{CapabilitySnapshot, ScreenWidthClass, WidthThresholds};

#[derive(Clone)]
pub struct CapabilityProber {
    source: Arc<dyn CapabilitySource>,
    thresholds: WidthThresholds,
}

impl std::fmt::Debug for CapabilityProber {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CapabilityProber")
            .field("source", &self.source.name())
            .field("thresholds", &self.thresholds)
            .finish()
    }
}

impl CapabilityProber {
    pub fn new(source: Arc<dyn CapabilitySource>) -> Self {
        Self {
            source,
            thresholds: WidthThresholds::default(),
        }
    }

    pub fn with_thresholds(mut self, thresholds: WidthThresholds) -> Self {
        self.thresholds = thresholds;
        self
    }

    /// The source the prober reads from.
    pub fn source(&self) -> Arc<dyn CapabilitySource> {
        self.source.clone()
    }

    /// Query every capability once and freeze the answers.
    pub fn probe(&self) -> CapabilitySnapshot {
        let source = self.source.as_ref();

        let screen_width_class = settle("viewport width", source.viewport_width())
            .map(|width| self.thresholds.classify(width))
            .unwrap_or(ScreenWidthClass::Standard);

        let snapshot = CapabilitySnapshot {
            headset_supported: settle("headset", source.headset_supported()).unwrap_or(false),
            gpu_accelerated: settle("gpu", source.gpu_accelerated()).unwrap_or(false),
            screen_width_class,
            online: settle("online", source.online()).unwrap_or(false),
            orientation_sensor: settle("orientation sensor", source.orientation_sensor())
                .unwrap_or(false),
        };

        info!(source = source.name(), ?snapshot, "capabilities probed");
        snapshot
    }
}

fn settle<T: std::fmt::Debug>(check: &str, result: Result<T, ProbeError>) -> Option<T> {
    match result {
        Ok(value) => {
            debug!(check, ?value, "capability check");
            Some(value)
        }
        Err(e) => {
            debug!(check, error = %e, "capability check failed, using default");
            None
        }
    }
}
