//! # Tribute IO
//!
//! The Hardware Bridge.
//! Thin, read-only capability checks that tell the viewer which display
//! modes the current machine can plausibly drive.

use serde::{Deserialize, Serialize};

pub mod monitor;
pub mod prober;
pub mod source;
pub mod system;

pub use monitor::{ConnectivityEvent, ConnectivityMonitor};
pub use prober::CapabilityProber;
pub use source::{CapabilitySource, ProbeError, StaticSource};
pub use system::SystemSource;

/// Coarse classification of the viewport width.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScreenWidthClass {
    /// Phones and narrow windows.
    Compact,
    /// Laptops and desktop monitors.
    #[default]
    Standard,
    /// Projectors and large displays ("projector-ready").
    Wide,
}

/// Pixel breakpoints used to classify a viewport width.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WidthThresholds {
    /// Widths strictly below this are `Compact`.
    pub compact_below: u32,
    /// Widths at or above this are `Wide`.
    pub wide_from: u32,
}

impl Default for WidthThresholds {
    fn default() -> Self {
        Self {
            compact_below: 768,
            wide_from: 1280,
        }
    }
}

impl WidthThresholds {
    pub fn classify(&self, width: u32) -> ScreenWidthClass {
        if width < self.compact_below {
            ScreenWidthClass::Compact
        } else if width >= self.wide_from {
            ScreenWidthClass::Wide
        } else {
            ScreenWidthClass::Standard
        }
    }
}

/// Point-in-time record of detected hardware and environment features.
///
/// Produced by [`CapabilityProber::probe`]. A snapshot is never edited; a
/// re-probe produces a fresh one that replaces it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CapabilitySnapshot {
    pub headset_supported: bool,
    pub gpu_accelerated: bool,
    pub screen_width_class: ScreenWidthClass,
    pub online: bool,
    pub orientation_sensor: bool,
}

impl CapabilitySnapshot {
    /// The safe snapshot used when nothing could be detected.
    pub fn fallback() -> Self {
        Self::default()
    }

    /// Headset present and able to render it.
    pub fn immersive_ready(&self) -> bool {
        self.headset_supported && self.gpu_accelerated
    }

    /// Large enough to be treated as a projector surface.
    pub fn projector_ready(&self) -> bool {
        self.screen_width_class == ScreenWidthClass::Wide
    }
}
