//! Mode Resolver
//!
//! Pure mapping from (capabilities, user override) to exactly one mode.

use tribute_io::CapabilitySnapshot;

use crate::mode::{DisplayMode, ModeSet};

/// Pick the display mode.
///
/// Precedence:
/// 1. An explicit override, unchanged.
/// 2. Offline → `Default` (the immersive and projector views need assets).
/// 3. Headset + GPU → `Vr`.
/// 4. Wide screen → `Beamer`.
/// 5. `Default`.
pub fn resolve(snapshot: &CapabilitySnapshot, user_override: Option<DisplayMode>) -> DisplayMode {
    if let Some(mode) = user_override {
        return mode;
    }
    if !snapshot.online {
        return DisplayMode::Default;
    }
    if snapshot.immersive_ready() {
        DisplayMode::Vr
    } else if snapshot.projector_ready() {
        DisplayMode::Beamer
    } else {
        DisplayMode::Default
    }
}

/// Modes the selector offers as enabled.
pub fn admissible(snapshot: &CapabilitySnapshot) -> ModeSet {
    if snapshot.online {
        ModeSet::all()
    } else {
        [DisplayMode::Default].into_iter().collect()
    }
}

/// Does the hardware advertise this mode? Advisory only; explicit choice
/// may still pick an undetected mode.
pub fn detected(snapshot: &CapabilitySnapshot, mode: DisplayMode) -> bool {
    match mode {
        DisplayMode::Default => true,
        DisplayMode::Vr => snapshot.immersive_ready(),
        DisplayMode::Beamer => snapshot.projector_ready(),
    }
}
