use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The three ways a tribute card can be presented.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DisplayMode {
    /// The interactive card, shown as-is.
    #[default]
    #[serde(alias = "original")]
    Default,
    /// Stereoscopic headset scene.
    Vr,
    /// Projector layout.
    Beamer,
}

impl DisplayMode {
    pub const ALL: [DisplayMode; 3] = [DisplayMode::Default, DisplayMode::Vr, DisplayMode::Beamer];

    /// Selector label.
    pub fn label(self) -> &'static str {
        match self {
            DisplayMode::Default => "Default View",
            DisplayMode::Vr => "VR Mode",
            DisplayMode::Beamer => "Beamer Mode",
        }
    }

    /// Title used by error views.
    pub fn unavailable_title(self) -> &'static str {
        match self {
            DisplayMode::Default => "Default View Unavailable",
            DisplayMode::Vr => "VR Mode Unavailable",
            DisplayMode::Beamer => "Projector Mode Unavailable",
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            DisplayMode::Default => "default",
            DisplayMode::Vr => "vr",
            DisplayMode::Beamer => "beamer",
        }
    }
}

impl fmt::Display for DisplayMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown display mode: {0}")]
pub struct UnknownMode(pub String);

impl FromStr for DisplayMode {
    type Err = UnknownMode;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "default" | "original" => Ok(DisplayMode::Default),
            "vr" => Ok(DisplayMode::Vr),
            "beamer" | "projector" => Ok(DisplayMode::Beamer),
            other => Err(UnknownMode(other.to_string())),
        }
    }
}

/// A small set of modes, used for the selector's enabled options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ModeSet {
    bits: u8,
}

impl ModeSet {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn all() -> Self {
        DisplayMode::ALL.into_iter().collect()
    }

    pub fn insert(&mut self, mode: DisplayMode) {
        self.bits |= Self::bit(mode);
    }

    pub fn contains(&self, mode: DisplayMode) -> bool {
        self.bits & Self::bit(mode) != 0
    }

    pub fn len(&self) -> usize {
        self.bits.count_ones() as usize
    }

    pub fn is_empty(&self) -> bool {
        self.bits == 0
    }

    pub fn iter(&self) -> impl Iterator<Item = DisplayMode> + '_ {
        DisplayMode::ALL.into_iter().filter(|m| self.contains(*m))
    }

    fn bit(mode: DisplayMode) -> u8 {
        match mode {
            DisplayMode::Default => 0b001,
            DisplayMode::Vr => 0b010,
            DisplayMode::Beamer => 0b100,
        }
    }
}

impl FromIterator<DisplayMode> for ModeSet {
    fn from_iter<I: IntoIterator<Item = DisplayMode>>(iter: I) -> Self {
        let mut set = ModeSet::empty();
        for mode in iter {
            set.insert(mode);
        }
        set
    }
}
