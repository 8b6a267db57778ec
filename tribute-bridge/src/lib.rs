//! # Tribute Bridge
//!
//! Terminal host for the tribute viewer: reads console commands, feeds
//! connectivity changes to the switcher, and prints what it renders.

pub mod commands;
pub mod host;
pub mod util;

pub use commands::{Command, CommandParser};
pub use host::{HostSource, Preset};

/// Shown when no `--content` file is given.
pub const SAMPLE_CARD: &str = "\
In Loving Memory
Margaret Ellen Hart

March 3, 1938 - September 14, 2025

Beloved mother, grandmother and friend.
She filled every room with music.

\"What we have once enjoyed we can never lose.\"";
