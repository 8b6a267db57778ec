pub mod config;
pub mod content;
pub mod error;
pub mod handle;
pub mod loader;
pub mod mode;
pub mod registry;
pub mod resolver;
pub mod switcher;
pub mod view;

// Re-export the main struct so users can just use `tribute_core::ModeSwitcher`
pub use switcher::{ModeSwitcher, SwitcherEvent, SwitcherHandle, ViewState};

// Re-export the simpler types for the host
pub use config::TributeConfig;
pub use content::{ContentKey, ContentPayload};
pub use error::{panic_message, ConfigError, HandleError, LoadError, RenderError};
pub use handle::{HandlePhase, HandleState, LoadOutcome, Loaded, RendererHandle};
pub use loader::{RendererChain, RendererLoader, RendererSource, RetryPolicy};
pub use mode::{DisplayMode, ModeSet};
pub use resolver::resolve;
