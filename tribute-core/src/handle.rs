//! Renderer handles.
//!
//! One handle per mode, cached for the session. Transitions are monotonic:
//! `Unloaded → Loading → {Ready | Failed}`, with `Failed → Loading` as the
//! only way back.

use std::fmt;
use std::sync::Arc;

use crate::error::{HandleError, LoadError};
use crate::mode::DisplayMode;
use crate::view::{ErrorRenderer, Renderer};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HandlePhase {
    Unloaded,
    Loading,
    Ready,
    Failed,
}

impl fmt::Display for HandlePhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            HandlePhase::Unloaded => "unloaded",
            HandlePhase::Loading => "loading",
            HandlePhase::Ready => "ready",
            HandlePhase::Failed => "failed",
        })
    }
}

#[derive(Clone)]
pub enum HandleState {
    Unloaded,
    Loading,
    Ready(Arc<dyn Renderer>),
    Failed(LoadError),
}

impl HandleState {
    pub fn phase(&self) -> HandlePhase {
        match self {
            HandleState::Unloaded => HandlePhase::Unloaded,
            HandleState::Loading => HandlePhase::Loading,
            HandleState::Ready(_) => HandlePhase::Ready,
            HandleState::Failed(_) => HandlePhase::Failed,
        }
    }
}

impl fmt::Debug for HandleState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HandleState::Unloaded => f.write_str("Unloaded"),
            HandleState::Loading => f.write_str("Loading"),
            HandleState::Ready(r) => f.debug_tuple("Ready").field(&r.name()).finish(),
            HandleState::Failed(e) => f.debug_tuple("Failed").field(e).finish(),
        }
    }
}

/// A renderer that the loader obtained.
#[derive(Clone)]
pub struct Loaded {
    pub renderer: Arc<dyn Renderer>,
    /// Name of the substituted fallback, `None` for the primary.
    pub fallback: Option<String>,
    /// Source fetches it took, fallbacks included.
    pub attempts: u32,
}

impl fmt::Debug for Loaded {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Loaded")
            .field("renderer", &self.renderer.name())
            .field("fallback", &self.fallback)
            .field("attempts", &self.attempts)
            .finish()
    }
}

pub type LoadOutcome = Result<Loaded, LoadError>;

#[derive(Debug, Clone)]
pub struct RendererHandle {
    mode: DisplayMode,
    state: HandleState,
    fallback: Option<String>,
    attempts: u32,
}

impl RendererHandle {
    pub fn new(mode: DisplayMode) -> Self {
        Self {
            mode,
            state: HandleState::Unloaded,
            fallback: None,
            attempts: 0,
        }
    }

    pub fn mode(&self) -> DisplayMode {
        self.mode
    }

    pub fn state(&self) -> &HandleState {
        &self.state
    }

    pub fn phase(&self) -> HandlePhase {
        self.state.phase()
    }

    pub fn is_ready(&self) -> bool {
        self.phase() == HandlePhase::Ready
    }

    pub fn renderer(&self) -> Option<Arc<dyn Renderer>> {
        match &self.state {
            HandleState::Ready(r) => Some(r.clone()),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&LoadError> {
        match &self.state {
            HandleState::Failed(e) => Some(e),
            _ => None,
        }
    }

    /// Fallback that served this handle, if the primary did not.
    pub fn fallback(&self) -> Option<&str> {
        self.fallback.as_deref()
    }

    pub fn attempts(&self) -> u32 {
        self.attempts
    }

    /// The inline error view for a failed handle.
    pub fn error_view(&self) -> Option<ErrorRenderer> {
        self.error().map(|e| ErrorRenderer::new(self.mode, e.clone()))
    }

    pub fn begin_loading(&mut self) -> Result<(), HandleError> {
        match self.phase() {
            HandlePhase::Unloaded | HandlePhase::Failed => {
                self.state = HandleState::Loading;
                self.fallback = None;
                Ok(())
            }
            from => Err(self.illegal(from, HandlePhase::Loading)),
        }
    }

    /// Record the loader's outcome. Only valid while loading.
    pub fn settle(&mut self, outcome: LoadOutcome) -> Result<(), HandleError> {
        let to = match &outcome {
            Ok(_) => HandlePhase::Ready,
            Err(_) => HandlePhase::Failed,
        };
        if self.phase() != HandlePhase::Loading {
            return Err(self.illegal(self.phase(), to));
        }

        match outcome {
            Ok(loaded) => {
                self.attempts += loaded.attempts;
                self.fallback = loaded.fallback;
                self.state = HandleState::Ready(loaded.renderer);
            }
            Err(e) => self.state = HandleState::Failed(e),
        }
        Ok(())
    }

    fn illegal(&self, from: HandlePhase, to: HandlePhase) -> HandleError {
        HandleError {
            mode: self.mode,
            from,
            to,
        }
    }
}
