//! Views
//!
//! A [`Renderer`] is what the loader hands back for a mode. Mounting it
//! against the content produces a [`View`], which owns whatever state it
//! derives from that content until the next remount.

pub mod beamer;
pub mod card;
pub mod error;
pub mod immersive;

use std::fmt;

use crate::content::{ContentKey, ContentPayload};
use crate::error::RenderError;

pub use beamer::{BeamerResolution, Presentation, ProjectorRenderer, StageRenderer};
pub use card::CardRenderer;
pub use error::ErrorRenderer;
pub use immersive::{ImmersiveRenderer, Movement, OrbitRenderer};

/// A mode's view implementation.
pub trait Renderer: Send + Sync {
    fn name(&self) -> &str;

    /// Build a view for `content`. Called again on every remount.
    fn mount(&self, content: &ContentPayload, key: ContentKey) -> Result<Box<dyn View>, RenderError>;
}

/// A mounted view.
pub trait View: Send {
    fn key(&self) -> ContentKey;

    fn render(&mut self) -> Result<Frame, RenderError>;

    /// Time-driven progress (e.g. the next slide). Returns true if the next
    /// frame differs.
    fn advance(&mut self) -> Result<bool, RenderError> {
        Ok(false)
    }
}

/// User actions a frame offers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Retry,
    ReturnToDefault,
    EnterHeadset,
    NextSlide,
}

impl Action {
    pub fn label(self) -> &'static str {
        match self {
            Action::Retry => "Retry",
            Action::ReturnToDefault => "Return to Default",
            Action::EnterHeadset => "Enter VR",
            Action::NextSlide => "Next",
        }
    }
}

/// One rendered screenful from a view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    /// Renderer that produced the frame.
    pub view: String,
    pub key: ContentKey,
    pub title: Option<String>,
    pub lines: Vec<String>,
    pub actions: Vec<Action>,
}

impl Frame {
    pub fn new(view: impl Into<String>, key: ContentKey) -> Self {
        Self {
            view: view.into(),
            key,
            title: None,
            lines: Vec::new(),
            actions: Vec::new(),
        }
    }

    pub fn titled(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn line(mut self, line: impl Into<String>) -> Self {
        self.lines.push(line.into());
        self
    }

    pub fn body(mut self, text: &str) -> Self {
        self.lines.extend(text.lines().map(str::to_string));
        self
    }

    pub fn action(mut self, action: Action) -> Self {
        self.actions.push(action);
        self
    }

    /// Frame shown while a mode's renderer is still loading.
    pub fn loading(key: ContentKey) -> Self {
        Frame::new("loading", key).line("Loading...")
    }
}

impl fmt::Display for Frame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(title) = &self.title {
            writeln!(f, "== {} ==", title)?;
        }
        for line in &self.lines {
            writeln!(f, "{}", line)?;
        }
        if !self.actions.is_empty() {
            let buttons: Vec<String> = self
                .actions
                .iter()
                .map(|a| format!("[{}]", a.label()))
                .collect();
            writeln!(f, "{}", buttons.join(" "))?;
        }
        Ok(())
    }
}

/// Draw `text` inside a box, used by the 3D views for their floating panel.
pub(crate) fn panel(text: &str) -> Vec<String> {
    let width = text.lines().map(|l| l.chars().count()).max().unwrap_or(0);
    let mut out = Vec::with_capacity(text.lines().count() + 2);
    out.push(format!("┌{}┐", "─".repeat(width + 2)));
    for line in text.lines() {
        let pad = width - line.chars().count();
        out.push(format!("│ {}{} │", line, " ".repeat(pad)));
    }
    out.push(format!("└{}┘", "─".repeat(width + 2)));
    out
}
