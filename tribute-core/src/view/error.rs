use crate::content::{ContentKey, ContentPayload};
use crate::error::{LoadError, RenderError};
use crate::mode::DisplayMode;
use crate::view::{Action, Frame, Renderer, View};

/// Inline view for a mode whose renderer could not be obtained.
#[derive(Debug, Clone)]
pub struct ErrorRenderer {
    mode: DisplayMode,
    error: LoadError,
}

impl ErrorRenderer {
    pub fn new(mode: DisplayMode, error: LoadError) -> Self {
        Self { mode, error }
    }

    pub fn frame(&self, key: ContentKey) -> Frame {
        Frame::new("error", key)
            .titled(self.mode.unavailable_title())
            .line(self.error.user_message())
            .action(Action::Retry)
            .action(Action::ReturnToDefault)
    }
}

impl Renderer for ErrorRenderer {
    fn name(&self) -> &str {
        "error"
    }

    fn mount(&self, _content: &ContentPayload, key: ContentKey) -> Result<Box<dyn View>, RenderError> {
        Ok(Box::new(ErrorView {
            frame: self.frame(key),
        }))
    }
}

struct ErrorView {
    frame: Frame,
}

impl View for ErrorView {
    fn key(&self) -> ContentKey {
        self.frame.key
    }

    fn render(&mut self) -> Result<Frame, RenderError> {
        Ok(self.frame.clone())
    }
}
