use crate::content::{ContentKey, ContentPayload};
use crate::error::RenderError;
use crate::view::{Frame, Renderer, View};

/// The default view: the card exactly as the template layer supplied it.
#[derive(Debug, Default)]
pub struct CardRenderer;

impl CardRenderer {
    pub fn new() -> Self {
        Self
    }
}

impl Renderer for CardRenderer {
    fn name(&self) -> &str {
        "card"
    }

    fn mount(&self, content: &ContentPayload, key: ContentKey) -> Result<Box<dyn View>, RenderError> {
        Ok(Box::new(CardView {
            content: content.clone(),
            key,
        }))
    }
}

struct CardView {
    content: ContentPayload,
    key: ContentKey,
}

impl View for CardView {
    fn key(&self) -> ContentKey {
        self.key
    }

    fn render(&mut self) -> Result<Frame, RenderError> {
        Ok(Frame::new("card", self.key).body(self.content.body()))
    }
}
