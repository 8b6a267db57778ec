//! Headset views.
//!
//! `ImmersiveRenderer` is the full stereoscopic scene. `OrbitRenderer` is
//! the simplified orbit-only scene used when the immersive one cannot load.
//! Both float the card on a panel and hide the variant selector.

use serde::{Deserialize, Serialize};

use crate::content::{ContentKey, ContentPayload};
use crate::error::RenderError;
use crate::view::{panel, Action, Frame, Renderer, View};

/// How the camera moves around the card.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Movement {
    #[default]
    Spiritual,
    Orbital,
    Linear,
}

impl Movement {
    pub fn label(self) -> &'static str {
        match self {
            Movement::Spiritual => "Spiritual",
            Movement::Orbital => "Orbital",
            Movement::Linear => "Linear",
        }
    }
}

#[derive(Debug, Default)]
pub struct ImmersiveRenderer {
    movement: Movement,
}

impl ImmersiveRenderer {
    pub fn new(movement: Movement) -> Self {
        Self { movement }
    }
}

impl Renderer for ImmersiveRenderer {
    fn name(&self) -> &str {
        "immersive"
    }

    fn mount(&self, content: &ContentPayload, key: ContentKey) -> Result<Box<dyn View>, RenderError> {
        Ok(Box::new(SceneView {
            renderer: "immersive",
            title: "VR Mode",
            hint: format!("Movement: {}", self.movement.label()),
            panel: panel(content.body()),
            headset: true,
            key,
        }))
    }
}

#[derive(Debug, Default)]
pub struct OrbitRenderer;

impl OrbitRenderer {
    pub fn new() -> Self {
        Self
    }
}

impl Renderer for OrbitRenderer {
    fn name(&self) -> &str {
        "orbit"
    }

    fn mount(&self, content: &ContentPayload, key: ContentKey) -> Result<Box<dyn View>, RenderError> {
        Ok(Box::new(SceneView {
            renderer: "orbit",
            title: "Simple VR Mode",
            hint: "Use mouse to look around".to_string(),
            panel: panel(content.body()),
            headset: false,
            key,
        }))
    }
}

struct SceneView {
    renderer: &'static str,
    title: &'static str,
    hint: String,
    /// Laid out once per mount.
    panel: Vec<String>,
    headset: bool,
    key: ContentKey,
}

impl View for SceneView {
    fn key(&self) -> ContentKey {
        self.key
    }

    fn render(&mut self) -> Result<Frame, RenderError> {
        let mut frame = Frame::new(self.renderer, self.key)
            .titled(self.title)
            .line(self.hint.clone());
        frame.lines.extend(self.panel.iter().cloned());
        if self.headset {
            frame = frame.action(Action::EnterHeadset);
        }
        Ok(frame)
    }
}
