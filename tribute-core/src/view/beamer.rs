//! Projector views.

use serde::{Deserialize, Serialize};

use crate::content::{ContentKey, ContentPayload};
use crate::error::RenderError;
use crate::view::{Action, Frame, Renderer, View};

/// Output presets for the projector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum BeamerResolution {
    #[serde(rename = "720p")]
    Hd,
    #[default]
    #[serde(rename = "1080p")]
    FullHd,
    #[serde(rename = "4k")]
    UltraHd,
}

impl BeamerResolution {
    /// (width, height, content scale)
    pub fn dimensions(self) -> (u32, u32, f32) {
        match self {
            BeamerResolution::Hd => (1280, 720, 0.8),
            BeamerResolution::FullHd => (1920, 1080, 1.0),
            BeamerResolution::UltraHd => (3840, 2160, 1.5),
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            BeamerResolution::Hd => "720p",
            BeamerResolution::FullHd => "1080p",
            BeamerResolution::UltraHd => "4k",
        }
    }

    fn heading(self, mode: &str) -> String {
        let (w, h, scale) = self.dimensions();
        format!("{} · {} ({}×{}, scale {:.1})", mode, self.label(), w, h, scale)
    }
}

/// How the stage presents the card.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Presentation {
    /// One paragraph per slide, cycling.
    #[default]
    Slideshow,
    /// The whole card as a quiet full-screen reflection.
    Reflection,
}

/// Split the card into slides: one per blank-line separated paragraph.
pub fn slides(body: &str) -> Vec<String> {
    let mut slides = Vec::new();
    let mut current: Vec<&str> = Vec::new();
    for line in body.lines() {
        if line.trim().is_empty() {
            if !current.is_empty() {
                slides.push(current.join("\n"));
                current.clear();
            }
        } else {
            current.push(line.trim());
        }
    }
    if !current.is_empty() {
        slides.push(current.join("\n"));
    }
    if slides.is_empty() {
        slides.push(String::new());
    }
    slides
}

/// The 3D projector stage.
#[derive(Debug, Default)]
pub struct StageRenderer {
    resolution: BeamerResolution,
    presentation: Presentation,
}

impl StageRenderer {
    pub fn new(resolution: BeamerResolution, presentation: Presentation) -> Self {
        Self {
            resolution,
            presentation,
        }
    }
}

impl Renderer for StageRenderer {
    fn name(&self) -> &str {
        "stage"
    }

    fn mount(&self, content: &ContentPayload, key: ContentKey) -> Result<Box<dyn View>, RenderError> {
        Ok(Box::new(StageView {
            heading: self.resolution.heading("Beamer Mode"),
            presentation: self.presentation,
            slides: slides(content.body()),
            body: content.clone(),
            current: 0,
            key,
        }))
    }
}

struct StageView {
    heading: String,
    presentation: Presentation,
    /// Derived from the content at mount time.
    slides: Vec<String>,
    body: ContentPayload,
    current: usize,
    key: ContentKey,
}

impl View for StageView {
    fn key(&self) -> ContentKey {
        self.key
    }

    fn render(&mut self) -> Result<Frame, RenderError> {
        let frame = Frame::new("stage", self.key).titled(self.heading.clone());
        match self.presentation {
            Presentation::Slideshow => {
                let slide = self.slides.get(self.current).ok_or_else(|| RenderError::Frame {
                    view: "stage".to_string(),
                    message: format!("slide {} out of range", self.current),
                })?;
                Ok(frame
                    .line(format!("Slide {} of {}", self.current + 1, self.slides.len()))
                    .body(slide)
                    .action(Action::NextSlide))
            }
            Presentation::Reflection => Ok(frame.line("In Loving Memory").body(self.body.body())),
        }
    }

    fn advance(&mut self) -> Result<bool, RenderError> {
        if self.presentation != Presentation::Slideshow || self.slides.len() < 2 {
            return Ok(false);
        }
        self.current = (self.current + 1) % self.slides.len();
        Ok(true)
    }
}

/// Static 2D projector layout, the stage's fallback.
#[derive(Debug, Default)]
pub struct ProjectorRenderer {
    resolution: BeamerResolution,
}

impl ProjectorRenderer {
    pub fn new(resolution: BeamerResolution) -> Self {
        Self { resolution }
    }
}

impl Renderer for ProjectorRenderer {
    fn name(&self) -> &str {
        "projector"
    }

    fn mount(&self, content: &ContentPayload, key: ContentKey) -> Result<Box<dyn View>, RenderError> {
        Ok(Box::new(ProjectorView {
            heading: self.resolution.heading("Projector Mode"),
            content: content.clone(),
            key,
        }))
    }
}

struct ProjectorView {
    heading: String,
    content: ContentPayload,
    key: ContentKey,
}

impl View for ProjectorView {
    fn key(&self) -> ContentKey {
        self.key
    }

    fn render(&mut self) -> Result<Frame, RenderError> {
        Ok(Frame::new("projector", self.key)
            .titled(self.heading.clone())
            .body(self.content.body()))
    }
}
