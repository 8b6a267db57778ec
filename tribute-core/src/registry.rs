//! Built-in renderer sources.
//!
//! Each source re-checks the capabilities its renderer needs at fetch time,
//! so hardware that vanished since the startup probe turns into a load
//! failure (and from there a fallback) instead of a broken view.

use std::sync::Arc;

use anyhow::{bail, Context};
use async_trait::async_trait;
use tribute_io::CapabilitySource;

use crate::config::TributeConfig;
use crate::loader::{RendererChain, RendererLoader, RendererSource};
use crate::mode::DisplayMode;
use crate::view::{ImmersiveRenderer, OrbitRenderer, ProjectorRenderer, Renderer, StageRenderer};

/// A capability a renderer cannot work without.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Requirement {
    Online,
    Headset,
    Gpu,
}

impl Requirement {
    fn check(self, caps: &dyn CapabilitySource) -> anyhow::Result<()> {
        let (present, what) = match self {
            Requirement::Online => (caps.online(), "network connection"),
            Requirement::Headset => (caps.headset_supported(), "headset runtime"),
            Requirement::Gpu => (caps.gpu_accelerated(), "3D acceleration"),
        };
        match present {
            Ok(true) => Ok(()),
            Ok(false) => bail!("{what} not available"),
            Err(e) => Err(e).with_context(|| format!("could not check {what}")),
        }
    }
}

type Factory = Box<dyn Fn() -> Arc<dyn Renderer> + Send + Sync>;

/// A renderer compiled into the binary, gated on capabilities.
pub struct BuiltinSource {
    name: &'static str,
    requires: &'static [Requirement],
    caps: Arc<dyn CapabilitySource>,
    factory: Factory,
}

impl BuiltinSource {
    pub fn new(
        name: &'static str,
        requires: &'static [Requirement],
        caps: Arc<dyn CapabilitySource>,
        factory: impl Fn() -> Arc<dyn Renderer> + Send + Sync + 'static,
    ) -> Self {
        Self {
            name,
            requires,
            caps,
            factory: Box::new(factory),
        }
    }
}

#[async_trait]
impl RendererSource for BuiltinSource {
    fn name(&self) -> &str {
        self.name
    }

    async fn fetch(&self) -> anyhow::Result<Arc<dyn Renderer>> {
        let caps = self.caps.clone();
        let requires = self.requires;
        // Capability checks read sysfs; keep them off the event loop.
        tokio::task::spawn_blocking(move || {
            requires.iter().try_for_each(|r| r.check(caps.as_ref()))
        })
        .await
        .context("capability check aborted")??;

        Ok((self.factory)())
    }
}

/// The stock chains:
///
/// | mode   | primary     | fallback    |
/// |--------|-------------|-------------|
/// | vr     | `immersive` | `orbit`     |
/// | beamer | `stage`     | `projector` |
///
/// The default card needs no loading and is owned by the switcher.
pub fn builtin_loader(config: &TributeConfig, caps: Arc<dyn CapabilitySource>) -> RendererLoader {
    let movement = config.vr.movement;
    let resolution = config.beamer.resolution;
    let presentation = config.beamer.presentation;

    let vr = RendererChain::new(Arc::new(BuiltinSource::new(
        "immersive",
        &[Requirement::Online, Requirement::Headset, Requirement::Gpu],
        caps.clone(),
        move || -> Arc<dyn Renderer> { Arc::new(ImmersiveRenderer::new(movement)) },
    )))
    .fallback(Arc::new(BuiltinSource::new(
        "orbit",
        &[Requirement::Gpu],
        caps.clone(),
        || -> Arc<dyn Renderer> { Arc::new(OrbitRenderer::new()) },
    )));

    let beamer = RendererChain::new(Arc::new(BuiltinSource::new(
        "stage",
        &[Requirement::Online, Requirement::Gpu],
        caps.clone(),
        move || -> Arc<dyn Renderer> { Arc::new(StageRenderer::new(resolution, presentation)) },
    )))
    .fallback(Arc::new(BuiltinSource::new(
        "projector",
        &[],
        caps,
        move || -> Arc<dyn Renderer> { Arc::new(ProjectorRenderer::new(resolution)) },
    )));

    RendererLoader::new(config.retry_policy())
        .register(DisplayMode::Vr, vr)
        .register(DisplayMode::Beamer, beamer)
}
