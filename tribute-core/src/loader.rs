//! Renderer Loader
//!
//! Obtains a mode's renderer: the primary source is retried with a linear
//! backoff, then each fallback is tried once in order. The loader never
//! fails past its boundary; every failure ends up as a `Failed` outcome.
//! Each fetch runs as its own task, so a panicking source counts as a
//! failed attempt.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use anyhow::anyhow;
use async_trait::async_trait;
use tracing::{info, warn};

use crate::error::{panic_message, LoadError};
use crate::handle::{LoadOutcome, Loaded, RendererHandle};
use crate::mode::DisplayMode;
use crate::view::Renderer;

/// Something that can produce a renderer, possibly unreliably.
#[async_trait]
pub trait RendererSource: Send + Sync {
    fn name(&self) -> &str;

    async fn fetch(&self) -> anyhow::Result<Arc<dyn Renderer>>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub attempts: u32,
    pub backoff_step: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            attempts: 3,
            backoff_step: Duration::from_secs(1),
        }
    }
}

impl RetryPolicy {
    /// Delay after failed attempt `attempt` (1-based).
    pub fn backoff(&self, attempt: u32) -> Duration {
        self.backoff_step * attempt
    }
}

/// A mode's primary source and its ordered fallbacks.
#[derive(Clone)]
pub struct RendererChain {
    primary: Arc<dyn RendererSource>,
    fallbacks: Vec<Arc<dyn RendererSource>>,
}

impl RendererChain {
    pub fn new(primary: Arc<dyn RendererSource>) -> Self {
        Self {
            primary,
            fallbacks: Vec::new(),
        }
    }

    pub fn fallback(mut self, source: Arc<dyn RendererSource>) -> Self {
        self.fallbacks.push(source);
        self
    }

    pub fn names(&self) -> Vec<&str> {
        std::iter::once(self.primary.name())
            .chain(self.fallbacks.iter().map(|s| s.name()))
            .collect()
    }
}

#[derive(Default)]
pub struct RendererLoader {
    chains: HashMap<DisplayMode, RendererChain>,
    retry: RetryPolicy,
}

impl std::fmt::Debug for RendererLoader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let chains: HashMap<_, _> = self.chains.iter().map(|(m, c)| (m, c.names())).collect();
        f.debug_struct("RendererLoader")
            .field("chains", &chains)
            .field("retry", &self.retry)
            .finish()
    }
}

impl RendererLoader {
    pub fn new(retry: RetryPolicy) -> Self {
        Self {
            chains: HashMap::new(),
            retry,
        }
    }

    pub fn register(mut self, mode: DisplayMode, chain: RendererChain) -> Self {
        self.chains.insert(mode, chain);
        self
    }

    pub fn retry_policy(&self) -> RetryPolicy {
        self.retry
    }

    /// Load `mode` into a fresh handle, suspending until it settles.
    pub async fn load(&self, mode: DisplayMode) -> RendererHandle {
        let mut handle = RendererHandle::new(mode);
        self.reload(&mut handle).await;
        handle
    }

    /// Re-enter loading on an unloaded or failed handle and settle it.
    pub async fn reload(&self, handle: &mut RendererHandle) {
        if let Err(e) = handle.begin_loading() {
            warn!(error = %e, "load skipped");
            return;
        }
        let outcome = self.fetch(handle.mode()).await;
        if let Err(e) = handle.settle(outcome) {
            warn!(error = %e, "load result dropped");
        }
    }

    /// Run the retry and fallback chain for `mode`.
    pub async fn fetch(&self, mode: DisplayMode) -> LoadOutcome {
        let Some(chain) = self.chains.get(&mode) else {
            warn!(%mode, "no renderer chain registered");
            return Err(LoadError::Unregistered(mode));
        };

        let attempts = self.retry.attempts.max(1);
        let mut last = None;

        for attempt in 1..=attempts {
            match attempt_fetch(&chain.primary).await {
                Ok(renderer) => {
                    info!(%mode, renderer = renderer.name(), attempt, "renderer ready");
                    return Ok(Loaded {
                        renderer,
                        fallback: None,
                        attempts: attempt,
                    });
                }
                Err(e) => {
                    warn!(%mode, source = chain.primary.name(), attempt, attempts, error = %format!("{e:#}"), "renderer load failed");
                    last = Some(source_error(chain.primary.as_ref(), &e));
                    // The last backoff still runs when fallbacks follow.
                    if attempt < attempts || !chain.fallbacks.is_empty() {
                        tokio::time::sleep(self.retry.backoff(attempt)).await;
                    }
                }
            }
        }

        for (i, source) in chain.fallbacks.iter().enumerate() {
            match attempt_fetch(source).await {
                Ok(renderer) => {
                    warn!(%mode, fallback = source.name(), "primary renderer unavailable, using fallback");
                    return Ok(Loaded {
                        renderer,
                        fallback: Some(source.name().to_string()),
                        attempts: attempts + i as u32 + 1,
                    });
                }
                Err(e) => {
                    warn!(%mode, fallback = source.name(), error = %format!("{e:#}"), "fallback load failed");
                    last = Some(source_error(source.as_ref(), &e));
                }
            }
        }

        let last = last
            .map(|e| e.user_message().to_string())
            .unwrap_or_else(|| "renderer unavailable".to_string());
        warn!(%mode, error = %last, "all renderers failed");
        Err(LoadError::Exhausted { mode, last })
    }
}

/// One fetch on its own task. A panic or abort becomes an error.
async fn attempt_fetch(source: &Arc<dyn RendererSource>) -> anyhow::Result<Arc<dyn Renderer>> {
    let source = source.clone();
    match tokio::spawn(async move { source.fetch().await }).await {
        Ok(result) => result,
        Err(e) if e.is_panic() => {
            let message = panic_message(&*e.into_panic());
            Err(anyhow!("renderer source panicked: {message}"))
        }
        Err(e) => Err(anyhow!("renderer fetch aborted: {e}")),
    }
}

fn source_error(source: &dyn RendererSource, e: &anyhow::Error) -> LoadError {
    LoadError::Source {
        source_name: source.name().to_string(),
        message: format!("{e:#}"),
    }
}
