//! Mode Switcher
//!
//! The composition root. Owns the capability snapshot, the active mode, the
//! renderer handle cache and the mounted view, and is the single error
//! boundary for everything below it.
//!
//! Events arrive through an inbox. Renderer loads run as spawned tasks that
//! post their outcome back with the token they were issued; an outcome whose
//! token the active mode is no longer waiting for still settles its handle
//! but never touches the active state.

use std::collections::HashMap;
use std::fmt;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;

use tokio::sync::mpsc;
use tracing::{debug, error, info, warn};
use tribute_io::{CapabilityProber, CapabilitySnapshot};

use crate::content::{ContentKey, ContentPayload};
use crate::error::{panic_message, LoadError, RenderError};
use crate::handle::{HandlePhase, LoadOutcome, RendererHandle};
use crate::loader::RendererLoader;
use crate::mode::DisplayMode;
use crate::resolver;
use crate::view::{CardRenderer, Frame, Renderer, View};

/// Signals the switcher reacts to.
#[derive(Debug)]
pub enum SwitcherEvent {
    /// User picked a mode in the selector.
    Select(DisplayMode),
    /// Unpin the user's choice and follow the hardware again.
    ClearOverride,
    ConnectivityChanged,
    /// A different template variant is being shown.
    ContentVariantChanged(Option<String>),
    /// Manual retry from the error view.
    Retry,
    ReturnToDefault,
    /// Clock tick for views that progress on their own.
    Advance,
    LoadSettled {
        token: u64,
        mode: DisplayMode,
        outcome: LoadOutcome,
    },
    Shutdown,
}

/// Cloneable sender for external signals.
#[derive(Debug, Clone)]
pub struct SwitcherHandle {
    tx: mpsc::UnboundedSender<SwitcherEvent>,
}

impl SwitcherHandle {
    /// False once the switcher is gone.
    pub fn send(&self, event: SwitcherEvent) -> bool {
        self.tx.send(event).is_ok()
    }

    pub fn select(&self, mode: DisplayMode) -> bool {
        self.send(SwitcherEvent::Select(mode))
    }

    pub fn connectivity_changed(&self) -> bool {
        self.send(SwitcherEvent::ConnectivityChanged)
    }

    pub fn variant_changed(&self, variant: Option<String>) -> bool {
        self.send(SwitcherEvent::ContentVariantChanged(variant))
    }
}

/// What the content area is showing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewState {
    Default,
    Loading(DisplayMode),
    Ready(DisplayMode),
    Failed(DisplayMode),
}

impl ViewState {
    pub fn mode(self) -> DisplayMode {
        match self {
            ViewState::Default => DisplayMode::Default,
            ViewState::Loading(m) | ViewState::Ready(m) | ViewState::Failed(m) => m,
        }
    }
}

impl fmt::Display for ViewState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ViewState::Default => f.write_str("default"),
            ViewState::Loading(m) => write!(f, "{m}(loading)"),
            ViewState::Ready(m) => write!(f, "{m}(ready)"),
            ViewState::Failed(m) => write!(f, "{m}(failed)"),
        }
    }
}

/// Non-blocking notices above the content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Banner {
    Offline,
    Fallback { mode: DisplayMode, renderer: String },
    Crashed { mode: DisplayMode, message: String },
}

impl fmt::Display for Banner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Banner::Offline => {
                f.write_str("You are currently offline. Some features may be unavailable.")
            }
            Banner::Fallback { mode, renderer } => write!(
                f,
                "{} is running in a simplified view ({renderer}).",
                mode.label()
            ),
            Banner::Crashed { mode, message } => write!(
                f,
                "Something went wrong in {}: {message}. Showing the default view instead.",
                mode.label()
            ),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectorOption {
    pub mode: DisplayMode,
    pub selected: bool,
    pub enabled: bool,
    /// Hardware advertises this mode.
    pub detected: bool,
}

impl fmt::Display for SelectorOption {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mark = if self.selected { "(•)" } else { "( )" };
        write!(f, "{mark} {}", self.mode.label())?;
        if !self.enabled {
            f.write_str(" (Offline)")?;
        } else if !self.detected {
            f.write_str(" (not detected)")?;
        }
        Ok(())
    }
}

/// Everything the host needs to draw.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Screen {
    pub state: ViewState,
    pub selector: Vec<SelectorOption>,
    pub banners: Vec<Banner>,
    pub body: Frame,
}

impl fmt::Display for Screen {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for banner in &self.banners {
            writeln!(f, "[!] {banner}")?;
        }
        let options: Vec<String> = self.selector.iter().map(|o| o.to_string()).collect();
        writeln!(f, "Mode: {}", options.join("  "))?;
        writeln!(f, "{}", "─".repeat(40))?;
        write!(f, "{}", self.body)
    }
}

struct Mounted {
    mode: DisplayMode,
    renderer: String,
    view: Box<dyn View>,
}

pub struct ModeSwitcher {
    prober: CapabilityProber,
    loader: Arc<RendererLoader>,
    default_renderer: Arc<dyn Renderer>,
    snapshot: CapabilitySnapshot,
    pinned: Option<DisplayMode>,
    state: ViewState,
    handles: HashMap<DisplayMode, RendererHandle>,
    in_flight: HashMap<DisplayMode, u64>,
    awaiting: Option<(DisplayMode, u64)>,
    next_token: u64,
    loads_issued: u64,
    content: ContentPayload,
    content_key: ContentKey,
    mounted: Option<Mounted>,
    crash: Option<Banner>,
    tx: mpsc::UnboundedSender<SwitcherEvent>,
    rx: mpsc::UnboundedReceiver<SwitcherEvent>,
}

impl fmt::Debug for ModeSwitcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ModeSwitcher")
            .field("state", &self.state)
            .field("pinned", &self.pinned)
            .field("snapshot", &self.snapshot)
            .field("content_key", &self.content_key)
            .finish()
    }
}

impl ModeSwitcher {
    /// Probe once and mount the default view.
    pub fn new(prober: CapabilityProber, loader: Arc<RendererLoader>, content: ContentPayload) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        let snapshot = prober.probe();
        let mut switcher = Self {
            prober,
            loader,
            default_renderer: Arc::new(CardRenderer::new()),
            snapshot,
            pinned: None,
            state: ViewState::Default,
            handles: HashMap::new(),
            in_flight: HashMap::new(),
            awaiting: None,
            next_token: 1,
            loads_issued: 0,
            content,
            content_key: ContentKey::default(),
            mounted: None,
            crash: None,
            tx,
            rx,
        };
        switcher.mount_default();
        switcher
    }

    /// Use a different default-mode view than the plain card.
    pub fn with_default_renderer(mut self, renderer: Arc<dyn Renderer>) -> Self {
        self.default_renderer = renderer;
        if self.state == ViewState::Default {
            self.mount_default();
        }
        self
    }

    pub fn handle(&self) -> SwitcherHandle {
        SwitcherHandle {
            tx: self.tx.clone(),
        }
    }

    /// Move to the best mode for the startup snapshot.
    pub fn auto_select(&mut self) {
        let mode = resolver::resolve(&self.snapshot, self.pinned);
        info!(%mode, snapshot = ?self.snapshot, "startup resolution");
        self.transition(mode);
    }

    pub fn state(&self) -> ViewState {
        self.state
    }

    pub fn mode(&self) -> DisplayMode {
        self.state.mode()
    }

    pub fn snapshot(&self) -> &CapabilitySnapshot {
        &self.snapshot
    }

    pub fn pinned(&self) -> Option<DisplayMode> {
        self.pinned
    }

    pub fn content(&self) -> &ContentPayload {
        &self.content
    }

    pub fn content_key(&self) -> ContentKey {
        self.content_key
    }

    /// Load requests issued so far.
    pub fn loads_issued(&self) -> u64 {
        self.loads_issued
    }

    pub fn handle_phase(&self, mode: DisplayMode) -> HandlePhase {
        self.handles
            .get(&mode)
            .map(RendererHandle::phase)
            .unwrap_or(HandlePhase::Unloaded)
    }

    pub fn renderer_handle(&self, mode: DisplayMode) -> Option<&RendererHandle> {
        self.handles.get(&mode)
    }

    /// Key the mounted view was built with.
    pub fn mounted_key(&self) -> Option<ContentKey> {
        self.mounted.as_ref().map(|m| m.view.key())
    }

    /// Wait for the next event and apply it. `None` on shutdown, otherwise
    /// whether the screen changed.
    pub async fn step(&mut self) -> Option<bool> {
        match self.rx.recv().await? {
            SwitcherEvent::Shutdown => None,
            event => Some(self.dispatch(event)),
        }
    }

    /// Apply one event. Returns true if the screen changed.
    pub fn dispatch(&mut self, event: SwitcherEvent) -> bool {
        let before = self.state;
        let redraw = match event {
            SwitcherEvent::Select(mode) => {
                if !resolver::admissible(&self.snapshot).contains(mode) {
                    warn!(%mode, "selection ignored, mode unavailable");
                    return false;
                }
                self.crash = None;
                self.pinned = Some(mode);
                self.transition(mode);
                true
            }
            SwitcherEvent::ClearOverride => {
                self.crash = None;
                self.pinned = None;
                let mode = resolver::resolve(&self.snapshot, None);
                if mode != self.mode() {
                    self.transition(mode);
                }
                true
            }
            SwitcherEvent::ConnectivityChanged => {
                self.snapshot = self.prober.probe();
                if self.pinned.is_none() {
                    let mode = resolver::resolve(&self.snapshot, None);
                    if mode != self.mode() {
                        info!(from = %self.state, to = %mode, "connectivity re-resolution");
                        self.transition(mode);
                    }
                }
                true
            }
            SwitcherEvent::ContentVariantChanged(variant) => {
                self.content.set_variant(variant.map(Arc::from));
                self.content_key = self.content_key.next();
                debug!(key = %self.content_key, variant = ?self.content.variant(), "content variant changed");
                self.remount();
                true
            }
            SwitcherEvent::Retry => match self.state {
                ViewState::Failed(mode) => {
                    self.request_load(mode);
                    true
                }
                _ => false,
            },
            SwitcherEvent::ReturnToDefault => {
                self.crash = None;
                self.pinned = Some(DisplayMode::Default);
                self.transition(DisplayMode::Default);
                true
            }
            SwitcherEvent::Advance => self.advance(),
            SwitcherEvent::LoadSettled {
                token,
                mode,
                outcome,
            } => self.settle(token, mode, outcome),
            SwitcherEvent::Shutdown => false,
        };
        if before != self.state {
            info!(from = %before, to = %self.state, "view state changed");
        }
        redraw
    }

    /// Compose the current screen. Errors from the active view are caught
    /// here and force the default view.
    pub fn render(&mut self) -> Screen {
        let body = match self.state {
            ViewState::Default | ViewState::Ready(_) => self.render_mounted(),
            ViewState::Loading(_) => Frame::loading(self.content_key),
            ViewState::Failed(mode) => self
                .handles
                .get(&mode)
                .and_then(RendererHandle::error_view)
                .map(|view| view.frame(self.content_key))
                .unwrap_or_else(|| Frame::loading(self.content_key)),
        };

        Screen {
            state: self.state,
            selector: self.selector(),
            banners: self.banners(),
            body,
        }
    }

    pub fn selector(&self) -> Vec<SelectorOption> {
        let enabled = resolver::admissible(&self.snapshot);
        DisplayMode::ALL
            .into_iter()
            .map(|mode| SelectorOption {
                mode,
                selected: mode == self.mode(),
                enabled: enabled.contains(mode),
                detected: resolver::detected(&self.snapshot, mode),
            })
            .collect()
    }

    pub fn banners(&self) -> Vec<Banner> {
        let mut banners = Vec::new();
        if !self.snapshot.online {
            banners.push(Banner::Offline);
        }
        if let ViewState::Ready(mode) = self.state
            && let Some(renderer) = self.handles.get(&mode).and_then(RendererHandle::fallback)
        {
            banners.push(Banner::Fallback {
                mode,
                renderer: renderer.to_string(),
            });
        }
        if let Some(crash) = &self.crash {
            banners.push(crash.clone());
        }
        banners
    }

    fn transition(&mut self, mode: DisplayMode) {
        self.awaiting = None;
        self.mounted = None;

        if mode == DisplayMode::Default {
            self.state = ViewState::Default;
            self.mount_default();
            return;
        }

        let handle = self
            .handles
            .entry(mode)
            .or_insert_with(|| RendererHandle::new(mode));

        match handle.phase() {
            HandlePhase::Ready => {
                self.state = ViewState::Ready(mode);
                self.mount_active(mode);
            }
            HandlePhase::Loading => {
                // Reuse the load already in flight.
                self.state = ViewState::Loading(mode);
                self.awaiting = self.in_flight.get(&mode).map(|token| (mode, *token));
            }
            HandlePhase::Unloaded | HandlePhase::Failed => self.request_load(mode),
        }
    }

    fn request_load(&mut self, mode: DisplayMode) {
        let handle = self
            .handles
            .entry(mode)
            .or_insert_with(|| RendererHandle::new(mode));
        if let Err(e) = handle.begin_loading() {
            warn!(error = %e, "load request skipped");
            return;
        }

        let token = self.next_token;
        self.next_token += 1;
        self.loads_issued += 1;
        self.in_flight.insert(mode, token);
        self.awaiting = Some((mode, token));
        self.state = ViewState::Loading(mode);
        debug!(%mode, token, "renderer load requested");

        let loader = self.loader.clone();
        let tx = self.tx.clone();
        tokio::spawn(async move {
            // Always settle, even if the load task itself dies.
            let outcome = match tokio::spawn(async move { loader.fetch(mode).await }).await {
                Ok(outcome) => outcome,
                Err(e) => Err(LoadError::Exhausted {
                    mode,
                    last: format!("renderer load aborted: {e}"),
                }),
            };
            let _ = tx.send(SwitcherEvent::LoadSettled {
                token,
                mode,
                outcome,
            });
        });
    }

    fn settle(&mut self, token: u64, mode: DisplayMode, outcome: LoadOutcome) -> bool {
        if self.in_flight.get(&mode) != Some(&token) {
            debug!(%mode, token, "superseded load result dropped");
            return false;
        }
        self.in_flight.remove(&mode);

        if let Some(handle) = self.handles.get_mut(&mode)
            && let Err(e) = handle.settle(outcome)
        {
            warn!(error = %e, "load result rejected");
            return false;
        }

        if self.awaiting != Some((mode, token)) {
            debug!(%mode, token, active = %self.state, "stale load completion, active view unchanged");
            return false;
        }
        self.awaiting = None;

        match self.handle_phase(mode) {
            HandlePhase::Ready => {
                self.state = ViewState::Ready(mode);
                self.mount_active(mode);
            }
            _ => self.state = ViewState::Failed(mode),
        }
        true
    }

    fn mount_default(&mut self) {
        let renderer = self.default_renderer.clone();
        match guarded(renderer.name(), || renderer.mount(&self.content, self.content_key)) {
            Ok(view) => {
                self.mounted = Some(Mounted {
                    mode: DisplayMode::Default,
                    renderer: renderer.name().to_string(),
                    view,
                })
            }
            Err(e) => {
                error!(error = %e, "default view failed to mount");
                self.mounted = None;
            }
        }
    }

    fn mount_active(&mut self, mode: DisplayMode) {
        let Some(renderer) = self.handles.get(&mode).and_then(RendererHandle::renderer) else {
            return;
        };
        match guarded(renderer.name(), || renderer.mount(&self.content, self.content_key)) {
            Ok(view) => {
                self.mounted = Some(Mounted {
                    mode,
                    renderer: renderer.name().to_string(),
                    view,
                })
            }
            Err(e) => self.crash_to_default(mode, e),
        }
    }

    fn remount(&mut self) {
        match self.state {
            ViewState::Default => self.mount_default(),
            ViewState::Ready(mode) => self.mount_active(mode),
            ViewState::Loading(_) | ViewState::Failed(_) => {}
        }
    }

    fn advance(&mut self) -> bool {
        let Some(mounted) = self.mounted.as_mut() else {
            return false;
        };
        let mode = mounted.mode;
        let view = &mut mounted.view;
        match guarded(&mounted.renderer, || view.advance()) {
            Ok(changed) => changed,
            Err(e) => {
                self.crash_to_default(mode, e);
                true
            }
        }
    }

    fn render_mounted(&mut self) -> Frame {
        let Some(mounted) = self.mounted.as_mut() else {
            return Frame::new("empty", self.content_key);
        };
        let mode = mounted.mode;
        let view = &mut mounted.view;
        match guarded(&mounted.renderer, || view.render()) {
            Ok(frame) => frame,
            Err(e) if mode != DisplayMode::Default => {
                self.crash_to_default(mode, e);
                self.render_mounted()
            }
            Err(e) => {
                error!(error = %e, "default view failed to render");
                self.mounted = None;
                Frame::new("empty", self.content_key)
            }
        }
    }

    fn crash_to_default(&mut self, mode: DisplayMode, e: RenderError) {
        error!(%mode, error = %e, "view crashed, returning to default");
        self.crash = Some(Banner::Crashed {
            mode,
            message: e.to_string(),
        });
        self.pinned = Some(DisplayMode::Default);
        self.awaiting = None;
        self.state = ViewState::Default;
        self.mount_default();
    }
}

/// Run view code, turning panics into `RenderError::Panic`.
fn guarded<T>(view: &str, f: impl FnOnce() -> Result<T, RenderError>) -> Result<T, RenderError> {
    match panic::catch_unwind(AssertUnwindSafe(f)) {
        Ok(result) => result,
        Err(payload) => Err(RenderError::Panic {
            view: view.to_string(),
            message: panic_message(&*payload),
        }),
    }
}
