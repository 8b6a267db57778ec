//! Host capability checks.
//!
//! Everything here is a read of a well-known file or directory. Paths are
//! resolved against a root so the checks can run against a fake tree.

use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::source::{CapabilitySource, ProbeError};

const OPENXR_MANIFEST: &str = "openxr/1/active_runtime.json";

/// Capability source backed by the running Linux host.
#[derive(Debug, Clone)]
pub struct SystemSource {
    root: PathBuf,
    xr_manifests: Vec<PathBuf>,
    viewport_override: Option<u32>,
}

impl Default for SystemSource {
    fn default() -> Self {
        Self::new()
    }
}

impl SystemSource {
    /// Probe the real host, honouring `XR_RUNTIME_JSON` and `XDG_CONFIG_HOME`.
    pub fn new() -> Self {
        let mut xr_manifests = Vec::new();
        if let Ok(path) = std::env::var("XR_RUNTIME_JSON") {
            xr_manifests.push(PathBuf::from(path));
        }
        if let Ok(config_home) = std::env::var("XDG_CONFIG_HOME") {
            xr_manifests.push(Path::new(&config_home).join(OPENXR_MANIFEST));
        } else if let Ok(home) = std::env::var("HOME") {
            xr_manifests.push(Path::new(&home).join(".config").join(OPENXR_MANIFEST));
        }
        xr_manifests.push(Path::new("/etc/xdg").join(OPENXR_MANIFEST));

        Self {
            root: PathBuf::from("/"),
            xr_manifests,
            viewport_override: None,
        }
    }

    /// Probe a filesystem tree rooted at `root` instead of `/`.
    pub fn with_root(root: impl Into<PathBuf>) -> Self {
        let root = root.into();
        let xr_manifests = vec![root.join("etc/xdg").join(OPENXR_MANIFEST)];
        Self {
            root,
            xr_manifests,
            viewport_override: None,
        }
    }

    /// Use a configured width instead of asking the display connectors.
    pub fn with_viewport_width(mut self, width: Option<u32>) -> Self {
        self.viewport_override = width;
        self
    }

    fn path(&self, relative: &str) -> PathBuf {
        self.root.join(relative)
    }
}

impl CapabilitySource for SystemSource {
    fn name(&self) -> &str {
        "system"
    }

    fn headset_supported(&self) -> Result<bool, ProbeError> {
        let found = self.xr_manifests.iter().find(|p| p.is_file());
        if let Some(manifest) = found {
            debug!(manifest = %manifest.display(), "OpenXR runtime found");
        }
        Ok(found.is_some())
    }

    fn gpu_accelerated(&self) -> Result<bool, ProbeError> {
        let dri = self.path("dev/dri");
        if !dri.is_dir() {
            return Ok(false);
        }
        Ok(entry_names(&dri)?
            .iter()
            .any(|name| name.starts_with("renderD")))
    }

    fn viewport_width(&self) -> Result<u32, ProbeError> {
        if let Some(width) = self.viewport_override {
            return Ok(width);
        }

        let drm = self.path("sys/class/drm");
        for connector in entry_names(&drm)? {
            let dir = drm.join(&connector);
            let status = fs::read_to_string(dir.join("status")).unwrap_or_default();
            if status.trim() != "connected" {
                continue;
            }
            let modes = fs::read_to_string(dir.join("modes"))?;
            if let Some(preferred) = modes.lines().next() {
                debug!(connector = %connector, mode = preferred, "display connector");
                return parse_mode_width(preferred);
            }
        }

        Err(ProbeError::NotFound("no connected display".to_string()))
    }

    fn online(&self) -> Result<bool, ProbeError> {
        let net = self.path("sys/class/net");
        for iface in entry_names(&net)? {
            if iface == "lo" {
                continue;
            }
            let state = fs::read_to_string(net.join(&iface).join("operstate")).unwrap_or_default();
            if state.trim() == "up" {
                debug!(iface = %iface, "interface up");
                return Ok(true);
            }
        }
        Ok(false)
    }

    fn orientation_sensor(&self) -> Result<bool, ProbeError> {
        let iio = self.path("sys/bus/iio/devices");
        if !iio.is_dir() {
            return Err(ProbeError::NotFound("iio subsystem".to_string()));
        }
        for device in entry_names(&iio)? {
            let channels = entry_names(&iio.join(device)).unwrap_or_default();
            if channels
                .iter()
                .any(|c| c.starts_with("in_accel_") || c.starts_with("in_anglvel_"))
            {
                return Ok(true);
            }
        }
        Ok(false)
    }
}

/// Sorted entry names of a directory.
fn entry_names(dir: &Path) -> Result<Vec<String>, ProbeError> {
    let mut names: Vec<String> = fs::read_dir(dir)?
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    Ok(names)
}

/// `1920x1080` (optionally with an `i` or refresh suffix) to `1920`.
pub fn parse_mode_width(mode: &str) -> Result<u32, ProbeError> {
    let (width, _) = mode
        .trim()
        .split_once('x')
        .ok_or_else(|| ProbeError::Parse(format!("bad display mode: {mode}")))?;
    width
        .parse()
        .map_err(|_| ProbeError::Parse(format!("bad display width: {width}")))
}
