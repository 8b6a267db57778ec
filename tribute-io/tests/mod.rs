use std::fs;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use tribute_io::system::parse_mode_width;
use tribute_io::{
    CapabilityProber, CapabilitySnapshot, CapabilitySource, ConnectivityEvent,
    ConnectivityMonitor, ProbeError, ScreenWidthClass, StaticSource, SystemSource,
    WidthThresholds,
};

/// A platform with none of the capability APIs.
struct BareSource;

impl CapabilitySource for BareSource {
    fn name(&self) -> &str {
        "bare"
    }
}

/// A platform where the GPU query blows up but everything else answers.
struct BrokenGpuSource;

impl CapabilitySource for BrokenGpuSource {
    fn name(&self) -> &str {
        "broken-gpu"
    }

    fn headset_supported(&self) -> Result<bool, ProbeError> {
        Ok(true)
    }

    fn gpu_accelerated(&self) -> Result<bool, ProbeError> {
        Err(ProbeError::Io(std::io::Error::other("driver crashed")))
    }

    fn viewport_width(&self) -> Result<u32, ProbeError> {
        Ok(3840)
    }

    fn online(&self) -> Result<bool, ProbeError> {
        Ok(true)
    }
}

fn write(root: &Path, relative: &str, content: &str) {
    let path = root.join(relative);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, content).unwrap();
}

// ============================================================================
// Width Classification Tests
// ============================================================================

#[test]
fn test_classify_breakpoints() {
    let t = WidthThresholds::default();
    assert_eq!(t.classify(375), ScreenWidthClass::Compact);
    assert_eq!(t.classify(767), ScreenWidthClass::Compact);
    assert_eq!(t.classify(768), ScreenWidthClass::Standard);
    assert_eq!(t.classify(1279), ScreenWidthClass::Standard);
    assert_eq!(t.classify(1280), ScreenWidthClass::Wide);
    assert_eq!(t.classify(3840), ScreenWidthClass::Wide);
}

#[test]
fn test_classify_custom_thresholds() {
    let t = WidthThresholds {
        compact_below: 600,
        wide_from: 1920,
    };
    assert_eq!(t.classify(700), ScreenWidthClass::Standard);
    assert_eq!(t.classify(1600), ScreenWidthClass::Standard);
    assert_eq!(t.classify(1920), ScreenWidthClass::Wide);
}

// ============================================================================
// CapabilitySnapshot Tests
// ============================================================================

#[test]
fn test_snapshot_fallback_is_all_safe_defaults() {
    let snap = CapabilitySnapshot::fallback();
    assert!(!snap.headset_supported);
    assert!(!snap.gpu_accelerated);
    assert_eq!(snap.screen_width_class, ScreenWidthClass::Standard);
    assert!(!snap.online);
    assert!(!snap.orientation_sensor);
}

#[test]
fn test_snapshot_immersive_needs_headset_and_gpu() {
    let mut snap = CapabilitySnapshot::fallback();
    snap.headset_supported = true;
    assert!(!snap.immersive_ready());
    snap.gpu_accelerated = true;
    assert!(snap.immersive_ready());
}

#[test]
fn test_snapshot_serializes_width_class_lowercase() {
    let snap = CapabilitySnapshot {
        screen_width_class: ScreenWidthClass::Wide,
        ..CapabilitySnapshot::fallback()
    };
    let json = serde_json::to_string(&snap).unwrap();
    assert!(json.contains("\"screen_width_class\":\"wide\""));
    let back: CapabilitySnapshot = serde_json::from_str(&json).unwrap();
    assert_eq!(back, snap);
}

// ============================================================================
// CapabilityProber Tests
// ============================================================================

#[test]
fn test_probe_static_source() {
    let source = StaticSource::new()
        .with_headset(true)
        .with_gpu(true)
        .with_viewport_width(1920)
        .with_orientation(false)
        .with_online(true);
    let snap = CapabilityProber::new(Arc::new(source)).probe();

    assert!(snap.headset_supported);
    assert!(snap.gpu_accelerated);
    assert_eq!(snap.screen_width_class, ScreenWidthClass::Wide);
    assert!(snap.online);
    assert!(!snap.orientation_sensor);
}

#[test]
fn test_probe_missing_apis_yield_fallback() {
    let snap = CapabilityProber::new(Arc::new(BareSource)).probe();
    assert_eq!(snap, CapabilitySnapshot::fallback());
}

#[test]
fn test_probe_single_failure_defaults_only_that_check() {
    let snap = CapabilityProber::new(Arc::new(BrokenGpuSource)).probe();
    assert!(snap.headset_supported);
    assert!(!snap.gpu_accelerated);
    assert_eq!(snap.screen_width_class, ScreenWidthClass::Wide);
    assert!(snap.online);
}

#[test]
fn test_probe_uses_custom_thresholds() {
    let source = StaticSource::new().with_viewport_width(1400);
    let prober = CapabilityProber::new(Arc::new(source)).with_thresholds(WidthThresholds {
        compact_below: 768,
        wide_from: 1600,
    });
    assert_eq!(prober.probe().screen_width_class, ScreenWidthClass::Standard);
}

#[test]
fn test_reprobe_sees_connectivity_flip() {
    let source = Arc::new(StaticSource::new().with_online(true));
    let prober = CapabilityProber::new(source.clone());
    assert!(prober.probe().online);

    source.set_online(false);
    assert!(!prober.probe().online);
}

// ============================================================================
// SystemSource Tests
// ============================================================================

#[test]
fn test_system_source_empty_tree() {
    let root = tempfile::tempdir().unwrap();
    let source = SystemSource::with_root(root.path());

    assert!(!source.headset_supported().unwrap());
    assert!(!source.gpu_accelerated().unwrap());
    assert!(source.viewport_width().is_err());
    assert!(source.online().is_err());
    assert!(source.orientation_sensor().is_err());

    // A bare host still probes cleanly.
    let snap = CapabilityProber::new(Arc::new(source)).probe();
    assert_eq!(snap, CapabilitySnapshot::fallback());
}

#[test]
fn test_system_source_full_tree() {
    let root = tempfile::tempdir().unwrap();
    let r = root.path();
    write(r, "etc/xdg/openxr/1/active_runtime.json", "{}");
    write(r, "dev/dri/renderD128", "");
    write(r, "dev/dri/card0", "");
    write(r, "sys/class/drm/card0-DP-1/status", "disconnected\n");
    write(r, "sys/class/drm/card0-HDMI-A-1/status", "connected\n");
    write(r, "sys/class/drm/card0-HDMI-A-1/modes", "3840x2160\n1920x1080\n");
    write(r, "sys/class/net/lo/operstate", "unknown\n");
    write(r, "sys/class/net/eth0/operstate", "up\n");
    write(r, "sys/bus/iio/devices/iio:device0/in_accel_x_raw", "12\n");

    let source = SystemSource::with_root(r);
    assert!(source.headset_supported().unwrap());
    assert!(source.gpu_accelerated().unwrap());
    assert_eq!(source.viewport_width().unwrap(), 3840);
    assert!(source.online().unwrap());
    assert!(source.orientation_sensor().unwrap());
}

#[test]
fn test_system_source_only_loopback_is_offline() {
    let root = tempfile::tempdir().unwrap();
    write(root.path(), "sys/class/net/lo/operstate", "up\n");
    write(root.path(), "sys/class/net/wlan0/operstate", "down\n");

    let source = SystemSource::with_root(root.path());
    assert!(!source.online().unwrap());
}

#[test]
fn test_system_source_viewport_override() {
    let root = tempfile::tempdir().unwrap();
    let source = SystemSource::with_root(root.path()).with_viewport_width(Some(1024));
    assert_eq!(source.viewport_width().unwrap(), 1024);
}

#[test]
fn test_parse_mode_width() {
    assert_eq!(parse_mode_width("1920x1080").unwrap(), 1920);
    assert_eq!(parse_mode_width("1280x720i").unwrap(), 1280);
    assert!(matches!(parse_mode_width("garbage"), Err(ProbeError::Parse(_))));
    assert!(matches!(parse_mode_width("wx1080"), Err(ProbeError::Parse(_))));
}

// ============================================================================
// ConnectivityMonitor Tests
// ============================================================================

#[tokio::test(start_paused = true)]
async fn test_monitor_reports_flip() {
    let source = Arc::new(StaticSource::new().with_online(true));
    let (_monitor, mut rx) = ConnectivityMonitor::start(source.clone(), Duration::from_millis(100));

    // Let the baseline reading happen before flipping.
    tokio::time::sleep(Duration::from_millis(10)).await;
    source.set_online(false);

    let event = rx.recv().await.unwrap();
    assert_eq!(event, ConnectivityEvent::Changed { online: false });
}

#[tokio::test(start_paused = true)]
async fn test_monitor_silent_when_steady() {
    let source = Arc::new(StaticSource::new().with_online(true));
    let (_monitor, mut rx) = ConnectivityMonitor::start(source, Duration::from_millis(100));

    let result = tokio::time::timeout(Duration::from_secs(5), rx.recv()).await;
    assert!(result.is_err(), "no event expected without a flip");
}

#[tokio::test(start_paused = true)]
async fn test_monitor_stop_closes_stream() {
    let source = Arc::new(StaticSource::new().with_online(true));
    let (monitor, mut rx) = ConnectivityMonitor::start(source, Duration::from_millis(100));

    monitor.stop().await.unwrap();
    assert!(rx.recv().await.is_none());
}

#[test]
fn test_monitor_debug() {
    let rt = tokio::runtime::Runtime::new().unwrap();
    let _guard = rt.enter();
    let (monitor, _rx) = ConnectivityMonitor::start(
        Arc::new(StaticSource::new()),
        Duration::from_secs(1),
    );
    assert!(format!("{:?}", monitor).contains("ConnectivityMonitor"));
}
