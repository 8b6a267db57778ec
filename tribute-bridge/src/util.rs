use tracing_subscriber::EnvFilter;
use tribute_core::panic_message;

/// Logs go to stderr so they never interleave with the rendered screen.
pub fn init_tracing(verbose: bool) {
    // RUST_LOG=tribute_core=debug,tribute_io=debug
    let fallback = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_line_number(true)
        .compact()
        .try_init();
}

/// Log every panic through tracing, tagged with the thread it hit.
///
/// Panics in views and renderer loads are caught by the switcher after this
/// hook runs, so an error here does not mean the viewer went down. Look for
/// the switcher's "view crashed" or "renderer load failed" line that follows.
pub fn install_panic_hook() {
    std::panic::set_hook(Box::new(|info| {
        let payload = panic_message(info.payload());
        let location = info
            .location()
            .map(|l| format!("{}:{}", l.file(), l.line()))
            .unwrap_or_else(|| "<unknown>".to_string());
        let thread = std::thread::current();
        let thread = thread.name().unwrap_or("<unnamed>");

        tracing::error!(%location, %payload, thread, "panic");
    }));
}
