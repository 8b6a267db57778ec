use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::time::{Instant, MissedTickBehavior};
use tracing::{info, warn};

use tribute_bridge::commands::HELP;
use tribute_bridge::util::{init_tracing, install_panic_hook};
use tribute_bridge::{Command, CommandParser, HostSource, Preset, SAMPLE_CARD};
use tribute_core::registry::builtin_loader;
use tribute_core::{ContentPayload, DisplayMode, ModeSwitcher, SwitcherEvent, TributeConfig};
use tribute_io::{
    CapabilityProber, CapabilitySource, ConnectivityEvent, ConnectivityMonitor, SystemSource,
};

#[derive(Debug, Parser)]
#[command(name = "tribute", version, about = "Show a tribute card in the best display mode for this machine")]
struct Args {
    /// Config file (default: the platform config dir)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Card content to show
    #[arg(long)]
    content: Option<PathBuf>,

    /// Template variant name
    #[arg(long)]
    variant: Option<String>,

    /// Pin a mode instead of auto-selecting
    #[arg(long)]
    mode: Option<DisplayMode>,

    /// Use a canned machine instead of probing this one
    #[arg(long, value_enum)]
    simulate: Option<Preset>,

    /// Start with connectivity forced off
    #[arg(long)]
    offline: bool,

    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    init_tracing(args.verbose);
    install_panic_hook();

    let config = TributeConfig::load_or_default(args.config.as_deref())?;

    let body = match &args.content {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read content from {}", path.display()))?,
        None => SAMPLE_CARD.to_string(),
    };
    let mut content = ContentPayload::new(body);
    if let Some(variant) = &args.variant {
        content = content.with_variant(variant.as_str());
    }

    let inner: Arc<dyn CapabilitySource> = match args.simulate {
        Some(preset) => Arc::new(preset.source()),
        None => Arc::new(SystemSource::new().with_viewport_width(config.display.viewport_width)),
    };
    let host = Arc::new(HostSource::new(inner));
    host.force_offline(args.offline);

    let prober = CapabilityProber::new(host.clone()).with_thresholds(config.thresholds());
    let loader = Arc::new(builtin_loader(&config, host.clone()));
    let mut switcher = ModeSwitcher::new(prober, loader, content);

    match args.mode {
        Some(mode) => {
            if !switcher.dispatch(SwitcherEvent::Select(mode)) {
                warn!(%mode, "requested mode unavailable, staying on default");
            }
        }
        None if config.switcher.auto_select => switcher.auto_select(),
        None => {}
    }
    println!("{}", switcher.render());

    let (monitor, mut changes) = ConnectivityMonitor::start(host.clone(), config.connectivity_poll());
    let period = config.slide_interval();
    let mut slides = tokio::time::interval_at(Instant::now() + period, period);
    slides.set_missed_tick_behavior(MissedTickBehavior::Skip);
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    loop {
        tokio::select! {
            step = switcher.step() => match step {
                Some(true) => println!("{}", switcher.render()),
                Some(false) => {}
                None => break,
            },
            Some(ConnectivityEvent::Changed { online }) = changes.recv() => {
                info!(online, "connectivity event");
                if switcher.dispatch(SwitcherEvent::ConnectivityChanged) {
                    println!("{}", switcher.render());
                }
            }
            _ = slides.tick() => {
                if switcher.dispatch(SwitcherEvent::Advance) {
                    println!("{}", switcher.render());
                }
            }
            line = lines.next_line() => {
                let Some(line) = line.context("Failed to read stdin")? else {
                    break;
                };
                if !apply(&mut switcher, &host, CommandParser::parse(&line))? {
                    break;
                }
            }
            _ = tokio::signal::ctrl_c() => break,
        }
    }

    if let Err(e) = monitor.stop().await {
        warn!(error = %e, "monitor shutdown");
    }
    info!("bye");
    Ok(())
}

/// Run one console command. `Ok(false)` means quit.
fn apply(switcher: &mut ModeSwitcher, host: &HostSource, command: Command) -> anyhow::Result<bool> {
    let redraw = match command {
        Command::Mode(mode) => {
            let changed = switcher.dispatch(SwitcherEvent::Select(mode));
            if !changed {
                println!("{} is not available right now.", mode.label());
            }
            changed
        }
        Command::Auto => switcher.dispatch(SwitcherEvent::ClearOverride),
        Command::Variant(variant) => switcher.dispatch(SwitcherEvent::ContentVariantChanged(variant)),
        Command::Online => {
            host.force_offline(false);
            switcher.dispatch(SwitcherEvent::ConnectivityChanged)
        }
        Command::Offline => {
            host.force_offline(true);
            switcher.dispatch(SwitcherEvent::ConnectivityChanged)
        }
        Command::Retry => switcher.dispatch(SwitcherEvent::Retry),
        Command::Reset => switcher.dispatch(SwitcherEvent::ReturnToDefault),
        Command::Next => switcher.dispatch(SwitcherEvent::Advance),
        Command::Show => true,
        Command::Caps => {
            let caps = serde_json::to_string_pretty(switcher.snapshot())
                .context("Failed to serialize capability snapshot")?;
            println!("{caps}");
            false
        }
        Command::Help => {
            println!("{HELP}");
            false
        }
        Command::Quit => return Ok(false),
        Command::Empty => false,
        Command::Invalid(message) => {
            println!("{message}");
            false
        }
        Command::Unknown(input) => {
            println!("Unknown command: {input} (try `help`)");
            false
        }
    };
    if redraw {
        println!("{}", switcher.render());
    }
    Ok(true)
}
