//! Parcel Tracker CLI Application
//!
//! This is the command-line front end for the parcel-tracker library.
//! It uses the library for all tracking logic and adds:
//! - Configuration file and command-line handling
//! - Terminal rendering of status, timeline and route map
//! - Notification delivery (toast, bell, terminal system notification)
//! - Theme preference and shareable links
//! - Interactive switching of the tracked number from stdin

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use parcel_tracker::{
    Clock, DriverCommand, FileStore, PollingDriver, RouteCatalog, SystemClock, Tracker,
    TrackerError, TrackingUpdate,
};
use std::io::IsTerminal;
use std::path::{Path, PathBuf};
use tokio::sync::{mpsc, watch};

mod config;
mod input;
mod link;
mod notify;
mod report;
mod state;

use config::AppConfig;
use notify::{toast, TerminalNotifier};
use report::Renderer;

/// Parcel Tracker - Follow simulated parcel shipments in the terminal
#[derive(Parser, Debug)]
#[command(name = "parcel-tracker-cli")]
#[command(about = "Track simulated parcel shipments in real time", long_about = None)]
#[command(version)]
struct Args {
    /// Tracking number to follow (case-insensitive)
    #[arg(short, long, value_name = "TN")]
    track: Option<String>,

    /// Shareable link to resume from (reads its ?tn= parameter)
    #[arg(long, value_name = "URL")]
    link: Option<String>,

    /// Path to configuration file (config.toml)
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Path to the state file (overrides the configuration)
    #[arg(long, value_name = "FILE")]
    store: Option<PathBuf>,

    /// Seconds between status refreshes (overrides the configuration)
    #[arg(long, value_name = "SECS")]
    interval: Option<u64>,

    /// Print the current status once and exit
    #[arg(long)]
    once: bool,

    /// List the sample tracking numbers and exit
    #[arg(long)]
    list: bool,

    /// Switch between light and dark theme
    #[arg(long)]
    toggle_theme: bool,

    /// Allow or block terminal system notifications
    #[arg(long, value_enum, value_name = "SWITCH")]
    notifications: Option<Switch>,

    /// Verbosity level (can be repeated: -v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long)]
    quiet: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Switch {
    On,
    Off,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    // Parse command line arguments
    let args = Args::parse();

    // Initialize logging
    init_logging(args.verbose, args.quiet);

    log::info!("Parcel Tracker CLI v{}", env!("CARGO_PKG_VERSION"));
    log::info!("Using tracker library v{}", parcel_tracker::VERSION);

    let mut app_config = match &args.config {
        Some(path) => {
            log::info!("Loading configuration from: {:?}", path);
            config::load_config(path)?
        }
        None => AppConfig::default(),
    };
    if let Some(path) = &args.store {
        app_config.store.path = path.clone();
    }
    if let Some(secs) = args.interval {
        app_config.tracker.poll_interval_secs = secs;
    }

    let catalog = app_config.build_catalog()?;

    if args.list {
        list_mode(&catalog);
        return Ok(());
    }

    let mut store = open_store(&app_config.store.path)
        .with_context(|| format!("Failed to open state file: {:?}", app_config.store.path))?;

    if args.toggle_theme {
        let theme = state::toggle_theme(&mut store)?;
        toast(&format!("Theme: {}", theme));
    }

    let terminal = std::io::stderr().is_terminal();
    if let Some(switch) = args.notifications {
        let result = notify::request_permission(&mut store, switch == Switch::On, terminal);
        if let Err(e) = &result {
            log::debug!("Notification permission: {}", e);
        }
        toast(notify::permission_message(&result));
    }

    let theme = state::load_theme(&store);
    let renderer = Renderer::new(theme, app_config.display.color && std::io::stdout().is_terminal());
    let notifier = TerminalNotifier::new(
        app_config.display.bell,
        state::load_permission(&store),
        terminal,
    );

    let tracker = Tracker::new(catalog.clone(), store, &app_config.tracker);
    let tracking_number = initial_tracking_number(&args, &tracker, &app_config);

    if args.once {
        once_mode(tracker, &tracking_number, &renderer, &notifier, &app_config)
    } else {
        watch_mode(tracker, catalog, tracking_number, renderer, notifier, app_config).await
    }
}

/// Open the state file, moving an unreadable one aside and starting empty
fn open_store(path: &Path) -> parcel_tracker::Result<FileStore> {
    match FileStore::open(path) {
        Err(TrackerError::Store(reason)) => {
            let mut backup = path.as_os_str().to_owned();
            backup.push(".corrupt");
            let backup = PathBuf::from(backup);
            log::warn!("{}; moving it to {:?} and starting fresh", reason, backup);
            std::fs::rename(path, &backup)?;
            FileStore::open(path)
        }
        result => result,
    }
}

/// Pick the tracking number to start with: `--track`, then `--link`, then
/// the configured default
fn initial_tracking_number(args: &Args, tracker: &Tracker<FileStore>, app_config: &AppConfig) -> String {
    let fallback = app_config.tracker.default_tracking_number.as_str();

    if let Some(raw) = &args.track {
        match input::parse_tracking_input(raw, tracker.catalog()) {
            Ok(tracking_number) => return tracking_number,
            Err(e) => toast(&e.to_string()),
        }
    }

    let from_link = args.link.as_deref().and_then(link::tracking_from_link);
    tracker
        .resolve_tracking_number(from_link.as_deref(), fallback)
        .to_string()
}

/// List mode - print the known tracking numbers
fn list_mode(catalog: &RouteCatalog) {
    println!("Sample tracking numbers:");
    for tracking_number in catalog.tracking_numbers() {
        if let Some(route) = catalog.get(tracking_number) {
            println!("  {}  {}", tracking_number, route.carrier());
        }
    }
}

/// Once mode - evaluate, render and exit
fn once_mode(
    mut tracker: Tracker<FileStore>,
    tracking_number: &str,
    renderer: &Renderer,
    notifier: &TerminalNotifier,
    app_config: &AppConfig,
) -> Result<()> {
    let update = tracker
        .evaluate(tracking_number, SystemClock.now_millis())
        .with_context(|| format!("Failed to evaluate {}", tracking_number))?;
    show_update(&update, renderer, notifier, app_config);
    Ok(())
}

fn show_update(
    update: &TrackingUpdate,
    renderer: &Renderer,
    notifier: &TerminalNotifier,
    app_config: &AppConfig,
) {
    let share = link::share_link(
        &app_config.display.share_base_url,
        &update.session.tracking_number,
    );
    print!("{}", renderer.render(&update.view, &share));

    if let Some(notification) = update
        .transition
        .as_ref()
        .and_then(|t| t.notification.as_ref())
    {
        notifier.deliver(notification);
    }
}

/// Watch mode - poll the tracked number until interrupted
async fn watch_mode(
    tracker: Tracker<FileStore>,
    catalog: RouteCatalog,
    tracking_number: String,
    renderer: Renderer,
    notifier: TerminalNotifier,
    app_config: AppConfig,
) -> Result<()> {
    let (driver, outputs) = PollingDriver::new(tracker, SystemClock, &app_config.tracker);
    let (commands_tx, commands_rx) = mpsc::channel(16);

    commands_tx
        .send(DriverCommand::Track(tracking_number))
        .await
        .context("Polling driver stopped before start")?;

    println!("Type a tracking number to switch parcels, or 'quit' to exit.");
    spawn_input_reader(catalog, commands_tx.clone());

    let interrupt_tx = commands_tx.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            let _ = interrupt_tx.send(DriverCommand::Shutdown).await;
        }
    });
    drop(commands_tx);

    let share_base = app_config.display.share_base_url.clone();
    let render_task = tokio::spawn(render_updates(outputs.updates, renderer, share_base));
    let notify_task = tokio::spawn(deliver_notifications(outputs.notifications, notifier));

    let driver = driver.run(commands_rx).await;
    log::debug!("Driver stopped (idle: {})", driver.is_idle());

    render_task.abort();
    notify_task.abort();
    Ok(())
}

async fn render_updates(
    mut updates: watch::Receiver<Option<TrackingUpdate>>,
    renderer: Renderer,
    share_base: String,
) {
    while updates.changed().await.is_ok() {
        let update = updates.borrow_and_update().clone();
        if let Some(update) = update {
            let share = link::share_link(&share_base, &update.session.tracking_number);
            print!("{}", renderer.render(&update.view, &share));
        }
    }
}

async fn deliver_notifications(
    mut notifications: mpsc::UnboundedReceiver<parcel_tracker::StatusNotification>,
    notifier: TerminalNotifier,
) {
    while let Some(notification) = notifications.recv().await {
        notifier.deliver(&notification);
    }
}

/// Read tracking numbers from stdin on a plain thread so a pending read never
/// holds up runtime shutdown
fn spawn_input_reader(catalog: RouteCatalog, commands: mpsc::Sender<DriverCommand>) {
    std::thread::spawn(move || {
        for line in std::io::stdin().lines() {
            let Ok(line) = line else { break };
            let command = match line.trim().to_lowercase().as_str() {
                "quit" | "exit" => DriverCommand::Shutdown,
                "stop" => DriverCommand::Stop,
                _ => match input::parse_tracking_input(&line, &catalog) {
                    Ok(tracking_number) => DriverCommand::Track(tracking_number),
                    Err(e) => {
                        toast(&e.to_string());
                        continue;
                    }
                },
            };
            let shutdown = command == DriverCommand::Shutdown;
            if commands.blocking_send(command).is_err() || shutdown {
                break;
            }
        }
    });
}

/// Initialize logging based on verbosity level
fn init_logging(verbose: u8, quiet: bool) {
    use env_logger::Builder;
    use log::LevelFilter;
    use std::io::Write;

    let level = if quiet {
        LevelFilter::Error
    } else {
        match verbose {
            0 => LevelFilter::Warn,
            1 => LevelFilter::Info,
            2 => LevelFilter::Debug,
            _ => LevelFilter::Trace,
        }
    };

    Builder::new()
        .filter_level(level)
        .format(|buf, record| {
            writeln!(
                buf,
                "[{} {}] {}",
                record.level(),
                record.target(),
                record.args()
            )
        })
        .init();
}
