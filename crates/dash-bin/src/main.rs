//! tiledash entrypoint.
//!
//! Opens the terminal, lays out a small dashboard of gauges next to an event
//! mirror and runs it until the quit key is pressed. A background task feeds
//! the gauges with synthetic readings so the redraw path has something to do.
use anyhow::Result;
use clap::Parser;
use core_config::{Config, KeyBindings, load_from};
use core_container::{
    Container, ContainerOption, SplitPolicy, global_key, place_widget, split_horizontal,
    split_vertical,
};
use core_model::{Color, LineStyle};
use core_runtime::{RunConfig, Shutdown, run};
use core_terminal::{CrosstermDisplay, Display, TerminalOptions};
use core_widget::{KeyScope, MouseScope, WidgetOptions};
use dash_widgets::{Gauge, GaugeOptions, Mirror};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, Once};
use std::time::Duration;
use tokio::time::{self, MissedTickBehavior};
use tracing::{info, warn};
use tracing_appender::non_blocking::WorkerGuard;

const FEED_PERIOD: Duration = Duration::from_millis(200);
const DISK_BLOCKS: i32 = 64;

/// CLI arguments.
#[derive(Parser, Debug)]
#[command(name = "tiledash", version, about = "Terminal dashboard demo")]
struct Args {
    /// Configuration file path (overrides discovery of `tiledash.toml`).
    #[arg(long = "config")]
    config: Option<PathBuf>,
    /// Redraw interval in milliseconds; overrides the configuration file.
    #[arg(long = "redraw-ms")]
    redraw_ms: Option<u64>,
}

#[derive(Clone)]
struct Dashboard {
    cpu: Arc<Gauge>,
    mem: Arc<Gauge>,
    disk: Arc<Gauge>,
    events: Arc<Mirror>,
}

impl Dashboard {
    fn new() -> Result<Self> {
        let events = Mirror::new(WidgetOptions {
            keyboard: KeyScope::Focused,
            mouse: MouseScope::Widget,
            ..WidgetOptions::default()
        });
        Ok(Self {
            cpu: Arc::new(Gauge::new(GaugeOptions::default().threshold(80))?),
            mem: Arc::new(Gauge::new(GaugeOptions::default().color(Color::Blue))?),
            disk: Arc::new(Gauge::new(
                GaugeOptions::default().color(Color::Magenta).label("blocks"),
            )?),
            events: Arc::new(events),
        })
    }

    fn layout(&self, keys: KeyBindings, shutdown: &Shutdown) -> Vec<ContainerOption> {
        let quit = shutdown.clone();
        let gauge = |title: &str, widget: Arc<Gauge>| {
            vec![
                ContainerOption::Id(title.to_string()),
                ContainerOption::Border(LineStyle::Light),
                ContainerOption::BorderTitle(title.to_string()),
                ContainerOption::FocusedColor(Color::Yellow),
                place_widget(widget),
            ]
        };
        vec![
            ContainerOption::Id("root".into()),
            ContainerOption::KeyFocusNext(keys.focus_next),
            ContainerOption::KeyFocusPrevious(keys.focus_previous),
            global_key(keys.quit, move |_| quit.cancel()),
            split_vertical(
                vec![split_horizontal(
                    gauge("cpu", self.cpu.clone()),
                    vec![split_horizontal(
                        gauge("mem", self.mem.clone()),
                        gauge("disk", self.disk.clone()),
                        SplitPolicy::Percent(50),
                    )],
                    SplitPolicy::Percent(33),
                )],
                vec![
                    ContainerOption::Id("events".into()),
                    ContainerOption::Focused,
                    place_widget(self.events.clone()),
                ],
                SplitPolicy::Percent(60),
            ),
        ]
    }

    /// Advance the synthetic readings to step `n`.
    fn step(&self, n: u64) -> Result<()> {
        let wave = |period: u64| (n % period) as i32;
        self.cpu.percent(wave(101))?;
        self.mem.percent(20 + wave(61))?;
        self.disk.absolute(wave(DISK_BLOCKS as u64 + 1), DISK_BLOCKS)?;
        Ok(())
    }
}

async fn feed(dashboard: Dashboard, period: Duration, shutdown: Shutdown) {
    let mut tick = time::interval(period);
    tick.set_missed_tick_behavior(MissedTickBehavior::Delay);
    let mut n = 0u64;
    loop {
        tokio::select! {
            biased;
            _ = shutdown.cancelled() => break,
            _ = tick.tick() => {
                if let Err(e) = dashboard.step(n) {
                    warn!(target: "runtime", error = %e, "feed_update_failed");
                }
                n = n.wrapping_add(1);
            }
        }
    }
}

fn configure_logging(log_path: &Path) -> Option<WorkerGuard> {
    if log_path.exists() {
        let _ = std::fs::remove_file(log_path);
    }
    let dir = match log_path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    let file_name = log_path.file_name()?;

    let file_appender = tracing_appender::rolling::never(dir, file_name);
    let (nb_writer, guard) = tracing_appender::non_blocking(file_appender);
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(nb_writer)
        .with_ansi(false)
        .try_init()
        .ok()
        // Another subscriber is already installed; drop the guard with the writer.
        .map(|_| guard)
}

fn install_panic_hook() {
    static HOOK: Once = Once::new();
    HOOK.call_once(|| {
        let default_panic = std::panic::take_hook();
        std::panic::set_hook(Box::new(move |info| {
            tracing::error!(target: "runtime.panic", ?info, "panic");
            default_panic(info);
        }));
    });
}

async fn run_dashboard(config: &Config) -> Result<()> {
    let mut display = CrosstermDisplay::open(TerminalOptions::default())?;
    let dashboard = Dashboard::new()?;
    let shutdown = Shutdown::new();
    let container = match Container::new(
        &display,
        dashboard.layout(config.key_bindings(), &shutdown),
    ) {
        Ok(c) => Arc::new(Mutex::new(c)),
        Err(e) => {
            display.close()?;
            return Err(e);
        }
    };

    let feeder = tokio::spawn(feed(dashboard, FEED_PERIOD, shutdown.clone()));
    let run_config = RunConfig::new().redraw_interval(config.redraw_interval());
    let result = run(&mut display, container, run_config, shutdown.clone()).await;

    shutdown.cancel();
    let closed = display.close();
    if let Err(e) = feeder.await {
        warn!(target: "runtime", error = %e, "feed_task_failed");
    }
    result?;
    closed
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    let config = load_from(args.config.clone())?.with_redraw_ms(args.redraw_ms);
    let _log_guard = configure_logging(config.log_file());
    install_panic_hook();

    info!(
        target: "runtime.startup",
        config = config.path.as_ref().map(|p| p.display().to_string()).as_deref(),
        redraw_ms = config.redraw_interval().as_millis() as u64,
        "startup"
    );
    let result = run_dashboard(&config).await;
    match &result {
        Ok(()) => info!(target: "runtime", "shutdown"),
        Err(e) => tracing::error!(target: "runtime", error = %e, "exit_with_error"),
    }
    result
}
