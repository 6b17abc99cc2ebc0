mod aggregate;
mod app;
mod camera;
mod client;
mod config;
mod earth;
mod feed;
mod globe;
mod panel;
mod settings;
mod store;
mod terminal;

use clap::{Args, Parser, Subcommand};
use config::{GlobeConfig, StoreConfig, DEFAULT_POLL_INTERVAL_MS};
use feed::{DemoFeed, Feed, ReplayFeed};
use settings::Settings;
use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;
use terminal::Terminal;

#[derive(Parser)]
#[command(name = "termglobe")]
#[command(version = "0.1.0")]
#[command(about = "Terminal globe for geolocated network events", long_about = None)]
struct Cli {
    /// Append diagnostics to this file (level via RUST_LOG, default info)
    #[arg(long, global = true)]
    log_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct ViewArgs {
    /// Point lifetime in seconds (unparseable values fall back to 30)
    #[arg(short, long)]
    lifetime: Option<String>,

    /// Maximum stored points (unparseable values fall back to 1000)
    #[arg(short, long)]
    max_points: Option<String>,

    /// Animation frame time in seconds
    #[arg(short, long, default_value = "0.03")]
    time: f32,

    /// Start with auto-rotation off
    #[arg(long)]
    no_rotate: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Poll a collector endpoint and display its events
    Watch {
        /// Base URL of the collector ("/data" is appended)
        #[arg(short, long)]
        url: Option<String>,

        /// Poll interval in seconds
        #[arg(short, long)]
        interval: Option<f64>,

        #[command(flatten)]
        view: ViewArgs,
    },

    /// Display synthetic events, no server needed
    Demo {
        /// Random seed for reproducibility
        #[arg(short, long)]
        seed: Option<u64>,

        /// Maximum synthetic points per batch
        #[arg(short, long, default_value = "4")]
        rate: usize,

        /// Batch interval in seconds
        #[arg(short, long, default_value = "2.0")]
        interval: f64,

        #[command(flatten)]
        view: ViewArgs,
    },

    /// Replay a recorded capture (ip,latitude,longitude,timestamp,suspicious)
    Replay {
        file: PathBuf,

        /// Time compression factor
        #[arg(short, long, default_value = "10.0")]
        speedup: f64,

        #[command(flatten)]
        view: ViewArgs,
    },
}

fn main() -> io::Result<()> {
    let cli = Cli::parse();

    if let Some(path) = &cli.log_file {
        init_logging(path);
    }

    let settings = Settings::load();

    // Terminal first: if the display cannot come up, nothing else starts.
    let term = match Terminal::new(true) {
        Ok(term) => term,
        Err(err) => {
            eprintln!("Display error: could not initialize the terminal ({}).", err);
            eprintln!("termglobe needs an interactive terminal; not starting the feed.");
            std::process::exit(1);
        }
    };

    let (feed, config) = match cli.command {
        Commands::Watch {
            url,
            interval,
            view,
        } => {
            let url = url
                .or(settings.globe.url.clone())
                .unwrap_or_else(|| "http://127.0.0.1:5000".to_string());
            let interval = interval
                .or(settings.globe.interval)
                .map(Duration::from_secs_f64)
                .unwrap_or(Duration::from_millis(DEFAULT_POLL_INTERVAL_MS));
            let config = view_config(&view, &settings, interval);
            (Feed::http(&url, interval), config)
        }
        Commands::Demo {
            seed,
            rate,
            interval,
            view,
        } => {
            let interval = Duration::from_secs_f64(interval.max(0.1));
            let config = view_config(&view, &settings, interval);
            (Feed::Demo(DemoFeed::new(seed, interval, rate)), config)
        }
        Commands::Replay {
            file,
            speedup,
            view,
        } => {
            let config = view_config(
                &view,
                &settings,
                Duration::from_millis(DEFAULT_POLL_INTERVAL_MS),
            );
            (Feed::Replay(ReplayFeed::from_file(&file, speedup)?), config)
        }
    };

    app::run(term, feed, config)
}

fn view_config(view: &ViewArgs, settings: &Settings, interval: Duration) -> GlobeConfig {
    let max_points = view
        .max_points
        .as_deref()
        .or(settings.globe.max_points.as_deref());
    let lifetime = view
        .lifetime
        .as_deref()
        .or(settings.globe.lifetime.as_deref());

    GlobeConfig {
        store: StoreConfig::from_raw(max_points, lifetime),
        interval,
        time_step: view.time.max(0.001),
        auto_rotate: !view.no_rotate,
    }
}

fn init_logging(path: &Path) {
    match std::fs::OpenOptions::new().create(true).append(true).open(path) {
        Ok(file) => {
            env_logger::Builder::new()
                .filter_level(log::LevelFilter::Info)
                .parse_default_env()
                .target(env_logger::Target::Pipe(Box::new(file)))
                .init();
        }
        Err(err) => eprintln!("could not open log file {}: {}", path.display(), err),
    }
}
