//! Binary entrypoint for the ColorMOTD CLI.
//!
//! Commands:
//! - `init` - write the default `config.yml` and create `favicons/`
//! - `check` - run a full load (including 1.x migration) and summarize it
//! - `preview [-n <count>] [--json]` - simulate status queries
//! - `watch [--interval <s>]` - reload periodically and preview each new generation
//!
//! See the library crate docs for module-level details: `colormotd::`.
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use log::{error, info};

use colormotd::config::{ConfigLoader, Settings};
use colormotd::listener::{ResponseListener, StatusResponse};
use colormotd::logutil::{escape_log, strip_formatting};
use colormotd::motd::{Icon, MotdService};

#[derive(Parser)]
#[command(name = "colormotd")]
#[command(about = "Randomized server list MOTD and icons")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Data directory holding config.yml and favicons/
    #[arg(short, long, default_value = ".", global = true)]
    data_dir: PathBuf,

    /// Verbose logging (-v, -vv for more)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,
}

#[derive(Subcommand)]
enum Commands {
    /// Create the default config and icon directory if missing
    Init,
    /// Load the config and report what would be served
    Check,
    /// Simulate status queries against the loaded config
    Preview {
        /// Number of responses to generate
        #[arg(short = 'n', long, default_value_t = 5)]
        count: usize,
        /// Print responses as JSON lines
        #[arg(long)]
        json: bool,
        /// Remove § formatting codes from printed text
        #[arg(long)]
        strip: bool,
    },
    /// Reload on an interval, keeping the last good config on failure
    Watch {
        /// Seconds between reloads
        #[arg(short, long, default_value_t = 30)]
        interval: u64,
    },
}

/// Captures what the listener writes, for printing.
#[derive(Default)]
struct Preview {
    motd: Option<String>,
    icon: Option<(String, String)>,
}

impl StatusResponse for Preview {
    fn set_motd(&mut self, motd: &str) {
        self.motd = Some(motd.to_string());
    }

    fn set_icon(&mut self, icon: &Icon) {
        self.icon = Some((icon.name().to_string(), icon.data_uri()));
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Peek only: the real load may migrate the file, and must be logged.
    let settings = Settings::peek(&cli.data_dir);
    init_logging(settings.as_ref(), cli.verbose);

    let loader = ConfigLoader::new(&cli.data_dir);

    match cli.command {
        Commands::Init => {
            if loader.ensure_default_config()? {
                println!("Created {}", loader.config_path().display());
            } else {
                println!("{} already exists", loader.config_path().display());
            }
            let icons = loader.ensure_icon_dir()?;
            println!("Icon directory: {}", icons.display());
        }
        Commands::Check => {
            let config = loader
                .load()
                .with_context(|| format!("failed to load config from {}", loader.data_dir().display()))?;
            println!("{} message(s):", config.messages.len());
            for (i, message) in config.messages.iter().enumerate() {
                println!("  [{}] {}", i, escape_log(message.as_str()));
            }
            println!("{} icon(s):", config.icons.len());
            for icon in config.icons.iter() {
                let note = if icon.has_protocol_size() { "" } else { " (not 64x64)" };
                println!("  {} {}x{}{}", icon.name(), icon.width(), icon.height(), note);
            }
            let suffixes: Vec<&str> = loader.accepted_suffixes().iter().map(String::as_str).collect();
            println!("Accepted icon suffixes: {}", suffixes.join(" "));
        }
        Commands::Preview { count, json, strip } => {
            let listener = ResponseListener::new(Arc::new(load_service(&loader)?));
            for i in 0..count {
                print_preview(&listener, i, json, strip)?;
            }
        }
        Commands::Watch { interval } => {
            let service = Arc::new(load_service(&loader)?);
            let listener = ResponseListener::new(Arc::clone(&service));
            print_preview(&listener, 0, false, false)?;

            let mut ticker = tokio::time::interval(Duration::from_secs(interval.max(1)));
            ticker.tick().await;
            info!("Watching {} every {}s", loader.data_dir().display(), interval.max(1));
            loop {
                tokio::select! {
                    _ = ticker.tick() => {
                        let reload_service = Arc::clone(&service);
                        let reload_loader = loader.clone();
                        let result = tokio::task::spawn_blocking(move || reload_service.reload(&reload_loader)).await?;
                        match result {
                            Ok(generation) => {
                                info!("Serving generation {}", generation);
                                print_preview(&listener, 0, false, false)?;
                            }
                            Err(e) => error!(
                                "Reload failed, still serving generation {}: {}",
                                service.generation(),
                                e
                            ),
                        }
                    }
                    _ = tokio::signal::ctrl_c() => {
                        info!("Interrupted, exiting");
                        break;
                    }
                }
            }
        }
    }

    Ok(())
}

fn load_service(loader: &ConfigLoader) -> Result<MotdService> {
    MotdService::load(loader)
        .with_context(|| format!("failed to load config from {}", loader.data_dir().display()))
}

fn print_preview(listener: &ResponseListener, index: usize, json: bool, strip: bool) -> Result<()> {
    let mut preview = Preview::default();
    listener.on_status_query(&mut preview);
    let generation = listener.service().generation();
    let motd = preview.motd.map(|m| if strip { strip_formatting(&m) } else { m });

    if json {
        let payload = serde_json::json!({
            "index": index,
            "generation": generation,
            "motd": motd,
            "icon": preview.icon.as_ref().map(|(name, _)| name),
            "favicon": preview.icon.as_ref().map(|(_, uri)| uri),
        });
        println!("{}", serde_json::to_string(&payload)?);
        return Ok(());
    }

    println!("--- #{} (generation {})", index, generation);
    match motd {
        Some(text) => {
            for line in text.lines() {
                println!("  {}", line);
            }
        }
        None => println!("  (host default motd)"),
    }
    match preview.icon {
        Some((name, uri)) => println!("  icon: {} ({} byte data uri)", name, uri.len()),
        None => println!("  icon: (host default)"),
    }
    Ok(())
}

fn init_logging(settings: Option<&Settings>, verbosity: u8) {
    use std::io::Write;
    let mut builder = env_logger::Builder::new();
    // CLI verbosity overrides config
    let base_level = match verbosity {
        0 => settings
            .and_then(|s| s.logging.level.parse::<log::LevelFilter>().ok())
            .unwrap_or(log::LevelFilter::Info),
        1 => log::LevelFilter::Debug,
        _ => log::LevelFilter::Trace,
    };
    builder.filter_level(base_level);

    let log_file = settings.and_then(|s| s.logging.file.clone()).and_then(|file| {
        std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(file)
            .ok()
    });

    if let Some(f) = log_file {
        let write_mutex = std::sync::Arc::new(std::sync::Mutex::new(f));
        // Tee to the console only when attached to a terminal
        let is_tty = atty::is(atty::Stream::Stdout);
        builder.format(move |fmt, record| {
            let ts = chrono::Utc::now().format("%Y-%m-%dT%H:%M:%SZ");
            let line = format!("{} [{}] {}", ts, record.level(), record.args());
            if let Ok(mut guard) = write_mutex.lock() {
                let _ = writeln!(guard, "{}", line);
            }
            if is_tty {
                writeln!(fmt, "{}", line)
            } else {
                Ok(())
            }
        });
    } else {
        builder.format(|fmt, record| {
            let ts = chrono::Utc::now().format("%Y-%m-%dT%H:%M:%SZ");
            writeln!(fmt, "{} [{}] {}", ts, record.level(), record.args())
        });
    }
    let _ = builder.try_init();
}
