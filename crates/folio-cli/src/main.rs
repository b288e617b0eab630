//! folio CLI: Command-line interface for the expertise timeline

use clap::{Parser, Subcommand};
use folio_engine::{EraId, TimelineDataStore, WidgetConfig};
use folio_tui::headless::{HeadlessSession, DEFAULT_HEIGHT, DEFAULT_WIDTH};
use folio_tui::ThemeName;
use std::path::{Path, PathBuf};
use tracing::{debug, info};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

/// Interactive expertise timeline in the terminal
#[derive(Parser)]
#[command(name = "folio")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Timeline data file (JSON). Uses the bundled timeline when omitted.
    #[arg(long, global = true)]
    data: Option<PathBuf>,

    /// Widget config file (JSON). Uses defaults when omitted.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Color theme: mocha, latte or high-contrast
    #[arg(long, global = true, default_value = "mocha")]
    theme: ThemeName,

    /// Write logs to this file (filter with `RUST_LOG`)
    #[arg(long, global = true)]
    log_file: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Open the TUI (default when no command specified)
    Tui,

    /// Render one settled frame to stdout without a terminal
    Print {
        /// Frame width in columns
        #[arg(long, default_value_t = DEFAULT_WIDTH)]
        width: u16,

        /// Frame height in rows
        #[arg(long, default_value_t = DEFAULT_HEIGHT)]
        height: u16,

        /// Era ids to toggle before rendering, in order (comma-separated)
        #[arg(long, value_delimiter = ',')]
        expand: Vec<u32>,
    },

    /// Validate the timeline data and config
    Validate {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Print the timeline data as JSON
    Export,

    /// Print the effective widget config as JSON
    Config,
}

fn main() {
    let cli = Cli::parse();
    let interactive = matches!(cli.command, None | Some(Commands::Tui));
    let _log_guard = init_logging(cli.log_file.as_deref(), interactive);

    let store = load_store(cli.data.as_deref());
    let config = load_config(cli.config.as_deref());

    match cli.command {
        None | Some(Commands::Tui) => {
            let rt = tokio::runtime::Runtime::new().expect("Failed to create tokio runtime");
            if let Err(e) = rt.block_on(folio_tui::run_tui(&store, &config, cli.theme.theme())) {
                eprintln!("Error: {e}");
                std::process::exit(1);
            }
        }
        Some(Commands::Print {
            width,
            height,
            expand,
        }) => {
            cmd_print(&store, &config, cli.theme, (width, height), &expand);
        }
        Some(Commands::Validate { json }) => {
            cmd_validate(&store, json);
        }
        Some(Commands::Export) => {
            cmd_export(&store);
        }
        Some(Commands::Config) => {
            println!(
                "{}",
                serde_json::to_string_pretty(&config).expect("failed to serialize")
            );
        }
    }
}

/// Install the tracing subscriber.
///
/// The interactive UI owns the terminal, so it only logs when a log file is
/// given. Other commands log warnings to stderr by default.
fn init_logging(log_file: Option<&Path>, interactive: bool) -> Option<WorkerGuard> {
    if let Some(path) = log_file {
        let dir = path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or(Path::new("."));
        let Some(name) = path.file_name() else {
            eprintln!("Invalid log file path: {}", path.display());
            std::process::exit(1);
        };
        let appender = tracing_appender::rolling::never(dir, name);
        let (writer, guard) = tracing_appender::non_blocking(appender);
        tracing_subscriber::fmt()
            .with_env_filter(env_filter("info"))
            .with_writer(writer)
            .with_ansi(false)
            .init();
        return Some(guard);
    }

    if !interactive {
        tracing_subscriber::fmt()
            .with_env_filter(env_filter("warn"))
            .with_writer(std::io::stderr)
            .init();
    }
    None
}

fn env_filter(default: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default))
}

fn load_store(path: Option<&Path>) -> TimelineDataStore {
    let Some(path) = path else {
        debug!("Using bundled timeline");
        return TimelineDataStore::builtin();
    };
    match TimelineDataStore::load(path) {
        Ok(store) => store,
        Err(e) => {
            eprintln!("Failed to load timeline {}: {e}", path.display());
            std::process::exit(1);
        }
    }
}

fn load_config(path: Option<&Path>) -> WidgetConfig {
    let Some(path) = path else {
        return WidgetConfig::default();
    };
    match WidgetConfig::load(path) {
        Ok(config) => {
            info!(path = %path.display(), "Loaded widget config");
            config
        }
        Err(e) => {
            eprintln!("Failed to load config {}: {e}", path.display());
            std::process::exit(1);
        }
    }
}

fn cmd_print(
    store: &TimelineDataStore,
    config: &WidgetConfig,
    theme: ThemeName,
    (width, height): (u16, u16),
    expand: &[u32],
) {
    if let Some(unknown) = expand.iter().find(|id| !store.contains(EraId(**id))) {
        eprintln!("No era with id {unknown}");
        std::process::exit(1);
    }

    let mut session = HeadlessSession::new(store, config, theme.theme(), width, height);
    session.settle();
    for id in expand {
        session.toggle(EraId(*id));
        session.settle();
    }
    println!("{}", session.screen());
}

fn cmd_validate(store: &TimelineDataStore, json: bool) {
    if json {
        println!(
            "{}",
            serde_json::to_string_pretty(&summary_json(store)).expect("failed to serialize")
        );
        return;
    }

    println!("Timeline is valid\n");
    for era in store.eras() {
        println!(
            "  {} [{}] {} - {} skill(s)",
            era.id,
            era.year_range,
            era.title,
            era.skills.len()
        );
    }
    println!("\n{} era(s)", store.len());
}

fn summary_json(store: &TimelineDataStore) -> serde_json::Value {
    let eras: Vec<serde_json::Value> = store
        .eras()
        .iter()
        .map(|era| {
            serde_json::json!({
                "id": era.id,
                "title": era.title,
                "yearRange": era.year_range,
                "skills": era.skills.len(),
            })
        })
        .collect();
    serde_json::json!({
        "valid": true,
        "eraCount": store.len(),
        "eras": eras,
    })
}

fn cmd_export(store: &TimelineDataStore) {
    match store.to_json_pretty() {
        Ok(json) => println!("{json}"),
        Err(e) => {
            eprintln!("Failed to export timeline: {e}");
            std::process::exit(1);
        }
    }
}
