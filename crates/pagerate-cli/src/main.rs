//! pagerate - read multi-page reports in the terminal and rate them
//!
//! - Snap-scrolling page viewer with page dots and a scrollbar
//! - Popup, wizard and inline sidebar rating flows
//! - Ratings kept in a local SQLite database

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use pagerate_core::constants::fs::LOG_FILE;
use pagerate_core::{paths, AppConfig, Document, PresentationMode, RatingStateStore};

mod commands;
mod tui;

use tui::components::Toast;
use tui::themes::THEME_REGISTRY;

/// pagerate - page-by-page report feedback
#[derive(Parser)]
#[command(name = "pagerate", version)]
#[command(about = "Read multi-page reports in the terminal and rate them", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Report to open (the built-in sample when omitted)
    file: Option<PathBuf>,

    /// Rating flow: popup, wizard or inline
    #[arg(short, long, global = true)]
    mode: Option<PresentationMode>,

    /// Theme name
    #[arg(short, long)]
    theme: Option<String>,

    /// Config file (defaults to the platform config directory)
    #[arg(long)]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Open a report in the viewer
    View {
        /// Report to open (the built-in sample when omitted)
        file: Option<PathBuf>,
    },

    /// Print stored ratings as JSON
    List,

    /// Delete stored ratings
    Clear {
        /// Only this page (popup and inline modes)
        #[arg(short, long)]
        page: Option<String>,
    },

    /// List available themes
    Themes,
}

/// Restore terminal state - called on panic or unexpected exit
fn restore_terminal() {
    use crossterm::{
        event::DisableMouseCapture,
        execute,
        terminal::{disable_raw_mode, LeaveAlternateScreen},
    };
    let _ = disable_raw_mode();
    let _ = execute!(std::io::stdout(), LeaveAlternateScreen, DisableMouseCapture);
}

/// Log to a file; stdout belongs to the TUI
fn init_logging() {
    let log_dir = paths::logs_dir();
    std::fs::create_dir_all(&log_dir).ok();

    #[cfg(unix)]
    let null_device = "/dev/null";
    #[cfg(windows)]
    let null_device = "NUL";

    let Ok(log_file) = std::fs::File::create(log_dir.join(LOG_FILE))
        .or_else(|_| std::fs::File::create(null_device))
    else {
        return;
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .with_writer(std::sync::Mutex::new(log_file))
        .with_ansi(false)
        .init();
}

fn load_config(cli: &Cli) -> Result<AppConfig> {
    let mut config = match &cli.config {
        Some(path) => AppConfig::load_from(path)?,
        None => AppConfig::load()?,
    };
    if let Some(mode) = cli.mode {
        config.mode = mode;
    }
    if let Some(theme) = &cli.theme {
        config.theme = theme.clone();
    }
    Ok(config)
}

#[tokio::main]
async fn main() -> Result<()> {
    // Set up panic hook to restore terminal state
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        restore_terminal();
        original_hook(panic_info);
    }));

    init_logging();

    let cli = Cli::parse();
    let config = load_config(&cli)?;

    match cli.command {
        Some(Commands::Themes) => {
            println!("Available themes ({}):", THEME_REGISTRY.count());
            for (name, theme) in THEME_REGISTRY.list() {
                println!("  {} - {}", name, theme.display_name);
            }
        }
        Some(Commands::List) => {
            let store = RatingStateStore::open(&config.database_path())?;
            let records = commands::list_records(&store, cli.mode)?;
            println!("{}", serde_json::to_string_pretty(&records)?);
        }
        Some(Commands::Clear { page }) => {
            let mut store = RatingStateStore::open(&config.database_path())?;
            for namespace in commands::clear_records(&mut store, cli.mode, page.as_deref())? {
                match &page {
                    Some(page) => println!("Cleared page {} from {}", page, namespace),
                    None => println!("Cleared {}", namespace),
                }
            }
        }
        Some(Commands::View { file }) => view(config, file.or(cli.file)).await?,
        None => view(config, cli.file).await?,
    }

    Ok(())
}

async fn view(config: AppConfig, file: Option<PathBuf>) -> Result<()> {
    let document = match &file {
        Some(path) => Document::from_file(path)
            .with_context(|| format!("Failed to open {}", path.display()))?,
        None => Document::sample(),
    };

    let theme = THEME_REGISTRY.get_or_default(&config.theme);
    tracing::info!("Using theme: {} ({})", theme.display_name, theme.name);

    // An unusable database still leaves a working viewer
    let db_path = config.database_path();
    let (store, store_error) = match RatingStateStore::open(&db_path) {
        Ok(store) => (store, None),
        Err(e) => {
            tracing::warn!("Failed to open {}: {:#}", db_path.display(), e);
            (RatingStateStore::in_memory(), Some(e))
        }
    };

    let mut app = tui::App::new(&config, document, store);
    if store_error.is_some() {
        app.show_toast(Toast::warning("Ratings database unavailable; saving for this session only"));
    }
    app.run().await
}
