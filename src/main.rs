//! user-dashboard binary entry point.
//!
//! Parses flags, loads settings, routes logs to a file, initializes the
//! terminal in raw mode, runs the TUI event loop, and restores the terminal
//! state on exit.
//!
use std::fs::File;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::time::Duration;

use clap::Parser;
use crossterm::event::{DisableMouseCapture, EnableMouseCapture};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use tracing::info;
use tracing_subscriber::EnvFilter;

use user_dashboard::app::settings::{Settings, parse_columns, parse_page_sizes};
use user_dashboard::app::{self, AppState};
use user_dashboard::error::{Context, Result};
use user_dashboard::service::HttpUserService;
use user_dashboard::table::Column;

#[derive(Parser, Debug)]
#[command(name = "user-dashboard", version, about = "Browse, search and edit users from a REST API")]
struct Cli {
    /// REST endpoint root (`/users` is appended)
    #[arg(long, env = "USER_DASHBOARD_BASE_URL")]
    base_url: Option<String>,

    /// Per-request timeout in seconds
    #[arg(long, value_parser = clap::value_parser!(u64).range(1..))]
    timeout_secs: Option<u64>,

    /// Rows-per-page options, e.g. "5,10,15"
    #[arg(long, value_parser = page_sizes_arg)]
    page_sizes: Option<PageSizes>,

    /// Column order, e.g. "id,name,email"
    #[arg(long, value_parser = columns_arg)]
    columns: Option<Columns>,

    /// Directory holding dashboard.conf, theme.conf and keybinds.conf
    #[arg(long, env = "USER_DASHBOARD_CONFIG_DIR")]
    config_dir: Option<PathBuf>,

    /// Log file (the terminal belongs to the UI)
    #[arg(long)]
    log_file: Option<PathBuf>,
}

#[derive(Clone, Debug)]
struct PageSizes(Vec<usize>);

#[derive(Clone, Debug)]
struct Columns(Vec<Column>);

fn page_sizes_arg(s: &str) -> std::result::Result<PageSizes, String> {
    parse_page_sizes(s)
        .map(PageSizes)
        .ok_or_else(|| format!("invalid page sizes '{s}'"))
}

fn columns_arg(s: &str) -> std::result::Result<Columns, String> {
    parse_columns(s)
        .map(Columns)
        .ok_or_else(|| format!("invalid columns '{s}' (known: id, name, email)"))
}

impl Cli {
    fn apply(&self, settings: &mut Settings) {
        if let Some(url) = &self.base_url {
            settings.base_url = url.trim_end_matches('/').to_string();
        }
        if let Some(secs) = self.timeout_secs {
            settings.timeout = Duration::from_secs(secs);
        }
        if let Some(PageSizes(sizes)) = &self.page_sizes {
            settings.page_sizes = sizes.clone();
        }
        if let Some(Columns(cols)) = &self.columns {
            settings.columns = cols.clone();
        }
    }
}

/// Send `tracing` output to `path`. `RUST_LOG` overrides the default `info` level.
fn init_tracing(path: &Path) -> Result<()> {
    let file = File::create(path).with_ctx(|| format!("create log file {}", path.display()))?;
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .init();
    Ok(())
}

/// Initialize a Crossterm-backed `ratatui` terminal in raw mode.
fn init_terminal() -> Result<Terminal<CrosstermBackend<std::io::Stdout>>> {
    enable_raw_mode()?;
    let mut stdout = std::io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let terminal = Terminal::new(backend)?;
    Ok(terminal)
}

/// Program entry point: run the TUI and report any top-level error to stderr.
fn main() -> Result<()> {
    let cli = Cli::parse();

    let config_dir = cli.config_dir.clone().unwrap_or_else(app::default_config_dir);
    std::fs::create_dir_all(&config_dir)
        .with_ctx(|| format!("create config dir {}", config_dir.display()))?;
    let log_file = cli
        .log_file
        .clone()
        .unwrap_or_else(|| config_dir.join("user-dashboard.log"));
    init_tracing(&log_file)?;

    let mut settings = Settings::load_or_init(config_dir.join("dashboard.conf"));
    cli.apply(&mut settings);
    info!(base_url = %settings.base_url, timeout = ?settings.timeout, "starting");

    let service = HttpUserService::new(&settings.base_url, settings.timeout)
        .with_ctx(|| "build HTTP client".to_string())?;
    let mut state = AppState::new(&settings, &config_dir);

    let mut terminal = init_terminal().map_err(|e| format!("init terminal: {}", e))?;

    let res = app::run(&mut terminal, &mut state, &service);

    disable_raw_mode().ok();
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )
    .ok();
    terminal.show_cursor().ok();

    if let Err(err) = res {
        tracing::error!(error = %err, "application error");
        eprintln!("application error: {err}");
    }
    Ok(())
}
