use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;

use dioxus::LaunchBuilder;
use dioxus::desktop::{Config as DesktopConfig, WindowBuilder};
use guide_core::model::{PageId, QuestionId};
use guide_core::settings::GuideSettings;
use services::{Clock, GuideServices, PageLibraryService, ProgressTracker, StudyState};
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt as log_fmt, prelude::*, reload};
use ui::{App, UiApp, build_app_context};

mod config;

type ReloadHandle = reload::Handle<EnvFilter, tracing_subscriber::Registry>;

const DEFAULT_DB_URL: &str = "sqlite://guide.sqlite3";
const DEFAULT_CONTENT_DIR: &str = "content";

#[derive(Debug)]
enum ArgsError {
    MissingValue { flag: &'static str },
    UnknownArg(String),
    InvalidDbUrl { raw: String },
    InvalidPath { flag: &'static str, raw: String },
}

impl fmt::Display for ArgsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgsError::MissingValue { flag } => write!(f, "{flag} requires a value"),
            ArgsError::UnknownArg(arg) => write!(f, "unknown argument: {arg}"),
            ArgsError::InvalidDbUrl { raw } => write!(f, "invalid --db value: {raw}"),
            ArgsError::InvalidPath { flag, raw } => write!(f, "invalid {flag} value: {raw:?}"),
        }
    }
}

impl std::error::Error for ArgsError {}

fn require_value(
    args: &mut impl Iterator<Item = String>,
    flag: &'static str,
) -> Result<String, ArgsError> {
    args.next().ok_or(ArgsError::MissingValue { flag })
}

fn require_path(
    args: &mut impl Iterator<Item = String>,
    flag: &'static str,
) -> Result<PathBuf, ArgsError> {
    let value = require_value(args, flag)?;
    if value.trim().is_empty() {
        return Err(ArgsError::InvalidPath { flag, raw: value });
    }
    Ok(PathBuf::from(value))
}

struct DesktopApp {
    services: GuideServices,
    launch_address: Option<String>,
}

impl UiApp for DesktopApp {
    fn study_state(&self) -> StudyState {
        self.services.state()
    }

    fn library(&self) -> Arc<PageLibraryService> {
        self.services.library()
    }

    fn settings(&self) -> GuideSettings {
        *self.services.settings()
    }

    fn tracker(&self, page: PageId, questions: Vec<QuestionId>) -> ProgressTracker {
        self.services.tracker(page, questions)
    }

    fn launch_address(&self) -> Option<String> {
        self.launch_address.clone()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct Args {
    db_url: String,
    content_dir: PathBuf,
    config_path: PathBuf,
    open: Option<String>,
}

fn usage() -> String {
    format!(
        "Usage:
  cargo run -p app -- [ui] [--db <sqlite_url>] [--content <dir>] [--config <file>] [--open <address>]

Defaults:
  --db {DEFAULT_DB_URL}
  --content {DEFAULT_CONTENT_DIR}
  --config {}

--open takes a page address such as pages/incident-response.html#chain-of-custody

Environment:
  GUIDE_DB_URL, GUIDE_CONTENT_DIR, GUIDE_CONFIG, RUST_LOG",
        config::DEFAULT_CONFIG_PATH
    )
}

fn print_usage() {
    eprintln!("{}", usage());
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Command {
    Ui,
}

impl Command {
    fn from_arg(arg: &str) -> Option<Self> {
        match arg {
            "ui" => Some(Self::Ui),
            _ => None,
        }
    }
}

impl Args {
    fn from_env() -> Self {
        Self {
            db_url: std::env::var("GUIDE_DB_URL")
                .ok()
                .map_or_else(|| DEFAULT_DB_URL.into(), normalize_sqlite_url),
            content_dir: std::env::var_os("GUIDE_CONTENT_DIR")
                .map_or_else(|| PathBuf::from(DEFAULT_CONTENT_DIR), PathBuf::from),
            config_path: std::env::var_os("GUIDE_CONFIG")
                .map_or_else(|| PathBuf::from(config::DEFAULT_CONFIG_PATH), PathBuf::from),
            open: None,
        }
    }

    fn parse_ui(
        mut self,
        args: &mut impl Iterator<Item = String>,
    ) -> Result<Self, ArgsError> {
        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--db" => {
                    let value = require_value(args, "--db")?;
                    if value.trim().is_empty() {
                        return Err(ArgsError::InvalidDbUrl { raw: value });
                    }
                    self.db_url = normalize_sqlite_url(value);
                }
                "--content" => self.content_dir = require_path(args, "--content")?,
                "--config" => self.config_path = require_path(args, "--config")?,
                "--open" => self.open = Some(require_value(args, "--open")?),
                "--help" | "-h" => {
                    print_usage();
                    std::process::exit(0);
                }
                _ => return Err(ArgsError::UnknownArg(arg)),
            }
        }
        Ok(self)
    }
}

fn normalize_sqlite_url(raw: String) -> String {
    if raw == "sqlite::memory:" || raw.starts_with("sqlite://") {
        return raw;
    }

    let trimmed = raw.trim().to_string();
    let path_str = trimmed
        .strip_prefix("sqlite:")
        .unwrap_or(trimmed.as_str())
        .to_string();
    let path = std::path::Path::new(&path_str);
    let absolute = if path.is_absolute() {
        path.to_path_buf()
    } else {
        std::env::current_dir()
            .unwrap_or_else(|_| PathBuf::from("."))
            .join(path)
    };
    format!("sqlite://{}", absolute.display())
}

fn init_tracing() -> (ReloadHandle, bool) {
    let from_env = EnvFilter::try_from_default_env().ok();
    let overridden = from_env.is_some();
    let env_filter = from_env.unwrap_or_else(|| EnvFilter::new("info"));
    let (filter_layer, handle) = reload::Layer::new(env_filter);
    tracing_subscriber::registry()
        .with(
            log_fmt::layer()
                .with_target(true)
                .with_file(true)
                .with_line_number(true)
                .with_filter(filter_layer),
        )
        .init();
    (handle, overridden)
}

fn set_log_level(handle: &ReloadHandle, level: &str) {
    let parsed = EnvFilter::builder()
        .parse(level)
        .unwrap_or_else(|_| EnvFilter::new("info"));
    if let Err(err) = handle.modify(|filter| *filter = parsed) {
        warn!(%level, "Failed to update log level from config: {err}");
    } else {
        info!(%level, "Applied log level from config");
    }
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let mut argv: Vec<String> = std::env::args().skip(1).collect();

    // Launching the UI is the default when no subcommand is given.
    let cmd = match argv.first().map(String::as_str) {
        None => Command::Ui,
        Some("--help" | "-h") => {
            print_usage();
            return Ok(());
        }
        Some(first) if first.starts_with("--") => Command::Ui,
        Some(first) => Command::from_arg(first).ok_or_else(|| {
            eprintln!("unknown subcommand: {first}");
            print_usage();
            std::io::Error::new(std::io::ErrorKind::InvalidInput, "unknown subcommand")
        })?,
    };
    if !argv.is_empty() && !argv[0].starts_with("--") {
        argv.remove(0);
    }

    let mut iter = argv.into_iter();
    let parsed = match cmd {
        Command::Ui => Args::from_env().parse_ui(&mut iter),
    }
    .map_err(|e| {
        eprintln!("{e}");
        print_usage();
        e
    })?;

    let (log_handle, env_overrides) = init_tracing();
    let config = config::load_config(&parsed.config_path);
    if !env_overrides {
        set_log_level(&log_handle, &config.log_level);
    }
    let settings = config.settings_or_default();

    // Open + migrate SQLite at startup. Keep this in the binary glue so core/services stay pure.
    prepare_sqlite_file(&parsed.db_url)?;
    let services =
        GuideServices::new_sqlite(&parsed.db_url, parsed.content_dir.clone(), settings, Clock::system())
            .await?;
    info!(db = %parsed.db_url, "study state ready");

    let app = DesktopApp {
        services,
        launch_address: parsed.open,
    };
    let context = build_app_context(Arc::new(app));

    // Dioxus/tao can default to an always-on-top window in some dev setups.
    let desktop_cfg = DesktopConfig::new().with_window(
        WindowBuilder::new()
            .with_title("Interview Prep Guide")
            .with_always_on_top(false),
    );

    LaunchBuilder::desktop()
        .with_cfg(desktop_cfg)
        .with_context(context)
        .launch(App);
    Ok(())
}

fn prepare_sqlite_file(db_url: &str) -> Result<(), Box<dyn std::error::Error>> {
    if db_url == "sqlite::memory:" {
        return Ok(());
    }

    let path = db_url
        .strip_prefix("sqlite://")
        .ok_or_else(|| ArgsError::InvalidDbUrl {
            raw: db_url.to_string(),
        })?;
    let path = path.split('?').next().unwrap_or(path);
    if path.is_empty() {
        return Err(ArgsError::InvalidDbUrl {
            raw: db_url.to_string(),
        }
        .into());
    }

    let path = std::path::Path::new(path);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    if !path.exists() {
        std::fs::OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(false)
            .open(path)?;
    }

    Ok(())
}

#[tokio::main]
async fn main() {
    if let Err(err) = run().await {
        eprintln!("{err}");
        std::process::exit(2);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base() -> Args {
        Args {
            db_url: DEFAULT_DB_URL.to_string(),
            content_dir: PathBuf::from(DEFAULT_CONTENT_DIR),
            config_path: PathBuf::from(config::DEFAULT_CONFIG_PATH),
            open: None,
        }
    }

    fn parse(args: &[&str]) -> Result<Args, ArgsError> {
        let mut iter = args.iter().map(|arg| (*arg).to_string());
        base().parse_ui(&mut iter)
    }

    #[test]
    fn no_flags_keep_defaults() {
        assert_eq!(parse(&[]).unwrap(), base());
    }

    #[test]
    fn flags_override_defaults() {
        let args = parse(&[
            "--db",
            "sqlite::memory:",
            "--content",
            "/srv/guide/content",
            "--config",
            "guide.toml",
            "--open",
            "pages/telephony.html#q2",
        ])
        .unwrap();
        assert_eq!(args.db_url, "sqlite::memory:");
        assert_eq!(args.content_dir, PathBuf::from("/srv/guide/content"));
        assert_eq!(args.config_path, PathBuf::from("guide.toml"));
        assert_eq!(args.open.as_deref(), Some("pages/telephony.html#q2"));
    }

    #[test]
    fn missing_and_unknown_values_are_rejected() {
        assert!(matches!(
            parse(&["--open"]),
            Err(ArgsError::MissingValue { flag: "--open" })
        ));
        assert!(matches!(
            parse(&["--content", " "]),
            Err(ArgsError::InvalidPath { flag: "--content", .. })
        ));
        assert!(matches!(parse(&["--db", ""]), Err(ArgsError::InvalidDbUrl { .. })));
        assert!(matches!(parse(&["--verbose"]), Err(ArgsError::UnknownArg(arg)) if arg == "--verbose"));
    }

    #[test]
    fn relative_sqlite_paths_become_absolute() {
        let url = normalize_sqlite_url("sqlite:data/guide.sqlite3".to_string());
        assert!(url.starts_with("sqlite://"));
        assert!(url.ends_with("data/guide.sqlite3"));
        assert_eq!(
            normalize_sqlite_url("sqlite:///tmp/guide.sqlite3".to_string()),
            "sqlite:///tmp/guide.sqlite3"
        );
    }

    #[test]
    fn usage_lists_the_actual_defaults() {
        let text = usage();
        assert!(text.contains(&format!("--db {DEFAULT_DB_URL}")));
        assert!(text.contains(&format!("--content {DEFAULT_CONTENT_DIR}")));
        assert!(text.contains(config::DEFAULT_CONFIG_PATH));
    }

    #[test]
    fn in_memory_database_needs_no_file() {
        assert!(prepare_sqlite_file("sqlite::memory:").is_ok());
        assert!(prepare_sqlite_file("postgres://elsewhere").is_err());
    }
}
