use crate::error::{AnalyzerError, Result};
use chrono::Local;
use env_logger::{Builder, Env};
use log::{self, LevelFilter};
use std::io::Write;
use yansi::{Color, Paint};

/// Initializes the CLI logging system with the specified log level
///
/// `RUST_LOG` still wins when it is set. Valid log levels are: error, warn,
/// info, debug, trace.
pub fn init(log_level: &str) -> Result<()> {
    let env = Env::default()
        .filter_or("RUST_LOG", parse_log_level(log_level).as_str().to_lowercase())
        .write_style_or("RUST_LOG_STYLE", "auto");

    Builder::from_env(env)
        .format(|buf, record| writeln!(buf, "{}", format_log(record)))
        .try_init()
        .map_err(|e| AnalyzerError::Config(format!("Failed to initialize logger: {}", e)))
}

/// Formats a log record as `[timestamp] LEVEL [target] message`
pub fn format_log(record: &log::Record) -> String {
    let target = Some(record.target())
        .filter(|target| !target.is_empty())
        .or_else(|| record.module_path())
        .unwrap_or("unknown");

    format!(
        "[{}] {} [{}] {}",
        Local::now().format("%Y-%m-%d %H:%M:%S%.3f"),
        level_label(record.level()),
        target,
        record.args()
    )
}

fn level_label(level: log::Level) -> Paint<&'static str> {
    let label = Paint::new(match level {
        log::Level::Error => "ERROR",
        log::Level::Warn => "WARN ",
        log::Level::Info => "INFO ",
        log::Level::Debug => "DEBUG",
        log::Level::Trace => "TRACE",
    });
    match level {
        log::Level::Error => label.fg(Color::Red).bold(),
        log::Level::Warn => label.fg(Color::Yellow).bold(),
        log::Level::Info => label.fg(Color::Cyan).bold(),
        log::Level::Debug => label.fg(Color::Blue).bold(),
        log::Level::Trace => label,
    }
}

/// Maps a level name (any case, `off` included) to a filter; unknown names give `Info`
pub fn parse_log_level(level: &str) -> LevelFilter {
    level.trim().parse().unwrap_or(LevelFilter::Info)
}
