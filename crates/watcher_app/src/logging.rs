//! Logger initialization for the watcher binary.
//!
//! Writes to `./watcher.log` by default so history survives restarts. The
//! file rotates at 1 MiB and keeps ten numbered backups. `WATCHER_LOG`
//! selects file, terminal or both.

use std::fs::OpenOptions;
use std::path::PathBuf;
use std::str::FromStr;

use file_rotate::{compression::Compression, suffix::AppendCount, ContentLimit, FileRotate};
use log::LevelFilter;
use simplelog::{
    ColorChoice, CombinedLogger, Config, ConfigBuilder, SharedLogger, TermLogger, TerminalMode,
    WriteLogger,
};

pub const LOG_DESTINATION_VAR: &str = "WATCHER_LOG";
pub const LOG_FILE_VAR: &str = "WATCHER_LOG_FILE";
const DEFAULT_LOG_FILE: &str = "./watcher.log";
const DEFAULT_MAX_FILE_BYTES: usize = 1_048_576;
const DEFAULT_BACKUP_COUNT: usize = 10;

/// Destination for log output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogDestination {
    /// Append to the rotating log file.
    File,
    /// Write to terminal (stdout/stderr).
    Terminal,
    /// Write to both file and terminal.
    #[default]
    Both,
}

impl FromStr for LogDestination {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "file" => Ok(LogDestination::File),
            "terminal" => Ok(LogDestination::Terminal),
            "both" => Ok(LogDestination::Both),
            other => Err(format!("unknown log destination {other:?}")),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogSettings {
    pub destination: LogDestination,
    pub file: PathBuf,
    /// Size at which the file is rotated.
    pub max_file_bytes: usize,
    /// Rotated files kept as `<file>.1` (newest) to `<file>.N`.
    pub backups: usize,
}

impl LogSettings {
    /// Never fails: logging must be up before configuration errors can be reported.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let destination = match lookup(LOG_DESTINATION_VAR) {
            Some(raw) => raw.parse::<LogDestination>().unwrap_or_else(|err| {
                eprintln!("Warning: {err}; logging to file and terminal");
                LogDestination::Both
            }),
            None => LogDestination::default(),
        };
        let file = lookup(LOG_FILE_VAR)
            .filter(|path| !path.trim().is_empty())
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_LOG_FILE));
        Self {
            destination,
            file,
            max_file_bytes: DEFAULT_MAX_FILE_BYTES,
            backups: DEFAULT_BACKUP_COUNT,
        }
    }
}

/// Initialize the global logger.
///
/// If the log file cannot be opened, logging falls back to the terminal.
pub fn initialize(settings: &LogSettings) {
    let _ = CombinedLogger::init(build_loggers(settings));
}

fn build_loggers(settings: &LogSettings) -> Vec<Box<dyn SharedLogger>> {
    let level = LevelFilter::Info;

    let config = build_config();
    let terminal = |config: Config| -> Box<dyn SharedLogger> {
        TermLogger::new(level, config, TerminalMode::Mixed, ColorChoice::Auto)
    };

    match settings.destination {
        LogDestination::File => match create_file_logger(settings, level, config.clone()) {
            Some(file_logger) => vec![file_logger as Box<dyn SharedLogger>],
            None => {
                eprintln!("Warning: logging to terminal instead");
                vec![terminal(config)]
            }
        },
        LogDestination::Terminal => vec![terminal(config)],
        LogDestination::Both => {
            let mut loggers = vec![terminal(config.clone())];
            if let Some(file_logger) = create_file_logger(settings, level, config) {
                loggers.push(file_logger);
            }
            loggers
        }
    }
}

fn build_config() -> Config {
    ConfigBuilder::new()
        .set_time_format_rfc3339()
        .set_target_level(LevelFilter::Error)
        // Dependency chatter (hyper, rustls) stays out of the operator log.
        .add_filter_ignore_str("hyper")
        .add_filter_ignore_str("rustls")
        .add_filter_ignore_str("reqwest")
        .build()
}

fn create_file_logger(
    settings: &LogSettings,
    level: LevelFilter,
    config: Config,
) -> Option<Box<WriteLogger<FileRotate<AppendCount>>>> {
    // FileRotate swallows open errors, so check the path up front.
    if let Err(err) = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&settings.file)
    {
        eprintln!(
            "Warning: Could not open log file at {:?}: {}",
            settings.file, err
        );
        return None;
    }

    let writer = FileRotate::new(
        &settings.file,
        AppendCount::new(settings.backups),
        ContentLimit::Bytes(settings.max_file_bytes),
        Compression::None,
        #[cfg(unix)]
        None,
    );
    Some(WriteLogger::new(level, config, writer))
}
