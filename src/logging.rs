/// Logging backend for the flood triage service
///
/// Library code logs through the `log` facade (`log::info!` etc.); this
/// module installs the process-wide backend. Console output goes to stderr
/// so it never mixes with the report on stdout. An optional log file
/// receives every accepted record with a UTC timestamp.

use chrono::Utc;
use log::{Level, LevelFilter, Log, Metadata, Record, SetLoggerError};
use std::fs::{File, OpenOptions};
use std::io::{self, Write};
use std::path::Path;
use std::sync::Mutex;

// ---------------------------------------------------------------------------
// Logger
// ---------------------------------------------------------------------------

pub struct FloodLogger {
    /// Minimum level to emit
    min_level: LevelFilter,
    /// Append-mode log file, if configured
    log_file: Option<Mutex<File>>,
    /// Whether to include timestamps in console output
    console_timestamps: bool,
}

impl FloodLogger {
    pub fn new(min_level: LevelFilter, log_file: Option<File>, console_timestamps: bool) -> Self {
        FloodLogger {
            min_level,
            log_file: log_file.map(Mutex::new),
            console_timestamps,
        }
    }

    /// Full log line as written to the log file.
    fn format_entry(record: &Record) -> String {
        format!(
            "{} {:<5} {}: {}",
            Utc::now().format("%Y-%m-%d %H:%M:%S UTC"),
            record.level(),
            record.target(),
            record.args()
        )
    }

    /// Short console form, marked by severity.
    fn format_console(record: &Record) -> String {
        match record.level() {
            Level::Error => format!("   ✗ {}", record.args()),
            Level::Warn => format!("   ⚠ {}", record.args()),
            Level::Info => format!("   {}", record.args()),
            Level::Debug | Level::Trace => format!("   [{}] {}", record.level(), record.args()),
        }
    }
}

impl Log for FloodLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.min_level
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }

        let entry = Self::format_entry(record);

        if self.console_timestamps {
            eprintln!("{}", entry);
        } else {
            eprintln!("{}", Self::format_console(record));
        }

        if let Some(file) = &self.log_file {
            if let Ok(mut file) = file.lock() {
                if let Err(e) = writeln!(file, "{}", entry) {
                    eprintln!("Failed to write to log file: {}", e);
                }
            }
        }
    }

    fn flush(&self) {
        if let Some(file) = &self.log_file {
            if let Ok(mut file) = file.lock() {
                let _ = file.flush();
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Initialization
// ---------------------------------------------------------------------------

/// Errors from `init_logger`.
#[derive(Debug, thiserror::Error)]
pub enum LoggerInitError {
    #[error("cannot open log file: {0}")]
    File(#[from] io::Error),
    #[error("logger already installed: {0}")]
    AlreadySet(#[from] SetLoggerError),
}

/// Maps a `-v` count to a level: 0 → info, 1 → debug, 2+ → trace.
pub fn level_for_verbosity(verbose: u8) -> LevelFilter {
    match verbose {
        0 => LevelFilter::Info,
        1 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    }
}

/// Installs the global logger. Can be called once per process.
pub fn init_logger(
    min_level: LevelFilter,
    log_file: Option<&Path>,
    console_timestamps: bool,
) -> Result<(), LoggerInitError> {
    let file = match log_file {
        Some(path) => Some(OpenOptions::new().create(true).append(true).open(path)?),
        None => None,
    };

    log::set_boxed_logger(Box::new(FloodLogger::new(min_level, file, console_timestamps)))?;
    log::set_max_level(min_level);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_verbosity_levels() {
        assert_eq!(level_for_verbosity(0), LevelFilter::Info);
        assert_eq!(level_for_verbosity(1), LevelFilter::Debug);
        assert_eq!(level_for_verbosity(5), LevelFilter::Trace);
    }

    #[test]
    fn test_enabled_respects_min_level() {
        let logger = FloodLogger::new(LevelFilter::Info, None, false);
        let info = Metadata::builder().level(Level::Info).build();
        let debug = Metadata::builder().level(Level::Debug).build();
        let error = Metadata::builder().level(Level::Error).build();
        assert!(logger.enabled(&info));
        assert!(logger.enabled(&error));
        assert!(!logger.enabled(&debug));
    }

    fn with_record<R>(level: Level, message: &str, f: impl FnOnce(&Record) -> R) -> R {
        f(&Record::builder()
            .level(level)
            .target("flood_triage::analysis")
            .args(format_args!("{}", message))
            .build())
    }

    #[test]
    fn test_console_format_marks_severity() {
        let line = with_record(Level::Warn, "Saar anchor moved", FloodLogger::format_console);
        assert_eq!(line, "   ⚠ Saar anchor moved");
    }

    #[test]
    fn test_entry_format_includes_level_and_target() {
        let entry = with_record(Level::Info, "Rain flood at Merzig", FloodLogger::format_entry);
        assert!(
            entry.contains(" UTC INFO  flood_triage::analysis: Rain flood at Merzig"),
            "got: {}",
            entry
        );
    }

    // Only test in this binary that installs the global logger.
    #[test]
    fn test_init_logger_installs_once_and_writes_file() {
        let path = std::env::temp_dir().join(format!("flood_triage_{}.log", std::process::id()));
        let _ = std::fs::remove_file(&path);

        init_logger(LevelFilter::Warn, Some(&path), false).expect("first install succeeds");
        log::warn!("Blies anchor set at 5050.0");
        log::info!("below the minimum level");
        log::logger().flush();

        let second = init_logger(LevelFilter::Info, None, false);
        assert!(matches!(second, Err(LoggerInitError::AlreadySet(_))));

        let written = std::fs::read_to_string(&path).expect("log file was created");
        let _ = std::fs::remove_file(&path);
        assert!(written.contains("WARN  flood_triage::logging::tests: Blies anchor set at 5050.0"), "got: {}", written);
        assert!(!written.contains("below the minimum level"));
    }
}
