//! Process-wide logging bootstrap.
//!
//! # Responsibility
//! - Initialize file-based rolling logs exactly once per process.
//! - Optionally echo records to stderr for foreground/container runs.
//! - Capture panics as sanitized log events.
//!
//! # Invariants
//! - Logging init is idempotent for the same settings.
//! - Logging initialization must not panic.
//! - Re-initialization with different settings is rejected.
//! - Events carry metadata only; visitor addresses are never logged.

use flexi_logger::{
    Cleanup, Criterion, Duplicate, FileSpec, Logger, LoggerHandle, Naming, WriteMode,
};
use log::{error, info};
use once_cell::sync::OnceCell;
use std::path::{Path, PathBuf};

const LOG_FILE_BASENAME: &str = "quotevote";
const MAX_LOG_FILE_SIZE_BYTES: u64 = 10 * 1024 * 1024;
const MAX_LOG_FILES: usize = 5;
const MAX_PANIC_PAYLOAD_CHARS: usize = 160;

static LOGGING_STATE: OnceCell<LoggingState> = OnceCell::new();
static PANIC_HOOK_INSTALLED: OnceCell<()> = OnceCell::new();

/// Settings accepted by [`init_logging`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogSettings {
    /// One of `trace|debug|info|warn|error`, case-insensitive.
    pub level: String,
    /// Absolute directory for rolling log files.
    pub log_dir: String,
    /// Mirror records at `level` or above to stderr.
    pub echo_stderr: bool,
}

/// Active logging configuration reported by [`logging_status`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoggingStatus {
    pub level: &'static str,
    pub log_dir: PathBuf,
    pub echo_stderr: bool,
}

struct LoggingState {
    status: LoggingStatus,
    _logger: LoggerHandle,
}

/// Initializes core logging.
///
/// # Errors
/// - Returns an error when the level is unsupported.
/// - Returns an error when `log_dir` is empty, non-absolute, or cannot be created.
/// - Returns an error when logging is already active with other settings.
/// - Returns an error when logger backend setup fails.
pub fn init_logging(settings: &LogSettings) -> Result<(), String> {
    let requested = LoggingStatus {
        level: normalize_level(&settings.level)?,
        log_dir: normalize_log_dir(&settings.log_dir)?,
        echo_stderr: settings.echo_stderr,
    };

    let state = LOGGING_STATE.get_or_try_init(|| start_logger(requested.clone()))?;
    if state.status != requested {
        return Err(format!(
            "logging already initialized with level `{}` at `{}`; refusing to switch to level `{}` at `{}`",
            state.status.level,
            state.status.log_dir.display(),
            requested.level,
            requested.log_dir.display()
        ));
    }

    Ok(())
}

/// Returns active logging settings, or `None` before initialization.
pub fn logging_status() -> Option<LoggingStatus> {
    LOGGING_STATE.get().map(|state| state.status.clone())
}

/// Returns the default log level for current build mode.
pub fn default_log_level() -> &'static str {
    if cfg!(debug_assertions) {
        "debug"
    } else {
        "info"
    }
}

fn start_logger(status: LoggingStatus) -> Result<LoggingState, String> {
    std::fs::create_dir_all(&status.log_dir).map_err(|err| {
        format!(
            "failed to create log directory `{}`: {err}",
            status.log_dir.display()
        )
    })?;

    let duplicate = if status.echo_stderr {
        duplicate_for(status.level)
    } else {
        Duplicate::None
    };

    let logger = Logger::try_with_str(status.level)
        .map_err(|err| format!("invalid log level `{}`: {err}", status.level))?
        .log_to_file(
            FileSpec::default()
                .directory(status.log_dir.as_path())
                .basename(LOG_FILE_BASENAME),
        )
        .rotate(
            Criterion::Size(MAX_LOG_FILE_SIZE_BYTES),
            Naming::Numbers,
            Cleanup::KeepLogFiles(MAX_LOG_FILES),
        )
        .duplicate_to_stderr(duplicate)
        .write_mode(WriteMode::BufferAndFlush)
        .append()
        // Format: [YYYY-MM-DD HH:MM:SS.ffffff TZ] LEVEL [module] file:line: message
        .format_for_files(flexi_logger::detailed_format)
        .start()
        .map_err(|err| format!("failed to start logger: {err}"))?;

    install_panic_hook_once();

    info!(
        "event=app_start module=core status=ok platform={} build_mode={} version={}",
        std::env::consts::OS,
        build_mode(),
        env!("CARGO_PKG_VERSION")
    );
    info!(
        "event=logging_init module=core status=ok level={} log_dir={} echo_stderr={}",
        status.level,
        status.log_dir.display(),
        status.echo_stderr
    );

    Ok(LoggingState {
        status,
        _logger: logger,
    })
}

fn duplicate_for(level: &str) -> Duplicate {
    match level {
        "trace" => Duplicate::Trace,
        "debug" => Duplicate::Debug,
        "info" => Duplicate::Info,
        "warn" => Duplicate::Warn,
        _ => Duplicate::Error,
    }
}

fn normalize_level(level: &str) -> Result<&'static str, String> {
    match level.trim().to_ascii_lowercase().as_str() {
        "trace" => Ok("trace"),
        "debug" => Ok("debug"),
        "info" => Ok("info"),
        "warn" | "warning" => Ok("warn"),
        "error" => Ok("error"),
        other => Err(format!(
            "unsupported log level `{other}`; expected trace|debug|info|warn|error"
        )),
    }
}

fn normalize_log_dir(log_dir: &str) -> Result<PathBuf, String> {
    let trimmed = log_dir.trim();
    if trimmed.is_empty() {
        return Err("log_dir cannot be empty".to_string());
    }
    let path = Path::new(trimmed);
    if !path.is_absolute() {
        return Err(format!("log_dir must be an absolute path, got `{trimmed}`"));
    }
    Ok(path.to_path_buf())
}

fn build_mode() -> &'static str {
    if cfg!(debug_assertions) {
        "debug"
    } else {
        "release"
    }
}

fn install_panic_hook_once() {
    if PANIC_HOOK_INSTALLED.get().is_some() {
        return;
    }

    let previous_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        // Payloads may echo request data; cap and flatten before logging.
        let location = panic_info
            .location()
            .map(|loc| format!("{}:{}", loc.file(), loc.line()))
            .unwrap_or_else(|| "unknown".to_string());
        let payload = panic_payload_summary(panic_info);
        error!(
            "event=panic_captured module=core status=error location={} payload={}",
            location, payload
        );
        previous_hook(panic_info);
    }));

    let _ = PANIC_HOOK_INSTALLED.set(());
}

fn panic_payload_summary(info: &std::panic::PanicHookInfo<'_>) -> String {
    let payload = if let Some(message) = info.payload().downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = info.payload().downcast_ref::<String>() {
        message.clone()
    } else {
        "non-string panic payload".to_string()
    };

    sanitize_message(&payload, MAX_PANIC_PAYLOAD_CHARS)
}

fn sanitize_message(value: &str, max_chars: usize) -> String {
    let normalized = value.replace(['\n', '\r'], " ");
    let mut truncated = normalized.chars().take(max_chars).collect::<String>();
    if normalized.chars().count() > max_chars {
        truncated.push_str("...");
    }
    truncated
}

#[cfg(test)]
mod tests {
    use super::{
        duplicate_for, init_logging, logging_status, normalize_level, normalize_log_dir,
        sanitize_message, LogSettings,
    };
    use flexi_logger::Duplicate;
    use std::path::PathBuf;
    use std::time::{SystemTime, UNIX_EPOCH};

    fn unique_temp_dir(suffix: &str) -> PathBuf {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("system time should be after unix epoch")
            .as_nanos();
        std::env::temp_dir().join(format!(
            "quotevote-logging-{suffix}-{}-{nanos}",
            std::process::id()
        ))
    }

    #[test]
    fn normalize_level_accepts_known_values() {
        assert_eq!(normalize_level("INFO").unwrap(), "info");
        assert_eq!(normalize_level(" warning ").unwrap(), "warn");
        assert!(normalize_level("verbose").is_err());
    }

    #[test]
    fn normalize_log_dir_rejects_relative_path() {
        let error = normalize_log_dir("logs/dev").expect_err("relative paths must be rejected");
        assert!(error.contains("absolute"));
        assert!(normalize_log_dir("   ").is_err());
    }

    #[test]
    fn sanitize_message_removes_newlines_and_truncates() {
        let sanitized = sanitize_message("line1\nline2\rline3", 8);
        assert!(!sanitized.contains('\n'));
        assert!(!sanitized.contains('\r'));
        assert!(sanitized.ends_with("..."));
    }

    #[test]
    fn stderr_echo_follows_level() {
        assert!(matches!(duplicate_for("info"), Duplicate::Info));
        assert!(matches!(duplicate_for("error"), Duplicate::Error));
    }

    #[test]
    fn init_logging_is_idempotent_for_same_settings_and_rejects_conflicts() {
        let log_dir = unique_temp_dir("idempotent");
        let settings = LogSettings {
            level: "info".to_string(),
            log_dir: log_dir.to_string_lossy().into_owned(),
            echo_stderr: false,
        };

        init_logging(&settings).expect("first init should succeed");
        init_logging(&settings).expect("same settings should be idempotent");

        let louder = LogSettings {
            level: "debug".to_string(),
            ..settings.clone()
        };
        let level_error = init_logging(&louder).expect_err("level conflict should fail");
        assert!(level_error.contains("refusing to switch"));

        let elsewhere = LogSettings {
            log_dir: unique_temp_dir("different")
                .to_string_lossy()
                .into_owned(),
            ..settings.clone()
        };
        assert!(init_logging(&elsewhere).is_err());

        let status = logging_status().expect("logging should be active");
        assert_eq!(status.level, "info");
        assert_eq!(status.log_dir, log_dir);
    }
}
