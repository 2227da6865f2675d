use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing_appender::rolling;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

const LOG_FILE_PREFIX: &str = "termviz.log";
const LOG_RETENTION_DAYS: u64 = 7;

/// Return the log directory path.
///
/// Precedence: `TERMVIZ_LOG_DIR` env var > platform data dir > `./logs`.
pub fn log_dir() -> PathBuf {
    if let Ok(dir) = std::env::var("TERMVIZ_LOG_DIR") {
        return PathBuf::from(dir);
    }

    if let Some(data) = dirs::data_dir() {
        return data.join("termviz").join("logs");
    }

    PathBuf::from("logs")
}

/// Remove termviz log files older than `max_age_days` from `log_path`.
///
/// Only files starting with the rolling appender prefix are touched, so a
/// shared log directory keeps its other contents.
fn cleanup_old_logs(log_path: &Path, max_age_days: u64) {
    let cutoff =
        std::time::SystemTime::now() - std::time::Duration::from_secs(max_age_days * 86400);
    let Ok(entries) = std::fs::read_dir(log_path) else {
        return;
    };
    for entry in entries.flatten() {
        if !entry.file_name().to_string_lossy().starts_with(LOG_FILE_PREFIX) {
            continue;
        }
        let stale = entry
            .metadata()
            .and_then(|meta| meta.modified())
            .is_ok_and(|modified| modified < cutoff);
        if stale {
            let _ = std::fs::remove_file(entry.path());
        }
    }
}

fn env_filter() -> EnvFilter {
    EnvFilter::try_from_env("TERMVIZ_LOG")
        .or_else(|_| EnvFilter::try_from_env("RUST_LOG"))
        .unwrap_or_else(|_| EnvFilter::new("warn"))
}

/// Initialize the global tracing subscriber.
///
/// Filter controlled by `TERMVIZ_LOG` or `RUST_LOG` (default: `warn`).
/// Human-readable output goes to stderr because stdout carries the image
/// stream. With `file_logging`, events are also written to a daily rolling
/// file in [`log_dir()`] with 7-day retention.
///
/// Fails if a global subscriber is already installed.
pub fn init(file_logging: bool) -> Result<()> {
    let stderr_layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true);

    let file_layer = if file_logging {
        let log_path = log_dir();
        std::fs::create_dir_all(&log_path)
            .with_context(|| format!("failed to create log directory {}", log_path.display()))?;
        cleanup_old_logs(&log_path, LOG_RETENTION_DAYS);

        let layer = tracing_subscriber::fmt::layer()
            .with_writer(rolling::daily(&log_path, LOG_FILE_PREFIX))
            .with_ansi(false)
            .with_target(true);
        Some(layer.boxed())
    } else {
        None
    };

    tracing_subscriber::registry()
        .with(env_filter())
        .with(stderr_layer)
        .with(file_layer)
        .try_init()
        .context("failed to install tracing subscriber")?;

    tracing::debug!(file_logging, "logging initialised");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    // Serialize env-mutating tests to avoid data races.
    static ENV_LOCK: Mutex<()> = Mutex::new(());

    #[test]
    fn log_dir_respects_env_override() {
        let _guard = ENV_LOCK.lock().unwrap();
        let original = std::env::var("TERMVIZ_LOG_DIR").ok();

        std::env::set_var("TERMVIZ_LOG_DIR", "/tmp/termviz-test-logs");
        assert_eq!(log_dir(), PathBuf::from("/tmp/termviz-test-logs"));

        match original {
            Some(v) => std::env::set_var("TERMVIZ_LOG_DIR", v),
            None => std::env::remove_var("TERMVIZ_LOG_DIR"),
        }
    }

    #[test]
    fn log_dir_default_ends_in_logs() {
        let _guard = ENV_LOCK.lock().unwrap();
        let original = std::env::var("TERMVIZ_LOG_DIR").ok();

        std::env::remove_var("TERMVIZ_LOG_DIR");
        assert!(log_dir().ends_with("logs"));

        if let Some(v) = original {
            std::env::set_var("TERMVIZ_LOG_DIR", v);
        }
    }

    #[test]
    fn cleanup_old_logs_removes_stale_files() {
        let tmp = std::env::temp_dir().join("termviz-test-cleanup");
        let _ = std::fs::create_dir_all(&tmp);

        let log_a = tmp.join("termviz.log.2025-01-01");
        let log_b = tmp.join("termviz.log.2025-01-02");
        let other = tmp.join("other.txt");
        std::fs::write(&log_a, "a").unwrap();
        std::fs::write(&log_b, "b").unwrap();
        std::fs::write(&other, "c").unwrap();

        // max_age_days=0 means cutoff is "now", so all matching files get cleaned
        cleanup_old_logs(&tmp, 0);
        assert!(!log_a.exists(), "termviz log file should be deleted");
        assert!(!log_b.exists(), "termviz log file should be deleted");
        assert!(other.exists(), "unrelated file should be preserved");

        let _ = std::fs::remove_dir_all(&tmp);
    }

    #[test]
    fn cleanup_missing_dir_is_noop() {
        cleanup_old_logs(Path::new("/nonexistent/termviz-logs"), 0);
    }

    #[test]
    fn second_init_fails_instead_of_panicking() {
        let _guard = ENV_LOCK.lock().unwrap();
        assert!(init(false).is_ok());
        let err = init(false).unwrap_err();
        assert!(err.to_string().contains("tracing subscriber"));
    }
}
