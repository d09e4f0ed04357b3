//! Tracing subscriber setup
//!
//! The terminal form owns the screen, so interactive runs log to a file.
//! One-shot runs log warnings to stderr.

use std::fs::{self, File, OpenOptions};
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use directories::ProjectDirs;
use thiserror::Error;
use tracing_subscriber::EnvFilter;

/// Default filter for file logging when `RUST_LOG` is unset
const FILE_DEFAULT_FILTER: &str = "dualcast=info";

/// Default filter for stderr logging when `RUST_LOG` is unset
const STDERR_DEFAULT_FILTER: &str = "dualcast=warn";

/// Where log output goes
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogTarget {
    /// Standard error, plain text
    Stderr,
    /// Appended to a file; parent directories are created
    File(PathBuf),
    /// Logging disabled
    Off,
}

/// Errors that can occur while installing the subscriber
#[derive(Debug, Error)]
pub enum LoggingError {
    /// The log file could not be opened
    #[error("Cannot open log file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// A global subscriber was already installed
    #[error("Failed to install log subscriber: {0}")]
    Init(String),
}

/// Default log file location
///
/// Uses `~/.local/share/dualcast/dualcast.log` on Linux, or the platform
/// equivalent. Returns `None` if no home directory can be determined.
pub fn default_log_path() -> Option<PathBuf> {
    let project_dirs = ProjectDirs::from("", "", "dualcast")?;
    Some(project_dirs.data_dir().join("dualcast.log"))
}

/// Opens `path` for appending, creating it and its parent directories
pub fn open_log_file(path: &Path) -> io::Result<File> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    OpenOptions::new().create(true).append(true).open(path)
}

fn env_filter(default: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default))
}

/// Installs the global tracing subscriber for `target`
pub fn init(target: &LogTarget) -> Result<(), LoggingError> {
    let result = match target {
        LogTarget::Off => return Ok(()),
        LogTarget::Stderr => tracing_subscriber::fmt()
            .with_env_filter(env_filter(STDERR_DEFAULT_FILTER))
            .with_writer(io::stderr)
            .with_target(false)
            .try_init(),
        LogTarget::File(path) => {
            let file = open_log_file(path).map_err(|source| LoggingError::Io {
                path: path.clone(),
                source,
            })?;
            tracing_subscriber::fmt()
                .with_env_filter(env_filter(FILE_DEFAULT_FILTER))
                .with_writer(Mutex::new(file))
                .with_ansi(false)
                .try_init()
        }
    };

    result.map_err(|e| LoggingError::Init(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::TempDir;

    #[test]
    fn test_open_log_file_creates_parent_directories() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let path = temp_dir.path().join("nested").join("logs").join("dualcast.log");

        let mut file = open_log_file(&path).expect("Should open log file");
        writeln!(file, "first").unwrap();

        assert!(path.exists(), "Log file should exist");
    }

    #[test]
    fn test_open_log_file_appends() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let path = temp_dir.path().join("dualcast.log");

        writeln!(open_log_file(&path).unwrap(), "first").unwrap();
        writeln!(open_log_file(&path).unwrap(), "second").unwrap();

        let content = fs::read_to_string(&path).unwrap();
        assert_eq!(content, "first\nsecond\n");
    }

    #[test]
    fn test_default_log_path_mentions_project() {
        if let Some(path) = default_log_path() {
            assert!(path.to_string_lossy().contains("dualcast"));
            assert_eq!(path.file_name().and_then(|n| n.to_str()), Some("dualcast.log"));
        }
        // Passes if there is no home directory (e.g. in CI)
    }

    #[test]
    fn test_init_off_is_noop() {
        assert!(init(&LogTarget::Off).is_ok());
    }

    #[test]
    fn test_init_reports_unopenable_file() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        // A directory cannot be opened as a log file
        let result = init(&LogTarget::File(temp_dir.path().to_path_buf()));
        assert!(matches!(result, Err(LoggingError::Io { .. })));
    }
}
