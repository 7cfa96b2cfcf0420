//! Runtime configuration from environment variables.
//!
//! | Variable                         | Default                                   |
//! |----------------------------------|-------------------------------------------|
//! | `HEARTCHECK_MODEL_PATH`          | `<exe dir>/model/heart_disease_model.json` |
//! | `HEARTCHECK_LOG_MODE`            | `auto` (`file` on a TTY, else `stdout`)    |
//! | `HEARTCHECK_LOG_FILE`            | `heartcheck.log`                          |
//! | `HEARTCHECK_SANITIZE_MAX_BYTES`  | `16384` (read by `adapters::sanitize`)     |
//! | `RUST_LOG`                       | `info`                                    |

use std::path::{Path, PathBuf};

use crate::HeartcheckError;

pub const MODEL_PATH_ENV: &str = "HEARTCHECK_MODEL_PATH";
pub const LOG_MODE_ENV: &str = "HEARTCHECK_LOG_MODE";
pub const LOG_FILE_ENV: &str = "HEARTCHECK_LOG_FILE";

/// Artifact location relative to the executable's directory.
pub const DEFAULT_MODEL_RELATIVE_PATH: &str = "model/heart_disease_model.json";

const DEFAULT_LOG_FILE: &str = "heartcheck.log";

/// Where log output goes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogMode {
    File,
    Stdout,
    /// File when stdout is a terminal, stdout otherwise.
    Auto,
}

impl LogMode {
    /// Unknown values fall back to `Auto`.
    #[must_use]
    pub fn parse(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "file" => Self::File,
            "stdout" => Self::Stdout,
            _ => Self::Auto,
        }
    }

    /// Decide whether to log to a file given the terminal state.
    #[must_use]
    pub fn use_file(self, interactive: bool) -> bool {
        match self {
            Self::File => true,
            Self::Stdout => false,
            Self::Auto => interactive,
        }
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Explicit model path override, if set.
    pub model_path: Option<PathBuf>,
    pub log_mode: LogMode,
    pub log_file: PathBuf,
}

impl AppConfig {
    /// Read configuration from the process environment.
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read configuration through an arbitrary lookup function.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        Self {
            model_path: non_empty(MODEL_PATH_ENV).map(PathBuf::from),
            log_mode: non_empty(LOG_MODE_ENV)
                .map(|v| LogMode::parse(&v))
                .unwrap_or(LogMode::Auto),
            log_file: non_empty(LOG_FILE_ENV)
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_LOG_FILE)),
        }
    }

    /// Resolve the model artifact path.
    ///
    /// Uses the override when present, otherwise the default location next
    /// to the running executable.
    ///
    /// # Errors
    /// Returns `ClassifierLoad` if the executable location cannot be determined.
    pub fn resolve_model_path(&self) -> Result<PathBuf, HeartcheckError> {
        if let Some(path) = &self.model_path {
            return Ok(path.clone());
        }

        let exe = std::env::current_exe().map_err(|e| HeartcheckError::ClassifierLoad {
            path: PathBuf::from(DEFAULT_MODEL_RELATIVE_PATH),
            reason: format!("cannot locate running executable: {e}"),
        })?;
        let dir = exe.parent().ok_or_else(|| HeartcheckError::ClassifierLoad {
            path: exe.clone(),
            reason: "executable has no parent directory".to_string(),
        })?;
        Ok(default_model_path(dir))
    }
}

/// Default artifact path for an executable living in `exe_dir`.
#[must_use]
pub fn default_model_path(exe_dir: &Path) -> PathBuf {
    exe_dir.join(DEFAULT_MODEL_RELATIVE_PATH)
}
