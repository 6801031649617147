use std::path::PathBuf;

/// Audit error types
#[derive(Debug, thiserror::Error)]
pub enum AuditError {
    /// Malformed exclusion file, style resource or matcher configuration
    #[error("configuration error: {message}")]
    Configuration {
        message: String,
        path: Option<PathBuf>,
    },

    /// File I/O error outside of per-file reads
    #[error("io error: {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// One of the report artifacts could not be produced
    #[error("render error: {0}")]
    Render(String),

    /// The audit found unapproved licenses and the run is strict
    #[error("{message}")]
    AuditFailure {
        unapproved: usize,
        report: PathBuf,
        message: String,
    },
}

impl AuditError {
    pub fn config(message: impl Into<String>) -> Self {
        AuditError::Configuration {
            message: message.into(),
            path: None,
        }
    }

    pub fn config_at(message: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        AuditError::Configuration {
            message: message.into(),
            path: Some(path.into()),
        }
    }

    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        AuditError::Io {
            path: path.into(),
            source,
        }
    }

    pub fn render(err: impl std::fmt::Display) -> Self {
        AuditError::Render(err.to_string())
    }
}

/// Result type using AuditError
pub type Result<T> = std::result::Result<T, AuditError>;

/// Process exit codes of the CLI
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum ExitCode {
    /// Every file carries an approved license
    Success = 0,
    /// Unapproved licenses found in strict mode
    AuditFailed = 1,
    /// Configuration or argument error
    ConfigError = 2,
    /// I/O or rendering failure
    InternalError = 3,
}

impl From<&AuditError> for ExitCode {
    fn from(err: &AuditError) -> Self {
        match err {
            AuditError::Configuration { .. } => ExitCode::ConfigError,
            AuditError::AuditFailure { .. } => ExitCode::AuditFailed,
            AuditError::Io { .. } | AuditError::Render(_) => ExitCode::InternalError,
        }
    }
}
