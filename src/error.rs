//! Unified error hierarchy for CellRS
//!
//! Structural input violations fail fast; per-cycle extraction gaps are
//! tolerated inside the calculators and never surface here.

use thiserror::Error;

/// Top-level error type for all CellRS operations
#[derive(Debug, Error)]
pub enum CellRsError {
    /// Structurally unusable input (empty cycle sequence, missing cycle_data)
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Unresolvable configuration (e.g. nominal capacity)
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Record loading errors
    #[error("Import error: {0}")]
    Import(#[from] crate::import::ImportError),

    /// Report persistence errors
    #[error("Export error: {0}")]
    Export(#[from] crate::export::ExportError),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Result type alias for CellRS operations
pub type Result<T> = std::result::Result<T, CellRsError>;

impl CellRsError {
    /// Invalid input and configuration errors indicate the input itself is
    /// unusable, not a transient condition; only IO is worth retrying.
    pub fn is_retryable(&self) -> bool {
        matches!(self, CellRsError::Io(_))
    }

    /// Get error severity level
    pub fn severity(&self) -> ErrorSeverity {
        match self {
            CellRsError::InvalidInput(_) | CellRsError::Configuration(_) => ErrorSeverity::Warning,
            CellRsError::Internal(_) => ErrorSeverity::Critical,
            _ => ErrorSeverity::Error,
        }
    }

    /// Get user-friendly error message
    pub fn user_message(&self) -> String {
        match self {
            CellRsError::InvalidInput(reason) => {
                format!("Battery record set is unusable: {}", reason)
            }
            CellRsError::Configuration(reason) => {
                format!(
                    "{}. Provide a record set with \"nominal_capacity_in_Ah\" or use a known file prefix.",
                    reason
                )
            }
            _ => self.to_string(),
        }
    }
}

/// Error severity levels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorSeverity {
    Critical,
    Error,
    Warning,
}

impl ErrorSeverity {
    /// Convert to tracing level
    pub fn to_tracing_level(&self) -> tracing::Level {
        match self {
            ErrorSeverity::Critical | ErrorSeverity::Error => tracing::Level::ERROR,
            ErrorSeverity::Warning => tracing::Level::WARN,
        }
    }
}
