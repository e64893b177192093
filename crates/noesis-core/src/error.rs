//! Error types for Noesis Core
//!
//! This module defines all error types used throughout the Noesis core engine.
//! We use `thiserror` for ergonomic error definitions with automatic Display/Error implementations.
//!
//! Generation and collapse never surface errors to the caller: every unsafe
//! condition on that path resolves through the emergency-collapse fallback.
//! Only configuration and correction failures propagate, because neither has
//! a safe automatic substitute.

use thiserror::Error;

/// Result type alias for Noesis operations
pub type Result<T> = std::result::Result<T, NoesisError>;

/// Main error type for Noesis operations
#[derive(Error, Debug)]
pub enum NoesisError {
    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Correction errors
    #[error("Correction error: {0}")]
    Correction(#[from] CorrectionError),

    /// Serialization errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic error with context
    #[error("{context}: {source}")]
    WithContext {
        context: String,
        source: Box<NoesisError>,
    },
}

/// Errors raised at construction/configuration time
///
/// Rejected synchronously; component state is never changed by a failed
/// configuration attempt.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    #[error("Register length must be at least 1, got {0}")]
    InvalidRegisterLength(usize),

    #[error("{name} must be in range [{min}, {max}], got {value}")]
    ThresholdOutOfRange {
        name: &'static str,
        value: f64,
        min: f64,
        max: f64,
    },

    #[error("Max correction depth must be at least 1, got {0}")]
    InvalidCorrectionDepth(u32),

    #[error("History capacity must be at least 1, got {0}")]
    InvalidHistoryCapacity(usize),

    #[error("Register component at index {0} is not finite")]
    NonFiniteComponent(usize),
}

/// Errors raised by the correction path
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CorrectionError {
    #[error("Correction depth limit reached: {depth} of {max} corrections already applied")]
    DepthExceeded { depth: u32, max: u32 },

    #[error("Corrected state alignment {score:.4} is below threshold {threshold:.4}")]
    ThresholdViolation { score: f64, threshold: f64 },

    #[error("No correction to revert")]
    NothingToRevert,
}

impl NoesisError {
    /// Add context to an error
    pub fn context(self, context: impl Into<String>) -> Self {
        Self::WithContext {
            context: context.into(),
            source: Box::new(self),
        }
    }
}

/// Extension trait for adding context to Results
pub trait ResultExt<T> {
    /// Add context to a Result
    fn context(self, context: impl Into<String>) -> Result<T>;

    /// Add lazy context to a Result
    fn with_context<F>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> String;
}

impl<T> ResultExt<T> for Result<T> {
    fn context(self, context: impl Into<String>) -> Result<T> {
        self.map_err(|e| e.context(context))
    }

    fn with_context<F>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> String,
    {
        self.map_err(|e| e.context(f()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_context() {
        let err = CorrectionError::DepthExceeded { depth: 8, max: 8 };
        let err = NoesisError::from(err);
        let err = err.context("Failed to apply correction");

        assert!(err.to_string().contains("Failed to apply correction"));
    }

    #[test]
    fn test_result_ext() {
        let result: Result<()> = Err(ConfigError::InvalidRegisterLength(0).into());
        let result = result.context("Engine construction failed");

        assert!(result.is_err());
        assert!(result
            .unwrap_err()
            .to_string()
            .contains("Engine construction failed"));
    }

    #[test]
    fn test_threshold_error_display() {
        let err = ConfigError::ThresholdOutOfRange {
            name: "alignment_threshold",
            value: 0.5,
            min: 0.8,
            max: 1.0,
        };
        let msg = err.to_string();
        assert!(msg.contains("alignment_threshold"));
        assert!(msg.contains("0.5"));
    }
}
