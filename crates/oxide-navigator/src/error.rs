//! Error types for route registration and resolution.

use thiserror::Error;

/// Navigator-specific errors.
///
/// A path that matches no registered route is not an error: it resolves to
/// the not-found route when one is configured.
#[derive(Debug, Error)]
pub enum NavigatorError {
    /// A route pattern could not be compiled.
    #[error("invalid route pattern `{pattern}`: {reason}")]
    InvalidPattern {
        /// The offending pattern.
        pattern: String,
        /// What is wrong with it.
        reason: String,
    },

    /// Nothing matched and no not-found route is registered.
    #[error("no route matched `{name}` and no not-found route is configured")]
    NoRouteConfigured {
        /// The requested route name.
        name: String,
    },

    /// Middleware kept redirecting past the configured bound.
    #[error("redirect limit of {limit} exceeded while resolving `{name}`")]
    RedirectLoop {
        /// The originally requested route name.
        name: String,
        /// The configured maximum number of redirect hops.
        limit: usize,
    },

    /// Configuration values are out of range.
    #[error("invalid navigator configuration: {0}")]
    InvalidConfig(String),

    /// Configuration could not be deserialized.
    #[error("configuration error: {0}")]
    Config(#[from] serde_json::Error),
}

impl NavigatorError {
    pub(crate) fn invalid_pattern(pattern: &str, reason: impl Into<String>) -> Self {
        Self::InvalidPattern {
            pattern: pattern.to_string(),
            reason: reason.into(),
        }
    }
}

/// Result type alias for navigator operations.
pub type Result<T> = std::result::Result<T, NavigatorError>;
