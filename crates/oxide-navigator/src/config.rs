//! Navigator configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{NavigatorError, Result};

/// Default page transition duration.
pub const DEFAULT_TRANSITION_DURATION: Duration = Duration::from_millis(300);

/// Default maximum number of redirect hops per resolution.
pub const DEFAULT_MAX_REDIRECTS: usize = 16;

/// Settings shared by every resolution of a navigator.
///
/// Deserializes from JSON such as
/// `{"default_transition_duration": 250, "max_redirects": 8}`, where the
/// duration is in milliseconds. Missing fields take their defaults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NavigatorConfig {
    /// Transition duration for routes that do not declare one.
    #[serde(with = "millis")]
    pub default_transition_duration: Duration,
    /// How many redirects a single resolution may follow.
    pub max_redirects: usize,
}

impl Default for NavigatorConfig {
    fn default() -> Self {
        Self {
            default_transition_duration: DEFAULT_TRANSITION_DURATION,
            max_redirects: DEFAULT_MAX_REDIRECTS,
        }
    }
}

impl NavigatorConfig {
    /// Creates the default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the default transition duration.
    #[must_use]
    pub fn with_default_transition_duration(mut self, duration: Duration) -> Self {
        self.default_transition_duration = duration;
        self
    }

    /// Sets the redirect bound.
    #[must_use]
    pub fn with_max_redirects(mut self, max_redirects: usize) -> Self {
        self.max_redirects = max_redirects;
        self
    }

    /// Parses and validates a JSON configuration.
    ///
    /// # Errors
    ///
    /// Returns [`NavigatorError::Config`] for malformed JSON and
    /// [`NavigatorError::InvalidConfig`] for out-of-range values.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Checks that the values are usable.
    ///
    /// # Errors
    ///
    /// Returns [`NavigatorError::InvalidConfig`] if `max_redirects` is zero.
    pub fn validate(&self) -> Result<()> {
        if self.max_redirects == 0 {
            return Err(NavigatorError::InvalidConfig(
                "max_redirects must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

mod millis {
    use std::time::Duration;

    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u64(u64::try_from(duration.as_millis()).unwrap_or(u64::MAX))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        u64::deserialize(deserializer).map(Duration::from_millis)
    }
}
