//! Transport configuration.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Default request timeout in seconds.
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Configuration for the native transport.
///
/// Timeouts live here and nowhere else: the chain engine itself has no
/// notion of time and just awaits the transport.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransportConfig {
    /// Maximum time to wait for a complete response, in seconds. Covers
    /// connection, headers, and body download.
    pub timeout_secs: u64,
}

impl TransportConfig {
    /// Creates a config with the given timeout.
    pub fn new(timeout_secs: u64) -> Self {
        Self { timeout_secs }
    }

    /// Returns the timeout as a `std::time::Duration`.
    pub fn timeout_duration(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new() {
        let config = TransportConfig::new(60);
        assert_eq!(config.timeout_secs, 60);
    }

    #[test]
    fn test_default() {
        assert_eq!(TransportConfig::default().timeout_secs, 30);
    }

    #[test]
    fn test_timeout_duration() {
        let config = TransportConfig::new(45);
        assert_eq!(config.timeout_duration(), Duration::from_secs(45));
    }

    #[test]
    fn test_serialization() {
        let config = TransportConfig::new(120);
        let json = serde_json::to_string(&config).unwrap();
        assert!(json.contains("120"));

        let back: TransportConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(back, config);
    }
}
