use std::{env, time::Duration};

use eventide_core::calendar::{DEFAULT_FUTURE_MONTHS, DEFAULT_HEADER};

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// Months covered by the default listing (default: 3)
    pub default_future_months: u32,
    /// Header of the default listing (default: "Upcoming Events")
    pub default_header: String,
    /// Longest window a single request may ask for, in days (default: 732)
    pub max_window_days: i64,
    /// Request timeout in seconds (default: 10)
    pub request_timeout_seconds: u64,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// Environment variables:
    /// - `DEFAULT_FUTURE_MONTHS` - Months in the default listing (default: 3)
    /// - `DEFAULT_HEADER` - Header of the default listing (default: "Upcoming Events")
    /// - `MAX_WINDOW_DAYS` - Longest accepted window in days (default: 732)
    /// - `REQUEST_TIMEOUT_SECONDS` - Request timeout (default: 10)
    pub fn from_env() -> Self {
        Self {
            default_future_months: env::var("DEFAULT_FUTURE_MONTHS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(DEFAULT_FUTURE_MONTHS),
            default_header: env::var("DEFAULT_HEADER")
                .ok()
                .filter(|v| !v.trim().is_empty())
                .unwrap_or_else(|| DEFAULT_HEADER.to_string()),
            max_window_days: env::var("MAX_WINDOW_DAYS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(732),
            request_timeout_seconds: env::var("REQUEST_TIMEOUT_SECONDS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(10),
        }
    }

    /// Get the request timeout as a Duration.
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_seconds)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_env()
    }
}
