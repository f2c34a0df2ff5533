//! Configuration Module
//!
//! Handles loading and managing server configuration from environment variables.

use std::env;
use std::str::FromStr;

/// Expiration applied by the sample service to every cache write.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryOptionsSettings {
    /// Absolute expiration, in hours from the time of the write
    pub absolute_expiration_hours: u64,
    /// Sliding expiration, in minutes
    pub sliding_expiration_minutes: u64,
}

impl Default for EntryOptionsSettings {
    fn default() -> Self {
        Self {
            absolute_expiration_hours: 8,
            sliding_expiration_minutes: 60,
        }
    }
}

/// Server configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// Maximum number of entries the in-memory store can hold
    pub max_entries: usize,
    /// Largest blob the in-memory store accepts, in bytes
    pub max_value_size: usize,
    /// HTTP server port
    pub server_port: u16,
    /// Background cleanup task interval in seconds
    pub cleanup_interval: u64,
    /// Expiration policy for cache writes
    pub entry_options: EntryOptionsSettings,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `MAX_ENTRIES` - Maximum cache entries (default: 1000)
    /// - `MAX_VALUE_SIZE` - Maximum blob size in bytes (default: 1 MiB)
    /// - `SERVER_PORT` - HTTP server port (default: 3000)
    /// - `CLEANUP_INTERVAL` - Cleanup frequency in seconds (default: 1)
    /// - `ABSOLUTE_EXPIRATION_HOURS` - Absolute expiration (default: 8)
    /// - `SLIDING_EXPIRATION_MINUTES` - Sliding expiration (default: 60)
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            max_entries: env_or("MAX_ENTRIES", defaults.max_entries),
            max_value_size: env_or("MAX_VALUE_SIZE", defaults.max_value_size),
            server_port: env_or("SERVER_PORT", defaults.server_port),
            cleanup_interval: env_or("CLEANUP_INTERVAL", defaults.cleanup_interval),
            entry_options: EntryOptionsSettings {
                absolute_expiration_hours: env_or(
                    "ABSOLUTE_EXPIRATION_HOURS",
                    defaults.entry_options.absolute_expiration_hours,
                ),
                sliding_expiration_minutes: env_or(
                    "SLIDING_EXPIRATION_MINUTES",
                    defaults.entry_options.sliding_expiration_minutes,
                ),
            },
        }
    }
}

fn env_or<T: FromStr>(name: &str, default: T) -> T {
    env::var(name)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

impl Default for Config {
    fn default() -> Self {
        Self {
            max_entries: 1000,
            max_value_size: crate::cache::DEFAULT_MAX_VALUE_SIZE,
            server_port: 3000,
            cleanup_interval: 1,
            entry_options: EntryOptionsSettings::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_default() {
        let config = Config::default();
        assert_eq!(config.max_entries, 1000);
        assert_eq!(config.max_value_size, 1024 * 1024);
        assert_eq!(config.server_port, 3000);
        assert_eq!(config.cleanup_interval, 1);
        assert_eq!(config.entry_options.absolute_expiration_hours, 8);
        assert_eq!(config.entry_options.sliding_expiration_minutes, 60);
    }

    #[test]
    fn test_config_from_env_defaults() {
        // Clear any existing env vars to test defaults
        env::remove_var("MAX_ENTRIES");
        env::remove_var("MAX_VALUE_SIZE");
        env::remove_var("SERVER_PORT");
        env::remove_var("CLEANUP_INTERVAL");
        env::remove_var("ABSOLUTE_EXPIRATION_HOURS");
        env::remove_var("SLIDING_EXPIRATION_MINUTES");

        let config = Config::from_env();
        assert_eq!(config.max_entries, 1000);
        assert_eq!(config.server_port, 3000);
        assert_eq!(config.entry_options, EntryOptionsSettings::default());
    }

    #[test]
    fn test_env_or_ignores_garbage() {
        env::set_var("DISTRIBUTED_CACHE_TEST_GARBAGE", "not-a-number");
        let value: u64 = env_or("DISTRIBUTED_CACHE_TEST_GARBAGE", 7);
        assert_eq!(value, 7);
        env::remove_var("DISTRIBUTED_CACHE_TEST_GARBAGE");
    }
}
