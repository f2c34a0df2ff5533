//! Cache Entry Options Module
//!
//! Expiration policy attached to every write.

use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::config::EntryOptionsSettings;
use crate::error::{CacheError, Result};

// == Cache Entry Options ==
/// Expiration policy passed to the store alongside every value.
///
/// The manager never interprets these fields beyond validating them; the
/// store decides what absolute and sliding expiration mean for its backend.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheEntryOptions {
    /// Instant after which the entry is gone regardless of access
    pub absolute_expiration: Option<DateTime<Utc>>,
    /// Idle time after which the entry is gone; reset on every read or refresh
    pub sliding_expiration: Option<Duration>,
}

impl CacheEntryOptions {
    /// Creates an empty policy. Call one of the `with_*` builders before use.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the absolute expiration instant.
    pub fn with_absolute_expiration(mut self, at: DateTime<Utc>) -> Self {
        self.absolute_expiration = Some(at);
        self
    }

    /// Sets the absolute expiration relative to now.
    pub fn with_absolute_expiration_in(self, after: Duration) -> Self {
        let at = chrono::Duration::from_std(after)
            .ok()
            .and_then(|after| Utc::now().checked_add_signed(after))
            .unwrap_or(DateTime::<Utc>::MAX_UTC);
        self.with_absolute_expiration(at)
    }

    /// Sets the sliding expiration window.
    pub fn with_sliding_expiration(mut self, window: Duration) -> Self {
        self.sliding_expiration = Some(window);
        self
    }

    /// Builds the policy the sample service uses for every write.
    ///
    /// Out-of-range settings saturate rather than overflow.
    pub fn from_settings(settings: &EntryOptionsSettings) -> Self {
        Self::new()
            .with_absolute_expiration_in(Duration::from_secs(
                settings.absolute_expiration_hours.saturating_mul(3600),
            ))
            .with_sliding_expiration(Duration::from_secs(
                settings.sliding_expiration_minutes.saturating_mul(60),
            ))
    }

    // == Validate ==
    /// Rejects a policy that the store could not honor.
    ///
    /// An empty policy counts as a missing one.
    pub fn validate(&self) -> Result<()> {
        if self.absolute_expiration.is_none() && self.sliding_expiration.is_none() {
            return Err(CacheError::invalid_argument(
                "options",
                "an absolute or sliding expiration is required",
            ));
        }

        if let Some(at) = self.absolute_expiration {
            if at <= Utc::now() {
                return Err(CacheError::invalid_argument(
                    "options",
                    "absolute expiration must be in the future",
                ));
            }
        }

        if self.sliding_expiration == Some(Duration::ZERO) {
            return Err(CacheError::invalid_argument(
                "options",
                "sliding expiration must be positive",
            ));
        }

        Ok(())
    }
}
