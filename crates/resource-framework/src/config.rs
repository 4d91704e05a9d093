//! Store configuration.
//!
//! Configuration is passed in when the system is wired, never read from
//! global state by the core. [`StoreConfig::from_env`] is a convenience for
//! binaries.

use serde::{Deserialize, Serialize};
use tracing::warn;

/// Environment variable read by [`StoreConfig::from_env`].
pub const BUFFER_ENV: &str = "RESOURCE_STORE_BUFFER";

const DEFAULT_BUFFER: usize = 32;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// Capacity of the store actor's request channel.
    pub buffer_size: usize,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            buffer_size: DEFAULT_BUFFER,
        }
    }
}

impl StoreConfig {
    pub fn from_env() -> Self {
        Self::from_value(std::env::var(BUFFER_ENV).ok().as_deref())
    }

    fn from_value(raw: Option<&str>) -> Self {
        let Some(raw) = raw else {
            return Self::default();
        };
        match raw.trim().parse::<usize>() {
            Ok(n) if n > 0 => Self { buffer_size: n },
            _ => {
                warn!(var = BUFFER_ENV, value = raw, "Ignoring invalid buffer size");
                Self::default()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_when_unset() {
        assert_eq!(StoreConfig::from_value(None), StoreConfig::default());
    }

    #[test]
    fn test_parses_positive_values() {
        assert_eq!(StoreConfig::from_value(Some(" 8 ")).buffer_size, 8);
    }

    #[test]
    fn test_invalid_values_fall_back() {
        assert_eq!(StoreConfig::from_value(Some("0")).buffer_size, DEFAULT_BUFFER);
        assert_eq!(StoreConfig::from_value(Some("lots")).buffer_size, DEFAULT_BUFFER);
    }
}
