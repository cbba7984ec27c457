//! Configuration for an [`ActorSystem`](crate::runtime::ActorSystem).

use crate::framework::FrameworkError;
use serde::{Deserialize, Serialize};
use std::time::Duration;

pub const INACTIVITY_TIMEOUT_ENV: &str = "DATAFLOW_INACTIVITY_TIMEOUT_MS";
pub const DRAIN_TIMEOUT_ENV: &str = "DATAFLOW_DRAIN_TIMEOUT_MS";

const DEFAULT_DRAIN_TIMEOUT_MS: u64 = 10_000;

/// Timing knobs of an actor system.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SystemConfig {
    /// Wall-clock budget of one `run()`, in milliseconds.
    pub inactivity_timeout_ms: u64,

    /// How long a sink stream waits for the next item, in milliseconds.
    #[serde(default = "default_drain_timeout_ms")]
    pub drain_timeout_ms: u64,
}

fn default_drain_timeout_ms() -> u64 {
    DEFAULT_DRAIN_TIMEOUT_MS
}

fn as_millis(duration: Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}

impl SystemConfig {
    pub fn new(inactivity_timeout: Duration) -> Self {
        Self {
            inactivity_timeout_ms: as_millis(inactivity_timeout),
            drain_timeout_ms: DEFAULT_DRAIN_TIMEOUT_MS,
        }
    }

    pub fn with_drain_timeout(mut self, drain_timeout: Duration) -> Self {
        self.drain_timeout_ms = as_millis(drain_timeout);
        self
    }

    pub fn inactivity_timeout(&self) -> Duration {
        Duration::from_millis(self.inactivity_timeout_ms)
    }

    pub fn drain_timeout(&self) -> Duration {
        Duration::from_millis(self.drain_timeout_ms)
    }

    /// Load configuration from environment variables.
    ///
    /// `DATAFLOW_INACTIVITY_TIMEOUT_MS` falls back to `default_inactivity`,
    /// `DATAFLOW_DRAIN_TIMEOUT_MS` to ten seconds.
    pub fn from_env(default_inactivity: Duration) -> Result<Self, FrameworkError> {
        Self::from_lookup(default_inactivity, |key| std::env::var(key).ok())
    }

    /// Same as [`SystemConfig::from_env`] with a custom variable source.
    pub fn from_lookup(
        default_inactivity: Duration,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, FrameworkError> {
        let mut config = Self::new(default_inactivity);
        if let Some(ms) = parse_millis(INACTIVITY_TIMEOUT_ENV, &lookup)? {
            config.inactivity_timeout_ms = ms;
        }
        if let Some(ms) = parse_millis(DRAIN_TIMEOUT_ENV, &lookup)? {
            config.drain_timeout_ms = ms;
        }
        Ok(config)
    }
}

fn parse_millis(
    key: &'static str,
    lookup: &impl Fn(&str) -> Option<String>,
) -> Result<Option<u64>, FrameworkError> {
    match lookup(key) {
        None => Ok(None),
        Some(value) => value
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| FrameworkError::InvalidConfig { key, value }),
    }
}
