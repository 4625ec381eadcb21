//! Runtime configuration parsed from environment variables.
//!
//! Every knob has a default; malformed values fall back to it so a typo in
//! the environment never keeps the server from starting.

use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_PORT: u16 = 8080;
pub const DEFAULT_STATIC_DIR: &str = "public";
pub const DEFAULT_CLOCK_TICK_MS: u64 = 1000;
pub const DEFAULT_STATUS_PULSE_MS: u64 = 500;
pub const DEFAULT_CLIENT_QUEUE_CAPACITY: usize = 256;

/// Timing and queue settings consumed by the session registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timing {
    /// Period of one clock tick.
    pub tick: Duration,
    /// How long the status-message animation flag stays raised.
    pub pulse: Duration,
    /// Outbound queue depth per connected channel.
    pub client_queue: usize,
}

impl Default for Timing {
    fn default() -> Self {
        Self {
            tick: Duration::from_millis(DEFAULT_CLOCK_TICK_MS),
            pulse: Duration::from_millis(DEFAULT_STATUS_PULSE_MS),
            client_queue: DEFAULT_CLIENT_QUEUE_CAPACITY,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub port: u16,
    pub static_dir: PathBuf,
    pub timing: Timing,
}

impl Config {
    /// Build config from environment variables.
    ///
    /// Optional:
    /// - `PORT`: default 8080
    /// - `STATIC_DIR`: default `public`
    /// - `CLOCK_TICK_MS`: default 1000
    /// - `STATUS_PULSE_MS`: default 500
    /// - `CLIENT_QUEUE_CAPACITY`: default 256
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build config from an arbitrary key lookup. `from_env` delegates here so
    /// tests can supply values without touching the process environment.
    #[must_use]
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let static_dir = lookup("STATIC_DIR")
            .filter(|v| !v.trim().is_empty())
            .map_or_else(|| PathBuf::from(DEFAULT_STATIC_DIR), PathBuf::from);

        let timing = Timing {
            tick: Duration::from_millis(nonzero(parse_or(&lookup, "CLOCK_TICK_MS", DEFAULT_CLOCK_TICK_MS), DEFAULT_CLOCK_TICK_MS)),
            pulse: Duration::from_millis(nonzero(
                parse_or(&lookup, "STATUS_PULSE_MS", DEFAULT_STATUS_PULSE_MS),
                DEFAULT_STATUS_PULSE_MS,
            )),
            client_queue: nonzero(
                parse_or(&lookup, "CLIENT_QUEUE_CAPACITY", DEFAULT_CLIENT_QUEUE_CAPACITY),
                DEFAULT_CLIENT_QUEUE_CAPACITY,
            ),
        };

        Self { port: parse_or(&lookup, "PORT", DEFAULT_PORT), static_dir, timing }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self { port: DEFAULT_PORT, static_dir: PathBuf::from(DEFAULT_STATIC_DIR), timing: Timing::default() }
    }
}

fn parse_or<T>(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: T) -> T
where
    T: std::str::FromStr + Copy,
{
    lookup(key)
        .and_then(|v| v.trim().parse::<T>().ok())
        .unwrap_or(default)
}

fn nonzero<T>(value: T, default: T) -> T
where
    T: PartialEq + Default,
{
    if value == T::default() { default } else { value }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
