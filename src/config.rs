//! Event runner settings, read from the environment with defaults.

use std::str::FromStr;

/// Settings for `run_event`.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct RunnerConfig {
    /// Swiss rounds before the top cut (`ROUNDS`).
    pub swiss_rounds: u32,
    /// Players seeded straight into the final (`AUTO_FINAL`).
    pub auto_final: usize,
    /// Players seated in semi-final pods (`SEMI_FINAL`).
    pub semi_final: usize,
    /// Seed for simulated pod results (`RESULT_SEED`).
    pub result_seed: u64,
    /// Buffered change notices per subscriber (`NOTIFY_CAPACITY`).
    pub notify_capacity: usize,
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self {
            swiss_rounds: 3,
            auto_final: 1,
            semi_final: 4,
            result_seed: 0,
            notify_capacity: 64,
        }
    }
}

fn parse_or<T: FromStr>(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: T) -> T {
    match lookup(key) {
        Some(raw) => raw.trim().parse().unwrap_or_else(|_| {
            log::warn!("ignoring invalid {}={:?}", key, raw);
            default
        }),
        None => default,
    }
}

impl RunnerConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key lookup; unset or unparsable keys keep their defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let d = Self::default();
        Self {
            swiss_rounds: parse_or(&lookup, "ROUNDS", d.swiss_rounds),
            auto_final: parse_or(&lookup, "AUTO_FINAL", d.auto_final),
            semi_final: parse_or(&lookup, "SEMI_FINAL", d.semi_final),
            result_seed: parse_or(&lookup, "RESULT_SEED", d.result_seed),
            notify_capacity: parse_or(&lookup, "NOTIFY_CAPACITY", d.notify_capacity),
        }
    }
}
