//! Engine configuration.

use std::env;
use std::time::Duration;

use crate::types::{COMMAND_QUEUE_CAPACITY, FALL_INTERVAL_MS, FRAGMENT_STEP_MS};

/// Engine configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineConfig {
    /// Gravity interval of the active piece
    pub fall_interval: Duration,
    /// Pause between two animation steps of a falling fragment
    pub fragment_step: Duration,
    /// Bound of the command queue
    pub queue_capacity: usize,
    /// Seed of the shape generator
    pub seed: u32,
    /// Complete rows placed at the bottom before the first piece
    pub prefill_rows: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            fall_interval: Duration::from_millis(FALL_INTERVAL_MS),
            fragment_step: Duration::from_millis(FRAGMENT_STEP_MS),
            queue_capacity: COMMAND_QUEUE_CAPACITY,
            seed: 1,
            prefill_rows: 0,
        }
    }
}

impl EngineConfig {
    /// Create from environment variables, falling back to defaults
    ///
    /// - `CASCADE_FALL_MS`: gravity interval in milliseconds
    /// - `CASCADE_FRAGMENT_MS`: fragment animation step in milliseconds
    /// - `CASCADE_QUEUE_CAPACITY`: command queue bound (at least 1)
    /// - `CASCADE_SEED`: shape generator seed
    /// - `CASCADE_PREFILL_ROWS`: complete rows to start with
    pub fn from_env() -> Self {
        let defaults = Self::default();

        let fall_interval = parse_var::<u64>("CASCADE_FALL_MS")
            .map(Duration::from_millis)
            .unwrap_or(defaults.fall_interval);

        let fragment_step = parse_var::<u64>("CASCADE_FRAGMENT_MS")
            .map(Duration::from_millis)
            .unwrap_or(defaults.fragment_step);

        let queue_capacity = parse_var::<usize>("CASCADE_QUEUE_CAPACITY")
            .unwrap_or(defaults.queue_capacity)
            .max(1);

        let seed = parse_var::<u32>("CASCADE_SEED").unwrap_or(defaults.seed);

        let prefill_rows = parse_var::<usize>("CASCADE_PREFILL_ROWS").unwrap_or(defaults.prefill_rows);

        Self {
            fall_interval,
            fragment_step,
            queue_capacity,
            seed,
            prefill_rows,
        }
    }

    /// Zero-delay configuration for headless runs and tests
    pub fn instant() -> Self {
        Self {
            fall_interval: Duration::ZERO,
            fragment_step: Duration::ZERO,
            ..Self::default()
        }
    }

    pub fn with_seed(mut self, seed: u32) -> Self {
        self.seed = seed;
        self
    }

    pub fn with_prefill_rows(mut self, rows: usize) -> Self {
        self.prefill_rows = rows;
        self
    }
}

fn parse_var<T: std::str::FromStr>(key: &str) -> Option<T> {
    env::var(key).ok().and_then(|s| s.trim().parse().ok())
}
