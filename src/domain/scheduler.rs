//! Fixed-interval polling loop.
//!
//! The scheduler owns no I/O: each tick is a caller-supplied closure and
//! sleeping goes through an injected sleeper, so tests can run many
//! cycles instantly.

use crate::domain::error::ScanError;
use std::time::Duration;
use tracing::{debug, error};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Scheduler {
    pub interval: Duration,
    pub error_pause: Duration,
    /// `None` runs until the process is interrupted.
    pub max_cycles: Option<u64>,
}

impl Default for Scheduler {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(30),
            error_pause: Duration::from_secs(10),
            max_cycles: None,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SchedulerStats {
    pub cycles: u64,
    pub failures: u64,
}

impl Scheduler {
    pub fn once() -> Self {
        Self {
            max_cycles: Some(1),
            ..Self::default()
        }
    }

    /// Run `tick` once per cycle, numbering cycles from 1. A failed tick is
    /// logged and followed by `error_pause` instead of `interval`; an error
    /// that is not recoverable stops the loop and is returned. No sleep
    /// follows the final cycle.
    pub fn run<T, S>(&self, mut tick: T, mut sleep: S) -> Result<SchedulerStats, ScanError>
    where
        T: FnMut(u64) -> Result<(), ScanError>,
        S: FnMut(Duration),
    {
        let mut stats = SchedulerStats::default();

        loop {
            let cycle = stats.cycles + 1;
            let pause = match tick(cycle) {
                Ok(()) => {
                    debug!(cycle, "cycle complete");
                    self.interval
                }
                Err(e) if !e.is_recoverable() => {
                    error!(cycle, error = %e, "fatal error, stopping scheduler");
                    return Err(e);
                }
                Err(e) => {
                    error!(cycle, error = %e, "cycle failed");
                    stats.failures += 1;
                    self.error_pause
                }
            };
            stats.cycles = cycle;

            if self.max_cycles.is_some_and(|max| stats.cycles >= max) {
                return Ok(stats);
            }
            sleep(pause);
        }
    }
}
