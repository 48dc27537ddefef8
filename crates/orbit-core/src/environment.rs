//! Environment inputs: temperature/humidity and wall-clock time.
//!
//! [`EnvironmentSource`] is the narrow interface the render loop reads from.
//! [`EnvironmentCache`] keeps the last successful sensor reading so that a
//! failed I2C transaction does not blank the display, and reports readings as
//! stale once they are older than the configured window.

use log::{debug, info, warn};

use crate::sensors::SensorError;
use crate::time::{TimeError, TimeSample};

/// One temperature/humidity measurement.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EnvironmentReading {
    pub temperature_c: f32,
    pub humidity_pct: f32,
}

/// External collaborator supplying sensor readings and wall-clock time.
pub trait EnvironmentSource {
    /// Perform one sensor transaction.
    fn read_environment(&mut self) -> impl Future<Output = Result<EnvironmentReading, SensorError>>;

    /// Current local wall-clock time, or [`TimeError::NotSynchronized`] if
    /// no time sync has completed yet.
    fn read_wall_clock(&mut self) -> Result<TimeSample, TimeError>;
}

/// What renderers get to see of the environment.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum EnvironmentStatus {
    /// Reading younger than the staleness window.
    Fresh(EnvironmentReading),
    /// Last known good reading, older than the staleness window.
    Stale {
        reading: EnvironmentReading,
        age_ms: u64,
    },
    /// No reading has ever succeeded.
    Unavailable,
}

impl EnvironmentStatus {
    /// The reading to display, fresh or stale.
    pub fn reading(&self) -> Option<EnvironmentReading> {
        match *self {
            EnvironmentStatus::Fresh(reading) => Some(reading),
            EnvironmentStatus::Stale { reading, .. } => Some(reading),
            EnvironmentStatus::Unavailable => None,
        }
    }

    pub fn is_stale(&self) -> bool {
        matches!(self, EnvironmentStatus::Stale { .. })
    }
}

/// Last-known-good cache for sensor readings.
#[derive(Debug, Clone)]
pub struct EnvironmentCache {
    last_good: Option<(EnvironmentReading, u64)>,
    stale_after_ms: u64,
    consecutive_failures: u32,
}

impl EnvironmentCache {
    pub const fn new(stale_after_ms: u64) -> Self {
        Self {
            last_good: None,
            stale_after_ms,
            consecutive_failures: 0,
        }
    }

    /// Record the outcome of a sensor transaction taken at `now_ms`.
    ///
    /// Failures leave the previous reading in place.
    pub fn record(&mut self, result: Result<EnvironmentReading, SensorError>, now_ms: u64) {
        match result {
            Ok(reading) => {
                if self.consecutive_failures > 0 {
                    info!(
                        "Sensor recovered after {} failed reads",
                        self.consecutive_failures
                    );
                }
                debug!(
                    "Sensor reading: {:.2} C, {:.1} %",
                    reading.temperature_c, reading.humidity_pct
                );
                self.consecutive_failures = 0;
                self.last_good = Some((reading, now_ms));
            }
            Err(e) => {
                self.consecutive_failures = self.consecutive_failures.saturating_add(1);
                match self.last_good {
                    Some((_, taken_ms)) => warn!(
                        "Sensor read failed ({}), keeping reading from {} ms ago",
                        e,
                        now_ms.saturating_sub(taken_ms)
                    ),
                    None => warn!("Sensor read failed ({}), no reading available yet", e),
                }
            }
        }
    }

    /// Status of the cached reading at `now_ms`.
    pub fn status(&self, now_ms: u64) -> EnvironmentStatus {
        match self.last_good {
            None => EnvironmentStatus::Unavailable,
            Some((reading, taken_ms)) => {
                let age_ms = now_ms.saturating_sub(taken_ms);
                if age_ms > self.stale_after_ms {
                    EnvironmentStatus::Stale { reading, age_ms }
                } else {
                    EnvironmentStatus::Fresh(reading)
                }
            }
        }
    }

    pub fn consecutive_failures(&self) -> u32 {
        self.consecutive_failures
    }
}
