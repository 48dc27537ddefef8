//! Time-of-day samples and the NTP-anchored wall clock.
//!
//! Two sources feed the renderers and they are not interchangeable:
//!
//! - **Uptime**: [`TimeSample::from_uptime_ms`] turns the monotonic uptime
//!   counter into a time of day. It always succeeds, starts at 00:00:00 on
//!   every boot, and is used by modes that only need a moving clock.
//! - **Wall clock**: [`WallClock`] extrapolates from the last successful NTP
//!   sync using uptime. Until the first sync it reports
//!   [`TimeError::NotSynchronized`].

use core::fmt;

use log::debug;
use thiserror_no_std::Error;

const SECONDS_PER_MINUTE: u64 = 60;
const SECONDS_PER_HOUR: u64 = 3_600;
const SECONDS_PER_DAY: u64 = 86_400;

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeError {
    #[error("wall clock has not been synchronized")]
    NotSynchronized,
    #[error("time component out of range")]
    OutOfRange,
}

/// A time of day with whole-second resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TimeSample {
    /// 0–23
    pub hours: u8,
    /// 0–59
    pub minutes: u8,
    /// 0–59
    pub seconds: u8,
}

impl TimeSample {
    pub fn new(hours: u8, minutes: u8, seconds: u8) -> Result<Self, TimeError> {
        if hours > 23 || minutes > 59 || seconds > 59 {
            return Err(TimeError::OutOfRange);
        }
        Ok(Self {
            hours,
            minutes,
            seconds,
        })
    }

    /// Time of day for a count of seconds since midnight (wraps every 24 h).
    pub const fn from_seconds_of_day(seconds: u64) -> Self {
        let seconds = seconds % SECONDS_PER_DAY;
        Self {
            hours: (seconds / SECONDS_PER_HOUR) as u8,
            minutes: ((seconds % SECONDS_PER_HOUR) / SECONDS_PER_MINUTE) as u8,
            seconds: (seconds % SECONDS_PER_MINUTE) as u8,
        }
    }

    /// Uptime-derived time of day; 00:00:00 at boot.
    pub const fn from_uptime_ms(uptime_ms: u64) -> Self {
        Self::from_seconds_of_day(uptime_ms / 1_000)
    }

    /// Local time of day for a Unix timestamp shifted by `utc_offset_secs`.
    pub const fn from_unix(unix_secs: u64, utc_offset_secs: i32) -> Self {
        let local = unix_secs as i64 + utc_offset_secs as i64;
        Self::from_seconds_of_day(local.rem_euclid(SECONDS_PER_DAY as i64) as u64)
    }

    pub const fn seconds_of_day(&self) -> u32 {
        self.hours as u32 * 3_600 + self.minutes as u32 * 60 + self.seconds as u32
    }
}

impl fmt::Display for TimeSample {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}:{:02}", self.hours, self.minutes, self.seconds)
    }
}

/// The moment of the last successful sync.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct SyncAnchor {
    unix_secs: u64,
    uptime_ms: u64,
}

/// Wall-clock time anchored to the last NTP sync and advanced by uptime.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WallClock {
    anchor: Option<SyncAnchor>,
    utc_offset_secs: i32,
}

impl WallClock {
    pub const fn new(utc_offset_secs: i32) -> Self {
        Self {
            anchor: None,
            utc_offset_secs,
        }
    }

    /// Record a successful sync: `unix_secs` was true at `uptime_ms`.
    pub fn synchronize(&mut self, unix_secs: u64, uptime_ms: u64) {
        if let Some(previous) = self.anchor {
            // Positive drift means the local uptime clock ran slow.
            let predicted = previous.unix_secs as i64
                + (uptime_ms.saturating_sub(previous.uptime_ms) / 1_000) as i64;
            debug!(
                "Wall clock resync: drift {}s",
                unix_secs as i64 - predicted
            );
        }
        self.anchor = Some(SyncAnchor {
            unix_secs,
            uptime_ms,
        });
    }

    pub const fn is_synchronized(&self) -> bool {
        self.anchor.is_some()
    }

    pub const fn utc_offset_secs(&self) -> i32 {
        self.utc_offset_secs
    }

    /// Unix seconds at `uptime_ms`.
    pub fn unix_now(&self, uptime_ms: u64) -> Result<u64, TimeError> {
        let anchor = self.anchor.ok_or(TimeError::NotSynchronized)?;
        let elapsed_secs = uptime_ms.saturating_sub(anchor.uptime_ms) / 1_000;
        Ok(anchor.unix_secs + elapsed_secs)
    }

    /// Local time of day at `uptime_ms`.
    pub fn now(&self, uptime_ms: u64) -> Result<TimeSample, TimeError> {
        let unix = self.unix_now(uptime_ms)?;
        Ok(TimeSample::from_unix(unix, self.utc_offset_secs))
    }
}

impl Default for WallClock {
    fn default() -> Self {
        Self::new(0)
    }
}
