use serde::{Deserialize, Serialize};

use crate::display::DisplayConfig;
use crate::modes::Mode;

/// Pool used when no NTP server is configured.
pub const DEFAULT_NTP_SERVER: &str = "pool.ntp.org";

#[derive(Serialize, Deserialize, Debug, Default, Clone, Copy, PartialEq)]
#[serde(bound(deserialize = "'de: 'a"))]
pub struct Config<'a> {
    pub internet: InternetConfig<'a>,
    pub display: DisplayConfig,
    pub app: AppConfig,
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub struct InternetConfig<'a> {
    pub ssid: &'a str,
    pub password: &'a str,
    /// Hostname of the SNTP server.
    pub ntp_server: &'a str,
}

impl Default for InternetConfig<'_> {
    fn default() -> Self {
        Self {
            ssid: "",
            password: "",
            ntp_server: DEFAULT_NTP_SERVER,
        }
    }
}

/// Render loop settings.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub struct AppConfig {
    /// Visualization shown after startup.
    pub mode: Mode,
    /// Local time offset from UTC, applied to the wall clock.
    pub utc_offset_secs: i32,
    /// Minimum time between two sensor transactions.
    pub sensor_poll_interval_ms: u64,
    /// Readings older than this are shown as stale.
    pub sensor_stale_after_ms: u64,
    /// Target time between frames; 0 renders back to back.
    pub frame_interval_ms: u64,
    /// Seed for the starfield's random generator.
    pub star_seed: u64,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            mode: Mode::default(),
            utc_offset_secs: 0,
            sensor_poll_interval_ms: 2_000,
            sensor_stale_after_ms: 5 * 60 * 1_000,
            frame_interval_ms: 33,
            star_seed: 0x5EED_0F_57A2,
        }
    }
}
