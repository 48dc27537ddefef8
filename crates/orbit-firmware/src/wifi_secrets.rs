//! Build-time settings exported by `build.rs` from `.env`.

use orbit_core::Mode;
use orbit_core::config::DEFAULT_NTP_SERVER;

pub const WIFI_SSID: &str = env!("WIFI_SSID");
pub const WIFI_PASSWORD: &str = env!("WIFI_PASSWORD");

/// Local offset from UTC. An unparsable value fails the build.
pub const UTC_OFFSET_SECS: i32 = match option_env!("UTC_OFFSET_SECS") {
    Some(value) => match i32::from_str_radix(value, 10) {
        Ok(secs) => secs,
        Err(_) => panic!("UTC_OFFSET_SECS must be a whole number of seconds"),
    },
    None => 0,
};

pub const NTP_SERVER: &str = match option_env!("NTP_SERVER") {
    Some(server) => server,
    None => DEFAULT_NTP_SERVER,
};

/// Startup mode from `DISPLAY_MODE` (1-based), falling back to the default.
pub fn initial_mode() -> Mode {
    option_env!("DISPLAY_MODE")
        .and_then(|value| value.parse::<usize>().ok())
        .and_then(|number| number.checked_sub(1))
        .and_then(Mode::from_index)
        .unwrap_or_default()
}
