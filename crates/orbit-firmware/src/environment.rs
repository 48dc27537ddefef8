//! Board-side [`EnvironmentSource`]: the SHT40 on I2C plus the shared wall
//! clock that the SNTP task anchors.

use core::cell::RefCell;

use embassy_sync::blocking_mutex::Mutex;
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_time::Instant;
use embedded_hal_async::i2c::I2c;
use orbit_core::sensors::{SHT40Sensor, Sensor, SensorError};
use orbit_core::{EnvironmentReading, EnvironmentSource, TimeError, TimeSample, WallClock};

use crate::wifi_secrets::UTC_OFFSET_SECS;

/// Wall clock shared between the render loop and the SNTP task.
pub static WALL_CLOCK: Mutex<CriticalSectionRawMutex, RefCell<WallClock>> =
    Mutex::new(RefCell::new(WallClock::new(UTC_OFFSET_SECS)));

/// Milliseconds since boot, the timeline every anchor refers to.
pub fn uptime_ms() -> u64 {
    Instant::now().as_millis()
}

pub struct BoardEnvironment<I> {
    sensor: SHT40Sensor<I>,
}

impl<I: I2c> BoardEnvironment<I> {
    pub fn new(i2c: I) -> Self {
        Self {
            sensor: SHT40Sensor::new(i2c),
        }
    }
}

impl<I: I2c> EnvironmentSource for BoardEnvironment<I> {
    async fn read_environment(&mut self) -> Result<EnvironmentReading, SensorError> {
        self.sensor.read().await.map(EnvironmentReading::from)
    }

    fn read_wall_clock(&mut self) -> Result<TimeSample, TimeError> {
        let now = uptime_ms();
        WALL_CLOCK.lock(|clock| clock.borrow().now(now))
    }
}
