use crate::environment::EnvironmentReading;
use crate::sensors::SensorError;

use super::Sensor;
use embedded_hal_async::i2c::I2c;
use log::{debug, error};
use sht4x::{Error as Sht4xError, Precision, Sht4xAsync};

const SENSOR_NAME: &str = "SHT40";

/// One SHT40 measurement in the driver's fixed-point milli-units.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SHT40Readings {
    pub temperature_milli_celsius: i32,
    pub humidity_milli_percent: i32,
}

impl From<SHT40Readings> for EnvironmentReading {
    fn from(readings: SHT40Readings) -> Self {
        EnvironmentReading {
            temperature_c: readings.temperature_milli_celsius as f32 / 1000.0,
            humidity_pct: readings.humidity_milli_percent as f32 / 1000.0,
        }
    }
}

/// SHT40 on an async I2C bus at the default address.
///
/// High precision takes about 8 ms per measurement, which the render loop
/// awaits inline.
pub struct SHT40Sensor<I> {
    driver: Sht4xAsync<I, embassy_time::Delay>,
    precision: Precision,
}

impl<I: I2c> SHT40Sensor<I> {
    pub fn new(i2c: I) -> Self {
        Self::with_precision(i2c, Precision::High)
    }

    pub fn with_precision(i2c: I, precision: Precision) -> Self {
        Self {
            driver: Sht4xAsync::new(i2c),
            precision,
        }
    }
}

fn read_failed<E: core::fmt::Debug>(e: Sht4xError<E>) -> SensorError {
    error!("{} measurement failed: {:?}", SENSOR_NAME, e);
    let details = match e {
        Sht4xError::Crc => "checksum mismatch",
        _ => "no response on I2C",
    };
    SensorError::ReadFailed {
        sensor: SENSOR_NAME,
        operation: "measure",
        details,
    }
}

impl<I: I2c> Sensor for SHT40Sensor<I> {
    type Readings = SHT40Readings;

    async fn read(&mut self) -> Result<SHT40Readings, SensorError> {
        let measurement = self
            .driver
            .measure(self.precision, &mut embassy_time::Delay)
            .await
            .map_err(read_failed)?;

        let readings = SHT40Readings {
            temperature_milli_celsius: measurement.temperature_milli_celsius(),
            humidity_milli_percent: measurement.humidity_milli_percent(),
        };
        debug!("{} raw: {:?}", SENSOR_NAME, readings);
        Ok(readings)
    }
}
