//! Sensor trait and error types.
//!
//! Drivers implement [`Sensor`] and convert their measurement into an
//! [`EnvironmentReading`](crate::environment::EnvironmentReading). The render
//! loop never talks to a sensor directly; it goes through an
//! [`EnvironmentSource`](crate::environment::EnvironmentSource).

#[cfg(feature = "sensor-sht40")]
mod sht40;

use thiserror_no_std::Error;

#[cfg(feature = "sensor-sht40")]
pub use sht40::{SHT40Readings, SHT40Sensor};

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum SensorError {
    #[error("{sensor}: {operation} failed ({details})")]
    ReadFailed {
        sensor: &'static str,
        operation: &'static str,
        details: &'static str,
    },
    #[error("{sensor}: initialization failed ({details})")]
    InitializationFailed {
        sensor: &'static str,
        details: &'static str,
    },
    #[error("{sensor}: timed out during {operation}")]
    Timeout {
        sensor: &'static str,
        operation: &'static str,
    },
}

/// Trait for sensors that produce typed readings.
pub trait Sensor {
    /// The type of readings this sensor produces.
    type Readings;

    /// Read the sensor and return typed readings.
    fn read(&mut self) -> impl Future<Output = Result<Self::Readings, SensorError>>;
}
