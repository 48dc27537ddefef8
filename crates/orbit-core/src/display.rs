//! Physical display abstraction.
//!
//! The render core only needs two things from a panel: somewhere to send
//! pixels (any `DrawTarget<Color = Rgb565>`) and a backlight level. Bus
//! clocks, pins and panel quirks stay in [`DisplayConfig`], which only the
//! firmware's panel factory reads.

use embedded_graphics::pixelcolor::Rgb565;
use embedded_graphics::prelude::*;
use serde::{Deserialize, Serialize};

/// Panel width and height in pixels.
pub const DISPLAY_SIZE_PX: u16 = 240;

/// Centre of the round panel on both axes.
pub const DISPLAY_CENTER_PX: i32 = DISPLAY_SIZE_PX as i32 / 2;

/// Radius of the visible circle.
pub const DISPLAY_RADIUS_PX: i32 = DISPLAY_SIZE_PX as i32 / 2;

/// Centre of the round panel as a point.
pub const DISPLAY_CENTER: Point = Point::new(DISPLAY_CENTER_PX, DISPLAY_CENTER_PX);

/// A panel that committed frames (and the startup diagnostic) are drawn to.
pub trait DisplaySink: DrawTarget<Color = Rgb565> {
    /// Set the backlight level on a 0–255 scale.
    fn set_brightness(&mut self, level: u8) -> Result<(), Self::Error>;
}

/// Bus and panel configuration for the GC9A01 round display.
///
/// Rotation is fixed at 0° and not configurable.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub struct DisplayConfig {
    /// SPI write clock.
    pub spi_frequency_hz: u32,
    /// The GC9A01 needs color inversion to show true colors.
    pub invert_colors: bool,
    pub width: u16,
    pub height: u16,
    pub offset_x: u16,
    pub offset_y: u16,
    /// Initial backlight level, 0–255.
    pub brightness: u8,
    /// Backlight PWM carrier frequency.
    pub backlight_pwm_hz: u32,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            spi_frequency_hz: 40_000_000,
            invert_colors: true,
            width: DISPLAY_SIZE_PX,
            height: DISPLAY_SIZE_PX,
            offset_x: 0,
            offset_y: 0,
            brightness: 200,
            backlight_pwm_hz: 44_100,
        }
    }
}

impl DisplayConfig {
    /// Backlight duty cycle in percent for the configured brightness.
    pub const fn brightness_percent(&self) -> u8 {
        brightness_to_percent(self.brightness)
    }
}

/// Convert a 0–255 brightness level into a 0–100 duty cycle, rounding to nearest.
pub const fn brightness_to_percent(level: u8) -> u8 {
    ((level as u16 * 100 + 127) / 255) as u8
}
