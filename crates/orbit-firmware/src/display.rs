//! GC9A01 round panel with a PWM backlight.
//!
//! [`RoundPanel`] forwards drawing to the mipidsi driver and maps
//! [`DisplaySink::set_brightness`] onto an LEDC channel.

use embedded_graphics::pixelcolor::Rgb565;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::Rectangle;
use embedded_hal_bus::spi::{ExclusiveDevice, NoDelay};
use esp_hal::Blocking;
use esp_hal::gpio::Output;
use esp_hal::ledc::channel::{self, ChannelIFace};
use esp_hal::ledc::timer::{self, TimerIFace};
use esp_hal::ledc::{LSGlobalClkSource, Ledc, LowSpeed};
use esp_hal::peripherals::{GPIO5, LEDC};
use esp_hal::spi::master::Spi;
use esp_hal::time::Rate;
use log::{info, warn};
use mipidsi::interface::SpiInterface;
use mipidsi::models::GC9A01;
use orbit_core::display::{DisplayConfig, brightness_to_percent};
use orbit_core::DisplaySink;
use static_cell::StaticCell;

pub type PanelSpi = ExclusiveDevice<Spi<'static, Blocking>, Output<'static>, NoDelay>;
pub type PanelInterface = SpiInterface<'static, PanelSpi, Output<'static>>;
pub type Panel = mipidsi::Display<PanelInterface, GC9A01, Output<'static>>;

pub type Backlight = channel::Channel<'static, LowSpeed>;

#[derive(Debug)]
pub enum BacklightError {
    Timer(timer::Error),
    Channel(channel::Error),
}

/// Configure LEDC timer 0 and channel 0 on the backlight pin.
pub fn init_backlight(
    ledc: LEDC<'static>,
    pin: GPIO5<'static>,
    config: &DisplayConfig,
) -> Result<Backlight, BacklightError> {
    static LEDC_DRIVER: StaticCell<Ledc<'static>> = StaticCell::new();
    static LEDC_TIMER: StaticCell<timer::Timer<'static, LowSpeed>> = StaticCell::new();

    let ledc = LEDC_DRIVER.init(Ledc::new(ledc));
    ledc.set_global_slow_clock(LSGlobalClkSource::APBClk);

    let lstimer = LEDC_TIMER.init(ledc.timer::<LowSpeed>(timer::Number::Timer0));
    lstimer
        .configure(timer::config::Config {
            duty: timer::config::Duty::Duty8Bit,
            clock_source: timer::LSClockSource::APBClk,
            frequency: Rate::from_hz(config.backlight_pwm_hz),
        })
        .map_err(BacklightError::Timer)?;

    let mut backlight = ledc.channel(channel::Number::Channel0, pin);
    backlight
        .configure(channel::config::Config {
            timer: lstimer,
            duty_pct: config.brightness_percent(),
            pin_config: channel::config::PinConfig::PushPull,
        })
        .map_err(BacklightError::Channel)?;

    info!(
        "Backlight at {}% ({} Hz PWM)",
        config.brightness_percent(),
        config.backlight_pwm_hz
    );
    Ok(backlight)
}

pub struct RoundPanel {
    panel: Panel,
    backlight: Backlight,
}

impl RoundPanel {
    pub fn new(panel: Panel, backlight: Backlight) -> Self {
        Self { panel, backlight }
    }
}

impl OriginDimensions for RoundPanel {
    fn size(&self) -> Size {
        self.panel.size()
    }
}

impl DrawTarget for RoundPanel {
    type Color = Rgb565;
    type Error = <Panel as DrawTarget>::Error;

    fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        self.panel.draw_iter(pixels)
    }

    fn fill_contiguous<I>(&mut self, area: &Rectangle, colors: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Self::Color>,
    {
        self.panel.fill_contiguous(area, colors)
    }

    fn fill_solid(&mut self, area: &Rectangle, color: Self::Color) -> Result<(), Self::Error> {
        self.panel.fill_solid(area, color)
    }

    fn clear(&mut self, color: Self::Color) -> Result<(), Self::Error> {
        self.panel.clear(color)
    }
}

impl DisplaySink for RoundPanel {
    fn set_brightness(&mut self, level: u8) -> Result<(), Self::Error> {
        // PWM faults don't stop rendering
        if let Err(e) = self.backlight.set_duty(brightness_to_percent(level)) {
            warn!("Backlight update failed: {:?}", e);
        }
        Ok(())
    }
}
