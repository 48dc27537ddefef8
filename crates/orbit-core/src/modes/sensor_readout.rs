//! Temperature and humidity readout.

use embedded_graphics::mono_font::ascii::FONT_10X20;
use embedded_graphics::mono_font::iso_8859_1::FONT_10X20 as FONT_10X20_LATIN1;
use embedded_graphics::pixelcolor::Rgb565;
use embedded_graphics::prelude::*;

use crate::canvas::Canvas;
use crate::color::{BACKGROUND, MUTED, temperature_to_color};
use crate::display::DISPLAY_CENTER;
use crate::environment::EnvironmentStatus;
use crate::modes::dial::{RIM_RADIUS, draw_readout, format_humidity, format_temperature};
use crate::modes::{FrameContext, FrameOutcome, Mode, Renderer};

const TEMPERATURE_OFFSET_PX: i32 = -15;
const HUMIDITY_OFFSET_PX: i32 = 15;
const STALE_LABEL_OFFSET_PX: i32 = 50;

#[derive(Debug, Default)]
pub struct SensorReadoutRenderer;

impl SensorReadoutRenderer {
    pub fn new() -> Self {
        Self
    }
}

impl Renderer for SensorReadoutRenderer {
    fn mode(&self) -> Mode {
        Mode::SensorReadout
    }

    fn render<D: DrawTarget<Color = Rgb565>>(
        &mut self,
        ctx: &FrameContext,
        target: &mut D,
    ) -> Result<FrameOutcome, D::Error> {
        target.clear(BACKGROUND)?;

        let Some(reading) = ctx.environment.reading() else {
            target.circle_outline(DISPLAY_CENTER, RIM_RADIUS, 2, MUTED)?;
            draw_readout(target, "Sensor N/A", DISPLAY_CENTER, &FONT_10X20, MUTED)?;
            return Ok(FrameOutcome::Complete);
        };

        let accent = match ctx.environment {
            EnvironmentStatus::Fresh(_) => temperature_to_color(reading.temperature_c),
            _ => MUTED,
        };

        target.circle_outline(DISPLAY_CENTER, RIM_RADIUS, 2, accent)?;
        draw_readout(
            target,
            &format_temperature(reading.temperature_c),
            DISPLAY_CENTER + Point::new(0, TEMPERATURE_OFFSET_PX),
            &FONT_10X20_LATIN1,
            accent,
        )?;
        draw_readout(
            target,
            &format_humidity(reading.humidity_pct),
            DISPLAY_CENTER + Point::new(0, HUMIDITY_OFFSET_PX),
            &FONT_10X20,
            MUTED,
        )?;
        if ctx.environment.is_stale() {
            draw_readout(
                target,
                "stale",
                DISPLAY_CENTER + Point::new(0, STALE_LABEL_OFFSET_PX),
                &FONT_10X20,
                MUTED,
            )?;
        }
        Ok(FrameOutcome::Complete)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::framebuffer::FrameBuffer;
    use crate::test_support::{frame, reading};
    use crate::time::TimeError;

    fn render(environment: EnvironmentStatus) -> FrameBuffer {
        let mut fb = FrameBuffer::new();
        let ctx = frame(Err(TimeError::NotSynchronized), environment);
        let outcome = SensorReadoutRenderer::new().render(&ctx, &mut fb).unwrap();
        // No time dependency
        assert_eq!(outcome, FrameOutcome::Complete);
        fb
    }

    #[test]
    fn test_fresh_reading_uses_temperature_color() {
        let fb = render(EnvironmentStatus::Fresh(reading(-5.0, 40.0)));
        let blue = temperature_to_color(-5.0);
        // Rim carries the accent
        assert_eq!(fb.pixel(Point::new(120, 2)), Some(blue));
        assert!(fb.count_color(blue) > 0);
        assert!(fb.count_color(MUTED) > 0);
    }

    #[test]
    fn test_stale_reading_is_grey() {
        let fresh = render(EnvironmentStatus::Fresh(reading(22.0, 40.0)));
        let stale = render(EnvironmentStatus::Stale {
            reading: reading(22.0, 40.0),
            age_ms: 600_000,
        });

        let accent = temperature_to_color(22.0);
        assert_eq!(stale.count_color(accent), 0);
        assert!(stale.count_color(MUTED) > fresh.count_color(MUTED));
    }

    #[test]
    fn test_unavailable_shows_placeholder() {
        let fb = render(EnvironmentStatus::Unavailable);
        assert!(fb.count_color(MUTED) > 0);
        assert_eq!(fb.pixel(Point::new(120, 2)), Some(MUTED));
    }
}
