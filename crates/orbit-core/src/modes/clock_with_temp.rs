//! Analog wall clock with the room temperature underneath the pivot.

use embedded_graphics::mono_font::iso_8859_1::FONT_10X20;
use embedded_graphics::pixelcolor::Rgb565;
use embedded_graphics::prelude::*;

use crate::color::{BACKGROUND, MUTED, temperature_to_color};
use crate::display::DISPLAY_CENTER;
use crate::environment::EnvironmentStatus;
use crate::geometry::HandAngles;
use crate::modes::dial::{HandLengths, draw_face, draw_hands, draw_readout, format_temperature};
use crate::modes::time_error::draw_time_error;
use crate::modes::{FrameContext, FrameOutcome, Mode, Renderer};

/// Offset of the temperature line below the pivot.
const TEMPERATURE_OFFSET_PX: i32 = 45;

#[derive(Debug, Default)]
pub struct ClockWithTempRenderer;

impl ClockWithTempRenderer {
    pub fn new() -> Self {
        Self
    }
}

impl Renderer for ClockWithTempRenderer {
    fn mode(&self) -> Mode {
        Mode::ClockWithTemp
    }

    fn render<D: DrawTarget<Color = Rgb565>>(
        &mut self,
        ctx: &FrameContext,
        target: &mut D,
    ) -> Result<FrameOutcome, D::Error> {
        let Ok(time) = ctx.time else {
            return draw_time_error(target);
        };

        target.clear(BACKGROUND)?;
        draw_face(target, DISPLAY_CENTER)?;

        // Temperature goes under the hands so they stay readable
        let position = DISPLAY_CENTER + Point::new(0, TEMPERATURE_OFFSET_PX);
        match ctx.environment {
            EnvironmentStatus::Fresh(reading) => draw_readout(
                target,
                &format_temperature(reading.temperature_c),
                position,
                &FONT_10X20,
                temperature_to_color(reading.temperature_c),
            )?,
            EnvironmentStatus::Stale { reading, .. } => draw_readout(
                target,
                &format_temperature(reading.temperature_c),
                position,
                &FONT_10X20,
                MUTED,
            )?,
            EnvironmentStatus::Unavailable => {
                draw_readout(target, "N/A", position, &FONT_10X20, MUTED)?
            }
        }

        draw_hands(target, DISPLAY_CENTER, HandAngles::from_time(time), HandLengths::FULL)?;
        Ok(FrameOutcome::Complete)
    }
}
