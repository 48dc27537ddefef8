//! Analog clock driven by uptime.

use embedded_graphics::pixelcolor::Rgb565;
use embedded_graphics::prelude::*;

use crate::color::BACKGROUND;
use crate::display::DISPLAY_CENTER;
use crate::geometry::HandAngles;
use crate::modes::dial::{HandLengths, draw_face, draw_hands};
use crate::modes::time_error::draw_time_error;
use crate::modes::{FrameContext, FrameOutcome, Mode, Renderer};

#[derive(Debug, Default)]
pub struct ClockRenderer;

impl ClockRenderer {
    pub fn new() -> Self {
        Self
    }
}

impl Renderer for ClockRenderer {
    fn mode(&self) -> Mode {
        Mode::Clock
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
        draw_hands(target, DISPLAY_CENTER, HandAngles::from_time(time), HandLengths::FULL)?;
        Ok(FrameOutcome::Complete)
    }
}
