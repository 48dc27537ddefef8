//! Progress-ring clocks.
//!
//! [`ArcClockRenderer`] shows seconds, minutes and hours as three concentric
//! rings with a digital readout and runs from uptime.
//! [`ArcAnalogClockRenderer`] adds analog hands inside the rings and needs
//! the wall clock.

use embedded_graphics::mono_font::ascii::{FONT_6X10, FONT_10X20};
use embedded_graphics::pixelcolor::Rgb565;
use embedded_graphics::prelude::*;

use crate::color::{BACKGROUND, DIAL_FOREGROUND, MUTED};
use crate::display::DISPLAY_CENTER;
use crate::geometry::HandAngles;
use crate::modes::dial::{HandLengths, draw_hands, draw_readout, draw_rings, format_time};
use crate::modes::time_error::draw_time_error;
use crate::modes::{FrameContext, FrameOutcome, Mode, Renderer};

/// Offset of the small readout below the pivot.
const SMALL_READOUT_OFFSET_PX: i32 = 30;

#[derive(Debug, Default)]
pub struct ArcClockRenderer;

impl ArcClockRenderer {
    pub fn new() -> Self {
        Self
    }
}

impl Renderer for ArcClockRenderer {
    fn mode(&self) -> Mode {
        Mode::ArcClock
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
        draw_rings(target, DISPLAY_CENTER, HandAngles::from_time(time))?;
        draw_readout(target, &format_time(time), DISPLAY_CENTER, &FONT_10X20, DIAL_FOREGROUND)?;
        Ok(FrameOutcome::Complete)
    }
}

#[derive(Debug, Default)]
pub struct ArcAnalogClockRenderer;

impl ArcAnalogClockRenderer {
    pub fn new() -> Self {
        Self
    }
}

impl Renderer for ArcAnalogClockRenderer {
    fn mode(&self) -> Mode {
        Mode::ArcAnalogClock
    }

    fn render<D: DrawTarget<Color = Rgb565>>(
        &mut self,
        ctx: &FrameContext,
        target: &mut D,
    ) -> Result<FrameOutcome, D::Error> {
        let Ok(time) = ctx.time else {
            return draw_time_error(target);
        };

        let angles = HandAngles::from_time(time);
        target.clear(BACKGROUND)?;
        draw_rings(target, DISPLAY_CENTER, angles)?;
        draw_readout(
            target,
            &format_time(time),
            DISPLAY_CENTER + Point::new(0, SMALL_READOUT_OFFSET_PX),
            &FONT_6X10,
            MUTED,
        )?;
        draw_hands(target, DISPLAY_CENTER, angles, HandLengths::INSIDE_RINGS)?;
        Ok(FrameOutcome::Complete)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::{ERROR, HOUR_RING, MINUTE_RING, SECOND_HAND, TRACK};
    use crate::environment::EnvironmentStatus;
    use crate::framebuffer::FrameBuffer;
    use crate::test_support::frame;
    use crate::time::{TimeError, TimeSample};

    #[test]
    fn test_rings_at_half_past_six() {
        let mut fb = FrameBuffer::new();
        let ctx = frame(TimeSample::new(6, 30, 45), EnvironmentStatus::Unavailable);
        let outcome = ArcClockRenderer::new().render(&ctx, &mut fb).unwrap();
        assert_eq!(outcome, FrameOutcome::Complete);

        // Seconds at 270°: just below 9 o'clock is filled, 10:30 is still track
        assert_eq!(fb.pixel(Point::new(12, 125)), Some(SECOND_HAND));
        assert_eq!(fb.pixel(Point::new(40, 40)), Some(TRACK));
        // Minutes past half
        assert_eq!(fb.pixel(Point::new(120, 217)), Some(MINUTE_RING));
        // Hours at 195°: 6 o'clock filled, 9 o'clock not
        assert_eq!(fb.pixel(Point::new(120, 203)), Some(HOUR_RING));
        assert_eq!(fb.pixel(Point::new(37, 120)), Some(TRACK));
        assert!(fb.count_color(DIAL_FOREGROUND) > 0);
    }

    #[test]
    fn test_midnight_shows_only_tracks() {
        let mut fb = FrameBuffer::new();
        let ctx = frame(TimeSample::new(0, 0, 0), EnvironmentStatus::Unavailable);
        ArcClockRenderer::new().render(&ctx, &mut fb).unwrap();
        assert_eq!(fb.count_color(SECOND_HAND), 0);
        assert_eq!(fb.count_color(MINUTE_RING), 0);
        assert_eq!(fb.count_color(HOUR_RING), 0);
    }

    #[test]
    fn test_analog_variant_needs_wall_clock() {
        let mut fb = FrameBuffer::new();
        let ctx = frame(Err(TimeError::NotSynchronized), EnvironmentStatus::Unavailable);
        let outcome = ArcAnalogClockRenderer::new().render(&ctx, &mut fb).unwrap();
        assert_eq!(outcome, FrameOutcome::TimeUnavailable);
        assert_eq!(fb.pixel(Point::new(120, 5)), Some(ERROR));
        assert_eq!(fb.count_color(TRACK), 0);
    }

    #[test]
    fn test_analog_variant_draws_hands() {
        let mut fb = FrameBuffer::new();
        let ctx = frame(TimeSample::new(9, 0, 0), EnvironmentStatus::Unavailable);
        let outcome = ArcAnalogClockRenderer::new().render(&ctx, &mut fb).unwrap();
        assert_eq!(outcome, FrameOutcome::Complete);
        // Hour hand towards 9 o'clock, inside the hour ring
        assert_eq!(fb.pixel(Point::new(90, 120)), Some(DIAL_FOREGROUND));
        assert_eq!(fb.pixel(Point::new(40, 130)), Some(HOUR_RING));
    }
}
