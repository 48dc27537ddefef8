//! Temperature gauge: a 270° arc from the lower left, over the top, to the
//! lower right, filled with the temperature gradient up to the current value.

use embedded_graphics::mono_font::ascii::FONT_10X20;
use embedded_graphics::mono_font::iso_8859_1::FONT_10X20 as FONT_10X20_LATIN1;
use embedded_graphics::pixelcolor::Rgb565;
use embedded_graphics::prelude::*;
use libm::floorf;

use crate::canvas::Canvas;
use crate::color::{
    BACKGROUND, DIAL_FOREGROUND, MUTED, TEMPERATURE_MAX_C, TEMPERATURE_MIN_C, TRACK,
    normalize_temperature, temperature_to_color,
};
use crate::display::DISPLAY_CENTER;
use crate::modes::dial::{draw_readout, format_hours_minutes, format_temperature};
use crate::modes::time_error::draw_time_error;
use crate::modes::{FrameContext, FrameOutcome, Mode, Renderer};

/// Where the gauge starts (7:30 position).
pub const GAUGE_START_DEG: f32 = 225.0;

/// Full extent of the gauge.
pub const GAUGE_SWEEP_DEG: f32 = 270.0;

/// Angular width of one color segment.
pub const GAUGE_SEGMENT_DEG: f32 = 6.0;

const GAUGE_OUTER: u32 = 116;
const GAUGE_INNER: u32 = 98;

const TEMPERATURE_OFFSET_PX: i32 = -12;
const TIME_OFFSET_PX: i32 = 22;

/// Sweep of the filled part of the gauge for `temperature_c`.
pub fn gauge_fill_degrees(temperature_c: f32) -> f32 {
    normalize_temperature(temperature_c) * GAUGE_SWEEP_DEG
}

/// Color of the segment containing `offset_deg` degrees past the gauge start.
///
/// Each segment takes the gradient color of the temperature at its centre.
pub fn segment_color(offset_deg: f32) -> Rgb565 {
    let last_segment = floorf(GAUGE_SWEEP_DEG / GAUGE_SEGMENT_DEG) - 1.0;
    let segment = floorf(offset_deg / GAUGE_SEGMENT_DEG).clamp(0.0, last_segment);
    let center = (segment + 0.5) * GAUGE_SEGMENT_DEG / GAUGE_SWEEP_DEG;
    temperature_to_color(TEMPERATURE_MIN_C + center * (TEMPERATURE_MAX_C - TEMPERATURE_MIN_C))
}

#[derive(Debug, Default)]
pub struct TempArcRenderer;

impl TempArcRenderer {
    pub fn new() -> Self {
        Self
    }
}

impl Renderer for TempArcRenderer {
    fn mode(&self) -> Mode {
        Mode::TempArc
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
        target.fill_arc(
            DISPLAY_CENTER,
            GAUGE_OUTER,
            GAUGE_INNER,
            GAUGE_START_DEG,
            GAUGE_SWEEP_DEG,
            TRACK,
        )?;

        let temperature_position = DISPLAY_CENTER + Point::new(0, TEMPERATURE_OFFSET_PX);
        match ctx.environment.reading() {
            Some(reading) => {
                let stale = ctx.environment.is_stale();
                target.fill_arc_with(
                    DISPLAY_CENTER,
                    GAUGE_OUTER,
                    GAUGE_INNER,
                    GAUGE_START_DEG,
                    gauge_fill_degrees(reading.temperature_c),
                    |offset| if stale { MUTED } else { segment_color(offset) },
                )?;
                let color = if stale {
                    MUTED
                } else {
                    temperature_to_color(reading.temperature_c)
                };
                draw_readout(
                    target,
                    &format_temperature(reading.temperature_c),
                    temperature_position,
                    &FONT_10X20_LATIN1,
                    color,
                )?;
            }
            None => draw_readout(target, "N/A", temperature_position, &FONT_10X20, MUTED)?,
        }

        draw_readout(
            target,
            &format_hours_minutes(time),
            DISPLAY_CENTER + Point::new(0, TIME_OFFSET_PX),
            &FONT_10X20,
            DIAL_FOREGROUND,
        )?;
        Ok(FrameOutcome::Complete)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::ERROR;
    use crate::environment::EnvironmentStatus;
    use crate::framebuffer::FrameBuffer;
    use crate::geometry::point_on_circle;
    use crate::test_support::{frame, reading};
    use crate::time::{TimeError, TimeSample};

    const MID_RADIUS: f32 = 107.0;

    fn gauge_pixel(fb: &FrameBuffer, offset_deg: f32) -> Option<Rgb565> {
        fb.pixel(point_on_circle(
            DISPLAY_CENTER,
            MID_RADIUS,
            GAUGE_START_DEG + offset_deg,
        ))
    }

    fn render(environment: EnvironmentStatus) -> FrameBuffer {
        let mut fb = FrameBuffer::new();
        let ctx = frame(TimeSample::new(18, 45, 0), environment);
        let outcome = TempArcRenderer::new().render(&ctx, &mut fb).unwrap();
        assert_eq!(outcome, FrameOutcome::Complete);
        fb
    }

    #[test]
    fn test_fill_degrees() {
        assert_eq!(gauge_fill_degrees(-5.0), 0.0);
        assert_eq!(gauge_fill_degrees(50.0), 270.0);
        assert_eq!(gauge_fill_degrees(100.0), 270.0);
        assert!(libm::fabsf(gauge_fill_degrees(22.5) - 135.0) < 1e-3);
    }

    #[test]
    fn test_segments_follow_gradient() {
        assert_eq!(segment_color(0.0), temperature_to_color(-5.0 + 55.0 * 3.0 / 270.0));
        assert_eq!(segment_color(5.9), segment_color(0.1));
        assert_eq!(segment_color(269.9), segment_color(264.0));
        // Past the end stays on the last segment
        assert_eq!(segment_color(270.0), segment_color(269.9));
    }

    #[test]
    fn test_half_full_gauge() {
        let fb = render(EnvironmentStatus::Fresh(reading(22.5, 40.0)));

        assert_eq!(gauge_pixel(&fb, 3.0), Some(segment_color(3.0)));
        assert_eq!(gauge_pixel(&fb, 93.0), Some(segment_color(93.0)));
        assert_eq!(gauge_pixel(&fb, 200.0), Some(TRACK));
        // The gap at the bottom stays empty
        assert_eq!(fb.pixel(Point::new(120, 227)), Some(BACKGROUND));
        assert!(fb.count_color(DIAL_FOREGROUND) > 0);
    }

    #[test]
    fn test_cold_gauge_is_empty_track() {
        let fb = render(EnvironmentStatus::Fresh(reading(-20.0, 40.0)));
        assert_eq!(gauge_pixel(&fb, 3.0), Some(TRACK));
        assert_eq!(gauge_pixel(&fb, 267.0), Some(TRACK));
    }

    #[test]
    fn test_stale_gauge_is_grey() {
        let fb = render(EnvironmentStatus::Stale {
            reading: reading(40.0, 40.0),
            age_ms: 400_000,
        });
        assert_eq!(gauge_pixel(&fb, 100.0), Some(MUTED));
        assert_eq!(gauge_pixel(&fb, 260.0), Some(TRACK));
    }

    #[test]
    fn test_no_sync_shows_time_error() {
        let mut fb = FrameBuffer::new();
        let ctx = frame(
            Err(TimeError::NotSynchronized),
            EnvironmentStatus::Fresh(reading(22.5, 40.0)),
        );
        let outcome = TempArcRenderer::new().render(&ctx, &mut fb).unwrap();
        assert_eq!(outcome, FrameOutcome::TimeUnavailable);
        assert_eq!(fb.pixel(Point::new(120, 5)), Some(ERROR));
        assert_eq!(fb.count_color(TRACK), 0);
    }
}
