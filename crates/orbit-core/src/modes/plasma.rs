//! Animated plasma shader clipped to the round panel.

use core::f32::consts::PI;

use embedded_graphics::pixelcolor::Rgb565;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::Rectangle;

use crate::canvas::{Canvas, isqrt};
use crate::color::{BACKGROUND, plasma_color};
use crate::display::{DISPLAY_CENTER_PX, DISPLAY_RADIUS_PX, DISPLAY_SIZE_PX};
use crate::modes::{FrameContext, FrameOutcome, Mode, Renderer};

/// Phase advance per frame.
pub const PLASMA_STEP: f32 = 0.08;

/// Shared period of all plasma terms in `t`.
pub const PLASMA_PERIOD: f32 = 4.0 * PI;

#[derive(Debug, Default)]
pub struct PlasmaRenderer {
    t: f32,
}

impl PlasmaRenderer {
    pub fn new() -> Self {
        Self { t: 0.0 }
    }

    /// Current animation phase, in `[0, 4π)`.
    pub fn phase(&self) -> f32 {
        self.t
    }

    fn advance(&mut self) {
        self.t += PLASMA_STEP;
        if self.t >= PLASMA_PERIOD {
            self.t -= PLASMA_PERIOD;
        }
    }
}

impl Renderer for PlasmaRenderer {
    fn mode(&self) -> Mode {
        Mode::Plasma
    }

    fn render<D: DrawTarget<Color = Rgb565>>(
        &mut self,
        _ctx: &FrameContext,
        target: &mut D,
    ) -> Result<FrameOutcome, D::Error> {
        let t = self.t;

        // One contiguous run per row, covering the chord inside the circle
        for y in 0..DISPLAY_SIZE_PX as i32 {
            let dy = y - DISPLAY_CENTER_PX;
            let half = isqrt(DISPLAY_RADIUS_PX * DISPLAY_RADIUS_PX - dy * dy);
            let x_start = DISPLAY_CENTER_PX - half;
            let width = (2 * half + 1).min(DISPLAY_SIZE_PX as i32 - x_start);
            let row = Rectangle::new(Point::new(x_start, y), Size::new(width as u32, 1));
            let colors = (x_start..x_start + width)
                .map(|x| plasma_color((x - DISPLAY_CENTER_PX) as f32, dy as f32, t));
            target.fill_contiguous(&row, colors)?;
        }
        target.mask_outside_round(BACKGROUND)?;

        self.advance();
        Ok(FrameOutcome::Complete)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::rgb565;
    use crate::environment::EnvironmentStatus;
    use crate::framebuffer::FrameBuffer;
    use crate::test_support::frame;
    use crate::time::TimeSample;

    fn ctx() -> FrameContext {
        frame(Ok(TimeSample::default()), EnvironmentStatus::Unavailable)
    }

    #[test]
    fn test_centre_pixel_is_origin_of_shader() {
        let mut fb = FrameBuffer::new();
        PlasmaRenderer::new().render(&ctx(), &mut fb).unwrap();

        assert_eq!(fb.pixel(Point::new(120, 120)), Some(plasma_color(0.0, 0.0, 0.0)));
        assert_eq!(fb.pixel(Point::new(120, 120)), Some(rgb565(128, 237, 17)));
    }

    #[test]
    fn test_first_frame_matches_shader() {
        let mut renderer = PlasmaRenderer::new();
        let mut fb = FrameBuffer::new();
        renderer.render(&ctx(), &mut fb).unwrap();

        for &(x, y) in &[(120, 120), (120, 1), (30, 100), (200, 170)] {
            let expected = plasma_color((x - 120) as f32, (y - 120) as f32, 0.0);
            assert_eq!(fb.pixel(Point::new(x, y)), Some(expected), "at ({}, {})", x, y);
        }
        assert_eq!(fb.pixel(Point::new(0, 0)), Some(BACKGROUND));
        assert_eq!(fb.pixel(Point::new(239, 239)), Some(BACKGROUND));
    }

    #[test]
    fn test_phase_advances_and_wraps() {
        let mut renderer = PlasmaRenderer::new();
        let mut fb = FrameBuffer::new();
        renderer.render(&ctx(), &mut fb).unwrap();
        assert!(libm::fabsf(renderer.phase() - PLASMA_STEP) < 1e-6);

        // 4π / 0.08 ≈ 157.08 frames per period
        for _ in 0..200 {
            renderer.advance();
            assert!(renderer.phase() >= 0.0 && renderer.phase() < PLASMA_PERIOD);
        }
        assert!(renderer.phase() < 200.0 * PLASMA_STEP - PLASMA_PERIOD + 0.1);
    }
}
