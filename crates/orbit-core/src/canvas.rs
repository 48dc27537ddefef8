//! Drawing primitives shared by every mode.
//!
//! [`Canvas`] is implemented for every `DrawTarget<Color = Rgb565>`, so the
//! same calls work on the buffered surface ([`FrameBuffer`]) used by the
//! animated modes and on the panel itself, which only the startup diagnostic
//! draws to directly.
//!
//! [`FrameBuffer`]: crate::framebuffer::FrameBuffer

use embedded_graphics::mono_font::{MonoFont, MonoTextStyle};
use embedded_graphics::pixelcolor::Rgb565;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::{Circle, Line, PrimitiveStyle, Rectangle};
use embedded_graphics::text::{Alignment, Baseline, Text, TextStyleBuilder};
use libm::sqrtf;

use crate::display::{DISPLAY_CENTER_PX, DISPLAY_RADIUS_PX, DISPLAY_SIZE_PX};
use crate::geometry::{clockwise_angle, normalize_degrees};

/// Largest `n` with `n * n <= value` (0 for negative input).
pub fn isqrt(value: i32) -> i32 {
    if value <= 0 {
        return 0;
    }
    let mut root = sqrtf(value as f32) as i32;
    while root * root > value {
        root -= 1;
    }
    while (root + 1) * (root + 1) <= value {
        root += 1;
    }
    root
}

pub trait Canvas: DrawTarget<Color = Rgb565> + Sized {
    /// Set one pixel. Out-of-bounds points are ignored by the target.
    fn plot(&mut self, point: Point, color: Rgb565) -> Result<(), Self::Error> {
        Pixel(point, color).draw(self)
    }

    fn line(&mut self, from: Point, to: Point, width: u32, color: Rgb565) -> Result<(), Self::Error> {
        Line::new(from, to)
            .into_styled(PrimitiveStyle::with_stroke(color, width))
            .draw(self)
    }

    /// Circle outline of `radius` pixels around `center`.
    fn circle_outline(
        &mut self,
        center: Point,
        radius: u32,
        width: u32,
        color: Rgb565,
    ) -> Result<(), Self::Error> {
        Circle::with_center(center, radius * 2 + 1)
            .into_styled(PrimitiveStyle::with_stroke(color, width))
            .draw(self)
    }

    fn filled_circle(&mut self, center: Point, radius: u32, color: Rgb565) -> Result<(), Self::Error> {
        Circle::with_center(center, radius * 2 + 1)
            .into_styled(PrimitiveStyle::with_fill(color))
            .draw(self)
    }

    /// Fill the annular wedge between `inner` and `outer` radius, starting at
    /// `start_deg` and sweeping `sweep_deg` clockwise.
    ///
    /// A sweep of 0 (or less) draws nothing; 360 or more draws the whole ring.
    fn fill_arc(
        &mut self,
        center: Point,
        outer: u32,
        inner: u32,
        start_deg: f32,
        sweep_deg: f32,
        color: Rgb565,
    ) -> Result<(), Self::Error> {
        self.fill_arc_with(center, outer, inner, start_deg, sweep_deg, |_| color)
    }

    /// Like [`fill_arc`](Canvas::fill_arc), coloring each pixel by its angular
    /// offset from `start_deg` (in `[0, sweep_deg]`).
    fn fill_arc_with<F>(
        &mut self,
        center: Point,
        outer: u32,
        inner: u32,
        start_deg: f32,
        sweep_deg: f32,
        mut color_at: F,
    ) -> Result<(), Self::Error>
    where
        F: FnMut(f32) -> Rgb565,
    {
        // `!(x > 0)` also rejects NaN
        if !(sweep_deg > 0.0) || inner > outer {
            return Ok(());
        }

        let full_ring = sweep_deg >= 360.0;
        let start = normalize_degrees(start_deg);
        let outer = outer as i32;
        let outer_sq = outer * outer;
        let inner_sq = (inner * inner) as i32;

        for dy in -outer..=outer {
            let span = isqrt(outer_sq - dy * dy);
            let row = (-span..=span).filter_map(|dx| {
                let dist_sq = dx * dx + dy * dy;
                if dist_sq < inner_sq {
                    return None;
                }
                let offset = normalize_degrees(clockwise_angle(dx as f32, dy as f32) - start);
                if full_ring || offset <= sweep_deg {
                    Some(Pixel(center + Point::new(dx, dy), color_at(offset)))
                } else {
                    None
                }
            });
            self.draw_iter(row)?;
        }
        Ok(())
    }

    /// Text centred on `center` both horizontally and vertically.
    fn text_centered(
        &mut self,
        text: &str,
        center: Point,
        font: &MonoFont<'_>,
        color: Rgb565,
    ) -> Result<(), Self::Error> {
        let style = TextStyleBuilder::new()
            .alignment(Alignment::Center)
            .baseline(Baseline::Middle)
            .build();
        Text::with_text_style(text, center, MonoTextStyle::new(font, color), style)
            .draw(self)
            .map(|_| ())
    }

    /// Paint every pixel outside the panel's inscribed circle.
    fn mask_outside_round(&mut self, color: Rgb565) -> Result<(), Self::Error> {
        let size = DISPLAY_SIZE_PX as i32;
        for y in 0..size {
            let dy = y - DISPLAY_CENTER_PX;
            let span = isqrt(DISPLAY_RADIUS_PX * DISPLAY_RADIUS_PX - dy * dy);
            let left_end = DISPLAY_CENTER_PX - span;
            let right_start = DISPLAY_CENTER_PX + span + 1;

            if left_end > 0 {
                self.fill_solid(
                    &Rectangle::new(Point::new(0, y), Size::new(left_end as u32, 1)),
                    color,
                )?;
            }
            if right_start < size {
                self.fill_solid(
                    &Rectangle::new(
                        Point::new(right_start, y),
                        Size::new((size - right_start) as u32, 1),
                    ),
                    color,
                )?;
            }
        }
        Ok(())
    }
}

impl<D> Canvas for D where D: DrawTarget<Color = Rgb565> {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::display::DISPLAY_CENTER;
    use crate::framebuffer::FrameBuffer;
    use crate::geometry::within_radius;

    const OUTER: u32 = 100;
    const INNER: u32 = 80;

    fn annulus_pixel_count() -> usize {
        let mut count = 0;
        for dy in -(OUTER as i32)..=OUTER as i32 {
            for dx in -(OUTER as i32)..=OUTER as i32 {
                let d = dx * dx + dy * dy;
                if d >= (INNER * INNER) as i32 && d <= (OUTER * OUTER) as i32 {
                    count += 1;
                }
            }
        }
        count
    }

    fn arc_frame(start: f32, sweep: f32) -> FrameBuffer {
        let mut fb = FrameBuffer::new();
        fb.fill_arc(DISPLAY_CENTER, OUTER, INNER, start, sweep, Rgb565::RED)
            .unwrap();
        fb
    }

    #[test]
    fn test_isqrt() {
        assert_eq!(isqrt(-4), 0);
        assert_eq!(isqrt(0), 0);
        assert_eq!(isqrt(15), 3);
        assert_eq!(isqrt(16), 4);
        assert_eq!(isqrt(14_400), 120);
    }

    #[test]
    fn test_zero_sweep_draws_nothing() {
        let fb = arc_frame(45.0, 0.0);
        assert_eq!(fb.count_color(Rgb565::RED), 0);

        let fb = arc_frame(45.0, -10.0);
        assert_eq!(fb.count_color(Rgb565::RED), 0);
    }

    #[test]
    fn test_full_sweep_draws_whole_annulus() {
        let fb = arc_frame(0.0, 360.0);
        assert_eq!(fb.count_color(Rgb565::RED), annulus_pixel_count());

        // Nothing inside the hole or beyond the rim
        assert_eq!(fb.pixel(DISPLAY_CENTER), Some(Rgb565::BLACK));
        assert_eq!(fb.pixel(DISPLAY_CENTER + Point::new(0, -70)), Some(Rgb565::BLACK));
        assert_eq!(fb.pixel(DISPLAY_CENTER + Point::new(0, -90)), Some(Rgb565::RED));
        assert_eq!(fb.pixel(DISPLAY_CENTER + Point::new(0, -110)), Some(Rgb565::BLACK));
    }

    #[test]
    fn test_quarter_arc_covers_upper_right() {
        let fb = arc_frame(0.0, 90.0);
        // 1:30 position is inside, 4:30 and 10:30 are not
        assert_eq!(fb.pixel(DISPLAY_CENTER + Point::new(64, -64)), Some(Rgb565::RED));
        assert_eq!(fb.pixel(DISPLAY_CENTER + Point::new(64, 64)), Some(Rgb565::BLACK));
        assert_eq!(fb.pixel(DISPLAY_CENTER + Point::new(-64, -64)), Some(Rgb565::BLACK));
    }

    #[test]
    fn test_adjacent_arcs_leave_no_seam() {
        for &(start, first, second) in &[(0.0, 90.0, 90.0), (30.0, 47.5, 200.0), (300.0, 100.0, 45.0)] {
            let mut halves = FrameBuffer::new();
            halves
                .fill_arc(DISPLAY_CENTER, OUTER, INNER, start, first, Rgb565::RED)
                .unwrap();
            halves
                .fill_arc(DISPLAY_CENTER, OUTER, INNER, start + first, second, Rgb565::RED)
                .unwrap();

            let whole = arc_frame(start, first + second);

            for y in 0..240 {
                for x in 0..240 {
                    let point = Point::new(x, y);
                    assert_eq!(
                        halves.pixel(point),
                        whole.pixel(point),
                        "seam mismatch at {:?} for start {}",
                        point,
                        start
                    );
                }
            }
        }
    }

    #[test]
    fn test_gradient_offsets_span_sweep() {
        let mut fb = FrameBuffer::new();
        let mut max_offset: f32 = 0.0;
        fb.fill_arc_with(DISPLAY_CENTER, OUTER, INNER, 270.0, 180.0, |offset| {
            assert!((0.0..=180.0).contains(&offset));
            max_offset = max_offset.max(offset);
            Rgb565::GREEN
        })
        .unwrap();
        assert!(max_offset > 179.0);
    }

    #[test]
    fn test_mask_outside_round() {
        let mut fb = FrameBuffer::new();
        fb.mask_outside_round(Rgb565::WHITE).unwrap();

        for y in 0..240 {
            for x in 0..240 {
                let inside = within_radius(x, y, 120, 120, 120);
                let expected = if inside { Rgb565::BLACK } else { Rgb565::WHITE };
                assert_eq!(fb.pixel(Point::new(x, y)), Some(expected), "at ({}, {})", x, y);
            }
        }
    }

    #[test]
    fn test_text_centered_lands_near_center() {
        let mut fb = FrameBuffer::new();
        fb.text_centered(
            "88",
            DISPLAY_CENTER,
            &embedded_graphics::mono_font::ascii::FONT_10X20,
            Rgb565::WHITE,
        )
        .unwrap();
        assert!(fb.count_color(Rgb565::WHITE) > 0);
        // Two 10 px glyphs span roughly x = 110..130
        assert_eq!(fb.pixel(Point::new(60, 120)), Some(Rgb565::BLACK));
    }
}
