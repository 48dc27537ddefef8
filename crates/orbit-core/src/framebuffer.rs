//! Off-screen frame buffer with per-pixel change detection.
//!
//! Every animated mode draws into this RAM buffer instead of the SPI panel.
//! [`FrameBuffer::commit`] then sends the rectangular region containing the
//! changed pixels in a single `fill_contiguous` transaction, so the viewer
//! never sees a half-drawn frame.

extern crate alloc;

use alloc::vec::Vec;
use core::convert::Infallible;
use embedded_graphics::pixelcolor::Rgb565;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::Rectangle;
use log::{debug, error, warn};

use crate::display::DISPLAY_SIZE_PX;

const WIDTH: usize = DISPLAY_SIZE_PX as usize;
const HEIGHT: usize = DISPLAY_SIZE_PX as usize;

/// Total number of pixels in the frame buffer (240 x 240 = 57,600).
const PIXEL_COUNT: usize = WIDTH * HEIGHT;

/// Bounding box of pixels that have changed since the last commit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct DirtyRect {
    min_x: usize,
    min_y: usize,
    max_x: usize,
    max_y: usize,
}

impl DirtyRect {
    fn expand(&mut self, x: usize, y: usize) {
        self.min_x = self.min_x.min(x);
        self.min_y = self.min_y.min(y);
        self.max_x = self.max_x.max(x);
        self.max_y = self.max_y.max(y);
    }

    fn from_point(x: usize, y: usize) -> Self {
        Self {
            min_x: x,
            min_y: y,
            max_x: x,
            max_y: y,
        }
    }

    fn full_screen() -> Self {
        Self {
            min_x: 0,
            min_y: 0,
            max_x: WIDTH - 1,
            max_y: HEIGHT - 1,
        }
    }

    fn to_rectangle(self) -> Rectangle {
        Rectangle::new(
            Point::new(self.min_x as i32, self.min_y as i32),
            Size::new(
                (self.max_x - self.min_x + 1) as u32,
                (self.max_y - self.min_y + 1) as u32,
            ),
        )
    }
}

/// Heap-allocated frame buffer implementing `DrawTarget<Color = Rgb565>`.
///
/// Allocates 240x240x2 = 115,200 bytes. If the allocation fails the buffer
/// stays usable but empty: draws are dropped and commits do nothing.
pub struct FrameBuffer {
    pixels: Vec<Rgb565>,
    dirty: Option<DirtyRect>,
}

impl Default for FrameBuffer {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameBuffer {
    /// Allocate a new frame buffer filled with black pixels.
    ///
    /// The whole frame is marked dirty, since the panel's contents are unknown
    /// until the first commit.
    pub fn new() -> Self {
        let mut pixels = Vec::new();
        if let Err(e) = pixels.try_reserve_exact(PIXEL_COUNT) {
            error!(
                "Frame buffer allocation of {} pixels failed: {:?}; frames will be dropped",
                PIXEL_COUNT, e
            );
            return Self::unallocated();
        }
        pixels.resize(PIXEL_COUNT, Rgb565::BLACK);

        Self {
            pixels,
            dirty: Some(DirtyRect::full_screen()),
        }
    }

    /// Buffer without pixel storage: draws are dropped, commits do nothing.
    fn unallocated() -> Self {
        Self {
            pixels: Vec::new(),
            dirty: None,
        }
    }

    /// Whether the pixel storage was successfully allocated.
    pub fn is_allocated(&self) -> bool {
        self.pixels.len() == PIXEL_COUNT
    }

    /// Whether anything changed since the last commit.
    pub fn is_dirty(&self) -> bool {
        self.dirty.is_some()
    }

    /// Region that the next commit will transfer, if any.
    pub fn dirty_area(&self) -> Option<Rectangle> {
        self.dirty.map(DirtyRect::to_rectangle)
    }

    /// Color at `point`, or `None` if out of bounds or unallocated.
    pub fn pixel(&self, point: Point) -> Option<Rgb565> {
        if point.x < 0 || point.y < 0 {
            return None;
        }
        let (x, y) = (point.x as usize, point.y as usize);
        if x >= WIDTH || y >= HEIGHT {
            return None;
        }
        self.pixels.get(y * WIDTH + x).copied()
    }

    /// Number of pixels currently holding `color`.
    pub fn count_color(&self, color: Rgb565) -> usize {
        self.pixels.iter().filter(|&&p| p == color).count()
    }

    /// Unchanged pixels don't grow the dirty region.
    #[inline]
    fn set_pixel(&mut self, x: usize, y: usize, color: Rgb565) {
        let Some(slot) = self.pixels.get_mut(y * WIDTH + x) else {
            return;
        };
        if *slot != color {
            *slot = color;
            match &mut self.dirty {
                Some(rect) => rect.expand(x, y),
                None => self.dirty = Some(DirtyRect::from_point(x, y)),
            }
        }
    }

    /// Transfer the dirty region to `display`, then reset the dirty state.
    ///
    /// Only the bounding rectangle of changed pixels is sent, via one
    /// `fill_contiguous` call. If nothing changed, this is a no-op.
    pub fn commit<D>(&mut self, display: &mut D) -> Result<(), D::Error>
    where
        D: DrawTarget<Color = Rgb565>,
    {
        if !self.is_allocated() {
            warn!("Commit skipped: frame buffer is not allocated");
            return Ok(());
        }

        let Some(rect) = self.dirty.take() else {
            return Ok(());
        };

        let area = rect.to_rectangle();
        debug!(
            "Committing {}x{} dirty region at ({}, {})",
            area.size.width, area.size.height, rect.min_x, rect.min_y
        );

        let pixels = &self.pixels;
        let width = rect.max_x - rect.min_x + 1;
        let pixel_iter = (rect.min_y..=rect.max_y).flat_map(move |y| {
            let row_start = y * WIDTH + rect.min_x;
            pixels[row_start..row_start + width].iter().copied()
        });

        display.fill_contiguous(&area, pixel_iter)
    }
}

impl OriginDimensions for FrameBuffer {
    fn size(&self) -> Size {
        Size::new(WIDTH as u32, HEIGHT as u32)
    }
}

impl DrawTarget for FrameBuffer {
    type Color = Rgb565;
    type Error = Infallible;

    fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        for Pixel(coord, color) in pixels {
            let x = coord.x;
            let y = coord.y;
            if x >= 0 && y >= 0 && (x as usize) < WIDTH && (y as usize) < HEIGHT {
                self.set_pixel(x as usize, y as usize, color);
            }
        }
        Ok(())
    }

    fn fill_contiguous<I>(&mut self, area: &Rectangle, colors: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Self::Color>,
    {
        // Colors are laid out row-major over the *unclipped* area.
        let mut colors = colors.into_iter();
        for row in 0..area.size.height as i32 {
            let y = area.top_left.y + row;
            for col in 0..area.size.width as i32 {
                let x = area.top_left.x + col;
                let Some(color) = colors.next() else {
                    return Ok(());
                };
                if x >= 0 && y >= 0 && (x as usize) < WIDTH && (y as usize) < HEIGHT {
                    self.set_pixel(x as usize, y as usize, color);
                }
            }
        }
        Ok(())
    }

    fn fill_solid(&mut self, area: &Rectangle, color: Self::Color) -> Result<(), Self::Error> {
        let x_start = (area.top_left.x.max(0) as usize).min(WIDTH);
        let y_start = (area.top_left.y.max(0) as usize).min(HEIGHT);
        let x_end = (area.top_left.x.saturating_add(area.size.width as i32).max(0) as usize).min(WIDTH);
        let y_end = (area.top_left.y.saturating_add(area.size.height as i32).max(0) as usize).min(HEIGHT);

        for y in y_start..y_end {
            for x in x_start..x_end {
                self.set_pixel(x, y, color);
            }
        }
        Ok(())
    }

    fn clear(&mut self, color: Self::Color) -> Result<(), Self::Error> {
        for y in 0..HEIGHT {
            for x in 0..WIDTH {
                self.set_pixel(x, y, color);
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::RecordingDisplay;

    #[test]
    fn test_new_buffer_is_black_and_fully_dirty() {
        let fb = FrameBuffer::new();
        assert!(fb.is_allocated());
        assert_eq!(fb.count_color(Rgb565::BLACK), PIXEL_COUNT);
        assert_eq!(
            fb.dirty_area(),
            Some(Rectangle::new(Point::zero(), Size::new(240, 240)))
        );
    }

    #[test]
    fn test_first_commit_sends_full_frame() {
        let mut fb = FrameBuffer::new();
        let mut display = RecordingDisplay::new();

        fb.commit(&mut display).unwrap();
        assert_eq!(display.transfers(), 1);
        assert_eq!(
            display.last_area(),
            Some(Rectangle::new(Point::zero(), Size::new(240, 240)))
        );
        assert!(!fb.is_dirty());
    }

    #[test]
    fn test_commit_sends_only_changed_region() {
        let mut fb = FrameBuffer::new();
        let mut display = RecordingDisplay::new();
        fb.commit(&mut display).unwrap();

        Pixel(Point::new(10, 20), Rgb565::RED).draw(&mut fb).unwrap();
        Pixel(Point::new(30, 25), Rgb565::GREEN).draw(&mut fb).unwrap();
        fb.commit(&mut display).unwrap();

        assert_eq!(display.transfers(), 2);
        assert_eq!(
            display.last_area(),
            Some(Rectangle::new(Point::new(10, 20), Size::new(21, 6)))
        );
        assert_eq!(display.pixel(Point::new(10, 20)), Some(Rgb565::RED));
        assert_eq!(display.pixel(Point::new(30, 25)), Some(Rgb565::GREEN));
    }

    #[test]
    fn test_unchanged_writes_do_not_dirty() {
        let mut fb = FrameBuffer::new();
        let mut display = RecordingDisplay::new();
        fb.commit(&mut display).unwrap();

        fb.clear(Rgb565::BLACK).unwrap();
        assert!(!fb.is_dirty());
        fb.commit(&mut display).unwrap();
        assert_eq!(display.transfers(), 1);
    }

    #[test]
    fn test_out_of_bounds_writes_are_dropped() {
        let mut fb = FrameBuffer::new();
        let mut display = RecordingDisplay::new();
        fb.commit(&mut display).unwrap();

        Pixel(Point::new(-1, 5), Rgb565::RED).draw(&mut fb).unwrap();
        Pixel(Point::new(240, 5), Rgb565::RED).draw(&mut fb).unwrap();
        Pixel(Point::new(5, 240), Rgb565::RED).draw(&mut fb).unwrap();
        assert!(!fb.is_dirty());
        assert_eq!(fb.pixel(Point::new(240, 5)), None);
    }

    #[test]
    fn test_unallocated_buffer_drops_frames() {
        let mut fb = FrameBuffer::unallocated();
        let mut display = RecordingDisplay::new();
        assert!(!fb.is_allocated());

        fb.clear(Rgb565::WHITE).unwrap();
        Pixel(Point::new(120, 120), Rgb565::RED).draw(&mut fb).unwrap();
        fb.fill_solid(
            &Rectangle::new(Point::new(10, 10), Size::new(5, 5)),
            Rgb565::BLUE,
        )
        .unwrap();

        assert!(!fb.is_dirty());
        assert_eq!(fb.pixel(Point::new(120, 120)), None);
        assert_eq!(fb.count_color(Rgb565::RED), 0);

        fb.commit(&mut display).unwrap();
        assert_eq!(display.transfers(), 0);
    }

    #[test]
    fn test_fill_solid_clips_to_screen() {
        let mut fb = FrameBuffer::new();
        fb.fill_solid(
            &Rectangle::new(Point::new(230, -5), Size::new(20, 10)),
            Rgb565::BLUE,
        )
        .unwrap();
        assert_eq!(fb.count_color(Rgb565::BLUE), 10 * 5);
        assert_eq!(fb.pixel(Point::new(239, 4)), Some(Rgb565::BLUE));
    }
}
