//! Frame shown by wall-clock modes while no NTP sync has completed.

use embedded_graphics::mono_font::ascii::FONT_10X20;
use embedded_graphics::pixelcolor::Rgb565;
use embedded_graphics::prelude::*;

use crate::canvas::Canvas;
use crate::color::{BACKGROUND, DIAL_FOREGROUND, ERROR};
use crate::display::DISPLAY_CENTER;
use crate::modes::FrameOutcome;

pub const ERROR_RING_OUTER: u32 = 118;
pub const ERROR_RING_INNER: u32 = 112;

/// Vertical distance of each text line from the centre.
const LINE_OFFSET_PX: i32 = 20;

/// Draw the time-error frame and report it.
pub fn draw_time_error<D>(target: &mut D) -> Result<FrameOutcome, D::Error>
where
    D: DrawTarget<Color = Rgb565>,
{
    target.clear(BACKGROUND)?;
    target.fill_arc(
        DISPLAY_CENTER,
        ERROR_RING_OUTER,
        ERROR_RING_INNER,
        0.0,
        360.0,
        ERROR,
    )?;
    target.text_centered(
        "Time Error",
        DISPLAY_CENTER - Point::new(0, LINE_OFFSET_PX),
        &FONT_10X20,
        ERROR,
    )?;
    target.text_centered(
        "No NTP sync",
        DISPLAY_CENTER + Point::new(0, LINE_OFFSET_PX),
        &FONT_10X20,
        DIAL_FOREGROUND,
    )?;
    Ok(FrameOutcome::TimeUnavailable)
}
