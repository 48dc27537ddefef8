//! Startup clipping test.
//!
//! Drawn straight to the panel before the render loop starts, so a wrong
//! offset, inversion or rotation setting is obvious at a glance: the nested
//! rectangles should touch the corners of the physical glass and the
//! diagonals should cross exactly at the centre.

use embedded_graphics::mono_font::ascii::FONT_10X20;
use embedded_graphics::pixelcolor::Rgb565;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::{PrimitiveStyle, Rectangle};

use crate::canvas::Canvas;
use crate::color::{BACKGROUND, DIAGNOSTIC_DIAGONAL, DIAGNOSTIC_FRAME, DIAGNOSTIC_LABEL};
use crate::display::{DISPLAY_CENTER, DISPLAY_SIZE_PX};

/// How long the pattern stays up before the first frame.
pub const DIAGNOSTIC_HOLD_MS: u64 = 3_000;

/// Inset between neighbouring rectangles.
const FRAME_STEP_PX: u32 = 20;

/// Largest rectangle inset.
const FRAME_MAX_INSET_PX: u32 = 100;

pub fn draw_clipping_test<D>(target: &mut D) -> Result<(), D::Error>
where
    D: DrawTarget<Color = Rgb565>,
{
    let size = DISPLAY_SIZE_PX as u32;
    let last = size as i32 - 1;

    target.clear(BACKGROUND)?;
    target.text_centered("Clipping test", DISPLAY_CENTER, &FONT_10X20, DIAGNOSTIC_LABEL)?;

    target.line(Point::zero(), Point::new(last, last), 1, DIAGNOSTIC_DIAGONAL)?;
    target.line(Point::new(0, last), Point::new(last, 0), 1, DIAGNOSTIC_DIAGONAL)?;

    let frame = PrimitiveStyle::with_stroke(DIAGNOSTIC_FRAME, 1);
    for inset in (0..=FRAME_MAX_INSET_PX).step_by(FRAME_STEP_PX as usize) {
        let side = size - 2 * inset;
        Rectangle::new(Point::new(inset as i32, inset as i32), Size::new(side, side))
            .into_styled(frame)
            .draw(target)?;
    }

    Ok(())
}
