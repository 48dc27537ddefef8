//! Clock-face pieces shared by the clock modes: rim and ticks, hands,
//! progress rings and the text readouts.

use core::fmt::Write;

use embedded_graphics::mono_font::MonoFont;
use embedded_graphics::pixelcolor::Rgb565;
use embedded_graphics::prelude::*;
use heapless::String;

use crate::canvas::Canvas;
use crate::color::{DIAL_FOREGROUND, HOUR_RING, MINUTE_RING, SECOND_HAND, TICK_MINOR, TRACK};
use crate::geometry::{HandAngles, point_on_circle, tick_angles};
use crate::time::TimeSample;

/// Outer radius of the clock face rim.
pub const RIM_RADIUS: u32 = 118;

const TICK_OUTER: f32 = 114.0;
const TICK_INNER_MINOR: f32 = 104.0;
const TICK_INNER_QUARTER: f32 = 96.0;

const PIVOT_RADIUS: u32 = 4;

/// Length and stroke of the three hands.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HandLengths {
    pub hour: f32,
    pub minute: f32,
    pub second: f32,
}

impl HandLengths {
    /// Hands for a full-size face.
    pub const FULL: HandLengths = HandLengths {
        hour: 60.0,
        minute: 85.0,
        second: 100.0,
    };

    /// Hands that fit inside the progress rings.
    pub const INSIDE_RINGS: HandLengths = HandLengths {
        hour: 40.0,
        minute: 60.0,
        second: 70.0,
    };
}

/// Radii of one progress ring.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ring {
    pub outer: u32,
    pub inner: u32,
}

pub const SECONDS_RING: Ring = Ring { outer: 116, inner: 106 };
pub const MINUTES_RING: Ring = Ring { outer: 102, inner: 92 };
pub const HOURS_RING: Ring = Ring { outer: 88, inner: 78 };

/// Rim circle plus twelve ticks, the quarter ticks longer and brighter.
pub fn draw_face<D>(target: &mut D, center: Point) -> Result<(), D::Error>
where
    D: DrawTarget<Color = Rgb565>,
{
    target.circle_outline(center, RIM_RADIUS, 2, DIAL_FOREGROUND)?;

    for (index, angle) in tick_angles().enumerate() {
        let quarter = index % 3 == 0;
        let (inner, width, color) = if quarter {
            (TICK_INNER_QUARTER, 3, DIAL_FOREGROUND)
        } else {
            (TICK_INNER_MINOR, 1, TICK_MINOR)
        };
        target.line(
            point_on_circle(center, inner, angle),
            point_on_circle(center, TICK_OUTER, angle),
            width,
            color,
        )?;
    }
    Ok(())
}

/// Hour, minute and second hands drawn from `center`, with the pivot on top.
pub fn draw_hands<D>(
    target: &mut D,
    center: Point,
    angles: HandAngles,
    lengths: HandLengths,
) -> Result<(), D::Error>
where
    D: DrawTarget<Color = Rgb565>,
{
    target.line(
        center,
        point_on_circle(center, lengths.hour, angles.hour),
        4,
        DIAL_FOREGROUND,
    )?;
    target.line(
        center,
        point_on_circle(center, lengths.minute, angles.minute),
        3,
        DIAL_FOREGROUND,
    )?;
    target.line(
        center,
        point_on_circle(center, lengths.second, angles.second),
        1,
        SECOND_HAND,
    )?;
    target.filled_circle(center, PIVOT_RADIUS, SECOND_HAND)
}

/// Seconds, minutes and hours progress rings on their dim tracks.
///
/// Each ring's sweep is the smooth angle of the matching hand, anchored at
/// 12 o'clock.
pub fn draw_rings<D>(target: &mut D, center: Point, angles: HandAngles) -> Result<(), D::Error>
where
    D: DrawTarget<Color = Rgb565>,
{
    let rings = [
        (SECONDS_RING, angles.second, SECOND_HAND),
        (MINUTES_RING, angles.minute, MINUTE_RING),
        (HOURS_RING, angles.hour, HOUR_RING),
    ];
    for (ring, sweep, color) in rings {
        target.fill_arc(center, ring.outer, ring.inner, 0.0, 360.0, TRACK)?;
        target.fill_arc(center, ring.outer, ring.inner, 0.0, sweep, color)?;
    }
    Ok(())
}

/// `HH:MM:SS`
pub fn format_time(time: TimeSample) -> String<8> {
    let mut text = String::new();
    // 8 bytes always fit
    let _ = write!(text, "{}", time);
    text
}

/// `HH:MM`
pub fn format_hours_minutes(time: TimeSample) -> String<5> {
    let mut text = String::new();
    let _ = write!(text, "{:02}:{:02}", time.hours, time.minutes);
    text
}

/// Temperature with one decimal, e.g. `21.4°C`. Needs an ISO-8859-1 font.
pub fn format_temperature(temperature_c: f32) -> String<16> {
    let mut text = String::new();
    if write!(text, "{:.1}\u{B0}C", temperature_c).is_err() {
        text.clear();
        let _ = text.push_str("--.-\u{B0}C");
    }
    text
}

/// Relative humidity, e.g. `45 %RH`.
pub fn format_humidity(humidity_pct: f32) -> String<12> {
    let mut text = String::new();
    if write!(text, "{:.0} %RH", humidity_pct).is_err() {
        text.clear();
        let _ = text.push_str("-- %RH");
    }
    text
}

/// Draw `text` centred on `center`.
pub fn draw_readout<D>(
    target: &mut D,
    text: &str,
    center: Point,
    font: &MonoFont<'_>,
    color: Rgb565,
) -> Result<(), D::Error>
where
    D: DrawTarget<Color = Rgb565>,
{
    target.text_centered(text, center, font, color)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::BACKGROUND;
    use crate::display::DISPLAY_CENTER;
    use crate::framebuffer::FrameBuffer;

    #[test]
    fn test_formatting() {
        let time = TimeSample::new(7, 5, 9).unwrap();
        assert_eq!(format_time(time).as_str(), "07:05:09");
        assert_eq!(format_hours_minutes(time).as_str(), "07:05");
        assert_eq!(format_temperature(21.44).as_str(), "21.4\u{B0}C");
        assert_eq!(format_temperature(-3.06).as_str(), "-3.1\u{B0}C");
        assert_eq!(format_humidity(45.4).as_str(), "45 %RH");
    }

    #[test]
    fn test_huge_temperature_falls_back() {
        assert_eq!(format_temperature(1.0e30).as_str(), "--.-\u{B0}C");
    }

    #[test]
    fn test_quarter_ticks_are_bright() {
        let mut fb = FrameBuffer::new();
        draw_face(&mut fb, DISPLAY_CENTER).unwrap();

        // 12 o'clock quarter tick spans y = 6..=24
        assert_eq!(fb.pixel(Point::new(120, 15)), Some(DIAL_FOREGROUND));
        // 1 o'clock minor tick: a steep 1 px line, so about one pixel per row
        let inner = point_on_circle(DISPLAY_CENTER, 104.0, 30.0);
        let outer = point_on_circle(DISPLAY_CENTER, 114.0, 30.0);
        let (x_min, x_max) = (inner.x.min(outer.x), inner.x.max(outer.x));
        let (y_min, y_max) = (inner.y.min(outer.y), inner.y.max(outer.y));
        let covered = (y_min..=y_max)
            .flat_map(|y| (x_min..=x_max).map(move |x| Point::new(x, y)))
            .filter(|&p| fb.pixel(p) == Some(TICK_MINOR))
            .count();
        assert!(covered >= (y_max - y_min) as usize, "minor tick covers {} pixels", covered);
        // Quarter ticks reach further in than minor ones
        let short = point_on_circle(DISPLAY_CENTER, 100.0, 30.0);
        assert_eq!(fb.pixel(short), Some(BACKGROUND));
    }

    #[test]
    fn test_rings_follow_hands() {
        let mut fb = FrameBuffer::new();
        // 00:30:15: seconds ring at a quarter, minute ring half way
        let angles = HandAngles::from_time(TimeSample::new(0, 30, 15).unwrap());
        draw_rings(&mut fb, DISPLAY_CENTER, angles).unwrap();

        // Seconds ring: 45° is filled, 180° is only track
        let filled = point_on_circle(DISPLAY_CENTER, 111.0, 45.0);
        let unfilled = point_on_circle(DISPLAY_CENTER, 111.0, 180.0);
        assert_eq!(fb.pixel(filled), Some(SECOND_HAND));
        assert_eq!(fb.pixel(unfilled), Some(TRACK));

        // Minute ring: 3 o'clock filled, 9 o'clock track
        assert_eq!(fb.pixel(DISPLAY_CENTER + Point::new(97, 0)), Some(MINUTE_RING));
        assert_eq!(fb.pixel(DISPLAY_CENTER - Point::new(97, 0)), Some(TRACK));

        // Hour ring: 15° sweep, so 90° stays dim
        assert_eq!(fb.pixel(DISPLAY_CENTER + Point::new(83, 0)), Some(TRACK));
    }
}
