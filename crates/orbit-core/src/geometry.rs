//! Clock-face geometry.
//!
//! Angles are in degrees with 0° pointing up and increasing clockwise, the
//! same convention as a clock face. In screen coordinates (y grows downward):
//!
//! ```text
//! x = cx + r·sin(θ)
//! y = cy − r·cos(θ)
//! ```

use embedded_graphics::prelude::Point;
use libm::{atan2f, cosf, roundf, sinf};

use crate::time::TimeSample;

/// Number of tick marks around the dial.
pub const TICK_COUNT: usize = 12;

/// Angular distance between neighbouring ticks.
pub const TICK_STEP_DEG: f32 = 360.0 / TICK_COUNT as f32;

/// Which hand an angle is computed for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HandUnit {
    Hour,
    Minute,
    Second,
}

/// Smooth-hand angle for `unit`.
///
/// `value` is the unit's own count and `sub_value` the progress of the next
/// smaller unit, so hands creep instead of jumping:
///
/// | unit   | value   | sub_value    | angle                    |
/// |--------|---------|--------------|--------------------------|
/// | Hour   | hours   | minutes      | (h mod 12)·30 + m·0.5    |
/// | Minute | minutes | seconds      | m·6 + s·0.1              |
/// | Second | seconds | milliseconds | s·6 + ms·0.006           |
pub fn hand_angle_degrees(unit: HandUnit, value: u32, sub_value: f32) -> f32 {
    match unit {
        HandUnit::Hour => (value % 12) as f32 * 30.0 + sub_value * 0.5,
        HandUnit::Minute => (value % 60) as f32 * 6.0 + sub_value * 0.1,
        HandUnit::Second => (value % 60) as f32 * 6.0 + sub_value * 0.006,
    }
}

/// Angles for all three hands of a time sample.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HandAngles {
    pub hour: f32,
    pub minute: f32,
    pub second: f32,
}

impl HandAngles {
    pub fn from_time(time: TimeSample) -> Self {
        Self {
            hour: hand_angle_degrees(HandUnit::Hour, time.hours as u32, time.minutes as f32),
            minute: hand_angle_degrees(HandUnit::Minute, time.minutes as u32, time.seconds as f32),
            second: hand_angle_degrees(HandUnit::Second, time.seconds as u32, 0.0),
        }
    }
}

/// Point at `radius` from `(cx, cy)` along `angle_deg`, unrounded.
#[inline]
pub fn polar(cx: f32, cy: f32, radius: f32, angle_deg: f32) -> (f32, f32) {
    let theta = angle_deg.to_radians();
    (cx + radius * sinf(theta), cy - radius * cosf(theta))
}

/// Pixel at `radius` from `center` along `angle_deg`.
pub fn point_on_circle(center: Point, radius: f32, angle_deg: f32) -> Point {
    let (x, y) = polar(center.x as f32, center.y as f32, radius, angle_deg);
    Point::new(roundf(x) as i32, roundf(y) as i32)
}

/// The twelve tick angles, starting at 12 o'clock.
pub fn tick_angles() -> impl Iterator<Item = f32> {
    (0..TICK_COUNT).map(|i| i as f32 * TICK_STEP_DEG)
}

/// Wrap an angle into `[0, 360)`.
#[inline]
pub fn normalize_degrees(angle: f32) -> f32 {
    let wrapped = angle % 360.0;
    let wrapped = if wrapped < 0.0 { wrapped + 360.0 } else { wrapped };
    if wrapped >= 360.0 { 0.0 } else { wrapped }
}

/// Clock-convention angle of the offset `(dx, dy)` from a centre, in `[0, 360)`.
#[inline]
pub fn clockwise_angle(dx: f32, dy: f32) -> f32 {
    normalize_degrees(atan2f(dx, -dy).to_degrees())
}

/// Whether `(x, y)` lies inside the circle of `radius` around `(cx, cy)`.
#[inline]
pub const fn within_radius(x: i32, y: i32, cx: i32, cy: i32, radius: i32) -> bool {
    let dx = x - cx;
    let dy = y - cy;
    dx * dx + dy * dy <= radius * radius
}
