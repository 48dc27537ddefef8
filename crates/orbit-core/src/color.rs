//! Scalar-to-color conversion and the shared palette.
//!
//! All colors are RGB565, the native format of the GC9A01 panel.
//!
//! # RGB565 Format
//! - Red: 5 bits (0-31)
//! - Green: 6 bits (0-63)
//! - Blue: 5 bits (0-31)
//!
//! To convert from 8-bit RGB: R>>3, G>>2, B>>3

use embedded_graphics::pixelcolor::Rgb565;
use libm::{roundf, sinf};

/// Pack 8-bit channels into RGB565 by truncating the low bits.
#[inline]
pub const fn rgb565(r: u8, g: u8, b: u8) -> Rgb565 {
    Rgb565::new(r >> 3, g >> 2, b >> 3)
}

// ============================================================================
// Palette
// ============================================================================

/// Background outside the dial and behind every mode.
pub const BACKGROUND: Rgb565 = rgb565(0, 0, 0);

/// Dial rim and hour/minute hands.
pub const DIAL_FOREGROUND: Rgb565 = rgb565(255, 255, 255);

/// Minor tick marks.
pub const TICK_MINOR: Rgb565 = rgb565(150, 150, 150);

/// Second hand and seconds ring.
pub const SECOND_HAND: Rgb565 = rgb565(255, 60, 60);

/// Unfilled part of progress rings and gauges.
pub const TRACK: Rgb565 = rgb565(40, 44, 52);

/// Minutes ring.
pub const MINUTE_RING: Rgb565 = rgb565(80, 200, 255);

/// Hours ring.
pub const HOUR_RING: Rgb565 = rgb565(255, 190, 60);

/// Error text and rings.
pub const ERROR: Rgb565 = rgb565(255, 0, 0);

/// Stale sensor readings and secondary labels.
pub const MUTED: Rgb565 = rgb565(128, 128, 128);

/// Startup diagnostic label.
pub const DIAGNOSTIC_LABEL: Rgb565 = rgb565(255, 255, 0);

/// Startup diagnostic diagonals.
pub const DIAGNOSTIC_DIAGONAL: Rgb565 = rgb565(255, 0, 0);

/// Startup diagnostic rectangles.
pub const DIAGNOSTIC_FRAME: Rgb565 = rgb565(0, 0, 255);

/// Stars.
pub const STAR: Rgb565 = rgb565(255, 255, 255);

// ============================================================================
// Temperature gradient
// ============================================================================

/// Lowest temperature on the gradient; colder readings clamp to blue.
pub const TEMPERATURE_MIN_C: f32 = -5.0;

/// Highest temperature on the gradient; warmer readings clamp to red.
pub const TEMPERATURE_MAX_C: f32 = 50.0;

/// Gradient stops as (normalized position, 8-bit RGB).
const TEMPERATURE_STOPS: [(f32, [u8; 3]); 4] = [
    (0.0, [0, 0, 255]),
    (0.5, [0, 255, 0]),
    (0.8, [255, 165, 0]),
    (1.0, [255, 0, 0]),
];

/// Position of `temp_c` on the gradient, clamped to `[0, 1]`.
///
/// NaN is treated as the cold end.
pub fn normalize_temperature(temp_c: f32) -> f32 {
    if temp_c.is_nan() {
        return 0.0;
    }
    let clamped = temp_c.clamp(TEMPERATURE_MIN_C, TEMPERATURE_MAX_C);
    (clamped - TEMPERATURE_MIN_C) / (TEMPERATURE_MAX_C - TEMPERATURE_MIN_C)
}

/// 8-bit RGB for a normalized gradient position.
pub fn gradient_rgb(position: f32) -> [u8; 3] {
    let position = if position.is_nan() {
        0.0
    } else {
        position.clamp(0.0, 1.0)
    };

    for pair in TEMPERATURE_STOPS.windows(2) {
        let (start_pos, start) = pair[0];
        let (end_pos, end) = pair[1];
        if position <= end_pos {
            let f = (position - start_pos) / (end_pos - start_pos);
            return [
                lerp_channel(start[0], end[0], f),
                lerp_channel(start[1], end[1], f),
                lerp_channel(start[2], end[2], f),
            ];
        }
    }

    TEMPERATURE_STOPS[TEMPERATURE_STOPS.len() - 1].1
}

/// Map a temperature in °C onto the blue → green → orange → red gradient.
pub fn temperature_to_color(temp_c: f32) -> Rgb565 {
    let [r, g, b] = gradient_rgb(normalize_temperature(temp_c));
    rgb565(r, g, b)
}

#[inline]
fn lerp_channel(a: u8, b: u8, f: f32) -> u8 {
    let value = a as f32 + (b as f32 - a as f32) * f;
    roundf(value).clamp(0.0, 255.0) as u8
}

// ============================================================================
// Plasma
// ============================================================================

/// Channel phase offsets in radians (R, G, B).
pub const PLASMA_CHANNEL_OFFSETS: [f32; 3] = [0.0, 2.1, 4.2];

const PLASMA_X_SCALE: f32 = 0.045;
const PLASMA_Y_SCALE: f32 = 0.035;
const PLASMA_DIAGONAL_SCALE: f32 = 0.025;

/// Interference phase of the three plasma waves at an offset from the centre.
///
/// The time multipliers (1, 2, 1/2) share a period of 4π, which lets the
/// renderer wrap its accumulator there without a visible jump.
#[inline]
pub fn plasma_phase(x: f32, y: f32, t: f32) -> f32 {
    sinf(x * PLASMA_X_SCALE + t)
        + sinf(y * PLASMA_Y_SCALE + t * 2.0)
        + sinf((x + y) * PLASMA_DIAGONAL_SCALE + t * 0.5)
}

/// 8-bit RGB channels of the plasma at offset `(x, y)` and time `t`.
pub fn plasma_channels(x: f32, y: f32, t: f32) -> [u8; 3] {
    let phase = plasma_phase(x, y, t);
    PLASMA_CHANNEL_OFFSETS.map(|offset| (sinf(phase + t + offset) * 127.0 + 128.0) as u8)
}

/// Plasma color at offset `(x, y)` from the display centre and time `t`.
#[inline]
pub fn plasma_color(x: f32, y: f32, t: f32) -> Rgb565 {
    let [r, g, b] = plasma_channels(x, y, t);
    rgb565(r, g, b)
}

#[cfg(test)]
mod tests {
    use super::*;
    use embedded_graphics::prelude::RgbColor;

    #[test]
    fn test_temperature_endpoints() {
        assert_eq!(temperature_to_color(-5.0), rgb565(0, 0, 255));
        assert_eq!(temperature_to_color(50.0), rgb565(255, 0, 0));
        assert_eq!(temperature_to_color(-5.0), Rgb565::BLUE);
        assert_eq!(temperature_to_color(50.0), Rgb565::RED);
    }

    #[test]
    fn test_temperature_clamps_beyond_range() {
        assert_eq!(temperature_to_color(-40.0), temperature_to_color(-5.0));
        assert_eq!(temperature_to_color(-5.01), temperature_to_color(-5.0));
        assert_eq!(temperature_to_color(120.0), temperature_to_color(50.0));
        assert_eq!(temperature_to_color(f32::NAN), temperature_to_color(-5.0));
    }

    #[test]
    fn test_midpoint_is_green() {
        // 22.5 °C sits exactly on the 0.5 stop
        assert_eq!(temperature_to_color(22.5), rgb565(0, 255, 0));
    }

    #[test]
    fn test_warm_reading_on_green_orange_segment() {
        let [r, g, b] = gradient_rgb(normalize_temperature(27.5));
        assert!(r > 0 && r < 255, "red should be partially mixed in: {}", r);
        assert!((165..=255).contains(&g), "green between orange and green: {}", g);
        assert_eq!(b, 0, "no blue past the green stop");

        // Closer to green than to orange (0.59 of the way vs 0.8)
        assert!(g > 200);
    }

    #[test]
    fn test_gradient_is_monotonic_in_red_on_warm_side() {
        let mut last_red = 0;
        for tenth in 225..=500 {
            let temp = tenth as f32 / 10.0;
            let [r, _, _] = gradient_rgb(normalize_temperature(temp));
            assert!(r >= last_red, "red decreased at {}", temp);
            last_red = r;
        }
    }

    #[test]
    fn test_plasma_is_pure() {
        let a = plasma_color(37.0, -12.0, 5.25);
        let b = plasma_color(37.0, -12.0, 5.25);
        assert_eq!(a, b);
    }

    #[test]
    fn test_plasma_centre_at_time_zero() {
        // Every wave term is sin(0), so each channel is sin(offset) * 127 + 128
        assert_eq!(plasma_channels(0.0, 0.0, 0.0), [128, 237, 17]);
        assert_eq!(plasma_color(0.0, 0.0, 0.0), rgb565(128, 237, 17));
    }

    #[test]
    fn test_plasma_periodic_in_four_pi() {
        let period = 4.0 * core::f32::consts::PI;
        let t = 1.3;
        let a = plasma_channels(40.0, 25.0, t);
        let b = plasma_channels(40.0, 25.0, t + period);
        for i in 0..3 {
            assert!(
                (a[i] as i16 - b[i] as i16).abs() <= 1,
                "channel {} differs across period: {} vs {}",
                i,
                a[i],
                b[i]
            );
        }
    }
}
