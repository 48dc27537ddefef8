//! Flying-through-space starfield.
//!
//! Stars live in a 3D box in front of the viewer and drift towards it at a
//! constant speed. Each one is projected with a simple perspective divide
//! and respawned at the back of the box once it passes the near plane.

use embedded_graphics::pixelcolor::Rgb565;
use embedded_graphics::prelude::*;
use log::debug;
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use crate::canvas::Canvas;
use crate::color::{BACKGROUND, STAR};
use crate::display::{DISPLAY_CENTER_PX, DISPLAY_RADIUS_PX, DISPLAY_SIZE_PX};
use crate::geometry::within_radius;
use crate::modes::{FrameContext, FrameOutcome, Mode, Renderer};

pub const STAR_COUNT: usize = 80;

/// Depth travelled per frame.
pub const STAR_SPEED: f32 = 0.6;

/// Stars at or in front of this depth respawn.
const NEAR_PLANE: f32 = 1.0;

/// Half-width of the spawn box; also the projection scale.
const FIELD_EXTENT: i32 = DISPLAY_RADIUS_PX;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Star {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Star {
    fn spawn(rng: &mut SmallRng) -> Self {
        Self {
            x: rng.gen_range(-FIELD_EXTENT..=FIELD_EXTENT) as f32,
            y: rng.gen_range(-FIELD_EXTENT..=FIELD_EXTENT) as f32,
            z: rng.gen_range(2..=FIELD_EXTENT) as f32,
        }
    }

    /// Screen position of the star, or `None` if it falls outside the panel.
    pub fn project(&self) -> Option<Point> {
        let scale = FIELD_EXTENT as f32;
        let sx = DISPLAY_CENTER_PX + (self.x / self.z * scale) as i32;
        let sy = DISPLAY_CENTER_PX + (self.y / self.z * scale) as i32;
        let size = DISPLAY_SIZE_PX as i32;
        if sx < 0 || sx >= size || sy < 0 || sy >= size {
            return None;
        }
        Some(Point::new(sx, sy))
    }
}

pub struct StarfieldRenderer {
    stars: [Star; STAR_COUNT],
    rng: SmallRng,
}

impl StarfieldRenderer {
    pub fn new(seed: u64) -> Self {
        let mut rng = SmallRng::seed_from_u64(seed);
        let stars = core::array::from_fn(|_| Star::spawn(&mut rng));
        Self { stars, rng }
    }

    pub fn stars(&self) -> &[Star] {
        &self.stars
    }
}

impl Renderer for StarfieldRenderer {
    fn mode(&self) -> Mode {
        Mode::Starfield
    }

    fn render<D: DrawTarget<Color = Rgb565>>(
        &mut self,
        _ctx: &FrameContext,
        target: &mut D,
    ) -> Result<FrameOutcome, D::Error> {
        target.clear(BACKGROUND)?;

        let mut respawned = 0;
        for star in self.stars.iter_mut() {
            star.z -= STAR_SPEED;
            if star.z <= NEAR_PLANE {
                *star = Star::spawn(&mut self.rng);
                respawned += 1;
                continue;
            }

            let Some(point) = star.project() else {
                continue;
            };
            if within_radius(
                point.x,
                point.y,
                DISPLAY_CENTER_PX,
                DISPLAY_CENTER_PX,
                DISPLAY_RADIUS_PX,
            ) {
                target.plot(point, STAR)?;
            }
        }

        if respawned > 0 {
            debug!("Starfield: respawned {} stars", respawned);
        }
        Ok(FrameOutcome::Complete)
    }
}
