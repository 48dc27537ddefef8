//! Visualization modes and their renderers.
//!
//! Every mode is a [`Renderer`] that paints one complete frame per call into a
//! `DrawTarget<Color = Rgb565>` (in practice the [`FrameBuffer`]). The
//! [`RendererWrapper`] enum holds whichever renderer is active so the main
//! loop can switch modes at runtime without `dyn`.
//!
//! Modes that read the wall clock and find it unsynchronized draw the shared
//! time-error frame instead and report [`FrameOutcome::TimeUnavailable`].
//!
//! [`FrameBuffer`]: crate::framebuffer::FrameBuffer

pub mod arc_clock;
pub mod clock;
pub mod clock_with_temp;
pub mod dial;
pub mod plasma;
pub mod sensor_readout;
pub mod starfield;
pub mod temp_arc;
pub mod time_error;

extern crate alloc;
use alloc::boxed::Box;

use embedded_graphics::pixelcolor::Rgb565;
use embedded_graphics::prelude::*;
use serde::{Deserialize, Serialize};

use crate::environment::EnvironmentStatus;
use crate::time::{TimeError, TimeSample};

use arc_clock::{ArcAnalogClockRenderer, ArcClockRenderer};
use clock::ClockRenderer;
use clock_with_temp::ClockWithTempRenderer;
use plasma::PlasmaRenderer;
use sensor_readout::SensorReadoutRenderer;
use starfield::StarfieldRenderer;
use temp_arc::TempArcRenderer;

// ---------------------------------------------------------------------------
// Mode
// ---------------------------------------------------------------------------

/// The visualization shown on the panel.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Mode {
    #[default]
    Starfield,
    Clock,
    Plasma,
    ArcClock,
    ArcAnalogClock,
    SensorReadout,
    ClockWithTemp,
    TempArc,
}

/// Where a mode gets its time of day from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeSource {
    /// The mode does not show time.
    None,
    /// Time since boot; always available.
    Uptime,
    /// NTP-synchronized local time; unavailable until the first sync.
    WallClock,
}

impl Mode {
    /// Every mode, in selection order.
    pub const ALL: [Mode; 8] = [
        Mode::Starfield,
        Mode::Clock,
        Mode::Plasma,
        Mode::ArcClock,
        Mode::ArcAnalogClock,
        Mode::SensorReadout,
        Mode::ClockWithTemp,
        Mode::TempArc,
    ];

    /// Position of this mode in [`Mode::ALL`].
    pub fn index(self) -> usize {
        Self::ALL.iter().position(|&m| m == self).unwrap_or(0)
    }

    pub fn from_index(index: usize) -> Option<Mode> {
        Self::ALL.get(index).copied()
    }

    /// The following mode, wrapping around.
    pub fn next(self) -> Mode {
        Self::ALL[(self.index() + 1) % Self::ALL.len()]
    }

    /// The preceding mode, wrapping around.
    pub fn prev(self) -> Mode {
        Self::ALL[(self.index() + Self::ALL.len() - 1) % Self::ALL.len()]
    }

    pub const fn title(self) -> &'static str {
        match self {
            Mode::Starfield => "Starfield",
            Mode::Clock => "Clock",
            Mode::Plasma => "Plasma",
            Mode::ArcClock => "Arc clock",
            Mode::ArcAnalogClock => "Arc analog clock",
            Mode::SensorReadout => "Sensor readout",
            Mode::ClockWithTemp => "Clock with temperature",
            Mode::TempArc => "Temperature arc",
        }
    }

    pub const fn time_source(self) -> TimeSource {
        match self {
            Mode::Starfield | Mode::Plasma | Mode::SensorReadout => TimeSource::None,
            Mode::Clock | Mode::ArcClock => TimeSource::Uptime,
            Mode::ArcAnalogClock | Mode::ClockWithTemp | Mode::TempArc => TimeSource::WallClock,
        }
    }

    /// Whether the mode shows sensor readings, so the loop should poll the sensor.
    pub const fn uses_environment(self) -> bool {
        matches!(
            self,
            Mode::SensorReadout | Mode::ClockWithTemp | Mode::TempArc
        )
    }
}

// ---------------------------------------------------------------------------
// Renderer trait
// ---------------------------------------------------------------------------

/// Inputs for one frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameContext {
    /// Time of day from the mode's [`TimeSource`]. Modes without a time
    /// source receive the uptime-derived sample and ignore it.
    pub time: Result<TimeSample, TimeError>,
    pub environment: EnvironmentStatus,
}

/// How a frame turned out.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameOutcome {
    Complete,
    /// The mode needed wall-clock time and drew the time-error frame instead.
    TimeUnavailable,
}

/// A procedural frame generator for one mode.
pub trait Renderer {
    fn mode(&self) -> Mode;

    /// Paint a complete frame.
    ///
    /// Renderers own their animation state (star positions, plasma phase)
    /// and advance it once per call.
    fn render<D: DrawTarget<Color = Rgb565>>(
        &mut self,
        ctx: &FrameContext,
        target: &mut D,
    ) -> Result<FrameOutcome, D::Error>;
}

impl<T: Renderer> Renderer for Box<T> {
    fn mode(&self) -> Mode {
        (**self).mode()
    }

    fn render<D: DrawTarget<Color = Rgb565>>(
        &mut self,
        ctx: &FrameContext,
        target: &mut D,
    ) -> Result<FrameOutcome, D::Error> {
        (**self).render(ctx, target)
    }
}

// ---------------------------------------------------------------------------
// RendererWrapper
// ---------------------------------------------------------------------------

/// Enum holding one of the concrete renderers.
///
/// Variants are boxed so the wrapper stays small regardless of renderer state
/// (the starfield carries its whole particle array).
pub enum RendererWrapper {
    Starfield(Box<StarfieldRenderer>),
    Clock(Box<ClockRenderer>),
    Plasma(Box<PlasmaRenderer>),
    ArcClock(Box<ArcClockRenderer>),
    ArcAnalogClock(Box<ArcAnalogClockRenderer>),
    SensorReadout(Box<SensorReadoutRenderer>),
    ClockWithTemp(Box<ClockWithTempRenderer>),
    TempArc(Box<TempArcRenderer>),
}

impl RendererWrapper {
    /// Fresh renderer for `mode`. `seed` feeds the starfield's generator.
    pub fn for_mode(mode: Mode, seed: u64) -> Self {
        match mode {
            Mode::Starfield => RendererWrapper::Starfield(Box::new(StarfieldRenderer::new(seed))),
            Mode::Clock => RendererWrapper::Clock(Box::new(ClockRenderer::new())),
            Mode::Plasma => RendererWrapper::Plasma(Box::new(PlasmaRenderer::new())),
            Mode::ArcClock => RendererWrapper::ArcClock(Box::new(ArcClockRenderer::new())),
            Mode::ArcAnalogClock => {
                RendererWrapper::ArcAnalogClock(Box::new(ArcAnalogClockRenderer::new()))
            }
            Mode::SensorReadout => {
                RendererWrapper::SensorReadout(Box::new(SensorReadoutRenderer::new()))
            }
            Mode::ClockWithTemp => {
                RendererWrapper::ClockWithTemp(Box::new(ClockWithTempRenderer::new()))
            }
            Mode::TempArc => RendererWrapper::TempArc(Box::new(TempArcRenderer::new())),
        }
    }
}

impl Renderer for RendererWrapper {
    fn mode(&self) -> Mode {
        match self {
            RendererWrapper::Starfield(r) => r.mode(),
            RendererWrapper::Clock(r) => r.mode(),
            RendererWrapper::Plasma(r) => r.mode(),
            RendererWrapper::ArcClock(r) => r.mode(),
            RendererWrapper::ArcAnalogClock(r) => r.mode(),
            RendererWrapper::SensorReadout(r) => r.mode(),
            RendererWrapper::ClockWithTemp(r) => r.mode(),
            RendererWrapper::TempArc(r) => r.mode(),
        }
    }

    fn render<D: DrawTarget<Color = Rgb565>>(
        &mut self,
        ctx: &FrameContext,
        target: &mut D,
    ) -> Result<FrameOutcome, D::Error> {
        match self {
            RendererWrapper::Starfield(r) => r.render(ctx, target),
            RendererWrapper::Clock(r) => r.render(ctx, target),
            RendererWrapper::Plasma(r) => r.render(ctx, target),
            RendererWrapper::ArcClock(r) => r.render(ctx, target),
            RendererWrapper::ArcAnalogClock(r) => r.render(ctx, target),
            RendererWrapper::SensorReadout(r) => r.render(ctx, target),
            RendererWrapper::ClockWithTemp(r) => r.render(ctx, target),
            RendererWrapper::TempArc(r) => r.render(ctx, target),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::framebuffer::FrameBuffer;
    use crate::test_support::frame;

    #[test]
    fn test_next_prev_wrap() {
        assert_eq!(Mode::Starfield.next(), Mode::Clock);
        assert_eq!(Mode::TempArc.next(), Mode::Starfield);
        assert_eq!(Mode::Starfield.prev(), Mode::TempArc);
        for mode in Mode::ALL {
            assert_eq!(mode.next().prev(), mode);
            assert_eq!(Mode::from_index(mode.index()), Some(mode));
        }
        assert_eq!(Mode::from_index(8), None);
    }

    #[test]
    fn test_time_sources() {
        assert_eq!(Mode::Starfield.time_source(), TimeSource::None);
        assert_eq!(Mode::Clock.time_source(), TimeSource::Uptime);
        assert_eq!(Mode::ArcClock.time_source(), TimeSource::Uptime);
        assert_eq!(Mode::ArcAnalogClock.time_source(), TimeSource::WallClock);
        assert_eq!(Mode::ClockWithTemp.time_source(), TimeSource::WallClock);
        assert_eq!(Mode::TempArc.time_source(), TimeSource::WallClock);

        let polling: usize = Mode::ALL.iter().filter(|m| m.uses_environment()).count();
        assert_eq!(polling, 3);
    }

    #[test]
    fn test_wrapper_builds_matching_renderer() {
        for mode in Mode::ALL {
            assert_eq!(RendererWrapper::for_mode(mode, 7).mode(), mode);
        }
    }

    #[test]
    fn test_every_mode_renders_a_frame() {
        let ctx = frame(TimeSample::new(10, 8, 42), EnvironmentStatus::Unavailable);
        for mode in Mode::ALL {
            let mut fb = FrameBuffer::new();
            let mut renderer = RendererWrapper::for_mode(mode, 1);
            let outcome = renderer.render(&ctx, &mut fb).unwrap();
            assert_eq!(outcome, FrameOutcome::Complete, "{}", mode.title());
        }
    }
}
