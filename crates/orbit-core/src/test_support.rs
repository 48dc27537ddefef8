//! In-memory display and scripted environment used by the unit tests.

extern crate alloc;

use alloc::vec;
use alloc::vec::Vec;
use core::convert::Infallible;
use embedded_graphics::pixelcolor::Rgb565;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::Rectangle;

use crate::display::{DISPLAY_SIZE_PX, DisplaySink};
use crate::environment::{EnvironmentReading, EnvironmentSource, EnvironmentStatus};
use crate::modes::FrameContext;
use crate::sensors::SensorError;
use crate::time::{TimeError, TimeSample};

const SIZE: usize = DISPLAY_SIZE_PX as usize;

/// Panel stand-in that records what was transferred to it.
pub struct RecordingDisplay {
    pixels: Vec<Rgb565>,
    transfers: usize,
    last_area: Option<Rectangle>,
    brightness: Option<u8>,
}

impl RecordingDisplay {
    pub fn new() -> Self {
        Self {
            pixels: vec![Rgb565::BLACK; SIZE * SIZE],
            transfers: 0,
            last_area: None,
            brightness: None,
        }
    }

    /// Number of `fill_contiguous` transfers received.
    pub fn transfers(&self) -> usize {
        self.transfers
    }

    pub fn last_area(&self) -> Option<Rectangle> {
        self.last_area
    }

    pub fn brightness(&self) -> Option<u8> {
        self.brightness
    }

    pub fn pixel(&self, point: Point) -> Option<Rgb565> {
        if point.x < 0 || point.y < 0 || point.x as usize >= SIZE || point.y as usize >= SIZE {
            return None;
        }
        Some(self.pixels[point.y as usize * SIZE + point.x as usize])
    }

    fn put(&mut self, point: Point, color: Rgb565) {
        if point.x >= 0 && point.y >= 0 && (point.x as usize) < SIZE && (point.y as usize) < SIZE {
            self.pixels[point.y as usize * SIZE + point.x as usize] = color;
        }
    }
}

impl OriginDimensions for RecordingDisplay {
    fn size(&self) -> Size {
        Size::new(SIZE as u32, SIZE as u32)
    }
}

impl DrawTarget for RecordingDisplay {
    type Color = Rgb565;
    type Error = Infallible;

    fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        for Pixel(point, color) in pixels {
            self.put(point, color);
        }
        Ok(())
    }

    fn fill_contiguous<I>(&mut self, area: &Rectangle, colors: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Self::Color>,
    {
        self.transfers += 1;
        self.last_area = Some(*area);
        for (point, color) in area.points().zip(colors) {
            self.put(point, color);
        }
        Ok(())
    }
}

impl DisplaySink for RecordingDisplay {
    fn set_brightness(&mut self, level: u8) -> Result<(), Self::Error> {
        self.brightness = Some(level);
        Ok(())
    }
}

/// Environment source with fixed answers.
pub struct ScriptedEnvironment {
    pub reading: Result<EnvironmentReading, SensorError>,
    pub wall_clock: Result<TimeSample, TimeError>,
    pub sensor_reads: usize,
}

impl ScriptedEnvironment {
    pub fn new(
        reading: Result<EnvironmentReading, SensorError>,
        wall_clock: Result<TimeSample, TimeError>,
    ) -> Self {
        Self {
            reading,
            wall_clock,
            sensor_reads: 0,
        }
    }
}

impl EnvironmentSource for ScriptedEnvironment {
    async fn read_environment(&mut self) -> Result<EnvironmentReading, SensorError> {
        self.sensor_reads += 1;
        self.reading
    }

    fn read_wall_clock(&mut self) -> Result<TimeSample, TimeError> {
        self.wall_clock
    }
}

pub const SENSOR_DOWN: SensorError = SensorError::ReadFailed {
    sensor: "TEST",
    operation: "measure",
    details: "no ACK",
};

pub fn reading(temperature_c: f32, humidity_pct: f32) -> EnvironmentReading {
    EnvironmentReading {
        temperature_c,
        humidity_pct,
    }
}

/// Frame inputs for a single render call.
pub fn frame(time: Result<TimeSample, TimeError>, environment: EnvironmentStatus) -> FrameContext {
    FrameContext {
        time,
        environment,
    }
}
