//! Hardware-independent core library for orbit-rs
//!
//! This crate contains the frame-synthesis engine for a 240x240 round TFT:
//! color mapping, clock geometry, the off-screen frame buffer and its drawing
//! primitives, one renderer per visualization mode, and the main render loop
//! that ties them to a display sink and an environment source.
//!
//! It is `#![no_std]` with `extern crate alloc` so it compiles on both
//! embedded targets (ESP32-S3) and desktop hosts (for the simulator and tests).

#![no_std]

extern crate alloc;

pub mod canvas;
pub mod color;
pub mod config;
pub mod diagnostic;
pub mod display;
pub mod environment;
pub mod framebuffer;
pub mod geometry;
pub mod main_loop;
pub mod modes;
pub mod ntp;
pub mod sensors;
pub mod time;

#[cfg(test)]
pub(crate) mod test_support;

pub use canvas::Canvas;
pub use config::{AppConfig, Config, InternetConfig};
pub use display::{DisplayConfig, DisplaySink};
pub use environment::{EnvironmentCache, EnvironmentReading, EnvironmentSource, EnvironmentStatus};
pub use framebuffer::FrameBuffer;
pub use main_loop::MainLoop;
pub use modes::{FrameContext, FrameOutcome, Mode, Renderer, RendererWrapper, TimeSource};
pub use time::{TimeError, TimeSample, WallClock};
