//! Desktop simulator for the orbit-rs round display.
//!
//! Runs the orbit-core render loop against an SDL2 window via
//! `embedded-graphics-simulator`, with a synthetic temperature/humidity
//! source and the host clock standing in for SNTP.
//!
//! # Key bindings
//!
//! | Key   | Action                              |
//! |-------|-------------------------------------|
//! | 1-8   | Select mode                         |
//! | ←/→   | Previous / next mode                |
//! | T     | Toggle wall-clock synchronization   |
//! | S     | Toggle sensor failure               |
//! | Q     | Quit                                |
//!
//! `UTC_OFFSET_SECS` in the environment sets the local offset.

use std::convert::Infallible;
use std::time::{Duration, Instant, SystemTime, UNIX_EPOCH};

use embassy_futures::block_on;
use embedded_graphics::pixelcolor::Rgb565;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::Rectangle;
use embedded_graphics_simulator::{
    OutputSettingsBuilder, SimulatorDisplay, SimulatorEvent, Window, sdl2::Keycode,
};
use log::{info, warn};

use orbit_core::color::BACKGROUND;
use orbit_core::config::AppConfig;
use orbit_core::display::DISPLAY_SIZE_PX;
use orbit_core::sensors::SensorError;
use orbit_core::{
    DisplaySink, EnvironmentReading, EnvironmentSource, MainLoop, Mode, TimeError, TimeSample,
    WallClock,
};

// ---------------------------------------------------------------------------
// Display constants
// ---------------------------------------------------------------------------

/// Pixel scale factor for the simulator window.
const WINDOW_SCALE: u32 = 2;

// ---------------------------------------------------------------------------
// Display sink
// ---------------------------------------------------------------------------

/// [`SimulatorDisplay`] with a software brightness setting.
struct SimulatorPanel {
    display: SimulatorDisplay<Rgb565>,
    brightness: u8,
}

impl SimulatorPanel {
    fn new() -> Self {
        Self {
            display: SimulatorDisplay::new(Size::new(
                DISPLAY_SIZE_PX as u32,
                DISPLAY_SIZE_PX as u32,
            )),
            brightness: u8::MAX,
        }
    }
}

impl OriginDimensions for SimulatorPanel {
    fn size(&self) -> Size {
        self.display.size()
    }
}

impl DrawTarget for SimulatorPanel {
    type Color = Rgb565;
    type Error = Infallible;

    fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        self.display.draw_iter(pixels)
    }

    fn fill_contiguous<I>(&mut self, area: &Rectangle, colors: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Self::Color>,
    {
        self.display.fill_contiguous(area, colors)
    }
}

impl DisplaySink for SimulatorPanel {
    fn set_brightness(&mut self, level: u8) -> Result<(), Self::Error> {
        info!("Brightness {} -> {}", self.brightness, level);
        self.brightness = level;
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Mock environment
// ---------------------------------------------------------------------------

/// Sinusoidal readings plus a wall clock anchored to the host's clock.
struct MockEnvironment {
    started: Instant,
    wall_clock: WallClock,
    sensor_failing: bool,
}

impl MockEnvironment {
    fn new(utc_offset_secs: i32) -> Self {
        let mut environment = Self {
            started: Instant::now(),
            wall_clock: WallClock::new(utc_offset_secs),
            sensor_failing: false,
        };
        environment.synchronize();
        environment
    }

    fn uptime_ms(&self) -> u64 {
        self.started.elapsed().as_millis() as u64
    }

    fn synchronize(&mut self) {
        let unix = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_secs();
        let uptime = self.uptime_ms();
        self.wall_clock.synchronize(unix, uptime);
    }

    fn toggle_sync(&mut self) {
        if self.wall_clock.is_synchronized() {
            self.wall_clock = WallClock::new(self.wall_clock.utc_offset_secs());
            info!("Wall clock desynchronized");
        } else {
            self.synchronize();
            info!("Wall clock synchronized");
        }
    }

    fn toggle_sensor(&mut self) {
        self.sensor_failing = !self.sensor_failing;
        info!(
            "Sensor {}",
            if self.sensor_failing { "failing" } else { "healthy" }
        );
    }
}

impl EnvironmentSource for MockEnvironment {
    async fn read_environment(&mut self) -> Result<EnvironmentReading, SensorError> {
        if self.sensor_failing {
            return Err(SensorError::ReadFailed {
                sensor: "mock",
                operation: "read",
                details: "failure injected from keyboard",
            });
        }
        let t = self.started.elapsed().as_secs_f32();

        // Sweeps most of the color gradient within a couple of minutes
        Ok(EnvironmentReading {
            temperature_c: 22.5 + 25.0 * (t / 20.0).sin() + 0.5 * (t / 3.0).cos(),
            humidity_pct: 50.0 + 10.0 * (t / 30.0).sin() + 2.0 * (t / 7.0).cos(),
        })
    }

    fn read_wall_clock(&mut self) -> Result<TimeSample, TimeError> {
        self.wall_clock.now(self.uptime_ms())
    }
}

// ---------------------------------------------------------------------------
// Input
// ---------------------------------------------------------------------------

fn keycode_to_mode(keycode: Keycode, current: Mode) -> Option<Mode> {
    let index = match keycode {
        Keycode::Num1 | Keycode::Kp1 => 0,
        Keycode::Num2 | Keycode::Kp2 => 1,
        Keycode::Num3 | Keycode::Kp3 => 2,
        Keycode::Num4 | Keycode::Kp4 => 3,
        Keycode::Num5 | Keycode::Kp5 => 4,
        Keycode::Num6 | Keycode::Kp6 => 5,
        Keycode::Num7 | Keycode::Kp7 => 6,
        Keycode::Num8 | Keycode::Kp8 => 7,
        Keycode::Left => return Some(current.prev()),
        Keycode::Right => return Some(current.next()),
        _ => return None,
    };
    Mode::from_index(index)
}

fn utc_offset_from_env() -> i32 {
    match std::env::var("UTC_OFFSET_SECS") {
        Ok(value) => value.parse().unwrap_or_else(|_| {
            warn!("Ignoring invalid UTC_OFFSET_SECS {:?}", value);
            0
        }),
        Err(_) => 0,
    }
}

// ---------------------------------------------------------------------------
// Entry point
// ---------------------------------------------------------------------------

fn main() {
    env_logger::init();
    info!("Starting orbit-rs simulator");
    info!(
        "Display: {}×{} (scale {}×)",
        DISPLAY_SIZE_PX, DISPLAY_SIZE_PX, WINDOW_SCALE
    );
    info!("Keys: 1-8=Mode  ←/→=Cycle  T=Toggle sync  S=Toggle sensor  Q=Quit");

    let config = AppConfig::default();
    let frame_duration = Duration::from_millis(config.frame_interval_ms);

    let mut panel = SimulatorPanel::new();
    let output_settings = OutputSettingsBuilder::new().scale(WINDOW_SCALE).build();
    let mut window = Window::new("Orbit Simulator", &output_settings);

    let mut environment = MockEnvironment::new(utc_offset_from_env());
    let mut main_loop = MainLoop::new(config);

    // The SDL window is lazily initialized on the first `update()` call.
    // We must call `update()` once before `events()` or it will panic.
    let _ = panel.clear(BACKGROUND);
    let _ = panel.set_brightness(200);
    window.update(&panel.display);

    'running: loop {
        let frame_start = Instant::now();

        for event in window.events() {
            match event {
                SimulatorEvent::Quit => break 'running,
                SimulatorEvent::KeyDown { keycode, .. } => match keycode {
                    Keycode::Q | Keycode::Escape => break 'running,
                    Keycode::T => environment.toggle_sync(),
                    Keycode::S => environment.toggle_sensor(),
                    _ => {
                        if let Some(mode) = keycode_to_mode(keycode, main_loop.mode()) {
                            main_loop.set_mode(mode);
                        }
                    }
                },
                _ => {}
            }
        }

        let now = environment.uptime_ms();
        let Ok(_outcome) = block_on(main_loop.tick(now, &mut environment, &mut panel));

        window.update(&panel.display);

        let elapsed = frame_start.elapsed();
        if elapsed < frame_duration {
            std::thread::sleep(frame_duration - elapsed);
        }
    }

    info!("Simulator exiting");
}
