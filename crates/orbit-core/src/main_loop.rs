//! The render cycle.
//!
//! [`MainLoop::tick`] runs one frame to completion:
//!
//! 1. poll the sensor, if the active mode shows readings and the poll
//!    interval has elapsed,
//! 2. sample the time of day from the mode's [`TimeSource`],
//! 3. render into the off-screen [`FrameBuffer`],
//! 4. commit the changed region to the display.
//!
//! The caller owns pacing (how long to wait between ticks) and the clock.

use log::{debug, info, warn};

use crate::config::AppConfig;
use crate::display::DisplaySink;
use crate::environment::{EnvironmentCache, EnvironmentSource, EnvironmentStatus};
use crate::framebuffer::FrameBuffer;
use crate::modes::{FrameContext, FrameOutcome, Mode, Renderer, RendererWrapper, TimeSource};
use crate::time::{TimeError, TimeSample};

/// Interval between "Loop running" log lines.
const HEARTBEAT_INTERVAL_MS: u64 = 1_000;

pub struct MainLoop {
    config: AppConfig,
    renderer: RendererWrapper,
    framebuffer: FrameBuffer,
    environment: EnvironmentCache,
    last_sensor_poll_ms: Option<u64>,
    /// Whether the last frame had the time it needed, for transition logs.
    time_available: Option<bool>,
    frames_since_heartbeat: u32,
    last_heartbeat_ms: u64,
}

impl MainLoop {
    pub fn new(config: AppConfig) -> Self {
        info!("Render loop starting in {} mode", config.mode.title());
        Self {
            renderer: RendererWrapper::for_mode(config.mode, config.star_seed),
            framebuffer: FrameBuffer::new(),
            environment: EnvironmentCache::new(config.sensor_stale_after_ms),
            last_sensor_poll_ms: None,
            time_available: None,
            frames_since_heartbeat: 0,
            last_heartbeat_ms: 0,
            config,
        }
    }

    pub fn mode(&self) -> Mode {
        self.renderer.mode()
    }

    /// Switch to another visualization. The new renderer starts from scratch.
    pub fn set_mode(&mut self, mode: Mode) {
        if mode == self.renderer.mode() {
            return;
        }
        info!(
            "Switching mode: {} -> {}",
            self.renderer.mode().title(),
            mode.title()
        );
        self.renderer = RendererWrapper::for_mode(mode, self.config.star_seed);
        self.time_available = None;
        // Show a reading as soon as possible in sensor modes
        self.last_sensor_poll_ms = None;
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    pub fn framebuffer(&self) -> &FrameBuffer {
        &self.framebuffer
    }

    pub fn environment_status(&self, now_ms: u64) -> EnvironmentStatus {
        self.environment.status(now_ms)
    }

    /// Render and commit one frame at uptime `now_ms`.
    pub async fn tick<S, D>(
        &mut self,
        now_ms: u64,
        source: &mut S,
        display: &mut D,
    ) -> Result<FrameOutcome, D::Error>
    where
        S: EnvironmentSource,
        D: DisplaySink,
    {
        let mode = self.renderer.mode();

        if mode.uses_environment() && self.sensor_poll_due(now_ms) {
            let result = source.read_environment().await;
            self.environment.record(result, now_ms);
            self.last_sensor_poll_ms = Some(now_ms);
        }

        let time = match mode.time_source() {
            TimeSource::WallClock => source.read_wall_clock(),
            TimeSource::Uptime | TimeSource::None => Ok(TimeSample::from_uptime_ms(now_ms)),
        };
        self.track_time_availability(mode, &time);

        let ctx = FrameContext {
            time,
            environment: self.environment.status(now_ms),
        };

        let Ok(outcome) = self.renderer.render(&ctx, &mut self.framebuffer);
        self.framebuffer.commit(display)?;

        self.heartbeat(now_ms);
        Ok(outcome)
    }

    fn sensor_poll_due(&self, now_ms: u64) -> bool {
        match self.last_sensor_poll_ms {
            None => true,
            Some(last) => now_ms.saturating_sub(last) >= self.config.sensor_poll_interval_ms,
        }
    }

    fn track_time_availability(&mut self, mode: Mode, time: &Result<TimeSample, TimeError>) {
        if mode.time_source() != TimeSource::WallClock {
            return;
        }
        let available = time.is_ok();
        if self.time_available == Some(available) {
            return;
        }
        match time {
            Ok(sample) => info!("Wall clock available: {}", sample),
            Err(e) => warn!("{} needs wall-clock time: {}", mode.title(), e),
        }
        self.time_available = Some(available);
    }

    fn heartbeat(&mut self, now_ms: u64) {
        self.frames_since_heartbeat = self.frames_since_heartbeat.saturating_add(1);
        let elapsed = now_ms.saturating_sub(self.last_heartbeat_ms);
        if elapsed >= HEARTBEAT_INTERVAL_MS {
            info!(
                "Loop running: {} frames in {} ms",
                self.frames_since_heartbeat, elapsed
            );
            self.frames_since_heartbeat = 0;
            self.last_heartbeat_ms = now_ms;
        } else {
            debug!("Frame at {} ms", now_ms);
        }
    }
}
