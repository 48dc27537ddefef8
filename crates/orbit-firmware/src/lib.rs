//! ESP32-S3 firmware-specific modules for orbit-rs
//!
//! This crate contains hardware-specific code that cannot compile on desktop
//! targets: the GC9A01 panel and its PWM backlight, the SHT40 environment
//! source, Wi-Fi association, and SNTP time synchronization.

#![no_std]

extern crate alloc;

pub mod display;
pub mod environment;
pub mod time_sync;
pub mod wifi;
pub mod wifi_secrets;
