#![no_std]
#![no_main]
#![deny(
    clippy::mem_forget,
    reason = "mem::forget is generally not safe to do with esp_hal types, especially those \
    holding buffers for the duration of a data transfer."
)]
#![deny(clippy::large_stack_frames)]

use embassy_executor::Spawner;
use embassy_net::StackResources;
use embassy_time::{Duration, Instant, Timer};
use embedded_graphics::mono_font::ascii::FONT_10X20;
use embedded_graphics::prelude::*;
use esp_hal::clock::CpuClock;
use esp_hal::gpio::{Level, Output, OutputConfig};
use esp_hal::i2c::master::{Config as I2cConfig, I2c};
use esp_hal::rng::Rng;
use esp_hal::time::Rate;
use esp_hal::timer::timg::TimerGroup;
use log::{error, info};
use static_cell::StaticCell;

// Display-LCD panel specific imports
use embedded_hal_bus::spi::ExclusiveDevice;
use esp_hal::spi::Mode as SpiMode;
use esp_hal::spi::master::{Config as SpiConfig, Spi};
use mipidsi::interface::SpiInterface;
use mipidsi::options::{ColorInversion, ColorOrder};
use mipidsi::{Builder as MipidsiBuilder, models::GC9A01};

use orbit_core::color::{BACKGROUND, MUTED};
use orbit_core::config::{AppConfig, Config, InternetConfig};
use orbit_core::diagnostic::{DIAGNOSTIC_HOLD_MS, draw_clipping_test};
use orbit_core::display::{DISPLAY_CENTER, DisplayConfig};
use orbit_core::{Canvas, DisplaySink, MainLoop};
use orbit_firmware::display::{RoundPanel, init_backlight};
use orbit_firmware::environment::{BoardEnvironment, uptime_ms};
use orbit_firmware::wifi_secrets::{
    NTP_SERVER, UTC_OFFSET_SECS, WIFI_PASSWORD, WIFI_SSID, initial_mode,
};
use orbit_firmware::{time_sync, wifi};

#[panic_handler]
fn panic(info: &core::panic::PanicInfo) -> ! {
    rtt_target::rprintln!("PANIC: {}", info);
    loop {}
}

extern crate alloc;

// This creates a default app-descriptor required by the esp-idf bootloader.
// For more information see: <https://docs.espressif.com/projects/esp-idf/en/stable/esp32/api-reference/system/app_image_format.html#application-description>
esp_bootloader_esp_idf::esp_app_desc!();

#[allow(
    clippy::large_stack_frames,
    reason = "it's not unusual to allocate larger buffers etc. in main"
)]
#[esp_rtos::main]
async fn main(spawner: Spawner) -> ! {
    rtt_target::rtt_init_log!();

    let config = Config {
        internet: InternetConfig {
            ssid: WIFI_SSID,
            password: WIFI_PASSWORD,
            ntp_server: NTP_SERVER,
        },
        display: DisplayConfig::default(),
        app: AppConfig {
            mode: initial_mode(),
            utc_offset_secs: UTC_OFFSET_SECS,
            ..AppConfig::default()
        },
    };

    let hal_config = esp_hal::Config::default().with_cpu_clock(CpuClock::max());
    let peripherals = esp_hal::init(hal_config);

    // Radio buffers live in reclaimed RAM, the frame buffer in the main heap
    esp_alloc::heap_allocator!(#[esp_hal::ram(reclaimed)] size: 73744);
    esp_alloc::heap_allocator!(size: 160 * 1024);

    let timg0 = TimerGroup::new(peripherals.TIMG0);
    esp_rtos::start(timg0.timer0);

    info!("Embassy initialized");

    // 1. SPI bus for the panel
    let spi_bus = Spi::new(
        peripherals.SPI2,
        SpiConfig::default()
            .with_frequency(Rate::from_hz(config.display.spi_frequency_hz))
            .with_mode(SpiMode::_0),
    )
    .unwrap()
    .with_sck(peripherals.GPIO7)
    .with_mosi(peripherals.GPIO11);

    let cs = Output::new(peripherals.GPIO12, Level::High, OutputConfig::default());
    let spi_device = ExclusiveDevice::new_no_delay(spi_bus, cs).unwrap();

    // 2. DC and reset lines
    let dc = Output::new(peripherals.GPIO6, Level::Low, OutputConfig::default());
    let rst = Output::new(peripherals.GPIO13, Level::High, OutputConfig::default());

    // 3. SPI batching buffer, kept for the life of the panel
    static SPI_BUFFER: StaticCell<[u8; 512]> = StaticCell::new();
    let spi_buffer = SPI_BUFFER.init([0u8; 512]);
    let di = SpiInterface::new(spi_device, dc, spi_buffer);

    // 4. Panel driver
    let inversion = if config.display.invert_colors {
        ColorInversion::Inverted
    } else {
        ColorInversion::Normal
    };
    let panel = MipidsiBuilder::new(GC9A01, di)
        .display_size(config.display.width, config.display.height)
        .display_offset(config.display.offset_x, config.display.offset_y)
        .invert_colors(inversion)
        .color_order(ColorOrder::Bgr)
        .reset_pin(rst)
        .init(&mut embassy_time::Delay)
        .expect("Failed to initialize display");

    let backlight = init_backlight(peripherals.LEDC, peripherals.GPIO5, &config.display)
        .expect("Failed to configure backlight");
    let mut display = RoundPanel::new(panel, backlight);
    if let Err(e) = display.set_brightness(config.display.brightness) {
        error!("Set brightness failed: {:?}", e);
    }

    info!("Display initialized");

    // Startup check of panel geometry and clipping
    if let Err(e) = draw_clipping_test(&mut display) {
        error!("Clipping test draw failed: {:?}", e);
    }
    Timer::after_millis(DIAGNOSTIC_HOLD_MS).await;

    // Wi-Fi and network stack
    static RADIO: StaticCell<esp_radio::Controller<'static>> = StaticCell::new();
    let radio_init = RADIO.init(esp_radio::init().expect("Failed to initialize Wi-Fi/BLE controller"));
    let (wifi_controller, interfaces) =
        esp_radio::wifi::new(radio_init, peripherals.WIFI, Default::default())
            .expect("Failed to initialize Wi-Fi controller");

    let rng = Rng::new();
    let seed = (rng.random() as u64) << 32 | rng.random() as u64;

    static RESOURCES: StaticCell<StackResources<3>> = StaticCell::new();
    let (stack, runner) = embassy_net::new(
        interfaces.sta,
        embassy_net::Config::dhcpv4(Default::default()),
        RESOURCES.init(StackResources::<3>::new()),
        seed,
    );

    spawner.must_spawn(wifi::connection_task(
        wifi_controller,
        config.internet.ssid,
        config.internet.password,
    ));
    spawner.must_spawn(wifi::net_task(runner));

    let status = display
        .clear(BACKGROUND)
        .and_then(|()| display.text_centered("Connecting Wi-Fi", DISPLAY_CENTER, &FONT_10X20, MUTED));
    if let Err(e) = status {
        error!("Status draw failed: {:?}", e);
    }
    wifi::wait_for_network(stack).await;

    spawner.must_spawn(time_sync::time_sync_task(stack, config.internet.ntp_server));

    // Temperature and humidity sensor
    let i2c = I2c::new(
        peripherals.I2C0,
        I2cConfig::default().with_frequency(Rate::from_khz(100)),
    )
    .unwrap()
    .with_sda(peripherals.GPIO8)
    .with_scl(peripherals.GPIO9)
    .into_async();
    let mut environment = BoardEnvironment::new(i2c);

    let mut main_loop = MainLoop::new(config.app);
    let frame_interval = Duration::from_millis(config.app.frame_interval_ms);

    loop {
        let frame_start = Instant::now();
        if let Err(e) = main_loop
            .tick(uptime_ms(), &mut environment, &mut display)
            .await
        {
            error!("Frame transfer failed: {:?}", e);
        }
        Timer::at(frame_start + frame_interval).await;
    }
}
