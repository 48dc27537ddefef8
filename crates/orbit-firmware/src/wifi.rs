//! Station-mode Wi-Fi: association task, network stack runner and a helper
//! that waits for DHCP.

use embassy_net::{Runner, Stack};
use embassy_time::{Duration, Timer};
use esp_radio::wifi::{
    ClientConfig, ModeConfig, WifiController, WifiDevice, WifiEvent, WifiStaState,
};
use log::{info, warn};

/// Delay before retrying association after a failure or disconnect.
const RECONNECT_DELAY: Duration = Duration::from_secs(5);

/// Keep the station associated, reconnecting whenever the link drops.
#[embassy_executor::task]
pub async fn connection_task(
    mut controller: WifiController<'static>,
    ssid: &'static str,
    password: &'static str,
) {
    info!("Wi-Fi connection task started");
    loop {
        if esp_radio::wifi::sta_state() == WifiStaState::Connected {
            controller.wait_for_event(WifiEvent::StaDisconnected).await;
            warn!("Wi-Fi disconnected");
            Timer::after(RECONNECT_DELAY).await;
        }

        if !matches!(controller.is_started(), Ok(true)) {
            let client_config = ModeConfig::Client(
                ClientConfig::default()
                    .with_ssid(ssid.into())
                    .with_password(password.into()),
            );
            if let Err(e) = controller.set_config(&client_config) {
                warn!("Wi-Fi configuration rejected: {:?}", e);
                Timer::after(RECONNECT_DELAY).await;
                continue;
            }
            info!("Starting Wi-Fi");
            if let Err(e) = controller.start_async().await {
                warn!("Wi-Fi start failed: {:?}", e);
                Timer::after(RECONNECT_DELAY).await;
                continue;
            }
        }

        info!("Connecting to {}", ssid);
        match controller.connect_async().await {
            Ok(()) => info!("Wi-Fi connected"),
            Err(e) => {
                warn!("Wi-Fi connect failed: {:?}", e);
                Timer::after(RECONNECT_DELAY).await;
            }
        }
    }
}

#[embassy_executor::task]
pub async fn net_task(mut runner: Runner<'static, WifiDevice<'static>>) -> ! {
    runner.run().await
}

/// Wait for link and a DHCP lease.
pub async fn wait_for_network(stack: Stack<'static>) {
    stack.wait_link_up().await;
    info!("Wi-Fi link up, waiting for DHCP");
    stack.wait_config_up().await;
    if let Some(config) = stack.config_v4() {
        info!("IP address: {}", config.address);
    }
}
