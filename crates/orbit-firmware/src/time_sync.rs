//! SNTP synchronization of the shared [`WALL_CLOCK`].
//!
//! Initial sync retries after 10 s, 30 s, 60 s and then every 5 minutes.
//! Once synced, the clock is refreshed hourly and a failed refresh is retried
//! every 5 minutes. The clock keeps running from its last anchor meanwhile.

use embassy_net::Stack;
use embassy_net::dns::DnsQueryType;
use embassy_net::udp::{PacketMetadata, UdpSocket};
use embassy_time::{Duration, Timer, with_timeout};
use log::{debug, info, warn};
use orbit_core::ntp::{self, NTP_PACKET_LEN, NTP_PORT, NtpError};
use thiserror_no_std::Error;

use crate::environment::{WALL_CLOCK, uptime_ms};

const RESPONSE_TIMEOUT: Duration = Duration::from_secs(5);
const INITIAL_RETRY_SECS: [u64; 3] = [10, 30, 60];
const RETRY_SECS: u64 = 300;
const RESYNC_SECS: u64 = 3_600;

#[derive(Error, Debug)]
pub enum SyncError {
    #[error("DNS lookup failed: {0:?}")]
    Dns(embassy_net::dns::Error),
    #[error("no address for NTP server")]
    NoAddress,
    #[error("socket bind failed: {0:?}")]
    Bind(embassy_net::udp::BindError),
    #[error("send failed: {0:?}")]
    Send(embassy_net::udp::SendError),
    #[error("receive failed: {0:?}")]
    Receive(embassy_net::udp::RecvError),
    #[error("no reply within {0} ms")]
    Timeout(u64),
    #[error("bad reply: {0}")]
    Reply(NtpError),
}

/// One SNTP exchange. Returns Unix seconds.
pub async fn fetch_unix_time(stack: Stack<'static>, server: &str) -> Result<u64, SyncError> {
    let addresses = stack
        .dns_query(server, DnsQueryType::A)
        .await
        .map_err(SyncError::Dns)?;
    let address = *addresses.first().ok_or(SyncError::NoAddress)?;
    debug!("NTP server {} is {}", server, address);

    let mut rx_meta = [PacketMetadata::EMPTY; 1];
    let mut rx_buffer = [0u8; 128];
    let mut tx_meta = [PacketMetadata::EMPTY; 1];
    let mut tx_buffer = [0u8; 128];
    let mut socket = UdpSocket::new(
        stack,
        &mut rx_meta,
        &mut rx_buffer,
        &mut tx_meta,
        &mut tx_buffer,
    );
    socket.bind(0).map_err(SyncError::Bind)?;

    socket
        .send_to(&ntp::request_packet(), (address, NTP_PORT))
        .await
        .map_err(SyncError::Send)?;

    let mut response = [0u8; NTP_PACKET_LEN];
    let (len, _from) = with_timeout(RESPONSE_TIMEOUT, socket.recv_from(&mut response))
        .await
        .map_err(|_| SyncError::Timeout(RESPONSE_TIMEOUT.as_millis()))?
        .map_err(SyncError::Receive)?;

    ntp::parse_response(&response[..len]).map_err(SyncError::Reply)
}

async fn sync_once(stack: Stack<'static>, server: &'static str) -> Result<u64, SyncError> {
    let unix = fetch_unix_time(stack, server).await?;
    let now = uptime_ms();
    WALL_CLOCK.lock(|clock| clock.borrow_mut().synchronize(unix, now));
    Ok(unix)
}

#[embassy_executor::task]
pub async fn time_sync_task(stack: Stack<'static>, server: &'static str) {
    let mut attempt = 0usize;
    loop {
        match sync_once(stack, server).await {
            Ok(unix) => {
                info!("Time synchronized from {}: unix={}", server, unix);
                break;
            }
            Err(e) => {
                let delay = INITIAL_RETRY_SECS.get(attempt).copied().unwrap_or(RETRY_SECS);
                attempt += 1;
                warn!("Time sync attempt {} failed: {}, retrying in {}s", attempt, e, delay);
                Timer::after_secs(delay).await;
            }
        }
    }

    let mut wait_secs = RESYNC_SECS;
    loop {
        Timer::after_secs(wait_secs).await;
        wait_secs = match sync_once(stack, server).await {
            Ok(unix) => {
                info!("Periodic time sync: unix={}", unix);
                RESYNC_SECS
            }
            Err(e) => {
                warn!("Periodic time sync failed: {}, retrying in {}s", e, RETRY_SECS);
                RETRY_SECS
            }
        };
    }
}
