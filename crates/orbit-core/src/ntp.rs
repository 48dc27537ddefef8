//! Minimal SNTP client packet handling.
//!
//! Only the fixed 48-byte client request and the transmit timestamp of the
//! reply are needed to anchor the [`WallClock`](crate::time::WallClock).
//! The UDP exchange itself lives in the firmware.

use thiserror_no_std::Error;

/// Well-known NTP server port.
pub const NTP_PORT: u16 = 123;

/// Size of an NTP packet without extensions.
pub const NTP_PACKET_LEN: usize = 48;

/// Seconds between the NTP epoch (1900-01-01) and the Unix epoch (1970-01-01).
pub const NTP_TO_UNIX_OFFSET: u64 = 2_208_988_800;

/// LI = 0, VN = 3, Mode = 3 (client)
const CLIENT_REQUEST_HEADER: u8 = 0x1B;

const MODE_SERVER: u8 = 4;
const MODE_BROADCAST: u8 = 5;

/// Offset of the transmit timestamp's seconds field.
const TRANSMIT_TIMESTAMP_OFFSET: usize = 40;

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum NtpError {
    #[error("NTP response too short: {0} bytes")]
    TooShort(usize),
    #[error("unexpected NTP mode {0}")]
    UnexpectedMode(u8),
    #[error("NTP server sent kiss-of-death")]
    KissOfDeath,
    #[error("NTP timestamp {0} is before the Unix epoch")]
    BeforeUnixEpoch(u32),
}

/// Build a client request packet.
pub const fn request_packet() -> [u8; NTP_PACKET_LEN] {
    let mut packet = [0u8; NTP_PACKET_LEN];
    packet[0] = CLIENT_REQUEST_HEADER;
    packet
}

/// Extract Unix seconds from a server reply.
pub fn parse_response(response: &[u8]) -> Result<u64, NtpError> {
    if response.len() < NTP_PACKET_LEN {
        return Err(NtpError::TooShort(response.len()));
    }

    let mode = response[0] & 0x07;
    if mode != MODE_SERVER && mode != MODE_BROADCAST {
        return Err(NtpError::UnexpectedMode(mode));
    }

    // Stratum 0 replies carry a kiss code instead of a time.
    if response[1] == 0 {
        return Err(NtpError::KissOfDeath);
    }

    let seconds = u32::from_be_bytes([
        response[TRANSMIT_TIMESTAMP_OFFSET],
        response[TRANSMIT_TIMESTAMP_OFFSET + 1],
        response[TRANSMIT_TIMESTAMP_OFFSET + 2],
        response[TRANSMIT_TIMESTAMP_OFFSET + 3],
    ]);

    if (seconds as u64) < NTP_TO_UNIX_OFFSET {
        return Err(NtpError::BeforeUnixEpoch(seconds));
    }

    Ok(seconds as u64 - NTP_TO_UNIX_OFFSET)
}
