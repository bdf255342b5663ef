use core::fmt;

use wifi_metrics::{estimate_snr, frequency_to_channel, Channel, Dbm, Frequency};

/// Longest identifier kept per sample, longer ones are truncated
pub const MAX_SSID_LENGTH: usize = 63;

/// Network identifier as raw bytes.
///
/// An SSID is not guaranteed to be UTF-8 and may carry control
/// characters, so the bytes are kept verbatim.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct Ssid {
    data: [u8; MAX_SSID_LENGTH],
    len: usize,
}

impl Ssid {
    pub fn new_from_slice(slice: &[u8]) -> Self {
        let len = core::cmp::min(slice.len(), MAX_SSID_LENGTH);
        let mut data = [0u8; MAX_SSID_LENGTH];

        data[..len].copy_from_slice(&slice[..len]);

        Self { data, len }
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.data[..self.len]
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}

impl Default for Ssid {
    fn default() -> Self {
        Self {
            data: [0u8; MAX_SSID_LENGTH],
            len: 0,
        }
    }
}

impl From<&str> for Ssid {
    fn from(value: &str) -> Self {
        Self::new_from_slice(value.as_bytes())
    }
}

impl fmt::Display for Ssid {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", String::from_utf8_lossy(self.as_bytes()))
    }
}

impl fmt::Debug for Ssid {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Ssid({:?})", String::from_utf8_lossy(self.as_bytes()))
    }
}

/// One point-in-time measurement of the associated network.
///
/// `noise_floor_dbm == signal_strength_dbm - snr_db` holds for every sample
/// built through [`Sample::new`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Sample {
    /// Milliseconds since the start of the run
    pub timestamp_ms: u32,
    pub signal_strength_dbm: Dbm,
    /// Link quality percentage (0-100)
    pub link_quality: u8,
    pub snr_db: i32,
    pub noise_floor_dbm: Dbm,
    pub ssid: Ssid,
    pub frequency_khz: Frequency,
    pub channel: Channel,
}

impl Sample {
    /// Build a sample from raw radio readings, deriving SNR, noise floor and
    /// channel number.
    pub fn new(ssid: Ssid, signal_dbm: Dbm, link_quality: u8, frequency_khz: Frequency) -> Self {
        let estimate = estimate_snr(link_quality, signal_dbm);

        Self {
            timestamp_ms: 0,
            signal_strength_dbm: signal_dbm,
            link_quality,
            snr_db: estimate.snr_db,
            noise_floor_dbm: estimate.noise_floor_dbm,
            ssid,
            frequency_khz,
            channel: frequency_to_channel(frequency_khz),
        }
    }

    pub fn with_timestamp(self, timestamp_ms: u32) -> Self {
        Self {
            timestamp_ms,
            ..self
        }
    }
}
