pub mod estimator;
pub mod quality;

pub use estimator::{dbm_to_percent, estimate_snr, frequency_to_channel, SnrEstimate};
pub use quality::SignalQuality;

/// Signal strength in dBm
pub type Dbm = i32;

/// Channel center frequency in kHz
pub type Frequency = u32;

/// IEEE 802.11 channel number, `0` when unknown
pub type Channel = u16;
