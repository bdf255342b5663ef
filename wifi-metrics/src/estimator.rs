use crate::{Channel, Dbm, Frequency};

/// Upper saturation point of the dBm to percent scale
pub const DBM_CEILING: Dbm = -30;

/// Lower saturation point of the dBm to percent scale
pub const DBM_FLOOR: Dbm = -100;

/// SNR at the floor of each link quality band, best band first
const SNR_BANDS: [(u8, i32); 6] = [(90, 35), (80, 30), (70, 25), (60, 20), (50, 15), (40, 10)];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SnrEstimate {
    pub snr_db: i32,
    pub noise_floor_dbm: Dbm,
}

/// Estimate SNR from link quality and derive the noise floor as
/// `signal - snr`.
///
/// There is no measured noise floor, so this is a heuristic over a
/// piecewise-linear table.
pub fn estimate_snr(link_quality: u8, signal_dbm: Dbm) -> SnrEstimate {
    let quality = link_quality as i32;

    let snr_db = SNR_BANDS
        .iter()
        .find(|(floor, _)| link_quality >= *floor)
        .map(|(floor, base)| base + (quality - *floor as i32) / 2)
        .unwrap_or(quality * 10 / 40);

    SnrEstimate {
        snr_db,
        noise_floor_dbm: signal_dbm - snr_db,
    }
}

/// Map dBm onto a 0..=100 scale, saturating at -30 dBm and -100 dBm.
pub fn dbm_to_percent(dbm: Dbm) -> u8 {
    if dbm >= DBM_CEILING {
        return 100;
    }
    if dbm <= DBM_FLOOR {
        return 0;
    }

    (((dbm - DBM_FLOOR) * 100) / (DBM_CEILING - DBM_FLOOR)).clamp(0, 100) as u8
}

/// Convert a channel center frequency in kHz to an 802.11 channel number.
///
/// Covers the 2.4 GHz band (channels 1-14) and the 5 GHz band
/// (channels 34-165). Anything else maps to `0`.
pub fn frequency_to_channel(freq_khz: Frequency) -> Channel {
    let mhz = freq_khz / 1000;
    match mhz {
        2484 => 14,
        2412..=2483 => ((mhz - 2407) / 5) as Channel,
        5170..=5825 => ((mhz - 5000) / 5) as Channel,
        _ => 0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_snr_band_floors() {
        assert_eq!(estimate_snr(90, -40).snr_db, 35);
        assert_eq!(estimate_snr(80, -40).snr_db, 30);
        assert_eq!(estimate_snr(70, -40).snr_db, 25);
        assert_eq!(estimate_snr(60, -40).snr_db, 20);
        assert_eq!(estimate_snr(50, -40).snr_db, 15);
        assert_eq!(estimate_snr(40, -40).snr_db, 10);
    }

    #[test]
    fn test_snr_band_excess() {
        assert_eq!(estimate_snr(100, -40).snr_db, 40);
        assert_eq!(estimate_snr(99, -40).snr_db, 39);
        assert_eq!(estimate_snr(75, -40).snr_db, 27);
        assert_eq!(estimate_snr(41, -40).snr_db, 10);
    }

    #[test]
    fn test_snr_lowest_band() {
        assert_eq!(estimate_snr(39, -80).snr_db, 9);
        assert_eq!(estimate_snr(20, -80).snr_db, 5);
        assert_eq!(estimate_snr(3, -80).snr_db, 0);
        assert_eq!(estimate_snr(0, -80).snr_db, 0);
    }

    #[test]
    fn test_noise_is_signal_minus_snr() {
        for quality in 0..=100u8 {
            for signal in [-100, -87, -64, -50, -31, 0] {
                let estimate = estimate_snr(quality, signal);
                assert_eq!(signal - estimate.snr_db, estimate.noise_floor_dbm);
            }
        }
    }

    #[test]
    fn test_snr_is_monotonic_in_quality() {
        let mut last = i32::MIN;
        for quality in 0..=100u8 {
            let snr = estimate_snr(quality, -60).snr_db;
            assert!(snr >= last, "snr dropped at quality {}", quality);
            last = snr;
        }
    }

    #[test]
    fn test_dbm_to_percent_saturation() {
        assert_eq!(dbm_to_percent(-30), 100);
        assert_eq!(dbm_to_percent(-10), 100);
        assert_eq!(dbm_to_percent(-100), 0);
        assert_eq!(dbm_to_percent(-120), 0);
    }

    #[test]
    fn test_dbm_to_percent_linear() {
        assert_eq!(dbm_to_percent(-65), 50);
        assert_eq!(dbm_to_percent(-50), 71);
        assert_eq!(dbm_to_percent(-99), 1);
    }

    #[test]
    fn test_dbm_to_percent_monotonic() {
        let mut last = 0u8;
        for dbm in -130..=10 {
            let percent = dbm_to_percent(dbm);
            assert!(percent >= last, "percent dropped at {} dBm", dbm);
            last = percent;
        }
    }

    #[test]
    fn test_channel_2_4ghz() {
        assert_eq!(frequency_to_channel(2_412_000), 1);
        assert_eq!(frequency_to_channel(2_437_000), 6);
        assert_eq!(frequency_to_channel(2_472_000), 13);
        assert_eq!(frequency_to_channel(2_484_000), 14);
    }

    #[test]
    fn test_channel_5ghz() {
        assert_eq!(frequency_to_channel(5_180_000), 36);
        assert_eq!(frequency_to_channel(5_745_000), 149);
        assert_eq!(frequency_to_channel(5_825_000), 165);
    }

    #[test]
    fn test_channel_unknown() {
        assert_eq!(frequency_to_channel(900_000), 0);
        assert_eq!(frequency_to_channel(0), 0);
        assert_eq!(frequency_to_channel(2_411_999), 0);
        assert_eq!(frequency_to_channel(5_955_000), 0);
    }
}
