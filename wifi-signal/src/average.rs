use wifi_metrics::{dbm_to_percent, Channel, Dbm, Frequency, SignalQuality};

use crate::sample::{Sample, Ssid};

/// One representative record for an averaged run.
///
/// Measurements are arithmetic means truncated toward zero. SSID,
/// frequency and channel come from the first sample. The two percentages are
/// computed from the averaged dBm values, not averaged per sample.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AverageRecord {
    pub ssid: Ssid,
    pub signal_strength_dbm: Dbm,
    pub link_quality: u8,
    pub snr_db: i32,
    pub noise_floor_dbm: Dbm,
    pub signal_percent: u8,
    pub noise_percent: u8,
    pub sample_count: usize,
    pub frequency_khz: Frequency,
    pub channel: Channel,
}

impl AverageRecord {
    /// Reduce `samples` to their average, `None` when there is nothing to
    /// average.
    pub fn from_samples(samples: &[Sample]) -> Option<Self> {
        let first = samples.first()?;
        let count = samples.len() as i64;

        let mut total_signal = 0i64;
        let mut total_quality = 0i64;
        let mut total_snr = 0i64;
        let mut total_noise = 0i64;

        for sample in samples {
            total_signal += sample.signal_strength_dbm as i64;
            total_quality += sample.link_quality as i64;
            total_snr += sample.snr_db as i64;
            total_noise += sample.noise_floor_dbm as i64;
        }

        let signal_strength_dbm = (total_signal / count) as Dbm;
        let noise_floor_dbm = (total_noise / count) as Dbm;

        Some(Self {
            ssid: first.ssid,
            signal_strength_dbm,
            link_quality: (total_quality / count) as u8,
            snr_db: (total_snr / count) as i32,
            noise_floor_dbm,
            signal_percent: dbm_to_percent(signal_strength_dbm),
            noise_percent: dbm_to_percent(noise_floor_dbm),
            sample_count: samples.len(),
            frequency_khz: first.frequency_khz,
            channel: first.channel,
        })
    }

    pub fn quality(&self) -> SignalQuality {
        SignalQuality::from_percent(self.signal_percent)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(ssid: &str, signal: Dbm, quality: u8, freq: Frequency) -> Sample {
        Sample::new(Ssid::from(ssid), signal, quality, freq)
    }

    #[test]
    fn test_average_truncates() {
        let samples = [
            sample("first", -50, 80, 5_180_000),
            sample("second", -60, 70, 2_412_000),
            sample("third", -40, 90, 2_437_000),
        ];

        let avg = AverageRecord::from_samples(&samples).expect("average");

        assert_eq!(avg.signal_strength_dbm, -50);
        assert_eq!(avg.link_quality, 80);
        assert_eq!(avg.snr_db, 30);
        assert_eq!(avg.noise_floor_dbm, -80);
        assert_eq!(avg.sample_count, 3);
        assert_eq!(avg.ssid, Ssid::from("first"));
        assert_eq!(avg.frequency_khz, 5_180_000);
        assert_eq!(avg.channel, 36);
    }

    #[test]
    fn test_average_truncates_toward_zero() {
        let samples = [sample("net", -51, 81, 0), sample("net", -52, 80, 0)];

        let avg = AverageRecord::from_samples(&samples).expect("average");

        // -103 / 2 and 161 / 2
        assert_eq!(avg.signal_strength_dbm, -51);
        assert_eq!(avg.link_quality, 80);
    }

    #[test]
    fn test_percent_from_averaged_dbm() {
        // Per-sample percents 100 and 14 would average to 57, the averaged
        // -55 dBm maps to 64
        let samples = [sample("net", -20, 100, 0), sample("net", -90, 100, 0)];

        let avg = AverageRecord::from_samples(&samples).expect("average");

        assert_eq!(avg.signal_strength_dbm, -55);
        assert_eq!(avg.signal_percent, 64);
        assert_ne!(
            avg.signal_percent,
            ((dbm_to_percent(-20) as u32 + dbm_to_percent(-90) as u32) / 2) as u8
        );
        assert_eq!(avg.noise_percent, dbm_to_percent(avg.noise_floor_dbm));
    }

    #[test]
    fn test_empty_has_no_average() {
        assert!(AverageRecord::from_samples(&[]).is_none());
    }

    #[test]
    fn test_quality_grade() {
        let avg = AverageRecord::from_samples(&[sample("net", -35, 95, 0)]).expect("average");
        assert_eq!(avg.signal_percent, 92);
        assert_eq!(avg.quality(), SignalQuality::Excellent);
    }
}
