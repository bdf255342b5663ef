use wifi_metrics::{Channel, Frequency};
use wifi_signal::{AverageRecord, Sample, SignalError, SourceKind};

use crate::output::OutputBuffer;

const HEADER_ESTIMATE: usize = 512;
const ROW_ESTIMATE: usize = 100;

pub const COLUMN_HEADER: &str = "Time(ms) | RSSI(dBm) | Quality(%) | SNR(dB) | Noise(dBm)\n";
pub const COLUMN_RULE: &str = "---------+------------+------------+---------+-----------\n";

fn rssi_origin(kind: SourceKind) -> &'static str {
    match kind {
        SourceKind::Native => "BSS Accurate RSSI",
        SourceKind::Command => "Approximated RSSI",
    }
}

/// Origin wording used by the averaged measurement heading
fn measurement_origin(kind: SourceKind) -> &'static str {
    match kind {
        SourceKind::Native => "Accurate BSS RSSI",
        SourceKind::Command => "Approximated RSSI",
    }
}

fn push_frequency(
    out: &mut OutputBuffer,
    frequency_khz: Frequency,
    channel: Channel,
) -> Result<(), SignalError> {
    if frequency_khz > 0 {
        out.push_fmt(format_args!(
            "Frequency: {} kHz (Channel {})\n\n",
            frequency_khz, channel
        ))
    } else {
        out.push_str("\n")
    }
}

/// One fixed-width row per sample
pub fn render_monitor_table(
    samples: &[Sample],
    duration_secs: u32,
    kind: SourceKind,
) -> Result<OutputBuffer, SignalError> {
    let mut out = OutputBuffer::with_capacity(
        samples
            .len()
            .saturating_mul(ROW_ESTIMATE)
            .saturating_add(HEADER_ESTIMATE),
    )?;

    out.push_fmt(format_args!(
        "=== Raw WiFi Signal Data ({}) ===\n",
        rssi_origin(kind)
    ))?;

    out.push_str("SSID: ")?;
    if let Some(first) = samples.first() {
        out.append(first.ssid.as_bytes())?;
    }
    out.push_str("\n")?;

    out.push_fmt(format_args!("Duration: {} seconds\n", duration_secs))?;

    match samples.first() {
        Some(first) => push_frequency(&mut out, first.frequency_khz, first.channel)?,
        None => out.push_str("\n")?,
    }

    out.push_str(COLUMN_HEADER)?;
    out.push_str(COLUMN_RULE)?;

    for sample in samples {
        out.push_fmt(format_args!(
            "{:>8} | {:>10} | {:>10} | {:>7} | {:>10}\n",
            sample.timestamp_ms,
            sample.signal_strength_dbm,
            sample.link_quality,
            sample.snr_db,
            sample.noise_floor_dbm
        ))?;
    }

    out.push_fmt(format_args!("\nTotal samples: {}\n", samples.len()))?;
    out.push_fmt(format_args!("Note: {}\n", kind.note()))?;

    Ok(out)
}

/// Averaged measurements followed by a quality grade
pub fn render_base_table(
    record: &AverageRecord,
    kind: SourceKind,
) -> Result<OutputBuffer, SignalError> {
    let mut out = OutputBuffer::with_capacity(HEADER_ESTIMATE)?;
    let quality = record.quality();

    out.push_fmt(format_args!("\n=== Base WiFi Signal Capture ({}) ===\n", rssi_origin(kind)))?;
    out.push_str("SSID: ")?;
    out.append(record.ssid.as_bytes())?;
    out.push_str("\n")?;
    out.push_fmt(format_args!("Samples Averaged: {}\n", record.sample_count))?;

    push_frequency(&mut out, record.frequency_khz, record.channel)?;

    out.push_fmt(format_args!(
        "Averaged Signal Measurements ({}):\n",
        measurement_origin(kind)
    ))?;
    out.push_fmt(format_args!(
        "  Signal Strength (RSSI): {} dBm ({}%)\n",
        record.signal_strength_dbm, record.signal_percent
    ))?;
    out.push_fmt(format_args!("  Link Quality: {}%\n", record.link_quality))?;
    out.push_fmt(format_args!("  SNR: {} dB\n", record.snr_db))?;
    out.push_fmt(format_args!(
        "  Noise Floor: {} dBm ({}%)\n",
        record.noise_floor_dbm, record.noise_percent
    ))?;

    out.push_str("\nSignal Quality:\n")?;
    out.push_fmt(format_args!(
        "  {} {} ({}%) - {}\n",
        quality.marker(),
        quality,
        record.signal_percent,
        quality.proximity()
    ))?;

    Ok(out)
}
