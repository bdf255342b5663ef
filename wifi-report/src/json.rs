use wifi_signal::{AverageRecord, Sample, SignalError};

use crate::output::OutputBuffer;

/// Frames a document so it can be cut out of mixed console output
pub const JSON_START: &str = "[JSON_START]";
pub const JSON_END: &str = "[JSON_END]";

/// Append `bytes` as the body of a JSON string.
///
/// Only backslash, double quote, newline, carriage return and tab are
/// escaped. Every other byte is copied as is.
pub fn push_escaped(out: &mut OutputBuffer, bytes: &[u8]) -> Result<(), SignalError> {
    let mut start = 0;

    for (i, byte) in bytes.iter().enumerate() {
        let escaped: &[u8] = match byte {
            b'\\' => b"\\\\",
            b'"' => b"\\\"",
            b'\n' => b"\\n",
            b'\r' => b"\\r",
            b'\t' => b"\\t",
            _ => continue,
        };

        out.append(&bytes[start..i])?;
        out.append(escaped)?;
        start = i + 1;
    }

    out.append(&bytes[start..])
}

fn push_int_field(
    out: &mut OutputBuffer,
    indent: &str,
    key: &str,
    value: i64,
    last: bool,
) -> Result<(), SignalError> {
    out.push_str(indent)?;
    out.push_str("\"")?;
    out.push_str(key)?;
    out.push_str("\": ")?;
    out.push_int(value)?;
    out.push_str(if last { "\n" } else { ",\n" })
}

fn push_string_field(
    out: &mut OutputBuffer,
    indent: &str,
    key: &str,
    value: &[u8],
) -> Result<(), SignalError> {
    out.push_str(indent)?;
    out.push_str("\"")?;
    out.push_str(key)?;
    out.push_str("\": \"")?;
    push_escaped(out, value)?;
    out.push_str("\",\n")
}

/// Render every sample of a monitor run
pub fn render_monitor_document(samples: &[Sample]) -> Result<OutputBuffer, SignalError> {
    let mut out = OutputBuffer::with_capacity(samples.len().saturating_mul(250).saturating_add(1024))?;
    const FIELD: &str = "      ";

    out.push_str("\n")?;
    out.push_str(JSON_START)?;
    out.push_str("\n{\n")?;
    out.push_str("  \"collection_type\": \"monitor\",\n")?;
    out.push_str("  \"samples\": [\n")?;

    for (i, sample) in samples.iter().enumerate() {
        out.push_str("    {\n")?;

        push_int_field(&mut out, FIELD, "timestamp_ms", sample.timestamp_ms as i64, false)?;
        push_int_field(
            &mut out,
            FIELD,
            "signal_strength_dbm",
            sample.signal_strength_dbm as i64,
            false,
        )?;
        push_int_field(&mut out, FIELD, "link_quality", sample.link_quality as i64, false)?;
        push_int_field(&mut out, FIELD, "snr_db", sample.snr_db as i64, false)?;
        push_int_field(
            &mut out,
            FIELD,
            "noise_floor_dbm",
            sample.noise_floor_dbm as i64,
            false,
        )?;
        push_string_field(&mut out, FIELD, "ssid", sample.ssid.as_bytes())?;
        push_int_field(&mut out, FIELD, "frequency_khz", sample.frequency_khz as i64, false)?;
        push_int_field(&mut out, FIELD, "channel", sample.channel as i64, true)?;

        if i + 1 < samples.len() {
            out.push_str("    },\n")?;
        } else {
            out.push_str("    }\n")?;
        }
    }

    out.push_str("  ],\n")?;
    push_int_field(&mut out, "  ", "total_samples", samples.len() as i64, true)?;
    out.push_str("}\n")?;
    out.push_str(JSON_END)?;
    out.push_str("\n\n")?;

    Ok(out)
}

/// Render the averaged record of a base run
pub fn render_base_document(record: &AverageRecord) -> Result<OutputBuffer, SignalError> {
    let mut out = OutputBuffer::with_capacity(2048)?;
    const FIELD: &str = "  ";

    out.push_str("\n")?;
    out.push_str(JSON_START)?;
    out.push_str("\n{\n")?;
    out.push_str("  \"collection_type\": \"base\",\n")?;

    push_string_field(&mut out, FIELD, "ssid", record.ssid.as_bytes())?;
    push_int_field(&mut out, FIELD, "sample_count", record.sample_count as i64, false)?;
    push_int_field(&mut out, FIELD, "frequency_khz", record.frequency_khz as i64, false)?;
    push_int_field(&mut out, FIELD, "channel", record.channel as i64, false)?;
    push_int_field(
        &mut out,
        FIELD,
        "signal_strength_dbm",
        record.signal_strength_dbm as i64,
        false,
    )?;
    push_int_field(&mut out, FIELD, "link_quality", record.link_quality as i64, false)?;
    push_int_field(&mut out, FIELD, "snr_db", record.snr_db as i64, false)?;
    push_int_field(
        &mut out,
        FIELD,
        "noise_floor_dbm",
        record.noise_floor_dbm as i64,
        false,
    )?;
    push_int_field(&mut out, FIELD, "signal_percent", record.signal_percent as i64, false)?;
    push_int_field(&mut out, FIELD, "noise_percent", record.noise_percent as i64, true)?;

    out.push_str("}\n")?;
    out.push_str(JSON_END)?;
    out.push_str("\n\n")?;

    Ok(out)
}

/// Cut the JSON text out of a framed document
pub fn extract_document(text: &str) -> Option<&str> {
    let start = text.find(JSON_START)? + JSON_START.len();
    let end = start + text[start..].find(JSON_END)?;

    Some(text[start..end].trim())
}
