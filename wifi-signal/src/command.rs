use std::process::Command;

use wifi_metrics::Dbm;

use crate::{
    error::SignalError,
    sample::{Sample, Ssid},
    source::{SignalSource, SourceKind},
};

pub const DEFAULT_PROGRAM: &str = "netsh";
pub const DEFAULT_ARGS: [&str; 3] = ["wlan", "show", "interfaces"];
pub const DEFAULT_PROBE_ARGS: [&str; 3] = ["wlan", "show", "drivers"];

/// Identifier reported when the command shows no SSID
pub const HIDDEN_SSID: &str = "Hidden/Unknown";

/// Approximate RSSI from a signal percentage: `percent / 2 - 100`, pinned
/// to -30 dBm at 100% and above and to -100 dBm at 0% and below.
///
/// This is a different model from the link quality based SNR estimate and
/// only meant for sources that report nothing but a percentage.
pub fn percent_to_dbm(percent: i32) -> Dbm {
    if percent >= 100 {
        return -30;
    }
    if percent <= 0 {
        return -100;
    }

    percent / 2 - 100
}

/// Fields picked out of one command run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InterfaceStatus {
    pub connected: bool,
    pub ssid: Option<String>,
    pub signal_percent: Option<i32>,
}

impl InterfaceStatus {
    pub fn to_sample(&self) -> Result<Sample, SignalError> {
        if !self.connected {
            return Err(SignalError::not_available("wireless interface is not connected"));
        }

        let ssid = match self.ssid.as_deref() {
            Some(ssid) if !ssid.is_empty() => ssid,
            _ => HIDDEN_SSID,
        };

        let percent = self.signal_percent.unwrap_or(0);

        Ok(Sample::new(
            Ssid::from(ssid),
            percent_to_dbm(percent),
            percent.clamp(0, 100) as u8,
            0,
        ))
    }
}

/// Parse `key : value` interface output.
///
/// Only the first occurrence of each field is used, so with several
/// adapters the first one listed wins.
pub fn parse_interface_output(output: &str) -> InterfaceStatus {
    let mut status = InterfaceStatus::default();
    let mut state_seen = false;

    for line in output.lines() {
        let Some((key, value)) = split_kv(line) else {
            continue;
        };

        if key.eq_ignore_ascii_case("State") && !state_seen {
            state_seen = true;
            status.connected = value.eq_ignore_ascii_case("connected");
        } else if key.eq_ignore_ascii_case("SSID") && status.ssid.is_none() {
            if !value.is_empty() {
                status.ssid = Some(value.to_owned());
            }
        } else if key.eq_ignore_ascii_case("Signal") && status.signal_percent.is_none() {
            status.signal_percent = parse_leading_int(value);
        }
    }

    status
}

/// Look for signs of a wireless driver in the driver listing
pub fn has_wireless_capability(output: &str) -> bool {
    output
        .lines()
        .any(|line| line.contains("Radio types supported") || line.contains("802.11"))
}

/// Split on the first colon, trimming both sides
fn split_kv(line: &str) -> Option<(&str, &str)> {
    let (key, value) = line.split_once(':')?;
    let key = key.trim();
    if key.is_empty() {
        return None;
    }

    Some((key, value.trim_matches(|c: char| c == ' ' || c == '\t' || c == '\r')))
}

/// Parse `84%` or `-3` style values, ignoring anything after the digits
fn parse_leading_int(value: &str) -> Option<i32> {
    let value = value.trim();
    let digits_start = usize::from(value.starts_with('-') || value.starts_with('+'));
    let digits_end = value[digits_start..]
        .find(|c: char| !c.is_ascii_digit())
        .map(|i| i + digits_start)
        .unwrap_or(value.len());

    if digits_end == digits_start {
        return None;
    }

    value[..digits_end].parse().ok()
}

/// Source that parses the output of an external command such as
/// `netsh wlan show interfaces`. Frequency and channel are not reported.
pub struct CommandSource {
    program: String,
    args: Vec<String>,
    probe_args: Vec<String>,
}

impl CommandSource {
    pub fn new(program: impl Into<String>, args: Vec<String>, probe_args: Vec<String>) -> Self {
        Self {
            program: program.into(),
            args,
            probe_args,
        }
    }

    fn run(&self, args: &[String]) -> Result<String, SignalError> {
        let output = Command::new(&self.program)
            .args(args)
            .output()
            .map_err(|e| SignalError::not_available(format!("failed to run {}: {}", self.program, e)))?;

        if !output.status.success() {
            return Err(SignalError::not_available(format!(
                "{} exited with {}",
                self.program, output.status
            )));
        }

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

impl Default for CommandSource {
    fn default() -> Self {
        Self::new(
            DEFAULT_PROGRAM,
            DEFAULT_ARGS.iter().map(|s| s.to_string()).collect(),
            DEFAULT_PROBE_ARGS.iter().map(|s| s.to_string()).collect(),
        )
    }
}

impl SignalSource for CommandSource {
    fn kind(&self) -> SourceKind {
        SourceKind::Command
    }

    fn probe(&mut self) -> Result<(), SignalError> {
        let output = self.run(&self.probe_args)?;

        if !has_wireless_capability(&output) {
            return Err(SignalError::not_available("no wireless adapter detected"));
        }

        Ok(())
    }

    fn query(&mut self) -> Result<Sample, SignalError> {
        let output = self.run(&self.args)?;
        parse_interface_output(&output).to_sample()
    }
}
