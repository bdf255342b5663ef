use core::fmt;

use crate::{error::SignalError, sample::Sample};

/// Where a source gets its readings from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceKind {
    /// Native wireless configuration API, RSSI from BSS entries
    Native,
    /// Parsed output of an external diagnostic command
    Command,
}

impl SourceKind {
    /// One line describing the origin of the RSSI values
    pub fn note(&self) -> &'static str {
        match self {
            SourceKind::Native => "Using hardware-accurate RSSI from BSS entries",
            SourceKind::Command => "Using RSSI approximated from the reported signal percentage",
        }
    }
}

impl fmt::Display for SourceKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            SourceKind::Native => write!(f, "native"),
            SourceKind::Command => write!(f, "command"),
        }
    }
}

impl core::str::FromStr for SourceKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "native" => Ok(SourceKind::Native),
            "command" => Ok(SourceKind::Command),
            other => Err(format!("unknown signal source '{}'", other)),
        }
    }
}

/// Signal source provider.
///
/// Every call to [`SignalSource::query`] asks the operating system for the
/// currently associated network and returns a fresh [`Sample`] (with a zero
/// timestamp) or [`SignalError::NotAvailable`]. Any OS resource acquired by
/// a query is released before it returns.
pub trait SignalSource {
    fn kind(&self) -> SourceKind;

    /// Check once that a wireless adapter is present
    fn probe(&mut self) -> Result<(), SignalError> {
        Ok(())
    }

    fn query(&mut self) -> Result<Sample, SignalError>;
}

impl<S: SignalSource + ?Sized> SignalSource for Box<S> {
    fn kind(&self) -> SourceKind {
        (**self).kind()
    }

    fn probe(&mut self) -> Result<(), SignalError> {
        (**self).probe()
    }

    fn query(&mut self) -> Result<Sample, SignalError> {
        (**self).query()
    }
}
