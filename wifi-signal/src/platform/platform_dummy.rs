use crate::{
    error::SignalError,
    sample::Sample,
    source::{SignalSource, SourceKind},
};

/// Stand-in for platforms without a native wireless API binding
pub struct NativeSource;

impl NativeSource {
    pub fn new() -> Self {
        NativeSource
    }
}

impl Default for NativeSource {
    fn default() -> Self {
        Self::new()
    }
}

impl SignalSource for NativeSource {
    fn kind(&self) -> SourceKind {
        SourceKind::Native
    }

    fn probe(&mut self) -> Result<(), SignalError> {
        Err(SignalError::not_available(
            "native wireless API is not supported on this platform",
        ))
    }

    fn query(&mut self) -> Result<Sample, SignalError> {
        Err(SignalError::not_available(
            "native wireless API is not supported on this platform",
        ))
    }
}
