use thiserror::Error;

#[derive(Debug, Error)]
pub enum SignalError {
    /// No interface, not connected, or the query itself failed
    #[error("signal source unavailable: {0}")]
    NotAvailable(String),

    #[error("failed to allocate {requested} bytes")]
    AllocationFailure { requested: usize },

    #[error("sample buffer is full ({capacity} samples)")]
    BufferFull { capacity: usize },

    #[error("no samples collected in {duration_secs} s")]
    EmptyResult { duration_secs: u32 },

    #[error("failed to emit output: {0}")]
    Emit(#[from] std::io::Error),
}

impl SignalError {
    pub fn not_available(reason: impl Into<String>) -> Self {
        Self::NotAvailable(reason.into())
    }
}
