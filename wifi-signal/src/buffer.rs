use core::time::Duration;

use crate::{error::SignalError, sample::Sample};

/// Hard upper bound on samples kept for one run
pub const MAX_SAMPLES: usize = 600;

/// Number of samples a run of `duration_secs` at `interval` can produce,
/// capped at `max_samples`.
pub fn capacity_for(duration_secs: u32, interval: Duration, max_samples: usize) -> usize {
    let interval_ms = interval.as_millis().max(1);
    let samples = (duration_secs as u128 * 1000) / interval_ms;

    core::cmp::min(samples, max_samples as u128) as usize
}

/// Fixed-capacity, append-only store of the samples of one run
#[derive(Debug)]
pub struct SampleBuffer {
    samples: Vec<Sample>,
    capacity: usize,
}

impl SampleBuffer {
    pub fn with_capacity(capacity: usize) -> Result<Self, SignalError> {
        let mut samples = Vec::new();
        samples
            .try_reserve_exact(capacity)
            .map_err(|_| SignalError::AllocationFailure {
                requested: capacity.saturating_mul(core::mem::size_of::<Sample>()),
            })?;

        Ok(Self { samples, capacity })
    }

    pub fn push(&mut self, sample: Sample) -> Result<usize, SignalError> {
        if self.is_full() {
            return Err(SignalError::BufferFull {
                capacity: self.capacity,
            });
        }

        self.samples.push(sample);

        Ok(self.samples.len())
    }

    pub fn as_slice(&self) -> &[Sample] {
        &self.samples
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn is_full(&self) -> bool {
        self.samples.len() >= self.capacity
    }
}
