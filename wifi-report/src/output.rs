use core::fmt;

use wifi_signal::SignalError;

#[derive(Debug)]
pub struct OutputBuffer {
    data: Vec<u8>,
    capacity: usize,
}

fn allocate(capacity: usize) -> Result<Vec<u8>, SignalError> {
    let mut data = Vec::new();
    data.try_reserve_exact(capacity)
        .map_err(|_| SignalError::AllocationFailure {
            requested: capacity,
        })?;

    Ok(data)
}

impl OutputBuffer {
    /// Pre-size the buffer for the expected report length
    pub fn with_capacity(capacity: usize) -> Result<Self, SignalError> {
        Ok(Self {
            data: allocate(capacity)?,
            capacity,
        })
    }

    /// Append raw bytes, growing to `max(needed, capacity) * 2` when full
    pub fn append(&mut self, bytes: &[u8]) -> Result<(), SignalError> {
        self.grow(self.data.len().saturating_add(bytes.len()))?;
        self.data.extend_from_slice(bytes);

        Ok(())
    }

    /// Make room for `needed` bytes. On failure the content is left as is.
    fn grow(&mut self, needed: usize) -> Result<(), SignalError> {
        if needed <= self.capacity {
            return Ok(());
        }

        let capacity = core::cmp::max(needed, self.capacity).saturating_mul(2);
        let mut grown = allocate(capacity)?;

        grown.extend_from_slice(&self.data);

        log::trace!("output buffer grown {} -> {}", self.capacity, capacity);

        self.data = grown;
        self.capacity = capacity;

        Ok(())
    }

    pub fn push_str(&mut self, text: &str) -> Result<(), SignalError> {
        self.append(text.as_bytes())
    }

    /// Append `value` in decimal without going through a formatter
    pub fn push_int(&mut self, value: i64) -> Result<(), SignalError> {
        // u64::MAX has 20 digits, plus the sign
        let mut text = [0u8; 21];
        let mut len = 0;
        let mut magnitude = value.unsigned_abs();

        loop {
            text[len] = b'0' + (magnitude % 10) as u8;
            len += 1;
            magnitude /= 10;

            if magnitude == 0 {
                break;
            }
        }

        if value < 0 {
            text[len] = b'-';
            len += 1;
        }

        text[..len].reverse();

        self.append(&text[..len])
    }

    /// Append formatted text, keeping the allocation error of a failed write
    pub fn push_fmt(&mut self, args: fmt::Arguments) -> Result<(), SignalError> {
        struct Adapter<'a> {
            buffer: &'a mut OutputBuffer,
            error: Option<SignalError>,
        }

        impl fmt::Write for Adapter<'_> {
            fn write_str(&mut self, s: &str) -> fmt::Result {
                self.buffer.push_str(s).map_err(|err| {
                    self.error = Some(err);
                    fmt::Error
                })
            }
        }

        let mut adapter = Adapter {
            buffer: self,
            error: None,
        };

        fmt::write(&mut adapter, args).map_err(|_| {
            adapter
                .error
                .take()
                .unwrap_or(SignalError::AllocationFailure { requested: 0 })
        })
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.data
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}
