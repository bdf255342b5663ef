pub mod average;
pub mod buffer;
pub mod clock;
pub mod command;
pub mod error;
pub mod platform;
pub mod sample;
pub mod sampler;
pub mod source;

pub use average::AverageRecord;
pub use buffer::SampleBuffer;
pub use clock::{Clock, SystemClock};
pub use command::CommandSource;
pub use error::SignalError;
pub use platform::NativeSource;
pub use sample::{Sample, Ssid};
pub use sampler::{collect_samples, Collection, SamplingPlan};
pub use source::{SignalSource, SourceKind};
