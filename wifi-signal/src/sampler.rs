use core::time::Duration;

use crate::{
    buffer::{capacity_for, SampleBuffer, MAX_SAMPLES},
    clock::Clock,
    error::SignalError,
    source::SignalSource,
};

/// Default delay between two polls
pub const SAMPLE_INTERVAL: Duration = Duration::from_millis(100);

#[derive(Debug, Clone, Copy)]
pub struct SamplingPlan {
    pub duration_secs: u32,
    pub interval: Duration,
    pub max_samples: usize,
}

impl SamplingPlan {
    pub fn new(duration_secs: u32) -> Self {
        Self {
            duration_secs,
            interval: SAMPLE_INTERVAL,
            max_samples: MAX_SAMPLES,
        }
    }

    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    pub fn with_max_samples(mut self, max_samples: usize) -> Self {
        self.max_samples = max_samples;
        self
    }

    pub fn duration(&self) -> Duration {
        Duration::from_secs(self.duration_secs as u64)
    }

    /// Number of samples this plan can produce at most
    pub fn capacity(&self) -> usize {
        capacity_for(self.duration_secs, self.interval, self.max_samples)
    }
}

/// Outcome of a successful sampling run
#[derive(Debug)]
pub struct Collection {
    pub samples: SampleBuffer,
    /// Wall time spent in the loop
    pub elapsed: Duration,
    /// Ticks on which the source had nothing to report
    pub skipped: u32,
}

impl Collection {
    /// Average time between two collected samples
    pub fn sample_period(&self) -> Duration {
        match self.samples.len() {
            0 => Duration::ZERO,
            count => self.elapsed / count as u32,
        }
    }
}

/// Poll `source` once per interval until the run duration has elapsed or
/// the buffer is full. A failed poll skips the tick but still sleeps.
pub fn collect_samples<S, C>(
    source: &mut S,
    clock: &mut C,
    plan: &SamplingPlan,
) -> Result<Collection, SignalError>
where
    S: SignalSource + ?Sized,
    C: Clock + ?Sized,
{
    let mut samples = SampleBuffer::with_capacity(plan.capacity())?;
    let duration = plan.duration();
    let start = clock.elapsed();
    let mut skipped = 0u32;

    log::debug!(
        "sampling {} s every {} ms (up to {} samples)",
        plan.duration_secs,
        plan.interval.as_millis(),
        samples.capacity()
    );

    while !samples.is_full() {
        if clock.elapsed().saturating_sub(start) >= duration {
            break;
        }

        match source.query() {
            Ok(sample) => {
                let elapsed = clock.elapsed().saturating_sub(start);
                let timestamp_ms = u32::try_from(elapsed.as_millis()).unwrap_or(u32::MAX);
                samples.push(sample.with_timestamp(timestamp_ms))?;
            }
            Err(err) => {
                skipped += 1;
                log::debug!("poll skipped: {}", err);
            }
        }

        clock.sleep(plan.interval);
    }

    let elapsed = clock.elapsed().saturating_sub(start);

    if samples.is_empty() {
        return Err(SignalError::EmptyResult {
            duration_secs: plan.duration_secs,
        });
    }

    Ok(Collection {
        samples,
        elapsed,
        skipped,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        clock::ManualClock,
        sample::{Sample, Ssid},
        source::SourceKind,
    };

    /// Succeeds on every tick whose index is not listed in `failing`
    struct ScriptedSource {
        tick: usize,
        failing: Vec<usize>,
        signal: Vec<i32>,
    }

    impl ScriptedSource {
        fn always() -> Self {
            Self {
                tick: 0,
                failing: Vec::new(),
                signal: vec![-60],
            }
        }
    }

    impl SignalSource for ScriptedSource {
        fn kind(&self) -> SourceKind {
            SourceKind::Native
        }

        fn query(&mut self) -> Result<Sample, SignalError> {
            let tick = self.tick;
            self.tick += 1;

            if self.failing.contains(&tick) {
                return Err(SignalError::not_available("scripted failure"));
            }

            let signal = self.signal[tick % self.signal.len()];
            Ok(Sample::new(Ssid::from("lab"), signal, 80, 2_412_000))
        }
    }

    /// Source that never answers
    struct SilentSource;

    impl SignalSource for SilentSource {
        fn kind(&self) -> SourceKind {
            SourceKind::Command
        }

        fn query(&mut self) -> Result<Sample, SignalError> {
            Err(SignalError::not_available("not connected"))
        }
    }

    /// Source whose query takes time on the shared clock
    struct SlowSource<'a> {
        clock: &'a std::cell::Cell<Duration>,
        cost: Duration,
    }

    struct SharedClock<'a> {
        now: &'a std::cell::Cell<Duration>,
    }

    impl Clock for SharedClock<'_> {
        fn elapsed(&self) -> Duration {
            self.now.get()
        }

        fn sleep(&mut self, duration: Duration) {
            self.now.set(self.now.get() + duration);
        }
    }

    impl SignalSource for SlowSource<'_> {
        fn kind(&self) -> SourceKind {
            SourceKind::Native
        }

        fn query(&mut self) -> Result<Sample, SignalError> {
            self.clock.set(self.clock.get() + self.cost);
            Ok(Sample::new(Ssid::from("lab"), -50, 90, 0))
        }
    }

    #[test]
    fn test_full_run_collects_capacity() {
        let mut source = ScriptedSource::always();
        let mut clock = ManualClock::new();

        let collection =
            collect_samples(&mut source, &mut clock, &SamplingPlan::new(5)).expect("collection");

        assert_eq!(collection.samples.len(), 50);
        assert_eq!(collection.skipped, 0);
        assert_eq!(collection.elapsed, Duration::from_secs(5));
        assert_eq!(collection.sample_period(), Duration::from_millis(100));

        let timestamps: Vec<u32> = collection
            .samples
            .as_slice()
            .iter()
            .map(|s| s.timestamp_ms)
            .collect();
        assert!(timestamps.windows(2).all(|w| w[0] <= w[1]));
        assert_eq!(timestamps[0], 0);
        assert_eq!(timestamps[49], 4900);
    }

    #[test]
    fn test_failed_polls_still_sleep() {
        let mut source = ScriptedSource {
            tick: 0,
            failing: vec![0, 1, 5],
            signal: vec![-60],
        };
        let mut clock = ManualClock::new();

        let collection =
            collect_samples(&mut source, &mut clock, &SamplingPlan::new(1)).expect("collection");

        assert_eq!(collection.samples.len(), 7);
        assert_eq!(collection.skipped, 3);
        assert_eq!(collection.samples.as_slice()[0].timestamp_ms, 200);
        assert_eq!(clock.elapsed(), Duration::from_secs(1));
    }

    #[test]
    fn test_no_samples_is_empty_result() {
        let mut clock = ManualClock::new();

        let result = collect_samples(&mut SilentSource, &mut clock, &SamplingPlan::new(3));

        assert!(matches!(
            result,
            Err(SignalError::EmptyResult { duration_secs: 3 })
        ));
        assert_eq!(clock.elapsed(), Duration::from_secs(3));
    }

    #[test]
    fn test_capacity_cap() {
        let mut source = ScriptedSource::always();
        let mut clock = ManualClock::new();
        let plan = SamplingPlan::new(60).with_max_samples(10);

        let collection = collect_samples(&mut source, &mut clock, &plan).expect("collection");

        assert_eq!(collection.samples.len(), 10);
        assert_eq!(clock.elapsed(), Duration::from_secs(1));
    }

    #[test]
    fn test_timestamp_taken_after_query() {
        let now = std::cell::Cell::new(Duration::ZERO);
        let mut source = SlowSource {
            clock: &now,
            cost: Duration::from_millis(30),
        };
        let mut clock = SharedClock { now: &now };

        let collection =
            collect_samples(&mut source, &mut clock, &SamplingPlan::new(1)).expect("collection");

        let samples = collection.samples.as_slice();
        assert_eq!(samples[0].timestamp_ms, 30);
        assert_eq!(samples[1].timestamp_ms, 160);
        // 130 ms per tick: 0, 130, ..., 910 start a poll before 1 s elapses
        assert_eq!(samples.len(), 8);
    }
}
