use std::io::Write;
use std::time::Duration;

use wifi_report::{
    json::{render_base_document, render_monitor_document, JSON_END, JSON_START},
    table::{render_base_table, render_monitor_table},
    OutputBuffer,
};
use wifi_signal::{
    buffer::MAX_SAMPLES, collect_samples, sampler::SAMPLE_INTERVAL, AverageRecord, Clock,
    SamplingPlan, SignalError, SignalSource,
};

use crate::mode::{RunMode, RunRequest};

/// Which reports a run emits
#[derive(Debug, Clone, Copy)]
pub struct OutputOptions {
    pub table: bool,
    pub document: bool,
}

impl Default for OutputOptions {
    fn default() -> Self {
        Self {
            table: true,
            document: true,
        }
    }
}

/// What a finished run produced
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunSummary {
    pub mode: RunMode,
    pub samples: usize,
    /// Size of the structured document, 0 when disabled
    pub document_bytes: usize,
}

pub struct RunController<S, C> {
    source: S,
    clock: C,
    interval: Duration,
    max_samples: usize,
    output: OutputOptions,
}

impl<S: SignalSource, C: Clock> RunController<S, C> {
    pub fn new(source: S, clock: C) -> Self {
        Self {
            source,
            clock,
            interval: SAMPLE_INTERVAL,
            max_samples: MAX_SAMPLES,
            output: OutputOptions::default(),
        }
    }

    pub fn with_plan(mut self, interval: Duration, max_samples: usize) -> Self {
        self.interval = interval;
        self.max_samples = max_samples;
        self
    }

    pub fn with_output(mut self, output: OutputOptions) -> Self {
        self.output = output;
        self
    }

    /// Sample for the requested duration and write the reports to `out`.
    ///
    /// Reports are fully rendered before the first byte is written, so a
    /// failed run writes nothing.
    pub fn run<W: Write + ?Sized>(
        &mut self,
        request: &RunRequest,
        out: &mut W,
    ) -> Result<RunSummary, SignalError> {
        if let Some(notice) = &request.notice {
            log::info!("{}", notice);
        }

        let kind = self.source.kind();

        log::info!(
            "{} mode over {} s using {} source",
            request.mode,
            request.duration_secs,
            kind
        );

        if let Err(err) = self.source.probe() {
            log::warn!("wireless capability check failed: {}", err);
        }

        let plan = SamplingPlan::new(request.duration_secs)
            .with_interval(self.interval)
            .with_max_samples(self.max_samples);

        let collection = collect_samples(&mut self.source, &mut self.clock, &plan)?;

        let samples = collection.samples.as_slice();

        log::info!(
            "collected {} samples in {} ms (~{} ms per sample, {} polls skipped)",
            samples.len(),
            collection.elapsed.as_millis(),
            collection.sample_period().as_millis(),
            collection.skipped
        );

        let (table, document) = match request.mode {
            RunMode::Monitor => {
                let table = if self.output.table {
                    Some(render_monitor_table(samples, request.duration_secs, kind)?)
                } else {
                    None
                };
                let document = if self.output.document {
                    Some(render_monitor_document(samples)?)
                } else {
                    None
                };
                (table, document)
            }
            RunMode::Base => {
                let record = AverageRecord::from_samples(samples).ok_or(
                    SignalError::EmptyResult {
                        duration_secs: request.duration_secs,
                    },
                )?;

                log::debug!("averaged {} samples: {:?}", record.sample_count, record);

                let table = if self.output.table {
                    Some(render_base_table(&record, kind)?)
                } else {
                    None
                };
                let document = if self.output.document {
                    Some(render_base_document(&record)?)
                } else {
                    None
                };
                (table, document)
            }
        };

        let document_bytes = document.as_ref().map_or(0, OutputBuffer::len);
        let report = assemble(table, document)?;

        out.write_all(report.as_bytes())?;
        out.flush()?;

        Ok(RunSummary {
            mode: request.mode,
            samples: samples.len(),
            document_bytes,
        })
    }
}

/// Join the rendered reports into one emission, table first
fn assemble(
    table: Option<OutputBuffer>,
    document: Option<OutputBuffer>,
) -> Result<OutputBuffer, SignalError> {
    let size = table.as_ref().map_or(0, OutputBuffer::len)
        + document.as_ref().map_or(0, OutputBuffer::len)
        + 128;
    let mut report = OutputBuffer::with_capacity(size)?;

    if let Some(table) = table {
        report.append(table.as_bytes())?;
    }

    if let Some(document) = document {
        report.append(document.as_bytes())?;
        report.push_fmt(format_args!(
            "[+] JSON data sent ({} bytes)\n",
            document.len()
        ))?;
        report.push_fmt(format_args!(
            "[*] Copy JSON between {} and {} markers\n",
            JSON_START, JSON_END
        ))?;
    }

    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use wifi_report::json::extract_document;
    use wifi_signal::{clock::ManualClock, Sample, SourceKind, Ssid};

    struct FixedSource {
        polls: usize,
        signal: Vec<i32>,
        probed: bool,
    }

    impl FixedSource {
        fn new(signal: Vec<i32>) -> Self {
            Self {
                polls: 0,
                signal,
                probed: false,
            }
        }
    }

    impl SignalSource for FixedSource {
        fn kind(&self) -> SourceKind {
            SourceKind::Native
        }

        fn probe(&mut self) -> Result<(), SignalError> {
            self.probed = true;
            Ok(())
        }

        fn query(&mut self) -> Result<Sample, SignalError> {
            let signal = self.signal[self.polls % self.signal.len()];
            self.polls += 1;
            Ok(Sample::new(Ssid::from("lab \"5G\""), signal, 80, 5_180_000))
        }
    }

    struct UnavailableSource;

    impl SignalSource for UnavailableSource {
        fn kind(&self) -> SourceKind {
            SourceKind::Command
        }

        fn probe(&mut self) -> Result<(), SignalError> {
            Err(SignalError::not_available("no wireless adapter detected"))
        }

        fn query(&mut self) -> Result<Sample, SignalError> {
            Err(SignalError::not_available("not connected"))
        }
    }

    /// Sink that rejects every write
    struct BrokenPipe;

    impl Write for BrokenPipe {
        fn write(&mut self, _buf: &[u8]) -> std::io::Result<usize> {
            Err(std::io::ErrorKind::BrokenPipe.into())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    fn document_json(out: &[u8]) -> serde_json::Value {
        let text = std::str::from_utf8(out).expect("utf8");
        serde_json::from_str(extract_document(text).expect("markers")).expect("json")
    }

    #[test]
    fn test_monitor_run() {
        let mut controller = RunController::new(FixedSource::new(vec![-50]), ManualClock::new());
        let mut out = Vec::new();

        let summary = controller
            .run(&RunRequest::parse("monitor 5"), &mut out)
            .expect("run");

        assert_eq!(summary.mode, RunMode::Monitor);
        assert_eq!(summary.samples, 50);
        assert!(controller.source.probed);

        let text = String::from_utf8(out.clone()).expect("utf8");
        assert!(text.starts_with("=== Raw WiFi Signal Data"));
        assert!(text.contains("Total samples: 50\n"));
        assert!(text.contains(&format!("[+] JSON data sent ({} bytes)\n", summary.document_bytes)));

        let table_end = text.find("Total samples").expect("table");
        assert!(table_end < text.find(JSON_START).expect("document"));

        let value = document_json(&out);
        let samples = value["samples"].as_array().expect("samples");
        assert_eq!(samples.len(), 50);
        assert_eq!(value["total_samples"], 50);
        assert_eq!(samples[0]["ssid"], "lab \"5G\"");

        let timestamps: Vec<u64> = samples
            .iter()
            .map(|s| s["timestamp_ms"].as_u64().expect("timestamp"))
            .collect();
        assert!(timestamps.windows(2).all(|w| w[0] <= w[1]));
    }

    #[test]
    fn test_base_run_averages() {
        let mut controller =
            RunController::new(FixedSource::new(vec![-50, -60, -40]), ManualClock::new());
        let mut out = Vec::new();

        let summary = controller
            .run(&RunRequest::parse("base 3"), &mut out)
            .expect("run");

        assert_eq!(summary.samples, 30);

        let value = document_json(&out);
        assert_eq!(value["collection_type"], "base");
        assert_eq!(value["sample_count"], 30);
        assert_eq!(value["signal_strength_dbm"], -50);
        assert_eq!(value["channel"], 36);
        assert_eq!(value["frequency_khz"], 5_180_000);

        let text = String::from_utf8(out).expect("utf8");
        assert!(text.contains("Samples Averaged: 30\n"));
        assert!(text.contains("Signal Quality:\n"));
    }

    #[test]
    fn test_empty_run_writes_nothing() {
        for mode in ["base", "monitor 2"] {
            let mut controller = RunController::new(UnavailableSource, ManualClock::new());
            let mut out = Vec::new();

            let result = controller.run(&RunRequest::parse(mode), &mut out);

            assert!(matches!(result, Err(SignalError::EmptyResult { .. })));
            assert!(out.is_empty());
        }
    }

    #[test]
    fn test_output_options() {
        let mut controller = RunController::new(FixedSource::new(vec![-70]), ManualClock::new())
            .with_output(OutputOptions {
                table: false,
                document: true,
            });
        let mut out = Vec::new();

        controller
            .run(&RunRequest::parse("monitor 1"), &mut out)
            .expect("run");

        let text = String::from_utf8(out).expect("utf8");
        assert!(text.starts_with(&format!("\n{}\n", JSON_START)));
        assert!(!text.contains("Time(ms)"));

        let mut controller = RunController::new(FixedSource::new(vec![-70]), ManualClock::new())
            .with_output(OutputOptions {
                table: true,
                document: false,
            });
        let mut out = Vec::new();

        let summary = controller
            .run(&RunRequest::parse("monitor 1"), &mut out)
            .expect("run");

        let text = String::from_utf8(out).expect("utf8");
        assert_eq!(summary.document_bytes, 0);
        assert!(!text.contains(JSON_START));
        assert!(text.contains("Total samples: 10\n"));
    }

    #[test]
    fn test_custom_plan() {
        let mut controller = RunController::new(FixedSource::new(vec![-55]), ManualClock::new())
            .with_plan(Duration::from_millis(500), 4);
        let mut out = Vec::new();

        let summary = controller
            .run(&RunRequest::parse("monitor 10"), &mut out)
            .expect("run");

        assert_eq!(summary.samples, 4);
        assert_eq!(controller.clock.elapsed(), Duration::from_secs(2));
    }

    #[test]
    fn test_emit_failure() {
        let mut controller = RunController::new(FixedSource::new(vec![-55]), ManualClock::new());

        let result = controller.run(&RunRequest::parse("base 1"), &mut BrokenPipe);

        assert!(matches!(result, Err(SignalError::Emit(_))));
    }
}
