mod classify;
mod combos;
mod extract;
mod png;
mod render;
mod report;

use std::io;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{mpsc, Arc};

use image::{DynamicImage, RgbImage};
use log::{debug, info, warn};

pub use classify::{classify, BinaryKind, FormatClassification, TextEncoding};
pub use combos::{enumerate_combinations, ChannelCombination};
pub use extract::{extract_payload, extract_plane};
pub use png::{describe_png, describe_png_checked};
pub(crate) use png::PNG_MAGIC;
#[cfg(test)]
pub(crate) use png::png_tests;
pub use render::{hex_dump_lines, render_ascii, render_bin, render_hex};
pub use report::{AnalysisReport, ReportSection, RunState};

use crate::common::{AnalysisConfig, OutputFormat, StegError, StegResult};

// Cancellation
//------------------------------------------------------------------------------

// Cloneable cooperative cancellation handle. The flag is checked once per
// combination boundary; an extraction in flight always runs to completion.
#[derive(Debug, Clone, Default)]
pub struct CancelFlag(Arc<AtomicBool>);

impl CancelFlag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }

    fn reset(&self) {
        self.0.store(false, Ordering::Relaxed);
    }
}

// Progress notification
//------------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub enum AnalysisEvent {
    Progress { completed: usize, total: usize },
    SectionCompleted(ReportSection),
    StateChanged(RunState),
}

// Receives events as the run advances. Implemented for closures, so the
// presentation layer can pick callback or channel delivery.
pub trait ProgressSink {
    fn notify(&mut self, event: AnalysisEvent);
}

impl<F> ProgressSink for F
where
    F: FnMut(AnalysisEvent),
{
    fn notify(&mut self, event: AnalysisEvent) {
        self(event)
    }
}

// Forwards events over a channel, typically to a presentation thread
pub struct ChannelSink(pub mpsc::Sender<AnalysisEvent>);

impl ProgressSink for ChannelSink {
    fn notify(&mut self, event: AnalysisEvent) {
        // A dropped receiver must not abort the run
        let _ = self.0.send(event);
    }
}

pub struct NullSink;

impl ProgressSink for NullSink {
    fn notify(&mut self, _: AnalysisEvent) {}
}

// Analyzer
//------------------------------------------------------------------------------

// Drives enumeration, extraction, classification and rendering for one run
// at a time. The caller owns the image and decides the execution context;
// the analyzer spawns no threads.
pub struct Analyzer {
    state: RunState,
    cancel: CancelFlag,
}

impl Analyzer {
    pub fn new() -> Self {
        Self { state: RunState::Idle, cancel: CancelFlag::new() }
    }

    pub fn state(&self) -> RunState {
        self.state
    }

    // Handle for requesting cancellation from another thread
    pub fn cancel_flag(&self) -> CancelFlag {
        self.cancel.clone()
    }

    // Runs the configured analysis to a terminal state. Completed and
    // cancelled runs return the (possibly partial) report; input errors fail
    // the run with no report. A fresh call always starts from scratch.
    pub fn analyze<S>(
        &mut self,
        img: &DynamicImage,
        config: &AnalysisConfig,
        sink: &mut S,
    ) -> StegResult<AnalysisReport>
    where
        S: ProgressSink + ?Sized,
    {
        self.state = RunState::Running;
        self.cancel.reset();
        sink.notify(AnalysisEvent::StateChanged(RunState::Running));

        match self.run(img, config, sink) {
            Ok(report) => {
                self.state = report.outcome();
                sink.notify(AnalysisEvent::StateChanged(self.state));
                Ok(report)
            }
            Err(err) => {
                warn!("Analysis failed: {err}");
                self.state = RunState::Failed;
                sink.notify(AnalysisEvent::StateChanged(RunState::Failed));
                Err(err)
            }
        }
    }

    fn run<S>(
        &self,
        img: &DynamicImage,
        config: &AnalysisConfig,
        sink: &mut S,
    ) -> StegResult<AnalysisReport>
    where
        S: ProgressSink + ?Sized,
    {
        validate(img, config)?;

        let rgb = img.to_rgb8();
        let combos = enumerate_combinations(config);
        let total = combos.len();
        info!("Starting steganalysis: {total} combinations, output format {}", config.output_format);

        let mut sections = Vec::with_capacity(total);
        let mut outcome = RunState::Completed;

        for (i, combo) in combos.iter().enumerate() {
            if self.cancel.is_cancelled() {
                info!("Analysis cancelled after {i} of {total} combinations");
                outcome = RunState::Cancelled;
                break;
            }

            debug!("Analyzing combination {combo}");
            let section = match analyze_combination(&rgb, combo, config) {
                Ok(section) => section,
                Err(err) => {
                    warn!("Combination {combo} failed: {err}");
                    error_section(*combo, err)
                }
            };
            sink.notify(AnalysisEvent::SectionCompleted(section.clone()));
            sections.push(section);
            sink.notify(AnalysisEvent::Progress { completed: i + 1, total });
        }

        Ok(AnalysisReport::new(sections, outcome))
    }

    // Streams every combination's complete hex dump to the writer, ignoring
    // max_output_bytes. Honors cancellation at combination boundaries and
    // leaves the run state untouched.
    pub fn dump_hex<W: io::Write>(
        &self,
        img: &DynamicImage,
        config: &AnalysisConfig,
        out: &mut W,
    ) -> StegResult<()> {
        validate(img, config)?;

        let rgb = img.to_rgb8();
        let combos = enumerate_combinations(config);
        info!("Dumping {} combinations in full", combos.len());

        writeln!(out, "=== Steganalysis dump ===")?;
        writeln!(out, "Image: {}x{}", rgb.width(), rgb.height())?;
        writeln!(out, "Combinations: {}", combos.len())?;

        for combo in &combos {
            if self.cancel.is_cancelled() {
                writeln!(out, "\n=== Dump cancelled ===")?;
                break;
            }

            writeln!(out, "\n=== Channel {combo} ===")?;
            match extract_payload(&rgb, combo) {
                Ok(payload) => {
                    writeln!(out, "Extracted data size: {} bytes", payload.len())?;
                    for line in hex_dump_lines(&payload) {
                        writeln!(out, "{line}")?;
                    }
                }
                Err(err) => writeln!(out, "Error: {err}")?,
            }
        }

        Ok(())
    }
}

impl Default for Analyzer {
    fn default() -> Self {
        Self::new()
    }
}

// Single combination pipeline
//------------------------------------------------------------------------------

// Extract, classify when in auto mode, render. Errors here fail only this
// combination; the orchestrator records them inline and moves on.
pub fn analyze_combination(
    img: &RgbImage,
    combo: &ChannelCombination,
    config: &AnalysisConfig,
) -> StegResult<ReportSection> {
    let payload = extract_payload(img, combo)?;
    let max = config.max_output_bytes;

    let mut lines = vec![format!("Extracted data size: {} bytes", payload.len())];
    let mut classification = None;

    match config.output_format {
        OutputFormat::Hex => lines.extend(render_hex(&payload, max)),
        OutputFormat::Bin => lines.extend(render_bin(&payload, max)),
        OutputFormat::Ascii => lines.extend(render_ascii(&payload, max)),
        OutputFormat::Auto => {
            let class = classify(&payload, config);
            lines.extend(class_lines(&payload, &class, max));
            classification = Some(class);
        }
    }

    Ok(ReportSection { combination: *combo, payload_len: payload.len(), classification, lines })
}

fn class_lines(payload: &[u8], class: &FormatClassification, max: usize) -> Vec<String> {
    match class {
        FormatClassification::Text { encoding, printable_ratio } => {
            let mut lines =
                vec![format!("Detected encoding: {encoding} (printable ratio {printable_ratio:.2})")];
            lines.extend(render_ascii(payload, max));
            lines
        }
        FormatClassification::KnownBinary(BinaryKind::Png) => {
            let mut lines = vec!["Detected PNG file signature".to_string()];
            lines.extend(describe_png(payload, max));
            lines
        }
        FormatClassification::KnownBinary(kind) => {
            let mut lines = vec![format!("Detected {kind} file signature")];
            lines.extend(render_hex(payload, max));
            lines
        }
        FormatClassification::OpaqueBinary => {
            let mut lines = vec!["Unrecognized data type, showing hex dump".to_string()];
            lines.extend(render_hex(payload, max));
            lines
        }
    }
}

fn error_section(combination: ChannelCombination, err: StegError) -> ReportSection {
    ReportSection {
        combination,
        payload_len: 0,
        classification: None,
        lines: vec![format!("Error: {err}")],
    }
}

fn validate(img: &DynamicImage, config: &AnalysisConfig) -> StegResult<()> {
    if img.width() == 0 || img.height() == 0 {
        return Err(StegError::EmptyImage);
    }
    if config.channels.is_empty() {
        return Err(StegError::EmptyChannelSelection);
    }
    if config.bit_positions.is_empty() {
        return Err(StegError::EmptyBitSelection);
    }
    Ok(())
}
