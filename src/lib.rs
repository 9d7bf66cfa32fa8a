//! # stegscope
//!
//! A Rust library for extracting and classifying payloads hidden in the bit planes of RGB
//! images. Reads the least or most significant bit of any channel combination, repacks the
//! bits into bytes, guesses what the bytes are, and renders a plain text report.
//!
//! ## Features
//!
//! - **Bit-Plane Extraction**: LSB or MSB of any subset of the R, G and B channels, read
//!   jointly as one bit stream in row-major pixel order
//! - **Brute-Force Scan**: All 7 channel subsets at both bit positions (14 combinations) in
//!   a single deterministic run
//! - **Auto Classification**: UTF-8, GBK and Latin-1 text detection with printable-ratio
//!   gates, plus PNG, JPEG and ZIP signature matching
//! - **PNG Introspection**: Chunk walk over extracted payloads and loaded files, with
//!   advisory CRC-32 verification
//! - **Progress and Cancellation**: Per-combination progress events over callbacks or
//!   channels, and cooperative cancellation that keeps the partial report
//! - **Image Inspection**: Entropy and histogram anomaly advisories, file signature
//!   identification, and bit-plane visualizations
//!
//! ## Quick Start
//!
//! ### Scanning an Image
//!
//! ```rust
//! use image::{DynamicImage, Rgb, RgbImage};
//! use stegscope::analysis::NullSink;
//! use stegscope::{AnalysisConfig, Analyzer, Channel};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! // Plant "hi" in the red LSBs of a 16 pixel image
//! let message = b"hi";
//! let mut img = RgbImage::from_pixel(8, 2, Rgb([120, 120, 120]));
//! for (i, px) in img.pixels_mut().enumerate() {
//!     let bit = (message[i / 8] >> (7 - (i % 8))) & 1;
//!     px.0[0] = (px.0[0] & !1) | bit;
//! }
//!
//! // Read the red LSB plane back; defaults classify the payload automatically
//! let config = AnalysisConfig { channels: Channel::R.into(), ..AnalysisConfig::default() };
//! let mut analyzer = Analyzer::new();
//! let report = analyzer.analyze(&DynamicImage::ImageRgb8(img), &config, &mut NullSink)?;
//!
//! assert!(report.to_string().contains("hi"));
//! # Ok(())
//! # }
//! ```
//!
//! ### Brute-Force Scan
//!
//! ```rust,no_run
//! use stegscope::analysis::NullSink;
//! use stegscope::{AnalysisConfig, Analyzer};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let img = image::open("suspect.png")?;
//! let config = AnalysisConfig { brute_force: true, ..AnalysisConfig::default() };
//!
//! let mut analyzer = Analyzer::new();
//! let report = analyzer.analyze(&img, &config, &mut NullSink)?;
//! for section in report.sections() {
//!     print!("{section}");
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ### Progress Over a Channel
//!
//! ```rust,no_run
//! use std::sync::mpsc;
//! use stegscope::analysis::{AnalysisEvent, ChannelSink};
//! use stegscope::{AnalysisConfig, Analyzer};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let img = image::open("suspect.png")?;
//! let config = AnalysisConfig { brute_force: true, ..AnalysisConfig::default() };
//!
//! let (tx, rx) = mpsc::channel();
//! let progress = std::thread::spawn(move || {
//!     for event in rx {
//!         if let AnalysisEvent::Progress { completed, total } = event {
//!             println!("{completed}/{total}");
//!         }
//!     }
//! });
//!
//! let mut analyzer = Analyzer::new();
//! let report = analyzer.analyze(&img, &config, &mut ChannelSink(tx))?;
//! progress.join().expect("progress thread");
//! println!("{report}");
//! # Ok(())
//! # }
//! ```
//!
//! ### Inspecting an Image
//!
//! ```rust
//! use image::{DynamicImage, Rgb, RgbImage};
//! use stegscope::inspect;
//!
//! let img = DynamicImage::ImageRgb8(RgbImage::from_pixel(16, 16, Rgb([200, 120, 80])));
//! for line in inspect::image_info(&img, None) {
//!     println!("{line}");
//! }
//!
//! let plane = inspect::lsb_image(&img);
//! assert_eq!(plane.dimensions(), (16, 16));
//! ```
//!
//! ## Extraction Model
//!
//! ### Channels and Bit Positions
//! - **Channels**: any non-empty subset of {R, G, B}; multi-channel combinations
//!   concatenate the full sample streams channel by channel (all R samples, then all G,
//!   then all B) before any bit is read
//! - **Bit positions**: LSB (bit 0) or MSB (bit 7)
//! - **Packing**: bits fill bytes most significant bit first; a final partial byte is
//!   zero-padded on the right, so `n` bits always yield `ceil(n / 8)` bytes
//!
//! ### Classification Order
//! Auto mode tries strict UTF-8 first, then GBK, then Latin-1, each gated on the share of
//! printable characters. Only then are PNG, JPEG and ZIP signatures checked, so text that
//! happens to start with a magic number still reads as text. Everything else is reported
//! as an opaque hex dump.
//!
//! ## Report Format
//!
//! Reports are plain text. Each combination gets a `=== Channel R+G - LSB ===` section
//! with the payload size and the rendered body; failed combinations keep their section
//! with an inline error line, and a cancelled run ends with `=== Analysis cancelled ===`
//! after the last complete section. Running the same configuration over the same image
//! twice yields byte-identical reports.

#![allow(clippy::items_after_test_module)]

pub mod analysis;
pub(crate) mod common;
pub mod inspect;

pub use analysis::{AnalysisReport, Analyzer, ReportSection, RunState};
pub use common::config::{
    AnalysisConfig, BitPosition, BitPositionSet, Channel, ChannelSet, OutputFormat,
};
pub use common::entropy::shannon_entropy;
pub use common::error::{StegError, StegResult};
