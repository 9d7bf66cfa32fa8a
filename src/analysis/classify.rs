use std::fmt::{Display, Error, Formatter};

use encoding_rs::GBK;

use super::png::PNG_MAGIC;
use crate::common::AnalysisConfig;

// Format classification
//------------------------------------------------------------------------------

#[derive(Debug, PartialEq, Eq, Copy, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TextEncoding {
    Utf8,
    Gbk,
    Latin1,
}

impl Display for TextEncoding {
    fn fmt(&self, f: &mut Formatter) -> Result<(), Error> {
        let name = match *self {
            Self::Utf8 => "UTF-8",
            Self::Gbk => "GBK",
            Self::Latin1 => "Latin-1",
        };
        f.write_str(name)
    }
}

#[derive(Debug, PartialEq, Eq, Copy, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum BinaryKind {
    Png,
    Jpeg,
    Zip,
}

impl Display for BinaryKind {
    fn fmt(&self, f: &mut Formatter) -> Result<(), Error> {
        let name = match *self {
            Self::Png => "PNG",
            Self::Jpeg => "JPEG",
            Self::Zip => "ZIP",
        };
        f.write_str(name)
    }
}

#[derive(Debug, PartialEq, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum FormatClassification {
    Text { encoding: TextEncoding, printable_ratio: f64 },
    KnownBinary(BinaryKind),
    OpaqueBinary,
}

// Auto detection
//------------------------------------------------------------------------------

static JPEG_MAGIC: [u8; 2] = [0xFF, 0xD8];
static ZIP_MAGIC: [u8; 4] = [0x50, 0x4B, 0x03, 0x04];

// First match wins: UTF-8 text, then GBK and Latin-1 with a looser ratio,
// then container signatures. Text is checked before signatures since short
// magic prefixes show up inside text-like noise easily.
pub fn classify(payload: &[u8], config: &AnalysisConfig) -> FormatClassification {
    if let Ok(text) = std::str::from_utf8(payload) {
        let ratio = ascii_printable_ratio(text);
        if ratio > config.utf8_text_threshold {
            return FormatClassification::Text {
                encoding: TextEncoding::Utf8,
                printable_ratio: ratio,
            };
        }
    }

    // BOM bytes are payload data here, never an encoding switch
    let (decoded, had_errors) = GBK.decode_without_bom_handling(payload);
    if !had_errors {
        let ratio = extended_printable_ratio(decoded.chars());
        if ratio > config.fallback_text_threshold {
            return FormatClassification::Text {
                encoding: TextEncoding::Gbk,
                printable_ratio: ratio,
            };
        }
    }

    // Latin-1 maps every byte to U+0000..U+00FF, so only the ratio gates it
    let ratio = extended_printable_ratio(payload.iter().map(|&b| b as char));
    if ratio > config.fallback_text_threshold {
        return FormatClassification::Text {
            encoding: TextEncoding::Latin1,
            printable_ratio: ratio,
        };
    }

    if payload.starts_with(&PNG_MAGIC) {
        return FormatClassification::KnownBinary(BinaryKind::Png);
    }
    if payload.starts_with(&JPEG_MAGIC) {
        return FormatClassification::KnownBinary(BinaryKind::Jpeg);
    }
    if payload.starts_with(&ZIP_MAGIC) {
        return FormatClassification::KnownBinary(BinaryKind::Zip);
    }

    FormatClassification::OpaqueBinary
}

fn ascii_printable_ratio(text: &str) -> f64 {
    let mut total = 0usize;
    let mut printable = 0usize;
    for c in text.chars() {
        total += 1;
        if matches!(c, ' '..='~') {
            printable += 1;
        }
    }
    if total == 0 {
        return 0.0;
    }
    printable as f64 / total as f64
}

fn extended_printable_ratio<I>(chars: I) -> f64
where
    I: IntoIterator<Item = char>,
{
    let mut total = 0usize;
    let mut printable = 0usize;
    for c in chars {
        total += 1;
        if matches!(c, ' '..='~' | '\u{A0}'..='\u{FF}') {
            printable += 1;
        }
    }
    if total == 0 {
        return 0.0;
    }
    printable as f64 / total as f64
}
