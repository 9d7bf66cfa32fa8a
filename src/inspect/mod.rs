use image::{ColorType, DynamicImage, Rgb, RgbImage};
use imageproc::stats::histogram;

use crate::analysis::{describe_png_checked, extract_plane, hex_dump_lines, PNG_MAGIC};
use crate::common::{shannon_entropy, BitPosition, ChannelSet};

// Inspection thresholds
//------------------------------------------------------------------------------

// Advisory bounds on the entropy of packed LSB plane bytes
pub const ENTROPY_HIGH_ANOMALY: f64 = 6.0;
pub const ENTROPY_LOW_ANOMALY: f64 = 2.0;
// A single value covering this share of a channel marks a histogram peak
pub const HISTOGRAM_PEAK_RATIO: f64 = 0.3;

static FILE_SIGNATURES: [(&[u8], &str); 7] = [
    (&PNG_MAGIC, "PNG"),
    (&[0xFF, 0xD8, 0xFF], "JPEG"),
    (b"GIF87a", "GIF87a"),
    (b"GIF89a", "GIF89a"),
    (b"BM", "BMP"),
    (&[0x49, 0x49, 0x2A, 0x00], "TIFF (little endian)"),
    (&[0x4D, 0x4D, 0x00, 0x2A], "TIFF (big endian)"),
];

// Image info report
//------------------------------------------------------------------------------

// One-shot inspection report over a loaded image. Pass the raw encoded file
// bytes as well to get signature and container structure lines; pass None
// when the image came from memory.
pub fn image_info(img: &DynamicImage, raw: Option<&[u8]>) -> Vec<String> {
    let rgb = img.to_rgb8();

    let mut lines = vec![
        "=== Image info ===".to_string(),
        format!("Size: {}x{}", rgb.width(), rgb.height()),
        format!("Color mode: {}", color_mode(img.color())),
    ];
    if let Some(raw) = raw {
        lines.push(format!("File size: {} bytes", raw.len()));
    }

    lines.push(String::new());
    lines.extend(entropy_lines(&rgb));

    lines.push(String::new());
    lines.extend(histogram_lines(&rgb));

    if let Some(raw) = raw {
        lines.push(String::new());
        lines.extend(structure_lines(raw));
    }

    lines
}

fn color_mode(color: ColorType) -> &'static str {
    match color {
        ColorType::L8 => "L",
        ColorType::La8 => "LA",
        ColorType::Rgb8 => "RGB",
        ColorType::Rgba8 => "RGBA",
        ColorType::L16 => "L16",
        ColorType::La16 => "LA16",
        ColorType::Rgb16 => "RGB16",
        ColorType::Rgba16 => "RGBA16",
        ColorType::Rgb32F => "RGB32F",
        ColorType::Rgba32F => "RGBA32F",
        _ => "unknown",
    }
}

// Per channel LSB plane entropy plus the merged R+G+B plane, with advisory
// anomaly lines. Natural sensor noise keeps the packed plane bytes close to
// uniform; a flattened plane or a structured payload pulls the value down.
fn entropy_lines(rgb: &RgbImage) -> Vec<String> {
    let mut planes: Vec<(String, Vec<u8>)> = ChannelSet::all()
        .iter()
        .map(|ch| {
            let plane =
                extract_plane(rgb.pixels().map(move |px| px.0[ch.index()]), BitPosition::Lsb);
            (ch.to_string(), plane)
        })
        .collect();
    let merged = extract_plane(
        ChannelSet::all().iter().flat_map(|ch| rgb.pixels().map(move |px| px.0[ch.index()])),
        BitPosition::Lsb,
    );
    planes.push(("R+G+B".to_string(), merged));

    let mut lines = vec!["LSB plane entropy:".to_string()];
    let mut anomalies = Vec::new();
    for (label, plane) in &planes {
        let entropy = shannon_entropy(plane);
        lines.push(format!("{label}: {entropy:.2} bits/byte"));
        if plane.is_empty() {
            continue;
        }
        if entropy >= ENTROPY_HIGH_ANOMALY {
            anomalies.push(format!(
                "Anomaly: {label} LSB entropy {entropy:.2} exceeds {ENTROPY_HIGH_ANOMALY:.1} \
                 bits/byte, possible embedded data"
            ));
        } else if entropy < ENTROPY_LOW_ANOMALY {
            anomalies.push(format!(
                "Anomaly: {label} LSB entropy {entropy:.2} below {ENTROPY_LOW_ANOMALY:.1} \
                 bits/byte, plane may be flattened"
            ));
        }
    }
    lines.append(&mut anomalies);
    lines
}

fn histogram_lines(rgb: &RgbImage) -> Vec<String> {
    let mut lines = vec!["Histogram peaks:".to_string()];
    let total = u64::from(rgb.width()) * u64::from(rgb.height());
    let hist = histogram(rgb);

    let mut found = false;
    for (ch, counts) in ChannelSet::all().iter().zip(&hist.channels) {
        let (value, count) =
            counts.iter().enumerate().max_by_key(|&(_, &c)| c).map_or((0, 0), |(v, &c)| (v, c));
        if total > 0 && f64::from(count) > total as f64 * HISTOGRAM_PEAK_RATIO {
            let pct = f64::from(count) / total as f64 * 100.0;
            lines.push(format!("Anomaly: channel {ch} value {value} covers {pct:.1}% of pixels"));
            found = true;
        }
    }
    if !found {
        lines.push(format!(
            "No channel value above {:.0}% of pixels",
            HISTOGRAM_PEAK_RATIO * 100.0
        ));
    }
    lines
}

// Raw file facts: boundary bytes, signature table match, and a checked chunk
// walk when the bytes are a PNG stream
fn structure_lines(raw: &[u8]) -> Vec<String> {
    let mut lines = vec!["File structure:".to_string()];

    let head = &raw[..raw.len().min(8)];
    let tail = &raw[raw.len().saturating_sub(8)..];
    lines.push(format!("Header bytes: {}", hex_dump_lines(head).concat()));
    lines.push(format!("Footer bytes: {}", hex_dump_lines(tail).concat()));

    match FILE_SIGNATURES.iter().find(|(magic, _)| raw.starts_with(magic)) {
        Some((_, name)) => lines.push(format!("Detected format: {name}")),
        None => lines.push("Unknown file signature".to_string()),
    }

    if raw.starts_with(&PNG_MAGIC) {
        lines.push(String::new());
        lines.extend(describe_png_checked(raw));
    }

    lines
}

// Bit plane viewer
//------------------------------------------------------------------------------

// Renders one bit plane as a visual image: each channel sample becomes its
// selected bit scaled to 0 or 255. Bit index 0 is the LSB, 7 the MSB.
pub fn bit_plane_image(img: &DynamicImage, bit_index: u8) -> RgbImage {
    debug_assert!(bit_index < 8, "Bit index out of range: {bit_index}");
    let rgb = img.to_rgb8();
    RgbImage::from_fn(rgb.width(), rgb.height(), |x, y| {
        let px = rgb.get_pixel(x, y);
        Rgb(px.0.map(|s| ((s >> bit_index) & 1) * 255))
    })
}

pub fn lsb_image(img: &DynamicImage) -> RgbImage {
    bit_plane_image(img, 0)
}
