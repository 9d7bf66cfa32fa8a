use std::fmt::Write;

// Report rendering
//------------------------------------------------------------------------------

// 32 bytes of hex per line
const HEX_CHARS_PER_LINE: usize = 64;
// 4 bytes of binary per line
const BITS_PER_LINE: usize = 32;

// Lowercase hex wrapped at 64 characters. Past max_bytes the dump is cut and
// a marker line states how many bytes were shown.
pub fn render_hex(payload: &[u8], max_bytes: usize) -> Vec<String> {
    let truncated = payload.len() > max_bytes;
    let shown = &payload[..payload.len().min(max_bytes)];

    let mut lines = Vec::new();
    lines.push(if truncated { "Hex data (truncated):" } else { "Hex data:" }.to_string());
    lines.extend(hex_dump_lines(shown));
    if truncated {
        lines.push(format!("... (truncated, showing first {max_bytes} bytes)"));
    }
    lines
}

// Raw hex body with no header and no truncation, for full dumps
pub fn hex_dump_lines(payload: &[u8]) -> Vec<String> {
    let mut hex = String::with_capacity(payload.len() * 2);
    for b in payload {
        let _ = write!(hex, "{b:02x}");
    }
    wrap_ascii(&hex, HEX_CHARS_PER_LINE)
}

// One byte becomes eight '0'/'1' characters; lines wrap at 32 bits and carry
// a running byte offset prefix.
pub fn render_bin(payload: &[u8], max_bytes: usize) -> Vec<String> {
    let truncated = payload.len() > max_bytes;
    let shown = &payload[..payload.len().min(max_bytes)];

    let mut bits = String::with_capacity(shown.len() * 8);
    for b in shown {
        let _ = write!(bits, "{b:08b}");
    }

    let mut lines = Vec::new();
    lines.push(if truncated { "Binary data (truncated):" } else { "Binary data:" }.to_string());
    for (i, line) in wrap_ascii(&bits, BITS_PER_LINE).into_iter().enumerate() {
        lines.push(format!("{:08X}: {line}", i * 4));
    }
    if truncated {
        lines.push(format!("... (truncated, showing first {max_bytes} bytes)"));
    }
    lines
}

// Lossy UTF-8 text, truncated at max_bytes characters rather than bytes.
pub fn render_ascii(payload: &[u8], max_bytes: usize) -> Vec<String> {
    let decoded = String::from_utf8_lossy(payload);
    let truncated = decoded.chars().count() > max_bytes;
    let shown = if truncated {
        decoded.chars().take(max_bytes).collect::<String>()
    } else {
        decoded.into_owned()
    };

    let mut lines = Vec::new();
    lines.push(if truncated { "ASCII data (truncated):" } else { "ASCII data:" }.to_string());
    lines.extend(shown.split('\n').map(str::to_string));
    if truncated {
        lines.push(format!("... (truncated, showing first {max_bytes} chars)"));
    }
    lines
}

// Both hex and binary bodies are pure ASCII, so slicing on byte boundaries
// cannot split a character
fn wrap_ascii(text: &str, width: usize) -> Vec<String> {
    debug_assert!(text.is_ascii(), "Wrapping requires single byte characters");
    text.as_bytes().chunks(width).map(|c| String::from_utf8_lossy(c).into_owned()).collect()
}

#[cfg(test)]
mod render_tests {
    use super::{render_ascii, render_bin, render_hex};

    #[test]
    fn test_hex_basic() {
        let lines = render_hex(&[0xDE, 0xAD, 0xBE, 0xEF], 1024);
        assert_eq!(lines, vec!["Hex data:".to_string(), "deadbeef".to_string()]);
    }

    #[test]
    fn test_hex_wraps_at_64_chars() {
        let lines = render_hex(&[0xAB; 40], 1024);
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[1].len(), 64);
        assert_eq!(lines[2].len(), 16);
    }

    #[test]
    fn test_hex_truncation() {
        let payload = (0..5000).map(|i| (i % 256) as u8).collect::<Vec<_>>();
        let lines = render_hex(&payload, 100);

        assert_eq!(lines[0], "Hex data (truncated):");
        assert_eq!(*lines.last().unwrap(), "... (truncated, showing first 100 bytes)".to_string());

        let body = lines[1..lines.len() - 1].concat();
        assert_eq!(body.len(), 200);
        let mut exp = String::new();
        for b in &payload[..100] {
            exp.push_str(&format!("{b:02x}"));
        }
        assert_eq!(body, exp);
    }

    #[test]
    fn test_hex_exact_boundary_not_truncated() {
        let lines = render_hex(&[0x11; 100], 100);
        assert_eq!(lines[0], "Hex data:");
        assert!(!lines.last().unwrap().contains("truncated"));
    }

    #[test]
    fn test_bin_offsets() {
        let lines = render_bin(&[0b10101010; 12], 1024);
        assert_eq!(lines[0], "Binary data:");
        assert_eq!(lines[1], format!("00000000: {}", "10101010".repeat(4)));
        assert_eq!(lines[2], format!("00000004: {}", "10101010".repeat(4)));
        assert_eq!(lines[3], format!("00000008: {}", "10101010".repeat(4)));
    }

    #[test]
    fn test_bin_truncation() {
        let lines = render_bin(&[0xFF; 64], 8);
        assert_eq!(lines[0], "Binary data (truncated):");
        // 8 bytes shown at 4 bytes per line
        assert_eq!(lines.len(), 4);
        assert_eq!(*lines.last().unwrap(), "... (truncated, showing first 8 bytes)".to_string());
    }

    #[test]
    fn test_ascii_multiline() {
        let lines = render_ascii(b"hello\nworld", 1024);
        assert_eq!(
            lines,
            vec!["ASCII data:".to_string(), "hello".to_string(), "world".to_string()]
        );
    }

    #[test]
    fn test_ascii_replaces_invalid_sequences() {
        let lines = render_ascii(&[b'o', b'k', 0xFF, b'!'], 1024);
        assert_eq!(lines[1], format!("ok{}!", char::REPLACEMENT_CHARACTER));
    }

    #[test]
    fn test_ascii_truncates_at_chars_not_bytes() {
        let payload = "é".repeat(100).into_bytes();
        let lines = render_ascii(&payload, 10);
        assert_eq!(lines[0], "ASCII data (truncated):");
        assert_eq!(lines[1].chars().count(), 10);
        assert_eq!(*lines.last().unwrap(), "... (truncated, showing first 10 chars)".to_string());
    }

    #[test]
    fn test_empty_payload() {
        assert_eq!(render_hex(&[], 16), vec!["Hex data:".to_string()]);
        // An empty string still splits into one empty line
        assert_eq!(render_ascii(&[], 16), vec!["ASCII data:".to_string(), "".to_string()]);
    }
}
