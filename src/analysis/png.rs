use crc32fast::Hasher;
use log::debug;

// PNG introspection
//------------------------------------------------------------------------------

pub(crate) static PNG_MAGIC: [u8; 8] = [0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A];

// Best effort chunk walk over a payload that starts with the PNG magic.
// Stops without error at the first inconsistency, at max_bytes, or at IEND
// (inclusive). Returns no lines when the magic is missing; the caller falls
// back to a plain hex dump.
pub fn describe_png(data: &[u8], max_bytes: usize) -> Vec<String> {
    walk_chunks(data, max_bytes, false)
}

// Full file variant for image inspection: no byte limit, and every chunk gets
// an advisory CRC-32 line. A mismatch never aborts the walk.
pub fn describe_png_checked(data: &[u8]) -> Vec<String> {
    walk_chunks(data, data.len(), true)
}

fn walk_chunks(data: &[u8], max_bytes: usize, verify_crc: bool) -> Vec<String> {
    let mut lines = Vec::new();
    if !data.starts_with(&PNG_MAGIC) {
        return lines;
    }

    lines.push("PNG chunk structure:".to_string());

    let mut pos = PNG_MAGIC.len();
    let limit = max_bytes.saturating_add(PNG_MAGIC.len());

    while pos < data.len() && pos < limit {
        let Some(length) = read_be_u32(data, pos) else { break };
        let Some(tag) = read_tag(data, pos + 4) else {
            debug!("PNG chunk walk stopped at invalid tag, offset {pos}");
            break;
        };
        pos += 8;

        let length = length as usize;
        let Some(chunk_data) = data.get(pos..pos + length) else {
            debug!("PNG chunk walk stopped at truncated chunk, offset {pos}");
            break;
        };
        pos += length;
        let Some(stored_crc) = read_be_u32(data, pos) else { break };
        pos += 4;

        lines.push(format!("Chunk: {}, length: {}", String::from_utf8_lossy(&tag), length));

        if verify_crc {
            let mut hasher = Hasher::new();
            hasher.update(&tag);
            hasher.update(chunk_data);
            let computed = hasher.finalize();
            if computed == stored_crc {
                lines.push(format!("CRC: ok (0x{stored_crc:08x})"));
            } else {
                lines.push(format!(
                    "CRC: mismatch (stored 0x{stored_crc:08x}, computed 0x{computed:08x})"
                ));
            }
        }

        match &tag {
            b"IHDR" => {
                if let Some(line) = describe_ihdr(chunk_data) {
                    lines.push(line);
                }
            }
            b"tEXt" => lines.extend(describe_text(chunk_data)),
            b"IEND" => break,
            _ => (),
        }
    }

    lines
}

fn describe_ihdr(data: &[u8]) -> Option<String> {
    let width = read_be_u32(data, 0)?;
    let height = read_be_u32(data, 4)?;
    let bit_depth = *data.get(8)?;
    let color_type = *data.get(9)?;
    Some(format!("Size: {width}x{height}, bit depth: {bit_depth}, color type: {color_type}"))
}

// Splits at the first NUL into keyword and Latin-1 text
fn describe_text(data: &[u8]) -> Vec<String> {
    let Some(null_pos) = data.iter().position(|&b| b == 0) else { return Vec::new() };
    let keyword = data[..null_pos].iter().map(|&b| b as char).collect::<String>();
    let text = data[null_pos + 1..].iter().map(|&b| b as char).collect::<String>();
    vec![format!("Keyword: {keyword}"), format!("Text: {text}")]
}

fn read_be_u32(data: &[u8], pos: usize) -> Option<u32> {
    let bytes = data.get(pos..pos + 4)?;
    Some(u32::from_be_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]))
}

// Tags must be four ASCII letters; anything else means the stream has
// degenerated into non chunk data
fn read_tag(data: &[u8], pos: usize) -> Option<[u8; 4]> {
    let bytes = data.get(pos..pos + 4)?;
    if !bytes.iter().all(u8::is_ascii_alphabetic) {
        return None;
    }
    <[u8; 4]>::try_from(bytes).ok()
}
