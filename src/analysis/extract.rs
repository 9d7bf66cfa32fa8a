use image::RgbImage;

use super::combos::ChannelCombination;
use crate::common::{BitPosition, StegError, StegResult};

// Bit plane extraction
//------------------------------------------------------------------------------

// Packs the selected bit of every sample into bytes, most significant bit
// first. A trailing partial byte is left shifted so the unused low bits stay
// zero; those bits are lost, not an error. Output length is ceil(samples / 8).
pub fn extract_plane<I>(samples: I, bit: BitPosition) -> Vec<u8>
where
    I: IntoIterator<Item = u8>,
{
    let samples = samples.into_iter();
    let idx = bit.index();
    let mut packed = Vec::with_capacity((samples.size_hint().0 + 7) >> 3);
    let mut acc = 0u8;
    let mut filled = 0u8;

    for s in samples {
        acc = (acc << 1) | ((s >> idx) & 1);
        filled += 1;
        if filled == 8 {
            packed.push(acc);
            acc = 0;
            filled = 0;
        }
    }
    if filled > 0 {
        packed.push(acc << (8 - filled));
    }

    packed
}

// Payload for one combination: the sample streams of its channels chained in
// R, G, B order and packed as a single bit stream, so only the final byte of
// the whole payload can be partial.
pub fn extract_payload(img: &RgbImage, combo: &ChannelCombination) -> StegResult<Vec<u8>> {
    if combo.channels.is_empty() {
        return Err(StegError::EmptyCombination);
    }

    let samples =
        combo.channels.iter().flat_map(|ch| img.pixels().map(move |px| px.0[ch.index()]));
    Ok(extract_plane(samples, combo.bit))
}
