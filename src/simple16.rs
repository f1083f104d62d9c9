//! Simple16 word-aligned packing.
//!
//! Each output word spends its top 4 bits on a selector choosing one of 16
//! fixed slot layouts for the remaining 28 bits. Small values pack densely
//! (selector 0 holds 28 one-bit values) while selector 15 falls back to a
//! single 28-bit slot. The encoder is greedy: for each group it emits the
//! smallest selector whose slots fit.

use crate::error::CodecError;

/// Largest value a Simple16 slot can hold.
pub const MAX_VALUE: u64 = (1 << 28) - 1;

/// Slot layouts per selector as `(count, width)` runs. The widths of each
/// row sum to 28; rows are ordered by non-increasing slot count.
static LAYOUTS: [&[(u8, u8)]; 16] = [
    &[(28, 1)],
    &[(7, 2), (14, 1)],
    &[(7, 1), (7, 2), (7, 1)],
    &[(14, 1), (7, 2)],
    &[(14, 2)],
    &[(1, 4), (8, 3)],
    &[(1, 3), (4, 4), (3, 3)],
    &[(7, 4)],
    &[(4, 5), (2, 4)],
    &[(2, 4), (4, 5)],
    &[(3, 6), (2, 5)],
    &[(2, 5), (3, 6)],
    &[(4, 7)],
    &[(1, 10), (2, 9)],
    &[(2, 14)],
    &[(1, 28)],
];

fn slot_widths(layout: &[(u8, u8)]) -> impl Iterator<Item = u32> + '_ {
    layout
        .iter()
        .flat_map(|&(count, width)| std::iter::repeat(u32::from(width)).take(count as usize))
}

/// Encodes `values` into 32-bit words.
///
/// Unfilled trailing slots of the final word stay zero; the decoder drops
/// them via its `count` argument. Values of 2^28 or more are rejected with
/// [`CodecError::ValueTooLarge`].
pub fn encode(values: &[u64]) -> Result<Vec<u32>, CodecError> {
    for &value in values {
        if value > MAX_VALUE {
            return Err(CodecError::ValueTooLarge {
                codec: "simple16",
                value,
            });
        }
    }
    let mut words = Vec::new();
    let mut start = 0;
    while start < values.len() {
        let (selector, taken) = fit_selector(&values[start..]);
        words.push(pack_word(selector, &values[start..start + taken]));
        start += taken;
    }
    Ok(words)
}

/// Smallest selector whose slots fit the next values, and how many of them
/// it consumes. Values must already be below 2^28.
fn fit_selector(pending: &[u64]) -> (u32, usize) {
    for (selector, layout) in LAYOUTS.iter().enumerate() {
        let slots: usize = layout.iter().map(|&(count, _)| count as usize).sum();
        let take = slots.min(pending.len());
        let fits = pending[..take]
            .iter()
            .zip(slot_widths(layout))
            .all(|(&value, width)| value < 1 << width);
        if fits {
            return (selector as u32, take);
        }
    }
    unreachable!("selector 15 accepts any value below 2^28")
}

fn pack_word(selector: u32, values: &[u64]) -> u32 {
    let mut word = selector << 28;
    let mut shift = 28;
    for (&value, width) in values.iter().zip(slot_widths(LAYOUTS[selector as usize])) {
        shift -= width;
        word |= (value as u32) << shift;
    }
    word
}

/// Decodes exactly `count` values, discarding leftover slots of the last
/// word consumed.
pub fn decode(words: &[u32], count: usize) -> Result<Vec<u64>, CodecError> {
    decode_from(words, count).map(|(values, _)| values)
}

/// Like [`decode`], additionally returning how many words were consumed,
/// so a caller can keep reading a composite stream past the Simple16 part.
pub fn decode_from(words: &[u32], count: usize) -> Result<(Vec<u64>, usize), CodecError> {
    let mut out = Vec::with_capacity(count);
    let mut used = 0;
    while out.len() < count {
        let Some(&word) = words.get(used) else {
            return Err(CodecError::CountMismatch {
                requested: count,
                available: out.len(),
            });
        };
        used += 1;
        let selector = (word >> 28) as usize;
        let mut shift = 28;
        for width in slot_widths(LAYOUTS[selector]) {
            if out.len() == count {
                break;
            }
            shift -= width;
            out.push(u64::from((word >> shift) & ((1 << width) - 1)));
        }
    }
    Ok((out, used))
}

/// Words [`encode`] would emit for `values`, without building them.
/// Values must already be below 2^28.
pub(crate) fn encoded_len(values: &[u64]) -> usize {
    let mut words = 0;
    let mut start = 0;
    while start < values.len() {
        let (_, taken) = fit_selector(&values[start..]);
        words += 1;
        start += taken;
    }
    words
}
