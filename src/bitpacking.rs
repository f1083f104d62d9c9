//! Fixed-width bit packing.
//!
//! Every value in the list is stored with the same width, the number of
//! bits needed for the largest value, MSB-first with no per-value overhead.
//! The width is not part of the stream; the caller either transmits it
//! out-of-band (`encode`/`decode`) or uses the self-describing variants
//! with a one-byte width prefix (`encode_prefixed`/`decode_prefixed`).

use crate::bits;
use crate::error::CodecError;

/// Largest value the packer accepts.
pub const MAX_VALUE: u64 = u32::MAX as u64;

/// The width `encode` will use for `values`: `bit_len` of the maximum.
pub fn width_for(values: &[u64]) -> u32 {
    values.iter().copied().map(bits::bit_len).max().unwrap_or(0)
}

/// Packs `values` at `width_for(values)` bits each.
///
/// Returns the bytes and the final-byte padding. The output occupies
/// exactly `⌈len · width / 8⌉` bytes.
pub fn encode(values: &[u64]) -> Result<(Vec<u8>, u8), CodecError> {
    let width = validate(values)?;
    let mut out = vec![0u8; bits::packed_len(values.len(), width)];
    let mut offset = 0;
    for &value in values {
        offset = bits::write_bits(&mut out, offset, value, width);
    }
    Ok((out, padding_of(offset)))
}

/// Unpacks `count` values of exactly `width` bits each.
pub fn decode(bytes: &[u8], count: usize, width: u32) -> Result<Vec<u64>, CodecError> {
    if width > 32 {
        return Err(CodecError::CorruptStream {
            reason: "bit width exceeds 32",
        });
    }
    if bytes.len() < bits::packed_len(count, width) {
        let available = if width == 0 {
            count
        } else {
            bytes.len() * 8 / width as usize
        };
        return Err(CodecError::CountMismatch {
            requested: count,
            available,
        });
    }
    let mut out = Vec::with_capacity(count);
    let mut offset = 0;
    for _ in 0..count {
        out.push(bits::read_bits(bytes, offset, width));
        offset += width as usize;
    }
    Ok(out)
}

/// Like [`encode`], but writes the width as a leading byte so the stream
/// describes itself.
pub fn encode_prefixed(values: &[u64]) -> Result<(Vec<u8>, u8), CodecError> {
    let width = validate(values)?;
    let mut out = vec![0u8; 1 + bits::packed_len(values.len(), width)];
    out[0] = width as u8;
    let mut offset = 8;
    for &value in values {
        offset = bits::write_bits(&mut out, offset, value, width);
    }
    Ok((out, padding_of(offset)))
}

/// Inverse of [`encode_prefixed`].
pub fn decode_prefixed(bytes: &[u8], count: usize) -> Result<Vec<u64>, CodecError> {
    let (&width, packed) = bytes
        .split_first()
        .ok_or(CodecError::TruncatedStream { what: "width prefix" })?;
    decode(packed, count, u32::from(width))
}

fn validate(values: &[u64]) -> Result<u32, CodecError> {
    for &value in values {
        if value > MAX_VALUE {
            return Err(CodecError::ValueTooLarge {
                codec: "bitpacking",
                value,
            });
        }
    }
    Ok(width_for(values))
}

fn padding_of(total_bits: usize) -> u8 {
    ((8 - total_bits % 8) % 8) as u8
}
