//! Chunk-local Elias-Fano coding.
//!
//! Classic Elias-Fano splits a monotone sequence into per-value low bits
//! plus a unary-coded sequence of high buckets. Partitioned variants get
//! better rates by delta-encoding each chunk against a shared upper level,
//! at the price of chunks that cannot be read alone. The variant here keeps
//! every chunk self-contained: the chunk's base is peeled off and stored as
//! a Variable Byte prefix, and the rest becomes a small shifted sequence
//! `F` that is coded either as classic Elias-Fano or, when dense, as a
//! plain bitmap.
//!
//! For a strictly increasing chunk `[c_1, ..., c_n]` with `y = c_1 != 0`,
//! the shift is `z = min(c_2 - y, y) - 1`, the stored base is `x = y - z`,
//! and `F = [z, c_2 - y - 1, ..., c_n - y - 1]`, which is non-decreasing.
//! When `y = 0` the base is 0 and `F` is the chunk itself. Chunks of one
//! value are plain Variable Byte.
//!
//! Layout: `vbyte(x) ‖ vbyte(n) ‖ marker byte ‖ payload`. A marker of 0xFF
//! means the payload is a bitmap of `max(F) + 1` bits; any other marker is
//! the Elias-Fano low-bit width `l`, followed by `n · l` packed low bits
//! and the upper-bit vector with bit `(F_i >> l) + i` set for each `i`.

use crate::bit_buffer::BitBuffer;
use crate::error::CodecError;
use crate::{bits, vbyte};

/// Marker byte announcing a bitmap payload.
const BITMAP_MARKER: u8 = 0xFF;

/// A sequence at least this dense, in values per universe slot, is stored
/// as a bitmap.
const BITMAP_FRACTION: u64 = 4;

/// Encodes a strictly increasing chunk.
///
/// Returns the bytes and the final-byte padding, or
/// [`CodecError::NonMonotonic`] when the input is not strictly increasing.
pub fn encode(values: &[u64]) -> Result<(Vec<u8>, u8), CodecError> {
    for pair in values.windows(2) {
        if pair[1] <= pair[0] {
            return Err(CodecError::NonMonotonic {
                previous: pair[0],
                value: pair[1],
            });
        }
    }
    match values {
        [] => Ok((Vec::new(), 0)),
        [single] => Ok((vbyte::encode(*single), 0)),
        _ => Ok(encode_chunk(values)),
    }
}

/// Decodes a chunk of `count` values.
pub fn decode(bytes: &[u8], count: usize) -> Result<Vec<u64>, CodecError> {
    match count {
        0 => return Ok(Vec::new()),
        1 => {
            let (value, _) = vbyte::decode_number(bytes, 0)?;
            return Ok(vec![value]);
        }
        _ => {}
    }
    let (base, offset) = vbyte::decode_number(bytes, 0)?;
    let (stored, offset) = vbyte::decode_number(bytes, offset)?;
    if stored as usize != count {
        return Err(CodecError::CountMismatch {
            requested: count,
            available: stored as usize,
        });
    }
    let Some(&marker) = bytes.get(offset >> 3) else {
        return Err(CodecError::TruncatedStream {
            what: "payload marker",
        });
    };
    let payload = offset + 8;
    let shifted = if marker == BITMAP_MARKER {
        read_bitmap(bytes, payload, count)?
    } else if marker <= 63 {
        read_elias_fano(bytes, payload, count, u32::from(marker))?
    } else {
        return Err(CodecError::CorruptStream {
            reason: "low-bit width out of range",
        });
    };
    if base == 0 {
        return Ok(shifted);
    }
    let first = base + shifted[0];
    let mut out = Vec::with_capacity(count);
    out.push(first);
    out.extend(shifted[1..].iter().map(|&f| f + first + 1));
    Ok(out)
}

fn encode_chunk(values: &[u64]) -> (Vec<u8>, u8) {
    let n = values.len();
    let first = values[0];
    let (base, shifted) = if first == 0 {
        (0, values.to_vec())
    } else {
        let shift = (values[1] - first).min(first) - 1;
        let mut shifted = Vec::with_capacity(n);
        shifted.push(shift);
        shifted.extend(values[1..].iter().map(|&v| v - first - 1));
        (first - shift, shifted)
    };

    let mut out = vbyte::encode(base);
    vbyte::encode_into(n as u64, &mut out);

    let top = *shifted.last().unwrap();
    // The shift can collide with the second entry; a bitmap has no way to
    // hold the same position twice, so that case stays on the EF path.
    let repeated_low = shifted[0] == shifted[1];
    let padding = if n as u64 > top / BITMAP_FRACTION && !repeated_low {
        out.push(BITMAP_MARKER);
        append_bitmap(&shifted, top, &mut out)
    } else {
        append_elias_fano(&shifted, top, &mut out)
    };
    (out, padding)
}

fn append_bitmap(shifted: &[u64], top: u64, out: &mut Vec<u8>) -> u8 {
    let bitmap_bits = top as usize + 1;
    let start = out.len();
    out.resize(start + bitmap_bits.div_ceil(8), 0);
    for &f in shifted {
        out[start + (f >> 3) as usize] |= 0x80 >> (f & 7);
    }
    ((8 - bitmap_bits % 8) % 8) as u8
}

fn append_elias_fano(shifted: &[u64], top: u64, out: &mut Vec<u8>) -> u8 {
    let low_width = low_bit_width(top, shifted.len() as u64);
    out.push(low_width as u8);

    let mut payload = BitBuffer::new();
    for &f in shifted {
        payload.push_bits(f, low_width);
    }
    // One bit per value at position (f >> l) + i, plus a terminator slot
    // for the last bucket.
    let upper_bits = shifted.len() + (top >> low_width) as usize + 1;
    let mut upper = vec![0u8; upper_bits.div_ceil(8)];
    for (i, &f) in shifted.iter().enumerate() {
        let position = (f >> low_width) as usize + i;
        upper[position >> 3] |= 0x80 >> (position & 7);
    }
    payload.extend_from_bytes(&upper, ((8 - upper_bits % 8) % 8) as u8);

    let padding = payload.padding();
    out.extend_from_slice(payload.as_bytes());
    padding
}

/// `max(0, ⌊log2(top / len)⌋)`: low bits per value that leave roughly one
/// upper bucket per value.
fn low_bit_width(top: u64, len: u64) -> u32 {
    let ratio = top / len;
    if ratio == 0 {
        0
    } else {
        bits::bit_len(ratio) - 1
    }
}

fn read_bitmap(bytes: &[u8], start: usize, count: usize) -> Result<Vec<u64>, CodecError> {
    let total = bytes.len() * 8;
    let mut out = Vec::with_capacity(count);
    let mut pos = start;
    while out.len() < count {
        if pos >= total {
            return Err(CodecError::TruncatedStream { what: "bitmap" });
        }
        if pos & 7 == 0 && bytes[pos >> 3] == 0 {
            pos += 8;
            continue;
        }
        if bytes[pos >> 3] & (0x80 >> (pos & 7)) != 0 {
            out.push((pos - start) as u64);
        }
        pos += 1;
    }
    Ok(out)
}

fn read_elias_fano(
    bytes: &[u8],
    start: usize,
    count: usize,
    low_width: u32,
) -> Result<Vec<u64>, CodecError> {
    let total = bytes.len() * 8;
    let mut low_pos = start;
    let mut high_pos = start + count * low_width as usize;
    if high_pos > total {
        return Err(CodecError::TruncatedStream { what: "low bits" });
    }
    let mut out = Vec::with_capacity(count);
    let mut bucket = 0u64;
    for _ in 0..count {
        let low = bits::read_bits(bytes, low_pos, low_width);
        low_pos += low_width as usize;
        loop {
            if high_pos >= total {
                return Err(CodecError::TruncatedStream { what: "upper bits" });
            }
            let set = bytes[high_pos >> 3] & (0x80 >> (high_pos & 7)) != 0;
            high_pos += 1;
            if set {
                break;
            }
            bucket += 1;
        }
        out.push(bucket << low_width | low);
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_value_is_plain_vbyte() {
        let (bytes, padding) = encode(&[300]).unwrap();
        assert_eq!(bytes, vbyte::encode(300));
        assert_eq!(padding, 0);
        assert_eq!(decode(&bytes, 1).unwrap(), [300]);
    }

    #[test]
    fn test_shift_construction() {
        // y = 5, z = min(10 - 5, 5) - 1 = 4, base = 1,
        // F = [4, 4, 14, 34, 74, 154]: sparse, so the EF path is taken.
        let values = [5u64, 10, 20, 40, 80, 160];
        let (bytes, padding) = encode(&values).unwrap();
        assert_eq!(bytes[0], 1, "vbyte base");
        assert_eq!(bytes[1], 6, "vbyte length");
        // l = ⌊log2(154 / 6)⌋ = 4; 6 low nibbles then 16 upper bits.
        assert_eq!(bytes[2], 4, "low-bit width marker");
        assert_eq!(&bytes[3..], [0x44, 0xE2, 0xAA, 0xE4, 0x82]);
        assert_eq!(padding, 0);
        assert_eq!(decode(&bytes, values.len()).unwrap(), values);
    }

    #[test]
    fn test_dense_chunk_uses_bitmap() {
        let values: Vec<u64> = (0..64).map(|i| i * 2).collect();
        let (bytes, _) = encode(&values).unwrap();
        // base 0, count 64, then the bitmap marker.
        assert_eq!(bytes[0], 0);
        assert_eq!(bytes[1], 64);
        assert_eq!(bytes[2], BITMAP_MARKER);
        assert_eq!(decode(&bytes, values.len()).unwrap(), values);
    }

    #[test]
    fn test_density_switch() {
        // 8 values over a universe of 31: 8 > 31 / 4, bitmap.
        let dense = [3u64, 7, 10, 13, 19, 22, 30, 34];
        let (bytes, _) = encode(&dense).unwrap();
        assert_eq!(bytes[2], BITMAP_MARKER);

        // 8 values over a universe of 320: EF.
        let sparse: Vec<u64> = (1..=8).map(|i| i * 40).collect();
        let (bytes, _) = encode(&sparse).unwrap();
        assert_ne!(bytes[2], BITMAP_MARKER);

        for values in [dense.to_vec(), sparse] {
            let (bytes, _) = encode(&values).unwrap();
            assert_eq!(decode(&bytes, values.len()).unwrap(), values);
        }
    }

    #[test]
    fn test_repeated_shift_value_stays_on_ef_path() {
        // y = 1, z = min(1, 1) - 1 = 0 and c_2 - y - 1 = 0: F starts [0, 0],
        // which a bitmap cannot hold.
        let values = [1u64, 2, 3, 4];
        let (bytes, _) = encode(&values).unwrap();
        assert_ne!(bytes[2], BITMAP_MARKER);
        assert_eq!(decode(&bytes, 4).unwrap(), values);
    }

    #[test]
    fn test_zero_base_chunk() {
        let values = [0u64, 1, 5, 9, 12];
        let (bytes, _) = encode(&values).unwrap();
        assert_eq!(bytes[0], 0);
        assert_eq!(decode(&bytes, values.len()).unwrap(), values);
    }

    #[test]
    fn test_round_trip_assorted() {
        let cases: Vec<Vec<u64>> = vec![
            vec![1, 2],
            vec![5, 6],
            vec![0, 1],
            vec![100, 200],
            (0..100).collect(),
            (0..100).map(|i| i * 1000 + 17).collect(),
            vec![7, 1 << 20, 1 << 40, (1 << 40) + 1],
        ];
        for values in cases {
            let (bytes, _) = encode(&values).unwrap();
            assert_eq!(decode(&bytes, values.len()).unwrap(), values, "{values:?}");
        }
    }

    #[test]
    fn test_empty() {
        let (bytes, padding) = encode(&[]).unwrap();
        assert!(bytes.is_empty());
        assert_eq!(padding, 0);
        assert_eq!(decode(&bytes, 0).unwrap(), Vec::<u64>::new());
    }

    #[test]
    fn test_rejects_non_monotonic() {
        assert!(encode(&[5, 5]).is_err());
        assert!(encode(&[5, 4]).is_err());
    }

    #[test]
    fn test_count_mismatch() {
        let (bytes, _) = encode(&[10, 20, 30]).unwrap();
        assert_eq!(
            decode(&bytes, 5).unwrap_err(),
            CodecError::CountMismatch {
                requested: 5,
                available: 3
            }
        );
    }

    #[test]
    fn test_truncated() {
        let values: Vec<u64> = (1..=8).map(|i| i * 40).collect();
        let (bytes, _) = encode(&values).unwrap();
        // The last byte holds only the upper vector's trailing zeros, so
        // stop one short of it.
        for cut in 1..bytes.len() - 1 {
            assert!(decode(&bytes[..cut], values.len()).is_err(), "cut {cut}");
        }

        let dense = [3u64, 7, 10, 13, 19, 22, 30, 34];
        let (bytes, _) = encode(&dense).unwrap();
        for cut in 1..bytes.len() {
            assert!(decode(&bytes[..cut], dense.len()).is_err(), "bitmap cut {cut}");
        }
    }
}
