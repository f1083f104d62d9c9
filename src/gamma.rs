//! Elias gamma coding.
//!
//! A value `n >= 1` with `k = ⌊log2 n⌋` is written as the unary code for
//! `k + 1` (that is, `k` ones and a zero) followed by the `k` low bits of
//! `n`; the implicit leading one-bit is dropped. So 1 is `0`, 3 is `101`,
//! 7 is `11011`. Zero has no representation.

use crate::bit_buffer::BitBuffer;
use crate::error::CodecError;
use crate::{bits, unary};

/// Encodes one value, returning the bytes and the final-byte padding.
pub fn encode(n: u64) -> Result<(Vec<u8>, u8), CodecError> {
    let mut buf = BitBuffer::new();
    encode_into(n, &mut buf)?;
    let padding = buf.padding();
    Ok((buf.into_bytes(), padding))
}

/// Encodes one value into an existing bit buffer.
pub fn encode_into(n: u64, out: &mut BitBuffer) -> Result<(), CodecError> {
    if n == 0 {
        return Err(CodecError::ValueTooLarge {
            codec: "gamma",
            value: 0,
        });
    }
    let k = bits::bit_len(n) - 1;
    unary::encode_into(u64::from(k) + 1, out)?;
    // push_bits masks to the low k bits, dropping the implicit leading one.
    out.push_bits(n, k);
    Ok(())
}

/// Encodes a whole list into one bit stream.
pub fn encode_all(values: &[u64]) -> Result<(Vec<u8>, u8), CodecError> {
    let mut buf = BitBuffer::new();
    for &n in values {
        encode_into(n, &mut buf)?;
    }
    let padding = buf.padding();
    Ok((buf.into_bytes(), padding))
}

/// Decodes `count` values from `source`, starting `offset` bits in.
pub fn decode(source: &[u8], count: usize, offset: usize) -> Result<Vec<u64>, CodecError> {
    let total = source.len() * 8;
    let mut out = Vec::with_capacity(count);
    let mut pos = offset;
    for _ in 0..count {
        let mut k = 0u32;
        loop {
            if pos >= total {
                return Err(CodecError::TruncatedStream {
                    what: "gamma length prefix",
                });
            }
            let one = source[pos >> 3] & (0x80 >> (pos & 7)) != 0;
            pos += 1;
            if !one {
                break;
            }
            k += 1;
            if k > 63 {
                return Err(CodecError::CorruptStream {
                    reason: "gamma length prefix exceeds 63 bits",
                });
            }
        }
        if pos + k as usize > total {
            return Err(CodecError::TruncatedStream {
                what: "gamma mantissa",
            });
        }
        let low = bits::read_bits(source, pos, k);
        pos += k as usize;
        out.push((1 << k) | low);
    }
    Ok(out)
}
