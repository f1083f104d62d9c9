//! Integer-sequence compression primitives for inverted indexes.
//!
//! `irpack` encodes monotone document-ID lists (and the small non-negative
//! integers derived from them) into compact byte or word streams that decode
//! back exactly. This is the storage layer of information retrieval:
//!
//! - Posting lists (which documents contain which terms)
//! - IVF cluster membership and neighbor lists
//! - Term frequencies and other per-posting payloads
//!
//! # Codecs
//!
//! - [`vbyte`]: 7 bits per byte with a continuation flag; self-terminating
//! - [`unary`] / [`gamma`]: bit-level codes for very small values
//! - [`bitpacking`]: fixed width per list, no per-value overhead
//! - [`simple16`]: up to 28 values per 32-bit word, 16 slot layouts
//! - [`pfor`]: NewPFD/OptPFD blocks of 128 with patched exceptions
//! - [`elias_fano`]: chunk-local Elias-Fano with a dense bitmap fallback
//!
//! [`gaps`] converts sorted lists to d-gaps and back, and [`bits`] plus
//! [`BitBuffer`] give all bit-level codecs one shared MSB-first bit order.
//!
//! Every operation is synchronous, allocates its own output, and touches no
//! global state; distinct calls are independent, so the crate is thread-safe
//! by construction. Encoding is deterministic: equal input, equal bytes.
//!
//! # Example
//!
//! ```rust
//! use irpack::{gaps, vbyte};
//!
//! let postings = vec![1000, 1001, 1009, 2000, 2009];
//!
//! let dgaps = gaps::to_gaps(&postings).unwrap();
//! let encoded = vbyte::encode_all(&dgaps);
//! let decoded = gaps::from_gaps(&vbyte::decode(&encoded).unwrap());
//!
//! assert_eq!(postings, decoded);
//! assert!(encoded.len() < postings.len() * 8);
//! ```
//!
//! # References
//!
//! - Anh, Moffat (2005). "Inverted Index Compression Using Word-Aligned
//!   Binary Codes"
//! - Zhang, Long, Suel (2008). "Performance of Compressed Inverted List
//!   Caching in Search Engines"
//! - Ottaviano, Venturini (2014). "Partitioned Elias-Fano Indexes"

#![warn(missing_docs)]
#![warn(clippy::all)]

mod error;

pub mod bit_buffer;
pub mod bitpacking;
pub mod bits;
pub mod elias_fano;
pub mod gamma;
pub mod gaps;
pub mod pfor;
pub mod simple16;
pub mod unary;
pub mod vbyte;

pub use bit_buffer::BitBuffer;
pub use error::CodecError;
pub use pfor::Variant as PforVariant;
