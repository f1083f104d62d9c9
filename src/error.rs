//! Error type shared by all codecs.

/// Errors surfaced by encode/decode calls.
///
/// Every failure is reported at the failing call; nothing is retried and no
/// partial output is returned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum CodecError {
    /// The input contains a value outside the codec's representable range.
    #[error("value {value} is not representable in {codec}")]
    ValueTooLarge {
        /// Codec that rejected the value.
        codec: &'static str,
        /// The offending value.
        value: u64,
    },

    /// A codec requiring a strictly increasing input saw an out-of-order value.
    #[error("input is not strictly increasing: {value} follows {previous}")]
    NonMonotonic {
        /// The value preceding the violation.
        previous: u64,
        /// The value that broke monotonicity.
        value: u64,
    },

    /// The input ended before a complete value or block could be decoded.
    #[error("input ended while decoding {what}")]
    TruncatedStream {
        /// What was being decoded when the input ran out.
        what: &'static str,
    },

    /// A selector or header field is outside its valid range.
    #[error("corrupt stream: {reason}")]
    CorruptStream {
        /// Description of the malformed field.
        reason: &'static str,
    },

    /// The caller-supplied count disagrees with what the stream holds.
    #[error("requested {requested} values but the stream holds {available}")]
    CountMismatch {
        /// Values the caller asked for.
        requested: usize,
        /// Values the stream can actually deliver.
        available: usize,
    },
}
