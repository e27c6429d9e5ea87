//! Submodule defining the errors used across the crate.

use alloc::string::String;

/// Errors raised while encoding a single value.
///
/// An error aborts the value being encoded and nothing else: encoders carry no
/// per-call state, so they stay usable after any failure.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EncodeError {
    /// The value is not of the one type the encoder accepts.
    #[error("wrong data for binary {encoder} encoder: expected {expected}, found {found}")]
    TypeMismatch {
        /// Name of the encoder that rejected the value.
        encoder: &'static str,
        /// The accepted type.
        expected: &'static str,
        /// The type that was supplied.
        found: &'static str,
    },

    /// The value cannot be coerced to the representation the encoder needs.
    #[error("can't convert {found} into {target}")]
    ConversionFailure {
        /// The representation that was requested.
        target: &'static str,
        /// The type that was supplied.
        found: &'static str,
    },

    /// The coerced value does not fit in the target width.
    #[error("integer {value} too big to convert to a {width}-byte integer")]
    RangeOverflow {
        /// Textual form of the offending value.
        value: String,
        /// Width of the target integer in bytes.
        width: usize,
    },

    /// Base64 text that cannot be decoded.
    #[error("malformed base64 input at position {position}: {reason}")]
    MalformedInput {
        /// Offset of the offending character in the text.
        position: usize,
        /// What was wrong with it.
        reason: &'static str,
    },

    /// The write buffer is shorter than the length reported by the probe phase.
    #[error("output buffer holds {available} bytes but {needed} are required")]
    BufferTooSmall {
        /// Bytes required.
        needed: usize,
        /// Bytes available.
        available: usize,
    },

    /// An encoder reported writing more bytes than it reserved for the value.
    #[error("{encoder} encoder reported {written} bytes written into {reserved} reserved")]
    LengthMismatch {
        /// Name of the misbehaving encoder.
        encoder: &'static str,
        /// Bytes reserved from the first phase.
        reserved: usize,
        /// Bytes the write phase claimed to have written.
        written: usize,
    },
}

/// Errors raised while constructing encoders.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    /// No encoder is registered under the given name.
    #[error("unknown encoder {0:?}")]
    UnknownEncoder(String),

    /// A composite encoder was built without its element encoder.
    #[error("composite encoder {0} requires an elements encoder")]
    MissingElements(&'static str),

    /// A scalar encoder was given an element encoder.
    #[error("encoder {0} does not take an elements encoder")]
    UnexpectedElements(&'static str),
}

/// Any error produced by this crate.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    /// Encoding a value failed.
    #[error(transparent)]
    Encode(#[from] EncodeError),
    /// Building an encoder failed.
    #[error(transparent)]
    Config(#[from] ConfigError),
}
