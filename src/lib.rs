#![doc = include_str!("../README.md")]
#![no_std]
#![deny(clippy::mod_module_files)]

extern crate alloc;

/// Emit a `tracing` event when the `tracing` feature is enabled.
macro_rules! trace_event {
    ($level:ident, $($arg:tt)+) => {
        #[cfg(feature = "tracing")]
        tracing::$level!($($arg)+);
    };
}
pub(crate) use trace_event;

pub mod encoder;
pub mod encoders;
pub mod encoding;
pub mod errors;
pub mod protocol;
pub mod registry;
#[cfg(feature = "testing")]
pub mod testing;
pub mod value;

// Re-export main types
pub use encoder::{CoderFlags, Encoder, EncoderKind};
pub use encoders::{Boolean, FromBase64, Int2, Int4, Int8, Passthrough, Timestamp};
pub use protocol::{Encode, Intermediate, Probe};
pub use registry::{BUILTIN_ENCODERS, EncoderSpec, Registry};
pub use value::{HostObject, LocalZone, Time, Value};

// Re-export errors
pub use errors::{ConfigError, EncodeError, Error};
