//! The binary encoders.
//!
//! Each encoder is a small, immutable value implementing [`Encode`](crate::Encode).
//! [`Encoder`](crate::Encoder) gathers them into one closed type.

mod boolean;
mod from_base64;
mod integer;
mod passthrough;
mod timestamp;

pub use boolean::Boolean;
pub use from_base64::FromBase64;
pub use integer::{Int2, Int4, Int8};
pub use passthrough::Passthrough;
pub use timestamp::Timestamp;
