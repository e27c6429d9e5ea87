//! Binary encoding utilities for the PostgreSQL parameter format.
//!
//! Integers travel in network byte order; `bytea` payloads may arrive as
//! base64 text that has to be decoded on the way out.

pub(crate) mod base64;
pub(crate) mod byte_order;
pub mod constants;

pub use constants::{BINARY_FORMAT, epoch, flags};
