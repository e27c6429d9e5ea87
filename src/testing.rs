//! Testing utilities shared by the fuzz harnesses and the integration tests.
//!
//! This module is gated behind the `testing` feature.
//!
//! # Provided helpers
//!
//! - [`TextObject`]: a host object that only renders as text, forcing the
//!   passthrough encoders onto their materialized path
//! - [`check_two_phase`]: assert the protocol invariants for one encoder/value pair
//! - [`assert_base64_paths_agree`]: assert both `FromBase64` paths decode to the original bytes
//! - [`test_two_phase`] and [`test_from_base64`]: the fuzz entry points
//! - [`run_crash_dir_regression`]: replay saved fuzz crash inputs

extern crate std;

use alloc::vec::Vec;
use arbitrary::{Arbitrary, Unstructured};
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use core::time::Duration;
use std::fs;
use std::path::Path;
use std::time::Instant;

use crate::encoder::Encoder;
use crate::protocol::{Encode, Probe};
use crate::value::{HostObject, Value};

/// A host object rendering as fixed text, optionally with an integer form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextObject {
    text: Vec<u8>,
    integer: Option<i128>,
}

impl TextObject {
    /// An object rendering as `text` and without integer form.
    #[must_use]
    pub fn new(text: impl Into<Vec<u8>>) -> Self {
        Self {
            text: text.into(),
            integer: None,
        }
    }

    /// Give the object an integer form.
    #[must_use]
    pub fn with_integer(mut self, integer: i128) -> Self {
        self.integer = Some(integer);
        self
    }
}

impl HostObject for TextObject {
    fn type_name(&self) -> &'static str {
        "text object"
    }

    fn to_text(&self) -> Vec<u8> {
        self.text.clone()
    }

    fn to_integer(&self) -> Option<i128> {
        self.integer
    }
}

/// Assert the two-phase protocol invariants for `encoder` and `value`.
///
/// - Two independent runs produce identical results.
/// - A sized probe reports at least as many bytes as are finally written, and
///   exactly as many for fixed-width encoders.
/// - A materialized probe yields exactly the encoded bytes.
/// - A failing run leaves the output buffer untouched.
///
/// # Panics
///
/// Panics if any invariant does not hold.
pub fn check_two_phase(encoder: &Encoder, value: &Value) {
    let first = encoder.encode(value);
    let second = encoder.encode(value);
    assert_eq!(first, second, "{encoder:?} is not deterministic on {value:?}");

    match first {
        Ok(bytes) => match encoder.probe(value).expect("probe failed after encode succeeded") {
            Probe::Sized { len, .. } => {
                assert!(
                    bytes.len() <= len,
                    "{encoder:?} wrote {} bytes after probing {len}",
                    bytes.len()
                );
                if let Some(width) = encoder.kind().fixed_width() {
                    assert_eq!(bytes.len(), width, "{encoder:?} broke its fixed width");
                }
            }
            Probe::Materialized(materialized) => assert_eq!(materialized, bytes),
        },
        Err(error) => {
            let mut out = Vec::from(*b"prefix");
            assert_eq!(encoder.encode_into(value, &mut out), Err(error));
            assert_eq!(out, b"prefix", "failed encode left partial output");
        }
    }
}

/// Assert that `FromBase64` over `String` decodes the base64 form of `bytes`
/// back to `bytes` on both the sized and the materialized element path.
///
/// # Panics
///
/// Panics if either path disagrees with `bytes`.
pub fn assert_base64_paths_agree(bytes: &[u8]) {
    let encoder = Encoder::from_base64(Encoder::string());
    let text = STANDARD.encode(bytes);

    let sized_value = Value::from(text.as_str());
    assert!(matches!(
        encoder.probe(&sized_value),
        Ok(Probe::Sized { .. })
    ));
    let sized = encoder.encode(&sized_value).expect("sized path failed");

    let materialized_value = Value::object(TextObject::new(text.into_bytes()));
    assert!(matches!(
        encoder.probe(&materialized_value),
        Ok(Probe::Materialized(_))
    ));
    let materialized = encoder
        .encode(&materialized_value)
        .expect("materialized path failed");

    assert_eq!(sized, bytes, "sized path");
    assert_eq!(materialized, bytes, "materialized path");
}

/// Fuzz entry point: an arbitrary encoder and value must honor the protocol.
pub fn test_two_phase(data: &[u8]) {
    let mut u = Unstructured::new(data);
    let Ok((encoder, value)) = <(Encoder, Value)>::arbitrary(&mut u) else {
        return;
    };
    check_two_phase(&encoder, &value);
}

/// Fuzz entry point: arbitrary bytes survive a trip through base64 and `FromBase64`.
pub fn test_from_base64(data: &[u8]) {
    assert_base64_paths_agree(data);
}

/// Replay every crash input stored in `crash_dir` through `test`.
///
/// New `.fuzz` files found in the honggfuzz workspace `fuzz_dir` are copied
/// into `crash_dir` first, so a crash found locally becomes a regression test
/// on the next `cargo test`. Missing directories are treated as empty.
///
/// # Panics
///
/// Panics if `test` panics on an input, if an input takes longer than
/// `time_limit`, or if the directories cannot be read or written.
pub fn run_crash_dir_regression(
    crash_dir: &str,
    fuzz_dir: &str,
    time_limit: Duration,
    test: fn(&[u8]),
) {
    let crash_dir = Path::new(crash_dir);
    if let Ok(entries) = fs::read_dir(fuzz_dir) {
        fs::create_dir_all(crash_dir).expect("failed to create crash directory");
        for entry in entries.flatten() {
            let path = entry.path();
            if path.extension().is_some_and(|ext| ext == "fuzz") {
                let target = crash_dir.join(entry.file_name());
                if !target.exists() {
                    fs::copy(&path, &target).expect("failed to copy crash input");
                }
            }
        }
    }

    let Ok(entries) = fs::read_dir(crash_dir) else {
        return;
    };
    let mut paths: Vec<_> = entries.flatten().map(|entry| entry.path()).collect();
    paths.sort();
    for path in paths {
        let data = fs::read(&path).expect("failed to read crash input");
        let start = Instant::now();
        test(&data);
        let elapsed = start.elapsed();
        assert!(
            elapsed <= time_limit,
            "{} took {elapsed:?}, limit is {time_limit:?}",
            path.display()
        );
    }
}
