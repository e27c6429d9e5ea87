//! Regression tests for the fuzz harnesses.
//!
//! Each harness has a crash-input directory under `tests/crash_inputs/<harness>/`.
//! The directory-based tests copy new `.fuzz` files from the honggfuzz workspace
//! and replay every file through the same helper the harness uses.
//!
//! | Harness       | Input type                        | Crash directory                   |
//! |---------------|-----------------------------------|-----------------------------------|
//! | `two_phase`   | `arbitrary`-encoded encoder/value | `tests/crash_inputs/two_phase/`   |
//! | `from_base64` | `&[u8]`                           | `tests/crash_inputs/from_base64/` |
#![cfg(feature = "testing")]

use pg_binary_encoder::testing::{
    TextObject, assert_base64_paths_agree, check_two_phase, run_crash_dir_regression,
    test_from_base64, test_two_phase,
};
use pg_binary_encoder::{CoderFlags, Encoder, LocalZone, Time, Value};
use std::time::Duration;

/// Honggfuzz kills inputs after 1 s; debug builds get some slack.
const PER_INPUT_TIME_LIMIT: Duration = Duration::from_secs(2);

/// Text whose length is not a multiple of four ends in a partial quantum that
/// is decoded after the loop.
#[test]
fn fuzz_regression_partial_trailing_quantum() {
    for len in 0..8 {
        assert_base64_paths_agree(&vec![0xa5; len]);
    }
}

/// Decoding in place must not overwrite symbols it has not read yet, even when
/// the whole buffer is text.
#[test]
fn fuzz_regression_full_buffer_in_place() {
    let bytes: Vec<u8> = (0..=255).collect();
    assert_base64_paths_agree(&bytes);
}

/// Empty input decodes to empty output on both paths.
#[test]
fn fuzz_regression_empty_input() {
    test_from_base64(&[]);
    test_two_phase(&[]);
}

/// Objects with an integer form go through the fixed-width path, objects
/// without one fail without touching the output.
#[test]
fn fuzz_regression_host_objects() {
    let with_integer = Value::object(TextObject::new("12").with_integer(12));
    let without = Value::object(TextObject::new("12"));
    for encoder in [Encoder::int2(), Encoder::int4(), Encoder::int8()] {
        check_two_phase(&encoder, &with_integer);
        check_two_phase(&encoder, &without);
    }
    check_two_phase(&Encoder::from_base64(Encoder::string()), &without);
}

/// Times at the edge of the 64-bit microsecond range overflow in the probe.
#[test]
fn fuzz_regression_timestamp_edges() {
    let zone = LocalZone::fixed(-86_399).unwrap();
    let encoder = Encoder::timestamp_in(CoderFlags::TIMESTAMP_DB_LOCAL, zone);
    for secs in [i64::MIN, i64::MIN / 1_000_000, 0, i64::MAX / 1_000_000, i64::MAX] {
        let time = Time::from_unix(secs, 999_999_999)
            .unwrap()
            .with_utc_offset(-86_399)
            .unwrap();
        check_two_phase(&encoder, &Value::from(time));
    }
}

#[test]
fn fuzz_regression_two_phase_crash_inputs_dir() {
    run_crash_dir_regression(
        concat!(env!("CARGO_MANIFEST_DIR"), "/tests/crash_inputs/two_phase"),
        concat!(env!("CARGO_MANIFEST_DIR"), "/fuzz/hfuzz_workspace/two_phase"),
        PER_INPUT_TIME_LIMIT,
        test_two_phase,
    );
}

#[test]
fn fuzz_regression_from_base64_crash_inputs_dir() {
    run_crash_dir_regression(
        concat!(env!("CARGO_MANIFEST_DIR"), "/tests/crash_inputs/from_base64"),
        concat!(env!("CARGO_MANIFEST_DIR"), "/fuzz/hfuzz_workspace/from_base64"),
        PER_INPUT_TIME_LIMIT,
        test_from_base64,
    );
}
