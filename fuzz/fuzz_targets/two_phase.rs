//! Protocol fuzzer for arbitrary encoder/value pairs.
//!
//! Tests that probe and write agree on length, that repeated runs produce the
//! same bytes, and that failures leave the output untouched.

use honggfuzz::fuzz;
use pg_binary_encoder::testing::test_two_phase;

fn main() {
    loop {
        fuzz!(|data: &[u8]| {
            test_two_phase(data);
        });
    }
}
