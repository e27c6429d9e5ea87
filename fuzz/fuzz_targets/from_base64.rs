//! Base64 fuzzer: arbitrary bytes, base64-encoded, must come back unchanged
//! through both `FromBase64` paths.

use honggfuzz::fuzz;
use pg_binary_encoder::testing::test_from_base64;

fn main() {
    loop {
        fuzz!(|data: &[u8]| {
            test_from_base64(data);
        });
    }
}
