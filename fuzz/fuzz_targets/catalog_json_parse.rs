//! Fuzz target for region catalog parsing.
//!
//! This fuzzer feeds arbitrary byte sequences to the catalog parser,
//! checking for panics, buffer overflows, or other undefined behavior.
//!
//! Run with:
//!   cargo +nightly fuzz run catalog_json_parse
//!
//! Or with a corpus:
//!   cargo +nightly fuzz run catalog_json_parse fuzz/corpus/catalog_json_parse/

#![no_main]

use libfuzzer_sys::fuzz_target;
use polysnip::catalog::from_catalog_slice;

fuzz_target!(|data: &[u8]| {
    // Cap input size to avoid OOM on very large inputs.
    if data.len() > 10 * 1024 * 1024 {
        return;
    }

    // Errors are expected; only panics, crashes, or hangs matter.
    let _ = from_catalog_slice(data);
});
