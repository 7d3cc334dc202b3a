//! Fuzz target for decode_record
//!
//! Feeds arbitrary bytes to the record decoder to find:
//! - Panics on short or inconsistent headers
//! - Over-allocation from a hostile payload size
//! - Messages that decode but do not encode back to the same message
//!
//! The decoder should NEVER panic. All invalid inputs return an error.

#![no_main]

use libfuzzer_sys::fuzz_target;
use parley_proto::{decode_record, encode_record};

fuzz_target!(|data: &[u8]| {
    let Ok(message) = decode_record(data) else {
        return;
    };

    let encoded = encode_record(&message).expect("decoded message must re-encode");
    let decoded = decode_record(&encoded).expect("re-encoded record must decode");
    assert_eq!(decoded, message);
});
