//! Fuzz target for hostile record bodies
//!
//! Wraps attacker-shaped CBOR in a valid record header so every input reaches
//! the body decoder.
//!
//! # Strategy
//!
//! - Deeply nested: arrays/maps nested to arbitrary depth
//! - Huge lengths: CBOR claiming massive byte/string/array lengths
//! - Random bytes: arbitrary body under a well-formed header
//! - Duplicate keys: maps repeating the `content` field
//!
//! # Invariants
//!
//! - Huge claimed lengths are rejected, not allocated
//! - NEVER panic on malformed CBOR

#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use parley_proto::{RecordHeader, decode_record};

#[derive(Debug, Clone, Arbitrary)]
enum CborAttack {
    DeeplyNested { depth: u8, map: bool },
    HugeLength { claimed_len_exponent: u8 },
    RandomBytes { bytes: Vec<u8> },
    DuplicateKeys { count: u8 },
}

fuzz_target!(|attack: CborAttack| {
    match attack {
        CborAttack::DeeplyNested { depth, map } => {
            let mut body = Vec::new();
            for _ in 0..(depth % 50) {
                if map {
                    body.extend_from_slice(&[0xA1, 0x61, b'a']);
                } else {
                    body.push(0x81);
                }
            }
            body.push(0x01);
            let _ = decode_record(&framed(&body));
        }

        CborAttack::HugeLength { claimed_len_exponent } => {
            let exponent = u32::from(claimed_len_exponent % 21);
            let claimed = if exponent < 20 { 1u32 << exponent } else { u32::MAX };

            for major in [0x5A, 0x7A, 0x9A] {
                let mut body = vec![major];
                body.extend_from_slice(&claimed.to_be_bytes());
                body.extend(vec![b'x'; (claimed as usize).min(10)]);
                let _ = decode_record(&framed(&body));
            }
        }

        CborAttack::RandomBytes { bytes } => {
            let _ = decode_record(&framed(&bytes));
        }

        CborAttack::DuplicateKeys { count } => {
            let count = (count % 10).max(2);
            let mut body = vec![0xA0 | count];
            for _ in 0..count {
                body.push(0x67);
                body.extend_from_slice(b"content");
                body.extend_from_slice(&[0x61, b'x']);
            }
            let _ = decode_record(&framed(&body));
        }
    }
});

fn framed(body: &[u8]) -> Vec<u8> {
    let size = u32::try_from(body.len()).unwrap_or(u32::MAX);
    let mut record = RecordHeader::new(size).to_bytes().to_vec();
    record.extend_from_slice(body);
    record
}
