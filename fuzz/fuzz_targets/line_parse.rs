//! Fuzz target for the text line format
//!
//! # Invariants
//!
//! - Parsing never panics, whatever the input
//! - A parsed user message renders to a line that parses back to it
//! - `parse_author` agrees with the parsed message on rendered lines

#![no_main]

use chrono::{TimeZone, Utc};
use libfuzzer_sys::fuzz_target;
use parley_proto::{Message, parse_author};

fuzz_target!(|line: &str| {
    let received = Utc.with_ymd_and_hms(2030, 1, 1, 0, 0, 0).unwrap();
    let message = Message::from_line(line, received);

    // Content with a newline cannot survive a single-line rendering.
    if message.content().contains(['\r', '\n']) {
        return;
    }

    let rendered = message.to_line();
    let reparsed = Message::from_line(&rendered, received);
    if message.author().is_some() {
        assert_eq!(reparsed, message);
        assert_eq!(parse_author(&rendered), message.author());
    }
});
