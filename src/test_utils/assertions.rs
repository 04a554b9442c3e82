//! Custom assertion helpers for status output
//!
//! Failures print the whole transcript so a wrong glyph or wording is
//! obvious at a glance.

use std::path::Path;

use crate::status::{Glyph, RecordingSink};

fn assert_line(sink: &RecordingSink, glyph: Glyph, message: &str) {
    assert!(
        sink.contains(glyph, message),
        "Expected line `{} {message}`.\nTranscript:\n{}",
        glyph.symbol(),
        sink.transcript()
    );
}

/// Asserts that a `[✓]` line with exactly this message was emitted
pub fn assert_tick(sink: &RecordingSink, message: &str) {
    assert_line(sink, Glyph::Tick, message);
}

/// Asserts that a `[✗]` line with exactly this message was emitted
pub fn assert_cross(sink: &RecordingSink, message: &str) {
    assert_line(sink, Glyph::Cross, message);
}

/// Asserts that an `[i]` line with exactly this message was emitted
pub fn assert_info(sink: &RecordingSink, message: &str) {
    assert_line(sink, Glyph::Info, message);
}

/// Asserts that no emitted line contains any of the fragments
pub fn assert_never_mentions(sink: &RecordingSink, fragments: &[&str]) {
    for fragment in fragments {
        assert!(
            !sink.mentions(fragment),
            "Expected no line mentioning '{fragment}'.\nTranscript:\n{}",
            sink.transcript()
        );
    }
}

/// Asserts the permission bits of a file
#[cfg(unix)]
pub fn assert_mode<P: AsRef<Path>>(path: P, expected: u32) {
    use std::os::unix::fs::PermissionsExt;

    let path = path.as_ref();
    let mode = std::fs::metadata(path)
        .unwrap_or_else(|e| panic!("Cannot stat {}: {e}", path.display()))
        .permissions()
        .mode();
    assert_eq!(
        mode & 0o777,
        expected,
        "Unexpected mode {:o} on {}",
        mode & 0o777,
        path.display()
    );
}
