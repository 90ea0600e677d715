//! Shared helpers for the blockdom integration tests, benches and fuzzers.

pub mod fixture;
pub mod scenarios;

use std::fmt::Write;

/// Render a readable report of where two line sequences first diverge.
///
/// Shows two lines of context on each side of the first mismatch. Returns an
/// empty string when both sequences are equal.
pub fn diff_lines(expected: &[String], actual: &[String]) -> String {
    const MISSING: &str = "<missing>";
    let line = |lines: &[String], index: usize| -> String {
        lines
            .get(index)
            .cloned()
            .unwrap_or_else(|| MISSING.to_string())
    };
    let total = expected.len().max(actual.len());
    let Some(first) = (0..total).find(|&i| expected.get(i) != actual.get(i)) else {
        return String::new();
    };

    let mut out = String::new();
    let from = first.saturating_sub(2);
    let to = (first + 3).min(total);
    let _ = writeln!(&mut out, "first mismatch at line {}:", first + 1);
    for index in from..to {
        let marker = if index == first { ">" } else { " " };
        let _ = writeln!(
            &mut out,
            "{marker} {:>4}  expected: {}",
            index + 1,
            line(expected, index)
        );
        let _ = writeln!(
            &mut out,
            "{marker} {:>4}    actual: {}",
            index + 1,
            line(actual, index)
        );
    }
    let _ = writeln!(
        &mut out,
        "expected {} lines, actual {} lines",
        expected.len(),
        actual.len()
    );
    out
}

/// Panic with a [`diff_lines`] report unless both sequences are equal.
#[track_caller]
pub fn assert_lines_eq(expected: &[String], actual: &[String], context: &str) {
    if expected != actual {
        panic!("{context}\n{}", diff_lines(expected, actual));
    }
}

/// Owned lines from string literals.
pub fn lines(raw: &[&str]) -> Vec<String> {
    raw.iter().map(|line| line.to_string()).collect()
}
