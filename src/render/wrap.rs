//! # Word Wrapping
//!
//! Greedy word wrap against a measured maximum width.
//!
//! ```text
//! "fresh basil\n\nbest before 2024-01-01"     max width = 9 chars
//!
//!   fresh          <- "fresh basil" would overflow
//!   basil
//!                  <- blank paragraph kept
//!   best
//!   before
//!   2024-01-01     <- single word wider than max, kept whole
//! ```
//!
//! Explicit `\n` always starts a new line. Words are never split, so a line
//! is only wider than the maximum when it holds a single oversized word.

use super::font::TextBackend;

/// Wrap `text` into lines no wider than `max_width` as measured by `backend`.
///
/// Words within a paragraph are separated by runs of whitespace and are
/// re-joined with a single space. Leading and trailing whitespace inside a
/// paragraph is dropped, so it never widens or adds a line.
pub fn wrap_text<B: TextBackend + ?Sized>(backend: &B, text: &str, max_width: f64) -> Vec<String> {
    let mut lines = Vec::new();

    for paragraph in text.split('\n') {
        if paragraph.is_empty() {
            lines.push(String::new());
            continue;
        }

        let mut current = String::new();
        for word in paragraph.split_whitespace() {
            let candidate = if current.is_empty() {
                word.to_string()
            } else {
                format!("{} {}", current, word)
            };

            if !current.is_empty() && backend.measure(&candidate).width > max_width {
                lines.push(std::mem::replace(&mut current, word.to_string()));
            } else {
                current = candidate;
            }
        }

        // A whitespace-only paragraph has no words and produces no line.
        if !current.is_empty() {
            lines.push(current);
        }
    }

    lines
}
