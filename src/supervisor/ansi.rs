//! ANSI escape sequence removal for captured process output
//!
//! frpc colors its log lines; the escape codes are noise everywhere we
//! display or store the text, so the console buffer keeps a cleaned copy.

use std::sync::OnceLock;

use regex_lite::Regex;

/// Matches `ESC [ <params> <final>` where the final byte is one of the
/// color/cursor/erase finals frpc actually emits.
fn escape_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new("\u{1b}\\[[0-9;]*[mGK]").expect("ANSI escape pattern is valid")
    })
}

/// Returns `input` with ANSI escape sequences removed.
///
/// Pure and idempotent: filtering already-filtered text is a no-op.
pub fn strip_ansi(input: &str) -> String {
    escape_pattern().replace_all(input, "").into_owned()
}

/// Longest param list we treat as a possibly-unfinished sequence.
const MAX_ESCAPE_LEN: usize = 32;

/// Length in bytes of an unfinished escape sequence at the end of `input`.
///
/// Streaming callers split chunks here so a sequence cut at a chunk
/// boundary is never half-stripped; everything before the returned tail is
/// safe to filter and emit.
pub fn trailing_escape_len(input: &str) -> usize {
    let bytes = input.as_bytes();
    for i in (0..bytes.len()).rev() {
        if bytes.len() - i > MAX_ESCAPE_LEN {
            break;
        }
        if bytes[i] == 0x1b {
            let tail = &bytes[i..];
            if is_unfinished_escape(tail) {
                return tail.len();
            }
            return 0;
        }
    }
    0
}

/// `tail` starts with ESC; unfinished means no final byte has arrived yet.
fn is_unfinished_escape(tail: &[u8]) -> bool {
    match tail {
        [0x1b] => true,
        [0x1b, b'[', params @ ..] => params
            .iter()
            .all(|b| b.is_ascii_digit() || *b == b';'),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_color_codes() {
        assert_eq!(strip_ansi("\u{1b}[31mHello\u{1b}[0m"), "Hello");
    }

    #[test]
    fn strips_cursor_and_erase_finals() {
        assert_eq!(strip_ansi("\u{1b}[2Kline\u{1b}[1G"), "line");
    }

    #[test]
    fn idempotent() {
        let raw = "\u{1b}[1;32m2024/05/10 12:00:00 [I] login success\u{1b}[0m\n";
        let once = strip_ansi(raw);
        let twice = strip_ansi(&once);
        assert_eq!(once, twice);
        assert_eq!(once, "2024/05/10 12:00:00 [I] login success\n");
    }

    #[test]
    fn plain_text_unchanged() {
        assert_eq!(strip_ansi("no escapes here"), "no escapes here");
    }

    #[test]
    fn unknown_finals_kept() {
        // Only m/G/K finals are stripped; other CSI sequences pass through.
        assert_eq!(strip_ansi("\u{1b}[2Jclear"), "\u{1b}[2Jclear");
    }

    #[test]
    fn detects_unfinished_trailing_escapes() {
        assert_eq!(trailing_escape_len("hello"), 0);
        assert_eq!(trailing_escape_len("hello\u{1b}"), 1);
        assert_eq!(trailing_escape_len("hello\u{1b}["), 2);
        assert_eq!(trailing_escape_len("hello\u{1b}[3"), 3);
        assert_eq!(trailing_escape_len("hello\u{1b}[31;4"), 6);
    }

    #[test]
    fn finished_sequences_are_not_held_back() {
        assert_eq!(trailing_escape_len("hello\u{1b}[31m"), 0);
        assert_eq!(trailing_escape_len("\u{1b}[0mdone"), 0);
        // Non-CSI escapes are not ours to buffer.
        assert_eq!(trailing_escape_len("bell\u{1b}]0;title"), 0);
    }

    #[test]
    fn split_sequence_strips_cleanly_across_chunks() {
        let (first, second) = ("line \u{1b}[3", "1mred\u{1b}[0m\n");
        let held = trailing_escape_len(first);
        let mut pending = String::from(&first[first.len() - held..]);
        let emitted = strip_ansi(&first[..first.len() - held]);
        pending.push_str(second);
        let emitted2 = strip_ansi(&pending);
        assert_eq!(format!("{emitted}{emitted2}"), "line red\n");
    }
}
