//! Accumulated console output of the supervised process
//!
//! Chunks are appended in producer order. The cleaned copy is recomputed
//! from the raw text on every append so the two never drift apart.

use super::ansi::strip_ansi;

/// Raw and ANSI-cleaned views of everything the child has produced.
#[derive(Debug, Default)]
pub struct ConsoleBuffer {
    raw: String,
    cleaned: String,
}

impl ConsoleBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a chunk of combined stdout/stderr output.
    pub fn append(&mut self, chunk: &str) {
        self.raw.push_str(chunk);
        self.cleaned = strip_ansi(&self.raw);
    }

    /// Drops all accumulated output.
    pub fn clear(&mut self) {
        self.raw.clear();
        self.cleaned.clear();
    }

    pub fn raw(&self) -> &str {
        &self.raw
    }

    pub fn cleaned(&self) -> &str {
        &self.cleaned
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn appends_in_order() {
        let mut buffer = ConsoleBuffer::new();
        buffer.append("A");
        buffer.append("B");
        assert_eq!(buffer.raw(), "AB");
        assert_eq!(buffer.cleaned(), "AB");
    }

    #[test]
    fn cleaned_tracks_raw() {
        let mut buffer = ConsoleBuffer::new();
        buffer.append("\u{1b}[31mred\u{1b}[0m");
        assert_eq!(buffer.raw(), "\u{1b}[31mred\u{1b}[0m");
        assert_eq!(buffer.cleaned(), "red");

        buffer.append(" plain");
        assert_eq!(buffer.cleaned(), "red plain");
    }

    #[test]
    fn clear_empties_both_views() {
        let mut buffer = ConsoleBuffer::new();
        buffer.append("\u{1b}[32msomething\u{1b}[0m");
        buffer.clear();
        assert_eq!(buffer.raw(), "");
        assert_eq!(buffer.cleaned(), "");
    }
}
