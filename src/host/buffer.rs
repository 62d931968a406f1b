use std::collections::HashMap;

use ropey::Rope;

use super::HostValue;

/// Text and caret of one in-memory pane.
///
/// Positions are character offsets, clamped to the document.
#[derive(Debug, Default)]
pub struct PaneBuffer {
    text: Rope,
    caret: usize,
    pub(super) properties: HashMap<String, HostValue>,
    pub(super) save_point: bool,
}

impl PaneBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    #[cfg(test)]
    pub fn from_text(s: &str) -> Self {
        Self {
            text: Rope::from_str(s),
            ..Self::default()
        }
    }

    pub fn len(&self) -> usize {
        self.text.len_chars()
    }

    pub fn line_count(&self) -> usize {
        self.text.len_lines()
    }

    pub fn caret(&self) -> usize {
        self.caret
    }

    pub fn set_caret(&mut self, pos: i64) {
        self.caret = self.clamp(pos);
    }

    pub fn text(&self) -> String {
        self.text.to_string()
    }

    pub fn set_text(&mut self, s: &str) {
        self.text = Rope::from_str(s);
        self.caret = 0;
    }

    pub fn clamp(&self, pos: i64) -> usize {
        pos.clamp(0, self.len() as i64) as usize
    }

    pub fn append(&mut self, s: &str) {
        let end = self.len();
        self.text.insert(end, s);
    }

    /// Insert at `pos`; a negative position inserts at the caret.
    pub fn insert(&mut self, pos: i64, s: &str) {
        let idx = if pos < 0 { self.caret } else { self.clamp(pos) };
        self.text.insert(idx, s);
        if idx <= self.caret {
            self.caret += s.chars().count();
        }
    }

    pub fn remove(&mut self, start: i64, end: i64) {
        let (start, end) = self.ordered(start, end);
        if start == end {
            return;
        }
        self.text.remove(start..end);
        if self.caret > end {
            self.caret -= end - start;
        } else if self.caret > start {
            self.caret = start;
        }
    }

    pub fn range(&self, start: i64, end: i64) -> String {
        let (start, end) = self.ordered(start, end);
        self.text.slice(start..end).to_string()
    }

    pub fn line_from_position(&self, pos: i64) -> usize {
        self.text.char_to_line(self.clamp(pos))
    }

    pub fn position_from_line(&self, line: usize) -> Option<usize> {
        (line < self.line_count()).then(|| self.text.line_to_char(line))
    }

    /// Full line including its line ending.
    pub fn line(&self, line: usize) -> Option<String> {
        (line < self.line_count()).then(|| self.text.line(line).to_string())
    }

    pub fn char_at(&self, pos: i64) -> Option<char> {
        let idx = usize::try_from(pos).ok()?;
        (idx < self.len()).then(|| self.text.char(idx))
    }

    /// Plain-text search over `[start, end)`, `end < 0` meaning the document end.
    pub fn find(
        &self,
        needle: &str,
        start: i64,
        end: i64,
        match_case: bool,
        whole_word: bool,
    ) -> Option<(usize, usize)> {
        let end = if end < 0 { self.len() as i64 } else { end };
        let (start, end) = self.ordered(start, end);
        let pattern: Vec<char> = needle.chars().collect();
        if pattern.is_empty() || end - start < pattern.len() {
            return None;
        }

        let doc: Vec<char> = self.text.chars().collect();
        (start..=end - pattern.len())
            .find(|&at| {
                let candidate = &doc[at..at + pattern.len()];
                let same = candidate.iter().zip(&pattern).all(|(a, b)| {
                    if match_case {
                        a == b
                    } else {
                        a.to_lowercase().eq(b.to_lowercase())
                    }
                });
                same && (!whole_word || is_word_boundary(&doc, at, at + pattern.len()))
            })
            .map(|at| (at, at + pattern.len()))
    }

    fn ordered(&self, a: i64, b: i64) -> (usize, usize) {
        let (a, b) = (self.clamp(a), self.clamp(b));
        if a <= b { (a, b) } else { (b, a) }
    }
}

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

fn is_word_boundary(doc: &[char], start: usize, end: usize) -> bool {
    let before = start == 0 || !is_word_char(doc[start - 1]);
    let after = end >= doc.len() || !is_word_char(doc[end]);
    before && after
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_buffer_is_empty() {
        let buf = PaneBuffer::new();
        assert_eq!(buf.len(), 0);
        assert_eq!(buf.line_count(), 1); // empty rope has 1 line
    }

    #[test]
    fn insert_before_caret_moves_caret() {
        let mut buf = PaneBuffer::from_text("world");
        buf.set_caret(5);
        buf.insert(0, "hello ");
        assert_eq!(buf.text(), "hello world");
        assert_eq!(buf.caret(), 11);
    }

    #[test]
    fn negative_insert_uses_caret() {
        let mut buf = PaneBuffer::from_text("ac");
        buf.set_caret(1);
        buf.insert(-1, "b");
        assert_eq!(buf.text(), "abc");
    }

    #[test]
    fn remove_accepts_reversed_range() {
        let mut buf = PaneBuffer::from_text("abcdef");
        buf.remove(4, 1);
        assert_eq!(buf.text(), "aef");
    }

    #[test]
    fn range_is_clamped() {
        let buf = PaneBuffer::from_text("abc");
        assert_eq!(buf.range(1, 100), "bc");
    }

    #[test]
    fn lines_and_positions() {
        let buf = PaneBuffer::from_text("first\nsecond\nthird");
        assert_eq!(buf.line_from_position(7), 1);
        assert_eq!(buf.position_from_line(2), Some(13));
        assert_eq!(buf.line(1).as_deref(), Some("second\n"));
        assert_eq!(buf.line(3), None);
    }

    #[test]
    fn find_respects_case_and_words() {
        let buf = PaneBuffer::from_text("Foo food foo");
        assert_eq!(buf.find("foo", 0, -1, true, false), Some((4, 7)));
        assert_eq!(buf.find("foo", 0, -1, false, false), Some((0, 3)));
        assert_eq!(buf.find("foo", 1, -1, true, true), Some((9, 12)));
        assert_eq!(buf.find("bar", 0, -1, false, false), None);
    }
}
