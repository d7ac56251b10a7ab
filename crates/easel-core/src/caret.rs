//! Multi-line caret editing over a text node's line buffer.
//!
//! Columns are *char* indices, not byte offsets, so multi-byte input behaves.
//! Every operation is total: edits at buffer boundaries (backspace at the
//! very start, left-arrow at column 0 of line 0) are no-ops. The buffer
//! invariant is `lines.len() >= 1`; an "empty" buffer is one empty line.

use crate::model::TextLines;
use serde::{Deserialize, Serialize};

/// A `(line, column)` index into a line buffer. Always satisfies
/// `line < lines.len()` and `col <= lines[line].chars().count()`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Caret {
    pub line: usize,
    pub col: usize,
}

impl Caret {
    pub fn new(line: usize, col: usize) -> Self {
        Self { line, col }
    }

    /// The position just past the last char of the last line.
    pub fn at_end(lines: &[String]) -> Self {
        let line = lines.len().saturating_sub(1);
        let col = lines.last().map_or(0, |l| char_len(l));
        Self { line, col }
    }

    /// Clamp into the buffer after external line edits.
    pub fn clamp(&mut self, lines: &[String]) {
        self.line = self.line.min(lines.len().saturating_sub(1));
        self.col = self.col.min(lines.get(self.line).map_or(0, |l| char_len(l)));
    }
}

fn char_len(s: &str) -> usize {
    s.chars().count()
}

/// Byte offset of char column `col` in `s` (saturating at the end).
fn byte_offset(s: &str, col: usize) -> usize {
    s.char_indices().nth(col).map_or(s.len(), |(i, _)| i)
}

/// Insert a printable char at the caret; the caret advances one column.
pub fn insert_char(lines: &mut TextLines, caret: &mut Caret, ch: char) {
    let line = &mut lines[caret.line];
    line.insert(byte_offset(line, caret.col), ch);
    caret.col += 1;
}

/// Split the current line at the caret: the tail becomes a new line right
/// below, and the caret moves to its column 0.
pub fn insert_line_break(lines: &mut TextLines, caret: &mut Caret) {
    let line = &mut lines[caret.line];
    let tail = line.split_off(byte_offset(line, caret.col));
    lines.insert(caret.line + 1, tail);
    caret.line += 1;
    caret.col = 0;
}

/// Delete backwards one char, or merge with the previous line when at
/// column 0. At the very start of the buffer this is a no-op.
pub fn backspace(lines: &mut TextLines, caret: &mut Caret) {
    if caret.col > 0 {
        let line = &mut lines[caret.line];
        line.remove(byte_offset(line, caret.col - 1));
        caret.col -= 1;
    } else if caret.line > 0 {
        let removed = lines.remove(caret.line);
        caret.line -= 1;
        caret.col = char_len(&lines[caret.line]);
        lines[caret.line].push_str(&removed);
    }
}

/// Insert a possibly multi-line block at the caret. Each embedded `\n`
/// splits the current line exactly as [`insert_line_break`] does.
pub fn insert_text(lines: &mut TextLines, caret: &mut Caret, text: &str) {
    for (i, segment) in text.split('\n').enumerate() {
        if i > 0 {
            insert_line_break(lines, caret);
        }
        let line = &mut lines[caret.line];
        line.insert_str(byte_offset(line, caret.col), segment);
        caret.col += char_len(segment);
    }
}

/// Move left one column, wrapping to the end of the previous line.
pub fn move_left(lines: &[String], caret: &mut Caret) {
    if caret.col > 0 {
        caret.col -= 1;
    } else if caret.line > 0 {
        caret.line -= 1;
        caret.col = char_len(&lines[caret.line]);
    }
}

/// Move right one column, wrapping to column 0 of the next line.
pub fn move_right(lines: &[String], caret: &mut Caret) {
    if caret.col < char_len(&lines[caret.line]) {
        caret.col += 1;
    } else if caret.line + 1 < lines.len() {
        caret.line += 1;
        caret.col = 0;
    }
}

/// Move up one line, keeping the column where possible.
pub fn move_up(lines: &[String], caret: &mut Caret) {
    if caret.line > 0 {
        caret.line -= 1;
        caret.col = caret.col.min(char_len(&lines[caret.line]));
    }
}

/// Move down one line, keeping the column where possible.
pub fn move_down(lines: &[String], caret: &mut Caret) {
    if caret.line + 1 < lines.len() {
        caret.line += 1;
        caret.col = caret.col.min(char_len(&lines[caret.line]));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use smallvec::smallvec;

    fn buffer(lines: &[&str]) -> TextLines {
        lines.iter().map(|s| (*s).to_owned()).collect()
    }

    #[test]
    fn typing_advances_the_caret() {
        let mut lines: TextLines = smallvec![String::new()];
        let mut caret = Caret::default();
        insert_char(&mut lines, &mut caret, 'H');
        insert_char(&mut lines, &mut caret, 'i');
        assert_eq!(lines.as_slice(), &["Hi".to_owned()]);
        assert_eq!(caret, Caret::new(0, 2));
    }

    #[test]
    fn line_break_splits_at_the_caret() {
        let mut lines = buffer(&["Hello world"]);
        let mut caret = Caret::new(0, 5);
        insert_line_break(&mut lines, &mut caret);
        assert_eq!(lines.as_slice(), &["Hello".to_owned(), " world".to_owned()]);
        assert_eq!(caret, Caret::new(1, 0));
    }

    #[test]
    fn split_then_backspace_is_identity() {
        // For arbitrary content and every split column, Enter followed by
        // Backspace restores the original line and caret.
        let original = "grüße!";
        let len = original.chars().count();
        for col in 0..=len {
            let mut lines = buffer(&[original]);
            let mut caret = Caret::new(0, col);
            insert_line_break(&mut lines, &mut caret);
            backspace(&mut lines, &mut caret);
            assert_eq!(lines.as_slice(), &[original.to_owned()], "col {col}");
            assert_eq!(caret, Caret::new(0, col), "col {col}");
        }
    }

    #[test]
    fn backspace_merges_onto_previous_line() {
        let mut lines = buffer(&["Hi", "there"]);
        let mut caret = Caret::new(1, 0);
        backspace(&mut lines, &mut caret);
        assert_eq!(lines.as_slice(), &["Hithere".to_owned()]);
        // caret lands on the merge point
        assert_eq!(caret, Caret::new(0, 2));
    }

    #[test]
    fn backspace_at_buffer_start_is_a_noop() {
        let mut lines = buffer(&["abc"]);
        let mut caret = Caret::new(0, 0);
        backspace(&mut lines, &mut caret);
        assert_eq!(lines.as_slice(), &["abc".to_owned()]);
        assert_eq!(caret, Caret::new(0, 0));
    }

    #[test]
    fn paste_multiline_splits_like_enter() {
        let mut lines = buffer(&["headline"]);
        let mut caret = Caret::new(0, 4);
        insert_text(&mut lines, &mut caret, "X\nYY\nZ");
        assert_eq!(
            lines.as_slice(),
            &["headX".to_owned(), "YY".to_owned(), "Zline".to_owned()]
        );
        assert_eq!(caret, Caret::new(2, 1));
    }

    #[test]
    fn paste_single_line_inserts_in_place() {
        let mut lines = buffer(&["ab"]);
        let mut caret = Caret::new(0, 1);
        insert_text(&mut lines, &mut caret, "--");
        assert_eq!(lines.as_slice(), &["a--b".to_owned()]);
        assert_eq!(caret, Caret::new(0, 3));
    }

    #[test]
    fn horizontal_moves_wrap_across_lines() {
        let lines = buffer(&["ab", "cd"]);

        let mut caret = Caret::new(0, 2);
        move_right(&lines, &mut caret);
        assert_eq!(caret, Caret::new(1, 0));

        move_left(&lines, &mut caret);
        assert_eq!(caret, Caret::new(0, 2));

        // at the extremes, moves are no-ops
        let mut start = Caret::new(0, 0);
        move_left(&lines, &mut start);
        assert_eq!(start, Caret::new(0, 0));

        let mut end = Caret::new(1, 2);
        move_right(&lines, &mut end);
        assert_eq!(end, Caret::new(1, 2));
    }

    #[test]
    fn vertical_moves_clamp_to_line_length() {
        let lines = buffer(&["long line", "ab", "longer line"]);

        let mut caret = Caret::new(0, 7);
        move_down(&lines, &mut caret);
        assert_eq!(caret, Caret::new(1, 2));

        move_down(&lines, &mut caret);
        assert_eq!(caret, Caret::new(2, 2));

        let mut caret = Caret::new(2, 9);
        move_up(&lines, &mut caret);
        assert_eq!(caret, Caret::new(1, 2));
    }

    #[test]
    fn at_end_lands_after_the_last_char() {
        let lines = buffer(&["ab", "cde"]);
        assert_eq!(Caret::at_end(&lines), Caret::new(1, 3));
    }

    #[test]
    fn clamp_recovers_from_external_edits() {
        let lines = buffer(&["ab"]);
        let mut caret = Caret::new(5, 9);
        caret.clamp(&lines);
        assert_eq!(caret, Caret::new(0, 2));
    }
}
