//! Wrapping note text into screen rows.
//!
//! Rows keep a mapping back to their source line and char offset so links
//! and mouse clicks can be located in the original text.

use unicode_width::UnicodeWidthChar;

/// One screen row of a wrapped note.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NoteRow {
    /// Source line the row belongs to.
    pub line: usize,
    /// Char offset of the row's first char within its source line.
    pub start_col: usize,
    pub text: String,
}

impl NoteRow {
    /// Source-line char offset under display column `column`.
    pub fn col_at(&self, column: usize) -> Option<usize> {
        let mut x = 0;
        for (idx, ch) in self.text.chars().enumerate() {
            let w = ch.width().unwrap_or(0);
            if column < x + w.max(1) {
                return Some(self.start_col + idx);
            }
            x += w;
        }
        None
    }
}

/// Printable form of a char: ASCII control chars become a space so a stray
/// `\r` or escape never reaches the terminal. Byte length is unchanged.
pub const fn printable(ch: char) -> char {
    if ch.is_ascii_control() { ' ' } else { ch }
}

/// [`printable`] applied to a whole line.
pub fn printable_line(line: &str) -> String {
    line.chars().map(printable).collect()
}

/// Hard-wrap `text` at `width` display columns.
///
/// Empty lines produce an empty row; an empty note produces no rows.
pub fn wrap_note(text: &str, width: u16) -> Vec<NoteRow> {
    let width = usize::from(width.max(1));
    let mut rows = Vec::new();
    for (line_idx, line) in text.lines().enumerate() {
        let mut current = String::new();
        let mut current_width = 0;
        let mut start_col = 0;
        for (col, ch) in line.chars().map(printable).enumerate() {
            let w = ch.width().unwrap_or(0);
            if current_width + w > width && !current.is_empty() {
                rows.push(NoteRow {
                    line: line_idx,
                    start_col,
                    text: std::mem::take(&mut current),
                });
                start_col = col;
                current_width = 0;
            }
            current.push(ch);
            current_width += w;
        }
        rows.push(NoteRow {
            line: line_idx,
            start_col,
            text: current,
        });
    }
    rows
}

/// Byte offset into `line` under display column `column`, clamped to the
/// end of the line.
pub fn byte_col_at(line: &str, column: usize) -> usize {
    let mut x = 0;
    for (byte_idx, ch) in line.char_indices() {
        let w = printable(ch).width().unwrap_or(0);
        if column < x + w.max(1) {
            return byte_idx;
        }
        x += w;
    }
    line.len()
}
