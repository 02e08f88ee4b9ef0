//! Multi-line text buffer with cursor arithmetic.
//!
//! Columns count `char`s, never bytes, so every cursor position is a valid insertion point
//! regardless of the line's encoding width.

use crate::core::error::SessionError;

/// Number of spaces added or removed by one indent step.
pub const INDENT_WIDTH: usize = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Cursor {
    pub row: usize,
    pub col: usize,
}

impl Cursor {
    pub const fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextBuffer {
    lines: Vec<String>,
    cursor: Cursor,
}

impl Default for TextBuffer {
    fn default() -> Self {
        Self::new()
    }
}

impl TextBuffer {
    pub fn new() -> Self {
        Self {
            lines: vec![String::new()],
            cursor: Cursor::default(),
        }
    }

    /// Builds a buffer from existing lines, clamping the cursor to a valid insertion point.
    pub fn from_lines<I, S>(lines: I, cursor: Cursor) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut lines: Vec<String> = lines.into_iter().map(Into::into).collect();
        if lines.is_empty() {
            lines.push(String::new());
        }
        let mut buffer = Self { lines, cursor };
        buffer.clamp_cursor();
        buffer
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    pub fn cursor(&self) -> Cursor {
        self.cursor
    }

    pub fn text(&self) -> String {
        self.lines.join("\n")
    }

    pub fn is_blank(&self) -> bool {
        self.lines.iter().all(|line| line.trim().is_empty())
    }

    pub fn cursor_on_last_line(&self) -> bool {
        self.cursor.row + 1 == self.lines.len()
    }

    pub fn current_line(&self) -> &str {
        &self.lines[self.cursor.row]
    }

    pub fn insert_char(&mut self, ch: char) -> Result<(), SessionError> {
        if ch.is_control() && ch != '\t' {
            return Err(SessionError::invalid_control_char(ch));
        }

        let Cursor { row, col } = self.cursor;
        let at = byte_index(&self.lines[row], col);
        self.lines[row].insert(at, ch);
        self.cursor.col = col + 1;
        Ok(())
    }

    /// Inserts pasted text: newlines split lines, tabs expand to spaces and any other control
    /// character is dropped. Returns the number of characters kept.
    pub fn insert_text(&mut self, text: &str) -> usize {
        let normalized = text.replace("\r\n", "\n").replace('\r', "\n");
        let mut kept = 0usize;
        for ch in normalized.chars() {
            match ch {
                '\n' => {
                    self.newline();
                    kept += 1;
                }
                '\t' => {
                    for _ in 0..INDENT_WIDTH {
                        let _ = self.insert_char(' ');
                    }
                    kept += 1;
                }
                ch if ch.is_control() => {}
                ch => {
                    if self.insert_char(ch).is_ok() {
                        kept += 1;
                    }
                }
            }
        }
        kept
    }

    pub fn newline(&mut self) {
        let Cursor { row, col } = self.cursor;
        let at = byte_index(&self.lines[row], col);
        let tail = self.lines[row].split_off(at);
        self.lines.insert(row + 1, tail);
        self.cursor = Cursor::new(row + 1, 0);
    }

    pub fn backspace(&mut self) {
        let Cursor { row, col } = self.cursor;
        if col > 0 {
            let line = &mut self.lines[row];
            let start = byte_index(line, col - 1);
            let end = byte_index(line, col);
            line.replace_range(start..end, "");
            self.cursor.col = col - 1;
        } else if row > 0 {
            let current = self.lines.remove(row);
            let previous = &mut self.lines[row - 1];
            let join_col = previous.chars().count();
            previous.push_str(&current);
            self.cursor = Cursor::new(row - 1, join_col);
        }
    }

    pub fn indent(&mut self) {
        let row = self.cursor.row;
        self.lines[row].insert_str(0, &" ".repeat(INDENT_WIDTH));
        self.cursor.col += INDENT_WIDTH;
    }

    /// Removes up to [`INDENT_WIDTH`] leading spaces; returns how many were removed.
    pub fn outdent(&mut self) -> usize {
        let row = self.cursor.row;
        let leading = self.lines[row].chars().take_while(|ch| *ch == ' ').count();
        let removed = leading.min(INDENT_WIDTH);
        if removed > 0 {
            self.lines[row].replace_range(..removed, "");
            self.cursor.col = self.cursor.col.saturating_sub(removed);
        }
        removed
    }

    pub fn move_cursor(&mut self, direction: Direction) {
        let Cursor { row, col } = self.cursor;
        match direction {
            Direction::Left => {
                if col > 0 {
                    self.cursor.col = col - 1;
                } else if row > 0 {
                    self.cursor = Cursor::new(row - 1, self.line_len(row - 1));
                }
            }
            Direction::Right => {
                if col < self.line_len(row) {
                    self.cursor.col = col + 1;
                } else if row + 1 < self.lines.len() {
                    self.cursor = Cursor::new(row + 1, 0);
                }
            }
            Direction::Up => {
                if row > 0 {
                    self.cursor = Cursor::new(row - 1, col.min(self.line_len(row - 1)));
                }
            }
            Direction::Down => {
                if row + 1 < self.lines.len() {
                    self.cursor = Cursor::new(row + 1, col.min(self.line_len(row + 1)));
                }
            }
        }
    }

    /// Returns the trimmed text and resets the buffer, or `None` when there is nothing to send.
    pub fn submit(&mut self) -> Option<String> {
        let text = self.text().trim().to_string();
        if text.is_empty() {
            return None;
        }
        self.clear();
        Some(text)
    }

    pub fn clear(&mut self) {
        self.lines = vec![String::new()];
        self.cursor = Cursor::default();
    }

    fn line_len(&self, row: usize) -> usize {
        self.lines[row].chars().count()
    }

    fn clamp_cursor(&mut self) {
        if self.cursor.row >= self.lines.len() {
            self.cursor.row = self.lines.len() - 1;
        }
        let len = self.line_len(self.cursor.row);
        if self.cursor.col > len {
            self.cursor.col = len;
        }
    }
}

fn byte_index(line: &str, col: usize) -> usize {
    line.char_indices()
        .nth(col)
        .map(|(index, _)| index)
        .unwrap_or(line.len())
}
