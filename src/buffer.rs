// Text surface state: lines of chars plus a cursor.
// The document text is the lines joined with '\n', so a trailing newline
// in a file shows up as a final empty line and survives a save.

#[derive(Debug, Clone, PartialEq)]
pub struct TextBuffer {
    // Never empty: a blank document is one empty line
    lines: Vec<Vec<char>>,
    cursor_x: usize, // Column within the current line, in chars
    cursor_y: usize, // Index of the current line
}

impl Default for TextBuffer {
    fn default() -> Self {
        TextBuffer {
            lines: vec![Vec::new()],
            cursor_x: 0,
            cursor_y: 0,
        }
    }
}

impl TextBuffer {
    /// Replaces all content and parks the cursor at the end.
    pub fn from_text(text: &str) -> Self {
        // split, unlike lines(), keeps a trailing empty line
        let lines: Vec<Vec<char>> = text.split('\n').map(|line| line.chars().collect()).collect();
        let cursor_y = lines.len() - 1;
        let cursor_x = lines[cursor_y].len();
        TextBuffer {
            lines,
            cursor_x,
            cursor_y,
        }
    }

    pub fn text(&self) -> String {
        self.lines
            .iter()
            .map(|line| line.iter().collect::<String>())
            .collect::<Vec<String>>()
            .join("\n")
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }

    pub fn lines(&self) -> &[Vec<char>] {
        &self.lines
    }

    pub fn cursor(&self) -> (usize, usize) {
        (self.cursor_x, self.cursor_y)
    }

    fn current_line(&self) -> &Vec<char> {
        &self.lines[self.cursor_y]
    }

    pub fn insert_char(&mut self, c: char) {
        self.lines[self.cursor_y].insert(self.cursor_x, c);
        self.cursor_x += 1;
    }

    pub fn insert_str(&mut self, s: &str) {
        for c in s.chars() {
            if c == '\n' {
                self.insert_newline();
            } else {
                self.insert_char(c);
            }
        }
    }

    pub fn insert_newline(&mut self) {
        // drain moves everything right of the cursor onto the new line
        let rest: Vec<char> = self.lines[self.cursor_y].drain(self.cursor_x..).collect();
        self.lines.insert(self.cursor_y + 1, rest);
        self.cursor_y += 1;
        self.cursor_x = 0;
    }

    /// Returns true when something was removed.
    pub fn backspace(&mut self) -> bool {
        if self.cursor_x > 0 {
            self.lines[self.cursor_y].remove(self.cursor_x - 1);
            self.cursor_x -= 1;
            true
        } else if self.cursor_y > 0 {
            // At column 0: join this line onto the previous one
            let line = self.lines.remove(self.cursor_y);
            self.cursor_y -= 1;
            self.cursor_x = self.lines[self.cursor_y].len();
            self.lines[self.cursor_y].extend(line);
            true
        } else {
            false
        }
    }

    pub fn delete(&mut self) -> bool {
        if self.cursor_x < self.current_line().len() {
            self.lines[self.cursor_y].remove(self.cursor_x);
            true
        } else if self.cursor_y < self.lines.len() - 1 {
            let next = self.lines.remove(self.cursor_y + 1);
            self.lines[self.cursor_y].extend(next);
            true
        } else {
            false
        }
    }

    pub fn move_left(&mut self) {
        if self.cursor_x > 0 {
            self.cursor_x -= 1;
        } else if self.cursor_y > 0 {
            self.cursor_y -= 1;
            self.cursor_x = self.current_line().len();
        }
    }

    pub fn move_right(&mut self) {
        if self.cursor_x < self.current_line().len() {
            self.cursor_x += 1;
        } else if self.cursor_y < self.lines.len() - 1 {
            self.cursor_y += 1;
            self.cursor_x = 0;
        }
    }

    // Vertical moves keep the column where the new line allows it
    pub fn move_up(&mut self) {
        if self.cursor_y > 0 {
            self.cursor_y -= 1;
            self.cursor_x = self.cursor_x.min(self.current_line().len());
        }
    }

    pub fn move_down(&mut self) {
        if self.cursor_y < self.lines.len() - 1 {
            self.cursor_y += 1;
            self.cursor_x = self.cursor_x.min(self.current_line().len());
        }
    }

    pub fn move_home(&mut self) {
        self.cursor_x = 0;
    }

    pub fn move_end(&mut self) {
        self.cursor_x = self.current_line().len();
    }

    pub fn page_up(&mut self, rows: usize) {
        self.cursor_y = self.cursor_y.saturating_sub(rows);
        self.cursor_x = self.cursor_x.min(self.current_line().len());
    }

    pub fn page_down(&mut self, rows: usize) {
        self.cursor_y = (self.cursor_y + rows).min(self.lines.len() - 1);
        self.cursor_x = self.cursor_x.min(self.current_line().len());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn text_survives_trailing_newline() {
        let buffer = TextBuffer::from_text("one\ntwo\n");
        assert_eq!(buffer.lines().len(), 3);
        assert_eq!(buffer.text(), "one\ntwo\n");
        assert_eq!(buffer.cursor(), (0, 2));
    }

    #[test]
    fn typing_after_load_appends_at_end() {
        let mut buffer = TextBuffer::from_text("abc");
        buffer.insert_str("def");
        assert_eq!(buffer.text(), "abcdef");
    }

    #[test]
    fn newline_splits_and_backspace_joins() {
        let mut buffer = TextBuffer::from_text("hello");
        buffer.move_left();
        buffer.move_left();
        buffer.insert_newline();
        assert_eq!(buffer.text(), "hel\nlo");
        assert_eq!(buffer.cursor(), (0, 1));
        assert!(buffer.backspace());
        assert_eq!(buffer.text(), "hello");
        assert_eq!(buffer.cursor(), (3, 0));
    }

    #[test]
    fn delete_at_line_end_pulls_next_line() {
        let mut buffer = TextBuffer::from_text("a\nb");
        buffer.move_up();
        buffer.move_end();
        assert!(buffer.delete());
        assert_eq!(buffer.text(), "ab");
        buffer.move_end();
        assert!(!buffer.delete());
    }

    #[test]
    fn backspace_on_empty_is_noop() {
        let mut buffer = TextBuffer::default();
        assert!(!buffer.backspace());
        assert_eq!(buffer.text(), "");
    }

    #[test]
    fn vertical_moves_clamp_column() {
        let mut buffer = TextBuffer::from_text("short\nmuch longer line");
        buffer.move_up();
        assert_eq!(buffer.cursor(), (5, 0));
        buffer.page_down(10);
        assert_eq!(buffer.cursor(), (5, 1));
        buffer.page_up(10);
        assert_eq!(buffer.cursor(), (5, 0));
    }

    #[test]
    fn clear_resets_to_single_empty_line() {
        let mut buffer = TextBuffer::from_text("x\ny");
        buffer.clear();
        assert_eq!(buffer, TextBuffer::default());
    }
}
