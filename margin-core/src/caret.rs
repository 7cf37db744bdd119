/// Caret position over the document text, in characters.
///
/// Rows and columns are counted in `char`s so offsets line up with
/// [`TextRange`](crate::model::TextRange) on any UTF-8 content.
#[derive(Debug, Clone)]
pub struct Caret {
    pub row: usize,
    pub col: usize,
    /// Char offset where each line begins
    line_starts: Vec<usize>,
    /// Char length of each line, newline excluded
    line_lens: Vec<usize>,
    lines: Vec<String>,
}

impl Caret {
    pub fn new() -> Self {
        Self {
            row: 0,
            col: 0,
            line_starts: vec![0],
            line_lens: vec![0],
            lines: vec![String::new()],
        }
    }

    /// Load content, reset to the top and rebuild line tables
    pub fn set_content(&mut self, content: &str) {
        self.lines = content.split('\n').map(|l| l.trim_end_matches('\r').to_string()).collect();
        self.line_starts.clear();
        self.line_lens.clear();

        let mut offset = 0;
        for raw in content.split('\n') {
            let len = raw.chars().count();
            self.line_starts.push(offset);
            self.line_lens.push(raw.trim_end_matches('\r').chars().count());
            offset += len + 1;
        }

        self.row = 0;
        self.col = 0;
    }

    pub fn position(&self) -> (usize, usize) {
        (self.row, self.col)
    }

    /// Convert (row, col) to a char offset, clamping to the content
    pub fn to_offset(&self, row: usize, col: usize) -> usize {
        let row = row.min(self.last_row());
        self.line_starts[row] + col.min(self.line_lens[row])
    }

    /// Convert a char offset to (row, col)
    pub fn to_position(&self, offset: usize) -> (usize, usize) {
        let row = match self.line_starts.binary_search(&offset) {
            Ok(row) => row,
            Err(next) => next.saturating_sub(1),
        };
        (row, (offset - self.line_starts[row]).min(self.line_lens[row]))
    }

    pub fn set_offset(&mut self, offset: usize) {
        (self.row, self.col) = self.to_position(offset);
    }

    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    pub fn line(&self, index: usize) -> Option<&str> {
        self.lines.get(index).map(String::as_str)
    }

    /// Char offset of the first character on `row`
    pub fn line_start(&self, row: usize) -> usize {
        self.line_starts.get(row).copied().unwrap_or(0)
    }

    /// Char length of `row`, newline excluded
    pub fn line_len(&self, row: usize) -> usize {
        self.line_lens.get(row).copied().unwrap_or(0)
    }

    fn last_row(&self) -> usize {
        self.line_starts.len() - 1
    }

    fn clamp_col(&mut self) {
        self.col = self.col.min(self.line_lens[self.row]);
    }

    pub fn move_up(&mut self) {
        if self.row > 0 {
            self.row -= 1;
            self.clamp_col();
        }
    }

    pub fn move_down(&mut self) {
        if self.row < self.last_row() {
            self.row += 1;
            self.clamp_col();
        }
    }

    pub fn move_left(&mut self) {
        if self.col > 0 {
            self.col -= 1;
        } else if self.row > 0 {
            self.row -= 1;
            self.col = self.line_lens[self.row];
        }
    }

    pub fn move_right(&mut self) {
        if self.col < self.line_lens[self.row] {
            self.col += 1;
        } else if self.row < self.last_row() {
            self.row += 1;
            self.col = 0;
        }
    }

    pub fn move_to_top(&mut self) {
        self.row = 0;
        self.col = 0;
    }

    pub fn move_to_bottom(&mut self) {
        self.row = self.last_row();
        self.col = 0;
    }

    pub fn move_word_forward(&mut self) {
        let chars: Vec<char> = self.lines[self.row].chars().collect();
        let mut col = self.col;

        while col < chars.len() && !chars[col].is_whitespace() {
            col += 1;
        }
        while col < chars.len() && chars[col].is_whitespace() {
            col += 1;
        }

        if col >= chars.len() && self.row < self.last_row() {
            self.row += 1;
            self.col = 0;
        } else {
            self.col = col;
        }
    }

    pub fn move_word_back(&mut self) {
        if self.col == 0 {
            if self.row > 0 {
                self.row -= 1;
                self.col = self.line_lens[self.row];
            }
            return;
        }

        let chars: Vec<char> = self.lines[self.row].chars().collect();
        let mut col = self.col.min(chars.len());

        while col > 0 && chars[col - 1].is_whitespace() {
            col -= 1;
        }
        while col > 0 && !chars[col - 1].is_whitespace() {
            col -= 1;
        }

        self.col = col;
    }
}

impl Default for Caret {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_caret_movement() {
        let mut caret = Caret::new();
        caret.set_content("Hello\nWorld\nTest");

        assert_eq!(caret.position(), (0, 0));

        caret.move_down();
        caret.move_right();
        caret.move_right();
        assert_eq!(caret.position(), (1, 2));

        caret.move_down();
        caret.move_down();
        assert_eq!(caret.position(), (2, 2));

        caret.move_up();
        assert_eq!(caret.position(), (1, 2));
    }

    #[test]
    fn test_offset_conversion() {
        let mut caret = Caret::new();
        caret.set_content("Hello\nWorld");

        assert_eq!(caret.to_offset(0, 0), 0);
        assert_eq!(caret.to_offset(0, 5), 5);
        assert_eq!(caret.to_offset(1, 0), 6);
        assert_eq!(caret.to_offset(1, 5), 11);
        assert_eq!(caret.to_offset(0, 99), 5);
        assert_eq!(caret.to_offset(9, 0), 6);

        assert_eq!(caret.to_position(0), (0, 0));
        assert_eq!(caret.to_position(6), (1, 0));
        assert_eq!(caret.to_position(8), (1, 2));
    }

    #[test]
    fn test_offsets_count_chars() {
        let mut caret = Caret::new();
        caret.set_content("naïve\ncafé au lait");

        assert_eq!(caret.to_offset(1, 0), 6);
        caret.set_offset(10);
        assert_eq!(caret.position(), (1, 4));
        assert_eq!(caret.to_offset(caret.row, caret.col), 10);
    }

    #[test]
    fn test_word_motion() {
        let mut caret = Caret::new();
        caret.set_content("one two  three\nfour");

        caret.move_word_forward();
        assert_eq!(caret.position(), (0, 4));
        caret.move_word_forward();
        assert_eq!(caret.position(), (0, 9));
        caret.move_word_forward();
        assert_eq!(caret.position(), (1, 0));

        caret.move_word_back();
        assert_eq!(caret.position(), (0, 14));
        caret.move_word_back();
        assert_eq!(caret.position(), (0, 9));
    }
}
