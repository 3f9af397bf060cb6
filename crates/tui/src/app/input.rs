use unicode_segmentation::UnicodeSegmentation;

/// Editable text with a cursor measured in graphemes.
#[derive(Clone, Debug, Default)]
pub struct InputBuffer {
    pub text: String,
    pub cursor: usize,
}

impl InputBuffer {
    fn parts(&self) -> Vec<&str> {
        self.text.graphemes(true).collect()
    }

    pub fn len(&self) -> usize {
        self.text.graphemes(true).count()
    }

    /// Unicode scalar values, as opposed to bytes or graphemes.
    pub fn char_count(&self) -> usize {
        self.text.chars().count()
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    pub fn insert_text(&mut self, s: &str) {
        let parts = self.parts();
        let idx = self.cursor.min(parts.len());
        let mut new_text = parts[..idx].concat();
        new_text.push_str(s);
        new_text.push_str(&parts[idx..].concat());
        self.text = new_text;
        let added = s.graphemes(true).count();
        self.cursor = (idx + added).min(self.len());
    }

    pub fn move_left(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }

    pub fn move_right(&mut self) {
        if self.cursor < self.len() {
            self.cursor += 1;
        }
    }

    pub fn delete_left_grapheme(&mut self) {
        if self.cursor == 0 {
            return;
        }
        let mut parts = self.parts();
        let idx = self.cursor.min(parts.len());
        parts.remove(idx - 1);
        self.text = parts.concat();
        self.cursor = idx - 1;
    }

    pub fn delete_right_grapheme(&mut self) {
        let mut parts = self.parts();
        let idx = self.cursor.min(parts.len());
        if idx < parts.len() {
            parts.remove(idx);
            self.text = parts.concat();
        }
    }

    fn line_start(parts: &[&str], from: usize) -> usize {
        let mut i = from.min(parts.len());
        while i > 0 && parts[i - 1] != "\n" {
            i -= 1;
        }
        i
    }

    fn line_end(parts: &[&str], from: usize) -> usize {
        let mut i = from.min(parts.len());
        while i < parts.len() && parts[i] != "\n" {
            i += 1;
        }
        i
    }

    pub fn move_cursor_line_start(&mut self) {
        self.cursor = Self::line_start(&self.parts(), self.cursor);
    }

    pub fn move_cursor_line_end(&mut self) {
        self.cursor = Self::line_end(&self.parts(), self.cursor);
    }

    fn word_start(parts: &[&str], from: usize) -> usize {
        let mut i = from.min(parts.len());
        while i > 0 && parts[i - 1].trim().is_empty() {
            i -= 1;
        }
        while i > 0 && !parts[i - 1].trim().is_empty() {
            i -= 1;
        }
        i
    }

    pub fn delete_prev_word(&mut self) {
        let mut parts = self.parts();
        let end = self.cursor.min(parts.len());
        let start = Self::word_start(&parts, end);
        parts.drain(start..end);
        self.text = parts.concat();
        self.cursor = start;
    }

    pub fn kill_to_line_start(&mut self) {
        let mut parts = self.parts();
        let end = self.cursor.min(parts.len());
        let start = Self::line_start(&parts, end);
        parts.drain(start..end);
        self.text = parts.concat();
        self.cursor = start;
    }

    pub fn kill_to_line_end(&mut self) {
        let mut parts = self.parts();
        let start = self.cursor.min(parts.len());
        let end = Self::line_end(&parts, start);
        parts.drain(start..end);
        self.text = parts.concat();
    }

    pub fn move_cursor_word_left(&mut self) {
        self.cursor = Self::word_start(&self.parts(), self.cursor);
    }

    pub fn move_cursor_word_right(&mut self) {
        let parts = self.parts();
        let mut i = self.cursor.min(parts.len());
        while i < parts.len() && parts[i].trim().is_empty() {
            i += 1;
        }
        while i < parts.len() && !parts[i].trim().is_empty() {
            i += 1;
        }
        self.cursor = i;
    }
}
