use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

/// Editable text with a cursor kept on a char boundary.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TextInput {
    value: String,
    cursor: usize,
    multiline: bool,
}

impl TextInput {
    pub fn single_line(value: impl Into<String>) -> Self {
        let value = value.into();
        TextInput {
            cursor: value.len(),
            value,
            multiline: false,
        }
    }

    pub fn multi_line(value: impl Into<String>) -> Self {
        TextInput {
            multiline: true,
            ..Self::single_line(value)
        }
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn set(&mut self, value: impl Into<String>) {
        self.value = value.into();
        self.cursor = self.value.len();
    }

    pub fn clear(&mut self) {
        self.set(String::new());
    }

    /// Applies an editing key. Returns false when the key is not an edit, so
    /// the caller can treat it as navigation.
    pub fn handle_key(&mut self, key: KeyEvent) -> bool {
        if key.modifiers.intersects(KeyModifiers::CONTROL | KeyModifiers::ALT) {
            return false;
        }
        match key.code {
            KeyCode::Char(c) => self.insert(c),
            KeyCode::Enter if self.multiline => self.insert('\n'),
            KeyCode::Backspace => {
                if let Some(prev) = self.prev_boundary() {
                    self.value.replace_range(prev..self.cursor, "");
                    self.cursor = prev;
                }
            }
            KeyCode::Delete => {
                if let Some(next) = self.next_boundary() {
                    self.value.replace_range(self.cursor..next, "");
                }
            }
            KeyCode::Left => self.cursor = self.prev_boundary().unwrap_or(self.cursor),
            KeyCode::Right => self.cursor = self.next_boundary().unwrap_or(self.cursor),
            KeyCode::Home => self.cursor = self.line_start(),
            KeyCode::End => self.cursor = self.line_end(),
            KeyCode::Up if self.multiline => self.move_vertically(-1),
            KeyCode::Down if self.multiline => self.move_vertically(1),
            _ => return false,
        }
        true
    }

    /// The text with a `|` at the cursor.
    pub fn with_cursor(&self) -> String {
        let mut shown = self.value.clone();
        shown.insert(self.cursor, '|');
        shown
    }

    /// Single-line rendering that keeps the cursor visible inside `width`
    /// terminal columns by dropping characters from the left.
    pub fn visible_tail(&self, width: usize) -> String {
        let shown = self.with_cursor();
        let upto = &shown[..self.cursor + 1];
        if upto.width() <= width {
            return shown;
        }
        let mut used = 0;
        let mut start = upto.len();
        for (i, c) in upto.char_indices().rev() {
            used += c.width().unwrap_or(0);
            if used > width {
                break;
            }
            start = i;
        }
        shown[start..].to_string()
    }

    fn insert(&mut self, c: char) {
        self.value.insert(self.cursor, c);
        self.cursor += c.len_utf8();
    }

    fn prev_boundary(&self) -> Option<usize> {
        self.value[..self.cursor].char_indices().next_back().map(|(i, _)| i)
    }

    fn next_boundary(&self) -> Option<usize> {
        self.value[self.cursor..]
            .chars()
            .next()
            .map(|c| self.cursor + c.len_utf8())
    }

    fn line_start(&self) -> usize {
        self.value[..self.cursor].rfind('\n').map(|i| i + 1).unwrap_or(0)
    }

    fn line_end(&self) -> usize {
        self.value[self.cursor..]
            .find('\n')
            .map(|i| self.cursor + i)
            .unwrap_or(self.value.len())
    }

    fn move_vertically(&mut self, direction: i32) {
        let start = self.line_start();
        let column = self.value[start..self.cursor].chars().count();
        let target_start = if direction < 0 {
            if start == 0 {
                return;
            }
            self.value[..start - 1].rfind('\n').map(|i| i + 1).unwrap_or(0)
        } else {
            match self.value[self.cursor..].find('\n') {
                Some(i) => self.cursor + i + 1,
                None => return,
            }
        };
        let line = &self.value[target_start..];
        let line = &line[..line.find('\n').unwrap_or(line.len())];
        let offset = line
            .char_indices()
            .nth(column)
            .map(|(i, _)| i)
            .unwrap_or(line.len());
        self.cursor = target_start + offset;
    }
}
