//! Text input forms shared by every screen that collects user input

/// A single-line text input with a byte-offset cursor
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TextField {
    pub label: &'static str,
    pub placeholder: &'static str,
    pub value: String,
    pub cursor: usize,
    /// Render as `*` (passwords)
    pub masked: bool,
}

impl TextField {
    pub fn new(label: &'static str) -> Self {
        TextField {
            label,
            ..Default::default()
        }
    }

    pub fn placeholder(mut self, placeholder: &'static str) -> Self {
        self.placeholder = placeholder;
        self
    }

    pub fn masked(mut self) -> Self {
        self.masked = true;
        self
    }

    pub fn set(&mut self, value: impl Into<String>) {
        self.value = value.into();
        self.cursor = self.value.len();
    }

    pub fn clear(&mut self) {
        self.value.clear();
        self.cursor = 0;
    }

    /// Value as shown on screen
    pub fn display(&self) -> String {
        if self.masked {
            "*".repeat(self.value.chars().count())
        } else {
            self.value.clone()
        }
    }

    /// Cursor column in characters, for terminal placement
    pub fn cursor_column(&self) -> usize {
        self.value[..self.cursor].chars().count()
    }

    pub fn move_cursor_left(&mut self) {
        if self.cursor > 0 {
            self.cursor = self.value[..self.cursor]
                .char_indices()
                .last()
                .map(|(i, _)| i)
                .unwrap_or(0);
        }
    }

    pub fn move_cursor_right(&mut self) {
        if self.cursor < self.value.len() {
            self.cursor = self.value[self.cursor..]
                .char_indices()
                .nth(1)
                .map(|(i, _)| self.cursor + i)
                .unwrap_or(self.value.len());
        }
    }

    pub fn enter_char(&mut self, c: char) {
        if self.cursor <= self.value.len() {
            self.value.insert(self.cursor, c);
            self.cursor += c.len_utf8();
        }
    }

    pub fn delete_char(&mut self) {
        if self.cursor > 0 {
            let prev = self.value[..self.cursor]
                .char_indices()
                .last()
                .map(|(i, _)| i)
                .unwrap_or(0);
            self.value.remove(prev);
            self.cursor = prev;
        }
    }
}

/// An ordered group of fields with one focused
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Form {
    pub fields: Vec<TextField>,
    pub focused: usize,
}

impl Form {
    pub fn new(fields: Vec<TextField>) -> Self {
        Form { fields, focused: 0 }
    }

    pub fn value(&self, index: usize) -> &str {
        self.fields.get(index).map(|f| f.value.as_str()).unwrap_or("")
    }

    pub fn set(&mut self, index: usize, value: impl Into<String>) {
        if let Some(field) = self.fields.get_mut(index) {
            field.set(value);
        }
    }

    pub fn focused_field(&self) -> Option<&TextField> {
        self.fields.get(self.focused)
    }

    fn focused_mut(&mut self) -> Option<&mut TextField> {
        self.fields.get_mut(self.focused)
    }

    pub fn next_field(&mut self) {
        if !self.fields.is_empty() {
            self.focused = (self.focused + 1) % self.fields.len();
        }
    }

    pub fn prev_field(&mut self) {
        if !self.fields.is_empty() {
            self.focused = self
                .focused
                .checked_sub(1)
                .unwrap_or(self.fields.len() - 1);
        }
    }

    pub fn enter_char(&mut self, c: char) {
        if let Some(field) = self.focused_mut() {
            field.enter_char(c);
        }
    }

    pub fn delete_char(&mut self) {
        if let Some(field) = self.focused_mut() {
            field.delete_char();
        }
    }

    pub fn move_cursor_left(&mut self) {
        if let Some(field) = self.focused_mut() {
            field.move_cursor_left();
        }
    }

    pub fn move_cursor_right(&mut self) {
        if let Some(field) = self.focused_mut() {
            field.move_cursor_right();
        }
    }

    pub fn clear(&mut self) {
        for field in &mut self.fields {
            field.clear();
        }
        self.focused = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_editing_multibyte() {
        let mut field = TextField::new("Temp");
        for c in "72°F".chars() {
            field.enter_char(c);
        }
        assert_eq!(field.cursor_column(), 4);

        field.move_cursor_left();
        field.move_cursor_left();
        assert_eq!(field.cursor_column(), 2);
        field.delete_char();
        assert_eq!(field.value, "7°F");

        field.move_cursor_right();
        field.move_cursor_right();
        field.move_cursor_right();
        assert_eq!(field.cursor, field.value.len());
    }

    #[test]
    fn test_masked_display() {
        let mut field = TextField::new("Password").masked();
        field.set("hunter2");
        assert_eq!(field.display(), "*******");
        assert_eq!(field.value, "hunter2");
    }

    #[test]
    fn test_focus_wraps() {
        let mut form = Form::new(vec![TextField::new("A"), TextField::new("B")]);
        form.prev_field();
        assert_eq!(form.focused, 1);
        form.next_field();
        assert_eq!(form.focused, 0);

        form.enter_char('x');
        form.next_field();
        form.enter_char('y');
        assert_eq!(form.value(0), "x");
        assert_eq!(form.value(1), "y");

        form.clear();
        assert_eq!(form.value(1), "");
        assert_eq!(form.focused, 0);
    }
}
