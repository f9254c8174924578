//! Text forms - labelled fields with a byte cursor kept on char boundaries

use crate::models::{Credentials, Song};

/// Character shown in place of each secret character
const MASK: char = '•';

#[derive(Clone, Debug, PartialEq)]
pub struct FormField {
    pub label: &'static str,
    pub value: String,
    pub secret: bool,
}

impl FormField {
    fn text(label: &'static str) -> Self {
        FormField {
            label,
            value: String::new(),
            secret: false,
        }
    }

    fn secret(label: &'static str) -> Self {
        FormField {
            label,
            value: String::new(),
            secret: true,
        }
    }

    /// Value as rendered, masked for secret fields
    pub fn display(&self) -> String {
        if self.secret {
            self.value.chars().map(|_| MASK).collect()
        } else {
            self.value.clone()
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Form {
    pub fields: Vec<FormField>,
    pub selected: usize,
    pub cursor: usize,
}

impl Form {
    fn new(fields: Vec<FormField>) -> Self {
        Form {
            fields,
            selected: 0,
            cursor: 0,
        }
    }

    /// Email + password, used by both login and register
    pub fn credentials() -> Self {
        Form::new(vec![FormField::text("Email"), FormField::secret("Password")])
    }

    pub fn song() -> Self {
        Form::new(vec![
            FormField::text("Author"),
            FormField::text("Title"),
            FormField::text("Album"),
            FormField::text("Year"),
        ])
    }

    pub fn value(&self, index: usize) -> &str {
        self.fields.get(index).map(|f| f.value.as_str()).unwrap_or("")
    }

    fn current(&self) -> &str {
        self.value(self.selected)
    }

    fn current_mut(&mut self) -> Option<&mut String> {
        self.fields.get_mut(self.selected).map(|f| &mut f.value)
    }

    pub fn next_field(&mut self) {
        if !self.fields.is_empty() {
            self.selected = (self.selected + 1) % self.fields.len();
            self.cursor = self.current().len();
        }
    }

    pub fn prev_field(&mut self) {
        if !self.fields.is_empty() {
            self.selected = (self.selected + self.fields.len() - 1) % self.fields.len();
            self.cursor = self.current().len();
        }
    }

    /// Put the cursor at the end of the selected field
    pub fn focus_end(&mut self) {
        self.cursor = self.current().len();
    }

    pub fn move_cursor_left(&mut self) {
        if self.cursor > 0 {
            self.cursor = self.current()[..self.cursor]
                .char_indices()
                .last()
                .map(|(i, _)| i)
                .unwrap_or(0);
        }
    }

    pub fn move_cursor_right(&mut self) {
        let input = self.current();
        if self.cursor < input.len() {
            self.cursor = input[self.cursor..]
                .char_indices()
                .nth(1)
                .map(|(i, _)| self.cursor + i)
                .unwrap_or(input.len());
        }
    }

    pub fn enter_char(&mut self, c: char) {
        let cursor = self.cursor;
        if let Some(value) = self.current_mut() {
            let at = cursor.min(value.len());
            value.insert(at, c);
            self.cursor = at + c.len_utf8();
        }
    }

    pub fn delete_char(&mut self) {
        if self.cursor == 0 {
            return;
        }
        let cursor = self.cursor;
        if let Some(value) = self.current_mut() {
            if let Some((start, _)) = value[..cursor].char_indices().last() {
                value.remove(start);
                self.cursor = start;
            }
        }
    }

    pub fn clear(&mut self) {
        for field in &mut self.fields {
            field.value.clear();
        }
        self.selected = 0;
        self.cursor = 0;
    }

    /// Clear only secret fields (password after a failed attempt keeps the email)
    pub fn clear_secrets(&mut self) {
        for field in self.fields.iter_mut().filter(|f| f.secret) {
            field.value.clear();
        }
        self.cursor = self.cursor.min(self.current().len());
    }

    /// Terminal column of the cursor inside the selected field
    pub fn cursor_column(&self) -> usize {
        let input = self.current();
        input[..self.cursor.min(input.len())].chars().count()
    }

    pub fn to_credentials(&self) -> Credentials {
        Credentials::new(self.value(0).trim(), self.value(1))
    }

    pub fn to_song(&self) -> Song {
        Song {
            author: self.value(0).to_string(),
            title: self.value(1).to_string(),
            album: self.value(2).to_string(),
            year: self.value(3).to_string(),
        }
    }
}
