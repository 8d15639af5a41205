//! Single-line text editing shared by the login form and the composer.
//!
//! `TextField` owns a buffer and a cursor byte offset. It renders nothing
//! itself; owners ask for [`TextField::viewport`] to get the slice that fits
//! their width plus the cursor column inside it.

use unicode_width::UnicodeWidthChar;

use crate::tui::event::TuiEvent;

#[derive(Debug, Default, Clone)]
pub struct TextField {
    value: String,
    /// Byte offset into `value`, always on a char boundary.
    cursor: usize,
}

/// Find the byte offset of the previous character boundary before `pos` in `text`.
fn prev_char_boundary(text: &str, pos: usize) -> usize {
    text[..pos]
        .char_indices()
        .next_back()
        .map(|(i, _)| i)
        .unwrap_or(0)
}

/// Find the byte offset of the next character boundary after `pos` in `text`.
fn next_char_boundary(text: &str, pos: usize) -> usize {
    text[pos..]
        .char_indices()
        .nth(1)
        .map(|(i, _)| pos + i)
        .unwrap_or(text.len())
}

impl TextField {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn is_blank(&self) -> bool {
        self.value.trim().is_empty()
    }

    /// Empties the field, returning what it held.
    pub fn take(&mut self) -> String {
        self.cursor = 0;
        std::mem::take(&mut self.value)
    }

    pub fn clear(&mut self) {
        self.take();
    }

    fn insert_str(&mut self, text: &str) {
        // The field is one line; pasted newlines become spaces.
        let flat: String = text
            .chars()
            .map(|c| if c == '\n' || c == '\r' { ' ' } else { c })
            .filter(|c| !c.is_control() || *c == '\t')
            .collect();
        self.value.insert_str(self.cursor, &flat);
        self.cursor += flat.len();
    }

    /// Applies an editing event. Returns `true` if the buffer or cursor changed.
    pub fn handle(&mut self, event: &TuiEvent) -> bool {
        match event {
            TuiEvent::InputChar(c) => {
                let mut buf = [0u8; 4];
                self.insert_str(c.encode_utf8(&mut buf));
                true
            }
            TuiEvent::Paste(text) => {
                self.insert_str(text);
                !text.is_empty()
            }
            TuiEvent::Backspace if self.cursor > 0 => {
                let prev = prev_char_boundary(&self.value, self.cursor);
                self.value.drain(prev..self.cursor);
                self.cursor = prev;
                true
            }
            TuiEvent::Delete if self.cursor < self.value.len() => {
                let next = next_char_boundary(&self.value, self.cursor);
                self.value.drain(self.cursor..next);
                true
            }
            TuiEvent::CursorLeft if self.cursor > 0 => {
                self.cursor = prev_char_boundary(&self.value, self.cursor);
                true
            }
            TuiEvent::CursorRight if self.cursor < self.value.len() => {
                self.cursor = next_char_boundary(&self.value, self.cursor);
                true
            }
            TuiEvent::CursorHome if self.cursor > 0 => {
                self.cursor = 0;
                true
            }
            TuiEvent::CursorEnd if self.cursor < self.value.len() => {
                self.cursor = self.value.len();
                true
            }
            _ => false,
        }
    }

    /// Returns the visible slice for a field `width` columns wide and the
    /// cursor's column within it. Scrolls horizontally so the cursor stays visible.
    pub fn viewport(&self, width: u16) -> (String, u16) {
        self.viewport_of(&self.value, width)
    }

    /// Like [`viewport`](Self::viewport) but with every character replaced by `mask`.
    pub fn masked_viewport(&self, mask: char, width: u16) -> (String, u16) {
        let masked: String = self.value.chars().map(|_| mask).collect();
        let cursor_chars = self.value[..self.cursor].chars().count();
        let cursor = masked
            .char_indices()
            .nth(cursor_chars)
            .map(|(i, _)| i)
            .unwrap_or(masked.len());
        Self { value: masked.clone(), cursor }.viewport_of(&masked, width)
    }

    fn viewport_of(&self, text: &str, width: u16) -> (String, u16) {
        let width = width as usize;
        if width == 0 {
            return (String::new(), 0);
        }

        // Walk back from the cursor until the prefix fills the width (minus one for the cursor cell).
        let before = &text[..self.cursor];
        let mut start = self.cursor;
        let mut used = 0usize;
        for (i, c) in before.char_indices().rev() {
            let w = c.width().unwrap_or(0);
            if used + w >= width {
                break;
            }
            used += w;
            start = i;
        }

        let mut visible = String::new();
        let mut total = 0usize;
        for c in text[start..].chars() {
            let w = c.width().unwrap_or(0);
            if total + w > width {
                break;
            }
            total += w;
            visible.push(c);
        }

        (visible, used as u16)
    }
}
