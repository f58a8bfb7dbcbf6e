//! Bordered text input used for the keyword field and the query draft.
//!
//! The text itself lives in [`msq_core::FormState`]; this widget only owns the
//! cursor. [`TextInputState::handle`] takes the current text and returns the
//! edited text when a key changed it, so the caller can feed the new value
//! back through the reducer.
//!
//! # Editing
//!
//! - `Char(c)` inserts at the cursor.
//! - `Backspace` / `Delete` remove the character before / under the cursor.
//! - `Nav(Left)` / `Nav(Right)` move the cursor one character.
//! - `Home` / `End` jump to the start / end.
//!
//! Long text is hard-wrapped at the inner width and scrolled so the cursor
//! row stays visible.

use crate::event::{AppEvent, Direction};
use crate::theme::Theme;
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, Paragraph, Widget},
};

// ---------------------------------------------------------------------------
// State
// ---------------------------------------------------------------------------

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct TextInputState {
    /// Byte offset of the cursor within the text.
    pub cursor: usize,
}

impl TextInputState {
    /// Apply an editing event to `text`.
    ///
    /// Returns `Some(new_text)` when the text changed. Cursor-only movements
    /// return `None`.
    pub fn handle(&mut self, text: &str, event: &AppEvent) -> Option<String> {
        self.clamp(text);
        match event {
            AppEvent::Char(c) => {
                let mut next = text.to_string();
                next.insert(self.cursor, *c);
                self.cursor += c.len_utf8();
                tracing::debug!(cursor = self.cursor, "input: char inserted");
                Some(next)
            }
            AppEvent::Backspace => {
                if self.cursor == 0 {
                    return None;
                }
                let prev = prev_boundary(text, self.cursor);
                let mut next = text.to_string();
                next.remove(prev);
                self.cursor = prev;
                Some(next)
            }
            AppEvent::Delete => {
                if self.cursor >= text.len() {
                    return None;
                }
                let mut next = text.to_string();
                next.remove(self.cursor);
                Some(next)
            }
            AppEvent::Nav(Direction::Left) => {
                self.cursor = prev_boundary(text, self.cursor);
                None
            }
            AppEvent::Nav(Direction::Right) => {
                self.cursor = next_boundary(text, self.cursor);
                None
            }
            AppEvent::Home => {
                self.cursor = 0;
                None
            }
            AppEvent::End => {
                self.cursor = text.len();
                None
            }
            _ => None,
        }
    }

    /// Move the cursor to the end of `text`.
    pub fn move_to_end(&mut self, text: &str) {
        self.cursor = text.len();
    }

    /// Pull the cursor back inside `text` if the text shrank underneath it.
    pub fn clamp(&mut self, text: &str) {
        if self.cursor > text.len() {
            self.cursor = text.len();
        }
        while !text.is_char_boundary(self.cursor) {
            self.cursor -= 1;
        }
    }
}

fn prev_boundary(text: &str, cursor: usize) -> usize {
    text[..cursor]
        .char_indices()
        .last()
        .map(|(i, _)| i)
        .unwrap_or(0)
}

fn next_boundary(text: &str, cursor: usize) -> usize {
    text[cursor..]
        .char_indices()
        .nth(1)
        .map(|(i, _)| cursor + i)
        .unwrap_or(text.len())
}

/// Split `text` into rows of at most `width` characters.
fn hard_wrap(text: &str, width: usize) -> Vec<String> {
    if width == 0 {
        return vec![String::new()];
    }
    let chars: Vec<char> = text.chars().collect();
    if chars.is_empty() {
        return vec![String::new()];
    }
    chars.chunks(width).map(|c| c.iter().collect()).collect()
}

// ---------------------------------------------------------------------------
// Widget
// ---------------------------------------------------------------------------

pub struct TextInput<'a> {
    title: &'a str,
    text: &'a str,
    placeholder: &'a str,
    state: &'a TextInputState,
    focused: bool,
    theme: &'a Theme,
}

impl<'a> TextInput<'a> {
    pub fn new(
        title: &'a str,
        text: &'a str,
        state: &'a TextInputState,
        focused: bool,
        theme: &'a Theme,
    ) -> Self {
        Self { title, text, placeholder: "", state, focused, theme }
    }

    /// Dim hint shown while the text is empty.
    pub fn placeholder(mut self, placeholder: &'a str) -> Self {
        self.placeholder = placeholder;
        self
    }

    /// (row, column) of the cursor inside the wrapped text.
    fn cursor_cell(&self, width: u16) -> (u16, u16) {
        let col = self.text[..self.state.cursor.min(self.text.len())].chars().count();
        match width as usize {
            0 => (0, 0),
            w => ((col / w) as u16, (col % w) as u16),
        }
    }

    /// First wrapped row shown so the cursor row stays inside `height` rows.
    fn scroll(&self, inner: Rect) -> u16 {
        let (row, _) = self.cursor_cell(inner.width);
        row.saturating_sub(inner.height.saturating_sub(1))
    }

    /// Absolute terminal position of the text cursor within this widget's
    /// rendered area. Pass to `frame.set_cursor_position()` after rendering.
    pub fn cursor_position(&self, area: Rect) -> (u16, u16) {
        let inner = Block::bordered().inner(area);
        let (row, col) = self.cursor_cell(inner.width);
        let row = row - self.scroll(inner);
        let x = (inner.x + col).min(area.right().saturating_sub(2));
        let y = (inner.y + row).min(area.bottom().saturating_sub(2));
        (x, y)
    }
}

impl Widget for TextInput<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let border_style = if self.focused {
            self.theme.border_focused
        } else {
            self.theme.border_unfocused
        };

        let block = Block::bordered().title(self.title).border_style(border_style);
        let inner = block.inner(area);
        block.render(area, buf);

        if self.text.is_empty() {
            Paragraph::new(Line::from(Span::styled(self.placeholder, self.theme.placeholder)))
                .render(inner, buf);
            return;
        }

        let lines: Vec<Line> = hard_wrap(self.text, inner.width as usize)
            .into_iter()
            .skip(self.scroll(inner) as usize)
            .map(Line::from)
            .collect();
        Paragraph::new(lines).render(inner, buf);
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn type_str(state: &mut TextInputState, text: &mut String, s: &str) {
        for c in s.chars() {
            if let Some(next) = state.handle(text, &AppEvent::Char(c)) {
                *text = next;
            }
        }
    }

    #[test]
    fn typing_inserts_at_cursor() {
        let mut s = TextInputState::default();
        let mut text = String::new();
        type_str(&mut s, &mut text, "fever");
        assert_eq!(text, "fever");
        assert_eq!(s.cursor, 5);

        s.handle(&text, &AppEvent::Home);
        type_str(&mut s, &mut text, "$");
        assert_eq!(text, "$fever");
    }

    #[test]
    fn backspace_and_delete() {
        let mut s = TextInputState { cursor: 3 };
        assert_eq!(s.handle("abc", &AppEvent::Backspace), Some("ab".to_string()));
        assert_eq!(s.cursor, 2);
        assert_eq!(s.handle("ab", &AppEvent::Delete), None);
        s.handle("ab", &AppEvent::Home);
        assert_eq!(s.handle("ab", &AppEvent::Delete), Some("b".to_string()));
        assert_eq!(s.handle("b", &AppEvent::Backspace), None);
    }

    #[test]
    fn cursor_walks_char_boundaries() {
        let text = "né";
        let mut s = TextInputState::default();
        s.handle(text, &AppEvent::Nav(Direction::Right));
        assert_eq!(s.cursor, 1);
        s.handle(text, &AppEvent::Nav(Direction::Right));
        assert_eq!(s.cursor, 3);
        s.handle(text, &AppEvent::Nav(Direction::Left));
        assert_eq!(s.cursor, 1);
    }

    #[test]
    fn cursor_is_clamped_when_text_shrinks() {
        let mut s = TextInputState { cursor: 10 };
        s.clamp("abc");
        assert_eq!(s.cursor, 3);
        let mut s = TextInputState { cursor: 1 };
        s.clamp("é");
        assert_eq!(s.cursor, 0);
    }

    #[test]
    fn navigation_returns_none() {
        let mut s = TextInputState::default();
        assert_eq!(s.handle("abc", &AppEvent::End), None);
        assert_eq!(s.cursor, 3);
    }

    #[test]
    fn hard_wrap_splits_on_width() {
        assert_eq!(hard_wrap("abcdefg", 3), vec!["abc", "def", "g"]);
        assert_eq!(hard_wrap("", 3), vec![""]);
    }

    #[test]
    fn renders_placeholder_when_empty() {
        let theme = Theme::load_default();
        let state = TextInputState::default();
        let area = Rect::new(0, 0, 30, 3);
        let mut buf = Buffer::empty(area);
        TextInput::new("Keywords", "", &state, false, &theme)
            .placeholder("type keywords")
            .render(area, &mut buf);
        let row: String = (0..30).map(|x| buf[(x, 1)].symbol().to_string()).collect();
        assert!(row.contains("type keywords"));
    }

    #[test]
    fn cursor_follows_wrapped_text() {
        let theme = Theme::load_default();
        let state = TextInputState { cursor: 7 };
        // inner width 5, two inner rows
        let area = Rect::new(0, 0, 7, 4);
        let input = TextInput::new("Draft", "abcdefgh", &state, true, &theme);
        assert_eq!(input.cursor_position(area), (3, 2));
    }
}
