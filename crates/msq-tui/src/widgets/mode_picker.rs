//! Mode picker: one radio button per mode followed by the Suggest button.
//!
//! `←`/`h` and `→`/`l` move the selection (wrapping at the ends); `Enter` is
//! handled by the app shell as a submit. While a request is outstanding the
//! Suggest button is replaced by a spinner; the picker stays usable.

use crate::event::{AppEvent, Direction};
use crate::theme::Theme;
use msq_core::Mode;
use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Direction as LayoutDir, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Paragraph, Widget},
};

const SPINNER: [&str; 10] = ["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];

/// Mode selected after `event`, or `None` if the event does not change it.
pub fn handle(mode: Mode, event: &AppEvent) -> Option<Mode> {
    match event {
        AppEvent::Nav(Direction::Left) => Some(mode.prev()),
        AppEvent::Nav(Direction::Right) => Some(mode.next()),
        _ => None,
    }
}

pub struct ModePicker<'a> {
    selected: Mode,
    loading: bool,
    /// Frame counter driving the spinner.
    tick: u64,
    focused: bool,
    theme: &'a Theme,
}

impl<'a> ModePicker<'a> {
    pub fn new(selected: Mode, loading: bool, tick: u64, focused: bool, theme: &'a Theme) -> Self {
        Self { selected, loading, tick, focused, theme }
    }

    fn radio_line(&self) -> Line<'static> {
        let mut spans = Vec::with_capacity(Mode::ALL.len() * 2);
        for mode in Mode::ALL {
            let (mark, style) = if mode == self.selected {
                ("(•) ", self.theme.mode_selected)
            } else {
                ("( ) ", self.theme.mode_unselected)
            };
            spans.push(Span::styled(format!("{mark}{}", mode.label()), style));
            spans.push(Span::raw("  "));
        }
        Line::from(spans)
    }

    fn button_line(&self) -> Line<'static> {
        if self.loading {
            let frame = SPINNER[(self.tick as usize) % SPINNER.len()];
            Line::from(Span::styled(format!("{frame} suggesting"), self.theme.loading))
        } else {
            Line::from(Span::styled("[ Suggest ]", self.theme.add_button))
        }
    }
}

impl Widget for ModePicker<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let border_style = if self.focused {
            self.theme.border_focused
        } else {
            self.theme.border_unfocused
        };

        let block = Block::bordered().title("Mode").border_style(border_style);
        let inner = block.inner(area);
        block.render(area, buf);

        let chunks = Layout::default()
            .direction(LayoutDir::Horizontal)
            .constraints([Constraint::Fill(1), Constraint::Length(14)])
            .split(inner);

        Paragraph::new(self.radio_line()).render(chunks[0], buf);
        Paragraph::new(self.button_line()).render(chunks[1], buf);
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
