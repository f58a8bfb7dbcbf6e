//! Status bar and error banner.
//!
//! The status bar is the single top row: application title, request phase,
//! when the displayed results arrived, and key hints right-aligned. The error
//! banner is a full-width row that only appears while the form holds an
//! error.

use crate::theme::Theme;
use chrono::{DateTime, Local, Utc};
use msq_core::Phase;
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Clear, Paragraph, Widget, Wrap},
};

const TITLE: &str = " msq ";
const HINTS: &str = " Tab:focus  Enter:suggest  ::cmd  ?:help  q:quit ";

pub struct StatusBar<'a> {
    phase: Phase,
    /// Groups and terms in the current result.
    counts: (usize, usize),
    /// Arrival time of the current result, `None` to hide it.
    received_at: Option<DateTime<Utc>>,
    timestamp_format: &'a str,
    theme: &'a Theme,
}

impl<'a> StatusBar<'a> {
    pub fn new(phase: Phase, counts: (usize, usize), theme: &'a Theme) -> Self {
        Self { phase, counts, received_at: None, timestamp_format: "%H:%M:%S", theme }
    }

    pub fn received_at(mut self, at: Option<DateTime<Utc>>, format: &'a str) -> Self {
        self.received_at = at;
        self.timestamp_format = format;
        self
    }

    fn phase_span(&self) -> Span<'static> {
        match self.phase {
            Phase::Idle => Span::styled("ready", Style::default().add_modifier(Modifier::DIM)),
            Phase::Loading => Span::styled("suggesting…", self.theme.loading),
            Phase::Error => Span::styled("request failed", self.theme.error),
            Phase::Success => Span::styled(
                format!("{} groups, {} terms", self.counts.0, self.counts.1),
                self.theme.success,
            ),
        }
    }
}

impl Widget for StatusBar<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let mut spans = vec![Span::styled(TITLE, self.theme.title), Span::raw(" "), self.phase_span()];
        if let Some(at) = self.received_at {
            let stamp = at.with_timezone(&Local).format(self.timestamp_format);
            spans.push(Span::styled(
                format!("  received {stamp}"),
                Style::default().add_modifier(Modifier::DIM),
            ));
        }
        buf.set_line(area.x, area.y, &Line::from(spans), area.width);

        let hint_x = area.right().saturating_sub(HINTS.chars().count() as u16);
        buf.set_string(hint_x, area.y, HINTS, Style::default().add_modifier(Modifier::DIM));
    }
}

/// Full-width banner showing the last request error.
pub struct ErrorBanner<'a> {
    message: &'a str,
    theme: &'a Theme,
}

impl<'a> ErrorBanner<'a> {
    pub fn new(message: &'a str, theme: &'a Theme) -> Self {
        Self { message, theme }
    }
}

impl Widget for ErrorBanner<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        Clear.render(area, buf);
        Paragraph::new(Line::from(format!(" ✗ {}", self.message)))
            .style(self.theme.error)
            .wrap(Wrap { trim: true })
            .render(area, buf);
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
