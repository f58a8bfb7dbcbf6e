//! Results pane: an accordion of term groups with an ADD affordance per term.
//!
//! # Navigation
//! - `↑`/`k` and `↓`/`j` move the cursor over the visible rows.
//! - `→`/`l` expands the group under the cursor; `←`/`h` collapses it (from a
//!   term row the cursor jumps back to its header).
//! - `Enter` toggles a group, or ADDs the term under the cursor.
//! - `a` ADDs the term under the cursor.
//! - `Space` marks or unmarks the term under the cursor; `A` adds every
//!   marked term at once, grouped by keyword.
//!
//! The result itself lives in [`msq_core::FormState`]; this state only tracks
//! which groups are open, which terms are marked and where the cursor is.
//! Call [`ResultsState::reset`] whenever a new result replaces the old one.

use crate::event::{AppEvent, Direction};
use crate::theme::Theme;
use msq_core::SuggestionResult;
use std::collections::BTreeSet;
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, List, ListItem, ListState, Paragraph, StatefulWidget, Widget},
};

const PAGE: usize = 10;

/// What the user asked the results pane to do to the draft.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResultsAction {
    /// ADD a single term label.
    Add(String),
    /// Add the marked terms as `(entry index, label)` pairs.
    AddSelected(Vec<(usize, String)>),
}

/// One visible line of the accordion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Row {
    /// Header of the group at this index.
    Group(usize),
    /// Term `.1` of group `.0`.
    Term(usize, usize),
}

// ---------------------------------------------------------------------------
// State
// ---------------------------------------------------------------------------

#[derive(Debug, Default, Clone)]
pub struct ResultsState {
    /// Open/closed flag per group, in server order.
    pub expanded: Vec<bool>,
    /// Index into [`ResultsState::visible`].
    pub cursor: usize,
    /// Marked terms as `(group, term)` indices.
    pub selected: BTreeSet<(usize, usize)>,
}

impl ResultsState {
    /// Collapse every group of a freshly received `result` and drop marks.
    pub fn reset(&mut self, result: &SuggestionResult) {
        self.expanded = vec![false; result.entries.len()];
        self.cursor = 0;
        self.selected.clear();
    }

    fn is_selected(&self, group: usize, term: usize) -> bool {
        self.selected.contains(&(group, term))
    }

    /// Drain the marked terms as `(entry index, label)` pairs, in result
    /// order. `None` when nothing is marked.
    pub fn take_selection(&mut self, result: &SuggestionResult) -> Option<Vec<(usize, String)>> {
        let picks: Vec<(usize, String)> = std::mem::take(&mut self.selected)
            .into_iter()
            .filter_map(|(gi, ti)| {
                let term = result.entries.get(gi)?.terms.get(ti)?;
                Some((gi, term.label.clone()))
            })
            .collect();
        tracing::debug!(count = picks.len(), "results: add selection");
        if picks.is_empty() {
            None
        } else {
            Some(picks)
        }
    }

    fn is_expanded(&self, group: usize) -> bool {
        self.expanded.get(group).copied().unwrap_or(false)
    }

    /// Flatten `result` into rows, respecting the expanded flags.
    pub fn visible(&self, result: &SuggestionResult) -> Vec<Row> {
        let mut rows = Vec::new();
        for (gi, group) in result.entries.iter().enumerate() {
            rows.push(Row::Group(gi));
            if self.is_expanded(gi) {
                rows.extend((0..group.terms.len()).map(|ti| Row::Term(gi, ti)));
            }
        }
        rows
    }

    fn cursor_row(&self, result: &SuggestionResult) -> Option<Row> {
        self.visible(result).get(self.cursor).copied()
    }

    fn set_expanded(&mut self, group: usize, open: bool) {
        if group >= self.expanded.len() {
            self.expanded.resize(group + 1, false);
        }
        self.expanded[group] = open;
    }

    fn clamp_cursor(&mut self, result: &SuggestionResult) {
        let max = self.visible(result).len().saturating_sub(1);
        if self.cursor > max {
            self.cursor = max;
        }
    }

    /// Put the cursor on the header of `group`.
    fn focus_group(&mut self, result: &SuggestionResult, group: usize) {
        if let Some(pos) = self.visible(result).iter().position(|r| *r == Row::Group(group)) {
            self.cursor = pos;
        }
    }

    /// Handle an [`AppEvent`]. Returns what the user asked to add to the
    /// draft, if anything.
    pub fn handle(&mut self, result: &SuggestionResult, event: &AppEvent) -> Option<ResultsAction> {
        let len = self.visible(result).len();
        match event {
            AppEvent::Nav(Direction::Up) => {
                self.cursor = self.cursor.saturating_sub(1);
            }
            AppEvent::Nav(Direction::Down) => {
                if self.cursor + 1 < len {
                    self.cursor += 1;
                }
            }
            AppEvent::PageUp => self.cursor = self.cursor.saturating_sub(PAGE),
            AppEvent::PageDown => self.cursor = (self.cursor + PAGE).min(len.saturating_sub(1)),
            AppEvent::Home => self.cursor = 0,
            AppEvent::End => self.cursor = len.saturating_sub(1),
            AppEvent::Nav(Direction::Right) => {
                if let Some(Row::Group(gi)) = self.cursor_row(result) {
                    tracing::debug!(group = gi, "results: expand");
                    self.set_expanded(gi, true);
                }
            }
            AppEvent::Nav(Direction::Left) => {
                let group = match self.cursor_row(result) {
                    Some(Row::Group(gi)) | Some(Row::Term(gi, _)) => gi,
                    None => return None,
                };
                tracing::debug!(group, "results: collapse");
                self.set_expanded(group, false);
                self.focus_group(result, group);
                self.clamp_cursor(result);
            }
            AppEvent::Enter => match self.cursor_row(result)? {
                Row::Group(gi) => {
                    let open = !self.is_expanded(gi);
                    tracing::debug!(group = gi, open, "results: toggle");
                    self.set_expanded(gi, open);
                    self.clamp_cursor(result);
                }
                Row::Term(gi, ti) => return Some(ResultsAction::Add(term_label(result, gi, ti))),
            },
            AppEvent::Char('a') => {
                if let Some(Row::Term(gi, ti)) = self.cursor_row(result) {
                    return Some(ResultsAction::Add(term_label(result, gi, ti)));
                }
            }
            AppEvent::Char(' ') => {
                if let Some(Row::Term(gi, ti)) = self.cursor_row(result) {
                    if !self.selected.remove(&(gi, ti)) {
                        self.selected.insert((gi, ti));
                    }
                    let marked = self.is_selected(gi, ti);
                    tracing::debug!(group = gi, term = ti, marked, "results: mark");
                }
            }
            AppEvent::Char('A') => {
                return self.take_selection(result).map(ResultsAction::AddSelected);
            }
            _ => {}
        }
        None
    }
}

fn term_label(result: &SuggestionResult, group: usize, term: usize) -> String {
    let label = result.entries[group].terms[term].label.clone();
    tracing::debug!(group, term, label = %label, "results: add term");
    label
}

// ---------------------------------------------------------------------------
// Widget
// ---------------------------------------------------------------------------

pub struct ResultsView<'a> {
    result: &'a SuggestionResult,
    state: &'a ResultsState,
    /// Shown instead of the list when there are no groups.
    empty_hint: &'a str,
    focused: bool,
    theme: &'a Theme,
}

impl<'a> ResultsView<'a> {
    pub fn new(
        result: &'a SuggestionResult,
        state: &'a ResultsState,
        focused: bool,
        theme: &'a Theme,
    ) -> Self {
        Self { result, state, empty_hint: "", focused, theme }
    }

    pub fn empty_hint(mut self, hint: &'a str) -> Self {
        self.empty_hint = hint;
        self
    }

    fn item(&self, row: Row) -> ListItem<'a> {
        let result: &'a SuggestionResult = self.result;
        match row {
            Row::Group(gi) => {
                let arrow = if self.state.is_expanded(gi) { "▼ " } else { "▶ " };
                let group = &result.entries[gi];
                ListItem::new(Line::from(Span::styled(
                    format!("{arrow}{} ({})", group.header(), group.terms.len()),
                    self.theme.group_style(gi),
                )))
            }
            Row::Term(gi, ti) => {
                let term = &result.entries[gi].terms[ti];
                let mark = if self.state.is_selected(gi, ti) { "  ✓ " } else { "    " };
                ListItem::new(Line::from(vec![
                    Span::raw(mark),
                    Span::styled("[ADD]", self.theme.add_button),
                    Span::raw(" "),
                    Span::styled(term.id.as_str(), self.theme.term_id),
                    Span::raw(format!(": {}", term.label)),
                ]))
            }
        }
    }
}

impl Widget for ResultsView<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let border_style = if self.focused {
            self.theme.border_focused
        } else {
            self.theme.border_unfocused
        };

        let title = format!(
            "Suggestions ({} groups, {} terms)",
            self.result.entries.len(),
            self.result.term_count()
        );
        let block = Block::bordered().title(title).border_style(border_style);
        let inner = block.inner(area);
        block.render(area, buf);

        if self.result.entries.is_empty() {
            Paragraph::new(Line::from(Span::styled(self.empty_hint, self.theme.placeholder)))
                .render(inner, buf);
            return;
        }

        let items: Vec<ListItem> = self
            .state
            .visible(self.result)
            .into_iter()
            .map(|row| self.item(row))
            .collect();

        let mut list = List::new(items);
        if self.focused {
            list = list.highlight_style(self.theme.cursor);
        }
        let mut list_state = ListState::default().with_selected(Some(self.state.cursor));
        StatefulWidget::render(list, inner, buf, &mut list_state);
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use msq_core::{MeshTerm, TermGroup};
    use pretty_assertions::assert_eq;

    fn group(keywords: &[&str], terms: &[(&str, &str)]) -> TermGroup {
        TermGroup {
            keywords: keywords.iter().map(|s| s.to_string()).collect(),
            terms: terms.iter().map(|(id, label)| MeshTerm::new(*id, *label)).collect(),
        }
    }

    fn two_groups() -> SuggestionResult {
        SuggestionResult {
            splits: vec!["fever".into(), "cough".into()],
            entries: vec![
                group(&["fever"], &[("D005334", "Fever"), ("D006323", "Hyperthermia")]),
                group(&["cough"], &[("D003371", "Cough")]),
            ],
        }
    }

    fn fresh(result: &SuggestionResult) -> ResultsState {
        let mut s = ResultsState::default();
        s.reset(result);
        s
    }

    fn rendered_rows(result: &SuggestionResult, state: &ResultsState) -> Vec<String> {
        let theme = Theme::load_default();
        let area = Rect::new(0, 0, 60, 10);
        let mut buf = Buffer::empty(area);
        ResultsView::new(result, state, true, &theme).render(area, &mut buf);
        (0..area.height)
            .map(|y| (0..area.width).map(|x| buf[(x, y)].symbol().to_string()).collect())
            .collect()
    }

    #[test]
    fn groups_start_collapsed() {
        let r = two_groups();
        let s = fresh(&r);
        assert_eq!(s.visible(&r), vec![Row::Group(0), Row::Group(1)]);
    }

    #[test]
    fn right_expands_left_collapses() {
        let r = two_groups();
        let mut s = fresh(&r);
        s.handle(&r, &AppEvent::Nav(Direction::Right));
        assert_eq!(
            s.visible(&r),
            vec![Row::Group(0), Row::Term(0, 0), Row::Term(0, 1), Row::Group(1)]
        );

        // collapse from a term row returns the cursor to the header
        s.handle(&r, &AppEvent::Nav(Direction::Down));
        s.handle(&r, &AppEvent::Nav(Direction::Down));
        s.handle(&r, &AppEvent::Nav(Direction::Left));
        assert_eq!(s.cursor, 0);
        assert_eq!(s.visible(&r).len(), 2);
    }

    #[test]
    fn enter_toggles_group_and_adds_term() {
        let r = two_groups();
        let mut s = fresh(&r);
        assert_eq!(s.handle(&r, &AppEvent::Enter), None);
        assert!(s.expanded[0]);
        s.handle(&r, &AppEvent::Nav(Direction::Down));
        assert_eq!(s.handle(&r, &AppEvent::Enter), Some(ResultsAction::Add("Fever".into())));
        s.handle(&r, &AppEvent::Nav(Direction::Down));
        assert_eq!(
            s.handle(&r, &AppEvent::Char('a')),
            Some(ResultsAction::Add("Hyperthermia".into()))
        );
    }

    #[test]
    fn add_on_header_does_nothing() {
        let r = two_groups();
        let mut s = fresh(&r);
        assert_eq!(s.handle(&r, &AppEvent::Char('a')), None);
    }

    #[test]
    fn space_marks_terms_and_shift_a_adds_them() {
        let r = two_groups();
        let mut s = fresh(&r);
        assert_eq!(s.handle(&r, &AppEvent::Char('A')), None);

        // expand both groups: rows are G0, T00, T01, G1, T10
        s.handle(&r, &AppEvent::Nav(Direction::Right));
        s.handle(&r, &AppEvent::End);
        s.handle(&r, &AppEvent::Nav(Direction::Right));
        s.handle(&r, &AppEvent::End);
        s.handle(&r, &AppEvent::Char(' '));
        s.handle(&r, &AppEvent::Home);
        s.handle(&r, &AppEvent::Nav(Direction::Down));
        s.handle(&r, &AppEvent::Char(' '));
        s.handle(&r, &AppEvent::Nav(Direction::Down));
        s.handle(&r, &AppEvent::Char(' '));
        s.handle(&r, &AppEvent::Char(' '));
        assert_eq!(s.selected.len(), 2);

        assert_eq!(
            s.handle(&r, &AppEvent::Char('A')),
            Some(ResultsAction::AddSelected(vec![
                (0, "Fever".to_string()),
                (1, "Cough".to_string()),
            ]))
        );
        assert!(s.selected.is_empty());
    }

    #[test]
    fn space_on_header_marks_nothing() {
        let r = two_groups();
        let mut s = fresh(&r);
        s.handle(&r, &AppEvent::Char(' '));
        assert!(s.selected.is_empty());
    }

    #[test]
    fn marked_term_renders_check() {
        let r = two_groups();
        let mut s = fresh(&r);
        s.handle(&r, &AppEvent::Nav(Direction::Right));
        s.handle(&r, &AppEvent::Nav(Direction::Down));
        s.handle(&r, &AppEvent::Char(' '));
        let rows = rendered_rows(&r, &s);
        assert!(rows[2].contains("✓ [ADD] D005334: Fever"), "row was {:?}", rows[2]);
        assert!(!rows[3].contains('✓'));
    }

    #[test]
    fn cursor_stays_in_bounds() {
        let r = two_groups();
        let mut s = fresh(&r);
        s.handle(&r, &AppEvent::PageDown);
        assert_eq!(s.cursor, 1);
        s.handle(&r, &AppEvent::Nav(Direction::Down));
        assert_eq!(s.cursor, 1);
        s.handle(&r, &AppEvent::Home);
        s.handle(&r, &AppEvent::Nav(Direction::Up));
        assert_eq!(s.cursor, 0);
    }

    #[test]
    fn empty_result_ignores_events() {
        let r = SuggestionResult::default();
        let mut s = fresh(&r);
        assert_eq!(s.handle(&r, &AppEvent::Enter), None);
        assert_eq!(s.handle(&r, &AppEvent::Nav(Direction::Left)), None);
        assert_eq!(s.cursor, 0);
    }

    #[test]
    fn renders_header_and_entry() {
        let r = SuggestionResult {
            splits: vec!["pain".into()],
            entries: vec![group(&["pain"], &[("D0100", "Pain")])],
        };
        let mut s = fresh(&r);
        s.handle(&r, &AppEvent::Nav(Direction::Right));

        let rows = rendered_rows(&r, &s);
        assert!(rows[1].contains("Keyword: pain"), "header row was {:?}", rows[1]);
        assert!(rows[2].contains("[ADD] D0100: Pain"), "entry row was {:?}", rows[2]);
        assert!(!rows[3].contains("D0100"));
    }

    #[test]
    fn groups_render_in_server_order() {
        let r = two_groups();
        let rows = rendered_rows(&r, &fresh(&r));
        assert!(rows[1].contains("Keyword: fever"));
        assert!(rows[2].contains("Keyword: cough"));
    }
}
