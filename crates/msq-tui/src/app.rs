//! Top-level application state and the main event loop.
//!
//! [`App::run`] sets up the terminal, drives the crossterm event loop, and
//! tears everything down cleanly on exit or panic.
//!
//! The loop is the only writer of [`FormState`]. Every change goes through
//! [`msq_core::reduce`]; tickets it hands back are passed to the
//! [`Dispatcher`], and finished requests are drained from the completion
//! channel once per tick and reduced like any other event.

use crate::{
    commands::{execute_command, Command},
    event::{self, AppEvent},
    theme::Theme,
    widgets::{
        command_bar::{CommandBar, CommandBarState},
        help::HelpPopup,
        mode_picker::{self, ModePicker},
        results::{ResultsAction, ResultsState, ResultsView},
        status_bar::{ErrorBanner, StatusBar},
        text_input::{TextInput, TextInputState},
    },
};
use crossterm::{
    event::{self as ct_event, Event},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use msq_client::{Dispatcher, SuggestClient};
use msq_core::{config::Config, reduce, Completion, FormEvent, FormState, Phase, Ticket};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction as LayoutDir, Layout, Rect},
    Frame, Terminal,
};
use std::{io, time::Duration};
use tokio::sync::mpsc::UnboundedReceiver;

/// Loop iterations per spinner frame (~100ms at the 16ms poll interval).
const TICKS_PER_FRAME: u64 = 6;

// ---------------------------------------------------------------------------
// Focus
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    Keywords,
    Mode,
    Draft,
    Results,
    /// Vim-style `:` command line is active.
    Command,
}

impl Focus {
    fn next(self) -> Focus {
        match self {
            Focus::Keywords => Focus::Mode,
            Focus::Mode => Focus::Draft,
            Focus::Draft => Focus::Results,
            Focus::Results | Focus::Command => Focus::Keywords,
        }
    }

    fn prev(self) -> Focus {
        match self {
            Focus::Keywords | Focus::Command => Focus::Results,
            Focus::Mode => Focus::Keywords,
            Focus::Draft => Focus::Mode,
            Focus::Results => Focus::Draft,
        }
    }

    /// True when alphabetic keys should produce characters rather than
    /// trigger shortcuts.
    fn is_insert_mode(self) -> bool {
        matches!(self, Focus::Keywords | Focus::Draft | Focus::Command)
    }
}

// ---------------------------------------------------------------------------
// AppState
// ---------------------------------------------------------------------------

pub struct AppState {
    pub form: FormState,
    pub focus: Focus,
    /// Focus state before entering command mode, restored on exit.
    pub prev_focus: Focus,
    pub keywords: TextInputState,
    pub draft: TextInputState,
    pub results: ResultsState,
    pub theme: Theme,
    pub config: Config,
    pub show_help: bool,
    pub command_bar: CommandBarState,
    /// Event-loop iterations so far; drives the spinner.
    pub tick: u64,
    pub quit: bool,
}

impl AppState {
    pub fn new(config: Config, theme: Theme) -> Self {
        Self {
            form: FormState::with_mode(config.api.default_mode),
            focus: Focus::Keywords,
            prev_focus: Focus::Keywords,
            keywords: TextInputState::default(),
            draft: TextInputState::default(),
            results: ResultsState::default(),
            theme,
            config,
            show_help: false,
            command_bar: CommandBarState::default(),
            tick: 0,
            quit: false,
        }
    }

    /// Reduce `event` into the form and bring widget state back in line with
    /// the new form. Returns the ticket to dispatch, if any.
    pub fn apply(&mut self, event: FormEvent) -> Option<Ticket> {
        let typed_keywords = matches!(event, FormEvent::SetKeywords(_));
        let typed_draft = matches!(event, FormEvent::EditDraft(_));

        let (next, ticket) = reduce(&self.form, event);

        if next.result != self.form.result || next.received_at != self.form.received_at {
            self.results.reset(&next.result);
        }
        if next.term != self.form.term && !typed_keywords {
            self.keywords.move_to_end(&next.term);
        }
        if next.draft != self.form.draft && !typed_draft {
            self.draft.move_to_end(&next.draft);
        }
        self.keywords.clamp(&next.term);
        self.draft.clamp(&next.draft);

        self.form = next;
        ticket
    }

    /// Handle one semantic event. Returns the ticket to dispatch, if any.
    pub fn handle(&mut self, event: AppEvent) -> Option<Ticket> {
        // Help popup intercepts all events; only close keys pass through.
        if self.show_help {
            match event {
                AppEvent::Char('?') | AppEvent::Escape | AppEvent::Quit => {
                    tracing::debug!("help popup closed");
                    self.show_help = false;
                }
                _ => {}
            }
            return None;
        }

        // Command mode intercepts all events.
        if self.focus == Focus::Command {
            return self.handle_command_bar(event);
        }

        match event {
            AppEvent::Char('?') if !self.focus.is_insert_mode() => {
                tracing::debug!("help popup opened");
                self.show_help = true;
                None
            }

            AppEvent::Char(':') if !self.focus.is_insert_mode() => {
                tracing::debug!(prev_focus = ?self.focus, "entering command mode");
                self.prev_focus = self.focus;
                self.command_bar.clear();
                self.focus = Focus::Command;
                None
            }

            AppEvent::Quit => {
                tracing::debug!("quit");
                self.quit = true;
                None
            }

            // Leave a text input for the next non-text pane
            AppEvent::Escape => {
                self.focus = match self.focus {
                    Focus::Keywords => Focus::Mode,
                    Focus::Draft => Focus::Results,
                    other => other,
                };
                None
            }

            AppEvent::FocusNext => {
                let next = self.focus.next();
                tracing::debug!(from = ?self.focus, to = ?next, "focus cycle");
                self.focus = next;
                None
            }

            AppEvent::FocusPrev => {
                let prev = self.focus.prev();
                tracing::debug!(from = ?self.focus, to = ?prev, "focus cycle");
                self.focus = prev;
                None
            }

            // Terminal resize is handled automatically by ratatui
            AppEvent::Resize(_, _) => None,

            other => self.dispatch_to_focused(other),
        }
    }

    fn handle_command_bar(&mut self, event: AppEvent) -> Option<Ticket> {
        match event {
            AppEvent::Escape => {
                tracing::debug!("command bar cancelled");
                self.command_bar.clear();
                self.focus = self.prev_focus;
                None
            }
            AppEvent::Enter => {
                let input = self.command_bar.input.clone();
                match Command::parse(&input) {
                    Ok(cmd) => {
                        tracing::debug!(command = ?cmd, "executing command");
                        self.command_bar.clear();
                        self.focus = self.prev_focus;
                        execute_command(self, cmd).and_then(|ev| self.apply(ev))
                    }
                    Err(msg) if msg.is_empty() => {
                        self.command_bar.clear();
                        self.focus = self.prev_focus;
                        None
                    }
                    Err(msg) => {
                        // Show the error; bar stays open
                        self.command_bar.error = Some(msg);
                        None
                    }
                }
            }
            AppEvent::Quit => {
                self.quit = true;
                None
            }
            other => {
                self.command_bar.handle(&other);
                None
            }
        }
    }

    /// Route an event to the widget that owns the current focus.
    fn dispatch_to_focused(&mut self, event: AppEvent) -> Option<Ticket> {
        let form_event = match self.focus {
            Focus::Keywords => match event {
                AppEvent::Enter => Some(FormEvent::Submit),
                other => self.keywords.handle(&self.form.term, &other).map(FormEvent::SetKeywords),
            },
            Focus::Mode => match event {
                AppEvent::Enter => Some(FormEvent::Submit),
                other => mode_picker::handle(self.form.mode, &other).map(FormEvent::SetMode),
            },
            Focus::Draft => self.draft.handle(&self.form.draft, &event).map(FormEvent::EditDraft),
            Focus::Results => {
                self.results.handle(&self.form.result, &event).map(|action| match action {
                    ResultsAction::Add(label) => FormEvent::AddTerm(label),
                    ResultsAction::AddSelected(picks) => FormEvent::AddSelected(picks),
                })
            }
            Focus::Command => None, // handled before dispatch, should not reach here
        };
        form_event.and_then(|ev| self.apply(ev))
    }
}

// ---------------------------------------------------------------------------
// App
// ---------------------------------------------------------------------------

pub struct App<C> {
    state: AppState,
    dispatcher: Dispatcher<C>,
    completions: UnboundedReceiver<Completion>,
}

impl<C: SuggestClient> App<C> {
    pub fn new(
        config: Config,
        theme: Theme,
        dispatcher: Dispatcher<C>,
        completions: UnboundedReceiver<Completion>,
    ) -> Self {
        Self { state: AppState::new(config, theme), dispatcher, completions }
    }

    /// Set up the terminal, run the event loop, and restore the terminal on exit.
    pub fn run(mut self) -> anyhow::Result<()> {
        install_panic_hook();

        enable_raw_mode()?;
        execute!(io::stdout(), EnterAlternateScreen)?;
        let backend = CrosstermBackend::new(io::stdout());
        let mut terminal = Terminal::new(backend)?;

        let result = self.event_loop(&mut terminal);

        // Always restore terminal, even if the loop returned an error
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
        let _ = terminal.show_cursor();

        result
    }

    fn event_loop(
        &mut self,
        terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    ) -> anyhow::Result<()> {
        loop {
            self.drain_completions();

            {
                let s = &self.state;
                terminal.draw(|frame| draw(frame, s))?;
            }

            if self.state.quit {
                break;
            }

            if ct_event::poll(Duration::from_millis(16))? {
                match ct_event::read()? {
                    Event::Key(key) if key.kind == crossterm::event::KeyEventKind::Press => {
                        let raw = Event::Key(key);
                        // Use insert-mode mapping when a text widget is focused
                        let app_event = if self.state.focus.is_insert_mode() {
                            event::to_app_event_insert(raw)
                        } else {
                            event::to_app_event(raw)
                        };
                        if let Some(ev) = app_event {
                            tracing::debug!(focus = ?self.state.focus, event = ?ev, "key event");
                            self.handle(ev);
                        }
                    }
                    other => {
                        if let Some(ev) = event::to_app_event(other) {
                            self.handle(ev);
                        }
                    }
                }
            }

            self.state.tick = self.state.tick.wrapping_add(1);
        }
        Ok(())
    }

    fn handle(&mut self, event: AppEvent) {
        if let Some(ticket) = self.state.handle(event) {
            self.dispatcher.dispatch(ticket);
        }
    }

    /// Reduce every completion that arrived since the last tick.
    fn drain_completions(&mut self) {
        while let Ok(completion) = self.completions.try_recv() {
            tracing::debug!(
                seq = completion.seq,
                latest = self.state.form.latest_seq(),
                ok = completion.outcome.is_ok(),
                "completion received"
            );
            self.state.apply(FormEvent::Completed(completion));
        }
    }
}

// ---------------------------------------------------------------------------
// Rendering
// ---------------------------------------------------------------------------

fn draw(frame: &mut Frame, state: &AppState) {
    let area = frame.area();
    let form = &state.form;
    let theme = &state.theme;

    let banner_height = if form.error.is_some() { 1 } else { 0 };

    // status | keywords | mode | error banner | draft | results
    let vert = Layout::default()
        .direction(LayoutDir::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Length(banner_height),
            Constraint::Length(6),
            Constraint::Fill(1),
        ])
        .split(area);

    let received_at = form.received_at.filter(|_| state.config.ui.show_received_at);
    frame.render_widget(
        StatusBar::new(form.phase(), (form.result.entries.len(), form.result.term_count()), theme)
            .received_at(received_at, &state.config.ui.timestamp_format),
        vert[0],
    );

    let keywords = TextInput::new(
        "Keywords",
        &form.term,
        &state.keywords,
        state.focus == Focus::Keywords,
        theme,
    )
    .placeholder("keywords, $-separated (e.g. fever$cough), Enter to suggest");
    frame.render_widget(keywords, vert[1]);

    frame.render_widget(
        ModePicker::new(
            form.mode,
            form.loading,
            state.tick / TICKS_PER_FRAME,
            state.focus == Focus::Mode,
            theme,
        ),
        vert[2],
    );

    if let Some(ref err) = form.error {
        frame.render_widget(ErrorBanner::new(err, theme), vert[3]);
    }

    let draft = TextInput::new(
        "Query draft",
        &form.draft,
        &state.draft,
        state.focus == Focus::Draft,
        theme,
    )
    .placeholder("seeded from the keyword splits after the first suggestion");
    frame.render_widget(draft, vert[4]);

    let empty_hint = match form.phase() {
        Phase::Success => "No suggestions for these keywords",
        _ => "Type keywords and press Enter to get suggestions",
    };
    frame.render_widget(
        ResultsView::new(&form.result, &state.results, state.focus == Focus::Results, theme)
            .empty_hint(empty_hint),
        vert[5],
    );

    if state.show_help {
        frame.render_widget(HelpPopup::new(theme), area);
    }

    // Command bar overlays the bottom row of the screen
    if state.focus == Focus::Command {
        let cmd_area = Rect { y: area.bottom().saturating_sub(1), height: 1, ..area };
        frame.render_widget(CommandBar::new(&state.command_bar, theme), cmd_area);
        let col = state.command_bar.cursor_col(cmd_area);
        frame.set_cursor_position((col, cmd_area.y));
        return;
    }

    // Position the terminal cursor in the focused text input
    let text_cursor = match state.focus {
        Focus::Keywords => Some(
            TextInput::new("", &form.term, &state.keywords, true, theme).cursor_position(vert[1]),
        ),
        Focus::Draft => Some(
            TextInput::new("", &form.draft, &state.draft, true, theme).cursor_position(vert[4]),
        ),
        _ => None,
    };
    if let Some(pos) = text_cursor {
        if !state.show_help {
            frame.set_cursor_position(pos);
        }
    }
}

// ---------------------------------------------------------------------------
// Terminal helpers
// ---------------------------------------------------------------------------

fn install_panic_hook() {
    let original = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
        original(info);
    }));
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
