// ---------------------------------------------------------------------------
// Command
// ---------------------------------------------------------------------------

use crate::{app::AppState, theme::Theme};
use msq_core::{FormEvent, Mode};

/// A parsed, validated command ready to be executed by the app shell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Quit,
    // Toggle the help popup
    Help,
    Theme(String),
    // Select a mode without touching the picker
    Mode(Mode),
    // Submit the current keywords
    Suggest,
    // Append a term label to the draft
    Add(String),
    // Add the terms marked in the results pane, grouped by keyword
    AddSelected,
    // Reset the form, keeping the mode
    Clear,
    // Replace the keywords with those of a boolean query
    Import(String),
}

impl Command {
    /// Parse a raw command string (the text after the `:` prefix).
    ///
    /// Returns `Ok(cmd)` on success, `Err(message)` on failure. An empty
    /// string returns `Err("")` as a sentinel meaning "close without acting".
    pub fn parse(input: &str) -> Result<Command, String> {
        let input = input.trim();
        if input.is_empty() {
            return Err(String::new());
        }

        let (word, rest) = input
            .split_once(char::is_whitespace)
            .map(|(w, r)| (w, r.trim()))
            .unwrap_or((input, ""));

        let required = |usage: &str| {
            if rest.is_empty() {
                Err(format!("usage: {usage}"))
            } else {
                Ok(rest.to_string())
            }
        };

        match word {
            "q" | "quit" => Ok(Command::Quit),
            "help" => Ok(Command::Help),
            "suggest" | "s" => Ok(Command::Suggest),
            "clear" => Ok(Command::Clear),
            "theme" => {
                let name = required("theme <default|gruvbox>")?;
                Theme::canonical_name(&name)
                    .map(|n| Command::Theme(n.to_string()))
                    .ok_or_else(|| format!("unknown theme: {name} (expected default or gruvbox)"))
            }
            "mode" => {
                let name = required("mode <Semantic|Fragment|Atomic|ATM|MetaMap|UMLS>")?;
                name.parse::<Mode>().map(Command::Mode)
            }
            "add" => required("add <term label>").map(Command::Add),
            "add-selected" | "as" => Ok(Command::AddSelected),
            "import" => required("import <boolean query>").map(Command::Import),
            other => Err(format!("unknown command: {other}")),
        }
    }
}

/// Execute a parsed [`Command`] against the application state.
///
/// Commands that change the form are returned as a [`FormEvent`] for the app
/// shell to reduce; purely visual ones are applied here.
pub fn execute_command(s: &mut AppState, cmd: Command) -> Option<FormEvent> {
    match cmd {
        Command::Quit => {
            s.quit = true;
            None
        }
        Command::Help => {
            s.show_help = !s.show_help;
            None
        }
        Command::Theme(name) => {
            s.theme = Theme::by_name(&name);
            None
        }
        Command::Mode(mode) => Some(FormEvent::SetMode(mode)),
        Command::Suggest => Some(FormEvent::Submit),
        Command::Add(label) => Some(FormEvent::AddTerm(label)),
        Command::AddSelected => s.results.take_selection(&s.form.result).map(FormEvent::AddSelected),
        Command::Clear => Some(FormEvent::Reset),
        Command::Import(query) => Some(FormEvent::ImportQuery(query)),
    }
}
