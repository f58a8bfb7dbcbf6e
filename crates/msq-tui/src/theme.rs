//! Colour theme for the msq TUI.
//!
//! Themes are defined as TOML files. Both built-in themes are embedded in the
//! binary via [`include_str!`] so the application works without any files on
//! disk. Call [`Theme::by_name`] at startup and pass the result through the
//! application as a shared reference.
//!
//! # Group colours
//!
//! Result groups cycle through the `[groups] palette` by position, so the
//! first group always gets the first colour.

use config::{Config, File, FileFormat};
use ratatui::style::{Color, Modifier, Style};
use serde::Deserialize;

const DEFAULT_THEME_SRC: &str = include_str!("themes/default.toml");
const GRUVBOX_DARK_THEME_SRC: &str = include_str!("themes/gruvbox_dark.toml");

// ---------------------------------------------------------------------------
// Raw (serde) types: mirror the TOML structure
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct RawStyle {
    fg: Option<String>,
    bg: Option<String>,
    #[serde(default)]
    bold: bool,
    #[serde(default)]
    dim: bool,
    #[serde(default)]
    italic: bool,
    #[serde(default)]
    reversed: bool,
}

impl RawStyle {
    fn into_style(self) -> Style {
        let mut style = Style::default();
        if let Some(c) = self.fg.as_deref().and_then(parse_color) {
            style = style.fg(c);
        }
        if let Some(c) = self.bg.as_deref().and_then(parse_color) {
            style = style.bg(c);
        }
        if self.bold {
            style = style.add_modifier(Modifier::BOLD);
        }
        if self.dim {
            style = style.add_modifier(Modifier::DIM);
        }
        if self.italic {
            style = style.add_modifier(Modifier::ITALIC);
        }
        if self.reversed {
            style = style.add_modifier(Modifier::REVERSED);
        }
        style
    }
}

#[derive(Debug, Deserialize)]
struct RawBorders {
    focused: RawStyle,
    unfocused: RawStyle,
}

#[derive(Debug, Deserialize)]
struct RawStatus {
    title: RawStyle,
    error: RawStyle,
    loading: RawStyle,
    success: RawStyle,
}

#[derive(Debug, Deserialize)]
struct RawModes {
    selected: RawStyle,
    unselected: RawStyle,
}

#[derive(Debug, Deserialize)]
struct RawResults {
    term_id: RawStyle,
    add_button: RawStyle,
    cursor: RawStyle,
}

#[derive(Debug, Deserialize)]
struct RawInput {
    placeholder: RawStyle,
}

#[derive(Debug, Deserialize)]
struct RawGroups {
    palette: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct RawTheme {
    borders: RawBorders,
    status: RawStatus,
    modes: RawModes,
    results: RawResults,
    input: RawInput,
    groups: RawGroups,
}

// ---------------------------------------------------------------------------
// Public Theme type
// ---------------------------------------------------------------------------

/// Application colour theme.
///
/// All styles are pre-resolved ratatui [`Style`] values: no allocation at
/// render time.
#[derive(Debug, Clone)]
pub struct Theme {
    /// Border style for the currently focused pane.
    pub border_focused: Style,
    /// Border style for unfocused panes.
    pub border_unfocused: Style,

    /// Application title in the status bar.
    pub title: Style,
    /// Error banner.
    pub error: Style,
    /// Spinner and "suggesting" indicator.
    pub loading: Style,
    /// Results summary after a successful request.
    pub success: Style,

    /// Radio button of the selected mode.
    pub mode_selected: Style,
    /// Radio buttons of the other modes.
    pub mode_unselected: Style,

    /// Term identifier in a result row.
    pub term_id: Style,
    /// The `[ADD]` affordance.
    pub add_button: Style,
    /// Highlight of the row under the results cursor.
    pub cursor: Style,

    /// Placeholder text of an empty input.
    pub placeholder: Style,

    /// Ordered colour palette cycled across result groups.
    group_palette: Vec<Color>,
}

impl Theme {
    /// Load and parse the embedded default theme.
    ///
    /// # Panics
    ///
    /// Panics if the embedded TOML is malformed.
    pub fn load_default() -> Self {
        Self::from_toml_str(DEFAULT_THEME_SRC).expect("embedded default theme must be valid TOML")
    }

    /// Load and parse the embedded Gruvbox Dark theme.
    ///
    /// # Panics
    ///
    /// Panics if the embedded TOML is malformed.
    pub fn load_gruvbox_dark() -> Self {
        Self::from_toml_str(GRUVBOX_DARK_THEME_SRC)
            .expect("embedded gruvbox dark theme must be valid TOML")
    }

    /// Canonical name of a built-in theme, accepting aliases in any case.
    /// `None` for unknown names.
    pub fn canonical_name(name: &str) -> Option<&'static str> {
        match name.trim().to_ascii_lowercase().as_str() {
            "gruvbox" | "gruvbox_dark" | "gruvbox-dark" => Some("gruvbox"),
            "default" => Some("default"),
            _ => None,
        }
    }

    /// Resolve a theme by name. Unknown names (e.g. from a hand-edited
    /// config) fall back to the default theme.
    pub fn by_name(name: &str) -> Self {
        match Self::canonical_name(name) {
            Some("gruvbox") => Self::load_gruvbox_dark(),
            Some(_) => Self::load_default(),
            None => {
                tracing::warn!(theme = name, "unknown theme, using default");
                Self::load_default()
            }
        }
    }

    /// Parse a theme from a TOML string.
    ///
    /// Returns an error if the string cannot be deserialised into a valid
    /// theme. Unknown keys are ignored.
    pub fn from_toml_str(src: &str) -> anyhow::Result<Self> {
        let raw: RawTheme = Config::builder()
            .add_source(File::from_str(src, FileFormat::Toml))
            .build()?
            .try_deserialize()?;

        Ok(Self {
            border_focused: raw.borders.focused.into_style(),
            border_unfocused: raw.borders.unfocused.into_style(),
            title: raw.status.title.into_style(),
            error: raw.status.error.into_style(),
            loading: raw.status.loading.into_style(),
            success: raw.status.success.into_style(),
            mode_selected: raw.modes.selected.into_style(),
            mode_unselected: raw.modes.unselected.into_style(),
            term_id: raw.results.term_id.into_style(),
            add_button: raw.results.add_button.into_style(),
            cursor: raw.results.cursor.into_style(),
            placeholder: raw.input.placeholder.into_style(),
            group_palette: raw
                .groups
                .palette
                .iter()
                .filter_map(|s| parse_color(s))
                .collect(),
        })
    }

    /// Header style for the group at `index`.
    pub fn group_style(&self, index: usize) -> Style {
        if self.group_palette.is_empty() {
            return Style::default().add_modifier(Modifier::BOLD);
        }
        Style::default()
            .fg(self.group_palette[index % self.group_palette.len()])
            .add_modifier(Modifier::BOLD)
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Parse a colour name into a ratatui [`Color`].
///
/// Accepts:
/// - Named terminal colours (case-insensitive): `red`, `dark_gray`, etc.
/// - Hex RGB: `#rrggbb`
/// - 256-colour indexed: `indexed:N`
fn parse_color(s: &str) -> Option<Color> {
    match s.to_ascii_lowercase().as_str() {
        "black" => Some(Color::Black),
        "red" => Some(Color::Red),
        "green" => Some(Color::Green),
        "yellow" => Some(Color::Yellow),
        "blue" => Some(Color::Blue),
        "magenta" => Some(Color::Magenta),
        "cyan" => Some(Color::Cyan),
        "gray" | "grey" => Some(Color::Gray),
        "dark_gray" | "darkgray" | "dark_grey" | "darkgrey" => Some(Color::DarkGray),
        "light_red" => Some(Color::LightRed),
        "light_green" => Some(Color::LightGreen),
        "light_yellow" => Some(Color::LightYellow),
        "light_blue" => Some(Color::LightBlue),
        "light_magenta" => Some(Color::LightMagenta),
        "light_cyan" => Some(Color::LightCyan),
        "white" => Some(Color::White),
        s if s.starts_with('#') && s.len() == 7 => {
            let r = u8::from_str_radix(&s[1..3], 16).ok()?;
            let g = u8::from_str_radix(&s[3..5], 16).ok()?;
            let b = u8::from_str_radix(&s[5..7], 16).ok()?;
            Some(Color::Rgb(r, g, b))
        }
        s if s.starts_with("indexed:") => {
            let n: u8 = s["indexed:".len()..].parse().ok()?;
            Some(Color::Indexed(n))
        }
        _ => None,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
