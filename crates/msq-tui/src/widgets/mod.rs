//! Ratatui widgets for the msq TUI.

pub mod command_bar;
pub mod help;
pub mod mode_picker;
pub mod results;
pub mod status_bar;
pub mod text_input;
