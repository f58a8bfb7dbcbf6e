//! Command-line interface.

use clap::{Parser, ValueEnum};
use crate::headless::Input;
use msq_core::{config::Config, Mode};
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "msq", version, about = "MeSH suggestion query builder")]
pub struct Cli {
    /// Write debug logs to /tmp/msq-debug.log (tail -f to inspect).
    #[arg(long)]
    pub debug: bool,

    /// Read configuration from this file instead of ~/.config/msq/config.toml.
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Base URL of the suggestion service, e.g. http://127.0.0.1:5000.
    #[arg(long, value_name = "URL")]
    pub endpoint: Option<String>,

    /// Expansion mode: Semantic, Fragment, Atomic, ATM, MetaMap or UMLS.
    #[arg(long)]
    pub mode: Option<Mode>,

    /// Suggest for these keywords ($-separated) and print the result.
    #[arg(long, conflicts_with = "query")]
    pub term: Option<String>,

    /// Import the keywords of a PubMed boolean query, suggest, and print.
    #[arg(long)]
    pub query: Option<String>,

    /// Output format for headless mode.
    #[arg(long, value_enum, default_value_t = Format::Text)]
    pub format: Format,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Format {
    Text,
    Json,
}

impl Cli {
    /// Configuration from `--config` (or the default location) with the
    /// command-line overrides applied on top.
    pub fn load_config(&self) -> anyhow::Result<Config> {
        let mut config = match &self.config {
            Some(path) => Config::load_from(path)?,
            None => Config::load()?,
        };
        self.apply_overrides(&mut config);
        Ok(config)
    }

    pub fn apply_overrides(&self, config: &mut Config) {
        if let Some(endpoint) = &self.endpoint {
            config.api.base_url = endpoint.clone();
        }
        if let Some(mode) = self.mode {
            config.api.default_mode = mode;
        }
    }

    /// The one-shot request asked for with `--term` or `--query`. `None`
    /// means the TUI should start.
    pub fn headless_input(&self) -> Option<Input> {
        match (&self.term, &self.query) {
            (Some(term), _) => Some(Input::Term(term.clone())),
            (None, Some(query)) => Some(Input::Query(query.clone())),
            (None, None) => None,
        }
    }
}
