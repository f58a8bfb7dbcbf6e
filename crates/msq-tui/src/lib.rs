//! msq TUI: ratatui application shell around the suggestion form.

pub mod app;
pub mod commands;
pub mod event;
pub mod theme;
pub mod widgets;

pub use app::App;

use msq_client::{Dispatcher, HttpSuggestClient};
use msq_core::config::Config;

/// Start the TUI against the endpoint in `config`.
///
/// Requests run on a small tokio runtime owned by this call. The runtime is
/// shut down without waiting once the UI exits, so a slow in-flight request
/// never delays quitting.
pub fn run(config: Config) -> anyhow::Result<()> {
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .worker_threads(2)
        .thread_name("msq-http")
        .enable_all()
        .build()?;

    let client = HttpSuggestClient::new(&config.api)?;
    let (dispatcher, completions) = Dispatcher::new(client, runtime.handle().clone());
    let theme = theme::Theme::by_name(&config.ui.theme);

    tracing::info!(
        endpoint = %format!("{}{}", config.api.base_url, config.api.path),
        mode = %config.api.default_mode,
        "starting tui"
    );
    let result = App::new(config, theme, dispatcher, completions).run();

    runtime.shutdown_background();
    result
}
