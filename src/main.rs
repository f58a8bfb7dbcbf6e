use clap::Parser;
use msq::cli::Cli;
use msq::headless;

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    if cli.debug {
        let file = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open("/tmp/msq-debug.log")?;
        tracing_subscriber::fmt()
            .with_writer(std::sync::Mutex::new(file))
            .with_ansi(false)
            .with_env_filter(
                tracing_subscriber::EnvFilter::try_from_env("RUST_LOG")
                    .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("debug")),
            )
            .init();
        tracing::info!("msq debug log started: tail -f /tmp/msq-debug.log");
    }

    let config = cli.load_config()?;

    let Some(input) = cli.headless_input() else {
        return msq_tui::run(config);
    };

    match headless::execute(&config, input, cli.format) {
        Ok(output) => {
            print!("{output}");
            Ok(())
        }
        Err(err) => {
            tracing::warn!(error = %err, "headless request failed");
            eprintln!("{err}");
            std::process::exit(1);
        }
    }
}
