use miette::Result;
use payment_router::config::DEFAULT_LOG_FILTER;
use payment_router::interfaces::cli;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

fn main() -> Result<()> {
    init_tracing();

    let cli = match cli::try_parse_from(std::env::args_os()) {
        Ok(cli) => cli,
        // Help and version go to stdout with exit code 0; usage errors exit 1.
        Err(e) if e.use_stderr() => {
            let _ = e.print();
            std::process::exit(1);
        }
        Err(e) => e.exit(),
    };

    cli::run(cli)?;
    Ok(())
}

fn init_tracing() {
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| DEFAULT_LOG_FILTER.into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_ansi(false),
        )
        .init();
}
