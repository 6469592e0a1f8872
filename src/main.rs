use booktape::infrastructure::cli::{run, Cli};
use booktape::infrastructure::config::{Config, LogFormat};
use clap::Parser;
use std::process::ExitCode;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    // Load configuration; only the commands that need it fail on errors
    let config = Config::from_env();
    let log_format = config
        .as_ref()
        .map(|config| config.log_format.clone())
        .unwrap_or(LogFormat::Pretty);

    // Initialize logging
    init_logging(&log_format, cli.verbose);

    match &config {
        Ok(config) => tracing::info!(
            provider = %config.speech_provider,
            region = %config.azure_region,
            "Starting booktape v{}",
            env!("CARGO_PKG_VERSION")
        ),
        Err(e) => tracing::debug!(error = %e, "Configuration could not be loaded"),
    }

    match run(cli, config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error_kind = e.kind(), error = %e, "Command failed");
            eprintln!("Error: {}", e);
            ExitCode::from(e.exit_code())
        }
    }
}

fn init_logging(log_format: &LogFormat, verbose: bool) {
    let default_filter = if verbose { "booktape=debug" } else { "booktape=info" };

    if *log_format == LogFormat::Json {
        tracing_subscriber::registry()
            .with(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| default_filter.into()),
            )
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        tracing_subscriber::registry()
            .with(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| default_filter.into()),
            )
            .with(tracing_subscriber::fmt::layer().pretty().with_writer(std::io::stderr))
            .init();
    }
}
