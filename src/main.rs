//! Libdesk - single-user library catalog
//!
//! Runs one command against the catalog stored in the data directory.

use anyhow::Context;
use clap::Parser;
use serde_json::json;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use libdesk::{
    commands::{self, Cli},
    config::{AppConfig, LoggingConfig},
    Library,
};

fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    // Load configuration
    let mut config =
        AppConfig::load(cli.config.as_deref()).context("Failed to load configuration")?;
    if let Some(dir) = &cli.data_dir {
        config.storage.data_dir = dir.clone();
    }

    let status = run(cli, &config);
    std::process::exit(status);
}

/// Run the command and return the process exit status. The log guard is
/// dropped before returning so buffered file output gets flushed.
fn run(cli: Cli, config: &AppConfig) -> i32 {
    let _guard = init_tracing(&config.logging);

    tracing::debug!("Libdesk v{} using {}", env!("CARGO_PKG_VERSION"), config.storage.data_dir.display());

    let json = cli.json;
    let today = cli
        .date
        .unwrap_or_else(|| chrono::Local::now().date_naive());

    let result = Library::open(config)
        .and_then(|mut library| commands::run(cli.command, &mut library, today));

    match result {
        Ok(response) => {
            println!("{}", response.render(json));
            response.status
        }
        Err(e) => {
            tracing::debug!("Command failed: {:?}", e);
            if json {
                println!(
                    "{}",
                    json!({ "error": e.to_string(), "code": e.exit_code() })
                );
            } else {
                eprintln!("Error: {}", e);
            }
            e.exit_code()
        }
    }
}

/// Logs go to stderr, plus a log file when a directory is configured
fn init_tracing(config: &LoggingConfig) -> Option<WorkerGuard> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| format!("libdesk={}", config.level).into());

    let as_json = config.format.eq_ignore_ascii_case("json");
    let text_layer = (!as_json).then(|| fmt::layer().with_writer(std::io::stderr));
    let json_layer = as_json.then(|| fmt::layer().json().with_writer(std::io::stderr));

    let (file_layer, guard) = match &config.directory {
        Some(dir) => {
            let appender = tracing_appender::rolling::never(dir, "libdesk.log");
            let (writer, guard) = tracing_appender::non_blocking(appender);
            (
                Some(fmt::layer().with_ansi(false).with_writer(writer)),
                Some(guard),
            )
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(text_layer)
        .with(json_layer)
        .with(file_layer)
        .init();

    guard
}
