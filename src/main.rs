//! vidbridge CLI entry point.

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};
use vidbridge::cli::{commands, Cli, Commands};
use vidbridge::config::Settings;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Load configuration
    let config_path = match &cli.config {
        Some(path) => Settings::expand_path(path),
        None => Settings::default_config_path(),
    };
    let settings = Settings::load_from(Some(&config_path))?;

    // Initialize logging. stdout carries protocol messages, so logs go to stderr.
    let log_level = if cli.quiet {
        "off".to_string()
    } else {
        match cli.verbose {
            0 => settings.general.log_level.clone(),
            1 => "debug".to_string(),
            _ => "trace".to_string(),
        }
    };

    tracing_subscriber::registry()
        .with(log_filter(cli.quiet, &log_level))
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_ansi(false)
                .with_target(false),
        )
        .init();

    // Execute command
    match cli.command.unwrap_or(Commands::Serve) {
        Commands::Serve => {
            commands::run_serve(settings).await?;
        }

        Commands::Tools => {
            commands::run_tools()?;
        }

        Commands::Doctor => {
            commands::run_doctor(&settings, &config_path).await?;
        }

        Commands::Config { action } => {
            commands::run_config(&action, &settings, &config_path)?;
        }
    }

    Ok(())
}

/// `--quiet` silences everything; otherwise `RUST_LOG` overrides the chosen level.
fn log_filter(quiet: bool, log_level: &str) -> EnvFilter {
    if quiet {
        return EnvFilter::new("off");
    }
    EnvFilter::new(
        std::env::var("RUST_LOG").unwrap_or_else(|_| format!("vidbridge={}", log_level)),
    )
}
