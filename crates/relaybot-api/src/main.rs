//! relaybot CLI and HTTP relay entry point.
//!
//! Binary name: `relaybot`
//!
//! Loads layered configuration, sets up tracing, then either serves the
//! relay, runs the terminal chat surface, or migrates the transcript
//! database.

mod cli;
mod http;
mod state;
#[cfg(test)]
mod test_support;

use std::path::Path;

use clap::Parser;
use clap_complete::generate;

use relaybot_infra::classifier::dialogflow::TokenSource;
use relaybot_infra::config::load_config;
use relaybot_infra::sqlite::pool::DatabasePool;
use relaybot_observe::tracing_setup::{default_filter, init_tracing, shutdown_tracing};
use relaybot_types::config::RelayConfig;
use relaybot_types::error::ConfigError;

use cli::{Cli, Commands};
use state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Shell completions don't need config or logging
    if let Commands::Completions { shell } = &cli.command {
        let mut cmd = <Cli as clap::CommandFactory>::command();
        generate(*shell, &mut cmd, "relaybot", &mut std::io::stdout());
        return Ok(());
    }

    let loaded = load_config(&cli.config).await;
    let mut config = loaded.as_ref().cloned().unwrap_or_default();
    if let Some(format) = cli.log_format {
        config.logging.format = format;
    }
    config.logging.otel |= cli.otel;

    init_tracing(
        &config.logging,
        default_filter(cli.verbose, cli.quiet),
    )
    .map_err(|e| anyhow::anyhow!(e))?;

    match &loaded {
        Ok(_) => tracing::debug!(path = %cli.config.display(), "Configuration loaded"),
        Err(e) => tracing::warn!(error = %e, "Ignoring config file, using defaults"),
    }

    let result = run(cli.command, config).await;
    shutdown_tracing();
    result
}

async fn run(command: Commands, mut config: RelayConfig) -> anyhow::Result<()> {
    match command {
        Commands::Serve(args) => {
            args.apply(&mut config);
            config.validate()?;
            let key_file = config.classifier.credentials_file.as_deref().map(Path::new);
            let tokens = TokenSource::resolve(args.access_token(), key_file)
                .await
                .map_err(|e| ConfigError::MissingCredentials(e.to_string()))?;

            let state = AppState::init(&config, tokens).await?;
            let db_pool = state.db_pool.clone();

            let addr = config.server.bind_addr();
            let listener = tokio::net::TcpListener::bind(&addr).await?;

            println!(
                "  {} relaybot listening on {}",
                console::style("⚡").bold(),
                console::style(format!("http://{addr}")).cyan()
            );
            println!("  {}", console::style("Press Ctrl+C to stop").dim());

            let router = http::router::build_router(state, &config.server.web_dir);

            axum::serve(listener, router)
                .with_graceful_shutdown(shutdown_signal())
                .await?;

            db_pool.close().await;
            println!("\n  Server stopped.");
        }

        Commands::Chat { url } => {
            cli::chat::run(&url).await?;
        }

        Commands::Migrate { database_url } => {
            let url = database_url.unwrap_or(config.database.url);
            let pool = DatabasePool::new(&url).await?;
            pool.close().await;
            println!(
                "  {} Transcript schema is up to date",
                console::style("✓").green()
            );
        }

        Commands::Completions { .. } => unreachable!("handled above"),
    }

    Ok(())
}

/// Wait for Ctrl+C or SIGTERM for graceful shutdown.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}
