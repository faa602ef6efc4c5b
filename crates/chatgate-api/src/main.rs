//! chatgate entry point.
//!
//! Binary name: `chatgate`
//!
//! Parses CLI arguments, sets up tracing, then either serves the HTTP
//! gateway or runs one of the client/utility commands.

mod cli;
mod http;
mod state;
#[cfg(test)]
mod testing;

use std::path::Path;
use std::time::Duration;

use clap::Parser;
use clap_complete::generate;

use chatgate_infra::config::{load_config, to_toml};
use chatgate_observe::{LogOptions, default_filter, init_tracing, shutdown_tracing};

use cli::{Cli, Commands};
use state::AppState;

/// Upper bound on how often idle sessions are swept.
const MAX_SWEEP_INTERVAL: Duration = Duration::from_secs(60);

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let otel = matches!(cli.command, Commands::Serve { otel: true, .. });
    init_tracing(&LogOptions {
        default_filter: default_filter(cli.verbose, cli.quiet),
        json: cli.log_json,
        otel,
    })
    .map_err(|e| anyhow::anyhow!("failed to initialize tracing: {e}"))?;

    let result = match cli.command {
        Commands::Completions { shell } => {
            let mut cmd = <Cli as clap::CommandFactory>::command();
            generate(shell, &mut cmd, "chatgate", &mut std::io::stdout());
            Ok(())
        }
        Commands::Config { config } => print_config(&config).await,
        Commands::Chat { url, session } => cli::chat::loop_runner::run_chat_loop(&url, session).await,
        Commands::Serve {
            host, port, config, ..
        } => serve(&config, host, port).await,
    };

    shutdown_tracing();
    result
}

async fn print_config(path: &Path) -> anyhow::Result<()> {
    let config = load_config(path).await?;
    print!("{}", to_toml(&config)?);
    Ok(())
}

async fn serve(path: &Path, host: Option<String>, port: Option<u16>) -> anyhow::Result<()> {
    let mut config = load_config(path).await?;
    if let Some(host) = host {
        config.server.host = host;
    }
    if let Some(port) = port {
        config.server.port = port;
    }

    let state = AppState::init(config);
    let addr = format!("{}:{}", state.config.server.host, state.config.server.port);
    let idle_ttl = state.config.conversation.session_idle_ttl_secs;

    let sweeper = (idle_ttl > 0).then(|| {
        let ttl = Duration::from_secs(idle_ttl);
        state
            .gateway
            .sessions()
            .clone()
            .spawn_idle_sweeper(ttl, ttl.min(MAX_SWEEP_INTERVAL))
    });

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(
        %addr,
        provider = state.gateway.provider_name(),
        model = state.gateway.model(),
        "gateway listening"
    );

    println!(
        "  {} chatgate listening on {}",
        console::style("⚡").bold(),
        console::style(format!("http://{addr}")).cyan()
    );
    println!("  {}", console::style("Press Ctrl+C to stop").dim());

    let router = http::router::build_router(state);
    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    if let Some(sweeper) = sweeper {
        sweeper.abort();
    }
    println!("\n  Server stopped.");
    Ok(())
}

/// Wait for Ctrl+C or SIGTERM for graceful shutdown.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "failed to listen for Ctrl+C");
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
                tracing::error!(error = %e, "failed to install SIGTERM handler");
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
}
