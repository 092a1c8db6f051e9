mod cli;
mod config;
mod evaluate;
mod logging;
mod prompt;
mod state;
#[cfg(test)]
mod test_support;
mod web;

use crate::cli::Args;
use crate::config::{load_console_config, resolve_api_key};
use crate::evaluate::Evaluator;
use crate::logging::init_tracing;
use crate::state::SessionStore;
use crate::web::{build_router, AppState};
use anyhow::Context;
use clap::Parser;
use llm_client::LlmClient;
use tokio::net::TcpListener;
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    let _log_guard = init_tracing(args.log_dir.as_deref(), args.log_to_stderr)?;

    info!(
        listen_addr = %args.listen_addr,
        config = %args.config.display(),
        "console starting"
    );
    let config = load_console_config(&args.config)?;
    let server_api_key = resolve_api_key(&config, |name| std::env::var(name).ok());
    let client = LlmClient::new(config.llm.client).context("failed to build llm client")?;
    info!(
        llm_url = %client.url(),
        model = %client.config().model,
        server_api_key = server_api_key.is_some(),
        max_sessions = config.server.max_sessions,
        "evaluator configured"
    );
    let state = AppState::new(
        SessionStore::new(config.server.max_sessions),
        Evaluator::new(client),
        server_api_key,
    );
    let app = build_router(state);

    let listener = TcpListener::bind(&args.listen_addr)
        .await
        .with_context(|| format!("failed to bind {}", args.listen_addr))?;
    info!(addr = %args.listen_addr, "console listening");
    axum::serve(listener, app)
        .with_graceful_shutdown(wait_for_shutdown())
        .await?;
    info!("console shutting down");
    Ok(())
}

async fn wait_for_shutdown() {
    let _ = tokio::signal::ctrl_c().await;
    info!("shutdown signal received");
}
