//! Chat agents - terminal demos on a hosted chat-completion endpoint
//!
//! A conversation runtime built around a pure state machine: the model
//! answers, a router decides whether the answer asks for a tool, and
//! arithmetic tools feed their results back until the model is done.

mod cli;
mod console;
mod conversation;
mod demos;
mod gateway;
mod llm;
mod router;
mod runtime;
mod state_machine;
mod tools;
mod transcript;

use clap::Parser;
use cli::Cli;
use llm::LlmConfig;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Logs go to stderr so they never interleave with streamed replies
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "chat_agents=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    let config = LlmConfig::from_env().with_model(cli.model);
    tracing::info!(model = %config.model, base_url = %config.base_url, "Configured completion endpoint");

    let service = config.build_service().inspect_err(|e| {
        tracing::error!(error = %e, "Cannot create completion service");
    })?;

    if let Err(e) = demos::run(cli.command, service).await {
        tracing::error!(error = %e, "Session failed");
        return Err(e.into());
    }

    Ok(())
}
