//! tool-rounds - command line entry point
//!
//! Answers one query through the orchestrator and prints the answer.

use std::io::Read;

use clap::Parser;
use tool_rounds::{
    agent::{Orchestrator, RespondOptions},
    config::Config,
    tools::ToolRegistry,
};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Debug, Parser)]
#[command(name = "tool-rounds", version, about = "Answer a query with bounded tool rounds")]
struct Args {
    /// Query text. Read from stdin when omitted.
    query: Vec<String>,

    /// Summary of the earlier conversation.
    #[arg(long)]
    context: Option<String>,

    /// Tool rounds before the forced synthesis call. Overrides MAX_TOOL_ROUNDS.
    #[arg(long)]
    max_rounds: Option<usize>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "tool_rounds=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let args = Args::parse();

    let config = Config::from_env()?;

    let query = if args.query.is_empty() {
        let mut buf = String::new();
        std::io::stdin().read_to_string(&mut buf)?;
        buf
    } else {
        args.query.join(" ")
    };

    let orchestrator = Orchestrator::from_config(&config)?;
    info!(
        "Loaded configuration: model={} max_rounds={}",
        orchestrator.model(),
        args.max_rounds.unwrap_or(config.max_tool_rounds)
    );
    let registry = ToolRegistry::new();

    let mut options = RespondOptions::default()
        .with_max_rounds(args.max_rounds.unwrap_or(config.max_tool_rounds));
    if let Some(context) = args.context.as_deref() {
        options = options.with_prior_context(context);
    }
    if !registry.is_empty() {
        options = options.with_tools(registry.toolset());
    }

    let answer = orchestrator.respond(query.trim(), options).await?;
    println!("{answer}");

    Ok(())
}
