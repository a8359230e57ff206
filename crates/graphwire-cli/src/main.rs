//! Graphwire CLI - Command line client for a remote graph database

use std::sync::Arc;

use clap::{Parser, Subcommand};
use graphwire_client::Client;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

mod commands;
mod config;
mod output;

use commands::{completions, config as config_cmd, node, relationship};
use output::OutputFormat;

#[derive(Parser)]
#[command(name = "graphwire")]
#[command(author, version, about = "Create, inspect and delete nodes and relationships in a graph database")]
pub struct Cli {
    /// Database root, e.g. http://localhost:7474/db/data
    #[arg(short, long, env = "GRAPHWIRE_ENDPOINT", global = true)]
    pub endpoint: Option<String>,

    /// Output format: text, json
    #[arg(short, long, default_value = "text", global = true)]
    pub format: String,

    /// Verbosity level (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress output except errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    pub fn output_format(&self) -> OutputFormat {
        OutputFormat::from(self.format.as_str())
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// Manage nodes
    Node(node::NodeArgs),
    /// Manage relationships
    Rel(relationship::RelArgs),
    /// Manage configuration
    Config(config_cmd::ConfigArgs),
    /// Generate shell completions
    Completions(completions::CompletionsArgs),
}

/// Application context with a connected client
pub struct AppContext {
    pub client: Arc<Client>,
}

impl AppContext {
    pub fn new(cli: &Cli) -> anyhow::Result<Self> {
        let mut client_config = config::load()?;
        if let Some(endpoint) = &cli.endpoint {
            client_config.endpoint = endpoint.trim_end_matches('/').to_string();
        }
        tracing::debug!("Using endpoint: {}", client_config.endpoint);

        Ok(Self {
            client: Client::connect(&client_config)?,
        })
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Set up logging based on verbosity
    let filter = match cli.verbose {
        0 if cli.quiet => "error",
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()))
        .init();

    tracing::debug!("Starting graphwire CLI");

    match &cli.command {
        Commands::Node(args) => {
            let ctx = AppContext::new(&cli)?;
            node::run(args, &cli, &ctx).await?
        }
        Commands::Rel(args) => {
            let ctx = AppContext::new(&cli)?;
            relationship::run(args, &cli, &ctx).await?
        }
        Commands::Config(args) => config_cmd::run(args)?,
        Commands::Completions(args) => completions::run(args)?,
    }

    Ok(())
}
