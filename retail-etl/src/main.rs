// retail-etl/src/main.rs

mod cli;
mod commands;

use clap::Parser;
use cli::{Cli, Commands};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // RUST_LOG=debug retail-etl run ... to see the details
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Run {
            project,
            dataset,
            provision,
        } => commands::run::execute(project, dataset, provision).await,
        Commands::Provision { project } => commands::provision::execute(project).await,
        Commands::Inspect {
            project,
            table,
            limit,
        } => commands::inspect::execute(project, table, limit).await,
        Commands::Query { query, project } => commands::query::execute(project, query).await,
        Commands::Clean { project, database } => commands::clean::execute(project, database),
    }
}
