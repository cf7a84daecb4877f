// retail-etl/src/cli.rs
//
// Single source of truth for all CLI definitions (Clap structs).

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "retail-etl")]
#[command(about = "Loads retail orders into a DuckDB star schema", long_about = None)]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

/// Where to find the project and how to override its configuration.
#[derive(Args, Debug, Clone)]
pub struct ProjectArgs {
    /// Project directory (relative paths in the config resolve from here)
    #[arg(long, default_value = ".")]
    pub project_dir: PathBuf,

    /// Explicit config file instead of retail_etl.yaml / retail_etl.yml
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Warehouse file, overrides the configured database path
    #[arg(long)]
    pub db_path: Option<String>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// 🚀 Runs the ETL pipeline (dataset -> dimensions -> facts)
    Run {
        #[command(flatten)]
        project: ProjectArgs,

        /// Dataset file, overrides the configured dataset path
        #[arg(long)]
        dataset: Option<String>,

        /// Drop and recreate the schema before loading
        #[arg(long)]
        provision: bool,
    },

    /// 🏗️ Drops and recreates the star schema
    Provision {
        #[command(flatten)]
        project: ProjectArgs,
    },

    /// 🔍 Inspects a warehouse table (schema + sample rows)
    Inspect {
        #[command(flatten)]
        project: ProjectArgs,

        /// Table name to inspect
        #[arg(long, short)]
        table: String,

        /// Number of sample rows to display
        #[arg(long, default_value = "5")]
        limit: usize,
    },

    /// ⚡ Executes a raw SQL query (Ad-hoc)
    Query {
        query: String,

        #[command(flatten)]
        project: ProjectArgs,
    },

    /// 🧹 Cleans run artifacts (target/ folder)
    Clean {
        #[command(flatten)]
        project: ProjectArgs,

        /// Also delete the warehouse file
        #[arg(long)]
        database: bool,
    },
}
