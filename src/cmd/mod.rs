mod connectors;
mod export;

use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::{generate, Shell};
use std::io;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "sql-catalog")]
#[command(author = "Helge Sverre <helge.sverre@gmail.com>")]
#[command(version)]
#[command(about = "Build a database catalog from SQL DDL and export it as JSON", long_about = None)]
pub struct Cli {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Log level: error, warn, info, debug, trace (RUST_LOG also works)
    #[arg(long, global = true)]
    pub log_level: Option<log::Level>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Load a SQL schema dump and export its catalog as JSON
    Export {
        /// Input SQL file with CREATE TABLE / ALTER TABLE / CREATE INDEX statements
        file: PathBuf,

        /// Output JSON file (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Connector server id: sqlite, mysql, postgresql (default: sqlite)
        #[arg(short, long)]
        server: Option<String>,

        /// Connection URL; selects the connector when --server is not given
        #[arg(long)]
        url: Option<String>,

        /// YAML file with connection settings (server, url, database, host, port)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Database name recorded in the catalog (default: input file stem)
        #[arg(short, long)]
        database: Option<String>,

        /// Use random UUID object identifiers instead of sequential ones
        #[arg(long)]
        uuid_ids: bool,

        /// Write compact JSON instead of pretty-printed
        #[arg(long)]
        compact: bool,
    },

    /// List registered database connectors and their options
    Connectors {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Generate shell completion scripts
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

pub fn run(cli: Cli) -> anyhow::Result<()> {
    match cli.command {
        Commands::Export {
            file,
            output,
            server,
            url,
            config,
            database,
            uuid_ids,
            compact,
        } => export::run(export::ExportArgs {
            file,
            output,
            server,
            url,
            config,
            database,
            uuid_ids,
            compact,
        }),
        Commands::Connectors { json } => connectors::run(json),
        Commands::Completions { shell } => {
            generate(
                shell,
                &mut Cli::command(),
                "sql-catalog",
                &mut io::stdout(),
            );
            Ok(())
        }
    }
}
