pub mod commands;

use clap::{Parser, Subcommand};
use serde::{Deserialize, Serialize};

#[derive(Parser)]
#[command(name = "storykeep")]
#[command(about = "Storykeep CLI - operations companion for the Storykeep API")]
#[command(version)]
pub struct Cli {
    #[arg(long, global = true, help = "Output in human-readable text format")]
    pub text: bool,

    #[arg(long, global = true, help = "Output in JSON format")]
    pub json: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    #[command(about = "Remote server checks")]
    Server {
        #[command(subcommand)]
        cmd: commands::server::ServerCommands,
    },

    #[command(about = "Session token utilities")]
    Token {
        #[command(subcommand)]
        cmd: commands::token::TokenCommands,
    },

    #[command(about = "Database maintenance")]
    Db {
        #[command(subcommand)]
        cmd: commands::db::DbCommands,
    },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum OutputFormat {
    Text,
    Json,
}

impl OutputFormat {
    pub fn from_cli(cli: &Cli) -> Self {
        if cli.json {
            OutputFormat::Json
        } else {
            OutputFormat::Text
        }
    }
}

pub async fn run(cli: Cli) -> anyhow::Result<()> {
    let output_format = OutputFormat::from_cli(&cli);

    match cli.command {
        Commands::Server { cmd } => commands::server::handle(cmd, output_format).await,
        Commands::Token { cmd } => commands::token::handle(cmd, output_format).await,
        Commands::Db { cmd } => commands::db::handle(cmd, output_format).await,
    }
}
