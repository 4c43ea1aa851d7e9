use clap::Subcommand;

use crate::cli::OutputFormat;
use crate::database::Database;

#[derive(Subcommand)]
pub enum DbCommands {
    #[command(about = "Apply pending migrations (uses DATABASE_URL)")]
    Migrate,

    #[command(about = "Ping the database")]
    Health,
}

pub async fn handle(cmd: DbCommands, output_format: OutputFormat) -> anyhow::Result<()> {
    match cmd {
        DbCommands::Migrate => {
            Database::migrate().await?;
            match output_format {
                OutputFormat::Json => println!("{}", serde_json::json!({ "migrated": true })),
                OutputFormat::Text => println!("migrations are up to date"),
            }
            Ok(())
        }
        DbCommands::Health => match Database::health_check().await {
            Ok(()) => {
                match output_format {
                    OutputFormat::Json => println!("{}", serde_json::json!({ "database": "ok" })),
                    OutputFormat::Text => println!("database: ok"),
                }
                Ok(())
            }
            Err(e) => anyhow::bail!("database unreachable: {}", e),
        },
    }
}
