use clap::Subcommand;

use crate::cli::OutputFormat;

const DEFAULT_SERVER: &str = "http://localhost:3000";

#[derive(Subcommand)]
pub enum ServerCommands {
    #[command(about = "Check server health from the /health endpoint")]
    Health {
        #[arg(long, default_value = DEFAULT_SERVER, help = "Server base URL")]
        server: String,
    },

    #[command(about = "Show server information from the API root endpoint")]
    Info {
        #[arg(long, default_value = DEFAULT_SERVER, help = "Server base URL")]
        server: String,
    },
}

pub async fn handle(cmd: ServerCommands, output_format: OutputFormat) -> anyhow::Result<()> {
    match cmd {
        ServerCommands::Health { server } => {
            let url = format!("{}/health", server.trim_end_matches('/'));
            let response = reqwest::get(&url).await?;
            let status = response.status();
            let body: serde_json::Value = response.json().await?;

            match output_format {
                OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&body)?),
                OutputFormat::Text => {
                    let database = body["data"]["database"]
                        .as_str()
                        .unwrap_or("unknown")
                        .to_string();
                    println!("{} -> {} (database: {})", url, status, database);
                }
            }

            if !status.is_success() {
                anyhow::bail!("server reported {}", status);
            }
            Ok(())
        }
        ServerCommands::Info { server } => {
            let url = format!("{}/", server.trim_end_matches('/'));
            let body: serde_json::Value = reqwest::get(&url).await?.json().await?;

            match output_format {
                OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&body)?),
                OutputFormat::Text => {
                    let data = &body["data"];
                    println!(
                        "{} {}",
                        data["name"].as_str().unwrap_or("unknown"),
                        data["version"].as_str().unwrap_or("?")
                    );
                    if let Some(endpoints) = data["endpoints"].as_object() {
                        for (name, route) in endpoints {
                            println!("  {:10} {}", name, route.as_str().unwrap_or(""));
                        }
                    }
                }
            }
            Ok(())
        }
    }
}
