use clap::Subcommand;
use uuid::Uuid;

use crate::auth;
use crate::cli::OutputFormat;

#[derive(Subcommand)]
pub enum TokenCommands {
    #[command(about = "Issue a session token signed with the local JWT_SECRET")]
    Issue {
        #[arg(long, help = "Principal id (UUID)")]
        user_id: Uuid,
        #[arg(long, default_value = "Local Operator")]
        name: String,
        #[arg(long, default_value = "operator@localhost")]
        email: String,
    },

    #[command(about = "Verify a token and print its claims")]
    Inspect {
        #[arg(help = "The token to inspect")]
        token: String,
    },
}

pub async fn handle(cmd: TokenCommands, output_format: OutputFormat) -> anyhow::Result<()> {
    let codec = auth::codec();

    match cmd {
        TokenCommands::Issue {
            user_id,
            name,
            email,
        } => {
            let token = codec.issue(user_id, &name, &email)?;

            match output_format {
                OutputFormat::Json => println!(
                    "{}",
                    serde_json::json!({ "token": token, "expiresIn": codec.ttl_seconds() })
                ),
                OutputFormat::Text => {
                    println!("{}", token);
                    eprintln!("valid for {}s", codec.ttl_seconds());
                }
            }
            Ok(())
        }
        TokenCommands::Inspect { token } => {
            let claims = codec
                .verify(&token)
                .map_err(|_| anyhow::anyhow!("token is invalid or expired"))?;

            match output_format {
                OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&claims)?),
                OutputFormat::Text => {
                    println!("subject: {}", claims.sub);
                    println!("name:    {}", claims.name);
                    println!("email:   {}", claims.email);
                    println!("issued:  {}", claims.iat);
                    println!("expires: {}", claims.exp);
                }
            }
            Ok(())
        }
    }
}
