pub mod commands;
pub mod utils;

use clap::{Parser, Subcommand};
use uuid::Uuid;

use crate::config::AppConfig;

#[derive(Parser)]
#[command(name = "eventhubctl")]
#[command(about = "EventHub CLI - database, token and storage utilities for the EventHub API")]
#[command(version)]
pub struct Cli {
    #[arg(long, global = true, help = "Output in JSON format")]
    pub json: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    #[command(about = "Apply pending SQL migrations to DATABASE_URL")]
    Migrate,

    #[command(about = "Mint a bearer token for local testing")]
    Token {
        #[arg(long, help = "User id placed in the token subject")]
        user: Uuid,
        #[arg(long, help = "Email claim")]
        email: Option<String>,
        #[arg(long, help = "Lifetime in hours (defaults to SECURITY_TOKEN_EXPIRY_HOURS)")]
        hours: Option<u64>,
    },

    #[command(about = "Print a time-limited download URL for a storage object")]
    SignUrl {
        #[arg(long, help = "Bucket name (defaults to STORAGE_BUCKET)")]
        bucket: Option<String>,
        #[arg(long, help = "Object path inside the bucket")]
        path: String,
    },

    #[command(about = "Check a running server's /health endpoint")]
    Ping {
        #[arg(long, help = "Base URL of the server", default_value = "http://localhost:3000")]
        url: String,
    },
}

#[derive(Debug, Clone, Copy)]
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
    let config = AppConfig::from_env();

    match cli.command {
        Commands::Migrate => commands::db::migrate(&config, output_format).await,
        Commands::Token { user, email, hours } => commands::auth::token(&config, user, email, hours, output_format),
        Commands::SignUrl { bucket, path } => {
            commands::storage::sign_url(&config, bucket.as_deref(), &path, output_format)
        }
        Commands::Ping { url } => commands::server::ping(&url, output_format).await,
    }
}
