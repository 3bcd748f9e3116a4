use std::sync::Arc;

use clap::Subcommand;
use serde_json::json;

use crate::cli::utils::{output_error, output_success};
use crate::cli::OutputFormat;
use crate::client::{ApiClient, MemoryTokenStore};

#[derive(Subcommand)]
pub enum ServerCommands {
    #[command(about = "Ping a server's health endpoint")]
    Ping {
        #[arg(long, default_value = "http://localhost:3000")]
        server: String,
    },
}

pub async fn handle(cmd: ServerCommands, format: &OutputFormat) -> anyhow::Result<()> {
    match cmd {
        ServerCommands::Ping { server } => {
            let client = ApiClient::new(server.as_str(), Arc::new(MemoryTokenStore::default()));
            match client.health().await {
                Ok(body) => output_success(
                    format,
                    &format!("Server {} is reachable", server),
                    Some(json!({ "health": body })),
                ),
                Err(e) => output_error(format, &format!("{}", e), Some("UNREACHABLE")),
            }
        }
    }
}
