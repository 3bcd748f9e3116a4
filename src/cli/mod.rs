pub mod commands;
pub mod utils;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "crm")]
#[command(about = "CRM CLI - Command-line interface for the quotation API")]
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
    #[command(about = "Development token management")]
    Token {
        #[command(subcommand)]
        cmd: commands::token::TokenCommands,
    },

    #[command(about = "Remote server checks")]
    Server {
        #[command(subcommand)]
        cmd: commands::server::ServerCommands,
    },

    #[command(about = "Quotation operations")]
    Quotations {
        #[command(subcommand)]
        cmd: commands::quotations::QuotationCommands,
    },
}

#[derive(Debug, Clone, Copy)]
pub enum OutputFormat {
    Text,
    Json,
}

impl Cli {
    pub fn output_format(&self) -> OutputFormat {
        if self.json {
            OutputFormat::Json
        } else {
            OutputFormat::Text
        }
    }
}

pub async fn run(cli: Cli) -> anyhow::Result<()> {
    let format = cli.output_format();

    match cli.command {
        Commands::Token { cmd } => commands::token::handle(cmd, &format).await,
        Commands::Server { cmd } => commands::server::handle(cmd, &format).await,
        Commands::Quotations { cmd } => commands::quotations::handle(cmd, &format).await,
    }
}
