use std::str::FromStr;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use clap::{Args, Subcommand};
use rust_decimal::Decimal;
use uuid::Uuid;

use crate::auth::Role;
use crate::cli::utils::{output_success, output_value};
use crate::cli::OutputFormat;
use crate::client::{ApiClient, MemoryTokenStore, QuotationDraft, QuotationTermsUpdate, TokenProvider};

#[derive(Args)]
pub struct Connection {
    #[arg(long, default_value = "http://localhost:3000")]
    pub server: String,

    #[arg(long, help = "Bearer token for the API; falls back to CRM_TOKEN")]
    pub token: Option<String>,
}

impl Connection {
    fn client(&self) -> anyhow::Result<ApiClient> {
        let token = match &self.token {
            Some(t) => t.clone(),
            None => std::env::var("CRM_TOKEN")
                .map_err(|_| anyhow::anyhow!("No token given; pass --token or set CRM_TOKEN"))?,
        };

        let tokens: Arc<dyn TokenProvider> = Arc::new(MemoryTokenStore::default());
        tokens.set(token);
        Ok(ApiClient::new(self.server.as_str(), tokens))
    }
}

#[derive(Subcommand)]
pub enum QuotationCommands {
    #[command(about = "List quotations visible to the caller's role")]
    List {
        #[command(flatten)]
        conn: Connection,

        #[arg(long, help = "Listing scope: user, admin or superadmin")]
        scope: Option<String>,

        #[arg(long)]
        limit: Option<i64>,
    },

    #[command(about = "Fetch a quotation by id")]
    Get {
        #[command(flatten)]
        conn: Connection,

        id: Uuid,
    },

    #[command(about = "Submit a new quotation request")]
    Create {
        #[command(flatten)]
        conn: Connection,

        #[arg(long)]
        service: String,
        #[arg(long)]
        enterprise_name: String,
        #[arg(long)]
        contact_number: String,
        #[arg(long)]
        email: String,
        #[arg(long)]
        budget: Decimal,
        #[arg(long)]
        description: String,
    },

    #[command(about = "Update status and negotiated terms")]
    Update {
        #[command(flatten)]
        conn: Connection,

        id: Uuid,

        #[arg(long, help = "New status: pending, approved, rejected or completed")]
        status: Option<String>,
        #[arg(long)]
        final_price: Option<Decimal>,
        #[arg(long)]
        notes: Option<String>,
        #[arg(long, help = "RFC 3339 timestamp")]
        delivery_date: Option<String>,
    },
}

pub async fn handle(cmd: QuotationCommands, format: &OutputFormat) -> anyhow::Result<()> {
    match cmd {
        QuotationCommands::List { conn, scope, limit } => {
            let scope = scope
                .map(|s| Role::from_str(&s).map_err(|e| anyhow::anyhow!(e)))
                .transpose()?;
            let rows = conn.client()?.list_quotations(scope, limit).await?;
            output_value(&rows)
        }

        QuotationCommands::Get { conn, id } => {
            let quotation = conn.client()?.get_quotation(id).await?;
            output_value(&quotation)
        }

        QuotationCommands::Create {
            conn,
            service,
            enterprise_name,
            contact_number,
            email,
            budget,
            description,
        } => {
            let draft = QuotationDraft {
                service,
                enterprise_name,
                contact_number,
                email,
                budget,
                description,
            };
            let quotation = conn.client()?.create_quotation(&draft).await?;
            output_success(format, "Quotation created", None)?;
            output_value(&quotation)
        }

        QuotationCommands::Update {
            conn,
            id,
            status,
            final_price,
            notes,
            delivery_date,
        } => {
            let proposed_delivery_date = delivery_date
                .map(|raw| {
                    DateTime::parse_from_rfc3339(&raw)
                        .map(|dt| dt.with_timezone(&Utc))
                        .map_err(|e| anyhow::anyhow!("invalid --delivery-date: {}", e))
                })
                .transpose()?;

            let update = QuotationTermsUpdate {
                status,
                final_price,
                notes,
                proposed_delivery_date,
            };
            let quotation = conn.client()?.update_quotation(id, &update).await?;
            output_success(format, "Quotation updated", None)?;
            output_value(&quotation)
        }
    }
}
