use clap::Subcommand;
use serde_json::json;
use uuid::Uuid;

use crate::auth::{encode_claims, Claims, Role};
use crate::cli::utils::output_success;
use crate::cli::OutputFormat;
use crate::config;

#[derive(Subcommand)]
pub enum TokenCommands {
    #[command(about = "Mint a development token signed with the configured secret")]
    Mint {
        #[arg(long, help = "Role claim: user, admin or superadmin")]
        role: Role,

        #[arg(long, help = "Identity claim; random when omitted")]
        user_id: Option<Uuid>,

        #[arg(long, help = "Tenant claim; random when omitted")]
        tenant: Option<Uuid>,
    },

    #[command(about = "Decode a token without verification (UI hint only)")]
    Inspect {
        #[arg(help = "The token to decode")]
        token: String,
    },
}

// clap needs ValueEnum-ish parsing; Role already implements FromStr
impl clap::builder::ValueParserFactory for Role {
    type Parser = clap::builder::ValueParser;

    fn value_parser() -> Self::Parser {
        clap::builder::ValueParser::new(|s: &str| s.parse::<Role>())
    }
}

pub async fn handle(cmd: TokenCommands, format: &OutputFormat) -> anyhow::Result<()> {
    match cmd {
        TokenCommands::Mint {
            role,
            user_id,
            tenant,
        } => {
            let secret = &config::config().security.jwt_secret;
            if secret.is_empty() {
                anyhow::bail!("JWT secret not configured; set JWT_SECRET");
            }

            let sub = user_id.unwrap_or_else(Uuid::new_v4);
            let tenant = tenant.unwrap_or_else(Uuid::new_v4);
            let claims = Claims::new(sub, tenant, role);
            let token = encode_claims(&claims, secret)?;

            output_success(
                format,
                "Token minted",
                Some(json!({
                    "token": token,
                    "role": role.as_str(),
                    "user_id": sub,
                    "tenant": tenant,
                    "expires_at": claims.exp,
                })),
            )
        }
        TokenCommands::Inspect { token } => {
            use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};

            let mut validation = Validation::new(Algorithm::HS256);
            validation.insecure_disable_signature_validation();
            validation.validate_exp = false;

            let data = decode::<Claims>(&token, &DecodingKey::from_secret(&[]), &validation)?;
            output_success(
                format,
                "Token decoded (signature NOT verified)",
                Some(json!({
                    "user_id": data.claims.sub,
                    "tenant": data.claims.tenant,
                    "role": data.claims.role.as_str(),
                    "issued_at": data.claims.iat,
                    "expires_at": data.claims.exp,
                })),
            )
        }
    }
}
