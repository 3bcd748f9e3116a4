//! Thin HTTP client for the quotation API.
//!
//! No business logic lives here: the client forwards a bearer token it
//! obtains from an injected [`TokenProvider`] and unwraps the response
//! envelope. The only local token inspection is [`ApiClient::role_hint`],
//! an unverified claims read meant for UI selection - the server remains
//! the sole authority for authorization.

use std::sync::{Arc, RwLock};

use chrono::{DateTime, Utc};
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use rust_decimal::Decimal;
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;
use uuid::Uuid;

use crate::auth::{Claims, Role};
use crate::database::models::Quotation;

/// Token storage capability with an explicit lifecycle, injected into the
/// client instead of reaching for ambient global state.
pub trait TokenProvider: Send + Sync {
    fn get(&self) -> Option<String>;
    fn set(&self, token: String);
    fn clear(&self);
}

/// In-memory token slot, the default provider.
#[derive(Default)]
pub struct MemoryTokenStore {
    slot: RwLock<Option<String>>,
}

impl TokenProvider for MemoryTokenStore {
    fn get(&self) -> Option<String> {
        self.slot.read().expect("token store poisoned").clone()
    }

    fn set(&self, token: String) {
        *self.slot.write().expect("token store poisoned") = Some(token);
    }

    fn clear(&self) {
        *self.slot.write().expect("token store poisoned") = None;
    }
}

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("No bearer token set")]
    MissingToken,

    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },

    #[error("Unexpected response shape: {0}")]
    UnexpectedBody(String),

    #[error(transparent)]
    Http(#[from] reqwest::Error),
}

/// Quotation draft as sent over the wire.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuotationDraft {
    pub service: String,
    pub enterprise_name: String,
    pub contact_number: String,
    pub email: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub budget: Decimal,
    pub description: String,
}

/// Status/terms update as sent over the wire.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuotationTermsUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(
        with = "rust_decimal::serde::float_option",
        skip_serializing_if = "Option::is_none"
    )]
    pub final_price: Option<Decimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub proposed_delivery_date: Option<DateTime<Utc>>,
}

pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    tokens: Arc<dyn TokenProvider>,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>, tokens: Arc<dyn TokenProvider>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            tokens,
        }
    }

    pub fn tokens(&self) -> &dyn TokenProvider {
        self.tokens.as_ref()
    }

    /// Unverified role read from the stored token, for UI selection only.
    /// Signature and expiry are deliberately not checked here; every actual
    /// request is re-authorized server-side.
    pub fn role_hint(&self) -> Option<Role> {
        let token = self.tokens.get()?;

        let mut validation = Validation::new(Algorithm::HS256);
        validation.insecure_disable_signature_validation();
        validation.validate_exp = false;

        decode::<Claims>(&token, &DecodingKey::from_secret(&[]), &validation)
            .ok()
            .map(|data| data.claims.role)
    }

    pub async fn health(&self) -> Result<Value, ClientError> {
        let url = format!("{}/health", self.base_url);
        let response = self.http.get(&url).send().await?;
        Ok(response.json::<Value>().await?)
    }

    pub async fn create_quotation(&self, draft: &QuotationDraft) -> Result<Quotation, ClientError> {
        let response = self
            .http
            .post(format!("{}/api/quotations", self.base_url))
            .bearer_auth(self.bearer()?)
            .json(draft)
            .send()
            .await?;
        unwrap_envelope(response).await
    }

    pub async fn list_quotations(
        &self,
        scope: Option<Role>,
        limit: Option<i64>,
    ) -> Result<Vec<Quotation>, ClientError> {
        let mut request = self
            .http
            .get(format!("{}/api/quotations", self.base_url))
            .bearer_auth(self.bearer()?);
        if let Some(scope) = scope {
            request = request.query(&[("scope", scope.as_str())]);
        }
        if let Some(limit) = limit {
            request = request.query(&[("limit", limit)]);
        }
        unwrap_envelope(request.send().await?).await
    }

    pub async fn get_quotation(&self, id: Uuid) -> Result<Quotation, ClientError> {
        let response = self
            .http
            .get(format!("{}/api/quotations/{}", self.base_url, id))
            .bearer_auth(self.bearer()?)
            .send()
            .await?;
        unwrap_envelope(response).await
    }

    pub async fn update_quotation(
        &self,
        id: Uuid,
        update: &QuotationTermsUpdate,
    ) -> Result<Quotation, ClientError> {
        let response = self
            .http
            .put(format!("{}/api/quotations/{}", self.base_url, id))
            .bearer_auth(self.bearer()?)
            .json(update)
            .send()
            .await?;
        unwrap_envelope(response).await
    }

    fn bearer(&self) -> Result<String, ClientError> {
        self.tokens.get().ok_or(ClientError::MissingToken)
    }
}

/// Unwrap the `{"success": true, "data": ...}` envelope, turning error
/// bodies into [`ClientError::Api`].
async fn unwrap_envelope<T: serde::de::DeserializeOwned>(
    response: reqwest::Response,
) -> Result<T, ClientError> {
    let status = response.status().as_u16();
    let body = response.json::<Value>().await?;

    if body.get("success").and_then(Value::as_bool) == Some(true) {
        let data = body
            .get("data")
            .cloned()
            .ok_or_else(|| ClientError::UnexpectedBody("missing data field".to_string()))?;
        serde_json::from_value(data).map_err(|e| ClientError::UnexpectedBody(e.to_string()))
    } else {
        let message = body
            .get("message")
            .and_then(Value::as_str)
            .unwrap_or("unknown error")
            .to_string();
        Err(ClientError::Api { status, message })
    }
}
