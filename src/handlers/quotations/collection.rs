use std::collections::HashMap;
use std::str::FromStr;

use axum::{extract::Query, Extension, Json};
use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json::Value;

use crate::auth::Role;
use crate::config;
use crate::database::models::{NewQuotation, Quotation};
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult, AuthUser};
use crate::services::quotation_service::QuotationService;

/// Creation payload. Fields arrive optional so that missing or mistyped
/// values produce per-field validation errors instead of a body rejection.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateQuotationRequest {
    pub service: Option<String>,
    pub enterprise_name: Option<String>,
    pub contact_number: Option<String>,
    pub email: Option<String>,
    pub budget: Option<Value>,
    pub description: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    /// Requested listing scope, one of the role names. Defaults to the
    /// caller's own role; the gate denies anything broader.
    pub scope: Option<String>,
    pub limit: Option<i64>,
}

/// POST /api/quotations - Submit a new quotation request
pub async fn collection_post(
    Extension(user): Extension<AuthUser>,
    Json(payload): Json<CreateQuotationRequest>,
) -> ApiResult<Quotation> {
    let input = validate_create_payload(payload)?;
    let quotation = QuotationService::create(&user.actor(), input).await?;
    Ok(ApiResponse::created(quotation))
}

/// GET /api/quotations - Role-scoped listing
pub async fn collection_get(
    Extension(user): Extension<AuthUser>,
    Query(query): Query<ListQuery>,
) -> ApiResult<Vec<Quotation>> {
    let cfg = config::config();
    let limit = query
        .limit
        .unwrap_or(cfg.api.default_list_limit)
        .clamp(1, cfg.api.max_list_limit);

    let scope = match query.scope.as_deref() {
        Some(s) => Role::from_str(s)
            .map_err(|_| ApiError::bad_request(format!("Unknown listing scope: {}", s)))?,
        None => user.role,
    };

    let actor = user.actor();
    let rows = match scope {
        Role::User => QuotationService::list_for_user(&actor, limit).await?,
        Role::Admin => QuotationService::list_for_admin(&actor, limit).await?,
        Role::Superadmin => QuotationService::list_for_superadmin(&actor, limit).await?,
    };

    Ok(ApiResponse::success(rows))
}

fn validate_create_payload(payload: CreateQuotationRequest) -> Result<NewQuotation, ApiError> {
    let mut field_errors = HashMap::new();

    let service = require_string("service", payload.service, &mut field_errors);
    let enterprise_name =
        require_string("enterpriseName", payload.enterprise_name, &mut field_errors);
    let contact_number = require_string("contactNumber", payload.contact_number, &mut field_errors);
    let email = require_string("email", payload.email, &mut field_errors);
    let description = require_string("description", payload.description, &mut field_errors);

    let budget = match payload.budget {
        None => {
            field_errors.insert("budget".to_string(), "This field is required".to_string());
            Decimal::ZERO
        }
        Some(value) if !value.is_number() => {
            field_errors.insert("budget".to_string(), "Budget must be numeric".to_string());
            Decimal::ZERO
        }
        Some(value) => serde_json::from_value::<Decimal>(value).unwrap_or_else(|_| {
            field_errors.insert("budget".to_string(), "Budget must be numeric".to_string());
            Decimal::ZERO
        }),
    };

    if !field_errors.is_empty() {
        return Err(ApiError::validation_error(
            "Missing required fields",
            Some(field_errors),
        ));
    }

    Ok(NewQuotation {
        service,
        enterprise_name,
        contact_number,
        email,
        budget,
        description,
    })
}

fn require_string(
    name: &str,
    value: Option<String>,
    field_errors: &mut HashMap<String, String>,
) -> String {
    match value {
        Some(v) => v,
        None => {
            field_errors.insert(name.to_string(), "This field is required".to_string());
            String::new()
        }
    }
}
