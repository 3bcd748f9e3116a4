use std::collections::HashMap;

use axum::{extract::Path, Extension, Json};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json::Value;
use uuid::Uuid;

use crate::database::models::{Quotation, UpdateQuotation};
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult, AuthUser};
use crate::services::quotation_service::{parse_status, QuotationService};

/// Status/terms update payload. Loosely typed so mistyped values become
/// per-field validation errors.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateQuotationRequest {
    pub status: Option<String>,
    pub final_price: Option<Value>,
    pub notes: Option<String>,
    pub proposed_delivery_date: Option<String>,
}

/// GET /api/quotations/:id - Fetch a single quotation
pub async fn record_get(
    Extension(user): Extension<AuthUser>,
    Path(id): Path<Uuid>,
) -> ApiResult<Quotation> {
    let quotation = QuotationService::get_by_id(&user.actor(), id).await?;
    Ok(ApiResponse::success(quotation))
}

/// PUT /api/quotations/:id - Apply a status transition and/or terms
pub async fn record_put(
    Extension(user): Extension<AuthUser>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateQuotationRequest>,
) -> ApiResult<Quotation> {
    let update = validate_update_payload(payload)?;
    let quotation = QuotationService::update_status_and_terms(&user.actor(), id, update).await?;
    Ok(ApiResponse::success(quotation))
}

fn validate_update_payload(payload: UpdateQuotationRequest) -> Result<UpdateQuotation, ApiError> {
    let status = parse_status(payload.status.as_deref())?;

    let mut field_errors = HashMap::new();

    let final_price = match payload.final_price {
        None => None,
        Some(value) if !value.is_number() => {
            field_errors.insert(
                "finalPrice".to_string(),
                "Final price must be numeric".to_string(),
            );
            None
        }
        Some(value) => match serde_json::from_value::<Decimal>(value) {
            Ok(price) => Some(price),
            Err(_) => {
                field_errors.insert(
                    "finalPrice".to_string(),
                    "Final price must be numeric".to_string(),
                );
                None
            }
        },
    };

    let proposed_delivery_date = match payload.proposed_delivery_date.as_deref() {
        None => None,
        Some(raw) => match DateTime::parse_from_rfc3339(raw) {
            Ok(dt) => Some(dt.with_timezone(&Utc)),
            Err(_) => {
                field_errors.insert(
                    "proposedDeliveryDate".to_string(),
                    format!("Not an RFC 3339 timestamp: {}", raw),
                );
                None
            }
        },
    };

    if !field_errors.is_empty() {
        return Err(ApiError::validation_error(
            "Invalid field format",
            Some(field_errors),
        ));
    }

    Ok(UpdateQuotation {
        status,
        final_price,
        notes: payload.notes,
        proposed_delivery_date,
    })
}
