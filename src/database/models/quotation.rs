use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::collections::HashMap;
use uuid::Uuid;

use crate::auth::gate::Ownership;

/// Approval lifecycle of a quotation.
///
/// Transitions are guarded: pending may move to approved or rejected,
/// approved may move to completed, and rejected/completed are terminal.
/// Restating the current status is allowed so terms-only updates can
/// carry it unchanged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(type_name = "quotation_status", rename_all = "lowercase")]
pub enum QuotationStatus {
    Pending,
    Approved,
    Rejected,
    Completed,
}

impl QuotationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            QuotationStatus::Pending => "pending",
            QuotationStatus::Approved => "approved",
            QuotationStatus::Rejected => "rejected",
            QuotationStatus::Completed => "completed",
        }
    }

    pub fn can_transition_to(self, next: QuotationStatus) -> bool {
        use QuotationStatus::*;
        if self == next {
            return true;
        }
        matches!((self, next), (Pending, Approved) | (Pending, Rejected) | (Approved, Completed))
    }
}

impl std::str::FromStr for QuotationStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(QuotationStatus::Pending),
            "approved" => Ok(QuotationStatus::Approved),
            "rejected" => Ok(QuotationStatus::Rejected),
            "completed" => Ok(QuotationStatus::Completed),
            other => Err(format!("unknown status: {}", other)),
        }
    }
}

impl std::fmt::Display for QuotationStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A customer's service request and its negotiation state.
///
/// Serialized in the camelCase wire shape the API exposes.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Quotation {
    pub id: Uuid,
    pub service: String,
    pub enterprise_name: String,
    pub contact_number: String,
    pub email: String,
    // Money fields travel as JSON numbers
    #[serde(with = "rust_decimal::serde::float")]
    pub budget: Decimal,
    pub description: String,
    pub status: QuotationStatus,
    #[serde(with = "rust_decimal::serde::float_option")]
    pub final_price: Option<Decimal>,
    pub notes: Option<String>,
    pub proposed_delivery_date: Option<DateTime<Utc>>,
    pub created_by: Uuid,
    pub tenant_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Quotation {
    pub fn ownership(&self) -> Ownership {
        Ownership {
            created_by: self.created_by,
            tenant_id: self.tenant_id,
        }
    }
}

/// Validated input for creating a quotation.
#[derive(Debug, Clone)]
pub struct NewQuotation {
    pub service: String,
    pub enterprise_name: String,
    pub contact_number: String,
    pub email: String,
    pub budget: Decimal,
    pub description: String,
}

impl NewQuotation {
    /// Check field contents. Presence of the fields themselves is enforced
    /// at the request boundary; this rejects empty or malformed values.
    pub fn validate(&self) -> Result<(), HashMap<String, String>> {
        let mut field_errors = HashMap::new();

        for (name, value) in [
            ("service", &self.service),
            ("enterpriseName", &self.enterprise_name),
            ("contactNumber", &self.contact_number),
            ("description", &self.description),
        ] {
            if value.trim().is_empty() {
                field_errors.insert(name.to_string(), "This field must not be empty".to_string());
            }
        }

        if !looks_like_email(&self.email) {
            field_errors.insert(
                "email".to_string(),
                format!("Not a valid email address: {}", self.email),
            );
        }

        if self.budget <= Decimal::ZERO {
            field_errors.insert(
                "budget".to_string(),
                "Budget must be a positive number".to_string(),
            );
        }

        if field_errors.is_empty() {
            Ok(())
        } else {
            Err(field_errors)
        }
    }
}

fn looks_like_email(s: &str) -> bool {
    match s.split_once('@') {
        Some((local, domain)) => !local.is_empty() && domain.contains('.') && !domain.starts_with('.'),
        None => false,
    }
}

/// Status/terms changes applied by an admin or superadmin.
#[derive(Debug, Clone, Default)]
pub struct UpdateQuotation {
    pub status: Option<QuotationStatus>,
    pub final_price: Option<Decimal>,
    pub notes: Option<String>,
    pub proposed_delivery_date: Option<DateTime<Utc>>,
}

impl UpdateQuotation {
    pub fn is_empty(&self) -> bool {
        self.status.is_none()
            && self.final_price.is_none()
            && self.notes.is_none()
            && self.proposed_delivery_date.is_none()
    }

    pub fn validate(&self) -> Result<(), HashMap<String, String>> {
        let mut field_errors = HashMap::new();

        if let Some(price) = self.final_price {
            if price <= Decimal::ZERO {
                field_errors.insert(
                    "finalPrice".to_string(),
                    "Final price must be a positive number".to_string(),
                );
            }
        }

        if field_errors.is_empty() {
            Ok(())
        } else {
            Err(field_errors)
        }
    }
}
