use std::collections::HashMap;

use thiserror::Error;
use uuid::Uuid;

use crate::auth::gate::{authorize, Action, Actor, Denied, ListScope};
use crate::database::manager::StoreError;
use crate::database::models::{NewQuotation, Quotation, QuotationStatus, UpdateQuotation};
use crate::database::repository::{QuotationFilter, QuotationRepository};

#[derive(Debug, Error)]
pub enum QuotationError {
    #[error("{message}")]
    Validation {
        message: String,
        field_errors: Option<HashMap<String, String>>,
    },

    #[error("{0}")]
    Forbidden(String),

    #[error("Quotation not found: {0}")]
    NotFound(Uuid),

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl QuotationError {
    fn validation(message: impl Into<String>, field_errors: HashMap<String, String>) -> Self {
        QuotationError::Validation {
            message: message.into(),
            field_errors: Some(field_errors),
        }
    }

    fn denied(reason: Denied) -> Self {
        QuotationError::Forbidden(reason.to_string())
    }
}

/// Role-scoped operations on quotations. Every operation consults the
/// authorization gate before touching the store.
pub struct QuotationService;

impl QuotationService {
    /// Create a quotation on behalf of the calling user. The record is
    /// associated with the caller's identity and tenant claims.
    pub async fn create(actor: &Actor, input: NewQuotation) -> Result<Quotation, QuotationError> {
        authorize(actor, Action::Create).map_err(QuotationError::denied)?;

        input
            .validate()
            .map_err(|fe| QuotationError::validation("Invalid quotation fields", fe))?;

        let repo = QuotationRepository::open()?;
        let quotation = repo.insert(&input, actor.id, actor.tenant).await?;

        tracing::info!(id = %quotation.id, tenant = %quotation.tenant_id, "Quotation created");
        Ok(quotation)
    }

    /// Quotations the calling user created.
    pub async fn list_for_user(actor: &Actor, limit: i64) -> Result<Vec<Quotation>, QuotationError> {
        authorize(actor, Action::List(ListScope::Own)).map_err(QuotationError::denied)?;

        let repo = QuotationRepository::open()?;
        Ok(repo.find(QuotationFilter::ByOwner(actor.id), limit).await?)
    }

    /// Quotations handled by the calling admin's tenant.
    pub async fn list_for_admin(actor: &Actor, limit: i64) -> Result<Vec<Quotation>, QuotationError> {
        authorize(actor, Action::List(ListScope::Tenant)).map_err(QuotationError::denied)?;

        let repo = QuotationRepository::open()?;
        Ok(repo.find(QuotationFilter::ByTenant(actor.tenant), limit).await?)
    }

    /// Every quotation, superadmin only.
    pub async fn list_for_superadmin(
        actor: &Actor,
        limit: i64,
    ) -> Result<Vec<Quotation>, QuotationError> {
        authorize(actor, Action::List(ListScope::All)).map_err(QuotationError::denied)?;

        let repo = QuotationRepository::open()?;
        Ok(repo.find(QuotationFilter::All, limit).await?)
    }

    /// Fetch one quotation, subject to the ownership rules.
    pub async fn get_by_id(actor: &Actor, id: Uuid) -> Result<Quotation, QuotationError> {
        let repo = QuotationRepository::open()?;
        let quotation = repo
            .find_by_id(id)
            .await?
            .ok_or(QuotationError::NotFound(id))?;

        authorize(actor, Action::Read(&quotation.ownership())).map_err(QuotationError::denied)?;
        Ok(quotation)
    }

    /// Apply a status transition and/or negotiated terms. The stored record
    /// is left untouched when validation or authorization fails.
    pub async fn update_status_and_terms(
        actor: &Actor,
        id: Uuid,
        update: UpdateQuotation,
    ) -> Result<Quotation, QuotationError> {
        // Role-level gate before the record is even loaded
        authorize(actor, Action::UpdateAny).map_err(QuotationError::denied)?;

        if update.is_empty() {
            return Err(QuotationError::Validation {
                message: "No updatable fields provided".to_string(),
                field_errors: None,
            });
        }
        update
            .validate()
            .map_err(|fe| QuotationError::validation("Invalid update fields", fe))?;

        let repo = QuotationRepository::open()?;
        let current = repo
            .find_by_id(id)
            .await?
            .ok_or(QuotationError::NotFound(id))?;

        authorize(actor, Action::Update(&current.ownership())).map_err(QuotationError::denied)?;

        if let Some(next) = update.status {
            if !current.status.can_transition_to(next) {
                return Err(QuotationError::validation(
                    format!("Illegal status transition: {} -> {}", current.status, next),
                    HashMap::from([(
                        "status".to_string(),
                        format!("Cannot move from {} to {}", current.status, next),
                    )]),
                ));
            }
        }

        let updated = repo
            .update_by_id(id, &update)
            .await?
            // Row deleted between the read and the write; report it as gone
            .ok_or(QuotationError::NotFound(id))?;

        tracing::info!(
            id = %updated.id,
            status = %updated.status,
            "Quotation updated"
        );
        Ok(updated)
    }
}

/// Parse an optional wire status value, failing with a validation error on
/// anything outside the four enumerated values.
pub fn parse_status(raw: Option<&str>) -> Result<Option<QuotationStatus>, QuotationError> {
    match raw {
        None => Ok(None),
        Some(s) => s
            .parse::<QuotationStatus>()
            .map(Some)
            .map_err(|_| {
                QuotationError::validation(
                    format!("Unknown status value: {}", s),
                    HashMap::from([(
                        "status".to_string(),
                        "Must be one of: pending, approved, rejected, completed".to_string(),
                    )]),
                )
            }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_status_accepts_the_enumerated_values() {
        assert_eq!(parse_status(None).unwrap(), None);
        assert_eq!(
            parse_status(Some("approved")).unwrap(),
            Some(QuotationStatus::Approved)
        );
    }

    #[test]
    fn parse_status_rejects_out_of_enum_values() {
        let err = parse_status(Some("archived")).unwrap_err();
        match err {
            QuotationError::Validation { field_errors, .. } => {
                assert!(field_errors.unwrap().contains_key("status"));
            }
            other => panic!("expected validation error, got {:?}", other),
        }
    }
}
