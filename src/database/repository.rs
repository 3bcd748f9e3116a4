use chrono::Utc;
use sqlx::PgPool;
use uuid::Uuid;

use crate::database::manager::{DatabaseManager, StoreError};
use crate::database::models::{NewQuotation, Quotation, UpdateQuotation};

/// Listing filter, mirroring the role scopes of the authorization gate.
#[derive(Debug, Clone, Copy)]
pub enum QuotationFilter {
    ByOwner(Uuid),
    ByTenant(Uuid),
    All,
}

const COLUMNS: &str = "id, service, enterprise_name, contact_number, email, budget, \
     description, status, final_price, notes, proposed_delivery_date, \
     created_by, tenant_id, created_at, updated_at";

/// Data access for the quotations table. Every write is a single-row
/// statement; concurrent updates to one quotation are last-writer-wins.
pub struct QuotationRepository {
    pool: PgPool,
}

impl QuotationRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Repository over the shared pool.
    pub fn open() -> Result<Self, StoreError> {
        Ok(Self::new(DatabaseManager::pool()?))
    }

    /// Persist a new quotation. The record starts pending with
    /// `created_at == updated_at`.
    pub async fn insert(
        &self,
        input: &NewQuotation,
        created_by: Uuid,
        tenant_id: Uuid,
    ) -> Result<Quotation, StoreError> {
        let now = Utc::now();
        let sql = format!(
            "INSERT INTO quotations \
                 (id, service, enterprise_name, contact_number, email, budget, \
                  description, status, created_by, tenant_id, created_at, updated_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, 'pending', $8, $9, $10, $10) \
             RETURNING {}",
            COLUMNS
        );

        let row = sqlx::query_as::<_, Quotation>(&sql)
            .bind(Uuid::new_v4())
            .bind(&input.service)
            .bind(&input.enterprise_name)
            .bind(&input.contact_number)
            .bind(&input.email)
            .bind(input.budget)
            .bind(&input.description)
            .bind(created_by)
            .bind(tenant_id)
            .bind(now)
            .fetch_one(&self.pool)
            .await?;

        Ok(row)
    }

    /// List quotations matching the filter, newest first.
    pub async fn find(
        &self,
        filter: QuotationFilter,
        limit: i64,
    ) -> Result<Vec<Quotation>, StoreError> {
        let rows = match filter {
            QuotationFilter::ByOwner(owner) => {
                let sql = format!(
                    "SELECT {} FROM quotations WHERE created_by = $1 \
                     ORDER BY created_at DESC LIMIT $2",
                    COLUMNS
                );
                sqlx::query_as::<_, Quotation>(&sql)
                    .bind(owner)
                    .bind(limit)
                    .fetch_all(&self.pool)
                    .await?
            }
            QuotationFilter::ByTenant(tenant) => {
                let sql = format!(
                    "SELECT {} FROM quotations WHERE tenant_id = $1 \
                     ORDER BY created_at DESC LIMIT $2",
                    COLUMNS
                );
                sqlx::query_as::<_, Quotation>(&sql)
                    .bind(tenant)
                    .bind(limit)
                    .fetch_all(&self.pool)
                    .await?
            }
            QuotationFilter::All => {
                let sql = format!(
                    "SELECT {} FROM quotations ORDER BY created_at DESC LIMIT $1",
                    COLUMNS
                );
                sqlx::query_as::<_, Quotation>(&sql)
                    .bind(limit)
                    .fetch_all(&self.pool)
                    .await?
            }
        };

        Ok(rows)
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<Quotation>, StoreError> {
        let sql = format!("SELECT {} FROM quotations WHERE id = $1", COLUMNS);
        let row = sqlx::query_as::<_, Quotation>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    /// Apply status/terms changes in one atomic row update, refreshing
    /// `updated_at`. Returns None when the id no longer exists.
    pub async fn update_by_id(
        &self,
        id: Uuid,
        update: &UpdateQuotation,
    ) -> Result<Option<Quotation>, StoreError> {
        let sql = format!(
            "UPDATE quotations SET \
                 status = COALESCE($2, status), \
                 final_price = COALESCE($3, final_price), \
                 notes = COALESCE($4, notes), \
                 proposed_delivery_date = COALESCE($5, proposed_delivery_date), \
                 updated_at = $6 \
             WHERE id = $1 \
             RETURNING {}",
            COLUMNS
        );

        let row = sqlx::query_as::<_, Quotation>(&sql)
            .bind(id)
            .bind(update.status)
            .bind(update.final_price)
            .bind(update.notes.as_deref())
            .bind(update.proposed_delivery_date)
            .bind(Utc::now())
            .fetch_optional(&self.pool)
            .await?;

        Ok(row)
    }
}
