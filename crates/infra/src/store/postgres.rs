//! Postgres-backed invoice store.
//!
//! Every statement binds its parameters; nothing is interpolated into SQL
//! text.
//!
//! ## Error Mapping
//!
//! | SQLx Error | PostgreSQL Error Code | StoreError |
//! |------------|----------------------|------------|
//! | Database (unique violation) | `23505` | `Conflict` |
//! | Database (check / not-null violation) | `23514`, `23502` | `Constraint` |
//! | Database (other) | Any other | `Query` |
//! | PoolClosed / PoolTimedOut / Io | N/A | `Unavailable` |
//! | Other | N/A | `Query` |

use std::sync::Arc;

use async_trait::async_trait;
use chrono::NaiveDate;
use sqlx::postgres::{PgPool, PgRow};
use sqlx::Row;
use tracing::instrument;
use uuid::Uuid;

use invoicedesk_core::InvoiceId;
use invoicedesk_invoicing::{AmountCents, CustomerId, Invoice, InvoiceChanges, InvoiceStatus};

use super::{InvoiceStore, StoreError};

const CREATE_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS invoices (
    id          UUID PRIMARY KEY,
    customer_id TEXT NOT NULL,
    amount      BIGINT NOT NULL CHECK (amount >= 0),
    status      TEXT NOT NULL CHECK (status IN ('pending', 'paid')),
    date        DATE NOT NULL
)
"#;

/// `invoices` table accessed through a SQLx connection pool.
#[derive(Debug, Clone)]
pub struct PostgresInvoiceStore {
    pool: Arc<PgPool>,
}

impl PostgresInvoiceStore {
    pub fn new(pool: PgPool) -> Self {
        Self {
            pool: Arc::new(pool),
        }
    }

    /// Open a pool against `database_url`.
    pub async fn connect(database_url: &str) -> Result<Self, StoreError> {
        let pool = PgPool::connect(database_url)
            .await
            .map_err(|e| map_sqlx_error("connect", e))?;
        Ok(Self::new(pool))
    }

    /// Create the `invoices` table if it does not exist yet.
    #[instrument(skip(self), err)]
    pub async fn ensure_schema(&self) -> Result<(), StoreError> {
        sqlx::query(CREATE_TABLE)
            .execute(&*self.pool)
            .await
            .map_err(|e| map_sqlx_error("ensure_schema", e))?;
        Ok(())
    }
}

#[async_trait]
impl InvoiceStore for PostgresInvoiceStore {
    #[instrument(skip(self, invoice), fields(invoice_id = %invoice.id), err)]
    async fn insert(&self, invoice: &Invoice) -> Result<(), StoreError> {
        sqlx::query(
            r#"
            INSERT INTO invoices (id, customer_id, amount, status, date)
            VALUES ($1, $2, $3, $4, $5)
            "#,
        )
        .bind(invoice.id.as_uuid())
        .bind(invoice.customer_id.as_str())
        .bind(invoice.amount.value())
        .bind(invoice.status.as_str())
        .bind(invoice.date)
        .execute(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("insert", e))?;
        Ok(())
    }

    #[instrument(skip(self, changes), fields(invoice_id = %id), err)]
    async fn update(&self, id: InvoiceId, changes: &InvoiceChanges) -> Result<u64, StoreError> {
        let result = sqlx::query(
            r#"
            UPDATE invoices
            SET customer_id = $1, amount = $2, status = $3
            WHERE id = $4
            "#,
        )
        .bind(changes.customer_id.as_str())
        .bind(changes.amount.value())
        .bind(changes.status.as_str())
        .bind(id.as_uuid())
        .execute(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("update", e))?;
        Ok(result.rows_affected())
    }

    #[instrument(skip(self), fields(invoice_id = %id), err)]
    async fn delete(&self, id: InvoiceId) -> Result<u64, StoreError> {
        let result = sqlx::query("DELETE FROM invoices WHERE id = $1")
            .bind(id.as_uuid())
            .execute(&*self.pool)
            .await
            .map_err(|e| map_sqlx_error("delete", e))?;
        Ok(result.rows_affected())
    }

    #[instrument(skip(self), fields(invoice_id = %id), err)]
    async fn get(&self, id: InvoiceId) -> Result<Option<Invoice>, StoreError> {
        let row = sqlx::query(
            r#"
            SELECT id, customer_id, amount, status, date
            FROM invoices
            WHERE id = $1
            "#,
        )
        .bind(id.as_uuid())
        .fetch_optional(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("get", e))?;

        row.as_ref().map(invoice_from_row).transpose()
    }

    #[instrument(skip(self), err)]
    async fn list(&self) -> Result<Vec<Invoice>, StoreError> {
        let rows = sqlx::query(
            r#"
            SELECT id, customer_id, amount, status, date
            FROM invoices
            ORDER BY date DESC, id DESC
            "#,
        )
        .fetch_all(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("list", e))?;

        rows.iter().map(invoice_from_row).collect()
    }
}

fn invoice_from_row(row: &PgRow) -> Result<Invoice, StoreError> {
    let corrupt = |e: sqlx::Error| StoreError::Corrupt(format!("invoice row: {e}"));

    let id: Uuid = row.try_get("id").map_err(corrupt)?;
    let customer_id: String = row.try_get("customer_id").map_err(corrupt)?;
    let amount: i64 = row.try_get("amount").map_err(corrupt)?;
    let status: String = row.try_get("status").map_err(corrupt)?;
    let date: NaiveDate = row.try_get("date").map_err(corrupt)?;

    decode_invoice(id, &customer_id, amount, &status, date)
}

/// Rebuild a domain invoice from raw column values, re-checking invariants.
fn decode_invoice(
    id: Uuid,
    customer_id: &str,
    amount: i64,
    status: &str,
    date: NaiveDate,
) -> Result<Invoice, StoreError> {
    let corrupt = |e: invoicedesk_core::DomainError| {
        StoreError::Corrupt(format!("invoice {id}: {e}"))
    };

    Ok(Invoice {
        id: InvoiceId::from_uuid(id),
        customer_id: customer_id.parse::<CustomerId>().map_err(corrupt)?,
        amount: AmountCents::new(amount).map_err(corrupt)?,
        status: status.parse::<InvoiceStatus>().map_err(corrupt)?,
        date,
    })
}

fn map_sqlx_error(operation: &str, err: sqlx::Error) -> StoreError {
    match err {
        sqlx::Error::Database(db_err) => {
            let msg = format!("database error in {}: {}", operation, db_err.message());

            match db_err.code().as_deref() {
                Some("23505") => StoreError::Conflict(msg),
                Some("23514") | Some("23502") => StoreError::Constraint(msg),
                _ => StoreError::Query(msg),
            }
        }
        sqlx::Error::PoolClosed => {
            StoreError::Unavailable(format!("connection pool closed in {}", operation))
        }
        sqlx::Error::PoolTimedOut => {
            StoreError::Unavailable(format!("connection pool timed out in {}", operation))
        }
        sqlx::Error::Io(e) => StoreError::Unavailable(format!("io error in {}: {}", operation, e)),
        _ => StoreError::Query(format!("sqlx error in {}: {}", operation, err)),
    }
}
