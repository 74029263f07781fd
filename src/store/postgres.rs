//! PostgreSQL ticket store.
//!
//! `ticket_number` is the primary key, so rows are kept in a btree ordered by
//! ticket number and duplicate numbers are refused by the database itself. The
//! column is `BIGINT` with a range check because PostgreSQL has no unsigned types.

use axum::async_trait;
use chrono::NaiveDate;
use sqlx::postgres::PgPoolOptions;
use sqlx::{FromRow, PgPool, Postgres, QueryBuilder};

use super::{StoreError, TicketStore};
use crate::config::DatabaseConfig;
use crate::models::ticket::{Ticket, TicketSearch};

const CREATE_TICKETS_TABLE: &str = r"
    CREATE TABLE IF NOT EXISTS tickets (
        ticket_number BIGINT PRIMARY KEY
            CHECK (ticket_number BETWEEN 0 AND 4294967295),
        buyer_name TEXT NOT NULL,
        buyer_phone TEXT NOT NULL,
        seller_name TEXT NOT NULL,
        payment_status TEXT NOT NULL CHECK (payment_status IN ('due', 'paid')),
        mode_of_payment TEXT NOT NULL CHECK (mode_of_payment IN ('upi', 'cash')),
        date_sold DATE NOT NULL,
        date_of_payment DATE,
        remarks TEXT NOT NULL DEFAULT ''
    )
";

const TICKET_COLUMNS: &str = "ticket_number, buyer_name, buyer_phone, seller_name, \
     payment_status, mode_of_payment, date_sold, date_of_payment, remarks";

#[derive(Debug, FromRow)]
struct TicketRow {
    ticket_number: i64,
    buyer_name: String,
    buyer_phone: String,
    seller_name: String,
    payment_status: String,
    mode_of_payment: String,
    date_sold: NaiveDate,
    date_of_payment: Option<NaiveDate>,
    remarks: String,
}

impl TryFrom<TicketRow> for Ticket {
    type Error = StoreError;

    fn try_from(row: TicketRow) -> Result<Self, Self::Error> {
        let ticket_number = u32::try_from(row.ticket_number).map_err(|_| {
            StoreError::InvalidRow(format!(
                "ticket_number {} is out of range",
                row.ticket_number
            ))
        })?;

        Ok(Ticket {
            ticket_number,
            buyer_name: row.buyer_name,
            buyer_phone: row.buyer_phone,
            seller_name: row.seller_name,
            payment_status: row.payment_status.parse()?,
            mode_of_payment: row.mode_of_payment.parse()?,
            date_sold: row.date_sold,
            date_of_payment: row.date_of_payment,
            remarks: row.remarks,
        })
    }
}

#[derive(Clone)]
pub struct PgTicketStore {
    pool: PgPool,
}

impl PgTicketStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn connect(config: &DatabaseConfig) -> Result<Self, StoreError> {
        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .connect_with(config.connect_options.clone())
            .await?;
        Ok(Self::new(pool))
    }
}

/// Wraps a search term for `ILIKE`, escaping the pattern metacharacters so the
/// term is matched literally.
fn like_pattern(term: &str) -> String {
    let mut pattern = String::with_capacity(term.len() + 2);
    pattern.push('%');
    for c in term.chars() {
        if matches!(c, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}

fn build_select(limit: u32, search: Option<&TicketSearch>) -> QueryBuilder<'static, Postgres> {
    let mut builder = QueryBuilder::new(format!("SELECT {TICKET_COLUMNS} FROM tickets"));

    match search {
        Some(TicketSearch::Number(Some(n))) => {
            builder.push(" WHERE ticket_number = ").push_bind(i64::from(*n));
        }
        Some(TicketSearch::Number(None)) => {
            builder.push(" WHERE FALSE");
        }
        Some(TicketSearch::Text(term)) => {
            let pattern = like_pattern(term);
            builder
                .push(" WHERE (buyer_name ILIKE ")
                .push_bind(pattern.clone())
                .push(" OR seller_name ILIKE ")
                .push_bind(pattern.clone())
                .push(" OR buyer_phone ILIKE ")
                .push_bind(pattern)
                .push(")");
        }
        None => {}
    }

    builder
        .push(" ORDER BY ticket_number LIMIT ")
        .push_bind(i64::from(limit));
    builder
}

#[async_trait]
impl TicketStore for PgTicketStore {
    async fn ensure_schema(&self) -> Result<(), StoreError> {
        sqlx::query(CREATE_TICKETS_TABLE).execute(&self.pool).await?;
        tracing::info!("Tickets table is ready");
        Ok(())
    }

    async fn insert(&self, ticket: &Ticket) -> Result<(), StoreError> {
        let result = sqlx::query(
            r"
            INSERT INTO tickets (
                ticket_number, buyer_name, buyer_phone, seller_name,
                payment_status, mode_of_payment, date_sold, date_of_payment, remarks
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            ",
        )
        .bind(i64::from(ticket.ticket_number))
        .bind(&ticket.buyer_name)
        .bind(&ticket.buyer_phone)
        .bind(&ticket.seller_name)
        .bind(ticket.payment_status.as_str())
        .bind(ticket.mode_of_payment.as_str())
        .bind(ticket.date_sold)
        .bind(ticket.date_of_payment)
        .bind(&ticket.remarks)
        .execute(&self.pool)
        .await;

        match result {
            Ok(_) => Ok(()),
            Err(sqlx::Error::Database(db)) if db.is_unique_violation() => {
                Err(StoreError::Duplicate(ticket.ticket_number))
            }
            Err(e) => Err(e.into()),
        }
    }

    async fn query(
        &self,
        limit: u32,
        search: Option<&TicketSearch>,
    ) -> Result<Vec<Ticket>, StoreError> {
        let mut builder = build_select(limit, search);
        let rows = builder
            .build_query_as::<TicketRow>()
            .fetch_all(&self.pool)
            .await?;

        rows.into_iter().map(Ticket::try_from).collect()
    }

    async fn update_to_paid(
        &self,
        ticket_number: u32,
        payment_date: NaiveDate,
    ) -> Result<u64, StoreError> {
        let result = sqlx::query(
            r"
            UPDATE tickets
            SET payment_status = 'paid', date_of_payment = $1
            WHERE ticket_number = $2
            ",
        )
        .bind(payment_date)
        .bind(i64::from(ticket_number))
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected())
    }

    async fn delete_by_number(&self, ticket_number: u32) -> Result<u64, StoreError> {
        let result = sqlx::query("DELETE FROM tickets WHERE ticket_number = $1")
            .bind(i64::from(ticket_number))
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected())
    }

    async fn ping(&self) -> Result<(), StoreError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}
