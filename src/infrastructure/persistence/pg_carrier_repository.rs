//! PostgreSQL implementation of the carrier repository.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::json;
use sqlx::{PgPool, Postgres, QueryBuilder};
use std::sync::Arc;

use crate::domain::entities::{Carrier, NewCarrier, UpdateCarrier};
use crate::domain::query::{CarrierQuery, Filter, FilterOp, FilterValue, Page};
use crate::domain::repositories::CarrierRepository;
use crate::error::AppError;

const SELECT_CARRIERS: &str = "SELECT id, name, code, base_fee_cents, per_kg_cents, dim_divisor, \
     currency, transit_days, tracking_url, created_at, updated_at FROM carriers";

#[derive(sqlx::FromRow)]
struct CarrierRow {
    id: i64,
    name: String,
    code: String,
    base_fee_cents: i64,
    per_kg_cents: i64,
    dim_divisor: i32,
    currency: String,
    transit_days: i32,
    tracking_url: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<CarrierRow> for Carrier {
    fn from(r: CarrierRow) -> Self {
        Carrier {
            id: r.id,
            name: r.name,
            code: r.code,
            base_fee_cents: r.base_fee_cents,
            per_kg_cents: r.per_kg_cents,
            dim_divisor: r.dim_divisor,
            currency: r.currency,
            transit_days: r.transit_days,
            tracking_url: r.tracking_url,
            created_at: r.created_at,
            updated_at: r.updated_at,
        }
    }
}

/// PostgreSQL repository for carriers.
///
/// Deletes are permanent.
pub struct PgCarrierRepository {
    pool: Arc<PgPool>,
}

impl PgCarrierRepository {
    /// Creates a new repository with a database connection pool.
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }
}

/// Appends `WHERE ... AND ...` for the given filters, binding every operand.
fn push_filters(qb: &mut QueryBuilder<'_, Postgres>, filters: &[Filter]) {
    for (i, filter) in filters.iter().enumerate() {
        qb.push(if i == 0 { " WHERE " } else { " AND " });
        qb.push(filter.field.column());
        qb.push(" ");
        qb.push(filter.op.sql());
        qb.push(" ");

        match (&filter.op, &filter.value) {
            (FilterOp::Like, FilterValue::Text(text)) => {
                qb.push_bind(format!("%{}%", escape_like(text)));
            }
            (_, FilterValue::Integer(value)) => {
                qb.push_bind(*value);
            }
            (_, FilterValue::Text(value)) => {
                qb.push_bind(value.clone());
            }
            (_, FilterValue::Timestamp(value)) => {
                qb.push_bind(*value);
            }
        }
    }
}

/// Escapes `ILIKE` wildcards so user input matches literally.
fn escape_like(text: &str) -> String {
    text.replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_")
}

#[async_trait]
impl CarrierRepository for PgCarrierRepository {
    async fn find_all_paginate(&self, query: &CarrierQuery) -> Result<Page<Carrier>, AppError> {
        let mut select = QueryBuilder::<Postgres>::new(SELECT_CARRIERS);
        push_filters(&mut select, &query.filters);
        select.push(" ORDER BY ");
        for sort in &query.sort {
            select.push(sort.field.column());
            select.push(" ");
            select.push(sort.direction.sql());
            select.push(", ");
        }
        select.push("id ASC LIMIT ");
        select.push_bind(query.limit());
        select.push(" OFFSET ");
        select.push_bind(query.offset());

        let mut count = QueryBuilder::<Postgres>::new("SELECT COUNT(*) FROM carriers");
        push_filters(&mut count, &query.filters);

        let (rows, total) = tokio::try_join!(
            select
                .build_query_as::<CarrierRow>()
                .fetch_all(self.pool.as_ref()),
            count
                .build_query_scalar::<i64>()
                .fetch_one(self.pool.as_ref())
        )?;

        Ok(Page {
            items: rows.into_iter().map(Carrier::from).collect(),
            total,
            page: query.page,
            page_size: query.page_size,
        })
    }

    async fn all(&self) -> Result<Vec<Carrier>, AppError> {
        let rows = sqlx::query_as::<_, CarrierRow>(
            r#"
            SELECT id, name, code, base_fee_cents, per_kg_cents, dim_divisor,
                   currency, transit_days, tracking_url, created_at, updated_at
            FROM carriers
            ORDER BY id
            "#,
        )
        .fetch_all(self.pool.as_ref())
        .await?;

        Ok(rows.into_iter().map(Carrier::from).collect())
    }

    async fn find(&self, id: i64) -> Result<Option<Carrier>, AppError> {
        let row = sqlx::query_as::<_, CarrierRow>(
            r#"
            SELECT id, name, code, base_fee_cents, per_kg_cents, dim_divisor,
                   currency, transit_days, tracking_url, created_at, updated_at
            FROM carriers
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(self.pool.as_ref())
        .await?;

        Ok(row.map(Carrier::from))
    }

    async fn find_by_code(&self, code: &str) -> Result<Option<Carrier>, AppError> {
        let row = sqlx::query_as::<_, CarrierRow>(
            r#"
            SELECT id, name, code, base_fee_cents, per_kg_cents, dim_divisor,
                   currency, transit_days, tracking_url, created_at, updated_at
            FROM carriers
            WHERE code = $1
            "#,
        )
        .bind(code)
        .fetch_optional(self.pool.as_ref())
        .await?;

        Ok(row.map(Carrier::from))
    }

    async fn create(&self, new_carrier: NewCarrier) -> Result<Carrier, AppError> {
        let row = sqlx::query_as::<_, CarrierRow>(
            r#"
            INSERT INTO carriers
                (name, code, base_fee_cents, per_kg_cents, dim_divisor, currency, transit_days, tracking_url)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING id, name, code, base_fee_cents, per_kg_cents, dim_divisor,
                      currency, transit_days, tracking_url, created_at, updated_at
            "#,
        )
        .bind(new_carrier.name)
        .bind(new_carrier.code)
        .bind(new_carrier.base_fee_cents)
        .bind(new_carrier.per_kg_cents)
        .bind(new_carrier.dim_divisor)
        .bind(new_carrier.currency)
        .bind(new_carrier.transit_days)
        .bind(new_carrier.tracking_url)
        .fetch_one(self.pool.as_ref())
        .await?;

        Ok(row.into())
    }

    async fn update(&self, id: i64, update: UpdateCarrier) -> Result<Carrier, AppError> {
        let update_tracking_url = update.tracking_url.is_some();
        let new_tracking_url = update.tracking_url.flatten();

        let row = sqlx::query_as::<_, CarrierRow>(
            r#"
            UPDATE carriers SET
                name           = COALESCE($2::TEXT, name),
                code           = COALESCE($3::TEXT, code),
                base_fee_cents = COALESCE($4::BIGINT, base_fee_cents),
                per_kg_cents   = COALESCE($5::BIGINT, per_kg_cents),
                dim_divisor    = COALESCE($6::INTEGER, dim_divisor),
                currency       = COALESCE($7::TEXT, currency),
                transit_days   = COALESCE($8::INTEGER, transit_days),
                tracking_url   = CASE WHEN $9 THEN $10::TEXT ELSE tracking_url END,
                updated_at     = NOW()
            WHERE id = $1
            RETURNING id, name, code, base_fee_cents, per_kg_cents, dim_divisor,
                      currency, transit_days, tracking_url, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(update.name)
        .bind(update.code)
        .bind(update.base_fee_cents)
        .bind(update.per_kg_cents)
        .bind(update.dim_divisor)
        .bind(update.currency)
        .bind(update.transit_days)
        .bind(update_tracking_url)
        .bind(new_tracking_url)
        .fetch_optional(self.pool.as_ref())
        .await?;

        row.map(Carrier::from)
            .ok_or_else(|| AppError::not_found("Carrier not found", json!({"id": id})))
    }

    async fn delete(&self, id: i64) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM carriers WHERE id = $1")
            .bind(id)
            .execute(self.pool.as_ref())
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found("Carrier not found", json!({"id": id})));
        }

        Ok(())
    }

    async fn ping(&self) -> Result<(), AppError> {
        sqlx::query("SELECT 1").execute(self.pool.as_ref()).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::query::{CarrierField, QueryParser};
    use std::collections::HashMap;

    #[test]
    fn test_escape_like() {
        assert_eq!(escape_like("50%_off\\"), "50\\%\\_off\\\\");
        assert_eq!(escape_like("ups"), "ups");
    }

    #[test]
    fn test_push_filters_binds_operands() {
        let mut params = HashMap::new();
        params.insert(
            "filter".to_string(),
            "name:like:ups,transit_days:lte:3".to_string(),
        );
        let query = QueryParser::new(10, 100).parse(&params).unwrap();

        let mut qb = QueryBuilder::<Postgres>::new("SELECT COUNT(*) FROM carriers");
        push_filters(&mut qb, &query.filters);

        assert_eq!(
            qb.sql(),
            "SELECT COUNT(*) FROM carriers WHERE name ILIKE $1 AND transit_days <= $2"
        );
        assert_eq!(query.filters[0].field, CarrierField::Name);
    }
}
