use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use crate::utils::generate_session_id;

pub const MAX_PARTY_SIZE: i32 = 20;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Reservation {
    pub id: Uuid,
    pub store_id: String,
    pub store_name: String,
    pub session_id: String,
    pub user_id: Option<Uuid>,
    pub customer_name: String,
    pub phone: String,
    pub party_size: i32,
    pub reserved_at: DateTime<Utc>,
    pub status: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize)]
pub struct CreateReservationRequest {
    pub store_id: String,
    pub store_name: String,
    pub session_id: Option<String>,
    pub customer_name: String,
    pub phone: String,
    pub party_size: i32,
    pub reserved_at: DateTime<Utc>,
}

impl CreateReservationRequest {
    /// Returns the first problem with the request, if any.
    pub fn validate(&self) -> Result<(), String> {
        if self.store_id.trim().is_empty() {
            return Err("store_id is required".into());
        }
        if self.customer_name.trim().is_empty() {
            return Err("customer_name is required".into());
        }
        if self.phone.trim().is_empty() {
            return Err("phone is required".into());
        }
        if !(1..=MAX_PARTY_SIZE).contains(&self.party_size) {
            return Err(format!("party_size must be between 1 and {}", MAX_PARTY_SIZE));
        }
        Ok(())
    }

    /// The caller's visitor token, or a fresh one when none was sent.
    pub fn session_id(&self) -> String {
        self.session_id
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .unwrap_or_else(generate_session_id)
    }
}

impl Reservation {
    pub async fn create(
        pool: &PgPool,
        req: CreateReservationRequest,
        user_id: Option<Uuid>,
    ) -> Result<Self, sqlx::Error> {
        let session_id = req.session_id();

        sqlx::query_as::<_, Reservation>(
            r#"
            INSERT INTO reservations (
                id, store_id, store_name, session_id, user_id,
                customer_name, phone, party_size, reserved_at, status, created_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, 'pending', NOW())
            RETURNING
                id, store_id, store_name, session_id, user_id,
                customer_name, phone, party_size, reserved_at, status, created_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(req.store_id.trim())
        .bind(req.store_name.trim())
        .bind(session_id)
        .bind(user_id)
        .bind(req.customer_name.trim())
        .bind(req.phone.trim())
        .bind(req.party_size)
        .bind(req.reserved_at)
        .fetch_one(pool)
        .await
    }

    /// Every reservation, newest first.
    pub async fn list_all(pool: &PgPool) -> Result<Vec<Self>, sqlx::Error> {
        sqlx::query_as::<_, Reservation>(
            r#"
            SELECT
                id, store_id, store_name, session_id, user_id,
                customer_name, phone, party_size, reserved_at, status, created_at
            FROM reservations
            ORDER BY created_at DESC
            "#,
        )
        .fetch_all(pool)
        .await
    }

    /// Fails with `RowNotFound` when nothing was deleted.
    pub async fn delete(pool: &PgPool, id: Uuid) -> Result<(), sqlx::Error> {
        let result = sqlx::query("DELETE FROM reservations WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;

        ensure_deleted(result.rows_affected())
    }
}

/// A delete that touched no row is reported as `RowNotFound`.
pub fn ensure_deleted(rows_affected: u64) -> Result<(), sqlx::Error> {
    if rows_affected == 0 {
        return Err(sqlx::Error::RowNotFound);
    }
    Ok(())
}
