// src/db/reservation_repo.rs

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;
use crate::{
    common::error::AppError,
    models::reservations::{Reservation, ReservationStatus},
};

#[derive(Clone)]
pub struct ReservationRepository {
    pool: PgPool,
}

impl ReservationRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn create(
        &self,
        chefe_id: Uuid,
        name: &str,
        pax: i32,
        phone: &str,
        reservation_time: DateTime<Utc>,
        table_id: Option<Uuid>,
        notes: Option<&str>,
        created_by: Uuid,
    ) -> Result<Reservation, AppError> {
        let reservation = sqlx::query_as::<_, Reservation>(
            r#"
            INSERT INTO reservations (
                chefe_id, name, pax, phone, reservation_time, table_id, notes, created_by
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING *
            "#,
        )
        .bind(chefe_id)
        .bind(name)
        .bind(pax)
        .bind(phone)
        .bind(reservation_time)
        .bind(table_id)
        .bind(notes)
        .bind(created_by)
        .fetch_one(&self.pool)
        .await?;

        Ok(reservation)
    }

    pub async fn list(
        &self,
        chefe_id: Uuid,
        from: Option<DateTime<Utc>>,
        to: Option<DateTime<Utc>>,
    ) -> Result<Vec<Reservation>, AppError> {
        let reservations = sqlx::query_as::<_, Reservation>(
            r#"
            SELECT * FROM reservations
            WHERE chefe_id = $1
              AND ($2::timestamptz IS NULL OR reservation_time >= $2)
              AND ($3::timestamptz IS NULL OR reservation_time < $3)
            ORDER BY reservation_time ASC
            "#,
        )
        .bind(chefe_id)
        .bind(from)
        .bind(to)
        .fetch_all(&self.pool)
        .await?;

        Ok(reservations)
    }

    pub async fn find(&self, chefe_id: Uuid, id: Uuid) -> Result<Reservation, AppError> {
        sqlx::query_as::<_, Reservation>("SELECT * FROM reservations WHERE id = $1 AND chefe_id = $2")
            .bind(id)
            .bind(chefe_id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::ResourceNotFound("Reserva".into()))
    }

    pub async fn update_status(
        &self,
        chefe_id: Uuid,
        id: Uuid,
        status: ReservationStatus,
    ) -> Result<Reservation, AppError> {
        sqlx::query_as::<_, Reservation>(
            "UPDATE reservations SET status = $3 WHERE id = $1 AND chefe_id = $2 RETURNING *",
        )
        .bind(id)
        .bind(chefe_id)
        .bind(status)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::ResourceNotFound("Reserva".into()))
    }

    pub async fn delete(&self, chefe_id: Uuid, id: Uuid) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM reservations WHERE id = $1 AND chefe_id = $2")
            .bind(id)
            .bind(chefe_id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
