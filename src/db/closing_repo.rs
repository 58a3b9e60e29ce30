// src/db/closing_repo.rs

use chrono::NaiveDate;
use sqlx::{types::Json, PgPool};
use uuid::Uuid;
use crate::{
    common::error::AppError,
    models::closing::{ClosingSummary, DailyClosing},
};

#[derive(Clone)]
pub struct ClosingRepository {
    pool: PgPool,
}

impl ClosingRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn exists_for_date(&self, chefe_id: Uuid, date: NaiveDate) -> Result<bool, AppError> {
        let exists: bool = sqlx::query_scalar(
            "SELECT EXISTS (SELECT 1 FROM daily_closings WHERE chefe_id = $1 AND closing_date = $2)",
        )
        .bind(chefe_id)
        .bind(date)
        .fetch_one(&self.pool)
        .await?;

        Ok(exists)
    }

    pub async fn create(
        &self,
        chefe_id: Uuid,
        closed_by_user_id: Uuid,
        closed_by_name: &str,
        summary: &ClosingSummary,
    ) -> Result<DailyClosing, AppError> {
        sqlx::query_as::<_, DailyClosing>(
            r#"
            INSERT INTO daily_closings (
                chefe_id, closing_date, closed_by_user_id, closed_by_name,
                total_revenue, payment_totals, total_service_fee,
                total_customers, total_completed_orders,
                cancelled_items, total_cancelled_value
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            RETURNING *
            "#,
        )
        .bind(chefe_id)
        .bind(summary.closing_date)
        .bind(closed_by_user_id)
        .bind(closed_by_name)
        .bind(summary.total_revenue)
        .bind(Json(&summary.payment_totals))
        .bind(summary.total_service_fee)
        .bind(summary.total_customers)
        .bind(summary.total_completed_orders)
        .bind(Json(&summary.cancelled_items))
        .bind(summary.total_cancelled_value)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            // Dois caixas fechando ao mesmo tempo: a constraint única segura o segundo
            if let Some(db_err) = e.as_database_error() {
                if db_err.is_unique_violation() {
                    return AppError::DayAlreadyClosed(summary.closing_date);
                }
            }
            e.into()
        })
    }

    pub async fn list(&self, chefe_id: Uuid) -> Result<Vec<DailyClosing>, AppError> {
        let closings = sqlx::query_as::<_, DailyClosing>(
            "SELECT * FROM daily_closings WHERE chefe_id = $1 ORDER BY closing_date DESC",
        )
        .bind(chefe_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(closings)
    }

    pub async fn find(&self, chefe_id: Uuid, id: Uuid) -> Result<DailyClosing, AppError> {
        sqlx::query_as::<_, DailyClosing>(
            "SELECT * FROM daily_closings WHERE id = $1 AND chefe_id = $2",
        )
        .bind(id)
        .bind(chefe_id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::ResourceNotFound("Fechamento".into()))
    }

    pub async fn delete(&self, chefe_id: Uuid, id: Uuid) -> Result<Option<DailyClosing>, AppError> {
        let deleted = sqlx::query_as::<_, DailyClosing>(
            "DELETE FROM daily_closings WHERE id = $1 AND chefe_id = $2 RETURNING *",
        )
        .bind(id)
        .bind(chefe_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(deleted)
    }
}
