// src/db/event_repo.rs

use sqlx::PgPool;
use crate::{
    common::error::AppError,
    models::events::{EventLevel, SystemEvent},
};

// Log append-only: só INSERT e SELECT
#[derive(Clone)]
pub struct EventRepository {
    pool: PgPool,
}

impl EventRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn log(&self, level: EventLevel, message: &str) -> Result<SystemEvent, AppError> {
        let event = sqlx::query_as::<_, SystemEvent>(
            "INSERT INTO system_events (level, message) VALUES ($1, $2) RETURNING *",
        )
        .bind(level)
        .bind(message)
        .fetch_one(&self.pool)
        .await?;

        Ok(event)
    }

    /// Grava o evento sem interromper o fluxo de quem chamou.
    pub async fn log_quietly(&self, level: EventLevel, message: &str) {
        if let Err(e) = self.log(level, message).await {
            tracing::error!("Falha ao gravar evento do sistema: {}", e);
        }
    }

    pub async fn list_recent(&self, limit: i64) -> Result<Vec<SystemEvent>, AppError> {
        let events = sqlx::query_as::<_, SystemEvent>(
            "SELECT * FROM system_events ORDER BY timestamp DESC LIMIT $1",
        )
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(events)
    }
}
