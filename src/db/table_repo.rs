// src/db/table_repo.rs

use sqlx::{Executor, PgPool, Postgres};
use uuid::Uuid;
use crate::{
    common::error::AppError,
    models::tables::{RestaurantTable, TableStatus},
};

#[derive(Clone)]
pub struct TableRepository {
    pool: PgPool,
}

impl TableRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn create(&self, chefe_id: Uuid, number: i32) -> Result<RestaurantTable, AppError> {
        sqlx::query_as::<_, RestaurantTable>(
            "INSERT INTO restaurant_tables (chefe_id, number) VALUES ($1, $2) RETURNING *",
        )
        .bind(chefe_id)
        .bind(number)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            if let Some(db_err) = e.as_database_error() {
                if db_err.is_unique_violation() {
                    return AppError::UniqueConstraintViolation(format!("Mesa {}", number));
                }
            }
            e.into()
        })
    }

    pub async fn list(&self, chefe_id: Uuid) -> Result<Vec<RestaurantTable>, AppError> {
        let tables = sqlx::query_as::<_, RestaurantTable>(
            "SELECT * FROM restaurant_tables WHERE chefe_id = $1 ORDER BY number ASC",
        )
        .bind(chefe_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(tables)
    }

    // `order_id` acompanha o status: Occupied aponta para o pedido aberto, os outros limpam
    pub async fn set_status<'e, E>(
        &self,
        executor: E,
        chefe_id: Uuid,
        id: Uuid,
        status: TableStatus,
        order_id: Option<Uuid>,
    ) -> Result<RestaurantTable, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query_as::<_, RestaurantTable>(
            r#"
            UPDATE restaurant_tables SET status = $3, order_id = $4
            WHERE id = $1 AND chefe_id = $2
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(chefe_id)
        .bind(status)
        .bind(order_id)
        .fetch_optional(executor)
        .await?
        .ok_or_else(|| AppError::ResourceNotFound("Mesa".into()))
    }
}
