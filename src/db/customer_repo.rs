// src/db/customer_repo.rs

use chrono::{DateTime, Utc};
use sqlx::{Executor, PgPool, Postgres};
use uuid::Uuid;
use crate::{common::error::AppError, models::customers::Customer};

#[derive(Clone)]
pub struct CustomerRepository {
    pool: PgPool,
}

impl CustomerRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn check_in(
        &self,
        chefe_id: Uuid,
        name: &str,
        cpf: &str,
        wristband_id: i32,
        table_id: Option<Uuid>,
    ) -> Result<Customer, AppError> {
        let customer = sqlx::query_as::<_, Customer>(
            r#"
            INSERT INTO customers (chefe_id, name, cpf, wristband_id, table_id)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING *
            "#,
        )
        .bind(chefe_id)
        .bind(name)
        .bind(cpf)
        .bind(wristband_id)
        .bind(table_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(customer)
    }

    // `since` limita aos check-ins a partir de um instante (ex: início do dia)
    pub async fn list(&self, chefe_id: Uuid, since: Option<DateTime<Utc>>) -> Result<Vec<Customer>, AppError> {
        let customers = sqlx::query_as::<_, Customer>(
            r#"
            SELECT * FROM customers
            WHERE chefe_id = $1 AND ($2::timestamptz IS NULL OR check_in >= $2)
            ORDER BY check_in DESC
            "#,
        )
        .bind(chefe_id)
        .bind(since)
        .fetch_all(&self.pool)
        .await?;

        Ok(customers)
    }

    // A mesma pulseira é reutilizada em dias diferentes: vale o check-in mais recente
    pub async fn find_by_wristband<'e, E>(
        &self,
        executor: E,
        chefe_id: Uuid,
        wristband_id: i32,
    ) -> Result<Option<Customer>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let customer = sqlx::query_as::<_, Customer>(
            r#"
            SELECT * FROM customers
            WHERE chefe_id = $1 AND wristband_id = $2
            ORDER BY check_in DESC
            LIMIT 1
            "#,
        )
        .bind(chefe_id)
        .bind(wristband_id)
        .fetch_optional(executor)
        .await?;

        Ok(customer)
    }

    pub async fn count_checked_in_between(
        &self,
        chefe_id: Uuid,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<i64, AppError> {
        let count: i64 = sqlx::query_scalar(
            r#"
            SELECT COUNT(*) FROM customers
            WHERE chefe_id = $1 AND check_in >= $2 AND check_in < $3
            "#,
        )
        .bind(chefe_id)
        .bind(start)
        .bind(end)
        .fetch_one(&self.pool)
        .await?;

        Ok(count)
    }

    pub async fn delete(&self, chefe_id: Uuid, id: Uuid) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM customers WHERE id = $1 AND chefe_id = $2")
            .bind(id)
            .bind(chefe_id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
