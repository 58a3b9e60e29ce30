// src/db/order_repo.rs

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::{types::Json, Executor, PgPool, Postgres};
use uuid::Uuid;
use crate::{
    common::error::AppError,
    models::orders::{Order, OrderItem, OrderStatus},
};

// Filtros da listagem de pedidos
#[derive(Debug, Default, Clone)]
pub struct OrderFilter {
    pub status: Option<OrderStatus>,
    pub comanda_id: Option<i32>,
    pub from: Option<DateTime<Utc>>,
    pub to: Option<DateTime<Utc>>,
}

#[derive(Clone)]
pub struct OrderRepository {
    pool: PgPool,
}

impl OrderRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn create_order<'e, E>(
        &self,
        executor: E,
        chefe_id: Uuid,
        comanda_id: i32,
        customer_id: Option<Uuid>,
        waiter_id: Option<Uuid>,
        table_id: Option<Uuid>,
        items: &[OrderItem],
        total: Decimal,
    ) -> Result<Order, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let order = sqlx::query_as::<_, Order>(
            r#"
            INSERT INTO orders (
                chefe_id, comanda_id, customer_id, waiter_id, table_id, items, total
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING *
            "#,
        )
        .bind(chefe_id)
        .bind(comanda_id)
        .bind(customer_id)
        .bind(waiter_id)
        .bind(table_id)
        .bind(Json(items))
        .bind(total)
        .fetch_one(executor)
        .await?;

        Ok(order)
    }

    pub async fn find<'e, E>(&self, executor: E, chefe_id: Uuid, id: Uuid) -> Result<Order, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query_as::<_, Order>("SELECT * FROM orders WHERE id = $1 AND chefe_id = $2")
            .bind(id)
            .bind(chefe_id)
            .fetch_optional(executor)
            .await?
            .ok_or_else(|| AppError::ResourceNotFound("Pedido".into()))
    }

    pub async fn list(&self, chefe_id: Uuid, filter: &OrderFilter) -> Result<Vec<Order>, AppError> {
        let orders = sqlx::query_as::<_, Order>(
            r#"
            SELECT * FROM orders
            WHERE chefe_id = $1
              AND ($2::order_status IS NULL OR status = $2)
              AND ($3::int IS NULL OR comanda_id = $3)
              AND ($4::timestamptz IS NULL OR created_at >= $4)
              AND ($5::timestamptz IS NULL OR created_at < $5)
            ORDER BY created_at DESC
            "#,
        )
        .bind(chefe_id)
        .bind(filter.status)
        .bind(filter.comanda_id)
        .bind(filter.from)
        .bind(filter.to)
        .fetch_all(&self.pool)
        .await?;

        Ok(orders)
    }

    // Pedidos ainda na fila das estações (cozinha/bar)
    pub async fn list_open(&self, chefe_id: Uuid) -> Result<Vec<Order>, AppError> {
        let orders = sqlx::query_as::<_, Order>(
            r#"
            SELECT * FROM orders
            WHERE chefe_id = $1 AND status <> 'COMPLETED'
            ORDER BY created_at ASC
            "#,
        )
        .bind(chefe_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(orders)
    }

    // Fila da estação de impressão. `chefe_id` vazio = todos os restaurantes (worker).
    pub async fn list_unprinted(&self, chefe_id: Option<Uuid>, limit: i64) -> Result<Vec<Order>, AppError> {
        let orders = sqlx::query_as::<_, Order>(
            r#"
            SELECT * FROM orders
            WHERE printed_at IS NULL AND ($1::uuid IS NULL OR chefe_id = $1)
            ORDER BY created_at ASC
            LIMIT $2
            "#,
        )
        .bind(chefe_id)
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(orders)
    }

    // Regrava o array de itens inteiro junto com o novo total. Sem controle de concorrência.
    pub async fn update_items<'e, E>(
        &self,
        executor: E,
        chefe_id: Uuid,
        id: Uuid,
        items: &[OrderItem],
        total: Decimal,
    ) -> Result<Order, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query_as::<_, Order>(
            r#"
            UPDATE orders SET items = $3, total = $4
            WHERE id = $1 AND chefe_id = $2
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(chefe_id)
        .bind(Json(items))
        .bind(total)
        .fetch_optional(executor)
        .await?
        .ok_or_else(|| AppError::ResourceNotFound("Pedido".into()))
    }

    pub async fn update_status<'e, E>(
        &self,
        executor: E,
        chefe_id: Uuid,
        id: Uuid,
        status: OrderStatus,
    ) -> Result<Order, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query_as::<_, Order>(
            "UPDATE orders SET status = $3 WHERE id = $1 AND chefe_id = $2 RETURNING *",
        )
        .bind(id)
        .bind(chefe_id)
        .bind(status)
        .fetch_optional(executor)
        .await?
        .ok_or_else(|| AppError::ResourceNotFound("Pedido".into()))
    }

    pub async fn close<'e, E>(
        &self,
        executor: E,
        chefe_id: Uuid,
        id: Uuid,
        payment_method: &str,
        total: Decimal,
    ) -> Result<Order, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query_as::<_, Order>(
            r#"
            UPDATE orders
            SET status = 'COMPLETED', payment_method = $3, total = $4
            WHERE id = $1 AND chefe_id = $2
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(chefe_id)
        .bind(payment_method)
        .bind(total)
        .fetch_optional(executor)
        .await?
        .ok_or_else(|| AppError::ResourceNotFound("Pedido".into()))
    }

    pub async fn mark_printed(&self, id: Uuid, printed_at: DateTime<Utc>) -> Result<(), AppError> {
        let result = sqlx::query("UPDATE orders SET printed_at = $2 WHERE id = $1")
            .bind(id)
            .bind(printed_at)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::ResourceNotFound("Pedido".into()));
        }
        Ok(())
    }
}
