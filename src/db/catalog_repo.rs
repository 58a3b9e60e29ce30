// src/db/catalog_repo.rs

use rust_decimal::Decimal;
use sqlx::{types::Json, Executor, PgPool, Postgres};
use uuid::Uuid;
use crate::{
    common::error::AppError,
    models::catalog::{Department, Product, ProductSnapshot, Promotion},
};

#[derive(Clone)]
pub struct CatalogRepository {
    pool: PgPool,
}

impl CatalogRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    // =========================================================================
    //  PRODUTOS
    // =========================================================================

    pub async fn create_product(
        &self,
        chefe_id: Uuid,
        name: &str,
        price: Decimal,
        department: Department,
    ) -> Result<Product, AppError> {
        let product = sqlx::query_as::<_, Product>(
            r#"
            INSERT INTO products (chefe_id, name, price, department)
            VALUES ($1, $2, $3, $4)
            RETURNING *
            "#,
        )
        .bind(chefe_id)
        .bind(name)
        .bind(price)
        .bind(department)
        .fetch_one(&self.pool)
        .await?;

        Ok(product)
    }

    pub async fn list_products(
        &self,
        chefe_id: Uuid,
        department: Option<Department>,
    ) -> Result<Vec<Product>, AppError> {
        let products = sqlx::query_as::<_, Product>(
            r#"
            SELECT * FROM products
            WHERE chefe_id = $1 AND ($2::department IS NULL OR department = $2)
            ORDER BY name ASC
            "#,
        )
        .bind(chefe_id)
        .bind(department)
        .fetch_all(&self.pool)
        .await?;

        Ok(products)
    }

    // Busca vários produtos de uma vez (montagem de pedido e de combo)
    pub async fn find_products<'e, E>(
        &self,
        executor: E,
        chefe_id: Uuid,
        ids: &[Uuid],
    ) -> Result<Vec<Product>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let products = sqlx::query_as::<_, Product>(
            "SELECT * FROM products WHERE chefe_id = $1 AND id = ANY($2)",
        )
        .bind(chefe_id)
        .bind(ids)
        .fetch_all(executor)
        .await?;

        Ok(products)
    }

    pub async fn update_product(
        &self,
        chefe_id: Uuid,
        id: Uuid,
        name: Option<&str>,
        price: Option<Decimal>,
        department: Option<Department>,
    ) -> Result<Product, AppError> {
        let product = sqlx::query_as::<_, Product>(
            r#"
            UPDATE products SET
                name = COALESCE($3, name),
                price = COALESCE($4, price),
                department = COALESCE($5, department)
            WHERE id = $1 AND chefe_id = $2
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(chefe_id)
        .bind(name)
        .bind(price)
        .bind(department)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::ResourceNotFound("Produto".into()))?;

        Ok(product)
    }

    pub async fn delete_product(&self, chefe_id: Uuid, id: Uuid) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM products WHERE id = $1 AND chefe_id = $2")
            .bind(id)
            .bind(chefe_id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    // =========================================================================
    //  PROMOÇÕES
    // =========================================================================

    pub async fn create_promotion(
        &self,
        chefe_id: Uuid,
        name: &str,
        products: &[ProductSnapshot],
        original_price: Decimal,
        discount_percentage: Decimal,
        final_price: Decimal,
    ) -> Result<Promotion, AppError> {
        let promotion = sqlx::query_as::<_, Promotion>(
            r#"
            INSERT INTO promotions (
                chefe_id, name, products, original_price, discount_percentage, final_price
            )
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING *
            "#,
        )
        .bind(chefe_id)
        .bind(name)
        .bind(Json(products))
        .bind(original_price)
        .bind(discount_percentage)
        .bind(final_price)
        .fetch_one(&self.pool)
        .await?;

        Ok(promotion)
    }

    pub async fn list_promotions(&self, chefe_id: Uuid, only_active: bool) -> Result<Vec<Promotion>, AppError> {
        let promotions = sqlx::query_as::<_, Promotion>(
            r#"
            SELECT * FROM promotions
            WHERE chefe_id = $1 AND (NOT $2 OR is_active)
            ORDER BY name ASC
            "#,
        )
        .bind(chefe_id)
        .bind(only_active)
        .fetch_all(&self.pool)
        .await?;

        Ok(promotions)
    }

    pub async fn find_promotion<'e, E>(
        &self,
        executor: E,
        chefe_id: Uuid,
        id: Uuid,
    ) -> Result<Option<Promotion>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let promotion = sqlx::query_as::<_, Promotion>(
            "SELECT * FROM promotions WHERE id = $1 AND chefe_id = $2",
        )
        .bind(id)
        .bind(chefe_id)
        .fetch_optional(executor)
        .await?;

        Ok(promotion)
    }

    pub async fn set_promotion_active(
        &self,
        chefe_id: Uuid,
        id: Uuid,
        is_active: bool,
    ) -> Result<Promotion, AppError> {
        let promotion = sqlx::query_as::<_, Promotion>(
            "UPDATE promotions SET is_active = $3 WHERE id = $1 AND chefe_id = $2 RETURNING *",
        )
        .bind(id)
        .bind(chefe_id)
        .bind(is_active)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::ResourceNotFound("Promoção".into()))?;

        Ok(promotion)
    }

    pub async fn delete_promotion(&self, chefe_id: Uuid, id: Uuid) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM promotions WHERE id = $1 AND chefe_id = $2")
            .bind(id)
            .bind(chefe_id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
