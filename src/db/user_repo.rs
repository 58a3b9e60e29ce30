use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::auth::{Identity, Role, User},
};

// O repositório de usuários: credenciais ('identities') e usuários da aplicação ('users')
#[derive(Clone)]
pub struct UserRepository {
    pool: PgPool,
}

impl UserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    // =========================================================================
    //  IDENTIDADES (credenciais)
    // =========================================================================

    pub async fn find_identity_by_email(&self, email: &str) -> Result<Option<Identity>, AppError> {
        let identity = sqlx::query_as::<_, Identity>("SELECT * FROM identities WHERE email = $1")
            .bind(email)
            .fetch_optional(&self.pool)
            .await?;

        Ok(identity)
    }

    pub async fn create_identity(&self, email: &str, password_hash: &str) -> Result<Identity, AppError> {
        sqlx::query_as::<_, Identity>(
            "INSERT INTO identities (email, password_hash) VALUES ($1, $2) RETURNING *",
        )
        .bind(email)
        .bind(password_hash)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            // Converte erro de violação de chave única em um erro mais amigável
            if let Some(db_err) = e.as_database_error() {
                if db_err.is_unique_violation() {
                    return AppError::EmailAlreadyExists;
                }
            }
            e.into()
        })
    }

    // =========================================================================
    //  USUÁRIOS
    // =========================================================================

    // A resolução identidade -> usuário é feita pelo e-mail, não pelo ID
    pub async fn find_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE email = $1")
            .bind(email)
            .fetch_optional(&self.pool)
            .await?;

        Ok(user)
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, AppError> {
        let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(user)
    }

    pub async fn list_all(&self) -> Result<Vec<User>, AppError> {
        let users = sqlx::query_as::<_, User>("SELECT * FROM users ORDER BY name ASC")
            .fetch_all(&self.pool)
            .await?;

        Ok(users)
    }

    // Equipe de um restaurante: o próprio chefe e quem aponta para ele
    pub async fn list_by_chefe(&self, chefe_id: Uuid) -> Result<Vec<User>, AppError> {
        let users = sqlx::query_as::<_, User>(
            "SELECT * FROM users WHERE id = $1 OR chefe_id = $1 ORDER BY name ASC",
        )
        .bind(chefe_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(users)
    }

    pub async fn create_user(
        &self,
        name: &str,
        email: &str,
        role: Role,
        chefe_id: Option<Uuid>,
    ) -> Result<User, AppError> {
        sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (name, email, role, chefe_id)
            VALUES ($1, $2, $3, $4)
            RETURNING *
            "#,
        )
        .bind(name)
        .bind(email)
        .bind(role)
        .bind(chefe_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            if let Some(db_err) = e.as_database_error() {
                if db_err.is_unique_violation() {
                    return AppError::EmailAlreadyExists;
                }
            }
            e.into()
        })
    }

    pub async fn delete_user(&self, id: Uuid) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    pub async fn update_photo_url(&self, id: Uuid, photo_url: Option<&str>) -> Result<User, AppError> {
        let user = sqlx::query_as::<_, User>(
            "UPDATE users SET photo_url = $1 WHERE id = $2 RETURNING *",
        )
        .bind(photo_url)
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::ResourceNotFound("Usuário".into()))?;

        Ok(user)
    }
}
