// src/models/customers.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;
use utoipa::ToSchema;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Customer {
    pub id: Uuid,
    #[schema(ignore)]
    pub chefe_id: Uuid,
    #[schema(example = "João da Silva")]
    pub name: String,
    #[schema(example = "123.456.789-00")]
    pub cpf: String,
    // Número da pulseira, que também identifica a comanda
    #[schema(example = 42)]
    pub wristband_id: i32,
    pub table_id: Option<Uuid>,
    pub check_in: DateTime<Utc>,
}
