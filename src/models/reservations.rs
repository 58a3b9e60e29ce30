// src/models/reservations.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;
use utoipa::ToSchema;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "reservation_status", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ReservationStatus {
    Confirmada,
    Aguardando,
    Cancelada,
}

impl ReservationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReservationStatus::Confirmada => "Confirmada",
            ReservationStatus::Aguardando => "Aguardando",
            ReservationStatus::Cancelada => "Cancelada",
        }
    }

    /// Aguardando -> Confirmada | Cancelada, Confirmada -> Cancelada. Cancelada é final.
    pub fn can_transition_to(&self, next: ReservationStatus) -> bool {
        matches!(
            (self, next),
            (ReservationStatus::Aguardando, ReservationStatus::Confirmada)
                | (ReservationStatus::Aguardando, ReservationStatus::Cancelada)
                | (ReservationStatus::Confirmada, ReservationStatus::Cancelada)
        )
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Reservation {
    pub id: Uuid,
    #[schema(ignore)]
    pub chefe_id: Uuid,
    #[schema(example = "Família Oliveira")]
    pub name: String,
    #[schema(example = 4)]
    pub pax: i32,
    #[schema(example = "(11) 98888-7777")]
    pub phone: String,
    pub reservation_time: DateTime<Utc>,
    pub table_id: Option<Uuid>,
    pub notes: Option<String>,
    pub status: ReservationStatus,
    pub created_by: Uuid,
    pub created_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::ReservationStatus::*;

    #[test]
    fn cancelled_is_terminal() {
        assert!(!Cancelada.can_transition_to(Aguardando));
        assert!(!Cancelada.can_transition_to(Confirmada));
    }

    #[test]
    fn waiting_can_be_confirmed_or_cancelled() {
        assert!(Aguardando.can_transition_to(Confirmada));
        assert!(Aguardando.can_transition_to(Cancelada));
        assert!(Confirmada.can_transition_to(Cancelada));
        assert!(!Confirmada.can_transition_to(Aguardando));
    }
}
