// src/services/reservation_service.rs

use chrono::{DateTime, FixedOffset, NaiveDate, Utc};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::ReservationRepository,
    models::reservations::{Reservation, ReservationStatus},
    services::closing_service::day_window,
};

// Dados da reserva como chegam do atendimento
#[derive(Debug, Clone)]
pub struct NewReservation {
    pub name: String,
    pub pax: i32,
    pub phone: String,
    pub reservation_time: DateTime<Utc>,
    pub table_id: Option<Uuid>,
    pub notes: Option<String>,
}

pub fn ensure_transition(from: ReservationStatus, to: ReservationStatus) -> Result<(), AppError> {
    if !from.can_transition_to(to) {
        return Err(AppError::InvalidStatusTransition {
            from: from.as_str().to_string(),
            to: to.as_str().to_string(),
        });
    }
    Ok(())
}

#[derive(Clone)]
pub struct ReservationService {
    reservation_repo: ReservationRepository,
    offset: FixedOffset,
}

impl ReservationService {
    pub fn new(reservation_repo: ReservationRepository, offset: FixedOffset) -> Self {
        Self { reservation_repo, offset }
    }

    /// Toda reserva nasce Aguardando.
    pub async fn create(&self, chefe_id: Uuid, created_by: Uuid, new: NewReservation) -> Result<Reservation, AppError> {
        let notes = new.notes.as_deref().map(str::trim).filter(|n| !n.is_empty());

        let reservation = self.reservation_repo
            .create(
                chefe_id,
                new.name.trim(),
                new.pax,
                new.phone.trim(),
                new.reservation_time,
                new.table_id,
                notes,
                created_by,
            )
            .await?;

        tracing::info!(
            "📅 Reserva para {} ({} pessoas) em {}",
            reservation.name, reservation.pax, reservation.reservation_time
        );
        Ok(reservation)
    }

    /// Sem data lista tudo; com data, só as reservas daquele dia local.
    pub async fn list(&self, chefe_id: Uuid, date: Option<NaiveDate>) -> Result<Vec<Reservation>, AppError> {
        let (from, to) = match date {
            Some(date) => {
                let (start, end) = day_window(date, self.offset)?;
                (Some(start), Some(end))
            }
            None => (None, None),
        };

        self.reservation_repo.list(chefe_id, from, to).await
    }

    pub async fn update_status(
        &self,
        chefe_id: Uuid,
        id: Uuid,
        status: ReservationStatus,
    ) -> Result<Reservation, AppError> {
        let current = self.reservation_repo.find(chefe_id, id).await?;
        ensure_transition(current.status, status)?;

        self.reservation_repo.update_status(chefe_id, id, status).await
    }

    pub async fn delete(&self, chefe_id: Uuid, id: Uuid) -> Result<(), AppError> {
        if !self.reservation_repo.delete(chefe_id, id).await? {
            return Err(AppError::ResourceNotFound("Reserva".into()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reopening_cancelled_reservation_is_rejected() {
        let err = ensure_transition(ReservationStatus::Cancelada, ReservationStatus::Aguardando).unwrap_err();
        assert!(matches!(
            err,
            AppError::InvalidStatusTransition { ref from, ref to } if from == "Cancelada" && to == "Aguardando"
        ));
    }

    #[test]
    fn confirming_waiting_reservation_is_allowed() {
        assert!(ensure_transition(ReservationStatus::Aguardando, ReservationStatus::Confirmada).is_ok());
    }
}
