//! The mutating half of the domain surface: one [`WriteOp`] variant per
//! funnel-able operation, and the single `apply_write` function that
//! validates and mutates `AppState` under the replica mutex.
//!
//! Read-only operations (listing users, doctors, appointments, medicines,
//! and the sales report) are *not* represented here: reads never pass
//! through the funnel, so they are plain functions taking `&AppState`
//! called directly by the HTTP handlers in `clinic_replica`.

use super::{
    Appointment, AppointmentId, Consultation, ConsultationId, DoctorId, Rating, RatingId,
    SaleRecord, User, UserId,
};
use crate::utils::DomainError;
use serde::{Deserialize, Serialize};

/// One funnel-able mutating operation and its arguments.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum WriteOp {
    Signup {
        username: String,
        password: String,
    },
    Login {
        username: String,
        password: String,
    },
    BookAppointment {
        user_id: UserId,
        doctor_id: DoctorId,
        slot: String,
    },
    CancelAppointment {
        appointment_id: AppointmentId,
    },
    RecordConsultation {
        appointment_id: AppointmentId,
        diagnosis: String,
    },
    RestockMedicine {
        medicine: String,
        quantity: u64,
    },
    SellMedicine {
        medicine: String,
        quantity: u64,
    },
    RateDoctor {
        user_id: UserId,
        doctor_id: DoctorId,
        stars: u8,
    },
}

/// The coordinator's result for a committed [`WriteOp`], passed back to
/// the client verbatim through any number of forwarding hops.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub enum WriteResult {
    Signup { user_id: UserId },
    Login { user_id: UserId },
    BookAppointment { appointment_id: AppointmentId },
    CancelAppointment,
    RecordConsultation { consultation_id: ConsultationId },
    RestockMedicine { new_stock: u64 },
    SellMedicine { total_cents: u64 },
    RateDoctor { rating_id: RatingId },
}

/// Validates and applies a single write against `state`. Mutation only
/// happens after validation succeeds in its entirety, so a `DomainError`
/// return means `state` was left untouched and the caller knows not to
/// take a snapshot.
pub fn apply_write(
    state: &mut super::AppState,
    op: WriteOp,
) -> Result<WriteResult, DomainError> {
    match op {
        WriteOp::Signup { username, password } => {
            if state.users.values().any(|u| u.username == username) {
                return Err(DomainError::UsernameTaken);
            }
            let id = state.next_user_id;
            state.next_user_id += 1;
            state.users.insert(id, User { id, username, password });
            Ok(WriteResult::Signup { user_id: id })
        }

        WriteOp::Login { username, password } => {
            let user = state
                .users
                .values()
                .find(|u| u.username == username)
                .ok_or(DomainError::InvalidCredentials)?;
            if user.password != password {
                return Err(DomainError::InvalidCredentials);
            }
            Ok(WriteResult::Login { user_id: user.id })
        }

        WriteOp::BookAppointment {
            user_id,
            doctor_id,
            slot,
        } => {
            if !state.users.contains_key(&user_id) {
                return Err(DomainError::UserNotFound);
            }
            if !state.doctors.contains_key(&doctor_id) {
                return Err(DomainError::DoctorNotFound);
            }
            let slot_taken = state.appointments.values().any(|a| {
                !a.cancelled && a.doctor_id == doctor_id && a.slot == slot
            });
            if slot_taken {
                return Err(DomainError::SlotTaken);
            }
            let id = state.next_appointment_id;
            state.next_appointment_id += 1;
            state.appointments.insert(
                id,
                Appointment {
                    id,
                    user_id,
                    doctor_id,
                    slot,
                    cancelled: false,
                },
            );
            Ok(WriteResult::BookAppointment { appointment_id: id })
        }

        WriteOp::CancelAppointment { appointment_id } => {
            let appt = state
                .appointments
                .get_mut(&appointment_id)
                .ok_or(DomainError::AppointmentNotFound)?;
            appt.cancelled = true;
            Ok(WriteResult::CancelAppointment)
        }

        WriteOp::RecordConsultation {
            appointment_id,
            diagnosis,
        } => {
            if !state.appointments.contains_key(&appointment_id) {
                return Err(DomainError::AppointmentNotFound);
            }
            let id = state.next_consultation_id;
            state.next_consultation_id += 1;
            state.consultations.insert(
                id,
                Consultation {
                    id,
                    appointment_id,
                    diagnosis,
                },
            );
            Ok(WriteResult::RecordConsultation { consultation_id: id })
        }

        WriteOp::RestockMedicine { medicine, quantity } => {
            let med = state
                .medicines
                .iter_mut()
                .find(|m| m.name == medicine)
                .ok_or(DomainError::MedicineNotFound)?;
            med.stock += quantity;
            Ok(WriteResult::RestockMedicine { new_stock: med.stock })
        }

        WriteOp::SellMedicine { medicine, quantity } => {
            let med = state
                .medicines
                .iter_mut()
                .find(|m| m.name == medicine)
                .ok_or(DomainError::MedicineNotFound)?;
            if med.stock < quantity {
                return Err(DomainError::InsufficientStock);
            }
            med.stock -= quantity;
            let total_cents = med.price_cents * quantity;
            state.sales.push(SaleRecord {
                medicine: med.name.clone(),
                quantity,
                total_cents,
            });
            Ok(WriteResult::SellMedicine { total_cents })
        }

        WriteOp::RateDoctor {
            user_id,
            doctor_id,
            stars,
        } => {
            if !(1..=5).contains(&stars) {
                return Err(DomainError::InvalidRating);
            }
            if !state.users.contains_key(&user_id) {
                return Err(DomainError::UserNotFound);
            }
            if !state.doctors.contains_key(&doctor_id) {
                return Err(DomainError::DoctorNotFound);
            }
            let id = state.next_rating_id;
            state.next_rating_id += 1;
            state.ratings.insert(
                id,
                Rating {
                    id,
                    user_id,
                    doctor_id,
                    stars,
                },
            );
            Ok(WriteResult::RateDoctor { rating_id: id })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::AppState;

    #[test]
    fn signup_then_duplicate_rejected() {
        let mut state = AppState::seeded();
        let r = apply_write(
            &mut state,
            WriteOp::Signup {
                username: "a".into(),
                password: "p".into(),
            },
        )
        .unwrap();
        assert_eq!(r, WriteResult::Signup { user_id: 1 });

        let err = apply_write(
            &mut state,
            WriteOp::Signup {
                username: "a".into(),
                password: "q".into(),
            },
        )
        .unwrap_err();
        assert_eq!(err, DomainError::UsernameTaken);
        // rejected write must not have mutated state further
        assert_eq!(state.users.len(), 1);
    }

    #[test]
    fn book_same_slot_twice_fails() {
        let mut state = AppState::seeded();
        apply_write(
            &mut state,
            WriteOp::Signup {
                username: "a".into(),
                password: "p".into(),
            },
        )
        .unwrap();

        apply_write(
            &mut state,
            WriteOp::BookAppointment {
                user_id: 1,
                doctor_id: 1,
                slot: "2026-07-27T09:00".into(),
            },
        )
        .unwrap();

        let err = apply_write(
            &mut state,
            WriteOp::BookAppointment {
                user_id: 1,
                doctor_id: 1,
                slot: "2026-07-27T09:00".into(),
            },
        )
        .unwrap_err();
        assert_eq!(err, DomainError::SlotTaken);
    }

    #[test]
    fn sell_more_than_stock_fails_and_does_not_log_sale() {
        let mut state = AppState::seeded();
        let err = apply_write(
            &mut state,
            WriteOp::SellMedicine {
                medicine: "Paracetamol".into(),
                quantity: 10_000,
            },
        )
        .unwrap_err();
        assert_eq!(err, DomainError::InsufficientStock);
        assert!(state.sales.is_empty());
    }

    #[test]
    fn validate_shape_rejects_dangling_appointment() {
        let mut state = AppState::seeded();
        state.appointments.insert(
            99,
            Appointment {
                id: 99,
                user_id: 404,
                doctor_id: 1,
                slot: "x".into(),
                cancelled: false,
            },
        );
        assert!(!state.validate_shape());
    }
}
