//! Built-in seed data loaded at process start. There is no persistence
//! layer: the doctor roster and medicine catalog are compiled into the
//! binary and re-loaded fresh every time a replica starts.

use super::{AppState, Doctor, Medicine};
use std::collections::HashMap;

pub(super) fn seeded_state() -> AppState {
    let doctors = [
        (1, "Alice Nandi", "General Medicine"),
        (2, "Brian Okafor", "Pediatrics"),
        (3, "Chen Wei", "Cardiology"),
    ]
    .into_iter()
    .map(|(id, name, specialty)| {
        (
            id,
            Doctor {
                id,
                name: name.to_string(),
                specialty: specialty.to_string(),
            },
        )
    })
    .collect::<HashMap<_, _>>();

    let medicines = vec![
        Medicine {
            name: "Paracetamol".to_string(),
            price_cents: 250,
            stock: 200,
        },
        Medicine {
            name: "Amoxicillin".to_string(),
            price_cents: 900,
            stock: 80,
        },
        Medicine {
            name: "Ibuprofen".to_string(),
            price_cents: 400,
            stock: 150,
        },
    ];

    AppState {
        users: HashMap::new(),
        next_user_id: 1,
        doctors,
        appointments: HashMap::new(),
        next_appointment_id: 1,
        consultations: HashMap::new(),
        next_consultation_id: 1,
        medicines,
        ratings: HashMap::new(),
        next_rating_id: 1,
        sales: Vec::new(),
    }
}
