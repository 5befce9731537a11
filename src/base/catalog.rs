//! The fixed event catalog.
//!
//! Events are seeded into storage on every start and never created or removed
//! at runtime. Run times rank lowest-first; everything else ranks highest-first.

use crate::base::types::Event;

/// A catalog entry: the event name and whether it is timed.
pub struct CatalogEvent {
    pub name: &'static str,
    pub time_based: bool,
}

pub const EVENT_CATALOG: [CatalogEvent; 8] = [
    CatalogEvent { name: "2 Mile Run", time_based: true },
    CatalogEvent { name: "5 Mile Run", time_based: true },
    CatalogEvent { name: "Hand Release Push-Ups", time_based: false },
    CatalogEvent { name: "Strict Dead-Hang Pull-Ups", time_based: false },
    CatalogEvent { name: "Plank", time_based: false },
    CatalogEvent { name: "Squat 1RM", time_based: false },
    CatalogEvent { name: "Bench 1RM", time_based: false },
    CatalogEvent { name: "Deadlift 1RM", time_based: false },
];

impl CatalogEvent {
    pub fn to_event(&self) -> Event {
        Event {
            name: self.name.to_string(),
            time_based: self.time_based,
        }
    }
}

/// Position of an event in the catalog, used to keep listings in a stable order.
pub fn catalog_position(name: &str) -> Option<usize> {
    EVENT_CATALOG.iter().position(|e| e.name == name)
}

// Tests.
