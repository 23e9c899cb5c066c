// Canonical seat map structures shared by every dialect
use std::collections::HashSet;

use serde::Serialize;
use serde_json::{Map, Value};

// Sentinel for data the source document does not carry
pub const NOT_AVAILABLE: &str = "NA";

// Element kind of every seat map entry; the supported dialects only describe seats
pub const SEAT_TYPE: &str = "Seat";

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FlightRecord {
    pub flight_number: String,
    pub departure_time: String, // opaque, as written in the document
    pub departure_location: String,
    pub arrival_location: String,
    pub rows: Vec<RowRecord>,
}

impl FlightRecord {
    pub fn seats(&self) -> impl Iterator<Item = &SeatRecord> {
        self.rows.iter().flat_map(|row| row.seats.iter())
    }

    pub fn seat_count(&self) -> usize {
        self.rows.iter().map(|row| row.seats.len()).sum()
    }

    pub fn find_seat(&self, id: &str) -> Option<&SeatRecord> {
        self.seats().find(|seat| seat.id == id)
    }

    // First seat id that appears more than once, in document order
    pub fn duplicate_seat_id(&self) -> Option<&str> {
        let mut seen = HashSet::new();
        self.seats()
            .map(|seat| seat.id.as_str())
            .find(|id| !seen.insert(*id))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RowRecord {
    pub row_number: String,
    pub cabin_class: String,
    pub seats: Vec<SeatRecord>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SeatRecord {
    #[serde(rename = "type")]
    pub seat_type: String,
    pub id: String,
    pub available: String,
    pub price: String,
    // Dialect specific, kept verbatim and in insertion order
    pub additional_info: Map<String, Value>,
}

impl SeatRecord {
    pub fn new(id: String, available: String, price: Option<String>) -> Self {
        Self {
            seat_type: SEAT_TYPE.to_string(),
            id,
            available,
            price: price.unwrap_or_else(|| NOT_AVAILABLE.to_string()),
            additional_info: Map::new(),
        }
    }
}
