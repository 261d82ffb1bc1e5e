use crate::domain::Coordinate;
use chrono::{Local, TimeZone};
use serde::Serialize;

/// A single position fix. Immutable once created; the location provider keeps
/// exactly one current sample and replaces it wholesale.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct LocationSample {
    coordinate: Coordinate,
    accuracy_m: f64,
    captured_at: i64, // Epoch milliseconds
}

impl LocationSample {
    pub fn new(coordinate: Coordinate, accuracy_m: f64, captured_at: i64) -> Self {
        LocationSample {
            coordinate,
            accuracy_m,
            captured_at,
        }
    }

    pub fn coordinate(&self) -> &Coordinate {
        &self.coordinate
    }

    pub fn accuracy_m(&self) -> f64 {
        self.accuracy_m
    }

    pub fn captured_at(&self) -> i64 {
        self.captured_at
    }

    pub fn position_string(&self) -> String {
        format!("{:.6}, {:.6}", self.coordinate.latitude, self.coordinate.longitude)
    }

    pub fn accuracy_string(&self) -> String {
        format!("±{}m", self.accuracy_m.round() as i64)
    }

    pub fn captured_at_string(&self) -> String {
        Local
            .timestamp_millis_opt(self.captured_at)
            .single()
            .map(|datetime| datetime.to_string())
            .unwrap_or_else(|| "Unknown time".to_string())
    }
}
