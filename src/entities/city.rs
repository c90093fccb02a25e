//! City safety entity - Traffic-light aggregate per destination city.
//!
//! Values of this type are always derived from programs and their feedback, see
//! `core::derive::city_safety`.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Traffic-light safety rating of a city
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SafetyStatus {
    /// At least 80% positive feedback
    Green,
    /// Between 60% and 79% positive feedback
    Yellow,
    /// Below 60% positive feedback
    Red,
    /// Not enough feedback to judge
    Neutral,
}

impl fmt::Display for SafetyStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Green => "Green",
            Self::Yellow => "Yellow",
            Self::Red => "Red",
            Self::Neutral => "Neutral",
        };
        f.write_str(label)
    }
}

/// Geographic position used for map placement
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    /// Latitude in degrees
    pub lat: f64,
    /// Longitude in degrees
    pub lng: f64,
}

/// Aggregated safety data of one destination city
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CitySafetyData {
    /// Position in the derived list, starting at 1
    pub id: u64,
    /// City name
    pub city_name: String,
    /// Country name
    pub country_name: String,
    /// Derived traffic-light status
    pub safety_status: SafetyStatus,
    /// Share of ratings at or above 4, rounded to a whole percent
    pub positive_feedback_percentage: u8,
    /// Number of feedback entries across all programs in the city
    pub total_feedbacks: usize,
    /// Map position
    pub coords: Coordinates,
    /// Display radius in metres
    pub radius: u32,
}
