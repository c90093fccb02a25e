//! Feedback entity - A rating and comment left on a program.
//!
//! Feedback is embedded in exactly one program's list; cross-program views flatten the
//! per-program lists instead of addressing feedback globally.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Unique identifier of a feedback entry
pub type FeedbackId = u64;

/// Lowest rating a traveler can give
pub const MIN_RATING: u8 = 1;
/// Highest rating a traveler can give
pub const MAX_RATING: u8 = 5;
/// Ratings at or above this value count as positive sentiment
pub const POSITIVE_RATING: u8 = 4;

/// Traveler feedback on a program
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Feedback {
    /// Unique identifier
    pub id: FeedbackId,
    /// Display name of the author (e.g., "Maria S.")
    pub author: String,
    /// Avatar image URI
    pub avatar: String,
    /// Rating from 1 to 5 inclusive
    pub rating: u8,
    /// Free text comment
    pub comment: String,
    /// Day the feedback was written
    pub date: NaiveDate,
}

impl Feedback {
    /// Whether the rating counts towards the positive share of a city.
    #[must_use]
    pub const fn is_positive(&self) -> bool {
        self.rating >= POSITIVE_RATING
    }
}
