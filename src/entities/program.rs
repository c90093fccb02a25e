//! Program entity - An exchange or study-abroad offering.
//!
//! The owning agency is stored by value. Editing an agency does not rewrite the copies
//! already held by its programs.

use super::{Agency, Feedback};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Unique identifier of a program
pub type ProgramId = u64;

/// Exchange program record
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Program {
    /// Unique identifier, never shared by two programs in the same collection
    pub id: ProgramId,
    /// Display name
    pub name: String,
    /// Denormalized copy of the owning agency
    pub agency: Agency,
    /// Destination city name
    pub destination_city: String,
    /// Destination country name
    pub destination_country: String,
    /// Price in whole currency units
    pub price: u32,
    /// One-line summary used on cards and in text search
    pub short_description: String,
    /// Full description shown on the detail page
    pub long_description: String,
    /// What the price includes, in display order
    pub includes: Vec<String>,
    /// Feedback left by past travelers
    pub feedbacks: Vec<Feedback>,
    /// Cover image URI
    pub image: String,
    /// Verification tags earned by the program
    #[serde(default)]
    pub verifications: BTreeSet<String>,
}

impl Program {
    /// Composite "City, Country" label used by the destination filter.
    #[must_use]
    pub fn destination_label(&self) -> String {
        format!("{}, {}", self.destination_city, self.destination_country)
    }
}
