//! Agency entity - An organizer offering one or more exchange programs.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Unique identifier of an agency
pub type AgencyId = u64;

/// Exchange agency record
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Agency {
    /// Unique identifier for the agency
    pub id: AgencyId,
    /// Display name (e.g., "Global Sisters Exchange")
    pub name: String,
    /// Logo image URI
    pub logo: String,
    /// Whether the agency passed platform verification
    pub is_verified: bool,
    /// Why the agency was verified, shown next to the seal
    pub verification_reason: Option<String>,
    /// Free text description
    pub description: String,
    /// Certification tags held by the agency
    #[serde(default)]
    pub certifications: BTreeSet<String>,
}

impl Agency {
    /// Returns true when the agency holds every tag in `required`.
    #[must_use]
    pub fn has_certifications(&self, required: &BTreeSet<String>) -> bool {
        required.is_subset(&self.certifications)
    }
}
