//! Agency dashboard overview.
//!
//! Everything here is recomputed from one catalog snapshot so the numbers always agree
//! with the program detail pages.

use crate::{
    core::{
        derive::{agency_programs, average_of, rank_by_rating},
        store::CatalogSnapshot,
    },
    entities::{AgencyId, Course, Feedback, Program, ProgramId},
};
use std::collections::BTreeSet;

/// Number of feedback entries listed under "recent feedback"
pub const RECENT_FEEDBACK_LIMIT: usize = 5;

/// Summary shown to a signed-in agency
#[derive(Debug, Clone, PartialEq)]
pub struct DashboardOverview {
    /// Programs owned by the agency
    pub total_programs: usize,
    /// Courses attached to those programs
    pub total_courses: usize,
    /// Mean rating over every feedback of those programs, 0.0 when there is none
    pub average_rating: f64,
    /// First feedback entries across the agency's programs
    pub recent_feedbacks: Vec<Feedback>,
    /// The agency's programs, best rated first
    pub ranking: Vec<Program>,
    /// The agency's programs in catalog order
    pub programs: Vec<Program>,
    /// The agency's courses in catalog order
    pub courses: Vec<Course>,
    /// Courses left behind by programs the agency deleted
    pub orphaned_courses: Vec<Course>,
}

impl DashboardOverview {
    /// Builds the overview of `agency_id` from `snapshot`.
    ///
    /// `retired_programs` are the ids of programs the agency deleted; courses still pointing
    /// at them are listed as orphans.
    #[must_use]
    pub fn build(
        snapshot: &CatalogSnapshot,
        agency_id: AgencyId,
        retired_programs: &BTreeSet<ProgramId>,
    ) -> Self {
        let programs = agency_programs(&snapshot.programs, agency_id);
        let courses = agency_courses(&snapshot.courses, &programs);
        let orphaned_courses = snapshot
            .orphaned_courses()
            .into_iter()
            .filter(|c| retired_programs.contains(&c.program_id))
            .cloned()
            .collect();
        let feedbacks: Vec<Feedback> = programs
            .iter()
            .flat_map(|p| p.feedbacks.iter().cloned())
            .collect();

        Self {
            total_programs: programs.len(),
            total_courses: courses.len(),
            average_rating: average_of(&feedbacks),
            recent_feedbacks: feedbacks.into_iter().take(RECENT_FEEDBACK_LIMIT).collect(),
            ranking: rank_by_rating(&programs),
            programs,
            courses,
            orphaned_courses,
        }
    }
}

/// Courses whose program is one of `programs`.
#[must_use]
pub fn agency_courses(courses: &[Course], programs: &[Program]) -> Vec<Course> {
    courses
        .iter()
        .filter(|c| programs.iter().any(|p| p.id == c.program_id))
        .cloned()
        .collect()
}
