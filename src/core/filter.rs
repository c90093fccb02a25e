//! Program and course filters.
//!
//! Filters are plain values: the shell keeps one per mounted page and recomputes the
//! visible subset on every change. Matching is case-insensitive substring search without
//! accent folding, and every empty criterion matches everything.

use crate::entities::{Agency, AgencyId, CitySafetyData, Course, CourseKind, Program};
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

/// Criteria of the programs page
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProgramFilter {
    /// Free text matched against name and short description
    pub query: String,
    /// Exact "City, Country" destination label
    pub destination: Option<String>,
    /// Owning agency
    pub agency_id: Option<AgencyId>,
    /// Agency certifications that must all be present
    pub certifications: BTreeSet<String>,
    /// Program verifications that must all be present
    pub verifications: BTreeSet<String>,
}

impl ProgramFilter {
    /// Filter seeded from a home page search or an agency shortcut.
    #[must_use]
    pub fn seeded(query: &str, agency_id: Option<AgencyId>) -> Self {
        Self {
            query: query.to_string(),
            agency_id,
            ..Self::default()
        }
    }

    /// Whether `program` satisfies every criterion.
    #[must_use]
    pub fn matches(&self, program: &Program) -> bool {
        let query_match = text_matches(
            &self.query,
            &[&program.name, &program.short_description],
        );
        let destination_match = self
            .destination
            .as_ref()
            .is_none_or(|d| *d == program.destination_label());
        let agency_match = self.agency_id.is_none_or(|id| id == program.agency.id);
        let certification_match = program.agency.has_certifications(&self.certifications);
        let verification_match = self.verifications.is_subset(&program.verifications);

        query_match && destination_match && agency_match && certification_match && verification_match
    }

    /// Matching programs in their original order.
    #[must_use]
    pub fn apply(&self, programs: &[Program]) -> Vec<Program> {
        programs.iter().filter(|p| self.matches(p)).cloned().collect()
    }

    /// Adds the certification if absent, removes it if present.
    pub fn toggle_certification(&mut self, tag: &str) {
        toggle(&mut self.certifications, tag);
    }

    /// Adds the verification if absent, removes it if present.
    pub fn toggle_verification(&mut self, tag: &str) {
        toggle(&mut self.verifications, tag);
    }
}

/// Three-way discount filter of the knowledge hub
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OfferFilter {
    /// No restriction
    #[default]
    Any,
    /// Any discount above zero
    HasDiscount,
    /// Free when bundled with the program
    Free,
}

impl OfferFilter {
    /// Whether `course` passes this offer restriction.
    #[must_use]
    pub const fn matches(self, course: &Course) -> bool {
        match self {
            Self::Any => true,
            Self::HasDiscount => course.has_discount(),
            Self::Free => course.is_free(),
        }
    }
}

impl fmt::Display for OfferFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Any => f.write_str("any"),
            Self::HasDiscount => f.write_str("discount"),
            Self::Free => f.write_str("free"),
        }
    }
}

impl FromStr for OfferFilter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "" | "any" => Ok(Self::Any),
            "discount" => Ok(Self::HasDiscount),
            "free" => Ok(Self::Free),
            other => Err(format!("unknown offer filter '{other}' (any, discount, free)")),
        }
    }
}

/// Criteria of the knowledge hub
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CourseFilter {
    /// Free text matched against title and description
    pub query: String,
    /// Course or mentorship
    pub kind: Option<CourseKind>,
    /// Exact partner name
    pub partner: Option<String>,
    /// Discount restriction
    pub offer: OfferFilter,
    /// Exact instructor name
    pub instructor: Option<String>,
}

impl CourseFilter {
    /// Whether `course` satisfies every criterion.
    #[must_use]
    pub fn matches(&self, course: &Course) -> bool {
        text_matches(&self.query, &[&course.title, &course.description])
            && self.kind.is_none_or(|k| k == course.kind)
            && self.partner.as_ref().is_none_or(|p| *p == course.partner)
            && self.offer.matches(course)
            && self
                .instructor
                .as_ref()
                .is_none_or(|i| *i == course.instructor)
    }

    /// Matching courses in their original order.
    #[must_use]
    pub fn apply(&self, courses: &[Course]) -> Vec<Course> {
        courses.iter().filter(|c| self.matches(c)).cloned().collect()
    }
}

fn text_matches(query: &str, fields: &[&str]) -> bool {
    if query.is_empty() {
        return true;
    }
    let needle = query.to_lowercase();
    fields.iter().any(|f| f.to_lowercase().contains(&needle))
}

fn toggle(set: &mut BTreeSet<String>, tag: &str) {
    if !set.remove(tag) {
        set.insert(tag.to_string());
    }
}

/// Sorted, de-duplicated "City, Country" labels for the destination dropdown.
#[must_use]
pub fn unique_destinations(programs: &[Program]) -> Vec<String> {
    programs
        .iter()
        .map(Program::destination_label)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// Sorted, de-duplicated partner names for the hub dropdown.
#[must_use]
pub fn unique_partners(courses: &[Course]) -> Vec<String> {
    courses
        .iter()
        .map(|c| c.partner.clone())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// Sorted, de-duplicated instructor names for the hub dropdown.
#[must_use]
pub fn unique_instructors(courses: &[Course]) -> Vec<String> {
    courses
        .iter()
        .map(|c| c.instructor.clone())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// Map entry matching `name`, given either as "City" or "City, Country" in any case.
#[must_use]
pub fn find_city<'a>(cities: &'a [CitySafetyData], name: &str) -> Option<&'a CitySafetyData> {
    let name = name.trim();
    cities.iter().find(|c| {
        c.city_name.eq_ignore_ascii_case(name)
            || format!("{}, {}", c.city_name, c.country_name).eq_ignore_ascii_case(name)
    })
}

/// Agencies sorted by name for the agency dropdown.
#[must_use]
pub fn agencies_by_name(agencies: &[Agency]) -> Vec<Agency> {
    let mut sorted = agencies.to_vec();
    sorted.sort_by(|a, b| a.name.cmp(&b.name));
    sorted
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::test_utils::*;

    const LOCAL_SUPPORT: &str = "24/7 Local Support";
    const SAFE_HOUSING: &str = "Verified Safe Accommodation";
    const TRAINING: &str = "Comprehensive Pre-Departure Training";

    fn catalog() -> Vec<Program> {
        let mut first = test_program(1, 1, &[5]);
        first.name = "Marine Biology in Lisbon".to_string();
        first.agency.certifications = tags(&[LOCAL_SUPPORT, SAFE_HOUSING]);
        first.verifications = tags(&["First Trip Friendly"]);

        let mut second = test_program(2, 2, &[4]);
        second.name = "Creative Writing in Paris".to_string();
        second.destination_city = "Paris".to_string();
        second.destination_country = "France".to_string();
        second.agency.certifications = tags(&[LOCAL_SUPPORT]);

        let mut third = test_program(3, 1, &[3]);
        third.name = "Photography in Lisbon".to_string();
        third.short_description = "Shoot the MARINE life of the Tagus".to_string();
        third.agency.certifications = tags(&[SAFE_HOUSING]);

        vec![first, second, third]
    }

    fn ids(programs: &[Program]) -> Vec<u64> {
        programs.iter().map(|p| p.id).collect()
    }

    #[test]
    fn test_empty_filter_returns_everything_in_order() {
        let programs = catalog();
        let result = ProgramFilter::default().apply(&programs);
        assert_eq!(result, programs);
    }

    #[test]
    fn test_query_is_case_insensitive_over_name_and_short_description() {
        let programs = catalog();
        let filter = ProgramFilter::seeded("marine", None);
        assert_eq!(ids(&filter.apply(&programs)), vec![1, 3]);

        let filter = ProgramFilter::seeded("PARIS", None);
        assert_eq!(ids(&filter.apply(&programs)), vec![2]);
    }

    #[test]
    fn test_query_does_not_fold_accents() {
        let mut program = test_program(1, 1, &[]);
        program.name = "Imersão Cultural".to_string();
        let filter = ProgramFilter::seeded("imersao", None);
        assert!(!filter.matches(&program));
        let filter = ProgramFilter::seeded("IMERSÃO", None);
        assert!(filter.matches(&program));
    }

    #[test]
    fn test_destination_and_agency_are_exact() {
        let programs = catalog();
        let filter = ProgramFilter {
            destination: Some("Lisbon, Portugal".to_string()),
            ..ProgramFilter::default()
        };
        assert_eq!(ids(&filter.apply(&programs)), vec![1, 3]);

        let filter = ProgramFilter {
            destination: Some("Lisbon".to_string()),
            ..ProgramFilter::default()
        };
        assert!(filter.apply(&programs).is_empty());

        let filter = ProgramFilter::seeded("", Some(2));
        assert_eq!(ids(&filter.apply(&programs)), vec![2]);
    }

    #[test]
    fn test_certifications_are_conjunctive() {
        let programs = catalog();
        let mut filter = ProgramFilter::default();

        // S = {}
        assert_eq!(ids(&filter.apply(&programs)), vec![1, 2, 3]);

        // S = {one tag present on some agencies}
        filter.toggle_certification(LOCAL_SUPPORT);
        assert_eq!(ids(&filter.apply(&programs)), vec![1, 2]);

        // S = {two tags}: only the agency holding both
        filter.toggle_certification(SAFE_HOUSING);
        assert_eq!(ids(&filter.apply(&programs)), vec![1]);

        // S = {two tags, one absent everywhere}
        filter.toggle_certification(LOCAL_SUPPORT);
        filter.toggle_certification(TRAINING);
        assert!(filter.apply(&programs).is_empty());

        // S = {one tag absent everywhere}
        filter.toggle_certification(SAFE_HOUSING);
        assert_eq!(filter.certifications, tags(&[TRAINING]));
        assert!(filter.apply(&programs).is_empty());
    }

    #[test]
    fn test_verifications_are_conjunctive() {
        let programs = catalog();
        let mut filter = ProgramFilter::default();
        filter.toggle_verification("First Trip Friendly");
        assert_eq!(ids(&filter.apply(&programs)), vec![1]);
        filter.toggle_verification("Accessible");
        assert!(filter.apply(&programs).is_empty());
        filter.toggle_verification("Accessible");
        filter.toggle_verification("First Trip Friendly");
        assert!(filter.verifications.is_empty());
    }

    #[test]
    fn test_course_filter_criteria() {
        let mut free = test_course(1, 1, 100);
        free.title = "Cultural Immersion for Lisbon".to_string();
        free.instructor = "Maria Reis".to_string();
        let mut discounted = test_course(2, 1, 30);
        discounted.kind = CourseKind::Mentorship;
        discounted.partner = "Alumni".to_string();
        let full_price = test_course(3, 2, 0);
        let courses = vec![free, discounted, full_price];
        let course_ids = |cs: Vec<Course>| cs.iter().map(|c| c.id).collect::<Vec<_>>();

        assert_eq!(course_ids(CourseFilter::default().apply(&courses)), vec![1, 2, 3]);

        let by_offer = CourseFilter {
            offer: OfferFilter::HasDiscount,
            ..CourseFilter::default()
        };
        assert_eq!(course_ids(by_offer.apply(&courses)), vec![1, 2]);

        let free_only = CourseFilter {
            offer: OfferFilter::Free,
            ..CourseFilter::default()
        };
        assert_eq!(course_ids(free_only.apply(&courses)), vec![1]);

        let by_kind = CourseFilter {
            kind: Some(CourseKind::Mentorship),
            ..CourseFilter::default()
        };
        assert_eq!(course_ids(by_kind.apply(&courses)), vec![2]);

        let by_partner = CourseFilter {
            partner: Some("Alumni".to_string()),
            ..CourseFilter::default()
        };
        assert_eq!(course_ids(by_partner.apply(&courses)), vec![2]);

        let by_instructor = CourseFilter {
            instructor: Some("Maria Reis".to_string()),
            ..CourseFilter::default()
        };
        assert_eq!(course_ids(by_instructor.apply(&courses)), vec![1]);

        let by_query = CourseFilter {
            query: "lisbon".to_string(),
            ..CourseFilter::default()
        };
        assert_eq!(course_ids(by_query.apply(&courses)), vec![1]);
    }

    #[test]
    fn test_offer_filter_parsing() {
        assert_eq!("free".parse::<OfferFilter>().unwrap(), OfferFilter::Free);
        assert_eq!("Discount".parse::<OfferFilter>().unwrap(), OfferFilter::HasDiscount);
        assert_eq!("any".parse::<OfferFilter>().unwrap(), OfferFilter::Any);
        assert!("cheap".parse::<OfferFilter>().is_err());
    }

    #[test]
    fn test_find_city_by_name_or_label() {
        use crate::entities::{Coordinates, SafetyStatus};
        let city = |id, city_name: &str, country_name: &str| CitySafetyData {
            id,
            city_name: city_name.to_string(),
            country_name: country_name.to_string(),
            safety_status: SafetyStatus::Neutral,
            positive_feedback_percentage: 0,
            total_feedbacks: 0,
            coords: Coordinates::default(),
            radius: 80_000,
        };
        let cities = vec![city(1, "Lisbon", "Portugal"), city(2, "Paris", "France")];

        assert_eq!(find_city(&cities, " paris ").map(|c| c.id), Some(2));
        assert_eq!(find_city(&cities, "LISBON, portugal").map(|c| c.id), Some(1));
        assert!(find_city(&cities, "Lisbon, Brazil").is_none());
        assert!(find_city(&cities, "Rome").is_none());
    }

    #[test]
    fn test_option_lists_are_sorted_and_unique() {
        let programs = catalog();
        assert_eq!(
            unique_destinations(&programs),
            vec!["Lisbon, Portugal".to_string(), "Paris, France".to_string()]
        );

        let mut a = test_course(1, 1, 0);
        a.partner = "Zeta".to_string();
        let mut b = test_course(2, 1, 0);
        b.partner = "Alpha".to_string();
        let c = test_course(3, 1, 0);
        let partners = unique_partners(&[a.clone(), b, c.clone()]);
        assert_eq!(partners.first().map(String::as_str), Some("Alpha"));
        assert_eq!(partners.len(), 3);
        assert_eq!(unique_instructors(&[a, c]).len(), 1);

        let mut zed = test_agency(1);
        zed.name = "Zed Travel".to_string();
        let mut abe = test_agency(2);
        abe.name = "Abe Abroad".to_string();
        let sorted = agencies_by_name(&[zed, abe]);
        assert_eq!(sorted[0].id, 2);
    }
}
