//! Shared test utilities for the catalog core.
//!
//! This module provides builders for agencies, programs, feedback and courses with
//! sensible defaults, so individual tests only spell out the fields they care about.

use crate::{
    core::store::CatalogStore,
    entities::{Agency, Course, CourseKind, Feedback, Program},
};
use chrono::NaiveDate;
use std::collections::BTreeSet;

/// Builds a tag set from string slices.
pub fn tags(values: &[&str]) -> BTreeSet<String> {
    values.iter().map(ToString::to_string).collect()
}

/// Creates an unverified agency without certifications.
///
/// # Defaults
/// * `name`: `"Agency {id}"`
pub fn test_agency(id: u64) -> Agency {
    Agency {
        id,
        name: format!("Agency {id}"),
        logo: format!("https://logo.test/{id}.png"),
        is_verified: false,
        verification_reason: None,
        description: "Test agency".to_string(),
        certifications: BTreeSet::new(),
    }
}

/// Creates one feedback entry per rating, with ids starting at 1.
pub fn feedbacks_with_ratings(ratings: &[u8]) -> Vec<Feedback> {
    ratings
        .iter()
        .zip(1u64..)
        .map(|(&rating, id)| Feedback {
            id,
            author: format!("Traveler {id}"),
            avatar: format!("https://avatar.test/{id}"),
            rating,
            comment: "Test comment".to_string(),
            date: NaiveDate::from_ymd_opt(2024, 1, 15).unwrap_or_default(),
        })
        .collect()
}

/// Creates a program in Lisbon owned by `test_agency(agency_id)`.
///
/// # Defaults
/// * `name`: `"Program {id}"`
/// * `price`: 2000
/// * `feedbacks`: one entry per rating in `ratings`
pub fn test_program(id: u64, agency_id: u64, ratings: &[u8]) -> Program {
    Program {
        id,
        name: format!("Program {id}"),
        agency: test_agency(agency_id),
        destination_city: "Lisbon".to_string(),
        destination_country: "Portugal".to_string(),
        price: 2000,
        short_description: format!("Short description {id}"),
        long_description: format!("Long description {id}"),
        includes: vec!["Tuition".to_string()],
        feedbacks: feedbacks_with_ratings(ratings),
        image: format!("https://image.test/{id}.jpg"),
        verifications: BTreeSet::new(),
    }
}

/// Creates a course attached to `program_id`.
///
/// # Defaults
/// * `kind`: `Course`
/// * `price`: 200
/// * `instructor`: `"Ana Pereira"`
/// * `partner`: `"SafeJourney Team"`
pub fn test_course(id: u64, program_id: u64, discount_percentage: u8) -> Course {
    Course {
        id,
        kind: CourseKind::Course,
        title: format!("Course {id}"),
        description: "Practical preparation".to_string(),
        instructor: "Ana Pereira".to_string(),
        partner: "SafeJourney Team".to_string(),
        price: 200,
        program_id,
        discount_percentage,
    }
}

/// Creates a store with two agencies, three programs and three courses.
///
/// Programs 1 and 2 belong to agency 1, program 3 to agency 2. Each program has one
/// course with the same id.
pub fn setup_test_store() -> CatalogStore {
    let mut second_agency = test_agency(2);
    second_agency.certifications = tags(&["24/7 Local Support"]);
    let mut third = test_program(3, 2, &[2, 3]);
    third.agency = second_agency.clone();

    CatalogStore::new(
        vec![test_agency(1), second_agency],
        vec![test_program(1, 1, &[5, 4]), test_program(2, 1, &[]), third],
        vec![test_course(1, 1, 0), test_course(2, 2, 100), test_course(3, 3, 30)],
    )
}
