//! Derived aggregate computations.
//!
//! Every view that shows an average, a city status or a discounted price goes through
//! these functions so the dashboard and the detail pages can never disagree. Results are
//! computed from the snapshot passed in and never cached.

use crate::core::cities::CityDirectory;
use crate::entities::{
    CitySafetyData, Course, CourseId, Feedback, Program, ProgramId, SafetyStatus,
};

/// Below this many feedback entries a city is reported as [`SafetyStatus::Neutral`]
pub const MIN_SAFETY_SAMPLE: usize = 5;
/// Positive share at or above which a city is Green
pub const GREEN_THRESHOLD: u8 = 80;
/// Positive share at or above which a city is Yellow
pub const YELLOW_THRESHOLD: u8 = 60;

/// Arithmetic mean of the ratings, `0.0` for an empty list.
#[must_use]
pub fn average_of(feedbacks: &[Feedback]) -> f64 {
    if feedbacks.is_empty() {
        return 0.0;
    }
    let total: u32 = feedbacks.iter().map(|f| u32::from(f.rating)).sum();
    // Cast safety: feedback lists are far below 2^52 entries
    #[allow(clippy::cast_precision_loss)]
    let count = feedbacks.len() as f64;
    f64::from(total) / count
}

/// Average rating of a program, `0.0` when it has no feedback.
#[must_use]
pub fn average_rating(program: &Program) -> f64 {
    average_of(&program.feedbacks)
}

/// Average rounded to the nearest whole star, 0 when there is no feedback.
#[must_use]
pub fn star_rating(average: f64) -> u8 {
    // Cast safety: clamped to [0, 5] before the cast
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let stars = average.clamp(0.0, 5.0).round() as u8;
    stars
}

/// Formats an average for display, `N/A` when there is nothing to average.
#[must_use]
pub fn format_average(feedbacks: &[Feedback]) -> String {
    if feedbacks.is_empty() {
        "N/A".to_string()
    } else {
        format!("{:.1}", average_of(feedbacks))
    }
}

/// Share of ratings at or above 4, as a whole percent rounded half up. 0 when empty.
#[must_use]
pub fn positive_percentage(feedbacks: &[Feedback]) -> u8 {
    if feedbacks.is_empty() {
        return 0;
    }
    let positive = feedbacks.iter().filter(|f| f.is_positive()).count();
    let total = feedbacks.len();
    let rounded = (positive * 200 + total) / (total * 2);
    u8::try_from(rounded).unwrap_or(100)
}

/// Traffic-light status from sample size and positive share.
///
/// The sample-size gate is checked before any percentage threshold.
#[must_use]
pub const fn safety_status(total_feedbacks: usize, percentage: u8) -> SafetyStatus {
    if total_feedbacks < MIN_SAFETY_SAMPLE {
        SafetyStatus::Neutral
    } else if percentage >= GREEN_THRESHOLD {
        SafetyStatus::Green
    } else if percentage >= YELLOW_THRESHOLD {
        SafetyStatus::Yellow
    } else {
        SafetyStatus::Red
    }
}

/// Builds one safety record per distinct (city, country) pair, in order of first appearance.
#[must_use]
pub fn city_safety(programs: &[Program], directory: &CityDirectory) -> Vec<CitySafetyData> {
    let mut destinations: Vec<(&str, &str)> = Vec::new();
    for program in programs {
        let key = (
            program.destination_city.as_str(),
            program.destination_country.as_str(),
        );
        if !destinations.contains(&key) {
            destinations.push(key);
        }
    }

    destinations
        .into_iter()
        .zip(1u64..)
        .map(|((city, country), id)| {
            let feedbacks: Vec<Feedback> = programs
                .iter()
                .filter(|p| p.destination_city == city && p.destination_country == country)
                .flat_map(|p| p.feedbacks.iter().cloned())
                .collect();
            let total_feedbacks = feedbacks.len();
            let positive_feedback_percentage = positive_percentage(&feedbacks);
            let placement = directory.placement(city, country);

            CitySafetyData {
                id,
                city_name: city.to_string(),
                country_name: country.to_string(),
                safety_status: safety_status(total_feedbacks, positive_feedback_percentage),
                positive_feedback_percentage,
                total_feedbacks,
                coords: placement.coords,
                radius: placement.radius,
            }
        })
        .collect()
}

/// Programs sorted by descending average rating.
///
/// Programs without feedback count as 0.0 and sink to the bottom; ties keep their input
/// order.
#[must_use]
pub fn rank_by_rating(programs: &[Program]) -> Vec<Program> {
    let mut ranked: Vec<(f64, &Program)> =
        programs.iter().map(|p| (average_rating(p), p)).collect();
    ranked.sort_by(|a, b| b.0.total_cmp(&a.0));
    ranked.into_iter().map(|(_, p)| p.clone()).collect()
}

/// Price after discount, rounded half up. Unchanged when there is no discount.
#[must_use]
pub fn effective_price(price: u32, discount_percentage: u8) -> u32 {
    if discount_percentage == 0 {
        return price;
    }
    let remaining = u64::from(100 - discount_percentage.min(100));
    let scaled = u64::from(price) * remaining + 50;
    u32::try_from(scaled / 100).unwrap_or(price)
}

/// Effective price of a course.
#[must_use]
pub fn course_price(course: &Course) -> u32 {
    effective_price(course.price, course.discount_percentage)
}

/// Programs owned by the given agency, in collection order.
#[must_use]
pub fn agency_programs(programs: &[Program], agency_id: u64) -> Vec<Program> {
    programs
        .iter()
        .filter(|p| p.agency.id == agency_id)
        .cloned()
        .collect()
}

/// Programs held in one destination, in collection order.
#[must_use]
pub fn programs_in_city(programs: &[Program], city: &str, country: &str) -> Vec<Program> {
    programs
        .iter()
        .filter(|p| p.destination_city == city && p.destination_country == country)
        .cloned()
        .collect()
}

/// Courses attached to the given program, in collection order.
#[must_use]
pub fn related_courses(courses: &[Course], program_id: ProgramId) -> Vec<Course> {
    courses
        .iter()
        .filter(|c| c.program_id == program_id)
        .cloned()
        .collect()
}

/// Ids of courses whose program no longer exists.
#[must_use]
pub fn orphaned_course_ids(courses: &[Course], programs: &[Program]) -> Vec<CourseId> {
    courses
        .iter()
        .filter(|c| !programs.iter().any(|p| p.id == c.program_id))
        .map(|c| c.id)
        .collect()
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    #![allow(clippy::float_cmp)]
    use super::*;
    use crate::test_utils::*;

    #[test]
    fn test_average_rating_of_empty_program_is_zero() {
        let program = test_program(1, 1, &[]);
        let avg = average_rating(&program);
        assert_eq!(avg, 0.0);
        assert!(!avg.is_nan());
        assert_eq!(format_average(&program.feedbacks), "N/A");
        assert_eq!(star_rating(avg), 0);
    }

    #[test]
    fn test_average_rating_is_arithmetic_mean() {
        let program = test_program(1, 1, &[5, 4, 3]);
        assert_eq!(average_rating(&program), 4.0);
        assert_eq!(format_average(&program.feedbacks), "4.0");

        let program = test_program(2, 1, &[5, 4]);
        assert_eq!(average_rating(&program), 4.5);
        assert_eq!(star_rating(4.5), 5);
        assert_eq!(star_rating(4.4), 4);
    }

    #[test]
    fn test_safety_status_boundaries() {
        // Sample-size gate wins regardless of the percentage
        assert_eq!(safety_status(4, 100), SafetyStatus::Neutral);
        assert_eq!(safety_status(4, 0), SafetyStatus::Neutral);
        assert_eq!(safety_status(0, 0), SafetyStatus::Neutral);

        assert_eq!(safety_status(5, 79), SafetyStatus::Yellow);
        assert_eq!(safety_status(5, 80), SafetyStatus::Green);
        assert_eq!(safety_status(5, 59), SafetyStatus::Red);
        assert_eq!(safety_status(5, 60), SafetyStatus::Yellow);
        assert_eq!(safety_status(5, 100), SafetyStatus::Green);
    }

    #[test]
    fn test_positive_percentage_rounds_half_up() {
        assert_eq!(positive_percentage(&feedbacks_with_ratings(&[])), 0);
        assert_eq!(positive_percentage(&feedbacks_with_ratings(&[5, 4, 1])), 67);
        assert_eq!(positive_percentage(&feedbacks_with_ratings(&[5, 1])), 50);
        // 1/8 = 12.5% rounds to 13
        assert_eq!(
            positive_percentage(&feedbacks_with_ratings(&[5, 1, 1, 1, 1, 1, 1, 1])),
            13
        );
        assert_eq!(positive_percentage(&feedbacks_with_ratings(&[4, 4])), 100);
    }

    #[test]
    fn test_city_safety_groups_by_city_and_country() {
        let directory = CityDirectory::default();
        let mut lisbon_a = test_program(1, 1, &[5, 5, 4]);
        lisbon_a.destination_city = "Lisbon".to_string();
        lisbon_a.destination_country = "Portugal".to_string();
        let mut lisbon_b = test_program(2, 1, &[4, 2]);
        lisbon_b.destination_city = "Lisbon".to_string();
        lisbon_b.destination_country = "Portugal".to_string();
        let mut paris = test_program(3, 2, &[1, 2]);
        paris.destination_city = "Paris".to_string();
        paris.destination_country = "France".to_string();

        let cities = city_safety(&[lisbon_a, paris, lisbon_b], &directory);
        assert_eq!(cities.len(), 2);

        let lisbon = &cities[0];
        assert_eq!(lisbon.id, 1);
        assert_eq!(lisbon.city_name, "Lisbon");
        assert_eq!(lisbon.total_feedbacks, 5);
        assert_eq!(lisbon.positive_feedback_percentage, 80);
        assert_eq!(lisbon.safety_status, SafetyStatus::Green);
        assert!(lisbon.radius > 0);

        let paris = &cities[1];
        assert_eq!(paris.id, 2);
        assert_eq!(paris.total_feedbacks, 2);
        assert_eq!(paris.safety_status, SafetyStatus::Neutral);
    }

    #[test]
    fn test_city_safety_distinguishes_same_city_name_in_other_country() {
        let directory = CityDirectory::default();
        let mut a = test_program(1, 1, &[5]);
        a.destination_city = "Valencia".to_string();
        a.destination_country = "Spain".to_string();
        let mut b = test_program(2, 1, &[1]);
        b.destination_city = "Valencia".to_string();
        b.destination_country = "Venezuela".to_string();

        let cities = city_safety(&[a, b], &directory);
        assert_eq!(cities.len(), 2);
        assert_eq!(cities[0].positive_feedback_percentage, 100);
        assert_eq!(cities[1].positive_feedback_percentage, 0);
    }

    #[test]
    fn test_rank_by_rating_is_stable_and_sinks_unrated() {
        let unrated = test_program(1, 1, &[]);
        let good = test_program(2, 1, &[5, 5]);
        let tie_a = test_program(3, 1, &[4]);
        let tie_b = test_program(4, 1, &[4]);

        let ranked = rank_by_rating(&[unrated, tie_a, good, tie_b]);
        let ids: Vec<u64> = ranked.iter().map(|p| p.id).collect();
        assert_eq!(ids, vec![2, 3, 4, 1]);
    }

    #[test]
    fn test_effective_price() {
        assert_eq!(effective_price(1000, 0), 1000);
        assert_eq!(effective_price(1000, 30), 700);
        assert_eq!(effective_price(999, 50), 500);
        assert_eq!(effective_price(450, 100), 0);
        assert_eq!(effective_price(333, 35), 216);
    }

    #[test]
    fn test_course_price_uses_discount() {
        let mut course = test_course(1, 10, 0);
        course.price = 1000;
        course.discount_percentage = 30;
        assert_eq!(course_price(&course), 700);
    }

    #[test]
    fn test_relations_and_orphans() {
        let programs = vec![test_program(1, 7, &[5]), test_program(2, 8, &[5])];
        let courses = vec![test_course(10, 1, 0), test_course(11, 2, 0), test_course(12, 99, 0)];

        assert_eq!(agency_programs(&programs, 7).len(), 1);
        assert!(agency_programs(&programs, 42).is_empty());
        assert_eq!(related_courses(&courses, 2)[0].id, 11);
        assert_eq!(orphaned_course_ids(&courses, &programs), vec![12]);
    }

    #[test]
    fn test_programs_in_city_match_city_and_country() {
        let mut paris = test_program(2, 1, &[]);
        paris.destination_city = "Paris".to_string();
        paris.destination_country = "France".to_string();
        let mut other_lisbon = test_program(3, 2, &[]);
        other_lisbon.destination_country = "Brazil".to_string();
        let programs = vec![test_program(1, 1, &[]), paris, other_lisbon, test_program(4, 2, &[])];

        let ids: Vec<u64> = programs_in_city(&programs, "Lisbon", "Portugal")
            .iter()
            .map(|p| p.id)
            .collect();
        assert_eq!(ids, vec![1, 4]);
        assert!(programs_in_city(&programs, "Rome", "Italy").is_empty());
    }
}
