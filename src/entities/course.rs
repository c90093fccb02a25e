//! Course entity - Supplementary paid course or mentorship linked to a program.

use super::ProgramId;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Unique identifier of a course
pub type CourseId = u64;

/// Discount value meaning the course is free when bundled with its program
pub const FREE_DISCOUNT: u8 = 100;

/// Kind of knowledge hub offering
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum CourseKind {
    /// Self-contained course
    Course,
    /// One-to-one mentorship
    Mentorship,
}

impl fmt::Display for CourseKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Course => f.write_str("Course"),
            Self::Mentorship => f.write_str("Mentorship"),
        }
    }
}

impl FromStr for CourseKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "course" => Ok(Self::Course),
            "mentorship" => Ok(Self::Mentorship),
            other => Err(format!("unknown course type '{other}'")),
        }
    }
}

/// Knowledge hub course record
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Course {
    /// Unique identifier
    pub id: CourseId,
    /// Course or mentorship
    pub kind: CourseKind,
    /// Display title
    pub title: String,
    /// Free text description
    pub description: String,
    /// Instructor name
    pub instructor: String,
    /// Partner organisation delivering the course
    pub partner: String,
    /// List price in whole currency units
    pub price: u32,
    /// Program this course belongs to; may dangle after the program is deleted
    pub program_id: ProgramId,
    /// Discount in percent, 0 for none and 100 for free with the program
    #[serde(default)]
    pub discount_percentage: u8,
}

impl Course {
    /// Whether any discount applies.
    #[must_use]
    pub const fn has_discount(&self) -> bool {
        self.discount_percentage > 0
    }

    /// Whether the course is free when bundled with its program.
    #[must_use]
    pub const fn is_free(&self) -> bool {
        self.discount_percentage == FREE_DISCOUNT
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_course_kind_parses_case_insensitively() {
        assert_eq!("Course".parse::<CourseKind>(), Ok(CourseKind::Course));
        assert_eq!(" MENTORSHIP ".parse::<CourseKind>(), Ok(CourseKind::Mentorship));
        assert!("workshop".parse::<CourseKind>().is_err());
    }
}
