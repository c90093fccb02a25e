//! Dashboard forms - validation at the input boundary.
//!
//! Forms hold the raw text a user typed. `validate` turns them into records or returns
//! [`Error::Validation`] naming the offending field; nothing is written to the store until
//! validation passes.

use crate::{
    entities::{Agency, Course, CourseKind, Program, ProgramId},
    errors::{Error, Result},
};
use std::collections::BTreeSet;

/// Cover image of programs created from the dashboard
pub const DEFAULT_PROGRAM_IMAGE: &str =
    "https://images.unsplash.com/photo-1469854523086-cc02fe5d8800?auto=format&fit=crop&w=1000&q=80";

/// Characters of the long description copied into the short description
pub const SHORT_DESCRIPTION_CHARS: usize = 100;

/// Raw program form fields
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProgramForm {
    /// Program name
    pub name: String,
    /// Destination city
    pub destination_city: String,
    /// Destination country
    pub destination_country: String,
    /// Price as typed
    pub price: String,
    /// Full description
    pub long_description: String,
    /// Comma separated list of included items
    pub includes: String,
}

impl ProgramForm {
    /// Prefills the form from an existing program for editing.
    #[must_use]
    pub fn from_program(program: &Program) -> Self {
        Self {
            name: program.name.clone(),
            destination_city: program.destination_city.clone(),
            destination_country: program.destination_country.clone(),
            price: program.price.to_string(),
            long_description: program.long_description.clone(),
            includes: program.includes.join(", "),
        }
    }

    /// Validates the form and builds the program for `agency`.
    ///
    /// When `editing` is given the result keeps its id, feedback, image and verifications;
    /// otherwise the id is 0 (the store assigns one) and those lists start empty.
    ///
    /// # Errors
    /// Returns [`Error::Validation`] if a required field is blank or the price is not a
    /// positive whole number.
    pub fn validate(&self, agency: &Agency, editing: Option<&Program>) -> Result<Program> {
        let name = required("name", &self.name)?;
        let destination_city = required("destination_city", &self.destination_city)?;
        let destination_country = required("destination_country", &self.destination_country)?;
        let long_description = required("long_description", &self.long_description)?;
        let price = parse_price(&self.price)?;
        if price == 0 {
            return Err(Error::validation("price", "must be greater than zero"));
        }

        Ok(Program {
            id: editing.map_or(0, |p| p.id),
            name,
            agency: agency.clone(),
            destination_city,
            destination_country,
            price,
            short_description: short_description(&long_description),
            long_description,
            includes: split_includes(&self.includes),
            feedbacks: editing.map(|p| p.feedbacks.clone()).unwrap_or_default(),
            image: editing.map_or_else(|| DEFAULT_PROGRAM_IMAGE.to_string(), |p| p.image.clone()),
            verifications: editing
                .map(|p| p.verifications.clone())
                .unwrap_or_else(BTreeSet::new),
        })
    }
}

/// Raw course form fields
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CourseForm {
    /// Course or mentorship, as typed
    pub kind: String,
    /// Title
    pub title: String,
    /// Description
    pub description: String,
    /// Instructor name
    pub instructor: String,
    /// Partner organisation
    pub partner: String,
    /// Price as typed
    pub price: String,
    /// Program id as typed
    pub program_id: String,
    /// Discount percent as typed; blank means none
    pub discount_percentage: String,
}

impl CourseForm {
    /// Prefills the form from an existing course for editing.
    #[must_use]
    pub fn from_course(course: &Course) -> Self {
        Self {
            kind: course.kind.to_string(),
            title: course.title.clone(),
            description: course.description.clone(),
            instructor: course.instructor.clone(),
            partner: course.partner.clone(),
            price: course.price.to_string(),
            program_id: course.program_id.to_string(),
            discount_percentage: course.discount_percentage.to_string(),
        }
    }

    /// Validates the form into a course.
    ///
    /// `allowed_programs` lists the programs the course may be attached to (the logged-in
    /// agency's programs).
    ///
    /// # Errors
    /// Returns [`Error::Validation`] if a required field is blank, a number is malformed,
    /// the discount exceeds 100 or the program is not one of `allowed_programs`.
    pub fn validate(&self, allowed_programs: &[ProgramId], editing: Option<&Course>) -> Result<Course> {
        let kind: CourseKind = self
            .kind
            .parse()
            .map_err(|e: String| Error::validation("type", e))?;
        let title = required("title", &self.title)?;
        let description = required("description", &self.description)?;
        let instructor = required("instructor", &self.instructor)?;
        let partner = required("partner", &self.partner)?;
        let price = parse_price(&self.price)?;
        let program_id: ProgramId = self
            .program_id
            .trim()
            .parse()
            .map_err(|_| Error::validation("program_id", "must be a program id"))?;
        if !allowed_programs.contains(&program_id) {
            return Err(Error::validation(
                "program_id",
                format!("program {program_id} is not one of your programs"),
            ));
        }
        let discount_percentage = parse_discount(&self.discount_percentage)?;

        Ok(Course {
            id: editing.map_or(0, |c| c.id),
            kind,
            title,
            description,
            instructor,
            partner,
            price,
            program_id,
            discount_percentage,
        })
    }
}

fn required(field: &'static str, value: &str) -> Result<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(Error::validation(field, "cannot be empty"));
    }
    Ok(trimmed.to_string())
}

fn parse_price(raw: &str) -> Result<u32> {
    raw.trim()
        .parse()
        .map_err(|_| Error::validation("price", format!("'{}' is not a whole amount", raw.trim())))
}

fn parse_discount(raw: &str) -> Result<u8> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Ok(0);
    }
    let discount: u8 = trimmed
        .parse()
        .map_err(|_| Error::validation("discount_percentage", "must be a number from 0 to 100"))?;
    if discount > 100 {
        return Err(Error::validation(
            "discount_percentage",
            "must be a number from 0 to 100",
        ));
    }
    Ok(discount)
}

/// First 100 characters of the long description followed by an ellipsis.
#[must_use]
pub fn short_description(long_description: &str) -> String {
    let prefix: String = long_description.chars().take(SHORT_DESCRIPTION_CHARS).collect();
    format!("{prefix}...")
}

/// Splits a comma separated list, trimming items and dropping empty ones.
#[must_use]
pub fn split_includes(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(ToString::to_string)
        .collect()
}
