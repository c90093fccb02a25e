//! Entity module - Contains the plain data records that make up the catalog.
//! These records carry no behavior; lookups, filters and aggregates live in `core`.
//! Relations are resolved by id scan, never by live back-references.

pub mod agency;
pub mod city;
pub mod content;
pub mod course;
pub mod feedback;
pub mod program;
pub mod user;

pub use agency::{Agency, AgencyId};
pub use city::{CitySafetyData, Coordinates, SafetyStatus};
pub use content::{ContentItem, ContentPage, ContentSection};
pub use course::{Course, CourseId, CourseKind};
pub use feedback::{Feedback, FeedbackId};
pub use program::{Program, ProgramId};
pub use user::User;
