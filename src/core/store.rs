//! Catalog store - the canonical program and course collections.
//!
//! The store hands out `Arc<CatalogSnapshot>` values. A mutation copies the snapshot
//! only when a reader still holds the previous one, applies the change and bumps the
//! revision, so views holding an older snapshot never observe a half-applied edit.
//!
//! Ownership checks ("programs of the logged-in agency") are client-side filters, not
//! authorization.

use crate::core::derive;
use crate::entities::{Agency, AgencyId, Course, CourseId, Program, ProgramId};
use chrono::Utc;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Immutable view of the catalog at one revision
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CatalogSnapshot {
    /// Incremented by every applied mutation
    pub revision: u64,
    /// Every agency
    pub agencies: Vec<Agency>,
    /// Every program, in insertion order
    pub programs: Vec<Program>,
    /// Every course, in insertion order
    pub courses: Vec<Course>,
}

impl CatalogSnapshot {
    /// Program with the given id.
    #[must_use]
    pub fn program(&self, id: ProgramId) -> Option<&Program> {
        self.programs.iter().find(|p| p.id == id)
    }

    /// Course with the given id.
    #[must_use]
    pub fn course(&self, id: CourseId) -> Option<&Course> {
        self.courses.iter().find(|c| c.id == id)
    }

    /// Agency with the given id.
    #[must_use]
    pub fn agency(&self, id: AgencyId) -> Option<&Agency> {
        self.agencies.iter().find(|a| a.id == id)
    }

    /// Courses whose program no longer exists.
    #[must_use]
    pub fn orphaned_courses(&self) -> Vec<&Course> {
        let orphaned = derive::orphaned_course_ids(&self.courses, &self.programs);
        self.courses
            .iter()
            .filter(|c| orphaned.contains(&c.id))
            .collect()
    }
}

/// Result of an update or delete keyed by id
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[must_use]
pub enum MutationOutcome {
    /// A record with the id existed and was changed
    Applied,
    /// No record had the id; the collection is unchanged
    Missing,
}

impl MutationOutcome {
    /// Whether the mutation changed anything.
    #[must_use]
    pub const fn is_applied(self) -> bool {
        matches!(self, Self::Applied)
    }
}

/// Hands out timestamp-derived ids that never repeat.
///
/// An id is the current Unix time in milliseconds unless that would not be larger than
/// both the last id handed out and every id already in the collection.
#[derive(Debug, Clone, Default)]
pub struct IdAllocator {
    last: u64,
}

impl IdAllocator {
    /// Next id strictly greater than `existing_max` and every previous id.
    pub fn next_id(&mut self, existing_max: u64) -> u64 {
        let now = u64::try_from(Utc::now().timestamp_millis()).unwrap_or_default();
        let id = now
            .max(self.last.saturating_add(1))
            .max(existing_max.saturating_add(1));
        self.last = id;
        id
    }
}

/// Owner of the mutable catalog
#[derive(Debug, Clone, Default)]
pub struct CatalogStore {
    snapshot: Arc<CatalogSnapshot>,
    ids: IdAllocator,
}

impl CatalogStore {
    /// Creates a store at revision 0.
    #[must_use]
    pub fn new(agencies: Vec<Agency>, programs: Vec<Program>, courses: Vec<Course>) -> Self {
        info!(
            "Catalog store created with {} agencies, {} programs and {} courses",
            agencies.len(),
            programs.len(),
            courses.len()
        );
        Self {
            snapshot: Arc::new(CatalogSnapshot {
                revision: 0,
                agencies,
                programs,
                courses,
            }),
            ids: IdAllocator::default(),
        }
    }

    /// Current snapshot; cheap to clone and safe to keep across mutations.
    #[must_use]
    pub fn snapshot(&self) -> Arc<CatalogSnapshot> {
        Arc::clone(&self.snapshot)
    }

    fn edit(&mut self) -> &mut CatalogSnapshot {
        let snapshot = Arc::make_mut(&mut self.snapshot);
        snapshot.revision += 1;
        snapshot
    }

    /// Appends a program under a freshly allocated id and returns the stored record.
    ///
    /// Whatever id `program` carried is replaced.
    pub fn add_program(&mut self, mut program: Program) -> Program {
        let existing_max = self.snapshot.programs.iter().map(|p| p.id).max().unwrap_or(0);
        program.id = self.ids.next_id(existing_max);
        info!("Adding program {} '{}'", program.id, program.name);
        self.edit().programs.push(program.clone());
        program
    }

    /// Replaces the program with the same id; other records stay untouched.
    pub fn update_program(&mut self, program: Program) -> MutationOutcome {
        let Some(index) = self.snapshot.programs.iter().position(|p| p.id == program.id) else {
            warn!("Ignoring update of unknown program {}", program.id);
            return MutationOutcome::Missing;
        };
        debug!("Updating program {}", program.id);
        self.edit().programs[index] = program;
        MutationOutcome::Applied
    }

    /// Removes the program with the given id.
    ///
    /// Courses pointing at it are kept and become orphans.
    pub fn delete_program(&mut self, id: ProgramId) -> MutationOutcome {
        let Some(index) = self.snapshot.programs.iter().position(|p| p.id == id) else {
            warn!("Ignoring delete of unknown program {id}");
            return MutationOutcome::Missing;
        };
        let dependents = self
            .snapshot
            .courses
            .iter()
            .filter(|c| c.program_id == id)
            .count();
        info!("Deleting program {id}, leaving {dependents} course(s) orphaned");
        self.edit().programs.remove(index);
        MutationOutcome::Applied
    }

    /// Appends a course under a freshly allocated id and returns the stored record.
    pub fn add_course(&mut self, mut course: Course) -> Course {
        let existing_max = self.snapshot.courses.iter().map(|c| c.id).max().unwrap_or(0);
        course.id = self.ids.next_id(existing_max);
        info!("Adding course {} '{}'", course.id, course.title);
        self.edit().courses.push(course.clone());
        course
    }

    /// Replaces the course with the same id.
    pub fn update_course(&mut self, course: Course) -> MutationOutcome {
        let Some(index) = self.snapshot.courses.iter().position(|c| c.id == course.id) else {
            warn!("Ignoring update of unknown course {}", course.id);
            return MutationOutcome::Missing;
        };
        debug!("Updating course {}", course.id);
        self.edit().courses[index] = course;
        MutationOutcome::Applied
    }

    /// Removes the course with the given id.
    pub fn delete_course(&mut self, id: CourseId) -> MutationOutcome {
        let Some(index) = self.snapshot.courses.iter().position(|c| c.id == id) else {
            warn!("Ignoring delete of unknown course {id}");
            return MutationOutcome::Missing;
        };
        info!("Deleting course {id}");
        self.edit().courses.remove(index);
        MutationOutcome::Applied
    }
}
