//! Top-level application state and intent handlers.
//!
//! [`AppController`] owns the catalog store, the navigation history and the focused
//! entities. The shell sends it intents and renders whatever [`AppController::view`]
//! returns. Focus is kept by id and resolved against the current snapshot, so a record
//! deleted from the dashboard disappears from every page at once.

use crate::{
    config::SessionConfig,
    core::{
        cities::CityDirectory,
        content::{about_page, certifications_page},
        dashboard::DashboardOverview,
        derive::{self, city_safety},
        forms::{CourseForm, ProgramForm},
        generator::GeneratedCatalog,
        navigation::{Navigator, Page},
        store::{CatalogSnapshot, CatalogStore, MutationOutcome},
    },
    entities::{
        Agency, AgencyId, CitySafetyData, ContentPage, Course, CourseId, Feedback, Program,
        ProgramId, User,
    },
    errors::{Error, Result},
};
use std::{collections::BTreeSet, sync::Arc};
use tracing::{debug, info, warn};

/// Programs recommended on the home page
pub const RECOMMENDED_PROGRAMS: usize = 3;
/// Positive testimonials scrolled by the home carousel
pub const TESTIMONIALS: usize = 15;

/// Which static page [`AppController::show_content`] opens
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentKind {
    /// Certification and verification explanations
    Certifications,
    /// About the platform
    About,
}

/// Everything a page needs to render, resolved from one snapshot
#[derive(Debug, Clone, PartialEq)]
pub enum View {
    /// Landing page
    Home {
        /// First programs of the catalog
        recommended: Vec<Program>,
        /// Positive feedback for the carousel
        testimonials: Vec<Feedback>,
    },
    /// Program listing with its seed
    Programs {
        /// Every program; the page filters locally
        programs: Vec<Program>,
        /// Every agency, for the agency selector
        agencies: Vec<Agency>,
        /// Free text query to start from
        initial_query: String,
        /// Agency to start from
        initial_agency_id: Option<AgencyId>,
    },
    /// One program with its courses
    ProgramDetail {
        /// Focused program
        program: Program,
        /// Mean rating, 0.0 without feedback
        average_rating: f64,
        /// Courses attached to the program
        courses: Vec<Course>,
    },
    /// Safety map
    Map {
        /// One entry per destination
        cities: Vec<CitySafetyData>,
        /// Every program, for the selected city's listing
        programs: Vec<Program>,
    },
    /// Knowledge hub
    Hub {
        /// Every course; the page filters locally
        courses: Vec<Course>,
        /// Every program, for "linked to" labels
        programs: Vec<Program>,
    },
    /// One agency with its programs
    AgencyDetail {
        /// Focused agency
        agency: Agency,
        /// Programs it offers
        programs: Vec<Program>,
    },
    /// Static content
    Content(ContentPage),
    /// One course
    CourseDetail {
        /// Focused course
        course: Course,
        /// Program the course belongs to, `None` when it was deleted
        related_program: Option<Program>,
    },
    /// Sign-in and registration
    Login,
    /// Agency back office
    AgencyDashboard {
        /// Agency being managed
        agency: Agency,
        /// Aggregates and listings
        overview: DashboardOverview,
    },
    /// About the platform
    About(ContentPage),
}

impl View {
    /// Page this view renders.
    #[must_use]
    pub const fn page(&self) -> Page {
        match self {
            Self::Home { .. } => Page::Home,
            Self::Programs { .. } => Page::Programs,
            Self::ProgramDetail { .. } => Page::ProgramDetail,
            Self::Map { .. } => Page::Map,
            Self::Hub { .. } => Page::Hub,
            Self::AgencyDetail { .. } => Page::AgencyDetail,
            Self::Content(_) => Page::ContentPage,
            Self::CourseDetail { .. } => Page::CourseDetail,
            Self::Login => Page::Login,
            Self::AgencyDashboard { .. } => Page::AgencyDashboard,
            Self::About(_) => Page::About,
        }
    }
}

/// Top-level application state
#[derive(Debug)]
pub struct AppController {
    store: CatalogStore,
    cities: CityDirectory,
    session: SessionConfig,
    navigator: Navigator,
    selected_program: Option<ProgramId>,
    selected_course: Option<CourseId>,
    selected_agency: Option<AgencyId>,
    content: Option<ContentPage>,
    initial_query: String,
    initial_agency_id: Option<AgencyId>,
    user: Option<User>,
    retired_programs: BTreeSet<ProgramId>,
}

impl AppController {
    /// Controller on the home page over a freshly generated catalog.
    #[must_use]
    pub fn new(catalog: GeneratedCatalog, session: SessionConfig) -> Self {
        let GeneratedCatalog {
            agencies,
            programs,
            courses,
            cities,
        } = catalog;
        Self::with_store(CatalogStore::new(agencies, programs, courses), cities, session)
    }

    /// Controller on the home page over an existing store.
    #[must_use]
    pub fn with_store(store: CatalogStore, cities: CityDirectory, session: SessionConfig) -> Self {
        Self {
            store,
            cities,
            session,
            navigator: Navigator::default(),
            selected_program: None,
            selected_course: None,
            selected_agency: None,
            content: None,
            initial_query: String::new(),
            initial_agency_id: None,
            user: None,
            retired_programs: BTreeSet::new(),
        }
    }

    /// Current catalog snapshot.
    #[must_use]
    pub fn snapshot(&self) -> Arc<CatalogSnapshot> {
        self.store.snapshot()
    }

    /// Page the navigator points at, before fallbacks.
    #[must_use]
    pub const fn current_page(&self) -> Page {
        self.navigator.current()
    }

    /// Navigation history, oldest first.
    #[must_use]
    pub fn history(&self) -> &[Page] {
        self.navigator.history()
    }

    /// Signed-in user.
    #[must_use]
    pub const fn user(&self) -> Option<&User> {
        self.user.as_ref()
    }

    /// Seed of the programs page.
    #[must_use]
    pub fn programs_seed(&self) -> (&str, Option<AgencyId>) {
        (&self.initial_query, self.initial_agency_id)
    }

    fn navigate(&mut self, page: Page) {
        debug!("Navigating from {} to {page}", self.navigator.current());
        self.navigator.navigate(page);
    }

    /// Opens a page from the menu. Opening the programs page this way clears its seed.
    pub fn open(&mut self, page: Page) {
        if page == Page::Programs {
            self.initial_query.clear();
            self.initial_agency_id = None;
        }
        self.navigate(page);
    }

    /// Returns to the previous page.
    pub fn go_back(&mut self) -> Page {
        let page = self.navigator.go_back();
        debug!("Back to {page}");
        page
    }

    /// Focuses a program and opens its detail page.
    pub fn select_program(&mut self, id: ProgramId) {
        self.selected_program = Some(id);
        self.navigate(Page::ProgramDetail);
    }

    /// Focuses a course and opens its detail page.
    pub fn select_course(&mut self, id: CourseId) {
        self.selected_course = Some(id);
        self.navigate(Page::CourseDetail);
    }

    /// Focuses an agency and opens its detail page.
    pub fn select_agency(&mut self, id: AgencyId) {
        self.selected_agency = Some(id);
        self.navigate(Page::AgencyDetail);
    }

    /// Opens a static content page.
    pub fn show_content(&mut self, kind: ContentKind) {
        self.content = Some(match kind {
            ContentKind::Certifications => certifications_page(),
            ContentKind::About => about_page(),
        });
        self.navigate(Page::ContentPage);
    }

    /// Opens the programs page seeded with `query`.
    pub fn search(&mut self, query: &str) {
        info!("Search for {query:?}");
        self.initial_query = query.to_string();
        self.initial_agency_id = None;
        self.navigate(Page::Programs);
    }

    /// Opens the programs page seeded with one agency.
    pub fn view_agency_programs(&mut self, agency_id: AgencyId) {
        self.initial_query.clear();
        self.initial_agency_id = Some(agency_id);
        self.navigate(Page::Programs);
    }

    /// Whether `user` signs in to the agency dashboard.
    #[must_use]
    pub fn is_agency_login(&self, user: &User) -> bool {
        user.email.eq_ignore_ascii_case(&self.session.agency_login_email)
    }

    /// Stores the signed-in user and opens the dashboard or the home page.
    pub fn login(&mut self, user: User) {
        let page = if self.is_agency_login(&user) {
            Page::AgencyDashboard
        } else {
            Page::Home
        };
        info!("{} signed in", user.email);
        self.user = Some(user);
        self.navigate(page);
    }

    /// Forgets the user and goes home.
    pub fn logout(&mut self) {
        if let Some(user) = self.user.take() {
            info!("{} signed out", user.email);
        }
        self.navigate(Page::Home);
    }

    /// Resolves the current page against the current snapshot.
    ///
    /// Detail pages whose focus is unset or no longer exists render the home page.
    #[must_use]
    pub fn view(&self) -> View {
        let snapshot = self.store.snapshot();
        let page = self.navigator.current();
        self.resolve(page, &snapshot).unwrap_or_else(|| {
            if page.is_detail() {
                debug!("No focused record for {page}, showing {}", Page::INITIAL);
            } else {
                warn!("Nothing to show on {page}, falling back to {}", Page::INITIAL);
            }
            home_view(&snapshot)
        })
    }

    fn resolve(&self, page: Page, snapshot: &CatalogSnapshot) -> Option<View> {
        let view = match page {
            Page::Home => home_view(snapshot),
            Page::Programs => View::Programs {
                programs: snapshot.programs.clone(),
                agencies: snapshot.agencies.clone(),
                initial_query: self.initial_query.clone(),
                initial_agency_id: self.initial_agency_id,
            },
            Page::ProgramDetail => {
                let program = snapshot.program(self.selected_program?)?.clone();
                View::ProgramDetail {
                    average_rating: derive::average_rating(&program),
                    courses: derive::related_courses(&snapshot.courses, program.id),
                    program,
                }
            }
            Page::Map => View::Map {
                cities: city_safety(&snapshot.programs, &self.cities),
                programs: snapshot.programs.clone(),
            },
            Page::Hub => View::Hub {
                courses: snapshot.courses.clone(),
                programs: snapshot.programs.clone(),
            },
            Page::AgencyDetail => {
                let agency = snapshot.agency(self.selected_agency?)?.clone();
                View::AgencyDetail {
                    programs: derive::agency_programs(&snapshot.programs, agency.id),
                    agency,
                }
            }
            Page::ContentPage => View::Content(self.content.clone()?),
            Page::CourseDetail => {
                let course = snapshot.course(self.selected_course?)?.clone();
                View::CourseDetail {
                    related_program: snapshot.program(course.program_id).cloned(),
                    course,
                }
            }
            Page::Login => View::Login,
            Page::AgencyDashboard => {
                let agency = snapshot.agency(self.session.dashboard_agency_id)?.clone();
                View::AgencyDashboard {
                    overview: DashboardOverview::build(
                        snapshot,
                        agency.id,
                        &self.retired_programs,
                    ),
                    agency,
                }
            }
            Page::About => View::About(about_page()),
        };
        Some(view)
    }

    fn dashboard_agency(&self) -> Result<Agency> {
        let id = self.session.dashboard_agency_id;
        self.store
            .snapshot()
            .agency(id)
            .cloned()
            .ok_or_else(|| Error::validation("agency", format!("agency {id} does not exist")))
    }

    fn owned_program(&self, id: ProgramId) -> Result<Program> {
        let agency_id = self.session.dashboard_agency_id;
        self.store
            .snapshot()
            .program(id)
            .filter(|p| p.agency.id == agency_id)
            .cloned()
            .ok_or_else(|| Error::validation("program", format!("program {id} is not one of yours")))
    }

    fn owned_program_ids(&self) -> Vec<ProgramId> {
        derive::agency_programs(&self.store.snapshot().programs, self.session.dashboard_agency_id)
            .iter()
            .map(|p| p.id)
            .collect()
    }

    /// A course on one of the agency's programs, or one left behind when the agency
    /// deleted its program.
    fn owned_course(&self, id: CourseId) -> Result<Course> {
        let owned = self.owned_program_ids();
        let snapshot = self.store.snapshot();
        snapshot
            .course(id)
            .filter(|c| {
                owned.contains(&c.program_id)
                    || (self.retired_programs.contains(&c.program_id)
                        && snapshot.program(c.program_id).is_none())
            })
            .cloned()
            .ok_or_else(|| Error::validation("course", format!("course {id} is not one of yours")))
    }

    /// Creates a program for the dashboard agency.
    ///
    /// # Errors
    /// Returns [`Error::Validation`] when the form is invalid or the dashboard agency does
    /// not exist.
    pub fn add_program(&mut self, form: &ProgramForm) -> Result<Program> {
        let agency = self.dashboard_agency()?;
        let draft = form.validate(&agency, None)?;
        Ok(self.store.add_program(draft))
    }

    /// Replaces one of the dashboard agency's programs.
    ///
    /// # Errors
    /// Returns [`Error::Validation`] when the form is invalid or the program belongs to
    /// someone else.
    pub fn edit_program(&mut self, id: ProgramId, form: &ProgramForm) -> Result<MutationOutcome> {
        let agency = self.dashboard_agency()?;
        let existing = self.owned_program(id)?;
        let program = form.validate(&agency, Some(&existing))?;
        Ok(self.store.update_program(program))
    }

    /// Deletes one of the dashboard agency's programs.
    ///
    /// Its courses stay as orphans that the agency can still re-attach or delete.
    pub fn delete_program(&mut self, id: ProgramId) -> MutationOutcome {
        if self.owned_program(id).is_err() {
            warn!("Refusing to delete program {id}: not owned by the dashboard agency");
            return MutationOutcome::Missing;
        }
        let outcome = self.store.delete_program(id);
        if outcome.is_applied() {
            self.retired_programs.insert(id);
        }
        outcome
    }

    /// Creates a course on one of the dashboard agency's programs.
    ///
    /// # Errors
    /// Returns [`Error::Validation`] when the form is invalid.
    pub fn add_course(&mut self, form: &CourseForm) -> Result<Course> {
        let draft = form.validate(&self.owned_program_ids(), None)?;
        Ok(self.store.add_course(draft))
    }

    /// Replaces one of the dashboard agency's courses. An orphaned course has to be
    /// re-attached to one of the agency's programs.
    ///
    /// # Errors
    /// Returns [`Error::Validation`] when the form is invalid or the course belongs to
    /// someone else.
    pub fn edit_course(&mut self, id: CourseId, form: &CourseForm) -> Result<MutationOutcome> {
        let existing = self.owned_course(id)?;
        let course = form.validate(&self.owned_program_ids(), Some(&existing))?;
        Ok(self.store.update_course(course))
    }

    /// Deletes one of the dashboard agency's courses, orphans included.
    pub fn delete_course(&mut self, id: CourseId) -> MutationOutcome {
        if self.owned_course(id).is_err() {
            warn!("Refusing to delete course {id}: not owned by the dashboard agency");
            return MutationOutcome::Missing;
        }
        self.store.delete_course(id)
    }
}

fn home_view(snapshot: &CatalogSnapshot) -> View {
    View::Home {
        recommended: snapshot
            .programs
            .iter()
            .take(RECOMMENDED_PROGRAMS)
            .cloned()
            .collect(),
        testimonials: snapshot
            .programs
            .iter()
            .flat_map(|p| &p.feedbacks)
            .filter(|f| f.is_positive())
            .take(TESTIMONIALS)
            .cloned()
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::core::session::demo_user;
    use crate::entities::SafetyStatus;
    use crate::test_utils::*;

    fn controller() -> AppController {
        AppController::with_store(
            setup_test_store(),
            CityDirectory::default(),
            SessionConfig::default(),
        )
    }

    fn program_form(name: &str) -> ProgramForm {
        ProgramForm {
            name: name.to_string(),
            destination_city: "Kyoto".to_string(),
            destination_country: "Japan".to_string(),
            price: "3100".to_string(),
            long_description: "Temples and tea ceremonies.".to_string(),
            includes: "Tuition, Welcome Kit".to_string(),
        }
    }

    fn course_form(program_id: u64) -> CourseForm {
        CourseForm {
            kind: "Mentorship".to_string(),
            title: "Career talk".to_string(),
            description: "One hour".to_string(),
            instructor: "Chloe Davis".to_string(),
            partner: "Career Builders".to_string(),
            price: "120".to_string(),
            program_id: program_id.to_string(),
            discount_percentage: String::new(),
        }
    }

    #[test]
    fn test_starts_on_home() {
        let app = controller();
        assert_eq!(app.current_page(), Page::Home);
        let View::Home {
            recommended,
            testimonials,
        } = app.view()
        else {
            panic!("expected home");
        };
        assert_eq!(recommended.len(), 3);
        assert!(testimonials.iter().all(Feedback::is_positive));
        assert_eq!(testimonials.len(), 2);
    }

    #[test]
    fn test_select_program_then_back() {
        let mut app = controller();
        app.open(Page::Programs);
        app.select_program(1);
        let View::ProgramDetail {
            program, courses, ..
        } = app.view()
        else {
            panic!("expected program detail");
        };
        assert_eq!(program.id, 1);
        assert_eq!(courses.len(), 1);
        assert_eq!(
            app.history(),
            &[Page::Home, Page::Programs, Page::ProgramDetail]
        );

        assert_eq!(app.go_back(), Page::Programs);
        assert_eq!(app.view().page(), Page::Programs);
    }

    #[test]
    fn test_detail_without_focus_falls_back_to_home() {
        let mut app = controller();
        app.open(Page::ProgramDetail);
        assert_eq!(app.view().page(), Page::Home);

        app.select_agency(77);
        assert_eq!(app.current_page(), Page::AgencyDetail);
        assert_eq!(app.view().page(), Page::Home);

        app.open(Page::ContentPage);
        assert_eq!(app.view().page(), Page::Home);
    }

    #[test]
    fn test_deleted_focus_falls_back_to_home() {
        let mut app = controller();
        app.select_program(1);
        let _ = app.delete_program(1);
        assert_eq!(app.view().page(), Page::Home);
    }

    #[test]
    fn test_course_with_deleted_program_shows_placeholder() {
        let mut app = controller();
        let _ = app.delete_program(1);
        app.select_course(1);
        let View::CourseDetail {
            course,
            related_program,
        } = app.view()
        else {
            panic!("expected course detail");
        };
        assert_eq!(course.id, 1);
        assert!(related_program.is_none());
    }

    #[test]
    fn test_search_and_agency_seeds() {
        let mut app = controller();
        app.view_agency_programs(2);
        assert_eq!(app.programs_seed(), ("", Some(2)));

        app.search("lisbon");
        assert_eq!(app.programs_seed(), ("lisbon", None));

        app.open(Page::Home);
        app.open(Page::Programs);
        assert_eq!(app.programs_seed(), ("", None));
    }

    #[test]
    fn test_agency_login_opens_dashboard() {
        let mut app = controller();
        app.login(User {
            name: "Agency".to_string(),
            email: "agencia@app.com.br".to_string(),
            avatar: String::new(),
        });
        let View::AgencyDashboard { agency, overview } = app.view() else {
            panic!("expected dashboard");
        };
        assert_eq!(agency.id, 1);
        assert_eq!(overview.total_programs, 2);

        app.logout();
        assert!(app.user().is_none());
        assert_eq!(app.current_page(), Page::Home);
    }

    #[test]
    fn test_traveler_login_goes_home() {
        let mut app = controller();
        app.open(Page::Login);
        app.login(demo_user());
        assert_eq!(app.current_page(), Page::Home);
        assert_eq!(app.user().unwrap().name, "Maria Silva");
    }

    #[test]
    fn test_dashboard_program_crud() {
        let mut app = controller();
        let created = app.add_program(&program_form("Tea Studies")).unwrap();
        assert_eq!(created.agency.id, 1);
        assert!(app.snapshot().program(created.id).is_some());

        let outcome = app
            .edit_program(created.id, &program_form("Tea and Temples"))
            .unwrap();
        assert!(outcome.is_applied());
        assert_eq!(
            app.snapshot().program(created.id).unwrap().name,
            "Tea and Temples"
        );

        assert!(app.delete_program(created.id).is_applied());
        assert!(app.snapshot().program(created.id).is_none());
    }

    #[test]
    fn test_dashboard_cannot_touch_other_agencies() {
        let mut app = controller();
        assert!(matches!(
            app.edit_program(3, &program_form("Hijack")),
            Err(Error::Validation { field: "program", .. })
        ));
        assert_eq!(app.delete_program(3), MutationOutcome::Missing);
        assert_eq!(app.delete_course(3), MutationOutcome::Missing);
        assert!(app.add_course(&course_form(3)).is_err());
        assert_eq!(app.snapshot().revision, 0);
    }

    #[test]
    fn test_dashboard_course_crud() {
        let mut app = controller();
        let created = app.add_course(&course_form(2)).unwrap();
        assert_eq!(created.discount_percentage, 0);

        let mut form = CourseForm::from_course(&created);
        form.discount_percentage = "100".to_string();
        assert!(app.edit_course(created.id, &form).unwrap().is_applied());
        assert!(app.snapshot().course(created.id).unwrap().is_free());

        assert!(app.delete_course(created.id).is_applied());
        assert!(app.snapshot().course(created.id).is_none());
    }

    #[test]
    fn test_orphaned_course_can_be_deleted() {
        let mut app = controller();
        assert!(app.delete_program(1).is_applied());
        assert!(app.snapshot().course(1).is_some());

        assert!(app.delete_course(1).is_applied());
        assert!(app.snapshot().course(1).is_none());
        assert!(app.snapshot().orphaned_courses().is_empty());
    }

    #[test]
    fn test_orphaned_course_is_reattached_on_edit() {
        let mut app = controller();
        assert!(app.delete_program(2).is_applied());
        let orphan = app.snapshot().course(2).unwrap().clone();

        let form = CourseForm::from_course(&orphan);
        assert!(matches!(
            app.edit_course(2, &form),
            Err(Error::Validation { field: "program_id", .. })
        ));

        let form = CourseForm {
            program_id: "1".to_string(),
            ..form
        };
        assert!(app.edit_course(2, &form).unwrap().is_applied());
        assert_eq!(app.snapshot().course(2).unwrap().program_id, 1);
    }

    #[test]
    fn test_dashboard_lists_orphaned_courses() {
        let mut app = controller();
        app.login(User {
            name: "Agency".to_string(),
            email: "agencia@app.com.br".to_string(),
            avatar: String::new(),
        });
        let _ = app.delete_program(2);
        let View::AgencyDashboard { overview, .. } = app.view() else {
            panic!("expected dashboard");
        };
        let orphans: Vec<u64> = overview.orphaned_courses.iter().map(|c| c.id).collect();
        assert_eq!(orphans, vec![2]);
        assert_eq!(overview.total_courses, 1);
    }

    #[test]
    fn test_invalid_form_leaves_catalog_unchanged() {
        let mut app = controller();
        let mut form = program_form("Broken");
        form.price = "abc".to_string();
        assert!(app.add_program(&form).is_err());
        assert_eq!(app.snapshot().programs.len(), 3);
    }

    #[test]
    fn test_map_reflects_mutations() {
        let mut app = controller();
        app.open(Page::Map);
        let View::Map { cities, .. } = app.view() else {
            panic!("expected map");
        };
        assert_eq!(cities.len(), 1);
        assert_eq!(cities[0].total_feedbacks, 4);
        assert_eq!(cities[0].safety_status, SafetyStatus::Neutral);

        app.add_program(&program_form("Tea Studies")).unwrap();
        let View::Map { cities, .. } = app.view() else {
            panic!("expected map");
        };
        assert_eq!(cities.len(), 2);
        assert_eq!(cities[1].city_name, "Kyoto");
        assert_eq!(cities[1].total_feedbacks, 0);
    }

    #[test]
    fn test_content_pages() {
        let mut app = controller();
        app.show_content(ContentKind::Certifications);
        let View::Content(page) = app.view() else {
            panic!("expected content page");
        };
        assert_eq!(page.title, "Certifications and Verifications");

        app.open(Page::About);
        assert!(matches!(app.view(), View::About(_)));
    }
}
