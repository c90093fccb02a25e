//! Plain text rendering of views.
//!
//! Renderers only read; page-local state such as filters and the carousel offset is
//! passed in through [`PageState`].

use crate::{
    core::{
        app::View,
        derive::{self, course_price, format_average, star_rating},
        filter::{
            CourseFilter, OfferFilter, ProgramFilter, agencies_by_name, unique_destinations,
            unique_instructors, unique_partners,
        },
        session::AuthView,
    },
    entities::{Agency, CitySafetyData, ContentPage, Course, Feedback, Program, User},
    errors::Result,
};
use std::fmt::Write;

/// Testimonials visible at once in the home carousel
pub const CAROUSEL_WINDOW: usize = 3;

/// Page-local state the renderers need besides the view
#[derive(Debug, Clone, Copy)]
pub struct PageState<'a> {
    /// Criteria of the programs page
    pub program_filter: &'a ProgramFilter,
    /// Criteria of the knowledge hub
    pub course_filter: &'a CourseFilter,
    /// City and country picked on the map
    pub selected_city: Option<&'a (String, String)>,
    /// First visible testimonial
    pub carousel_offset: usize,
    /// Whether the carousel is paused
    pub carousel_paused: bool,
    /// Tab of the login page
    pub auth_view: AuthView,
    /// Signed-in user
    pub user: Option<&'a User>,
    /// Transient notice, if one is showing
    pub notice: Option<&'a str>,
}

/// Five character star bar, e.g. `★★★★☆`.
#[must_use]
pub fn stars(average: f64) -> String {
    let full = usize::from(star_rating(average));
    format!("{}{}", "★".repeat(full), "☆".repeat(5 - full))
}

/// Price with currency sign.
#[must_use]
pub fn money(amount: u32) -> String {
    format!("${amount}")
}

fn program_line(program: &Program) -> String {
    format!(
        "#{} {} | {} | {} | {} {} ({}) | {}{}",
        program.id,
        program.name,
        program.destination_label(),
        money(program.price),
        stars(derive::average_rating(program)),
        format_average(&program.feedbacks),
        program.feedbacks.len(),
        program.agency.name,
        if program.agency.is_verified { " [verified]" } else { "" }
    )
}

fn offer_label(course: &Course) -> String {
    if course.is_free() {
        "FREE with program".to_string()
    } else if course.has_discount() {
        format!(
            "{} -> {} with program ({}% off)",
            money(course.price),
            money(course_price(course)),
            course.discount_percentage
        )
    } else {
        money(course.price)
    }
}

fn course_line(course: &Course, program: Option<&Program>) -> String {
    format!(
        "#{} [{}] {} | {} | {} | {} | linked to: {}",
        course.id,
        course.kind,
        course.title,
        course.instructor,
        course.partner,
        offer_label(course),
        program.map_or("Program not found", |p| p.name.as_str())
    )
}

fn feedback_line(feedback: &Feedback) -> String {
    format!(
        "{} {} ({}): {}",
        stars(f64::from(feedback.rating)),
        feedback.author,
        feedback.date,
        feedback.comment
    )
}

fn tag_list(tags: impl IntoIterator<Item = impl AsRef<str>>) -> String {
    let tags: Vec<String> = tags.into_iter().map(|t| t.as_ref().to_string()).collect();
    if tags.is_empty() {
        "none".to_string()
    } else {
        tags.join(", ")
    }
}

/// Renders `view` with the page-local `state`.
///
/// # Errors
/// Only fails if writing into the output buffer fails.
pub fn render_view(view: &View, state: &PageState<'_>) -> Result<String> {
    let mut out = String::new();
    match view {
        View::Home {
            recommended,
            testimonials,
        } => render_home(&mut out, recommended, testimonials, state)?,
        View::Programs {
            programs, agencies, ..
        } => render_programs(&mut out, programs, agencies, state.program_filter)?,
        View::ProgramDetail {
            program,
            average_rating,
            courses,
        } => render_program_detail(&mut out, program, *average_rating, courses)?,
        View::Map { cities, programs } => {
            render_map(&mut out, cities, programs, state.selected_city)?;
        }
        View::Hub { courses, programs } => {
            render_hub(&mut out, courses, programs, state.course_filter)?;
        }
        View::AgencyDetail { agency, programs } => render_agency(&mut out, agency, programs)?,
        View::Content(page) | View::About(page) => render_content(&mut out, page)?,
        View::CourseDetail {
            course,
            related_program,
        } => render_course_detail(&mut out, course, related_program.as_ref())?,
        View::Login => render_login(&mut out, state.auth_view, state.notice)?,
        View::AgencyDashboard { agency, overview } => {
            writeln!(out, "== Dashboard: {} ==", agency.name)?;
            writeln!(
                out,
                "Programs: {} | Courses: {} | Average rating: {:.1}",
                overview.total_programs, overview.total_courses, overview.average_rating
            )?;
            writeln!(out, "\nRecent feedback:")?;
            if overview.recent_feedbacks.is_empty() {
                writeln!(out, "  No feedback yet.")?;
            }
            for feedback in &overview.recent_feedbacks {
                writeln!(out, "  {}", feedback_line(feedback))?;
            }
            writeln!(out, "\nPerformance ranking:")?;
            for (rank, program) in overview.ranking.iter().enumerate() {
                writeln!(
                    out,
                    "  {}. #{} {} {}",
                    rank + 1,
                    program.id,
                    program.name,
                    format_average(&program.feedbacks)
                )?;
            }
            writeln!(out, "\nYour courses:")?;
            for course in &overview.courses {
                let program = overview.programs.iter().find(|p| p.id == course.program_id);
                writeln!(out, "  {}", course_line(course, program))?;
            }
            if !overview.orphaned_courses.is_empty() {
                writeln!(out, "\nCourses without a program (edit --program or delete):")?;
                for course in &overview.orphaned_courses {
                    writeln!(out, "  {}", course_line(course, None))?;
                }
            }
        }
    }
    Ok(out)
}

fn render_home(
    out: &mut String,
    recommended: &[Program],
    testimonials: &[Feedback],
    state: &PageState<'_>,
) -> Result<()> {
    match state.user {
        Some(user) => writeln!(out, "== SafeJourney == Welcome back, {}!", user.name)?,
        None => writeln!(out, "== SafeJourney == Travel the world safely.")?,
    }
    writeln!(out, "\nRecommended programs:")?;
    for program in recommended {
        writeln!(out, "  {}", program_line(program))?;
    }
    if !testimonials.is_empty() {
        let paused = if state.carousel_paused { " (paused)" } else { "" };
        writeln!(out, "\nWhat travelers say{paused}:")?;
        for feedback in testimonials
            .iter()
            .cycle()
            .skip(state.carousel_offset % testimonials.len())
            .take(CAROUSEL_WINDOW.min(testimonials.len()))
        {
            writeln!(out, "  {}", feedback_line(feedback))?;
        }
    }
    Ok(())
}

fn render_programs(
    out: &mut String,
    programs: &[Program],
    agencies: &[Agency],
    filter: &ProgramFilter,
) -> Result<()> {
    let visible = filter.apply(programs);
    writeln!(out, "== Programs ({} of {}) ==", visible.len(), programs.len())?;
    writeln!(out, "Destinations: {}", tag_list(unique_destinations(programs)))?;
    let agency_options: Vec<String> = agencies_by_name(agencies)
        .iter()
        .map(|a| format!("{} (#{})", a.name, a.id))
        .collect();
    writeln!(out, "Agencies: {}", tag_list(agency_options))?;
    if !filter.query.is_empty() {
        writeln!(out, "Search: {}", filter.query)?;
    }
    if let Some(destination) = &filter.destination {
        writeln!(out, "Destination: {destination}")?;
    }
    if let Some(agency_id) = filter.agency_id {
        let name = agencies
            .iter()
            .find(|a| a.id == agency_id)
            .map_or("unknown agency", |a| a.name.as_str());
        writeln!(out, "Agency: {name}")?;
    }
    if !filter.certifications.is_empty() {
        writeln!(out, "Certifications: {}", tag_list(&filter.certifications))?;
    }
    if !filter.verifications.is_empty() {
        writeln!(out, "Verifications: {}", tag_list(&filter.verifications))?;
    }
    if visible.is_empty() {
        writeln!(out, "No programs match these filters.")?;
    }
    for program in &visible {
        writeln!(out, "  {}", program_line(program))?;
    }
    Ok(())
}

fn render_program_detail(
    out: &mut String,
    program: &Program,
    average_rating: f64,
    courses: &[Course],
) -> Result<()> {
    writeln!(out, "== {} ==", program.name)?;
    writeln!(
        out,
        "{} | {} | by {} (agency #{})",
        program.destination_label(),
        money(program.price),
        program.agency.name,
        program.agency.id
    )?;
    writeln!(
        out,
        "Rating: {} {:.1} from {} reviews",
        stars(average_rating),
        average_rating,
        program.feedbacks.len()
    )?;
    writeln!(out, "\n{}", program.long_description)?;
    writeln!(out, "\nIncludes: {}", tag_list(&program.includes))?;
    writeln!(out, "Verifications: {}", tag_list(&program.verifications))?;
    writeln!(
        out,
        "Agency certifications: {}",
        tag_list(&program.agency.certifications)
    )?;
    if !courses.is_empty() {
        writeln!(out, "\nPrepare with:")?;
        for course in courses {
            writeln!(out, "  {}", course_line(course, Some(program)))?;
        }
    }
    writeln!(out, "\nFeedback:")?;
    for feedback in &program.feedbacks {
        writeln!(out, "  {}", feedback_line(feedback))?;
    }
    writeln!(out, "\n(report <reason> <details> | info | back)")?;
    Ok(())
}

fn render_map(
    out: &mut String,
    cities: &[CitySafetyData],
    programs: &[Program],
    selected: Option<&(String, String)>,
) -> Result<()> {
    writeln!(out, "== Safety map ({} cities) ==", cities.len())?;
    for city in cities {
        writeln!(
            out,
            "  [{}] {}, {}: {}% positive of {} feedback | ({:.4}, {:.4}) r={} km",
            city.safety_status,
            city.city_name,
            city.country_name,
            city.positive_feedback_percentage,
            city.total_feedbacks,
            city.coords.lat,
            city.coords.lng,
            city.radius / 1000
        )?;
    }
    let Some((city_name, country_name)) = selected else {
        writeln!(out, "(map <city> lists the programs and agencies of one city)")?;
        return Ok(());
    };
    let Some(city) = cities
        .iter()
        .find(|c| &c.city_name == city_name && &c.country_name == country_name)
    else {
        return Ok(());
    };
    writeln!(out, "\n== {}, {} ==", city.city_name, city.country_name)?;
    writeln!(
        out,
        "Status: {} | {}% positive | {} feedback",
        city.safety_status, city.positive_feedback_percentage, city.total_feedbacks
    )?;
    writeln!(out, "Programs and agencies in the city:")?;
    let local = derive::programs_in_city(programs, city_name, country_name);
    if local.is_empty() {
        writeln!(out, "  No programs here right now.")?;
    }
    for program in &local {
        writeln!(out, "  #{} {} | {}", program.id, program.name, program.agency.name)?;
    }
    writeln!(out, "(program <id> to open one)")?;
    Ok(())
}

fn render_hub(
    out: &mut String,
    courses: &[Course],
    programs: &[Program],
    filter: &CourseFilter,
) -> Result<()> {
    let visible = filter.apply(courses);
    writeln!(
        out,
        "== Knowledge hub ({} of {}) ==",
        visible.len(),
        courses.len()
    )?;
    writeln!(out, "Partners: {}", tag_list(unique_partners(courses)))?;
    writeln!(out, "Instructors: {}", tag_list(unique_instructors(courses)))?;
    if !filter.query.is_empty() {
        writeln!(out, "Search: {}", filter.query)?;
    }
    if let Some(kind) = filter.kind {
        writeln!(out, "Type: {kind}")?;
    }
    if let Some(partner) = &filter.partner {
        writeln!(out, "Partner: {partner}")?;
    }
    if filter.offer != OfferFilter::Any {
        writeln!(out, "Offer: {}", filter.offer)?;
    }
    if let Some(instructor) = &filter.instructor {
        writeln!(out, "Instructor: {instructor}")?;
    }
    if visible.is_empty() {
        writeln!(out, "No courses match these filters.")?;
    }
    for course in &visible {
        let program = programs.iter().find(|p| p.id == course.program_id);
        writeln!(out, "  {}", course_line(course, program))?;
    }
    Ok(())
}

fn render_agency(out: &mut String, agency: &Agency, programs: &[Program]) -> Result<()> {
    writeln!(out, "== {} ==", agency.name)?;
    if agency.is_verified {
        let reason = agency.verification_reason.as_deref().unwrap_or_default();
        writeln!(out, "Verified by SafeJourney. {reason}")?;
    }
    writeln!(out, "{}", agency.description)?;
    writeln!(out, "Certifications: {}", tag_list(&agency.certifications))?;
    writeln!(out, "\nPrograms offered ({}):", programs.len())?;
    if programs.is_empty() {
        writeln!(out, "  No programs from this agency right now.")?;
    }
    for program in programs {
        writeln!(out, "  {}", program_line(program))?;
    }
    Ok(())
}

fn render_content(out: &mut String, page: &ContentPage) -> Result<()> {
    writeln!(out, "== {} ==", page.title)?;
    for section in &page.sections {
        writeln!(out, "\n{}", section.title)?;
        for item in &section.content {
            writeln!(out, "  * {}: {}", item.subtitle, item.text)?;
        }
    }
    Ok(())
}

fn render_course_detail(
    out: &mut String,
    course: &Course,
    program: Option<&Program>,
) -> Result<()> {
    writeln!(out, "== {} ({}) ==", course.title, course.kind)?;
    writeln!(out, "Instructor: {} | Partner: {}", course.instructor, course.partner)?;
    writeln!(out, "Price: {}", offer_label(course))?;
    writeln!(out, "\n{}", course.description)?;
    match program {
        Some(program) => writeln!(out, "\nLinked program: {}", program_line(program))?,
        None => writeln!(out, "\nLinked program: Program not found")?,
    }
    Ok(())
}

fn render_login(out: &mut String, view: AuthView, notice: Option<&str>) -> Result<()> {
    writeln!(out, "== Sign in ==")?;
    if let Some(notice) = notice {
        writeln!(out, "{notice}")?;
    }
    let hint = match view {
        AuthView::SignIn => "signin [--email <email>] | register <name> <email> | forgot <email>",
        AuthView::Register => "register <name> <email>",
        AuthView::Verify => "verify <six digit code>",
        AuthView::Forgot => "forgot <email>",
    };
    writeln!(out, "{hint}")?;
    Ok(())
}
