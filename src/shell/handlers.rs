//! Command execution against the shell state.
//!
//! Each handler performs one intent and returns the reply to print. Form errors come back
//! as [`Error::Validation`] and are printed inline; nothing is written to the catalog
//! unless validation passed.

use super::{
    Reply, Shell,
    commands::{CourseFilterAction, CourseFields, DashboardAction, ProgramFields, ProgramFilterAction, ShellCommand},
};
use crate::{
    core::{
        app::{ContentKind, View},
        filter::find_city,
        forms::{CourseForm, ProgramForm},
        navigation::Page,
        session::{AuthView, avatar_for},
        store::MutationOutcome,
    },
    entities::{CourseKind, User},
    errors::{Error, Result},
};
use tracing::debug;

fn joined(words: &[String]) -> String {
    words.join(" ")
}

fn optional(words: &[String]) -> Option<String> {
    (!words.is_empty()).then(|| joined(words))
}

fn wrong_page(what: &str, page: Page) -> Error {
    Error::Command {
        message: format!("`{what}` only works on the {page} page"),
    }
}

fn overlay(target: &mut String, value: Option<String>) {
    if let Some(value) = value {
        *target = value;
    }
}

impl ProgramFields {
    fn apply_to(self, form: &mut ProgramForm) {
        overlay(&mut form.name, self.name);
        overlay(&mut form.destination_city, self.city);
        overlay(&mut form.destination_country, self.country);
        overlay(&mut form.price, self.price);
        overlay(&mut form.long_description, self.description);
        overlay(&mut form.includes, self.includes);
    }
}

impl CourseFields {
    fn apply_to(self, form: &mut CourseForm) {
        overlay(&mut form.kind, self.kind);
        overlay(&mut form.title, self.title);
        overlay(&mut form.description, self.description);
        overlay(&mut form.instructor, self.instructor);
        overlay(&mut form.partner, self.partner);
        overlay(&mut form.price, self.price);
        overlay(&mut form.program_id, self.program);
        overlay(&mut form.discount_percentage, self.discount);
    }
}

impl Shell {
    /// Runs a parsed command.
    ///
    /// # Errors
    /// Returns [`Error::Command`] when the command does not apply to the current page and
    /// [`Error::Validation`] when a form or code is rejected.
    pub fn execute(&mut self, command: ShellCommand) -> Result<Reply> {
        debug!("Executing {command:?}");
        match command {
            ShellCommand::Home => self.open(Page::Home),
            ShellCommand::Programs => self.open(Page::Programs),
            ShellCommand::Map { city } => self.show_map(&city),
            ShellCommand::Hub => self.open(Page::Hub),
            ShellCommand::About => self.open(Page::About),
            ShellCommand::Login => self.open(Page::Login),
            ShellCommand::Back => {
                self.app.go_back();
                self.page()
            }
            ShellCommand::Certifications => {
                self.app.show_content(ContentKind::Certifications);
                self.page()
            }
            ShellCommand::Search { words } => {
                self.app.search(&joined(&words));
                self.page()
            }
            ShellCommand::Program { id } => {
                self.app.select_program(id);
                self.page_or_missing(self.app.snapshot().program(id).is_some(), "Program", id)
            }
            ShellCommand::Course { id } => {
                self.app.select_course(id);
                self.page_or_missing(self.app.snapshot().course(id).is_some(), "Course", id)
            }
            ShellCommand::Agency { id } => {
                self.app.select_agency(id);
                self.page_or_missing(self.app.snapshot().agency(id).is_some(), "Agency", id)
            }
            ShellCommand::AgencyPrograms { id } => {
                self.app.view_agency_programs(id);
                self.page()
            }
            ShellCommand::Filter { action } => self.filter_programs(action),
            ShellCommand::HubFilter { action } => self.filter_courses(action),
            ShellCommand::Signin { email } => self.sign_in(email),
            ShellCommand::Register { name, email } => {
                let message = self.login.register(&name, &email)?;
                self.notice
                    .show(message, &self.scheduler, Self::delay(self.timers.popup_ms));
                Ok(Reply::text(message))
            }
            ShellCommand::Verify { code } => {
                let user = self.login.verify(&code)?;
                let greeting = format!("Welcome, {}!", user.name);
                self.app.login(user);
                self.page_with(&greeting)
            }
            ShellCommand::Forgot { email: None } => {
                self.require_page("forgot", Page::Login)?;
                self.login.show(AuthView::Forgot);
                self.page()
            }
            ShellCommand::Forgot { email: Some(email) } => {
                let message = self.login.forgot_password(&email)?;
                self.notice
                    .show(message, &self.scheduler, Self::delay(self.timers.popup_ms));
                Ok(Reply::text(message))
            }
            ShellCommand::Logout => {
                self.app.logout();
                self.page_with("Signed out.")
            }
            ShellCommand::Report { reason, details } => {
                let program_id = self.focused_program("report")?;
                self.report.open(program_id);
                if let Err(e) = self.report.submit(
                    reason,
                    &joined(&details),
                    &self.scheduler,
                    Self::delay(self.timers.report_dismiss_ms),
                ) {
                    // the form only lives for this one command
                    self.report.close();
                    return Err(e);
                }
                Ok(Reply::text(
                    "Thank you! Your report was sent to the SafeJourney team.",
                ))
            }
            ShellCommand::Info { name, email } => {
                let program_id = self.focused_program("info")?;
                self.info_request.open(program_id, self.app.user());
                if let Err(e) = self.info_request.submit(
                    name.as_deref(),
                    email.as_deref(),
                    &self.scheduler,
                    Self::delay(self.timers.info_request_dismiss_ms),
                ) {
                    self.info_request.close();
                    return Err(e);
                }
                Ok(Reply::text(format!(
                    "Request sent! The agency will contact {} shortly.",
                    self.info_request.email()
                )))
            }
            ShellCommand::Close => {
                self.report.close();
                self.info_request.close();
                Ok(Reply::text("Closed."))
            }
            ShellCommand::Pause => {
                self.require_home("pause")?;
                self.carousel.pause();
                Ok(Reply::text("Carousel paused."))
            }
            ShellCommand::Resume => {
                self.require_home("resume")?;
                self.carousel.resume();
                Ok(Reply::text("Carousel resumed."))
            }
            ShellCommand::Drag { offset } => {
                self.require_home("drag")?;
                self.carousel.drag_to(offset);
                self.page()
            }
            ShellCommand::Dashboard { action } => self.dashboard(action),
            ShellCommand::Quit => Ok(Reply {
                text: "Goodbye!".to_string(),
                quit: true,
            }),
        }
    }

    /// Opens the map, optionally focused on one city.
    fn show_map(&mut self, words: &[String]) -> Result<Reply> {
        self.app.open(Page::Map);
        let view = self.app.view();
        self.sync_mount(&view);
        self.selected_city = None;

        let Some(name) = optional(words) else {
            return self.page();
        };
        let found = match &view {
            View::Map { cities, .. } => find_city(cities, &name)
                .map(|c| (c.city_name.clone(), c.country_name.clone())),
            _ => None,
        };
        match found {
            Some(city) => {
                self.selected_city = Some(city);
                self.page()
            }
            None => self.page_with(&format!("No destination called '{name}' on the map.")),
        }
    }

    fn open(&mut self, page: Page) -> Result<Reply> {
        self.app.open(page);
        self.page()
    }

    fn page(&mut self) -> Result<Reply> {
        Ok(Reply::text(self.render()?))
    }

    fn page_with(&mut self, message: &str) -> Result<Reply> {
        Ok(Reply::text(format!("{message}\n{}", self.render()?)))
    }

    fn page_or_missing(&mut self, found: bool, what: &str, id: u64) -> Result<Reply> {
        if found {
            self.page()
        } else {
            self.page_with(&format!("{what} #{id} not found."))
        }
    }

    fn focused_program(&self, what: &str) -> Result<u64> {
        match self.app.view() {
            View::ProgramDetail { program, .. } => Ok(program.id),
            _ => Err(wrong_page(what, Page::ProgramDetail)),
        }
    }

    fn require_home(&self, what: &str) -> Result<()> {
        if self.app.view().page() == Page::Home {
            Ok(())
        } else {
            Err(wrong_page(what, Page::Home))
        }
    }

    fn require_page(&self, what: &str, page: Page) -> Result<()> {
        if self.app.view().page() == page {
            Ok(())
        } else {
            Err(wrong_page(what, page))
        }
    }

    fn filter_programs(&mut self, action: ProgramFilterAction) -> Result<Reply> {
        self.require_page("filter", Page::Programs)?;
        let filter = &mut self.program_filter;
        match action {
            ProgramFilterAction::Query { words } => filter.query = joined(&words),
            ProgramFilterAction::Destination { words } => filter.destination = optional(&words),
            ProgramFilterAction::Agency { id } => filter.agency_id = id,
            ProgramFilterAction::Cert { words } => filter.toggle_certification(&joined(&words)),
            ProgramFilterAction::Verif { words } => filter.toggle_verification(&joined(&words)),
            ProgramFilterAction::Clear => *filter = Default::default(),
        }
        self.page()
    }

    fn filter_courses(&mut self, action: CourseFilterAction) -> Result<Reply> {
        self.require_page("hub-filter", Page::Hub)?;
        let filter = &mut self.course_filter;
        match action {
            CourseFilterAction::Query { words } => filter.query = joined(&words),
            CourseFilterAction::Type { kind } => {
                filter.kind = kind
                    .map(|k| k.parse::<CourseKind>())
                    .transpose()
                    .map_err(|e| Error::validation("type", e))?;
            }
            CourseFilterAction::Partner { words } => filter.partner = optional(&words),
            CourseFilterAction::Offer { offer } => filter.offer = offer,
            CourseFilterAction::Instructor { words } => filter.instructor = optional(&words),
            CourseFilterAction::Clear => *filter = Default::default(),
        }
        self.page()
    }

    fn sign_in(&mut self, email: Option<String>) -> Result<Reply> {
        let mut user = self.login.sign_in();
        if let Some(email) = email {
            let email = email.trim().to_string();
            if !email.contains('@') {
                return Err(Error::validation("email", "must be an email address"));
            }
            user = User {
                name: email.split('@').next().unwrap_or_default().to_string(),
                avatar: avatar_for(&email),
                email,
            };
        }
        let greeting = format!("Signed in as {}.", user.name);
        self.app.login(user);
        self.page_with(&greeting)
    }

    fn dashboard(&mut self, action: DashboardAction) -> Result<Reply> {
        let is_agency = self
            .app
            .user()
            .is_some_and(|user| self.app.is_agency_login(user));
        if !is_agency {
            return Err(Error::Command {
                message: "sign in with the agency account to manage programs".to_string(),
            });
        }

        let message = match action {
            DashboardAction::AddProgram(fields) => {
                let mut form = ProgramForm::default();
                fields.apply_to(&mut form);
                let program = self.app.add_program(&form)?;
                format!("Program #{} created.", program.id)
            }
            DashboardAction::EditProgram { id, fields } => {
                let mut form = self
                    .app
                    .snapshot()
                    .program(id)
                    .map(ProgramForm::from_program)
                    .unwrap_or_default();
                fields.apply_to(&mut form);
                outcome_message("Program", id, "updated", self.app.edit_program(id, &form)?)
            }
            DashboardAction::DeleteProgram { id } => {
                outcome_message("Program", id, "deleted", self.app.delete_program(id))
            }
            DashboardAction::AddCourse(fields) => {
                let mut form = CourseForm {
                    kind: CourseKind::Course.to_string(),
                    ..CourseForm::default()
                };
                fields.apply_to(&mut form);
                let course = self.app.add_course(&form)?;
                format!("Course #{} created.", course.id)
            }
            DashboardAction::EditCourse { id, fields } => {
                let mut form = self
                    .app
                    .snapshot()
                    .course(id)
                    .map(CourseForm::from_course)
                    .unwrap_or_default();
                fields.apply_to(&mut form);
                outcome_message("Course", id, "updated", self.app.edit_course(id, &form)?)
            }
            DashboardAction::DeleteCourse { id } => {
                outcome_message("Course", id, "deleted", self.app.delete_course(id))
            }
        };
        self.app.open(Page::AgencyDashboard);
        self.page_with(&message)
    }
}

fn outcome_message(what: &str, id: u64, verb: &str, outcome: MutationOutcome) -> String {
    match outcome {
        MutationOutcome::Applied => format!("{what} #{id} {verb}."),
        MutationOutcome::Missing => format!("{what} #{id} not found."),
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::config::{SessionConfig, TimerConfig};
    use crate::core::{
        app::AppController,
        cities::CityDirectory,
        modal::{ModalKind, ModalPhase, TimerEvent},
        scheduler::Scheduler,
    };
    use crate::test_utils::setup_test_store;
    use std::time::Duration;
    use tokio::sync::mpsc::UnboundedReceiver;
    use tokio::time;

    fn shell() -> (Shell, UnboundedReceiver<TimerEvent>) {
        let app = AppController::with_store(
            setup_test_store(),
            CityDirectory::default(),
            SessionConfig::default(),
        );
        let (scheduler, rx) = Scheduler::channel();
        (Shell::new(app, TimerConfig::default(), scheduler), rx)
    }

    async fn next_dismissal(rx: &mut UnboundedReceiver<TimerEvent>) -> TimerEvent {
        loop {
            let event = rx.recv().await.unwrap();
            if matches!(event, TimerEvent::Dismiss { .. }) {
                return event;
            }
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_navigation_and_search() {
        let (mut shell, _rx) = shell();
        assert!(shell.handle_line("programs").text.contains("(3 of 3)"));

        let reply = shell.handle_line(r#"search "Program 3""#);
        assert!(reply.text.contains("(1 of 3)"));
        assert!(reply.text.contains("#3 Program 3"));

        // Same page twice is one history entry
        assert!(shell.handle_line("back").text.contains("Recommended programs"));
        assert!(shell.handle_line("").text.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_filters_reset_when_page_is_remounted() {
        let (mut shell, _rx) = shell();
        shell.handle_line("programs");
        let reply = shell.handle_line("filter cert 24/7 Local Support");
        assert!(reply.text.contains("(1 of 3)"));

        shell.handle_line("home");
        assert!(shell.handle_line("programs").text.contains("(3 of 3)"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_filter_requires_its_page() {
        let (mut shell, _rx) = shell();
        let reply = shell.handle_line("filter query lisbon");
        assert!(reply.text.contains("only works on the programs page"));
        let reply = shell.handle_line("report safety it was bad");
        assert!(reply.text.contains("only works on the programDetail page"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_hub_filters() {
        let (mut shell, _rx) = shell();
        shell.handle_line("hub");
        assert!(shell.handle_line("hub-filter offer free").text.contains("(1 of 3)"));
        assert!(shell
            .handle_line("hub-filter type webinar")
            .text
            .contains("Invalid type"));
        assert!(shell.handle_line("hub-filter clear").text.contains("(3 of 3)"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_report_dismisses_itself() {
        let (mut shell, mut rx) = shell();
        shell.handle_line("program 1");
        let reply = shell.handle_line("report safety nobody picked me up");
        assert!(reply.text.contains("Thank you"));
        assert_eq!(shell.report.phase(), ModalPhase::Submitted);

        let event = next_dismissal(&mut rx).await;
        assert!(matches!(
            event,
            TimerEvent::Dismiss {
                modal: ModalKind::Report,
                ..
            }
        ));
        assert!(shell.on_timer(event).is_some());
        assert_eq!(shell.report.phase(), ModalPhase::Closed);
    }

    #[tokio::test(start_paused = true)]
    async fn test_leaving_the_page_cancels_pending_dismissal() {
        let (mut shell, mut rx) = shell();
        shell.handle_line("program 1");
        shell.handle_line("info --name Ana --email ana@example.com");
        shell.handle_line("map");
        assert_eq!(shell.info_request.phase(), ModalPhase::Closed);

        time::sleep(Duration::from_millis(5000)).await;
        while let Ok(event) = rx.try_recv() {
            assert!(!matches!(event, TimerEvent::Dismiss { .. }));
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_rejected_forms_do_not_stay_open() {
        let (mut shell, _rx) = shell();
        shell.handle_line("program 1");

        let reply = shell.handle_line(r#"report safety """#);
        assert!(reply.text.starts_with("Invalid"));
        assert_eq!(shell.report.phase(), ModalPhase::Closed);

        let reply = shell.handle_line("info --name Ana --email not-an-email");
        assert!(reply.text.contains("Invalid email"));
        assert_eq!(shell.info_request.phase(), ModalPhase::Closed);
    }

    #[tokio::test(start_paused = true)]
    async fn test_map_city_lists_local_programs() {
        let (mut shell, _rx) = shell();
        let reply = shell.handle_line("map lisbon");
        assert!(reply.text.contains("== Lisbon, Portugal =="));
        assert!(reply.text.contains("#1 Program 1 | Agency 1"));
        assert!(reply.text.contains("#3 Program 3 | Agency 2"));

        let reply = shell.handle_line("map Atlantis");
        assert!(reply.text.starts_with("No destination called 'Atlantis'"));
        assert!(!reply.text.contains("Programs and agencies"));

        shell.handle_line("map Lisbon, Portugal");
        assert!(shell.handle_line("program 3").text.contains("Program 3"));
        shell.handle_line("home");
        assert!(!shell.handle_line("map").text.contains("Programs and agencies"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_dashboard_cleans_up_orphaned_courses() {
        let (mut shell, _rx) = shell();
        shell.handle_line("signin --email agencia@app.com.br");
        let reply = shell.handle_line("dashboard delete-program 1");
        assert!(reply.text.starts_with("Program #1 deleted."));
        assert!(reply.text.contains("Courses without a program"));
        assert!(reply.text.contains("linked to: Program not found"));

        let reply = shell.handle_line("dashboard delete-course 1");
        assert!(reply.text.starts_with("Course #1 deleted."));
        assert!(!reply.text.contains("Courses without a program"));
        assert!(shell.app().snapshot().course(1).is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn test_missing_program_falls_back_home() {
        let (mut shell, _rx) = shell();
        let reply = shell.handle_line("program 999");
        assert!(reply.text.starts_with("Program #999 not found."));
        assert!(reply.text.contains("Recommended programs"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_register_and_verify() {
        let (mut shell, mut rx) = shell();
        shell.handle_line("login");
        let reply = shell.handle_line("register Ana ana@example.com");
        assert!(reply.text.contains("Code sent!"));
        assert!(shell.handle_line("verify 12ab56").text.contains("6-digit code"));

        let reply = shell.handle_line("verify 123456");
        assert!(reply.text.starts_with("Welcome, Ana!"));
        assert_eq!(shell.app().user().unwrap().email, "ana@example.com");

        loop {
            let event = rx.recv().await.unwrap();
            shell.on_timer(event);
            if matches!(event, TimerEvent::NoticeExpired { .. }) {
                break;
            }
        }
        assert!(shell.notice.message().is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn test_forgot_password_tab() {
        let (mut shell, _rx) = shell();
        shell.handle_line("login");
        assert!(shell.handle_line("forgot").text.contains("forgot <email>"));
        let reply = shell.handle_line("forgot ana@example.com");
        assert!(reply.text.contains("instructions have been sent"));
        let page = shell.render().unwrap();
        assert!(page.contains("instructions have been sent"));
        assert!(page.contains("register <name> <email>"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_dashboard_requires_agency_login() {
        let (mut shell, _rx) = shell();
        let reply = shell.handle_line("dashboard delete-program 1");
        assert!(reply.text.contains("sign in with the agency account"));
        assert_eq!(shell.app().snapshot().revision, 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_dashboard_crud_through_commands() {
        let (mut shell, _rx) = shell();
        let reply = shell.handle_line("signin --email agencia@app.com.br");
        assert!(reply.text.contains("== Dashboard: Agency 1 =="));

        let reply = shell.handle_line(
            r#"dashboard add-program --name "Tea Studies" --city Kyoto --country Japan --price 3100 --description "Temples and tea""#,
        );
        assert!(reply.text.contains("created."));
        assert!(reply.text.contains("Programs: 3"));

        let reply = shell.handle_line("dashboard edit-program 2 --price abc");
        assert!(reply.text.contains("Invalid price"));

        let reply = shell.handle_line("dashboard edit-course 2 --discount 50");
        assert!(reply.text.starts_with("Course #2 updated."));
        assert_eq!(shell.app().snapshot().course(2).unwrap().discount_percentage, 50);

        let reply = shell.handle_line("dashboard delete-program 3");
        assert!(reply.text.starts_with("Program #3 not found."));
        assert!(shell.app().snapshot().program(3).is_some());
    }

    #[tokio::test(start_paused = true)]
    async fn test_carousel_commands_on_home() {
        let (mut shell, _rx) = shell();
        assert!(shell.carousel.is_running());
        assert!(shell.handle_line("pause").text.contains("paused"));
        assert!(shell.handle_line("drag 1").text.contains("(paused)"));
        assert_eq!(shell.carousel.offset(), 1);

        shell.handle_line("map");
        assert!(!shell.carousel.is_running());
        assert!(shell.handle_line("pause").text.contains("only works on the home page"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_help_and_quit() {
        let (mut shell, _rx) = shell();
        let help = shell.handle_line("help");
        assert!(help.text.contains("programs"));
        assert!(!help.quit);
        assert!(shell.handle_line("nonsense").text.contains("nonsense"));
        assert!(shell.handle_line("quit").quit);
    }
}
