//! Shell layer - interactive console on top of the catalog core
//!
//! Reads one command per line from stdin, hands it to the [`AppController`] and prints
//! the resulting page. Timer events from modals, notices and the home carousel arrive on
//! the same loop, so all state is touched from a single task.

/// Command grammar and line parsing
pub mod commands;
/// Command execution against the shell state
pub mod handlers;
/// Plain text rendering of views
pub mod render;

use crate::{
    config::TimerConfig,
    core::{
        app::{AppController, View},
        filter::{CourseFilter, ProgramFilter},
        modal::{Carousel, InfoRequestModal, ModalKind, Notice, ReportModal, TimerEvent},
        navigation::Page,
        scheduler::Scheduler,
        session::LoginFlow,
    },
    entities::{AgencyId, ProgramId},
    errors::{Error, Result},
};
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tracing::{debug, info, instrument};

/// Identity of a mounted page; page-local state resets when it changes
#[derive(Debug, Clone, PartialEq, Eq)]
enum Mount {
    Page(Page),
    Programs {
        query: String,
        agency_id: Option<AgencyId>,
    },
    ProgramDetail(ProgramId),
}

impl Mount {
    fn of(view: &View) -> Self {
        match view {
            View::Programs {
                initial_query,
                initial_agency_id,
                ..
            } => Self::Programs {
                query: initial_query.clone(),
                agency_id: *initial_agency_id,
            },
            View::ProgramDetail { program, .. } => Self::ProgramDetail(program.id),
            other => Self::Page(other.page()),
        }
    }
}

/// Output of one input line
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Reply {
    /// Text to print
    pub text: String,
    /// Whether the console should exit
    pub quit: bool,
}

impl Reply {
    fn text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            quit: false,
        }
    }
}

/// State of the console session.
///
/// Holds the controller plus everything a browser would keep inside mounted components:
/// page filters, modals, the login tabs and the carousel.
#[derive(Debug)]
pub struct Shell {
    app: AppController,
    timers: TimerConfig,
    scheduler: Scheduler<TimerEvent>,
    login: LoginFlow,
    report: ReportModal,
    info_request: InfoRequestModal,
    notice: Notice,
    carousel: Carousel,
    program_filter: ProgramFilter,
    course_filter: CourseFilter,
    selected_city: Option<(String, String)>,
    mounted: Option<Mount>,
}

impl Shell {
    /// Creates the shell and mounts the controller's current page.
    ///
    /// Must be called from within a tokio runtime because mounting the home page starts
    /// the carousel ticker.
    #[must_use]
    pub fn new(app: AppController, timers: TimerConfig, scheduler: Scheduler<TimerEvent>) -> Self {
        let step = timers.ticker_step;
        let mut shell = Self {
            app,
            timers,
            scheduler,
            login: LoginFlow::default(),
            report: ReportModal::default(),
            info_request: InfoRequestModal::default(),
            notice: Notice::default(),
            carousel: Carousel::new(0, step),
            program_filter: ProgramFilter::default(),
            course_filter: CourseFilter::default(),
            selected_city: None,
            mounted: None,
        };
        let view = shell.app.view();
        shell.sync_mount(&view);
        shell
    }

    /// The controller behind the console.
    #[must_use]
    pub const fn app(&self) -> &AppController {
        &self.app
    }

    const fn delay(ms: u64) -> Duration {
        Duration::from_millis(ms)
    }

    /// Tears down the previous page's components and sets up the new one's.
    fn sync_mount(&mut self, view: &View) {
        let mount = Mount::of(view);
        if self.mounted.as_ref() == Some(&mount) {
            return;
        }
        match self.mounted.take() {
            Some(Mount::Page(Page::Home)) => self.carousel.unmount(),
            Some(Mount::ProgramDetail(_)) => {
                self.report.close();
                self.info_request.close();
            }
            _ => {}
        }
        debug!("Mounting {mount:?}");
        match view {
            View::Home { testimonials, .. } => {
                self.carousel = Carousel::new(testimonials.len(), self.timers.ticker_step);
                self.carousel
                    .mount(&self.scheduler, Self::delay(self.timers.ticker_interval_ms));
            }
            View::Programs {
                initial_query,
                initial_agency_id,
                ..
            } => self.program_filter = ProgramFilter::seeded(initial_query, *initial_agency_id),
            View::Map { .. } => self.selected_city = None,
            View::Hub { .. } => self.course_filter = CourseFilter::default(),
            View::Login => self.login = LoginFlow::default(),
            _ => {}
        }
        self.mounted = Some(mount);
    }

    /// Renders the current page, remounting components if the page changed.
    ///
    /// # Errors
    /// Only fails if formatting the page fails.
    pub fn render(&mut self) -> Result<String> {
        let view = self.app.view();
        self.sync_mount(&view);
        let state = render::PageState {
            program_filter: &self.program_filter,
            course_filter: &self.course_filter,
            selected_city: self.selected_city.as_ref(),
            carousel_offset: self.carousel.offset(),
            carousel_paused: self.carousel.is_paused(),
            auth_view: self.login.view(),
            user: self.app.user(),
            notice: self.notice.message(),
        };
        render::render_view(&view, &state)
    }

    /// Handles one input line.
    pub fn handle_line(&mut self, line: &str) -> Reply {
        if line.trim().is_empty() {
            return Reply::default();
        }
        let outcome = commands::parse_line(line).and_then(|command| self.execute(command));
        match outcome {
            Ok(reply) => reply,
            // clap already formatted usage and help text
            Err(Error::Command { message }) => Reply::text(message),
            Err(e) => Reply::text(e.to_string()),
        }
    }

    /// Applies a timer event; returns a line to print if the user should see something.
    pub fn on_timer(&mut self, event: TimerEvent) -> Option<String> {
        match event {
            TimerEvent::Dismiss {
                modal: ModalKind::Report,
                ticket,
            } => self
                .report
                .on_dismiss(ticket)
                .then(|| "(report confirmation closed)".to_string()),
            TimerEvent::Dismiss {
                modal: ModalKind::InfoRequest,
                ticket,
            } => self
                .info_request
                .on_dismiss(ticket)
                .then(|| "(information request closed)".to_string()),
            TimerEvent::NoticeExpired { ticket } => {
                self.notice.on_expired(ticket);
                None
            }
            TimerEvent::CarouselTick => {
                self.carousel.on_tick();
                None
            }
        }
    }
}

async fn print(stdout: &mut tokio::io::Stdout, text: &str) -> Result<()> {
    if text.is_empty() {
        return Ok(());
    }
    stdout.write_all(text.as_bytes()).await?;
    if !text.ends_with('\n') {
        stdout.write_all(b"\n").await?;
    }
    stdout.flush().await?;
    Ok(())
}

/// Runs the console until `quit` or end of input.
///
/// # Errors
/// Returns [`Error::Io`] if stdin or stdout fail.
#[instrument(skip_all)]
pub async fn run_shell(app: AppController, timers: TimerConfig) -> Result<()> {
    let (scheduler, mut events) = Scheduler::channel();
    let mut shell = Shell::new(app, timers, scheduler);
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut stdout = tokio::io::stdout();

    info!("Console ready");
    let welcome = shell.render()?;
    print(&mut stdout, &welcome).await?;
    print(&mut stdout, "Type `help` for the list of commands.").await?;

    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line? else {
                    info!("End of input");
                    break;
                };
                let reply = shell.handle_line(&line);
                print(&mut stdout, &reply.text).await?;
                if reply.quit {
                    break;
                }
            }
            Some(event) = events.recv() => {
                if let Some(text) = shell.on_timer(event) {
                    print(&mut stdout, &text).await?;
                }
            }
        }
    }
    Ok(())
}
