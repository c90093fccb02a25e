//! Report and info-request modals, transient notices and the home carousel.
//!
//! Submitting a modal shows a confirmation and schedules its own dismissal. Every
//! scheduled event carries the ticket it was issued with; an event whose ticket no
//! longer matches (the modal was closed, reopened or torn down in between) is ignored.

use crate::{
    core::scheduler::{Scheduler, TaskHandle},
    entities::{ProgramId, User},
    errors::{Error, Result},
};
use std::fmt;
use std::str::FromStr;
use std::time::Duration;
use tracing::{debug, info};

/// Events delivered by timers owned by UI components
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerEvent {
    /// A submitted modal should close itself
    Dismiss {
        /// Which modal
        modal: ModalKind,
        /// Ticket issued when the modal was submitted
        ticket: u64,
    },
    /// A transient notice should disappear
    NoticeExpired {
        /// Ticket issued when the notice was shown
        ticket: u64,
    },
    /// The home carousel should advance
    CarouselTick,
}

/// Which self-dismissing modal an event belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModalKind {
    /// Report a program or agency
    Report,
    /// Request information about a program
    InfoRequest,
}

/// Lifecycle of a modal
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ModalPhase {
    /// Not shown
    #[default]
    Closed,
    /// Form visible
    Open,
    /// Confirmation visible, dismissal scheduled
    Submitted,
}

/// Why a traveler reports a program
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportReason {
    /// The listing does not match reality
    MisleadingInformation,
    /// The traveler felt unsafe
    SafetyIssue,
    /// Promised support was missing
    LackOfSupport,
    /// Hidden costs or refund problems
    FinancialIssue,
    /// Anything else
    Other,
}

impl ReportReason {
    /// Every reason in menu order.
    pub const ALL: [Self; 5] = [
        Self::MisleadingInformation,
        Self::SafetyIssue,
        Self::LackOfSupport,
        Self::FinancialIssue,
        Self::Other,
    ];

    const fn key(self) -> &'static str {
        match self {
            Self::MisleadingInformation => "misleading",
            Self::SafetyIssue => "safety",
            Self::LackOfSupport => "support",
            Self::FinancialIssue => "financial",
            Self::Other => "other",
        }
    }
}

impl fmt::Display for ReportReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::MisleadingInformation => "Misleading information",
            Self::SafetyIssue => "Safety issue",
            Self::LackOfSupport => "Lack of support",
            Self::FinancialIssue => "Financial issue",
            Self::Other => "Other",
        };
        f.write_str(label)
    }
}

impl FromStr for ReportReason {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let key = s.trim().to_lowercase();
        Self::ALL
            .into_iter()
            .find(|r| r.key() == key)
            .ok_or_else(|| {
                let keys: Vec<&str> = Self::ALL.iter().map(|r| r.key()).collect();
                format!("unknown reason '{s}' ({})", keys.join(", "))
            })
    }
}

/// Phase, ticket and pending dismissal shared by every self-dismissing modal
#[derive(Debug, Default)]
struct AutoDismiss {
    phase: ModalPhase,
    ticket: u64,
    pending: Option<TaskHandle>,
}

impl AutoDismiss {
    fn open(&mut self) {
        self.cancel();
        self.phase = ModalPhase::Open;
    }

    fn submit(
        &mut self,
        kind: ModalKind,
        scheduler: &Scheduler<TimerEvent>,
        delay: Duration,
    ) {
        self.ticket += 1;
        self.phase = ModalPhase::Submitted;
        let event = TimerEvent::Dismiss {
            modal: kind,
            ticket: self.ticket,
        };
        self.pending = Some(scheduler.after("modal dismiss", delay, event));
    }

    fn on_dismiss(&mut self, ticket: u64) -> bool {
        if self.phase != ModalPhase::Submitted || ticket != self.ticket {
            debug!("Ignoring stale dismissal ticket {ticket}");
            return false;
        }
        self.pending = None;
        self.phase = ModalPhase::Closed;
        true
    }

    fn close(&mut self) {
        self.cancel();
        self.phase = ModalPhase::Closed;
    }

    fn cancel(&mut self) {
        if let Some(mut pending) = self.pending.take() {
            pending.cancel();
        }
        // Invalidate anything already queued
        self.ticket += 1;
    }
}

/// Modal for reporting a program or its agency
#[derive(Debug, Default)]
pub struct ReportModal {
    state: AutoDismiss,
    program_id: Option<ProgramId>,
    submitted: Option<(ReportReason, String)>,
}

impl ReportModal {
    /// Current phase.
    #[must_use]
    pub const fn phase(&self) -> ModalPhase {
        self.state.phase
    }

    /// Program being reported.
    #[must_use]
    pub const fn program_id(&self) -> Option<ProgramId> {
        self.program_id
    }

    /// Last submitted reason and details.
    #[must_use]
    pub const fn submitted(&self) -> Option<&(ReportReason, String)> {
        self.submitted.as_ref()
    }

    /// Opens the form for `program_id`.
    pub fn open(&mut self, program_id: ProgramId) {
        self.program_id = Some(program_id);
        self.state.open();
    }

    /// Submits the report and schedules the confirmation to close after `delay`.
    ///
    /// # Errors
    /// Returns [`Error::Validation`] if the modal is not open or `details` is blank.
    pub fn submit(
        &mut self,
        reason: ReportReason,
        details: &str,
        scheduler: &Scheduler<TimerEvent>,
        delay: Duration,
    ) -> Result<()> {
        if self.state.phase != ModalPhase::Open {
            return Err(Error::validation("report", "open the report form first"));
        }
        if details.trim().is_empty() {
            return Err(Error::validation("details", "describe what happened"));
        }
        info!(
            "Report submitted for program {:?}: {reason}",
            self.program_id
        );
        self.submitted = Some((reason, details.trim().to_string()));
        self.state.submit(ModalKind::Report, scheduler, delay);
        Ok(())
    }

    /// Applies a dismissal event; returns whether the modal closed.
    pub fn on_dismiss(&mut self, ticket: u64) -> bool {
        self.state.on_dismiss(ticket)
    }

    /// Closes immediately and cancels any pending dismissal.
    pub fn close(&mut self) {
        self.state.close();
    }
}

/// Modal for requesting information about a program
#[derive(Debug, Default)]
pub struct InfoRequestModal {
    state: AutoDismiss,
    program_id: Option<ProgramId>,
    name: String,
    email: String,
}

impl InfoRequestModal {
    /// Current phase.
    #[must_use]
    pub const fn phase(&self) -> ModalPhase {
        self.state.phase
    }

    /// Program the request is about.
    #[must_use]
    pub const fn program_id(&self) -> Option<ProgramId> {
        self.program_id
    }

    /// Name currently in the form.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Email currently in the form.
    #[must_use]
    pub fn email(&self) -> &str {
        &self.email
    }

    /// Opens the form, prefilled from the signed-in user when there is one and blank
    /// otherwise.
    pub fn open(&mut self, program_id: ProgramId, user: Option<&User>) {
        self.program_id = Some(program_id);
        match user {
            Some(user) => {
                self.name.clone_from(&user.name);
                self.email.clone_from(&user.email);
            }
            None => {
                self.name.clear();
                self.email.clear();
            }
        }
        self.state.open();
    }

    /// Submits the request, overriding the prefilled contact when values are given.
    ///
    /// # Errors
    /// Returns [`Error::Validation`] if the modal is not open or name or email end up
    /// blank.
    pub fn submit(
        &mut self,
        name: Option<&str>,
        email: Option<&str>,
        scheduler: &Scheduler<TimerEvent>,
        delay: Duration,
    ) -> Result<()> {
        if self.state.phase != ModalPhase::Open {
            return Err(Error::validation("request", "open the request form first"));
        }
        if let Some(name) = name {
            self.name = name.trim().to_string();
        }
        if let Some(email) = email {
            self.email = email.trim().to_string();
        }
        if self.name.is_empty() {
            return Err(Error::validation("name", "cannot be empty"));
        }
        if !self.email.contains('@') {
            return Err(Error::validation("email", "must be an email address"));
        }
        info!(
            "Info request for program {:?} from {}",
            self.program_id, self.email
        );
        self.state.submit(ModalKind::InfoRequest, scheduler, delay);
        Ok(())
    }

    /// Applies a dismissal event; returns whether the modal closed.
    pub fn on_dismiss(&mut self, ticket: u64) -> bool {
        self.state.on_dismiss(ticket)
    }

    /// Closes immediately and cancels any pending dismissal.
    pub fn close(&mut self) {
        self.state.close();
    }
}

/// Short-lived message such as "Code sent! Check your email."
#[derive(Debug, Default)]
pub struct Notice {
    message: Option<String>,
    ticket: u64,
    pending: Option<TaskHandle>,
}

impl Notice {
    /// Message currently visible.
    #[must_use]
    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    /// Shows `message` for `lifetime`, replacing any visible notice.
    pub fn show(&mut self, message: &str, scheduler: &Scheduler<TimerEvent>, lifetime: Duration) {
        self.ticket += 1;
        self.message = Some(message.to_string());
        self.pending = Some(scheduler.after(
            "notice",
            lifetime,
            TimerEvent::NoticeExpired {
                ticket: self.ticket,
            },
        ));
    }

    /// Applies an expiry event; returns whether the notice disappeared.
    pub fn on_expired(&mut self, ticket: u64) -> bool {
        if ticket != self.ticket || self.message.is_none() {
            return false;
        }
        self.message = None;
        self.pending = None;
        true
    }
}

/// Auto-scrolling strip of featured programs on the home page
#[derive(Debug)]
pub struct Carousel {
    len: usize,
    offset: usize,
    step: usize,
    paused: bool,
    ticker: Option<TaskHandle>,
}

impl Carousel {
    /// Carousel over `len` items advancing `step` per tick.
    #[must_use]
    pub const fn new(len: usize, step: usize) -> Self {
        Self {
            len,
            offset: 0,
            step,
            paused: false,
            ticker: None,
        }
    }

    /// Index of the first visible item.
    #[must_use]
    pub const fn offset(&self) -> usize {
        self.offset
    }

    /// Whether hovering paused the scroll.
    #[must_use]
    pub const fn is_paused(&self) -> bool {
        self.paused
    }

    /// Whether a ticker is attached.
    #[must_use]
    pub const fn is_running(&self) -> bool {
        self.ticker.is_some()
    }

    /// Starts ticking every `period`; called when the home page mounts.
    pub fn mount(&mut self, scheduler: &Scheduler<TimerEvent>, period: Duration) {
        if self.ticker.is_none() && self.len > 0 {
            self.ticker = Some(scheduler.every("carousel", period, TimerEvent::CarouselTick));
        }
    }

    /// Stops ticking; called when the home page unmounts.
    pub fn unmount(&mut self) {
        if let Some(mut ticker) = self.ticker.take() {
            ticker.cancel();
        }
    }

    /// Advances one step unless paused or detached.
    pub fn on_tick(&mut self) {
        if self.paused || self.ticker.is_none() || self.len == 0 {
            return;
        }
        self.offset = (self.offset + self.step) % self.len;
    }

    /// Pointer entered the strip.
    pub fn pause(&mut self) {
        self.paused = true;
    }

    /// Pointer left the strip.
    pub fn resume(&mut self) {
        self.paused = false;
    }

    /// Pointer dragged the strip to `offset`.
    pub fn drag_to(&mut self, offset: usize) {
        if self.len > 0 {
            self.offset = offset % self.len;
        }
    }
}
