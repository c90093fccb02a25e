//! Page enum and history stack.
//!
//! The navigator only knows page identifiers. Which entity a detail page shows is held
//! by the [`AppController`](crate::core::app::AppController).

use std::fmt;
use std::str::FromStr;
use tracing::debug;

/// Every page the application can mount
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Page {
    /// Landing page with search and featured programs
    Home,
    /// Filterable program listing
    Programs,
    /// Detail of the focused program
    ProgramDetail,
    /// City safety map
    Map,
    /// Knowledge hub with courses and mentorships
    Hub,
    /// Detail of the focused agency
    AgencyDetail,
    /// Static content page
    ContentPage,
    /// Detail of the focused course
    CourseDetail,
    /// Sign-in and registration
    Login,
    /// Agency back office
    AgencyDashboard,
    /// About the platform
    About,
}

impl Page {
    /// Page every fallback resolves to.
    pub const INITIAL: Self = Self::Home;

    /// Pages that need a focused entity to render.
    #[must_use]
    pub const fn is_detail(self) -> bool {
        matches!(
            self,
            Self::ProgramDetail | Self::AgencyDetail | Self::CourseDetail | Self::ContentPage
        )
    }

    /// Stable identifier used in logs and by the shell.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Home => "home",
            Self::Programs => "programs",
            Self::ProgramDetail => "programDetail",
            Self::Map => "map",
            Self::Hub => "hub",
            Self::AgencyDetail => "agencyDetail",
            Self::ContentPage => "contentPage",
            Self::CourseDetail => "courseDetail",
            Self::Login => "login",
            Self::AgencyDashboard => "agencyDashboard",
            Self::About => "about",
        }
    }
}

impl fmt::Display for Page {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Page {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let page = match s {
            "home" => Self::Home,
            "programs" => Self::Programs,
            "programDetail" => Self::ProgramDetail,
            "map" => Self::Map,
            "hub" => Self::Hub,
            "agencyDetail" => Self::AgencyDetail,
            "contentPage" => Self::ContentPage,
            "courseDetail" => Self::CourseDetail,
            "login" => Self::Login,
            "agencyDashboard" => Self::AgencyDashboard,
            "about" => Self::About,
            other => return Err(format!("unknown page '{other}'")),
        };
        Ok(page)
    }
}

/// Current page plus a linear history, oldest first
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Navigator {
    current: Page,
    history: Vec<Page>,
}

impl Default for Navigator {
    fn default() -> Self {
        Self {
            current: Page::INITIAL,
            history: vec![Page::INITIAL],
        }
    }
}

impl Navigator {
    /// Page currently mounted.
    #[must_use]
    pub const fn current(&self) -> Page {
        self.current
    }

    /// History stack, oldest first; never empty.
    #[must_use]
    pub fn history(&self) -> &[Page] {
        &self.history
    }

    /// Moves to `page`, pushing it unless it is already on top of the stack.
    pub fn navigate(&mut self, page: Page) {
        if self.history.last() != Some(&page) {
            self.history.push(page);
        }
        debug!("Navigated to {page} (history depth {})", self.history.len());
        self.current = page;
    }

    /// Pops the top entry and returns the page now on top.
    ///
    /// An emptied stack is reset to the initial page.
    pub fn go_back(&mut self) -> Page {
        self.history.pop();
        if self.history.is_empty() {
            self.history.push(Page::INITIAL);
        }
        self.current = self.history.last().copied().unwrap_or(Page::INITIAL);
        debug!("Went back to {} (history depth {})", self.current, self.history.len());
        self.current
    }
}
