//! Console command grammar.
//!
//! Each input line is split into words (double quotes group words) and parsed by clap in
//! multicall mode, so the first word is the command name.

// Inner module to suppress missing_docs warnings for clap-generated code
mod inner {
    #![allow(missing_docs)]

    use crate::core::{filter::OfferFilter, modal::ReportReason};
    use clap::{Parser, Subcommand};

    #[derive(Debug, Parser)]
    #[command(multicall = true, name = "safejourney")]
    pub struct ShellLine {
        #[command(subcommand)]
        pub command: ShellCommand,
    }

    #[derive(Debug, Clone, PartialEq, Eq, Subcommand)]
    pub enum ShellCommand {
        /// Go to the home page
        Home,
        /// List every program
        Programs,
        /// Show the safety map; with a city, list its programs and agencies
        Map {
            /// City name or "City, Country"
            city: Vec<String>,
        },
        /// Open the knowledge hub
        Hub,
        /// About the platform
        About,
        /// Open the sign-in page
        Login,
        /// Return to the previous page
        Back,
        /// Explain certifications and verification seals
        Certifications,
        /// Search programs by name or description
        Search {
            #[arg(required = true, num_args = 1..)]
            words: Vec<String>,
        },
        /// Show one program
        Program { id: u64 },
        /// Show one course or mentorship
        Course { id: u64 },
        /// Show one agency
        Agency { id: u64 },
        /// List the programs of one agency
        AgencyPrograms { id: u64 },
        /// Narrow the programs page
        Filter {
            #[command(subcommand)]
            action: ProgramFilterAction,
        },
        /// Narrow the knowledge hub
        HubFilter {
            #[command(subcommand)]
            action: CourseFilterAction,
        },
        /// Sign in with the demo account
        Signin {
            /// Sign in as this email instead of the demo traveler
            #[arg(long)]
            email: Option<String>,
        },
        /// Create an account; a code is "sent" by email
        Register { name: String, email: String },
        /// Confirm registration with the six digit code
        Verify { code: String },
        /// Request a password reset; without an email, open the reset form
        Forgot { email: Option<String> },
        /// Sign out
        Logout,
        /// Report the program on screen
        Report {
            /// misleading, safety, support, financial or other
            reason: ReportReason,
            #[arg(required = true, num_args = 1..)]
            details: Vec<String>,
        },
        /// Request information about the program on screen
        Info {
            #[arg(long)]
            name: Option<String>,
            #[arg(long)]
            email: Option<String>,
        },
        /// Close any open modal
        Close,
        /// Pause the testimonial carousel
        Pause,
        /// Resume the testimonial carousel
        Resume,
        /// Drag the testimonial carousel to a position
        Drag { offset: usize },
        /// Manage the signed-in agency's catalog
        Dashboard {
            #[command(subcommand)]
            action: DashboardAction,
        },
        /// Leave the console
        #[command(alias = "exit")]
        Quit,
    }

    #[derive(Debug, Clone, PartialEq, Eq, Subcommand)]
    pub enum ProgramFilterAction {
        /// Free text over name and short description
        Query { words: Vec<String> },
        /// Exact "City, Country"; omit to clear
        Destination { words: Vec<String> },
        /// Agency id; omit to clear
        Agency { id: Option<u64> },
        /// Toggle a required agency certification
        Cert {
            #[arg(required = true, num_args = 1..)]
            words: Vec<String>,
        },
        /// Toggle a required program verification
        Verif {
            #[arg(required = true, num_args = 1..)]
            words: Vec<String>,
        },
        /// Reset every criterion
        Clear,
    }

    #[derive(Debug, Clone, PartialEq, Eq, Subcommand)]
    pub enum CourseFilterAction {
        /// Free text over title and description
        Query { words: Vec<String> },
        /// course or mentorship; omit to clear
        Type { kind: Option<String> },
        /// Exact partner name; omit to clear
        Partner { words: Vec<String> },
        /// any, discount or free
        Offer { offer: OfferFilter },
        /// Exact instructor name; omit to clear
        Instructor { words: Vec<String> },
        /// Reset every criterion
        Clear,
    }

    #[derive(Debug, Clone, PartialEq, Eq, Subcommand)]
    pub enum DashboardAction {
        /// Create a program
        AddProgram(ProgramFields),
        /// Change a program; omitted fields keep their value
        EditProgram {
            id: u64,
            #[command(flatten)]
            fields: ProgramFields,
        },
        /// Delete a program
        DeleteProgram { id: u64 },
        /// Create a course or mentorship
        AddCourse(CourseFields),
        /// Change a course; omitted fields keep their value
        EditCourse {
            id: u64,
            #[command(flatten)]
            fields: CourseFields,
        },
        /// Delete a course
        DeleteCourse { id: u64 },
    }

    #[derive(Debug, Clone, Default, PartialEq, Eq, clap::Args)]
    pub struct ProgramFields {
        #[arg(long)]
        pub name: Option<String>,
        #[arg(long)]
        pub city: Option<String>,
        #[arg(long)]
        pub country: Option<String>,
        #[arg(long)]
        pub price: Option<String>,
        #[arg(long)]
        pub description: Option<String>,
        /// Comma separated
        #[arg(long)]
        pub includes: Option<String>,
    }

    #[derive(Debug, Clone, Default, PartialEq, Eq, clap::Args)]
    pub struct CourseFields {
        /// course or mentorship
        #[arg(long = "type")]
        pub kind: Option<String>,
        #[arg(long)]
        pub title: Option<String>,
        #[arg(long)]
        pub description: Option<String>,
        #[arg(long)]
        pub instructor: Option<String>,
        #[arg(long)]
        pub partner: Option<String>,
        #[arg(long)]
        pub price: Option<String>,
        #[arg(long)]
        pub program: Option<String>,
        #[arg(long)]
        pub discount: Option<String>,
    }
}

pub use inner::*;

use crate::errors::{Error, Result};
use clap::Parser;

/// Splits a line into words; double quotes group words containing spaces.
///
/// # Errors
/// Returns [`Error::Command`] when a quote is left open.
pub fn split_words(line: &str) -> Result<Vec<String>> {
    let mut words = Vec::new();
    let mut current = String::new();
    let mut quoted = false;
    let mut pending = false;

    for ch in line.chars() {
        match ch {
            '"' => {
                quoted = !quoted;
                pending = true;
            }
            c if c.is_whitespace() && !quoted => {
                if pending {
                    words.push(std::mem::take(&mut current));
                    pending = false;
                }
            }
            c => {
                current.push(c);
                pending = true;
            }
        }
    }
    if quoted {
        return Err(Error::Command {
            message: "unterminated quote".to_string(),
        });
    }
    if pending {
        words.push(current);
    }
    Ok(words)
}

/// Parses one input line.
///
/// # Errors
/// Returns [`Error::Command`] carrying clap's rendered message for unknown commands, bad
/// arguments and `help` requests.
pub fn parse_line(line: &str) -> Result<ShellCommand> {
    let words = split_words(line)?;
    ShellLine::try_parse_from(words)
        .map(|parsed| parsed.command)
        .map_err(|e| Error::Command {
            message: e.render().to_string().trim_end().to_string(),
        })
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::core::{filter::OfferFilter, modal::ReportReason};

    #[test]
    fn test_split_words_with_quotes() {
        assert_eq!(
            split_words(r#"search "buenos aires"  art"#).unwrap(),
            vec!["search", "buenos aires", "art"]
        );
        assert_eq!(split_words(r#"verify """#).unwrap(), vec!["verify", ""]);
        assert!(split_words(r#"search "open"#).is_err());
        assert!(split_words("   ").unwrap().is_empty());
    }

    #[test]
    fn test_parse_navigation_commands() {
        assert_eq!(parse_line("home").unwrap(), ShellCommand::Home);
        assert_eq!(parse_line("program 12").unwrap(), ShellCommand::Program { id: 12 });
        assert_eq!(
            parse_line("agency-programs 3").unwrap(),
            ShellCommand::AgencyPrograms { id: 3 }
        );
        assert_eq!(parse_line("exit").unwrap(), ShellCommand::Quit);
        assert_eq!(parse_line("map").unwrap(), ShellCommand::Map { city: Vec::new() });
        assert_eq!(
            parse_line(r#"map "Buenos Aires""#).unwrap(),
            ShellCommand::Map {
                city: vec!["Buenos Aires".to_string()]
            }
        );
        assert_eq!(
            parse_line("search marine biology").unwrap(),
            ShellCommand::Search {
                words: vec!["marine".to_string(), "biology".to_string()]
            }
        );
    }

    #[test]
    fn test_parse_filters_and_report() {
        assert_eq!(
            parse_line("hub-filter offer free").unwrap(),
            ShellCommand::HubFilter {
                action: CourseFilterAction::Offer {
                    offer: OfferFilter::Free
                }
            }
        );
        assert_eq!(
            parse_line("filter agency").unwrap(),
            ShellCommand::Filter {
                action: ProgramFilterAction::Agency { id: None }
            }
        );
        let ShellCommand::Report { reason, details } =
            parse_line("report safety no support at night").unwrap()
        else {
            panic!("expected report");
        };
        assert_eq!(reason, ReportReason::SafetyIssue);
        assert_eq!(details.join(" "), "no support at night");
    }

    #[test]
    fn test_parse_dashboard_command() {
        let command =
            parse_line(r#"dashboard edit-program 4 --name "Tea Studies" --price 3100"#).unwrap();
        let ShellCommand::Dashboard {
            action: DashboardAction::EditProgram { id, fields },
        } = command
        else {
            panic!("expected dashboard edit");
        };
        assert_eq!(id, 4);
        assert_eq!(fields.name.as_deref(), Some("Tea Studies"));
        assert_eq!(fields.price.as_deref(), Some("3100"));
        assert!(fields.city.is_none());
    }

    #[test]
    fn test_parse_errors_are_command_errors() {
        assert!(matches!(parse_line("fly"), Err(Error::Command { .. })));
        assert!(matches!(parse_line("program abc"), Err(Error::Command { .. })));
        assert!(matches!(parse_line("report spam details"), Err(Error::Command { .. })));
    }
}
