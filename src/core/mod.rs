//! Core business logic - framework-agnostic catalog operations.
//!
//! Nothing in here prints or reads from the terminal; the shell renders whatever these
//! modules return.

/// Top-level application state and intent handlers
pub mod app;
/// Destination city pool and map placement
pub mod cities;
/// Static content pages
pub mod content;
/// Agency dashboard overview
pub mod dashboard;
/// Pure derived aggregates (ratings, city safety, prices)
pub mod derive;
/// Program and course filters
pub mod filter;
/// Mock catalog generation
pub mod generator;
/// Self-dismissing modals, notices and the home carousel
pub mod modal;
/// Page enum and history stack
pub mod navigation;
/// Cancellable timers and tickers
pub mod scheduler;
/// Mock sign-in flows
pub mod session;
/// Dashboard program and course forms
pub mod forms;
/// Canonical program and course collections
pub mod store;
