//! Mock sign-in flows.
//!
//! There is no credential check: any sign-in succeeds with the demo identity and any
//! registration completes once a six digit code is typed. The resulting [`User`] lives
//! only as long as the process.

use crate::{
    entities::User,
    errors::{Error, Result},
};
use tracing::info;

/// Length of the emailed verification code
pub const VERIFICATION_CODE_LEN: usize = 6;

/// Message shown after a registration request
pub const CODE_SENT_MESSAGE: &str = "Code sent! Check your email.";
/// Message shown after a password reset request
pub const RESET_SENT_MESSAGE: &str =
    "If the email is registered, instructions have been sent.";

/// Avatar URI derived from an email address.
#[must_use]
pub fn avatar_for(email: &str) -> String {
    format!("https://i.pravatar.cc/150?u={email}")
}

/// Identity returned by the plain sign-in form.
#[must_use]
pub fn demo_user() -> User {
    User {
        name: "Maria Silva".to_string(),
        email: "maria.silva@example.com".to_string(),
        avatar: "https://i.pravatar.cc/150?img=5".to_string(),
    }
}

/// Which tab of the login page is showing
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum AuthView {
    /// Email and password
    #[default]
    SignIn,
    /// Name, email and password
    Register,
    /// Six digit code entry
    Verify,
    /// Password reset request
    Forgot,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct Registration {
    name: String,
    email: String,
}

/// State of the login page
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoginFlow {
    view: AuthView,
    pending: Option<Registration>,
}

impl LoginFlow {
    /// Tab currently showing.
    #[must_use]
    pub const fn view(&self) -> AuthView {
        self.view
    }

    /// Switches tabs without submitting anything.
    pub fn show(&mut self, view: AuthView) {
        self.view = view;
    }

    /// Signs in with the demo identity.
    pub fn sign_in(&mut self) -> User {
        self.view = AuthView::SignIn;
        demo_user()
    }

    /// Starts a registration and moves to code entry.
    ///
    /// # Errors
    /// Returns [`Error::Validation`] if the name is blank or the email has no `@`.
    pub fn register(&mut self, name: &str, email: &str) -> Result<&'static str> {
        let name = name.trim();
        let email = email.trim();
        if name.is_empty() {
            return Err(Error::validation("name", "cannot be empty"));
        }
        validate_email(email)?;
        info!("Registration started for {email}");
        self.pending = Some(Registration {
            name: name.to_string(),
            email: email.to_string(),
        });
        self.view = AuthView::Verify;
        Ok(CODE_SENT_MESSAGE)
    }

    /// Completes the pending registration with the emailed code.
    ///
    /// # Errors
    /// Returns [`Error::Validation`] if no registration is pending or the code is not
    /// exactly six digits.
    pub fn verify(&mut self, code: &str) -> Result<User> {
        if code.len() != VERIFICATION_CODE_LEN || !code.chars().all(|c| c.is_ascii_digit()) {
            return Err(Error::validation(
                "code",
                "please enter a valid 6-digit code",
            ));
        }
        let Some(registration) = self.pending.take() else {
            return Err(Error::validation("code", "no registration in progress"));
        };
        self.view = AuthView::SignIn;
        Ok(User {
            avatar: avatar_for(&registration.email),
            name: registration.name,
            email: registration.email,
        })
    }

    /// Requests a password reset; always acknowledged.
    ///
    /// # Errors
    /// Returns [`Error::Validation`] if the email has no `@`.
    pub fn forgot_password(&mut self, email: &str) -> Result<&'static str> {
        validate_email(email.trim())?;
        self.view = AuthView::SignIn;
        Ok(RESET_SENT_MESSAGE)
    }
}

fn validate_email(email: &str) -> Result<()> {
    if email.is_empty() || !email.contains('@') {
        return Err(Error::validation("email", "must be an email address"));
    }
    Ok(())
}
