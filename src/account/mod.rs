//! Signup/invitation adapter: bridges the external verified-email handshake
//! to local account creation. The external provider's wire protocol is out
//! of scope; this module starts from its outcome, an identity assertion plus
//! an optional verified-email marker.

use chrono::{DateTime, Utc};
use serde::Deserialize;
use sqlx::FromRow;
use uuid::Uuid;

use crate::models::user::User;
use crate::utils::error::AppError;

/// What the external identity provider asserts about the requester after a
/// completed handshake.
#[derive(Debug, Clone, Deserialize)]
pub struct IdentityAssertion {
    pub backend: String,
    pub email: String,
}

/// Outcome of classifying an inbound assertion. The presence of a verified
/// email marker makes it a signup attempt, otherwise it is a login attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthDecision {
    /// Signup attempt, no matching local account: present the signup form.
    PresentSignupForm,
    /// Signup attempt, but the verified email already maps to an account.
    AlreadyAssociated,
    /// Login attempt with no matching local account.
    RejectLogin,
    /// Login attempt with a matching local account: pass through.
    ContinueLogin,
}

pub fn resolve(verified_email: Option<&str>, local_user_exists: bool) -> AuthDecision {
    match (verified_email, local_user_exists) {
        (Some(_), false) => AuthDecision::PresentSignupForm,
        (Some(_), true) => AuthDecision::AlreadyAssociated,
        (None, false) => AuthDecision::RejectLogin,
        (None, true) => AuthDecision::ContinueLogin,
    }
}

/// Resumable state of an in-progress signup. The row's existence is the
/// `SignupFormPresented` stage; consuming it on form submission clears the
/// verified-email marker.
#[derive(Debug, Clone, FromRow)]
pub struct PartialSignup {
    pub token: String,
    pub verified_email: String,
    pub backend: String,
    pub created_at: DateTime<Utc>,
}

impl PartialSignup {
    pub fn begin(backend: &str, verified_email: &str, now: DateTime<Utc>) -> Self {
        Self {
            token: Uuid::new_v4().simple().to_string(),
            verified_email: verified_email.to_string(),
            backend: backend.to_string(),
            created_at: now,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct SignupForm {
    pub username: String,
    pub email: String,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
}

/// Field-level validation of the signup form against the token's immutable
/// verified email.
pub fn validate_signup_form(
    form: &SignupForm,
    verified_email: &str,
    email_taken: bool,
) -> Result<(), AppError> {
    if form.username.trim().is_empty() {
        return Err(AppError::Field {
            field: "username",
            message: "username is required".to_string(),
        });
    }
    if form.email != verified_email {
        return Err(AppError::Field {
            field: "email",
            message: "email must not be changed".to_string(),
        });
    }
    if email_taken {
        return Err(AppError::Field {
            field: "email",
            message: "email is already registered".to_string(),
        });
    }
    Ok(())
}

/// Receiver for the signed-up notification, passed explicitly into the
/// signup operation instead of dispatched through a global signal.
pub trait SignupListener: Send + Sync {
    fn on_user_signed_up(&self, user: &User);
}

/// Default listener: records the signup in the log. Invitation-email
/// delivery lives outside this core.
pub struct LoggingSignupListener;

impl SignupListener for LoggingSignupListener {
    fn on_user_signed_up(&self, user: &User) {
        tracing::info!(user = %user.username, email = %user.email, "User signed up");
    }
}
