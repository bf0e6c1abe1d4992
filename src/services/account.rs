//! Account operations: the social-login completion step and the invitation
//! signup form bound to a partial-signup token.

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::account::{
    resolve, AuthDecision, IdentityAssertion, PartialSignup, SignupForm, SignupListener,
    validate_signup_form,
};
use crate::models::User;
use crate::store::Store;
use crate::utils::error::AppError;

/// Successful outcomes of the social-login completion step.
#[derive(Debug, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum SocialOutcome {
    /// Signup attempt with no local account: the caller must complete the
    /// signup form behind the returned token.
    SignupRequired { token: String, redirect: String },
    /// Login attempt against an existing account: a session was issued.
    LoggedIn { token: String, user: User },
}

#[derive(Debug, Serialize)]
pub struct SignupCompleted {
    pub user: User,
    pub token: String,
}

fn new_session_token() -> String {
    Uuid::new_v4().simple().to_string()
}

/// Classifies an inbound identity assertion as a signup or login attempt
/// and advances the corresponding branch of the flow.
pub async fn complete_social_auth(
    store: &dyn Store,
    assertion: IdentityAssertion,
    verified_email: Option<String>,
    now: DateTime<Utc>,
) -> Result<SocialOutcome, AppError> {
    let lookup_email = verified_email.as_deref().unwrap_or(&assertion.email);
    let existing = store.user_by_email(lookup_email).await?;

    match resolve(verified_email.as_deref(), existing.is_some()) {
        AuthDecision::PresentSignupForm => {
            let partial = PartialSignup::begin(&assertion.backend, lookup_email, now);
            store.insert_partial_signup(&partial).await?;
            tracing::debug!(backend = %partial.backend, "Signup form presented");
            let redirect = format!("/account/signup/{}", partial.token);
            Ok(SocialOutcome::SignupRequired {
                token: partial.token,
                redirect,
            })
        }
        AuthDecision::AlreadyAssociated => Err(AppError::AlreadyAssociated(format!(
            "this {} account is already registered",
            assertion.backend
        ))),
        AuthDecision::RejectLogin => Err(AppError::Forbidden(
            "no account exists for this identity; sign up with an invitation first".to_string(),
        )),
        AuthDecision::ContinueLogin => {
            // Lookup succeeded in this branch
            let user = existing.ok_or_else(|| {
                AppError::NotFound(format!("no user with email {}", lookup_email))
            })?;
            let token = new_session_token();
            store.insert_session(&token, user.id, now).await?;
            tracing::debug!(user = %user.username, "Social login completed");
            Ok(SocialOutcome::LoggedIn { token, user })
        }
    }
}

/// Looks up the partial signup behind a form token.
pub async fn signup_context(
    store: &dyn Store,
    token: &str,
) -> Result<PartialSignup, AppError> {
    store
        .partial_signup(token)
        .await?
        .ok_or_else(|| AppError::NotFound("unknown or expired signup token".to_string()))
}

/// Completes the signup branch: validates the form against the token's
/// verified email, creates the user, consumes the token and notifies the
/// listener.
pub async fn submit_signup_form(
    store: &dyn Store,
    listener: &dyn SignupListener,
    token: &str,
    form: SignupForm,
    now: DateTime<Utc>,
) -> Result<SignupCompleted, AppError> {
    let partial = signup_context(store, token).await?;

    let email_taken = store.user_by_email(&form.email).await?.is_some();
    validate_signup_form(&form, &partial.verified_email, email_taken)?;

    let user = User {
        id: Uuid::new_v4(),
        username: form.username.trim().to_string(),
        email: partial.verified_email.clone(),
        first_name: form.first_name.trim().to_string(),
        last_name: form.last_name.trim().to_string(),
        created_at: now,
    };
    store.insert_user(&user).await?;
    store.delete_partial_signup(token).await?;

    listener.on_user_signed_up(&user);

    let session = new_session_token();
    store.insert_session(&session, user.id, now).await?;

    Ok(SignupCompleted {
        user,
        token: session,
    })
}

pub async fn logout(store: &dyn Store, token: &str) -> Result<(), AppError> {
    store.delete_session(token).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::mem::MemStore;
    use chrono::TimeZone;
    use std::sync::Mutex;

    struct RecordingListener {
        seen: Mutex<Vec<String>>,
    }

    impl RecordingListener {
        fn new() -> Self {
            Self {
                seen: Mutex::new(Vec::new()),
            }
        }
    }

    impl SignupListener for RecordingListener {
        fn on_user_signed_up(&self, user: &User) {
            self.seen.lock().unwrap().push(user.username.clone());
        }
    }

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2017, 3, 1, 9, 0, 0).unwrap()
    }

    fn assertion(email: &str) -> IdentityAssertion {
        IdentityAssertion {
            backend: "google-oauth2".to_string(),
            email: email.to_string(),
        }
    }

    fn existing_user(name: &str, email: &str) -> User {
        User {
            id: Uuid::new_v4(),
            username: name.to_string(),
            email: email.to_string(),
            first_name: String::new(),
            last_name: String::new(),
            created_at: now(),
        }
    }

    #[tokio::test]
    async fn signup_flow_creates_user_and_consumes_token() {
        let store = MemStore::new();
        let listener = RecordingListener::new();

        let outcome = complete_social_auth(
            &store,
            assertion("alice@example.com"),
            Some("alice@example.com".to_string()),
            now(),
        )
        .await
        .unwrap();

        let SocialOutcome::SignupRequired { token, redirect } = outcome else {
            panic!("expected the signup form");
        };
        assert_eq!(redirect, format!("/account/signup/{}", token));
        assert!(store.has_partial(&token));

        let context = signup_context(&store, &token).await.unwrap();
        assert_eq!(context.verified_email, "alice@example.com");

        let completed = submit_signup_form(
            &store,
            &listener,
            &token,
            SignupForm {
                username: "alice".to_string(),
                email: "alice@example.com".to_string(),
                first_name: "Alice".to_string(),
                last_name: String::new(),
            },
            now(),
        )
        .await
        .unwrap();

        assert_eq!(completed.user.username, "alice");
        assert!(!store.has_partial(&token));
        assert_eq!(*listener.seen.lock().unwrap(), vec!["alice".to_string()]);

        // The issued session authenticates the new user
        let user = store.user_for_session(&completed.token).await.unwrap().unwrap();
        assert_eq!(user.id, completed.user.id);
    }

    #[tokio::test]
    async fn signup_with_registered_email_is_already_associated() {
        let store = MemStore::with_users(vec![existing_user("alice", "alice@example.com")]);

        let err = complete_social_auth(
            &store,
            assertion("alice@example.com"),
            Some("alice@example.com".to_string()),
            now(),
        )
        .await
        .unwrap_err();

        assert!(matches!(err, AppError::AlreadyAssociated(_)));
    }

    #[tokio::test]
    async fn login_without_account_is_rejected() {
        let store = MemStore::new();

        let err = complete_social_auth(&store, assertion("bob@example.com"), None, now())
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Forbidden(_)));
    }

    #[tokio::test]
    async fn login_with_account_passes_through() {
        let alice = existing_user("alice", "alice@example.com");
        let store = MemStore::with_users(vec![alice.clone()]);

        let outcome = complete_social_auth(&store, assertion("alice@example.com"), None, now())
            .await
            .unwrap();
        let SocialOutcome::LoggedIn { token, user } = outcome else {
            panic!("expected a session");
        };
        assert_eq!(user.id, alice.id);

        let resolved = store.user_for_session(&token).await.unwrap().unwrap();
        assert_eq!(resolved.id, alice.id);

        logout(&store, &token).await.unwrap();
        assert!(store.user_for_session(&token).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn altered_form_email_is_a_field_error() {
        let store = MemStore::new();
        let listener = RecordingListener::new();

        let outcome = complete_social_auth(
            &store,
            assertion("alice@example.com"),
            Some("alice@example.com".to_string()),
            now(),
        )
        .await
        .unwrap();
        let SocialOutcome::SignupRequired { token, .. } = outcome else {
            panic!("expected the signup form");
        };

        let err = submit_signup_form(
            &store,
            &listener,
            &token,
            SignupForm {
                username: "mallory".to_string(),
                email: "mallory@example.com".to_string(),
                first_name: String::new(),
                last_name: String::new(),
            },
            now(),
        )
        .await
        .unwrap_err();

        assert!(matches!(err, AppError::Field { field: "email", .. }));
        // The token survives a failed submission
        assert!(store.has_partial(&token));
        assert!(listener.seen.lock().unwrap().is_empty());
    }
}
