//! Account endpoints: the social-login completion step, the invitation
//! signup form and session teardown.

use axum::extract::{Path, State};
use axum::http::HeaderMap;
use axum::response::{IntoResponse, Response};
use axum::Json;
use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::account::{IdentityAssertion, SignupForm};
use crate::auth::bearer_token;
use crate::services::account as ops;
use crate::state::AppState;
use crate::utils::error::AppError;
use crate::utils::response::{created, empty_success, success};

#[derive(Serialize)]
struct LoginOptions {
    backends: Vec<String>,
    complete_url: &'static str,
    signup_url: &'static str,
}

pub async fn login_options() -> Response {
    let payload = LoginOptions {
        backends: vec!["google-oauth2".to_string()],
        complete_url: "/auth/complete",
        signup_url: "/account/signup",
    };
    success(payload, "Login options").into_response()
}

#[derive(Serialize)]
struct SignupOptions {
    invitation_required: bool,
}

pub async fn signup_options() -> Response {
    let payload = SignupOptions {
        invitation_required: true,
    };
    success(payload, "Signup requires a verified invitation email").into_response()
}

/// What the external provider hands back after its handshake: the identity
/// assertion plus, for invitation signups, the verified-email marker.
#[derive(Debug, Deserialize)]
pub struct CompleteAuthRequest {
    pub backend: String,
    pub email: String,
    pub verified_email: Option<String>,
}

pub async fn complete(
    State(state): State<AppState>,
    Json(req): Json<CompleteAuthRequest>,
) -> Result<Response, AppError> {
    let assertion = IdentityAssertion {
        backend: req.backend,
        email: req.email,
    };
    let outcome = ops::complete_social_auth(
        state.store.as_ref(),
        assertion,
        req.verified_email,
        Utc::now(),
    )
    .await?;
    Ok(success(outcome, "Authentication completed").into_response())
}

#[derive(Serialize)]
struct SignupFormContext {
    /// Bound to the token; the form must submit it unchanged.
    email: String,
    backend: String,
}

pub async fn signup_form(
    State(state): State<AppState>,
    Path(token): Path<String>,
) -> Result<Response, AppError> {
    let partial = ops::signup_context(state.store.as_ref(), &token).await?;
    let context = SignupFormContext {
        email: partial.verified_email,
        backend: partial.backend,
    };
    Ok(success(context, "Signup form").into_response())
}

pub async fn submit_signup(
    State(state): State<AppState>,
    Path(token): Path<String>,
    Json(form): Json<SignupForm>,
) -> Result<Response, AppError> {
    let completed = ops::submit_signup_form(
        state.store.as_ref(),
        state.signups.as_ref(),
        &token,
        form,
        Utc::now(),
    )
    .await?;
    Ok(created(completed, "Signed up").into_response())
}

pub async fn logout(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Response, AppError> {
    let token = bearer_token(&headers)
        .ok_or_else(|| AppError::Unauthorized("login required".to_string()))?;
    ops::logout(state.store.as_ref(), token).await?;
    Ok(empty_success("Logged out").into_response())
}
