//! Requester identity. Sessions are issued by the account flow; requests
//! carry them as bearer tokens.

use axum::async_trait;
use axum::extract::FromRequestParts;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use axum::http::HeaderMap;

use crate::models::User;
use crate::state::AppState;
use crate::store::Store;
use crate::utils::error::AppError;

/// Extractor for the authenticated requester. Handlers taking this reject
/// unauthenticated requests with `Unauthorized` before running.
#[derive(Debug)]
pub struct CurrentUser(pub User);

pub fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
}

#[async_trait]
impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = bearer_token(&parts.headers)
            .ok_or_else(|| AppError::Unauthorized("login required".to_string()))?;
        let user = state
            .store
            .user_for_session(token)
            .await?
            .ok_or_else(|| AppError::Unauthorized("session expired or unknown".to_string()))?;
        Ok(CurrentUser(user))
    }
}
