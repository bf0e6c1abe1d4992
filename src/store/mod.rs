//! Persistence seam. Handlers and services talk to the [`Store`] trait;
//! production uses [`PgStore`], unit tests use the in-memory `MemStore`.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::account::PartialSignup;
use crate::models::{Event, Game, User};
use crate::utils::error::AppError;

pub mod pg;
#[cfg(test)]
pub mod mem;

pub use pg::PgStore;

#[async_trait]
pub trait Store: Send + Sync {
    // Users
    async fn user_by_id(&self, id: Uuid) -> Result<Option<User>, AppError>;
    async fn user_by_email(&self, email: &str) -> Result<Option<User>, AppError>;
    async fn insert_user(&self, user: &User) -> Result<(), AppError>;

    // Events, ordered by date ascending
    async fn event_by_id(&self, id: Uuid) -> Result<Option<Event>, AppError>;
    async fn events_between(
        &self,
        from: DateTime<Utc>,
        until: DateTime<Utc>,
    ) -> Result<Vec<Event>, AppError>;
    async fn insert_event(&self, event: &Event, games: &[Game]) -> Result<(), AppError>;
    async fn update_event(&self, event: &Event) -> Result<(), AppError>;
    /// Removes the event and, with it, its games.
    async fn delete_event(&self, id: Uuid) -> Result<(), AppError>;
    async fn games_of(&self, event_id: Uuid) -> Result<Vec<Game>, AppError>;

    // Participation; add and remove are idempotent
    async fn participants_of(&self, event_id: Uuid) -> Result<Vec<User>, AppError>;
    async fn add_participant(&self, event_id: Uuid, user_id: Uuid) -> Result<(), AppError>;
    async fn remove_participant(&self, event_id: Uuid, user_id: Uuid) -> Result<(), AppError>;

    // Sessions
    async fn user_for_session(&self, token: &str) -> Result<Option<User>, AppError>;
    async fn insert_session(
        &self,
        token: &str,
        user_id: Uuid,
        now: DateTime<Utc>,
    ) -> Result<(), AppError>;
    async fn delete_session(&self, token: &str) -> Result<(), AppError>;

    // Partial signups
    async fn insert_partial_signup(&self, partial: &PartialSignup) -> Result<(), AppError>;
    async fn partial_signup(&self, token: &str) -> Result<Option<PartialSignup>, AppError>;
    async fn delete_partial_signup(&self, token: &str) -> Result<(), AppError>;
}
