use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// A game offered at an event. Games only exist as part of their event's
/// nested list and are removed together with it.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Game {
    pub id: Uuid,
    pub event_id: Uuid,
    pub name: String,
}
