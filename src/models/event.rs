use chrono::{DateTime, Duration, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::calendar::week::week_of;
use crate::utils::error::AppError;

pub const GAME_NAME_MAX: usize = 256;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Event {
    pub id: Uuid,
    pub date: DateTime<Utc>,
    /// Planned length in minutes; open-ended events leave this unset.
    pub length_minutes: Option<i64>,
    pub host_id: Uuid,
    pub added: DateTime<Utc>,
    pub added_by: Uuid,
}

impl Event {
    /// An event is archived once its start time has passed. This is derived
    /// from the clock, never stored.
    pub fn archived(&self, now: DateTime<Utc>) -> bool {
        self.date < now
    }

    pub fn ends(&self) -> Option<DateTime<Utc>> {
        self.length_minutes.map(|m| self.date + Duration::minutes(m))
    }

    /// ISO week number of the event's start date.
    pub fn week(&self) -> u32 {
        week_of(self.date.date_naive())
    }

    pub fn day(&self) -> NaiveDate {
        self.date.date_naive()
    }

    pub fn body(&self, now: DateTime<Utc>) -> EventBody {
        EventBody {
            id: self.id,
            date: self.date,
            length_minutes: self.length_minutes,
            host_id: self.host_id,
            added: self.added,
            added_by: self.added_by,
            archived: self.archived(now),
            ends: self.ends(),
            week: self.week(),
        }
    }
}

/// Serialized event with its derived fields resolved against a clock.
#[derive(Debug, Clone, Serialize)]
pub struct EventBody {
    pub id: Uuid,
    pub date: DateTime<Utc>,
    pub length_minutes: Option<i64>,
    pub host_id: Uuid,
    pub added: DateTime<Utc>,
    pub added_by: Uuid,
    pub archived: bool,
    pub ends: Option<DateTime<Utc>>,
    pub week: u32,
}

/// Input for event creation, including the nested game list.
#[derive(Debug, Clone, Deserialize)]
pub struct NewEvent {
    pub date: DateTime<Utc>,
    pub length_minutes: Option<i64>,
    pub host_id: Uuid,
    pub games: Vec<String>,
}

impl NewEvent {
    pub fn validate(&self, now: DateTime<Utc>) -> Result<(), AppError> {
        if self.date < now {
            return Err(AppError::Field {
                field: "date",
                message: "date can not be in the past".to_string(),
            });
        }
        if self.games.is_empty() {
            return Err(AppError::Field {
                field: "games",
                message: "at least one game is required".to_string(),
            });
        }
        for name in &self.games {
            validate_game_name(name)?;
        }
        Ok(())
    }
}

/// Validates the trimmed name, which is also the form that gets persisted.
pub fn validate_game_name(name: &str) -> Result<(), AppError> {
    let name = name.trim();
    if name.is_empty() {
        return Err(AppError::Field {
            field: "games",
            message: "game name can not be empty".to_string(),
        });
    }
    if name.chars().count() > GAME_NAME_MAX {
        return Err(AppError::Field {
            field: "games",
            message: format!("game name is longer than {} characters", GAME_NAME_MAX),
        });
    }
    Ok(())
}

/// Partial update applied by the edit operation; unset fields are preserved.
#[derive(Debug, Clone, Default)]
pub struct EventChanges {
    pub date: Option<DateTime<Utc>>,
    pub length_minutes: Option<Option<i64>>,
    pub host_id: Option<Uuid>,
}

impl EventChanges {
    pub fn apply(&self, event: &mut Event) {
        if let Some(date) = self.date {
            event.date = date;
        }
        if let Some(length) = self.length_minutes {
            event.length_minutes = length;
        }
        if let Some(host) = self.host_id {
            event.host_id = host;
        }
    }
}
