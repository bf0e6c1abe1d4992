//! Event endpoints: detail, prefilled create contexts, the lifecycle
//! operations and participation toggles.

use axum::extract::{Path, State};
use axum::response::{IntoResponse, Response};
use axum::Json;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::auth::CurrentUser;
use crate::calendar::links::{day_link, event_link, month_link, week_link, CALENDAR_INDEX};
use crate::calendar::week::IsoWeek;
use crate::models::{EventChanges, NewEvent};
use crate::services::events as ops;
use crate::state::AppState;
use crate::utils::error::AppError;
use crate::utils::response::{created, redirect, success};

/// Events proposed from a calendar cell start at 18:00 unless a time is
/// given.
const DEFAULT_START_HOUR: u32 = 18;

pub async fn show(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<Uuid>,
) -> Result<Response, AppError> {
    let detail = ops::show(state.store.as_ref(), &user, id, Utc::now()).await?;
    Ok(success(detail, "Event").into_response())
}

/// Prefilled values for the create form, plus the navigation target the
/// cancel path falls back to.
#[derive(Debug, Serialize)]
pub struct CreatePrefill {
    pub date: Option<DateTime<Utc>>,
    pub host_id: Uuid,
    pub previous: String,
}

fn at(date: NaiveDate, hour: u32, minute: u32) -> Result<DateTime<Utc>, AppError> {
    Ok(date
        .and_hms_opt(hour, minute, 0)
        .ok_or_else(|| AppError::InvalidDate(format!("{}:{} is not a time of day", hour, minute)))?
        .and_utc())
}

fn calendar_date(year: i32, month: u32, day: u32) -> Result<NaiveDate, AppError> {
    NaiveDate::from_ymd_opt(year, month, day).ok_or_else(|| {
        AppError::InvalidDate(format!("{}-{}-{} is not a calendar date", year, month, day))
    })
}

pub async fn add_index(CurrentUser(user): CurrentUser) -> Result<Response, AppError> {
    let prefill = CreatePrefill {
        date: None,
        host_id: user.id,
        previous: CALENDAR_INDEX.to_string(),
    };
    Ok(success(prefill, "New event").into_response())
}

pub async fn add_for_month(
    CurrentUser(user): CurrentUser,
    Path((year, month)): Path<(i32, u32)>,
) -> Result<Response, AppError> {
    let first = calendar_date(year, month, 1)?;
    let prefill = CreatePrefill {
        date: Some(at(first, DEFAULT_START_HOUR, 0)?),
        host_id: user.id,
        previous: month_link(year, month as i32),
    };
    Ok(success(prefill, "New event").into_response())
}

pub async fn add_for_day(
    CurrentUser(user): CurrentUser,
    Path((year, month, day)): Path<(i32, u32, u32)>,
) -> Result<Response, AppError> {
    let date = calendar_date(year, month, day)?;
    let prefill = CreatePrefill {
        date: Some(at(date, DEFAULT_START_HOUR, 0)?),
        host_id: user.id,
        previous: day_link(date),
    };
    Ok(success(prefill, "New event").into_response())
}

pub async fn add_for_time(
    CurrentUser(user): CurrentUser,
    Path((year, month, day, hour, minute)): Path<(i32, u32, u32, u32, u32)>,
) -> Result<Response, AppError> {
    let date = calendar_date(year, month, day)?;
    let prefill = CreatePrefill {
        date: Some(at(date, hour, minute)?),
        host_id: user.id,
        previous: day_link(date),
    };
    Ok(success(prefill, "New event").into_response())
}

pub async fn add_for_week(
    CurrentUser(user): CurrentUser,
    Path((year, week)): Path<(i32, u32)>,
) -> Result<Response, AppError> {
    let week = IsoWeek::new(year, week)?;
    let prefill = CreatePrefill {
        date: Some(at(week.monday(), DEFAULT_START_HOUR, 0)?),
        host_id: user.id,
        previous: week_link(week),
    };
    Ok(success(prefill, "New event").into_response())
}

#[derive(Debug, Deserialize)]
pub struct CreateEventRequest {
    #[serde(default)]
    pub cancel: bool,
    /// Navigation target for the cancel path, as handed out by the prefill
    /// endpoints.
    pub previous: Option<String>,
    pub date: Option<DateTime<Utc>>,
    pub length_minutes: Option<i64>,
    /// Defaults to the requester.
    pub host_id: Option<Uuid>,
    #[serde(default)]
    pub games: Vec<String>,
}

pub async fn create(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Json(req): Json<CreateEventRequest>,
) -> Result<Response, AppError> {
    if req.cancel {
        let target = req.previous.unwrap_or_else(|| CALENDAR_INDEX.to_string());
        return Ok(redirect(target, "Event creation cancelled").into_response());
    }

    let date = req.date.ok_or(AppError::Field {
        field: "date",
        message: "date is required".to_string(),
    })?;
    let input = NewEvent {
        date,
        length_minutes: req.length_minutes,
        host_id: req.host_id.unwrap_or(user.id),
        games: req.games,
    };

    let detail = ops::create(state.store.as_ref(), &user, input, Utc::now()).await?;
    Ok(created(detail, "Event created").into_response())
}

#[derive(Debug, Deserialize)]
pub struct UpdateEventRequest {
    #[serde(default)]
    pub cancel: bool,
    pub date: Option<DateTime<Utc>>,
    pub length_minutes: Option<i64>,
    /// Set to drop the planned length entirely.
    #[serde(default)]
    pub clear_length: bool,
    pub host_id: Option<Uuid>,
}

pub async fn update(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<Uuid>,
    Json(req): Json<UpdateEventRequest>,
) -> Result<Response, AppError> {
    if req.cancel {
        return Ok(redirect(event_link(id), "Edit cancelled").into_response());
    }

    let changes = EventChanges {
        date: req.date,
        length_minutes: if req.clear_length {
            Some(None)
        } else {
            req.length_minutes.map(Some)
        },
        host_id: req.host_id,
    };

    let detail = ops::update(state.store.as_ref(), &user, id, changes, Utc::now()).await?;
    Ok(success(detail, "Event updated").into_response())
}

#[derive(Debug, Default, Deserialize)]
pub struct DeleteEventRequest {
    #[serde(default)]
    pub cancel: bool,
}

pub async fn delete(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<Uuid>,
    body: Option<Json<DeleteEventRequest>>,
) -> Result<Response, AppError> {
    let req = body.map(|Json(r)| r).unwrap_or_default();
    if req.cancel {
        return Ok(redirect(event_link(id), "Deletion cancelled").into_response());
    }

    let target = ops::delete(state.store.as_ref(), &user, id, Utc::now()).await?;
    Ok(redirect(target, "Event deleted").into_response())
}

pub async fn participate(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<Uuid>,
) -> Result<Response, AppError> {
    ops::join(state.store.as_ref(), &user, id, Utc::now()).await?;
    Ok(redirect(event_link(id), "Participation recorded").into_response())
}

pub async fn leave(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<Uuid>,
) -> Result<Response, AppError> {
    ops::leave(state.store.as_ref(), &user, id, Utc::now()).await?;
    Ok(redirect(event_link(id), "Participation removed").into_response())
}
