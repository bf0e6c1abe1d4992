//! Calendar endpoints. Every view requires an authenticated requester; the
//! grids themselves are built by the pure view builders.

use axum::extract::{Path, State};
use axum::response::{IntoResponse, Response};
use chrono::{DateTime, Datelike, Duration, NaiveDate, Utc};

use crate::auth::CurrentUser;
use crate::calendar::view::{self, day_start};
use crate::calendar::week::IsoWeek;
use crate::state::AppState;
use crate::store::Store;
use crate::utils::error::AppError;
use crate::utils::response::success;

pub async fn month_index(
    State(state): State<AppState>,
    CurrentUser(_user): CurrentUser,
) -> Result<Response, AppError> {
    let now = Utc::now();
    render_month(&state, now.year(), now.month(), now).await
}

pub async fn month(
    State(state): State<AppState>,
    CurrentUser(_user): CurrentUser,
    Path((year, month)): Path<(i32, u32)>,
) -> Result<Response, AppError> {
    render_month(&state, year, month, Utc::now()).await
}

async fn render_month(
    state: &AppState,
    year: i32,
    month: u32,
    now: DateTime<Utc>,
) -> Result<Response, AppError> {
    let (start, end) = view::month_grid(year, month)?;
    let events = state
        .store
        .events_between(day_start(start), day_start(end + Duration::days(1)))
        .await?;
    let grid = view::month_view(year, month, now, &events)?;
    Ok(success(grid, "Calendar month").into_response())
}

pub async fn week(
    State(state): State<AppState>,
    CurrentUser(_user): CurrentUser,
    Path((year, week)): Path<(i32, u32)>,
) -> Result<Response, AppError> {
    let week = IsoWeek::new(year, week)?;
    let events = state
        .store
        .events_between(
            day_start(week.monday()),
            day_start(week.monday() + Duration::days(7)),
        )
        .await?;
    let body = view::week_view(week, Utc::now(), &events);
    Ok(success(body, "Calendar week").into_response())
}

pub async fn day(
    State(state): State<AppState>,
    CurrentUser(_user): CurrentUser,
    Path((year, month, day)): Path<(i32, u32, u32)>,
) -> Result<Response, AppError> {
    let date = NaiveDate::from_ymd_opt(year, month, day).ok_or_else(|| {
        AppError::InvalidDate(format!("{}-{}-{} is not a calendar date", year, month, day))
    })?;
    let events = state
        .store
        .events_between(day_start(date), day_start(date + Duration::days(1)))
        .await?;
    let body = view::day_view(date, Utc::now(), &events)?;
    Ok(success(body, "Calendar day").into_response())
}
