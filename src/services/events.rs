//! Event lifecycle operations. Permission checks happen here; handlers only
//! translate HTTP to these calls.

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::calendar::links::day_link;
use crate::models::permissions::{can_change, can_delete};
use crate::models::{Event, EventBody, EventChanges, Game, NewEvent, User};
use crate::store::Store;
use crate::utils::error::AppError;

/// An event with everything the detail page needs: games, participants and
/// the requesting actor's permission flags.
#[derive(Debug, Serialize)]
pub struct EventDetail {
    pub event: EventBody,
    pub games: Vec<Game>,
    pub participants: Vec<User>,
    pub can_edit: bool,
    pub can_delete: bool,
    pub participating: bool,
}

async fn fetch_event(store: &dyn Store, id: Uuid) -> Result<Event, AppError> {
    store
        .event_by_id(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("no event with id {}", id)))
}

async fn assemble_detail(
    store: &dyn Store,
    event: Event,
    actor: &User,
    now: DateTime<Utc>,
) -> Result<EventDetail, AppError> {
    let games = store.games_of(event.id).await?;
    let participants = store.participants_of(event.id).await?;
    let participating = participants.iter().any(|u| u.id == actor.id);
    let editable = can_change(Some(&event), Some(actor.id), now);
    Ok(EventDetail {
        event: event.body(now),
        games,
        participants,
        can_edit: editable,
        can_delete: can_delete(Some(&event), Some(actor.id), now),
        participating,
    })
}

pub async fn show(
    store: &dyn Store,
    actor: &User,
    id: Uuid,
    now: DateTime<Utc>,
) -> Result<EventDetail, AppError> {
    let event = fetch_event(store, id).await?;
    assemble_detail(store, event, actor, now).await
}

pub async fn create(
    store: &dyn Store,
    actor: &User,
    input: NewEvent,
    now: DateTime<Utc>,
) -> Result<EventDetail, AppError> {
    input.validate(now)?;

    let event = Event {
        id: Uuid::new_v4(),
        date: input.date,
        length_minutes: input.length_minutes,
        host_id: input.host_id,
        added: now,
        added_by: actor.id,
    };
    let games: Vec<Game> = input
        .games
        .iter()
        .map(|name| Game {
            id: Uuid::new_v4(),
            event_id: event.id,
            name: name.trim().to_string(),
        })
        .collect();

    store.insert_event(&event, &games).await?;
    tracing::info!(event = %event.id, host = %event.host_id, "Event created");

    assemble_detail(store, event, actor, now).await
}

pub async fn update(
    store: &dyn Store,
    actor: &User,
    id: Uuid,
    changes: EventChanges,
    now: DateTime<Utc>,
) -> Result<EventDetail, AppError> {
    let mut event = fetch_event(store, id).await?;
    if !can_change(Some(&event), Some(actor.id), now) {
        return Err(AppError::Forbidden(
            "only the host or the creator may edit a live event".to_string(),
        ));
    }

    changes.apply(&mut event);
    store.update_event(&event).await?;

    assemble_detail(store, event, actor, now).await
}

/// Deletes the event (games go with it) and returns the day link of its
/// original date as the follow-up navigation target.
pub async fn delete(
    store: &dyn Store,
    actor: &User,
    id: Uuid,
    now: DateTime<Utc>,
) -> Result<String, AppError> {
    let event = fetch_event(store, id).await?;
    if !can_delete(Some(&event), Some(actor.id), now) {
        return Err(AppError::Forbidden(
            "only the host or the creator may delete a live event".to_string(),
        ));
    }

    store.delete_event(event.id).await?;
    tracing::info!(event = %event.id, "Event deleted");

    Ok(day_link(event.day()))
}

pub async fn join(
    store: &dyn Store,
    actor: &User,
    id: Uuid,
    now: DateTime<Utc>,
) -> Result<(), AppError> {
    let event = fetch_event(store, id).await?;
    if event.archived(now) {
        return Err(AppError::Forbidden(
            "archived events can not be joined".to_string(),
        ));
    }
    store.add_participant(event.id, actor.id).await
}

pub async fn leave(
    store: &dyn Store,
    actor: &User,
    id: Uuid,
    now: DateTime<Utc>,
) -> Result<(), AppError> {
    let event = fetch_event(store, id).await?;
    if event.archived(now) {
        return Err(AppError::Forbidden(
            "archived events can not be left".to_string(),
        ));
    }
    store.remove_participant(event.id, actor.id).await
}
