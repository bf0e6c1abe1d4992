//! Pure permission predicates over (event, actor, clock). Enforcement is the
//! caller's job; these only answer yes or no.

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::models::event::Event;

/// Anyone authenticated may create events.
pub fn can_create(actor: Option<Uuid>) -> bool {
    actor.is_some()
}

/// The creator and the host may change an event until it is archived.
pub fn can_change(event: Option<&Event>, actor: Option<Uuid>, now: DateTime<Utc>) -> bool {
    let Some(actor) = actor else {
        return false;
    };
    let Some(event) = event else {
        // No concrete event: an authenticated actor may enter the edit flow.
        return true;
    };
    if event.archived(now) {
        return false;
    }
    event.added_by == actor || event.host_id == actor
}

/// Delete permission is identical to change permission.
pub fn can_delete(event: Option<&Event>, actor: Option<Uuid>, now: DateTime<Utc>) -> bool {
    can_change(event, actor, now)
}
