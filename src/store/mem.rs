//! In-memory [`Store`] used by unit tests of the lifecycle operations.

use std::collections::{HashMap, HashSet};
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::account::PartialSignup;
use crate::models::{Event, Game, User};
use crate::store::Store;
use crate::utils::error::AppError;

#[derive(Default)]
struct Inner {
    users: Vec<User>,
    events: Vec<Event>,
    games: Vec<Game>,
    participants: HashSet<(Uuid, Uuid)>,
    sessions: HashMap<String, Uuid>,
    partials: HashMap<String, PartialSignup>,
}

#[derive(Default)]
pub struct MemStore {
    inner: Mutex<Inner>,
}

impl MemStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_users(users: Vec<User>) -> Self {
        let store = Self::new();
        store.inner.lock().unwrap().users = users;
        store
    }

    pub fn event_count(&self) -> usize {
        self.inner.lock().unwrap().events.len()
    }

    pub fn participant_count(&self, event_id: Uuid) -> usize {
        self.inner
            .lock()
            .unwrap()
            .participants
            .iter()
            .filter(|(e, _)| *e == event_id)
            .count()
    }

    pub fn game_count(&self, event_id: Uuid) -> usize {
        self.inner
            .lock()
            .unwrap()
            .games
            .iter()
            .filter(|g| g.event_id == event_id)
            .count()
    }

    pub fn has_partial(&self, token: &str) -> bool {
        self.inner.lock().unwrap().partials.contains_key(token)
    }
}

#[async_trait]
impl Store for MemStore {
    async fn user_by_id(&self, id: Uuid) -> Result<Option<User>, AppError> {
        Ok(self
            .inner
            .lock()
            .unwrap()
            .users
            .iter()
            .find(|u| u.id == id)
            .cloned())
    }

    async fn user_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        Ok(self
            .inner
            .lock()
            .unwrap()
            .users
            .iter()
            .find(|u| u.email == email)
            .cloned())
    }

    async fn insert_user(&self, user: &User) -> Result<(), AppError> {
        self.inner.lock().unwrap().users.push(user.clone());
        Ok(())
    }

    async fn event_by_id(&self, id: Uuid) -> Result<Option<Event>, AppError> {
        Ok(self
            .inner
            .lock()
            .unwrap()
            .events
            .iter()
            .find(|e| e.id == id)
            .cloned())
    }

    async fn events_between(
        &self,
        from: DateTime<Utc>,
        until: DateTime<Utc>,
    ) -> Result<Vec<Event>, AppError> {
        let mut events: Vec<Event> = self
            .inner
            .lock()
            .unwrap()
            .events
            .iter()
            .filter(|e| e.date >= from && e.date < until)
            .cloned()
            .collect();
        events.sort_by_key(|e| e.date);
        Ok(events)
    }

    async fn insert_event(&self, event: &Event, games: &[Game]) -> Result<(), AppError> {
        let mut inner = self.inner.lock().unwrap();
        inner.events.push(event.clone());
        inner.games.extend(games.iter().cloned());
        Ok(())
    }

    async fn update_event(&self, event: &Event) -> Result<(), AppError> {
        let mut inner = self.inner.lock().unwrap();
        if let Some(existing) = inner.events.iter_mut().find(|e| e.id == event.id) {
            *existing = event.clone();
        }
        Ok(())
    }

    async fn delete_event(&self, id: Uuid) -> Result<(), AppError> {
        let mut inner = self.inner.lock().unwrap();
        inner.events.retain(|e| e.id != id);
        inner.games.retain(|g| g.event_id != id);
        inner.participants.retain(|(e, _)| *e != id);
        Ok(())
    }

    async fn games_of(&self, event_id: Uuid) -> Result<Vec<Game>, AppError> {
        Ok(self
            .inner
            .lock()
            .unwrap()
            .games
            .iter()
            .filter(|g| g.event_id == event_id)
            .cloned()
            .collect())
    }

    async fn participants_of(&self, event_id: Uuid) -> Result<Vec<User>, AppError> {
        let inner = self.inner.lock().unwrap();
        Ok(inner
            .users
            .iter()
            .filter(|u| inner.participants.contains(&(event_id, u.id)))
            .cloned()
            .collect())
    }

    async fn add_participant(&self, event_id: Uuid, user_id: Uuid) -> Result<(), AppError> {
        self.inner
            .lock()
            .unwrap()
            .participants
            .insert((event_id, user_id));
        Ok(())
    }

    async fn remove_participant(&self, event_id: Uuid, user_id: Uuid) -> Result<(), AppError> {
        self.inner
            .lock()
            .unwrap()
            .participants
            .remove(&(event_id, user_id));
        Ok(())
    }

    async fn user_for_session(&self, token: &str) -> Result<Option<User>, AppError> {
        let inner = self.inner.lock().unwrap();
        let Some(user_id) = inner.sessions.get(token) else {
            return Ok(None);
        };
        Ok(inner.users.iter().find(|u| u.id == *user_id).cloned())
    }

    async fn insert_session(
        &self,
        token: &str,
        user_id: Uuid,
        _now: DateTime<Utc>,
    ) -> Result<(), AppError> {
        self.inner
            .lock()
            .unwrap()
            .sessions
            .insert(token.to_string(), user_id);
        Ok(())
    }

    async fn delete_session(&self, token: &str) -> Result<(), AppError> {
        self.inner.lock().unwrap().sessions.remove(token);
        Ok(())
    }

    async fn insert_partial_signup(&self, partial: &PartialSignup) -> Result<(), AppError> {
        self.inner
            .lock()
            .unwrap()
            .partials
            .insert(partial.token.clone(), partial.clone());
        Ok(())
    }

    async fn partial_signup(&self, token: &str) -> Result<Option<PartialSignup>, AppError> {
        Ok(self.inner.lock().unwrap().partials.get(token).cloned())
    }

    async fn delete_partial_signup(&self, token: &str) -> Result<(), AppError> {
        self.inner.lock().unwrap().partials.remove(token);
        Ok(())
    }
}
