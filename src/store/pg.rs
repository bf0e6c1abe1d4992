use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::account::PartialSignup;
use crate::models::{Event, Game, User};
use crate::store::Store;
use crate::utils::error::AppError;

#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl Store for PgStore {
    async fn user_by_id(&self, id: Uuid) -> Result<Option<User>, AppError> {
        let user = sqlx::query_as::<_, User>(
            "SELECT id, username, email, first_name, last_name, created_at \
             FROM users WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(user)
    }

    async fn user_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        let user = sqlx::query_as::<_, User>(
            "SELECT id, username, email, first_name, last_name, created_at \
             FROM users WHERE email = $1",
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;
        Ok(user)
    }

    async fn insert_user(&self, user: &User) -> Result<(), AppError> {
        sqlx::query(
            "INSERT INTO users (id, username, email, first_name, last_name, created_at) \
             VALUES ($1, $2, $3, $4, $5, $6)",
        )
        .bind(user.id)
        .bind(&user.username)
        .bind(&user.email)
        .bind(&user.first_name)
        .bind(&user.last_name)
        .bind(user.created_at)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn event_by_id(&self, id: Uuid) -> Result<Option<Event>, AppError> {
        let event = sqlx::query_as::<_, Event>(
            "SELECT id, date, length_minutes, host_id, added, added_by \
             FROM events WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(event)
    }

    async fn events_between(
        &self,
        from: DateTime<Utc>,
        until: DateTime<Utc>,
    ) -> Result<Vec<Event>, AppError> {
        let events = sqlx::query_as::<_, Event>(
            "SELECT id, date, length_minutes, host_id, added, added_by \
             FROM events WHERE date >= $1 AND date < $2 ORDER BY date ASC",
        )
        .bind(from)
        .bind(until)
        .fetch_all(&self.pool)
        .await?;
        Ok(events)
    }

    async fn insert_event(&self, event: &Event, games: &[Game]) -> Result<(), AppError> {
        let mut tx = self.pool.begin().await?;

        sqlx::query(
            "INSERT INTO events (id, date, length_minutes, host_id, added, added_by) \
             VALUES ($1, $2, $3, $4, $5, $6)",
        )
        .bind(event.id)
        .bind(event.date)
        .bind(event.length_minutes)
        .bind(event.host_id)
        .bind(event.added)
        .bind(event.added_by)
        .execute(&mut *tx)
        .await?;

        for game in games {
            sqlx::query("INSERT INTO games (id, event_id, name) VALUES ($1, $2, $3)")
                .bind(game.id)
                .bind(game.event_id)
                .bind(&game.name)
                .execute(&mut *tx)
                .await?;
        }

        tx.commit().await?;
        Ok(())
    }

    async fn update_event(&self, event: &Event) -> Result<(), AppError> {
        sqlx::query(
            "UPDATE events SET date = $2, length_minutes = $3, host_id = $4 WHERE id = $1",
        )
        .bind(event.id)
        .bind(event.date)
        .bind(event.length_minutes)
        .bind(event.host_id)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn delete_event(&self, id: Uuid) -> Result<(), AppError> {
        // Games and participations go with the event via ON DELETE CASCADE
        sqlx::query("DELETE FROM events WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn games_of(&self, event_id: Uuid) -> Result<Vec<Game>, AppError> {
        let games = sqlx::query_as::<_, Game>(
            "SELECT id, event_id, name FROM games WHERE event_id = $1 ORDER BY name ASC",
        )
        .bind(event_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(games)
    }

    async fn participants_of(&self, event_id: Uuid) -> Result<Vec<User>, AppError> {
        let users = sqlx::query_as::<_, User>(
            "SELECT u.id, u.username, u.email, u.first_name, u.last_name, u.created_at \
             FROM users u \
             JOIN event_participants p ON p.user_id = u.id \
             WHERE p.event_id = $1 ORDER BY u.username ASC",
        )
        .bind(event_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(users)
    }

    async fn add_participant(&self, event_id: Uuid, user_id: Uuid) -> Result<(), AppError> {
        sqlx::query(
            "INSERT INTO event_participants (event_id, user_id) VALUES ($1, $2) \
             ON CONFLICT DO NOTHING",
        )
        .bind(event_id)
        .bind(user_id)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn remove_participant(&self, event_id: Uuid, user_id: Uuid) -> Result<(), AppError> {
        sqlx::query("DELETE FROM event_participants WHERE event_id = $1 AND user_id = $2")
            .bind(event_id)
            .bind(user_id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn user_for_session(&self, token: &str) -> Result<Option<User>, AppError> {
        let user = sqlx::query_as::<_, User>(
            "SELECT u.id, u.username, u.email, u.first_name, u.last_name, u.created_at \
             FROM users u JOIN sessions s ON s.user_id = u.id WHERE s.token = $1",
        )
        .bind(token)
        .fetch_optional(&self.pool)
        .await?;
        Ok(user)
    }

    async fn insert_session(
        &self,
        token: &str,
        user_id: Uuid,
        now: DateTime<Utc>,
    ) -> Result<(), AppError> {
        sqlx::query("INSERT INTO sessions (token, user_id, created_at) VALUES ($1, $2, $3)")
            .bind(token)
            .bind(user_id)
            .bind(now)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn delete_session(&self, token: &str) -> Result<(), AppError> {
        sqlx::query("DELETE FROM sessions WHERE token = $1")
            .bind(token)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn insert_partial_signup(&self, partial: &PartialSignup) -> Result<(), AppError> {
        sqlx::query(
            "INSERT INTO partial_signups (token, verified_email, backend, created_at) \
             VALUES ($1, $2, $3, $4)",
        )
        .bind(&partial.token)
        .bind(&partial.verified_email)
        .bind(&partial.backend)
        .bind(partial.created_at)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn partial_signup(&self, token: &str) -> Result<Option<PartialSignup>, AppError> {
        let partial = sqlx::query_as::<_, PartialSignup>(
            "SELECT token, verified_email, backend, created_at \
             FROM partial_signups WHERE token = $1",
        )
        .bind(token)
        .fetch_optional(&self.pool)
        .await?;
        Ok(partial)
    }

    async fn delete_partial_signup(&self, token: &str) -> Result<(), AppError> {
        sqlx::query("DELETE FROM partial_signups WHERE token = $1")
            .bind(token)
            .execute(&self.pool)
            .await?;
        Ok(())
    }
}
