use std::sync::Arc;

use sqlx::PgPool;

use crate::account::{LoggingSignupListener, SignupListener};
use crate::store::{PgStore, Store};

/// Shared application state: the persistence seam and the signup listener.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn Store>,
    pub signups: Arc<dyn SignupListener>,
}

impl AppState {
    pub fn new(pool: PgPool) -> Self {
        Self {
            store: Arc::new(PgStore::new(pool)),
            signups: Arc::new(LoggingSignupListener),
        }
    }
}
