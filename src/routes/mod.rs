use axum::routing::{get, post};
use axum::Router;
use tower_http::trace::TraceLayer;

use crate::config::{create_cors_layer, create_security_headers_layer};
use crate::handlers::{account, calendar, events, health_check};
use crate::state::AppState;

pub fn create_routes(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_check))
        // Calendar
        .route("/calendar", get(calendar::month_index))
        .route("/calendar/:year/:month", get(calendar::month))
        .route("/calendar/:year/week/:week", get(calendar::week))
        .route("/calendar/:year/:month/:day", get(calendar::day))
        // Events
        .route("/event/add", get(events::add_index).post(events::create))
        .route("/event/add/:year/:month", get(events::add_for_month))
        .route("/event/add/:year/:month/:day", get(events::add_for_day))
        .route(
            "/event/add/:year/:month/:day/:hour/:minute",
            get(events::add_for_time),
        )
        .route("/event/add/:year/week/:week", get(events::add_for_week))
        .route("/event/:id", get(events::show))
        .route("/event/:id/update", post(events::update))
        .route("/event/:id/delete", post(events::delete))
        .route("/event/:id/participate", post(events::participate))
        .route("/event/:id/leave", post(events::leave))
        // Account
        .route("/auth/complete", post(account::complete))
        .route("/account/login", get(account::login_options))
        .route("/account/signup", get(account::signup_options))
        .route(
            "/account/signup/:token",
            get(account::signup_form).post(account::submit_signup),
        )
        .route("/account/logout", post(account::logout))
        .layer(TraceLayer::new_for_http())
        .layer(create_security_headers_layer())
        .layer(create_cors_layer())
        .with_state(state)
}
