pub mod auth;
pub mod health;
pub mod notes;

use axum::Router;

use crate::state::AppState;

/// Build the `/api` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /auth/send-otp           issue a one-time code (public)
/// /auth/verify-otp         verify code, establish session (public)
/// /auth/is-loggedin        session introspection (cookie)
/// /auth/google             redirect to Google consent (public)
/// /auth/google/callback    provider redirect target (public)
/// /auth/logout             clear session cookie (public)
/// /auth/find-user          lookup by email or id (public)
///
/// /notes                   list, create (cookie)
/// /notes/{id}              get, update, delete (cookie)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/auth", auth::router())
        .nest("/notes", notes::router())
}
