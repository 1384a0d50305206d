//! Route definitions for the `/auth` resource.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::auth;
use crate::state::AppState;

/// Routes mounted at `/auth`.
///
/// ```text
/// POST /send-otp          -> send_otp
/// POST /verify-otp        -> verify_otp
/// GET  /is-loggedin       -> is_logged_in
/// GET  /find-user         -> find_user
/// GET  /google            -> google_login
/// GET  /google/callback   -> google_callback
/// POST /logout            -> logout
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/send-otp", post(auth::send_otp))
        .route("/verify-otp", post(auth::verify_otp))
        .route("/is-loggedin", get(auth::is_logged_in))
        .route("/find-user", get(auth::find_user))
        .route("/google", get(auth::google_login))
        .route("/google/callback", get(auth::google_callback))
        .route("/logout", post(auth::logout))
}
