use std::sync::Arc;

use notable_mailer::OtpMailer;

use crate::auth::google::GoogleOAuth;
use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc` or is already `Clone`).
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: notable_db::DbPool,
    /// Server configuration.
    pub config: Arc<ServerConfig>,
    /// SMTP mailer for one-time codes. `None` when SMTP is not configured;
    /// issuance then skips delivery instead of failing.
    pub mailer: Option<Arc<OtpMailer>>,
    /// Google OAuth client. `None` when the provider is not configured;
    /// the /auth/google routes then report a configuration error.
    pub google: Option<Arc<GoogleOAuth>>,
}
