//! Google OAuth 2.0 authorization-code flow with PKCE.
//!
//! The flow converts a Google-verified identity into a local user record and
//! a session token:
//!
//! 1. [`GoogleOAuth::authorize_url`] builds an authorization URL requesting
//!    the `openid`, `email`, and `profile` scopes, generates a random PKCE
//!    challenge, and persists the CSRF state + verifier via
//!    [`OauthStateRepo`] with a 10-minute expiry.
//! 2. [`GoogleOAuth::fetch_identity`] (called by the callback route) consumes
//!    the stored state (validating CSRF and expiry in one query), exchanges
//!    the authorization code + verifier for an access token, and fetches the
//!    user's profile from the Google userinfo endpoint.
//!
//! User upsert and token issuance stay in the auth handlers.

use notable_db::repositories::OauthStateRepo;
use oauth2::basic::BasicClient;
use oauth2::{
    AuthUrl, AuthorizationCode, ClientId, ClientSecret, CsrfToken, EndpointNotSet, EndpointSet,
    PkceCodeChallenge, PkceCodeVerifier, RedirectUrl, Scope, TokenResponse, TokenUrl,
};
use serde::Deserialize;
use sqlx::PgPool;

use crate::error::{AppError, AppResult};

/// Google's OAuth 2.0 authorization endpoint.
const AUTH_ENDPOINT: &str = "https://accounts.google.com/o/oauth2/v2/auth";

/// Google's OAuth 2.0 token endpoint.
const TOKEN_ENDPOINT: &str = "https://oauth2.googleapis.com/token";

/// Google's userinfo endpoint (profile fetch).
const USERINFO_ENDPOINT: &str = "https://www.googleapis.com/oauth2/v2/userinfo";

/// Identity fields extracted from a verified Google profile.
#[derive(Debug)]
pub struct GoogleIdentity {
    pub email: String,
    pub name: Option<String>,
}

/// Google user info API response.
#[derive(Debug, Deserialize)]
struct GoogleUser {
    email: Option<String>,
    name: Option<String>,
}

/// OAuth client type with auth URL and token URL set.
type ConfiguredClient = oauth2::Client<
    oauth2::basic::BasicErrorResponse,
    oauth2::basic::BasicTokenResponse,
    oauth2::basic::BasicTokenIntrospectionResponse,
    oauth2::StandardRevocableToken,
    oauth2::basic::BasicRevocationErrorResponse,
    EndpointSet,
    EndpointNotSet,
    EndpointNotSet,
    EndpointNotSet,
    EndpointSet,
>;

/// Google OAuth provider configuration.
#[derive(Debug, Clone)]
pub struct GoogleOAuthConfig {
    pub client_id: ClientId,
    pub client_secret: ClientSecret,
    pub redirect_url: RedirectUrl,
}

impl GoogleOAuthConfig {
    /// Load configuration from environment variables.
    ///
    /// Returns `None` if `GOOGLE_CLIENT_ID` or `GOOGLE_CLIENT_SECRET` is not
    /// set, signalling that Google sign-in is not configured.
    ///
    /// | Variable               | Required | Default                                            |
    /// |------------------------|----------|----------------------------------------------------|
    /// | `GOOGLE_CLIENT_ID`     | yes      | --                                                 |
    /// | `GOOGLE_CLIENT_SECRET` | yes      | --                                                 |
    /// | `GOOGLE_REDIRECT_URL`  | no       | `http://localhost:3000/api/auth/google/callback`   |
    ///
    /// # Panics
    ///
    /// Panics if `GOOGLE_REDIRECT_URL` is set but is not a valid URL.
    pub fn from_env() -> Option<Self> {
        let client_id = std::env::var("GOOGLE_CLIENT_ID").ok()?;
        let client_secret = std::env::var("GOOGLE_CLIENT_SECRET").ok()?;
        let redirect_uri = std::env::var("GOOGLE_REDIRECT_URL")
            .unwrap_or_else(|_| "http://localhost:3000/api/auth/google/callback".to_string());

        let redirect_url = RedirectUrl::new(redirect_uri)
            .expect("GOOGLE_REDIRECT_URL must be a valid URL");

        Some(Self {
            client_id: ClientId::new(client_id),
            client_secret: ClientSecret::new(client_secret),
            redirect_url,
        })
    }
}

/// Google OAuth handler.
pub struct GoogleOAuth {
    config: GoogleOAuthConfig,
}

impl GoogleOAuth {
    /// Create a new Google OAuth handler.
    pub fn new(config: GoogleOAuthConfig) -> Self {
        Self { config }
    }

    fn create_client(&self) -> ConfiguredClient {
        let auth_url =
            AuthUrl::new(AUTH_ENDPOINT.to_string()).expect("static auth endpoint is a valid URL");
        let token_url = TokenUrl::new(TOKEN_ENDPOINT.to_string())
            .expect("static token endpoint is a valid URL");

        BasicClient::new(self.config.client_id.clone())
            .set_client_secret(self.config.client_secret.clone())
            .set_auth_uri(auth_url)
            .set_token_uri(token_url)
            .set_redirect_uri(self.config.redirect_url.clone())
    }

    /// Generate the authorization URL, persisting CSRF state and PKCE verifier.
    pub async fn authorize_url(&self, pool: &PgPool) -> AppResult<String> {
        let client = self.create_client();
        let (pkce_challenge, pkce_verifier) = PkceCodeChallenge::new_random_sha256();

        let (auth_url, csrf_state) = client
            .authorize_url(CsrfToken::new_random)
            .add_scope(Scope::new("openid".to_string()))
            .add_scope(Scope::new("email".to_string()))
            .add_scope(Scope::new("profile".to_string()))
            .set_pkce_challenge(pkce_challenge)
            .url();

        OauthStateRepo::create(pool, csrf_state.secret(), pkce_verifier.secret()).await?;

        Ok(auth_url.to_string())
    }

    /// Exchange the callback's code + state for a verified Google identity.
    pub async fn fetch_identity(
        &self,
        pool: &PgPool,
        code: &str,
        state: &str,
    ) -> AppResult<GoogleIdentity> {
        let pkce_verifier = OauthStateRepo::consume(pool, state)
            .await?
            .ok_or_else(|| AppError::BadRequest("Invalid or expired OAuth state".to_string()))?;

        // The token exchange client must not follow redirects.
        let http_client = reqwest::ClientBuilder::new()
            .redirect(reqwest::redirect::Policy::none())
            .build()
            .map_err(|e| AppError::InternalError(format!("HTTP client build error: {e}")))?;

        let client = self.create_client();

        let token_result = client
            .exchange_code(AuthorizationCode::new(code.to_string()))
            .set_pkce_verifier(PkceCodeVerifier::new(pkce_verifier))
            .request_async(&http_client)
            .await
            .map_err(|e| AppError::InternalError(format!("Token exchange failed: {e}")))?;

        let access_token = token_result.access_token().secret();

        let google_user: GoogleUser = http_client
            .get(USERINFO_ENDPOINT)
            .bearer_auth(access_token)
            .send()
            .await
            .map_err(|e| AppError::InternalError(format!("Userinfo request failed: {e}")))?
            .json()
            .await
            .map_err(|e| AppError::InternalError(format!("Userinfo decode failed: {e}")))?;

        let email = google_user.email.ok_or_else(|| {
            AppError::BadRequest("Google profile did not include an email address".to_string())
        })?;

        Ok(GoogleIdentity {
            email,
            name: google_user.name,
        })
    }
}
