//! Handlers for the `/auth` resource: OTP issue/verify, session
//! introspection, Google OAuth, logout, and user lookup.

use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Redirect, Response};
use axum::Json;
use axum_extra::extract::cookie::CookieJar;
use chrono::{Duration, NaiveDate, Utc};
use notable_core::error::CoreError;
use notable_core::otp::{generate_otp, OTP_EXPIRY_MINS};
use notable_core::types::DbId;
use notable_core::validation::{validate_email, validate_mode, MODE_SIGNUP};
use notable_db::models::user::{CreateUser, User, UserResponse};
use notable_db::repositories::UserRepo;
use serde::{Deserialize, Serialize};

use crate::auth::cookie::{removal_cookie, session_cookie, SESSION_COOKIE};
use crate::auth::jwt::{generate_token, validate_token};
use crate::error::{AppError, AppResult};
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// Request body for `POST /auth/send-otp`.
#[derive(Debug, Deserialize)]
pub struct SendOtpRequest {
    pub email: String,
    /// `"signin"` or `"signup"`.
    pub mode: String,
    /// Required for signup.
    pub name: Option<String>,
    /// Required for signup; `YYYY-MM-DD`.
    pub dob: Option<String>,
}

/// Request body for `POST /auth/verify-otp`.
#[derive(Debug, Deserialize)]
pub struct VerifyOtpRequest {
    pub email: String,
    pub otp: String,
}

/// Query parameters for `GET /auth/find-user`.
#[derive(Debug, Deserialize)]
pub struct FindUserParams {
    pub email: Option<String>,
    pub id: Option<DbId>,
}

/// Query parameters Google appends to the callback redirect.
#[derive(Debug, Deserialize)]
pub struct OauthCallbackParams {
    pub code: Option<String>,
    pub state: Option<String>,
}

/// Plain confirmation response.
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

/// Successful authentication response returned by verify-otp.
#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub token: String,
    pub user: UserResponse,
    pub message: String,
}

/// Response for `GET /auth/is-loggedin`.
#[derive(Debug, Serialize)]
pub struct IsLoggedInResponse {
    #[serde(rename = "isLoggedIn")]
    pub is_logged_in: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user: Option<UserResponse>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// `{ user }` envelope for user lookups.
#[derive(Debug, Serialize)]
pub struct UserEnvelope {
    pub user: UserResponse,
}

// ---------------------------------------------------------------------------
// OTP flow
// ---------------------------------------------------------------------------

/// POST /api/auth/send-otp
///
/// Issue a one-time sign-in code. For `signin` the user must already exist;
/// for `signup` the user must not exist and is created here. The code is
/// stored with a 5-minute expiry and mailed to the address.
pub async fn send_otp(
    State(state): State<AppState>,
    Json(input): Json<SendOtpRequest>,
) -> AppResult<Json<MessageResponse>> {
    validate_mode(&input.mode).map_err(AppError::BadRequest)?;
    validate_email(&input.email).map_err(AppError::BadRequest)?;

    let existing = UserRepo::find_by_email(&state.pool, &input.email).await?;

    let user = if input.mode == MODE_SIGNUP {
        if existing.is_some() {
            return Err(AppError::Core(CoreError::Conflict(
                "User already exists. Please sign in instead.".into(),
            )));
        }

        let (name, dob) = match (&input.name, &input.dob) {
            (Some(name), Some(dob)) if !name.trim().is_empty() => (name.clone(), dob),
            _ => {
                return Err(AppError::BadRequest(
                    "Name and date of birth are required for signup".into(),
                ))
            }
        };
        let dob = NaiveDate::parse_from_str(dob, "%Y-%m-%d")
            .map_err(|_| AppError::BadRequest("dob must be a valid YYYY-MM-DD date".into()))?;

        UserRepo::create(
            &state.pool,
            &CreateUser {
                email: input.email.clone(),
                name,
                dob: Some(dob),
                is_oauth: false,
            },
        )
        .await?
    } else {
        existing.ok_or_else(|| {
            AppError::Core(CoreError::NotFound(
                "User not found. Please sign up first.".into(),
            ))
        })?
    };

    let code = generate_otp();
    let expires_at = Utc::now() + Duration::minutes(OTP_EXPIRY_MINS);
    UserRepo::set_otp(&state.pool, user.id, &code, expires_at).await?;

    dispatch_otp(&state, &user.email, &code).await?;

    tracing::info!(user_id = user.id, mode = %input.mode, "OTP issued");

    Ok(Json(MessageResponse {
        message: format!("OTP sent successfully for {}", input.mode),
    }))
}

/// POST /api/auth/verify-otp
///
/// Verify a one-time code. Consumption is atomic and single-use; success
/// issues the session token and sets the session cookie.
pub async fn verify_otp(
    State(state): State<AppState>,
    jar: CookieJar,
    Json(input): Json<VerifyOtpRequest>,
) -> AppResult<(CookieJar, Json<AuthResponse>)> {
    validate_email(&input.email).map_err(AppError::BadRequest)?;
    if input.otp.trim().is_empty() {
        return Err(AppError::BadRequest("OTP is required".into()));
    }

    let user = UserRepo::consume_otp(&state.pool, &input.email, &input.otp)
        .await?
        .ok_or_else(|| {
            AppError::Core(CoreError::Unauthorized("Invalid or expired OTP".into()))
        })?;

    let (token, jar) = establish_session(&state, jar, &user)?;

    tracing::info!(user_id = user.id, "OTP verified, session established");

    Ok((
        jar,
        Json(AuthResponse {
            token,
            user: user.into(),
            message: "Authentication successful".to_string(),
        }),
    ))
}

// ---------------------------------------------------------------------------
// Session introspection
// ---------------------------------------------------------------------------

/// GET /api/auth/is-loggedin
///
/// Report whether the request carries a valid session, re-fetching the user
/// row ("who am I"). An invalid token, or a valid token whose user no longer
/// exists, clears the cookie alongside the 401.
pub async fn is_logged_in(
    State(state): State<AppState>,
    jar: CookieJar,
) -> AppResult<Response> {
    let Some(token) = jar.get(SESSION_COOKIE).map(|c| c.value().to_string()) else {
        return Ok(logged_out_response(
            jar,
            false,
            "No authentication token found",
        ));
    };

    let Ok(claims) = validate_token(&token, &state.config.jwt) else {
        return Ok(logged_out_response(jar, true, "Invalid or expired token"));
    };

    let Some(user) = UserRepo::find_by_id(&state.pool, claims.sub).await? else {
        return Ok(logged_out_response(jar, true, "User not found"));
    };

    Ok(Json(IsLoggedInResponse {
        is_logged_in: true,
        user: Some(user.into()),
        error: None,
    })
    .into_response())
}

/// POST /api/auth/logout
///
/// Clear the session cookie. The token itself stays valid until it expires
/// (no server-side revocation), so logout is purely client-side.
pub async fn logout(jar: CookieJar) -> (CookieJar, Json<MessageResponse>) {
    (
        jar.remove(removal_cookie()),
        Json(MessageResponse {
            message: "Logged out successfully".to_string(),
        }),
    )
}

// ---------------------------------------------------------------------------
// Google OAuth
// ---------------------------------------------------------------------------

/// GET /api/auth/google
///
/// Redirect the browser to Google's consent screen.
pub async fn google_login(State(state): State<AppState>) -> AppResult<Redirect> {
    let google = state.google.as_ref().ok_or_else(|| {
        AppError::InternalError("Google OAuth is not configured".to_string())
    })?;

    let url = google.authorize_url(&state.pool).await?;
    Ok(Redirect::temporary(&url))
}

/// GET /api/auth/google/callback
///
/// Exchange the provider redirect for a local user and session, then send
/// the browser back to the application URL.
pub async fn google_callback(
    State(state): State<AppState>,
    jar: CookieJar,
    Query(params): Query<OauthCallbackParams>,
) -> AppResult<(CookieJar, Redirect)> {
    let google = state.google.as_ref().ok_or_else(|| {
        AppError::InternalError("Google OAuth is not configured".to_string())
    })?;

    let (code, csrf_state) = match (&params.code, &params.state) {
        (Some(code), Some(csrf_state)) => (code, csrf_state),
        _ => {
            return Err(AppError::BadRequest(
                "Missing code or state in OAuth callback".into(),
            ))
        }
    };

    let identity = google.fetch_identity(&state.pool, code, csrf_state).await?;

    let user = match UserRepo::find_by_email(&state.pool, &identity.email).await? {
        Some(user) => user,
        None => {
            // First Google sign-in: provision a local account. No dob and no
            // OTP fields; the profile name falls back to the address's local
            // part when Google omits it.
            let name = identity.name.unwrap_or_else(|| {
                identity
                    .email
                    .split('@')
                    .next()
                    .unwrap_or_default()
                    .to_string()
            });
            UserRepo::create(
                &state.pool,
                &CreateUser {
                    email: identity.email.clone(),
                    name,
                    dob: None,
                    is_oauth: true,
                },
            )
            .await?
        }
    };

    let (_token, jar) = establish_session(&state, jar, &user)?;

    tracing::info!(user_id = user.id, "OAuth sign-in completed");

    Ok((jar, Redirect::temporary(&state.config.app_url)))
}

// ---------------------------------------------------------------------------
// User lookup
// ---------------------------------------------------------------------------

/// GET /api/auth/find-user?email=..|id=..
///
/// Look up a user by email or id. Requires at least one parameter.
pub async fn find_user(
    State(state): State<AppState>,
    Query(params): Query<FindUserParams>,
) -> AppResult<Json<UserEnvelope>> {
    let user = match (&params.email, params.id) {
        (Some(email), _) => UserRepo::find_by_email(&state.pool, email).await?,
        (None, Some(id)) => UserRepo::find_by_id(&state.pool, id).await?,
        (None, None) => {
            return Err(AppError::BadRequest(
                "Email or ID is required to find user".into(),
            ))
        }
    };

    let user = user.ok_or_else(|| {
        AppError::Core(CoreError::NotFound("User not found".into()))
    })?;

    Ok(Json(UserEnvelope { user: user.into() }))
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Mail the code to the user, or skip with a warning when SMTP is absent.
///
/// A configured transport that fails surfaces the error to the caller: the
/// client must not be told the code was sent when it wasn't.
async fn dispatch_otp(state: &AppState, email: &str, code: &str) -> AppResult<()> {
    match &state.mailer {
        Some(mailer) => mailer
            .send_otp(email, code)
            .await
            .map_err(|e| AppError::InternalError(format!("OTP email delivery failed: {e}"))),
        None => {
            tracing::warn!(email, "SMTP not configured; skipping OTP email dispatch");
            Ok(())
        }
    }
}

/// Issue a session token for `user` and add the session cookie to the jar.
fn establish_session(
    state: &AppState,
    jar: CookieJar,
    user: &User,
) -> AppResult<(String, CookieJar)> {
    let token = generate_token(user.id, &user.email, &state.config.jwt)
        .map_err(|e| AppError::InternalError(format!("Token generation error: {e}")))?;

    let jar = jar.add(session_cookie(token.clone(), state.config.jwt.expiry_hours));
    Ok((token, jar))
}

/// Build a 401 `is-loggedin` response, optionally clearing the cookie.
fn logged_out_response(jar: CookieJar, clear_cookie: bool, error: &str) -> Response {
    let jar = if clear_cookie {
        jar.remove(removal_cookie())
    } else {
        jar
    };

    (
        StatusCode::UNAUTHORIZED,
        jar,
        Json(IsLoggedInResponse {
            is_logged_in: false,
            user: None,
            error: Some(error.to_string()),
        }),
    )
        .into_response()
}
