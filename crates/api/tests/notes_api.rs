//! HTTP-level integration tests for notes CRUD: authentication gating,
//! validation, ordering, and cross-tenant invisibility.

mod common;

use axum::http::StatusCode;
use common::{body_json, delete_auth, get, get_auth, post_json_auth, put_json_auth};
use sqlx::PgPool;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Create a note through the API and return its id.
async fn create_note(pool: &PgPool, token: &str, title: &str, description: &str) -> i64 {
    let app = common::build_test_app(pool.clone());
    let body = serde_json::json!({ "title": title, "description": description });
    let response = post_json_auth(app, "/api/notes", body, token).await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let json = body_json(response).await;
    json["note"]["id"].as_i64().expect("created note must have an id")
}

// ---------------------------------------------------------------------------
// Authentication gating
// ---------------------------------------------------------------------------

/// Without a credential every notes route answers 401.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_notes_require_auth(pool: PgPool) {
    let app = common::build_test_app(pool.clone());
    let response = get(app, "/api/notes").await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let app = common::build_test_app(pool);
    let response = get(app, "/api/notes/1").await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

/// A tampered token is as good as none.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_notes_reject_tampered_token(pool: PgPool) {
    let (_user, token) = common::create_session(&pool, "victim@x.com").await;
    let mut tampered = token.clone();
    tampered.pop();
    tampered.push(if token.ends_with('A') { 'B' } else { 'A' });

    let app = common::build_test_app(pool);
    let response = get_auth(app, "/api/notes", &tampered).await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

/// A Bearer header works as a fallback credential carrier.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_notes_accept_bearer_fallback(pool: PgPool) {
    let (_user, token) = common::create_session(&pool, "bearer@x.com").await;

    let app = common::build_test_app(pool);
    let request = axum::http::Request::builder()
        .method("GET")
        .uri("/api/notes")
        .header("authorization", format!("Bearer {token}"))
        .body(axum::body::Body::empty())
        .expect("request should build");
    let response = tower::ServiceExt::oneshot(app, request)
        .await
        .expect("request should succeed");

    assert_eq!(response.status(), StatusCode::OK);
}

// ---------------------------------------------------------------------------
// Create + validation
// ---------------------------------------------------------------------------

/// Create returns 201 with the `{ note }` envelope.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_create_note(pool: PgPool) {
    let (user, token) = common::create_session(&pool, "writer@x.com").await;

    let app = common::build_test_app(pool);
    let body = serde_json::json!({ "title": "t", "description": "d" });
    let response = post_json_auth(app, "/api/notes", body, &token).await;

    assert_eq!(response.status(), StatusCode::CREATED);
    let json = body_json(response).await;
    assert_eq!(json["note"]["title"], "t");
    assert_eq!(json["note"]["description"], "d");
    assert_eq!(json["note"]["user_id"], user.id);
}

/// Empty or whitespace-only fields are rejected with 400.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_create_note_validates_fields(pool: PgPool) {
    let (_user, token) = common::create_session(&pool, "empty@x.com").await;

    let app = common::build_test_app(pool.clone());
    let body = serde_json::json!({ "title": "", "description": "d" });
    let response = post_json_auth(app, "/api/notes", body, &token).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let app = common::build_test_app(pool);
    let body = serde_json::json!({ "title": "t", "description": "   " });
    let response = post_json_auth(app, "/api/notes", body, &token).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

// ---------------------------------------------------------------------------
// List
// ---------------------------------------------------------------------------

/// The listing contains only the caller's notes, newest first.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_list_notes_newest_first(pool: PgPool) {
    let (_user, token) = common::create_session(&pool, "lister@x.com").await;
    let (_other, other_token) = common::create_session(&pool, "noise@x.com").await;

    create_note(&pool, &other_token, "someone else's", "noise").await;

    // Backdate by distinct offsets so the expected order is unambiguous.
    for (title, mins_ago) in [("oldest", 30), ("middle", 20), ("newest", 10)] {
        let id = create_note(&pool, &token, title, "body").await;
        sqlx::query("UPDATE notes SET created_at = NOW() - make_interval(mins => $2) WHERE id = $1")
            .bind(id)
            .bind(mins_ago)
            .execute(&pool)
            .await
            .expect("backdate should succeed");
    }

    let app = common::build_test_app(pool);
    let response = get_auth(app, "/api/notes", &token).await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    let titles: Vec<&str> = json["notes"]
        .as_array()
        .expect("notes must be an array")
        .iter()
        .map(|n| n["title"].as_str().expect("title must be a string"))
        .collect();
    assert_eq!(titles, ["newest", "middle", "oldest"]);
}

// ---------------------------------------------------------------------------
// Get / update / delete
// ---------------------------------------------------------------------------

/// Owner round-trip: get, update, delete.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_note_owner_roundtrip(pool: PgPool) {
    let (_user, token) = common::create_session(&pool, "owner@x.com").await;
    let id = create_note(&pool, &token, "draft", "first body").await;

    let app = common::build_test_app(pool.clone());
    let response = get_auth(app, &format!("/api/notes/{id}"), &token).await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["note"]["title"], "draft");

    let app = common::build_test_app(pool.clone());
    let body = serde_json::json!({ "title": "final", "description": "second body" });
    let response = put_json_auth(app, &format!("/api/notes/{id}"), body, &token).await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["note"]["title"], "final");
    assert_eq!(json["message"], "Note updated successfully");

    let app = common::build_test_app(pool.clone());
    let response = delete_auth(app, &format!("/api/notes/{id}"), &token).await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["message"], "Note deleted successfully");

    let app = common::build_test_app(pool);
    let response = get_auth(app, &format!("/api/notes/{id}"), &token).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

/// Update validates fields like create does.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_update_note_validates_fields(pool: PgPool) {
    let (_user, token) = common::create_session(&pool, "editor@x.com").await;
    let id = create_note(&pool, &token, "ok", "ok").await;

    let app = common::build_test_app(pool);
    let body = serde_json::json!({ "title": "", "description": "still here" });
    let response = put_json_auth(app, &format!("/api/notes/{id}"), body, &token).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

/// Operations on a nonexistent id return 404.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_note_missing_id_is_404(pool: PgPool) {
    let (_user, token) = common::create_session(&pool, "prober@x.com").await;

    let app = common::build_test_app(pool.clone());
    let response = get_auth(app, "/api/notes/999999", &token).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let app = common::build_test_app(pool);
    let response = delete_auth(app, "/api/notes/999999", &token).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

// ---------------------------------------------------------------------------
// Tenant isolation
// ---------------------------------------------------------------------------

/// Another user's note answers 404 on get, update, and delete, and stays
/// untouched.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_notes_invisible_across_users(pool: PgPool) {
    let (_alice, alice_token) = common::create_session(&pool, "alice@x.com").await;
    let (_bob, bob_token) = common::create_session(&pool, "bob@x.com").await;

    let id = create_note(&pool, &alice_token, "alice's note", "private").await;

    let app = common::build_test_app(pool.clone());
    let response = get_auth(app, &format!("/api/notes/{id}"), &bob_token).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let app = common::build_test_app(pool.clone());
    let body = serde_json::json!({ "title": "hijacked", "description": "hijacked" });
    let response = put_json_auth(app, &format!("/api/notes/{id}"), body, &bob_token).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let app = common::build_test_app(pool.clone());
    let response = delete_auth(app, &format!("/api/notes/{id}"), &bob_token).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    // Alice still sees her note, unmodified.
    let app = common::build_test_app(pool);
    let response = get_auth(app, &format!("/api/notes/{id}"), &alice_token).await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["note"]["title"], "alice's note");
}

// ---------------------------------------------------------------------------
// End-to-end scenario
// ---------------------------------------------------------------------------

/// The full journey: signup via OTP, create a note with the session cookie
/// from verify-otp, see it in the listing, and confirm a second account
/// cannot reach it.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_signup_to_note_scenario(pool: PgPool) {
    use common::post_json;
    use notable_db::repositories::UserRepo;

    // Signup and fetch the issued code from the store.
    let app = common::build_test_app(pool.clone());
    let body = serde_json::json!({
        "email": "journey@x.com",
        "mode": "signup",
        "name": "Journey",
        "dob": "2000-01-01"
    });
    let response = post_json(app, "/api/auth/send-otp", body).await;
    assert_eq!(response.status(), StatusCode::OK);

    let code = UserRepo::find_by_email(&pool, "journey@x.com")
        .await
        .expect("lookup should succeed")
        .expect("user should exist")
        .otp
        .expect("OTP must be stored");

    // Verify and take the token from the response body.
    let app = common::build_test_app(pool.clone());
    let body = serde_json::json!({ "email": "journey@x.com", "otp": code });
    let response = post_json(app, "/api/auth/verify-otp", body).await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["user"]["email"], "journey@x.com");
    let token = json["token"].as_str().expect("token must be a string").to_string();

    // Create a note with the fresh session.
    let id = create_note(&pool, &token, "t", "d").await;

    let app = common::build_test_app(pool.clone());
    let response = get_auth(app, "/api/notes", &token).await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["notes"][0]["id"], id);

    // A different authenticated user gets 404 for it.
    let (_other, other_token) = common::create_session(&pool, "outsider@x.com").await;
    let app = common::build_test_app(pool);
    let response = get_auth(app, &format!("/api/notes/{id}"), &other_token).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
