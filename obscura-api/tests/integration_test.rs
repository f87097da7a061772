/// Integration tests for the Obscura API
///
/// These drive the real router against the database from `DATABASE_URL`
/// and skip (with a notice) when no database is configured:
///
/// - register → login → /users/me end-to-end flow
/// - verifier middleware: 401 for missing/garbage/expired tokens, with no
///   handler side effects
/// - structured 400s naming the missing field, with no store write
/// - client CRUD round-trip
/// - quote update replacing the whole item collection
/// - the ADMIN gate on user management
/// - config-key conflicts, session photo sub-resource, health

mod common;

use axum::http::StatusCode;
use chrono::Duration;
use common::{send, TestContext, TEST_PASSWORD, TEST_SECRET};
use obscura_shared::auth::token::{create_token, Claims};
use serde_json::json;
use uuid::Uuid;

macro_rules! require_db {
    () => {
        match TestContext::new().await {
            Some(ctx) => ctx,
            None => {
                eprintln!("skipping integration test: DATABASE_URL not set or unreachable");
                return;
            }
        }
    };
}

#[tokio::test]
async fn test_health_is_public() {
    let ctx = require_db!();

    let (status, body) = send(&ctx.app, "GET", "/health", None, None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert!(body["timestamp"].is_string());

    ctx.cleanup().await;
}

#[tokio::test]
async fn test_register_login_me_flow() {
    let ctx = require_db!();
    let email = format!("a-{}@x.com", Uuid::new_v4());

    // Register answers 201 with a token
    let (status, body) = send(
        &ctx.app,
        "POST",
        "/auth/register",
        None,
        Some(json!({ "name": "A", "email": email.as_str(), "password": "abcdef" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert!(body["token"].is_string());

    // Login with the same credentials answers 200 with a token
    let (status, body) = send(
        &ctx.app,
        "POST",
        "/auth/login",
        None,
        Some(json!({ "email": email.as_str(), "password": "abcdef" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let token = body["token"].as_str().expect("login should return a token").to_string();

    // /users/me with that token returns the registered account, role USER
    let (status, body) = send(&ctx.app, "GET", "/users/me", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["name"], "A");
    assert_eq!(body["email"], email.as_str());
    assert_eq!(body["role"], "USER");

    // No password-equivalent field on any read path
    let raw = body.to_string();
    assert!(!raw.contains("password"));
    assert!(!raw.contains("argon2"));

    // Wrong password: generic 401
    let (status, body) = send(
        &ctx.app,
        "POST",
        "/auth/login",
        None,
        Some(json!({ "email": email.as_str(), "password": "wrong!" })),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["message"], "Credenciais inválidas");

    // Unknown email: same generic 401
    let (status, body) = send(
        &ctx.app,
        "POST",
        "/auth/login",
        None,
        Some(json!({ "email": "nobody@x.com", "password": "abcdef" })),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["message"], "Credenciais inválidas");

    ctx.cleanup().await;
}

#[tokio::test]
async fn test_duplicate_email_conflicts() {
    let ctx = require_db!();

    let (status, _) = send(
        &ctx.app,
        "POST",
        "/auth/register",
        None,
        Some(json!({
            "name": "Dup",
            "email": ctx.user.email.as_str(),
            "password": "abcdef"
        })),
    )
    .await;

    assert_eq!(status, StatusCode::CONFLICT);

    ctx.cleanup().await;
}

#[tokio::test]
async fn test_protected_routes_reject_bad_tokens() {
    let ctx = require_db!();
    let marker = format!("Cliente {}", Uuid::new_v4());

    // Missing token
    let (status, _) = send(&ctx.app, "GET", "/clients", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    // Garbage token
    let (status, _) = send(&ctx.app, "GET", "/clients", Some("not.a.token"), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    // Wrong signature
    let forged = create_token(&Claims::new(ctx.user.id), "another-secret-32-bytes-long....")
        .expect("token should mint");
    let (status, _) = send(&ctx.app, "GET", "/clients", Some(&forged), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    // Expired token
    let expired = create_token(
        &Claims::with_expiration(ctx.user.id, Duration::seconds(-3600)),
        TEST_SECRET,
    )
    .expect("token should mint");
    let (status, _) = send(&ctx.app, "GET", "/clients", Some(&expired), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    // A rejected mutation must not reach the handler: the row is absent
    let (status, _) = send(
        &ctx.app,
        "POST",
        "/clients",
        Some(&expired),
        Some(json!({ "name": marker.as_str() })),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (_, clients) = send(&ctx.app, "GET", "/clients", Some(&ctx.user_token), None).await;
    let names: Vec<_> = clients
        .as_array()
        .expect("list should be an array")
        .iter()
        .map(|c| c["name"].as_str().unwrap_or_default().to_string())
        .collect();
    assert!(!names.contains(&marker));

    ctx.cleanup().await;
}

#[tokio::test]
async fn test_missing_required_field_is_structured_400() {
    let ctx = require_db!();

    let before: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM clients")
        .fetch_one(&ctx.db)
        .await
        .expect("count should run");

    let (status, body) = send(
        &ctx.app,
        "POST",
        "/clients",
        Some(&ctx.user_token),
        Some(json!({ "email": "c@x.com" })),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    let details = body["details"].as_array().expect("details should be present");
    assert!(details.iter().any(|d| d["field"] == "name"));

    // Idempotent no-op on failure
    let after: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM clients")
        .fetch_one(&ctx.db)
        .await
        .expect("count should run");
    assert_eq!(before, after);

    ctx.cleanup().await;
}

#[tokio::test]
async fn test_client_crud_roundtrip() {
    let ctx = require_db!();
    let token = Some(ctx.user_token.as_str());
    let name = format!("Maria {}", Uuid::new_v4());

    // Create: response is a superset of the payload plus id/timestamps
    let (status, created) = send(
        &ctx.app,
        "POST",
        "/clients",
        token,
        Some(json!({
            "name": name.as_str(),
            "email": "maria@x.com",
            "phone": "11 99999-0000"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["name"], name.as_str());
    assert_eq!(created["email"], "maria@x.com");
    assert!(created["id"].is_string());
    assert!(created["created_at"].is_string());

    let id = created["id"].as_str().expect("id should be a string");

    // Fetch returns the same record
    let (status, fetched) = send(&ctx.app, "GET", &format!("/clients/{}", id), token, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched["name"], name.as_str());
    assert_eq!(fetched["phone"], "11 99999-0000");

    // Full-replace update drops the fields the new body omits
    let (status, updated) = send(
        &ctx.app,
        "PUT",
        &format!("/clients/{}", id),
        token,
        Some(json!({ "name": name.as_str(), "address": "Rua das Flores, 1" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["address"], "Rua das Flores, 1");
    assert!(updated["email"].is_null());

    // Delete, then 404
    let (status, _) = send(&ctx.app, "DELETE", &format!("/clients/{}", id), token, None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, _) = send(&ctx.app, "GET", &format!("/clients/{}", id), token, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    ctx.cleanup().await;
}

#[tokio::test]
async fn test_quote_update_replaces_items() {
    let ctx = require_db!();
    let token = Some(ctx.user_token.as_str());

    let (_, client) = send(
        &ctx.app,
        "POST",
        "/clients",
        token,
        Some(json!({ "name": format!("Quote Client {}", Uuid::new_v4()) })),
    )
    .await;
    let client_id = client["id"].as_str().expect("client id").to_string();

    // Quote with items A and B
    let (status, quote) = send(
        &ctx.app,
        "POST",
        "/quotes",
        token,
        Some(json!({
            "client_id": client_id.as_str(),
            "title": "Ensaio de casamento",
            "valid_until": "2026-12-31T00:00:00Z",
            "status": "DRAFT",
            "total": 300.0,
            "items": [
                { "description": "A", "quantity": 1, "unit_price": 100.0 },
                { "description": "B", "quantity": 2, "unit_price": 100.0 }
            ]
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let quote_id = quote["id"].as_str().expect("quote id").to_string();

    let old_ids: Vec<String> = quote["items"]
        .as_array()
        .expect("items array")
        .iter()
        .map(|i| i["id"].as_str().expect("item id").to_string())
        .collect();
    assert_eq!(old_ids.len(), 2);

    // Item totals are computed server-side
    assert_eq!(quote["items"][1]["total"], 200.0);

    // Update with a single item C: A and B must be gone
    let (status, updated) = send(
        &ctx.app,
        "PUT",
        &format!("/quotes/{}", quote_id),
        token,
        Some(json!({
            "client_id": client_id.as_str(),
            "title": "Ensaio de casamento",
            "valid_until": "2026-12-31T00:00:00Z",
            "status": "SENT",
            "total": 150.0,
            "items": [
                { "description": "C", "quantity": 1, "unit_price": 150.0 }
            ]
        })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let items = updated["items"].as_array().expect("items array");
    assert_eq!(items.len(), 1);
    assert_eq!(items[0]["description"], "C");

    // The old rows no longer exist in the store
    let remaining: i64 =
        sqlx::query_scalar("SELECT COUNT(*) FROM quote_items WHERE quote_id = $1::uuid")
            .bind(&quote_id)
            .fetch_one(&ctx.db)
            .await
            .expect("count should run");
    assert_eq!(remaining, 1);

    for old_id in &old_ids {
        assert_ne!(items[0]["id"].as_str().expect("item id"), old_id);
    }

    // Cleanup: deleting the client cascades to the quote and its items
    let (status, _) = send(
        &ctx.app,
        "DELETE",
        &format!("/clients/{}", client_id),
        token,
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    ctx.cleanup().await;
}

#[tokio::test]
async fn test_user_management_requires_admin() {
    let ctx = require_db!();

    // Regular user: 403 on every management operation
    let (status, _) = send(&ctx.app, "GET", "/users", Some(&ctx.user_token), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = send(
        &ctx.app,
        "POST",
        "/users",
        Some(&ctx.user_token),
        Some(json!({
            "name": "Novo",
            "email": format!("novo-{}@test.com", Uuid::new_v4()),
            "password": "abcdef",
            "role": "PHOTOGRAPHER"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = send(
        &ctx.app,
        "PUT",
        &format!("/users/{}", ctx.admin.id),
        Some(&ctx.user_token),
        Some(json!({ "name": "Hacked" })),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = send(
        &ctx.app,
        "DELETE",
        &format!("/users/{}", ctx.admin.id),
        Some(&ctx.user_token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    // Admin: full flow works
    let (status, users) = send(&ctx.app, "GET", "/users", Some(&ctx.admin_token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(users.as_array().expect("users array").len() >= 2);

    let email = format!("photographer-{}@test.com", Uuid::new_v4());
    let (status, created) = send(
        &ctx.app,
        "POST",
        "/users",
        Some(&ctx.admin_token),
        Some(json!({
            "name": "Fotógrafo",
            "email": email,
            "password": "abcdef",
            "role": "PHOTOGRAPHER"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["role"], "PHOTOGRAPHER");

    let new_id = created["id"].as_str().expect("user id").to_string();

    let (status, updated) = send(
        &ctx.app,
        "PUT",
        &format!("/users/{}", new_id),
        Some(&ctx.admin_token),
        Some(json!({ "role": "USER" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["role"], "USER");

    let (status, _) = send(
        &ctx.app,
        "DELETE",
        &format!("/users/{}", new_id),
        Some(&ctx.admin_token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    ctx.cleanup().await;
}

#[tokio::test]
async fn test_profile_password_change_requires_current() {
    let ctx = require_db!();
    let token = Some(ctx.user_token.as_str());

    // Missing current password
    let (status, _) = send(
        &ctx.app,
        "PUT",
        "/users/profile",
        token,
        Some(json!({ "new_password": "newpass" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    // Wrong current password
    let (status, _) = send(
        &ctx.app,
        "PUT",
        "/users/profile",
        token,
        Some(json!({ "current_password": "nope!!", "new_password": "newpass" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    // Correct current password
    let (status, _) = send(
        &ctx.app,
        "PUT",
        "/users/profile",
        token,
        Some(json!({ "current_password": TEST_PASSWORD, "new_password": "newpass" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    // Login now works only with the new password
    let (status, _) = send(
        &ctx.app,
        "POST",
        "/auth/login",
        None,
        Some(json!({ "email": ctx.user.email.as_str(), "password": TEST_PASSWORD })),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = send(
        &ctx.app,
        "POST",
        "/auth/login",
        None,
        Some(json!({ "email": ctx.user.email.as_str(), "password": "newpass" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    ctx.cleanup().await;
}

#[tokio::test]
async fn test_session_photo_subresource() {
    let ctx = require_db!();
    let token = Some(ctx.user_token.as_str());

    let (_, client) = send(
        &ctx.app,
        "POST",
        "/clients",
        token,
        Some(json!({ "name": format!("Session Client {}", Uuid::new_v4()) })),
    )
    .await;
    let client_id = client["id"].as_str().expect("client id").to_string();

    let (status, session) = send(
        &ctx.app,
        "POST",
        "/sessions",
        token,
        Some(json!({
            "client_id": client_id.as_str(),
            "date": "2026-09-01T14:00:00Z",
            "type": "PORTRAIT"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(session["status"], "SCHEDULED");
    assert_eq!(session["type"], "PORTRAIT");
    let session_id = session["id"].as_str().expect("session id").to_string();

    // Attach a photo
    let (status, photo) = send(
        &ctx.app,
        "POST",
        &format!("/sessions/{}/photos", session_id),
        token,
        Some(json!({
            "url": "https://cdn.example.com/p1.jpg",
            "filename": "p1.jpg"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let photo_id = photo["id"].as_str().expect("photo id").to_string();

    // Session reads embed the photo
    let (_, fetched) = send(
        &ctx.app,
        "GET",
        &format!("/sessions/{}", session_id),
        token,
        None,
    )
    .await;
    assert_eq!(fetched["photos"].as_array().expect("photos").len(), 1);

    // Status lifecycle
    let (status, moved) = send(
        &ctx.app,
        "PATCH",
        &format!("/sessions/{}/status", session_id),
        token,
        Some(json!({ "status": "IN_PROGRESS" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(moved["status"], "IN_PROGRESS");

    // Remove the photo
    let (status, _) = send(
        &ctx.app,
        "DELETE",
        &format!("/sessions/{}/photos/{}", session_id, photo_id),
        token,
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (_, fetched) = send(
        &ctx.app,
        "GET",
        &format!("/sessions/{}", session_id),
        token,
        None,
    )
    .await;
    assert!(fetched["photos"].as_array().expect("photos").is_empty());

    // Cleanup via the client cascade
    send(
        &ctx.app,
        "DELETE",
        &format!("/clients/{}", client_id),
        token,
        None,
    )
    .await;

    ctx.cleanup().await;
}

#[tokio::test]
async fn test_system_config_key_conflict() {
    let ctx = require_db!();
    let token = Some(ctx.admin_token.as_str());
    let key = format!("studio.theme.{}", Uuid::new_v4());

    let (status, created) = send(
        &ctx.app,
        "POST",
        "/system/configs",
        token,
        Some(json!({ "key": key.as_str(), "value": "dark" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["value"], "dark");

    // Same key again conflicts
    let (status, _) = send(
        &ctx.app,
        "POST",
        "/system/configs",
        token,
        Some(json!({ "key": key.as_str(), "value": "light" })),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);

    // Keyed fetch and update
    let (status, fetched) = send(
        &ctx.app,
        "GET",
        &format!("/system/configs/{}", key),
        token,
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched["value"], "dark");

    let (status, _) = send(
        &ctx.app,
        "DELETE",
        &format!("/system/configs/{}", key),
        token,
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    ctx.cleanup().await;
}
