/// Integration tests for the ClipConnect API
///
/// These tests drive the full router end-to-end:
/// - Signup/login and token validation
/// - Gig creation and listing per role
/// - The application lifecycle (apply, review, submit)
/// - Ownership and role enforcement
///
/// They need a PostgreSQL database via `DATABASE_URL` and skip themselves
/// when it is not set.

mod common;

use axum::http::StatusCode;
use clipconnect_shared::models::application::{Application, ApplicationStatus};
use common::{expect_status, TestContext};
use serde_json::json;

macro_rules! ctx_or_skip {
    () => {
        match TestContext::try_new().await.unwrap() {
            Some(ctx) => ctx,
            None => return,
        }
    };
}

#[tokio::test]
async fn test_signup_and_login() {
    let mut ctx = ctx_or_skip!();

    let email = format!("signup-{}@example.com", uuid::Uuid::new_v4());
    let response = ctx
        .request(
            "POST",
            "/api/auth/signup",
            None,
            Some(json!({
                "email": email,
                "password": "longenoughpassword",
                "role": "CLIPPER"
            })),
        )
        .await;

    let body = expect_status(response, StatusCode::CREATED).await;
    assert!(body["token"].is_string());
    assert_eq!(body["user"]["email"], email);
    assert_eq!(body["user"]["role"], "CLIPPER");
    // The hash must never appear in a response
    assert!(body["user"].get("passwordHash").is_none());
    assert!(body["user"].get("password_hash").is_none());

    // Duplicate email answers 409
    let response = ctx
        .request(
            "POST",
            "/api/auth/signup",
            None,
            Some(json!({
                "email": email,
                "password": "longenoughpassword",
                "role": "CLIPPER"
            })),
        )
        .await;
    expect_status(response, StatusCode::CONFLICT).await;

    // Correct credentials log in
    let response = ctx
        .request(
            "POST",
            "/api/auth/login",
            None,
            Some(json!({ "email": email, "password": "longenoughpassword" })),
        )
        .await;
    let body = expect_status(response, StatusCode::OK).await;
    assert!(body["token"].is_string());

    // Wrong password and unknown email answer the same opaque 401
    let response = ctx
        .request(
            "POST",
            "/api/auth/login",
            None,
            Some(json!({ "email": email, "password": "wrong-password-1" })),
        )
        .await;
    let body = expect_status(response, StatusCode::UNAUTHORIZED).await;
    assert_eq!(body["message"], "Invalid credentials");

    let response = ctx
        .request(
            "POST",
            "/api/auth/login",
            None,
            Some(json!({ "email": "nobody@example.com", "password": "whatever-123" })),
        )
        .await;
    let body = expect_status(response, StatusCode::UNAUTHORIZED).await;
    assert_eq!(body["message"], "Invalid credentials");

    sqlx::query("DELETE FROM users WHERE email = $1")
        .bind(&email)
        .execute(&ctx.db)
        .await
        .unwrap();
    ctx.cleanup().await.unwrap();
}

#[tokio::test]
async fn test_protected_routes_require_token() {
    let mut ctx = ctx_or_skip!();

    let response = ctx.request("GET", "/api/gigs", None, None).await;
    expect_status(response, StatusCode::UNAUTHORIZED).await;

    let response = ctx
        .request("GET", "/api/gigs", Some("not-a-real-token"), None)
        .await;
    expect_status(response, StatusCode::UNAUTHORIZED).await;

    ctx.cleanup().await.unwrap();
}

#[tokio::test]
async fn test_gig_creation_and_role_gates() {
    let mut ctx = ctx_or_skip!();

    // Clippers cannot post gigs
    let clipper_token = ctx.clipper_token.clone();
    let response = ctx
        .request(
            "POST",
            "/api/gigs",
            Some(&clipper_token),
            Some(json!({
                "title": "t",
                "description": "d",
                "pay": 10.0,
                "requirements": "r",
                "difficulty": "easy"
            })),
        )
        .await;
    expect_status(response, StatusCode::FORBIDDEN).await;

    // Difficulty is normalized case-insensitively
    let creator_token = ctx.creator_token.clone();
    let response = ctx
        .request(
            "POST",
            "/api/gigs",
            Some(&creator_token),
            Some(json!({
                "title": "Highlights",
                "description": "Cut my VOD",
                "pay": 25.0,
                "requirements": "Vertical",
                "difficulty": "mEdIuM"
            })),
        )
        .await;
    let body = expect_status(response, StatusCode::CREATED).await;
    assert_eq!(body["gig"]["difficulty"], "Medium");
    assert_eq!(body["gig"]["status"], "OPEN");

    // Unknown difficulty is a 400
    let response = ctx
        .request(
            "POST",
            "/api/gigs",
            Some(&creator_token),
            Some(json!({
                "title": "t",
                "description": "d",
                "pay": 10.0,
                "requirements": "r",
                "difficulty": "impossible"
            })),
        )
        .await;
    expect_status(response, StatusCode::BAD_REQUEST).await;

    // Negative pay is a 400
    let response = ctx
        .request(
            "POST",
            "/api/gigs",
            Some(&creator_token),
            Some(json!({
                "title": "t",
                "description": "d",
                "pay": -5.0,
                "requirements": "r",
                "difficulty": "easy"
            })),
        )
        .await;
    expect_status(response, StatusCode::BAD_REQUEST).await;

    ctx.cleanup().await.unwrap();
}

#[tokio::test]
async fn test_open_gig_listing_excludes_closed() {
    let mut ctx = ctx_or_skip!();

    let open_gig = ctx.create_gig().await.unwrap();
    let closed_gig = ctx.create_gig().await.unwrap();
    sqlx::query("UPDATE gigs SET status = 'closed' WHERE id = $1")
        .bind(closed_gig.id)
        .execute(&ctx.db)
        .await
        .unwrap();

    let clipper_token = ctx.clipper_token.clone();
    let response = ctx.request("GET", "/api/gigs", Some(&clipper_token), None).await;
    let body = expect_status(response, StatusCode::OK).await;

    let listed: Vec<&str> = body
        .as_array()
        .unwrap()
        .iter()
        .map(|g| g["id"].as_str().unwrap())
        .collect();

    assert!(listed.contains(&open_gig.id.to_string().as_str()));
    assert!(!listed.contains(&closed_gig.id.to_string().as_str()));

    // Creator summary is joined in
    let open_entry = body
        .as_array()
        .unwrap()
        .iter()
        .find(|g| g["id"] == open_gig.id.to_string())
        .unwrap();
    assert_eq!(open_entry["creator"]["email"], ctx.creator.email);

    ctx.cleanup().await.unwrap();
}

#[tokio::test]
async fn test_apply_is_idempotent_under_duplicates() {
    let mut ctx = ctx_or_skip!();

    let gig = ctx.create_gig().await.unwrap();
    let clipper_token = ctx.clipper_token.clone();
    let uri = format!("/api/applications/{}", gig.id);

    let response = ctx.request("POST", &uri, Some(&clipper_token), None).await;
    let body = expect_status(response, StatusCode::CREATED).await;
    assert_eq!(body["application"]["status"], "PENDING");

    // Second apply answers 409 and creates no second row
    let response = ctx.request("POST", &uri, Some(&clipper_token), None).await;
    let body = expect_status(response, StatusCode::CONFLICT).await;
    assert_eq!(body["message"], "Already applied to this gig");

    let (count,): (i64,) =
        sqlx::query_as("SELECT COUNT(*) FROM applications WHERE gig_id = $1 AND clipper_id = $2")
            .bind(gig.id)
            .bind(ctx.clipper.id)
            .fetch_one(&ctx.db)
            .await
            .unwrap();
    assert_eq!(count, 1);

    // The check endpoint reports the existing application
    let check_uri = format!("/api/applications/check/{}", gig.id);
    let response = ctx.request("GET", &check_uri, Some(&clipper_token), None).await;
    let body = expect_status(response, StatusCode::OK).await;
    assert_eq!(body["hasApplied"], true);
    assert_eq!(body["application"]["status"], "PENDING");

    ctx.cleanup().await.unwrap();
}

#[tokio::test]
async fn test_apply_to_closed_or_missing_gig() {
    let mut ctx = ctx_or_skip!();

    let gig = ctx.create_gig().await.unwrap();
    sqlx::query("UPDATE gigs SET status = 'closed' WHERE id = $1")
        .bind(gig.id)
        .execute(&ctx.db)
        .await
        .unwrap();

    let clipper_token = ctx.clipper_token.clone();
    let uri = format!("/api/applications/{}", gig.id);
    let response = ctx.request("POST", &uri, Some(&clipper_token), None).await;
    let body = expect_status(response, StatusCode::NOT_FOUND).await;
    assert_eq!(body["message"], "Gig not available");

    let uri = format!("/api/applications/{}", uuid::Uuid::new_v4());
    let response = ctx.request("POST", &uri, Some(&clipper_token), None).await;
    expect_status(response, StatusCode::NOT_FOUND).await;

    ctx.cleanup().await.unwrap();
}

#[tokio::test]
async fn test_status_update_requires_gig_ownership() {
    let mut ctx = ctx_or_skip!();

    let gig = ctx.create_gig().await.unwrap();
    let application = Application::create(&ctx.db, gig.id, ctx.clipper.id)
        .await
        .unwrap();

    // A different creator cannot review applications to this gig
    let other = common::TestContext::try_new().await.unwrap().unwrap();
    let other_token = other.creator_token.clone();

    let uri = format!("/api/applications/{}", application.id);
    let response = ctx
        .request(
            "PATCH",
            &uri,
            Some(&other_token),
            Some(json!({ "status": "ACCEPTED" })),
        )
        .await;
    let body = expect_status(response, StatusCode::FORBIDDEN).await;
    assert_eq!(body["message"], "Access denied");

    // Status is unchanged
    let unchanged = Application::find_by_id(&ctx.db, application.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(unchanged.status, ApplicationStatus::Pending);

    other.cleanup().await.unwrap();
    ctx.cleanup().await.unwrap();
}

#[tokio::test]
async fn test_status_update_transitions() {
    let mut ctx = ctx_or_skip!();

    let gig = ctx.create_gig().await.unwrap();
    let application = Application::create(&ctx.db, gig.id, ctx.clipper.id)
        .await
        .unwrap();

    let creator_token = ctx.creator_token.clone();
    let uri = format!("/api/applications/{}", application.id);

    // PENDING -> DONE is an illegal jump
    let response = ctx
        .request(
            "PATCH",
            &uri,
            Some(&creator_token),
            Some(json!({ "status": "DONE" })),
        )
        .await;
    expect_status(response, StatusCode::BAD_REQUEST).await;

    // PENDING and CLIPPER_DROPPED are not settable from outside
    let response = ctx
        .request(
            "PATCH",
            &uri,
            Some(&creator_token),
            Some(json!({ "status": "PENDING" })),
        )
        .await;
    let body = expect_status(response, StatusCode::BAD_REQUEST).await;
    assert_eq!(body["message"], "Invalid status");

    // PENDING -> ACCEPTED -> WORKING is the happy path
    let response = ctx
        .request(
            "PATCH",
            &uri,
            Some(&creator_token),
            Some(json!({ "status": "ACCEPTED" })),
        )
        .await;
    let body = expect_status(response, StatusCode::OK).await;
    assert_eq!(body["application"]["status"], "ACCEPTED");

    let response = ctx
        .request(
            "PATCH",
            &uri,
            Some(&creator_token),
            Some(json!({ "status": "WORKING" })),
        )
        .await;
    let body = expect_status(response, StatusCode::OK).await;
    assert_eq!(body["application"]["status"], "WORKING");

    // WORKING -> ACCEPTED cannot go backwards
    let response = ctx
        .request(
            "PATCH",
            &uri,
            Some(&creator_token),
            Some(json!({ "status": "ACCEPTED" })),
        )
        .await;
    expect_status(response, StatusCode::BAD_REQUEST).await;

    ctx.cleanup().await.unwrap();
}

#[tokio::test]
async fn test_submit_video_lifecycle() {
    let mut ctx = ctx_or_skip!();

    let gig = ctx.create_gig().await.unwrap();
    let application = Application::create(&ctx.db, gig.id, ctx.clipper.id)
        .await
        .unwrap();

    let clipper_token = ctx.clipper_token.clone();
    let submit_uri = format!("/api/applications/{}/submit", application.id);

    // Submission against a PENDING application is rejected and changes nothing
    let response = ctx
        .request(
            "POST",
            &submit_uri,
            Some(&clipper_token),
            Some(json!({ "videoUrl": "https://cdn.example.com/clip.mp4" })),
        )
        .await;
    let body = expect_status(response, StatusCode::BAD_REQUEST).await;
    assert_eq!(
        body["message"],
        "Can only submit video for accepted applications"
    );

    let unchanged = Application::find_by_id(&ctx.db, application.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(unchanged.status, ApplicationStatus::Pending);
    assert!(unchanged.submitted_video_url.is_none());
    assert!(unchanged.submitted_at.is_none());

    // Empty video URL is a 400
    Application::transition(
        &ctx.db,
        application.id,
        ApplicationStatus::Pending,
        ApplicationStatus::Accepted,
    )
    .await
    .unwrap();

    let response = ctx
        .request(
            "POST",
            &submit_uri,
            Some(&clipper_token),
            Some(json!({ "videoUrl": "" })),
        )
        .await;
    expect_status(response, StatusCode::BAD_REQUEST).await;

    // A valid submission completes the application in one step
    let response = ctx
        .request(
            "POST",
            &submit_uri,
            Some(&clipper_token),
            Some(json!({
                "videoUrl": "https://cdn.example.com/clip.mp4",
                "videoPublicId": "clipconnect/videos/clip"
            })),
        )
        .await;
    let body = expect_status(response, StatusCode::OK).await;
    assert_eq!(body["application"]["status"], "DONE");
    assert_eq!(
        body["application"]["submittedVideoUrl"],
        "https://cdn.example.com/clip.mp4"
    );
    assert!(body["application"]["submittedAt"].is_string());

    // Another clipper's submission answers 404, revealing nothing
    let other = common::TestContext::try_new().await.unwrap().unwrap();
    let mut other_ctx = other;
    let other_token = other_ctx.clipper_token.clone();
    let response = other_ctx
        .request(
            "POST",
            &submit_uri,
            Some(&other_token),
            Some(json!({ "videoUrl": "https://cdn.example.com/steal.mp4" })),
        )
        .await;
    let body = expect_status(response, StatusCode::NOT_FOUND).await;
    assert_eq!(body["message"], "Application not found");

    other_ctx.cleanup().await.unwrap();
    ctx.cleanup().await.unwrap();
}

#[tokio::test]
async fn test_application_listings() {
    let mut ctx = ctx_or_skip!();

    let gig = ctx.create_gig().await.unwrap();
    Application::create(&ctx.db, gig.id, ctx.clipper.id)
        .await
        .unwrap();

    // Clipper sees their application with the gig populated
    let clipper_token = ctx.clipper_token.clone();
    let response = ctx
        .request("GET", "/api/applications/my", Some(&clipper_token), None)
        .await;
    let body = expect_status(response, StatusCode::OK).await;
    let mine = body.as_array().unwrap();
    assert_eq!(mine.len(), 1);
    assert_eq!(mine[0]["gig"]["id"], gig.id.to_string());
    assert_eq!(mine[0]["gig"]["title"], gig.title);

    // The owning creator sees applications with the clipper email joined
    let creator_token = ctx.creator_token.clone();
    let uri = format!("/api/applications/gig/{}", gig.id);
    let response = ctx.request("GET", &uri, Some(&creator_token), None).await;
    let body = expect_status(response, StatusCode::OK).await;
    let applications = body.as_array().unwrap();
    assert_eq!(applications.len(), 1);
    assert_eq!(applications[0]["clipperEmail"], ctx.clipper.email);

    // A non-owning creator is denied
    let other = common::TestContext::try_new().await.unwrap().unwrap();
    let mut other_ctx = other;
    let other_token = other_ctx.creator_token.clone();
    let response = other_ctx.request("GET", &uri, Some(&other_token), None).await;
    expect_status(response, StatusCode::FORBIDDEN).await;

    other_ctx.cleanup().await.unwrap();
    ctx.cleanup().await.unwrap();
}

#[tokio::test]
async fn test_application_detail_scoping() {
    let mut ctx = ctx_or_skip!();

    let gig = ctx.create_gig().await.unwrap();
    let application = Application::create(&ctx.db, gig.id, ctx.clipper.id)
        .await
        .unwrap();

    let clipper_token = ctx.clipper_token.clone();
    let uri = format!("/api/applications/{}", application.id);
    let response = ctx.request("GET", &uri, Some(&clipper_token), None).await;
    let body = expect_status(response, StatusCode::OK).await;
    assert_eq!(body["id"], application.id.to_string());
    assert_eq!(body["gig"]["id"], gig.id.to_string());

    // Another clipper gets 404, not 403
    let other = common::TestContext::try_new().await.unwrap().unwrap();
    let mut other_ctx = other;
    let other_token = other_ctx.clipper_token.clone();
    let response = other_ctx.request("GET", &uri, Some(&other_token), None).await;
    expect_status(response, StatusCode::NOT_FOUND).await;

    other_ctx.cleanup().await.unwrap();
    ctx.cleanup().await.unwrap();
}

#[tokio::test]
async fn test_health_check() {
    let mut ctx = ctx_or_skip!();

    let response = ctx.request("GET", "/health", None, None).await;
    let body = expect_status(response, StatusCode::OK).await;
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["database"], "connected");

    ctx.cleanup().await.unwrap();
}
