/// Application lifecycle endpoints
///
/// The application status lifecycle:
///
/// ```text
/// PENDING ──> ACCEPTED ──> WORKING ──> DONE
///    │            └────────────────────^
///    └──────> REJECTED
/// ```
///
/// Creators drive PENDING -> ACCEPTED/REJECTED and ACCEPTED -> WORKING via
/// status updates; a clipper's video submission completes the application
/// (ACCEPTED or WORKING -> DONE) in one step. Illegal jumps are rejected.
///
/// # Endpoints
///
/// - `POST  /api/applications/:gigId` (CLIPPER) - Apply to a gig
/// - `GET   /api/applications/check/:gigId` (CLIPPER) - Applied already?
/// - `GET   /api/applications/my` (CLIPPER) - Own applications
/// - `GET   /api/applications/gig/:gigId` (CREATOR) - Applications to a gig
/// - `PATCH /api/applications/:id` (CREATOR) - Update status
/// - `GET   /api/applications/:id` (CLIPPER) - Application detail
/// - `POST  /api/applications/:id/submit` (CLIPPER) - Submit the clip

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Extension, Json,
};
use chrono::{DateTime, Utc};
use clipconnect_shared::{
    auth::{
        authorization::{require_role, AuthzError},
        middleware::AuthContext,
    },
    models::{
        application::{
            Application, ApplicationStatus, ApplicationWithClipper, ApplicationWithGig, GigRef,
        },
        gig::{Gig, GigStatus},
        user::Role,
    },
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Application as the API serves it, gig either referenced or populated
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplicationView {
    pub id: Uuid,
    pub clipper_id: Uuid,
    pub gig: GigRef,
    pub status: ApplicationStatus,
    pub submitted_video_url: Option<String>,
    pub video_public_id: Option<String>,
    pub submitted_at: Option<DateTime<Utc>>,
    pub review_note: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Application> for ApplicationView {
    fn from(a: Application) -> Self {
        Self {
            id: a.id,
            clipper_id: a.clipper_id,
            gig: GigRef::Id(a.gig_id),
            status: a.status,
            submitted_video_url: a.submitted_video_url,
            video_public_id: a.video_public_id,
            submitted_at: a.submitted_at,
            review_note: a.review_note,
            created_at: a.created_at,
            updated_at: a.updated_at,
        }
    }
}

impl From<ApplicationWithGig> for ApplicationView {
    fn from(row: ApplicationWithGig) -> Self {
        let mut view = ApplicationView::from(row.application);
        view.gig = GigRef::Gig(Box::new(row.gig));
        view
    }
}

/// Apply / submit / update response envelope
#[derive(Debug, Serialize)]
pub struct ApplicationResponse {
    pub message: String,
    pub application: ApplicationView,
}

/// Response for the applied-already check
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckApplicationResponse {
    pub has_applied: bool,
    pub application: Option<ApplicationView>,
}

/// Status update request
#[derive(Debug, Deserialize)]
pub struct UpdateStatusRequest {
    pub status: ApplicationStatus,
}

/// Video submission request
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitVideoRequest {
    pub video_url: String,
    pub video_public_id: Option<String>,
}

/// Apply to an open gig
///
/// Duplicate applies surface as 409 Conflict; the unique (gig, clipper)
/// index makes that hold even under concurrent requests, and clients are
/// expected to treat the 409 as "already applied", not as failure.
///
/// # Errors
///
/// - `403 Forbidden`: Caller is not a CLIPPER
/// - `404 Not Found`: Gig missing or no longer open
/// - `409 Conflict`: Already applied to this gig
pub async fn apply_to_gig(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(gig_id): Path<Uuid>,
) -> ApiResult<(StatusCode, Json<ApplicationResponse>)> {
    require_role(&auth, &[Role::Clipper])?;

    let gig = Gig::find_by_id(&state.db, gig_id).await?;
    let open = matches!(gig, Some(ref g) if g.status == GigStatus::Open);
    if !open {
        return Err(ApiError::NotFound("Gig not available".to_string()));
    }

    let application = Application::create(&state.db, gig_id, auth.user_id).await?;

    tracing::info!(
        application_id = %application.id,
        gig_id = %gig_id,
        clipper_id = %auth.user_id,
        "Application created"
    );

    Ok((
        StatusCode::CREATED,
        Json(ApplicationResponse {
            message: "Applied to gig successfully".to_string(),
            application: application.into(),
        }),
    ))
}

/// Check whether the caller has applied to a gig
///
/// Read-only; drives the idempotent apply button client-side.
pub async fn check_application(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(gig_id): Path<Uuid>,
) -> ApiResult<Json<CheckApplicationResponse>> {
    require_role(&auth, &[Role::Clipper])?;

    let application =
        Application::find_by_gig_and_clipper(&state.db, gig_id, auth.user_id).await?;

    Ok(Json(CheckApplicationResponse {
        has_applied: application.is_some(),
        application: application.map(Into::into),
    }))
}

/// List the caller's applications, newest first, gigs populated
pub async fn list_my_applications(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
) -> ApiResult<Json<Vec<ApplicationView>>> {
    require_role(&auth, &[Role::Clipper])?;

    let applications = Application::list_for_clipper(&state.db, auth.user_id).await?;

    Ok(Json(applications.into_iter().map(Into::into).collect()))
}

/// List applications to one of the caller's gigs
///
/// # Errors
///
/// - `403 Forbidden`: Caller is not a CREATOR, or does not own the gig
pub async fn list_gig_applications(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(gig_id): Path<Uuid>,
) -> ApiResult<Json<Vec<ApplicationWithClipper>>> {
    require_role(&auth, &[Role::Creator])?;

    Gig::find_by_id_and_creator(&state.db, gig_id, auth.user_id)
        .await?
        .ok_or(AuthzError::NotOwner)?;

    let applications = Application::list_for_gig(&state.db, gig_id).await?;

    Ok(Json(applications))
}

/// Update an application's status (creator review)
///
/// Only ACCEPTED, REJECTED, WORKING and DONE can be set from outside;
/// PENDING and CLIPPER_DROPPED cannot. The new status must also be a
/// legal transition from the current one. The update itself is guarded
/// on the current status in the database, so two racing reviews cannot
/// both win.
///
/// # Errors
///
/// - `400 Bad Request`: Status not settable, or not a legal transition
/// - `403 Forbidden`: Caller does not own the application's gig
/// - `404 Not Found`: Application does not exist
pub async fn update_application_status(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(id): Path<Uuid>,
    Json(req): Json<UpdateStatusRequest>,
) -> ApiResult<Json<ApplicationResponse>> {
    require_role(&auth, &[Role::Creator])?;

    if !req.status.is_creator_settable() {
        return Err(ApiError::BadRequest("Invalid status".to_string()));
    }

    let application = Application::find_by_id(&state.db, id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Application not found".to_string()))?;

    Gig::find_by_id_and_creator(&state.db, application.gig_id, auth.user_id)
        .await?
        .ok_or(AuthzError::NotOwner)?;

    if !application.status.can_transition_to(req.status) {
        return Err(ApiError::InvalidState(format!(
            "Cannot move application from {} to {}",
            application.status.as_str(),
            req.status.as_str()
        )));
    }

    let updated = Application::transition(&state.db, id, application.status, req.status)
        .await?
        .ok_or_else(|| {
            // Lost a race with another update; the loaded status is stale
            ApiError::InvalidState("Application status changed, retry".to_string())
        })?;

    tracing::info!(
        application_id = %updated.id,
        status = updated.status.as_str(),
        "Application status updated"
    );

    Ok(Json(ApplicationResponse {
        message: "Application status updated".to_string(),
        application: updated.into(),
    }))
}

/// Fetch one of the caller's applications, gig populated
///
/// An application owned by another clipper answers 404, not 403, so the
/// endpoint does not reveal that the ID exists.
pub async fn application_detail(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<ApplicationView>> {
    require_role(&auth, &[Role::Clipper])?;

    let detail = Application::find_detail_for_clipper(&state.db, id, auth.user_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Application not found".to_string()))?;

    Ok(Json(detail.into()))
}

/// Submit the finished clip for an application
///
/// Submission is the completion signal: it records the video and moves
/// the application straight to DONE. Only ACCEPTED or WORKING
/// applications accept a submission; the database update repeats the
/// guard so a concurrent rejection cannot be overwritten.
///
/// # Errors
///
/// - `400 Bad Request`: Missing video URL, or application not in an
///   accepting status
/// - `404 Not Found`: Application does not exist or is not the caller's
pub async fn submit_video(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(id): Path<Uuid>,
    Json(req): Json<SubmitVideoRequest>,
) -> ApiResult<Json<ApplicationResponse>> {
    require_role(&auth, &[Role::Clipper])?;

    if req.video_url.trim().is_empty() {
        return Err(ApiError::BadRequest("Video URL is required".to_string()));
    }

    let application = Application::find_by_id_for_clipper(&state.db, id, auth.user_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Application not found".to_string()))?;

    if !application.status.accepts_submission() {
        return Err(ApiError::InvalidState(
            "Can only submit video for accepted applications".to_string(),
        ));
    }

    let updated = Application::submit_video(
        &state.db,
        id,
        auth.user_id,
        &req.video_url,
        req.video_public_id.as_deref(),
    )
    .await?
    .ok_or_else(|| {
        ApiError::InvalidState("Can only submit video for accepted applications".to_string())
    })?;

    tracing::info!(
        application_id = %updated.id,
        clipper_id = %auth.user_id,
        "Video submitted"
    );

    Ok(Json(ApplicationResponse {
        message: "Video submitted successfully".to_string(),
        application: updated.into(),
    }))
}
