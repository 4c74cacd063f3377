/// Gig endpoints
///
/// # Endpoints
///
/// - `POST /api/gigs` (CREATOR) - Post a new gig
/// - `GET /api/gigs` (CLIPPER) - List all open gigs
/// - `GET /api/gigs/creator` (CREATOR) - List the caller's own gigs

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
};
use axum::{extract::State, http::StatusCode, Extension, Json};
use chrono::{DateTime, Utc};
use clipconnect_shared::{
    auth::{authorization::require_role, middleware::AuthContext},
    models::{
        gig::{CreateGig, Difficulty, Gig, GigStatus, GigWithCreator},
        user::Role,
    },
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

/// Create gig request
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateGigRequest {
    #[validate(length(min = 1, max = 200, message = "Title is required"))]
    pub title: String,

    #[validate(length(min = 1, message = "Description is required"))]
    pub description: String,

    /// Payment offered, must be non-negative
    pub pay: f64,

    #[validate(length(min = 1, message = "Requirements are required"))]
    pub requirements: String,

    /// Difficulty rating, matched case-insensitively
    pub difficulty: String,

    /// Optional cover image URL (from a prior upload)
    pub image: Option<String>,

    /// Public ID of the cover image
    pub image_public_id: Option<String>,
}

/// Create gig response
#[derive(Debug, Serialize)]
pub struct CreateGigResponse {
    pub message: String,
    pub gig: Gig,
}

/// Creator summary nested in open-gig listings
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatorSummary {
    pub id: Uuid,
    pub email: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub avatar_url: Option<String>,
}

/// Open gig with its creator summary
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OpenGigResponse {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub pay: f64,
    pub requirements: String,
    pub difficulty: Difficulty,
    pub status: GigStatus,
    pub image_url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub creator: CreatorSummary,
}

impl From<GigWithCreator> for OpenGigResponse {
    fn from(row: GigWithCreator) -> Self {
        Self {
            id: row.id,
            title: row.title,
            description: row.description,
            pay: row.pay,
            requirements: row.requirements,
            difficulty: row.difficulty,
            status: row.status,
            image_url: row.image_url,
            created_at: row.created_at,
            updated_at: row.updated_at,
            creator: CreatorSummary {
                id: row.creator_id,
                email: row.creator_email,
                first_name: row.creator_first_name,
                last_name: row.creator_last_name,
                avatar_url: row.creator_avatar_url,
            },
        }
    }
}

/// Post a new gig
///
/// # Endpoint
///
/// ```text
/// POST /api/gigs
/// Authorization: Bearer <token>
///
/// {
///   "title": "Edit my stream highlights",
///   "description": "...",
///   "pay": 50.0,
///   "requirements": "60s vertical cut",
///   "difficulty": "medium"
/// }
/// ```
///
/// # Errors
///
/// - `400 Bad Request`: Missing fields, negative pay, unknown difficulty
/// - `403 Forbidden`: Caller is not a CREATOR
pub async fn create_gig(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Json(req): Json<CreateGigRequest>,
) -> ApiResult<(StatusCode, Json<CreateGigResponse>)> {
    require_role(&auth, &[Role::Creator])?;
    req.validate()?;

    if req.pay < 0.0 || !req.pay.is_finite() {
        return Err(ApiError::BadRequest("Pay must be a non-negative amount".to_string()));
    }

    let difficulty = Difficulty::parse(&req.difficulty)
        .ok_or_else(|| ApiError::BadRequest("Invalid difficulty".to_string()))?;

    let gig = Gig::create(
        &state.db,
        CreateGig {
            creator_id: auth.user_id,
            title: req.title,
            description: req.description,
            pay: req.pay,
            requirements: req.requirements,
            difficulty,
            image_url: req.image,
            image_public_id: req.image_public_id,
        },
    )
    .await?;

    tracing::info!(gig_id = %gig.id, creator_id = %auth.user_id, "Gig created");

    Ok((
        StatusCode::CREATED,
        Json(CreateGigResponse {
            message: "Gig created successfully".to_string(),
            gig,
        }),
    ))
}

/// List all open gigs with creator summaries
///
/// No server-side pagination or filtering; clients narrow the list in
/// memory.
///
/// # Errors
///
/// - `403 Forbidden`: Caller is not a CLIPPER
pub async fn list_open_gigs(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
) -> ApiResult<Json<Vec<OpenGigResponse>>> {
    require_role(&auth, &[Role::Clipper])?;

    let gigs = Gig::list_open_with_creator(&state.db).await?;

    Ok(Json(gigs.into_iter().map(Into::into).collect()))
}

/// List the caller's own gigs, open and closed
///
/// # Errors
///
/// - `403 Forbidden`: Caller is not a CREATOR
pub async fn list_creator_gigs(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
) -> ApiResult<Json<Vec<Gig>>> {
    require_role(&auth, &[Role::Creator])?;

    let gigs = Gig::list_by_creator(&state.db, auth.user_id).await?;

    Ok(Json(gigs))
}
