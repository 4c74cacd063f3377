/// Media upload endpoints
///
/// Accepts multipart uploads, pushes them to object storage, and hands
/// back the `{url, publicId}` pair the caller stores on a gig or
/// application. The bytes themselves are never persisted here.
///
/// # Endpoints
///
/// - `POST   /api/uploads/image` - Upload a gig cover image
/// - `POST   /api/uploads/video` - Upload a submission clip
/// - `DELETE /api/uploads/:publicId` - Delete an uploaded asset

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
};
use axum::{
    extract::{Multipart, Path, Query, State},
    Json,
};
use clipconnect_shared::media::UploadedMedia;
use serde::{Deserialize, Serialize};

/// Upload response
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadResponse {
    pub message: String,
    pub url: String,
    pub public_id: String,
    pub format: Option<String>,
    pub bytes: u64,
    /// Duration in seconds, videos only
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration: Option<f64>,
}

impl UploadResponse {
    fn new(message: &str, media: UploadedMedia) -> Self {
        Self {
            message: message.to_string(),
            url: media.url,
            public_id: media.public_id,
            format: media.format,
            bytes: media.bytes,
            duration: media.duration,
        }
    }
}

/// Delete response
#[derive(Debug, Serialize)]
pub struct DeleteResponse {
    pub message: String,
}

/// Delete query parameters
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteParams {
    /// "image" (default) or "video"
    pub resource_type: Option<String>,
}

/// Upload an image
///
/// # Errors
///
/// - `400 Bad Request`: No file in the form, or file too large
/// - `500 Internal Server Error`: Storage not configured or unreachable
pub async fn upload_image(
    State(state): State<AppState>,
    multipart: Multipart,
) -> ApiResult<Json<UploadResponse>> {
    let client = state.media_client()?;
    let (data, filename) = read_file_field(multipart).await?;

    let media = client.upload_image(data, &filename).await?;

    tracing::info!(public_id = %media.public_id, "Image uploaded");

    Ok(Json(UploadResponse::new("Image uploaded successfully", media)))
}

/// Upload a video
///
/// The storage layer enforces the 50 MB cap and the 1-60 second duration
/// window; clips outside the window are rejected and cleaned up.
///
/// # Errors
///
/// - `400 Bad Request`: No file, too large, or duration out of range
/// - `500 Internal Server Error`: Storage not configured or unreachable
pub async fn upload_video(
    State(state): State<AppState>,
    multipart: Multipart,
) -> ApiResult<Json<UploadResponse>> {
    let client = state.media_client()?;
    let (data, filename) = read_file_field(multipart).await?;

    let media = client.upload_video(data, &filename).await?;

    tracing::info!(
        public_id = %media.public_id,
        duration = ?media.duration,
        "Video uploaded"
    );

    Ok(Json(UploadResponse::new("Video uploaded successfully", media)))
}

/// Delete an uploaded asset by public ID
///
/// Public IDs contain slashes, so callers URL-encode them into the path
/// segment.
pub async fn delete_file(
    State(state): State<AppState>,
    Path(public_id): Path<String>,
    Query(params): Query<DeleteParams>,
) -> ApiResult<Json<DeleteResponse>> {
    let client = state.media_client()?;

    let resource_type = match params.resource_type.as_deref() {
        None | Some("image") => "image",
        Some("video") => "video",
        Some(other) => {
            return Err(ApiError::BadRequest(format!(
                "Unknown resource type: {other}"
            )))
        }
    };

    client.destroy(&public_id, resource_type).await?;

    tracing::info!(public_id = %public_id, resource_type, "Asset deleted");

    Ok(Json(DeleteResponse {
        message: "File deleted successfully".to_string(),
    }))
}

/// Pulls the `file` field out of a multipart form
async fn read_file_field(mut multipart: Multipart) -> Result<(Vec<u8>, String), ApiError> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::BadRequest(format!("Malformed multipart body: {e}")))?
    {
        if field.name() != Some("file") {
            continue;
        }

        let filename = field
            .file_name()
            .unwrap_or("upload")
            .to_string();

        let data = field
            .bytes()
            .await
            .map_err(|e| ApiError::BadRequest(format!("Failed to read upload: {e}")))?;

        return Ok((data.to_vec(), filename));
    }

    Err(ApiError::BadRequest("No file uploaded".to_string()))
}
