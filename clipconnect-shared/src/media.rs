/// Cloudinary media client
///
/// Gig cover images and submitted clips live in Cloudinary; the database
/// only ever stores the returned URL and public ID, never the bytes. This
/// client performs signed uploads and deletions against the Cloudinary
/// REST API.
///
/// Video constraints are enforced here, server-side: payloads over 50 MB
/// are rejected before upload, and videos outside 1-60 seconds are
/// rejected after upload (Cloudinary reports the duration), with the
/// just-uploaded asset destroyed so nothing orphaned is left behind.

use serde::Deserialize;
use sha2::{Digest, Sha256};

/// Maximum accepted upload size (50 MB)
pub const MAX_UPLOAD_BYTES: usize = 50 * 1024 * 1024;

/// Minimum accepted clip duration in seconds
pub const MIN_VIDEO_SECONDS: f64 = 1.0;

/// Maximum accepted clip duration in seconds
pub const MAX_VIDEO_SECONDS: f64 = 60.0;

/// Error type for media operations
#[derive(Debug, thiserror::Error)]
pub enum MediaError {
    /// Upload rejected before reaching Cloudinary
    #[error("Invalid upload: {0}")]
    InvalidUpload(String),

    /// Cloudinary returned a non-success response
    #[error("Upload failed: {0}")]
    UploadFailed(String),

    /// Transport-level failure
    #[error("Media request failed: {0}")]
    Request(#[from] reqwest::Error),
}

/// Cloudinary account credentials
#[derive(Debug, Clone)]
pub struct CloudinaryConfig {
    /// Cloud name (appears in the API URL)
    pub cloud_name: String,

    /// API key (sent with every request)
    pub api_key: String,

    /// API secret (used only for request signing, never sent)
    pub api_secret: String,
}

/// A successfully stored asset
#[derive(Debug, Clone)]
pub struct UploadedMedia {
    /// HTTPS delivery URL
    pub url: String,

    /// Public ID, needed for later deletion
    pub public_id: String,

    /// Detected format (e.g. "mp4", "jpg")
    pub format: Option<String>,

    /// Stored size in bytes
    pub bytes: u64,

    /// Duration in seconds (videos only)
    pub duration: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct UploadResponse {
    secure_url: String,
    public_id: String,
    format: Option<String>,
    bytes: u64,
    duration: Option<f64>,
}

/// Signed Cloudinary API client
#[derive(Debug, Clone)]
pub struct CloudinaryClient {
    http: reqwest::Client,
    config: CloudinaryConfig,
}

impl CloudinaryClient {
    pub fn new(config: CloudinaryConfig) -> Self {
        Self {
            http: reqwest::Client::new(),
            config,
        }
    }

    /// Uploads an image into the `clipconnect/images` folder
    pub async fn upload_image(
        &self,
        data: Vec<u8>,
        filename: &str,
    ) -> Result<UploadedMedia, MediaError> {
        if data.len() > MAX_UPLOAD_BYTES {
            return Err(MediaError::InvalidUpload(format!(
                "File exceeds the {} MB limit",
                MAX_UPLOAD_BYTES / (1024 * 1024)
            )));
        }

        self.upload(data, filename, "image", "clipconnect/images")
            .await
    }

    /// Uploads a video into the `clipconnect/videos` folder
    ///
    /// Enforces the 50 MB size cap and the 1-60 second duration window.
    /// An uploaded video that turns out to be too short or too long is
    /// destroyed and the upload reported as invalid.
    pub async fn upload_video(
        &self,
        data: Vec<u8>,
        filename: &str,
    ) -> Result<UploadedMedia, MediaError> {
        if data.len() > MAX_UPLOAD_BYTES {
            return Err(MediaError::InvalidUpload(format!(
                "Video exceeds the {} MB limit",
                MAX_UPLOAD_BYTES / (1024 * 1024)
            )));
        }

        let media = self
            .upload(data, filename, "video", "clipconnect/videos")
            .await?;

        let duration = media.duration.unwrap_or(0.0);
        if !(MIN_VIDEO_SECONDS..=MAX_VIDEO_SECONDS).contains(&duration) {
            // Reject out-of-range clips and clean up the stored asset
            if let Err(e) = self.destroy(&media.public_id, "video").await {
                tracing::warn!(
                    public_id = %media.public_id,
                    "Failed to clean up rejected video: {}",
                    e
                );
            }
            return Err(MediaError::InvalidUpload(format!(
                "Video must be between {:.0} and {:.0} seconds",
                MIN_VIDEO_SECONDS, MAX_VIDEO_SECONDS
            )));
        }

        Ok(media)
    }

    /// Deletes an asset by public ID
    pub async fn destroy(&self, public_id: &str, resource_type: &str) -> Result<(), MediaError> {
        let timestamp = chrono::Utc::now().timestamp().to_string();
        let signature = self.sign(&[("public_id", public_id), ("timestamp", &timestamp)]);

        let url = format!(
            "https://api.cloudinary.com/v1_1/{}/{}/destroy",
            self.config.cloud_name, resource_type
        );

        let form = reqwest::multipart::Form::new()
            .text("public_id", public_id.to_string())
            .text("timestamp", timestamp)
            .text("api_key", self.config.api_key.clone())
            .text("signature", signature)
            .text("signature_algorithm", "sha256");

        let response = self.http.post(&url).multipart(form).send().await?;

        if !response.status().is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(MediaError::UploadFailed(format!(
                "Destroy rejected: {}",
                body
            )));
        }

        Ok(())
    }

    async fn upload(
        &self,
        data: Vec<u8>,
        filename: &str,
        resource_type: &str,
        folder: &str,
    ) -> Result<UploadedMedia, MediaError> {
        let bytes = data.len();
        let timestamp = chrono::Utc::now().timestamp().to_string();
        let signature = self.sign(&[("folder", folder), ("timestamp", &timestamp)]);

        let url = format!(
            "https://api.cloudinary.com/v1_1/{}/{}/upload",
            self.config.cloud_name, resource_type
        );

        let part = reqwest::multipart::Part::bytes(data).file_name(filename.to_string());
        let form = reqwest::multipart::Form::new()
            .part("file", part)
            .text("folder", folder.to_string())
            .text("timestamp", timestamp)
            .text("api_key", self.config.api_key.clone())
            .text("signature", signature)
            .text("signature_algorithm", "sha256");

        tracing::debug!(resource_type, folder, bytes, "Uploading media asset");

        let response = self.http.post(&url).multipart(form).send().await?;

        if !response.status().is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(MediaError::UploadFailed(format!(
                "Upload rejected: {}",
                body
            )));
        }

        let parsed: UploadResponse = response.json().await?;

        Ok(UploadedMedia {
            url: parsed.secure_url,
            public_id: parsed.public_id,
            format: parsed.format,
            bytes: parsed.bytes,
            duration: parsed.duration,
        })
    }

    /// Computes the Cloudinary request signature
    ///
    /// SHA-256 over the sorted `key=value` pairs joined with `&`, with the
    /// API secret appended. `params` must already be sorted by key.
    fn sign(&self, params: &[(&str, &str)]) -> String {
        let to_sign = params
            .iter()
            .map(|(k, v)| format!("{}={}", k, v))
            .collect::<Vec<_>>()
            .join("&");

        let mut hasher = Sha256::new();
        hasher.update(to_sign.as_bytes());
        hasher.update(self.config.api_secret.as_bytes());
        hex::encode(hasher.finalize())
    }
}
