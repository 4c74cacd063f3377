/// Request authentication context
///
/// The API server's bearer-token layer validates the JWT and inserts an
/// [`AuthContext`] into the request extensions; handlers extract it with
/// axum's `Extension` extractor.
///
/// # Example
///
/// ```
/// use clipconnect_shared::auth::middleware::AuthContext;
/// use clipconnect_shared::models::user::Role;
/// use uuid::Uuid;
///
/// let auth = AuthContext { user_id: Uuid::new_v4(), role: Role::Clipper };
/// assert_eq!(format!("{}", auth.role), "CLIPPER");
/// ```

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::jwt::Claims;
use crate::models::user::Role;

/// Authenticated identity attached to a request after token validation
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct AuthContext {
    /// Authenticated user ID
    pub user_id: Uuid,

    /// Role carried by the token
    pub role: Role,
}

impl AuthContext {
    /// Builds the context from validated JWT claims
    pub fn from_claims(claims: &Claims) -> Self {
        Self {
            user_id: claims.sub,
            role: claims.role,
        }
    }
}

/// Error type for request authentication
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    /// Missing Authorization header
    #[error("No token provided")]
    MissingCredentials,

    /// Authorization header is not a Bearer token
    #[error("Expected Bearer token")]
    InvalidFormat,

    /// Token failed validation
    #[error("Invalid or expired token")]
    InvalidToken,
}
