/// Role-based authorization checks
///
/// ClipConnect's permission model is flat: every protected route is open
/// to one role (occasionally both), and resource-level ownership checks
/// happen against the database in the handlers. This module provides the
/// role gate.
///
/// # Example
///
/// ```
/// use clipconnect_shared::auth::authorization::require_role;
/// use clipconnect_shared::auth::middleware::AuthContext;
/// use clipconnect_shared::models::user::Role;
/// use uuid::Uuid;
///
/// let auth = AuthContext { user_id: Uuid::new_v4(), role: Role::Clipper };
/// assert!(require_role(&auth, &[Role::Clipper]).is_ok());
/// assert!(require_role(&auth, &[Role::Creator]).is_err());
/// ```

use super::middleware::AuthContext;
use crate::models::user::Role;

/// Error type for authorization checks
#[derive(Debug, thiserror::Error)]
pub enum AuthzError {
    /// Authenticated role is not allowed on this route
    #[error("Forbidden: access denied")]
    RoleNotAllowed { required: Vec<Role>, actual: Role },

    /// Caller does not own the resource
    #[error("Access denied")]
    NotOwner,
}

/// Checks that the authenticated role is in the allowed set
///
/// # Errors
///
/// Returns `AuthzError::RoleNotAllowed` (→ 403) otherwise.
pub fn require_role(auth: &AuthContext, allowed: &[Role]) -> Result<(), AuthzError> {
    if allowed.contains(&auth.role) {
        Ok(())
    } else {
        Err(AuthzError::RoleNotAllowed {
            required: allowed.to_vec(),
            actual: auth.role,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn ctx(role: Role) -> AuthContext {
        AuthContext {
            user_id: Uuid::new_v4(),
            role,
        }
    }

    #[test]
    fn test_allowed_role_passes() {
        assert!(require_role(&ctx(Role::Creator), &[Role::Creator]).is_ok());
        assert!(require_role(&ctx(Role::Clipper), &[Role::Creator, Role::Clipper]).is_ok());
    }

    #[test]
    fn test_disallowed_role_fails() {
        let result = require_role(&ctx(Role::Clipper), &[Role::Creator]);
        assert!(matches!(
            result,
            Err(AuthzError::RoleNotAllowed {
                actual: Role::Clipper,
                ..
            })
        ));
    }

    #[test]
    fn test_empty_allowed_set_fails() {
        assert!(require_role(&ctx(Role::Creator), &[]).is_err());
    }
}
