/// Authentication and authorization utilities
///
/// # Modules
///
/// - [`password`]: Argon2id password hashing and verification
/// - [`jwt`]: HS256 token generation and validation
/// - [`middleware`]: Request authentication context
/// - [`authorization`]: Role gates for protected routes

pub mod authorization;
pub mod jwt;
pub mod middleware;
pub mod password;
