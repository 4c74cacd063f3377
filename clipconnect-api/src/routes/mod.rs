/// API route handlers
pub mod applications;
pub mod auth;
pub mod gigs;
pub mod health;
pub mod uploads;
