//! # ClipConnect Shared Library
//!
//! Shared types and business logic used by the ClipConnect API server.
//!
//! ## Module Organization
//!
//! - `models`: Database models and lifecycle logic (users, gigs, applications)
//! - `auth`: Password hashing, JWT tokens, role authorization
//! - `db`: Connection pool and migration runner
//! - `media`: Cloudinary upload/delete client

pub mod auth;
pub mod db;
pub mod media;
pub mod models;

/// Current version of the ClipConnect shared library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
