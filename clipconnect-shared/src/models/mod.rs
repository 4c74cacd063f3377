/// Database models for ClipConnect
///
/// # Models
///
/// - `user`: Accounts with a fixed CREATOR or CLIPPER role
/// - `gig`: Video-editing jobs posted by creators
/// - `application`: A clipper's claim on a gig, carrying the lifecycle status

pub mod application;
pub mod gig;
pub mod user;
