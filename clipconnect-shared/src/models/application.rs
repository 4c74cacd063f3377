/// Application model and lifecycle operations
///
/// An application is a clipper's claim on a gig. It is the most stateful
/// entity in the system and the only place genuine concurrency correctness
/// matters: one application per (gig, clipper) pair is guaranteed by a
/// unique compound constraint, not by a read-then-insert in the handler.
///
/// # State Machine
///
/// ```text
/// pending  → accepted | rejected
/// accepted → working | done      (done directly via video submission)
/// working  → done
/// rejected, done, clipper_dropped are terminal
/// ```
///
/// `clipper_dropped` is a declared terminal state with no inbound
/// transition; it exists for schema fidelity with the product data model.
///
/// # Schema
///
/// ```sql
/// CREATE TYPE application_status AS ENUM (
///     'pending', 'accepted', 'rejected', 'working', 'done', 'clipper_dropped'
/// );
///
/// CREATE TABLE applications (
///     id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
///     gig_id UUID NOT NULL REFERENCES gigs(id) ON DELETE CASCADE,
///     clipper_id UUID NOT NULL REFERENCES users(id) ON DELETE CASCADE,
///     status application_status NOT NULL DEFAULT 'pending',
///     submitted_video_url VARCHAR(512),
///     video_public_id VARCHAR(255),
///     submitted_at TIMESTAMPTZ,
///     review_note TEXT,
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     CONSTRAINT applications_gig_id_clipper_id_key UNIQUE (gig_id, clipper_id)
/// );
/// ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

use super::gig::{Difficulty, Gig, GigStatus};

/// Application lifecycle status
///
/// Wire form is SCREAMING_SNAKE_CASE (`"PENDING"`, `"CLIPPER_DROPPED"`, ...).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "application_status", rename_all = "snake_case")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ApplicationStatus {
    /// Awaiting creator review
    Pending,

    /// Accepted by the creator; clipper may start work
    Accepted,

    /// Rejected by the creator
    Rejected,

    /// Clipper marked as actively working
    Working,

    /// Work submitted; the completion signal
    Done,

    /// Clipper abandoned the gig (no transition currently produces this)
    ClipperDropped,
}

impl ApplicationStatus {
    /// Wire/display form of the status
    pub fn as_str(&self) -> &'static str {
        match self {
            ApplicationStatus::Pending => "PENDING",
            ApplicationStatus::Accepted => "ACCEPTED",
            ApplicationStatus::Rejected => "REJECTED",
            ApplicationStatus::Working => "WORKING",
            ApplicationStatus::Done => "DONE",
            ApplicationStatus::ClipperDropped => "CLIPPER_DROPPED",
        }
    }

    /// Whether this status ends the lifecycle
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            ApplicationStatus::Rejected
                | ApplicationStatus::Done
                | ApplicationStatus::ClipperDropped
        )
    }

    /// Whether a creator may set this status via the review endpoint
    ///
    /// PENDING and CLIPPER_DROPPED are never externally settable.
    pub fn is_creator_settable(&self) -> bool {
        matches!(
            self,
            ApplicationStatus::Accepted
                | ApplicationStatus::Rejected
                | ApplicationStatus::Working
                | ApplicationStatus::Done
        )
    }

    /// Whether the lifecycle permits moving from `self` to `target`
    pub fn can_transition_to(&self, target: ApplicationStatus) -> bool {
        match (self, target) {
            (ApplicationStatus::Pending, ApplicationStatus::Accepted) => true,
            (ApplicationStatus::Pending, ApplicationStatus::Rejected) => true,

            (ApplicationStatus::Accepted, ApplicationStatus::Working) => true,
            // Video submission completes directly from accepted
            (ApplicationStatus::Accepted, ApplicationStatus::Done) => true,

            (ApplicationStatus::Working, ApplicationStatus::Done) => true,

            // Terminal states never transition
            _ => false,
        }
    }

    /// Whether a clipper may submit a video in this status
    pub fn accepts_submission(&self) -> bool {
        matches!(self, ApplicationStatus::Accepted | ApplicationStatus::Working)
    }
}

impl std::fmt::Display for ApplicationStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Reference to a gig, either by ID or fully loaded
///
/// Serialized untagged, so responses carry either a bare UUID string or a
/// gig object. Callers branch explicitly instead of inspecting the JSON
/// shape at runtime.
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum GigRef {
    /// Unpopulated reference
    Id(Uuid),

    /// Populated gig record
    Gig(Box<Gig>),
}

impl GigRef {
    /// The referenced gig's ID, whichever variant this is
    pub fn id(&self) -> Uuid {
        match self {
            GigRef::Id(id) => *id,
            GigRef::Gig(gig) => gig.id,
        }
    }
}

/// A clipper's application to a gig
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Application {
    /// Unique application ID
    pub id: Uuid,

    /// The gig applied to
    pub gig_id: Uuid,

    /// The applying clipper
    pub clipper_id: Uuid,

    /// Current lifecycle status
    pub status: ApplicationStatus,

    /// URL of the submitted clip, once submitted
    pub submitted_video_url: Option<String>,

    /// Object-storage public ID for the submitted clip
    pub video_public_id: Option<String>,

    /// When the clip was submitted
    pub submitted_at: Option<DateTime<Utc>>,

    /// Creator's review feedback
    pub review_note: Option<String>,

    /// When the application was created
    pub created_at: DateTime<Utc>,

    /// When the application was last updated
    pub updated_at: DateTime<Utc>,
}

/// Application joined with its fully loaded gig
#[derive(Debug, Clone)]
pub struct ApplicationWithGig {
    pub application: Application,
    pub gig: Gig,
}

/// Application joined with the applying clipper's email
///
/// What a creator sees when reviewing applications to one of their gigs.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct ApplicationWithClipper {
    pub id: Uuid,
    pub gig_id: Uuid,
    pub clipper_id: Uuid,
    pub status: ApplicationStatus,
    pub submitted_video_url: Option<String>,
    pub video_public_id: Option<String>,
    pub submitted_at: Option<DateTime<Utc>>,
    pub review_note: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub clipper_email: String,
}

/// Flat row for application + gig joins
#[derive(Debug, sqlx::FromRow)]
struct ApplicationGigRow {
    id: Uuid,
    gig_id: Uuid,
    clipper_id: Uuid,
    status: ApplicationStatus,
    submitted_video_url: Option<String>,
    video_public_id: Option<String>,
    submitted_at: Option<DateTime<Utc>>,
    review_note: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    gig_creator_id: Uuid,
    gig_title: String,
    gig_description: String,
    gig_pay: f64,
    gig_requirements: String,
    gig_difficulty: Difficulty,
    gig_status: GigStatus,
    gig_image_url: Option<String>,
    gig_image_public_id: Option<String>,
    gig_created_at: DateTime<Utc>,
    gig_updated_at: DateTime<Utc>,
}

impl From<ApplicationGigRow> for ApplicationWithGig {
    fn from(row: ApplicationGigRow) -> Self {
        ApplicationWithGig {
            gig: Gig {
                id: row.gig_id,
                creator_id: row.gig_creator_id,
                title: row.gig_title,
                description: row.gig_description,
                pay: row.gig_pay,
                requirements: row.gig_requirements,
                difficulty: row.gig_difficulty,
                status: row.gig_status,
                image_url: row.gig_image_url,
                image_public_id: row.gig_image_public_id,
                created_at: row.gig_created_at,
                updated_at: row.gig_updated_at,
            },
            application: Application {
                id: row.id,
                gig_id: row.gig_id,
                clipper_id: row.clipper_id,
                status: row.status,
                submitted_video_url: row.submitted_video_url,
                video_public_id: row.video_public_id,
                submitted_at: row.submitted_at,
                review_note: row.review_note,
                created_at: row.created_at,
                updated_at: row.updated_at,
            },
        }
    }
}

const APP_GIG_SELECT: &str = r#"
    SELECT a.id, a.gig_id, a.clipper_id, a.status, a.submitted_video_url,
           a.video_public_id, a.submitted_at, a.review_note,
           a.created_at, a.updated_at,
           g.creator_id AS gig_creator_id,
           g.title AS gig_title,
           g.description AS gig_description,
           g.pay AS gig_pay,
           g.requirements AS gig_requirements,
           g.difficulty AS gig_difficulty,
           g.status AS gig_status,
           g.image_url AS gig_image_url,
           g.image_public_id AS gig_image_public_id,
           g.created_at AS gig_created_at,
           g.updated_at AS gig_updated_at
    FROM applications a
    JOIN gigs g ON g.id = a.gig_id
"#;

impl Application {
    /// Creates an application in PENDING status
    ///
    /// A second application for the same (gig, clipper) pair fails with a
    /// unique-constraint violation, which the API layer maps to 409. There
    /// is deliberately no existence pre-check here: the constraint is the
    /// race-free duplicate guard.
    pub async fn create(
        pool: &PgPool,
        gig_id: Uuid,
        clipper_id: Uuid,
    ) -> Result<Self, sqlx::Error> {
        let application = sqlx::query_as::<_, Application>(
            r#"
            INSERT INTO applications (gig_id, clipper_id)
            VALUES ($1, $2)
            RETURNING id, gig_id, clipper_id, status, submitted_video_url,
                      video_public_id, submitted_at, review_note,
                      created_at, updated_at
            "#,
        )
        .bind(gig_id)
        .bind(clipper_id)
        .fetch_one(pool)
        .await?;

        Ok(application)
    }

    /// Finds a clipper's application to a gig, if any
    pub async fn find_by_gig_and_clipper(
        pool: &PgPool,
        gig_id: Uuid,
        clipper_id: Uuid,
    ) -> Result<Option<Self>, sqlx::Error> {
        let application = sqlx::query_as::<_, Application>(
            r#"
            SELECT id, gig_id, clipper_id, status, submitted_video_url,
                   video_public_id, submitted_at, review_note,
                   created_at, updated_at
            FROM applications
            WHERE gig_id = $1 AND clipper_id = $2
            "#,
        )
        .bind(gig_id)
        .bind(clipper_id)
        .fetch_optional(pool)
        .await?;

        Ok(application)
    }

    /// Finds an application by ID
    pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<Self>, sqlx::Error> {
        let application = sqlx::query_as::<_, Application>(
            r#"
            SELECT id, gig_id, clipper_id, status, submitted_video_url,
                   video_public_id, submitted_at, review_note,
                   created_at, updated_at
            FROM applications
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(pool)
        .await?;

        Ok(application)
    }

    /// Finds an application by ID scoped to its owning clipper
    ///
    /// Returns None for an application owned by someone else, so callers
    /// answer 404 without revealing that the row exists.
    pub async fn find_by_id_for_clipper(
        pool: &PgPool,
        id: Uuid,
        clipper_id: Uuid,
    ) -> Result<Option<Self>, sqlx::Error> {
        let application = sqlx::query_as::<_, Application>(
            r#"
            SELECT id, gig_id, clipper_id, status, submitted_video_url,
                   video_public_id, submitted_at, review_note,
                   created_at, updated_at
            FROM applications
            WHERE id = $1 AND clipper_id = $2
            "#,
        )
        .bind(id)
        .bind(clipper_id)
        .fetch_optional(pool)
        .await?;

        Ok(application)
    }

    /// Finds an application by ID scoped to its owning clipper, gig loaded
    ///
    /// Returns None for an application owned by someone else, so callers
    /// answer 404 without revealing that the row exists.
    pub async fn find_detail_for_clipper(
        pool: &PgPool,
        id: Uuid,
        clipper_id: Uuid,
    ) -> Result<Option<ApplicationWithGig>, sqlx::Error> {
        let query = format!("{APP_GIG_SELECT} WHERE a.id = $1 AND a.clipper_id = $2");

        let row = sqlx::query_as::<_, ApplicationGigRow>(&query)
            .bind(id)
            .bind(clipper_id)
            .fetch_optional(pool)
            .await?;

        Ok(row.map(Into::into))
    }

    /// Lists a clipper's applications, newest first, gigs loaded
    pub async fn list_for_clipper(
        pool: &PgPool,
        clipper_id: Uuid,
    ) -> Result<Vec<ApplicationWithGig>, sqlx::Error> {
        let query = format!("{APP_GIG_SELECT} WHERE a.clipper_id = $1 ORDER BY a.created_at DESC");

        let rows = sqlx::query_as::<_, ApplicationGigRow>(&query)
            .bind(clipper_id)
            .fetch_all(pool)
            .await?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    /// Lists all applications to a gig with clipper emails joined
    ///
    /// Caller is responsible for the gig-ownership check first.
    pub async fn list_for_gig(
        pool: &PgPool,
        gig_id: Uuid,
    ) -> Result<Vec<ApplicationWithClipper>, sqlx::Error> {
        let applications = sqlx::query_as::<_, ApplicationWithClipper>(
            r#"
            SELECT a.id, a.gig_id, a.clipper_id, a.status, a.submitted_video_url,
                   a.video_public_id, a.submitted_at, a.review_note,
                   a.created_at, a.updated_at,
                   u.email AS clipper_email
            FROM applications a
            JOIN users u ON u.id = a.clipper_id
            WHERE a.gig_id = $1
            ORDER BY a.created_at ASC
            "#,
        )
        .bind(gig_id)
        .fetch_all(pool)
        .await?;

        Ok(applications)
    }

    /// Moves an application from one status to another
    ///
    /// The current status is part of the WHERE clause, so a concurrent
    /// update that already moved the row makes this return None instead of
    /// silently clobbering. Legality of the transition is the caller's
    /// business via [`ApplicationStatus::can_transition_to`].
    pub async fn transition(
        pool: &PgPool,
        id: Uuid,
        from: ApplicationStatus,
        to: ApplicationStatus,
    ) -> Result<Option<Self>, sqlx::Error> {
        let application = sqlx::query_as::<_, Application>(
            r#"
            UPDATE applications
            SET status = $3, updated_at = NOW()
            WHERE id = $1 AND status = $2
            RETURNING id, gig_id, clipper_id, status, submitted_video_url,
                      video_public_id, submitted_at, review_note,
                      created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(from)
        .bind(to)
        .fetch_optional(pool)
        .await?;

        Ok(application)
    }

    /// Records a submitted clip and completes the application
    ///
    /// Guarded on ownership and on status being accepted or working, so a
    /// concurrent rejection cannot be overwritten by a late submission.
    /// Returns None if the guard fails.
    pub async fn submit_video(
        pool: &PgPool,
        id: Uuid,
        clipper_id: Uuid,
        video_url: &str,
        video_public_id: Option<&str>,
    ) -> Result<Option<Self>, sqlx::Error> {
        let application = sqlx::query_as::<_, Application>(
            r#"
            UPDATE applications
            SET submitted_video_url = $3,
                video_public_id = $4,
                submitted_at = NOW(),
                status = 'done',
                updated_at = NOW()
            WHERE id = $1 AND clipper_id = $2 AND status IN ('accepted', 'working')
            RETURNING id, gig_id, clipper_id, status, submitted_video_url,
                      video_public_id, submitted_at, review_note,
                      created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(clipper_id)
        .bind(video_url)
        .bind(video_public_id)
        .fetch_optional(pool)
        .await?;

        Ok(application)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_as_str() {
        assert_eq!(ApplicationStatus::Pending.as_str(), "PENDING");
        assert_eq!(ApplicationStatus::Accepted.as_str(), "ACCEPTED");
        assert_eq!(ApplicationStatus::Rejected.as_str(), "REJECTED");
        assert_eq!(ApplicationStatus::Working.as_str(), "WORKING");
        assert_eq!(ApplicationStatus::Done.as_str(), "DONE");
        assert_eq!(ApplicationStatus::ClipperDropped.as_str(), "CLIPPER_DROPPED");
    }

    #[test]
    fn test_status_wire_form() {
        assert_eq!(
            serde_json::to_string(&ApplicationStatus::ClipperDropped).unwrap(),
            "\"CLIPPER_DROPPED\""
        );
        let status: ApplicationStatus = serde_json::from_str("\"ACCEPTED\"").unwrap();
        assert_eq!(status, ApplicationStatus::Accepted);
        assert!(serde_json::from_str::<ApplicationStatus>("\"accepted\"").is_err());
    }

    #[test]
    fn test_status_is_terminal() {
        assert!(!ApplicationStatus::Pending.is_terminal());
        assert!(!ApplicationStatus::Accepted.is_terminal());
        assert!(!ApplicationStatus::Working.is_terminal());
        assert!(ApplicationStatus::Rejected.is_terminal());
        assert!(ApplicationStatus::Done.is_terminal());
        assert!(ApplicationStatus::ClipperDropped.is_terminal());
    }

    #[test]
    fn test_creator_settable_subset() {
        assert!(ApplicationStatus::Accepted.is_creator_settable());
        assert!(ApplicationStatus::Rejected.is_creator_settable());
        assert!(ApplicationStatus::Working.is_creator_settable());
        assert!(ApplicationStatus::Done.is_creator_settable());
        assert!(!ApplicationStatus::Pending.is_creator_settable());
        assert!(!ApplicationStatus::ClipperDropped.is_creator_settable());
    }

    #[test]
    fn test_legal_transitions() {
        use ApplicationStatus::*;

        assert!(Pending.can_transition_to(Accepted));
        assert!(Pending.can_transition_to(Rejected));
        assert!(Accepted.can_transition_to(Working));
        assert!(Accepted.can_transition_to(Done));
        assert!(Working.can_transition_to(Done));
    }

    #[test]
    fn test_illegal_transitions() {
        use ApplicationStatus::*;

        // No jumping the queue
        assert!(!Pending.can_transition_to(Working));
        assert!(!Pending.can_transition_to(Done));

        // No going backwards
        assert!(!Accepted.can_transition_to(Pending));
        assert!(!Working.can_transition_to(Accepted));

        // Terminal states stay terminal
        assert!(!Rejected.can_transition_to(Accepted));
        assert!(!Done.can_transition_to(Working));
        assert!(!ClipperDropped.can_transition_to(Pending));

        // Nothing transitions into clipper_dropped
        assert!(!Pending.can_transition_to(ClipperDropped));
        assert!(!Accepted.can_transition_to(ClipperDropped));
        assert!(!Working.can_transition_to(ClipperDropped));
    }

    #[test]
    fn test_accepts_submission() {
        assert!(ApplicationStatus::Accepted.accepts_submission());
        assert!(ApplicationStatus::Working.accepts_submission());
        assert!(!ApplicationStatus::Pending.accepts_submission());
        assert!(!ApplicationStatus::Rejected.accepts_submission());
        assert!(!ApplicationStatus::Done.accepts_submission());
    }

    #[test]
    fn test_gig_ref_id() {
        let id = Uuid::new_v4();
        assert_eq!(GigRef::Id(id).id(), id);
    }

    #[test]
    fn test_gig_ref_serializes_untagged() {
        let id = Uuid::new_v4();
        let json = serde_json::to_value(GigRef::Id(id)).unwrap();
        assert_eq!(json, serde_json::Value::String(id.to_string()));
    }
}
