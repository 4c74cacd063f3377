/// Gig model and database operations
///
/// A gig is a video-editing job posted by a creator. Gigs default to OPEN;
/// CLOSED exists in the schema but no operation currently closes a gig, so
/// open-gig listings are filtered on status rather than trusting the data.
///
/// # Schema
///
/// ```sql
/// CREATE TYPE gig_status AS ENUM ('open', 'closed');
/// CREATE TYPE gig_difficulty AS ENUM ('easy', 'medium', 'hard');
///
/// CREATE TABLE gigs (
///     id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
///     creator_id UUID NOT NULL REFERENCES users(id) ON DELETE CASCADE,
///     title VARCHAR(255) NOT NULL,
///     description TEXT NOT NULL,
///     pay DOUBLE PRECISION NOT NULL CHECK (pay >= 0),
///     requirements TEXT NOT NULL,
///     difficulty gig_difficulty NOT NULL,
///     status gig_status NOT NULL DEFAULT 'open',
///     image_url VARCHAR(512),
///     image_public_id VARCHAR(255),
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// );
/// ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

/// Gig publication status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "gig_status", rename_all = "lowercase")]
#[serde(rename_all = "UPPERCASE")]
pub enum GigStatus {
    /// Accepting applications
    Open,

    /// No longer accepting applications
    Closed,
}

impl GigStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            GigStatus::Open => "OPEN",
            GigStatus::Closed => "CLOSED",
        }
    }
}

/// Gig difficulty rating
///
/// Wire form is capitalized (`"Easy"` / `"Medium"` / `"Hard"`). Clients
/// send it in arbitrary casing, so creation goes through [`Difficulty::parse`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "gig_difficulty", rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

impl Difficulty {
    /// Parses a difficulty string case-insensitively
    ///
    /// `"EASY"`, `"easy"` and `"Easy"` all parse to [`Difficulty::Easy`].
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "easy" => Some(Difficulty::Easy),
            "medium" => Some(Difficulty::Medium),
            "hard" => Some(Difficulty::Hard),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Easy => "Easy",
            Difficulty::Medium => "Medium",
            Difficulty::Hard => "Hard",
        }
    }
}

/// Gig posted by a creator
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Gig {
    /// Unique gig ID
    pub id: Uuid,

    /// Owning creator
    pub creator_id: Uuid,

    /// Short title
    pub title: String,

    /// Full description
    pub description: String,

    /// Payment offered (non-negative)
    pub pay: f64,

    /// What the creator expects from submissions
    pub requirements: String,

    /// Difficulty rating
    pub difficulty: Difficulty,

    /// OPEN or CLOSED
    pub status: GigStatus,

    /// Optional cover image URL
    pub image_url: Option<String>,

    /// Object-storage public ID for the cover image
    pub image_public_id: Option<String>,

    /// When the gig was posted
    pub created_at: DateTime<Utc>,

    /// When the gig was last updated
    pub updated_at: DateTime<Utc>,
}

/// Input for creating a new gig
#[derive(Debug, Clone)]
pub struct CreateGig {
    pub creator_id: Uuid,
    pub title: String,
    pub description: String,
    pub pay: f64,
    pub requirements: String,
    pub difficulty: Difficulty,
    pub image_url: Option<String>,
    pub image_public_id: Option<String>,
}

/// Gig row joined with a summary of its creator
///
/// Used by the open-gig listing so clippers see who posted each gig
/// without a second query per row.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct GigWithCreator {
    pub id: Uuid,
    pub creator_id: Uuid,
    pub title: String,
    pub description: String,
    pub pay: f64,
    pub requirements: String,
    pub difficulty: Difficulty,
    pub status: GigStatus,
    pub image_url: Option<String>,
    pub image_public_id: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub creator_email: String,
    pub creator_first_name: Option<String>,
    pub creator_last_name: Option<String>,
    pub creator_avatar_url: Option<String>,
}

impl Gig {
    /// Creates a new gig in OPEN status
    pub async fn create(pool: &PgPool, data: CreateGig) -> Result<Self, sqlx::Error> {
        let gig = sqlx::query_as::<_, Gig>(
            r#"
            INSERT INTO gigs (creator_id, title, description, pay, requirements,
                              difficulty, image_url, image_public_id)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING id, creator_id, title, description, pay, requirements,
                      difficulty, status, image_url, image_public_id,
                      created_at, updated_at
            "#,
        )
        .bind(data.creator_id)
        .bind(data.title)
        .bind(data.description)
        .bind(data.pay)
        .bind(data.requirements)
        .bind(data.difficulty)
        .bind(data.image_url)
        .bind(data.image_public_id)
        .fetch_one(pool)
        .await?;

        Ok(gig)
    }

    /// Finds a gig by ID
    pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<Self>, sqlx::Error> {
        let gig = sqlx::query_as::<_, Gig>(
            r#"
            SELECT id, creator_id, title, description, pay, requirements,
                   difficulty, status, image_url, image_public_id,
                   created_at, updated_at
            FROM gigs
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(pool)
        .await?;

        Ok(gig)
    }

    /// Finds a gig by ID only if it is owned by the given creator
    ///
    /// The ownership check for creator-side application operations.
    pub async fn find_by_id_and_creator(
        pool: &PgPool,
        id: Uuid,
        creator_id: Uuid,
    ) -> Result<Option<Self>, sqlx::Error> {
        let gig = sqlx::query_as::<_, Gig>(
            r#"
            SELECT id, creator_id, title, description, pay, requirements,
                   difficulty, status, image_url, image_public_id,
                   created_at, updated_at
            FROM gigs
            WHERE id = $1 AND creator_id = $2
            "#,
        )
        .bind(id)
        .bind(creator_id)
        .fetch_optional(pool)
        .await?;

        Ok(gig)
    }

    /// Lists all OPEN gigs with their creator summary joined in
    ///
    /// No server-side pagination or sorting; clients filter in memory.
    pub async fn list_open_with_creator(pool: &PgPool) -> Result<Vec<GigWithCreator>, sqlx::Error> {
        let gigs = sqlx::query_as::<_, GigWithCreator>(
            r#"
            SELECT g.id, g.creator_id, g.title, g.description, g.pay,
                   g.requirements, g.difficulty, g.status, g.image_url,
                   g.image_public_id, g.created_at, g.updated_at,
                   u.email AS creator_email,
                   u.first_name AS creator_first_name,
                   u.last_name AS creator_last_name,
                   u.avatar_url AS creator_avatar_url
            FROM gigs g
            JOIN users u ON u.id = g.creator_id
            WHERE g.status = 'open'
            "#,
        )
        .fetch_all(pool)
        .await?;

        Ok(gigs)
    }

    /// Lists all gigs owned by a creator, regardless of status
    pub async fn list_by_creator(pool: &PgPool, creator_id: Uuid) -> Result<Vec<Self>, sqlx::Error> {
        let gigs = sqlx::query_as::<_, Gig>(
            r#"
            SELECT id, creator_id, title, description, pay, requirements,
                   difficulty, status, image_url, image_public_id,
                   created_at, updated_at
            FROM gigs
            WHERE creator_id = $1
            ORDER BY created_at DESC
            "#,
        )
        .bind(creator_id)
        .fetch_all(pool)
        .await?;

        Ok(gigs)
    }
}
