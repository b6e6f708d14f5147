//!
//! # Entity Store
//!
//! The store is the single source of truth for users, jobs and matches. Everything
//! above it (the matching engine, the statistics aggregator, the account use cases)
//! receives a `&dyn Store` and holds no state of its own.
//!
//! Two implementations are provided: [`PgStore`] backed by PostgreSQL, and
//! [`MemoryStore`] which keeps everything behind one lock in process. Both enforce
//! the same constraints: unique emails, one match per `(job, user)` pair, and
//! references that must resolve.

pub mod memory;
pub mod postgres;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use thiserror::Error;
use uuid::Uuid;

use crate::models::{Job, JobDetails, Match, MatchDetails, MatchFilter, MatchStatus, User};

pub use memory::MemoryStore;
pub use postgres::PgStore;

/// Failures reported by a store backend.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The `(job_id, user_id)` uniqueness key was violated.
    #[error("a match for this job and user already exists")]
    DuplicateMatch,

    /// The email uniqueness key was violated.
    #[error("email already registered")]
    DuplicateEmail,

    /// A referenced job or user does not exist.
    #[error("referenced record does not exist")]
    MissingReference,

    #[error("database error: {0}")]
    Database(String),
}

impl From<sqlx::Error> for StoreError {
    fn from(error: sqlx::Error) -> Self {
        if let sqlx::Error::Database(db) = &error {
            match db.constraint() {
                Some(postgres::MATCH_PAIR_CONSTRAINT) => return StoreError::DuplicateMatch,
                Some(postgres::USER_EMAIL_CONSTRAINT) => return StoreError::DuplicateEmail,
                _ => {}
            }
            if db.code().as_deref() == Some(postgres::FOREIGN_KEY_VIOLATION) {
                return StoreError::MissingReference;
            }
        }
        StoreError::Database(error.to_string())
    }
}

/// Every user, job and match, read at one point in time.
#[derive(Debug, Clone, Default)]
pub struct AdminSnapshot {
    pub users: Vec<User>,
    pub jobs: Vec<Job>,
    pub matches: Vec<Match>,
}

/// One talent with their own matches and every job, read at one point in time.
#[derive(Debug, Clone)]
pub struct TalentSnapshot {
    pub user: User,
    pub matches: Vec<Match>,
    pub jobs: Vec<Job>,
}

/// Persistence capability consumed by the rest of the crate.
///
/// Update and delete methods return `false` when the target row does not exist.
/// Listing methods that join matches with jobs and users read a single consistent
/// view of the data.
#[async_trait]
pub trait Store: Send + Sync {
    async fn insert_user(&self, user: &User) -> Result<(), StoreError>;
    async fn update_user(&self, user: &User) -> Result<bool, StoreError>;
    async fn find_user(&self, id: Uuid) -> Result<Option<User>, StoreError>;
    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, StoreError>;
    /// Finds the user holding `token_hash` whose reset window is still open at `now`.
    async fn find_user_by_reset_token(
        &self,
        token_hash: &str,
        now: DateTime<Utc>,
    ) -> Result<Option<User>, StoreError>;
    async fn list_users(&self) -> Result<Vec<User>, StoreError>;

    async fn insert_job(&self, job: &Job) -> Result<(), StoreError>;
    async fn update_job(&self, job: &Job) -> Result<bool, StoreError>;
    /// Deletes a job. Its matches are kept and keep referencing the job id.
    async fn delete_job(&self, id: Uuid) -> Result<bool, StoreError>;
    async fn find_job(&self, id: Uuid) -> Result<Option<Job>, StoreError>;
    async fn job_details(&self, id: Uuid) -> Result<Option<JobDetails>, StoreError>;
    async fn list_job_details(&self) -> Result<Vec<JobDetails>, StoreError>;

    /// Inserts a match, rejecting a second match for the same `(job, user)` pair
    /// with [`StoreError::DuplicateMatch`] even under concurrent writers, and a
    /// missing job or user with [`StoreError::MissingReference`].
    async fn insert_match(&self, m: &Match) -> Result<(), StoreError>;
    async fn find_match(&self, id: Uuid) -> Result<Option<Match>, StoreError>;
    /// Moves a match from `from` to `to`. Returns `false` if the match is not in `from`.
    async fn transition_match(
        &self,
        id: Uuid,
        from: MatchStatus,
        to: MatchStatus,
    ) -> Result<bool, StoreError>;
    async fn match_details(&self, id: Uuid) -> Result<Option<MatchDetails>, StoreError>;
    async fn list_match_details(&self) -> Result<Vec<MatchDetails>, StoreError>;
    /// A talent's matches without the talent projection.
    async fn list_match_details_for_user(
        &self,
        user_id: Uuid,
        filter: MatchFilter,
    ) -> Result<Vec<MatchDetails>, StoreError>;

    async fn admin_snapshot(&self) -> Result<AdminSnapshot, StoreError>;
    /// `None` when the user does not exist.
    async fn talent_snapshot(&self, user_id: Uuid) -> Result<Option<TalentSnapshot>, StoreError>;
}
