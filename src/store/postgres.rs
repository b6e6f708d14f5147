use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::postgres::PgPoolOptions;
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use super::{AdminSnapshot, Store, StoreError, TalentSnapshot};
use crate::models::{
    Job, JobDetails, Match, MatchDetails, MatchFilter, MatchStatus, TalentSummary, User,
    UserSummary,
};

pub(crate) const MATCH_PAIR_CONSTRAINT: &str = "matches_job_id_user_id_key";
pub(crate) const USER_EMAIL_CONSTRAINT: &str = "users_email_key";
pub(crate) const FOREIGN_KEY_VIOLATION: &str = "23503";

const USER_COLUMNS: &str = "id, name, email, password_hash, role, skills, location, \
     is_email_verified, email_verification_code, email_verification_expires_at, \
     password_reset_token_hash, password_reset_expires_at, created_at, updated_at";

const JOB_COLUMNS: &str =
    "id, title, description, required_skills, location, created_by, created_at, updated_at";

const MATCH_COLUMNS: &str = "id, job_id, user_id, matched_by, status, created_at, updated_at";

const JOB_DETAILS_SELECT: &str = "SELECT j.id, j.title, j.description, j.required_skills, \
     j.location, j.created_at, j.updated_at, \
     c.id AS creator_id, c.name AS creator_name, c.email AS creator_email \
     FROM jobs j JOIN users c ON c.id = j.created_by";

const MATCH_DETAILS_SELECT: &str = "SELECT m.id, m.status, m.created_at, m.updated_at, \
     j.id AS job_id, j.title AS job_title, j.description AS job_description, \
     j.required_skills AS job_required_skills, j.location AS job_location, \
     j.created_at AS job_created_at, j.updated_at AS job_updated_at, \
     c.id AS creator_id, c.name AS creator_name, c.email AS creator_email, \
     u.id AS talent_id, u.name AS talent_name, u.email AS talent_email, \
     u.skills AS talent_skills, u.location AS talent_location, \
     a.id AS admin_id, a.name AS admin_name, a.email AS admin_email \
     FROM matches m \
     LEFT JOIN jobs j ON j.id = m.job_id \
     LEFT JOIN users c ON c.id = j.created_by \
     JOIN users u ON u.id = m.user_id \
     JOIN users a ON a.id = m.matched_by";

/// Flat row produced by `JOB_DETAILS_SELECT`.
#[derive(Debug, FromRow)]
struct JobDetailsRow {
    id: Uuid,
    title: String,
    description: String,
    required_skills: Vec<String>,
    location: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    creator_id: Uuid,
    creator_name: String,
    creator_email: String,
}

impl From<JobDetailsRow> for JobDetails {
    fn from(row: JobDetailsRow) -> Self {
        JobDetails {
            id: row.id,
            title: row.title,
            description: row.description,
            required_skills: row.required_skills,
            location: row.location,
            created_by: UserSummary {
                id: row.creator_id,
                name: row.creator_name,
                email: row.creator_email,
            },
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

/// Flat row produced by `MATCH_DETAILS_SELECT`. Job columns are null when the
/// job has been deleted.
#[derive(Debug, FromRow)]
struct MatchDetailsRow {
    id: Uuid,
    status: MatchStatus,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    job_id: Option<Uuid>,
    job_title: Option<String>,
    job_description: Option<String>,
    job_required_skills: Option<Vec<String>>,
    job_location: Option<String>,
    job_created_at: Option<DateTime<Utc>>,
    job_updated_at: Option<DateTime<Utc>>,
    creator_id: Option<Uuid>,
    creator_name: Option<String>,
    creator_email: Option<String>,
    talent_id: Uuid,
    talent_name: String,
    talent_email: String,
    talent_skills: Vec<String>,
    talent_location: String,
    admin_id: Uuid,
    admin_name: String,
    admin_email: String,
}

impl MatchDetailsRow {
    fn job(&mut self) -> Option<JobDetails> {
        Some(JobDetails {
            id: self.job_id?,
            title: self.job_title.take()?,
            description: self.job_description.take()?,
            required_skills: self.job_required_skills.take()?,
            location: self.job_location.take()?,
            created_by: UserSummary {
                id: self.creator_id?,
                name: self.creator_name.take()?,
                email: self.creator_email.take()?,
            },
            created_at: self.job_created_at?,
            updated_at: self.job_updated_at?,
        })
    }

    fn into_details(mut self, with_user: bool) -> MatchDetails {
        let job = self.job();
        let user = with_user.then(|| TalentSummary {
            id: self.talent_id,
            name: self.talent_name,
            email: self.talent_email,
            skills: self.talent_skills,
            location: self.talent_location,
        });
        MatchDetails {
            id: self.id,
            job,
            user,
            matched_by: UserSummary {
                id: self.admin_id,
                name: self.admin_name,
                email: self.admin_email,
            },
            status: self.status,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

/// PostgreSQL-backed store.
///
/// Uniqueness and user references are enforced by the schema in
/// `migrations/`; a match's job is checked on insert. Snapshots are read inside
/// a `REPEATABLE READ` read-only transaction so all tables reflect the same
/// instant.
#[derive(Debug, Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Connects to `database_url` and applies pending migrations.
    pub async fn connect(database_url: &str, max_connections: u32) -> Result<Self, StoreError> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .acquire_timeout(Duration::from_secs(5))
            .connect(database_url)
            .await?;

        sqlx::migrate!("./migrations")
            .run(&pool)
            .await
            .map_err(|e| StoreError::Database(format!("migration failed: {}", e)))?;

        Ok(Self { pool })
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[async_trait]
impl Store for PgStore {
    async fn insert_user(&self, user: &User) -> Result<(), StoreError> {
        sqlx::query(&format!(
            "INSERT INTO users ({}) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14)",
            USER_COLUMNS
        ))
        .bind(user.id)
        .bind(&user.name)
        .bind(&user.email)
        .bind(&user.password_hash)
        .bind(user.role)
        .bind(&user.skills)
        .bind(&user.location)
        .bind(user.is_email_verified)
        .bind(&user.email_verification_code)
        .bind(user.email_verification_expires_at)
        .bind(&user.password_reset_token_hash)
        .bind(user.password_reset_expires_at)
        .bind(user.created_at)
        .bind(user.updated_at)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn update_user(&self, user: &User) -> Result<bool, StoreError> {
        // Role and created_at are never rewritten.
        let result = sqlx::query(
            "UPDATE users SET name = $2, email = $3, password_hash = $4, skills = $5, \
             location = $6, is_email_verified = $7, email_verification_code = $8, \
             email_verification_expires_at = $9, password_reset_token_hash = $10, \
             password_reset_expires_at = $11, updated_at = $12 \
             WHERE id = $1",
        )
        .bind(user.id)
        .bind(&user.name)
        .bind(&user.email)
        .bind(&user.password_hash)
        .bind(&user.skills)
        .bind(&user.location)
        .bind(user.is_email_verified)
        .bind(&user.email_verification_code)
        .bind(user.email_verification_expires_at)
        .bind(&user.password_reset_token_hash)
        .bind(user.password_reset_expires_at)
        .bind(user.updated_at)
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn find_user(&self, id: Uuid) -> Result<Option<User>, StoreError> {
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {} FROM users WHERE id = $1",
            USER_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(user)
    }

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {} FROM users WHERE email = $1",
            USER_COLUMNS
        ))
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;
        Ok(user)
    }

    async fn find_user_by_reset_token(
        &self,
        token_hash: &str,
        now: DateTime<Utc>,
    ) -> Result<Option<User>, StoreError> {
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {} FROM users \
             WHERE password_reset_token_hash = $1 AND password_reset_expires_at > $2",
            USER_COLUMNS
        ))
        .bind(token_hash)
        .bind(now)
        .fetch_optional(&self.pool)
        .await?;
        Ok(user)
    }

    async fn list_users(&self) -> Result<Vec<User>, StoreError> {
        let users = sqlx::query_as::<_, User>(&format!(
            "SELECT {} FROM users ORDER BY created_at",
            USER_COLUMNS
        ))
        .fetch_all(&self.pool)
        .await?;
        Ok(users)
    }

    async fn insert_job(&self, job: &Job) -> Result<(), StoreError> {
        sqlx::query(&format!(
            "INSERT INTO jobs ({}) VALUES ($1, $2, $3, $4, $5, $6, $7, $8)",
            JOB_COLUMNS
        ))
        .bind(job.id)
        .bind(&job.title)
        .bind(&job.description)
        .bind(&job.required_skills)
        .bind(&job.location)
        .bind(job.created_by)
        .bind(job.created_at)
        .bind(job.updated_at)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn update_job(&self, job: &Job) -> Result<bool, StoreError> {
        let result = sqlx::query(
            "UPDATE jobs SET title = $2, description = $3, required_skills = $4, \
             location = $5, updated_at = $6 WHERE id = $1",
        )
        .bind(job.id)
        .bind(&job.title)
        .bind(&job.description)
        .bind(&job.required_skills)
        .bind(&job.location)
        .bind(job.updated_at)
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn delete_job(&self, id: Uuid) -> Result<bool, StoreError> {
        // Matches keep their job_id; their job projection becomes null.
        let result = sqlx::query("DELETE FROM jobs WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn find_job(&self, id: Uuid) -> Result<Option<Job>, StoreError> {
        let job = sqlx::query_as::<_, Job>(&format!(
            "SELECT {} FROM jobs WHERE id = $1",
            JOB_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(job)
    }

    async fn job_details(&self, id: Uuid) -> Result<Option<JobDetails>, StoreError> {
        let row = sqlx::query_as::<_, JobDetailsRow>(&format!(
            "{} WHERE j.id = $1",
            JOB_DETAILS_SELECT
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row.map(JobDetails::from))
    }

    async fn list_job_details(&self) -> Result<Vec<JobDetails>, StoreError> {
        let rows = sqlx::query_as::<_, JobDetailsRow>(&format!(
            "{} ORDER BY j.created_at DESC",
            JOB_DETAILS_SELECT
        ))
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.into_iter().map(JobDetails::from).collect())
    }

    async fn insert_match(&self, m: &Match) -> Result<(), StoreError> {
        // A concurrent duplicate fails on matches_job_id_user_id_key. job_id has
        // no foreign key, so the job is checked here.
        let result = sqlx::query(&format!(
            "INSERT INTO matches ({}) SELECT $1, $2, $3, $4, $5, $6, $7 \
             WHERE EXISTS (SELECT 1 FROM jobs WHERE id = $2)",
            MATCH_COLUMNS
        ))
        .bind(m.id)
        .bind(m.job_id)
        .bind(m.user_id)
        .bind(m.matched_by)
        .bind(m.status)
        .bind(m.created_at)
        .bind(m.updated_at)
        .execute(&self.pool)
        .await?;
        if result.rows_affected() == 0 {
            return Err(StoreError::MissingReference);
        }
        Ok(())
    }

    async fn find_match(&self, id: Uuid) -> Result<Option<Match>, StoreError> {
        let m = sqlx::query_as::<_, Match>(&format!(
            "SELECT {} FROM matches WHERE id = $1",
            MATCH_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(m)
    }

    async fn transition_match(
        &self,
        id: Uuid,
        from: MatchStatus,
        to: MatchStatus,
    ) -> Result<bool, StoreError> {
        let result = sqlx::query(
            "UPDATE matches SET status = $3, updated_at = NOW() WHERE id = $1 AND status = $2",
        )
        .bind(id)
        .bind(from)
        .bind(to)
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn match_details(&self, id: Uuid) -> Result<Option<MatchDetails>, StoreError> {
        let row = sqlx::query_as::<_, MatchDetailsRow>(&format!(
            "{} WHERE m.id = $1",
            MATCH_DETAILS_SELECT
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row.map(|r| r.into_details(true)))
    }

    async fn list_match_details(&self) -> Result<Vec<MatchDetails>, StoreError> {
        let rows = sqlx::query_as::<_, MatchDetailsRow>(MATCH_DETAILS_SELECT)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows.into_iter().map(|r| r.into_details(true)).collect())
    }

    async fn list_match_details_for_user(
        &self,
        user_id: Uuid,
        filter: MatchFilter,
    ) -> Result<Vec<MatchDetails>, StoreError> {
        let sql = match filter {
            MatchFilter::ActiveOnly => format!(
                "{} WHERE m.user_id = $1 AND m.status = 'Active'",
                MATCH_DETAILS_SELECT
            ),
            MatchFilter::AllNewestFirst => format!(
                "{} WHERE m.user_id = $1 ORDER BY m.created_at DESC",
                MATCH_DETAILS_SELECT
            ),
        };
        let rows = sqlx::query_as::<_, MatchDetailsRow>(&sql)
            .bind(user_id)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows.into_iter().map(|r| r.into_details(false)).collect())
    }

    async fn admin_snapshot(&self) -> Result<AdminSnapshot, StoreError> {
        let mut tx = self.pool.begin().await?;
        sqlx::query("SET TRANSACTION ISOLATION LEVEL REPEATABLE READ READ ONLY")
            .execute(&mut *tx)
            .await?;

        let users = sqlx::query_as::<_, User>(&format!("SELECT {} FROM users", USER_COLUMNS))
            .fetch_all(&mut *tx)
            .await?;
        let jobs = sqlx::query_as::<_, Job>(&format!("SELECT {} FROM jobs", JOB_COLUMNS))
            .fetch_all(&mut *tx)
            .await?;
        let matches =
            sqlx::query_as::<_, Match>(&format!("SELECT {} FROM matches", MATCH_COLUMNS))
                .fetch_all(&mut *tx)
                .await?;

        tx.commit().await?;
        Ok(AdminSnapshot {
            users,
            jobs,
            matches,
        })
    }

    async fn talent_snapshot(&self, user_id: Uuid) -> Result<Option<TalentSnapshot>, StoreError> {
        let mut tx = self.pool.begin().await?;
        sqlx::query("SET TRANSACTION ISOLATION LEVEL REPEATABLE READ READ ONLY")
            .execute(&mut *tx)
            .await?;

        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {} FROM users WHERE id = $1",
            USER_COLUMNS
        ))
        .bind(user_id)
        .fetch_optional(&mut *tx)
        .await?;

        let Some(user) = user else {
            tx.rollback().await?;
            return Ok(None);
        };

        let matches = sqlx::query_as::<_, Match>(&format!(
            "SELECT {} FROM matches WHERE user_id = $1",
            MATCH_COLUMNS
        ))
        .bind(user_id)
        .fetch_all(&mut *tx)
        .await?;
        let jobs = sqlx::query_as::<_, Job>(&format!("SELECT {} FROM jobs", JOB_COLUMNS))
            .fetch_all(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(Some(TalentSnapshot {
            user,
            matches,
            jobs,
        }))
    }
}
