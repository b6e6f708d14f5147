use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use super::job::JobDetails;
use super::user::{TalentSummary, UserSummary};

/// Status of a match.
/// Corresponds to the `match_status` SQL enum.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Hash, Default, sqlx::Type)]
#[sqlx(type_name = "match_status")]
pub enum MatchStatus {
    /// The talent is currently assigned to the job.
    #[default]
    Active,
    /// The assignment is over. Counted as "completed" on dashboards.
    Inactive,
}

/// A match row linking one job to one talent.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Match {
    pub id: Uuid,
    pub job_id: Uuid,
    pub user_id: Uuid,
    /// The admin who created the match.
    pub matched_by: Uuid,
    pub status: MatchStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Match {
    /// Creates a new active match.
    pub fn new(job_id: Uuid, user_id: Uuid, matched_by: Uuid) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            job_id,
            user_id,
            matched_by,
            status: MatchStatus::Active,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn is_active(&self) -> bool {
        self.status == MatchStatus::Active
    }

    pub fn is_completed(&self) -> bool {
        self.status == MatchStatus::Inactive
    }
}

/// Request body for matching a talent to a job.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchInput {
    pub job_id: Uuid,
    pub user_id: Uuid,
}

/// A match joined with its job (and the job's creator), the talent and the admin.
///
/// `job` is `None` once the job has been deleted; the match itself is kept.
/// `user` is left out of talent-facing listings, where the talent is the caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchDetails {
    pub id: Uuid,
    pub job: Option<JobDetails>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub user: Option<TalentSummary>,
    pub matched_by: UserSummary,
    pub status: MatchStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Optional filters for the admin match listing. Unset fields match everything.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchQuery {
    pub job_id: Option<Uuid>,
    pub user_id: Option<Uuid>,
    pub status: Option<MatchStatus>,
}

impl MatchQuery {
    pub fn accepts(&self, m: &MatchDetails) -> bool {
        self
            .job_id
            .map_or(true, |id| m.job.as_ref().is_some_and(|j| j.id == id))
            && self
                .user_id
                .map_or(true, |id| m.user.as_ref().is_some_and(|u| u.id == id))
            && self.status.map_or(true, |status| m.status == status)
    }
}

/// Which of a talent's matches to list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchFilter {
    /// Active matches only, in natural store order.
    ActiveOnly,
    /// Every match, newest first.
    AllNewestFirst,
}
