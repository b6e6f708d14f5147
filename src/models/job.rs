use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;
use validator::Validate;

use super::clean_skills;
use super::user::UserSummary;

/// Input structure for creating or updating a job.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct JobInput {
    /// Must be between 1 and 200 characters.
    #[validate(length(min = 1, max = 200))]
    pub title: String,

    /// Must be between 1 and 5000 characters.
    #[validate(length(min = 1, max = 5000))]
    pub description: String,

    /// Skills a talent needs for this job. Defaults to none.
    #[serde(default)]
    pub required_skills: Vec<String>,

    #[validate(length(min = 1, max = 200))]
    pub location: String,
}

/// A job posting as stored in the database.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Job {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub required_skills: Vec<String>,
    pub location: String,
    /// Identifier of the admin who posted the job.
    pub created_by: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Job {
    /// Creates a new `Job` from `JobInput` and the posting admin's id.
    pub fn new(input: JobInput, created_by: Uuid) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            title: input.title.trim().to_string(),
            description: input.description.trim().to_string(),
            required_skills: clean_skills(input.required_skills),
            location: input.location.trim().to_string(),
            created_by,
            created_at: now,
            updated_at: now,
        }
    }

    /// Replaces every editable field. The creator is kept.
    pub fn apply(&mut self, input: JobInput) {
        self.title = input.title.trim().to_string();
        self.description = input.description.trim().to_string();
        self.required_skills = clean_skills(input.required_skills);
        self.location = input.location.trim().to_string();
        self.updated_at = Utc::now();
    }

    /// True when any required skill appears in `skills`.
    pub fn requires_any_of(&self, skills: &[String]) -> bool {
        self.required_skills.iter().any(|s| skills.contains(s))
    }

    /// Case-insensitive substring match of `location` against this job's location.
    pub fn is_located_in(&self, location: &str) -> bool {
        self.location
            .to_lowercase()
            .contains(&location.to_lowercase())
    }
}

/// A job joined with its creator, as returned by the API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobDetails {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub required_skills: Vec<String>,
    pub location: String,
    pub created_by: UserSummary,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl JobDetails {
    pub fn new(job: Job, created_by: UserSummary) -> Self {
        Self {
            id: job.id,
            title: job.title,
            description: job.description,
            required_skills: job.required_skills,
            location: job.location,
            created_by,
            created_at: job.created_at,
            updated_at: job.updated_at,
        }
    }
}
