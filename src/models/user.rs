use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;
use validator::Validate;

use super::clean_skills;

/// Role of a user account.
/// Corresponds to the `user_role` SQL enum. A role never changes after registration.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Hash, Default, sqlx::Type)]
#[sqlx(type_name = "user_role")]
pub enum Role {
    /// Can be matched to jobs and sees their own dashboard.
    #[default]
    Talent,
    /// Manages jobs and matches and sees system-wide statistics.
    Admin,
}

/// A user record as persisted by the store.
///
/// This type carries credentials and one-time secrets, so it is never serialized
/// directly. Use one of the projections below at the API boundary.
#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub role: Role,
    pub skills: Vec<String>,
    pub location: String,
    pub is_email_verified: bool,
    pub email_verification_code: Option<String>,
    pub email_verification_expires_at: Option<DateTime<Utc>>,
    pub password_reset_token_hash: Option<String>,
    pub password_reset_expires_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Fields needed to construct a new user. The password must already be hashed.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub role: Role,
    pub skills: Vec<String>,
    pub location: String,
}

impl User {
    /// Builds an unverified user with fresh identifiers and timestamps.
    pub fn new(input: NewUser) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            name: input.name.trim().to_string(),
            email: normalize_email(&input.email),
            password_hash: input.password_hash,
            role: input.role,
            skills: clean_skills(input.skills),
            location: input.location.trim().to_string(),
            is_email_verified: false,
            email_verification_code: None,
            email_verification_expires_at: None,
            password_reset_token_hash: None,
            password_reset_expires_at: None,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn is_talent(&self) -> bool {
        self.role == Role::Talent
    }

    /// Applies a partial profile update. Empty or missing fields are left unchanged.
    pub fn apply_update(&mut self, update: ProfileUpdate) {
        if let Some(name) = update.name.filter(|n| !n.trim().is_empty()) {
            self.name = name.trim().to_string();
        }
        if let Some(location) = update.location.filter(|l| !l.trim().is_empty()) {
            self.location = location.trim().to_string();
        }
        if let Some(skills) = update.skills {
            self.skills = clean_skills(skills);
        }
        self.updated_at = Utc::now();
    }
}

/// Emails are stored trimmed and lowercased so lookups are case-insensitive.
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Minimal reference to a user, used for a job's creator and a match's admin.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserSummary {
    pub id: Uuid,
    pub name: String,
    pub email: String,
}

/// The talent side of a match, as shown to admins.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TalentSummary {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub skills: Vec<String>,
    pub location: String,
}

/// Public view of an account, returned by `/auth/me` and the admin user list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub role: Role,
    pub skills: Vec<String>,
    pub location: String,
    pub is_email_verified: bool,
    pub created_at: DateTime<Utc>,
}

impl From<&User> for UserProfile {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            name: user.name.clone(),
            email: user.email.clone(),
            role: user.role,
            skills: user.skills.clone(),
            location: user.location.clone(),
            is_email_verified: user.is_email_verified,
            created_at: user.created_at,
        }
    }
}

impl From<&User> for UserSummary {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            name: user.name.clone(),
            email: user.email.clone(),
        }
    }
}

impl From<&User> for TalentSummary {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            name: user.name.clone(),
            email: user.email.clone(),
            skills: user.skills.clone(),
            location: user.location.clone(),
        }
    }
}

/// Partial update of the caller's own profile.
#[derive(Debug, Default, Deserialize, Validate)]
pub struct ProfileUpdate {
    #[validate(length(max = 100))]
    pub name: Option<String>,
    #[validate(length(max = 200))]
    pub location: Option<String>,
    pub skills: Option<Vec<String>>,
}
