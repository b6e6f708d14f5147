use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use super::{AdminSnapshot, Store, StoreError, TalentSnapshot};
use crate::models::{
    Job, JobDetails, Match, MatchDetails, MatchFilter, MatchStatus, TalentSummary, User,
    UserSummary,
};

#[derive(Debug, Default)]
struct Tables {
    users: Vec<User>,
    jobs: Vec<Job>,
    matches: Vec<Match>,
}

impl Tables {
    fn user(&self, id: Uuid) -> Option<&User> {
        self.users.iter().find(|u| u.id == id)
    }

    fn job(&self, id: Uuid) -> Option<&Job> {
        self.jobs.iter().find(|j| j.id == id)
    }

    fn job_details(&self, job: &Job) -> Option<JobDetails> {
        let creator = self.user(job.created_by)?;
        Some(JobDetails::new(job.clone(), UserSummary::from(creator)))
    }

    fn match_details(&self, m: &Match, with_user: bool) -> Option<MatchDetails> {
        let job = self.job(m.job_id).and_then(|job| self.job_details(job));
        let talent = self.user(m.user_id)?;
        let admin = self.user(m.matched_by)?;
        Some(MatchDetails {
            id: m.id,
            job,
            user: with_user.then(|| TalentSummary::from(talent)),
            matched_by: UserSummary::from(admin),
            status: m.status,
            created_at: m.created_at,
            updated_at: m.updated_at,
        })
    }
}

/// In-process store. All tables sit behind one lock, so each call observes a
/// single consistent state and writes are serialized.
#[derive(Debug, Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, Tables>, StoreError> {
        self.tables
            .read()
            .map_err(|_| StoreError::Database("memory store lock poisoned".into()))
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, Tables>, StoreError> {
        self.tables
            .write()
            .map_err(|_| StoreError::Database("memory store lock poisoned".into()))
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn insert_user(&self, user: &User) -> Result<(), StoreError> {
        let mut tables = self.write()?;
        if tables.users.iter().any(|u| u.email == user.email) {
            return Err(StoreError::DuplicateEmail);
        }
        tables.users.push(user.clone());
        Ok(())
    }

    async fn update_user(&self, user: &User) -> Result<bool, StoreError> {
        let mut tables = self.write()?;
        if tables
            .users
            .iter()
            .any(|u| u.id != user.id && u.email == user.email)
        {
            return Err(StoreError::DuplicateEmail);
        }
        match tables.users.iter_mut().find(|u| u.id == user.id) {
            Some(existing) => {
                *existing = user.clone();
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn find_user(&self, id: Uuid) -> Result<Option<User>, StoreError> {
        Ok(self.read()?.user(id).cloned())
    }

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        Ok(self.read()?.users.iter().find(|u| u.email == email).cloned())
    }

    async fn find_user_by_reset_token(
        &self,
        token_hash: &str,
        now: DateTime<Utc>,
    ) -> Result<Option<User>, StoreError> {
        Ok(self
            .read()?
            .users
            .iter()
            .find(|u| {
                u.password_reset_token_hash.as_deref() == Some(token_hash)
                    && u.password_reset_expires_at.is_some_and(|exp| exp > now)
            })
            .cloned())
    }

    async fn list_users(&self) -> Result<Vec<User>, StoreError> {
        Ok(self.read()?.users.clone())
    }

    async fn insert_job(&self, job: &Job) -> Result<(), StoreError> {
        let mut tables = self.write()?;
        if tables.user(job.created_by).is_none() {
            return Err(StoreError::MissingReference);
        }
        tables.jobs.push(job.clone());
        Ok(())
    }

    async fn update_job(&self, job: &Job) -> Result<bool, StoreError> {
        let mut tables = self.write()?;
        match tables.jobs.iter_mut().find(|j| j.id == job.id) {
            Some(existing) => {
                *existing = job.clone();
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn delete_job(&self, id: Uuid) -> Result<bool, StoreError> {
        let mut tables = self.write()?;
        let before = tables.jobs.len();
        tables.jobs.retain(|j| j.id != id);
        Ok(tables.jobs.len() < before)
    }

    async fn find_job(&self, id: Uuid) -> Result<Option<Job>, StoreError> {
        Ok(self.read()?.job(id).cloned())
    }

    async fn job_details(&self, id: Uuid) -> Result<Option<JobDetails>, StoreError> {
        let tables = self.read()?;
        Ok(tables.job(id).and_then(|job| tables.job_details(job)))
    }

    async fn list_job_details(&self) -> Result<Vec<JobDetails>, StoreError> {
        let tables = self.read()?;
        Ok(tables
            .jobs
            .iter()
            .filter_map(|job| tables.job_details(job))
            .collect())
    }

    async fn insert_match(&self, m: &Match) -> Result<(), StoreError> {
        let mut tables = self.write()?;
        if tables.job(m.job_id).is_none()
            || tables.user(m.user_id).is_none()
            || tables.user(m.matched_by).is_none()
        {
            return Err(StoreError::MissingReference);
        }
        if tables
            .matches
            .iter()
            .any(|existing| existing.job_id == m.job_id && existing.user_id == m.user_id)
        {
            return Err(StoreError::DuplicateMatch);
        }
        tables.matches.push(m.clone());
        Ok(())
    }

    async fn find_match(&self, id: Uuid) -> Result<Option<Match>, StoreError> {
        Ok(self.read()?.matches.iter().find(|m| m.id == id).cloned())
    }

    async fn transition_match(
        &self,
        id: Uuid,
        from: MatchStatus,
        to: MatchStatus,
    ) -> Result<bool, StoreError> {
        let mut tables = self.write()?;
        match tables
            .matches
            .iter_mut()
            .find(|m| m.id == id && m.status == from)
        {
            Some(m) => {
                m.status = to;
                m.updated_at = Utc::now();
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn match_details(&self, id: Uuid) -> Result<Option<MatchDetails>, StoreError> {
        let tables = self.read()?;
        Ok(tables
            .matches
            .iter()
            .find(|m| m.id == id)
            .and_then(|m| tables.match_details(m, true)))
    }

    async fn list_match_details(&self) -> Result<Vec<MatchDetails>, StoreError> {
        let tables = self.read()?;
        Ok(tables
            .matches
            .iter()
            .filter_map(|m| tables.match_details(m, true))
            .collect())
    }

    async fn list_match_details_for_user(
        &self,
        user_id: Uuid,
        filter: MatchFilter,
    ) -> Result<Vec<MatchDetails>, StoreError> {
        let tables = self.read()?;
        let mut details: Vec<MatchDetails> = tables
            .matches
            .iter()
            .filter(|m| m.user_id == user_id)
            .filter(|m| filter != MatchFilter::ActiveOnly || m.is_active())
            .filter_map(|m| tables.match_details(m, false))
            .collect();
        if filter == MatchFilter::AllNewestFirst {
            details.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        }
        Ok(details)
    }

    async fn admin_snapshot(&self) -> Result<AdminSnapshot, StoreError> {
        let tables = self.read()?;
        Ok(AdminSnapshot {
            users: tables.users.clone(),
            jobs: tables.jobs.clone(),
            matches: tables.matches.clone(),
        })
    }

    async fn talent_snapshot(&self, user_id: Uuid) -> Result<Option<TalentSnapshot>, StoreError> {
        let tables = self.read()?;
        let Some(user) = tables.user(user_id).cloned() else {
            return Ok(None);
        };
        Ok(Some(TalentSnapshot {
            user,
            matches: tables
                .matches
                .iter()
                .filter(|m| m.user_id == user_id)
                .cloned()
                .collect(),
            jobs: tables.jobs.clone(),
        }))
    }
}
