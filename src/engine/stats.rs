//! Dashboard statistics.
//!
//! The aggregation functions are pure: they take a snapshot read from the store
//! and compute counts. The `compute_*` wrappers fetch that snapshot.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::CoreError;
use crate::models::{Role, User};
use crate::store::{AdminSnapshot, Store, TalentSnapshot};

/// Matches created within this many days count as recent.
pub const RECENT_WINDOW_DAYS: i64 = 7;

/// Number of equally weighted profile checks.
const PROFILE_CHECKS: usize = 5;

/// System-wide dashboard numbers.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminStats {
    pub total_jobs: usize,
    pub total_users: usize,
    pub total_talents: usize,
    pub total_admins: usize,
    pub total_matches: usize,
    pub active_matches: usize,
    pub completed_matches: usize,
    pub verified_users: usize,
    pub unverified_users: usize,
}

/// Dashboard numbers for one talent.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TalentStats {
    pub total_matches: usize,
    pub active_matches: usize,
    pub completed_matches: usize,
    pub recent_matches: usize,
    pub total_jobs: usize,
    pub matching_jobs: usize,
    pub jobs_in_location: usize,
    /// Percentage of this talent's matches that are completed.
    pub match_success_rate: u32,
    pub profile_completeness: u32,
}

pub fn admin_stats(snapshot: &AdminSnapshot) -> AdminStats {
    let users = &snapshot.users;
    let matches = &snapshot.matches;

    let total_admins = users.iter().filter(|u| u.role == Role::Admin).count();
    let verified_users = users.iter().filter(|u| u.is_email_verified).count();
    let completed_matches = matches.iter().filter(|m| m.is_completed()).count();

    AdminStats {
        total_jobs: snapshot.jobs.len(),
        total_users: users.len(),
        total_talents: users.len() - total_admins,
        total_admins,
        total_matches: matches.len(),
        active_matches: matches.len() - completed_matches,
        completed_matches,
        verified_users,
        unverified_users: users.len() - verified_users,
    }
}

/// Computes a talent's dashboard as of `now`.
pub fn talent_stats(snapshot: &TalentSnapshot, now: DateTime<Utc>) -> TalentStats {
    let user = &snapshot.user;
    let matches = &snapshot.matches;
    let jobs = &snapshot.jobs;

    let completed_matches = matches.iter().filter(|m| m.is_completed()).count();
    let since = now - Duration::days(RECENT_WINDOW_DAYS);
    let recent_matches = matches.iter().filter(|m| m.created_at >= since).count();

    let matching_jobs = if user.skills.is_empty() {
        0
    } else {
        jobs.iter().filter(|j| j.requires_any_of(&user.skills)).count()
    };
    let jobs_in_location = jobs.iter().filter(|j| j.is_located_in(&user.location)).count();

    TalentStats {
        total_matches: matches.len(),
        active_matches: matches.len() - completed_matches,
        completed_matches,
        recent_matches,
        total_jobs: jobs.len(),
        matching_jobs,
        jobs_in_location,
        match_success_rate: rounded_percentage(completed_matches, matches.len()),
        profile_completeness: profile_completeness(user),
    }
}

/// Scores a profile from 0 to 100 in steps of 20: name, email and location
/// present (ignoring whitespace), at least one skill, and a verified email.
pub fn profile_completeness(user: &User) -> u32 {
    let checks = [
        !user.name.trim().is_empty(),
        !user.email.trim().is_empty(),
        !user.location.trim().is_empty(),
        !user.skills.is_empty(),
        user.is_email_verified,
    ];
    let passed = checks.iter().filter(|&&ok| ok).count();
    rounded_percentage(passed, PROFILE_CHECKS)
}

/// `round(part / whole * 100)` with halves rounding up; 0 when `whole` is 0.
pub fn rounded_percentage(part: usize, whole: usize) -> u32 {
    if whole == 0 {
        return 0;
    }
    ((part * 200 + whole) / (2 * whole)) as u32
}

pub async fn compute_admin_stats(store: &dyn Store) -> Result<AdminStats, CoreError> {
    let snapshot = store.admin_snapshot().await?;
    Ok(admin_stats(&snapshot))
}

pub async fn compute_talent_stats(
    store: &dyn Store,
    user_id: Uuid,
    now: DateTime<Utc>,
) -> Result<TalentStats, CoreError> {
    let snapshot = store
        .talent_snapshot(user_id)
        .await?
        .ok_or(CoreError::UserNotFound)?;
    Ok(talent_stats(&snapshot, now))
}
