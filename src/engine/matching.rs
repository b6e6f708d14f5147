//! Matching engine: who can be matched to what, and how matches are listed.
//!
//! Every function borrows the store for the duration of one call and keeps
//! nothing between calls.

use uuid::Uuid;

use crate::error::CoreError;
use crate::models::{Match, MatchDetails, MatchFilter, MatchQuery, MatchStatus};
use crate::store::{Store, StoreError};

/// Matches the talent `user_id` to `job_id` on behalf of the admin `actor_id`.
///
/// Checks run in a fixed order: the job must exist, then the user, then the user
/// must be a talent. The pair's uniqueness is left to the store so that two
/// concurrent requests cannot both succeed; the loser gets `DuplicateMatch`
/// whatever the status of the existing match.
pub async fn create_match(
    store: &dyn Store,
    job_id: Uuid,
    user_id: Uuid,
    actor_id: Uuid,
) -> Result<MatchDetails, CoreError> {
    let job = store.find_job(job_id).await?;
    let user = store.find_user(user_id).await?;

    if job.is_none() {
        return Err(CoreError::JobNotFound);
    }
    let user = user.ok_or(CoreError::UserNotFound)?;
    if !user.is_talent() {
        return Err(CoreError::InvalidRole);
    }

    let new_match = Match::new(job_id, user_id, actor_id);
    match store.insert_match(&new_match).await {
        Ok(()) => {}
        Err(StoreError::MissingReference) => {
            return Err(missing_reference(store, job_id, user_id).await);
        }
        Err(e) => return Err(e.into()),
    }
    log::info!(
        "matched user {} to job {} (match {}, by {})",
        user_id,
        job_id,
        new_match.id,
        actor_id
    );

    store
        .match_details(new_match.id)
        .await?
        .ok_or(CoreError::MatchNotFound)
}

/// Names the reference that vanished between the existence checks and the insert.
async fn missing_reference(store: &dyn Store, job_id: Uuid, user_id: Uuid) -> CoreError {
    match store.find_job(job_id).await {
        Ok(None) => return CoreError::JobNotFound,
        Ok(Some(_)) => {}
        Err(e) => return e.into(),
    }
    match store.find_user(user_id).await {
        Ok(None) => CoreError::UserNotFound,
        Ok(Some(_)) => CoreError::Store(StoreError::MissingReference),
        Err(e) => e.into(),
    }
}

/// Lists a talent's matches. With `include_inactive` every match is returned,
/// newest first; otherwise only active ones, in store order.
pub async fn list_matches_for_talent(
    store: &dyn Store,
    user_id: Uuid,
    include_inactive: bool,
) -> Result<Vec<MatchDetails>, CoreError> {
    let filter = if include_inactive {
        MatchFilter::AllNewestFirst
    } else {
        MatchFilter::ActiveOnly
    };
    Ok(store.list_match_details_for_user(user_id, filter).await?)
}

/// Every match, fully joined.
pub async fn list_all_matches(store: &dyn Store) -> Result<Vec<MatchDetails>, CoreError> {
    Ok(store.list_match_details().await?)
}

/// Matches narrowed by job, user and/or status. An empty query lists everything.
pub async fn find_matches(
    store: &dyn Store,
    query: &MatchQuery,
) -> Result<Vec<MatchDetails>, CoreError> {
    let mut matches = list_all_matches(store).await?;
    matches.retain(|m| query.accepts(m));
    Ok(matches)
}

/// Marks an active match as completed (`Inactive`). There is no way back.
pub async fn complete_match(store: &dyn Store, match_id: Uuid) -> Result<MatchDetails, CoreError> {
    let existing = store
        .find_match(match_id)
        .await?
        .ok_or(CoreError::MatchNotFound)?;
    if existing.is_completed() {
        return Err(CoreError::MatchAlreadyCompleted);
    }

    let moved = store
        .transition_match(match_id, MatchStatus::Active, MatchStatus::Inactive)
        .await?;
    if !moved {
        // Lost a race with another completion.
        return Err(CoreError::MatchAlreadyCompleted);
    }
    log::info!("match {} completed", match_id);

    store
        .match_details(match_id)
        .await?
        .ok_or(CoreError::MatchNotFound)
}
