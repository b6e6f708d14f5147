pub mod job;
pub mod matching;
pub mod user;

pub use job::{Job, JobDetails, JobInput};
pub use matching::{Match, MatchDetails, MatchFilter, MatchInput, MatchQuery, MatchStatus};
pub use user::{NewUser, ProfileUpdate, Role, TalentSummary, User, UserProfile, UserSummary};

/// Trims every skill and drops the blank ones.
pub(crate) fn clean_skills(skills: Vec<String>) -> Vec<String> {
    skills
        .into_iter()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}
