//! The matching engine and the statistics aggregator. Both are stateless over a
//! borrowed [`Store`](crate::store::Store).

pub mod matching;
pub mod stats;

pub use stats::{AdminStats, TalentStats};
