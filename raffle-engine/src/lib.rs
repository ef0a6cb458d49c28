//! Comment collection, eligibility filtering and winner sampling.

pub mod collector;
pub mod eligibility;
pub mod pipeline;
pub mod sampler;

#[cfg(test)]
mod fake;

pub use collector::{CollectionStats, CommentCollector};
pub use eligibility::{CandidateOutcome, EligibilityFilter, EligibilityReport};
pub use pipeline::{RafflePipeline, RaffleReport};
pub use sampler::{draw_winners, eligible_pool};
