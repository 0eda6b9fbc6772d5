// Core algorithm exports
pub mod filters;
pub mod matcher;
pub mod provider;
pub mod scoring;

pub use filters::{
    can_produce_content, has_high_engagement, in_follower_tier, is_open_location, matches_location,
    passes_compensation_gate, shared_vibes,
};
pub use matcher::{Matcher, Ranking, Thresholds};
pub use provider::{AiScorer, Evaluation, RuleBasedScorer, ScoreProvider, ScoreSource};
pub use scoring::calculate_match_score;
