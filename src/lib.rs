//! Collab Match - creator/campaign match scoring for the brand collaboration marketplace
//!
//! The core is a pure weighted scorer that rates how well a creator fits a
//! campaign. Around it sit the listing rules (visibility thresholds, tie
//! breaks, AI score overrides) and the HTTP service that serves them.

pub mod config;
pub mod core;
pub mod models;
pub mod routes;
pub mod services;

// Re-export commonly used types
pub use crate::core::{calculate_match_score, AiScorer, Matcher, RuleBasedScorer, ScoreProvider};
pub use crate::models::{Campaign, CreatorProfile, MatchResult, ScoringConfig};
