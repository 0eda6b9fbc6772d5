use crate::core::scoring::calculate_match_score;
use crate::models::{Campaign, CreatorProfile, MatchResult, ScoringConfig};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Where a displayed score came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScoreSource {
    Rule,
    Ai,
}

/// Outcome of scoring one pair for a listing
#[derive(Debug, Clone, PartialEq)]
pub struct Evaluation {
    /// Rule-based result, never altered by overrides
    pub result: MatchResult,
    /// Score used for filtering and display
    pub display_score: u8,
    pub source: ScoreSource,
}

/// Strategy for the score a listing filters and sorts on
pub trait ScoreProvider: Send + Sync {
    fn evaluate(&self, campaign: &Campaign, creator: &CreatorProfile) -> Evaluation;
}

/// Plain weighted scorer
#[derive(Debug, Clone, Default)]
pub struct RuleBasedScorer {
    config: ScoringConfig,
}

impl RuleBasedScorer {
    pub fn new(config: ScoringConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ScoringConfig {
        &self.config
    }

    pub fn score(&self, campaign: &Campaign, creator: &CreatorProfile) -> MatchResult {
        calculate_match_score(campaign, creator, &self.config)
    }
}

impl ScoreProvider for RuleBasedScorer {
    fn evaluate(&self, campaign: &Campaign, creator: &CreatorProfile) -> Evaluation {
        let result = self.score(campaign, creator);
        Evaluation {
            display_score: result.score,
            result,
            source: ScoreSource::Rule,
        }
    }
}

/// Rule-based scorer whose display score yields to AI-computed percentages
///
/// Overrides are keyed by `(campaign_id, creator_id)`. Pairs rejected by the
/// compensation gate keep their zero score.
#[derive(Debug, Clone, Default)]
pub struct AiScorer {
    rules: RuleBasedScorer,
    overrides: HashMap<(String, String), f64>,
}

impl AiScorer {
    pub fn new(rules: RuleBasedScorer, overrides: HashMap<(String, String), f64>) -> Self {
        Self { rules, overrides }
    }

    /// Override percentage for a pair, rounded and clamped
    pub fn override_for(&self, campaign_id: &str, creator_id: &str) -> Option<u8> {
        self.overrides
            .get(&(campaign_id.to_string(), creator_id.to_string()))
            .filter(|pct| pct.is_finite())
            .map(|pct| pct.round().clamp(0.0, 100.0) as u8)
    }

    pub fn override_count(&self) -> usize {
        self.overrides.len()
    }
}

impl ScoreProvider for AiScorer {
    fn evaluate(&self, campaign: &Campaign, creator: &CreatorProfile) -> Evaluation {
        let base = self.rules.evaluate(campaign, creator);
        if base.result.is_gated() {
            return base;
        }

        let ai = match (campaign.id.as_deref(), creator.id.as_deref()) {
            (Some(campaign_id), Some(creator_id)) => self.override_for(campaign_id, creator_id),
            _ => None,
        };

        match ai {
            Some(display_score) => Evaluation {
                display_score,
                source: ScoreSource::Ai,
                ..base
            },
            None => base,
        }
    }
}
