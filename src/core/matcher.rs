use crate::core::provider::ScoreProvider;
use crate::models::{Campaign, CreatorProfile, RankedCampaign, RankedCreator};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// Ranked listing plus how many candidates were scored
#[derive(Debug)]
pub struct Ranking<T> {
    pub items: Vec<T>,
    pub total_candidates: usize,
}

/// Minimum display scores for each listing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Thresholds {
    /// Brand "Matches" view
    pub brand_min_score: u8,
    /// Creator "Opportunities" view
    pub creator_min_score: u8,
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            brand_min_score: 40,
            creator_min_score: 50,
        }
    }
}

/// Builds the listings that sit on top of the scorer
///
/// # Listings
/// - Brand view: creators for one campaign, ties broken by follower count
/// - Creator view: open campaigns for one creator, ties broken by recency
#[derive(Debug, Clone, Default)]
pub struct Matcher {
    thresholds: Thresholds,
}

impl Matcher {
    pub fn new(thresholds: Thresholds) -> Self {
        Self { thresholds }
    }

    pub fn thresholds(&self) -> Thresholds {
        self.thresholds
    }

    /// Rank creators for a campaign's brand-facing match list
    ///
    /// # Arguments
    /// * `campaign` - The campaign being staffed
    /// * `creators` - Candidate creator documents
    /// * `provider` - Score strategy used for filtering and ordering
    /// * `limit` - Maximum number of creators to return
    pub fn rank_creators<P>(
        &self,
        campaign: &Campaign,
        creators: Vec<CreatorProfile>,
        provider: &P,
        limit: usize,
    ) -> Ranking<RankedCreator>
    where
        P: ScoreProvider + ?Sized,
    {
        let total_candidates = creators.len();
        let min_score = self.thresholds.brand_min_score;

        let mut ranked: Vec<RankedCreator> = creators
            .into_iter()
            .filter_map(|creator| {
                let eval = provider.evaluate(campaign, &creator);
                if eval.display_score < min_score {
                    return None;
                }
                Some(RankedCreator {
                    followers: creator.followers(),
                    creator_id: creator.id,
                    display_name: creator.display_name,
                    display_score: eval.display_score,
                    source: eval.source,
                    result: eval.result,
                })
            })
            .collect();

        // Score descending, then larger audience, then id for stable output
        ranked.sort_by(|a, b| {
            b.display_score
                .cmp(&a.display_score)
                .then_with(|| b.followers.unwrap_or(0).cmp(&a.followers.unwrap_or(0)))
                .then_with(|| a.creator_id.cmp(&b.creator_id))
        });
        ranked.truncate(limit);

        tracing::debug!(
            campaign = ?campaign.id,
            "Ranked {} of {} creators (min score {})",
            ranked.len(),
            total_candidates,
            min_score
        );

        Ranking {
            items: ranked,
            total_candidates,
        }
    }

    /// Rank open campaigns for a creator's opportunity list
    pub fn rank_opportunities<P>(
        &self,
        creator: &CreatorProfile,
        campaigns: Vec<Campaign>,
        provider: &P,
        limit: usize,
    ) -> Ranking<RankedCampaign>
    where
        P: ScoreProvider + ?Sized,
    {
        let total_candidates = campaigns.len();
        let min_score = self.thresholds.creator_min_score;

        let mut ranked: Vec<RankedCampaign> = campaigns
            .into_iter()
            .filter(Campaign::is_open)
            .filter_map(|campaign| {
                let eval = provider.evaluate(&campaign, creator);
                if eval.display_score < min_score {
                    return None;
                }
                Some(RankedCampaign {
                    campaign_id: campaign.id,
                    title: campaign.title,
                    created_at: campaign.created_at,
                    display_score: eval.display_score,
                    source: eval.source,
                    result: eval.result,
                })
            })
            .collect();

        // Score descending, then newest first; undated campaigns sort last
        ranked.sort_by(|a, b| {
            b.display_score
                .cmp(&a.display_score)
                .then_with(|| match (a.created_at, b.created_at) {
                    (Some(x), Some(y)) => y.cmp(&x),
                    (Some(_), None) => Ordering::Less,
                    (None, Some(_)) => Ordering::Greater,
                    (None, None) => Ordering::Equal,
                })
                .then_with(|| a.campaign_id.cmp(&b.campaign_id))
        });
        ranked.truncate(limit);

        tracing::debug!(
            creator = ?creator.id,
            "Ranked {} of {} campaigns (min score {})",
            ranked.len(),
            total_candidates,
            min_score
        );

        Ranking {
            items: ranked,
            total_candidates,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::provider::{AiScorer, RuleBasedScorer, ScoreSource};
    use crate::models::{CollaborationPreference, CompensationType, ContentType, InstagramMetrics};
    use chrono::{Duration, Utc};
    use std::collections::HashMap;

    fn create_campaign(id: &str) -> Campaign {
        Campaign {
            id: Some(id.to_string()),
            location: Some("Santo Domingo".to_string()),
            vibes: vec!["premium".to_string(), "party".to_string()],
            content_types: vec![ContentType::Post],
            compensation_type: Some(CompensationType::Monetary),
            ..Campaign::default()
        }
    }

    fn create_creator(id: &str, followers: u64, location: &str) -> CreatorProfile {
        CreatorProfile {
            id: Some(id.to_string()),
            location: Some(location.to_string()),
            categories: vec!["premium".to_string()],
            instagram_metrics: Some(InstagramMetrics {
                followers: Some(followers),
                engagement_rate: Some(3.5),
            }),
            collaboration_preference: Some(CollaborationPreference::Both),
            instagram_connected: Some(true),
            ..CreatorProfile::default()
        }
    }

    #[test]
    fn test_rank_creators_threshold_and_order() {
        let matcher = Matcher::default();
        let campaign = create_campaign("camp1");

        let mut exchange_only = create_creator("gated", 50_000, "Santo Domingo");
        exchange_only.collaboration_preference = Some(CollaborationPreference::Exchange);

        let mut weak = create_creator("weak", 50_000, "Madrid");
        weak.instagram_connected = Some(false);

        let creators = vec![
            create_creator("small", 20_000, "Santo Domingo"),
            create_creator("big", 900_000, "Santo Domingo"),
            exchange_only,
            weak,
        ];

        let ranking = matcher.rank_creators(&campaign, creators, &RuleBasedScorer::default(), 10);

        assert_eq!(ranking.total_candidates, 4);
        let ids: Vec<_> = ranking.items.iter().map(|m| m.creator_id.as_deref().unwrap()).collect();
        // Equal scores: larger audience first
        assert_eq!(ids, vec!["big", "small"]);
        assert!(ranking.items.iter().all(|m| m.display_score >= 40));
    }

    #[test]
    fn test_rank_creators_respects_limit() {
        let matcher = Matcher::default();
        let campaign = create_campaign("camp1");
        let creators: Vec<_> = (0..20)
            .map(|i| create_creator(&format!("c{}", i), 10_000 + i * 1_000, "Santo Domingo"))
            .collect();

        let ranking = matcher.rank_creators(&campaign, creators, &RuleBasedScorer::default(), 5);
        assert_eq!(ranking.items.len(), 5);
        assert_eq!(ranking.items[0].creator_id.as_deref(), Some("c19"));
    }

    #[test]
    fn test_rank_opportunities_prefers_recent_on_tie() {
        let matcher = Matcher::default();
        let creator = create_creator("creator1", 50_000, "Santo Domingo");
        let now = Utc::now();

        let mut older = create_campaign("older");
        older.created_at = Some(now - Duration::days(10));
        let mut newer = create_campaign("newer");
        newer.created_at = Some(now - Duration::days(1));
        let undated = create_campaign("undated");
        let mut closed = create_campaign("closed");
        closed.status = Some("closed".to_string());

        let ranking = matcher.rank_opportunities(
            &creator,
            vec![undated, older, closed, newer],
            &RuleBasedScorer::default(),
            10,
        );

        let ids: Vec<_> = ranking.items.iter().map(|m| m.campaign_id.as_deref().unwrap()).collect();
        assert_eq!(ids, vec!["newer", "older", "undated"]);
        assert_eq!(ranking.total_candidates, 4);
    }

    #[test]
    fn test_opportunities_threshold_uses_ai_override() {
        let matcher = Matcher::default();
        let creator = create_creator("creator1", 50_000, "Madrid");

        // Location and content miss: rule score 10 + 15 + 15 = 40, below 50
        let mut campaign = create_campaign("camp1");
        campaign.content_types.clear();

        let rules = RuleBasedScorer::default();
        let rule_only = matcher.rank_opportunities(&creator, vec![campaign.clone()], &rules, 10);
        assert!(rule_only.items.is_empty());

        let overrides = HashMap::from([(("camp1".to_string(), "creator1".to_string()), 72.0)]);
        let ai = AiScorer::new(rules, overrides);
        let with_ai = matcher.rank_opportunities(&creator, vec![campaign], &ai, 10);

        assert_eq!(with_ai.items.len(), 1);
        assert_eq!(with_ai.items[0].display_score, 72);
        assert_eq!(with_ai.items[0].source, ScoreSource::Ai);
        assert_eq!(with_ai.items[0].result.score, 40);
    }

    #[test]
    fn test_dyn_provider() {
        let matcher = Matcher::new(Thresholds {
            brand_min_score: 0,
            creator_min_score: 0,
        });
        let provider: Box<dyn ScoreProvider> = Box::new(RuleBasedScorer::default());
        let ranking = matcher.rank_creators(
            &Campaign::default(),
            vec![CreatorProfile::default()],
            provider.as_ref(),
            10,
        );
        assert_eq!(ranking.items.len(), 1);
        assert_eq!(ranking.items[0].display_score, 0);
    }
}
