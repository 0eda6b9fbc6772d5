use crate::core::filters::{
    can_produce_content, has_high_engagement, in_follower_tier, is_open_location,
    matches_location, passes_compensation_gate, shared_vibes,
};
use crate::models::{
    Campaign, CollaborationPreference, CreatorProfile, Criterion, MatchResult, ScoringConfig,
};

/// Calculate a 0-100 compatibility score between a campaign and a creator
///
/// Weighted additive model, criteria evaluated in order:
/// 1. Compensation gate (hard filter, forces 0 and stops)
/// 2. Location match
/// 3. Shared vibes, scaled by overlap and capped
/// 4. Engagement rate above platform average
/// 5. Follower count in the campaign's budget tier
/// 6. Requested content types producible on connected platforms
///
/// Total over any input: missing or malformed fields just leave their
/// criterion unmet.
pub fn calculate_match_score(
    campaign: &Campaign,
    creator: &CreatorProfile,
    config: &ScoringConfig,
) -> MatchResult {
    let mut card = Scorecard::default();

    if !passes_compensation_gate(campaign, creator) {
        let reason = match creator.collaboration_preference {
            Some(CollaborationPreference::Exchange) => "Creator only accepts exchange collaborations",
            _ => "Creator only accepts paid collaborations",
        };
        card.result.breakdown.insert(Criterion::Compensation, 0);
        card.result.reasons.push(reason.to_string());
        tracing::trace!(campaign = ?campaign.id, creator = ?creator.id, "compensation gate rejected pair");
        return card.result;
    }

    if matches_location(campaign, creator, &config.location_wildcards) {
        let wildcards = &config.location_wildcards;
        let reason = if is_open_location(campaign.location.as_deref(), wildcards) {
            "Open to creators in any location".to_string()
        } else if is_open_location(creator.location.as_deref(), wildcards) {
            "Creator works in any location".to_string()
        } else {
            format!("Location match: {}", campaign.location.as_deref().unwrap_or_default().trim())
        };
        card.award(Criterion::Location, config.location_weight, reason);
    }

    let shared = shared_vibes(campaign, creator);
    if !shared.is_empty() {
        let points = vibe_points(shared.len(), config);
        let reason = match shared.as_slice() {
            [single] => format!("Shared vibe: {}", single),
            many => format!("Shared vibes: {}", many.join(", ")),
        };
        card.award(Criterion::Vibes, points, reason);
    }

    if has_high_engagement(creator, config.engagement_rate_threshold) {
        let rate = creator.engagement_rate().unwrap_or_default();
        card.award(
            Criterion::Engagement,
            config.engagement_weight,
            format!("High engagement rate ({:.1}%)", rate),
        );
    }

    if in_follower_tier(campaign, creator, config) {
        let followers = creator.followers().unwrap_or_default();
        card.award(
            Criterion::Followers,
            config.follower_weight,
            format!("Audience size fits the campaign budget ({} followers)", followers),
        );
    }

    if can_produce_content(campaign, creator) {
        let formats = campaign
            .content_types
            .iter()
            .map(|format| format.as_str())
            .collect::<Vec<_>>()
            .join(", ");
        card.award(
            Criterion::ContentTypes,
            config.content_type_weight,
            format!("Can deliver requested content: {}", formats),
        );
    }

    card.finish()
}

/// Points for `shared` overlapping tags, never above the cap
#[inline]
fn vibe_points(shared: usize, config: &ScoringConfig) -> u32 {
    let count = u32::try_from(shared).unwrap_or(u32::MAX);
    count
        .saturating_mul(config.vibe_weight_per_tag)
        .min(config.vibe_weight_cap)
}

#[derive(Default)]
struct Scorecard {
    total: u32,
    result: MatchResult,
}

impl Scorecard {
    /// Zero-point awards are dropped so every breakdown entry is positive
    fn award(&mut self, criterion: Criterion, points: u32, reason: String) {
        if points == 0 {
            return;
        }
        self.total = self.total.saturating_add(points);
        self.result.breakdown.insert(criterion, points);
        self.result.reasons.push(reason);
    }

    fn finish(mut self) -> MatchResult {
        // min(100) keeps the cast lossless
        self.result.score = self.total.min(100) as u8;
        self.result
    }
}
