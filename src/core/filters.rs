use crate::models::{Campaign, CompensationType, ContentType, CreatorProfile, ScoringConfig};
use std::collections::{BTreeSet, HashSet};

/// Content formats each connected platform can deliver
const INSTAGRAM_FORMATS: [ContentType; 4] = [
    ContentType::Post,
    ContentType::Video,
    ContentType::Stories,
    ContentType::Carousel,
];
const TIKTOK_FORMATS: [ContentType; 1] = [ContentType::Video];

/// Hard compensation gate
///
/// Fails only when both sides are known and incompatible. A missing
/// compensation type or preference lets the pair through.
#[inline]
pub fn passes_compensation_gate(campaign: &Campaign, creator: &CreatorProfile) -> bool {
    match (campaign.compensation_type, creator.collaboration_preference) {
        (Some(kind), Some(preference)) => preference.accepts(kind),
        _ => true,
    }
}

/// True if the location is one of the configured wildcards
pub fn is_wildcard_location(location: &str, wildcards: &[String]) -> bool {
    let location = location.trim().to_lowercase();
    wildcards
        .iter()
        .any(|wildcard| wildcard.trim().to_lowercase() == location)
}

/// A present location that restricts nothing: blank or a wildcard
pub fn is_open_location(location: Option<&str>, wildcards: &[String]) -> bool {
    match location {
        Some(location) => location.trim().is_empty() || is_wildcard_location(location, wildcards),
        None => false,
    }
}

/// Location fit
///
/// Met when either side is open (explicitly blank or a wildcard), or when
/// one location contains the other (case-insensitive). An absent location
/// matches nothing on its own.
pub fn matches_location(campaign: &Campaign, creator: &CreatorProfile, wildcards: &[String]) -> bool {
    let campaign_location = campaign.location.as_deref();
    let creator_location = creator.location.as_deref();

    if is_open_location(campaign_location, wildcards) || is_open_location(creator_location, wildcards) {
        return true;
    }

    match (campaign_location, creator_location) {
        (Some(a), Some(b)) => {
            let a = a.trim().to_lowercase();
            let b = b.trim().to_lowercase();
            a.contains(&b) || b.contains(&a)
        }
        _ => false,
    }
}

/// Campaign vibes the creator also lists, in campaign order
///
/// Comparison is case-insensitive and each tag is counted once.
pub fn shared_vibes(campaign: &Campaign, creator: &CreatorProfile) -> Vec<String> {
    let niches = creator.niches();
    let mut seen = HashSet::new();

    campaign
        .vibes
        .iter()
        .map(|vibe| vibe.trim().to_lowercase())
        .filter(|vibe| !vibe.is_empty() && niches.contains(vibe))
        .filter(|vibe| seen.insert(vibe.clone()))
        .collect()
}

/// Instagram engagement at or above the platform average
#[inline]
pub fn has_high_engagement(creator: &CreatorProfile, threshold: f64) -> bool {
    creator.instagram()
        && creator
            .engagement_rate()
            .map(|rate| rate >= threshold)
            .unwrap_or(false)
}

/// Follower count sits in the band the campaign's budget type targets
pub fn in_follower_tier(campaign: &Campaign, creator: &CreatorProfile, config: &ScoringConfig) -> bool {
    let tier = match campaign.compensation_type {
        Some(CompensationType::Monetary) => config.monetary_followers,
        Some(CompensationType::Exchange) => config.exchange_followers,
        None => return false,
    };

    creator
        .followers()
        .map(|followers| tier.contains(followers))
        .unwrap_or(false)
}

/// Formats the creator can deliver through connected platforms
pub fn producible_content(creator: &CreatorProfile) -> BTreeSet<ContentType> {
    let mut formats = BTreeSet::new();
    if creator.instagram() {
        formats.extend(INSTAGRAM_FORMATS);
    }
    if creator.tiktok() {
        formats.extend(TIKTOK_FORMATS);
    }
    formats
}

/// Every requested content type is covered by a connected platform
///
/// A campaign that requests nothing is not a match for this criterion.
pub fn can_produce_content(campaign: &Campaign, creator: &CreatorProfile) -> bool {
    if campaign.content_types.is_empty() {
        return false;
    }

    let formats = producible_content(creator);
    campaign
        .content_types
        .iter()
        .all(|requested| formats.contains(requested))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{CollaborationPreference, InstagramMetrics};

    fn create_test_campaign() -> Campaign {
        Campaign {
            location: Some("Santo Domingo".to_string()),
            vibes: vec!["premium".to_string(), "romantic".to_string()],
            content_types: vec![ContentType::Video],
            compensation_type: Some(CompensationType::Monetary),
            ..Campaign::default()
        }
    }

    fn create_test_creator() -> CreatorProfile {
        CreatorProfile {
            location: Some("Santo Domingo, DR".to_string()),
            categories: vec!["Premium".to_string(), "lifestyle".to_string()],
            instagram_metrics: Some(InstagramMetrics {
                followers: Some(50_000),
                engagement_rate: Some(4.2),
            }),
            collaboration_preference: Some(CollaborationPreference::Both),
            instagram_connected: Some(true),
            ..CreatorProfile::default()
        }
    }

    #[test]
    fn test_compensation_gate() {
        let campaign = create_test_campaign();
        let mut creator = create_test_creator();
        assert!(passes_compensation_gate(&campaign, &creator));

        creator.collaboration_preference = Some(CollaborationPreference::Exchange);
        assert!(!passes_compensation_gate(&campaign, &creator));

        creator.collaboration_preference = None;
        assert!(passes_compensation_gate(&campaign, &creator));
    }

    #[test]
    fn test_location_substring_either_way() {
        let wildcards = ScoringConfig::default().location_wildcards;
        let campaign = create_test_campaign();
        let creator = create_test_creator();
        assert!(matches_location(&campaign, &creator, &wildcards));

        let mut broad = create_test_creator();
        broad.location = Some("santo".to_string());
        assert!(matches_location(&campaign, &broad, &wildcards));

        let mut elsewhere = create_test_creator();
        elsewhere.location = Some("Santiago".to_string());
        assert!(!matches_location(&campaign, &elsewhere, &wildcards));
    }

    #[test]
    fn test_location_wildcard_and_blank() {
        let wildcards = ScoringConfig::default().location_wildcards;
        let mut campaign = create_test_campaign();
        let mut creator = create_test_creator();
        creator.location = None;

        campaign.location = Some("  Anywhere ".to_string());
        assert!(matches_location(&campaign, &creator, &wildcards));

        campaign.location = Some("   ".to_string());
        assert!(matches_location(&campaign, &create_test_creator(), &wildcards));

        // Absent on one side, restrictive on the other
        campaign.location = Some("Santo Domingo".to_string());
        assert!(!matches_location(&campaign, &creator, &wildcards));
        campaign.location = None;
        assert!(!matches_location(&campaign, &create_test_creator(), &wildcards));
    }

    #[test]
    fn test_location_open_on_creator_side() {
        let wildcards = ScoringConfig::default().location_wildcards;
        let campaign = create_test_campaign();

        let mut remote = create_test_creator();
        remote.location = Some("Remote".to_string());
        assert!(matches_location(&campaign, &remote, &wildcards));

        let mut blank = create_test_creator();
        blank.location = Some(String::new());
        assert!(matches_location(&campaign, &blank, &wildcards));

        assert!(is_open_location(Some(""), &wildcards));
        assert!(!is_open_location(None, &wildcards));
        assert!(!is_open_location(Some("Santiago"), &wildcards));
    }

    #[test]
    fn test_shared_vibes_case_insensitive_and_deduplicated() {
        let mut campaign = create_test_campaign();
        campaign.vibes.push("PREMIUM".to_string());
        let creator = create_test_creator();

        assert_eq!(shared_vibes(&campaign, &creator), vec!["premium"]);
    }

    #[test]
    fn test_engagement_requires_connection() {
        let mut creator = create_test_creator();
        assert!(has_high_engagement(&creator, 3.0));

        creator.instagram_connected = Some(false);
        assert!(!has_high_engagement(&creator, 3.0));
    }

    #[test]
    fn test_follower_tiers_by_compensation() {
        let config = ScoringConfig::default();
        let mut campaign = create_test_campaign();
        let mut creator = create_test_creator();
        assert!(in_follower_tier(&campaign, &creator, &config));

        creator.instagram_metrics = Some(InstagramMetrics {
            followers: Some(2_000_000),
            engagement_rate: Some(4.2),
        });
        assert!(!in_follower_tier(&campaign, &creator, &config));

        campaign.compensation_type = Some(CompensationType::Exchange);
        creator.instagram_metrics = Some(InstagramMetrics {
            followers: Some(5_000),
            engagement_rate: None,
        });
        assert!(in_follower_tier(&campaign, &creator, &config));

        campaign.compensation_type = None;
        assert!(!in_follower_tier(&campaign, &creator, &config));
    }

    #[test]
    fn test_content_feasibility() {
        let mut campaign = create_test_campaign();
        let mut creator = create_test_creator();
        assert!(can_produce_content(&campaign, &creator));

        creator.instagram_connected = Some(false);
        assert!(!can_produce_content(&campaign, &creator));

        creator.tiktok_connected = Some(true);
        assert!(can_produce_content(&campaign, &creator));

        campaign.content_types.push(ContentType::Stories);
        assert!(!can_produce_content(&campaign, &creator));

        campaign.content_types.clear();
        assert!(!can_produce_content(&campaign, &create_test_creator()));
    }
}
