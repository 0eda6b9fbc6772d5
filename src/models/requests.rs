use crate::models::domain::{Campaign, CreatorProfile};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Score one campaign against one creator, both supplied inline
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ScoreRequest {
    #[serde(default)]
    pub campaign: Campaign,
    #[serde(default)]
    pub creator: CreatorProfile,
}

/// Brand-facing match list for a campaign
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CampaignMatchesRequest {
    #[validate(length(min = 1))]
    #[serde(alias = "campaign_id", rename = "campaignId")]
    pub campaign_id: String,
    #[serde(default = "default_limit")]
    pub limit: u16,
}

/// Creator-facing opportunity list
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct OpportunitiesRequest {
    #[validate(length(min = 1))]
    #[serde(alias = "creator_id", rename = "creatorId")]
    pub creator_id: String,
    #[serde(default = "default_limit")]
    pub limit: u16,
}

/// Persist the rule-based result for one pair
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct SnapshotRequest {
    #[validate(length(min = 1))]
    #[serde(alias = "campaign_id", rename = "campaignId")]
    pub campaign_id: String,
    #[validate(length(min = 1))]
    #[serde(alias = "creator_id", rename = "creatorId")]
    pub creator_id: String,
}

fn default_limit() -> u16 {
    20
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_limit_defaults() {
        let req: CampaignMatchesRequest =
            serde_json::from_value(json!({ "campaignId": "camp1" })).unwrap();
        assert_eq!(req.limit, 20);
        assert!(req.validate().is_ok());
    }

    #[test]
    fn test_empty_id_rejected() {
        let req: OpportunitiesRequest =
            serde_json::from_value(json!({ "creator_id": "" })).unwrap();
        assert!(req.validate().is_err());
    }

    #[test]
    fn test_score_request_tolerates_missing_sides() {
        let req: ScoreRequest = serde_json::from_value(json!({})).unwrap();
        assert!(req.campaign.vibes.is_empty());
        assert!(req.creator.id.is_none());
    }
}
