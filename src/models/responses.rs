use crate::core::provider::ScoreSource;
use crate::models::domain::MatchResult;
use serde::{Deserialize, Serialize};

/// A creator ranked for a campaign
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RankedCreator {
    pub creator_id: Option<String>,
    pub display_name: Option<String>,
    pub followers: Option<u64>,
    /// Score used for ranking and the visibility threshold
    pub display_score: u8,
    pub source: ScoreSource,
    #[serde(rename = "match")]
    pub result: MatchResult,
}

/// A campaign ranked for a creator
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RankedCampaign {
    pub campaign_id: Option<String>,
    pub title: Option<String>,
    pub created_at: Option<chrono::DateTime<chrono::Utc>>,
    pub display_score: u8,
    pub source: ScoreSource,
    #[serde(rename = "match")]
    pub result: MatchResult,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CampaignMatchesResponse {
    pub campaign_id: String,
    pub matches: Vec<RankedCreator>,
    pub total_candidates: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OpportunitiesResponse {
    pub creator_id: String,
    pub opportunities: Vec<RankedCampaign>,
    pub total_candidates: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SnapshotResponse {
    pub campaign_id: String,
    pub creator_id: String,
    #[serde(rename = "match")]
    pub result: MatchResult,
}

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub timestamp: chrono::DateTime<chrono::Utc>,
}

/// Error response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
    pub status_code: u16,
}
