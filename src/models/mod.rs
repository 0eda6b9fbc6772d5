// Model exports
pub mod domain;
pub mod lenient;
pub mod requests;
pub mod responses;

pub use domain::{
    AgeRange, Campaign, CollaborationPreference, CompensationType, ContentType, CreatorProfile,
    Criterion, FollowerTier, InstagramMetrics, MatchResult, ScoringConfig, UnknownValue,
};
pub use requests::{CampaignMatchesRequest, OpportunitiesRequest, ScoreRequest, SnapshotRequest};
pub use responses::{
    CampaignMatchesResponse, ErrorResponse, HealthResponse, OpportunitiesResponse, RankedCampaign,
    RankedCreator, SnapshotResponse,
};
