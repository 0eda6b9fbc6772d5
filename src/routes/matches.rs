use crate::core::{AiScorer, Matcher, RuleBasedScorer};
use crate::models::{
    CampaignMatchesRequest, CampaignMatchesResponse, HealthResponse, OpportunitiesRequest,
    OpportunitiesResponse, ScoreRequest, SnapshotRequest, SnapshotResponse,
};
use crate::routes::errors::ApiError;
use crate::services::{DocumentStore, ListingCache, MatchStore};
use actix_web::{web, HttpResponse};
use std::collections::HashMap;
use std::sync::Arc;
use validator::Validate;

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn DocumentStore>,
    pub match_store: Option<Arc<MatchStore>>,
    pub cache: Option<Arc<ListingCache>>,
    pub scorer: RuleBasedScorer,
    pub matcher: Matcher,
    pub max_limit: usize,
}

/// Configure all match-related routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/health", web::get().to(health_check))
        .route("/match/score", web::post().to(score_pair))
        .route("/campaigns/matches", web::post().to(campaign_matches))
        .route("/creators/opportunities", web::post().to(creator_opportunities))
        .route("/matches/snapshot", web::post().to(save_snapshot));
}

/// Health check endpoint
async fn health_check(state: web::Data<AppState>) -> HttpResponse {
    let healthy = match &state.match_store {
        Some(match_store) => match_store.health_check().await.unwrap_or(false),
        None => true,
    };

    let status = if healthy { "healthy" } else { "degraded" };

    HttpResponse::Ok().json(HealthResponse {
        status: status.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        timestamp: chrono::Utc::now(),
    })
}

/// Score a single campaign/creator pair
///
/// POST /api/v1/match/score
///
/// Request body:
/// ```json
/// {
///   "campaign": { "location": "...", "vibes": [], "compensationType": "monetary" },
///   "creator": { "location": "...", "categories": [], "instagramConnected": true }
/// }
/// ```
async fn score_pair(state: web::Data<AppState>, req: web::Json<ScoreRequest>) -> HttpResponse {
    let result = state.scorer.score(&req.campaign, &req.creator);
    HttpResponse::Ok().json(result)
}

/// Brand-facing match list
///
/// POST /api/v1/campaigns/matches
///
/// Request body:
/// ```json
/// { "campaignId": "string", "limit": 20 }
/// ```
async fn campaign_matches(
    state: web::Data<AppState>,
    req: web::Json<CampaignMatchesRequest>,
) -> Result<HttpResponse, ApiError> {
    req.validate()?;

    let campaign_id = &req.campaign_id;
    let limit = usize::from(req.limit).min(state.max_limit);

    if let Some(cache) = &state.cache {
        match cache.campaign_matches(campaign_id, limit).await {
            Ok(Some(cached)) => return Ok(HttpResponse::Ok().json(cached.as_ref())),
            Ok(None) => {}
            Err(e) => tracing::warn!("Cache read failed for campaign {}: {}", campaign_id, e),
        }
    }

    tracing::info!("Ranking creators for campaign: {}, limit: {}", campaign_id, limit);

    let mut campaign = state.store.get_campaign(campaign_id).await?;
    campaign.id.get_or_insert_with(|| campaign_id.clone());

    let creators = state.store.list_creators().await?;

    let ranking = state
        .matcher
        .rank_creators(&campaign, creators, &state.scorer, limit);

    let response = CampaignMatchesResponse {
        campaign_id: campaign_id.clone(),
        matches: ranking.items,
        total_candidates: ranking.total_candidates,
    };

    tracing::info!(
        "Returning {} creators for campaign {} (from {} candidates)",
        response.matches.len(),
        campaign_id,
        response.total_candidates
    );

    if let Some(cache) = &state.cache {
        if let Err(e) = cache.store_campaign_matches(limit, &response).await {
            tracing::warn!("Failed to cache matches for {}: {}", campaign_id, e);
        }
    }

    Ok(HttpResponse::Ok().json(response))
}

/// Creator-facing opportunity list
///
/// POST /api/v1/creators/opportunities
///
/// AI overrides from the match store, when present, decide visibility and
/// ordering; the rule-based result is still returned alongside.
async fn creator_opportunities(
    state: web::Data<AppState>,
    req: web::Json<OpportunitiesRequest>,
) -> Result<HttpResponse, ApiError> {
    req.validate()?;

    let creator_id = &req.creator_id;
    let limit = usize::from(req.limit).min(state.max_limit);

    tracing::info!("Finding opportunities for creator: {}, limit: {}", creator_id, limit);

    let mut creator = state.store.get_creator(creator_id).await?;
    creator.id.get_or_insert_with(|| creator_id.clone());

    let campaigns = state.store.list_campaigns().await?;

    let overrides = match &state.match_store {
        Some(match_store) => match match_store.get_overrides_for_creator(creator_id).await {
            Ok(overrides) => overrides,
            Err(e) => {
                tracing::warn!(
                    "Failed to load AI overrides for {}, using rule-based scores: {}",
                    creator_id,
                    e
                );
                HashMap::new()
            }
        },
        None => HashMap::new(),
    };

    let provider = AiScorer::new(state.scorer.clone(), overrides);

    let ranking = state
        .matcher
        .rank_opportunities(&creator, campaigns, &provider, limit);

    let response = OpportunitiesResponse {
        creator_id: creator_id.clone(),
        opportunities: ranking.items,
        total_candidates: ranking.total_candidates,
    };

    tracing::info!(
        "Returning {} opportunities for creator {} ({} AI overrides)",
        response.opportunities.len(),
        creator_id,
        provider.override_count()
    );

    Ok(HttpResponse::Ok().json(response))
}

/// Persist the rule-based result for one pair
///
/// POST /api/v1/matches/snapshot
///
/// Both documents are re-read, so cached brand lists for the campaign are
/// dropped once the snapshot is stored.
async fn save_snapshot(
    state: web::Data<AppState>,
    req: web::Json<SnapshotRequest>,
) -> Result<HttpResponse, ApiError> {
    req.validate()?;

    let match_store = state
        .match_store
        .as_ref()
        .ok_or(ApiError::MatchStoreUnavailable)?;

    let (campaign, creator) = tokio::try_join!(
        state.store.get_campaign(&req.campaign_id),
        state.store.get_creator(&req.creator_id),
    )?;

    let result = state.scorer.score(&campaign, &creator);

    match_store
        .save_snapshot(&req.campaign_id, &req.creator_id, &result)
        .await?;

    if let Some(cache) = &state.cache {
        if let Err(e) = cache.invalidate_campaign(&req.campaign_id).await {
            tracing::warn!("Failed to invalidate lists for {}: {}", req.campaign_id, e);
        }
    }

    Ok(HttpResponse::Ok().json(SnapshotResponse {
        campaign_id: req.campaign_id.clone(),
        creator_id: req.creator_id.clone(),
        result,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{
        Campaign, CollaborationPreference, CompensationType, ContentType, CreatorProfile,
        InstagramMetrics,
    };
    use crate::services::InMemoryStore;
    use actix_web::{http::StatusCode, test, App};
    use serde_json::{json, Value};

    fn create_state() -> AppState {
        let store = InMemoryStore::new()
            .with_campaign(Campaign {
                id: Some("camp1".to_string()),
                location: Some("Santo Domingo".to_string()),
                vibes: vec!["premium".to_string()],
                content_types: vec![ContentType::Video],
                compensation_type: Some(CompensationType::Monetary),
                ..Campaign::default()
            })
            .with_creator(CreatorProfile {
                id: Some("creator1".to_string()),
                location: Some("Santo Domingo".to_string()),
                categories: vec!["premium".to_string()],
                instagram_metrics: Some(InstagramMetrics {
                    followers: Some(50_000),
                    engagement_rate: Some(4.2),
                }),
                collaboration_preference: Some(CollaborationPreference::Both),
                instagram_connected: Some(true),
                ..CreatorProfile::default()
            })
            .with_creator(CreatorProfile {
                id: Some("creator2".to_string()),
                collaboration_preference: Some(CollaborationPreference::Exchange),
                ..CreatorProfile::default()
            });

        AppState {
            store: Arc::new(store),
            match_store: None,
            cache: None,
            scorer: RuleBasedScorer::default(),
            matcher: Matcher::default(),
            max_limit: 100,
        }
    }

    macro_rules! app {
        () => {
            test::init_service(
                App::new()
                    .app_data(web::Data::new(create_state()))
                    .configure(crate::routes::configure_routes),
            )
            .await
        };
    }

    #[actix_web::test]
    async fn test_health_check() {
        let app = app!();
        let req = test::TestRequest::get().uri("/api/v1/health").to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["status"], "healthy");
    }

    #[actix_web::test]
    async fn test_score_pair_empty_body_fields() {
        let app = app!();
        let req = test::TestRequest::post()
            .uri("/api/v1/match/score")
            .set_json(json!({ "campaign": {}, "creator": {} }))
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["score"], 0);
    }

    #[actix_web::test]
    async fn test_campaign_matches_filters_gated_creator() {
        let app = app!();
        let req = test::TestRequest::post()
            .uri("/api/v1/campaigns/matches")
            .set_json(json!({ "campaignId": "camp1" }))
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;

        assert_eq!(body["totalCandidates"], 2);
        let matches = body["matches"].as_array().unwrap();
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0]["creatorId"], "creator1");
        assert_eq!(matches[0]["source"], "rule");
    }

    #[actix_web::test]
    async fn test_opportunities_for_creator() {
        let app = app!();
        let req = test::TestRequest::post()
            .uri("/api/v1/creators/opportunities")
            .set_json(json!({ "creatorId": "creator1", "limit": 5 }))
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;

        let opportunities = body["opportunities"].as_array().unwrap();
        assert_eq!(opportunities.len(), 1);
        assert_eq!(opportunities[0]["displayScore"], 80);
    }

    #[actix_web::test]
    async fn test_unknown_campaign_is_404() {
        let app = app!();
        let req = test::TestRequest::post()
            .uri("/api/v1/campaigns/matches")
            .set_json(json!({ "campaignId": "missing" }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }

    #[actix_web::test]
    async fn test_empty_id_is_400() {
        let app = app!();
        let req = test::TestRequest::post()
            .uri("/api/v1/creators/opportunities")
            .set_json(json!({ "creatorId": "" }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }

    #[actix_web::test]
    async fn test_snapshot_without_match_store_is_503() {
        let app = app!();
        let req = test::TestRequest::post()
            .uri("/api/v1/matches/snapshot")
            .set_json(json!({ "campaignId": "camp1", "creatorId": "creator1" }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::SERVICE_UNAVAILABLE);
    }
}
