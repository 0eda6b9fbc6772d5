use crate::models::CampaignMatchesResponse;
use moka::future::Cache;
use redis::aio::ConnectionManager;
use redis::AsyncCommands;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

/// Errors that can occur with listing cache operations
#[derive(Debug, Error)]
pub enum CacheError {
    #[error("Redis error: {0}")]
    Redis(#[from] redis::RedisError),

    #[error("Unreadable cache entry: {0}")]
    Encoding(#[from] serde_json::Error),

    #[error("Local cache error: {0}")]
    Local(#[from] moka::PredicateError),
}

/// Brand-facing match lists, cached per campaign and page limit
///
/// L1 is an in-process moka cache keyed by `(campaign_id, limit)`. L2 keeps
/// one Redis hash per campaign with a field per limit, so every list of a
/// campaign shares one TTL and is dropped with a single `DEL`.
pub struct ListingCache {
    redis: ConnectionManager,
    local: Cache<(String, usize), Arc<CampaignMatchesResponse>>,
    ttl_secs: u64,
}

impl ListingCache {
    /// Connect to Redis and build the L1 cache
    pub async fn connect(redis_url: &str, local_capacity: u64, ttl_secs: u64) -> Result<Self, CacheError> {
        let client = redis::Client::open(redis_url)?;
        let redis = ConnectionManager::new(client).await?;

        let local = Cache::builder()
            .max_capacity(local_capacity)
            .time_to_live(Duration::from_secs(ttl_secs))
            .support_invalidation_closures()
            .build();

        Ok(Self {
            redis,
            local,
            ttl_secs,
        })
    }

    /// Cached list for a campaign, if any tier holds one
    pub async fn campaign_matches(
        &self,
        campaign_id: &str,
        limit: usize,
    ) -> Result<Option<Arc<CampaignMatchesResponse>>, CacheError> {
        let local_key = (campaign_id.to_string(), limit);
        if let Some(hit) = self.local.get(&local_key).await {
            tracing::trace!("L1 listing hit: {}:{}", campaign_id, limit);
            return Ok(Some(hit));
        }

        let mut conn = self.redis.clone();
        let stored: Option<String> = conn.hget(listing_key(campaign_id), limit).await?;

        let Some(json) = stored else {
            tracing::trace!("Listing miss: {}:{}", campaign_id, limit);
            return Ok(None);
        };

        let response = Arc::new(serde_json::from_str::<CampaignMatchesResponse>(&json)?);
        self.local.insert(local_key, Arc::clone(&response)).await;

        tracing::trace!("L2 listing hit: {}:{}", campaign_id, limit);
        Ok(Some(response))
    }

    /// Store a freshly ranked list in both tiers
    ///
    /// Writing any limit refreshes the TTL of the campaign's whole hash.
    pub async fn store_campaign_matches(
        &self,
        limit: usize,
        response: &CampaignMatchesResponse,
    ) -> Result<(), CacheError> {
        let json = serde_json::to_string(response)?;
        let key = listing_key(&response.campaign_id);
        let ttl = i64::try_from(self.ttl_secs).unwrap_or(i64::MAX);

        let mut conn = self.redis.clone();
        let _: () = redis::pipe()
            .atomic()
            .hset(&key, limit, json)
            .ignore()
            .expire(&key, ttl)
            .ignore()
            .query_async(&mut conn)
            .await?;

        self.local
            .insert(
                (response.campaign_id.clone(), limit),
                Arc::new(response.clone()),
            )
            .await;

        Ok(())
    }

    /// Drop every cached list of a campaign
    pub async fn invalidate_campaign(&self, campaign_id: &str) -> Result<(), CacheError> {
        let owned = campaign_id.to_string();
        self.local
            .invalidate_entries_if(move |(id, _), _| *id == owned)?;

        let mut conn = self.redis.clone();
        let _: () = conn.del(listing_key(campaign_id)).await?;

        tracing::debug!("Invalidated cached lists for campaign {}", campaign_id);
        Ok(())
    }
}

/// Redis hash holding every cached list of a campaign
pub fn listing_key(campaign_id: &str) -> String {
    format!("campaign_matches:{}", campaign_id)
}
