use crate::models::{Campaign, CreatorProfile};
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::collections::HashMap;
use std::time::Duration;
use thiserror::Error;

/// Errors that can occur when reading from the document store
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("HTTP request failed: {0}")]
    RequestError(#[from] reqwest::Error),

    #[error("API returned error: {0}")]
    ApiError(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Unauthorized: invalid API key or project")]
    Unauthorized,

    #[error("Invalid response format: {0}")]
    InvalidResponse(String),
}

/// Read access to campaign and creator documents
///
/// Listing handlers depend on this trait rather than on a concrete backend,
/// so the scorer never touches storage.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    async fn get_campaign(&self, campaign_id: &str) -> Result<Campaign, StoreError>;

    async fn list_campaigns(&self) -> Result<Vec<Campaign>, StoreError>;

    async fn get_creator(&self, creator_id: &str) -> Result<CreatorProfile, StoreError>;

    async fn list_creators(&self) -> Result<Vec<CreatorProfile>, StoreError>;
}

/// Collection IDs in the document database
#[derive(Debug, Clone)]
pub struct StoreCollections {
    pub campaigns: String,
    pub creators: String,
}

/// Document store client for an Appwrite-compatible databases REST API
pub struct RestDocumentStore {
    base_url: String,
    api_key: String,
    project_id: String,
    database_id: String,
    page_size: u32,
    client: Client,
    collections: StoreCollections,
}

impl RestDocumentStore {
    /// Create a new REST store client
    pub fn new(
        base_url: String,
        api_key: String,
        project_id: String,
        database_id: String,
        collections: StoreCollections,
        page_size: u32,
        timeout_secs: u64,
    ) -> Result<Self, StoreError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()?;

        Ok(Self {
            base_url,
            api_key,
            project_id,
            database_id,
            page_size,
            client,
            collections,
        })
    }

    fn documents_url(&self, collection: &str) -> String {
        format!(
            "{}/databases/{}/collections/{}/documents",
            self.base_url.trim_end_matches('/'),
            self.database_id,
            collection
        )
    }

    async fn get_json(&self, url: &str) -> Result<Value, StoreError> {
        let response = self
            .client
            .get(url)
            .header("X-Appwrite-Key", &self.api_key)
            .header("X-Appwrite-Project", &self.project_id)
            .send()
            .await?;

        match response.status() {
            status if status.is_success() => Ok(response.json().await?),
            StatusCode::NOT_FOUND => Err(StoreError::NotFound(url.to_string())),
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => Err(StoreError::Unauthorized),
            status => {
                let body = response
                    .text()
                    .await
                    .unwrap_or_else(|_| "Unable to read body".to_string());
                tracing::error!("Document store returned {} for {}: {}", status, url, body);
                Err(StoreError::ApiError(format!("Request failed: {}", status)))
            }
        }
    }

    /// Fetch a single document by ID
    async fn get_document<T: DeserializeOwned>(
        &self,
        collection: &str,
        document_id: &str,
    ) -> Result<T, StoreError> {
        let url = format!(
            "{}/{}",
            self.documents_url(collection),
            urlencoding::encode(document_id)
        );

        tracing::debug!("Fetching document {}/{}", collection, document_id);

        let json = match self.get_json(&url).await {
            Err(StoreError::NotFound(_)) => {
                return Err(StoreError::NotFound(format!(
                    "{} not found in {}",
                    document_id, collection
                )))
            }
            other => other?,
        };

        decode_document(json).map_err(|e| {
            StoreError::InvalidResponse(format!("Failed to parse {}/{}: {}", collection, document_id, e))
        })
    }

    /// List every document in a collection, `page_size` at a time
    ///
    /// Paging stops once `total` documents have been read or a page comes
    /// back short.
    async fn list_documents<T: DeserializeOwned>(&self, collection: &str) -> Result<Vec<T>, StoreError> {
        let page_size = u64::from(self.page_size.max(1));
        let limit = format!("limit({})", page_size);
        let mut parsed: Vec<T> = Vec::new();
        let mut offset: u64 = 0;

        loop {
            let url = format!(
                "{}?queries[]={}&queries[]={}",
                self.documents_url(collection),
                urlencoding::encode(&limit),
                urlencoding::encode(&format!("offset({})", offset))
            );

            let json = self.get_json(&url).await?;

            let total = json.get("total").and_then(Value::as_u64);

            let documents = json
                .get("documents")
                .and_then(Value::as_array)
                .ok_or_else(|| StoreError::InvalidResponse("Missing documents array".into()))?;

            let fetched = documents.len() as u64;
            offset += fetched;

            parsed.extend(documents.iter().cloned().filter_map(|doc| match decode_document(doc) {
                Ok(item) => Some(item),
                Err(e) => {
                    tracing::warn!("Skipping unreadable document in {}: {}", collection, e);
                    None
                }
            }));

            tracing::debug!(
                "Fetched page of {} from {} (offset: {}, total: {:?})",
                fetched,
                collection,
                offset,
                total
            );

            let done = match total {
                Some(total) => offset >= total,
                None => false,
            };
            if done || fetched < page_size {
                break;
            }
        }

        tracing::debug!("Listed {} documents from {}", parsed.len(), collection);

        Ok(parsed)
    }
}

#[async_trait]
impl DocumentStore for RestDocumentStore {
    async fn get_campaign(&self, campaign_id: &str) -> Result<Campaign, StoreError> {
        self.get_document(&self.collections.campaigns, campaign_id).await
    }

    async fn list_campaigns(&self) -> Result<Vec<Campaign>, StoreError> {
        self.list_documents(&self.collections.campaigns).await
    }

    async fn get_creator(&self, creator_id: &str) -> Result<CreatorProfile, StoreError> {
        self.get_document(&self.collections.creators, creator_id).await
    }

    async fn list_creators(&self) -> Result<Vec<CreatorProfile>, StoreError> {
        self.list_documents(&self.collections.creators).await
    }
}

/// Unwrap the optional `data` envelope and copy `$id` into `id`
fn decode_document<T: DeserializeOwned>(doc: Value) -> Result<T, serde_json::Error> {
    let mut data = match doc {
        Value::Object(mut map) => match map.remove("data") {
            Some(Value::Object(mut inner)) => {
                if let Some(id) = map.remove("$id") {
                    inner.entry("$id").or_insert(id);
                }
                inner
            }
            _ => map,
        },
        other => return serde_json::from_value(other),
    };

    if !data.contains_key("id") {
        if let Some(id) = data.get("$id").cloned() {
            data.insert("id".to_string(), id);
        }
    }

    serde_json::from_value(Value::Object(data))
}

/// Fixed in-memory store for tests and local runs
#[derive(Debug, Clone, Default)]
pub struct InMemoryStore {
    campaigns: HashMap<String, Campaign>,
    creators: HashMap<String, CreatorProfile>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a campaign; documents without an ID are ignored
    pub fn with_campaign(mut self, campaign: Campaign) -> Self {
        if let Some(id) = campaign.id.clone() {
            self.campaigns.insert(id, campaign);
        }
        self
    }

    /// Add a creator; documents without an ID are ignored
    pub fn with_creator(mut self, creator: CreatorProfile) -> Self {
        if let Some(id) = creator.id.clone() {
            self.creators.insert(id, creator);
        }
        self
    }
}

#[async_trait]
impl DocumentStore for InMemoryStore {
    async fn get_campaign(&self, campaign_id: &str) -> Result<Campaign, StoreError> {
        self.campaigns
            .get(campaign_id)
            .cloned()
            .ok_or_else(|| StoreError::NotFound(format!("campaign {}", campaign_id)))
    }

    async fn list_campaigns(&self) -> Result<Vec<Campaign>, StoreError> {
        let mut campaigns: Vec<_> = self.campaigns.values().cloned().collect();
        campaigns.sort_by(|a, b| a.id.cmp(&b.id));
        Ok(campaigns)
    }

    async fn get_creator(&self, creator_id: &str) -> Result<CreatorProfile, StoreError> {
        self.creators
            .get(creator_id)
            .cloned()
            .ok_or_else(|| StoreError::NotFound(format!("creator {}", creator_id)))
    }

    async fn list_creators(&self) -> Result<Vec<CreatorProfile>, StoreError> {
        let mut creators: Vec<_> = self.creators.values().cloned().collect();
        creators.sort_by(|a, b| a.id.cmp(&b.id));
        Ok(creators)
    }
}
