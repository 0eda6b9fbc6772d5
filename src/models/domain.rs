use crate::models::lenient;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::str::FromStr;

/// Campaign document as stored by brands
///
/// Every field is optional: listing screens score campaigns that are only
/// partially loaded, so nothing here may be required.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Campaign {
    #[serde(default, deserialize_with = "lenient::option")]
    pub id: Option<String>,
    #[serde(default, deserialize_with = "lenient::option")]
    pub title: Option<String>,
    #[serde(default, deserialize_with = "lenient::option")]
    pub brand_id: Option<String>,
    #[serde(default, deserialize_with = "lenient::option")]
    pub location: Option<String>,
    #[serde(default, deserialize_with = "lenient::parsed")]
    pub age_range: Option<AgeRange>,
    #[serde(default, deserialize_with = "lenient::string_list")]
    pub vibes: Vec<String>,
    #[serde(default, deserialize_with = "lenient::parsed_list")]
    pub content_types: Vec<ContentType>,
    #[serde(default, deserialize_with = "lenient::parsed")]
    pub compensation_type: Option<CompensationType>,
    #[serde(default, deserialize_with = "lenient::option")]
    pub goal: Option<String>,
    #[serde(default, deserialize_with = "lenient::option")]
    pub status: Option<String>,
    #[serde(default, deserialize_with = "lenient::timestamp")]
    pub created_at: Option<DateTime<Utc>>,
}

impl Campaign {
    /// Campaigns without a status are treated as open
    pub fn is_open(&self) -> bool {
        match self.status.as_deref().map(str::trim) {
            None | Some("") => true,
            Some(status) => status.eq_ignore_ascii_case("active"),
        }
    }
}

/// Creator account data relevant to matching
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatorProfile {
    #[serde(default, deserialize_with = "lenient::option")]
    pub id: Option<String>,
    #[serde(default, deserialize_with = "lenient::option")]
    pub display_name: Option<String>,
    #[serde(default, deserialize_with = "lenient::option")]
    pub location: Option<String>,
    #[serde(default, deserialize_with = "lenient::string_list")]
    pub categories: Vec<String>,
    /// Older documents store niches under `tags`
    #[serde(default, deserialize_with = "lenient::string_list")]
    pub tags: Vec<String>,
    #[serde(default, deserialize_with = "lenient::option")]
    pub instagram_metrics: Option<InstagramMetrics>,
    #[serde(default, deserialize_with = "lenient::parsed")]
    pub collaboration_preference: Option<CollaborationPreference>,
    #[serde(default, deserialize_with = "lenient::option")]
    pub instagram_connected: Option<bool>,
    #[serde(default, deserialize_with = "lenient::option")]
    pub tiktok_connected: Option<bool>,
    #[serde(default, deserialize_with = "lenient::timestamp")]
    pub last_active_at: Option<DateTime<Utc>>,
}

impl CreatorProfile {
    pub fn instagram(&self) -> bool {
        self.instagram_connected.unwrap_or(false)
    }

    pub fn tiktok(&self) -> bool {
        self.tiktok_connected.unwrap_or(false)
    }

    pub fn followers(&self) -> Option<u64> {
        self.instagram_metrics.as_ref().and_then(|m| m.followers)
    }

    pub fn engagement_rate(&self) -> Option<f64> {
        self.instagram_metrics.as_ref().and_then(|m| m.engagement_rate)
    }

    /// Union of `categories` and `tags`, lowercased and trimmed
    pub fn niches(&self) -> BTreeSet<String> {
        self.categories
            .iter()
            .chain(self.tags.iter())
            .map(|tag| tag.trim().to_lowercase())
            .filter(|tag| !tag.is_empty())
            .collect()
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InstagramMetrics {
    #[serde(default, deserialize_with = "lenient::count")]
    pub followers: Option<u64>,
    /// Percentage, e.g. `4.2` for 4.2%
    #[serde(default, deserialize_with = "lenient::number")]
    pub engagement_rate: Option<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CompensationType {
    Monetary,
    Exchange,
}

impl FromStr for CompensationType {
    type Err = UnknownValue;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "monetary" | "paid" => Ok(Self::Monetary),
            "exchange" | "barter" => Ok(Self::Exchange),
            other => Err(UnknownValue(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum CollaborationPreference {
    #[serde(rename = "Con remuneración")]
    Paid,
    #[serde(rename = "Intercambios")]
    Exchange,
    #[serde(rename = "Ambos")]
    Both,
}

impl CollaborationPreference {
    /// Whether a creator with this preference takes campaigns of `kind`
    pub fn accepts(self, kind: CompensationType) -> bool {
        match (self, kind) {
            (Self::Both, _) => true,
            (Self::Paid, CompensationType::Monetary) => true,
            (Self::Exchange, CompensationType::Exchange) => true,
            _ => false,
        }
    }
}

impl FromStr for CollaborationPreference {
    type Err = UnknownValue;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "con remuneración" | "con remuneracion" | "remuneración" | "paid" => Ok(Self::Paid),
            "intercambios" | "intercambio" | "exchange" => Ok(Self::Exchange),
            "ambos" | "both" => Ok(Self::Both),
            other => Err(UnknownValue(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum AgeRange {
    #[serde(rename = "18-24")]
    From18To24,
    #[serde(rename = "25-34")]
    From25To34,
    #[serde(rename = "35-44")]
    From35To44,
    #[serde(rename = "45+")]
    Over45,
}

impl FromStr for AgeRange {
    type Err = UnknownValue;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "18-24" => Ok(Self::From18To24),
            "25-34" => Ok(Self::From25To34),
            "35-44" => Ok(Self::From35To44),
            "45+" => Ok(Self::Over45),
            other => Err(UnknownValue(other.to_string())),
        }
    }
}

/// Deliverable formats a campaign can request
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentType {
    Post,
    Video,
    Stories,
    Carousel,
}

impl ContentType {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Post => "post",
            Self::Video => "video",
            Self::Stories => "stories",
            Self::Carousel => "carousel",
        }
    }
}

impl FromStr for ContentType {
    type Err = UnknownValue;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "post" | "posts" => Ok(Self::Post),
            "video" | "videos" | "reel" | "reels" => Ok(Self::Video),
            "stories" | "story" => Ok(Self::Stories),
            "carousel" | "carrusel" => Ok(Self::Carousel),
            other => Err(UnknownValue(other.to_string())),
        }
    }
}

/// A string that did not name any known variant
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownValue(pub String);

impl fmt::Display for UnknownValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown value: {}", self.0)
    }
}

impl std::error::Error for UnknownValue {}

/// Scoring criteria, in evaluation order
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Criterion {
    Compensation,
    Location,
    Vibes,
    Engagement,
    Followers,
    ContentTypes,
}

/// Output of the match scorer
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchResult {
    /// Percentage in `[0, 100]`
    pub score: u8,
    pub reasons: Vec<String>,
    pub breakdown: BTreeMap<Criterion, u32>,
}

impl MatchResult {
    /// True when the compensation gate rejected the pair
    pub fn is_gated(&self) -> bool {
        self.breakdown.contains_key(&Criterion::Compensation)
    }
}

/// Point weights and thresholds used by the scorer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringConfig {
    pub location_weight: u32,
    pub vibe_weight_per_tag: u32,
    pub vibe_weight_cap: u32,
    pub engagement_weight: u32,
    pub follower_weight: u32,
    pub content_type_weight: u32,
    /// Engagement rate percentage that counts as above platform average
    pub engagement_rate_threshold: f64,
    pub monetary_followers: FollowerTier,
    pub exchange_followers: FollowerTier,
    /// Campaign locations that accept creators from anywhere
    pub location_wildcards: Vec<String>,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            location_weight: 25,
            vibe_weight_per_tag: 10,
            vibe_weight_cap: 30,
            engagement_weight: 15,
            follower_weight: 15,
            content_type_weight: 15,
            engagement_rate_threshold: 3.0,
            monetary_followers: FollowerTier { min: 10_000, max: 1_000_000 },
            exchange_followers: FollowerTier { min: 1_000, max: 100_000 },
            location_wildcards: vec![
                "anywhere".to_string(),
                "remote".to_string(),
                "cualquiera".to_string(),
                "todo el país".to_string(),
            ],
        }
    }
}

/// Inclusive follower-count band
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FollowerTier {
    pub min: u64,
    pub max: u64,
}

impl FollowerTier {
    #[inline]
    pub fn contains(&self, followers: u64) -> bool {
        followers >= self.min && followers <= self.max
    }
}
