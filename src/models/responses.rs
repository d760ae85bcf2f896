use serde::{Deserialize, Serialize};

use crate::models::domain::{GeoRelevance, RangeTag};

/// One displayed citation in the estimate response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceEntry {
    pub title: String,
    pub url: String,
    #[serde(rename = "rangeTag")]
    pub range_tag: RangeTag,
    pub strength: u8,
    #[serde(rename = "geoTag")]
    pub geo_tag: GeoRelevance,
}

/// Final output contract to the presentation layer
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EstimateResponse {
    pub min: i64,
    pub max: i64,
    pub currency: String,
    #[serde(rename = "rateType")]
    pub rate_type: String,
    pub sources: Vec<SourceEntry>,
}

/// Country / state / city name list for the dropdown UI
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NameListResponse {
    pub names: Vec<String>,
    pub count: usize,
}

/// Supported display currencies, provider-driven
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CurrenciesResponse {
    pub currencies: Vec<String>,
    pub base: String,
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
    /// Candidates found before the failure, shown for transparency when
    /// extraction failed on a non-empty pool.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub candidates: Vec<String>,
}

impl ErrorResponse {
    pub fn new(error: &str, message: impl Into<String>, status_code: u16) -> Self {
        Self {
            error: error.to_string(),
            message: message.into(),
            status_code,
            candidates: Vec::new(),
        }
    }
}
