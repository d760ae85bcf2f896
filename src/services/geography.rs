use reqwest::Client;
use serde::Deserialize;
use serde_json::json;
use std::time::Duration;
use thiserror::Error;
use tracing::debug;

/// Errors that can occur while talking to the geography provider
#[derive(Debug, Error)]
pub enum GeoError {
    #[error("HTTP request failed: {0}")]
    RequestError(#[from] reqwest::Error),

    #[error("geography API returned error: {0}")]
    ApiError(String),
}

#[derive(Debug, Deserialize)]
struct CountriesResponse {
    #[serde(default)]
    data: Vec<CountryEntry>,
}

#[derive(Debug, Deserialize)]
struct CountryEntry {
    country: Option<String>,
}

#[derive(Debug, Deserialize)]
struct StatesResponse {
    #[serde(default)]
    data: Option<StatesData>,
}

#[derive(Debug, Deserialize)]
struct StatesData {
    #[serde(default)]
    states: Vec<StateEntry>,
}

#[derive(Debug, Deserialize)]
struct StateEntry {
    name: Option<String>,
}

#[derive(Debug, Deserialize)]
struct CitiesResponse {
    #[serde(default)]
    data: Vec<String>,
}

/// Client for a CountriesNow-shaped geography provider. Black box:
/// every endpoint returns a plain name list. Results are memoized by
/// the route layer's TTL cache.
pub struct GeoClient {
    base_url: String,
    client: Client,
}

impl GeoClient {
    pub fn new(base_url: String) -> Result<Self, GeoError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(25))
            .build()?;
        Ok(Self { base_url, client })
    }

    pub async fn countries(&self) -> Result<Vec<String>, GeoError> {
        let url = format!("{}/countries", self.base_url.trim_end_matches('/'));
        let response = self.client.get(&url).send().await?;
        if !response.status().is_success() {
            return Err(GeoError::ApiError(format!(
                "country list request failed with status {}",
                response.status()
            )));
        }
        let parsed: CountriesResponse = response.json().await?;
        let names = parsed.data.into_iter().filter_map(|c| c.country).collect();
        Ok(clean_names(names))
    }

    pub async fn states(&self, country: &str) -> Result<Vec<String>, GeoError> {
        let url = format!("{}/countries/states", self.base_url.trim_end_matches('/'));
        let response = self
            .client
            .post(&url)
            .json(&json!({ "country": country }))
            .send()
            .await?;
        if !response.status().is_success() {
            // Countries without subdivisions come back as errors from
            // the provider; treat that as an empty list.
            debug!(country, status = %response.status(), "state lookup unavailable");
            return Ok(Vec::new());
        }
        let parsed: StatesResponse = response.json().await?;
        let names = parsed
            .data
            .map(|d| d.states.into_iter().filter_map(|s| s.name).collect())
            .unwrap_or_default();
        Ok(clean_names(names))
    }

    pub async fn cities(&self, country: &str, state: Option<&str>) -> Result<Vec<String>, GeoError> {
        let base = self.base_url.trim_end_matches('/');
        let (url, payload) = match state.filter(|s| !s.is_empty() && *s != "N/A") {
            Some(state) => (
                format!("{}/countries/state/cities", base),
                json!({ "country": country, "state": state }),
            ),
            None => (
                format!("{}/countries/cities", base),
                json!({ "country": country }),
            ),
        };
        let response = self.client.post(&url).json(&payload).send().await?;
        if !response.status().is_success() {
            debug!(country, status = %response.status(), "city lookup unavailable");
            return Ok(Vec::new());
        }
        let parsed: CitiesResponse = response.json().await?;
        Ok(clean_names(parsed.data))
    }
}

/// Trim, drop empties, dedup and sort case-insensitively.
fn clean_names(names: Vec<String>) -> Vec<String> {
    let mut out: Vec<String> = names
        .into_iter()
        .map(|n| n.trim().to_string())
        .filter(|n| !n.is_empty())
        .collect();
    out.sort_by(|a, b| a.to_lowercase().cmp(&b.to_lowercase()));
    out.dedup_by(|a, b| a.eq_ignore_ascii_case(b));
    out
}
