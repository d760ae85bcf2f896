use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, warn};

use crate::core::country::locale_hint;
use crate::core::query::build_queries;
use crate::core::scoring::{assemble_candidates, RawResult};
use crate::models::{CandidateSource, CountryProfile, JobQuery};

/// Errors that can occur while talking to the search provider
#[derive(Debug, Error)]
pub enum SearchError {
    #[error("missing API credential: {0}")]
    MissingApiKey(String),

    #[error("HTTP request failed: {0}")]
    RequestError(#[from] reqwest::Error),

    #[error("search API returned error: {0}")]
    ApiError(String),
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    organic_results: Vec<OrganicResult>,
}

#[derive(Debug, Deserialize)]
struct OrganicResult {
    link: Option<String>,
    title: Option<String>,
    snippet: Option<String>,
}

/// Client for a SerpAPI-shaped search endpoint.
///
/// Runs every query from the query builder sequentially; a single
/// failed query is logged and skipped so one bad request cannot abort
/// the rest of the run.
pub struct SearchClient {
    base_url: String,
    api_key: Option<String>,
    per_query_results: usize,
    candidate_cap: usize,
    client: Client,
}

impl SearchClient {
    pub fn new(
        base_url: String,
        api_key: Option<String>,
        per_query_results: usize,
        candidate_cap: usize,
    ) -> Result<Self, SearchError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(35))
            .build()?;

        Ok(Self {
            base_url,
            api_key,
            per_query_results,
            candidate_cap,
            client,
        })
    }

    /// Discover, filter, tag and rank candidate salary sources for the
    /// submitted query. An empty result is not an error; the caller
    /// decides whether that means "insufficient data".
    pub async fn search(
        &self,
        query: &JobQuery,
        profile: &CountryProfile,
    ) -> Result<Vec<CandidateSource>, SearchError> {
        let api_key = self
            .api_key
            .as_deref()
            .filter(|k| !k.is_empty())
            .ok_or_else(|| SearchError::MissingApiKey("SERPAPI_API_KEY".to_string()))?;

        let queries = build_queries(query, profile);
        let hint = locale_hint(profile);

        let mut raw: Vec<RawResult> = Vec::new();
        let mut failures = 0usize;
        let mut last_error = String::new();

        for q in &queries {
            match self.run_query(q, api_key, hint.as_deref()).await {
                Ok(results) => {
                    debug!(query = %q, results = results.len(), "search query complete");
                    raw.extend(results);
                }
                Err(e) => {
                    warn!(query = %q, error = %e, "search query failed, continuing");
                    failures += 1;
                    last_error = e.to_string();
                }
            }
        }

        // Every query failing is an upstream outage, not "no data".
        if failures == queries.len() && !queries.is_empty() {
            return Err(SearchError::ApiError(format!(
                "all {} search queries failed, last error: {}",
                failures, last_error
            )));
        }

        Ok(assemble_candidates(raw, query, profile, self.candidate_cap))
    }

    async fn run_query(
        &self,
        q: &str,
        api_key: &str,
        locale: Option<&str>,
    ) -> Result<Vec<RawResult>, SearchError> {
        let url = format!("{}/search.json", self.base_url.trim_end_matches('/'));
        let num = self.per_query_results.to_string();

        let mut params: Vec<(&str, &str)> = vec![
            ("engine", "google"),
            ("q", q),
            ("api_key", api_key),
            ("num", &num),
        ];
        if let Some(gl) = locale {
            params.push(("gl", gl));
        }

        let response = self.client.get(&url).query(&params).send().await?;
        if !response.status().is_success() {
            return Err(SearchError::ApiError(format!(
                "search request failed with status {}",
                response.status()
            )));
        }

        let parsed: SearchResponse = response.json().await?;
        Ok(parsed
            .organic_results
            .into_iter()
            .filter_map(|r| {
                let link = r.link?;
                if !link.starts_with("http") {
                    return None;
                }
                Some(RawResult {
                    url: link,
                    title: r.title.unwrap_or_default(),
                    snippet: r.snippet.unwrap_or_default(),
                })
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_key_is_config_error() {
        let client = SearchClient::new("https://serpapi.test".to_string(), None, 20, 28).unwrap();
        let query = JobQuery {
            job_title: "Chef".to_string(),
            experience_hint: None,
            job_description: None,
            country: "France".to_string(),
            state: None,
            city: None,
            pay_type: crate::models::PayType::Annual,
            display_currency: "EUR".to_string(),
        };
        let profile = crate::core::country::profile_for("France");
        let err = tokio_test::block_on(client.search(&query, &profile)).unwrap_err();
        assert!(matches!(err, SearchError::MissingApiKey(_)));
    }

    #[test]
    fn test_empty_key_is_config_error() {
        let client = SearchClient::new(
            "https://serpapi.test".to_string(),
            Some(String::new()),
            20,
            28,
        )
        .unwrap();
        assert!(client.api_key.as_deref() == Some(""));
    }
}
