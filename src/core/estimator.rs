use thiserror::Error;
use tracing::{debug, info};

use crate::core::country::profile_for;
use crate::core::experience::normalize_experience;
use crate::core::normalize::{normalize, NormalizePolicy};
use crate::core::prompt::build_prompt;
use crate::models::{EstimationResult, JobQuery};
use crate::services::{LlmClient, LlmError, SearchClient, SearchError};

/// Classified pipeline failures, each mapped to a distinct
/// user-explainable response by the route layer.
#[derive(Debug, Error)]
pub enum EstimateError {
    /// Missing credential or broken configuration. Fatal, no retry.
    #[error("configuration error: {0}")]
    Config(String),

    /// Search produced nothing usable; the caller should suggest
    /// different input, not a retry.
    #[error("no usable salary sources found for this query")]
    NoCandidates,

    /// LLM output was not JSON even after fence stripping and brace
    /// extraction. Carries the offending text, truncated.
    #[error("model output was not parseable: {0}")]
    Parse(String),

    /// Numbers missing, implausible, or citations unverifiable. The
    /// candidate list is surfaced for transparency.
    #[error("could not extract a confident range: {reason}")]
    Validation {
        reason: String,
        candidates: Vec<String>,
    },

    /// Transport-level failure of an upstream API; retrying may help.
    #[error("upstream service failure: {0}")]
    Upstream(String),
}

impl EstimateError {
    pub fn validation(reason: impl Into<String>) -> Self {
        EstimateError::Validation {
            reason: reason.into(),
            candidates: Vec::new(),
        }
    }

    /// Attach the candidate URLs seen before the failure, so the UI
    /// can show them instead of swallowing the evidence.
    fn with_candidates(self, urls: Vec<String>) -> Self {
        match self {
            EstimateError::Validation { reason, .. } => EstimateError::Validation {
                reason,
                candidates: urls,
            },
            other => other,
        }
    }
}

impl From<SearchError> for EstimateError {
    fn from(err: SearchError) -> Self {
        match err {
            SearchError::MissingApiKey(name) => EstimateError::Config(name),
            other => EstimateError::Upstream(other.to_string()),
        }
    }
}

impl From<LlmError> for EstimateError {
    fn from(err: LlmError) -> Self {
        match err {
            LlmError::MissingApiKey(name) => EstimateError::Config(name),
            other => EstimateError::Upstream(other.to_string()),
        }
    }
}

/// Pipeline orchestrator: search, prompt, extract, normalize. One
/// sequential run per estimation request, all state request-local.
#[derive(Debug, Clone)]
pub struct Estimator {
    policy: NormalizePolicy,
}

impl Estimator {
    pub fn new(policy: NormalizePolicy) -> Self {
        Self { policy }
    }

    pub fn with_default_policy() -> Self {
        Self {
            policy: NormalizePolicy::default(),
        }
    }

    /// Run the full estimation pipeline for one submitted query.
    ///
    /// Search failures on individual queries are swallowed inside the
    /// search client; an empty candidate list short-circuits before
    /// any LLM call is made.
    pub async fn estimate(
        &self,
        query: &JobQuery,
        search: &SearchClient,
        llm: &LlmClient,
    ) -> Result<EstimationResult, EstimateError> {
        let profile = profile_for(&query.country);
        let experience = normalize_experience(
            query.experience_hint.as_deref(),
            query.job_description.as_deref(),
        );

        let candidates = search.search(query, &profile).await?;
        if candidates.is_empty() {
            info!(
                job_title = %query.job_title,
                country = %query.country,
                "search produced zero candidates, skipping extraction"
            );
            return Err(EstimateError::NoCandidates);
        }
        debug!(count = candidates.len(), "candidate pool assembled");

        let prompt = build_prompt(query, experience, &profile, &candidates);
        let raw = llm.complete(&prompt).await?;

        let result = normalize(
            &raw,
            &candidates,
            query.pay_type,
            &profile,
            experience,
            &self.policy,
        )
        .map_err(|e| e.with_candidates(candidates.iter().map(|c| c.url.clone()).collect()))?;

        info!(
            min = result.min_usd,
            max = result.max_usd,
            sources = result.sources.len(),
            "estimation complete"
        );
        Ok(result)
    }
}

impl Default for Estimator {
    fn default() -> Self {
        Self::with_default_policy()
    }
}
