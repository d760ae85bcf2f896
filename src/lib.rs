//! Rate Scout - compensation range estimation service
//!
//! This library implements a search-grounded estimation pipeline: web
//! search discovers candidate salary sources, an LLM extracts a range
//! from them under a closed-world citation rule, and a normalization
//! pass repairs units, checks plausibility and scores the citations.

pub mod config;
pub mod core;
pub mod models;
pub mod routes;
pub mod services;

// Re-export commonly used types
pub use crate::core::{EstimateError, Estimator, NormalizePolicy};
pub use crate::models::{
    CandidateSource, EstimateRequest, EstimateResponse, EstimationResult, GeoRelevance, JobQuery,
    PayType, ScoredSource,
};
