// Core pipeline exports
pub mod convert;
pub mod country;
pub mod estimator;
pub mod experience;
pub mod normalize;
pub mod prompt;
pub mod query;
pub mod scoring;

pub use convert::{to_display, to_usd};
pub use country::{is_blocked_host, profile_for, reliability_boost};
pub use estimator::{EstimateError, Estimator};
pub use experience::normalize_experience;
pub use normalize::{normalize, NormalizePolicy};
pub use prompt::build_prompt;
pub use query::{build_queries, mine_skills};
pub use scoring::{assemble_candidates, classify_relevance, host_of, slugify, RawResult};
