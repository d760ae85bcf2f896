// Model exports
pub mod domain;
pub mod requests;
pub mod responses;

pub use domain::{
    CandidateSource, CountryProfile, EstimationResult, ExperienceLevel, GeoRelevance, JobQuery,
    PayType, QuotePeriod, RangeTag, ScoredSource,
};
pub use requests::{CitiesQuery, EstimateRequest, StatesQuery};
pub use responses::{
    CurrenciesResponse, ErrorResponse, EstimateResponse, HealthResponse, NameListResponse,
    SourceEntry,
};
