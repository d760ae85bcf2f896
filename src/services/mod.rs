// Service exports
pub mod cache;
pub mod fx;
pub mod geography;
pub mod llm;
pub mod search;

pub use cache::{CacheError, CacheKey, TtlCache};
pub use fx::{FxClient, FxError};
pub use geography::{GeoClient, GeoError};
pub use llm::{LlmClient, LlmError};
pub use search::{SearchClient, SearchError};
