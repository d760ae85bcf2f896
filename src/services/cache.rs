use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

/// Errors that can occur with cache operations
#[derive(Debug, Error)]
pub enum CacheError {
    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Cache miss: {0}")]
    CacheMiss(String),
}

/// In-memory TTL cache for slow, rarely-changing upstream lookups
/// (geography name lists, the daily FX table).
pub struct TtlCache {
    inner: moka::future::Cache<String, Vec<u8>>,
}

impl TtlCache {
    pub fn new(capacity: u64, ttl_secs: u64) -> Self {
        let inner = moka::future::CacheBuilder::new(capacity)
            .time_to_live(Duration::from_secs(ttl_secs))
            .build();
        Self { inner }
    }

    pub async fn get<T>(&self, key: &str) -> Result<T, CacheError>
    where
        T: for<'de> Deserialize<'de>,
    {
        if let Some(bytes) = self.inner.get(key).await {
            tracing::trace!("Cache hit: {}", key);
            return Ok(serde_json::from_slice(&bytes)?);
        }
        tracing::trace!("Cache miss: {}", key);
        Err(CacheError::CacheMiss(key.to_string()))
    }

    pub async fn set<T>(&self, key: &str, value: &T) -> Result<(), CacheError>
    where
        T: Serialize,
    {
        let bytes = serde_json::to_vec(value)?;
        self.inner.insert(key.to_string(), bytes).await;
        tracing::trace!("Cache set: {}", key);
        Ok(())
    }
}

/// Cache key builder
pub struct CacheKey;

impl CacheKey {
    pub fn countries() -> String {
        "geo:countries".to_string()
    }

    pub fn states(country: &str) -> String {
        format!("geo:states:{}", country.to_lowercase())
    }

    pub fn cities(country: &str, state: &str) -> String {
        format!("geo:cities:{}:{}", country.to_lowercase(), state.to_lowercase())
    }

    pub fn fx_table() -> String {
        "fx:usd".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_cache_set_get() {
        let cache = TtlCache::new(100, 60);

        let names = vec!["Austria".to_string(), "Brazil".to_string()];
        cache.set(&CacheKey::countries(), &names).await.unwrap();

        let cached: Vec<String> = cache.get(&CacheKey::countries()).await.unwrap();
        assert_eq!(cached, names);

        assert!(cache.get::<Vec<String>>("geo:states:nowhere").await.is_err());
    }

    #[test]
    fn test_cache_key_builder() {
        assert_eq!(CacheKey::countries(), "geo:countries");
        assert_eq!(CacheKey::states("Brazil"), "geo:states:brazil");
        assert_eq!(
            CacheKey::cities("United States", "California"),
            "geo:cities:united states:california"
        );
        assert_eq!(CacheKey::fx_table(), "fx:usd");
    }
}
