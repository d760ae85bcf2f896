use reqwest::Client;
use serde::Deserialize;
use std::collections::HashMap;
use std::time::Duration;
use thiserror::Error;

/// Errors that can occur while fetching the FX rate table
#[derive(Debug, Error)]
pub enum FxError {
    #[error("HTTP request failed: {0}")]
    RequestError(#[from] reqwest::Error),

    #[error("FX API returned error: {0}")]
    ApiError(String),
}

#[derive(Debug, Deserialize)]
struct FxResponse {
    #[serde(default)]
    rates: HashMap<String, f64>,
}

/// Client for a base-USD exchange-rate provider. The supported
/// currency set is whatever the provider returns that run.
pub struct FxClient {
    base_url: String,
    client: Client,
}

impl FxClient {
    pub fn new(base_url: String) -> Result<Self, FxError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(25))
            .build()?;
        Ok(Self { base_url, client })
    }

    /// Current currency-code -> rate-vs-USD table. USD itself is
    /// always present at 1.0; non-positive provider rates are dropped.
    pub async fn usd_table(&self) -> Result<HashMap<String, f64>, FxError> {
        let url = format!("{}/v6/latest/USD", self.base_url.trim_end_matches('/'));
        let response = self.client.get(&url).send().await?;
        if !response.status().is_success() {
            return Err(FxError::ApiError(format!(
                "rate table request failed with status {}",
                response.status()
            )));
        }
        let parsed: FxResponse = response.json().await?;

        let mut table: HashMap<String, f64> = HashMap::from([("USD".to_string(), 1.0)]);
        for (code, rate) in parsed.rates {
            if rate > 0.0 && rate.is_finite() {
                table.insert(code.to_uppercase(), rate);
            }
        }
        Ok(table)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_shape_parsing() {
        let raw = r#"{"result": "success", "rates": {"USD": 1, "EUR": 0.92, "BAD": -3}}"#;
        let parsed: FxResponse = serde_json::from_str(raw).unwrap();
        assert_eq!(parsed.rates.get("EUR"), Some(&0.92));
        // Negative rates exist in the raw parse; usd_table drops them.
        assert!(parsed.rates.contains_key("BAD"));
    }
}
