use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::models::domain::{JobQuery, PayType};

/// Request to estimate a compensation range
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct EstimateRequest {
    #[validate(length(min = 1))]
    #[serde(alias = "job_title", rename = "jobTitle")]
    pub job_title: String,
    #[serde(default)]
    #[serde(alias = "experience_hint", rename = "experienceHint")]
    pub experience_hint: Option<String>,
    #[serde(default)]
    #[serde(alias = "job_description", rename = "jobDescription")]
    pub job_description: Option<String>,
    #[validate(length(min = 1))]
    pub country: String,
    #[serde(default)]
    pub state: Option<String>,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default = "default_rate_type")]
    #[serde(alias = "rate_type", rename = "rateType")]
    pub rate_type: String,
    #[validate(length(min = 3, max = 3))]
    #[serde(default = "default_currency")]
    pub currency: String,
}

fn default_rate_type() -> String {
    "salary".to_string()
}

fn default_currency() -> String {
    "USD".to_string()
}

impl EstimateRequest {
    /// Parse the wire rate type; anything not "hourly" means salary.
    pub fn pay_type(&self) -> PayType {
        match self.rate_type.to_lowercase().as_str() {
            "hourly" => PayType::Hourly,
            _ => PayType::Annual,
        }
    }

    /// Build the immutable pipeline query. "N/A" placeholders from the
    /// dropdown UI are treated as absent.
    pub fn into_job_query(self) -> JobQuery {
        let pay_type = self.pay_type();
        JobQuery {
            job_title: self.job_title.trim().to_string(),
            experience_hint: non_placeholder(self.experience_hint),
            job_description: non_placeholder(self.job_description),
            country: self.country.trim().to_string(),
            state: non_placeholder(self.state),
            city: non_placeholder(self.city),
            pay_type,
            display_currency: self.currency.trim().to_uppercase(),
        }
    }
}

fn non_placeholder(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty() && v != "N/A")
}

/// Query parameters for the state-list endpoint
#[derive(Debug, Clone, Deserialize)]
pub struct StatesQuery {
    pub country: String,
}

/// Query parameters for the city-list endpoint
#[derive(Debug, Clone, Deserialize)]
pub struct CitiesQuery {
    pub country: String,
    #[serde(default)]
    pub state: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base_request() -> EstimateRequest {
        EstimateRequest {
            job_title: "Data Engineer".to_string(),
            experience_hint: None,
            job_description: None,
            country: "Germany".to_string(),
            state: Some("N/A".to_string()),
            city: Some("Berlin".to_string()),
            rate_type: "salary".to_string(),
            currency: "eur".to_string(),
        }
    }

    #[test]
    fn test_pay_type_parsing() {
        let mut req = base_request();
        assert_eq!(req.pay_type(), PayType::Annual);
        req.rate_type = "Hourly".to_string();
        assert_eq!(req.pay_type(), PayType::Hourly);
        req.rate_type = "weekly".to_string();
        assert_eq!(req.pay_type(), PayType::Annual);
    }

    #[test]
    fn test_na_placeholders_dropped() {
        let query = base_request().into_job_query();
        assert_eq!(query.state, None);
        assert_eq!(query.city.as_deref(), Some("Berlin"));
        assert_eq!(query.display_currency, "EUR");
    }

    #[test]
    fn test_validation_rejects_empty_title() {
        use validator::Validate;
        let mut req = base_request();
        req.job_title = String::new();
        assert!(req.validate().is_err());
    }
}
