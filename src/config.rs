use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::path::Path;

use crate::core::normalize::NormalizePolicy;

/// Application configuration
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub server: ServerSettings,
    pub search: SearchSettings,
    pub llm: LlmSettings,
    pub geography: GeographySettings,
    pub fx: FxSettings,
    pub cache: CacheSettings,
    #[serde(default)]
    pub estimation: EstimationSettings,
    pub logging: LoggingSettings,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
    pub workers: Option<usize>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SearchSettings {
    pub base_url: String,
    #[serde(default)]
    pub api_key: Option<String>,
    #[serde(default = "default_per_query_results")]
    pub per_query_results: usize,
    #[serde(default = "default_candidate_cap")]
    pub candidate_cap: usize,
}

fn default_per_query_results() -> usize { 20 }
fn default_candidate_cap() -> usize { 28 }

#[derive(Debug, Clone, Deserialize)]
pub struct LlmSettings {
    pub base_url: String,
    #[serde(default)]
    pub api_key: Option<String>,
    #[serde(default = "default_model")]
    pub model: String,
    #[serde(default = "default_max_output_tokens")]
    pub max_output_tokens: u32,
}

fn default_model() -> String { "gpt-4o-mini".to_string() }
fn default_max_output_tokens() -> u32 { 1200 }

#[derive(Debug, Clone, Deserialize)]
pub struct GeographySettings {
    pub base_url: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct FxSettings {
    pub base_url: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CacheSettings {
    #[serde(default = "default_cache_capacity")]
    pub capacity: u64,
    #[serde(default = "default_geo_ttl")]
    pub geo_ttl_secs: u64,
    #[serde(default = "default_fx_ttl")]
    pub fx_ttl_secs: u64,
}

fn default_cache_capacity() -> u64 { 1000 }
fn default_geo_ttl() -> u64 { 86_400 }
fn default_fx_ttl() -> u64 { 3_600 }

/// Tunables for estimate normalization and reconciliation
#[derive(Debug, Clone, Deserialize)]
pub struct EstimationSettings {
    #[serde(default)]
    policy: PolicyConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PolicyConfig {
    #[serde(default = "default_annual_monthly_floor")]
    pub annual_monthly_floor: f64,
    #[serde(default = "default_hourly_annual_ceiling")]
    pub hourly_annual_ceiling: f64,
    #[serde(default = "default_hours_per_year")]
    pub hours_per_year: f64,
    #[serde(default = "default_hourly_max")]
    pub hourly_max: f64,
    #[serde(default = "default_annual_max")]
    pub annual_max: f64,
    #[serde(default = "default_min_cited")]
    pub min_cited: usize,
    #[serde(default = "default_display_cap")]
    pub display_cap: usize,
    #[serde(default)]
    pub experience_adjustment: bool,
}

impl Default for PolicyConfig {
    fn default() -> Self {
        Self {
            annual_monthly_floor: default_annual_monthly_floor(),
            hourly_annual_ceiling: default_hourly_annual_ceiling(),
            hours_per_year: default_hours_per_year(),
            hourly_max: default_hourly_max(),
            annual_max: default_annual_max(),
            min_cited: default_min_cited(),
            display_cap: default_display_cap(),
            experience_adjustment: false,
        }
    }
}

fn default_annual_monthly_floor() -> f64 { 5000.0 }
fn default_hourly_annual_ceiling() -> f64 { 500.0 }
fn default_hours_per_year() -> f64 { 2080.0 }
fn default_hourly_max() -> f64 { 1000.0 }
fn default_annual_max() -> f64 { 10_000_000.0 }
fn default_min_cited() -> usize { 4 }
fn default_display_cap() -> usize { 10 }

impl EstimationSettings {
    pub fn policy(&self) -> NormalizePolicy {
        NormalizePolicy {
            annual_monthly_floor: self.policy.annual_monthly_floor,
            hourly_annual_ceiling: self.policy.hourly_annual_ceiling,
            hours_per_year: self.policy.hours_per_year,
            hourly_max: self.policy.hourly_max,
            annual_max: self.policy.annual_max,
            min_cited: self.policy.min_cited,
            display_cap: self.policy.display_cap,
            experience_adjustment: self.policy.experience_adjustment,
        }
    }
}

impl Default for EstimationSettings {
    fn default() -> Self {
        Self {
            policy: PolicyConfig::default(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingSettings {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default = "default_log_format")]
    pub format: String,
}

fn default_log_level() -> String { "info".to_string() }
fn default_log_format() -> String { "json".to_string() }

impl Settings {
    /// Load configuration from file and environment variables
    ///
    /// Configuration is loaded in the following order (later overrides earlier):
    /// 1. Default values in the struct
    /// 2. Configuration file (config/default.toml)
    /// 3. Environment variables (prefixed with RATE_)
    pub fn load() -> Result<Self, ConfigError> {
        let mut settings = Config::builder()
            // Add default config file
            .add_source(File::with_name("config/default").required(false))
            // Add local config file (for development overrides)
            .add_source(File::with_name("config/local").required(false))
            // Add environment variables (prefixed with RATE_)
            // e.g., RATE_SERVER__PORT -> server.port
            .add_source(
                Environment::with_prefix("RATE")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        settings = substitute_env_vars(settings)?;

        settings.try_deserialize()
    }

    /// Load configuration from a custom path
    pub fn load_from<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let settings = Config::builder()
            .add_source(File::from(path.as_ref()))
            .add_source(
                Environment::with_prefix("RATE")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        settings.try_deserialize()
    }
}

/// Pull provider credentials from their conventional environment
/// variable names so deployments don't need the prefixed form.
fn substitute_env_vars(settings: Config) -> Result<Config, ConfigError> {
    use std::env;

    let search_key = env::var("SERPAPI_API_KEY")
        .or_else(|_| env::var("RATE_SEARCH__API_KEY"))
        .ok();
    let llm_key = env::var("OPENAI_API_KEY")
        .or_else(|_| env::var("RATE_LLM__API_KEY"))
        .ok();

    let mut builder = Config::builder().add_source(settings);

    if let Some(key) = search_key {
        builder = builder.set_override("search.api_key", key)?;
    }
    if let Some(key) = llm_key {
        builder = builder.set_override("llm.api_key", key)?;
    }

    builder.build()
}
