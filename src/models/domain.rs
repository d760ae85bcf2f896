use serde::{Deserialize, Serialize};

/// Whether a quoted figure is an hourly rate or an annualized salary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum PayType {
    Hourly,
    Annual,
}

impl PayType {
    /// Wire form used by the presentation layer ("hourly" | "salary").
    pub fn as_rate_type(&self) -> &'static str {
        match self {
            PayType::Hourly => "hourly",
            PayType::Annual => "salary",
        }
    }

    pub fn keyword(&self) -> &'static str {
        match self {
            PayType::Hourly => "hourly rate",
            PayType::Annual => "salary",
        }
    }
}

/// How specifically a candidate source matches the requested location.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GeoRelevance {
    /// Title/snippet/URL mentions the requested city or state.
    Exact,
    /// Country-level signal only (name, alias, local site or currency).
    Country,
    /// No location signal detected.
    Nearby,
}

impl GeoRelevance {
    /// Sort priority; Exact outranks Country outranks Nearby.
    pub fn priority(&self) -> u8 {
        match self {
            GeoRelevance::Exact => 3,
            GeoRelevance::Country => 2,
            GeoRelevance::Nearby => 1,
        }
    }
}

/// Which end of the range a cited source supports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RangeTag {
    Min,
    Max,
    General,
}

/// Normalized experience category derived from the free-text hint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExperienceLevel {
    Entry,
    Mid,
    Senior,
    Principal,
}

impl ExperienceLevel {
    pub fn label(&self) -> &'static str {
        match self {
            ExperienceLevel::Entry => "entry-level",
            ExperienceLevel::Mid => "mid-level",
            ExperienceLevel::Senior => "senior",
            ExperienceLevel::Principal => "principal/staff",
        }
    }
}

/// One estimation request, immutable once submitted. Constructed per
/// submission and passed by reference through the pipeline; no
/// component mutates it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobQuery {
    pub job_title: String,
    pub experience_hint: Option<String>,
    pub job_description: Option<String>,
    pub country: String,
    pub state: Option<String>,
    pub city: Option<String>,
    pub pay_type: PayType,
    /// 3-letter display currency code, e.g. "EUR".
    pub display_currency: String,
}

impl JobQuery {
    /// "City, State, Country" with empty parts skipped.
    pub fn location_label(&self) -> String {
        let mut bits: Vec<&str> = Vec::new();
        if let Some(city) = self.city.as_deref() {
            if !city.is_empty() {
                bits.push(city);
            }
        }
        if let Some(state) = self.state.as_deref() {
            if !state.is_empty() {
                bits.push(state);
            }
        }
        bits.push(&self.country);
        bits.join(", ")
    }
}

/// A search result kept as a candidate for the extraction step.
/// Read-only after the search phase.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CandidateSource {
    pub url: String,
    pub title: String,
    pub snippet: String,
    pub host: String,
    #[serde(rename = "geoTag")]
    pub geo_tag: GeoRelevance,
    #[serde(rename = "reliabilityBoost")]
    pub reliability_boost: u8,
}

impl CandidateSource {
    /// Ranking score: geography dominates, reliability breaks ties.
    pub fn combined_score(&self) -> u32 {
        100 * self.geo_tag.priority() as u32 + self.reliability_boost as u32
    }
}

/// A citation that survived closed-world resolution, scored for display.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoredSource {
    pub url: String,
    pub title: String,
    #[serde(rename = "rangeTag")]
    pub range_tag: RangeTag,
    /// 0-100, model strength plus reliability boost.
    pub strength: u8,
    #[serde(rename = "geoTag")]
    pub geo_tag: GeoRelevance,
}

/// Reconciled estimation output, always USD internally. Display
/// currency conversion happens at the response boundary.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EstimationResult {
    pub min_usd: f64,
    pub max_usd: f64,
    pub pay_type: PayType,
    pub sources: Vec<ScoredSource>,
}

/// Which period local salary listings customarily quote.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QuotePeriod {
    Monthly,
    Annual,
}

/// Static per-country reference data. Unknown countries get
/// [`CountryProfile::default`]: USD, annual quoting, 12 periods.
#[derive(Debug, Clone)]
pub struct CountryProfile {
    pub name: &'static str,
    /// Alternate names and abbreviations used for text matching.
    pub aliases: &'static [&'static str],
    /// Local-language name when it differs from the English one.
    pub local_name: Option<&'static str>,
    pub currency: &'static str,
    pub quote_period: QuotePeriod,
    /// 12 standard; 13/14 where a mandated extra payment exists.
    pub pay_periods_per_year: u8,
    /// Locally authoritative salary-information hostnames.
    pub local_hosts: &'static [&'static str],
}

impl Default for CountryProfile {
    fn default() -> Self {
        Self {
            name: "Unknown",
            aliases: &[],
            local_name: None,
            currency: "USD",
            quote_period: QuotePeriod::Annual,
            pay_periods_per_year: 12,
            local_hosts: &[],
        }
    }
}
