use std::collections::HashMap;

use regex::Regex;
use serde::Deserialize;
use serde_json::Value;
use std::sync::OnceLock;

use crate::core::country::is_blocked_host;
use crate::core::estimator::EstimateError;
use crate::models::{
    CandidateSource, CountryProfile, EstimationResult, ExperienceLevel, PayType, RangeTag,
    ScoredSource,
};

/// Tunable thresholds of the normalizer. These are policy, not
/// contract; config overrides the defaults.
#[derive(Debug, Clone)]
pub struct NormalizePolicy {
    /// ANNUAL max below this is treated as an accidental monthly figure.
    pub annual_monthly_floor: f64,
    /// HOURLY min above this is treated as an accidental annual figure.
    pub hourly_annual_ceiling: f64,
    pub hours_per_year: f64,
    /// Absolute plausibility envelope per pay type.
    pub hourly_max: f64,
    pub annual_max: f64,
    /// Backfill from the candidate pool below this many citations.
    pub min_cited: usize,
    pub display_cap: usize,
    /// Post-hoc experience factor; off by default since the prompt
    /// already states the experience category.
    pub experience_adjustment: bool,
}

impl Default for NormalizePolicy {
    fn default() -> Self {
        Self {
            annual_monthly_floor: 5000.0,
            hourly_annual_ceiling: 500.0,
            hours_per_year: 2080.0,
            hourly_max: 1000.0,
            annual_max: 10_000_000.0,
            min_cited: 4,
            display_cap: 10,
            experience_adjustment: false,
        }
    }
}

/// Strength assumed for citations the model listed without a score
/// (legacy min_links/max_links/sources_used shapes).
const DEFAULT_CITED_STRENGTH: u8 = 50;

/// Base strength of a backfilled, uncited candidate.
const BACKFILL_STRENGTH: u8 = 25;

#[derive(Debug, Deserialize)]
struct RawEstimate {
    min_usd: Option<Value>,
    max_usd: Option<Value>,
    pay_type: Option<String>,
    #[serde(default)]
    sources: Vec<RawCitation>,
    #[serde(default)]
    sources_used: Vec<String>,
    #[serde(default)]
    min_links: Vec<String>,
    #[serde(default)]
    max_links: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct RawCitation {
    url: Option<String>,
    range_tag: Option<String>,
    strength: Option<Value>,
    #[allow(dead_code)]
    #[serde(default)]
    note: Option<String>,
}

/// Run the full gate pipeline over raw LLM text. Every gate either
/// passes a refined state forward or aborts with a classified error;
/// no partial result is ever silently returned.
pub fn normalize(
    raw: &str,
    candidates: &[CandidateSource],
    requested: PayType,
    profile: &CountryProfile,
    experience: ExperienceLevel,
    policy: &NormalizePolicy,
) -> Result<EstimationResult, EstimateError> {
    let parsed = parse_payload(raw)?;

    let pay_type = coerce_pay_type(parsed.pay_type.as_deref(), requested);
    let mut min = coerce_number(parsed.min_usd.as_ref())
        .ok_or_else(|| EstimateError::validation("model returned a non-numeric minimum"))?;
    let mut max = coerce_number(parsed.max_usd.as_ref())
        .ok_or_else(|| EstimateError::validation("model returned a non-numeric maximum"))?;

    if min <= 0.0 || max <= 0.0 {
        return Err(EstimateError::validation(
            "model found no usable pay figures (non-positive range)",
        ));
    }

    (min, max) = correct_units(min, max, pay_type, profile, policy);

    if policy.experience_adjustment {
        (min, max) = adjust_for_experience(min, max, experience);
    }

    if min > max {
        std::mem::swap(&mut min, &mut max);
    }

    (min, max) = check_envelope(min, max, pay_type, policy)?;

    // Backfill inside resolve_sources guarantees evidence whenever the
    // candidate pool is non-empty; the empty-pool case never reaches
    // the normalizer.
    let sources = resolve_sources(&parsed, candidates, policy);

    Ok(EstimationResult {
        min_usd: min,
        max_usd: max,
        pay_type,
        sources,
    })
}

/// Gate 1: strip markdown fences, parse JSON, retry on the first
/// top-level brace block.
fn parse_payload(raw: &str) -> Result<RawEstimate, EstimateError> {
    let text = strip_fences(raw);
    if let Ok(parsed) = serde_json::from_str::<RawEstimate>(text) {
        return Ok(parsed);
    }
    if let Some(block) = brace_block(text) {
        if let Ok(parsed) = serde_json::from_str::<RawEstimate>(block) {
            return Ok(parsed);
        }
    }
    Err(EstimateError::Parse(truncate_for_diagnostics(raw)))
}

/// Remove a ```json ... ``` (or bare ```) wrapper if present.
pub fn strip_fences(raw: &str) -> &str {
    let trimmed = raw.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let Some(body) = rest.strip_suffix("```") else {
        return trimmed;
    };
    // Drop the language tag on the opening fence line.
    match body.split_once('\n') {
        Some((first, tail)) if first.chars().all(|c| c.is_ascii_alphanumeric()) => tail.trim(),
        _ => body.trim(),
    }
}

fn brace_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?s)\{.*\}").expect("valid regex"))
}

/// First top-level `{...}` block (greedy to the last closing brace).
fn brace_block(text: &str) -> Option<&str> {
    brace_re().find(text).map(|m| m.as_str())
}

fn truncate_for_diagnostics(raw: &str) -> String {
    let trimmed = raw.trim();
    if trimmed.chars().count() <= 200 {
        trimmed.to_string()
    } else {
        let head: String = trimmed.chars().take(200).collect();
        format!("{}…", head)
    }
}

/// Gate 2: tolerant numeric coercion. Accepts JSON numbers, plain and
/// comma-grouped numeric strings, and `k`/`m` magnitude suffixes.
pub fn coerce_number(value: Option<&Value>) -> Option<f64> {
    let value = value?;
    let n = match value {
        Value::Number(n) => n.as_f64()?,
        Value::String(s) => {
            let cleaned = s.trim().trim_start_matches('$').replace([',', ' '], "");
            if cleaned.is_empty() {
                return None;
            }
            let (digits, factor) = match cleaned.chars().last()? {
                'k' | 'K' => (&cleaned[..cleaned.len() - 1], 1_000.0),
                'm' | 'M' => (&cleaned[..cleaned.len() - 1], 1_000_000.0),
                _ => (cleaned.as_str(), 1.0),
            };
            digits.parse::<f64>().ok()? * factor
        }
        _ => return None,
    };
    n.is_finite().then_some(n)
}

fn coerce_pay_type(echoed: Option<&str>, requested: PayType) -> PayType {
    match echoed.map(|s| s.trim().to_uppercase()) {
        Some(ref s) if s == "HOURLY" => PayType::Hourly,
        Some(ref s) if s == "ANNUAL" => PayType::Annual,
        _ => requested,
    }
}

/// Gate 4: unit-confusion repair. An implausibly small annual maximum
/// means the whole range is monthly figures the model forgot to
/// annualize; an implausibly large hourly minimum means an accidental
/// annual figure. The annual trigger looks at max, not min, so a
/// genuinely low min paired with a plausible max is left alone.
pub fn correct_units(
    min: f64,
    max: f64,
    pay_type: PayType,
    profile: &CountryProfile,
    policy: &NormalizePolicy,
) -> (f64, f64) {
    match pay_type {
        PayType::Annual if max < policy.annual_monthly_floor => {
            let factor = profile.pay_periods_per_year as f64;
            (min * factor, max * factor)
        }
        PayType::Hourly if min > policy.hourly_annual_ceiling => {
            (min / policy.hours_per_year, max / policy.hours_per_year)
        }
        _ => (min, max),
    }
}

fn adjust_for_experience(min: f64, max: f64, experience: ExperienceLevel) -> (f64, f64) {
    let (lo, hi) = match experience {
        ExperienceLevel::Entry => (0.75, 0.85),
        ExperienceLevel::Mid => (1.0, 1.0),
        ExperienceLevel::Senior => (1.15, 1.3),
        ExperienceLevel::Principal => (1.3, 1.6),
    };
    (min * lo, max * hi)
}

/// Gate 6: absolute plausibility envelope. The pair is rejected rather
/// than silently repaired into a safe-looking number.
pub fn check_envelope(
    min: f64,
    max: f64,
    pay_type: PayType,
    policy: &NormalizePolicy,
) -> Result<(f64, f64), EstimateError> {
    let ceiling = match pay_type {
        PayType::Hourly => policy.hourly_max,
        PayType::Annual => policy.annual_max,
    };
    if min > ceiling {
        return Err(EstimateError::validation(format!(
            "range {:.0}-{:.0} is outside the plausible {} envelope",
            min,
            max,
            pay_type.as_rate_type()
        )));
    }
    let max = max.min(ceiling);
    if min <= 0.0 || max <= 0.0 || min > max {
        return Err(EstimateError::validation(
            "range collapsed during envelope clamping",
        ));
    }
    Ok((min, max))
}

/// Gates 7-9: closed-world citation resolution, scoring with the
/// reliability boost, URL dedup keeping the strongest entry, backfill
/// from the candidate pool, final (geo desc, strength desc) ordering.
fn resolve_sources(
    parsed: &RawEstimate,
    candidates: &[CandidateSource],
    policy: &NormalizePolicy,
) -> Vec<ScoredSource> {
    let by_url: HashMap<&str, &CandidateSource> =
        candidates.iter().map(|c| (c.url.as_str(), c)).collect();

    let mut kept: HashMap<String, ScoredSource> = HashMap::new();
    let mut keep = |url: &str, tag: RangeTag, strength: u8| {
        // Closed world: a cited URL must be byte-identical to a shown
        // candidate. Anything else was invented by the model.
        let Some(candidate) = by_url.get(url) else {
            return;
        };
        if is_blocked_host(&candidate.host) {
            return;
        }
        let strength = (strength as u16 + candidate.reliability_boost as u16).min(100) as u8;
        let entry = ScoredSource {
            url: candidate.url.clone(),
            title: display_title(candidate),
            range_tag: tag,
            strength,
            geo_tag: candidate.geo_tag,
        };
        match kept.get(url) {
            Some(existing) if existing.strength >= strength => {}
            _ => {
                kept.insert(url.to_string(), entry);
            }
        }
    };

    for citation in &parsed.sources {
        let Some(url) = citation.url.as_deref() else {
            continue;
        };
        let tag = match citation.range_tag.as_deref().map(str::to_lowercase).as_deref() {
            Some("min") => RangeTag::Min,
            Some("max") => RangeTag::Max,
            _ => RangeTag::General,
        };
        let strength = coerce_number(citation.strength.as_ref())
            .map(|s| s.clamp(0.0, 100.0) as u8)
            .unwrap_or(DEFAULT_CITED_STRENGTH);
        keep(url, tag, strength);
    }
    for url in &parsed.min_links {
        keep(url, RangeTag::Min, DEFAULT_CITED_STRENGTH);
    }
    for url in &parsed.max_links {
        keep(url, RangeTag::Max, DEFAULT_CITED_STRENGTH);
    }
    for url in &parsed.sources_used {
        keep(url, RangeTag::General, DEFAULT_CITED_STRENGTH);
    }

    let mut sources: Vec<ScoredSource> = kept.into_values().collect();

    // Backfill so a verdict never ships with near-zero evidence while
    // ranked candidates exist.
    if sources.len() < policy.min_cited {
        for candidate in candidates {
            if sources.len() >= policy.display_cap.min(policy.min_cited) {
                break;
            }
            if sources.iter().any(|s| s.url == candidate.url) {
                continue;
            }
            sources.push(ScoredSource {
                url: candidate.url.clone(),
                title: display_title(candidate),
                range_tag: RangeTag::General,
                strength: (BACKFILL_STRENGTH as u16 + candidate.reliability_boost as u16)
                    .min(100) as u8,
                geo_tag: candidate.geo_tag,
            });
        }
    }

    sources.sort_by(|a, b| {
        b.geo_tag
            .priority()
            .cmp(&a.geo_tag.priority())
            .then_with(|| b.strength.cmp(&a.strength))
            .then_with(|| a.url.cmp(&b.url))
    });
    sources.truncate(policy.display_cap);
    sources
}

/// Short readable label for a source: prefer the result title, fall
/// back to "host — path words".
fn display_title(candidate: &CandidateSource) -> String {
    let title = candidate.title.trim();
    if !title.is_empty() {
        return title.to_string();
    }
    let tail = candidate
        .url
        .splitn(4, '/')
        .nth(3)
        .unwrap_or("")
        .split(['?', '#'])
        .next()
        .unwrap_or("")
        .trim_end_matches(".html")
        .trim_end_matches(".htm")
        .trim_end_matches(".php")
        .replace(['-', '_', '/'], " ");
    let tail = tail.split_whitespace().collect::<Vec<_>>().join(" ");
    if tail.is_empty() {
        candidate.host.clone()
    } else {
        let short: String = tail.chars().take(58).collect();
        format!("{} — {}", candidate.host, short)
    }
}
