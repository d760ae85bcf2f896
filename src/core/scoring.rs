use std::collections::HashMap;

use crate::core::country::{is_blocked_host, reliability_boost};
use crate::models::{CandidateSource, CountryProfile, GeoRelevance, JobQuery};

/// An organic search result before filtering and tagging.
#[derive(Debug, Clone)]
pub struct RawResult {
    pub url: String,
    pub title: String,
    pub snippet: String,
}

/// Lowercased URL-slug form of a location name:
/// "Los Angeles" -> "los-angeles".
pub fn slugify(text: &str) -> String {
    text.trim()
        .to_lowercase()
        .split(|c: char| !c.is_alphanumeric())
        .filter(|p| !p.is_empty())
        .collect::<Vec<_>>()
        .join("-")
}

/// Host part of a URL, stripped of scheme and leading "www.".
pub fn host_of(url: &str) -> Option<String> {
    let rest = url
        .strip_prefix("https://")
        .or_else(|| url.strip_prefix("http://"))?;
    let host = rest.split(['/', '?', '#']).next()?;
    let host = host.split('@').last()?.split(':').next()?;
    let host = host.trim_start_matches("www.");
    if host.is_empty() {
        None
    } else {
        Some(host.to_lowercase())
    }
}

/// Tag how specifically a result matches the requested location.
///
/// City or state text (or its URL-slug form) wins Exact; a country
/// name, alias, local-site or local-currency signal wins Country;
/// anything else is Nearby/Unclear.
pub fn classify_relevance(
    result: &RawResult,
    query: &JobQuery,
    profile: &CountryProfile,
) -> GeoRelevance {
    let haystack = format!(
        "{} {} {}",
        result.title.to_lowercase(),
        result.snippet.to_lowercase(),
        result.url.to_lowercase()
    );

    let narrow_hit = [query.city.as_deref(), query.state.as_deref()]
        .into_iter()
        .flatten()
        .filter(|n| !n.is_empty())
        .any(|name| {
            haystack.contains(&name.to_lowercase()) || haystack.contains(&slugify(name))
        });
    if narrow_hit {
        return GeoRelevance::Exact;
    }

    let country_hit = haystack.contains(&query.country.to_lowercase())
        || profile.name != "Unknown" && haystack.contains(&profile.name.to_lowercase())
        || profile
            .aliases
            .iter()
            .filter(|a| a.len() > 2)
            .any(|a| haystack.contains(&a.to_lowercase()))
        || profile
            .local_name
            .map(|l| haystack.contains(&l.to_lowercase()))
            .unwrap_or(false)
        || profile
            .local_hosts
            .iter()
            .any(|h| haystack.contains(&h.to_lowercase()))
        || haystack.contains(&profile.currency.to_lowercase());
    if country_hit {
        return GeoRelevance::Country;
    }

    GeoRelevance::Nearby
}

/// Turn raw results from all queries into the ranked candidate list:
/// reject non-http(s) URLs and block-listed hosts, tag relevance,
/// apply the reliability boost, deduplicate by URL keeping the
/// higher-scoring entry, sort by combined score and cap the list.
pub fn assemble_candidates(
    raw: Vec<RawResult>,
    query: &JobQuery,
    profile: &CountryProfile,
    cap: usize,
) -> Vec<CandidateSource> {
    let mut by_url: HashMap<String, CandidateSource> = HashMap::new();

    for result in raw {
        let Some(host) = host_of(&result.url) else {
            continue;
        };
        if is_blocked_host(&host) {
            continue;
        }

        let geo_tag = classify_relevance(&result, query, profile);
        let candidate = CandidateSource {
            url: result.url.clone(),
            title: result.title,
            snippet: result.snippet,
            host: host.clone(),
            geo_tag,
            reliability_boost: reliability_boost(&host, profile),
        };

        match by_url.get(&result.url) {
            Some(existing) if existing.combined_score() >= candidate.combined_score() => {}
            _ => {
                by_url.insert(result.url, candidate);
            }
        }
    }

    let mut candidates: Vec<CandidateSource> = by_url.into_values().collect();
    candidates.sort_by(|a, b| {
        b.combined_score()
            .cmp(&a.combined_score())
            .then_with(|| a.url.cmp(&b.url))
    });
    candidates.truncate(cap);
    candidates
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::country::profile_for;
    use crate::models::PayType;

    fn query() -> JobQuery {
        JobQuery {
            job_title: "Marketing Director".to_string(),
            experience_hint: None,
            job_description: None,
            country: "United States".to_string(),
            state: Some("California".to_string()),
            city: Some("Los Angeles".to_string()),
            pay_type: PayType::Annual,
            display_currency: "USD".to_string(),
        }
    }

    fn raw(url: &str, title: &str, snippet: &str) -> RawResult {
        RawResult {
            url: url.to_string(),
            title: title.to_string(),
            snippet: snippet.to_string(),
        }
    }

    #[test]
    fn test_slugify() {
        assert_eq!(slugify("Los Angeles"), "los-angeles");
        assert_eq!(slugify("  São Paulo "), "são-paulo");
        assert_eq!(slugify("Berlin"), "berlin");
    }

    #[test]
    fn test_host_of() {
        assert_eq!(
            host_of("https://www.salary.com/research/salary"),
            Some("salary.com".to_string())
        );
        assert_eq!(host_of("http://gehalt.de:8080/x"), Some("gehalt.de".to_string()));
        assert_eq!(host_of("ftp://example.com"), None);
        assert_eq!(host_of("not a url"), None);
    }

    #[test]
    fn test_exact_relevance_from_slug() {
        let profile = profile_for("United States");
        let r = raw(
            "https://salary.com/research/marketing-director-los-angeles-ca",
            "Marketing Director Salary",
            "",
        );
        assert_eq!(classify_relevance(&r, &query(), &profile), GeoRelevance::Exact);
    }

    #[test]
    fn test_country_relevance_from_title() {
        let profile = profile_for("United States");
        let r = raw(
            "https://payscale.com/research/director",
            "Marketing Director Salary in United States",
            "",
        );
        assert_eq!(classify_relevance(&r, &query(), &profile), GeoRelevance::Country);
    }

    #[test]
    fn test_nearby_when_no_signal() {
        let profile = profile_for("United States");
        let r = raw(
            "https://someblog.io/marketing-pay",
            "Marketing pay trends",
            "global outlook",
        );
        assert_eq!(classify_relevance(&r, &query(), &profile), GeoRelevance::Nearby);
    }

    #[test]
    fn test_assemble_rejects_blocked_and_non_http() {
        let profile = profile_for("United States");
        let candidates = assemble_candidates(
            vec![
                raw("https://reddit.com/r/salary", "Salary thread", ""),
                raw("ftp://files.example.com/pay", "Pay dump", ""),
                raw("https://salary.com/page", "Salary in United States", ""),
            ],
            &query(),
            &profile,
            30,
        );
        assert_eq!(candidates.len(), 1);
        assert_eq!(candidates[0].host, "salary.com");
    }

    #[test]
    fn test_assemble_dedup_keeps_higher_score() {
        let profile = profile_for("United States");
        let candidates = assemble_candidates(
            vec![
                raw("https://salary.com/page", "Pay trends", "no location here"),
                raw("https://salary.com/page", "Salary in Los Angeles", ""),
            ],
            &query(),
            &profile,
            30,
        );
        assert_eq!(candidates.len(), 1);
        assert_eq!(candidates[0].geo_tag, GeoRelevance::Exact);
    }

    #[test]
    fn test_assemble_sorted_and_capped() {
        let profile = profile_for("United States");
        let candidates = assemble_candidates(
            vec![
                raw("https://blog.example.com/a", "pay", ""),
                raw("https://salary.com/b", "Los Angeles salary", ""),
                raw("https://jobsite.example.com/c", "United States salary", ""),
            ],
            &query(),
            &profile,
            2,
        );
        assert_eq!(candidates.len(), 2);
        assert_eq!(candidates[0].geo_tag, GeoRelevance::Exact);
        assert_eq!(candidates[1].geo_tag, GeoRelevance::Country);
    }
}
