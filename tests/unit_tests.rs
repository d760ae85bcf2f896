// Unit tests for rate-scout

use rate_scout::core::{
    convert::to_display,
    country::profile_for,
    experience::normalize_experience,
    normalize::{normalize, NormalizePolicy},
    prompt::build_prompt,
    query::build_queries,
    scoring::{assemble_candidates, RawResult},
};
use rate_scout::models::{
    CandidateSource, ExperienceLevel, GeoRelevance, JobQuery, PayType, RangeTag,
};
use std::collections::HashMap;

fn make_query(country: &str, city: Option<&str>, pay_type: PayType) -> JobQuery {
    JobQuery {
        job_title: "Backend Engineer".to_string(),
        experience_hint: None,
        job_description: None,
        country: country.to_string(),
        state: None,
        city: city.map(|c| c.to_string()),
        pay_type,
        display_currency: "USD".to_string(),
    }
}

fn make_candidate(url: &str, title: &str, geo_tag: GeoRelevance, boost: u8) -> CandidateSource {
    CandidateSource {
        url: url.to_string(),
        title: title.to_string(),
        snippet: String::new(),
        host: rate_scout::core::scoring::host_of(url).unwrap_or_default(),
        geo_tag,
        reliability_boost: boost,
    }
}

#[test]
fn test_query_builder_covers_aggregator_and_local_angles() {
    let query = make_query("Germany", Some("Berlin"), PayType::Annual);
    let profile = profile_for("Germany");

    let queries = build_queries(&query, &profile);

    assert!(queries[0].contains("Backend Engineer"));
    assert!(queries[0].contains("Germany"));
    assert!(queries[0].contains("salary"));
    assert!(queries.iter().any(|q| q.contains("site:glassdoor.com")));
    // Germany has a local name and local salary sites; both get a query.
    assert!(queries.iter().any(|q| q.contains("Deutschland")));
    assert!(queries.iter().any(|q| q.contains("site:")
        && profile.local_hosts.iter().any(|h| q.contains(h))));
}

#[test]
fn test_candidate_assembly_blocks_social_and_ranks_by_geography() {
    let query = make_query("United States", Some("Austin"), PayType::Annual);
    let profile = profile_for("United States");

    let raw = vec![
        RawResult {
            url: "https://facebook.com/groups/salaries".to_string(),
            title: "Salary discussion group".to_string(),
            snippet: String::new(),
        },
        RawResult {
            url: "https://example.com/pay-report".to_string(),
            title: "Engineering pay report".to_string(),
            snippet: "global figures".to_string(),
        },
        RawResult {
            url: "https://glassdoor.com/Salaries/austin-backend".to_string(),
            title: "Backend Engineer salaries in Austin".to_string(),
            snippet: String::new(),
        },
        RawResult {
            url: "https://levels.fyi/t/backend".to_string(),
            title: "Backend Engineer, United States".to_string(),
            snippet: String::new(),
        },
    ];

    let candidates = assemble_candidates(raw, &query, &profile, 28);

    assert_eq!(candidates.len(), 3, "blocked host should be dropped");
    // Austin mention outranks the country-level aggregator, which
    // outranks the untagged generic page.
    assert!(candidates[0].url.contains("glassdoor"));
    assert_eq!(candidates[0].geo_tag, GeoRelevance::Exact);
    assert!(candidates[1].url.contains("levels.fyi"));
    assert_eq!(candidates[1].geo_tag, GeoRelevance::Country);
    assert_eq!(candidates[2].geo_tag, GeoRelevance::Nearby);
}

#[test]
fn test_candidate_dedup_keeps_higher_score() {
    let query = make_query("United States", None, PayType::Annual);
    let profile = profile_for("United States");

    let raw = vec![
        RawResult {
            url: "https://payscale.com/research/backend".to_string(),
            title: "Backend pay".to_string(),
            snippet: String::new(),
        },
        RawResult {
            url: "https://payscale.com/research/backend".to_string(),
            title: "Backend Engineer salary, United States".to_string(),
            snippet: String::new(),
        },
    ];

    let candidates = assemble_candidates(raw, &query, &profile, 28);
    assert_eq!(candidates.len(), 1);
    assert_eq!(candidates[0].geo_tag, GeoRelevance::Country);
}

#[test]
fn test_prompt_carries_local_quoting_convention() {
    let query = make_query("Brazil", None, PayType::Annual);
    let profile = profile_for("Brazil");
    let candidates = vec![make_candidate(
        "https://glassdoor.com.br/Salarios/engenheiro",
        "Engenheiro de Software",
        GeoRelevance::Country,
        30,
    )];

    let prompt = build_prompt(&query, ExperienceLevel::Mid, &profile, &candidates);

    assert!(prompt.contains("PER MONTH"));
    assert!(prompt.contains("13"), "pay periods must reach the model");
    assert!(prompt.contains("https://glassdoor.com.br/Salarios/engenheiro"));
    assert!(prompt.contains("min_usd"));
}

#[test]
fn test_prompt_is_deterministic() {
    let query = make_query("Germany", Some("Berlin"), PayType::Hourly);
    let profile = profile_for("Germany");
    let candidates = vec![make_candidate(
        "https://gehalt.de/beruf/entwickler",
        "Entwickler Gehalt",
        GeoRelevance::Country,
        30,
    )];

    let a = build_prompt(&query, ExperienceLevel::Senior, &profile, &candidates);
    let b = build_prompt(&query, ExperienceLevel::Senior, &profile, &candidates);
    assert_eq!(a, b);
}

#[test]
fn test_experience_keywords_beat_years() {
    assert_eq!(
        normalize_experience(Some("Senior (3 years)"), None),
        ExperienceLevel::Senior
    );
    assert_eq!(
        normalize_experience(Some("10+ years"), None),
        ExperienceLevel::Senior
    );
    assert_eq!(
        normalize_experience(None, Some("We need 1 year of Python experience")),
        ExperienceLevel::Entry
    );
    assert_eq!(normalize_experience(None, None), ExperienceLevel::Mid);
}

#[test]
fn test_normalization_repairs_monthly_figures_for_brazil() {
    let profile = profile_for("Brazil");
    let candidates = vec![
        make_candidate("https://a.example/1", "a", GeoRelevance::Country, 0),
        make_candidate("https://b.example/2", "b", GeoRelevance::Country, 0),
    ];
    // Figures an LLM typically returns when local listings quote per
    // month: far below any plausible annual salary.
    let raw = r#"{"min_usd": 2000, "max_usd": 4000, "pay_type": "ANNUAL",
        "sources": [{"url": "https://a.example/1", "range_tag": "general", "strength": 70}]}"#;

    let result = normalize(
        raw,
        &candidates,
        PayType::Annual,
        &profile,
        ExperienceLevel::Mid,
        &NormalizePolicy::default(),
    )
    .unwrap();

    // 13 pay periods in Brazil.
    assert_eq!(result.min_usd, 26000.0);
    assert_eq!(result.max_usd, 52000.0);
}

#[test]
fn test_normalization_keeps_low_but_plausible_annual_range() {
    let profile = profile_for("India");
    let candidates = vec![
        make_candidate("https://a.example/1", "a", GeoRelevance::Country, 0),
        make_candidate("https://b.example/2", "b", GeoRelevance::Country, 0),
    ];
    // Low-income markets legitimately produce annual ranges whose min
    // sits under the monthly repair threshold. The repair keys off the
    // max, so this range must pass through unscaled.
    let raw = r#"{"min_usd": 2500, "max_usd": 6000, "pay_type": "ANNUAL",
        "sources": [{"url": "https://a.example/1", "range_tag": "general", "strength": 70}]}"#;

    let result = normalize(
        raw,
        &candidates,
        PayType::Annual,
        &profile,
        ExperienceLevel::Mid,
        &NormalizePolicy::default(),
    )
    .unwrap();

    assert_eq!(result.min_usd, 2500.0);
    assert_eq!(result.max_usd, 6000.0);
}

#[test]
fn test_normalization_closed_world_and_backfill() {
    let profile = profile_for("United States");
    let candidates: Vec<CandidateSource> = (1..=5)
        .map(|i| {
            make_candidate(
                &format!("https://source{}.example/pay", i),
                &format!("Source {}", i),
                GeoRelevance::Country,
                0,
            )
        })
        .collect();

    let raw = r#"```json
{"min_usd": 90000, "max_usd": 140000, "pay_type": "ANNUAL",
 "sources": [
   {"url": "https://source1.example/pay", "range_tag": "min", "strength": 80},
   {"url": "https://invented.example/not-real", "range_tag": "max", "strength": 90}
 ]}
```"#;

    let result = normalize(
        raw,
        &candidates,
        PayType::Annual,
        &profile,
        ExperienceLevel::Mid,
        &NormalizePolicy::default(),
    )
    .unwrap();

    assert!(
        !result.sources.iter().any(|s| s.url.contains("invented")),
        "citation outside the candidate pool must be dropped"
    );
    // One verified citation, backfilled up to the minimum of four.
    assert_eq!(result.sources.len(), 4);
    assert!(result.sources.iter().any(|s| s.url.contains("source1")));
    let backfilled = result
        .sources
        .iter()
        .filter(|s| s.range_tag == RangeTag::General)
        .count();
    assert_eq!(backfilled, 3);
}

#[test]
fn test_normalization_rejects_implausible_floor() {
    let profile = profile_for("United States");
    let candidates = vec![make_candidate(
        "https://a.example/1",
        "a",
        GeoRelevance::Country,
        0,
    )];
    // Even after the annual-to-hourly repair (divide by 2080), the
    // floor lands above any plausible hourly rate.
    let raw = r#"{"min_usd": 3000000, "max_usd": 5000000, "pay_type": "HOURLY",
        "sources": [{"url": "https://a.example/1", "range_tag": "general", "strength": 50}]}"#;

    let err = normalize(
        raw,
        &candidates,
        PayType::Hourly,
        &profile,
        ExperienceLevel::Mid,
        &NormalizePolicy::default(),
    )
    .unwrap_err();

    assert!(matches!(
        err,
        rate_scout::EstimateError::Validation { .. }
    ));
}

#[test]
fn test_display_conversion_applies_at_boundary_only() {
    let rates = HashMap::from([("USD".to_string(), 1.0), ("EUR".to_string(), 0.92)]);
    assert_eq!(to_display(50000.0, "EUR", &rates).round(), 46000.0);
    assert_eq!(to_display(50000.0, "USD", &rates), 50000.0);
    // Unknown code: no silent zeroing, amount passes through.
    assert_eq!(to_display(50000.0, "CHF", &rates), 50000.0);
}
